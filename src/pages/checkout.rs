//! Buyer details form before payment.

use crate::driver::{Browser, DriverResult, Locator};

pub struct CheckoutPage<'a> {
    browser: &'a mut dyn Browser,
}

impl<'a> CheckoutPage<'a> {
    pub fn new(browser: &'a mut dyn Browser) -> Self {
        Self { browser }
    }

    // TODO: confirm selectors against the production DOM
    pub fn buyer_name_input() -> Locator {
        Locator::css("input[name*='buyer'], input[placeholder*='name']")
    }

    pub fn buyer_email_input() -> Locator {
        Locator::css("input[type='email']")
    }

    pub fn buyer_phone_input() -> Locator {
        Locator::css("input[type='tel'], input[placeholder*='phone']")
    }

    pub fn payment_button() -> Locator {
        Locator::xpath("//button[contains(.,'Payment') or contains(.,'Continue')]")
    }

    pub fn fill_buyer_details(
        &mut self,
        name: &str,
        email: &str,
        phone: &str,
    ) -> DriverResult<&mut Self> {
        self.browser.type_into(&Self::buyer_name_input(), name)?;
        self.browser.type_into(&Self::buyer_email_input(), email)?;
        self.browser.type_into(&Self::buyer_phone_input(), phone)?;
        Ok(self)
    }

    pub fn continue_to_payment(&mut self) -> DriverResult<&mut Self> {
        self.browser.click_on(&Self::payment_button())?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{MockBrowser, MockElement};

    #[test]
    fn test_fill_buyer_details_then_pay() {
        let mut browser = MockBrowser::new()
            .element(MockElement::new(CheckoutPage::buyer_name_input()))
            .element(MockElement::new(CheckoutPage::buyer_email_input()))
            .element(MockElement::new(CheckoutPage::buyer_phone_input()))
            .element(MockElement::new(CheckoutPage::payment_button()).navigates_to("mock://pay"));

        let mut page = CheckoutPage::new(&mut browser);
        page.fill_buyer_details("QA Buyer", "qa@example.com", "0500000000")
            .unwrap()
            .continue_to_payment()
            .unwrap();

        assert_eq!(
            browser.value_of(&CheckoutPage::buyer_email_input()).unwrap(),
            "qa@example.com"
        );
        assert_eq!(browser.current_url().unwrap(), "mock://pay");
    }
}
