//! Gift voucher selection page.

use crate::driver::{Browser, DriverResult, Locator};

pub struct VoucherPage<'a> {
    browser: &'a mut dyn Browser,
}

impl<'a> VoucherPage<'a> {
    pub fn new(browser: &'a mut dyn Browser) -> Self {
        Self { browser }
    }

    // TODO: confirm selectors against the production DOM
    pub fn amount_input() -> Locator {
        Locator::css("input[type='number'], input[name*='amount']")
    }

    pub fn next_button() -> Locator {
        Locator::xpath("//button[contains(.,'Continue') or contains(.,'Next')]")
    }

    pub fn set_amount(&mut self, amount: u32) -> DriverResult<&mut Self> {
        self.browser
            .type_into(&Self::amount_input(), &amount.to_string())?;
        Ok(self)
    }

    pub fn next(&mut self) -> DriverResult<&mut Self> {
        self.browser.click_on(&Self::next_button())?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{MockBrowser, MockElement};

    #[test]
    fn test_set_amount_and_continue() {
        let mut browser = MockBrowser::new()
            .element(MockElement::new(VoucherPage::amount_input()))
            .element(MockElement::new(VoucherPage::next_button()).navigates_to("mock://checkout"));

        let mut page = VoucherPage::new(&mut browser);
        page.set_amount(250).unwrap().next().unwrap();

        assert_eq!(browser.value_of(&VoucherPage::amount_input()).unwrap(), "250");
        assert_eq!(browser.current_url().unwrap(), "mock://checkout");
    }
}
