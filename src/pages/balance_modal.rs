//! Gift-card balance popup.

use std::time::Duration;

use crate::driver::{Browser, DriverResult, Locator, WaitKind};

pub struct BalanceModal<'a> {
    browser: &'a mut dyn Browser,
}

impl<'a> BalanceModal<'a> {
    pub fn new(browser: &'a mut dyn Browser) -> Self {
        Self { browser }
    }

    pub fn coupon_input() -> Locator {
        Locator::css(".form-control.text-center.fs--18.rounded-1.mb-3")
    }

    /// "Check" button, by id since the class list is shared with other buttons
    pub fn check_button() -> Locator {
        Locator::id("checkRemainingBtn")
    }

    pub fn is_open(&mut self) -> bool {
        self.browser.is_visible(&Self::coupon_input())
    }

    /// Type the coupon code; when the widget swallows keystrokes the value
    /// is set directly with input/change events so the form still reacts
    pub fn enter_coupon_code(&mut self, code: &str) -> DriverResult<&mut Self> {
        self.browser.type_into(&Self::coupon_input(), code)?;

        let current = self.browser.value_of(&Self::coupon_input())?;
        if current.trim().is_empty() {
            let el = self.browser.find(&Self::coupon_input(), WaitKind::Present)?;
            self.browser.set_value(&el, code)?;
        }
        Ok(self)
    }

    /// Coupon field's current value, as the page sees it
    pub fn coupon_value(&mut self) -> DriverResult<String> {
        self.browser.value_of(&Self::coupon_input())
    }

    pub fn is_check_button_present(&mut self) -> bool {
        self.browser.is_present(&Self::check_button())
    }

    /// Enabled means no `disabled` attribute, no `aria-disabled="true"`,
    /// and the element itself reporting enabled
    pub fn is_check_button_enabled(&mut self) -> DriverResult<bool> {
        if !self.browser.is_present(&Self::check_button()) {
            return Ok(false);
        }
        let el = self.browser.find(&Self::check_button(), WaitKind::Present)?;

        if self.browser.attr(&el, "disabled")?.is_some() {
            return Ok(false);
        }
        if let Some(aria) = self.browser.attr(&el, "aria-disabled")? {
            if aria.eq_ignore_ascii_case("true") {
                return Ok(false);
            }
        }
        self.browser.is_enabled(&el)
    }

    /// Give the modal's enable-on-input script time to settle, then click.
    /// Uses a presence click since the button's overlay styling confuses
    /// clickability checks.
    pub fn click_check(&mut self, settle: Duration) -> DriverResult<&mut Self> {
        std::thread::sleep(settle);
        self.browser.click_present(&Self::check_button())?;
        Ok(self)
    }
}
