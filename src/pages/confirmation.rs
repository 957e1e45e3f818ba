//! Order confirmation page.

use crate::driver::{Browser, Locator};

pub struct ConfirmationPage<'a> {
    browser: &'a mut dyn Browser,
}

impl<'a> ConfirmationPage<'a> {
    pub fn new(browser: &'a mut dyn Browser) -> Self {
        Self { browser }
    }

    pub fn success_banner() -> Locator {
        Locator::xpath("//*[contains(.,'Thank you') or contains(.,'Confirmed') or contains(.,'Success')]")
    }

    pub fn is_success(&mut self) -> bool {
        self.browser.is_visible(&Self::success_banner())
    }
}
