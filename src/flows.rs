//! Built-in storefront test flows.
//!
//! The suite mirrors the storefront's critical paths: landing page, gift
//! card balance check, and the voucher purchase funnel. Flow functions take
//! the browser and a step recorder so every major UI state lands in the run
//! dashboard.
//!
//! Flow data can be overridden per environment:
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `SHOPFLOW_COUPON_CODE` | Gift card code used by the balance flow |
//! | `SHOPFLOW_VOUCHER_AMOUNT` | Voucher amount typed in the purchase flow |

use std::env;
use std::time::Duration;

use crate::config::SiteSettings;
use crate::driver::Browser;
use crate::harness::types::{check, FlowResult, Suite};
use crate::pages::{BalanceModal, CheckoutPage, ConfirmationPage, HomePage, VoucherPage};
use crate::report::recorder::StepRecorder;

pub const ENV_COUPON_CODE: &str = "SHOPFLOW_COUPON_CODE";
pub const ENV_VOUCHER_AMOUNT: &str = "SHOPFLOW_VOUCHER_AMOUNT";

/// Wait for the modal's enable-on-input script before clicking Check
const CHECK_SETTLE: Duration = Duration::from_secs(1);

/// Data driving the built-in flows
#[derive(Debug, Clone)]
pub struct StorefrontData {
    pub coupon_code: String,
    pub voucher_amount: u32,
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: String,
}

impl StorefrontData {
    pub fn from_env() -> Self {
        let mut data = Self::defaults();
        if let Ok(code) = env::var(ENV_COUPON_CODE) {
            data.coupon_code = code;
        }
        if let Some(amount) = env::var(ENV_VOUCHER_AMOUNT)
            .ok()
            .and_then(|v| v.trim().parse().ok())
        {
            data.voucher_amount = amount;
        }
        data
    }

    pub fn defaults() -> Self {
        Self {
            coupon_code: "1234567890123456".to_string(),
            voucher_amount: 250,
            buyer_name: "QA Buyer".to_string(),
            buyer_email: "qa.buyer@example.com".to_string(),
            buyer_phone: "0500000000".to_string(),
        }
    }
}

/// The built-in storefront suite, in funnel order
pub fn storefront_suite(site: &SiteSettings, data: &StorefrontData) -> Suite {
    let marker = host_marker(&site.base_url);

    Suite::new("storefront")
        .case("home page loads", {
            let site = site.clone();
            let marker = marker.clone();
            move |browser, recorder| home_page_loads(browser, recorder, &site, &marker)
        })
        .case("check balance button enables after coupon code", {
            let site = site.clone();
            let data = data.clone();
            move |browser, recorder| check_balance_flow(browser, recorder, &site, &data)
        })
        .case("voucher purchase flow", {
            let site = site.clone();
            let data = data.clone();
            move |browser, recorder| voucher_purchase_flow(browser, recorder, &site, &data)
        })
}

/// Host part of the base URL, lowercased; the loaded page's URL must still
/// contain it after any redirects
fn host_marker(base_url: &str) -> String {
    let rest = base_url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(base_url);
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    host.to_lowercase()
}

fn home_page_loads(
    browser: &mut dyn Browser,
    recorder: &mut StepRecorder,
    site: &SiteSettings,
    marker: &str,
) -> FlowResult<()> {
    let mut home = HomePage::new(&mut *browser);
    home.load(site)?;
    check(home.is_loaded(), "home page did not load")?;

    let url = home.current_url()?.to_lowercase();
    check(url.contains(marker), "loaded URL does not match the storefront")?;

    recorder.capture(browser, "home page");
    Ok(())
}

fn check_balance_flow(
    browser: &mut dyn Browser,
    recorder: &mut StepRecorder,
    site: &SiteSettings,
    data: &StorefrontData,
) -> FlowResult<()> {
    check(!data.coupon_code.is_empty(), "coupon code is missing/empty")?;

    let mut home = HomePage::new(&mut *browser);
    home.load(site)?;
    check(home.is_loaded(), "home page did not load")?;
    recorder.capture(browser, "home page");

    let home = HomePage::new(&mut *browser);
    let mut modal = home.open_check_balance_modal()?;
    check(modal.is_open(), "balance popup did not open")?;
    recorder.capture(browser, "balance modal open");

    let mut modal = BalanceModal::new(&mut *browser);
    modal.enter_coupon_code(&data.coupon_code)?;
    let typed = modal.coupon_value()?;
    check(
        typed.trim() == data.coupon_code,
        "coupon code was not accepted by the input",
    )?;
    check(
        modal.is_check_button_present(),
        "check button not found in modal",
    )?;
    check(
        modal.is_check_button_enabled()?,
        "check button is not enabled after entering coupon code",
    )?;
    recorder.capture(browser, "coupon entered");

    let mut modal = BalanceModal::new(&mut *browser);
    modal.click_check(CHECK_SETTLE)?;
    recorder.capture(browser, "balance checked");
    Ok(())
}

fn voucher_purchase_flow(
    browser: &mut dyn Browser,
    recorder: &mut StepRecorder,
    site: &SiteSettings,
    data: &StorefrontData,
) -> FlowResult<()> {
    let mut home = HomePage::new(&mut *browser);
    home.load(site)?;
    check(home.is_loaded(), "home page did not load")?;
    recorder.capture(browser, "storefront");

    let mut voucher = VoucherPage::new(&mut *browser);
    voucher.set_amount(data.voucher_amount)?.next()?;
    recorder.capture(browser, "voucher amount set");

    let mut checkout = CheckoutPage::new(&mut *browser);
    checkout
        .fill_buyer_details(&data.buyer_name, &data.buyer_email, &data.buyer_phone)?
        .continue_to_payment()?;
    recorder.capture(browser, "buyer details submitted");

    let mut confirmation = ConfirmationPage::new(&mut *browser);
    check(confirmation.is_success(), "order confirmation not shown")?;
    recorder.capture(browser, "order confirmed");
    Ok(())
}
