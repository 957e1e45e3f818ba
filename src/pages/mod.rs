//! Page objects for the storefront under test.
//!
//! Each page wraps a mutable borrow of a [`Browser`](crate::driver::Browser)
//! and exposes the interactions that page supports. Locators live with their
//! page as associated functions so tests can script mock pages against the
//! same selectors.

pub mod balance_modal;
pub mod checkout;
pub mod confirmation;
pub mod home;
pub mod voucher;

pub use balance_modal::BalanceModal;
pub use checkout::CheckoutPage;
pub use confirmation::ConfirmationPage;
pub use home::HomePage;
pub use voucher::VoucherPage;
