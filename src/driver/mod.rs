//! Browser automation layer.
//!
//! [`Browser`] is the seam between page objects and the machinery that
//! drives a real browser: [`WebDriverBrowser`] speaks the WebDriver wire
//! protocol to a chromedriver endpoint, [`MockBrowser`] runs scripted pages
//! in memory for tests.

pub mod browser;
pub mod mock;
pub mod types;
pub mod wire;

pub use browser::{with_basic_auth, Browser, ElementHandle};
pub use mock::{MockBrowser, MockElement};
pub use types::{DriverError, DriverResult, Locator, WaitKind};
pub use wire::{CurlTransport, WebDriverBrowser, WireTransport};
