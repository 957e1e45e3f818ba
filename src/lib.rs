//! Shopflow - End-to-end storefront UI testing with run dashboards.
//!
//! This crate provides:
//! - A WebDriver-backed browser layer with a scriptable mock for tests
//! - Page objects for the storefront's critical paths
//! - A test harness running suites with per-test browser isolation
//! - Run reporting: step screenshots, run_data.json, interactive HTML
//!   dashboards (per run and aggregated across runs)
//!
//! # Example
//!
//! ```rust,no_run
//! use shopflow::config::Config;
//! use shopflow::driver::{Browser, WebDriverBrowser};
//! use shopflow::flows::{storefront_suite, StorefrontData};
//! use shopflow::harness::run_session;
//!
//! let config = Config::from_env();
//! let suite = storefront_suite(&config.site, &StorefrontData::from_env());
//! let summary = run_session(&config, &suite, || {
//!     WebDriverBrowser::start(&config.driver).map(|b| Box::new(b) as Box<dyn Browser>)
//! })
//! .unwrap();
//! println!("{}/{} passed", summary.passed, summary.total);
//! ```

pub mod config;
pub mod driver;
pub mod flows;
pub mod harness;
pub mod pages;
pub mod report;
pub mod session;

// Re-export driver types
pub use driver::{Browser, DriverError, DriverResult, Locator, MockBrowser, WaitKind, WebDriverBrowser};

// Re-export harness types
pub use harness::{
    check, run_session, FlowError, FlowResult, HarnessError, HarnessResult, SessionSummary, Suite,
};

// Re-export reporting types
pub use report::{
    load_all_runs, render_dashboard, save_run_data, write_dashboards, DashboardMode, ReportError,
    ReportResult, RunId, RunMap, RunReporter, StepRecorder, StepShot, TestResult, TestStatus,
};

// Re-export session management
pub use session::{list_runs, sanitize_filename, RunSession};
