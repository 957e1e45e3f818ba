//! Run reporting pipeline.
//!
//! Everything a test session leaves behind: step and final screenshots
//! ([`recorder`]), the per-run run_data.json and the merged history
//! ([`store`]), and the interactive HTML dashboards ([`dashboard`]).

pub mod dashboard;
pub mod recorder;
pub mod store;
pub mod types;

pub use dashboard::{format_run_label, render_dashboard, write_dashboards, DashboardMode};
pub use recorder::{RunReporter, StepRecorder};
pub use store::{load_all_runs, save_run_data};
pub use types::{
    ReportError, ReportResult, RunId, RunMap, StepShot, TestResult, TestStatus, MAX_STEP_SHOTS,
};
