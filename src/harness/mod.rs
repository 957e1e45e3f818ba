pub mod exec;
pub mod types;

pub use exec::run_session;
pub use types::{
    check, FlowError, FlowResult, HarnessError, HarnessResult, SessionSummary, Suite, TestCase,
};
