//! Test case and session types for the execution harness.

use crate::driver::{Browser, DriverError};
use crate::report::recorder::StepRecorder;
use crate::report::types::{ReportError, RunId, TestStatus};

/// Result type for one test flow
pub type FlowResult<T> = Result<T, FlowError>;

/// Failure of one test flow
#[derive(Debug)]
pub enum FlowError {
    /// Browser interaction failed
    Driver(DriverError),

    /// An application-level check did not hold
    Check(String),
}

impl std::fmt::Display for FlowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowError::Driver(err) => write!(f, "Driver error: {}", err),
            FlowError::Check(msg) => write!(f, "Check failed: {}", msg),
        }
    }
}

impl std::error::Error for FlowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FlowError::Driver(err) => Some(err),
            FlowError::Check(_) => None,
        }
    }
}

impl From<DriverError> for FlowError {
    fn from(err: DriverError) -> Self {
        FlowError::Driver(err)
    }
}

/// Fail the flow with `msg` unless `condition` holds
pub fn check(condition: bool, msg: &str) -> FlowResult<()> {
    if condition {
        Ok(())
    } else {
        Err(FlowError::Check(msg.to_string()))
    }
}

/// Body of one test: drives the browser, records step screenshots, and
/// reports pass/fail through its result
pub type TestBody = Box<dyn Fn(&mut dyn Browser, &mut StepRecorder) -> FlowResult<()>>;

/// One named test
pub struct TestCase {
    pub name: String,
    pub body: TestBody,
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish()
    }
}

/// Ordered collection of tests executed in one session
#[derive(Debug, Default)]
pub struct Suite {
    name: String,
    cases: Vec<TestCase>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    /// Append a test; execution order is append order
    pub fn case<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut dyn Browser, &mut StepRecorder) -> FlowResult<()> + 'static,
    {
        self.cases.push(TestCase {
            name: name.into(),
            body: Box::new(body),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// Outcome counts for one completed session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub run_id: RunId,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl SessionSummary {
    pub fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            total: 0,
            passed: 0,
            failed: 0,
        }
    }

    pub fn record(&mut self, status: TestStatus) {
        self.total += 1;
        match status {
            TestStatus::Passed => self.passed += 1,
            TestStatus::Failed => self.failed += 1,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64 * 100.0
        }
    }
}

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Error types for harness operations
#[derive(Debug)]
pub enum HarnessError {
    /// Could not set up the session's reports tree
    Session(std::io::Error),

    /// Could not persist run results
    Report(ReportError),
}

impl std::fmt::Display for HarnessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HarnessError::Session(err) => write!(f, "Session setup error: {}", err),
            HarnessError::Report(err) => write!(f, "Report error: {}", err),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HarnessError::Session(err) => Some(err),
            HarnessError::Report(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for HarnessError {
    fn from(err: std::io::Error) -> Self {
        HarnessError::Session(err)
    }
}

impl From<ReportError> for HarnessError {
    fn from(err: ReportError) -> Self {
        HarnessError::Report(err)
    }
}
