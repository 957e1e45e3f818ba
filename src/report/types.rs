// Core record types for run reporting

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Maximum number of step screenshots kept per test
pub const MAX_STEP_SHOTS: usize = 4;

/// Prefix of every run identifier and run directory name
pub const RUN_ID_PREFIX: &str = "run_";

/// Timestamp layout embedded in a run id (fixed width, so ids sort by time)
pub const RUN_ID_TIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Identifier of one test session, e.g. `run_2024-01-03_10-00-00`.
///
/// Doubles as the run's directory name and as the sort key for presentation:
/// lexicographic order equals creation order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Allocate a run id from the local wall clock
    pub fn now() -> Self {
        Self(format!(
            "{}{}",
            RUN_ID_PREFIX,
            chrono::Local::now().format(RUN_ID_TIME_FORMAT)
        ))
    }

    /// Wrap an existing id, e.g. a directory name found on disk
    pub fn from_name(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the timestamp embedded in the id, if well formed
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let raw = self.0.strip_prefix(RUN_ID_PREFIX)?;
        NaiveDateTime::parse_from_str(raw, RUN_ID_TIME_FORMAT).ok()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of one executed test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    #[serde(rename = "PASSED")]
    Passed,
    #[serde(rename = "FAILED")]
    Failed,
}

impl TestStatus {
    /// Spelling used in run_data.json and screenshot filenames
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Passed => "PASSED",
            TestStatus::Failed => "FAILED",
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, TestStatus::Passed)
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One step screenshot taken during a test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepShot {
    /// Human-readable step label as given by the test
    pub label: String,

    /// Screenshot filename inside the run's Screenshots directory
    pub file: String,
}

/// Record of one executed test, as persisted in run_data.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// Test name
    pub name: String,

    /// PASSED or FAILED
    pub status: TestStatus,

    /// Wall-clock completion time, `%Y-%m-%d %H:%M:%S`
    pub timestamp: String,

    /// Elapsed time formatted to two decimals with unit, e.g. `3.14s`
    pub duration: String,

    /// Filename of the end-of-test screenshot, empty when capture failed
    /// or no browser was available
    pub final_screenshot: String,

    /// Up to [`MAX_STEP_SHOTS`] step screenshots in capture order
    pub steps: Vec<StepShot>,
}

/// All known runs keyed by id. BTreeMap keeps iteration (and therefore the
/// embedded dashboard payload) deterministic.
pub type RunMap = BTreeMap<RunId, Vec<TestResult>>;

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Error types for report operations
#[derive(Debug)]
pub enum ReportError {
    /// I/O error while reading or writing report files
    Io(std::io::Error),

    /// JSON serialization or parse error
    Json(serde_json::Error),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Io(err) => write!(f, "I/O error: {}", err),
            ReportError::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Io(err) => Some(err),
            ReportError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::Io(err)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_sorts_by_time() {
        let older = RunId::from_name("run_2024-01-01_10-00-00");
        let newer = RunId::from_name("run_2024-01-02_09-59-59");
        assert!(older < newer);
    }

    #[test]
    fn test_run_id_timestamp_parses() {
        let id = RunId::from_name("run_2024-01-03_10-00-00");
        let ts = id.timestamp().unwrap();
        assert_eq!(ts.format("%A").to_string(), "Wednesday");
        assert_eq!(ts.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-03 10:00:00");
    }

    #[test]
    fn test_run_id_timestamp_rejects_malformed() {
        assert!(RunId::from_name("run_not-a-date").timestamp().is_none());
        assert!(RunId::from_name("nightly").timestamp().is_none());
    }

    #[test]
    fn test_status_json_spelling() {
        assert_eq!(serde_json::to_string(&TestStatus::Passed).unwrap(), "\"PASSED\"");
        assert_eq!(serde_json::to_string(&TestStatus::Failed).unwrap(), "\"FAILED\"");
        let parsed: TestStatus = serde_json::from_str("\"FAILED\"").unwrap();
        assert_eq!(parsed, TestStatus::Failed);
    }

    #[test]
    fn test_result_json_shape() {
        let result = TestResult {
            name: "checkout".to_string(),
            status: TestStatus::Passed,
            timestamp: "2024-01-03 10:00:05".to_string(),
            duration: "1.25s".to_string(),
            final_screenshot: "checkout_PASSED_20240103_100005.png".to_string(),
            steps: vec![StepShot {
                label: "cart opened".to_string(),
                file: "checkout__cart_opened_20240103_100003.png".to_string(),
            }],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "PASSED");
        assert_eq!(json["steps"][0]["label"], "cart opened");
        assert_eq!(json["steps"][0]["file"], "checkout__cart_opened_20240103_100003.png");

        let back: TestResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_run_map_serializes_with_id_keys() {
        let mut runs = RunMap::new();
        runs.insert(RunId::from_name("run_2024-01-01_10-00-00"), Vec::new());
        let json = serde_json::to_string(&runs).unwrap();
        assert_eq!(json, "{\"run_2024-01-01_10-00-00\":[]}");
    }
}
