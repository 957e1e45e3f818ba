//! Persistence of run results under the reports tree.
//!
//! Each run saves its results as a JSON array in its own `run_data.json`;
//! the run id lives in the directory name, not in the file. The aggregate
//! view is rebuilt on demand by scanning every run directory; loading is
//! tolerant so one corrupt run never hides the rest.

use std::fs;
use std::path::{Path, PathBuf};

use crate::report::types::{ReportResult, RunId, RunMap, TestResult};
use crate::session::{RunSession, RUNS_SUBDIR, RUN_DATA_FILE};

/// Write the session's results to its run_data.json, pretty-printed
pub fn save_run_data(session: &RunSession, results: &[TestResult]) -> ReportResult<PathBuf> {
    let path = session.run_data_path();
    fs::write(&path, serde_json::to_string_pretty(&results)?)?;
    Ok(path)
}

/// Load every run's results found under the reports tree, keyed by the run
/// directory's name.
///
/// Run directories without a run_data.json are skipped silently; unreadable
/// or corrupt files are skipped with a warning. Never fails: in the worst
/// case the map is empty.
pub fn load_all_runs(reports_dir: &Path) -> RunMap {
    let mut all = RunMap::new();

    let runs_dir = reports_dir.join(RUNS_SUBDIR);
    let entries = match fs::read_dir(&runs_dir) {
        Ok(entries) => entries,
        Err(_) => return all,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let data_path = path.join(RUN_DATA_FILE);
        if !data_path.exists() {
            continue;
        }

        let raw = match fs::read_to_string(&data_path) {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("Warning: skipping unreadable {}: {}", data_path.display(), e);
                continue;
            }
        };
        match serde_json::from_str::<Vec<TestResult>>(&raw) {
            Ok(results) => {
                all.insert(RunId::from_name(entry.file_name().to_string_lossy()), results);
            }
            Err(e) => {
                eprintln!("Warning: skipping corrupt {}: {}", data_path.display(), e);
            }
        }
    }

    all
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::report::types::{StepShot, TestStatus};

    fn result(name: &str, status: TestStatus) -> TestResult {
        TestResult {
            name: name.to_string(),
            status,
            timestamp: "2024-01-03 10:00:05".to_string(),
            duration: "1.00s".to_string(),
            final_screenshot: String::new(),
            steps: vec![StepShot {
                label: "opened".to_string(),
                file: "t__opened_20240103_100002.png".to_string(),
            }],
        }
    }

    fn saved_session(root: &Path, id: &str, results: &[TestResult]) -> RunSession {
        let session = RunSession::with_id(root, RunId::from_name(id));
        session.init().unwrap();
        save_run_data(&session, results).unwrap();
        session
    }

    #[test]
    fn test_save_writes_pretty_json_array() {
        let tmp = tempfile::tempdir().unwrap();
        let session = saved_session(
            tmp.path(),
            "run_2024-01-03_10-00-00",
            &[result("checkout", TestStatus::Passed)],
        );

        let raw = fs::read_to_string(session.run_data_path()).unwrap();
        assert!(raw.starts_with('['));
        assert!(raw.contains("\"status\": \"PASSED\""));

        let parsed: Vec<TestResult> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "checkout");
    }

    #[test]
    fn test_load_all_runs_keys_by_directory_name() {
        let tmp = tempfile::tempdir().unwrap();
        saved_session(
            tmp.path(),
            "run_2024-01-01_10-00-00",
            &[result("a", TestStatus::Passed)],
        );
        saved_session(
            tmp.path(),
            "run_2024-01-02_10-00-00",
            &[result("b", TestStatus::Failed), result("c", TestStatus::Passed)],
        );

        let all = load_all_runs(tmp.path());
        assert_eq!(all.len(), 2);
        assert_eq!(all[&RunId::from_name("run_2024-01-01_10-00-00")].len(), 1);
        assert_eq!(all[&RunId::from_name("run_2024-01-02_10-00-00")][0].name, "b");
    }

    #[test]
    fn test_round_trip_preserves_results() {
        let tmp = tempfile::tempdir().unwrap();
        let results = vec![result("a", TestStatus::Passed), result("b", TestStatus::Failed)];
        let session = saved_session(tmp.path(), "run_2024-01-01_10-00-00", &results);

        let all = load_all_runs(tmp.path());
        assert_eq!(all[&session.id], results);
    }

    #[test]
    fn test_load_all_runs_skips_dir_without_data() {
        let tmp = tempfile::tempdir().unwrap();
        saved_session(tmp.path(), "run_2024-01-01_10-00-00", &[]);
        fs::create_dir_all(tmp.path().join(RUNS_SUBDIR).join("run_2024-01-02_10-00-00")).unwrap();

        let all = load_all_runs(tmp.path());
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_load_all_runs_skips_corrupt_data() {
        let tmp = tempfile::tempdir().unwrap();
        saved_session(
            tmp.path(),
            "run_2024-01-01_10-00-00",
            &[result("a", TestStatus::Passed)],
        );
        let bad_dir = tmp.path().join(RUNS_SUBDIR).join("run_2024-01-02_10-00-00");
        fs::create_dir_all(&bad_dir).unwrap();
        fs::write(bad_dir.join(RUN_DATA_FILE), "{not json").unwrap();

        let all = load_all_runs(tmp.path());
        assert_eq!(all.len(), 1);
        assert!(all.contains_key(&RunId::from_name("run_2024-01-01_10-00-00")));
    }

    #[test]
    fn test_load_all_runs_without_reports_tree() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(load_all_runs(&tmp.path().join("nope")).is_empty());
    }
}
