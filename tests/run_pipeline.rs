//! Integration tests for the run reporting pipeline.

use std::fs;
use std::path::Path;

use shopflow::config::{Config, DriverSettings, ReportSettings, SiteSettings};
use shopflow::driver::{Browser, DriverResult, MockBrowser, MockElement};
use shopflow::harness::{check, run_session, Suite};
use shopflow::pages::HomePage;
use shopflow::report::{load_all_runs, save_run_data, RunId, TestResult, TestStatus};
use shopflow::session::{RunSession, RUNS_SUBDIR};

fn test_config(reports_dir: &Path) -> Config {
    Config {
        site: SiteSettings {
            base_url: "mock://shop".to_string(),
            basic_auth_user: None,
            basic_auth_password: None,
        },
        driver: DriverSettings::defaults(),
        reports: ReportSettings {
            reports_dir: reports_dir.to_string_lossy().into_owned(),
            dashboard_title: "Pipeline QA".to_string(),
            logo_path: reports_dir.join("logo.svg").to_string_lossy().into_owned(),
        },
    }
}

fn storefront_factory() -> impl Fn() -> DriverResult<Box<dyn Browser>> {
    || {
        Ok(
            Box::new(MockBrowser::new().element(MockElement::new(HomePage::body())))
                as Box<dyn Browser>,
        )
    }
}

fn pipeline_suite() -> Suite {
    Suite::new("pipeline")
        .case("balance check", |b, rec| {
            rec.capture(b, "modal open");
            rec.capture(b, "coupon entered");
            Ok(())
        })
        .case("greedy capture", |b, rec| {
            for label in ["one", "two", "three", "four", "five"] {
                rec.capture(b, label);
            }
            check(false, "deliberate failure")
        })
        .case("no steps", |_, _| Ok(()))
}

fn seed_historical_run(reports_dir: &Path, id: &str, test_name: &str) {
    let session = RunSession::with_id(reports_dir, RunId::from_name(id));
    session.init().expect("Failed to init historical run");
    let result = TestResult {
        name: test_name.to_string(),
        status: TestStatus::Passed,
        timestamp: "2024-01-01 10:00:05".to_string(),
        duration: "1.00s".to_string(),
        final_screenshot: String::new(),
        steps: Vec::new(),
    };
    save_run_data(&session, &[result]).expect("Failed to seed historical run data");
}

#[test]
fn test_full_session_persists_results_in_order() {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(tmp.path());

    let summary = run_session(&config, &pipeline_suite(), storefront_factory())
        .expect("Session should complete");

    assert_eq!(summary.total, 3);
    assert_eq!(summary.passed, 2);
    assert_eq!(summary.failed, 1);
    assert!(!summary.all_passed());

    let session = RunSession::with_id(tmp.path(), summary.run_id.clone());
    let raw = fs::read_to_string(session.run_data_path()).expect("run_data.json not written");
    assert!(raw.starts_with('['), "run_data.json should be a JSON array");

    let results: Vec<TestResult> = serde_json::from_str(&raw).expect("run_data.json should parse");
    assert_eq!(results.len(), 3);

    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["balance check", "greedy capture", "no steps"]);
    assert_eq!(results[0].status, TestStatus::Passed);
    assert_eq!(results[1].status, TestStatus::Failed);
    assert_eq!(results[2].status, TestStatus::Passed);

    // Step cap: the fifth capture is written but not recorded
    let labels: Vec<&str> = results[1].steps.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["one", "two", "three", "four"]);
    let greedy_shots = fs::read_dir(session.screenshots_dir())
        .expect("Screenshots dir missing")
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .starts_with("greedy_capture__")
        })
        .count();
    assert_eq!(greedy_shots, 5);

    // Every referenced screenshot exists in the run's Screenshots directory
    for result in &results {
        for step in &result.steps {
            assert!(
                session.screenshot_path(&step.file).is_file(),
                "missing step screenshot {}",
                step.file
            );
        }
        assert!(!result.final_screenshot.is_empty());
        assert!(session.screenshot_path(&result.final_screenshot).is_file());
    }
    assert!(results[1].final_screenshot.starts_with("greedy_capture_FAILED_"));
    assert!(results[2].final_screenshot.starts_with("no_steps_PASSED_"));
}

#[test]
fn test_dashboards_cover_current_and_historical_runs() {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(tmp.path());

    seed_historical_run(tmp.path(), "run_2024-01-01_10-00-00", "historical purchase");
    // A run directory without run_data.json must not break the aggregate
    fs::create_dir_all(tmp.path().join(RUNS_SUBDIR).join("run_2024-01-02_10-00-00"))
        .expect("Failed to create bare run dir");

    let summary = run_session(&config, &pipeline_suite(), storefront_factory())
        .expect("Session should complete");
    let session = RunSession::with_id(tmp.path(), summary.run_id.clone());

    let per_run = fs::read_to_string(session.dashboard_path()).expect("per-run dashboard missing");
    assert!(per_run.contains(summary.run_id.as_str()));
    assert!(!per_run.contains("run_2024-01-01_10-00-00"));
    assert!(per_run.contains("const screenshotsPrefix = `Screenshots/{file}`;"));

    let root = fs::read_to_string(session.root_dashboard_path()).expect("root dashboard missing");
    assert!(root.contains(summary.run_id.as_str()));
    assert!(root.contains("run_2024-01-01_10-00-00"));
    assert!(root.contains("historical purchase"));
    assert!(!root.contains("run_2024-01-02_10-00-00"));
    assert!(root.contains("const screenshotsPrefix = `runs/{runId}/Screenshots/{file}`;"));

    // Newest run comes first in the selector and is pre-selected
    let current = root
        .find(&format!("value=\"{}\"", summary.run_id))
        .expect("current run missing from selector");
    let historical = root
        .find("value=\"run_2024-01-01_10-00-00\"")
        .expect("historical run missing from selector");
    assert!(current < historical);
    assert!(root.contains(&format!("value=\"{}\" selected>", summary.run_id)));

    let all = load_all_runs(tmp.path());
    assert_eq!(all.len(), 2);
}

#[test]
fn test_reloaded_run_equals_saved_results() {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(tmp.path());

    let summary = run_session(&config, &pipeline_suite(), storefront_factory())
        .expect("Session should complete");
    let session = RunSession::with_id(tmp.path(), summary.run_id.clone());

    let saved: Vec<TestResult> =
        serde_json::from_str(&fs::read_to_string(session.run_data_path()).unwrap()).unwrap();
    let reloaded = load_all_runs(tmp.path());
    assert_eq!(reloaded[&summary.run_id], saved);
}

#[test]
fn test_assets_staged_when_logo_exists() {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(tmp.path());
    fs::write(tmp.path().join("logo.svg"), "<svg>brand</svg>").expect("Failed to write logo");

    let _ = run_session(&config, &pipeline_suite(), storefront_factory())
        .expect("Session should complete");

    let assets = tmp.path().join("assets");
    assert_eq!(
        fs::read_to_string(assets.join("logo.svg")).expect("logo not staged"),
        "<svg>brand</svg>"
    );
    assert!(assets.join("favicon.svg").is_file());
}
