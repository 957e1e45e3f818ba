//! Session execution.
//!
//! Runs every test of a suite against a fresh browser, feeding the run
//! reporting pipeline: step screenshots during each test, one result record
//! per test, then run_data.json and both dashboards at session end.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::driver::{Browser, DriverResult};
use crate::harness::types::{HarnessResult, SessionSummary, Suite};
use crate::report::dashboard;
use crate::report::recorder::RunReporter;
use crate::report::store;
use crate::report::types::TestStatus;
use crate::session::RunSession;

/// Execute `suite`, one test at a time, each against its own browser.
///
/// A test fails on a flow error, a panic, or when its browser cannot be
/// started; the session itself keeps going. Only an unusable reports tree
/// or an unwritable run_data.json aborts the session.
pub fn run_session<F>(config: &Config, suite: &Suite, new_browser: F) -> HarnessResult<SessionSummary>
where
    F: Fn() -> DriverResult<Box<dyn Browser>>,
{
    let session = RunSession::new(&config.reports.reports_dir).site(&config.site.base_url);
    session.init()?;

    if let Err(e) = session.ensure_assets(Path::new(&config.reports.logo_path)) {
        eprintln!("Warning: could not stage dashboard assets: {}", e);
    }

    println!("Session {} started: {} ({} tests)", session.id, suite.name(), suite.len());

    let mut reporter = RunReporter::new(session);
    let mut summary = SessionSummary::new(reporter.session().id.clone());

    for case in suite.cases() {
        let started = Instant::now();

        let mut browser: Option<Box<dyn Browser>> = match new_browser() {
            Ok(b) => Some(b),
            Err(e) => {
                eprintln!("Warning: browser setup failed for {}: {}", case.name, e);
                None
            }
        };

        let (status, steps) = match browser.as_deref_mut() {
            Some(b) => {
                let mut recorder = reporter.recorder(&case.name);
                let outcome =
                    panic::catch_unwind(AssertUnwindSafe(|| (case.body)(b, &mut recorder)));
                let status = match outcome {
                    Ok(Ok(())) => TestStatus::Passed,
                    Ok(Err(e)) => {
                        eprintln!("Warning: {} failed: {}", case.name, e);
                        TestStatus::Failed
                    }
                    Err(_) => {
                        eprintln!("Warning: {} panicked", case.name);
                        TestStatus::Failed
                    }
                };
                (status, recorder.into_steps())
            }
            None => (TestStatus::Failed, Vec::new()),
        };

        reporter.record_result(&case.name, status, started, browser.as_deref_mut(), steps);
        summary.record(status);
        println!("  {} ... {}", case.name, status);

        if let Some(mut b) = browser {
            if let Err(e) = b.quit() {
                eprintln!("Warning: browser quit failed: {}", e);
            }
        }
    }

    let (session, results) = reporter.into_parts();

    let run_data = store::save_run_data(&session, &results)?;
    println!("Run data written to {}", run_data.display());

    // Assets again in case a test wiped the reports tree
    if let Err(e) = session.ensure_assets(Path::new(&config.reports.logo_path)) {
        eprintln!("Warning: could not stage dashboard assets: {}", e);
    }
    dashboard::write_dashboards(&session, &results, &config.reports.dashboard_title);
    println!(
        "Dashboards written to {} and {}",
        session.dashboard_path().display(),
        session.root_dashboard_path().display()
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DriverSettings, ReportSettings, SiteSettings};
    use crate::driver::{MockBrowser, MockElement};
    use crate::harness::types::check;
    use crate::pages::HomePage;
    use crate::report::types::TestResult;
    use std::fs;

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
                dashboard_title: "QA".to_string(),
                logo_path: "logo.svg".to_string(),
            },
        }
    }

    fn mock_factory() -> impl Fn() -> DriverResult<Box<dyn Browser>> {
        || {
            Ok(Box::new(
                MockBrowser::new().element(MockElement::new(HomePage::body())),
            ) as Box<dyn Browser>)
        }
    }

    fn load_results(config: &Config, summary: &SessionSummary) -> Vec<TestResult> {
        let session = RunSession::with_id(&config.reports.reports_dir, summary.run_id.clone());
        serde_json::from_str(&fs::read_to_string(session.run_data_path()).unwrap()).unwrap()
    }

    #[test]
    fn test_session_records_pass_and_fail_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let suite = Suite::new("smoke")
            .case("passing test", |b, rec| {
                rec.capture(b, "start");
                Ok(())
            })
            .case("failing test", |_, _| check(false, "expected failure"));

        let summary = run_session(&config, &suite, mock_factory()).unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);

        let results = load_results(&config, &summary);
        assert_eq!(results[0].name, "passing test");
        assert_eq!(results[0].status, TestStatus::Passed);
        assert_eq!(results[0].steps.len(), 1);
        assert_eq!(results[1].name, "failing test");
        assert_eq!(results[1].status, TestStatus::Failed);
    }

    #[test]
    fn test_panicking_test_fails_but_session_continues() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let suite = Suite::new("smoke")
            .case("panics", |_, _| panic!("boom"))
            .case("still runs", |_, _| Ok(()));

        let summary = run_session(&config, &suite, mock_factory()).unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.passed, 1);

        let results = load_results(&config, &summary);
        assert_eq!(results[0].status, TestStatus::Failed);
        assert_eq!(results[1].status, TestStatus::Passed);
    }

    #[test]
    fn test_browser_setup_failure_fails_test_without_screenshots() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let suite = Suite::new("smoke").case("never runs", |_, _| Ok(()));
        let broken_factory =
            || Err(crate::driver::DriverError::Session("no chromedriver".to_string()));

        let summary = run_session(&config, &suite, broken_factory).unwrap();

        assert_eq!(summary.failed, 1);
        let results = load_results(&config, &summary);
        assert_eq!(results[0].status, TestStatus::Failed);
        assert_eq!(results[0].final_screenshot, "");
        assert!(results[0].steps.is_empty());
    }

    #[test]
    fn test_session_writes_both_dashboards() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let suite = Suite::new("smoke").case("one", |_, _| Ok(()));

        let summary = run_session(&config, &suite, mock_factory()).unwrap();

        let session = RunSession::with_id(&config.reports.reports_dir, summary.run_id.clone());
        assert!(session.dashboard_path().is_file());
        assert!(session.root_dashboard_path().is_file());

        let root = fs::read_to_string(session.root_dashboard_path()).unwrap();
        assert!(root.contains(summary.run_id.as_str()));
        assert!(root.contains("\"name\":\"one\""));
    }
}
