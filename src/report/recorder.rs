//! Screenshot capture and per-test result collection.
//!
//! [`StepRecorder`] takes mid-test screenshots on request and keeps the
//! first [`MAX_STEP_SHOTS`] of them. [`RunReporter`] accumulates one
//! [`TestResult`] per executed test, including the end-of-test screenshot.
//!
//! Capture never fails a test: a screenshot that cannot be taken or written
//! is reported as a warning and dropped.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;

use crate::driver::Browser;
use crate::report::types::{StepShot, TestResult, TestStatus, MAX_STEP_SHOTS};
use crate::session::{sanitize_filename, RunSession};

/// Timestamp layout embedded in screenshot filenames
const SHOT_TIME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Timestamp layout shown for a test's completion time
const RESULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Captures step screenshots for one test.
///
/// Owns its target directory rather than borrowing the session, so tests can
/// hold it mutably alongside the reporter.
#[derive(Debug)]
pub struct StepRecorder {
    shots_dir: PathBuf,
    test_name: String,
    steps: Vec<StepShot>,
}

impl StepRecorder {
    pub fn new(session: &RunSession, test_name: impl Into<String>) -> Self {
        Self {
            shots_dir: session.screenshots_dir(),
            test_name: test_name.into(),
            steps: Vec::new(),
        }
    }

    /// Capture a screenshot for the named step.
    ///
    /// The image is always written when capture succeeds, but only the first
    /// [`MAX_STEP_SHOTS`] captures are recorded in the test's result. An
    /// empty label is recorded as `step`.
    pub fn capture(&mut self, browser: &mut dyn Browser, label: &str) {
        let base = if label.is_empty() { "step" } else { label };
        let label_clean = base.trim().to_string();

        let file = format!(
            "{}__{}_{}.png",
            sanitize_filename(&self.test_name),
            sanitize_filename(&label_clean),
            Local::now().format(SHOT_TIME_FORMAT),
        );

        let png = match browser.capture_png() {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("Warning: step screenshot failed: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(self.shots_dir.join(&file), png) {
            eprintln!("Warning: step screenshot failed: {}", e);
            return;
        }

        if self.steps.len() < MAX_STEP_SHOTS {
            self.steps.push(StepShot {
                label: label_clean,
                file,
            });
        }
    }

    /// Steps recorded so far
    pub fn steps(&self) -> &[StepShot] {
        &self.steps
    }

    /// Consume the recorder, yielding the recorded steps
    pub fn into_steps(self) -> Vec<StepShot> {
        self.steps
    }
}

/// Collects results for all tests of one run
#[derive(Debug)]
pub struct RunReporter {
    session: RunSession,
    results: Vec<TestResult>,
}

impl RunReporter {
    pub fn new(session: RunSession) -> Self {
        Self {
            session,
            results: Vec::new(),
        }
    }

    pub fn session(&self) -> &RunSession {
        &self.session
    }

    /// Start a step recorder for the named test
    pub fn recorder(&self, test_name: &str) -> StepRecorder {
        StepRecorder::new(&self.session, test_name)
    }

    /// Record the outcome of one test.
    ///
    /// Takes the end-of-test screenshot if a browser is still available;
    /// `final_screenshot` stays empty when it is not or when capture fails.
    pub fn record_result(
        &mut self,
        test_name: &str,
        status: TestStatus,
        started: Instant,
        browser: Option<&mut (dyn Browser + '_)>,
        mut steps: Vec<StepShot>,
    ) {
        let timestamp = Local::now().format(RESULT_TIME_FORMAT).to_string();
        let duration = format!("{:.2}s", started.elapsed().as_secs_f64());

        let final_screenshot = match browser {
            Some(b) => {
                let file = format!(
                    "{}_{}_{}.png",
                    sanitize_filename(test_name),
                    status.as_str(),
                    Local::now().format(SHOT_TIME_FORMAT),
                );
                match b.capture_png() {
                    Ok(png) => match fs::write(self.session.screenshot_path(&file), png) {
                        Ok(()) => file,
                        Err(e) => {
                            eprintln!("Warning: final screenshot failed: {}", e);
                            String::new()
                        }
                    },
                    Err(e) => {
                        eprintln!("Warning: final screenshot failed: {}", e);
                        String::new()
                    }
                }
            }
            None => String::new(),
        };

        steps.truncate(MAX_STEP_SHOTS);
        self.results.push(TestResult {
            name: test_name.to_string(),
            status,
            timestamp,
            duration,
            final_screenshot,
            steps,
        });
    }

    /// Results recorded so far, in execution order
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Consume the reporter, yielding the session and its results
    pub fn into_parts(self) -> (RunSession, Vec<TestResult>) {
        (self.session, self.results)
    }
}
