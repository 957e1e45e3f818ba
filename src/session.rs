//! Run session management for the reports tree.
//!
//! Owns the layout of one test session on disk:
//! - A unique run id and its directory under `<reports>/runs/`
//! - The run's `Screenshots/` directory
//! - Shared dashboard assets under `<reports>/assets/`
//! - Session metadata tracking

use std::fs;
use std::path::{Path, PathBuf};

use crate::report::types::RunId;

/// Subdirectory of the reports root holding one directory per run
pub const RUNS_SUBDIR: &str = "runs";

/// Subdirectory of each run holding its screenshots
pub const SCREENSHOTS_SUBDIR: &str = "Screenshots";

/// Subdirectory of the reports root holding shared dashboard assets
pub const ASSETS_SUBDIR: &str = "assets";

/// Per-run results file
pub const RUN_DATA_FILE: &str = "run_data.json";

/// Dashboard filename, used both per run and at the reports root
pub const DASHBOARD_FILE: &str = "Dashboard.html";

/// Session metadata file inside the run directory; run loaders ignore it
pub const SESSION_META_FILE: &str = ".session.json";

/// One test session's place in the reports tree
#[derive(Debug, Clone)]
pub struct RunSession {
    /// Unique run id, also the run directory name
    pub id: RunId,
    /// Reports root this session writes under
    pub reports_dir: PathBuf,
    /// Site under test, recorded in session metadata (if known)
    pub site: Option<String>,
}

impl RunSession {
    /// Create a session with a fresh wall-clock run id
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            id: RunId::now(),
            reports_dir: reports_dir.into(),
            site: None,
        }
    }

    /// Create a session with a specific id (used when re-rendering old runs)
    pub fn with_id(reports_dir: impl Into<PathBuf>, id: RunId) -> Self {
        Self {
            id,
            reports_dir: reports_dir.into(),
            site: None,
        }
    }

    /// Record the site under test in session metadata
    pub fn site(mut self, url: impl Into<String>) -> Self {
        self.site = Some(url.into());
        self
    }

    /// Directory of this run
    pub fn run_dir(&self) -> PathBuf {
        self.reports_dir.join(RUNS_SUBDIR).join(self.id.as_str())
    }

    /// Screenshots directory of this run
    pub fn screenshots_dir(&self) -> PathBuf {
        self.run_dir().join(SCREENSHOTS_SUBDIR)
    }

    /// Shared assets directory at the reports root
    pub fn assets_dir(&self) -> PathBuf {
        self.reports_dir.join(ASSETS_SUBDIR)
    }

    /// Path of this run's run_data.json
    pub fn run_data_path(&self) -> PathBuf {
        self.run_dir().join(RUN_DATA_FILE)
    }

    /// Path of this run's own dashboard
    pub fn dashboard_path(&self) -> PathBuf {
        self.run_dir().join(DASHBOARD_FILE)
    }

    /// Path of the aggregate dashboard at the reports root
    pub fn root_dashboard_path(&self) -> PathBuf {
        self.reports_dir.join(DASHBOARD_FILE)
    }

    /// Path for a screenshot file inside this run
    pub fn screenshot_path(&self, file_name: &str) -> PathBuf {
        self.screenshots_dir().join(file_name)
    }

    /// Create the directory tree for this run and write session metadata.
    ///
    /// Failure here means there is nowhere to persist results, so callers
    /// treat it as fatal for the whole session.
    pub fn init(&self) -> std::io::Result<()> {
        fs::create_dir_all(self.screenshots_dir())?;
        fs::create_dir_all(self.assets_dir())?;

        let metadata = serde_json::json!({
            "id": self.id.as_str(),
            "created": chrono::Utc::now().to_rfc3339(),
            "host": hostname::get().ok().and_then(|h| h.into_string().ok()),
            "site": self.site,
        });

        let metadata_path = self.run_dir().join(SESSION_META_FILE);
        fs::write(metadata_path, serde_json::to_string_pretty(&metadata)?)?;

        Ok(())
    }

    /// Copy the configured logo into the shared assets directory as both the
    /// logo and the favicon. A missing source file is not an error; the
    /// dashboards render without it.
    pub fn ensure_assets(&self, logo: &Path) -> std::io::Result<()> {
        if !logo.exists() {
            return Ok(());
        }
        let assets = self.assets_dir();
        fs::create_dir_all(&assets)?;
        fs::copy(logo, assets.join("logo.svg"))?;
        fs::copy(logo, assets.join("favicon.svg"))?;
        Ok(())
    }
}

/// Sanitize a label or test name for use in filenames: surrounding
/// whitespace is trimmed, everything outside `[A-Za-z0-9_.-]` becomes `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect()
}

/// List existing run directories under the reports root, newest first
pub fn list_runs(reports_dir: &Path) -> std::io::Result<Vec<RunId>> {
    let runs_dir = reports_dir.join(RUNS_SUBDIR);
    if !runs_dir.exists() {
        return Ok(Vec::new());
    }

    let mut runs = Vec::new();
    for entry in fs::read_dir(&runs_dir)? {
        let entry = entry?;
        if entry.path().is_dir() {
            runs.push(RunId::from_name(entry.file_name().to_string_lossy()));
        }
    }
    runs.sort();
    runs.reverse();
    Ok(runs)
}
