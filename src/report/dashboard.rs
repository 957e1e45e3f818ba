//! Dashboard rendering.
//!
//! Renders a self-contained HTML document with inline style and script: the
//! full run map is embedded as JSON and all interaction (run switching,
//! pass/fail filters, image lightbox) happens client-side with no server.
//!
//! Rendering is a pure function of the run map; file placement and the
//! per-run vs aggregate split live in [`write_dashboards`].

use std::fs;
use std::path::Path;

use crate::report::store;
use crate::report::types::{ReportResult, RunId, RunMap, TestResult};
use crate::session::RunSession;

/// Where a dashboard document lives, which decides how it reaches its
/// screenshots and assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardMode {
    /// Aggregate document at the reports root, covering every run
    Root,
    /// Single-run document inside the run's own directory
    PerRun,
}

impl DashboardMode {
    fn logo_path(&self) -> &'static str {
        match self {
            DashboardMode::Root => "assets/logo.svg",
            DashboardMode::PerRun => "../../assets/logo.svg",
        }
    }

    fn favicon_path(&self) -> &'static str {
        match self {
            DashboardMode::Root => "assets/favicon.svg",
            DashboardMode::PerRun => "../../assets/favicon.svg",
        }
    }

    /// Screenshot src pattern; `{runId}` and `{file}` are filled in by the
    /// dashboard's own script
    fn screenshots_prefix(&self) -> &'static str {
        match self {
            DashboardMode::Root => "runs/{runId}/Screenshots/{file}",
            DashboardMode::PerRun => "Screenshots/{file}",
        }
    }
}

/// Human-readable label for the run selector.
///
/// Falls back to the raw run id when its timestamp does not parse, so runs
/// restored from oddly named directories still show up.
pub fn format_run_label(id: &RunId, tests: &[TestResult]) -> String {
    let (day_name, ts) = match id.timestamp() {
        Some(dt) => (
            dt.format("%A").to_string(),
            dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        ),
        None => (String::new(), id.as_str().to_string()),
    };

    let total = tests.len();
    let passed = tests.iter().filter(|t| t.status.is_passed()).count();
    let failed = tests.iter().filter(|t| !t.status.is_passed()).count();
    // every test runs the desktop profile
    let desktop = total;

    format!(
        "{} {} | {} tests | ✅ {} | ❌ {} | 💻 {}",
        day_name, ts, total, passed, failed, desktop
    )
}

/// Minimal HTML escaping for text interpolated into the document
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render one dashboard document from the given run map.
///
/// `selected` is pre-selected in the run selector when present in the map.
pub fn render_dashboard(
    runs: &RunMap,
    selected: &RunId,
    mode: DashboardMode,
    title: &str,
) -> ReportResult<String> {
    let mut options = Vec::new();
    for (id, tests) in runs.iter().rev() {
        let selected_attr = if id == selected { "selected" } else { "" };
        options.push(format!(
            "<option value=\"{}\" {}>{}</option>",
            html_escape(id.as_str()),
            selected_attr,
            html_escape(&format_run_label(id, tests)),
        ));
    }
    let options = options.join("\n");

    let run_data_json = serde_json::to_string(runs)?;

    // Run data last: it carries arbitrary test names
    Ok(DASHBOARD_TEMPLATE
        .replace("__TITLE__", &html_escape(title))
        .replace("__FAVICON_PATH__", mode.favicon_path())
        .replace("__LOGO_PATH__", mode.logo_path())
        .replace("__SCREENSHOTS_PREFIX__", mode.screenshots_prefix())
        .replace("__OPTIONS__", &options)
        .replace("__RUN_DATA__", &run_data_json))
}

/// Write both session-end dashboards: the per-run document covering only
/// this run, then the aggregate document covering every persisted run plus
/// this one.
///
/// Dashboard generation never fails the session; render or write errors are
/// reported as warnings.
pub fn write_dashboards(session: &RunSession, results: &[TestResult], title: &str) {
    let mut current = RunMap::new();
    current.insert(session.id.clone(), results.to_vec());
    write_one(
        &session.dashboard_path(),
        &current,
        &session.id,
        DashboardMode::PerRun,
        title,
    );

    let mut all = store::load_all_runs(&session.reports_dir);
    all.insert(session.id.clone(), results.to_vec());
    write_one(
        &session.root_dashboard_path(),
        &all,
        &session.id,
        DashboardMode::Root,
        title,
    );
}

fn write_one(path: &Path, runs: &RunMap, selected: &RunId, mode: DashboardMode, title: &str) {
    let html = match render_dashboard(runs, selected, mode, title) {
        Ok(html) => html,
        Err(e) => {
            eprintln!("Warning: dashboard render failed: {}", e);
            return;
        }
    };
    if let Err(e) = fs::write(path, html) {
        eprintln!("Warning: failed to write {}: {}", path.display(), e);
    }
}

const DASHBOARD_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1"/>
  <title>__TITLE__</title>
  <link rel="icon" type="image/svg+xml" href="__FAVICON_PATH__">
  <style>
    body {
      font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
      background-color: #f9f9f9;
      margin: 20px;
      color: #333;
    }
    .dashboard-header {
      display: flex;
      align-items: center;
      justify-content: space-between;
      margin-bottom: 10px;
      gap: 24px;
    }
    .dashboard-header h1 {
      margin: 0;
      font-size: 1.8em;
      display: flex;
      align-items: center;
      white-space: nowrap;
    }
    .dashboard-header h1::before {
      content: '🧪';
      margin-right: 10px;
    }
    .header-logo {
      height: 60px;
      max-width: 240px;
      object-fit: contain;
      border-radius: 8px;
      background: #fff;
      padding: 6px 12px;
      box-shadow: 0 2px 8px rgba(0,0,0,0.04);
    }
    @media (max-width: 700px) {
      .dashboard-header {
        flex-direction: column;
        align-items: flex-start;
        gap: 8px;
      }
      .header-logo {
        margin-left: 0;
        margin-top: 6px;
        height: 44px;
        max-width: 180px;
      }
    }

    select {
      font-size: 14px;
      padding: 5px;
      margin-left: 10px;
    }

    .test-entry {
      background: #fff;
      border-radius: 6px;
      padding: 15px;
      margin-bottom: 20px;
      box-shadow: 0 1px 4px rgba(0,0,0,0.1);
      transition: background 0.2s ease;
    }
    .test-entry:hover {
      background: #f0f8ff;
    }

    .meta-line {
      margin: 6px 0 0 0;
      font-size: 14px;
    }

    /* 4-step grid */
    .steps-grid {
      display: grid;
      grid-template-columns: repeat(4, minmax(140px, 1fr));
      gap: 14px;
      margin-top: 12px;
      align-items: start;
    }
    @media (max-width: 1000px) {
      .steps-grid {
        grid-template-columns: repeat(2, minmax(140px, 1fr));
      }
    }
    @media (max-width: 520px) {
      .steps-grid {
        grid-template-columns: 1fr;
      }
    }

    .step-card {
      display: flex;
      flex-direction: column;
      gap: 6px;
    }
    .step-title {
      font-weight: 700;
      font-size: 13px;
      color: #222;
    }
    .step-card img {
      width: 100%;
      height: auto;
      max-height: 190px;
      object-fit: contain;
      border-radius: 6px;
      border: 1px solid #ccc;
      background: #fff;
      cursor: pointer;
    }

    /* Modal */
    .modal {
      display: none;
      position: fixed;
      z-index: 999;
      left: 0; top: 0; width: 100%; height: 100%;
      background-color: rgba(0,0,0,0.85);
    }
    .modal-content {
      margin: 5% auto;
      display: block;
      max-width: 92vw;
      max-height: 84vh;
    }
    .close {
      position: absolute;
      top: 15px;
      right: 35px;
      color: #fff;
      font-size: 40px;
      font-weight: bold;
      cursor: pointer;
    }

    /* Back-to-top button */
    #backToTop {
      position: fixed;
      bottom: 18px;
      right: 18px;
      width: 46px;
      height: 46px;
      border-radius: 999px;
      border: none;
      background: #111827;
      color: white;
      font-size: 22px;
      cursor: pointer;
      display: none;
      box-shadow: 0 8px 20px rgba(0,0,0,0.22);
    }
    #backToTop:hover {
      background: #0b1220;
    }
  </style>

  <script>
    const runData = __RUN_DATA__;
    const screenshotsPrefix = `__SCREENSHOTS_PREFIX__`;

    function openModal(src) {
      const modal = document.getElementById("screenshotModal");
      const modalImg = document.getElementById("modalImage");
      modal.style.display = "block";
      modalImg.src = src;
    }

    function closeModal() {
      document.getElementById("screenshotModal").style.display = "none";
    }

    function imgSrc(runId, file) {
      return screenshotsPrefix
        .replace("{runId}", runId)
        .replace("{file}", file);
    }

    function populateRun(runId) {
      const container = document.getElementById("results");
      container.innerHTML = "";

      const showPassed = document.getElementById("filterPassed").checked;
      const showFailed = document.getElementById("filterFailed").checked;

      const data = runData[runId] || [];
      data.forEach(test => {
        if ((test.status === "PASSED" && !showPassed) || (test.status === "FAILED" && !showFailed)) return;

        const div = document.createElement("div");
        div.classList.add("test-entry");

        const color = test.status === "PASSED" ? "green" : "red";

        const steps = Array.isArray(test.steps) ? test.steps.slice(0, 4) : [];
        const hasSteps = steps.length > 0;

        let gridHtml = "";

        if (hasSteps) {
          const cards = steps.map(s => {
            const src = imgSrc(runId, s.file);
            return `
              <div class="step-card">
                <div class="step-title">${s.label}</div>
                <img src="${src}" onclick="openModal(this.src)" />
              </div>
            `;
          }).join("");

          gridHtml = `<div class="steps-grid">${cards}</div>`;
        } else {
          if (test.final_screenshot) {
            const src = imgSrc(runId, test.final_screenshot);
            gridHtml = `
              <div class="steps-grid" style="grid-template-columns: minmax(200px, 340px);">
                <div class="step-card">
                  <div class="step-title">final_screenshot</div>
                  <img src="${src}" onclick="openModal(this.src)" />
                </div>
              </div>
            `;
          }
        }

        div.innerHTML = `
          <h3>${test.name} — <span style="color:${color}">${test.status}</span></h3>
          <p class="meta-line"><strong>Timestamp:</strong> ${test.timestamp} | <strong>Duration:</strong> ${test.duration}</p>
          ${gridHtml}
          <hr>
        `;

        container.appendChild(div);
      });
    }

    window.addEventListener("scroll", () => {
      const btn = document.getElementById("backToTop");
      btn.style.display = (window.scrollY > 450) ? "block" : "none";
    });

    function backToTop() {
      window.scrollTo({ top: 0, behavior: "smooth" });
    }
  </script>
</head>

<body onload="populateRun(document.getElementById('runSelect').value)">
  <div class="dashboard-header">
    <h1>__TITLE__</h1>
    <img src="__LOGO_PATH__" alt="Logo" class="header-logo" />
  </div>

  <label>Choose Run:
    <select id="runSelect" onchange="populateRun(this.value)">
      __OPTIONS__
    </select>
  </label>

  <div style="margin-top: 10px;">
    <label><input type="checkbox" id="filterPassed" checked onchange="populateRun(document.getElementById('runSelect').value)"> Show Passed</label>
    <label><input type="checkbox" id="filterFailed" checked onchange="populateRun(document.getElementById('runSelect').value)"> Show Failed</label>
  </div>

  <div id="results" style="margin-top: 20px;"></div>

  <button id="backToTop" onclick="backToTop()" title="Back to top">↑</button>

  <div id="screenshotModal" class="modal" onclick="closeModal()">
    <span class="close">&times;</span>
    <img class="modal-content" id="modalImage">
  </div>
</body>
</html>
"##;
