//! Configuration management with environment variable support.
//!
//! This module provides centralized configuration for shopflow, supporting:
//! - Environment variables for all configurable values
//! - Sensible defaults for running against a local chromedriver
//! - Plain structs usable directly by tests without touching the environment
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SHOPFLOW_BASE_URL` | Storefront base URL | `https://shop.example.com` |
//! | `SHOPFLOW_BASIC_AUTH_USER` | HTTP basic auth user (staging) | unset |
//! | `SHOPFLOW_BASIC_AUTH_PASSWORD` | HTTP basic auth password | unset |
//! | `SHOPFLOW_WEBDRIVER_URL` | WebDriver endpoint URL | `http://127.0.0.1:9515` |
//! | `SHOPFLOW_HEADLESS` | Run the browser headless | `true` |
//! | `SHOPFLOW_TIMEOUT` | Element wait timeout in seconds | `10` |
//! | `SHOPFLOW_WINDOW_SIZE` | Browser window size | `1440x900` |
//! | `SHOPFLOW_REPORTS_DIR` | Reports root directory | `reports` |
//! | `SHOPFLOW_DASHBOARD_TITLE` | Title shown on dashboards | `Shopflow QA Dashboard` |
//! | `SHOPFLOW_LOGO` | Logo file copied into dashboard assets | `logo.svg` |
//!
//! # Example
//!
//! ```bash
//! # Point the suite at a staging environment behind basic auth
//! export SHOPFLOW_BASE_URL="https://staging.shop.example.com"
//! export SHOPFLOW_BASIC_AUTH_USER="qa"
//! export SHOPFLOW_BASIC_AUTH_PASSWORD="secret"
//! ```

use std::env;
use std::sync::OnceLock;

// ============================================================================
// Default Values
// ============================================================================

/// Default storefront base URL
pub const DEFAULT_BASE_URL: &str = "https://shop.example.com";

/// Default WebDriver endpoint (chromedriver's default port)
pub const DEFAULT_WEBDRIVER_URL: &str = "http://127.0.0.1:9515";

/// Default headless setting
pub const DEFAULT_HEADLESS: bool = true;

/// Default element wait timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default browser window size
pub const DEFAULT_WINDOW_SIZE: &str = "1440x900";

/// Default browser window width (pixels)
pub const DEFAULT_WINDOW_WIDTH: u32 = 1440;

/// Default browser window height (pixels)
pub const DEFAULT_WINDOW_HEIGHT: u32 = 900;

/// Default reports root directory
pub const DEFAULT_REPORTS_DIR: &str = "reports";

/// Default dashboard title
pub const DEFAULT_DASHBOARD_TITLE: &str = "Shopflow QA Dashboard";

/// Default logo file, looked up relative to the working directory
pub const DEFAULT_LOGO_PATH: &str = "logo.svg";

// ============================================================================
// Environment Variable Names
// ============================================================================

/// Environment variable for the storefront base URL
pub const ENV_BASE_URL: &str = "SHOPFLOW_BASE_URL";

/// Environment variable for the basic auth user
pub const ENV_BASIC_AUTH_USER: &str = "SHOPFLOW_BASIC_AUTH_USER";

/// Environment variable for the basic auth password
pub const ENV_BASIC_AUTH_PASSWORD: &str = "SHOPFLOW_BASIC_AUTH_PASSWORD";

/// Environment variable for the WebDriver endpoint
pub const ENV_WEBDRIVER_URL: &str = "SHOPFLOW_WEBDRIVER_URL";

/// Environment variable for headless mode
pub const ENV_HEADLESS: &str = "SHOPFLOW_HEADLESS";

/// Environment variable for the element wait timeout
pub const ENV_TIMEOUT: &str = "SHOPFLOW_TIMEOUT";

/// Environment variable for the browser window size
pub const ENV_WINDOW_SIZE: &str = "SHOPFLOW_WINDOW_SIZE";

/// Environment variable for the reports directory
pub const ENV_REPORTS_DIR: &str = "SHOPFLOW_REPORTS_DIR";

/// Environment variable for the dashboard title
pub const ENV_DASHBOARD_TITLE: &str = "SHOPFLOW_DASHBOARD_TITLE";

/// Environment variable for the logo path
pub const ENV_LOGO: &str = "SHOPFLOW_LOGO";

// ============================================================================
// Configuration Getters (with caching)
// ============================================================================

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration (initialized from environment on first access)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Centralized configuration for shopflow
#[derive(Debug, Clone)]
pub struct Config {
    /// Site under test
    pub site: SiteSettings,
    /// Browser driver configuration
    pub driver: DriverSettings,
    /// Report output configuration
    pub reports: ReportSettings,
}

/// Settings describing the site under test
#[derive(Debug, Clone)]
pub struct SiteSettings {
    /// Storefront base URL
    pub base_url: String,
    /// HTTP basic auth user, when the environment sits behind one
    pub basic_auth_user: Option<String>,
    /// HTTP basic auth password
    pub basic_auth_password: Option<String>,
}

/// Settings for the browser driver
#[derive(Debug, Clone)]
pub struct DriverSettings {
    /// WebDriver endpoint URL
    pub webdriver_url: String,
    /// Whether to run the browser headless
    pub headless: bool,
    /// Element wait timeout (seconds)
    pub timeout_secs: u64,
    /// Browser window width (pixels)
    pub window_width: u32,
    /// Browser window height (pixels)
    pub window_height: u32,
}

/// Settings for report output
#[derive(Debug, Clone)]
pub struct ReportSettings {
    /// Reports root directory
    pub reports_dir: String,
    /// Title shown on dashboards
    pub dashboard_title: String,
    /// Logo file copied into dashboard assets
    pub logo_path: String,
}

impl Config {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            site: SiteSettings::from_env(),
            driver: DriverSettings::from_env(),
            reports: ReportSettings::from_env(),
        }
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self {
            site: SiteSettings::defaults(),
            driver: DriverSettings::defaults(),
            reports: ReportSettings::defaults(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl SiteSettings {
    /// Create site settings from environment variables
    pub fn from_env() -> Self {
        Self {
            base_url: env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            basic_auth_user: env::var(ENV_BASIC_AUTH_USER).ok(),
            basic_auth_password: env::var(ENV_BASIC_AUTH_PASSWORD).ok(),
        }
    }

    /// Create site settings with defaults
    pub fn defaults() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            basic_auth_user: None,
            basic_auth_password: None,
        }
    }

    /// Basic auth credentials, present only when both halves are set
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        match (&self.basic_auth_user, &self.basic_auth_password) {
            (Some(user), Some(password)) => Some((user.as_str(), password.as_str())),
            _ => None,
        }
    }
}

impl DriverSettings {
    /// Create driver settings from environment variables
    pub fn from_env() -> Self {
        let size = env::var(ENV_WINDOW_SIZE).unwrap_or_else(|_| DEFAULT_WINDOW_SIZE.to_string());
        let (width, height) =
            parse_window_size(&size).unwrap_or((DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT));

        Self {
            webdriver_url: env::var(ENV_WEBDRIVER_URL)
                .unwrap_or_else(|_| DEFAULT_WEBDRIVER_URL.to_string()),
            headless: env::var(ENV_HEADLESS)
                .map(|s| parse_bool(&s))
                .unwrap_or(DEFAULT_HEADLESS),
            timeout_secs: env::var(ENV_TIMEOUT)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            window_width: width,
            window_height: height,
        }
    }

    /// Create driver settings with defaults
    pub fn defaults() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: DEFAULT_HEADLESS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

impl ReportSettings {
    /// Create report settings from environment variables
    pub fn from_env() -> Self {
        Self {
            reports_dir: env::var(ENV_REPORTS_DIR)
                .unwrap_or_else(|_| DEFAULT_REPORTS_DIR.to_string()),
            dashboard_title: env::var(ENV_DASHBOARD_TITLE)
                .unwrap_or_else(|_| DEFAULT_DASHBOARD_TITLE.to_string()),
            logo_path: env::var(ENV_LOGO).unwrap_or_else(|_| DEFAULT_LOGO_PATH.to_string()),
        }
    }

    /// Create report settings with defaults
    pub fn defaults() -> Self {
        Self {
            reports_dir: DEFAULT_REPORTS_DIR.to_string(),
            dashboard_title: DEFAULT_DASHBOARD_TITLE.to_string(),
            logo_path: DEFAULT_LOGO_PATH.to_string(),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse a window size string into (width, height).
/// Supports: "desktop" (1920x1080), "laptop" (1366x768), "tablet" (768x1024),
/// "mobile" (375x667), or "WxH"
pub fn parse_window_size(size: &str) -> Option<(u32, u32)> {
    match size.to_lowercase().as_str() {
        "desktop" => Some((1920, 1080)),
        "laptop" => Some((1366, 768)),
        "tablet" => Some((768, 1024)),
        "mobile" => Some((375, 667)),
        custom => {
            let parts: Vec<&str> = custom.split('x').collect();
            if parts.len() == 2 {
                let w = parts[0].parse().ok()?;
                let h = parts[1].parse().ok()?;
                Some((w, h))
            } else {
                None
            }
        }
    }
}

fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Get the storefront base URL (convenience function)
pub fn base_url() -> String {
    get().site.base_url.clone()
}

/// Get the element wait timeout in seconds (convenience function)
pub fn timeout_secs() -> u64 {
    get().driver.timeout_secs
}

/// Get the reports root directory (convenience function)
pub fn reports_dir() -> String {
    get().reports.reports_dir.clone()
}

/// Get the dashboard title (convenience function)
pub fn dashboard_title() -> String {
    get().reports.dashboard_title.clone()
}
