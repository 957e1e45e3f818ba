//! W3C WebDriver wire client.
//!
//! Talks to a chromedriver-style endpoint over HTTP. Requests go through the
//! [`WireTransport`] trait; the default transport shells out to `curl`, and
//! tests substitute an in-memory fake so no endpoint is needed.

use base64::Engine;
use std::process::Command;
use std::thread;
use std::time::{Duration, Instant};

use super::browser::{Browser, ElementHandle};
use super::types::{DriverError, DriverResult, Locator, WaitKind};
use crate::config::DriverSettings;

/// W3C element identifier key in wire responses
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Interval between element-wait poll attempts
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Script behind [`Browser::set_value`]: set the value directly and fire the
/// events frameworks listen on, for inputs that swallow synthetic keystrokes
const SET_VALUE_SCRIPT: &str = "\
    const el = arguments[0];\n\
    const val = arguments[1];\n\
    el.focus();\n\
    el.value = val;\n\
    el.dispatchEvent(new Event('input', { bubbles: true }));\n\
    el.dispatchEvent(new Event('change', { bubbles: true }));";

/// HTTP transport for wire-protocol requests
pub trait WireTransport {
    /// Execute one request and return the raw response body
    fn request(
        &mut self,
        method: &str,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> DriverResult<String>;
}

/// Transport that shells out to `curl`
#[derive(Debug, Clone)]
pub struct CurlTransport {
    /// Connection timeout passed to curl (seconds)
    pub connect_timeout: u64,
}

impl CurlTransport {
    pub fn new() -> Self {
        Self { connect_timeout: 10 }
    }
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl WireTransport for CurlTransport {
    fn request(
        &mut self,
        method: &str,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> DriverResult<String> {
        let mut cmd = Command::new("curl");
        cmd.args([
            "-s",
            "-X", method,
            url,
            "-H", "Content-Type: application/json",
            "--connect-timeout", &self.connect_timeout.to_string(),
        ]);

        let body_json;
        if let Some(body) = body {
            body_json =
                serde_json::to_string(body).map_err(|e| DriverError::Wire(e.to_string()))?;
            cmd.args(["-d", &body_json]);
        }

        let output = cmd.output()?;
        if !output.status.success() {
            return Err(DriverError::Wire(format!(
                "curl failed for {} {}: {}",
                method,
                url,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Browser driven over the W3C WebDriver wire protocol
pub struct WebDriverBrowser {
    endpoint: String,
    session_id: Option<String>,
    timeout: Duration,
    transport: Box<dyn WireTransport>,
}

impl WebDriverBrowser {
    /// Start a browser session against the configured WebDriver endpoint
    pub fn start(settings: &DriverSettings) -> DriverResult<Self> {
        Self::start_with_transport(settings, Box::new(CurlTransport::new()))
    }

    /// Start a session over a specific transport
    pub fn start_with_transport(
        settings: &DriverSettings,
        transport: Box<dyn WireTransport>,
    ) -> DriverResult<Self> {
        let mut browser = Self {
            endpoint: settings.webdriver_url.trim_end_matches('/').to_string(),
            session_id: None,
            timeout: Duration::from_secs(settings.timeout_secs),
            transport,
        };
        browser.create_session(settings)?;
        browser.configure_timeouts(settings)?;
        Ok(browser)
    }

    fn create_session(&mut self, settings: &DriverSettings) -> DriverResult<()> {
        let request = serde_json::json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": {
                        "args": chrome_args(settings),
                    }
                }
            }
        });

        let body = self.transport.request(
            "POST",
            &format!("{}/session", self.endpoint),
            Some(&request),
        )?;
        let value = parse_value(&body)?;

        let session_id = value["sessionId"]
            .as_str()
            .ok_or_else(|| DriverError::Session("endpoint returned no session id".to_string()))?;
        self.session_id = Some(session_id.to_string());
        Ok(())
    }

    fn configure_timeouts(&mut self, settings: &DriverSettings) -> DriverResult<()> {
        let request = serde_json::json!({
            "pageLoad": settings.timeout_secs * 1000,
        });
        self.execute("POST", "/timeouts", Some(&request))?;
        Ok(())
    }

    /// Execute a wire command against the current session
    fn execute(
        &mut self,
        method: &str,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> DriverResult<serde_json::Value> {
        let session_id = self
            .session_id
            .as_ref()
            .ok_or_else(|| DriverError::Session("no active browser session".to_string()))?;
        let url = format!("{}/session/{}{}", self.endpoint, session_id, path);
        let response = self.transport.request(method, &url, body)?;
        parse_value(&response)
    }

    /// Single find attempt; `None` when the element is not in the DOM yet
    fn find_once(&mut self, locator: &Locator) -> DriverResult<Option<ElementHandle>> {
        let (using, value) = locator.strategy();
        let request = serde_json::json!({ "using": using, "value": value });
        match self.execute("POST", "/element", Some(&request)) {
            Ok(value) => match value[ELEMENT_KEY].as_str() {
                Some(id) => Ok(Some(ElementHandle::new(id))),
                None => Ok(None),
            },
            Err(DriverError::Wire(msg)) if msg.starts_with("no such element") => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn element_arg(el: &ElementHandle) -> serde_json::Value {
        serde_json::json!({ ELEMENT_KEY: el.as_str() })
    }
}

impl Browser for WebDriverBrowser {
    fn navigate(&mut self, url: &str) -> DriverResult<()> {
        self.execute("POST", "/url", Some(&serde_json::json!({ "url": url })))?;
        Ok(())
    }

    fn find(&mut self, locator: &Locator, wait: WaitKind) -> DriverResult<ElementHandle> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(el) = self.find_once(locator)? {
                // Condition checks on an element that just went stale count
                // as not-yet, same as an absent element
                let satisfied = match wait {
                    WaitKind::Present => true,
                    WaitKind::Visible => self.is_displayed(&el).unwrap_or(false),
                    WaitKind::Clickable => {
                        self.is_displayed(&el).unwrap_or(false)
                            && self.is_enabled(&el).unwrap_or(false)
                    }
                };
                if satisfied {
                    return Ok(el);
                }
            }
            if Instant::now() >= deadline {
                return Err(DriverError::not_found(locator, wait, self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn click(&mut self, el: &ElementHandle) -> DriverResult<()> {
        let path = format!("/element/{}/click", el.as_str());
        self.execute("POST", &path, Some(&serde_json::json!({})))?;
        Ok(())
    }

    fn send_keys(&mut self, el: &ElementHandle, text: &str) -> DriverResult<()> {
        let path = format!("/element/{}/value", el.as_str());
        self.execute("POST", &path, Some(&serde_json::json!({ "text": text })))?;
        Ok(())
    }

    fn clear(&mut self, el: &ElementHandle) -> DriverResult<()> {
        let path = format!("/element/{}/clear", el.as_str());
        self.execute("POST", &path, Some(&serde_json::json!({})))?;
        Ok(())
    }

    fn set_value(&mut self, el: &ElementHandle, value: &str) -> DriverResult<()> {
        let request = serde_json::json!({
            "script": SET_VALUE_SCRIPT,
            "args": [Self::element_arg(el), value],
        });
        self.execute("POST", "/execute/sync", Some(&request))?;
        Ok(())
    }

    fn attr(&mut self, el: &ElementHandle, name: &str) -> DriverResult<Option<String>> {
        let path = format!("/element/{}/attribute/{}", el.as_str(), name);
        let value = self.execute("GET", &path, None)?;
        Ok(value.as_str().map(|s| s.to_string()))
    }

    fn text(&mut self, el: &ElementHandle) -> DriverResult<String> {
        let path = format!("/element/{}/text", el.as_str());
        let value = self.execute("GET", &path, None)?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn is_enabled(&mut self, el: &ElementHandle) -> DriverResult<bool> {
        let path = format!("/element/{}/enabled", el.as_str());
        let value = self.execute("GET", &path, None)?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn is_displayed(&mut self, el: &ElementHandle) -> DriverResult<bool> {
        let path = format!("/element/{}/displayed", el.as_str());
        let value = self.execute("GET", &path, None)?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn capture_png(&mut self) -> DriverResult<Vec<u8>> {
        let value = self.execute("GET", "/screenshot", None)?;
        let encoded = value
            .as_str()
            .ok_or_else(|| DriverError::Wire("screenshot response had no body".to_string()))?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| DriverError::Wire(format!("screenshot is not valid base64: {}", e)))
    }

    fn current_url(&mut self) -> DriverResult<String> {
        let value = self.execute("GET", "/url", None)?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn quit(&mut self) -> DriverResult<()> {
        if self.session_id.is_none() {
            return Ok(());
        }
        self.execute("DELETE", "", None)?;
        self.session_id = None;
        Ok(())
    }
}

/// Chrome switches matching the environments the suite targets
fn chrome_args(settings: &DriverSettings) -> Vec<String> {
    let mut args = Vec::new();
    if settings.headless {
        args.push("--headless=new".to_string());
    }
    args.push(format!(
        "--window-size={},{}",
        settings.window_width, settings.window_height
    ));
    args.push("--disable-gpu".to_string());
    args.push("--no-sandbox".to_string());
    args.push("--disable-infobars".to_string());
    args.push("--disable-extensions".to_string());
    args.push("--disable-notifications".to_string());
    args
}

/// Unwrap the `value` field of a wire response, converting protocol errors
fn parse_value(body: &str) -> DriverResult<serde_json::Value> {
    let json: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| DriverError::Wire(format!("unparsable response: {}", e)))?;
    let value = json["value"].clone();
    if let Some(error) = value["error"].as_str() {
        let message = value["message"].as_str().unwrap_or("");
        return Err(DriverError::Wire(format!("{}: {}", error, message)));
    }
    Ok(value)
}
