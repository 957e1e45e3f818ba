// Locators, wait conditions, and driver error types

use std::time::Duration;

/// Element lookup strategy plus its selector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// CSS selector
    Css(String),
    /// Element id attribute
    Id(String),
    /// XPath expression
    XPath(String),
    /// Tag name
    TagName(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Locator::Id(id.into())
    }

    pub fn xpath(expr: impl Into<String>) -> Self {
        Locator::XPath(expr.into())
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Locator::TagName(name.into())
    }

    /// Wire-protocol location strategy and selector value.
    ///
    /// Id locators are expressed as CSS attribute selectors since the W3C
    /// protocol has no dedicated id strategy.
    pub fn strategy(&self) -> (&'static str, String) {
        match self {
            Locator::Css(s) => ("css selector", s.clone()),
            Locator::Id(s) => ("css selector", format!("[id=\"{}\"]", s)),
            Locator::XPath(s) => ("xpath", s.clone()),
            Locator::TagName(s) => ("tag name", s.clone()),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css={}", s),
            Locator::Id(s) => write!(f, "id={}", s),
            Locator::XPath(s) => write!(f, "xpath={}", s),
            Locator::TagName(s) => write!(f, "tag={}", s),
        }
    }
}

/// Condition an element must reach before `find` returns it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitKind {
    /// Attached to the DOM
    Present,
    /// Attached and displayed
    Visible,
    /// Attached, displayed, and enabled
    Clickable,
}

impl WaitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitKind::Present => "present",
            WaitKind::Visible => "visible",
            WaitKind::Clickable => "clickable",
        }
    }
}

impl std::fmt::Display for WaitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result type for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Error types for driver operations
#[derive(Debug)]
pub enum DriverError {
    /// Element did not reach the wait condition within the timeout
    NotFound {
        locator: String,
        wait: WaitKind,
        timeout: Duration,
    },

    /// Wire-protocol or transport failure
    Wire(String),

    /// No usable browser session
    Session(String),

    /// I/O error
    Io(std::io::Error),
}

impl DriverError {
    /// Timeout failure for an element wait
    pub fn not_found(locator: &Locator, wait: WaitKind, timeout: Duration) -> Self {
        DriverError::NotFound {
            locator: locator.to_string(),
            wait,
            timeout,
        }
    }
}

impl std::fmt::Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriverError::NotFound {
                locator,
                wait,
                timeout,
            } => write!(
                f,
                "element {} not {} after {:.1}s",
                locator,
                wait,
                timeout.as_secs_f64()
            ),
            DriverError::Wire(msg) => write!(f, "wire error: {}", msg),
            DriverError::Session(msg) => write!(f, "session error: {}", msg),
            DriverError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriverError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DriverError {
    fn from(err: std::io::Error) -> Self {
        DriverError::Io(err)
    }
}
