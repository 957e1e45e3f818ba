//! Scriptable in-memory browser for tests.
//!
//! Pages are described as a set of [`MockElement`]s keyed by locator, with
//! optional click effects (revealing other elements, navigation). Screenshots
//! are real PNGs: the page state is rendered into a small framebuffer so the
//! reporting pipeline exercises genuine image bytes.

use std::collections::HashMap;
use std::io::Cursor;
use std::time::Duration;

use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{ImageBuffer, RgbImage};

use super::browser::{Browser, ElementHandle};
use super::types::{DriverError, DriverResult, Locator, WaitKind};

const PAGE_WIDTH: u32 = 640;
const PAGE_HEIGHT: u32 = 400;
const LINE_HEIGHT: u32 = 12;

const PAGE_BG: [u8; 3] = [24, 26, 34];
const PAGE_FG: [u8; 3] = [235, 235, 235];
const HIDDEN_FG: [u8; 3] = [110, 110, 110];

/// One element of a scripted page
#[derive(Debug, Clone)]
pub struct MockElement {
    locator: Locator,
    text: String,
    value: String,
    visible: bool,
    enabled: bool,
    swallow_keys: bool,
    attrs: HashMap<String, String>,
    reveals: Vec<Locator>,
    navigates_to: Option<String>,
}

impl MockElement {
    /// A visible, enabled element with no text
    pub fn new(locator: Locator) -> Self {
        Self {
            locator,
            text: String::new(),
            value: String::new(),
            visible: true,
            enabled: true,
            swallow_keys: false,
            attrs: HashMap::new(),
            reveals: Vec::new(),
            navigates_to: None,
        }
    }

    /// Set the element's visible text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Start hidden; becomes visible when revealed by a click
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Start disabled
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Ignore `send_keys`, like widgets that only react to real input
    /// events; `set_value` still works
    pub fn swallows_keys(mut self) -> Self {
        self.swallow_keys = true;
        self
    }

    /// Set an attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Clicking this element makes all elements at `locator` visible
    pub fn reveals(mut self, locator: Locator) -> Self {
        self.reveals.push(locator);
        self
    }

    /// Clicking this element navigates to `url`
    pub fn navigates_to(mut self, url: impl Into<String>) -> Self {
        self.navigates_to = Some(url.into());
        self
    }
}

/// In-memory browser backed by a scripted page
#[derive(Debug, Clone)]
pub struct MockBrowser {
    elements: Vec<MockElement>,
    current_url: String,
    fail_screenshots: bool,
    alive: bool,
}

impl MockBrowser {
    /// An empty page
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            current_url: String::new(),
            fail_screenshots: false,
            alive: true,
        }
    }

    /// Add an element to the page
    pub fn element(mut self, element: MockElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Make every screenshot attempt fail, to exercise capture recovery
    pub fn fail_screenshots(mut self, fail: bool) -> Self {
        self.fail_screenshots = fail;
        self
    }

    fn ensure_alive(&self) -> DriverResult<()> {
        if self.alive {
            Ok(())
        } else {
            Err(DriverError::Session("browser session has ended".to_string()))
        }
    }

    fn index_of(&self, el: &ElementHandle) -> DriverResult<usize> {
        self.ensure_alive()?;
        el.as_str()
            .parse::<usize>()
            .ok()
            .filter(|i| *i < self.elements.len())
            .ok_or_else(|| {
                DriverError::Session(format!("unknown element handle {}", el.as_str()))
            })
    }

    fn render(&self) -> Framebuffer {
        let mut fb = Framebuffer::new(PAGE_WIDTH, PAGE_HEIGHT);
        fb.fill(PAGE_BG);
        fb.draw_text(8, 8, &self.current_url, PAGE_FG, PAGE_BG);

        let mut y = 8 + 2 * LINE_HEIGHT;
        for element in &self.elements {
            let fg = if element.visible { PAGE_FG } else { HIDDEN_FG };
            let content = if element.value.is_empty() {
                element.text.clone()
            } else {
                element.value.clone()
            };
            let line = format!("{} {}", element.locator, content);
            fb.draw_text(8, y, &line, fg, PAGE_BG);
            y += LINE_HEIGHT;
            if y + 8 >= PAGE_HEIGHT {
                break;
            }
        }
        fb
    }
}

impl Default for MockBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl Browser for MockBrowser {
    fn navigate(&mut self, url: &str) -> DriverResult<()> {
        self.ensure_alive()?;
        self.current_url = url.to_string();
        Ok(())
    }

    fn find(&mut self, locator: &Locator, wait: WaitKind) -> DriverResult<ElementHandle> {
        self.ensure_alive()?;
        // The page only changes through click effects, so an unsatisfied
        // condition stays unsatisfied and the wait fails without polling
        let found = self
            .elements
            .iter()
            .position(|e| &e.locator == locator)
            .filter(|&i| match wait {
                WaitKind::Present => true,
                WaitKind::Visible => self.elements[i].visible,
                WaitKind::Clickable => self.elements[i].visible && self.elements[i].enabled,
            });
        match found {
            Some(i) => Ok(ElementHandle::new(i.to_string())),
            None => Err(DriverError::not_found(locator, wait, Duration::ZERO)),
        }
    }

    fn click(&mut self, el: &ElementHandle) -> DriverResult<()> {
        let idx = self.index_of(el)?;
        if !self.elements[idx].visible {
            return Err(DriverError::Wire("element not interactable".to_string()));
        }

        let reveals = self.elements[idx].reveals.clone();
        let target = self.elements[idx].navigates_to.clone();

        for locator in &reveals {
            for element in self.elements.iter_mut().filter(|e| &e.locator == locator) {
                element.visible = true;
            }
        }
        if let Some(url) = target {
            self.current_url = url;
        }
        Ok(())
    }

    fn send_keys(&mut self, el: &ElementHandle, text: &str) -> DriverResult<()> {
        let idx = self.index_of(el)?;
        if !self.elements[idx].swallow_keys {
            self.elements[idx].value.push_str(text);
        }
        Ok(())
    }

    fn clear(&mut self, el: &ElementHandle) -> DriverResult<()> {
        let idx = self.index_of(el)?;
        self.elements[idx].value.clear();
        Ok(())
    }

    fn set_value(&mut self, el: &ElementHandle, value: &str) -> DriverResult<()> {
        let idx = self.index_of(el)?;
        self.elements[idx].value = value.to_string();
        Ok(())
    }

    fn attr(&mut self, el: &ElementHandle, name: &str) -> DriverResult<Option<String>> {
        let idx = self.index_of(el)?;
        if name == "value" {
            return Ok(Some(self.elements[idx].value.clone()));
        }
        Ok(self.elements[idx].attrs.get(name).cloned())
    }

    fn text(&mut self, el: &ElementHandle) -> DriverResult<String> {
        let idx = self.index_of(el)?;
        Ok(self.elements[idx].text.clone())
    }

    fn is_enabled(&mut self, el: &ElementHandle) -> DriverResult<bool> {
        let idx = self.index_of(el)?;
        Ok(self.elements[idx].enabled)
    }

    fn is_displayed(&mut self, el: &ElementHandle) -> DriverResult<bool> {
        let idx = self.index_of(el)?;
        Ok(self.elements[idx].visible)
    }

    fn capture_png(&mut self) -> DriverResult<Vec<u8>> {
        self.ensure_alive()?;
        if self.fail_screenshots {
            return Err(DriverError::Wire("screenshot capture disabled".to_string()));
        }
        self.render().to_png()
    }

    fn current_url(&mut self) -> DriverResult<String> {
        self.ensure_alive()?;
        Ok(self.current_url.clone())
    }

    fn quit(&mut self) -> DriverResult<()> {
        self.alive = false;
        Ok(())
    }
}

/// RGB framebuffer the mock browser renders pages into
#[derive(Debug, Clone)]
struct Framebuffer {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl Framebuffer {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffer: vec![0u8; (width * height * 3) as usize],
        }
    }

    fn fill(&mut self, color: [u8; 3]) {
        for chunk in self.buffer.chunks_exact_mut(3) {
            chunk.copy_from_slice(&color);
        }
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        self.buffer[idx..idx + 3].copy_from_slice(&color);
    }

    /// Draw text using font8x8 glyphs; does not wrap
    fn draw_text(&mut self, x: u32, y: u32, text: &str, fg: [u8; 3], bg: [u8; 3]) {
        let mut cursor_x = x;
        for ch in text.chars() {
            self.draw_char(cursor_x, y, ch, fg, bg);
            cursor_x += 8;
            if cursor_x >= self.width {
                break;
            }
        }
    }

    fn draw_char(&mut self, x: u32, y: u32, ch: char, fg: [u8; 3], bg: [u8; 3]) {
        let glyph = BASIC_FONTS.get(ch).unwrap_or([0u8; 8]);
        for (row_idx, row) in glyph.iter().enumerate() {
            let py = y + row_idx as u32;
            if py >= self.height {
                break;
            }
            for bit in 0..8 {
                let px = x + bit;
                if px >= self.width {
                    break;
                }
                // font8x8 stores LSB as leftmost pixel
                let is_fg = (row >> bit) & 1 == 1;
                self.set_pixel(px, py, if is_fg { fg } else { bg });
            }
        }
    }

    fn to_png(&self) -> DriverResult<Vec<u8>> {
        let img: RgbImage = ImageBuffer::from_raw(self.width, self.height, self.buffer.clone())
            .ok_or_else(|| DriverError::Wire("framebuffer size mismatch".to_string()))?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(|e| DriverError::Wire(format!("failed to encode PNG: {}", e)))?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> MockBrowser {
        MockBrowser::new()
            .element(MockElement::new(Locator::tag("body")))
            .element(
                MockElement::new(Locator::css("button.open-modal"))
                    .text("Check balance")
                    .reveals(Locator::id("couponInput")),
            )
            .element(MockElement::new(Locator::id("couponInput")).hidden())
    }

    #[test]
    fn test_find_honors_wait_kinds() {
        let mut browser = page();

        // Hidden element is present but not visible
        assert!(browser
            .find(&Locator::id("couponInput"), WaitKind::Present)
            .is_ok());
        let err = browser
            .find(&Locator::id("couponInput"), WaitKind::Visible)
            .unwrap_err();
        assert!(matches!(err, DriverError::NotFound { .. }));
    }

    #[test]
    fn test_click_reveals_elements() {
        let mut browser = page();

        browser.click_on(&Locator::css("button.open-modal")).unwrap();
        assert!(browser.is_visible(&Locator::id("couponInput")));
        assert!(browser
            .find(&Locator::id("couponInput"), WaitKind::Clickable)
            .is_ok());
    }

    #[test]
    fn test_clickable_excludes_disabled() {
        let mut browser = MockBrowser::new()
            .element(MockElement::new(Locator::id("submit")).disabled());

        assert!(browser.find(&Locator::id("submit"), WaitKind::Visible).is_ok());
        assert!(browser
            .find(&Locator::id("submit"), WaitKind::Clickable)
            .is_err());
    }

    #[test]
    fn test_typed_value_reads_back() {
        let mut browser = MockBrowser::new().element(MockElement::new(Locator::id("amount")));

        browser.type_into(&Locator::id("amount"), "250").unwrap();
        assert_eq!(browser.value_of(&Locator::id("amount")).unwrap(), "250");
    }

    #[test]
    fn test_swallowed_keys_need_set_value() {
        let mut browser = MockBrowser::new()
            .element(MockElement::new(Locator::id("coupon")).swallows_keys());

        browser.type_into(&Locator::id("coupon"), "12345").unwrap();
        assert_eq!(browser.value_of(&Locator::id("coupon")).unwrap(), "");

        let el = browser.find(&Locator::id("coupon"), WaitKind::Present).unwrap();
        browser.set_value(&el, "12345").unwrap();
        assert_eq!(browser.value_of(&Locator::id("coupon")).unwrap(), "12345");
    }

    #[test]
    fn test_click_navigates() {
        let mut browser = MockBrowser::new().element(
            MockElement::new(Locator::css("a.checkout")).navigates_to("mock://checkout"),
        );

        browser.navigate("mock://home").unwrap();
        browser.click_on(&Locator::css("a.checkout")).unwrap();
        assert_eq!(browser.current_url().unwrap(), "mock://checkout");
    }

    #[test]
    fn test_capture_png_yields_png_bytes() {
        let mut browser = page();
        browser.navigate("mock://home").unwrap();

        let png = browser.capture_png().unwrap();
        assert_eq!(&png[0..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_fail_screenshots_injection() {
        let mut browser = page().fail_screenshots(true);
        assert!(matches!(browser.capture_png(), Err(DriverError::Wire(_))));
    }

    #[test]
    fn test_quit_ends_session() {
        let mut browser = page();
        browser.quit().unwrap();
        assert!(matches!(
            browser.navigate("mock://home"),
            Err(DriverError::Session(_))
        ));
    }
}
