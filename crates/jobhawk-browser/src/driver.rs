use crate::Result;
use async_trait::async_trait;
use jobhawk_core::SessionCookie;
use std::fmt;

/// Where to find an element: a CSS selector, optionally narrowed to
/// elements whose rendered text contains a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    pub name: &'static str,
    pub css: &'static str,
    pub text: Option<&'static str>,
}

impl Locator {
    pub const fn css(name: &'static str, css: &'static str) -> Self {
        Self {
            name,
            css,
            text: None,
        }
    }

    pub const fn containing_text(self, text: &'static str) -> Self {
        Self {
            text: Some(text),
            ..self
        }
    }

    /// True if an element's rendered text passes the text filter
    pub fn matches_text(&self, rendered: Option<&str>) -> bool {
        match self.text {
            None => true,
            Some(fragment) => rendered.is_some_and(|t| t.contains(fragment)),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Rendering state of an element that is already in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementState {
    pub visible: bool,
    pub enabled: bool,
}

impl ElementState {
    pub fn interactable(&self) -> bool {
        self.visible && self.enabled
    }
}

/// The primitive operations the automation issues against a live page.
///
/// One driver owns one page. Calls are strictly sequential; nothing in the
/// automation issues two operations concurrently against the same driver.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    type Element: Send + Sync;

    async fn navigate(&self, url: &str) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    async fn refresh(&self) -> Result<()>;

    /// All elements in the document matching the locator, in document order
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>>;

    /// Matching descendants of `parent`
    async fn find_all_within(
        &self,
        parent: &Self::Element,
        locator: &Locator,
    ) -> Result<Vec<Self::Element>>;

    async fn element_state(&self, element: &Self::Element) -> Result<ElementState>;

    async fn click(&self, element: &Self::Element) -> Result<()>;

    async fn clear(&self, element: &Self::Element) -> Result<()>;

    async fn type_text(&self, element: &Self::Element, text: &str) -> Result<()>;

    /// Send the keyboard confirm action to the element
    async fn press_enter(&self, element: &Self::Element) -> Result<()>;

    async fn attribute(&self, element: &Self::Element, name: &str) -> Result<Option<String>>;

    async fn text(&self, element: &Self::Element) -> Result<Option<String>>;

    async fn cookies(&self) -> Result<Vec<SessionCookie>>;

    async fn add_cookie(&self, cookie: &SessionCookie) -> Result<()>;

    /// Terminate the browser. Safe to call more than once.
    async fn quit(&mut self) -> Result<()>;
}
