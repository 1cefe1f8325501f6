use crate::driver::{BrowserDriver, ElementState, Locator};
use crate::{Error, Result};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::cdp::browser_protocol::page::ReloadParams;
use chromiumoxide::{Browser, Element, Page};
use jobhawk_core::SessionCookie;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Bit 1: rendered with a box and not hidden. Bit 2: not disabled.
const ELEMENT_STATE_FN: &str = r#"function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    const visible = rect.width > 0 && rect.height > 0
        && style.visibility !== 'hidden' && style.display !== 'none';
    const enabled = !this.disabled && this.getAttribute('aria-disabled') !== 'true';
    return (visible ? 1 : 0) + (enabled ? 2 : 0);
}"#;

const CLEAR_INPUT_FN: &str = r#"function() {
    this.focus();
    this.value = '';
    this.dispatchEvent(new Event('input', { bubbles: true }));
}"#;

/// A live Chromium page driven over the DevTools protocol
pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    handler_task: Option<JoinHandle<()>>,
    page_load_timeout: Duration,
    closed: bool,
}

impl ChromiumDriver {
    pub(crate) fn new(
        browser: Browser,
        page: Page,
        handler_task: JoinHandle<()>,
        page_load_timeout: Duration,
    ) -> Self {
        Self {
            browser,
            page,
            handler_task: Some(handler_task),
            page_load_timeout,
            closed: false,
        }
    }

    async fn bounded_load<F, T>(&self, load: F) -> Result<()>
    where
        F: Future<Output = std::result::Result<T, chromiumoxide::error::CdpError>>,
    {
        match tokio::time::timeout(self.page_load_timeout, load).await {
            Ok(result) => result.map(|_| ()).map_err(Error::from),
            Err(_) => Err(Error::NavigationTimeout {
                timeout: self.page_load_timeout,
            }),
        }
    }

    async fn filter_by_text(locator: &Locator, elements: Vec<Element>) -> Result<Vec<Element>> {
        if locator.text.is_none() {
            return Ok(elements);
        }

        let mut matching = Vec::with_capacity(elements.len());
        for element in elements {
            let rendered = element.inner_text().await?;
            if locator.matches_text(rendered.as_deref()) {
                matching.push(element);
            }
        }
        Ok(matching)
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    type Element = Element;

    async fn navigate(&self, url: &str) -> Result<()> {
        tracing::debug!("Navigating to {}", url);
        self.bounded_load(self.page.goto(url)).await
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn refresh(&self) -> Result<()> {
        tracing::debug!("Reloading page");
        self.bounded_load(async {
            self.page.execute(ReloadParams::default()).await?;
            self.page.wait_for_navigation().await
        })
        .await
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Element>> {
        let elements = self
            .page
            .find_elements(locator.css)
            .await
            .map_err(|e| Error::Lookup(format!("{}: {}", locator, e)))?;
        Self::filter_by_text(locator, elements).await
    }

    async fn find_all_within(&self, parent: &Element, locator: &Locator) -> Result<Vec<Element>> {
        let elements = parent
            .find_elements(locator.css)
            .await
            .map_err(|e| Error::Lookup(format!("{}: {}", locator, e)))?;
        Self::filter_by_text(locator, elements).await
    }

    async fn element_state(&self, element: &Element) -> Result<ElementState> {
        let returns = element.call_js_fn(ELEMENT_STATE_FN, false).await?;
        let bits = returns.result.value.and_then(|v| v.as_u64()).unwrap_or(0);
        Ok(ElementState {
            visible: bits & 1 != 0,
            enabled: bits & 2 != 0,
        })
    }

    async fn click(&self, element: &Element) -> Result<()> {
        element.click().await?;
        Ok(())
    }

    async fn clear(&self, element: &Element) -> Result<()> {
        element.call_js_fn(CLEAR_INPUT_FN, false).await?;
        Ok(())
    }

    async fn type_text(&self, element: &Element, text: &str) -> Result<()> {
        element.focus().await?.type_str(text).await?;
        Ok(())
    }

    async fn press_enter(&self, element: &Element) -> Result<()> {
        element.press_key("Enter").await?;
        Ok(())
    }

    async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>> {
        // Prefer the resolved DOM property so `href` comes back absolute
        let quoted = serde_json::to_string(name)
            .map_err(|e| Error::Lookup(format!("attribute name {}: {}", name, e)))?;
        let function = format!(
            "function() {{ const v = this[{quoted}] ?? this.getAttribute({quoted}); \
             return v == null ? null : String(v); }}"
        );
        let returns = element.call_js_fn(function, false).await?;
        Ok(returns
            .result
            .value
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    async fn text(&self, element: &Element) -> Result<Option<String>> {
        Ok(element.inner_text().await?)
    }

    async fn cookies(&self) -> Result<Vec<SessionCookie>> {
        let cookies = self.page.get_cookies().await?;
        Ok(cookies
            .into_iter()
            .map(|c| SessionCookie {
                name: c.name,
                value: c.value,
                domain: Some(c.domain),
                path: Some(c.path),
                secure: Some(c.secure),
                http_only: Some(c.http_only),
            })
            .collect())
    }

    async fn add_cookie(&self, cookie: &SessionCookie) -> Result<()> {
        let mut builder = CookieParam::builder()
            .name(cookie.name.clone())
            .value(cookie.value.clone())
            .domain(cookie.effective_domain());
        if let Some(path) = &cookie.path {
            builder = builder.path(path.clone());
        }
        if let Some(secure) = cookie.secure {
            builder = builder.secure(secure);
        }
        if let Some(http_only) = cookie.http_only {
            builder = builder.http_only(http_only);
        }

        let param = builder
            .build()
            .map_err(|e| Error::Browser(format!("Malformed cookie '{}': {}", cookie.name, e)))?;
        self.page.set_cookie(param).await?;
        Ok(())
    }

    async fn quit(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        tracing::info!("Closing browser");
        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("Browser process wait failed: {}", e);
        }
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }

        closed.map(|_| ()).map_err(Error::from)
    }
}

impl Drop for ChromiumDriver {
    fn drop(&mut self) {
        if !self.closed {
            tracing::warn!("Browser dropped without quit()");
        }
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
    }
}
