use crate::driver::{BrowserDriver, Locator};
use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Delay between two probes of the live page
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// What a located element must satisfy before a wait returns it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// In the document
    Present,
    /// In the document and rendered visibly
    Visible,
    /// Visible and accepting input
    Interactable,
}

impl Condition {
    fn label(&self) -> &'static str {
        match self {
            Condition::Present => "present",
            Condition::Visible => "visible",
            Condition::Interactable => "clickable",
        }
    }
}

/// Polls a driver until a condition holds or the timeout elapses
pub struct Waiter<'d, D: BrowserDriver> {
    driver: &'d D,
    timeout: Duration,
    interval: Duration,
}

impl<'d, D: BrowserDriver> Waiter<'d, D> {
    pub fn new(driver: &'d D, timeout: Duration) -> Self {
        Self {
            driver,
            timeout,
            interval: POLL_INTERVAL,
        }
    }

    /// Same driver and interval, different budget
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            driver: self.driver,
            timeout,
            interval: self.interval,
        }
    }

    pub async fn until_present(&self, locator: &Locator) -> Result<D::Element> {
        self.until(locator, Condition::Present).await
    }

    pub async fn until_visible(&self, locator: &Locator) -> Result<D::Element> {
        self.until(locator, Condition::Visible).await
    }

    pub async fn until_interactable(&self, locator: &Locator) -> Result<D::Element> {
        self.until(locator, Condition::Interactable).await
    }

    /// First element matching `locator` that satisfies `condition`
    pub async fn until(&self, locator: &Locator, condition: Condition) -> Result<D::Element> {
        let found = self
            .poll(locator.name, move || self.probe(locator, condition))
            .await;

        found.ok_or_else(|| Error::ElementTimeout {
            what: format!("{} to be {}", locator, condition.label()),
            timeout: self.timeout,
        })
    }

    /// Every element matching `locator`, once at least one is present
    pub async fn until_all_present(&self, locator: &Locator) -> Result<Vec<D::Element>> {
        let found = self
            .poll(locator.name, move || async move {
                let elements = self.driver.find_all(locator).await?;
                Ok((!elements.is_empty()).then_some(elements))
            })
            .await;

        found.ok_or_else(|| Error::ElementTimeout {
            what: format!("{} to be present", locator),
            timeout: self.timeout,
        })
    }

    /// Wait for the current location to differ from `baseline`, returning
    /// the new location
    pub async fn until_url_changes(&self, baseline: &str) -> Result<String> {
        let found = self
            .poll("navigation", move || async move {
                let url = self.driver.current_url().await?;
                Ok((url != baseline).then_some(url))
            })
            .await;

        found.ok_or(Error::NavigationTimeout {
            timeout: self.timeout,
        })
    }

    async fn probe(&self, locator: &Locator, condition: Condition) -> Result<Option<D::Element>> {
        for element in self.driver.find_all(locator).await? {
            let satisfied = match condition {
                Condition::Present => true,
                Condition::Visible => self.driver.element_state(&element).await?.visible,
                Condition::Interactable => {
                    self.driver.element_state(&element).await?.interactable()
                }
            };
            if satisfied {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }

    async fn poll<T, F, Fut>(&self, what: &str, mut probe: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        // `None` means the budget is too large to represent: wait without a deadline
        let deadline = Instant::now().checked_add(self.timeout);

        loop {
            match probe().await {
                Ok(Some(value)) => return Some(value),
                Ok(None) => {}
                // Nodes vanish mid-probe while the page re-renders
                Err(e) => tracing::debug!("Probe for {} failed, retrying: {}", what, e),
            }

            let pause = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        tracing::debug!("Gave up waiting for {} after {:?}", what, self.timeout);
                        return None;
                    }
                    self.interval.min(deadline - now)
                }
                None => self.interval,
            };
            tokio::time::sleep(pause).await;
        }
    }
}
