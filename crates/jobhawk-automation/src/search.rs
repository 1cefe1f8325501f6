use crate::selectors::{EASY_APPLY_FILTER, JOB_CARDS, KEYWORD_INPUT, LOCATION_INPUT};
use jobhawk_browser::{BrowserDriver, Result, Waiter};
use jobhawk_core::{SearchQuery, Settings};
use std::time::Duration;

/// Pause after result cards appear so badges and labels finish rendering.
/// The page gives no stronger completion signal than the cards themselves.
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    Applied,
    /// The toggle never became clickable; results stay unfiltered
    Unavailable,
}

/// Submits the job search and toggles the Easy Apply filter
pub struct SearchController<'a, D: BrowserDriver> {
    driver: &'a D,
    settings: &'a Settings,
    waiter: Waiter<'a, D>,
}

impl<'a, D: BrowserDriver> SearchController<'a, D> {
    pub fn new(driver: &'a D, settings: &'a Settings) -> Self {
        Self {
            driver,
            settings,
            waiter: Waiter::new(driver, settings.timeouts.explicit_wait),
        }
    }

    pub async fn open_jobs_page(&self) -> Result<()> {
        let url = self.settings.route("/jobs");
        tracing::info!("Navigating to job search page: {}", url);
        self.driver.navigate(&url).await
    }

    /// Type the query and confirm it from the keyword box.
    ///
    /// Returns whether result cards rendered. Missing inputs and a results
    /// timeout are reported as warnings; other browser faults propagate.
    pub async fn submit_query(&self, query: &SearchQuery) -> Result<bool> {
        tracing::info!(
            "Searching for '{}' in '{}'",
            query.keyword(),
            query.location()
        );

        let Some(keyword_input) = absorb_timeout(self.waiter.until_visible(&KEYWORD_INPUT).await)?
        else {
            tracing::warn!("Keyword search box not found; search not submitted");
            return Ok(false);
        };
        self.driver.clear(&keyword_input).await?;
        self.driver.type_text(&keyword_input, query.keyword()).await?;

        if !query.location().is_empty() {
            match absorb_timeout(self.waiter.until_visible(&LOCATION_INPUT).await)? {
                Some(location_input) => {
                    self.driver.clear(&location_input).await?;
                    self.driver
                        .type_text(&location_input, query.location())
                        .await?;
                }
                None => tracing::warn!("Location search box not found; searching without location"),
            }
        }

        self.driver.press_enter(&keyword_input).await?;
        Ok(await_results_rendered(&self.waiter).await)
    }

    pub async fn apply_expedited_filter(&self) -> Result<FilterOutcome> {
        match absorb_timeout(self.waiter.until_interactable(&EASY_APPLY_FILTER).await)? {
            Some(toggle) => {
                self.driver.click(&toggle).await?;
                await_results_rendered(&self.waiter).await;
                tracing::info!("Easy Apply filter applied");
                Ok(FilterOutcome::Applied)
            }
            None => {
                tracing::warn!("Could not apply Easy Apply filter; continuing unfiltered");
                Ok(FilterOutcome::Unavailable)
            }
        }
    }
}

/// Wait for at least one result card, then let the page settle
pub(crate) async fn await_results_rendered<D: BrowserDriver>(waiter: &Waiter<'_, D>) -> bool {
    match waiter.until_present(&JOB_CARDS).await {
        Ok(_) => {
            tokio::time::sleep(SETTLE_DELAY).await;
            true
        }
        Err(e) => {
            tracing::warn!("Job results did not render: {}", e);
            false
        }
    }
}

/// Turn a wait timeout into `None`, keeping every other error
fn absorb_timeout<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_timeout() => {
            tracing::debug!("{}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
