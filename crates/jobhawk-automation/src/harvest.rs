use crate::search::await_results_rendered;
use crate::selectors::{EASY_APPLY_BADGE, JOB_CARDS, JOB_TITLE_LINK, NEXT_PAGE_BUTTON};
use jobhawk_browser::{BrowserDriver, Waiter};
use jobhawk_core::Settings;
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestOptions {
    /// Hard ceiling on pages read, guarding against a looping next button
    pub max_pages: usize,
    /// Drop links already collected from an earlier page
    pub dedupe: bool,
}

impl HarvestOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_pages: settings.max_pages,
            dedupe: false,
        }
    }

    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }
}

/// What one pass over the rendered result cards produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageHarvest {
    pub links: Vec<String>,
    pub cards: usize,
    pub skipped_no_badge: usize,
    pub skipped_unreadable: usize,
}

impl PageHarvest {
    pub fn extracted(&self) -> usize {
        self.links.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
    /// Links in the order they were read, page by page
    pub links: Vec<String>,
    pub pages: usize,
    pub cards: usize,
    pub extracted: usize,
    pub skipped_no_badge: usize,
    pub skipped_unreadable: usize,
    /// Links seen on an earlier page (dropped only when deduplicating)
    pub duplicates: usize,
    pub hit_page_ceiling: bool,
}

enum CardRead {
    Link(String),
    NoBadge,
    Unreadable(String),
}

/// Reads Easy Apply links from result pages and follows pagination
pub struct Harvester<'a, D: BrowserDriver> {
    driver: &'a D,
    waiter: Waiter<'a, D>,
    options: HarvestOptions,
}

impl<'a, D: BrowserDriver> Harvester<'a, D> {
    pub fn new(driver: &'a D, settings: &'a Settings, options: HarvestOptions) -> Self {
        Self {
            driver,
            waiter: Waiter::new(driver, settings.timeouts.explicit_wait),
            options,
        }
    }

    /// Extract links from every card on the current page. A card that
    /// cannot be read is counted and skipped; it never aborts the pass.
    pub async fn read_current_page_links(&self) -> PageHarvest {
        let mut page = PageHarvest::default();

        let cards = match self.waiter.until_all_present(&JOB_CARDS).await {
            Ok(cards) => cards,
            Err(e) => {
                tracing::warn!("No job cards on page: {}", e);
                return page;
            }
        };
        page.cards = cards.len();
        tracing::info!("Found {} job cards on page", cards.len());

        for (idx, card) in cards.iter().enumerate() {
            match self.read_card(card).await {
                CardRead::Link(url) => page.links.push(url),
                CardRead::NoBadge => page.skipped_no_badge += 1,
                CardRead::Unreadable(why) => {
                    tracing::debug!("Skipping job card {}: {}", idx, why);
                    page.skipped_unreadable += 1;
                }
            }
        }

        if page.skipped_unreadable > 0 {
            tracing::warn!(
                "Skipped {} unreadable job cards ({} links extracted)",
                page.skipped_unreadable,
                page.extracted()
            );
        }

        page
    }

    async fn read_card(&self, card: &D::Element) -> CardRead {
        let badges = match self.driver.find_all_within(card, &EASY_APPLY_BADGE).await {
            Ok(badges) => badges,
            Err(e) => return CardRead::Unreadable(format!("badge lookup failed: {}", e)),
        };
        if badges.is_empty() {
            return CardRead::NoBadge;
        }

        let links = match self.driver.find_all_within(card, &JOB_TITLE_LINK).await {
            Ok(links) => links,
            Err(e) => return CardRead::Unreadable(format!("title link lookup failed: {}", e)),
        };
        let Some(link) = links.first() else {
            return CardRead::Unreadable("no title link".to_string());
        };

        match self.driver.attribute(link, "href").await {
            Ok(Some(href)) if !href.trim().is_empty() => CardRead::Link(href),
            Ok(_) => CardRead::Unreadable("title link has no href".to_string()),
            Err(e) => CardRead::Unreadable(format!("href read failed: {}", e)),
        }
    }

    /// Click through to the next page. `false` means there is none.
    pub async fn advance_page(&self) -> bool {
        let next = match self.waiter.until_interactable(&NEXT_PAGE_BUTTON).await {
            Ok(next) => next,
            Err(_) => {
                tracing::info!("No further result pages");
                return false;
            }
        };

        if let Err(e) = self.driver.click(&next).await {
            tracing::warn!("Could not open next result page: {}", e);
            return false;
        }

        await_results_rendered(&self.waiter).await;
        true
    }

    /// Read every page until pagination ends or the page ceiling is reached
    pub async fn harvest_all(&self) -> HarvestReport {
        let mut report = HarvestReport::default();
        let mut seen = HashSet::new();

        loop {
            let page = self.read_current_page_links().await;
            report.pages += 1;
            report.cards += page.cards;
            report.extracted += page.extracted();
            report.skipped_no_badge += page.skipped_no_badge;
            report.skipped_unreadable += page.skipped_unreadable;

            for link in page.links {
                if !seen.insert(link.clone()) {
                    report.duplicates += 1;
                    if self.options.dedupe {
                        continue;
                    }
                }
                report.links.push(link);
            }

            tracing::info!(
                "Page {}: {} links so far",
                report.pages,
                report.links.len()
            );

            if report.pages >= self.options.max_pages {
                if self.has_next_page().await {
                    tracing::warn!(
                        "Stopped after {} pages (page limit); more results remain",
                        report.pages
                    );
                    report.hit_page_ceiling = true;
                }
                break;
            }

            if !self.advance_page().await {
                break;
            }
        }

        if report.duplicates > 0 {
            tracing::warn!("{} links appeared on more than one page", report.duplicates);
        }

        report
    }

    /// Single probe for a usable next-page control
    async fn has_next_page(&self) -> bool {
        self.waiter
            .with_timeout(Duration::ZERO)
            .until_interactable(&NEXT_PAGE_BUTTON)
            .await
            .is_ok()
    }
}
