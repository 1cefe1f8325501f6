use crate::auth::{AuthOutcome, AuthReport, Authenticator};
use crate::harvest::{HarvestOptions, HarvestReport, Harvester};
use crate::search::{FilterOutcome, SearchController};
use crate::{Result, RunError};
use jobhawk_browser::BrowserDriver;
use jobhawk_core::{SessionStore, Settings};
use std::path::{Path, PathBuf};

/// Everything one run observed
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub auth: AuthReport,
    pub results_rendered: bool,
    pub filter: FilterOutcome,
    pub harvest: HarvestReport,
}

/// Authenticate, turning a failed outcome into an error
pub async fn authenticate_only<D: BrowserDriver>(
    driver: &D,
    settings: &Settings,
) -> Result<AuthReport> {
    let report = Authenticator::new(driver, settings).authenticate().await;
    match &report.outcome {
        AuthOutcome::Authenticated => Ok(report),
        AuthOutcome::Failed { reason, detail } => Err(RunError::AuthenticationFailed {
            reason: reason.clone(),
            detail: detail.clone(),
        }),
    }
}

/// Authenticate, search, filter and harvest Easy Apply links.
///
/// The caller owns the driver and is responsible for quitting it on every
/// exit path.
pub async fn run_pipeline<D: BrowserDriver>(
    driver: &D,
    settings: &Settings,
    options: HarvestOptions,
) -> Result<RunSummary> {
    let auth = authenticate_only(driver, settings).await?;

    let search = SearchController::new(driver, settings);
    search.open_jobs_page().await?;
    let results_rendered = search.submit_query(&settings.query).await?;
    let filter = search.apply_expedited_filter().await?;

    tracing::info!("Extracting Easy Apply job links");
    let harvest = Harvester::new(driver, settings, options).harvest_all().await;

    Ok(RunSummary {
        auth,
        results_rendered,
        filter,
        harvest,
    })
}

/// Log in and write the browser's cookies to `output` for later replay
pub async fn export_session<D: BrowserDriver>(
    driver: &D,
    settings: &Settings,
    output: &Path,
) -> Result<PathBuf> {
    authenticate_only(driver, settings).await?;

    let cookies = driver.cookies().await?;
    let path = SessionStore::save(output, &cookies)?;
    Ok(path)
}
