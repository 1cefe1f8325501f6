pub mod auth;
mod error;
pub mod harvest;
pub mod pipeline;
pub mod search;
pub mod selectors;

pub use auth::{AuthFailure, AuthOutcome, AuthReport, AuthStage, Authenticator};
pub use error::{Result, RunError};
pub use harvest::{HarvestOptions, HarvestReport, Harvester, PageHarvest};
pub use pipeline::{RunSummary, authenticate_only, export_session, run_pipeline};
pub use search::{FilterOutcome, SearchController};
