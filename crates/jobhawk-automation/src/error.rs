use crate::auth::AuthFailure;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Authentication failed: {reason}{}", detail_suffix(.detail))]
    AuthenticationFailed {
        reason: AuthFailure,
        detail: Option<String>,
    },

    #[error(transparent)]
    Browser(#[from] jobhawk_browser::Error),

    #[error(transparent)]
    Core(#[from] jobhawk_core::Error),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(" ({})", d))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, RunError>;
