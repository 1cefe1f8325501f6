use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Chrome not found ({0}). Use --chrome-path to point at a Chrome or Chromium binary")]
    ChromeNotFound(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("Element lookup failed: {0}")]
    Lookup(String),

    #[error("Timed out after {}s waiting for {what}", timeout.as_secs_f32())]
    ElementTimeout { what: String, timeout: Duration },

    #[error("No navigation within {}s", timeout.as_secs_f32())]
    NavigationTimeout { timeout: Duration },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::ElementTimeout { .. } | Error::NavigationTimeout { .. }
        )
    }
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
