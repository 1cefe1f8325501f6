use clap::Args;
use jobhawk_core::{RawSettings, Settings};
use std::fmt;
use std::path::PathBuf;

pub mod commands;

/// Exit code for a run stopped with Ctrl+C
pub const EXIT_INTERRUPTED: u8 = 130;
pub const EXIT_FAILURE: u8 = 1;

/// Settings flags shared by every command that talks to the site.
/// Each flag falls back to its environment variable.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Authentication method (cookie or credentials)
    #[arg(long, env = "AUTH_METHOD", value_name = "METHOD")]
    pub auth_method: Option<String>,

    /// Session file with cookies to replay
    #[arg(long, env = "COOKIE_FILE_PATH", value_name = "FILE")]
    pub cookie_file: Option<String>,

    /// Account email for credential login
    #[arg(long, env = "LINKEDIN_USERNAME")]
    pub username: Option<String>,

    /// Account password for credential login
    #[arg(long, env = "LINKEDIN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Job search keywords
    #[arg(long, env = "JOB_KEYWORDS")]
    pub keywords: Option<String>,

    /// Job search location (pass an empty string to search everywhere)
    #[arg(long, env = "JOB_LOCATION")]
    pub location: Option<String>,

    /// Browser command timeout in seconds
    #[arg(long, env = "IMPLICIT_WAIT", value_name = "SECS")]
    pub implicit_wait: Option<String>,

    /// Page load timeout in seconds
    #[arg(long, env = "PAGE_LOAD_TIMEOUT", value_name = "SECS")]
    pub page_load_timeout: Option<String>,

    /// Element wait timeout in seconds
    #[arg(long, env = "EXPLICIT_WAIT", value_name = "SECS")]
    pub explicit_wait: Option<String>,

    /// Stop after this many result pages
    #[arg(long, env = "MAX_PAGES", value_name = "N")]
    pub max_pages: Option<String>,

    #[arg(long, env = "JOBHAWK_BASE_URL", hide = true)]
    pub base_url: Option<String>,
}

impl SettingsArgs {
    pub fn to_raw(&self) -> RawSettings {
        RawSettings {
            base_url: self.base_url.clone(),
            auth_method: self.auth_method.clone(),
            cookie_file: self.cookie_file.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            keywords: self.keywords.clone(),
            location: self.location.clone(),
            implicit_wait: self.implicit_wait.clone(),
            page_load_timeout: self.page_load_timeout.clone(),
            explicit_wait: self.explicit_wait.clone(),
            max_pages: self.max_pages.clone(),
        }
    }

    pub fn resolve(&self) -> anyhow::Result<Settings> {
        Ok(Settings::from_raw(self.to_raw())?)
    }
}

/// How the browser is started
#[derive(Args, Debug, Clone, Default)]
pub struct BrowserArgs {
    /// Run Chrome without a window
    #[arg(long, conflicts_with = "headed")]
    pub headless: bool,

    /// Run Chrome with a visible window
    #[arg(long)]
    pub headed: bool,

    /// Path to the Chrome executable
    #[arg(long, env = "CHROME_PATH", value_name = "PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Reuse a named profile from ~/.jobhawk/profiles instead of a temporary one
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,
}

impl BrowserArgs {
    /// `None` leaves the choice to the platform default
    pub fn headless(&self) -> Option<bool> {
        match (self.headless, self.headed) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Marker error for a run the user stopped
#[derive(Debug)]
pub struct Interrupted;

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interrupted")
    }
}

impl std::error::Error for Interrupted {}

/// Map a failed command to the process exit code
pub fn exit_code(err: &anyhow::Error) -> u8 {
    if err.is::<Interrupted>() {
        EXIT_INTERRUPTED
    } else {
        EXIT_FAILURE
    }
}
