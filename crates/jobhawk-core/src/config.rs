use crate::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.linkedin.com";
pub const DEFAULT_COOKIE_FILE: &str = "cookie.json";
pub const DEFAULT_KEYWORDS: &str = "Software Engineer";
pub const DEFAULT_LOCATION: &str = "Remote";
pub const DEFAULT_IMPLICIT_WAIT_SECS: u64 = 10;
pub const DEFAULT_PAGE_LOAD_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_EXPLICIT_WAIT_SECS: u64 = 15;
pub const DEFAULT_MAX_PAGES: usize = 100;

/// Unvalidated settings as they arrive from flags or the environment
#[derive(Debug, Clone, Default)]
pub struct RawSettings {
    pub base_url: Option<String>,
    pub auth_method: Option<String>,
    pub cookie_file: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub keywords: Option<String>,
    pub location: Option<String>,
    pub implicit_wait: Option<String>,
    pub page_load_timeout: Option<String>,
    pub explicit_wait: Option<String>,
    pub max_pages: Option<String>,
}

/// How the run authenticates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Replay cookies from the session file
    CookieReplay,
    /// Fill in the login form
    CredentialLogin(Credentials),
    /// A method name that matched neither strategy
    Unrecognized(String),
}

impl AuthStrategy {
    pub fn name(&self) -> &str {
        match self {
            AuthStrategy::CookieReplay => "cookie",
            AuthStrategy::CredentialLogin(_) => "credentials",
            AuthStrategy::Unrecognized(raw) => raw,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Keyword/location pair submitted to the job search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    keyword: String,
    location: String,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            location: location.into(),
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Upper bound for a single browser command
    pub implicit_wait: Duration,
    pub page_load: Duration,
    /// Default budget for explicit condition waits
    pub explicit_wait: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            implicit_wait: Duration::from_secs(DEFAULT_IMPLICIT_WAIT_SECS),
            page_load: Duration::from_secs(DEFAULT_PAGE_LOAD_TIMEOUT_SECS),
            explicit_wait: Duration::from_secs(DEFAULT_EXPLICIT_WAIT_SECS),
        }
    }
}

/// Resolved configuration, built once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: Url,
    pub auth: AuthStrategy,
    pub cookie_file: PathBuf,
    pub query: SearchQuery,
    pub timeouts: Timeouts,
    pub max_pages: usize,
}

impl Settings {
    /// Validate raw values, falling back to defaults where allowed
    pub fn from_raw(raw: RawSettings) -> Result<Self> {
        let base_url = match non_empty(raw.base_url) {
            Some(value) => Url::parse(&value).unwrap_or_else(|e| {
                tracing::warn!("Invalid base URL '{}' ({}), using {}", value, e, DEFAULT_BASE_URL);
                default_base_url()
            }),
            None => default_base_url(),
        };

        let method = non_empty(raw.auth_method)
            .map(|m| m.to_lowercase())
            .unwrap_or_else(|| "cookie".to_string());

        let auth = match method.as_str() {
            "cookie" => AuthStrategy::CookieReplay,
            "credentials" => {
                let username = non_empty(raw.username);
                let password = non_empty(raw.password);
                match (username, password) {
                    (Some(username), Some(password)) => {
                        AuthStrategy::CredentialLogin(Credentials { username, password })
                    }
                    _ => {
                        return Err(Error::Configuration(
                            "LINKEDIN_USERNAME and LINKEDIN_PASSWORD must be set for the credentials method"
                                .to_string(),
                        ));
                    }
                }
            }
            _ => AuthStrategy::Unrecognized(method),
        };

        let cookie_file = non_empty(raw.cookie_file)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_COOKIE_FILE));

        let query = SearchQuery::new(
            non_empty(raw.keywords).unwrap_or_else(|| DEFAULT_KEYWORDS.to_string()),
            raw.location
                .map(|l| l.trim().to_string())
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        );

        let timeouts = Timeouts {
            implicit_wait: seconds(raw.implicit_wait, "implicit wait", DEFAULT_IMPLICIT_WAIT_SECS),
            page_load: seconds(
                raw.page_load_timeout,
                "page load timeout",
                DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
            ),
            explicit_wait: seconds(raw.explicit_wait, "explicit wait", DEFAULT_EXPLICIT_WAIT_SECS),
        };

        let max_pages = parse_positive(raw.max_pages, "max pages", DEFAULT_MAX_PAGES as u64) as usize;

        Ok(Self {
            base_url,
            auth,
            cookie_file,
            query,
            timeouts,
            max_pages,
        })
    }

    /// Absolute URL for a site route such as `/feed`
    pub fn route(&self, path: &str) -> String {
        match self.base_url.join(path) {
            Ok(url) => url.into(),
            Err(_) => format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path),
        }
    }

    /// Key/value view for display, with the password masked
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("Base URL", self.base_url.to_string()),
            ("Auth method", self.auth.name().to_string()),
            ("Cookie file", self.cookie_file.display().to_string()),
        ];
        if let AuthStrategy::CredentialLogin(creds) = &self.auth {
            rows.push(("Username", creds.username.clone()));
            rows.push(("Password", "********".to_string()));
        }
        rows.extend([
            ("Keywords", self.query.keyword().to_string()),
            ("Location", self.query.location().to_string()),
            ("Implicit wait", format!("{}s", self.timeouts.implicit_wait.as_secs())),
            ("Page load timeout", format!("{}s", self.timeouts.page_load.as_secs())),
            ("Explicit wait", format!("{}s", self.timeouts.explicit_wait.as_secs())),
            ("Max pages", self.max_pages.to_string()),
        ]);
        rows
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth: AuthStrategy::CookieReplay,
            cookie_file: PathBuf::from(DEFAULT_COOKIE_FILE),
            query: SearchQuery::new(DEFAULT_KEYWORDS, DEFAULT_LOCATION),
            timeouts: Timeouts::default(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_positive(value: Option<String>, label: &str, default: u64) -> u64 {
    match non_empty(value) {
        Some(v) => match v.parse::<u64>() {
            Ok(n) if n > 0 => n,
            _ => {
                tracing::warn!("Invalid {} '{}', using default {}", label, v, default);
                default
            }
        },
        None => default,
    }
}

/// Upper bound for any configured wait
pub const MAX_WAIT_SECS: u64 = 600;

fn seconds(value: Option<String>, label: &str, default: u64) -> Duration {
    let secs = parse_positive(value, label, default);
    if secs > MAX_WAIT_SECS {
        tracing::warn!(
            "{} of {}s exceeds the {}s limit, using default {}",
            label,
            secs,
            MAX_WAIT_SECS,
            default
        );
        return Duration::from_secs(default);
    }
    Duration::from_secs(secs)
}
