use crate::selectors::{LOGIN_BUTTON, LOGIN_ERROR, PASSWORD_INPUT, USERNAME_INPUT};
use jobhawk_browser::{BrowserDriver, Waiter};
use jobhawk_core::{AuthStrategy, Credentials, SessionStore, Settings};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Budget for the post-submit navigation
pub const LOGIN_TRANSITION_TIMEOUT: Duration = Duration::from_secs(15);

/// Budget for the best-effort read of the inline login error
pub const LOGIN_ERROR_TIMEOUT: Duration = Duration::from_secs(3);

const COOKIE_REJECT_MARKERS: [&str; 2] = ["/login", "/authwall"];
const LOGIN_REJECT_MARKERS: [&str; 2] = ["/login", "/checkpoint"];

/// Why authentication did not succeed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("no usable session file")]
    NoUsableSessionFile,

    #[error("redirected to login")]
    RedirectedToLogin,

    #[error("login form not found")]
    LoginFormNotFound,

    #[error("sign-in button not found")]
    SubmitNotFound,

    #[error("no navigation after submit")]
    NoNavigationAfterSubmit,

    #[error("still on login or checkpoint page after submit")]
    StillOnLogin,

    #[error("invalid auth method '{0}' (valid options: 'cookie' or 'credentials')")]
    InvalidAuthMethod(String),

    #[error("browser error: {0}")]
    Browser(String),
}

impl From<jobhawk_browser::Error> for AuthFailure {
    fn from(err: jobhawk_browser::Error) -> Self {
        AuthFailure::Browser(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated,
    Failed {
        reason: AuthFailure,
        /// Extra context, e.g. the error message the login page rendered
        detail: Option<String>,
    },
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated)
    }
}

impl fmt::Display for AuthOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthOutcome::Authenticated => f.write_str("authenticated"),
            AuthOutcome::Failed {
                reason,
                detail: Some(detail),
            } => write!(f, "{} ({})", reason, detail),
            AuthOutcome::Failed { reason, .. } => write!(f, "{}", reason),
        }
    }
}

/// Step an authentication attempt was in when it finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    Selecting,
    LoadingFile,
    InjectingCookies,
    Verifying,
    Navigating,
    EnteringCredentials,
    Submitting,
    AwaitingTransition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthReport {
    pub outcome: AuthOutcome,
    pub stage: AuthStage,
    pub cookies_injected: usize,
    /// Records dropped from the file plus those the browser refused
    pub cookies_rejected: usize,
}

impl AuthReport {
    fn new() -> Self {
        Self {
            outcome: AuthOutcome::Authenticated,
            stage: AuthStage::Selecting,
            cookies_injected: 0,
            cookies_rejected: 0,
        }
    }

    fn enter(&mut self, stage: AuthStage) {
        tracing::debug!("Authentication stage: {:?}", stage);
        self.stage = stage;
    }
}

/// Runs exactly one of the two login strategies
pub struct Authenticator<'a, D: BrowserDriver> {
    driver: &'a D,
    settings: &'a Settings,
    waiter: Waiter<'a, D>,
}

impl<'a, D: BrowserDriver> Authenticator<'a, D> {
    pub fn new(driver: &'a D, settings: &'a Settings) -> Self {
        Self {
            driver,
            settings,
            waiter: Waiter::new(driver, settings.timeouts.explicit_wait),
        }
    }

    /// Authenticate with the configured strategy. Never fails past this
    /// point: every problem ends up in the report's outcome.
    pub async fn authenticate(&self) -> AuthReport {
        let mut report = AuthReport::new();
        tracing::info!("Authentication method: {}", self.settings.auth.name());

        let result = match &self.settings.auth {
            AuthStrategy::CookieReplay => self.replay_cookies(&mut report).await,
            AuthStrategy::CredentialLogin(credentials) => {
                self.login_with_credentials(credentials, &mut report).await
            }
            AuthStrategy::Unrecognized(method) => {
                Err((AuthFailure::InvalidAuthMethod(method.clone()), None))
            }
        };

        report.outcome = match result {
            Ok(()) => {
                tracing::info!("Authentication successful");
                AuthOutcome::Authenticated
            }
            Err((reason, detail)) => {
                tracing::warn!(
                    "Authentication failed during {:?}: {}{}",
                    report.stage,
                    reason,
                    detail.as_deref().map(|d| format!(" ({})", d)).unwrap_or_default()
                );
                AuthOutcome::Failed { reason, detail }
            }
        };
        report
    }

    async fn replay_cookies(&self, report: &mut AuthReport) -> Result<(), Failure> {
        let path = &self.settings.cookie_file;

        report.enter(AuthStage::LoadingFile);
        let session = SessionStore::load(path).map_err(|e| {
            tracing::warn!("Cannot use session file {}: {}", path.display(), e);
            (AuthFailure::NoUsableSessionFile, Some(e.to_string()))
        })?;
        tracing::info!("Found {} cookies in {}", session.total(), path.display());
        report.cookies_rejected = session.rejected;

        report.enter(AuthStage::InjectingCookies);
        self.driver
            .navigate(self.settings.base_url.as_str())
            .await
            .map_err(browser_failure)?;

        for cookie in &session.cookies {
            match self.driver.add_cookie(cookie).await {
                Ok(()) => report.cookies_injected += 1,
                Err(e) => {
                    tracing::warn!("Could not add cookie '{}': {}", cookie.name, e);
                    report.cookies_rejected += 1;
                }
            }
        }
        tracing::info!(
            "Added {} of {} cookies to browser",
            report.cookies_injected,
            session.total()
        );

        report.enter(AuthStage::Verifying);
        self.driver.refresh().await.map_err(browser_failure)?;
        self.driver
            .navigate(&self.settings.route("/feed"))
            .await
            .map_err(browser_failure)?;

        let landed = self.driver.current_url().await.map_err(browser_failure)?;
        if contains_marker(&landed, &COOKIE_REJECT_MARKERS) {
            return Err((AuthFailure::RedirectedToLogin, Some(landed)));
        }

        Ok(())
    }

    async fn login_with_credentials(
        &self,
        credentials: &Credentials,
        report: &mut AuthReport,
    ) -> Result<(), Failure> {
        tracing::info!("Logging in as: {}", credentials.username);

        report.enter(AuthStage::Navigating);
        self.driver
            .navigate(&self.settings.route("/login"))
            .await
            .map_err(browser_failure)?;
        let login_url = self.driver.current_url().await.map_err(browser_failure)?;

        match self.submit_credentials(credentials, &login_url, report).await {
            Err((reason, None)) => Err((reason, self.inline_error().await)),
            other => other,
        }
    }

    async fn submit_credentials(
        &self,
        credentials: &Credentials,
        login_url: &str,
        report: &mut AuthReport,
    ) -> Result<(), Failure> {
        report.enter(AuthStage::EnteringCredentials);
        for (locator, text) in [
            (&USERNAME_INPUT, credentials.username.as_str()),
            (&PASSWORD_INPUT, credentials.password.as_str()),
        ] {
            let field = self.waiter.until_visible(locator).await.map_err(|e| {
                tracing::debug!("{}", e);
                (AuthFailure::LoginFormNotFound, None)
            })?;
            self.driver.clear(&field).await.map_err(browser_failure)?;
            self.driver.type_text(&field, text).await.map_err(browser_failure)?;
        }

        report.enter(AuthStage::Submitting);
        let submit = self
            .waiter
            .until_interactable(&LOGIN_BUTTON)
            .await
            .map_err(|_| (AuthFailure::SubmitNotFound, None))?;
        self.driver.click(&submit).await.map_err(browser_failure)?;

        report.enter(AuthStage::AwaitingTransition);
        let landed = self
            .waiter
            .with_timeout(LOGIN_TRANSITION_TIMEOUT)
            .until_url_changes(login_url)
            .await
            .map_err(|_| (AuthFailure::NoNavigationAfterSubmit, None))?;

        if contains_marker(&landed, &LOGIN_REJECT_MARKERS) {
            tracing::debug!("Login landed on {}", landed);
            return Err((AuthFailure::StillOnLogin, None));
        }

        Ok(())
    }

    /// Text of the login page's inline error, if one is rendered
    async fn inline_error(&self) -> Option<String> {
        let waiter = self.waiter.with_timeout(LOGIN_ERROR_TIMEOUT);
        let element = waiter.until_visible(&LOGIN_ERROR).await.ok()?;
        match self.driver.text(&element).await {
            Ok(text) => text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::debug!("Could not read login error message: {}", e);
                None
            }
        }
    }
}

type Failure = (AuthFailure, Option<String>);

fn browser_failure(err: jobhawk_browser::Error) -> Failure {
    (AuthFailure::from(err), None)
}

fn contains_marker(url: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| url.contains(m))
}
