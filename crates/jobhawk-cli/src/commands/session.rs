//! Browser lifetime for the commands that drive the site.
//!
//! A [`BrowserSession`] owns the Chrome process and its profile directory for
//! one command. Work against the driver runs through [`interruptible`] so
//! Ctrl+C stops it, and [`BrowserSession::close`] is called on every path
//! afterwards.

use crate::{BrowserArgs, Interrupted};
use anyhow::{Context, Result};
use jobhawk_browser::{
    BrowserDriver, ChromeFinder, ChromiumDriver, ChromiumLauncher, LaunchOptions, ProfileManager,
};
use jobhawk_core::Settings;
use std::future::Future;

pub struct BrowserSession {
    driver: ChromiumDriver,
    // Dropped after the driver so Chrome is gone before a temporary profile is removed
    _profile: ProfileManager,
}

impl BrowserSession {
    pub async fn launch(args: &BrowserArgs, settings: &Settings) -> Result<Self> {
        let finder = ChromeFinder::new(args.chrome_path.clone());
        let chrome_path = finder.find().context("Could not locate Chrome")?;

        let profile = match &args.profile {
            Some(name) => ProfileManager::named(name)?,
            None => ProfileManager::temporary()?,
        };
        tracing::debug!("Using profile directory {}", profile.path().display());

        let launcher = ChromiumLauncher::new(LaunchOptions {
            chrome_path,
            profile_path: profile.path().to_path_buf(),
            headless: args.headless(),
            timeouts: settings.timeouts,
        });
        let driver = launcher.launch().await.context("Failed to start Chrome")?;

        Ok(Self {
            driver,
            _profile: profile,
        })
    }

    /// Launch unless Ctrl+C arrives first. An abandoned launch drops the
    /// half-started browser and its temporary profile.
    pub async fn start(args: &BrowserArgs, settings: &Settings) -> Result<Self> {
        interruptible(Self::launch(args, settings)).await
    }

    pub fn driver(&self) -> &ChromiumDriver {
        &self.driver
    }

    /// Shut the browser down. A failure here never fails the command.
    pub async fn close(mut self) {
        if let Err(e) = self.driver.quit().await {
            tracing::warn!("Failed to close browser cleanly: {}", e);
        }
    }
}

/// Run `work` unless Ctrl+C arrives first
pub async fn interruptible<T, E>(work: impl Future<Output = std::result::Result<T, E>>) -> Result<T>
where
    E: Into<anyhow::Error>,
{
    interrupted_by(work, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn interrupted_by<T, E>(
    work: impl Future<Output = std::result::Result<T, E>>,
    stop: impl Future<Output = ()>,
) -> Result<T>
where
    E: Into<anyhow::Error>,
{
    tokio::select! {
        result = work => result.map_err(Into::into),
        _ = stop => {
            tracing::warn!("Interrupted, shutting down");
            Err(Interrupted.into())
        }
    }
}

pub fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}
