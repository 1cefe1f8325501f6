use crate::chromium::ChromiumDriver;
use crate::{Error, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use jobhawk_core::Timeouts;
use std::path::PathBuf;

/// Options for starting a browser session
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub chrome_path: PathBuf,
    pub profile_path: PathBuf,
    /// `None` picks headless on Linux and a visible window elsewhere
    pub headless: Option<bool>,
    pub timeouts: Timeouts,
}

/// Starts Chromium and hands back a driver for its first page
pub struct ChromiumLauncher {
    options: LaunchOptions,
}

impl ChromiumLauncher {
    pub fn new(options: LaunchOptions) -> Self {
        Self { options }
    }

    /// Resolve the headless choice for this platform
    pub fn headless(&self) -> bool {
        self.options
            .headless
            .unwrap_or(cfg!(target_os = "linux"))
    }

    /// Launch Chromium and open a blank page
    pub async fn launch(&self) -> Result<ChromiumDriver> {
        let headless = self.headless();
        tracing::info!(
            "Launching Chrome from {} (headless: {})",
            self.options.chrome_path.display(),
            headless
        );

        let mut builder = BrowserConfig::builder()
            .chrome_executable(&self.options.chrome_path)
            .user_data_dir(&self.options.profile_path)
            .request_timeout(self.options.timeouts.implicit_wait)
            .window_size(1920, 1080)
            .args(self.build_args());

        if headless {
            builder = builder.new_headless_mode().no_sandbox();
        } else {
            builder = builder.with_head();
        }

        let config = builder
            .build()
            .map_err(|e| Error::Browser(format!("Invalid browser configuration: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::Browser(format!("Failed to launch Chrome: {}", e)))?;

        // The handler must be polled for any CDP command to complete
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(e.into());
            }
        };

        tracing::info!("Browser session ready");

        Ok(ChromiumDriver::new(
            browser,
            page,
            handler_task,
            self.options.timeouts.page_load,
        ))
    }

    /// Extra Chrome flags on top of the chromiumoxide defaults
    fn build_args(&self) -> Vec<String> {
        let mut args = vec![];

        if self.headless() {
            args.push("--disable-dev-shm-usage".to_string());
        }

        args.extend(
            [
                "--disable-gpu",
                "--disable-extensions",
                "--disable-popup-blocking",
                "--start-maximized",
                "--disable-blink-features=AutomationControlled",
            ]
            .map(String::from),
        );

        args
    }
}
