use super::session::{BrowserSession, interruptible, runtime};
use crate::{BrowserArgs, SettingsArgs};
use anyhow::Result;
use console::style;
use jobhawk_automation::export_session;
use jobhawk_core::Settings;
use std::path::{Path, PathBuf};

/// Log in with credentials and save the browser's cookies for later replay.
/// Without `output` the configured session file is overwritten.
pub fn execute(
    settings_args: &SettingsArgs,
    browser_args: &BrowserArgs,
    output: Option<&Path>,
) -> Result<()> {
    let settings = credential_settings(settings_args)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| settings.cookie_file.clone());

    let written: PathBuf = runtime()?.block_on(async {
        let session = BrowserSession::start(browser_args, &settings).await?;
        let result = interruptible(export_session(session.driver(), &settings, &output)).await;
        session.close().await;
        result
    })?;

    println!(
        "{} {}",
        style("Session cookies saved to").green(),
        written.display()
    );
    println!(
        "  {}",
        style("Replay them with --auth-method cookie --cookie-file <FILE>").dim()
    );
    Ok(())
}

/// Exporting always logs in with the form, whatever method is configured
fn credential_settings(args: &SettingsArgs) -> Result<Settings> {
    let mut raw = args.to_raw();
    raw.auth_method = Some("credentials".to_string());
    Ok(Settings::from_raw(raw)?)
}
