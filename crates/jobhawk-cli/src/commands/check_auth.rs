use super::session::{BrowserSession, interruptible, runtime};
use crate::{BrowserArgs, SettingsArgs};
use anyhow::Result;
use console::style;
use jobhawk_automation::{AuthReport, Authenticator};
use jobhawk_core::AuthStrategy;

/// Authenticate and report the outcome without searching
pub fn execute(settings_args: &SettingsArgs, browser_args: &BrowserArgs) -> Result<()> {
    let settings = settings_args.resolve()?;

    let report = runtime()?.block_on(async {
        let session = BrowserSession::start(browser_args, &settings).await?;
        let result = interruptible(async {
            Ok::<_, anyhow::Error>(Authenticator::new(session.driver(), &settings).authenticate().await)
        })
        .await;
        session.close().await;
        result
    })?;

    print_report(&report, &settings.auth);

    if report.outcome.is_authenticated() {
        Ok(())
    } else {
        anyhow::bail!(report.outcome.to_string())
    }
}

fn print_report(report: &AuthReport, auth: &AuthStrategy) {
    println!("\n{}", style("Authentication Check").bold().cyan());
    println!("{}", style("====================").cyan());
    println!("  Method:  {}", auth.name());

    if matches!(auth, AuthStrategy::CookieReplay) {
        println!(
            "  Cookies: {} injected, {} rejected",
            report.cookies_injected, report.cookies_rejected
        );
    }

    if report.outcome.is_authenticated() {
        println!("  Result:  {}", style("authenticated").green().bold());
    } else {
        println!("  Result:  {}", style("failed").red().bold());
        println!("  Stage:   {:?}", report.stage);
        println!("  Reason:  {}", style(&report.outcome).dim());
    }
}
