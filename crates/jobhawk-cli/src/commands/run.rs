use super::session::{BrowserSession, interruptible, runtime};
use crate::{BrowserArgs, SettingsArgs};
use anyhow::{Context, Result};
use console::style;
use jobhawk_automation::{FilterOutcome, HarvestOptions, RunSummary, run_pipeline};
use std::fs;
use std::path::Path;

pub fn execute(
    settings_args: &SettingsArgs,
    browser_args: &BrowserArgs,
    dedupe: bool,
    output: Option<&Path>,
) -> Result<()> {
    let settings = settings_args.resolve()?;
    let options = HarvestOptions::from_settings(&settings).with_dedupe(dedupe);

    let summary = runtime()?.block_on(async {
        let session = BrowserSession::start(browser_args, &settings).await?;
        let result = interruptible(run_pipeline(session.driver(), &settings, options)).await;
        session.close().await;
        result
    })?;

    print_summary(&summary);

    if let Some(path) = output {
        write_links(path, &summary.harvest.links)?;
        println!(
            "\n{} {}",
            style("Links written to").green(),
            path.display()
        );
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let harvest = &summary.harvest;

    if !summary.results_rendered {
        println!("{}", style("Search results did not render").yellow());
    }
    if summary.filter == FilterOutcome::Unavailable {
        println!(
            "{}",
            style("Easy Apply filter unavailable; links come from unfiltered results").yellow()
        );
    }

    println!("\n{}", style("Easy Apply Jobs").bold().cyan());
    println!("{}", style("===============").cyan());

    if harvest.links.is_empty() {
        println!("{}", style("No Easy Apply jobs found").yellow());
    }
    for (i, link) in harvest.links.iter().enumerate() {
        println!("{:>4}. {}", i + 1, link);
    }

    println!(
        "\n{} {}",
        style("Total Easy Apply jobs found:").bold(),
        style(harvest.links.len()).green().bold()
    );
    println!(
        "  {}",
        style(format!(
            "{} pages, {} cards, {} without Easy Apply, {} unreadable, {} duplicates",
            harvest.pages,
            harvest.cards,
            harvest.skipped_no_badge,
            harvest.skipped_unreadable,
            harvest.duplicates
        ))
        .dim()
    );
    if harvest.hit_page_ceiling {
        println!(
            "  {}",
            style("Stopped at the page limit; raise --max-pages to read further").yellow()
        );
    }
}

/// Write links as a JSON array
pub fn write_links(path: &Path, links: &[String]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(links)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
