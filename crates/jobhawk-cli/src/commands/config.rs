use crate::SettingsArgs;
use anyhow::Result;
use console::style;

/// Print the resolved configuration, password masked
pub fn execute(settings_args: &SettingsArgs) -> Result<()> {
    let settings = settings_args.resolve()?;

    println!("{}", style("Resolved Configuration").bold().cyan());
    println!("{}", style("======================").cyan());

    let rows = settings.summary();
    let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, value) in rows {
        let value = if value.is_empty() {
            style("(empty)".to_string()).dim()
        } else {
            style(value)
        };
        println!("  {:<width$}  {}", key, value, width = width);
    }

    Ok(())
}
