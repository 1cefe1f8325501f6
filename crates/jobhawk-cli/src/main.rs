use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use console::style;
use jobhawk_cli::{BrowserArgs, SettingsArgs, commands, exit_code};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "jobhawk")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Collect Easy Apply job links from LinkedIn job search",
    long_about = "Jobhawk drives a Chrome browser to sign in to LinkedIn, run a job search, \
                  turn on the Easy Apply filter and collect the job links from every result page."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, search and print every Easy Apply job link
    Run {
        #[command(flatten)]
        settings: SettingsArgs,

        #[command(flatten)]
        browser: BrowserArgs,

        /// Drop links already seen on an earlier page
        #[arg(long)]
        dedupe: bool,

        /// Also write the links to this file as a JSON array
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Sign in and report whether it worked
    CheckAuth {
        #[command(flatten)]
        settings: SettingsArgs,

        #[command(flatten)]
        browser: BrowserArgs,
    },

    /// Sign in with credentials and save the session cookies for replay
    ExportCookies {
        #[command(flatten)]
        settings: SettingsArgs,

        #[command(flatten)]
        browser: BrowserArgs,

        /// Where to write the cookies (defaults to the configured cookie file)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show the resolved configuration
    Config {
        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for jobhawk.

SUPPORTED SHELLS:
    bash, zsh, fish, powershell, elvish

INSTALLATION:
    bash:  jobhawk completion --shell bash >> ~/.bashrc
    zsh:   jobhawk completion --shell zsh > ~/.zfunc/_jobhawk
    fish:  jobhawk completion --shell fish > ~/.config/fish/completions/jobhawk.fish")]
    Completion {
        /// Shell to generate the script for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            settings,
            browser,
            dedupe,
            output,
        } => commands::run::execute(&settings, &browser, dedupe, output.as_deref()),
        Commands::CheckAuth { settings, browser } => {
            commands::check_auth::execute(&settings, &browser)
        }
        Commands::ExportCookies {
            settings,
            browser,
            output,
        } => commands::export::execute(&settings, &browser, output.as_deref()),
        Commands::Config { settings } => commands::config::execute(&settings),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("jobhawk=debug")
    } else {
        EnvFilter::new("jobhawk=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
