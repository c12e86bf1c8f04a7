use clap::{Parser, Subcommand};
use pomocycle_core::Settings;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;
mod terminal;

#[derive(Parser)]
#[command(name = "pomocycle", version, about = "Pomodoro timer in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the timer interactively
    Run,
    /// Show current config and today's totals
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recent sessions, newest first
    History {
        /// Number of sessions to show
        #[arg(long, default_value = "10")]
        limit: usize,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete all recorded sessions
    ClearHistory,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// `POMOCYCLE_LOG` wins over the `log_filter` setting.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("POMOCYCLE_LOG").unwrap_or_else(|_| {
        let settings = Settings::load_or_default();
        EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"))
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Run => commands::run::run(),
        Commands::Status { json } => commands::status::run(json),
        Commands::History { limit, json } => commands::history::run(limit, json),
        Commands::ClearHistory => commands::history::clear(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
