//! fmmaker CLI: entry point.
//!
//! # Commands
//!
//! - `fmmaker run --prompt P --output DIR [FILES...]`: process a batch
//! - `fmmaker models [--service S]`: list available models
//! - `fmmaker settings show|set`: view or change stored settings
//! - `fmmaker status`: show settings, cache, and provider status

mod helpers;
mod models_cmd;
mod run_cmd;
mod settings_cmd;
mod status;

use anyhow::Result;
use clap::{Parser, Subcommand};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Front-Matter Maker: prepend LLM-written front matter to text files
#[derive(Parser)]
#[command(name = "fmmaker", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a prompt template with each file and write `<name>.md` outputs
    Run(run_cmd::RunArgs),

    /// List the models available for a service
    Models {
        /// Service name (defaults to the stored setting)
        #[arg(short, long)]
        service: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// View or change stored settings
    Settings {
        #[command(subcommand)]
        action: settings_cmd::SettingsCommands,
    },

    /// Show settings, model cache, and provider status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            init_logging(args.logs);
            run_cmd::run(args).await
        }
        Commands::Models { service, logs } => {
            init_logging(logs);
            models_cmd::run(service).await
        }
        Commands::Settings { action } => {
            init_logging(false);
            settings_cmd::dispatch(action)
        }
        Commands::Status => {
            init_logging(false);
            status::run()
        }
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new(
            "fmmaker=debug,fmmaker_core=debug,fmmaker_providers=debug,fmmaker_batch=debug,info",
        )
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
