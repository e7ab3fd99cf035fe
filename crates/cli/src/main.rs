//! Sourcer CLI, the main entry point.
//!
//! Commands:
//! - `query`   Route a query to an agent and print the response
//! - `health`  Print the service identity
//! - `config`  Print the effective configuration (secrets omitted)

use clap::{Parser, Subcommand};
use sourcer_config::{AppConfig, LoggingConfig};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "sourcer",
    about = "Sourcer: web search, retrieval and synthesis",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a question
    Query {
        /// Agent to route to: search, analyze or generate
        #[arg(short, long)]
        agent: Option<String>,

        /// The query text
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Print service status, version and name
    Health {
        /// Also check that the configured model endpoint answers
        #[arg(long)]
        check_provider: bool,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    init_tracing(&logging, cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Query { agent, text } => {
            let config = config.map_err(|e| format!("Failed to load config: {e}"))?;
            commands::query::run(config, agent, text).await?
        }
        Commands::Health { check_provider } => {
            if check_provider {
                let config = config.map_err(|e| format!("Failed to load config: {e}"))?;
                commands::health::run(Some(&config)).await?
            } else {
                commands::health::run(None).await?
            }
        }
        Commands::Config => {
            let config = config.map_err(|e| format!("Failed to load config: {e}"))?;
            commands::config_cmd::run(&config)
        }
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig, verbose: bool, json: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so stdout carries only the response
    if json || logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}
