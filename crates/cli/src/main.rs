//! SaiaChain CLI: a small host for the SAIA conversational chain.
//!
//! Commands:
//! - `chat`        Single message or interactive chat with an assistant
//! - `assistants`  List the assistants a host would offer
//! - `prompt`      Print the assembled conversation prompt
//! - `config`      Show, locate or validate configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "saiachain",
    about = "SaiaChain: conversational chain host for SAIA assistants",
    version,
    author
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
    /// Chat with a SAIA assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Assistant to address (defaults to `chain.assistant` in config)
        #[arg(short, long)]
        assistant: Option<String>,

        /// Text prepended to the default system instructions
        #[arg(short, long)]
        system: Option<String>,

        /// Supporting document: a text file, or a JSON document list
        #[arg(short, long = "document", value_name = "FILE")]
        documents: Vec<PathBuf>,

        /// Answer with the local chat model instead of the assistant service
        #[arg(long)]
        local: bool,
    },

    /// List available assistants
    Assistants,

    /// Print the conversation prompt template
    Prompt {
        /// Text prepended to the default system instructions
        #[arg(short, long)]
        system: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the resolved configuration (key redacted)
    Show,
    /// Print the config file path
    Path,
    /// Validate the config file and environment
    Validate,
    /// Print a default config file
    Init,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let debug_env = std::env::var(saiachain_config::ENV_DEBUG).is_ok_and(|v| v == "true");
    let filter = if cli.verbose || debug_env { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat {
            message,
            assistant,
            system,
            documents,
            local,
        } => {
            commands::chat::run(commands::chat::ChatArgs {
                message,
                assistant,
                system,
                documents,
                local,
            })
            .await?
        }
        Commands::Assistants => commands::assistants::run().await?,
        Commands::Prompt { system } => commands::prompt::run(system).await?,
        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
            ConfigAction::Init => commands::config_cmd::init().await?,
        },
    }

    Ok(())
}
