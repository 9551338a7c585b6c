mod admin;
mod config;
mod llmhandler;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dfir_copilot_core::{AnalysisMode, AnalyzeOptions};
use tracing::info;

#[derive(Parser)]
#[command(name = "dfircopilot")]
#[command(about = "DFIR Copilot: LLM-assisted analysis of search results via a local Ollama server")]
struct Cli {
    /// App directory holding default/ and local/ (default: parent of the binary's directory)
    #[arg(long, global = true, env = "DFIRCOPILOT_HOME")]
    app_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream JSON-lines events from stdin through the LLM, one result per chunk on stdout
    Llmhandler {
        /// Question for the LLM
        #[arg(long)]
        prompt: String,

        /// Model to use (default: from config)
        #[arg(long)]
        model: Option<String>,

        /// Events per chunk, 1-1000 (default: from config)
        #[arg(long)]
        chunk_size: Option<usize>,

        /// summary, detailed, forensic or threat_intelligence (default: from config)
        #[arg(long, value_parser = config::parse_mode)]
        analysis_mode: Option<AnalysisMode>,

        /// Maximum tokens for the response, 100-8000 (default: from config)
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Temperature, 0.0-1.0 (default: from config)
        #[arg(long)]
        temperature: Option<f32>,
    },

    /// Manage dfirvault.conf
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Manage llm_config.json
    LlmConfig {
        #[command(subcommand)]
        action: LlmConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print stored settings and the models the endpoint offers
    List,

    /// Probe the endpoint, then replace the stored settings
    Edit {
        /// Settings as KEY=VALUE (endpoint and model are required)
        #[arg(value_parser = config::parse_key_val)]
        args: Vec<(String, String)>,
    },

    /// Same as edit, for first-time setup
    Create {
        #[arg(value_parser = config::parse_key_val)]
        args: Vec<(String, String)>,
    },
}

#[derive(Subcommand)]
enum LlmConfigAction {
    /// Print the stored JSON document
    List,

    /// Overwrite the JSON document with the given KEY=VALUE pairs
    Save {
        #[arg(value_parser = config::parse_key_val)]
        args: Vec<(String, String)>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    // stdout carries records; logs go to stderr
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,dfir_copilot_core=info,dfircopilot=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app_root = config::resolve_app_root(cli.app_root);
    info!(target = "dfircopilot", root = %app_root.display(), "Using app root");

    match cli.command {
        Commands::Llmhandler {
            prompt,
            model,
            chunk_size,
            analysis_mode,
            max_tokens,
            temperature,
        } => {
            let opts = AnalyzeOptions {
                prompt,
                model,
                chunk_size,
                analysis_mode,
                max_tokens,
                temperature,
            };
            llmhandler::run(&app_root, opts).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::List => admin::config_list(&app_root).await?,
            ConfigAction::Edit { args } => {
                admin::config_edit(&app_root, config::into_args(args), false).await?
            }
            ConfigAction::Create { args } => {
                admin::config_edit(&app_root, config::into_args(args), true).await?
            }
        },
        Commands::LlmConfig { action } => match action {
            LlmConfigAction::List => admin::llm_config_list(&app_root)?,
            LlmConfigAction::Save { args } => {
                admin::llm_config_save(&app_root, config::into_args(args))?
            }
        },
    }

    Ok(())
}
