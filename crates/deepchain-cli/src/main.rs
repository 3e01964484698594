//! DeepChain CLI - progressive refinement over a local Ollama model
//!
//! Usage:
//!   deepchain                   Interactive session (same as `deepchain chat`)
//!   deepchain ask <query>       Answer a single query and exit
//!   deepchain init              Write a default .deepchain/config.toml

mod render;
mod session;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deepchain_agent::{GenerationService, OllamaClient};
use deepchain_core::{DeepChainConfig, DegradePolicy, Locale};
use deepchain_orchestrator::{PipelineController, ProgressObserver, TurnOutcome};
use render::{banner, render_outcome, ConsoleObserver, OutputFormat};
use session::{run_session, SessionEnd};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "deepchain")]
#[command(author, version, about = "Three-cycle progressive refinement with answer synthesis")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory containing .deepchain/config.toml
    #[arg(long, global = true, default_value = ".")]
    config_dir: PathBuf,

    /// Model identifier (overrides config)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Ollama base URL (overrides OLLAMA_HOST and config)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Template and message language: en or ru (overrides config)
    #[arg(long, global = true)]
    locale: Option<Locale>,

    /// How response/synthesis failures are reported: embed or abort (overrides config)
    #[arg(long, global = true)]
    degrade: Option<DegradePolicy>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session
    Chat,

    /// Answer one query and exit
    Ask {
        /// Query text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Write a default configuration file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging (stderr, so rendered answers stay clean on stdout)
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Some(Commands::Init) = cli.command {
        return cmd_init(&cli.config_dir);
    }

    let config = load_config(&cli)?;
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let client = OllamaClient::from_config(&config.generation, cli.url.as_deref())
        .context("Failed to set up the generation backend")?;
    info!("Using Ollama at {}", client.base_url());

    match cli.command {
        Some(Commands::Ask { query }) => cmd_ask(client, &config, &query.join(" "), format).await,
        Some(Commands::Chat) | None => cmd_chat(client, &config, format).await,
        Some(Commands::Init) => Ok(()),
    }
}

/// Load the config file and apply command-line overrides
fn load_config(cli: &Cli) -> Result<DeepChainConfig> {
    let mut config = DeepChainConfig::load_or_default(&cli.config_dir)
        .context("Failed to load configuration")?;

    if let Some(model) = &cli.model {
        config.generation.model = model.clone();
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if let Some(degrade) = cli.degrade {
        config.degrade = degrade;
    }

    Ok(config)
}

/// Controller for a CLI session; progress lines only go with text output
fn build_controller<S: GenerationService>(
    service: S,
    config: &DeepChainConfig,
    format: OutputFormat,
) -> PipelineController<S> {
    let controller = PipelineController::from_config(service, config);
    match progress_observer(config.locale, format) {
        Some(observer) => controller.with_observer(observer),
        None => controller,
    }
}

fn progress_observer(locale: Locale, format: OutputFormat) -> Option<Arc<dyn ProgressObserver>> {
    match format {
        OutputFormat::Text => Some(Arc::new(ConsoleObserver::new(locale))),
        OutputFormat::Json => None,
    }
}

fn cmd_init(config_dir: &std::path::Path) -> Result<()> {
    let path = DeepChainConfig::write_default(config_dir)
        .context("Failed to write default configuration")?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

async fn cmd_ask(
    client: OllamaClient,
    config: &DeepChainConfig,
    query: &str,
    format: OutputFormat,
) -> Result<()> {
    let controller = build_controller(client, config, format);

    let outcome = controller.run_turn(query).await;
    match &outcome {
        TurnOutcome::Success(_) => {
            println!("{}", render_outcome(&outcome, config.locale, format));
            Ok(())
        }
        TurnOutcome::Failure(_) => {
            eprintln!("{}", render_outcome(&outcome, config.locale, format));
            std::process::exit(1);
        }
    }
}

async fn cmd_chat(
    client: OllamaClient,
    config: &DeepChainConfig,
    format: OutputFormat,
) -> Result<()> {
    let controller = build_controller(client, config, format);

    println!("{}", banner(controller.model()));

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let (end, stats) = run_session(&controller, stdin, &mut stdout, format, interrupt).await?;

    info!(
        "Session ended ({:?}) after {} turn(s), {} failed",
        end, stats.turns, stats.failed_turns
    );
    if end == SessionEnd::Interrupted {
        std::process::exit(130);
    }
    Ok(())
}
