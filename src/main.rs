//! R.A.D.A.R. - structured intelligence engine for the terminal.
//!
//! Walks raw intelligence through Retrieve, Analyze, Document, Advise and
//! Report, interactively or in one shot.

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use radar::ai::provider_from_config;
use radar::core::{Config, ProviderKind};
use radar::{
    tui, App, Classification, IntelligenceClient, Report, ReportFormat, RetrievalData, Session,
};

/// Structured intelligence engine: Retrieve, Analyze, Document, Advise, Report
#[derive(Parser)]
#[command(name = "radar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive session (default)
    Run,

    /// Run the whole flow on one input and print the report
    Analyze(AnalyzeArgs),

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Show the configured AI provider and whether it is reachable
    Status,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Source origin of the material (e.g. "OSINT Feed")
    #[arg(short, long)]
    source: String,

    /// Classification level (defaults to the configured one)
    #[arg(short, long)]
    classification: Option<Classification>,

    /// Raw content to analyze
    #[arg(long, conflicts_with = "file")]
    content: Option<String>,

    /// Read the content from a file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// AI provider override (gemini, claude, openai, ollama)
    #[arg(short, long)]
    provider: Option<ProviderKind>,

    /// Model override
    #[arg(short, long)]
    model: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; the TUI owns the terminal, so it stays quiet unless verbose
    let interactive = matches!(cli.command, None | Some(Commands::Run));
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else if interactive {
        EnvFilter::new("off")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    // API keys may live in a local .env
    dotenvy::dotenv().ok();

    // Handle commands
    match cli.command {
        None | Some(Commands::Run) => {
            cmd_run()?;
        }
        Some(Commands::Analyze(args)) => {
            cmd_analyze(args)?;
        }
        Some(Commands::Config { path }) => {
            cmd_config(path)?;
        }
        Some(Commands::Status) => {
            cmd_status()?;
        }
        Some(Commands::Completions { shell }) => {
            cmd_completions(shell);
        }
    }

    Ok(())
}

/// Build the client for the configured provider.
fn build_client(config: &Config) -> Result<IntelligenceClient> {
    let provider = provider_from_config(&config.ai)
        .with_context(|| format!("Cannot use AI provider '{}'", config.ai.provider))?;
    Ok(IntelligenceClient::new(provider))
}

/// Run the interactive TUI.
fn cmd_run() -> Result<()> {
    let config = Config::load()?;
    let client = build_client(&config)?;

    tui::run_tui(App::new(config, client))
}

/// Run a session end to end and print its report.
fn cmd_analyze(args: AnalyzeArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(provider) = args.provider {
        config.ai.provider = provider;
        // A model name belongs to the provider it was configured for.
        config.ai.model = None;
        config.ai.base_url = None;
    }
    if let Some(model) = args.model {
        config.ai.model = Some(model);
    }

    let content = match (&args.content, &args.file) {
        (Some(content), _) => content.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("Failed to read content from stdin")?;
            buf
        }
    };

    let classification = args.classification.unwrap_or(config.general.default_classification);
    let data = RetrievalData::new(content, &args.source, classification)?;
    let client = build_client(&config)?;

    let rt = tokio::runtime::Runtime::new()?;
    let mut session = Session::new();
    rt.block_on(session.run_to_report(&client, data))?;

    let report = Report::from_state(session.state())?;
    println!("{}", report.render(args.format)?.trim_end());

    Ok(())
}

/// Show configuration.
fn cmd_config(show_path: bool) -> Result<()> {
    if show_path {
        match Config::find_config_file() {
            Some(path) => println!("{}", path.display()),
            None => {
                if let Some(path) = Config::config_dir() {
                    println!("{}", path.join("config.toml").display());
                }
            }
        }
        return Ok(());
    }

    let config = Config::load()?;
    let toml = toml::to_string_pretty(&config)?;
    println!("{toml}");

    Ok(())
}

/// Show provider status.
fn cmd_status() -> Result<()> {
    let config = Config::load()?;
    println!("Provider: {}", config.ai.provider);
    if let Some(model) = &config.ai.model {
        println!("Model:    {model}");
    }

    let client = match provider_from_config(&config.ai) {
        Ok(provider) => IntelligenceClient::new(provider),
        Err(e) => {
            println!("Status:   not configured ({e})");
            return Ok(());
        }
    };

    let rt = tokio::runtime::Runtime::new()?;
    if rt.block_on(client.is_available()) {
        println!("Status:   available");
    } else {
        println!("Status:   unreachable");
    }

    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "radar", &mut io::stdout());
}
