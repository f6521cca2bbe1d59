//! tsdocbot CLI - JSDoc generation for TypeScript repositories
//!
//! This binary provides the command-line interface for the tsdocbot system.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use tsdocbot::{check_repository, write_default_config};
use tsdocbot_core::config::Config;
use tsdocbot_engine::workspace::discover_repository_root;
use tsdocbot_engine::{DocEngine, LocalFileLister};
use tsdocbot_github::create_repository_host;
use tsdocbot_llm::create_synthesizer;

#[derive(Parser)]
#[command(name = "tsdocbot")]
#[command(about = "Adds missing JSDoc comments to TypeScript code and opens a pull request")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate missing documentation and open a pull request
    Generate {
        /// Only document the files changed by this pull request
        #[arg(long, value_name = "NUMBER")]
        pull_request: Option<u64>,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List missing documentation without changing anything
    Check {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a default .tsdocbot.toml into the repository root
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    let result = match cli.command {
        Some(Commands::Generate { pull_request, json }) => {
            let repo_root = find_repository_root()?;
            generate(&repo_root, cli.config.as_deref(), pull_request, json).await
        }
        Some(Commands::Check { json }) => {
            let repo_root = find_repository_root()?;
            check(&repo_root, cli.config.as_deref(), json)
        }
        Some(Commands::Init) => {
            let repo_root = find_repository_root()?;
            init(&repo_root)
        }
        None => {
            // Default behavior - show help
            println!("Run 'tsdocbot generate' to document the repository, or --help for more options");
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{e:#}");
        std::process::exit(1);
    }
    Ok(())
}

/// Initialize logging system
///
/// `RUST_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}={level},tsdocbot_core={level},tsdocbot_languages={level},\
             tsdocbot_llm={level},tsdocbot_github={level},tsdocbot_engine={level}",
            env!("CARGO_PKG_NAME")
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    Ok(())
}

/// Find the repository root directory
///
/// Outside a git checkout the current directory is used.
fn find_repository_root() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    match discover_repository_root(&current_dir) {
        Ok(root) => Ok(root),
        Err(e) => {
            debug!("{e}; using {}", current_dir.display());
            Ok(current_dir)
        }
    }
}

fn load_config(repo_root: &Path, config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load(config_path, repo_root).context("Failed to load configuration")?;
    debug!("Loaded configuration: {config:?}");
    Ok(config)
}

/// Run the full documentation workflow
async fn generate(
    repo_root: &Path,
    config_path: Option<&Path>,
    pull_request: Option<u64>,
    json: bool,
) -> Result<()> {
    let config = load_config(repo_root, config_path)?;
    config.validate_for_publishing()?;

    let pull_number = pull_request.or(config.repository.pull_number);
    let synthesizer =
        create_synthesizer(&config.llm).context("Failed to create comment synthesizer")?;
    let host =
        create_repository_host(&config.repository).context("Failed to create GitHub client")?;
    let lister = LocalFileLister::new(repo_root, &config.files)?;

    let mut engine = DocEngine::new(config, repo_root, Arc::new(lister), synthesizer, host)?;
    let report = engine
        .generate(pull_number)
        .await
        .context("Documentation run failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match &report.pull_request {
        Some(pull_request) => {
            println!(
                "Added {} comments to {} files: {}",
                report.comments_generated,
                report.modified_files.len(),
                pull_request.url
            );
        }
        None => println!("No missing documentation found"),
    }
    Ok(())
}

/// Report missing documentation; fails when anything is missing
fn check(repo_root: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(repo_root, config_path)?;
    config.validate()?;

    let report = check_repository(repo_root, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for file in &report.files {
            for missing in &file.missing {
                println!(
                    "{}:{}: {} {} is missing documentation",
                    file.path.display(),
                    missing.line,
                    missing.kind,
                    missing.name
                );
            }
        }
        for path in &report.skipped {
            println!("{}: skipped (unreadable or invalid TypeScript)", path.display());
        }
    }

    let missing = report.missing_count();
    info!(
        "Checked {} files: {} documented, {missing} missing",
        report.files.len(),
        report.documented_count()
    );
    if missing > 0 {
        anyhow::bail!("{missing} declarations are missing documentation");
    }
    Ok(())
}

fn init(repo_root: &Path) -> Result<()> {
    match write_default_config(repo_root)? {
        Some(path) => println!("Created {}", path.display()),
        None => println!("Configuration already exists, nothing to do"),
    }
    Ok(())
}
