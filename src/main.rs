//! Douban-Roast main entry point
//!
//! This is the command-line interface: it scrapes a user's watched list and
//! prints the roast produced by the configured model.

use anyhow::Context;
use clap::Parser;
use douban_roast::config::{load_config_with_hash, Config, FailurePolicy};
use douban_roast::output::{compute_statistics, print_statistics, render_items, OutputFormat};
use douban_roast::roast::Roaster;
use douban_roast::{validate_user_id, AppError, ItemRecord, Paginator};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const INVALID_USER_ID: &str = "请输入有效的豆瓣用户 ID";
const NO_ITEMS: &str = "未找到电影记录或用户主页私密，无法生成吐槽。";

/// Douban-Roast: have your Douban watched list roasted
///
/// Scrapes up to a configured number of pages of a user's "watched" list
/// and asks an OpenAI-compatible model to critique the user's taste.
#[derive(Parser, Debug)]
#[command(name = "douban-roast")]
#[command(version = "1.0.0")]
#[command(about = "Roast a Douban user's movie taste", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Douban user id (the part after /people/ in the profile URL)
    #[arg(value_name = "USER_ID")]
    user_id: String,

    /// Print the scraped list and exit without contacting the model
    #[arg(long)]
    list_only: bool,

    /// Format of the scraped list
    #[arg(long, value_enum, default_value_t = OutputFormat::List)]
    format: OutputFormat,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // A missing .env is fine; the key may come from the real environment
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let user_id = match validate_user_id(&cli.user_id) {
        Ok(id) => id.to_string(),
        Err(_) => {
            eprintln!("{}", INVALID_USER_ID);
            return ExitCode::from(2);
        }
    };

    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            eprintln!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, &config, &user_id).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::NoItems(_)) => {
            eprintln!("{}", NO_ITEMS);
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("Roast failed: {}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("douban_roast=info,warn"),
            1 => EnvFilter::new("douban_roast=debug,info"),
            2 => EnvFilter::new("douban_roast=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads and validates configuration
fn load(cli: &Cli) -> anyhow::Result<Config> {
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("cannot use config {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Scrapes, then roasts unless `--list-only` was given
async fn run(cli: &Cli, config: &Config, user_id: &str) -> Result<(), AppError> {
    let items = handle_scrape(config, user_id).await?;

    if !cli.quiet {
        print_statistics(&compute_statistics(&items));
    }

    if cli.list_only {
        print_items(&items, cli.format)?;
        return Ok(());
    }

    handle_roast(config, user_id, &items, cli.format).await
}

/// Runs the scrape; an empty list is reported as `NoItems`
async fn handle_scrape(config: &Config, user_id: &str) -> Result<Vec<ItemRecord>, AppError> {
    tracing::info!("Received request for user ID: {}", user_id);

    let paginator = Paginator::from_config(&config.source)?;
    let items = paginator.scrape_all(user_id).await?;

    if items.is_empty() {
        return Err(AppError::NoItems(user_id.to_string()));
    }

    Ok(items)
}

/// Generates and prints the roast, applying the configured failure policy
async fn handle_roast(
    config: &Config,
    user_id: &str,
    items: &[ItemRecord],
    format: OutputFormat,
) -> Result<(), AppError> {
    let outcome = match Roaster::from_config(&config.roast) {
        Ok(roaster) => roaster.roast(user_id, items).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(roast) => {
            println!("{}", roast);
            Ok(())
        }
        Err(e) => match config.roast.on_failure {
            FailurePolicy::Fail => Err(e.into()),
            FailurePolicy::ShowItems => {
                tracing::warn!("Roast generation failed, showing scraped items instead: {}", e);
                eprintln!("生成吐槽失败: {}", e);
                print_items(items, format)
            }
        },
    }
}

fn print_items(items: &[ItemRecord], format: OutputFormat) -> Result<(), AppError> {
    let rendered = render_items(items, format)
        .map_err(|e| AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    println!("{}", rendered);
    Ok(())
}
