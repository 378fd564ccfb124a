pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use creditsim_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "creditsim",
    about = "Credit budget simulator CLI",
    long_about = "Price credit budgets with the volume discount schedule, build mock quotes from the service catalog, and manage the local catalog database.",
    after_help = "Examples:\n  creditsim seed\n  creditsim simulate --budget 60000 --months 12 --add svc-ads --add svc-web\n  creditsim config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a creditsim.toml config file (must exist)")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the demo service catalog and verify it")]
    Seed,
    #[command(about = "List the service catalog ordered by name")]
    Catalog,
    #[command(about = "Price a budget and build a mock quote from catalog items")]
    Simulate(SimulateArgs),
    #[command(
        about = "Inspect effective configuration values with source attribution"
    )]
    Config,
}

#[derive(Clone, Debug, Default, Args)]
pub struct SimulateArgs {
    #[arg(long, help = "Budget as typed by the user; unparseable input counts as 0")]
    pub budget: Option<String>,
    #[arg(long, help = "Project duration in months; values below 1 count as 1")]
    pub months: Option<String>,
    #[arg(long = "add", value_name = "CATALOG_ID", help = "Add a catalog item (repeatable)")]
    pub add: Vec<String>,
    #[arg(
        long = "remove",
        value_name = "LINE_ID",
        help = "Remove a quote line by its numeric id after all additions (repeatable)"
    )]
    pub remove: Vec<u64>,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = LoadOptions {
        require_file: cli.config.is_some(),
        config_path: cli.config,
        ..LoadOptions::default()
    };

    // A broken config is reported by the command itself.
    if let Ok(config) = AppConfig::load(options.clone()) {
        if let Err(error) = init_logging(&config) {
            eprintln!("logging disabled: {error}");
        }
    }

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(&options),
        Command::Seed => commands::seed::run(&options),
        Command::Catalog => commands::catalog::run(&options),
        Command::Simulate(args) => commands::simulate::run(&options, &args),
        Command::Config => commands::config::run(&options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Sends log events to stderr so stdout carries only command payloads.
pub fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|error| anyhow::anyhow!(error))
}
