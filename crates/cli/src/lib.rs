pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cascade_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat, LoggingConfig};

#[derive(Debug, Parser)]
#[command(
    name = "cascade",
    about = "Cascade contract pricing operator CLI",
    long_about = "Operate the contract pricing-term database: migrations, demo seeds, \
                  configuration inspection, readiness checks, and pricing reports.",
    after_help = "Examples:\n  cascade migrate\n  cascade seed\n  cascade price contract-demo-001"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a cascade.toml config file")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Override the database url")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo catalog and contract fixtures")]
    Seed,
    #[command(about = "Open a pricing session for a contract and report the resolved waterfall")]
    Price {
        #[arg(help = "Contract whose saved line items seed the session")]
        contract_id: String,
    },
    #[command(about = "Inspect effective configuration values after all layers applied")]
    Config,
    #[command(about = "Validate config and database readiness checks")]
    Doctor,
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                database_url: self.database_url.clone(),
                ..ConfigOverrides::default()
            },
        }
    }
}

/// Sets up diagnostics on stderr so the JSON command output on stdout stays
/// parseable. An explicit `RUST_LOG` wins; otherwise the configured level
/// applies. Safe to call more than once; later calls are ignored.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let _ = match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();

    // A broken config falls back to default logging here; the command itself
    // reports the configuration error.
    let logging = AppConfig::load(options.clone())
        .map(|config| config.logging)
        .unwrap_or_else(|_| AppConfig::default().logging);
    init_tracing(&logging);

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(options),
        Command::Seed => commands::seed::run(options),
        Command::Price { ref contract_id } => commands::price::run(options, contract_id),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(options) }
        }
        Command::Doctor => commands::doctor::run(options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
