//! `yeko-logger` command line.
//!
//! Operational companion to the library: validate a logging configuration
//! file before deploying it, or push a single record through the full
//! pipeline to check where it lands.
//!
//! ```text
//! yeko-logger check logging.toml --env production
//! yeko-logger emit --env test --level warning --category app.grades "Import slow"
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use yeko_logger::config::environment::server_environment;
use yeko_logger::config::loader::load_config;
use yeko_logger::config::presets::server_config;
use yeko_logger::engine::Engine;
use yeko_logger::{Environment, LogLevel, LoggerConfig, LoggerFactory};

#[derive(Parser)]
#[command(name = "yeko-logger")]
#[command(about = "Inspect and exercise Yeko logging configuration", long_about = None)]
struct Cli {
    /// Environment preset to start from (defaults to YEKO_ENV)
    #[arg(short, long, global = true)]
    env: Option<Environment>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a TOML config file and print the resolved configuration
    Check {
        /// Path to the config file
        file: PathBuf,
    },
    /// Write one record through a configured logger
    Emit {
        /// Optional TOML config file laid over the preset
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long, default_value = "info")]
        level: LogLevel,

        /// Dotted category path
        #[arg(long, default_value = "app")]
        category: String,

        message: String,
    },
}

fn resolve(env: Option<Environment>, file: Option<&PathBuf>) -> Result<LoggerConfig, Box<dyn std::error::Error>> {
    let base = server_config(env.unwrap_or_else(server_environment));
    match file {
        Some(path) => Ok(load_config(path, &base)?),
        None => Ok(base),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file } => {
            let config = resolve(cli.env, Some(&file))?;
            let engine = Engine::build(config.clone());

            println!("{}", serde_json::to_string_pretty(&config)?);
            let active: Vec<_> = engine.active_sinks().iter().map(|kind| kind.as_str()).collect();
            println!("active sinks: {}", active.join(", "));
            for skipped in engine.skipped() {
                eprintln!("skipped sink {}: {}", skipped.kind.as_str(), skipped.reason);
            }
        }
        Commands::Emit {
            config,
            level,
            category,
            message,
        } => {
            let config = resolve(cli.env, config.as_ref())?;
            let factory = LoggerFactory::global();
            factory.configure(config);

            let logger = factory.create(category.split('.'), None);
            match level {
                LogLevel::Debug => logger.debug(&message, None),
                LogLevel::Info => logger.info(&message, None),
                LogLevel::Warning => logger.warning(&message, None),
                LogLevel::Error => logger.error(&message, None, None),
                LogLevel::Fatal => logger.fatal(&message, None, None),
            }

            if let Some(memory) = factory.memory_sink() {
                for record in memory.take() {
                    println!("{}", yeko_logger::format::structured_formatter(&record));
                }
            }
            factory.shutdown();
        }
    }

    Ok(())
}
