//! # credschema CLI entry point
//!
//! Parses command-line arguments, loads configuration, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use credschema_cli::config::CliConfig;
use credschema_cli::generate::{run_generate, GenerateArgs};
use credschema_cli::import::{run_import, ImportArgs};
use credschema_cli::query::{run_query, QueryArgs};
use credschema_cli::validate::{run_validate, ValidateArgs};

/// Verifiable-credential schema and ZK query toolchain.
///
/// Generates JSON Schema and JSON-LD context documents from an attribute
/// tree, imports existing schemas, compiles zero-knowledge proof queries,
/// and validates credential subjects.
#[derive(Parser, Debug)]
#[command(name = "credschema", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write outputs under this directory instead of printing them.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a credential JSON Schema and JSON-LD context from a session file.
    Generate(GenerateArgs),

    /// Import an existing credential JSON Schema into a session file.
    Import(ImportArgs),

    /// Compile a query-builder state into a ZK query, query objects, or request.
    Query(QueryArgs),

    /// Validate a credential subject against a credential schema.
    Validate(ValidateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(1);
        }
    };
    tracing::debug!(?config, "loaded configuration");

    let output_dir = cli.output_dir.as_deref();
    let result = match &cli.command {
        Commands::Generate(args) => run_generate(args, &config, output_dir),
        Commands::Import(args) => run_import(args, &config, output_dir),
        Commands::Query(args) => run_query(args, &config, output_dir),
        Commands::Validate(args) => run_validate(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
