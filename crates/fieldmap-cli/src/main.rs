/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! fieldmap-expr - command-line driver for mapping expressions

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod input;
mod output;

#[derive(Parser)]
#[command(name = "fieldmap-expr")]
#[command(version)]
#[command(about = "Parse and edit mapping expressions", long_about = None)]
struct Cli {
    /// TOML file with engine settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print a JSON report instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an expression against a mapping
    Parse(commands::parse::ParseArgs),

    /// Generate the initial expression from the mapped source fields
    Init(commands::init::InitArgs),

    /// Parse an expression, then reconcile it with the mapping's fields
    Sync(commands::sync::SyncArgs),
}

fn run(cli: Cli) -> Result<bool> {
    let options = commands::Options {
        config: cli.config,
        json: cli.json,
    };
    match cli.command {
        Commands::Parse(args) => commands::parse::execute(args, &options),
        Commands::Init(args) => commands::init::execute(args, &options),
        Commands::Sync(args) => commands::sync::execute(args, &options),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
