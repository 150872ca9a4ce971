// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tickwork - drive a simulated control loop

mod commands;
mod output;
mod robot;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, simulate};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "tickwork",
    version,
    about = "Tickwork - cooperative task scheduling for control loops"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demo robot for a number of ticks
    Simulate(simulate::SimulateArgs),
    /// Print the effective scheduler configuration
    Config(config::ConfigArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Simulate(args) => simulate::simulate(args).await,
        Commands::Config(args) => config::config(args),
    }
}
