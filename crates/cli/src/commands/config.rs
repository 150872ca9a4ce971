// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tickwork config [--config PATH]` - Show the effective configuration

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::load_config;
use crate::output;

#[derive(Args)]
pub struct ConfigArgs {
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn config(args: ConfigArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    output::print_json(&config)
}
