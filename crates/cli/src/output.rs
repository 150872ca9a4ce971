// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use tickwork_core::SchedulerSnapshot;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Tasks running after one tick
#[derive(Debug, Serialize)]
pub struct TickReport {
    pub tick: u64,
    #[serde(flatten)]
    pub tasks: SchedulerSnapshot,
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tasks.names.is_empty() {
            write!(f, "tick {}: (idle)", self.tick)
        } else {
            write!(f, "tick {}: {}", self.tick, self.tasks.names.join(", "))
        }
    }
}

/// Print one line per value: text, or compact JSON for streaming
pub fn print_line<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", value),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string(value) {
                println!("{}", json);
            }
        }
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
