// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tickwork simulate` - Run the demo robot tick by tick

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tickwork_core::{Clock, FakeClock, Scheduler, SystemClock};
use tokio::time::{interval, MissedTickBehavior};

use super::load_config;
use crate::output::{self, OutputFormat, TickReport};
use crate::robot::Robot;

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of ticks to run
    #[arg(long, default_value_t = 50)]
    pub ticks: u64,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pace ticks against the wall clock instead of simulated time
    #[arg(long)]
    pub realtime: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub async fn simulate(args: SimulateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let period = config.period;

    let fake = FakeClock::new();
    let clock = if args.realtime {
        SystemClock::shared()
    } else {
        fake.shared()
    };
    let scheduler = Scheduler::with_clock(config, clock.clone());
    let robot = Robot::build(&scheduler, clock.clone(), period)?;
    tracing::info!(ticks = args.ticks, ?period, realtime = args.realtime, "simulation starting");

    let mut pacer = args.realtime.then(|| {
        let mut pacer = interval(period);
        pacer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        pacer
    });

    let started = clock.now();
    for tick in 1..=args.ticks {
        if let Some(pacer) = pacer.as_mut() {
            pacer.tick().await;
        }
        robot.set_tick(tick);
        if let Err(e) = scheduler.run() {
            tracing::error!(tick, error = %e, "tick faulted");
        }
        output::print_line(
            &TickReport {
                tick,
                tasks: scheduler.snapshot(),
            },
            args.format,
        );
        if pacer.is_none() {
            fake.advance(period);
        }
    }

    scheduler.cancel_all();
    tracing::info!(
        elapsed = ?clock.since(started),
        drive_cycles = robot.drive_cycles(),
        "simulation finished"
    );
    Ok(())
}
