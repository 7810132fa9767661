//! duel-replay: run a scripted duel and stream controller decisions.
//!
//! Usage:
//!   duel-replay --scenario demos/ship_vs_torpedo.json --ticks 60
//!   duel-replay --scenario duel.json --profiles profiles.json --seed 7 --json-logs
//!
//! Decisions go to stdout as one JSON object per line. Logs go to stderr.

mod config;
mod loader;

use std::io::{self, BufWriter, Write};

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use duel_sim::engine::{DuelEngine, SimConfig};

use crate::config::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter).with_writer(io::stderr);
    if config.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
    tracing::info!(config = ?config, "duel-replay starting");

    let scenario = loader::load_scenario(&config.scenario)?;
    let overrides = loader::load_profiles(config.profiles.as_deref())?;
    let mut engine = DuelEngine::new(
        &scenario,
        SimConfig {
            seed: config.seed,
            overrides,
        },
    )?;
    tracing::info!(
        scenario = %scenario.name,
        platforms = scenario.platforms.len(),
        ticks = config.ticks,
        "scenario loaded"
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut decisions = 0usize;
    for _ in 0..config.ticks {
        for record in engine.tick() {
            serde_json::to_writer(&mut out, &record)?;
            out.write_all(b"\n")?;
            decisions += 1;
        }
    }
    out.flush()?;

    tracing::info!(
        decisions,
        live_decoys = engine.live_decoys(),
        final_tick = engine.time().tick,
        "replay finished"
    );
    Ok(())
}
