use std::path::PathBuf;

use clap::Parser;

/// Replay a scripted duel and print every controller decision as JSON lines.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Scenario JSON file.
    #[arg(long, env = "DUEL_SCENARIO")]
    pub scenario: PathBuf,

    /// Optional per-role profile overrides (JSON).
    #[arg(long, env = "DUEL_PROFILES")]
    pub profiles: Option<PathBuf>,

    #[arg(long, env = "DUEL_SEED", default_value_t = 42)]
    pub seed: u64,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 120)]
    pub ticks: u64,

    /// Emit logs as JSON instead of plain text.
    #[arg(long)]
    pub json_logs: bool,
}
