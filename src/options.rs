//! Command-line options for the `tetron-sim` runner.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::engine::SessionConfig;
use crate::types::GameMode;

/// Simulated frames when neither `--ticks` nor `TETRON_TICKS` is given
pub const DEFAULT_TICKS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimOptions {
    pub mode: GameMode,
    pub classic: bool,
    pub seed: u64,
    pub ticks: u64,
    pub rows: Option<usize>,
    pub columns: Option<usize>,
    pub opponents: Option<usize>,
    pub report: Option<PathBuf>,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            mode: GameMode::Solo,
            classic: false,
            seed: 1,
            ticks: DEFAULT_TICKS,
            rows: None,
            columns: None,
            opponents: None,
            report: None,
        }
    }
}

impl SimOptions {
    /// Defaults with `TETRON_SEED` and `TETRON_TICKS` applied
    pub fn from_env() -> Self {
        let seed = env::var("TETRON_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(1);
        let ticks = env::var("TETRON_TICKS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_TICKS);

        Self {
            seed,
            ticks,
            ..Default::default()
        }
    }

    /// Session settings for these options (validated by the coordinator)
    pub fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::for_mode(self.mode);
        config.seed = self.seed;
        config.game.classic_mode = self.classic;
        if let Some(rows) = self.rows {
            config.game.row_count = rows;
        }
        if let Some(columns) = self.columns {
            config.game.column_count = columns;
        }
        if let Some(opponents) = self.opponents {
            config.ai_opponents = opponents;
        }
        config
    }
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing value for {}", flag))
}

fn number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T> {
    let v = value(args, i, flag)?;
    v.parse::<T>()
        .map_err(|_| anyhow!("invalid {} value: {}", flag, v))
}

/// Parse flags (without the program name) on top of `base`
pub fn parse_sim_args(args: &[String], base: SimOptions) -> Result<SimOptions> {
    let mut opts = base;
    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--mode" => {
                i += 1;
                let v = value(args, i, flag)?;
                opts.mode = GameMode::from_str(v)
                    .ok_or_else(|| anyhow!("unknown mode: {} (solo, twin, versus, battle)", v))?;
            }
            "--classic" => opts.classic = true,
            "--seed" => {
                i += 1;
                opts.seed = number(args, i, flag)?;
            }
            "--ticks" => {
                i += 1;
                opts.ticks = number(args, i, flag)?;
            }
            "--rows" => {
                i += 1;
                opts.rows = Some(number(args, i, flag)?);
            }
            "--columns" => {
                i += 1;
                opts.columns = Some(number(args, i, flag)?);
            }
            "--opponents" => {
                i += 1;
                opts.opponents = Some(number(args, i, flag)?);
            }
            "--report" => {
                i += 1;
                opts.report = Some(PathBuf::from(value(args, i, flag)?));
            }
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
        i += 1;
    }
    Ok(opts)
}
