//! Headless session runner (default binary).
//!
//! Plays a whole session at the fixed tick cadence with every human seat driven
//! by an autopilot planner, then prints a JSON report. Useful for soak runs,
//! seed bisection and balancing.
//!
//! ```text
//! tetron-sim --mode battle --seed 7 --ticks 20000 --report run.json
//! ```

use std::fs;

use anyhow::{Context, Result};

use tetron::engine::{AiPlanner, SessionCoordinator, SessionEvent};
use tetron::options::{parse_sim_args, SimOptions};
use tetron::report::{EventRecord, SessionReport};
use tetron::types::TICK_MS;

/// Frames between progress lines
const PROGRESS_EVERY: u64 = 6000;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = parse_sim_args(&args, SimOptions::from_env())?;

    let report = run(&opts)?;
    let json = serde_json::to_string_pretty(&report)?;
    match &opts.report {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("writing report to {}", path.display()))?;
            println!("[Sim] Report written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn run(opts: &SimOptions) -> Result<SessionReport> {
    let config = opts.session_config();
    let mut session = SessionCoordinator::new(config)
        .with_context(|| format!("invalid {} session", opts.mode.as_str()))?;

    let humans: Vec<usize> = session.human_indices().collect();
    let mut autopilots: Vec<AiPlanner> = humans
        .iter()
        .map(|&i| AiPlanner::new(opts.seed.wrapping_add(0x5EED + i as u64)))
        .collect();

    eprintln!(
        "[Sim] mode={} seed={} humans={} ai={} board={}x{}",
        opts.mode.as_str(),
        opts.seed,
        config.humans,
        config.ai_opponents,
        config.game.row_count,
        config.game.column_count,
    );

    session.start();
    let mut events = Vec::new();
    let mut ticks = 0u64;

    while ticks < opts.ticks && session.is_running() {
        for (planner, &index) in autopilots.iter_mut().zip(&humans) {
            if let Some(game) = session.human_game_mut(index) {
                planner.step(game);
            }
        }

        let event = session.tick(TICK_MS);
        ticks += 1;

        if let Some(event) = event {
            match event {
                SessionEvent::StageAdvanced(stage) => {
                    eprintln!("[Session] Stage {} at tick {}", stage, ticks)
                }
                SessionEvent::Won => eprintln!("[Session] Won at tick {}", ticks),
                SessionEvent::Lost => eprintln!("[Session] Lost at tick {}", ticks),
            }
            events.push(EventRecord::new(ticks, event));
        }

        if ticks % PROGRESS_EVERY == 0 {
            eprintln!(
                "[Sim] tick={} score={} survivors={}",
                ticks,
                session.score(),
                session.survivors()
            );
        }
    }

    eprintln!(
        "[Sim] Finished after {} ticks ({} ms simulated)",
        ticks,
        ticks * TICK_MS
    );
    Ok(SessionReport::from_session(&session, ticks, events))
}
