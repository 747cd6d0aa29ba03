//! Headless session runner.
//!
//! Loads a level, plays a number of sessions in parallel with a scripted
//! bot and prints a summary per session.
//!
//! Usage:
//! `delve-harness --level levels/demo.json --sessions 8 --ticks 3600 --seed 1`
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use delve_core::{
    GameEvent, InputFrame, Intents, Phase, Session, SessionConfig, Snapshot, WorldDescriptor,
};
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "delve-harness")]
#[command(about = "Run seeded Delve sessions headless with a scripted bot")]
struct Cli {
    /// Level descriptor (JSON)
    #[arg(long, default_value = "levels/demo.json")]
    level: PathBuf,

    /// Number of sessions; seeds run from `--seed` upward
    #[arg(long, default_value_t = 4)]
    sessions: u64,

    /// Ticks per session
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Seed of the first session
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Session configuration (JSON); defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the first session's final snapshot here
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

// ============================================================================
// Bot
// ============================================================================

/// Wanders in a square, swings every few ticks and heals when low.
fn bot(session: &Session) -> InputFrame {
    let tick = session.tick();
    match session.phase() {
        Phase::GameOver => return InputFrame::new(Intents::RESPAWN),
        Phase::Dialogue(_) => return InputFrame::new(Intents::INTERACT),
        _ => {}
    }

    let walk = match (tick / 45) % 4 {
        0 => Intents::RIGHT,
        1 => Intents::DOWN,
        2 => Intents::LEFT,
        _ => Intents::UP,
    };
    let mut intents = walk;
    if tick % 6 == 0 {
        intents |= Intents::ATTACK;
    }
    if tick % 20 == 0 {
        intents |= Intents::INTERACT;
    }

    let player = &session.world().player;
    if player.health.current() < player.health.max() * 0.3 {
        intents |= Intents::USE_HEAL;
    }
    InputFrame::new(intents)
}

// ============================================================================
// Runs
// ============================================================================

#[derive(Debug, Default)]
struct Summary {
    seed: u64,
    ticks: u64,
    deaths: usize,
    slain: usize,
    pots: usize,
    pickups: usize,
    doors: usize,
    final_phase: Option<Phase>,
}

fn run(
    seed: u64,
    ticks: u64,
    config: &SessionConfig,
    level: &WorldDescriptor,
) -> Result<(Summary, Snapshot)> {
    let mut session = Session::new(seed, config.clone(), level.clone())
        .with_context(|| format!("creating session {seed}"))?;
    let mut summary = Summary {
        seed,
        ..Summary::default()
    };

    for _ in 0..ticks {
        let input = bot(&session);
        session.step(&input);
        for event in session.take_events() {
            match event {
                GameEvent::PlayerDied { .. } => summary.deaths += 1,
                GameEvent::HostileSlain { .. } => summary.slain += 1,
                GameEvent::ContainerBroken { .. } => summary.pots += 1,
                GameEvent::PickupCollected { .. } => summary.pickups += 1,
                GameEvent::DoorUnlocked { .. } => summary.doors += 1,
                _ => {}
            }
        }
        if session.exit_requested() {
            break;
        }
    }

    summary.ticks = session.tick();
    summary.final_phase = Some(session.phase());
    Ok((summary, session.snapshot()))
}

fn load_config(path: Option<&PathBuf>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    SessionConfig::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();
    let text = fs::read_to_string(&args.level)
        .with_context(|| format!("reading level {}", args.level.display()))?;
    let level = WorldDescriptor::from_json(&text)
        .with_context(|| format!("parsing level {}", args.level.display()))?;
    let config = load_config(args.config.as_ref())?;

    info!(
        level = %args.level.display(),
        sessions = args.sessions,
        ticks = args.ticks,
        "starting runs"
    );

    let results: Vec<(Summary, Snapshot)> = (0..args.sessions)
        .into_par_iter()
        .map(|i| run(args.seed.wrapping_add(i), args.ticks, &config, &level))
        .collect::<Result<_>>()?;

    for (summary, _) in &results {
        println!(
            "seed {:>6}  ticks {:>6}  phase {:?}  deaths {:>3}  slain {:>3}  pots {:>3}  pickups {:>3}  doors {:>2}",
            summary.seed,
            summary.ticks,
            summary.final_phase.unwrap_or(Phase::Start),
            summary.deaths,
            summary.slain,
            summary.pots,
            summary.pickups,
            summary.doors,
        );
    }

    if let (Some(path), Some((_, snapshot))) = (&args.snapshot, results.first()) {
        let json = snapshot.to_json().context("serializing snapshot")?;
        fs::write(path, json).with_context(|| format!("writing snapshot {}", path.display()))?;
        info!(path = %path.display(), "snapshot written");
    }

    Ok(())
}
