//! Test helper functions for setting up sessions and driving input.
//!
//! Every level built here puts the player on tile (4, 4): tile rectangle
//! `256..320` on both axes, hit rectangle `270.5..305.5`.

use crate::config::SessionConfig;
use crate::descriptor::{HostileSpawn, SpawnKind, TilePos, TileRect, WorldDescriptor};
use crate::entity::EntityTag;
use crate::input::{InputFrame, Intents};
use crate::phase::Phase;
use crate::session::Session;
use crate::world::GameEvent;

// =============================================================================
// Level Setup
// =============================================================================

/// Player start tile for every helper level.
pub const SPAWN: TilePos = TilePos::new(4, 4);

/// An empty level with the player on [`SPAWN`].
pub fn empty_level() -> WorldDescriptor {
    WorldDescriptor {
        player_spawn: Some(SPAWN),
        ..WorldDescriptor::default()
    }
}

/// A melee hostile placement.
pub fn hostile_at(x: i32, y: i32) -> HostileSpawn {
    HostileSpawn {
        x,
        y,
        kind: SpawnKind::Melee,
    }
}

/// A single-tile wall.
pub fn wall_at(x: i32, y: i32) -> TileRect {
    TileRect { x, y, w: 1, h: 1 }
}

/// A walled room around the spawn: tiles 1..=8 on both axes are the border.
pub fn walled_room() -> WorldDescriptor {
    WorldDescriptor {
        walls: vec![
            TileRect { x: 1, y: 1, w: 8, h: 1 },
            TileRect { x: 1, y: 8, w: 8, h: 1 },
            TileRect { x: 1, y: 2, w: 1, h: 6 },
            TileRect { x: 8, y: 2, w: 1, h: 6 },
        ],
        ..empty_level()
    }
}

/// Default configuration with hostiles that never pursue.
pub fn idle_hostiles() -> SessionConfig {
    let mut config = SessionConfig::default();
    config.hostile.aggro_radius = 0.0;
    config
}

// =============================================================================
// Session Driving
// =============================================================================

/// Creates a session and runs the start tick so it is `Playing`.
pub fn playing(seed: u64, config: SessionConfig, descriptor: WorldDescriptor) -> Session {
    let mut session = Session::new(seed, config, descriptor).unwrap();
    session.step(&InputFrame::idle());
    assert_eq!(session.phase(), Phase::Playing);
    session.take_events();
    session
}

/// Holds `intents` for `ticks` ticks.
pub fn hold(session: &mut Session, intents: Intents, ticks: usize) {
    let frame = InputFrame::new(intents);
    for _ in 0..ticks {
        session.step(&frame);
    }
}

/// Runs `ticks` ticks with no input.
pub fn idle(session: &mut Session, ticks: usize) {
    hold(session, Intents::empty(), ticks);
}

/// Presses `intents` for a single tick.
pub fn tap(session: &mut Session, intents: Intents) {
    hold(session, intents, 1);
}

/// Input for scripted runs: a fixed, seed-independent pattern of walking,
/// turning and attacking.
pub fn scripted_input(tick: u64) -> InputFrame {
    let walk = match (tick / 40) % 4 {
        0 => Intents::RIGHT,
        1 => Intents::DOWN,
        2 => Intents::LEFT,
        _ => Intents::UP,
    };
    let attack = if tick % 7 == 0 {
        Intents::ATTACK
    } else {
        Intents::empty()
    };
    let swap = match tick % 150 {
        75 => Intents::EQUIP_RANGED,
        149 => Intents::EQUIP_MELEE,
        _ => Intents::empty(),
    };
    InputFrame::new(walk | attack | swap)
}

// =============================================================================
// Inspection
// =============================================================================

/// Number of live entities of one kind.
pub fn live(session: &Session, tag: EntityTag) -> usize {
    session.world().arena.count_tag(tag)
}

/// Most recent notification text.
pub fn latest_notice(session: &Session) -> Option<String> {
    session
        .world()
        .notifications
        .latest()
        .map(|n| n.text.clone())
}

/// Counts journal events matching `pred`.
pub fn count_events(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}
