//! Per-tick input supplied by the input collaborator.
//!
//! The core never polls devices. Each tick the caller hands
//! [`Session::step`](crate::session::Session::step) an [`InputFrame`] whose
//! [`Intents`] say what the player wants. Movement and attack are held
//! intents (set every tick the key is down); everything else is an edge,
//! set once per press.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::player::Facing;

bitflags! {
    /// Player intents for one tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Intents: u32 {
        /// Move up (held).
        const UP = 1 << 0;
        /// Move down (held).
        const DOWN = 1 << 1;
        /// Move left (held).
        const LEFT = 1 << 2;
        /// Move right (held).
        const RIGHT = 1 << 3;
        /// Attack with the equipped tool (held).
        const ATTACK = 1 << 4;
        /// Drink a health bottle.
        const USE_HEAL = 1 << 5;
        /// Equip the sword.
        const EQUIP_MELEE = 1 << 6;
        /// Equip the bow.
        const EQUIP_RANGED = 1 << 7;
        /// Use the door or merchant in reach; also closes a dialogue.
        const INTERACT = 1 << 8;
        /// Move the dialogue cursor up.
        const CURSOR_UP = 1 << 9;
        /// Move the dialogue cursor down.
        const CURSOR_DOWN = 1 << 10;
        /// Confirm the highlighted dialogue entry.
        const CONFIRM = 1 << 11;
        /// Toggle pause.
        const PAUSE = 1 << 12;
        /// Ask the host to exit.
        const QUIT = 1 << 13;
        /// Start over after death.
        const RESPAWN = 1 << 14;

        /// All four movement directions.
        const MOVEMENT = Self::UP.bits() | Self::DOWN.bits() | Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

/// Everything the input collaborator reports for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputFrame {
    /// Active intents.
    pub intents: Intents,
}

impl InputFrame {
    /// Creates a frame with the given intents.
    #[must_use]
    pub const fn new(intents: Intents) -> Self {
        Self { intents }
    }

    /// A frame with nothing pressed.
    #[must_use]
    pub const fn idle() -> Self {
        Self::new(Intents::empty())
    }

    /// Returns `true` if every intent in `intents` is active.
    #[must_use]
    pub const fn pressed(&self, intents: Intents) -> bool {
        self.intents.contains(intents)
    }

    /// Raw movement direction, each component in `{-1, 0, 1}`.
    ///
    /// Opposing keys do not cancel: right wins over left and down wins over
    /// up, matching the order the keys are read in.
    #[must_use]
    pub fn movement(&self) -> Vec2 {
        let x = if self.pressed(Intents::RIGHT) {
            1.0
        } else if self.pressed(Intents::LEFT) {
            -1.0
        } else {
            0.0
        };
        let y = if self.pressed(Intents::DOWN) {
            1.0
        } else if self.pressed(Intents::UP) {
            -1.0
        } else {
            0.0
        };
        Vec2::new(x, y)
    }

    /// Facing implied by movement keys, if any are held.
    ///
    /// Keys are read left, right, up, down and the last held one wins, so
    /// vertical input takes priority on diagonals.
    #[must_use]
    pub fn facing(&self) -> Option<Facing> {
        [
            (Intents::DOWN, Facing::Down),
            (Intents::UP, Facing::Up),
            (Intents::RIGHT, Facing::Right),
            (Intents::LEFT, Facing::Left),
        ]
        .into_iter()
        .find(|(intent, _)| self.pressed(*intent))
        .map(|(_, facing)| facing)
    }
}

impl From<Intents> for InputFrame {
    fn from(intents: Intents) -> Self {
        Self::new(intents)
    }
}
