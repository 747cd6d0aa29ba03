//! Session phase state machine.
//!
//! ```text
//!            Initialized           Pause
//!   Start ──────────────► Playing ───────► Paused
//!                          │  ▲  ◄───────
//!              OpenDialogue│  │   Resume
//!                          ▼  │CloseDialogue
//!                        Dialogue
//!
//!   Playing ──PlayerDied──► GameOver ──Respawn──► Playing
//! ```
//!
//! Exactly one phase is active at a time. Triggers that make no sense in the
//! current phase are ignored: [`Phase::next`] returns `None`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::interaction::DialogueState;

/// Active phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Created, world not yet populated.
    #[default]
    Start,
    /// Simulation running.
    Playing,
    /// Simulation frozen.
    Paused,
    /// Merchant menu open; simulation frozen.
    Dialogue(DialogueState),
    /// Player is dead; waiting for respawn.
    GameOver,
}

/// Reasons to change phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseTrigger {
    /// World populated for the first time.
    Initialized,
    /// Pause pressed while playing.
    Pause,
    /// Pause pressed while paused.
    Resume,
    /// Player talked to a merchant.
    OpenDialogue(EntityId),
    /// Player left the merchant menu.
    CloseDialogue,
    /// Player health reached zero.
    PlayerDied,
    /// Player asked to start over.
    Respawn,
}

impl Phase {
    /// Applies `trigger`, returning the new phase if the transition is legal.
    ///
    /// # Example
    ///
    /// ```
    /// use delve_core::phase::{Phase, PhaseTrigger};
    ///
    /// assert_eq!(Phase::Start.next(PhaseTrigger::Initialized), Some(Phase::Playing));
    /// assert_eq!(Phase::Paused.next(PhaseTrigger::PlayerDied), None);
    /// ```
    #[must_use]
    pub fn next(self, trigger: PhaseTrigger) -> Option<Self> {
        match (self, trigger) {
            (Self::Start, PhaseTrigger::Initialized)
            | (Self::Paused, PhaseTrigger::Resume)
            | (Self::Dialogue(_), PhaseTrigger::CloseDialogue)
            | (Self::GameOver, PhaseTrigger::Respawn) => Some(Self::Playing),
            (Self::Playing, PhaseTrigger::Pause) => Some(Self::Paused),
            (Self::Playing, PhaseTrigger::OpenDialogue(merchant)) => {
                Some(Self::Dialogue(DialogueState::new(merchant)))
            }
            (Self::Playing, PhaseTrigger::PlayerDied) => Some(Self::GameOver),
            _ => None,
        }
    }

    /// Returns `true` while the simulation is running.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns the open dialogue, if any.
    #[must_use]
    pub const fn dialogue(&self) -> Option<&DialogueState> {
        match self {
            Self::Dialogue(state) => Some(state),
            _ => None,
        }
    }

    /// Short lowercase name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Dialogue(_) => "dialogue",
            Self::GameOver => "game_over",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
