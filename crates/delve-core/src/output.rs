//! Outputs: the only way behaviors ask for anything to change.
//!
//! Behaviors read the world through a [`WorldView`](crate::plugin::WorldView)
//! and return a list of outputs. Resolvers then apply them. Behaviors never
//! touch the arena, so no collection is mutated while it is being iterated.
//!
//! Outputs come in three categories, used to route them to resolvers:
//! - [`Command`]: requested actions (move, fire, interact)
//! - [`Modifier`]: value changes (damage, healing, collection)
//! - [`Event`]: notices with no state effect of their own
//!
//! Every output travels in an [`OutputEnvelope`] that records which behavior
//! on which entity produced it, on which tick, and in what order.
//!
//! # Example
//!
//! ```
//! use delve_core::entity::EntityId;
//! use delve_core::output::{Modifier, Output, OutputEnvelope, OutputKind, PluginId, PluginInstanceId};
//!
//! let envelope = OutputEnvelope::new(
//!     Output::Modifier(Modifier::ApplyDamage {
//!         source: EntityId::new(3),
//!         target: EntityId::PLAYER,
//!         amount: 10.0,
//!     }),
//!     PluginInstanceId::new(EntityId::new(3), PluginId::new("contact_damage")),
//!     120,
//!     0,
//! );
//!
//! assert_eq!(envelope.kind(), OutputKind::Modifier);
//! assert_eq!(envelope.source().entity_id(), EntityId::new(3));
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::EntityId;
use crate::player::{Facing, Tool};

// =============================================================================
// Plugin Identification Types
// =============================================================================

/// Name of a behavior type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginId(String);

impl PluginId {
    /// Creates a new `PluginId`.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PluginId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One behavior running on one entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginInstanceId {
    entity_id: EntityId,
    plugin_id: PluginId,
}

impl PluginInstanceId {
    /// Creates a new instance identifier.
    #[must_use]
    pub fn new(entity_id: EntityId, plugin_id: PluginId) -> Self {
        Self {
            entity_id,
            plugin_id,
        }
    }

    /// Entity the behavior ran on.
    #[must_use]
    pub const fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// Behavior type.
    #[must_use]
    pub fn plugin_id(&self) -> &PluginId {
        &self.plugin_id
    }
}

impl fmt::Display for PluginInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.plugin_id, self.entity_id)
    }
}

// =============================================================================
// Output Categories
// =============================================================================

/// Requested actions.
///
/// Resolvers may reject a command, for instance when its target was removed
/// earlier in the same stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Move an entity by `velocity * dt`, resolving collisions per axis.
    Move {
        /// Entity to move (the player, a hostile or a projectile).
        target: EntityId,
        /// Desired velocity in px/s.
        velocity: Vec2,
    },
    /// Turn the player.
    Face {
        /// New facing.
        facing: Facing,
    },
    /// Swap the player's weapon.
    Equip {
        /// Weapon to hold.
        tool: Tool,
    },
    /// Loose an arrow if the player has one.
    FireProjectile {
        /// Spawn point (projectile center).
        origin: Vec2,
        /// Flight direction.
        facing: Facing,
    },
    /// Remove a projectile.
    Retire {
        /// Projectile to remove.
        target: EntityId,
    },
    /// Use a door or open a merchant dialogue.
    Interact {
        /// Door or merchant in reach.
        target: EntityId,
    },
}

/// Requested value changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Modifier {
    /// Start the player's attack cooldown and raise the attacking flag.
    BeginAttack,
    /// Subtract health.
    ApplyDamage {
        /// Entity dealing the damage (player, hostile or projectile).
        source: EntityId,
        /// Entity receiving it.
        target: EntityId,
        /// Positive amount.
        amount: f32,
    },
    /// Break a container and drop its loot.
    DestroyContainer {
        /// Container to break.
        target: EntityId,
    },
    /// Drink one health bottle.
    UseHealConsumable,
    /// Collect a pickup the player is touching.
    CollectPickup {
        /// Pickup to collect.
        target: EntityId,
    },
}

impl Modifier {
    /// Entity the modifier acts on; `None` for player-only modifiers.
    #[must_use]
    pub const fn target(&self) -> Option<EntityId> {
        match self {
            Self::ApplyDamage { target, .. }
            | Self::DestroyContainer { target }
            | Self::CollectPickup { target } => Some(*target),
            Self::BeginAttack | Self::UseHealConsumable => None,
        }
    }
}

/// Notices with no state effect beyond the notification channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// The player swung the sword.
    Swing,
    /// Free-form message for the player.
    Notice {
        /// Message text.
        text: String,
    },
}

// =============================================================================
// Top-Level Output Enum
// =============================================================================

/// Output category, used for resolver routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// [`Command`] outputs.
    Command,
    /// [`Modifier`] outputs.
    Modifier,
    /// [`Event`] outputs.
    Event,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "Command"),
            Self::Modifier => write!(f, "Modifier"),
            Self::Event => write!(f, "Event"),
        }
    }
}

/// A behavior output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// Requested action.
    Command(Command),
    /// Requested value change.
    Modifier(Modifier),
    /// Notice.
    Event(Event),
}

impl Output {
    /// Returns the category for routing.
    #[must_use]
    pub const fn kind(&self) -> OutputKind {
        match self {
            Self::Command(_) => OutputKind::Command,
            Self::Modifier(_) => OutputKind::Modifier,
            Self::Event(_) => OutputKind::Event,
        }
    }

    /// Returns the command if this is one.
    #[must_use]
    pub const fn as_command(&self) -> Option<&Command> {
        match self {
            Self::Command(cmd) => Some(cmd),
            _ => None,
        }
    }

    /// Returns the modifier if this is one.
    #[must_use]
    pub const fn as_modifier(&self) -> Option<&Modifier> {
        match self {
            Self::Modifier(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the event if this is one.
    #[must_use]
    pub const fn as_event(&self) -> Option<&Event> {
        match self {
            Self::Event(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Command> for Output {
    fn from(cmd: Command) -> Self {
        Self::Command(cmd)
    }
}

impl From<Modifier> for Output {
    fn from(m: Modifier) -> Self {
        Self::Modifier(m)
    }
}

impl From<Event> for Output {
    fn from(e: Event) -> Self {
        Self::Event(e)
    }
}

// =============================================================================
// Output Envelope
// =============================================================================

/// An output plus where and when it came from.
///
/// `sequence` numbers outputs within one stage of one tick, in the order the
/// session collected them; resolvers apply outputs in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEnvelope {
    output: Output,
    source: PluginInstanceId,
    tick: u64,
    sequence: u32,
}

impl OutputEnvelope {
    /// Wraps an output.
    ///
    /// # Arguments
    ///
    /// * `output` - The output to wrap
    /// * `source` - Behavior instance that produced it
    /// * `tick` - Current tick
    /// * `sequence` - Position within this stage's outputs
    #[must_use]
    pub fn new(output: Output, source: PluginInstanceId, tick: u64, sequence: u32) -> Self {
        Self {
            output,
            source,
            tick,
            sequence,
        }
    }

    /// Returns the wrapped output.
    #[must_use]
    pub fn output(&self) -> &Output {
        &self.output
    }

    /// Returns the producing behavior instance.
    #[must_use]
    pub fn source(&self) -> &PluginInstanceId {
        &self.source
    }

    /// Returns the tick the output was produced on.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Returns the position within the stage.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Returns the category of the wrapped output.
    #[must_use]
    pub const fn kind(&self) -> OutputKind {
        self.output.kind()
    }
}

// =============================================================================
// Tests
// =============================================================================
