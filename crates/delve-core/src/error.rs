//! Error types for world loading, configuration and session setup.
//!
//! Only setup can fail. Once a [`Session`](crate::session::Session) exists,
//! every tick succeeds: running out of arrows or coins is a notification,
//! not an error.

use thiserror::Error;

use crate::entity::PickupKind;

/// Failure to load a world descriptor.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The descriptor is not valid JSON or does not match the schema.
    #[error("failed to parse world descriptor: {0}")]
    Parse(#[from] serde_json::Error),

    /// The descriptor does not say where the player starts.
    #[error("world descriptor has no player spawn")]
    MissingPlayerSpawn,
}

/// Invalid session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration is not valid JSON or does not match the schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A loot table has no entries.
    #[error("loot table is empty")]
    EmptyLootTable,

    /// A loot weight is negative or not finite.
    #[error("loot weight for {kind:?} is invalid: {weight}")]
    InvalidLootWeight {
        /// Entry whose weight is invalid.
        kind: PickupKind,
        /// The offending weight.
        weight: f32,
    },

    /// Loot weights do not add up to one.
    #[error("loot weights sum to {sum}, expected 1")]
    LootWeightSum {
        /// Actual sum.
        sum: f32,
    },

    /// The fixed timestep is zero, negative or not finite.
    #[error("fixed timestep must be positive, got {0}")]
    InvalidTimestep(f32),

    /// The tile size is zero, negative or not finite.
    #[error("tile size must be positive, got {0}")]
    InvalidTileSize(f32),

    /// The viewport has no area.
    #[error("viewport must be positive, got {width}x{height}")]
    InvalidViewport {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },

    /// The merchant menu has no way to leave the dialogue.
    #[error("merchant offers must include an exit entry")]
    MissingExitOffer,
}

/// Failure to create a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The world descriptor could not be used.
    #[error(transparent)]
    World(#[from] WorldError),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
