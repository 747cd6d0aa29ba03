//! Session configuration.
//!
//! Every field has a default, and every struct is `#[serde(default)]`, so a
//! configuration file only needs to name what it changes:
//!
//! ```
//! use delve_core::config::SessionConfig;
//!
//! let config = SessionConfig::from_json(r#"{ "player": { "max_health": 150 } }"#).unwrap();
//! assert_eq!(config.player.max_health, 150.0);
//! assert_eq!(config.player.speed, 300.0);
//! ```
//!
//! Speeds are in pixels per second and durations in seconds; the fixed
//! timestep converts them into per-tick amounts.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::interaction::{default_offers, TradeOffer};
use crate::loot::{LootTable, PickupYields};

/// Side length of one world tile in pixels.
pub const TILE_SIZE: f32 = 64.0;

/// Default fixed timestep (60 Hz).
pub const FIXED_DT: f32 = 1.0 / 60.0;

/// Top-level configuration for a [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Tile side length; descriptor coordinates are multiplied by this.
    pub tile_size: f32,
    /// Seconds simulated per tick.
    pub fixed_dt: f32,
    /// Player parameters.
    pub player: PlayerConfig,
    /// Hostile parameters.
    pub hostile: HostileConfig,
    /// Projectile parameters.
    pub projectile: ProjectileConfig,
    /// Viewport and world bounds.
    pub camera: CameraConfig,
    /// Notification channel limits.
    pub notifications: NotificationConfig,
    /// Container drop table.
    pub loot: LootTable,
    /// Amounts granted per pickup.
    pub yields: PickupYields,
    /// Menu given to every merchant.
    pub merchant_offers: Vec<TradeOffer>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            fixed_dt: FIXED_DT,
            player: PlayerConfig::default(),
            hostile: HostileConfig::default(),
            projectile: ProjectileConfig::default(),
            camera: CameraConfig::default(),
            notifications: NotificationConfig::default(),
            loot: LootTable::default(),
            yields: PickupYields::default(),
            merchant_offers: default_offers(),
        }
    }
}

impl SessionConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or an invalid loot
    /// table, or the first error reported by [`SessionConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that would make the simulation meaningless.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_dt.is_finite() && self.fixed_dt > 0.0) {
            return Err(ConfigError::InvalidTimestep(self.fixed_dt));
        }
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(ConfigError::InvalidTileSize(self.tile_size));
        }
        let CameraConfig {
            viewport_width: width,
            viewport_height: height,
            ..
        } = self.camera;
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidViewport { width, height });
        }
        if !self.merchant_offers.iter().any(TradeOffer::is_exit) {
            return Err(ConfigError::MissingExitOffer);
        }
        Ok(())
    }
}

/// Player parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Starting and maximum health.
    pub max_health: f32,
    /// Movement speed (px/s).
    pub speed: f32,
    /// Damage per melee hit or arrow.
    pub damage: f32,
    /// Side of the square hit rectangle.
    pub hit_size: f32,
    /// Arrows at spawn.
    pub starting_ammunition: u32,
    /// Health bottles at spawn.
    pub starting_heal_consumables: u32,
    /// Health restored per bottle.
    pub heal_amount: f32,
    /// Seconds between attacks (melee and ranged).
    pub attack_cooldown: f32,
    /// Seconds the attacking flag stays raised after an attack.
    pub attack_duration: f32,
    /// Seconds between accepted interactions.
    pub interact_cooldown: f32,
    /// How far beyond the hit rectangle doors and merchants are reachable.
    pub interact_reach: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            speed: 300.0,
            damage: 10.0,
            hit_size: 35.0,
            starting_ammunition: 5,
            starting_heal_consumables: 1,
            heal_amount: 25.0,
            attack_cooldown: 0.4,
            attack_duration: 0.1,
            interact_cooldown: 0.25,
            interact_reach: 8.0,
        }
    }
}

/// Hostile parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostileConfig {
    /// Starting health.
    pub max_health: f32,
    /// Pursuit speed (px/s).
    pub speed: f32,
    /// Center distance that triggers pursuit.
    pub aggro_radius: f32,
    /// Damage dealt on contact.
    pub contact_damage: f32,
    /// Minimum seconds between contact hits from one hostile.
    ///
    /// `None` applies contact damage on every tick of overlap.
    pub contact_interval: Option<f32>,
    /// Side of the square hit rectangle.
    pub hit_size: f32,
}

impl Default for HostileConfig {
    fn default() -> Self {
        Self {
            max_health: 50.0,
            speed: 120.0,
            aggro_radius: 250.0,
            contact_damage: 10.0,
            contact_interval: None,
            hit_size: 35.0,
        }
    }
}

/// Projectile parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Flight speed (px/s).
    pub speed: f32,
    /// Side of the square projectile.
    pub size: f32,
    /// Seconds before an arrow retires on its own.
    pub lifetime: f32,
    /// How far outside the view an arrow may travel before retiring.
    pub cull_margin: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 600.0,
            size: 10.0,
            lifetime: 3.0,
            cull_margin: 64.0,
        }
    }
}

/// How the camera treats the edge of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsMode {
    /// Always center on the player.
    #[default]
    Unbounded,
    /// Clamp so the view never shows past the map edge.
    Bounded,
}

/// Viewport parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Viewport width in pixels.
    pub viewport_width: f32,
    /// Viewport height in pixels.
    pub viewport_height: f32,
    /// Edge behavior.
    pub bounds: BoundsMode,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1024.0,
            viewport_height: 768.0,
            bounds: BoundsMode::Unbounded,
        }
    }
}

/// Notification channel limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Messages retained; older ones are evicted.
    pub capacity: usize,
    /// Seconds a message stays visible.
    pub ttl: f32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            ttl: 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_json_is_default() {
        let config = SessionConfig::from_json("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = SessionConfig::from_json(
            r#"{ "hostile": { "contact_interval": 0.5 }, "camera": { "bounds": "bounded" } }"#,
        )
        .unwrap();
        assert_eq!(config.hostile.contact_interval, Some(0.5));
        assert_eq!(config.hostile.contact_damage, 10.0);
        assert_eq!(config.camera.bounds, BoundsMode::Bounded);
        assert_eq!(config.camera.viewport_width, 1024.0);
    }

    #[test]
    fn invalid_loot_table_fails_to_parse() {
        let result = SessionConfig::from_json(
            r#"{ "loot": [{ "kind": "currency", "weight": 0.4 }] }"#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn zero_timestep_is_rejected() {
        let config = SessionConfig {
            fixed_dt: 0.0,
            ..SessionConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTimestep(_))));
    }

    #[test]
    fn empty_viewport_is_rejected() {
        let mut config = SessionConfig::default();
        config.camera.viewport_height = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidViewport { .. })
        ));
    }

    #[test]
    fn menu_without_exit_is_rejected() {
        let mut config = SessionConfig::default();
        config.merchant_offers.retain(|offer| !offer.is_exit());
        assert!(matches!(config.validate(), Err(ConfigError::MissingExitOffer)));
    }

    #[test]
    fn serializes_back_to_equivalent_json() {
        let config = SessionConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SessionConfig::from_json(&json).unwrap(), config);
    }
}
