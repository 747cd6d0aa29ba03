//! World descriptor: the level layout a session is built from.
//!
//! Coordinates are in tiles. The JSON shape follows the level editor's
//! format, so `pots` and `enemies` are accepted for `containers` and
//! `hostiles`, and `w`/`h` for wall extents:
//!
//! ```json
//! {
//!   "map_width": 30,
//!   "map_height": 30,
//!   "player_spawn": { "x": 1, "y": 1 },
//!   "walls": [{ "x": 0, "y": 0, "w": 30, "h": 1 }],
//!   "pots": [{ "x": 4, "y": 2 }],
//!   "enemies": [{ "x": 8, "y": 8, "type": "melee" }]
//! }
//! ```
//!
//! Every list is optional. A missing player spawn is the only fatal problem.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::HostileKind;
use crate::error::WorldError;
use crate::geometry::Rect;

/// A tile coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TilePos {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl TilePos {
    /// Creates a tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Pixel position of the tile's top-left corner.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_world(self, tile_size: f32) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32) * tile_size
    }

    /// Pixel rectangle covering the tile.
    #[must_use]
    pub fn to_rect(self, tile_size: f32) -> Rect {
        Rect::from_min_size(self.to_world(tile_size), Vec2::splat(tile_size))
    }
}

/// A block of tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRect {
    /// Left column.
    pub x: i32,
    /// Top row.
    pub y: i32,
    /// Width in tiles.
    #[serde(alias = "width")]
    pub w: u32,
    /// Height in tiles.
    #[serde(alias = "height")]
    pub h: u32,
}

impl TileRect {
    /// Pixel rectangle covering the block.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_rect(self, tile_size: f32) -> Rect {
        Rect::from_min_size(
            TilePos::new(self.x, self.y).to_world(tile_size),
            Vec2::new(self.w as f32, self.h as f32) * tile_size,
        )
    }
}

/// Hostile type tag as written in the level file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnKind {
    /// Walks up and hits on contact.
    #[default]
    Melee,
    /// Any tag this build does not know.
    #[serde(other)]
    Unknown,
}

impl SpawnKind {
    /// The hostile this tag spawns, if known.
    #[must_use]
    pub const fn hostile_kind(self) -> Option<HostileKind> {
        match self {
            Self::Melee => Some(HostileKind::Melee),
            Self::Unknown => None,
        }
    }
}

/// One hostile placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostileSpawn {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Type tag.
    #[serde(rename = "type", default)]
    pub kind: SpawnKind,
}

impl HostileSpawn {
    /// Tile the hostile starts on.
    #[must_use]
    pub const fn tile(&self) -> TilePos {
        TilePos::new(self.x, self.y)
    }
}

/// Complete level layout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorldDescriptor {
    /// Map width in tiles, used by a bounded camera.
    #[serde(default)]
    pub map_width: Option<u32>,
    /// Map height in tiles, used by a bounded camera.
    #[serde(default)]
    pub map_height: Option<u32>,
    /// Player start tile.
    #[serde(default)]
    pub player_spawn: Option<TilePos>,
    /// Wall blocks.
    #[serde(default)]
    pub walls: Vec<TileRect>,
    /// Breakable pots.
    #[serde(default, alias = "pots")]
    pub containers: Vec<TilePos>,
    /// Hostile placements.
    #[serde(default, alias = "enemies")]
    pub hostiles: Vec<HostileSpawn>,
    /// Merchant tiles.
    #[serde(default)]
    pub merchants: Vec<TilePos>,
    /// Locked door tiles.
    #[serde(default)]
    pub doors: Vec<TilePos>,
    /// Key pickups lying in the level.
    #[serde(default)]
    pub keys: Vec<TilePos>,
}

impl WorldDescriptor {
    /// Parses and validates a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Parse`] for malformed JSON and
    /// [`WorldError::MissingPlayerSpawn`] when no spawn is given.
    ///
    /// # Example
    ///
    /// ```
    /// use delve_core::descriptor::WorldDescriptor;
    ///
    /// let level = WorldDescriptor::from_json(r#"{ "player_spawn": { "x": 2, "y": 3 } }"#).unwrap();
    /// assert_eq!(level.spawn().unwrap().x, 2);
    /// assert!(level.walls.is_empty());
    ///
    /// assert!(WorldDescriptor::from_json("{}").is_err());
    /// ```
    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        let descriptor: Self = serde_json::from_str(json)?;
        descriptor.spawn()?;
        Ok(descriptor)
    }

    /// Returns the player spawn.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::MissingPlayerSpawn`] if none is set.
    pub fn spawn(&self) -> Result<TilePos, WorldError> {
        self.player_spawn.ok_or(WorldError::MissingPlayerSpawn)
    }

    /// Map size in pixels, when both dimensions are declared.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn map_size(&self, tile_size: f32) -> Option<Vec2> {
        match (self.map_width, self.map_height) {
            (Some(width), Some(height)) => {
                Some(Vec2::new(width as f32, height as f32) * tile_size)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDITOR_LEVEL: &str = r#"{
        "map_width": 30,
        "map_height": 20,
        "player_spawn": {"x": 1, "y": 1},
        "walls": [{"x": 0, "y": 0, "w": 30, "h": 1}],
        "pots": [{"x": 4, "y": 2}],
        "enemies": [{"x": 8, "y": 8, "type": "melee"}, {"x": 9, "y": 8, "type": "archer"}]
    }"#;

    mod parse_tests {
        use super::*;

        #[test]
        fn accepts_editor_field_names() {
            let level = WorldDescriptor::from_json(EDITOR_LEVEL).unwrap();
            assert_eq!(level.containers, vec![TilePos::new(4, 2)]);
            assert_eq!(level.hostiles.len(), 2);
            assert_eq!(level.hostiles[0].kind, SpawnKind::Melee);
            assert_eq!(level.walls[0].w, 30);
        }

        #[test]
        fn unknown_hostile_tag_parses_as_unknown() {
            let level = WorldDescriptor::from_json(EDITOR_LEVEL).unwrap();
            assert_eq!(level.hostiles[1].kind, SpawnKind::Unknown);
            assert_eq!(level.hostiles[1].kind.hostile_kind(), None);
        }

        #[test]
        fn missing_lists_default_to_empty() {
            let level =
                WorldDescriptor::from_json(r#"{"player_spawn": {"x": 0, "y": 0}}"#).unwrap();
            assert!(level.merchants.is_empty());
            assert!(level.doors.is_empty());
            assert!(level.keys.is_empty());
            assert_eq!(level.map_size(64.0), None);
        }

        #[test]
        fn missing_spawn_is_fatal() {
            let err = WorldDescriptor::from_json(r#"{"walls": []}"#).unwrap_err();
            assert!(matches!(err, WorldError::MissingPlayerSpawn));
        }

        #[test]
        fn malformed_json_is_parse_error() {
            let err = WorldDescriptor::from_json("{").unwrap_err();
            assert!(matches!(err, WorldError::Parse(_)));
        }
    }

    mod geometry_tests {
        use super::*;

        #[test]
        fn tiles_scale_to_pixels() {
            assert_eq!(TilePos::new(2, 3).to_world(64.0), Vec2::new(128.0, 192.0));
            let wall = TileRect {
                x: 1,
                y: 0,
                w: 3,
                h: 2,
            };
            assert_eq!(
                wall.to_rect(64.0),
                Rect::from_min_size(Vec2::new(64.0, 0.0), Vec2::new(192.0, 128.0))
            );
        }

        #[test]
        fn map_size_needs_both_dimensions() {
            let level = WorldDescriptor::from_json(EDITOR_LEVEL).unwrap();
            assert_eq!(level.map_size(64.0), Some(Vec2::new(1920.0, 1280.0)));
        }
    }
}
