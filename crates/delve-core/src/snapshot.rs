//! Presentation snapshots.
//!
//! A [`Snapshot`] is everything a renderer or UI needs for one frame,
//! flattened into plain serializable data. It holds no references into the
//! world, so a host can ship it to another thread or write it to disk.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::entity::{Entity, EntityId, EntityTag};
use crate::geometry::Rect;
use crate::interaction::TradeOffer;
use crate::phase::Phase;
use crate::player::{Facing, Tool};
use crate::world::World;

/// Complete presentation state at the end of a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Ticks run so far.
    pub tick: u64,
    /// Current phase.
    pub phase: Phase,
    /// Screen offset: `screen = world + camera_offset`.
    pub camera_offset: Vec2,
    /// Player state for the HUD.
    pub player: PlayerStats,
    /// Live entities in id order.
    pub entities: Vec<EntityView>,
    /// Notification texts still on screen, oldest first.
    pub notifications: Vec<String>,
    /// Open merchant menu, if any.
    pub dialogue: Option<DialogueView>,
}

/// Player HUD values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Render rectangle.
    pub rect: Rect,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Equipped weapon.
    pub tool: Tool,
    /// Direction faced.
    pub facing: Facing,
    /// Arrows.
    pub ammunition: u32,
    /// Health bottles.
    pub heal_consumables: u32,
    /// Coins.
    pub currency: u32,
    /// Door keys.
    pub keys: u32,
    /// Whether the swing flash should be drawn.
    pub attacking: bool,
    /// Door or merchant in reach.
    pub interaction_target: Option<EntityId>,
}

/// One drawable entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    /// Entity id.
    pub id: EntityId,
    /// Entity kind.
    pub tag: EntityTag,
    /// Render rectangle in world coordinates.
    pub rect: Rect,
}

/// Merchant menu state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueView {
    /// Merchant spoken to.
    pub merchant: EntityId,
    /// Highlighted entry.
    pub cursor: usize,
    /// Menu entries in display order.
    pub offers: Vec<TradeOffer>,
}

impl Snapshot {
    /// Captures the state of `world` as seen through `camera`.
    #[must_use]
    pub fn capture(tick: u64, phase: Phase, world: &World, camera: &Camera) -> Self {
        let player = &world.player;
        let now = world.now();

        let dialogue = phase.dialogue().map(|state| DialogueView {
            merchant: state.merchant,
            cursor: state.cursor,
            offers: world
                .arena
                .get_live(state.merchant)
                .and_then(Entity::as_merchant)
                .map(|m| m.offers.clone())
                .unwrap_or_default(),
        });

        Self {
            tick,
            phase,
            camera_offset: camera.offset(),
            player: PlayerStats {
                rect: player.body.rect,
                health: player.health.current(),
                max_health: player.health.max(),
                tool: player.tool,
                facing: player.facing,
                ammunition: player.ammunition,
                heal_consumables: player.heal_consumables,
                currency: player.currency,
                keys: player.keys,
                attacking: player.is_attacking(),
                interaction_target: player.interaction_target,
            },
            entities: world
                .arena
                .live_entities()
                .map(|entity| EntityView {
                    id: entity.id(),
                    tag: entity.tag(),
                    rect: entity.inner().render_rect(),
                })
                .collect(),
            notifications: world
                .notifications
                .visible(now)
                .map(|n| n.text.clone())
                .collect(),
            dialogue,
        }
    }

    /// Serializes the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error; in practice only non-finite floats fail.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
