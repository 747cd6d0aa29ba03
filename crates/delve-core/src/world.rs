//! Live game state.
//!
//! A [`World`] owns everything a tick mutates: the arena, the player, the
//! notification channel, the seeded random generator used for loot, the event
//! journal and any phase change requested during the current stage. The
//! [`Session`](crate::session::Session) owns exactly one world and lends it to
//! resolvers by `&mut`.

use std::collections::HashSet;
use std::fmt;

use glam::Vec2;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::arena::Arena;
use crate::config::SessionConfig;
use crate::descriptor::{TilePos, WorldDescriptor};
use crate::entity::{
    ContainerComponents, DoorComponents, Entity, EntityId, EntityInner, EntityTag,
    HostileComponents, MerchantComponents, ObstacleComponents, PickupComponents, PickupKind,
};
use crate::geometry::Rect;
use crate::notify::Notifications;
use crate::phase::{Phase, PhaseTrigger};
use crate::player::Player;

// =============================================================================
// Game Events
// =============================================================================

/// Something that happened, recorded for hosts and tests.
///
/// The journal is append-only within a tick and drained by
/// [`Session::take_events`](crate::session::Session::take_events).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// The session moved to another phase.
    PhaseChanged {
        /// Phase before.
        from: Phase,
        /// Phase after.
        to: Phase,
    },
    /// The player lost health and survived.
    PlayerHurt {
        /// Damage dealer.
        source: EntityId,
        /// Health removed.
        amount: f32,
        /// Health left.
        remaining: f32,
    },
    /// The player's health reached zero.
    PlayerDied {
        /// Damage dealer.
        source: EntityId,
    },
    /// A hostile was hit and survived.
    HostileHurt {
        /// Hostile hit.
        id: EntityId,
        /// Health left.
        remaining: f32,
    },
    /// A hostile was killed.
    HostileSlain {
        /// Hostile removed.
        id: EntityId,
    },
    /// A container broke and dropped loot.
    ContainerBroken {
        /// Container removed.
        id: EntityId,
        /// Pickup spawned in its place.
        drop: PickupKind,
    },
    /// The player swung the sword.
    Swing,
    /// An arrow left the bow.
    ProjectileFired {
        /// New projectile.
        id: EntityId,
    },
    /// A pickup was collected.
    PickupCollected {
        /// What it was.
        kind: PickupKind,
        /// Amount credited.
        amount: u32,
    },
    /// A health bottle was drunk.
    Healed {
        /// Health restored.
        amount: f32,
    },
    /// A door opened and was removed.
    DoorUnlocked {
        /// Door removed.
        id: EntityId,
    },
    /// A merchant menu opened.
    DialogueOpened {
        /// Merchant spoken to.
        merchant: EntityId,
    },
    /// A purchase went through.
    TradeCompleted {
        /// Merchant traded with.
        merchant: EntityId,
        /// Offer label.
        label: String,
        /// Coins spent.
        cost: u32,
    },
    /// A purchase was refused for lack of coins.
    TradeRejected {
        /// Merchant traded with.
        merchant: EntityId,
        /// Price asked.
        cost: u32,
    },
}

// =============================================================================
// World
// =============================================================================

/// All mutable game state.
pub struct World {
    /// Every entity except the player.
    pub arena: Arena,
    /// The player.
    pub player: Player,
    /// Messages for the player.
    pub notifications: Notifications,
    rng: Box<dyn RngCore + Send + Sync>,
    journal: Vec<GameEvent>,
    phase_request: Option<PhaseTrigger>,
    clock: f64,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("arena", &self.arena)
            .field("player", &self.player)
            .field("notifications", &self.notifications)
            .field("journal", &self.journal)
            .field("phase_request", &self.phase_request)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl World {
    /// Creates an empty world with the player on `spawn`.
    ///
    /// # Arguments
    ///
    /// * `seed` - Seed for loot draws
    /// * `config` - Session configuration
    /// * `spawn` - Player start tile
    #[must_use]
    pub fn new(seed: u64, config: &SessionConfig, spawn: TilePos) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed), config, spawn)
    }

    /// Creates an empty world drawing loot from `rng`.
    ///
    /// Replays and tests use this to pin the loot sequence.
    #[must_use]
    pub fn with_rng(
        rng: impl RngCore + Send + Sync + 'static,
        config: &SessionConfig,
        spawn: TilePos,
    ) -> Self {
        Self {
            arena: Arena::new(),
            player: Player::spawn(
                spawn.to_world(config.tile_size),
                config.tile_size,
                &config.player,
            ),
            notifications: Notifications::from_config(&config.notifications),
            rng: Box::new(rng),
            journal: Vec::new(),
            phase_request: None,
            clock: 0.0,
        }
    }

    /// Replaces every entity and the player with a fresh copy of the level.
    ///
    /// The random generator, clock and notifications carry over, so a
    /// respawn does not replay the same loot.
    ///
    /// Hostiles with an unknown type tag, or on a tile another hostile already
    /// holds, are skipped with a warning.
    pub fn populate(&mut self, descriptor: &WorldDescriptor, spawn: TilePos, config: &SessionConfig) {
        let tile = config.tile_size;
        self.arena = Arena::new();
        self.player = Player::spawn(spawn.to_world(tile), tile, &config.player);
        self.phase_request = None;

        for wall in &descriptor.walls {
            self.arena
                .spawn(EntityInner::Obstacle(ObstacleComponents::new(wall.to_rect(tile))));
        }
        for pos in &descriptor.containers {
            self.arena
                .spawn(EntityInner::Container(ContainerComponents::new(pos.to_rect(tile))));
        }
        let mut occupied = HashSet::new();
        for placement in &descriptor.hostiles {
            let Some(kind) = placement.kind.hostile_kind() else {
                warn!(x = placement.x, y = placement.y, "skipping hostile with unknown type");
                continue;
            };
            if !occupied.insert(placement.tile()) {
                warn!(x = placement.x, y = placement.y, "skipping hostile on an occupied tile");
                continue;
            }
            self.arena.spawn(EntityInner::Hostile(HostileComponents::new(
                kind,
                placement.tile().to_world(tile),
                tile,
                &config.hostile,
            )));
        }
        for pos in &descriptor.merchants {
            self.arena.spawn(EntityInner::Merchant(MerchantComponents::new(
                pos.to_rect(tile),
                config.merchant_offers.clone(),
            )));
        }
        for pos in &descriptor.doors {
            self.arena
                .spawn(EntityInner::Door(DoorComponents::new(pos.to_rect(tile))));
        }
        for pos in &descriptor.keys {
            self.spawn_pickup(pos.to_rect(tile).center(), PickupKind::Key, tile * 0.5);
        }

        debug!(entities = self.arena.entity_count(), "world populated");
    }

    /// Spawns a square pickup centered on `center`.
    pub fn spawn_pickup(&mut self, center: Vec2, kind: PickupKind, size: f32) -> EntityId {
        self.arena.spawn(EntityInner::Pickup(PickupComponents::new(
            Rect::from_center_size(center, Vec2::splat(size)),
            kind,
        )))
    }

    /// Counts every per-entity timer down by `dt`.
    ///
    /// Player cooldowns and hostile contact timers stop at zero; projectile
    /// ages grow.
    pub fn tick_timers(&mut self, dt: f32) {
        self.player.tick_timers(dt);
        for entity in self.arena.entities_sorted_mut() {
            match entity.inner_mut() {
                EntityInner::Hostile(hostile) => {
                    hostile.contact_timer = (hostile.contact_timer - dt).max(0.0);
                }
                EntityInner::Projectile(projectile) => projectile.age += dt,
                _ => {}
            }
        }
    }

    /// Recomputes which door or merchant the player can reach.
    ///
    /// The player's tile is grown by `reach` on every side; the lowest-id
    /// door or merchant it overlaps becomes the target.
    pub fn refresh_interaction_target(&mut self, reach: f32) {
        let zone = self.player.body.rect.inflate(reach);
        self.player.interaction_target = self
            .arena
            .live_entities()
            .filter(|entity| matches!(entity.tag(), EntityTag::Door | EntityTag::Merchant))
            .find(|entity| zone.intersects(&entity.rect()))
            .map(Entity::id);
    }

    /// Posts a notification at the current clock.
    pub fn notify(&mut self, text: impl Into<String>) {
        self.notifications.post(text, self.clock);
    }

    /// Asks the session to change phase after the current stage.
    ///
    /// Only the first request in a stage is kept.
    pub fn request_phase(&mut self, trigger: PhaseTrigger) {
        if self.phase_request.is_none() {
            self.phase_request = Some(trigger);
        }
    }

    /// Takes the pending phase request.
    pub fn take_phase_request(&mut self) -> Option<PhaseTrigger> {
        self.phase_request.take()
    }

    /// Appends to the event journal.
    pub fn record(&mut self, event: GameEvent) {
        self.journal.push(event);
    }

    /// Drains the event journal.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.journal)
    }

    /// Events recorded since the last drain.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.journal
    }

    /// The loot generator.
    pub fn rng_mut(&mut self) -> &mut (dyn RngCore + Send + Sync) {
        self.rng.as_mut()
    }

    /// Seconds of simulated time since the session was created.
    #[must_use]
    pub const fn now(&self) -> f64 {
        self.clock
    }

    /// Advances the clock by `dt`.
    ///
    /// Accumulates in `f64`: an `f32` clock stops moving at `1/60` steps
    /// after about six days.
    pub fn advance_clock(&mut self, dt: f32) {
        self.clock += f64::from(dt);
    }
}
