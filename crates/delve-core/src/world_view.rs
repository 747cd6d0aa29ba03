//! `WorldView` gives plugins read-only access to the world.
//!
//! A view borrows the arena, the player, this tick's input, the
//! configuration and the camera's visible rectangle. Because it only hands
//! out shared references, a plugin cannot mutate anything; it has to emit
//! outputs instead.
//!
//! Entities marked for removal earlier in the tick are invisible through the
//! view.
//!
//! # Example
//!
//! ```
//! use delve_core::arena::Arena;
//! use delve_core::config::SessionConfig;
//! use delve_core::entity::{ContainerComponents, EntityInner};
//! use delve_core::geometry::Rect;
//! use delve_core::input::InputFrame;
//! use delve_core::player::Player;
//! use delve_core::world_view::WorldView;
//! use glam::Vec2;
//!
//! let config = SessionConfig::default();
//! let mut arena = Arena::new();
//! let pot = arena.spawn(EntityInner::Container(ContainerComponents::new(
//!     Rect::from_min_size(Vec2::ZERO, Vec2::splat(64.0)),
//! )));
//! let player = Player::spawn(Vec2::new(128.0, 0.0), 64.0, &config.player);
//! let input = InputFrame::idle();
//! let visible = Rect::from_min_size(Vec2::ZERO, Vec2::new(1024.0, 768.0));
//!
//! let view = WorldView::new(&arena, &player, &input, &config, visible, 0);
//! assert_eq!(view.containers().next().map(|(id, _)| id), Some(pot));
//! ```

use crate::arena::Arena;
use crate::config::SessionConfig;
use crate::entity::{
    Entity, EntityId, EntityTag, HostileComponents, PickupComponents, ProjectileComponents,
};
use crate::geometry::Rect;
use crate::input::InputFrame;
use crate::player::Player;

/// Read-only view of the world for one stage.
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    arena: &'a Arena,
    player: &'a Player,
    input: &'a InputFrame,
    config: &'a SessionConfig,
    view_rect: Rect,
    tick: u64,
}

impl<'a> WorldView<'a> {
    /// Creates a view.
    ///
    /// # Arguments
    ///
    /// * `arena` - Live entities
    /// * `player` - The player
    /// * `input` - This tick's input frame
    /// * `config` - Session configuration
    /// * `view_rect` - World rectangle currently on screen
    /// * `tick` - Current tick
    #[must_use]
    pub const fn new(
        arena: &'a Arena,
        player: &'a Player,
        input: &'a InputFrame,
        config: &'a SessionConfig,
        view_rect: Rect,
        tick: u64,
    ) -> Self {
        Self {
            arena,
            player,
            input,
            config,
            view_rect,
            tick,
        }
    }

    /// Returns the current tick.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Returns the player.
    #[must_use]
    pub const fn player(&self) -> &'a Player {
        self.player
    }

    /// Returns this tick's input.
    #[must_use]
    pub const fn input(&self) -> &'a InputFrame {
        self.input
    }

    /// Returns the session configuration.
    #[must_use]
    pub const fn config(&self) -> &'a SessionConfig {
        self.config
    }

    /// Returns the world rectangle currently on screen.
    #[must_use]
    pub const fn view_rect(&self) -> Rect {
        self.view_rect
    }

    /// Returns a live entity by id.
    #[must_use]
    pub fn get_entity(&self, id: EntityId) -> Option<&'a Entity> {
        self.arena.get_live(id)
    }

    /// Returns a live hostile by id.
    #[must_use]
    pub fn hostile(&self, id: EntityId) -> Option<&'a HostileComponents> {
        self.get_entity(id).and_then(Entity::as_hostile)
    }

    /// Returns a live projectile by id.
    #[must_use]
    pub fn projectile(&self, id: EntityId) -> Option<&'a ProjectileComponents> {
        self.get_entity(id).and_then(Entity::as_projectile)
    }

    /// Returns a live pickup by id.
    #[must_use]
    pub fn pickup(&self, id: EntityId) -> Option<&'a PickupComponents> {
        self.get_entity(id).and_then(Entity::as_pickup)
    }

    /// Iterates live hostiles in id order.
    pub fn hostiles(&self) -> impl Iterator<Item = (EntityId, &'a HostileComponents)> + 'a {
        self.arena
            .live_entities()
            .filter_map(|entity| entity.as_hostile().map(|hostile| (entity.id(), hostile)))
    }

    /// Iterates live containers and their rectangles in id order.
    pub fn containers(&self) -> impl Iterator<Item = (EntityId, Rect)> + 'a {
        self.tagged(EntityTag::Container)
    }

    /// Iterates walls and doors: solids that nothing can break.
    pub fn barriers(&self) -> impl Iterator<Item = (EntityId, Rect)> + 'a {
        self.arena
            .live_entities()
            .filter(|entity| matches!(entity.tag(), EntityTag::Obstacle | EntityTag::Door))
            .map(|entity| (entity.id(), entity.rect()))
    }

    /// Iterates live ids of one kind in id order.
    pub fn ids_with_tag(&self, tag: EntityTag) -> impl Iterator<Item = EntityId> + 'a {
        self.arena.live_ids_with_tag(tag)
    }

    fn tagged(&self, tag: EntityTag) -> impl Iterator<Item = (EntityId, Rect)> + 'a {
        self.arena
            .live_entities()
            .filter(move |entity| entity.tag() == tag)
            .map(|entity| (entity.id(), entity.rect()))
    }
}
