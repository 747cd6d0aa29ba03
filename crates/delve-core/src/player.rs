//! The player-controlled entity.
//!
//! The player lives outside the arena, owned by the
//! [`World`](crate::world::World), so behaviors can always read it without a
//! lookup. It is created when a session starts or respawns and is never
//! removed; death ends the phase instead.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::PlayerConfig;
use crate::entity::{Body, DamageOutcome, EntityId, Health};
use crate::geometry::Rect;

/// Equipped weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tool {
    /// Sword: tile-sized hitbox in front of the player.
    #[default]
    Melee,
    /// Bow: fires an arrow along the facing direction.
    Ranged,
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Melee => "Sword",
            Self::Ranged => "Bow",
        })
    }
}

/// Cardinal facing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Toward negative y.
    Up,
    /// Toward positive y.
    #[default]
    Down,
    /// Toward negative x.
    Left,
    /// Toward positive x.
    Right,
}

impl Facing {
    /// Unit vector pointing this way (y grows downward).
    #[must_use]
    pub const fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::NEG_Y,
            Self::Down => Vec2::Y,
            Self::Left => Vec2::NEG_X,
            Self::Right => Vec2::X,
        }
    }
}

/// Result of drinking a health bottle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HealOutcome {
    /// A bottle was used and this much health restored.
    Healed(f32),
    /// Health was full; the bottle was kept.
    AlreadyFull,
    /// No bottles left.
    NoneLeft,
}

/// Returns a `size`-sided square flush against the `facing` side of `body`.
///
/// The square is centered on that side: facing up, its bottom edge sits on
/// the body's top edge and the two share a center x.
#[must_use]
pub fn melee_hitbox(body: Rect, facing: Facing, size: f32) -> Rect {
    let center = body.center();
    let half = size * 0.5;
    let min = match facing {
        Facing::Up => Vec2::new(center.x - half, body.min.y - size),
        Facing::Down => Vec2::new(center.x - half, body.max.y),
        Facing::Left => Vec2::new(body.min.x - size, center.y - half),
        Facing::Right => Vec2::new(body.max.x, center.y - half),
    };
    Rect::from_min_size(min, Vec2::splat(size))
}

/// All player state.
///
/// Timers count down to zero in seconds; an action is ready when its timer
/// is at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Render and hit rectangles.
    pub body: Body,
    /// Health pool.
    pub health: Health,
    /// Movement speed (px/s).
    pub speed: f32,
    /// Damage per melee hit or arrow.
    pub damage: f32,
    /// Equipped weapon.
    pub tool: Tool,
    /// Arrows.
    pub ammunition: u32,
    /// Health bottles.
    pub heal_consumables: u32,
    /// Coins.
    pub currency: u32,
    /// Door keys.
    pub keys: u32,
    /// Direction of the last movement input.
    pub facing: Facing,
    /// Velocity after the last movement resolution.
    pub velocity: Vec2,
    /// Seconds until the next attack is allowed.
    pub attack_cooldown: f32,
    /// Seconds the attacking flag stays raised.
    pub attacking: f32,
    /// Seconds until the next interaction is accepted.
    pub interact_cooldown: f32,
    /// Set while a merchant dialogue is open.
    pub dialogue_active: bool,
    /// Door or merchant currently in reach.
    pub interaction_target: Option<EntityId>,
}

impl Player {
    /// Creates a player whose tile starts at `top_left`.
    #[must_use]
    pub fn spawn(top_left: Vec2, tile_size: f32, config: &PlayerConfig) -> Self {
        Self {
            body: Body::new(
                top_left,
                Vec2::splat(tile_size),
                Vec2::splat(config.hit_size),
            ),
            health: Health::new(config.max_health),
            speed: config.speed,
            damage: config.damage,
            tool: Tool::Melee,
            ammunition: config.starting_ammunition,
            heal_consumables: config.starting_heal_consumables,
            currency: 0,
            keys: 0,
            facing: Facing::Down,
            velocity: Vec2::ZERO,
            attack_cooldown: 0.0,
            attacking: 0.0,
            interact_cooldown: 0.0,
            dialogue_active: false,
            interaction_target: None,
        }
    }

    /// Returns `true` if the attack cooldown has elapsed.
    #[must_use]
    pub fn attack_ready(&self) -> bool {
        self.attack_cooldown <= 0.0
    }

    /// Returns `true` if the interaction cooldown has elapsed.
    #[must_use]
    pub fn interaction_ready(&self) -> bool {
        self.interact_cooldown <= 0.0
    }

    /// Returns `true` while the attacking flag is raised.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.attacking > 0.0
    }

    /// Returns `true` once health has reached zero.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    /// Starts the attack cooldown and raises the attacking flag.
    pub fn begin_attack(&mut self, cooldown: f32, duration: f32) {
        self.attack_cooldown = cooldown;
        self.attacking = duration;
    }

    /// Counts every timer down by `dt`, stopping at zero.
    pub fn tick_timers(&mut self, dt: f32) {
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
        self.attacking = (self.attacking - dt).max(0.0);
        self.interact_cooldown = (self.interact_cooldown - dt).max(0.0);
    }

    /// Melee hitbox for the current facing; see [`melee_hitbox`].
    #[must_use]
    pub fn melee_hitbox(&self, size: f32) -> Rect {
        melee_hitbox(self.body.rect, self.facing, size)
    }

    /// Applies damage to the health pool.
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        self.health.apply_damage(amount)
    }

    /// Drinks one health bottle if it would help.
    pub fn use_heal(&mut self, amount: f32) -> HealOutcome {
        if self.heal_consumables == 0 {
            return HealOutcome::NoneLeft;
        }
        if self.health.is_full() {
            return HealOutcome::AlreadyFull;
        }
        self.heal_consumables -= 1;
        HealOutcome::Healed(self.health.heal(amount))
    }
}
