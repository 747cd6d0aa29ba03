//! Component structs carried by each entity kind.
//!
//! Every kind owns exactly the state it needs. There is no shared base type:
//! a wall is just a rectangle, a hostile carries a body and health.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::HostileConfig;
use crate::geometry::Rect;
use crate::interaction::{MerchantState, TradeOffer};

// =============================================================================
// Body
// =============================================================================

/// Render rectangle plus the smaller hit rectangle centered inside it.
///
/// Collision and combat use `hit`; presentation uses `rect`. The two always
/// share a center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Rectangle a renderer draws (one tile for actors).
    pub rect: Rect,
    /// Rectangle used for collision and damage.
    pub hit: Rect,
}

impl Body {
    /// Creates a body whose render rectangle starts at `top_left`.
    #[must_use]
    pub fn new(top_left: Vec2, size: Vec2, hit_size: Vec2) -> Self {
        let rect = Rect::from_min_size(top_left, size);
        Self {
            rect,
            hit: Rect::from_center_size(rect.center(), hit_size),
        }
    }

    /// Returns the shared center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.hit.center()
    }

    /// Moves the hit rectangle and re-centers the render rectangle on it.
    pub fn set_hit(&mut self, hit: Rect) {
        self.hit = hit;
        self.rect = self.rect.with_center(hit.center());
    }
}

// =============================================================================
// Health
// =============================================================================

/// Result of applying damage to a [`Health`] pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// Health is still above zero.
    Survived,
    /// This hit brought health to zero.
    Died,
    /// Health was already zero; nothing changed.
    AlreadyDead,
}

/// Bounded health pool.
///
/// `current` always stays within `[0, max]`, and [`DamageOutcome::Died`] is
/// reported by exactly one call to [`Health::apply_damage`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    /// Creates a full pool of `max` health.
    #[must_use]
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    /// Creates a pool with `current` clamped into `[0, max]`.
    #[must_use]
    pub fn with_current(current: f32, max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: current.clamp(0.0, max),
            max,
        }
    }

    /// Current health.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Maximum health.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Returns `true` once health has reached zero.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    /// Returns `true` if no healing would apply.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Subtracts `amount` (negative amounts count as zero), clamping at zero.
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::AlreadyDead;
        }
        self.current = (self.current - amount.max(0.0)).max(0.0);
        if self.is_dead() {
            DamageOutcome::Died
        } else {
            DamageOutcome::Survived
        }
    }

    /// Adds `amount` up to `max` and returns how much was actually restored.
    ///
    /// A dead pool stays dead.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if self.is_dead() {
            return 0.0;
        }
        let before = self.current;
        self.current = (self.current + amount.max(0.0)).min(self.max);
        self.current - before
    }
}

// =============================================================================
// Hostile
// =============================================================================

/// Hostile variety. Only melee chasers exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostileKind {
    /// Chases the player and deals contact damage.
    Melee,
}

/// State of one hostile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostileComponents {
    /// Variety, from the world descriptor.
    pub kind: HostileKind,
    /// Render and hit rectangles.
    pub body: Body,
    /// Health pool; the hostile is removed when it empties.
    pub health: Health,
    /// Pursuit speed in px/s.
    pub speed: f32,
    /// Center distance at which pursuit starts.
    pub aggro_radius: f32,
    /// Damage dealt to the player per contact.
    pub contact_damage: f32,
    /// Seconds until contact damage may apply again (only used with an interval).
    pub contact_timer: f32,
    /// Velocity after the last movement resolution.
    pub velocity: Vec2,
}

impl HostileComponents {
    /// Creates a hostile whose tile starts at `top_left`.
    #[must_use]
    pub fn new(kind: HostileKind, top_left: Vec2, tile_size: f32, config: &HostileConfig) -> Self {
        Self {
            kind,
            body: Body::new(
                top_left,
                Vec2::splat(tile_size),
                Vec2::splat(config.hit_size),
            ),
            health: Health::new(config.max_health),
            speed: config.speed,
            aggro_radius: config.aggro_radius,
            contact_damage: config.contact_damage,
            contact_timer: 0.0,
            velocity: Vec2::ZERO,
        }
    }
}

// =============================================================================
// Static and simple kinds
// =============================================================================

/// A wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleComponents {
    /// Solid rectangle.
    pub rect: Rect,
}

impl ObstacleComponents {
    /// Creates a wall covering `rect`.
    #[must_use]
    pub const fn new(rect: Rect) -> Self {
        Self { rect }
    }
}

/// A destructible pot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerComponents {
    /// Solid rectangle.
    pub rect: Rect,
}

impl ContainerComponents {
    /// Creates a pot covering `rect`.
    #[must_use]
    pub const fn new(rect: Rect) -> Self {
        Self { rect }
    }
}

/// A locked door.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorComponents {
    /// Solid rectangle.
    pub rect: Rect,
}

impl DoorComponents {
    /// Creates a door covering `rect`.
    #[must_use]
    pub const fn new(rect: Rect) -> Self {
        Self { rect }
    }
}

/// An arrow in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileComponents {
    /// Current rectangle.
    pub rect: Rect,
    /// Constant velocity in px/s.
    pub velocity: Vec2,
    /// Damage dealt to every hostile touched on impact.
    pub damage: f32,
    /// Seconds since it was fired.
    pub age: f32,
}

impl ProjectileComponents {
    /// Creates a fresh projectile.
    #[must_use]
    pub const fn new(rect: Rect, velocity: Vec2, damage: f32) -> Self {
        Self {
            rect,
            velocity,
            damage,
            age: 0.0,
        }
    }
}

// =============================================================================
// Pickups
// =============================================================================

/// Kind of item a pickup grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    /// Coin.
    Currency,
    /// Bundle of arrows.
    Ammunition,
    /// Health bottle.
    HealConsumable,
    /// Door key.
    Key,
}

impl fmt::Display for PickupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Currency => "a coin",
            Self::Ammunition => "arrows",
            Self::HealConsumable => "a health bottle",
            Self::Key => "a key",
        };
        f.write_str(label)
    }
}

impl PickupKind {
    /// Bare item name, without an article.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Currency => "coin",
            Self::Ammunition => "arrows",
            Self::HealConsumable => "health bottle",
            Self::Key => "key",
        }
    }
}

/// An item lying on the floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickupComponents {
    /// Overlap rectangle.
    pub rect: Rect,
    /// What collecting it grants.
    pub kind: PickupKind,
}

impl PickupComponents {
    /// Creates a pickup covering `rect`.
    #[must_use]
    pub const fn new(rect: Rect, kind: PickupKind) -> Self {
        Self { rect, kind }
    }
}

// =============================================================================
// Merchant
// =============================================================================

/// A trader the player can open a dialogue with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantComponents {
    /// Interaction rectangle (not solid).
    pub rect: Rect,
    /// Menu entries in display order.
    pub offers: Vec<TradeOffer>,
    /// Whether a dialogue is open with this merchant.
    pub state: MerchantState,
}

impl MerchantComponents {
    /// Creates a closed merchant with the given menu.
    #[must_use]
    pub fn new(rect: Rect, offers: Vec<TradeOffer>) -> Self {
        Self {
            rect,
            offers,
            state: MerchantState::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod body_tests {
        use super::*;

        #[test]
        fn hit_rect_is_centered_in_render_rect() {
            let body = Body::new(Vec2::new(64.0, 128.0), Vec2::splat(64.0), Vec2::splat(35.0));
            assert_eq!(body.rect.center(), body.hit.center());
            assert_eq!(body.hit.size(), Vec2::splat(35.0));
            assert_eq!(body.center(), Vec2::new(96.0, 160.0));
        }

        #[test]
        fn set_hit_recenters_render_rect() {
            let mut body = Body::new(Vec2::ZERO, Vec2::splat(64.0), Vec2::splat(35.0));
            let moved = body.hit.translate(Vec2::new(10.0, -4.0));
            body.set_hit(moved);
            assert_eq!(body.hit, moved);
            assert_eq!(body.rect.center(), moved.center());
            assert_eq!(body.rect.size(), Vec2::splat(64.0));
        }
    }

    mod health_tests {
        use super::*;

        #[test]
        fn damage_reduces_and_reports_survival() {
            let mut health = Health::new(50.0);
            assert_eq!(health.apply_damage(10.0), DamageOutcome::Survived);
            assert_eq!(health.current(), 40.0);
        }

        #[test]
        fn lethal_damage_clamps_at_zero_and_reports_death_once() {
            let mut health = Health::with_current(5.0, 100.0);
            assert_eq!(health.apply_damage(10.0), DamageOutcome::Died);
            assert_eq!(health.current(), 0.0);
            assert_eq!(health.apply_damage(10.0), DamageOutcome::AlreadyDead);
            assert_eq!(health.current(), 0.0);
        }

        #[test]
        fn exact_lethal_damage_is_death() {
            let mut health = Health::new(50.0);
            for _ in 0..4 {
                assert_eq!(health.apply_damage(10.0), DamageOutcome::Survived);
            }
            assert_eq!(health.apply_damage(10.0), DamageOutcome::Died);
        }

        #[test]
        fn negative_damage_is_ignored() {
            let mut health = Health::with_current(30.0, 100.0);
            assert_eq!(health.apply_damage(-20.0), DamageOutcome::Survived);
            assert_eq!(health.current(), 30.0);
        }

        #[test]
        fn heal_clamps_to_max() {
            let mut health = Health::with_current(90.0, 100.0);
            assert_eq!(health.heal(25.0), 10.0);
            assert!(health.is_full());
        }

        #[test]
        fn heal_does_not_revive() {
            let mut health = Health::with_current(0.0, 100.0);
            assert_eq!(health.heal(25.0), 0.0);
            assert!(health.is_dead());
        }

        #[test]
        fn with_current_clamps_into_range() {
            assert_eq!(Health::with_current(150.0, 100.0).current(), 100.0);
            assert_eq!(Health::with_current(-5.0, 100.0).current(), 0.0);
        }
    }

    mod pickup_tests {
        use super::*;

        #[test]
        fn kinds_serialize_as_snake_case() {
            let json = serde_json::to_string(&PickupKind::HealConsumable).unwrap();
            assert_eq!(json, "\"heal_consumable\"");
        }

        #[test]
        fn display_labels() {
            assert_eq!(PickupKind::Ammunition.to_string(), "arrows");
            assert_eq!(PickupKind::Currency.to_string(), "a coin");
        }
    }

    #[test]
    fn hostile_uses_config_values() {
        let config = HostileConfig::default();
        let hostile = HostileComponents::new(HostileKind::Melee, Vec2::ZERO, 64.0, &config);
        assert_eq!(hostile.health.current(), config.max_health);
        assert_eq!(hostile.speed, config.speed);
        assert_eq!(hostile.body.rect.size(), Vec2::splat(64.0));
        assert_eq!(hostile.velocity, Vec2::ZERO);
    }
}
