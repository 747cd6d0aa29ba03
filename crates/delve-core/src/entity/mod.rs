//! Entity records for everything that lives in the arena.
//!
//! - [`EntityId`]: unique, ordered identifier
//! - [`EntityTag`]: kind classification used for behavior bundle selection
//! - [`EntityInner`]: per-kind component storage
//! - [`Entity`]: the record stored in the [`Arena`](crate::arena::Arena)
//!
//! The player is not stored in the arena. It is owned directly by the
//! [`World`](crate::world::World) and addressed as [`EntityId::PLAYER`] when
//! outputs need to name it.
//!
//! # Example
//!
//! ```
//! use delve_core::entity::{Entity, EntityId, EntityInner, EntityTag};
//! use delve_core::entity::components::ContainerComponents;
//! use delve_core::geometry::Rect;
//! use glam::Vec2;
//!
//! let pot = Entity::new(
//!     EntityId::new(3),
//!     EntityInner::Container(ContainerComponents::new(Rect::from_min_size(
//!         Vec2::new(64.0, 64.0),
//!         Vec2::splat(64.0),
//!     ))),
//! );
//!
//! assert_eq!(pot.tag(), EntityTag::Container);
//! assert!(pot.is_solid());
//! ```

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::Rect;

pub use components::{
    Body, ContainerComponents, DamageOutcome, DoorComponents, Health, HostileComponents,
    HostileKind, MerchantComponents, ObstacleComponents, PickupComponents, PickupKind,
    ProjectileComponents,
};

/// Unique identifier for an entity.
///
/// Arena ids are assigned monotonically starting at 1, so iteration in id
/// order is also spawn order. Id 0 is reserved for the player.
///
/// # Example
///
/// ```
/// use delve_core::entity::EntityId;
///
/// assert!(EntityId::PLAYER < EntityId::new(1));
/// assert!(EntityId::PLAYER.is_player());
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// The id outputs use to address the player.
    pub const PLAYER: Self = Self(0);

    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is the reserved player id.
    #[must_use]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Entity kind, used to select behavior bundles.
///
/// Ordered so that registries keyed by tag iterate deterministically.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// The player-controlled entity (never stored in the arena).
    Player,
    /// Enemy that pursues and damages the player.
    Hostile,
    /// Static wall.
    Obstacle,
    /// Destructible pot that drops loot.
    Container,
    /// In-flight arrow.
    Projectile,
    /// Collectible item lying on the floor.
    Pickup,
    /// Non-solid trader that opens a dialogue.
    Merchant,
    /// Solid door that a key unlocks.
    Door,
}

impl EntityTag {
    /// Returns `true` for kinds that block movement of every mover.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Obstacle | Self::Container | Self::Door)
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Player => "Player",
            Self::Hostile => "Hostile",
            Self::Obstacle => "Obstacle",
            Self::Container => "Container",
            Self::Projectile => "Projectile",
            Self::Pickup => "Pickup",
            Self::Merchant => "Merchant",
            Self::Door => "Door",
        };
        f.write_str(name)
    }
}

/// Per-kind component storage.
///
/// The variant always agrees with the entity's [`EntityTag`]: [`Entity::new`]
/// derives the tag from the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Hostile components (body, health, pursuit parameters).
    Hostile(HostileComponents),
    /// Wall rectangle.
    Obstacle(ObstacleComponents),
    /// Pot rectangle.
    Container(ContainerComponents),
    /// Arrow rectangle, velocity and damage.
    Projectile(ProjectileComponents),
    /// Item rectangle and kind.
    Pickup(PickupComponents),
    /// Merchant rectangle, menu and dialogue state.
    Merchant(MerchantComponents),
    /// Door rectangle.
    Door(DoorComponents),
}

macro_rules! inner_accessors {
    ($($variant:ident => $ty:ty, $get:ident, $get_mut:ident;)*) => {
        $(
            #[doc = concat!("Returns the ", stringify!($variant), " components, if this is one.")]
            #[must_use]
            pub const fn $get(&self) -> Option<&$ty> {
                match self {
                    Self::$variant(components) => Some(components),
                    _ => None,
                }
            }

            #[doc = concat!("Returns mutable ", stringify!($variant), " components, if this is one.")]
            #[must_use]
            pub fn $get_mut(&mut self) -> Option<&mut $ty> {
                match self {
                    Self::$variant(components) => Some(components),
                    _ => None,
                }
            }
        )*
    };
}

impl EntityInner {
    /// Returns the tag matching this variant.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Hostile(_) => EntityTag::Hostile,
            Self::Obstacle(_) => EntityTag::Obstacle,
            Self::Container(_) => EntityTag::Container,
            Self::Projectile(_) => EntityTag::Projectile,
            Self::Pickup(_) => EntityTag::Pickup,
            Self::Merchant(_) => EntityTag::Merchant,
            Self::Door(_) => EntityTag::Door,
        }
    }

    /// Returns the rectangle used for collision and overlap tests.
    ///
    /// For hostiles this is the hit rectangle, not the render rectangle.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        match self {
            Self::Hostile(c) => c.body.hit,
            Self::Obstacle(c) => c.rect,
            Self::Container(c) => c.rect,
            Self::Projectile(c) => c.rect,
            Self::Pickup(c) => c.rect,
            Self::Merchant(c) => c.rect,
            Self::Door(c) => c.rect,
        }
    }

    /// Returns the rectangle a renderer should draw.
    #[must_use]
    pub const fn render_rect(&self) -> Rect {
        match self {
            Self::Hostile(c) => c.body.rect,
            _ => self.rect(),
        }
    }

    inner_accessors! {
        Hostile => HostileComponents, as_hostile, as_hostile_mut;
        Obstacle => ObstacleComponents, as_obstacle, as_obstacle_mut;
        Container => ContainerComponents, as_container, as_container_mut;
        Projectile => ProjectileComponents, as_projectile, as_projectile_mut;
        Pickup => PickupComponents, as_pickup, as_pickup_mut;
        Merchant => MerchantComponents, as_merchant, as_merchant_mut;
        Door => DoorComponents, as_door, as_door_mut;
    }
}

/// A live record in the arena.
///
/// # Invariants
///
/// - The `EntityId` is unique within an arena
/// - The `EntityTag` matches the `EntityInner` variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    tag: EntityTag,
    inner: EntityInner,
}

impl Entity {
    /// Creates an entity; the tag is taken from the `inner` variant.
    #[must_use]
    pub const fn new(id: EntityId, inner: EntityInner) -> Self {
        Self {
            id,
            tag: inner.tag(),
            inner,
        }
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's kind.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.tag
    }

    /// Returns a reference to the component storage.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Returns a mutable reference to the component storage.
    #[must_use]
    pub fn inner_mut(&mut self) -> &mut EntityInner {
        &mut self.inner
    }

    /// Collision rectangle; see [`EntityInner::rect`].
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.inner.rect()
    }

    /// Returns `true` if this entity blocks every mover.
    #[must_use]
    pub const fn is_solid(&self) -> bool {
        self.tag.is_solid()
    }

    /// Returns the hostile components, if this is a hostile.
    #[must_use]
    pub const fn as_hostile(&self) -> Option<&HostileComponents> {
        self.inner.as_hostile()
    }

    /// Returns mutable hostile components, if this is a hostile.
    #[must_use]
    pub fn as_hostile_mut(&mut self) -> Option<&mut HostileComponents> {
        self.inner.as_hostile_mut()
    }

    /// Returns the container components, if this is a container.
    #[must_use]
    pub const fn as_container(&self) -> Option<&ContainerComponents> {
        self.inner.as_container()
    }

    /// Returns the projectile components, if this is a projectile.
    #[must_use]
    pub const fn as_projectile(&self) -> Option<&ProjectileComponents> {
        self.inner.as_projectile()
    }

    /// Returns mutable projectile components, if this is a projectile.
    #[must_use]
    pub fn as_projectile_mut(&mut self) -> Option<&mut ProjectileComponents> {
        self.inner.as_projectile_mut()
    }

    /// Returns the pickup components, if this is a pickup.
    #[must_use]
    pub const fn as_pickup(&self) -> Option<&PickupComponents> {
        self.inner.as_pickup()
    }

    /// Returns the merchant components, if this is a merchant.
    #[must_use]
    pub const fn as_merchant(&self) -> Option<&MerchantComponents> {
        self.inner.as_merchant()
    }

    /// Returns mutable merchant components, if this is a merchant.
    #[must_use]
    pub fn as_merchant_mut(&mut self) -> Option<&mut MerchantComponents> {
        self.inner.as_merchant_mut()
    }

    /// Returns the door components, if this is a door.
    #[must_use]
    pub const fn as_door(&self) -> Option<&DoorComponents> {
        self.inner.as_door()
    }
}
