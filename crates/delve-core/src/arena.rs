//! Storage for every live entity except the player.
//!
//! The arena provides:
//! - entity storage with deterministic iteration order (`BTreeMap`)
//! - spawn and despawn with monotonically increasing ids
//! - mark-then-compact removal
//! - per-mover obstacle sets for collision resolution
//!
//! # Removal
//!
//! Nothing is removed while a stage is iterating. Resolvers call
//! [`Arena::mark_for_removal`], which hides the entity from
//! [`Arena::live_ids_with_tag`] and from obstacle sets immediately, and the
//! session calls [`Arena::flush_removals`] between stages to drop marked
//! entities for real. Marking is idempotent, so an entity hit by two
//! sources in one stage is still removed exactly once.
//!
//! # Example
//!
//! ```
//! use delve_core::arena::Arena;
//! use delve_core::entity::{ContainerComponents, EntityInner, EntityTag};
//! use delve_core::geometry::Rect;
//! use glam::Vec2;
//!
//! let mut arena = Arena::new();
//! let pot = arena.spawn(EntityInner::Container(ContainerComponents::new(
//!     Rect::from_min_size(Vec2::ZERO, Vec2::splat(64.0)),
//! )));
//!
//! assert!(arena.mark_for_removal(pot));
//! assert!(!arena.mark_for_removal(pot));
//! assert_eq!(arena.live_ids_with_tag(EntityTag::Container).count(), 0);
//!
//! assert_eq!(arena.flush_removals(), 1);
//! assert!(arena.get(pot).is_none());
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, EntityInner, EntityTag};
use crate::geometry::Rect;

/// Live entity storage.
///
/// Ids start at 1 (0 is the player) and only grow, so iterating in id order
/// is iterating in spawn order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    /// Next id to hand out.
    next_id: u64,
    /// Entity storage with deterministic iteration order.
    entities: BTreeMap<EntityId, Entity>,
    /// Entities waiting for the next [`Arena::flush_removals`].
    pending_removal: BTreeSet<EntityId>,
}

impl Arena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: EntityId::PLAYER.as_u64() + 1,
            entities: BTreeMap::new(),
            pending_removal: BTreeSet::new(),
        }
    }

    /// Adds an entity and returns its new id.
    pub fn spawn(&mut self, inner: EntityInner) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, Entity::new(id, inner));
        id
    }

    /// Removes an entity immediately.
    ///
    /// Only call this outside stage iteration; resolvers use
    /// [`Arena::mark_for_removal`].
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.pending_removal.remove(&id);
        self.entities.remove(&id)
    }

    /// Returns an entity by id, including marked ones.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable entity by id, including marked ones.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns an entity by id unless it is marked for removal.
    #[must_use]
    pub fn get_live(&self, id: EntityId) -> Option<&Entity> {
        if self.is_marked(id) {
            None
        } else {
            self.get(id)
        }
    }

    /// Returns a mutable entity by id unless it is marked for removal.
    #[must_use]
    pub fn get_live_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if self.is_marked(id) {
            None
        } else {
            self.entities.get_mut(&id)
        }
    }

    /// Iterates all ids in ascending order.
    pub fn entity_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Iterates all entities in ascending id order.
    pub fn entities_sorted(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Iterates all entities mutably in ascending id order.
    pub fn entities_sorted_mut(&mut self) -> impl Iterator<Item = &mut Entity> + '_ {
        self.entities.values_mut()
    }

    /// Iterates unmarked entities in ascending id order.
    pub fn live_entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities
            .values()
            .filter(|entity| !self.pending_removal.contains(&entity.id()))
    }

    /// Iterates unmarked ids of one kind in ascending order.
    pub fn live_ids_with_tag(&self, tag: EntityTag) -> impl Iterator<Item = EntityId> + '_ {
        self.live_entities()
            .filter(move |entity| entity.tag() == tag)
            .map(Entity::id)
    }

    /// Counts unmarked entities of one kind.
    #[must_use]
    pub fn count_tag(&self, tag: EntityTag) -> usize {
        self.live_ids_with_tag(tag).count()
    }

    /// Schedules an entity for removal at the next flush.
    ///
    /// Returns `true` only the first time an existing entity is marked.
    pub fn mark_for_removal(&mut self, id: EntityId) -> bool {
        self.entities.contains_key(&id) && self.pending_removal.insert(id)
    }

    /// Returns `true` if the entity is waiting for removal.
    #[must_use]
    pub fn is_marked(&self, id: EntityId) -> bool {
        self.pending_removal.contains(&id)
    }

    /// Drops every marked entity and returns how many were removed.
    pub fn flush_removals(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending_removal);
        pending
            .into_iter()
            .filter(|id| self.entities.remove(id).is_some())
            .count()
    }

    /// Collects the rectangles that block `mover`.
    ///
    /// Every mover is blocked by walls, containers and doors. Hostiles are
    /// additionally blocked by the hit rectangles of other hostiles. Marked
    /// entities never block.
    #[must_use]
    pub fn solid_rects_for(&self, mover: EntityId) -> Vec<Rect> {
        let mover_is_hostile = self
            .get(mover)
            .is_some_and(|entity| entity.tag() == EntityTag::Hostile);

        self.live_entities()
            .filter(|entity| entity.id() != mover)
            .filter(|entity| {
                entity.is_solid() || (mover_is_hostile && entity.tag() == EntityTag::Hostile)
            })
            .map(Entity::rect)
            .collect()
    }

    /// Returns the number of stored entities, including marked ones.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostileConfig;
    use crate::entity::{
        ContainerComponents, HostileComponents, HostileKind, MerchantComponents,
        ObstacleComponents, PickupComponents, PickupKind,
    };
    use glam::Vec2;

    fn tile(x: f32, y: f32) -> Rect {
        Rect::from_min_size(Vec2::new(x, y), Vec2::splat(64.0))
    }

    fn wall(arena: &mut Arena, x: f32, y: f32) -> EntityId {
        arena.spawn(EntityInner::Obstacle(ObstacleComponents::new(tile(x, y))))
    }

    fn hostile(arena: &mut Arena, x: f32, y: f32) -> EntityId {
        arena.spawn(EntityInner::Hostile(HostileComponents::new(
            HostileKind::Melee,
            Vec2::new(x, y),
            64.0,
            &HostileConfig::default(),
        )))
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn ids_start_after_player_and_increase() {
            let mut arena = Arena::new();
            let first = wall(&mut arena, 0.0, 0.0);
            let second = wall(&mut arena, 64.0, 0.0);
            assert_eq!(first, EntityId::new(1));
            assert!(first < second);
        }

        #[test]
        fn iteration_is_in_spawn_order() {
            let mut arena = Arena::new();
            let ids: Vec<_> = (0..5).map(|i| wall(&mut arena, i as f32 * 64.0, 0.0)).collect();
            let iterated: Vec<_> = arena.entity_ids_sorted().collect();
            assert_eq!(ids, iterated);
        }

        #[test]
        fn despawn_removes_immediately() {
            let mut arena = Arena::new();
            let id = wall(&mut arena, 0.0, 0.0);
            assert!(arena.despawn(id).is_some());
            assert!(arena.get(id).is_none());
            assert!(arena.is_empty());
        }

        #[test]
        fn ids_are_not_reused() {
            let mut arena = Arena::new();
            let id = wall(&mut arena, 0.0, 0.0);
            arena.despawn(id);
            assert_ne!(wall(&mut arena, 0.0, 0.0), id);
        }
    }

    mod removal_tests {
        use super::*;

        #[test]
        fn marked_entity_stays_until_flush() {
            let mut arena = Arena::new();
            let id = hostile(&mut arena, 0.0, 0.0);

            assert!(arena.mark_for_removal(id));
            assert!(arena.is_marked(id));
            assert!(arena.get(id).is_some());
            assert!(arena.get_live(id).is_none());
            assert_eq!(arena.count_tag(EntityTag::Hostile), 0);

            assert_eq!(arena.flush_removals(), 1);
            assert!(arena.get(id).is_none());
            assert!(!arena.is_marked(id));
        }

        #[test]
        fn marking_twice_removes_once() {
            let mut arena = Arena::new();
            let id = hostile(&mut arena, 0.0, 0.0);
            assert!(arena.mark_for_removal(id));
            assert!(!arena.mark_for_removal(id));
            assert_eq!(arena.flush_removals(), 1);
            assert_eq!(arena.flush_removals(), 0);
        }

        #[test]
        fn marking_unknown_id_is_noop() {
            let mut arena = Arena::new();
            assert!(!arena.mark_for_removal(EntityId::new(99)));
            assert_eq!(arena.flush_removals(), 0);
        }
    }

    mod obstacle_set_tests {
        use super::*;

        #[test]
        fn player_is_blocked_by_solids_only() {
            let mut arena = Arena::new();
            wall(&mut arena, 0.0, 0.0);
            arena.spawn(EntityInner::Container(ContainerComponents::new(tile(64.0, 0.0))));
            hostile(&mut arena, 128.0, 0.0);
            arena.spawn(EntityInner::Merchant(MerchantComponents::new(
                tile(192.0, 0.0),
                Vec::new(),
            )));
            arena.spawn(EntityInner::Pickup(PickupComponents::new(
                tile(256.0, 0.0),
                PickupKind::Currency,
            )));

            let solids = arena.solid_rects_for(EntityId::PLAYER);
            assert_eq!(solids, vec![tile(0.0, 0.0), tile(64.0, 0.0)]);
        }

        #[test]
        fn hostile_is_blocked_by_other_hostiles_but_not_itself() {
            let mut arena = Arena::new();
            let a = hostile(&mut arena, 0.0, 0.0);
            let b = hostile(&mut arena, 128.0, 0.0);

            let solids = arena.solid_rects_for(a);
            assert_eq!(solids.len(), 1);
            assert_eq!(solids[0], arena.get(b).map(Entity::rect).unwrap());
        }

        #[test]
        fn marked_entities_do_not_block() {
            let mut arena = Arena::new();
            let id = wall(&mut arena, 0.0, 0.0);
            arena.mark_for_removal(id);
            assert!(arena.solid_rects_for(EntityId::PLAYER).is_empty());
        }
    }
}
