//! Pickup collection plugin.

use crate::entity::EntityTag;
use crate::output::{Modifier, Output, PluginId};
use crate::plugin::{Plugin, PluginContext, PluginDeclaration, Stage};
use crate::world_view::WorldView;

/// Collects a pickup once the player's tile overlaps it.
pub struct PickupPlugin {
    declaration: PluginDeclaration,
}

impl PickupPlugin {
    /// Creates a new `PickupPlugin`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: PluginDeclaration {
                id: PluginId::new("pickup"),
                stage: Stage::Pickups,
                required_tags: vec![EntityTag::Pickup],
            },
        }
    }
}

impl Default for PickupPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for PickupPlugin {
    fn declaration(&self) -> &PluginDeclaration {
        &self.declaration
    }

    fn run(&self, ctx: &PluginContext, view: &WorldView<'_>) -> Vec<Output> {
        match view.pickup(ctx.entity_id) {
            Some(pickup) if view.player().body.rect.intersects(&pickup.rect) => {
                vec![Modifier::CollectPickup {
                    target: ctx.entity_id,
                }
                .into()]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityInner, PickupComponents, PickupKind};
    use crate::geometry::Rect;
    use crate::plugins::fixture::Scene;
    use glam::Vec2;

    fn drop_at(scene: &mut Scene, center: Vec2) -> crate::entity::EntityId {
        scene.arena.spawn(EntityInner::Pickup(PickupComponents::new(
            Rect::from_center_size(center, Vec2::splat(32.0)),
            PickupKind::Currency,
        )))
    }

    #[test]
    fn touching_pickup_is_collected() {
        let mut scene = Scene::new();
        let coin = drop_at(&mut scene, Vec2::new(330.0, 288.0));
        let outputs = PickupPlugin::new().run(&scene.ctx(coin), &scene.view());
        assert_eq!(outputs, vec![Modifier::CollectPickup { target: coin }.into()]);
    }

    #[test]
    fn distant_pickup_stays() {
        let mut scene = Scene::new();
        let coin = drop_at(&mut scene, Vec2::new(480.0, 288.0));
        assert!(PickupPlugin::new()
            .run(&scene.ctx(coin), &scene.view())
            .is_empty());
    }
}
