//! Contact damage plugin.

use crate::entity::{EntityId, EntityTag};
use crate::output::{Modifier, Output, PluginId};
use crate::plugin::{Plugin, PluginContext, PluginDeclaration, Stage};
use crate::world_view::WorldView;

/// Hurts the player while a hostile's hit rectangle overlaps theirs.
///
/// Without a configured contact interval the damage lands every tick of
/// overlap. With one, a hostile waits for its contact timer to run out
/// between hits.
pub struct ContactDamagePlugin {
    declaration: PluginDeclaration,
}

impl ContactDamagePlugin {
    /// Creates a new `ContactDamagePlugin`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: PluginDeclaration {
                id: PluginId::new("contact_damage"),
                stage: Stage::Contact,
                required_tags: vec![EntityTag::Hostile],
            },
        }
    }
}

impl Default for ContactDamagePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for ContactDamagePlugin {
    fn declaration(&self) -> &PluginDeclaration {
        &self.declaration
    }

    fn run(&self, ctx: &PluginContext, view: &WorldView<'_>) -> Vec<Output> {
        let Some(hostile) = view.hostile(ctx.entity_id) else {
            return Vec::new();
        };

        let ready =
            view.config().hostile.contact_interval.is_none() || hostile.contact_timer <= 0.0;
        if !ready || !hostile.body.hit.intersects(&view.player().body.hit) {
            return Vec::new();
        }

        vec![Modifier::ApplyDamage {
            source: ctx.entity_id,
            target: EntityId::PLAYER,
            amount: hostile.contact_damage,
        }
        .into()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::fixture::Scene;
    use glam::Vec2;

    fn run(scene: &Scene, id: EntityId) -> Vec<Output> {
        ContactDamagePlugin::new().run(&scene.ctx(id), &scene.view())
    }

    #[test]
    fn overlapping_hostile_deals_damage() {
        let mut scene = Scene::new();
        let hostile = scene.spawn_hostile(Vec2::new(280.0, 256.0));

        assert_eq!(
            run(&scene, hostile),
            vec![Modifier::ApplyDamage {
                source: hostile,
                target: EntityId::PLAYER,
                amount: 10.0,
            }
            .into()]
        );
    }

    #[test]
    fn adjacent_hostile_does_not() {
        let mut scene = Scene::new();
        // Tiles touch but 35 px hit rects are far apart.
        let hostile = scene.spawn_hostile(Vec2::new(320.0, 256.0));
        assert!(run(&scene, hostile).is_empty());
    }

    #[test]
    fn interval_gates_damage() {
        let mut scene = Scene::new();
        scene.config.hostile.contact_interval = Some(0.5);
        let hostile = scene.spawn_hostile(Vec2::new(280.0, 256.0));
        assert_eq!(run(&scene, hostile).len(), 1);

        if let Some(components) = scene
            .arena
            .get_mut(hostile)
            .and_then(crate::entity::Entity::as_hostile_mut)
        {
            components.contact_timer = 0.25;
        }
        assert!(run(&scene, hostile).is_empty());
    }
}
