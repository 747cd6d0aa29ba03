//! Projectile flight plugin.
//!
//! Every tick an arrow requests its move and checks the rectangle it is about
//! to occupy. It retires when it has flown for its full lifetime, when it
//! would leave the visible area (plus a margin), or when it strikes something.
//! Hostiles take damage, containers break, walls and doors just stop it.
//! An arrow that clips two hostiles on the same tick hurts both.

use crate::entity::EntityTag;
use crate::output::{Command, Modifier, Output, PluginId};
use crate::plugin::{Plugin, PluginContext, PluginDeclaration, Stage};
use crate::world_view::WorldView;

/// Moves arrows and detects impacts.
pub struct ProjectilePlugin {
    declaration: PluginDeclaration,
}

impl ProjectilePlugin {
    /// Creates a new `ProjectilePlugin`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: PluginDeclaration {
                id: PluginId::new("projectile"),
                stage: Stage::Projectiles,
                required_tags: vec![EntityTag::Projectile],
            },
        }
    }
}

impl Default for ProjectilePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for ProjectilePlugin {
    fn declaration(&self) -> &PluginDeclaration {
        &self.declaration
    }

    fn run(&self, ctx: &PluginContext, view: &WorldView<'_>) -> Vec<Output> {
        let id = ctx.entity_id;
        let Some(projectile) = view.projectile(id) else {
            return Vec::new();
        };
        let config = &view.config().projectile;

        let mut outputs: Vec<Output> = vec![Command::Move {
            target: id,
            velocity: projectile.velocity,
        }
        .into()];

        let next = projectile.rect.translate(projectile.velocity * ctx.dt);
        let visible = view.view_rect().inflate(config.cull_margin);
        if projectile.age >= config.lifetime || !visible.intersects(&next) {
            outputs.push(Command::Retire { target: id }.into());
            return outputs;
        }

        let mut impact = false;
        for (target, hostile) in view.hostiles() {
            if next.intersects(&hostile.body.hit) {
                outputs.push(
                    Modifier::ApplyDamage {
                        source: id,
                        target,
                        amount: projectile.damage,
                    }
                    .into(),
                );
                impact = true;
            }
        }
        for (target, rect) in view.containers() {
            if next.intersects(&rect) {
                outputs.push(Modifier::DestroyContainer { target }.into());
                impact = true;
            }
        }
        impact |= view.barriers().any(|(_, rect)| next.intersects(&rect));

        if impact {
            outputs.push(Command::Retire { target: id }.into());
        }
        outputs
    }
}
