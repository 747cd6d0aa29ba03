//! Hostile pursuit plugin.
//!
//! A hostile walks straight at the player's center while the player is within
//! its aggro radius and no dialogue is open. Otherwise it stands still.

use glam::Vec2;

use crate::entity::EntityTag;
use crate::output::{Command, Output, PluginId};
use crate::plugin::{Plugin, PluginContext, PluginDeclaration, Stage};
use crate::world_view::WorldView;

/// Moves hostiles toward a nearby player.
pub struct PursuitPlugin {
    declaration: PluginDeclaration,
}

impl PursuitPlugin {
    /// Creates a new `PursuitPlugin`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: PluginDeclaration {
                id: PluginId::new("pursuit"),
                stage: Stage::Pursuit,
                required_tags: vec![EntityTag::Hostile],
            },
        }
    }
}

impl Default for PursuitPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for PursuitPlugin {
    fn declaration(&self) -> &PluginDeclaration {
        &self.declaration
    }

    fn run(&self, ctx: &PluginContext, view: &WorldView<'_>) -> Vec<Output> {
        let Some(hostile) = view.hostile(ctx.entity_id) else {
            return Vec::new();
        };
        let player = view.player();

        let offset = player.body.center() - hostile.body.center();
        let velocity = if !player.dialogue_active && offset.length() <= hostile.aggro_radius {
            offset.normalize_or_zero() * hostile.speed
        } else {
            Vec2::ZERO
        };

        vec![Command::Move {
            target: ctx.entity_id,
            velocity,
        }
        .into()]
    }
}
