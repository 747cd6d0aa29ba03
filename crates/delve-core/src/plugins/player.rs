//! Player control plugin.
//!
//! Translates one [`InputFrame`](crate::input::InputFrame) into outputs:
//! weapon swaps, bottle use, facing, attacks, movement and interaction. Attack
//! targets are chosen from positions at the start of the tick, before this
//! tick's movement is resolved.

use crate::entity::{EntityId, EntityTag};
use crate::geometry::normalize_diagonal;
use crate::input::Intents;
use crate::output::{Command, Event, Modifier, Output, PluginId};
use crate::player::{melee_hitbox, Facing, Tool};
use crate::plugin::{Plugin, PluginContext, PluginDeclaration, Stage};
use crate::world_view::WorldView;

/// Notice shown when interact is pressed with nothing in reach.
pub const NOTHING_IN_REACH: &str = "Nothing to interact with.";

/// Drives the player from input.
///
/// # Example
///
/// ```
/// use delve_core::plugins::PlayerControlPlugin;
/// use delve_core::plugin::{Plugin, Stage};
///
/// let plugin = PlayerControlPlugin::new();
/// assert_eq!(plugin.declaration().id.as_str(), "player_control");
/// assert_eq!(plugin.declaration().stage, Stage::Player);
/// ```
pub struct PlayerControlPlugin {
    declaration: PluginDeclaration,
}

impl PlayerControlPlugin {
    /// Creates a new `PlayerControlPlugin`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: PluginDeclaration {
                id: PluginId::new("player_control"),
                stage: Stage::Player,
                required_tags: vec![EntityTag::Player],
            },
        }
    }
}

impl Default for PlayerControlPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for PlayerControlPlugin {
    fn declaration(&self) -> &PluginDeclaration {
        &self.declaration
    }

    fn run(&self, _ctx: &PluginContext, view: &WorldView<'_>) -> Vec<Output> {
        let player = view.player();
        let input = view.input();
        let mut outputs = Vec::new();

        if input.pressed(Intents::EQUIP_MELEE) {
            outputs.push(Command::Equip { tool: Tool::Melee }.into());
        } else if input.pressed(Intents::EQUIP_RANGED) {
            outputs.push(Command::Equip { tool: Tool::Ranged }.into());
        }

        if input.pressed(Intents::USE_HEAL) {
            outputs.push(Modifier::UseHealConsumable.into());
        }

        let facing = input.facing().unwrap_or(player.facing);
        if facing != player.facing {
            outputs.push(Command::Face { facing }.into());
        }

        if input.pressed(Intents::ATTACK) && player.attack_ready() {
            outputs.push(Modifier::BeginAttack.into());
            match player.tool {
                Tool::Melee => outputs.extend(melee_strike(view, facing)),
                Tool::Ranged => outputs.push(
                    Command::FireProjectile {
                        origin: player.body.center(),
                        facing,
                    }
                    .into(),
                ),
            }
        }

        outputs.push(
            Command::Move {
                target: EntityId::PLAYER,
                velocity: normalize_diagonal(input.movement()) * player.speed,
            }
            .into(),
        );

        if input.pressed(Intents::INTERACT) && player.interaction_ready() {
            outputs.push(match player.interaction_target {
                Some(target) => Command::Interact { target }.into(),
                None => Event::Notice {
                    text: NOTHING_IN_REACH.to_string(),
                }
                .into(),
            });
        }

        outputs
    }
}

/// Damages every hostile and breaks every container the sword touches.
fn melee_strike(view: &WorldView<'_>, facing: Facing) -> Vec<Output> {
    let player = view.player();
    let hitbox = melee_hitbox(player.body.rect, facing, view.config().tile_size);
    let mut outputs: Vec<Output> = vec![Event::Swing.into()];

    outputs.extend(
        view.hostiles()
            .filter(|(_, hostile)| hitbox.intersects(&hostile.body.hit))
            .map(|(target, _)| {
                Modifier::ApplyDamage {
                    source: EntityId::PLAYER,
                    target,
                    amount: player.damage,
                }
                .into()
            }),
    );
    outputs.extend(
        view.containers()
            .filter(|(_, rect)| hitbox.intersects(rect))
            .map(|(target, _)| Modifier::DestroyContainer { target }.into()),
    );

    outputs
}

// =============================================================================
// Tests
// =============================================================================
