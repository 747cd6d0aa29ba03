//! Inventory resolver: weapon swaps, health bottles and pickups.

use tracing::debug;

use crate::config::SessionConfig;
use crate::entity::{Entity, EntityId, PickupKind};
use crate::loot::PickupYields;
use crate::output::{Command, Modifier, Output, OutputEnvelope, OutputKind};
use crate::player::{HealOutcome, Player};
use crate::world::{GameEvent, World};

use super::Resolver;

/// Resolver for `Equip`, `UseHealConsumable` and `CollectPickup`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InventoryResolver {
    heal_amount: f32,
    yields: PickupYields,
}

impl InventoryResolver {
    /// Creates an inventory resolver from the session configuration.
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            heal_amount: config.player.heal_amount,
            yields: config.yields,
        }
    }

    fn use_heal(&self, world: &mut World) {
        match world.player.use_heal(self.heal_amount) {
            HealOutcome::Healed(amount) => {
                world.notify(format!("Healed for {amount} HP."));
                world.record(GameEvent::Healed { amount });
            }
            HealOutcome::AlreadyFull => world.notify("Health is already full."),
            HealOutcome::NoneLeft => world.notify("No health bottles!"),
        }
    }

    fn collect(&self, world: &mut World, target: EntityId) {
        let Some(kind) = world
            .arena
            .get_live(target)
            .and_then(Entity::as_pickup)
            .map(|pickup| pickup.kind)
        else {
            return;
        };
        if !world.arena.mark_for_removal(target) {
            return;
        }

        let amount = self.yields.amount(kind);
        credit(&mut world.player, kind, amount);
        debug!(?kind, amount, "pickup collected");
        world.notify(match kind {
            PickupKind::Ammunition => format!("Picked up {amount} arrows."),
            _ => format!("Picked up {kind}."),
        });
        world.record(GameEvent::PickupCollected { kind, amount });
    }
}

fn credit(player: &mut Player, kind: PickupKind, amount: u32) {
    let counter = match kind {
        PickupKind::Currency => &mut player.currency,
        PickupKind::Ammunition => &mut player.ammunition,
        PickupKind::HealConsumable => &mut player.heal_consumables,
        PickupKind::Key => &mut player.keys,
    };
    *counter = counter.saturating_add(amount);
}

impl Resolver for InventoryResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Command, OutputKind::Modifier]
    }

    fn resolve(&self, outputs: &[&OutputEnvelope], world: &mut World) {
        for envelope in outputs {
            match envelope.output() {
                Output::Command(Command::Equip { tool }) => {
                    world.player.tool = *tool;
                    world.notify(format!("Equipped {tool}."));
                }
                Output::Modifier(Modifier::UseHealConsumable) => self.use_heal(world),
                Output::Modifier(Modifier::CollectPickup { target }) => {
                    self.collect(world, *target);
                }
                _ => {}
            }
        }
    }
}
