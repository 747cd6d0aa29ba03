//! Interaction resolver for doors and merchants.
//!
//! Every `Interact` restarts the player's interaction cooldown, whether or
//! not anything happened, so holding the key cannot spam a locked door.

use tracing::debug;

use crate::config::SessionConfig;
use crate::entity::{Entity, EntityId, EntityTag};
use crate::interaction::{unlock_door, DoorOutcome, MerchantState};
use crate::output::{Command, OutputEnvelope, OutputKind};
use crate::phase::PhaseTrigger;
use crate::world::{GameEvent, World};

use super::Resolver;

/// Notice posted when a door opens.
pub const DOOR_UNLOCKED: &str = "The door unlocks.";

/// Notice posted when the player has no key.
pub const DOOR_LOCKED: &str = "The door is locked. You need a key.";

/// Resolver for `Interact` commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionResolver {
    cooldown: f32,
}

impl InteractionResolver {
    /// Creates an interaction resolver from the session configuration.
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            cooldown: config.player.interact_cooldown,
        }
    }

    fn interact(&self, world: &mut World, target: EntityId) {
        world.player.interact_cooldown = self.cooldown;
        match world.arena.get_live(target).map(Entity::tag) {
            Some(EntityTag::Door) => Self::try_door(world, target),
            Some(EntityTag::Merchant) => Self::open_merchant(world, target),
            _ => {}
        }
    }

    fn try_door(world: &mut World, target: EntityId) {
        match unlock_door(&mut world.player) {
            DoorOutcome::Unlocked => {
                world.arena.mark_for_removal(target);
                debug!(%target, keys = world.player.keys, "door unlocked");
                world.notify(DOOR_UNLOCKED);
                world.record(GameEvent::DoorUnlocked { id: target });
            }
            DoorOutcome::Locked => world.notify(DOOR_LOCKED),
        }
    }

    fn open_merchant(world: &mut World, target: EntityId) {
        if let Some(merchant) = world
            .arena
            .get_live_mut(target)
            .and_then(Entity::as_merchant_mut)
        {
            merchant.state = MerchantState::Open;
        }
        world.player.dialogue_active = true;
        world.request_phase(PhaseTrigger::OpenDialogue(target));
        world.record(GameEvent::DialogueOpened { merchant: target });
    }
}

impl Resolver for InteractionResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Command]
    }

    fn resolve(&self, outputs: &[&OutputEnvelope], world: &mut World) {
        for envelope in outputs {
            if let Some(Command::Interact { target }) = envelope.output().as_command() {
                self.interact(world, *target);
            }
        }
    }
}
