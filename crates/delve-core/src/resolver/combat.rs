//! Combat resolver for attacks, damage, containers and arrows.
//!
//! The `CombatResolver` handles:
//! - `BeginAttack`: starts the player's cooldown and raises the attacking flag
//! - `ApplyDamage`: hurts the player or a hostile; deaths are reported once
//! - `DestroyContainer`: removes a pot and drops one item from the loot table
//! - `FireProjectile`: spends an arrow and spawns it, or reports none left
//! - `Retire`: removes a projectile
//!
//! # Removal
//!
//! Killed hostiles and broken containers are marked, not dropped. A marked
//! entity is invisible to later outputs in the same stage, so a pot struck by
//! the sword and an arrow on the same tick drops loot exactly once.

use glam::Vec2;
use tracing::{debug, info};

use crate::config::{ProjectileConfig, SessionConfig};
use crate::entity::{DamageOutcome, Entity, EntityId, EntityInner, EntityTag, ProjectileComponents};
use crate::geometry::Rect;
use crate::loot::LootTable;
use crate::output::{Command, Modifier, Output, OutputEnvelope, OutputKind};
use crate::phase::PhaseTrigger;
use crate::player::Facing;
use crate::world::{GameEvent, World};

use super::Resolver;

/// Notice posted when the player dies.
pub const PLAYER_FELL: &str = "You have fallen!";

/// Notice posted when the bow is fired without arrows.
pub const OUT_OF_ARROWS: &str = "Out of arrows!";

const FIRED: &str = "Thwip!";

/// Resolver for combat outputs.
///
/// # Example
///
/// ```
/// use delve_core::config::SessionConfig;
/// use delve_core::output::OutputKind;
/// use delve_core::resolver::{CombatResolver, Resolver};
///
/// let resolver = CombatResolver::from_config(&SessionConfig::default());
/// assert!(resolver.handles().contains(&OutputKind::Modifier));
/// assert!(resolver.handles().contains(&OutputKind::Command));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CombatResolver {
    loot: LootTable,
    attack_cooldown: f32,
    attack_duration: f32,
    contact_interval: Option<f32>,
    projectile: ProjectileConfig,
    pickup_size: f32,
}

impl CombatResolver {
    /// Creates a combat resolver from the session configuration.
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            loot: config.loot.clone(),
            attack_cooldown: config.player.attack_cooldown,
            attack_duration: config.player.attack_duration,
            contact_interval: config.hostile.contact_interval,
            projectile: config.projectile,
            pickup_size: config.tile_size * 0.5,
        }
    }

    /// Hurts the player. Death notifies, journals and requests game over
    /// exactly once; damage after death is ignored.
    fn damage_player(&self, world: &mut World, source: EntityId, amount: f32) {
        match world.player.apply_damage(amount) {
            DamageOutcome::Survived => {
                let remaining = world.player.health.current();
                world.record(GameEvent::PlayerHurt {
                    source,
                    amount,
                    remaining,
                });
            }
            DamageOutcome::Died => {
                info!(%source, "player died");
                world.notify(PLAYER_FELL);
                world.record(GameEvent::PlayerDied { source });
                world.request_phase(PhaseTrigger::PlayerDied);
            }
            DamageOutcome::AlreadyDead => {}
        }

        if let Some(interval) = self.contact_interval {
            if let Some(hostile) = world
                .arena
                .get_live_mut(source)
                .and_then(Entity::as_hostile_mut)
            {
                hostile.contact_timer = interval;
            }
        }
    }

    fn damage_hostile(world: &mut World, target: EntityId, amount: f32) {
        let Some(hostile) = world
            .arena
            .get_live_mut(target)
            .and_then(Entity::as_hostile_mut)
        else {
            return;
        };
        let outcome = hostile.health.apply_damage(amount);
        let remaining = hostile.health.current();

        match outcome {
            DamageOutcome::Survived => {
                world.record(GameEvent::HostileHurt {
                    id: target,
                    remaining,
                });
            }
            DamageOutcome::Died => {
                world.arena.mark_for_removal(target);
                debug!(%target, "hostile slain");
                world.record(GameEvent::HostileSlain { id: target });
            }
            DamageOutcome::AlreadyDead => {}
        }
    }

    fn destroy_container(&self, world: &mut World, target: EntityId) {
        let Some(center) = world
            .arena
            .get_live(target)
            .filter(|entity| entity.tag() == EntityTag::Container)
            .map(|entity| entity.rect().center())
        else {
            return;
        };
        if !world.arena.mark_for_removal(target) {
            return;
        }

        let drop = self.loot.draw(world.rng_mut());
        world.spawn_pickup(center, drop, self.pickup_size);
        debug!(%target, ?drop, "container broken");
        world.notify(format!("Pot dropped {}!", drop.name()));
        world.record(GameEvent::ContainerBroken { id: target, drop });
    }

    fn fire(&self, world: &mut World, origin: Vec2, facing: Facing) {
        let Some(remaining) = world.player.ammunition.checked_sub(1) else {
            world.notify(OUT_OF_ARROWS);
            return;
        };
        world.player.ammunition = remaining;

        let id = world
            .arena
            .spawn(EntityInner::Projectile(ProjectileComponents::new(
                Rect::from_center_size(origin, Vec2::splat(self.projectile.size)),
                facing.unit() * self.projectile.speed,
                world.player.damage,
            )));
        world.notify(FIRED);
        world.record(GameEvent::ProjectileFired { id });
    }
}

impl Resolver for CombatResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Command, OutputKind::Modifier]
    }

    fn resolve(&self, outputs: &[&OutputEnvelope], world: &mut World) {
        for envelope in outputs {
            match envelope.output() {
                Output::Modifier(Modifier::BeginAttack) => {
                    world
                        .player
                        .begin_attack(self.attack_cooldown, self.attack_duration);
                }
                Output::Modifier(Modifier::ApplyDamage {
                    source,
                    target,
                    amount,
                }) => {
                    if target.is_player() {
                        self.damage_player(world, *source, *amount);
                    } else {
                        Self::damage_hostile(world, *target, *amount);
                    }
                }
                Output::Modifier(Modifier::DestroyContainer { target }) => {
                    self.destroy_container(world, *target);
                }
                Output::Command(Command::FireProjectile { origin, facing }) => {
                    self.fire(world, *origin, *facing);
                }
                Output::Command(Command::Retire { target }) => {
                    world.arena.mark_for_removal(*target);
                }
                _ => {}
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
