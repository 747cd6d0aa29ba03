//! Resolvers turn plugin outputs into state changes.
//!
//! Resolvers are the only code that mutates the [`World`] during a tick. After
//! every stage the session routes the collected outputs to each resolver
//! whose [`Resolver::handles()`] list contains the output's kind, in this
//! order:
//!
//! 1. [`PhysicsResolver`]: movement with per-axis collision, facing
//! 2. [`CombatResolver`]: attacks, damage, deaths, containers and loot, arrows
//! 3. [`InventoryResolver`]: equipping, health bottles, pickups
//! 4. [`InteractionResolver`]: doors and merchants
//! 5. [`EventResolver`]: notifications and the event journal
//!
//! A resolver ignores outputs of a routed kind that are not its concern, so
//! two resolvers may both receive `Command`s without stepping on each other.
//!
//! # Invariants
//!
//! - Outputs are applied in envelope order; resolvers must be deterministic
//!   given that order
//! - Entities are only ever marked for removal here, never dropped; the
//!   session flushes them after all resolvers have run
//! - Phase changes are requested through [`World::request_phase`], not applied

mod combat;
mod event;
mod interaction;
mod inventory;
mod physics;

pub use combat::{CombatResolver, OUT_OF_ARROWS, PLAYER_FELL};
pub use event::{EventResolver, SWING};
pub use interaction::{InteractionResolver, DOOR_LOCKED, DOOR_UNLOCKED};
pub use inventory::InventoryResolver;
pub use physics::PhysicsResolver;

use crate::config::SessionConfig;
use crate::output::{OutputEnvelope, OutputKind};
use crate::world::World;

/// Applies routed outputs to the world.
///
/// # Example
///
/// ```
/// use delve_core::output::{OutputEnvelope, OutputKind};
/// use delve_core::resolver::Resolver;
/// use delve_core::world::World;
///
/// struct Tally;
///
/// impl Resolver for Tally {
///     fn handles(&self) -> &[OutputKind] {
///         &[OutputKind::Event]
///     }
///
///     fn resolve(&self, outputs: &[&OutputEnvelope], world: &mut World) {
///         world.notify(format!("{} events", outputs.len()));
///     }
/// }
/// ```
pub trait Resolver: Send + Sync {
    /// Returns the output kinds this resolver receives.
    fn handles(&self) -> &[OutputKind];

    /// Applies outputs to the world.
    ///
    /// # Arguments
    ///
    /// * `outputs` - Outputs of the handled kinds, in envelope order
    /// * `world` - State to mutate
    fn resolve(&self, outputs: &[&OutputEnvelope], world: &mut World);
}

/// Builds the standard resolver chain in execution order.
#[must_use]
pub fn default_chain(config: &SessionConfig) -> Vec<Box<dyn Resolver>> {
    vec![
        Box::new(PhysicsResolver::with_dt(config.fixed_dt)),
        Box::new(CombatResolver::from_config(config)),
        Box::new(InventoryResolver::from_config(config)),
        Box::new(InteractionResolver::from_config(config)),
        Box::new(EventResolver::new()),
    ]
}
