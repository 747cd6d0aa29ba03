//! Standard game behaviors.
//!
//! - [`PlayerControlPlugin`]: turns input into movement, attacks, item use and interaction
//! - [`PursuitPlugin`]: moves hostiles toward a nearby player
//! - [`ContactDamagePlugin`]: hurts the player while a hostile touches them
//! - [`ProjectilePlugin`]: flies arrows and detects impacts
//! - [`PickupPlugin`]: collects items the player walks over
//!
//! Use [`PluginRegistry::default_bundles()`](crate::plugin::PluginRegistry::default_bundles)
//! to get a registry with all of them registered for the right kinds.

mod contact;
mod pickup;
mod player;
mod projectile;
mod pursuit;

pub use contact::ContactDamagePlugin;
pub use pickup::PickupPlugin;
pub use player::{PlayerControlPlugin, NOTHING_IN_REACH};
pub use projectile::ProjectilePlugin;
pub use pursuit::PursuitPlugin;
