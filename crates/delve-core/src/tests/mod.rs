//! Crate-level tests that drive whole sessions.
//!
//! - `integration.rs`: end-to-end gameplay scenarios and phase flows
//! - `determinism.rs`: same seed and input produce the same snapshots
//! - `properties.rs`: `proptest` checks for collision, health and trades
//! - `helpers.rs`: level builders and input drivers

mod helpers;
mod properties;

pub use helpers::*;
