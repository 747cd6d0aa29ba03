//! # Delve Core
//!
//! Entity simulation and interaction resolution for Delve, a real-time,
//! tile-oriented action game.
//!
//! This crate is the deterministic game engine. Rendering, audio, raw input
//! polling and windowing live outside it and only exchange plain data with
//! the core: [`InputFrame`](input::InputFrame)s in and
//! [`Snapshot`](snapshot::Snapshot)s out.
//!
//! ## Architecture
//!
//! Entity-Plugin-Resolver, run in stages:
//!
//! - **Entities**: hostiles, walls, pots, arrows, pickups, merchants, doors,
//!   stored in an ordered [`Arena`](arena::Arena); the player lives beside it
//! - **Plugins**: per-kind behaviors that read a frozen
//!   [`WorldView`](world_view::WorldView) and emit [`Output`](output::Output)s
//! - **Resolvers**: the only code that mutates the [`World`](world::World)
//!
//! A [`Session`](session::Session) runs the stages, the phase machine and the
//! camera once per fixed tick.
//!
//! ## Usage
//!
//! ```
//! use delve_core::{InputFrame, Intents, Session, SessionConfig, WorldDescriptor};
//!
//! let level = r#"{ "player_spawn": { "x": 3, "y": 3 }, "walls": [] }"#;
//! let descriptor = WorldDescriptor::from_json(level).unwrap();
//! let mut session = Session::new(7, SessionConfig::default(), descriptor).unwrap();
//!
//! session.step(&InputFrame::idle());
//! session.step(&InputFrame::new(Intents::RIGHT));
//!
//! let snapshot = session.snapshot();
//! assert_eq!(snapshot.tick, 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod camera;
pub mod config;
pub mod descriptor;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod loot;
pub mod notify;
pub mod output;
pub mod phase;
pub mod player;
pub mod plugin;
pub mod plugins;
pub mod resolver;
pub mod session;
pub mod snapshot;
pub mod world;
pub mod world_view;

#[cfg(test)]
mod tests;

pub use config::SessionConfig;
pub use descriptor::WorldDescriptor;
pub use error::{ConfigError, SessionError, WorldError};
pub use input::{InputFrame, Intents};
pub use phase::Phase;
pub use session::Session;
pub use snapshot::Snapshot;
pub use world::GameEvent;
