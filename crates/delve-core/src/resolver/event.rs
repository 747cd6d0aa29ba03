//! Event resolver: turns events into notifications and journal entries.
//!
//! Unlike the other resolvers it never touches entities or the player.

use crate::output::{Event, OutputEnvelope, OutputKind};
use crate::world::{GameEvent, World};

use super::Resolver;

/// Notice posted for a sword swing.
pub const SWING: &str = "Swish!";

/// Resolver that reports events to the player.
///
/// # Example
///
/// ```
/// use delve_core::resolver::{EventResolver, Resolver};
/// use delve_core::output::OutputKind;
///
/// let resolver = EventResolver::new();
/// assert_eq!(resolver.handles(), &[OutputKind::Event]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EventResolver;

impl EventResolver {
    /// Creates a new event resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Resolver for EventResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Event]
    }

    fn resolve(&self, outputs: &[&OutputEnvelope], world: &mut World) {
        for envelope in outputs {
            match envelope.output().as_event() {
                Some(Event::Swing) => {
                    world.notify(SWING);
                    world.record(GameEvent::Swing);
                }
                Some(Event::Notice { text }) => world.notify(text.as_str()),
                None => {}
            }
        }
    }
}
