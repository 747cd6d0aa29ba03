//! Behavior plugins and the registry that bundles them by entity kind.
//!
//! A plugin holds the per-kind logic: how the player reacts to input, how a
//! hostile chases, how an arrow flies. Plugins read the world through a
//! [`WorldView`] and return [`Output`]s; they never mutate anything.
//!
//! # Stages
//!
//! Each tick runs in a fixed sequence of [`Stage`]s. Within a stage the
//! session runs every plugin registered for that stage on every live entity
//! of the plugin's kind (in id order), then resolves the collected outputs,
//! then flushes removals. A later stage therefore sees the effects of every
//! earlier stage, which is what lets contact damage use post-movement
//! positions.
//!
//! # Example
//!
//! ```
//! use delve_core::entity::EntityTag;
//! use delve_core::output::Output;
//! use delve_core::plugin::{Plugin, PluginContext, PluginDeclaration, PluginId, PluginRegistry, Stage};
//! use delve_core::world_view::WorldView;
//! use std::sync::Arc;
//!
//! struct Idle {
//!     declaration: PluginDeclaration,
//! }
//!
//! impl Plugin for Idle {
//!     fn declaration(&self) -> &PluginDeclaration {
//!         &self.declaration
//!     }
//!
//!     fn run(&self, _ctx: &PluginContext, _view: &WorldView<'_>) -> Vec<Output> {
//!         Vec::new()
//!     }
//! }
//!
//! let mut registry = PluginRegistry::new();
//! registry.register(
//!     EntityTag::Merchant,
//!     Arc::new(Idle {
//!         declaration: PluginDeclaration {
//!             id: PluginId::new("idle"),
//!             stage: Stage::Pursuit,
//!             required_tags: vec![EntityTag::Merchant],
//!         },
//!     }),
//! );
//!
//! assert_eq!(registry.plugins_for(EntityTag::Merchant).len(), 1);
//! assert_eq!(registry.stage_plugins(Stage::Pursuit).len(), 1);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, EntityTag};
use crate::output::Output;
use crate::world_view::WorldView;

pub use crate::output::PluginId;

// =============================================================================
// Stage
// =============================================================================

/// Position of a plugin within the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Player input: movement, attacks, items, interaction.
    Player,
    /// Hostile movement toward the player.
    Pursuit,
    /// Hostile contact damage, using post-pursuit positions.
    Contact,
    /// Projectile flight and impact.
    Projectiles,
    /// Pickup collection.
    Pickups,
}

impl Stage {
    /// Every stage in execution order.
    pub const ORDER: [Self; 5] = [
        Self::Player,
        Self::Pursuit,
        Self::Contact,
        Self::Projectiles,
        Self::Pickups,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Player => "player",
            Self::Pursuit => "pursuit",
            Self::Contact => "contact",
            Self::Projectiles => "projectiles",
            Self::Pickups => "pickups",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Plugin Declaration
// =============================================================================

/// What a plugin is and where it runs.
#[derive(Debug, Clone)]
pub struct PluginDeclaration {
    /// Unique identifier for this plugin.
    pub id: PluginId,
    /// Stage the plugin runs in.
    pub stage: Stage,
    /// Entity kinds this plugin operates on.
    pub required_tags: Vec<EntityTag>,
}

impl PluginDeclaration {
    /// Checks if this plugin operates on the given entity kind.
    #[must_use]
    pub fn supports_tag(&self, tag: EntityTag) -> bool {
        self.required_tags.contains(&tag)
    }
}

// =============================================================================
// Plugin Context
// =============================================================================

/// Per-invocation information passed to a plugin.
#[derive(Debug, Clone, Copy)]
pub struct PluginContext {
    /// Entity the plugin is running on ([`EntityId::PLAYER`] for the player).
    pub entity_id: EntityId,
    /// Current tick.
    pub tick: u64,
    /// Seconds simulated this tick.
    pub dt: f32,
}

// =============================================================================
// Plugin Trait
// =============================================================================

/// Per-kind behavior.
///
/// Implementations must be deterministic: the same view and context always
/// produce the same outputs in the same order. Randomness belongs to
/// resolvers, which draw from the world's seeded generator.
pub trait Plugin: Send + Sync {
    /// Returns the plugin's declaration.
    fn declaration(&self) -> &PluginDeclaration;

    /// Runs the behavior for one entity.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Entity, tick and timestep
    /// * `view` - Read-only world state
    fn run(&self, ctx: &PluginContext, view: &WorldView<'_>) -> Vec<Output>;
}

// =============================================================================
// Plugin Registry
// =============================================================================

/// Plugins bundled by entity kind.
///
/// Keyed by an ordered map so that stage execution order never depends on
/// hashing.
#[derive(Default)]
pub struct PluginRegistry {
    bundles: BTreeMap<EntityTag, Vec<Arc<dyn Plugin>>>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bundles: BTreeMap::new(),
        }
    }

    /// Registers a plugin for one entity kind.
    pub fn register(&mut self, tag: EntityTag, plugin: Arc<dyn Plugin>) {
        self.bundles.entry(tag).or_default().push(plugin);
    }

    /// Returns the plugins registered for `tag`, in registration order.
    #[must_use]
    pub fn plugins_for(&self, tag: EntityTag) -> &[Arc<dyn Plugin>] {
        self.bundles.get(&tag).map_or(&[], Vec::as_slice)
    }

    /// Returns `(kind, plugin)` pairs that run in `stage`, ordered by kind
    /// and then by registration.
    #[must_use]
    pub fn stage_plugins(&self, stage: Stage) -> Vec<(EntityTag, &Arc<dyn Plugin>)> {
        self.bundles
            .iter()
            .flat_map(|(tag, plugins)| plugins.iter().map(move |plugin| (*tag, plugin)))
            .filter(|(_, plugin)| plugin.declaration().stage == stage)
            .collect()
    }

    /// Returns the total number of registrations.
    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.bundles.values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registration_count() == 0
    }

    /// Creates a registry with the standard game behaviors:
    ///
    /// - Player: input control
    /// - Hostiles: pursuit, then contact damage
    /// - Projectiles: flight
    /// - Pickups: collection
    ///
    /// # Example
    ///
    /// ```
    /// use delve_core::entity::EntityTag;
    /// use delve_core::plugin::PluginRegistry;
    ///
    /// let registry = PluginRegistry::default_bundles();
    /// assert_eq!(registry.plugins_for(EntityTag::Player).len(), 1);
    /// assert_eq!(registry.plugins_for(EntityTag::Hostile).len(), 2);
    /// assert!(registry.plugins_for(EntityTag::Obstacle).is_empty());
    /// ```
    #[must_use]
    pub fn default_bundles() -> Self {
        use crate::plugins::{
            ContactDamagePlugin, PickupPlugin, PlayerControlPlugin, ProjectilePlugin,
            PursuitPlugin,
        };

        let mut registry = Self::new();
        registry.register(EntityTag::Player, Arc::new(PlayerControlPlugin::new()));
        registry.register(EntityTag::Hostile, Arc::new(PursuitPlugin::new()));
        registry.register(EntityTag::Hostile, Arc::new(ContactDamagePlugin::new()));
        registry.register(EntityTag::Projectile, Arc::new(ProjectilePlugin::new()));
        registry.register(EntityTag::Pickup, Arc::new(PickupPlugin::new()));
        registry
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("bundle_count", &self.bundles.len())
            .field("registration_count", &self.registration_count())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Named {
        declaration: PluginDeclaration,
    }

    impl Named {
        fn new(id: &str, stage: Stage, tag: EntityTag) -> Self {
            Self {
                declaration: PluginDeclaration {
                    id: PluginId::new(id),
                    stage,
                    required_tags: vec![tag],
                },
            }
        }
    }

    impl Plugin for Named {
        fn declaration(&self) -> &PluginDeclaration {
            &self.declaration
        }

        fn run(&self, _ctx: &PluginContext, _view: &WorldView<'_>) -> Vec<Output> {
            Vec::new()
        }
    }

    mod registry_tests {
        use super::*;

        #[test]
        fn empty_registry() {
            let registry = PluginRegistry::new();
            assert!(registry.is_empty());
            assert!(registry.plugins_for(EntityTag::Hostile).is_empty());
        }

        #[test]
        fn stage_plugins_are_ordered_by_tag_then_registration() {
            let mut registry = PluginRegistry::new();
            registry.register(
                EntityTag::Pickup,
                Arc::new(Named::new("late_tag", Stage::Pursuit, EntityTag::Pickup)),
            );
            registry.register(
                EntityTag::Hostile,
                Arc::new(Named::new("first", Stage::Pursuit, EntityTag::Hostile)),
            );
            registry.register(
                EntityTag::Hostile,
                Arc::new(Named::new("second", Stage::Pursuit, EntityTag::Hostile)),
            );
            registry.register(
                EntityTag::Hostile,
                Arc::new(Named::new("other_stage", Stage::Contact, EntityTag::Hostile)),
            );

            let ids: Vec<_> = registry
                .stage_plugins(Stage::Pursuit)
                .into_iter()
                .map(|(_, plugin)| plugin.declaration().id.as_str().to_string())
                .collect();
            assert_eq!(ids, vec!["first", "second", "late_tag"]);
        }

        #[test]
        fn default_bundles_cover_every_stage() {
            let registry = PluginRegistry::default_bundles();
            for stage in Stage::ORDER {
                assert_eq!(registry.stage_plugins(stage).len(), 1, "stage {stage}");
            }
            assert_eq!(registry.registration_count(), 5);
        }

        #[test]
        fn declarations_match_registration_tag() {
            let registry = PluginRegistry::default_bundles();
            for stage in Stage::ORDER {
                for (tag, plugin) in registry.stage_plugins(stage) {
                    assert!(plugin.declaration().supports_tag(tag));
                }
            }
        }

        #[test]
        fn debug_shows_counts() {
            let debug = format!("{:?}", PluginRegistry::default_bundles());
            assert!(debug.contains("registration_count: 5"));
        }
    }

    #[test]
    fn stage_order_is_fixed() {
        assert_eq!(
            Stage::ORDER,
            [
                Stage::Player,
                Stage::Pursuit,
                Stage::Contact,
                Stage::Projectiles,
                Stage::Pickups
            ]
        );
        assert!(Stage::Player < Stage::Pickups);
    }
}
