//! Session controller with the staged tick loop.
//!
//! A [`Session`] owns the single [`World`] and drives it one fixed tick at a
//! time. Every tick walks the same path regardless of phase:
//!
//! 1. **INPUT**: read the frame; `QUIT` only raises a flag for the host
//! 2. **PHASE**: phase-specific handling (pause toggles, dialogue menu,
//!    respawn)
//! 3. **STAGES** (Playing only): for each [`Stage`] in order, run its plugins
//!    in parallel against a frozen [`WorldView`], hand the outputs to every
//!    resolver in chain order, flush removals, then apply at most one
//!    requested phase change. Stages stop once the phase leaves Playing.
//! 4. **CAMERA**: follow the player's center
//! 5. **CLOCK**: advance the clock and the tick counter
//!
//! # Determinism
//!
//! Plugins run in parallel, but their outputs are collected in job order
//! (kind, then registration, then entity id), so resolvers always see the
//! same sequence. All randomness comes from the world's seeded generator.
//!
//! # Example
//!
//! ```
//! use delve_core::config::SessionConfig;
//! use delve_core::descriptor::{TilePos, WorldDescriptor};
//! use delve_core::input::InputFrame;
//! use delve_core::phase::Phase;
//! use delve_core::session::Session;
//!
//! let descriptor = WorldDescriptor {
//!     player_spawn: Some(TilePos::new(2, 2)),
//!     ..WorldDescriptor::default()
//! };
//! let mut session = Session::new(42, SessionConfig::default(), descriptor).unwrap();
//!
//! for _ in 0..10 {
//!     session.step(&InputFrame::idle());
//! }
//!
//! assert_eq!(session.tick(), 10);
//! assert_eq!(session.phase(), Phase::Playing);
//! ```

use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, trace};

use crate::camera::{Camera, WorldBounds};
use crate::config::SessionConfig;
use crate::descriptor::{TilePos, WorldDescriptor};
use crate::entity::{Entity, EntityId, EntityTag};
use crate::error::SessionError;
use crate::input::{InputFrame, Intents};
use crate::interaction::{confirm_offer, DialogueState, MerchantState, TradeOutcome};
use crate::output::{OutputEnvelope, PluginInstanceId};
use crate::phase::{Phase, PhaseTrigger};
use crate::plugin::{Plugin, PluginContext, PluginRegistry, Stage};
use crate::resolver::{default_chain, Resolver};
use crate::snapshot::Snapshot;
use crate::world::{GameEvent, World};
use crate::world_view::WorldView;

/// Notice posted when the game is paused.
pub const GAME_PAUSED: &str = "Game Paused";

/// Notice posted when a purchase is refused.
pub const NOT_ENOUGH_COINS: &str = "Not enough coins.";

// =============================================================================
// Session
// =============================================================================

/// One playthrough of one level.
///
/// `Session` manages:
/// - The world (arena, player, notifications, loot generator)
/// - The phase machine
/// - Plugin registry and resolver chain
/// - The follow camera
///
/// The session is the only mutator of its world. Independent sessions share
/// nothing and may run on different threads.
pub struct Session {
    config: SessionConfig,
    descriptor: WorldDescriptor,
    spawn: TilePos,
    world: World,
    camera: Camera,
    phase: Phase,
    plugins: PluginRegistry,
    resolvers: Vec<Box<dyn Resolver>>,
    tick: u64,
    seed: u64,
    exit_requested: bool,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("tick", &self.tick)
            .field("seed", &self.seed)
            .field("phase", &self.phase)
            .field("world", &self.world)
            .field("camera", &self.camera)
            .field(
                "plugins",
                &format!("[{} plugins]", self.plugins.registration_count()),
            )
            .field("resolvers", &format!("[{} resolvers]", self.resolvers.len()))
            .field("exit_requested", &self.exit_requested)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a session in the `Start` phase with the level populated.
    ///
    /// The first [`step`](Self::step) moves it to `Playing`.
    ///
    /// # Arguments
    ///
    /// * `seed` - Seed for every random draw in the session
    /// * `config` - Gameplay constants
    /// * `descriptor` - Level layout
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if `config` fails validation and
    /// [`SessionError::World`] if the descriptor has no player spawn.
    pub fn new(
        seed: u64,
        config: SessionConfig,
        descriptor: WorldDescriptor,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let spawn = descriptor.spawn()?;

        let bounds = WorldBounds::resolve(
            config.camera.bounds,
            descriptor.map_size(config.tile_size),
        );
        let mut camera = Camera::from_config(&config.camera, bounds);

        let mut world = World::new(seed, &config, spawn);
        world.populate(&descriptor, spawn, &config);
        camera.update(world.player.body.center());

        info!(seed, entities = world.arena.entity_count(), "session created");

        Ok(Self {
            resolvers: default_chain(&config),
            config,
            descriptor,
            spawn,
            world,
            camera,
            phase: Phase::Start,
            plugins: PluginRegistry::default_bundles(),
            tick: 0,
            seed,
            exit_requested: false,
        })
    }

    /// Runs one fixed tick.
    pub fn step(&mut self, input: &InputFrame) {
        if input.pressed(Intents::QUIT) {
            self.exit_requested = true;
        }

        let phase = self.phase;
        match phase {
            Phase::Start => {
                self.transition(PhaseTrigger::Initialized);
            }
            Phase::Playing => self.step_playing(input),
            Phase::Paused => {
                if input.pressed(Intents::PAUSE) {
                    self.transition(PhaseTrigger::Resume);
                }
            }
            Phase::Dialogue(dialogue) => self.step_dialogue(input, dialogue),
            Phase::GameOver => {
                if input.pressed(Intents::RESPAWN) {
                    self.respawn();
                }
            }
        }

        self.camera.update(self.world.player.body.center());
        self.world.advance_clock(self.config.fixed_dt);
        self.tick += 1;
    }

    // =========================================================================
    // Playing
    // =========================================================================

    fn step_playing(&mut self, input: &InputFrame) {
        if input.pressed(Intents::PAUSE) {
            self.world.notifications.clear();
            self.world.notify(GAME_PAUSED);
            self.transition(PhaseTrigger::Pause);
            return;
        }

        self.world.tick_timers(self.config.fixed_dt);

        for stage in Stage::ORDER {
            if stage == Stage::Player {
                self.world
                    .refresh_interaction_target(self.config.player.interact_reach);
            }

            let outputs = self.run_stage(stage, input);
            for resolver in &self.resolvers {
                let relevant: Vec<_> = outputs
                    .iter()
                    .filter(|o| resolver.handles().contains(&o.kind()))
                    .collect();
                if !relevant.is_empty() {
                    resolver.resolve(&relevant, &mut self.world);
                }
            }
            let removed = self.world.arena.flush_removals();
            trace!(tick = self.tick, %stage, outputs = outputs.len(), removed, "stage resolved");

            if let Some(trigger) = self.world.take_phase_request() {
                self.transition(trigger);
            }
            if !self.phase.is_playing() {
                break;
            }
        }
    }

    /// Runs every plugin of `stage` against a frozen view.
    ///
    /// Jobs are laid out as (kind, plugin, entity) in registry and id order
    /// before the parallel run; collecting preserves that order.
    fn run_stage(&self, stage: Stage, input: &InputFrame) -> Vec<OutputEnvelope> {
        let jobs: Vec<(EntityId, &Arc<dyn Plugin>)> = self
            .plugins
            .stage_plugins(stage)
            .into_iter()
            .flat_map(|(tag, plugin)| {
                let ids: Vec<EntityId> = if tag == EntityTag::Player {
                    vec![EntityId::PLAYER]
                } else {
                    self.world.arena.live_ids_with_tag(tag).collect()
                };
                ids.into_iter().map(move |id| (id, plugin))
            })
            .collect();

        let view = WorldView::new(
            &self.world.arena,
            &self.world.player,
            input,
            &self.config,
            self.camera.view_rect(),
            self.tick,
        );
        let tick = self.tick;
        let dt = self.config.fixed_dt;

        let batches: Vec<Vec<OutputEnvelope>> = jobs
            .par_iter()
            .map(|(entity_id, plugin)| {
                let decl = plugin.declaration();
                let ctx = PluginContext {
                    entity_id: *entity_id,
                    tick,
                    dt,
                };

                // Plugins emit a handful of outputs per entity per tick.
                #[allow(clippy::cast_possible_truncation)]
                let envelopes: Vec<OutputEnvelope> = plugin
                    .run(&ctx, &view)
                    .into_iter()
                    .enumerate()
                    .map(|(seq, output)| {
                        OutputEnvelope::new(
                            output,
                            PluginInstanceId::new(*entity_id, decl.id.clone()),
                            tick,
                            seq as u32,
                        )
                    })
                    .collect();
                envelopes
            })
            .collect();

        batches.into_iter().flatten().collect()
    }

    // =========================================================================
    // Dialogue
    // =========================================================================

    fn step_dialogue(&mut self, input: &InputFrame, mut dialogue: DialogueState) {
        self.world.player.tick_timers(self.config.fixed_dt);
        if !self.world.player.interaction_ready() {
            return;
        }

        let len = self.offer_count(dialogue.merchant);
        if input.pressed(Intents::INTERACT) {
            self.close_dialogue(dialogue.merchant);
        } else if input.pressed(Intents::CURSOR_UP) {
            dialogue.cursor_up(len);
            self.phase = Phase::Dialogue(dialogue);
        } else if input.pressed(Intents::CURSOR_DOWN) {
            dialogue.cursor_down(len);
            self.phase = Phase::Dialogue(dialogue);
        } else if input.pressed(Intents::CONFIRM) {
            self.confirm(dialogue);
        } else {
            return;
        }
        self.world.player.interact_cooldown = self.config.player.interact_cooldown;
    }

    fn offer_count(&self, merchant: EntityId) -> usize {
        self.world
            .arena
            .get_live(merchant)
            .and_then(Entity::as_merchant)
            .map_or(0, |m| m.offers.len())
    }

    fn confirm(&mut self, dialogue: DialogueState) {
        let merchant = dialogue.merchant;
        let Some(offer) = self
            .world
            .arena
            .get_live(merchant)
            .and_then(Entity::as_merchant)
            .and_then(|m| m.offers.get(dialogue.cursor))
            .cloned()
        else {
            self.close_dialogue(merchant);
            return;
        };

        match confirm_offer(&offer, &mut self.world.player) {
            TradeOutcome::Purchased { cost, .. } => {
                debug!(%merchant, label = %offer.label, cost, "trade completed");
                self.world.notify(format!("Bought {}.", offer.label));
                self.world.record(GameEvent::TradeCompleted {
                    merchant,
                    label: offer.label,
                    cost,
                });
            }
            TradeOutcome::Rejected { cost, .. } => {
                self.world.notify(NOT_ENOUGH_COINS);
                self.world.record(GameEvent::TradeRejected { merchant, cost });
            }
            TradeOutcome::Exit => self.close_dialogue(merchant),
        }
    }

    fn close_dialogue(&mut self, merchant: EntityId) {
        if let Some(m) = self
            .world
            .arena
            .get_live_mut(merchant)
            .and_then(Entity::as_merchant_mut)
        {
            m.state = MerchantState::Closed;
        }
        self.world.player.dialogue_active = false;
        self.transition(PhaseTrigger::CloseDialogue);
    }

    // =========================================================================
    // Phase changes
    // =========================================================================

    /// Applies `trigger` if the phase table allows it.
    ///
    /// Returns `true` if the phase changed.
    fn transition(&mut self, trigger: PhaseTrigger) -> bool {
        let Some(next) = self.phase.next(trigger) else {
            debug!(phase = %self.phase, ?trigger, "ignoring phase trigger");
            return false;
        };
        debug!(from = %self.phase, to = %next, "phase changed");
        self.world.record(GameEvent::PhaseChanged {
            from: self.phase,
            to: next,
        });
        if next == Phase::GameOver {
            info!(tick = self.tick, "game over");
        }
        self.phase = next;
        true
    }

    fn respawn(&mut self) {
        self.world.populate(&self.descriptor, self.spawn, &self.config);
        if self.transition(PhaseTrigger::Respawn) {
            info!(tick = self.tick, "player respawned");
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Ticks run so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Seed the session was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The live world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world, for test setup and scripted scenarios.
    ///
    /// Avoid mutating the world from inside a host's frame loop; send input
    /// instead.
    #[must_use]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The follow camera.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns `true` once a `QUIT` intent has been seen.
    #[must_use]
    pub const fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Mutable access to the plugin registry, to add behaviors.
    #[must_use]
    pub fn plugins_mut(&mut self) -> &mut PluginRegistry {
        &mut self.plugins
    }

    /// Appends a resolver to the end of the chain.
    pub fn add_resolver(&mut self, resolver: Box<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    /// Number of resolvers in the chain.
    #[must_use]
    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }

    /// Captures the presentation state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.tick, self.phase, &self.world, &self.camera)
    }

    /// Drains the event journal.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.world.take_events()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoundsMode;
    use crate::descriptor::TileRect;

    fn descriptor() -> WorldDescriptor {
        WorldDescriptor {
            player_spawn: Some(TilePos::new(4, 4)),
            ..WorldDescriptor::default()
        }
    }

    fn session() -> Session {
        Session::new(1, SessionConfig::default(), descriptor()).unwrap()
    }

    fn press(session: &mut Session, intents: Intents) {
        session.step(&InputFrame::new(intents));
    }

    mod setup_tests {
        use super::*;

        #[test]
        fn starts_in_start_phase() {
            let session = session();
            assert_eq!(session.phase(), Phase::Start);
            assert_eq!(session.tick(), 0);
            assert_eq!(session.resolver_count(), 5);
        }

        #[test]
        fn missing_spawn_is_rejected() {
            let err = Session::new(1, SessionConfig::default(), WorldDescriptor::default());
            assert!(matches!(err, Err(SessionError::World(_))));
        }

        #[test]
        fn invalid_config_is_rejected() {
            let config = SessionConfig {
                fixed_dt: 0.0,
                ..SessionConfig::default()
            };
            let err = Session::new(1, config, descriptor());
            assert!(matches!(err, Err(SessionError::Config(_))));
        }

        #[test]
        fn bounded_camera_uses_map_size() {
            let mut config = SessionConfig::default();
            config.camera.bounds = BoundsMode::Bounded;
            let descriptor = WorldDescriptor {
                map_width: Some(20),
                map_height: Some(20),
                ..descriptor()
            };
            let session = Session::new(1, config, descriptor).unwrap();
            assert_eq!(
                session.camera().bounds(),
                WorldBounds::Bounded {
                    width: 1280.0,
                    height: 1280.0
                }
            );
            // Player centered at (288, 288) would want offset (224, 96); clamped to 0.
            assert_eq!(session.camera().offset(), glam::Vec2::ZERO);
        }
    }

    mod phase_tests {
        use super::*;

        #[test]
        fn first_step_starts_play() {
            let mut session = session();
            session.step(&InputFrame::idle());
            assert_eq!(session.phase(), Phase::Playing);
            assert_eq!(
                session.take_events(),
                vec![GameEvent::PhaseChanged {
                    from: Phase::Start,
                    to: Phase::Playing
                }]
            );
        }

        #[test]
        fn pause_clears_messages_and_freezes_world() {
            let mut session = session();
            session.step(&InputFrame::idle());
            session.world_mut().notify("old news");

            press(&mut session, Intents::PAUSE);
            assert_eq!(session.phase(), Phase::Paused);
            assert_eq!(
                session.snapshot().notifications,
                vec![GAME_PAUSED.to_string()]
            );

            let before = session.world().player.body;
            press(&mut session, Intents::RIGHT);
            assert_eq!(session.world().player.body, before);

            press(&mut session, Intents::PAUSE);
            assert_eq!(session.phase(), Phase::Playing);
        }

        #[test]
        fn quit_sets_flag_in_any_phase() {
            let mut session = session();
            press(&mut session, Intents::QUIT);
            assert!(session.exit_requested());
        }

        #[test]
        fn tick_and_clock_advance_in_every_phase() {
            let mut session = session();
            session.step(&InputFrame::idle());
            press(&mut session, Intents::PAUSE);
            session.step(&InputFrame::idle());
            assert_eq!(session.tick(), 3);
            let expected = 3.0 * f64::from(session.config().fixed_dt);
            assert!((session.world().now() - expected).abs() < 1e-6);
        }
    }

    mod extension_tests {
        use super::*;
        use crate::output::{Event, Output, OutputKind, PluginId};
        use crate::plugin::PluginDeclaration;

        struct Heartbeat {
            declaration: PluginDeclaration,
        }

        impl Plugin for Heartbeat {
            fn declaration(&self) -> &PluginDeclaration {
                &self.declaration
            }

            fn run(&self, _ctx: &PluginContext, _view: &WorldView<'_>) -> Vec<Output> {
                vec![Event::Notice {
                    text: "beat".to_string(),
                }
                .into()]
            }
        }

        struct Tally;

        impl Resolver for Tally {
            fn handles(&self) -> &[OutputKind] {
                &[OutputKind::Event]
            }

            fn resolve(&self, outputs: &[&OutputEnvelope], world: &mut World) {
                world.notify(format!("{} events", outputs.len()));
            }
        }

        #[test]
        fn added_plugins_and_resolvers_run_each_tick() {
            let mut session = session();
            session.plugins_mut().register(
                EntityTag::Player,
                Arc::new(Heartbeat {
                    declaration: PluginDeclaration {
                        id: PluginId::new("heartbeat"),
                        stage: Stage::Pickups,
                        required_tags: vec![EntityTag::Player],
                    },
                }),
            );
            session.add_resolver(Box::new(Tally));
            assert_eq!(session.resolver_count(), 6);

            session.step(&InputFrame::idle());
            session.step(&InputFrame::idle());

            // The built-in event resolver posts first, the appended one last.
            assert_eq!(
                session.snapshot().notifications,
                vec!["beat".to_string(), "1 events".to_string()]
            );
        }
    }

    #[test]
    fn walls_stop_the_player() {
        let descriptor = WorldDescriptor {
            walls: vec![TileRect {
                x: 5,
                y: 4,
                w: 1,
                h: 1,
            }],
            ..descriptor()
        };
        let mut session = Session::new(1, SessionConfig::default(), descriptor).unwrap();
        for _ in 0..30 {
            press(&mut session, Intents::RIGHT);
        }
        let hit = session.world().player.body.hit;
        assert!(hit.max.x <= 320.0 + 1e-4);
    }

    #[test]
    fn debug_output_names_session() {
        let session = session();
        assert!(format!("{session:?}").starts_with("Session"));
    }
}
