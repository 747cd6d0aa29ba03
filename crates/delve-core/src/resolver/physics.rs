//! Physics resolver for movement and facing.
//!
//! Movers are resolved one axis at a time, x then y, against their own
//! obstacle set (see [`Arena::solid_rects_for`](crate::arena::Arena::solid_rects_for)).
//! Resolving both axes at once would let a diagonal mover clip through the
//! corner of an obstacle. A blocked axis zeroes that velocity component.
//!
//! Projectiles are not resolved: they move freely and the projectile plugin
//! retires them on contact.

use glam::Vec2;

use crate::config::FIXED_DT;
use crate::entity::{EntityId, EntityInner};
use crate::geometry::{resolve_axis_move, Axis, Rect};
use crate::output::{Command, OutputEnvelope, OutputKind};
use crate::world::World;

use super::Resolver;

/// Resolver for `Move` and `Face` commands.
///
/// # Example
///
/// ```
/// use delve_core::resolver::{PhysicsResolver, Resolver};
/// use delve_core::output::OutputKind;
///
/// let resolver = PhysicsResolver::new();
/// assert!(resolver.handles().contains(&OutputKind::Command));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsResolver {
    /// Seconds per tick.
    dt: f32,
}

impl PhysicsResolver {
    /// Creates a physics resolver with the default fixed timestep.
    #[must_use]
    pub const fn new() -> Self {
        Self { dt: FIXED_DT }
    }

    /// Creates a physics resolver with a custom timestep.
    #[must_use]
    pub const fn with_dt(dt: f32) -> Self {
        Self { dt }
    }

    /// Returns the timestep used for integration.
    #[must_use]
    pub const fn dt(&self) -> f32 {
        self.dt
    }

    fn move_player(&self, world: &mut World, velocity: Vec2) {
        let obstacles = world.arena.solid_rects_for(EntityId::PLAYER);
        let (hit, velocity) = slide(world.player.body.hit, velocity, self.dt, &obstacles);
        world.player.body.set_hit(hit);
        world.player.velocity = velocity;
    }

    fn move_entity(&self, world: &mut World, target: EntityId, velocity: Vec2) {
        let obstacles = world.arena.solid_rects_for(target);
        let Some(entity) = world.arena.get_live_mut(target) else {
            return;
        };
        match entity.inner_mut() {
            EntityInner::Hostile(hostile) => {
                let (hit, velocity) = slide(hostile.body.hit, velocity, self.dt, &obstacles);
                hostile.body.set_hit(hit);
                hostile.velocity = velocity;
            }
            EntityInner::Projectile(projectile) => {
                projectile.rect = projectile.rect.translate(velocity * self.dt);
                projectile.velocity = velocity;
            }
            _ => {}
        }
    }
}

impl Default for PhysicsResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Moves `hit` by `velocity * dt`, x then y, stopping at obstacles.
///
/// Returns the final rectangle and the velocity with blocked axes zeroed.
fn slide(hit: Rect, velocity: Vec2, dt: f32, obstacles: &[Rect]) -> (Rect, Vec2) {
    let mut hit = hit;
    let mut velocity = velocity;
    for axis in [Axis::X, Axis::Y] {
        let step = resolve_axis_move(hit, axis, axis.component(velocity) * dt, obstacles);
        hit = step.rect;
        if step.blocked {
            velocity = axis.zeroed(velocity);
        }
    }
    (hit, velocity)
}

impl Resolver for PhysicsResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Command]
    }

    fn resolve(&self, outputs: &[&OutputEnvelope], world: &mut World) {
        for envelope in outputs {
            match envelope.output().as_command() {
                Some(Command::Move { target, velocity }) if target.is_player() => {
                    self.move_player(world, *velocity);
                }
                Some(Command::Move { target, velocity }) => {
                    self.move_entity(world, *target, *velocity);
                }
                Some(Command::Face { facing }) => world.player.facing = *facing,
                _ => {}
            }
        }
    }
}
