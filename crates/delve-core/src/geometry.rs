//! Axis-aligned rectangle geometry and per-axis collision resolution.
//!
//! Every solid thing in the simulation is an axis-aligned rectangle. Movers
//! resolve their motion one axis at a time with [`resolve_axis_move`]: the
//! rectangle is translated along a single axis, then snapped flush against
//! whatever it ran into. Resolving x and y separately is what keeps a mover
//! from clipping through the shared corner of two obstacles.
//!
//! # Example
//!
//! ```
//! use delve_core::geometry::{resolve_axis_move, Axis, Rect};
//! use glam::Vec2;
//!
//! let mover = Rect::from_min_size(Vec2::new(0.0, 0.0), Vec2::splat(10.0));
//! let wall = Rect::from_min_size(Vec2::new(15.0, -50.0), Vec2::new(10.0, 100.0));
//!
//! let moved = resolve_axis_move(mover, Axis::X, 8.0, &[wall]);
//! assert!(moved.blocked);
//! assert_eq!(moved.rect.max.x, 15.0);
//! assert!(!moved.rect.intersects(&wall));
//! ```

use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle stored as its two extreme corners.
///
/// Storing both corners (rather than origin + size) means a snapped edge is
/// exactly the obstacle's edge, so "flush" never turns into a sub-pixel
/// overlap through rounding.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner (smallest x and y).
    pub min: Vec2,
    /// Bottom-right corner (largest x and y).
    pub max: Vec2,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    /// Creates a rectangle of `size` centered on `center`.
    #[must_use]
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Returns the width and height.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Returns the width.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Returns the height.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Returns the center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Returns this rectangle moved by `delta`.
    #[must_use]
    pub fn translate(self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Returns a rectangle of the same size centered on `center`.
    #[must_use]
    pub fn with_center(self, center: Vec2) -> Self {
        Self::from_center_size(center, self.size())
    }

    /// Returns this rectangle grown by `amount` on every side.
    ///
    /// Negative amounts shrink it.
    #[must_use]
    pub fn inflate(self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            max: self.max + Vec2::splat(amount),
        }
    }

    /// Returns `true` if the two rectangles share interior area.
    ///
    /// Rectangles that only touch along an edge do not intersect, which is
    /// what lets a mover rest flush against a wall and slide along it.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Returns `true` if `point` lies inside or on the boundary.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// One of the two movement axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical (y grows downward).
    Y,
}

impl Axis {
    /// Unit vector along this axis.
    #[must_use]
    pub const fn unit(self) -> Vec2 {
        match self {
            Self::X => Vec2::X,
            Self::Y => Vec2::Y,
        }
    }

    /// Extracts this axis' component from `v`.
    #[must_use]
    pub const fn component(self, v: Vec2) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
        }
    }

    /// Returns `v` with this axis' component set to zero.
    #[must_use]
    pub fn zeroed(self, v: Vec2) -> Vec2 {
        match self {
            Self::X => Vec2::new(0.0, v.y),
            Self::Y => Vec2::new(v.x, 0.0),
        }
    }
}

/// Result of moving a rectangle along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMove {
    /// Final rectangle after snapping.
    pub rect: Rect,
    /// `true` if any obstacle stopped the motion.
    pub blocked: bool,
}

/// Moves `rect` by `delta` along `axis` and resolves overlaps with `obstacles`.
///
/// The first overlapping obstacle in iteration order wins: the rectangle is
/// pushed back flush against the edge of that obstacle facing the direction
/// of travel. The remaining obstacles are then re-tested against the snapped
/// position until nothing overlaps. Every snap moves the rectangle back
/// toward where it started, so at most `obstacles.len()` snaps happen.
///
/// A zero `delta` returns the rectangle untouched, even if it currently
/// overlaps something.
#[must_use]
pub fn resolve_axis_move(rect: Rect, axis: Axis, delta: f32, obstacles: &[Rect]) -> AxisMove {
    if delta.abs() <= f32::EPSILON {
        return AxisMove {
            rect,
            blocked: false,
        };
    }

    let size = rect.size();
    let mut moved = rect.translate(axis.unit() * delta);
    let mut blocked = false;

    for _ in 0..obstacles.len() {
        let Some(hit) = obstacles.iter().find(|obstacle| moved.intersects(obstacle)) else {
            break;
        };
        moved = snap_flush(moved, size, axis, delta, hit);
        blocked = true;
    }

    AxisMove {
        rect: moved,
        blocked,
    }
}

/// Places `rect` flush against `obstacle` on the side it approached from.
fn snap_flush(rect: Rect, size: Vec2, axis: Axis, delta: f32, obstacle: &Rect) -> Rect {
    let mut snapped = rect;
    match (axis, delta > 0.0) {
        (Axis::X, true) => {
            snapped.max.x = obstacle.min.x;
            snapped.min.x = obstacle.min.x - size.x;
        }
        (Axis::X, false) => {
            snapped.min.x = obstacle.max.x;
            snapped.max.x = obstacle.max.x + size.x;
        }
        (Axis::Y, true) => {
            snapped.max.y = obstacle.min.y;
            snapped.min.y = obstacle.min.y - size.y;
        }
        (Axis::Y, false) => {
            snapped.min.y = obstacle.max.y;
            snapped.max.y = obstacle.max.y + size.y;
        }
    }
    snapped
}

/// Scales a direction by `1/√2` when it has both an x and a y component.
///
/// Keeps diagonal speed equal to axis speed for 8-way input.
#[must_use]
pub fn normalize_diagonal(direction: Vec2) -> Vec2 {
    if direction.x != 0.0 && direction.y != 0.0 {
        direction * FRAC_1_SQRT_2
    } else {
        direction
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::from_min_size(Vec2::new(x, y), Vec2::new(w, h))
    }

    mod rect_tests {
        use super::*;

        #[test]
        fn center_and_size() {
            let r = rect(10.0, 20.0, 30.0, 40.0);
            assert_eq!(r.center(), Vec2::new(25.0, 40.0));
            assert_eq!(r.size(), Vec2::new(30.0, 40.0));
            assert_eq!(r.width(), 30.0);
            assert_eq!(r.height(), 40.0);
        }

        #[test]
        fn from_center_size_roundtrips_center() {
            let r = Rect::from_center_size(Vec2::new(32.0, 32.0), Vec2::splat(35.0));
            assert_eq!(r.center(), Vec2::new(32.0, 32.0));
            assert_eq!(r.size(), Vec2::splat(35.0));
        }

        #[test]
        fn touching_edges_do_not_intersect() {
            let a = rect(0.0, 0.0, 10.0, 10.0);
            let b = rect(10.0, 0.0, 10.0, 10.0);
            assert!(!a.intersects(&b));
            assert!(!b.intersects(&a));
        }

        #[test]
        fn overlapping_rects_intersect() {
            let a = rect(0.0, 0.0, 10.0, 10.0);
            let b = rect(9.0, 9.0, 10.0, 10.0);
            assert!(a.intersects(&b));
        }

        #[test]
        fn contained_rect_intersects() {
            let outer = rect(0.0, 0.0, 100.0, 100.0);
            let inner = rect(40.0, 40.0, 5.0, 5.0);
            assert!(outer.intersects(&inner));
            assert!(inner.intersects(&outer));
        }

        #[test]
        fn inflate_grows_every_side() {
            let r = rect(10.0, 10.0, 10.0, 10.0).inflate(5.0);
            assert_eq!(r, rect(5.0, 5.0, 20.0, 20.0));
        }

        #[test]
        fn with_center_keeps_size() {
            let r = rect(0.0, 0.0, 64.0, 64.0).with_center(Vec2::new(100.0, 100.0));
            assert_eq!(r.min, Vec2::new(68.0, 68.0));
            assert_eq!(r.size(), Vec2::splat(64.0));
        }

        #[test]
        fn contains_point_includes_boundary() {
            let r = rect(0.0, 0.0, 10.0, 10.0);
            assert!(r.contains_point(Vec2::new(10.0, 10.0)));
            assert!(!r.contains_point(Vec2::new(10.1, 5.0)));
        }
    }

    mod resolve_tests {
        use super::*;

        #[test]
        fn free_move_is_not_blocked() {
            let mover = rect(0.0, 0.0, 10.0, 10.0);
            let result = resolve_axis_move(mover, Axis::X, 5.0, &[rect(100.0, 0.0, 10.0, 10.0)]);
            assert!(!result.blocked);
            assert_eq!(result.rect.min.x, 5.0);
        }

        #[test]
        fn moving_right_snaps_to_left_edge() {
            let mover = rect(0.0, 0.0, 10.0, 10.0);
            let wall = rect(12.0, -5.0, 10.0, 30.0);
            let result = resolve_axis_move(mover, Axis::X, 5.0, &[wall]);
            assert!(result.blocked);
            assert_eq!(result.rect.max.x, 12.0);
            assert_eq!(result.rect.min.x, 2.0);
        }

        #[test]
        fn moving_left_snaps_to_right_edge() {
            let mover = rect(20.0, 0.0, 10.0, 10.0);
            let wall = rect(5.0, 0.0, 12.0, 10.0);
            let result = resolve_axis_move(mover, Axis::X, -5.0, &[wall]);
            assert!(result.blocked);
            assert_eq!(result.rect.min.x, 17.0);
        }

        #[test]
        fn moving_down_snaps_to_top_edge() {
            let mover = rect(0.0, 0.0, 10.0, 10.0);
            let floor = rect(-10.0, 13.0, 40.0, 10.0);
            let result = resolve_axis_move(mover, Axis::Y, 6.0, &[floor]);
            assert!(result.blocked);
            assert_eq!(result.rect.max.y, 13.0);
        }

        #[test]
        fn moving_up_snaps_to_bottom_edge() {
            let mover = rect(0.0, 20.0, 10.0, 10.0);
            let ceiling = rect(-10.0, 0.0, 40.0, 18.0);
            let result = resolve_axis_move(mover, Axis::Y, -6.0, &[ceiling]);
            assert!(result.blocked);
            assert_eq!(result.rect.min.y, 18.0);
        }

        #[test]
        fn zero_delta_never_moves() {
            let mover = rect(0.0, 0.0, 10.0, 10.0);
            let overlapping = rect(5.0, 5.0, 10.0, 10.0);
            let result = resolve_axis_move(mover, Axis::X, 0.0, &[overlapping]);
            assert!(!result.blocked);
            assert_eq!(result.rect, mover);
        }

        #[test]
        fn only_the_moving_axis_changes() {
            let mover = rect(0.0, 0.0, 10.0, 10.0);
            let wall = rect(12.0, 0.0, 10.0, 10.0);
            let result = resolve_axis_move(mover, Axis::X, 5.0, &[wall]);
            assert_eq!(result.rect.min.y, 0.0);
            assert_eq!(result.rect.max.y, 10.0);
        }

        #[test]
        fn first_overlap_in_order_wins_then_all_are_retested() {
            let mover = rect(0.0, 0.0, 10.0, 10.0);
            // The farther wall is listed first; snapping against it still
            // leaves an overlap with the nearer wall, which must be resolved.
            let far = rect(14.0, 0.0, 10.0, 10.0);
            let near = rect(12.0, 0.0, 1.0, 10.0);
            let result = resolve_axis_move(mover, Axis::X, 8.0, &[far, near]);
            assert!(result.blocked);
            assert_eq!(result.rect.max.x, 12.0);
            assert!(!result.rect.intersects(&far));
            assert!(!result.rect.intersects(&near));
        }

        #[test]
        fn flush_mover_slides_along_wall() {
            // Resting on top of a floor, moving sideways is unobstructed.
            let mover = rect(0.0, 0.0, 10.0, 10.0);
            let floor = rect(-100.0, 10.0, 200.0, 10.0);
            let result = resolve_axis_move(mover, Axis::X, 5.0, &[floor]);
            assert!(!result.blocked);
            assert_eq!(result.rect.min.x, 5.0);
        }

        #[test]
        fn per_axis_resolution_prevents_corner_clipping() {
            // Two walls meeting at a corner; a diagonal step would clip the
            // corner if both axes were applied at once.
            let mover = rect(0.0, 0.0, 10.0, 10.0);
            let right_wall = rect(12.0, -50.0, 10.0, 100.0);
            let bottom_wall = rect(-50.0, 12.0, 100.0, 10.0);
            let walls = [right_wall, bottom_wall];

            let after_x = resolve_axis_move(mover, Axis::X, 4.0, &walls);
            let after_y = resolve_axis_move(after_x.rect, Axis::Y, 4.0, &walls);

            assert!(after_x.blocked && after_y.blocked);
            assert_eq!(after_y.rect.max, Vec2::new(12.0, 12.0));
            for wall in &walls {
                assert!(!after_y.rect.intersects(wall));
            }
        }

        #[test]
        fn empty_obstacle_set_moves_freely() {
            let mover = rect(0.0, 0.0, 10.0, 10.0);
            let result = resolve_axis_move(mover, Axis::Y, -3.0, &[]);
            assert!(!result.blocked);
            assert_eq!(result.rect.min.y, -3.0);
        }
    }

    mod axis_tests {
        use super::*;

        #[test]
        fn component_and_zeroed() {
            let v = Vec2::new(3.0, -4.0);
            assert_eq!(Axis::X.component(v), 3.0);
            assert_eq!(Axis::Y.component(v), -4.0);
            assert_eq!(Axis::X.zeroed(v), Vec2::new(0.0, -4.0));
            assert_eq!(Axis::Y.zeroed(v), Vec2::new(3.0, 0.0));
        }
    }

    mod diagonal_tests {
        use super::*;

        #[test]
        fn axis_aligned_input_unchanged() {
            assert_eq!(normalize_diagonal(Vec2::new(1.0, 0.0)), Vec2::new(1.0, 0.0));
            assert_eq!(normalize_diagonal(Vec2::new(0.0, -1.0)), Vec2::new(0.0, -1.0));
            assert_eq!(normalize_diagonal(Vec2::ZERO), Vec2::ZERO);
        }

        #[test]
        fn diagonal_input_has_unit_length() {
            let d = normalize_diagonal(Vec2::new(1.0, 1.0));
            assert!((d.length() - 1.0).abs() < 1e-6);
            assert!((d.x - FRAC_1_SQRT_2).abs() < 1e-6);
        }
    }
}
