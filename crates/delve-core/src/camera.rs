//! Overhead camera that follows the player.
//!
//! The camera stores a screen offset: `screen = world + offset`. Following a
//! target centers it in the viewport. When the world is bounded the offset is
//! clamped so the view never shows past the map edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{BoundsMode, CameraConfig};
use crate::geometry::Rect;

/// Extent of the world the camera may show.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldBounds {
    /// No clamping.
    #[default]
    Unbounded,
    /// Map spans `(0, 0)..(width, height)` in pixels.
    Bounded {
        /// Map width in pixels.
        width: f32,
        /// Map height in pixels.
        height: f32,
    },
}

impl WorldBounds {
    /// Picks bounds from the configured mode and the map size, if the level
    /// declares one.
    ///
    /// A bounded camera without a map size falls back to unbounded.
    #[must_use]
    pub fn resolve(mode: BoundsMode, map_size: Option<Vec2>) -> Self {
        match (mode, map_size) {
            (BoundsMode::Unbounded, _) => Self::Unbounded,
            (BoundsMode::Bounded, Some(size)) => Self::Bounded {
                width: size.x,
                height: size.y,
            },
            (BoundsMode::Bounded, None) => {
                warn!("bounded camera requested but level has no map size; camera is unbounded");
                Self::Unbounded
            }
        }
    }
}

/// Follow camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    viewport: Vec2,
    bounds: WorldBounds,
    offset: Vec2,
}

impl Camera {
    /// Creates a camera with a zero offset.
    #[must_use]
    pub const fn new(viewport: Vec2, bounds: WorldBounds) -> Self {
        Self {
            viewport,
            bounds,
            offset: Vec2::ZERO,
        }
    }

    /// Creates a camera from configuration and resolved bounds.
    #[must_use]
    pub fn from_config(config: &CameraConfig, bounds: WorldBounds) -> Self {
        Self::new(
            Vec2::new(config.viewport_width, config.viewport_height),
            bounds,
        )
    }

    /// Centers the view on `target`, clamping to the bounds if any.
    ///
    /// # Example
    ///
    /// ```
    /// use delve_core::camera::{Camera, WorldBounds};
    /// use glam::Vec2;
    ///
    /// let mut camera = Camera::new(Vec2::new(1024.0, 768.0), WorldBounds::Unbounded);
    /// camera.update(Vec2::new(600.0, 400.0));
    /// assert_eq!(camera.offset(), Vec2::new(-88.0, -16.0));
    /// ```
    pub fn update(&mut self, target: Vec2) {
        let mut offset = self.viewport * 0.5 - target;
        if let WorldBounds::Bounded { width, height } = self.bounds {
            offset.x = offset.x.min(0.0).max(-(width - self.viewport.x));
            offset.y = offset.y.min(0.0).max(-(height - self.viewport.y));
        }
        self.offset = offset;
    }

    /// Current screen offset.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Viewport size in pixels.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// World bounds in use.
    #[must_use]
    pub const fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    /// World rectangle currently on screen.
    #[must_use]
    pub fn view_rect(&self) -> Rect {
        Rect::from_min_size(-self.offset, self.viewport)
    }

    /// Converts a world rectangle to screen space.
    #[must_use]
    pub fn apply(&self, rect: Rect) -> Rect {
        rect.translate(self.offset)
    }
}
