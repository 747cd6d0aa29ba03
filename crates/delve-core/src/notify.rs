//! Short-lived messages for the player.
//!
//! The channel keeps the most recent notices in insertion order. Each one is
//! visible for a fixed time after it was posted; once the channel is full the
//! oldest notice is evicted.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::NotificationConfig;

/// One posted message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Message text.
    pub text: String,
    /// Session clock (seconds) when the message was posted.
    pub created_at: f64,
}

/// Bounded, time-limited message queue.
#[derive(Debug, Clone, PartialEq)]
pub struct Notifications {
    entries: VecDeque<Notification>,
    capacity: usize,
    ttl: f32,
}

impl Notifications {
    /// Creates an empty channel.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of retained notices (at least one is kept)
    /// * `ttl` - Seconds each notice stays visible
    #[must_use]
    pub fn new(capacity: usize, ttl: f32) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            ttl,
        }
    }

    /// Creates an empty channel from configuration.
    #[must_use]
    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(config.capacity, config.ttl)
    }

    /// Appends a notice, evicting the oldest when full.
    pub fn post(&mut self, text: impl Into<String>, now: f64) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(Notification {
            text: text.into(),
            created_at: now,
        });
    }

    /// Notices still visible at `now`, oldest first.
    pub fn visible(&self, now: f64) -> impl Iterator<Item = &Notification> + '_ {
        let ttl = f64::from(self.ttl);
        self.entries
            .iter()
            .filter(move |entry| now - entry.created_at < ttl)
    }

    /// Returns the most recent notice, visible or not.
    #[must_use]
    pub fn latest(&self) -> Option<&Notification> {
        self.entries.back()
    }

    /// Drops every notice.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of retained notices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::from_config(&NotificationConfig::default())
    }
}
