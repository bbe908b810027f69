//! Per-channel rate limiting for display updates.
//!
//! Humans cannot read a text view that changes fifty times a second, so each
//! display channel is refreshed at most once per interval. This is a throttle,
//! not a debounce: the first update on a channel goes out immediately, and it
//! only decides whether observers are told. The state behind the update has
//! already changed either way.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Configuration for display throttling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Minimum time between two updates on the same channel (ms). Zero
    /// refreshes the display on every update.
    pub min_interval_ms: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 250,
        }
    }
}

/// Display channels refreshed by a sensing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayChannel {
    /// Gravity vector, tilt angle and face-up flag.
    Angle,
    /// Linear acceleration and gesture count.
    Gestures,
    /// Shooting direction and region.
    Direction,
}

/// Remembers when each channel last emitted.
#[derive(Debug, Clone)]
pub struct Throttle<K> {
    min_interval_ms: u64,
    last_emit_ms: HashMap<K, u64>,
}

impl<K: Copy + Eq + Hash> Throttle<K> {
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval_ms,
            last_emit_ms: HashMap::with_capacity(4),
        }
    }

    /// Returns true (and records `now_ms`) if `channel` may emit now.
    ///
    /// A timestamp earlier than the last emission never emits; the channel
    /// waits until time catches up.
    pub fn should_emit(&mut self, channel: K, now_ms: u64) -> bool {
        if let Some(&last) = self.last_emit_ms.get(&channel) {
            if now_ms < last.saturating_add(self.min_interval_ms) {
                return false;
            }
        }
        self.last_emit_ms.insert(channel, now_ms);
        true
    }

    pub fn last_emit_ms(&self, channel: K) -> Option<u64> {
        self.last_emit_ms.get(&channel).copied()
    }

    pub fn min_interval_ms(&self) -> u64 {
        self.min_interval_ms
    }

    /// Forget every channel, so the next update on each emits immediately.
    pub fn reset(&mut self) {
        self.last_emit_ms.clear();
    }
}
