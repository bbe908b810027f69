//! Snapshots handed to the host's display.
//!
//! The display only ever receives plain data. It has no way to call back into
//! the core.

use serde::Serialize;

use crate::types::Vector3;

/// Gravity reading and the tilt derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrientationSnapshot {
    pub timestamp_ms: u64,
    pub gravity: Vector3,
    pub angle_deg: f32,
    pub is_face_up: bool,
}

/// Latest linear acceleration and the running gesture count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GestureSnapshot {
    pub timestamp_ms: u64,
    pub acceleration: Vector3,
    pub gesture_count: u32,
}

/// Current shooting direction and region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShootingSnapshot {
    pub timestamp_ms: u64,
    pub direction_deg: f32,
    pub region_index: usize,
}

/// Host-side renderer. Every method defaults to doing nothing.
pub trait DisplaySink {
    fn show_orientation(&mut self, _snapshot: &OrientationSnapshot) {}
    fn show_gestures(&mut self, _snapshot: &GestureSnapshot) {}
    fn show_shooting(&mut self, _snapshot: &ShootingSnapshot) {}
}

/// Display that renders nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {}
