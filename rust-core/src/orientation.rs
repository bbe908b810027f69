//! Face-up detection from the gravity sensor.
//!
//! When the phone lies flat and face up, the gravity sensor reads roughly
//! (0, 0, g). Any tilt shows up as an angle between the sampled gravity
//! vector and the phone's z axis (0, 0, 1), computed with the dot-product
//! formula:
//!
//! ```text
//! angle = acos(clamp(dot(g, z) / (|g| |z|), -1, 1))
//! ```
//!
//! The clamp keeps `acos` defined when rounding pushes the cosine slightly
//! outside [-1, 1]. The face-up predicate is recomputed from scratch on every
//! sample; there is no hysteresis on it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SensingError};
use crate::types::{OrientationState, Vector3};

/// Configuration for the orientation monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationConfig {
    /// Largest tilt (degrees) still counted as face up. Users cannot hold a
    /// phone perfectly level, so this is generous.
    pub face_up_tolerance_deg: f32,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            face_up_tolerance_deg: 30.0,
        }
    }
}

impl OrientationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=180.0).contains(&self.face_up_tolerance_deg) {
            return Err(SensingError::InvalidConfig(format!(
                "face_up_tolerance_deg must be within [0, 180], got {}",
                self.face_up_tolerance_deg
            )));
        }
        Ok(())
    }
}

/// Angle in degrees between `gravity` and the flat-face normal (0, 0, 1).
///
/// Returns `None` for a zero-length or non-finite vector, where the angle is
/// undefined.
pub fn tilt_angle_deg(gravity: Vector3) -> Option<f32> {
    angle_between_deg(gravity, Vector3::UNIT_Z)
}

/// Angle in degrees between two vectors, `None` if either is degenerate.
pub fn angle_between_deg(v1: Vector3, v2: Vector3) -> Option<f32> {
    if !v1.is_finite() || !v2.is_finite() {
        return None;
    }
    // f64 keeps |v|² finite and non-zero for every finite non-zero f32 vector.
    let denominator = v1.magnitude_f64() * v2.magnitude_f64();
    if !denominator.is_finite() || denominator <= 0.0 {
        return None;
    }
    let dot = v1.x as f64 * v2.x as f64 + v1.y as f64 * v2.y as f64 + v1.z as f64 * v2.z as f64;
    let cos_value = (dot / denominator).clamp(-1.0, 1.0);
    Some(cos_value.acos().to_degrees() as f32)
}

/// Tracks whether the phone is currently face up.
#[derive(Debug, Clone)]
pub struct OrientationMonitor {
    config: OrientationConfig,
    state: OrientationState,
    samples_processed: u64,
    samples_rejected: u64,
}

impl OrientationMonitor {
    pub fn new(config: OrientationConfig) -> Self {
        Self {
            config,
            state: OrientationState::default(),
            samples_processed: 0,
            samples_rejected: 0,
        }
    }

    /// Process one gravity sample.
    ///
    /// A degenerate vector (zero length or NaN) leaves the angle untouched,
    /// forces `is_face_up` to false and is reported as
    /// [`SensingError::InvalidSample`]. Gestures therefore never fire on an
    /// indeterminate orientation.
    pub fn process_gravity(&mut self, gravity: Vector3) -> Result<OrientationState> {
        self.samples_processed += 1;

        let Some(angle) = tilt_angle_deg(gravity) else {
            self.samples_rejected += 1;
            self.state.is_face_up = false;
            debug!(
                x = gravity.x,
                y = gravity.y,
                z = gravity.z,
                "indeterminate gravity vector, treating phone as not face up"
            );
            return Err(SensingError::InvalidSample(
                "gravity vector has zero or non-finite magnitude",
            ));
        };

        self.state = OrientationState {
            is_face_up: angle <= self.config.face_up_tolerance_deg,
            last_angle_deg: angle,
        };
        Ok(self.state)
    }

    pub fn state(&self) -> OrientationState {
        self.state
    }

    pub fn is_face_up(&self) -> bool {
        self.state.is_face_up
    }

    pub fn last_angle_deg(&self) -> f32 {
        self.state.last_angle_deg
    }

    /// Gravity samples rejected as indeterminate since the last reset.
    pub fn samples_rejected(&self) -> u64 {
        self.samples_rejected
    }

    pub fn samples_processed(&self) -> u64 {
        self.samples_processed
    }

    /// Back to session defaults: not face up, angle zero.
    pub fn reset(&mut self) {
        self.state = OrientationState::default();
        self.samples_processed = 0;
        self.samples_rejected = 0;
    }
}

impl Default for OrientationMonitor {
    fn default() -> Self {
        Self::new(OrientationConfig::default())
    }
}
