//! Core data types for the shooting-gesture sensing core.
//!
//! This module defines the sample and state types shared by the orientation
//! monitor, the gesture detector and the session that drives them. Every
//! type here is plain data: `Copy`, no heap allocation, cheap to hand to a
//! display or audio collaborator.
//!
//! Design principle: if a concept exists, it gets a type. Sensor readings are
//! never passed around as loose tuples.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SensingError};

/// A single instantaneous three-axis sensor reading.
///
/// Units depend on the sensor: m/s² for gravity and linear acceleration,
/// μT for the magnetic field. Immutable once captured.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    /// The device's flat-face normal (positive z axis).
    pub const UNIT_Z: Vector3 = Vector3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Dot product with another vector.
    pub fn dot(&self, other: &Vector3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product `self × other`.
    pub fn cross(&self, other: &Vector3) -> Vector3 {
        Vector3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Euclidean length.
    ///
    /// Squares are summed in f64, so finite vectors near the ends of the f32
    /// range still get a finite, non-zero length.
    pub fn magnitude(&self) -> f32 {
        self.magnitude_f64() as f32
    }

    pub(crate) fn magnitude_f64(&self) -> f64 {
        let (x, y, z) = (self.x as f64, self.y as f64, self.z as f64);
        (x * x + y * y + z * z).sqrt()
    }

    /// True when no component is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Returns the vector scaled to unit length, or `None` for a zero or
    /// non-finite vector.
    pub fn normalized(&self) -> Option<Vector3> {
        let len = self.magnitude_f64();
        if !len.is_finite() || len <= 0.0 {
            return None;
        }
        Some(Vector3::new(
            (self.x as f64 / len) as f32,
            (self.y as f64 / len) as f32,
            (self.z as f64 / len) as f32,
        ))
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(v: [f32; 3]) -> Self {
        Vector3::new(v[0], v[1], v[2])
    }
}

/// Which sensor produced a sample.
///
/// Gravity and linear acceleration drive the core. The magnetic field is
/// only consumed by the reference compass heading source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKind {
    Gravity,
    LinearAcceleration,
    MagneticField,
}

impl SensorKind {
    /// Stable numeric code used across the C ABI.
    pub fn code(&self) -> i32 {
        match self {
            SensorKind::Gravity => 0,
            SensorKind::LinearAcceleration => 1,
            SensorKind::MagneticField => 2,
        }
    }

    /// Inverse of [`SensorKind::code`].
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(SensorKind::Gravity),
            1 => Some(SensorKind::LinearAcceleration),
            2 => Some(SensorKind::MagneticField),
            _ => None,
        }
    }
}

/// A timestamped sensor reading, consumed once by the core and never kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Timestamp in milliseconds. Used for display throttling only.
    pub timestamp_ms: u64,
    pub kind: SensorKind,
    pub vector: Vector3,
}

impl Sample {
    pub fn new(timestamp_ms: u64, kind: SensorKind, vector: Vector3) -> Self {
        Self {
            timestamp_ms,
            kind,
            vector,
        }
    }

    /// Convenience constructor for a gravity sample.
    pub fn gravity(timestamp_ms: u64, v: [f32; 3]) -> Self {
        Self::new(timestamp_ms, SensorKind::Gravity, v.into())
    }

    /// Convenience constructor for a linear-acceleration sample.
    pub fn linear_acceleration(timestamp_ms: u64, v: [f32; 3]) -> Self {
        Self::new(timestamp_ms, SensorKind::LinearAcceleration, v.into())
    }

    /// Convenience constructor for a magnetic-field sample.
    pub fn magnetic_field(timestamp_ms: u64, v: [f32; 3]) -> Self {
        Self::new(timestamp_ms, SensorKind::MagneticField, v.into())
    }
}

/// Phone tilt as seen by the orientation monitor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OrientationState {
    /// Whether the phone lies face up, within the configured tolerance.
    pub is_face_up: bool,
    /// Angle between gravity and the flat-face normal, in degrees.
    pub last_angle_deg: f32,
}

/// Hysteresis state of the gesture detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeakState {
    /// True between a peak-enter crossing and the following peak-exit.
    pub in_peak_zone: bool,
    /// Gestures detected in this session. Never decreases within a session.
    pub gesture_count: u32,
}

/// Current shooting direction and the sector it falls in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShootingState {
    /// Sector number, 1-based.
    pub region_index: usize,
    /// Heading in degrees, always in `[0, 360)`.
    pub direction_deg: f32,
}

impl Default for ShootingState {
    fn default() -> Self {
        Self {
            region_index: 1,
            direction_deg: 0.0,
        }
    }
}

/// A single detected shooting gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    /// Session gesture count including this gesture.
    pub gesture_count: u32,
    /// Region the phone pointed at when the gesture fired (1-based).
    pub region_index: usize,
    /// Sound variant selected for the region (0-based).
    pub sound_index: usize,
    /// z-axis acceleration of the sample that crossed the peak-enter threshold.
    pub peak_accel: f32,
}

/// Sensors the host device reports as present.
///
/// Checked once when a session is created. Hardware cannot appear later, so
/// a missing sensor is fatal to session creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorCapabilities {
    pub linear_acceleration: bool,
    pub gravity: bool,
    /// Optional. Only the compass heading source uses it.
    pub magnetic_field: bool,
}

impl SensorCapabilities {
    /// A device with every sensor the crate knows about.
    pub fn all() -> Self {
        Self {
            linear_acceleration: true,
            gravity: true,
            magnetic_field: true,
        }
    }

    /// Fails with the first required sensor that is absent.
    pub fn require_core(&self) -> Result<()> {
        if !self.linear_acceleration {
            return Err(SensingError::MissingSensor(SensorKind::LinearAcceleration));
        }
        if !self.gravity {
            return Err(SensingError::MissingSensor(SensorKind::Gravity));
        }
        Ok(())
    }
}

impl Default for SensorCapabilities {
    fn default() -> Self {
        Self {
            linear_acceleration: true,
            gravity: true,
            magnetic_field: false,
        }
    }
}
