//! Reference heading source: tilt-compensated compass.
//!
//! The gesture core takes headings from anywhere. This module is one concrete
//! source, built from the gravity and magnetic-field sensors:
//!
//! - East is `magnetic × gravity` (horizontal, perpendicular to both)
//! - North is `gravity × east`
//! - Heading is the angle of the phone's y axis (top edge) from north,
//!   clockwise, in degrees
//!
//! Using the cross products avoids computing roll and pitch explicitly, and
//! works for any tilt as long as the field is not parallel to gravity.
//! Field magnitudes outside the plausible range for Earth's field (nearby
//! magnets, steel) are rejected rather than trusted.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, SensingError};
use crate::region::normalize_degrees;
use crate::types::Vector3;

/// Configuration for the compass heading source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompassConfig {
    /// Minimum magnetic field magnitude to trust (μT).
    pub min_field_ut: f32,
    /// Maximum magnetic field magnitude to trust (μT).
    pub max_field_ut: f32,
}

impl Default for CompassConfig {
    fn default() -> Self {
        Self {
            min_field_ut: 25.0, // Earth's field is ~25-65 μT
            max_field_ut: 65.0,
        }
    }
}

impl CompassConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_field_ut >= 0.0 && self.min_field_ut < self.max_field_ut) {
            return Err(SensingError::InvalidConfig(format!(
                "compass field range [{}, {}] is empty",
                self.min_field_ut, self.max_field_ut
            )));
        }
        Ok(())
    }
}

/// Heading in degrees `[0, 360)` of the device's y axis, clockwise from
/// magnetic north. `None` if either vector is degenerate or they are
/// parallel.
pub fn tilt_compensated_heading_deg(gravity: Vector3, magnetic: Vector3) -> Option<f32> {
    let down = gravity.normalized()?;
    let east = magnetic.cross(&down).normalized()?;
    let north = down.cross(&east);

    // Project the device y axis onto the horizontal east/north basis.
    let heading_rad = east.y.atan2(north.y);
    let heading = heading_rad.to_degrees();
    heading.is_finite().then(|| normalize_degrees(heading))
}

/// Tracks the latest gravity vector and turns magnetic samples into headings.
#[derive(Debug, Clone)]
pub struct CompassHeading {
    config: CompassConfig,
    gravity: Option<Vector3>,
    last_heading_deg: Option<f32>,
    rejected_fields: u64,
}

impl CompassHeading {
    pub fn new(config: CompassConfig) -> Self {
        Self {
            config,
            gravity: None,
            last_heading_deg: None,
            rejected_fields: 0,
        }
    }

    /// Remember the latest gravity vector for tilt compensation.
    pub fn update_gravity(&mut self, gravity: Vector3) {
        if gravity.normalized().is_some() {
            self.gravity = Some(gravity);
        }
    }

    /// Compute a heading from a magnetic-field sample.
    ///
    /// Returns `None` until a gravity vector has been seen, or when the field
    /// is implausible. Neither case is an error: the region simply stays put.
    pub fn update_magnetic(&mut self, magnetic: Vector3) -> Option<f32> {
        let gravity = self.gravity?;

        let strength = magnetic.magnitude();
        if !(self.config.min_field_ut..=self.config.max_field_ut).contains(&strength) {
            self.rejected_fields += 1;
            trace!(strength, "magnetic field outside trusted range");
            return None;
        }

        let heading = tilt_compensated_heading_deg(gravity, magnetic)?;
        self.last_heading_deg = Some(heading);
        Some(heading)
    }

    pub fn last_heading_deg(&self) -> Option<f32> {
        self.last_heading_deg
    }

    /// Magnetic samples dropped for an implausible field strength.
    pub fn rejected_fields(&self) -> u64 {
        self.rejected_fields
    }

    pub fn reset(&mut self) {
        self.gravity = None;
        self.last_heading_deg = None;
        self.rejected_fields = 0;
    }
}

impl Default for CompassHeading {
    fn default() -> Self {
        Self::new(CompassConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAT: Vector3 = Vector3::new(0.0, 0.0, 9.81);

    fn assert_heading(actual: Option<f32>, expected: f32) {
        let actual = actual.expect("heading should be defined");
        let diff = (actual - expected).abs().min(360.0 - (actual - expected).abs());
        assert!(diff < 0.5, "heading {} expected {}", actual, expected);
    }

    #[test]
    fn test_flat_phone_cardinal_directions() {
        // Northern-hemisphere field: horizontal component plus a downward dip.
        // Top edge pointing north: field along +y.
        assert_heading(
            tilt_compensated_heading_deg(FLAT, Vector3::new(0.0, 20.0, -40.0)),
            0.0,
        );
        // Top edge pointing east: north lies along -x.
        assert_heading(
            tilt_compensated_heading_deg(FLAT, Vector3::new(-20.0, 0.0, -40.0)),
            90.0,
        );
        // Top edge pointing south.
        assert_heading(
            tilt_compensated_heading_deg(FLAT, Vector3::new(0.0, -20.0, -40.0)),
            180.0,
        );
        // Top edge pointing west.
        assert_heading(
            tilt_compensated_heading_deg(FLAT, Vector3::new(20.0, 0.0, -40.0)),
            270.0,
        );
    }

    #[test]
    fn test_tilt_does_not_change_heading() {
        // Phone facing north, tilted 20 degrees about its y axis (roll).
        let roll = 20.0_f32.to_radians();
        let gravity = Vector3::new(-9.81 * roll.sin(), 0.0, 9.81 * roll.cos());
        // Same world field (north 20, down 40) expressed in the rolled frame.
        let magnetic = Vector3::new(40.0 * roll.sin(), 20.0, -40.0 * roll.cos());
        assert_heading(tilt_compensated_heading_deg(gravity, magnetic), 0.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(tilt_compensated_heading_deg(Vector3::default(), Vector3::new(0.0, 20.0, -40.0)).is_none());
        // Field parallel to gravity has no horizontal component.
        assert!(tilt_compensated_heading_deg(FLAT, Vector3::new(0.0, 0.0, -50.0)).is_none());
    }

    #[test]
    fn test_compass_needs_gravity_first() {
        let mut compass = CompassHeading::default();
        assert!(compass.update_magnetic(Vector3::new(0.0, 20.0, -40.0)).is_none());

        compass.update_gravity(FLAT);
        assert_heading(compass.update_magnetic(Vector3::new(0.0, 20.0, -40.0)), 0.0);
        assert!(compass.last_heading_deg().is_some());
    }

    #[test]
    fn test_compass_rejects_implausible_field() {
        let mut compass = CompassHeading::default();
        compass.update_gravity(FLAT);

        assert!(compass.update_magnetic(Vector3::new(0.0, 5.0, -5.0)).is_none());
        assert!(compass.update_magnetic(Vector3::new(0.0, 200.0, -400.0)).is_none());
        assert_eq!(compass.rejected_fields(), 2);
    }

    #[test]
    fn test_reset() {
        let mut compass = CompassHeading::default();
        compass.update_gravity(FLAT);
        compass.update_magnetic(Vector3::new(0.0, 20.0, -40.0));

        compass.reset();

        assert!(compass.last_heading_deg().is_none());
        assert!(compass.update_magnetic(Vector3::new(0.0, 20.0, -40.0)).is_none());
    }
}
