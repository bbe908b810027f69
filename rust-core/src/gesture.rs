//! Shooting-gesture detection from linear acceleration.
//!
//! A shooting gesture is a sharp flick of the phone along its z axis while it
//! lies face up. Raw linear acceleration is noisy around any single
//! threshold, so detection uses two thresholds and a two-state machine:
//!
//! ```text
//!            z >= peak_enter (fires one gesture)
//!   Idle ───────────────────────────────────────▶ InPeak
//!     ▲                                             │
//!     └─────────────────────────────────────────────┘
//!            z <= peak_exit (re-arms, silent)
//! ```
//!
//! Everything in between is a no-op. A plateau hovering around `peak_enter`
//! therefore produces exactly one gesture; the signal has to fall back under
//! `peak_exit` before the next one can fire.
//!
//! The detector also owns the region classifier, so a fired gesture carries
//! the sound variant selected for the region the phone points at.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{Result, SensingError};
use crate::region::{RegionClassifier, SectorClassifier};
use crate::types::{GestureEvent, PeakState, ShootingState, Vector3};

/// Configuration for gesture detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// z acceleration (m/s²) at or above which a gesture fires. Tune per phone.
    pub peak_enter_accel: f32,
    /// z acceleration (m/s²) at or below which the detector re-arms.
    pub peak_exit_accel: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            peak_enter_accel: 7.0,
            peak_exit_accel: 1.0,
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.peak_enter_accel.is_finite() || !self.peak_exit_accel.is_finite() {
            return Err(SensingError::InvalidConfig(
                "gesture thresholds must be finite".to_string(),
            ));
        }
        if self.peak_exit_accel >= self.peak_enter_accel {
            return Err(SensingError::InvalidConfig(format!(
                "peak_exit_accel ({}) must be below peak_enter_accel ({})",
                self.peak_exit_accel, self.peak_enter_accel
            )));
        }
        Ok(())
    }
}

/// Hysteresis zone of the acceleration signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeakZone {
    Idle,
    InPeak,
}

/// Sound variant for a 1-based region.
///
/// Regions wrap onto the available variants when there are more regions than
/// sounds. Returns `None` for region 0 or an empty sound bank.
pub fn sound_index_for_region(region_index: usize, num_sound_variants: usize) -> Option<usize> {
    region_index.checked_sub(1)?.checked_rem(num_sound_variants)
}

/// Two-threshold gesture detector.
pub struct GestureDetector {
    config: GestureConfig,
    zone: PeakZone,
    gesture_count: u32,
    num_sound_variants: usize,

    classifier: Box<dyn RegionClassifier>,
    shooting: ShootingState,
    sound_index: usize,

    samples_gated: u64,
}

impl GestureDetector {
    /// Detector with the reference sector classifier (8 regions from north).
    pub fn new(config: GestureConfig, num_sound_variants: usize) -> Self {
        Self::with_classifier(config, num_sound_variants, Box::new(SectorClassifier::default()))
    }

    /// Detector driven by a custom region classifier.
    ///
    /// At least one sound variant is always assumed.
    pub fn with_classifier(
        config: GestureConfig,
        num_sound_variants: usize,
        classifier: Box<dyn RegionClassifier>,
    ) -> Self {
        Self {
            config,
            zone: PeakZone::Idle,
            gesture_count: 0,
            num_sound_variants: num_sound_variants.max(1),
            classifier,
            shooting: ShootingState::default(),
            sound_index: 0,
            samples_gated: 0,
        }
    }

    /// Process one linear-acceleration sample.
    ///
    /// While `face_up` is false the sample is dropped without touching any
    /// state. A non-finite z component is rejected the same way and reported.
    pub fn process_acceleration(
        &mut self,
        accel: Vector3,
        face_up: bool,
    ) -> Result<Option<GestureEvent>> {
        if !face_up {
            self.samples_gated += 1;
            return Ok(None);
        }

        let z = accel.z;
        if !z.is_finite() {
            return Err(SensingError::InvalidSample(
                "linear acceleration z component is not finite",
            ));
        }

        match self.zone {
            PeakZone::Idle if z >= self.config.peak_enter_accel => {
                self.zone = PeakZone::InPeak;
                Ok(Some(self.fire(z)))
            }
            PeakZone::InPeak if z <= self.config.peak_exit_accel => {
                self.zone = PeakZone::Idle;
                trace!(z, "acceleration left peak zone");
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    /// Feed a new heading into the region classifier.
    ///
    /// The classifier's answer must name a region in `1..=num_regions()` and a
    /// direction in `[0, 360)`. On error the previous shooting state is kept.
    pub fn update_heading(&mut self, heading_deg: f32) -> Result<ShootingState> {
        let state = self.classifier.classify(heading_deg)?;

        let num_regions = self.classifier.num_regions();
        if !(1..=num_regions).contains(&state.region_index) {
            warn!(
                region_index = state.region_index,
                num_regions, "classifier returned a region out of range"
            );
            return Err(SensingError::InvalidSample(
                "classifier returned a region out of range",
            ));
        }
        if !(0.0..360.0).contains(&state.direction_deg) {
            warn!(
                direction_deg = state.direction_deg,
                "classifier returned a direction outside [0, 360)"
            );
            return Err(SensingError::InvalidSample(
                "classifier returned a direction outside [0, 360)",
            ));
        }
        let Some(sound_index) = sound_index_for_region(state.region_index, self.num_sound_variants)
        else {
            return Err(SensingError::InvalidSample("region has no sound variant"));
        };

        if state.region_index != self.shooting.region_index {
            debug!(
                from = self.shooting.region_index,
                to = state.region_index,
                direction_deg = state.direction_deg,
                "shooting region changed"
            );
        }
        self.shooting = state;
        self.sound_index = sound_index;
        Ok(state)
    }

    pub fn peak_state(&self) -> PeakState {
        PeakState {
            in_peak_zone: self.zone == PeakZone::InPeak,
            gesture_count: self.gesture_count,
        }
    }

    pub fn zone(&self) -> PeakZone {
        self.zone
    }

    pub fn gesture_count(&self) -> u32 {
        self.gesture_count
    }

    pub fn shooting_state(&self) -> ShootingState {
        self.shooting
    }

    /// Samples dropped because the phone was not face up.
    pub fn samples_gated(&self) -> u64 {
        self.samples_gated
    }

    /// Back to session defaults: idle, zero gestures, region 1 at 0°.
    pub fn reset(&mut self) {
        self.zone = PeakZone::Idle;
        self.gesture_count = 0;
        self.shooting = ShootingState::default();
        self.sound_index = 0;
        self.samples_gated = 0;
    }

    fn fire(&mut self, peak_accel: f32) -> GestureEvent {
        self.gesture_count = self.gesture_count.saturating_add(1);
        let region_index = self.shooting.region_index;
        let sound_index = self.sound_index;

        debug!(
            gesture_count = self.gesture_count,
            region_index,
            sound_index,
            peak_accel,
            "shooting gesture detected"
        );

        GestureEvent {
            gesture_count: self.gesture_count,
            region_index,
            sound_index,
            peak_accel,
        }
    }
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new(GestureConfig::default(), 8)
    }
}

// ============================================================================
// TESTS
// ============================================================================
