//! Shooting direction and region classification.
//!
//! The detector does not care which physical signal produces a heading. Any
//! source (compass, gyro integration, a game controller) feeds degrees into a
//! [`RegionClassifier`], which turns them into a [`ShootingState`].
//!
//! The reference [`SectorClassifier`] splits the circle into equal,
//! contiguous sectors numbered 1..=N clockwise from a reference heading
//! (magnetic north by default). Boundaries are inclusive-low, exclusive-high:
//! with 8 regions, region 1 is [0°, 45°), region 2 is [45°, 90°) and so on.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SensingError};
use crate::types::ShootingState;

/// Maps a heading to a shooting region.
pub trait RegionClassifier {
    /// Classify a heading in degrees. Must be total over finite input.
    fn classify(&self, heading_deg: f32) -> Result<ShootingState>;

    /// Number of regions this classifier produces.
    fn num_regions(&self) -> usize;
}

/// Configuration for the reference sector classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Number of equal sectors around the user.
    pub num_regions: usize,
    /// Heading (degrees, clockwise) at which region 1 begins.
    pub reference_heading_deg: f32,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            num_regions: 8,
            reference_heading_deg: 0.0,
        }
    }
}

impl RegionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_regions == 0 {
            return Err(SensingError::InvalidConfig(
                "num_regions must be at least 1".to_string(),
            ));
        }
        if !self.reference_heading_deg.is_finite() {
            return Err(SensingError::InvalidConfig(
                "reference_heading_deg must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Wrap any finite angle into `[0, 360)`.
pub fn normalize_degrees(deg: f32) -> f32 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Equal-width sector classifier.
#[derive(Debug, Clone)]
pub struct SectorClassifier {
    num_regions: usize,
    sector_width_deg: f32,
    reference_heading_deg: f32,
}

impl SectorClassifier {
    pub fn new(config: &RegionConfig) -> Self {
        let num_regions = config.num_regions.max(1);
        Self {
            num_regions,
            sector_width_deg: 360.0 / num_regions as f32,
            reference_heading_deg: normalize_degrees(config.reference_heading_deg),
        }
    }

    pub fn sector_width_deg(&self) -> f32 {
        self.sector_width_deg
    }

    /// Region for a heading already wrapped into `[0, 360)`.
    fn region_for(&self, direction_deg: f32) -> usize {
        let relative = normalize_degrees(direction_deg - self.reference_heading_deg);
        let sector = (relative / self.sector_width_deg) as usize;
        sector.min(self.num_regions - 1) + 1
    }
}

impl Default for SectorClassifier {
    fn default() -> Self {
        Self::new(&RegionConfig::default())
    }
}

impl RegionClassifier for SectorClassifier {
    fn classify(&self, heading_deg: f32) -> Result<ShootingState> {
        if !heading_deg.is_finite() {
            return Err(SensingError::InvalidSample("heading is not finite"));
        }
        let direction_deg = normalize_degrees(heading_deg);
        Ok(ShootingState {
            region_index: self.region_for(direction_deg),
            direction_deg,
        })
    }

    fn num_regions(&self) -> usize {
        self.num_regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_belong_to_upper_sector() {
        let classifier = SectorClassifier::default();
        for k in 0..8 {
            let boundary = k as f32 * 45.0;
            let state = classifier.classify(boundary).unwrap();
            assert_eq!(state.region_index, k + 1, "boundary {}", boundary);
        }
    }

    #[test]
    fn test_sector_interiors() {
        let classifier = SectorClassifier::default();
        assert_eq!(classifier.classify(10.0).unwrap().region_index, 1);
        assert_eq!(classifier.classify(44.999).unwrap().region_index, 1);
        assert_eq!(classifier.classify(100.0).unwrap().region_index, 3);
        assert_eq!(classifier.classify(200.0).unwrap().region_index, 5);
        assert_eq!(classifier.classify(359.9).unwrap().region_index, 8);
    }

    #[test]
    fn test_classifier_is_total() {
        let classifier = SectorClassifier::default();
        let mut counts = [0usize; 8];
        for tenth in 0..3600 {
            let heading = tenth as f32 / 10.0;
            let state = classifier.classify(heading).unwrap();
            assert!((1..=8).contains(&state.region_index));
            assert!(state.direction_deg >= 0.0 && state.direction_deg < 360.0);
            counts[state.region_index - 1] += 1;
        }
        // Every sector covers exactly 45 degrees worth of tenths.
        assert!(counts.iter().all(|&c| c == 450), "counts: {:?}", counts);
    }

    #[test]
    fn test_headings_wrap() {
        let classifier = SectorClassifier::default();
        let state = classifier.classify(-10.0).unwrap();
        assert_eq!(state.region_index, 8);
        assert!((state.direction_deg - 350.0).abs() < 1e-4);

        let state = classifier.classify(360.0).unwrap();
        assert_eq!(state.region_index, 1);
        assert_eq!(state.direction_deg, 0.0);

        let state = classifier.classify(725.0).unwrap();
        assert_eq!(state.region_index, 1);
        assert!((state.direction_deg - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_tiny_negative_heading_stays_in_range() {
        let state = SectorClassifier::default().classify(-1e-9).unwrap();
        assert!(state.direction_deg < 360.0);
        assert!((1..=8).contains(&state.region_index));
    }

    #[test]
    fn test_reference_heading_rotates_sectors() {
        let classifier = SectorClassifier::new(&RegionConfig {
            num_regions: 8,
            reference_heading_deg: 90.0,
        });
        assert_eq!(classifier.classify(90.0).unwrap().region_index, 1);
        assert_eq!(classifier.classify(89.0).unwrap().region_index, 8);
        assert_eq!(classifier.classify(0.0).unwrap().region_index, 7);
        // Direction stays absolute.
        assert_eq!(classifier.classify(0.0).unwrap().direction_deg, 0.0);
    }

    #[test]
    fn test_non_finite_heading_rejected() {
        let classifier = SectorClassifier::default();
        assert!(classifier.classify(f32::NAN).is_err());
        assert!(classifier.classify(f32::INFINITY).is_err());
    }

    #[test]
    fn test_region_count_is_configurable() {
        let classifier = SectorClassifier::new(&RegionConfig {
            num_regions: 4,
            reference_heading_deg: 0.0,
        });
        assert_eq!(classifier.num_regions(), 4);
        assert_eq!(classifier.sector_width_deg(), 90.0);
        assert_eq!(classifier.classify(270.0).unwrap().region_index, 4);
    }

    #[test]
    fn test_config_validation() {
        assert!(RegionConfig::default().validate().is_ok());
        let zero = RegionConfig {
            num_regions: 0,
            ..RegionConfig::default()
        };
        assert!(zero.validate().is_err());
    }
}
