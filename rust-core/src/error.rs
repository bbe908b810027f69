//! Error type shared by every component of the sensing core.
//!
//! Three kinds of failure exist:
//! - missing capability (a required sensor is absent): fatal to session start
//! - invalid input (malformed sample, bad sound index, bad config): reported,
//!   the offending operation is skipped, the session continues
//! - resource not ready (sounds still loading): not an error at all, playback
//!   is skipped silently

use thiserror::Error;

use crate::types::SensorKind;

#[derive(Debug, Error)]
pub enum SensingError {
    /// A sensor the core depends on is not present on the device.
    #[error("required sensor is not available on this device: {0:?}")]
    MissingSensor(SensorKind),

    /// A sample or heading that cannot be interpreted (zero-length gravity,
    /// NaN components, ...).
    #[error("invalid sample: {0}")]
    InvalidSample(&'static str),

    /// A sound index outside the loaded sound bank.
    #[error("invalid sound index {index} (bank holds {available} sounds)")]
    InvalidSoundIndex { index: usize, available: usize },

    /// The audio collaborator reported a failed asset load.
    #[error("sound effects could not be loaded (status {0})")]
    SoundLoadFailed(i32),

    /// A sample arrived outside an active sensing session.
    #[error("sensing session is not active")]
    SessionInactive,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SensingError>;
