//! Shooting Gesture Sensing Library
//!
//! The detection core of a "shooting" game played with a phone: hold the
//! phone flat, face up, and flick it to fire. The library turns raw gravity
//! and linear-acceleration samples into discrete gesture events and picks a
//! gunshot sound by the direction the phone points at.
//!
//! # Design Philosophy
//!
//! - **Pure computation**: the host owns sensors, widgets and audio. The core
//!   receives samples through method calls and answers with plain data.
//! - **Exact counts, throttled display**: every qualifying flick is counted;
//!   only the on-screen refresh rate is limited.
//! - **Per-sample failures stay per-sample**: a glitched reading is reported
//!   and skipped, the session keeps running.
//! - **O(1) per sample**: fixed memory, no blocking, safe to run on the UI
//!   thread that delivers sensor callbacks.
//!
//! # Example
//!
//! ```
//! use shooting_sensing::{
//!     NullDisplay, Sample, SensorCapabilities, SessionConfig, ShootingSession, SilentAudio,
//! };
//!
//! let mut session = ShootingSession::new(
//!     SessionConfig::default(),
//!     SensorCapabilities::default(),
//!     SilentAudio,
//!     NullDisplay,
//! )
//! .unwrap();
//! session.start();
//!
//! session.process_sample(&Sample::gravity(0, [0.0, 0.0, 9.81])).unwrap();
//! let event = session
//!     .process_sample(&Sample::linear_acceleration(20, [0.0, 0.0, 8.5]))
//!     .unwrap();
//!
//! assert_eq!(event.map(|e| e.gesture_count), Some(1));
//! ```

pub mod audio;
pub mod display;
pub mod error;
pub mod ffi;
pub mod gesture;
pub mod heading;
pub mod orientation;
pub mod region;
pub mod session;
pub mod throttle;
pub mod types;


// Re-export commonly used types
pub use audio::{AudioConfig, AudioSink, BankState, PlayOutcome, SilentAudio, SoundBank, SoundPlayer};
pub use display::{DisplaySink, GestureSnapshot, NullDisplay, OrientationSnapshot, ShootingSnapshot};
pub use error::{Result, SensingError};
pub use gesture::{sound_index_for_region, GestureConfig, GestureDetector, PeakZone};
pub use heading::{tilt_compensated_heading_deg, CompassConfig, CompassHeading};
pub use orientation::{tilt_angle_deg, OrientationConfig, OrientationMonitor};
pub use region::{normalize_degrees, RegionClassifier, RegionConfig, SectorClassifier};
pub use session::{SessionConfig, ShootingSession};
pub use throttle::{DisplayChannel, Throttle, ThrottleConfig};
pub use types::{
    GestureEvent, OrientationState, PeakState, Sample, SensorCapabilities, SensorKind,
    ShootingState, Vector3,
};
