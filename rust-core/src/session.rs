/// A sensing session: the dispatch loop between the host's sensor callbacks
/// and the detection components.
///
/// The host delivers samples one at a time on a single thread. Each sample is
/// dispatched by sensor kind:
/// 1. **Gravity**: updates the orientation monitor (and the compass tilt)
/// 2. **Linear acceleration**: runs the gesture detector, gated on face-up;
///    a fired gesture plays the sound selected for the current region
/// 3. **Magnetic field**: updates the reference compass heading, which moves
///    the shooting region
///
/// After every sample the display is offered fresh snapshots, throttled per
/// channel. Throttling never affects detection.
///
/// # Lifecycle
/// `new` checks the device's sensors once; a missing sensor is fatal.
/// `start` resets every piece of state to its defaults. `stop` ends the
/// session and releases the sound bank; samples arriving afterwards are
/// refused until the next `start`.
///
/// # Performance
/// O(1) per sample, no allocation on the hot path, no blocking calls.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::audio::{AudioConfig, AudioSink, BankState, PlayOutcome, SoundPlayer};
use crate::display::{DisplaySink, GestureSnapshot, OrientationSnapshot, ShootingSnapshot};
use crate::error::{Result, SensingError};
use crate::gesture::{GestureConfig, GestureDetector};
use crate::heading::{CompassConfig, CompassHeading};
use crate::orientation::{OrientationConfig, OrientationMonitor};
use crate::region::{RegionClassifier, RegionConfig, SectorClassifier};
use crate::throttle::{DisplayChannel, Throttle, ThrottleConfig};
use crate::types::*;

/// Configuration for a complete sensing session.
///
/// Bundles every component's tunables. Missing fields in a JSON document fall
/// back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub orientation: OrientationConfig,
    pub gesture: GestureConfig,
    pub region: RegionConfig,
    pub throttle: ThrottleConfig,
    pub audio: AudioConfig,
    pub compass: CompassConfig,
}

impl SessionConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.orientation.validate()?;
        self.gesture.validate()?;
        self.region.validate()?;
        self.audio.validate()?;
        self.compass.validate()?;
        Ok(())
    }
}

/// Complete shooting-gesture sensing session.
pub struct ShootingSession<A: AudioSink, D: DisplaySink> {
    config: SessionConfig,
    capabilities: SensorCapabilities,

    // Detection
    orientation: OrientationMonitor,
    detector: GestureDetector,
    compass: CompassHeading,

    // Collaborators
    player: SoundPlayer<A>,
    display: D,
    throttle: Throttle<DisplayChannel>,

    active: bool,
    samples_processed: u64,
}

impl<A: AudioSink, D: DisplaySink> ShootingSession<A, D> {
    /// Creates a session using the reference sector classifier.
    pub fn new(
        config: SessionConfig,
        capabilities: SensorCapabilities,
        audio: A,
        display: D,
    ) -> Result<Self> {
        let classifier = Box::new(SectorClassifier::new(&config.region));
        Self::with_classifier(config, capabilities, classifier, audio, display)
    }

    /// Creates a session with a custom region classifier.
    pub fn with_classifier(
        config: SessionConfig,
        capabilities: SensorCapabilities,
        classifier: Box<dyn RegionClassifier>,
        audio: A,
        display: D,
    ) -> Result<Self> {
        config.validate()?;
        if let Err(err) = capabilities.require_core() {
            error!(%err, "unable to create sensing session");
            return Err(err);
        }

        let sound_variants = config.audio.num_sound_variants;
        Ok(Self {
            orientation: OrientationMonitor::new(config.orientation.clone()),
            detector: GestureDetector::with_classifier(
                config.gesture.clone(),
                sound_variants,
                classifier,
            ),
            compass: CompassHeading::new(config.compass.clone()),
            player: SoundPlayer::new(sound_variants, audio),
            display,
            throttle: Throttle::new(config.throttle.min_interval_ms),
            config,
            capabilities,
            active: false,
            samples_processed: 0,
        })
    }

    /// Begin a sensing session. All detection state returns to defaults.
    pub fn start(&mut self) {
        self.orientation.reset();
        self.detector.reset();
        self.compass.reset();
        self.throttle.reset();
        self.samples_processed = 0;
        self.active = true;
        info!(
            magnetic_field = self.capabilities.magnetic_field,
            "sensing session started"
        );
    }

    /// End the session. Sounds must be reloaded before the next one plays.
    pub fn stop(&mut self) {
        if self.active {
            info!(
                gestures = self.detector.gesture_count(),
                samples = self.samples_processed,
                "sensing session stopped"
            );
        }
        self.active = false;
        self.player.bank_mut().reset();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Processes a single sensor sample.
    ///
    /// Returns the gesture fired by this sample, if any. An `Err` covers this
    /// sample only: the session stays usable and the next sample is processed
    /// normally.
    pub fn process_sample(&mut self, sample: &Sample) -> Result<Option<GestureEvent>> {
        if !self.active {
            return Err(SensingError::SessionInactive);
        }
        self.samples_processed += 1;

        let result = match sample.kind {
            SensorKind::Gravity => self.handle_gravity(sample).map(|_| None),
            SensorKind::LinearAcceleration => self.handle_acceleration(sample),
            SensorKind::MagneticField => self.handle_magnetic(sample).map(|_| None),
        };

        self.publish_shooting(sample.timestamp_ms);

        if let Err(err) = &result {
            warn!(%err, kind = ?sample.kind, timestamp_ms = sample.timestamp_ms, "sample skipped");
        }
        result
    }

    /// Push a heading from an external heading source.
    pub fn update_heading(&mut self, timestamp_ms: u64, heading_deg: f32) -> Result<ShootingState> {
        if !self.active {
            return Err(SensingError::SessionInactive);
        }
        let state = self.detector.update_heading(heading_deg)?;
        self.publish_shooting(timestamp_ms);
        Ok(state)
    }

    /// Forward a sound-asset load completion from the host.
    pub fn on_sound_loaded(&mut self, status: i32) -> Result<BankState> {
        self.player.bank_mut().on_load_complete(status)
    }

    pub fn orientation(&self) -> OrientationState {
        self.orientation.state()
    }

    pub fn peak_state(&self) -> PeakState {
        self.detector.peak_state()
    }

    pub fn shooting_state(&self) -> ShootingState {
        self.detector.shooting_state()
    }

    pub fn samples_processed(&self) -> u64 {
        self.samples_processed
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn audio(&self) -> &A {
        self.player.sink()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn sound_player_mut(&mut self) -> &mut SoundPlayer<A> {
        &mut self.player
    }

    // =========================================================================
    // PRIVATE METHODS
    // =========================================================================

    fn handle_gravity(&mut self, sample: &Sample) -> Result<()> {
        let state = self.orientation.process_gravity(sample.vector)?;
        self.compass.update_gravity(sample.vector);

        if self.throttle.should_emit(DisplayChannel::Angle, sample.timestamp_ms) {
            self.display.show_orientation(&OrientationSnapshot {
                timestamp_ms: sample.timestamp_ms,
                gravity: sample.vector,
                angle_deg: state.last_angle_deg,
                is_face_up: state.is_face_up,
            });
        }
        Ok(())
    }

    fn handle_acceleration(&mut self, sample: &Sample) -> Result<Option<GestureEvent>> {
        let face_up = self.orientation.is_face_up();
        let event = self.detector.process_acceleration(sample.vector, face_up)?;

        if let Some(event) = &event {
            match self.player.play(event.sound_index) {
                Ok(PlayOutcome::Played(index)) => debug!(index, "gunshot sound played"),
                Ok(PlayOutcome::NotReady) => debug!("sounds not loaded, gesture is silent"),
                Err(err) => warn!(%err, "gunshot sound skipped"),
            }
        }

        if face_up && self.throttle.should_emit(DisplayChannel::Gestures, sample.timestamp_ms) {
            self.display.show_gestures(&GestureSnapshot {
                timestamp_ms: sample.timestamp_ms,
                acceleration: sample.vector,
                gesture_count: self.detector.gesture_count(),
            });
        }
        Ok(event)
    }

    fn handle_magnetic(&mut self, sample: &Sample) -> Result<()> {
        if !self.capabilities.magnetic_field {
            return Err(SensingError::InvalidSample(
                "magnetic field sample from an undeclared sensor",
            ));
        }
        if let Some(heading) = self.compass.update_magnetic(sample.vector) {
            self.detector.update_heading(heading)?;
        }
        Ok(())
    }

    fn publish_shooting(&mut self, timestamp_ms: u64) {
        if self.throttle.should_emit(DisplayChannel::Direction, timestamp_ms) {
            let state = self.detector.shooting_state();
            self.display.show_shooting(&ShootingSnapshot {
                timestamp_ms,
                direction_deg: state.direction_deg,
                region_index: state.region_index,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use crate::display::NullDisplay;

    fn session() -> ShootingSession<SilentAudio, NullDisplay> {
        ShootingSession::new(
            SessionConfig::default(),
            SensorCapabilities::default(),
            SilentAudio,
            NullDisplay,
        )
        .unwrap()
    }

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.orientation.face_up_tolerance_deg, 30.0);
        assert_eq!(config.gesture.peak_enter_accel, 7.0);
        assert_eq!(config.gesture.peak_exit_accel, 1.0);
        assert_eq!(config.region.num_regions, 8);
        assert_eq!(config.throttle.min_interval_ms, 250);
        assert_eq!(config.audio.num_sound_variants, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = SessionConfig::from_json(
            r#"{ "gesture": { "peak_enter_accel": 5.5 }, "throttle": { "min_interval_ms": 100 } }"#,
        )
        .unwrap();
        assert_eq!(config.gesture.peak_enter_accel, 5.5);
        assert_eq!(config.gesture.peak_exit_accel, 1.0);
        assert_eq!(config.throttle.min_interval_ms, 100);
        assert_eq!(config.region.num_regions, 8);
    }

    #[test]
    fn test_config_from_json_rejects_invalid() {
        let inverted = SessionConfig::from_json(
            r#"{ "gesture": { "peak_enter_accel": 1.0, "peak_exit_accel": 2.0 } }"#,
        );
        assert!(matches!(inverted, Err(SensingError::InvalidConfig(_))));

        let malformed = SessionConfig::from_json("{ not json");
        assert!(matches!(malformed, Err(SensingError::ConfigParse(_))));
    }

    #[test]
    fn test_missing_sensor_is_fatal() {
        let caps = SensorCapabilities {
            linear_acceleration: false,
            ..SensorCapabilities::default()
        };
        let result = ShootingSession::new(SessionConfig::default(), caps, SilentAudio, NullDisplay);
        assert!(matches!(
            result,
            Err(SensingError::MissingSensor(SensorKind::LinearAcceleration))
        ));
    }

    #[test]
    fn test_samples_refused_before_start_and_after_stop() {
        let mut session = session();
        let sample = Sample::gravity(0, [0.0, 0.0, 9.81]);
        assert!(matches!(
            session.process_sample(&sample),
            Err(SensingError::SessionInactive)
        ));

        session.start();
        assert!(session.process_sample(&sample).is_ok());
        assert!(session.orientation().is_face_up);

        session.stop();
        assert!(!session.is_active());
        assert!(matches!(
            session.process_sample(&sample),
            Err(SensingError::SessionInactive)
        ));
        assert!(session.update_heading(0, 90.0).is_err());
    }

    #[test]
    fn test_start_resets_state() {
        let mut session = session();
        session.start();
        session.process_sample(&Sample::gravity(0, [0.0, 0.0, 9.81])).unwrap();
        session.process_sample(&Sample::linear_acceleration(20, [0.0, 0.0, 9.0])).unwrap();
        session.update_heading(40, 200.0).unwrap();
        assert_eq!(session.peak_state().gesture_count, 1);

        session.stop();
        session.start();

        assert_eq!(session.orientation(), OrientationState::default());
        assert_eq!(session.peak_state(), PeakState::default());
        assert_eq!(session.shooting_state(), ShootingState::default());
        assert_eq!(session.samples_processed(), 0);
    }

    #[test]
    fn test_undeclared_magnetic_sensor_is_refused() {
        let mut session = session();
        session.start();
        session.process_sample(&Sample::gravity(0, [0.0, 0.0, 9.81])).unwrap();

        let result = session.process_sample(&Sample::magnetic_field(20, [0.0, -20.0, -40.0]));
        assert!(matches!(result, Err(SensingError::InvalidSample(_))));
        assert_eq!(session.shooting_state(), ShootingState::default());
        assert!(session.is_active());

        let mut with_compass = ShootingSession::new(
            SessionConfig::default(),
            SensorCapabilities::all(),
            SilentAudio,
            NullDisplay,
        )
        .unwrap();
        with_compass.start();
        with_compass.process_sample(&Sample::gravity(0, [0.0, 0.0, 9.81])).unwrap();
        with_compass
            .process_sample(&Sample::magnetic_field(20, [0.0, -20.0, -40.0]))
            .unwrap();
        assert_eq!(with_compass.shooting_state().region_index, 5);
    }

    #[test]
    fn test_zero_throttle_interval_is_accepted() {
        let config = SessionConfig::from_json(r#"{ "throttle": { "min_interval_ms": 0 } }"#).unwrap();
        assert_eq!(config.throttle.min_interval_ms, 0);
        let session =
            ShootingSession::new(config, SensorCapabilities::default(), SilentAudio, NullDisplay)
                .unwrap();
        assert_eq!(session.config().throttle.min_interval_ms, 0);
    }

    #[test]
    fn test_invalid_sample_does_not_end_session() {
        let mut session = session();
        session.start();
        assert!(session.process_sample(&Sample::gravity(0, [0.0, 0.0, 0.0])).is_err());
        assert!(session.is_active());
        assert!(session.process_sample(&Sample::gravity(20, [0.0, 0.0, 9.81])).is_ok());
        assert!(session.orientation().is_face_up);
    }
}
