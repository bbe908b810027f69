//! C FFI Bindings for Mobile Host Integration
//!
//! This module exposes a sensing session to mobile platforms via C ABI. The
//! host app forwards its sensor callbacks here and plays the reported sound
//! index with its own sound pool.
//!
//! Memory Safety:
//! - The engine instance must be freed with `shooting_engine_destroy()`
//! - NULL checks are performed on all inputs
//!
//! Thread Safety:
//! - The engine is NOT thread-safe. Call it from the sensor callback thread only.

use std::ptr;

use crate::audio::AudioSink;
use crate::display::NullDisplay;
use crate::error::SensingError;
use crate::session::{SessionConfig, ShootingSession};
use crate::types::{Sample, SensorCapabilities, SensorKind, Vector3};

// ============================================================================
// OPAQUE HANDLE TYPES
// ============================================================================

/// Records the sound the session asked for during the current call.
#[derive(Debug, Default)]
struct PendingSound {
    index: Option<usize>,
}

impl AudioSink for PendingSound {
    fn play_sound(&mut self, index: usize) {
        self.index = Some(index);
    }
}

/// Opaque handle to a shooting-gesture engine.
pub struct ShootingEngine {
    session: ShootingSession<PendingSound, NullDisplay>,
}

/// Result status codes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShootingStatus {
    /// Operation succeeded.
    Ok = 0,
    /// Null pointer provided.
    NullPointer = 1,
    /// Invalid parameter value.
    InvalidParameter = 2,
    /// Engine could not be created.
    NotInitialized = 3,
    /// A required sensor is missing on this device.
    MissingSensor = 4,
    /// The sample could not be interpreted; the session continues.
    InvalidSample = 5,
    /// No sensing session is active.
    SessionInactive = 6,
    /// Sound assets failed to load.
    SoundLoadFailed = 7,
}

impl From<&SensingError> for ShootingStatus {
    fn from(err: &SensingError) -> Self {
        match err {
            SensingError::MissingSensor(_) => ShootingStatus::MissingSensor,
            SensingError::InvalidSample(_) => ShootingStatus::InvalidSample,
            SensingError::SessionInactive => ShootingStatus::SessionInactive,
            SensingError::SoundLoadFailed(_) => ShootingStatus::SoundLoadFailed,
            SensingError::InvalidSoundIndex { .. }
            | SensingError::InvalidConfig(_)
            | SensingError::ConfigParse(_) => ShootingStatus::InvalidParameter,
        }
    }
}

/// Configuration for the engine.
///
/// Floating-point tunables take NaN to select their default; integer tunables
/// take any negative value. Everything else is passed through and validated.
#[repr(C)]
#[derive(Debug, Clone)]
pub struct ShootingConfig {
    /// Non-zero if the device has a linear acceleration sensor.
    pub has_linear_acceleration: i32,
    /// Non-zero if the device has a gravity sensor.
    pub has_gravity: i32,
    /// Non-zero if the device has a magnetic field sensor.
    pub has_magnetic_field: i32,
    /// Face-up tolerance in degrees (NaN: 30).
    pub face_up_tolerance_deg: f32,
    /// Peak-enter threshold in m/s² (NaN: 7.0).
    pub peak_enter_accel: f32,
    /// Peak-exit threshold in m/s² (NaN: 1.0).
    pub peak_exit_accel: f32,
    /// Number of shooting regions (negative: 8).
    pub num_regions: i32,
    /// Heading at which region 1 begins, degrees clockwise (NaN: 0).
    pub reference_heading_deg: f32,
    /// Number of sound variants (negative: 8).
    pub num_sound_variants: i32,
    /// Minimum display refresh interval in ms, 0 for none (negative: 250).
    pub throttle_interval_ms: i64,
}

impl Default for ShootingConfig {
    /// Core sensors present, no compass, every tunable at its default.
    fn default() -> Self {
        Self {
            has_linear_acceleration: 1,
            has_gravity: 1,
            has_magnetic_field: 0,
            face_up_tolerance_deg: f32::NAN,
            peak_enter_accel: f32::NAN,
            peak_exit_accel: f32::NAN,
            num_regions: -1,
            reference_heading_deg: f32::NAN,
            num_sound_variants: -1,
            throttle_interval_ms: -1,
        }
    }
}

/// Output from a single sample processing.
#[repr(C)]
#[derive(Debug, Clone, Default)]
pub struct ShootingSampleOutput {
    /// 1 if this sample fired a gesture.
    pub gesture_fired: i32,
    /// Gestures detected in this session.
    pub gesture_count: u32,
    /// Sound the host should play now, or -1.
    pub sound_index: i32,
    /// 1 if the phone is face up.
    pub is_face_up: i32,
    /// Latest tilt angle in degrees.
    pub angle_deg: f32,
    /// Current shooting region (1-based).
    pub region_index: i32,
    /// Current shooting direction in degrees.
    pub direction_deg: f32,
}

impl ShootingEngine {
    fn fill_output(&self, output: &mut ShootingSampleOutput, fired: bool, sound: Option<usize>) {
        let orientation = self.session.orientation();
        let shooting = self.session.shooting_state();

        output.gesture_fired = fired as i32;
        output.gesture_count = self.session.peak_state().gesture_count;
        output.sound_index = sound.map_or(-1, |i| i as i32);
        output.is_face_up = orientation.is_face_up as i32;
        output.angle_deg = orientation.last_angle_deg;
        output.region_index = shooting.region_index as i32;
        output.direction_deg = shooting.direction_deg;
    }
}

fn session_config(config: &ShootingConfig) -> SessionConfig {
    let mut session_config = SessionConfig::default();
    if !config.face_up_tolerance_deg.is_nan() {
        session_config.orientation.face_up_tolerance_deg = config.face_up_tolerance_deg;
    }
    if !config.peak_enter_accel.is_nan() {
        session_config.gesture.peak_enter_accel = config.peak_enter_accel;
    }
    if !config.peak_exit_accel.is_nan() {
        session_config.gesture.peak_exit_accel = config.peak_exit_accel;
    }
    if let Ok(num_regions) = usize::try_from(config.num_regions) {
        session_config.region.num_regions = num_regions;
    }
    if !config.reference_heading_deg.is_nan() {
        session_config.region.reference_heading_deg = config.reference_heading_deg;
    }
    if let Ok(num_sound_variants) = usize::try_from(config.num_sound_variants) {
        session_config.audio.num_sound_variants = num_sound_variants;
    }
    if let Ok(interval) = u64::try_from(config.throttle_interval_ms) {
        session_config.throttle.min_interval_ms = interval;
    }
    session_config
}

// ============================================================================
// ENGINE LIFECYCLE
// ============================================================================

/// Create a new engine instance.
///
/// # Safety
/// - `config` must be a valid pointer to ShootingConfig.
/// - `status` may be NULL; otherwise it receives the creation status.
/// - The returned pointer must be freed with `shooting_engine_destroy()`.
///
/// # Returns
/// - Pointer to ShootingEngine on success.
/// - NULL on failure (missing sensor, invalid configuration).
#[no_mangle]
pub unsafe extern "C" fn shooting_engine_create(
    config: *const ShootingConfig,
    status: *mut ShootingStatus,
) -> *mut ShootingEngine {
    let report = |s: ShootingStatus| {
        if !status.is_null() {
            *status = s;
        }
    };

    if config.is_null() {
        report(ShootingStatus::NullPointer);
        return ptr::null_mut();
    }
    let config = &*config;

    let capabilities = SensorCapabilities {
        linear_acceleration: config.has_linear_acceleration != 0,
        gravity: config.has_gravity != 0,
        magnetic_field: config.has_magnetic_field != 0,
    };

    match ShootingSession::new(
        session_config(config),
        capabilities,
        PendingSound::default(),
        NullDisplay,
    ) {
        Ok(session) => {
            report(ShootingStatus::Ok);
            Box::into_raw(Box::new(ShootingEngine { session }))
        }
        Err(err) => {
            report(ShootingStatus::from(&err));
            ptr::null_mut()
        }
    }
}

/// Destroy an engine instance.
///
/// # Safety
/// - `engine` must be a valid pointer from `shooting_engine_create()`.
/// - Must not be called more than once for the same pointer.
#[no_mangle]
pub unsafe extern "C" fn shooting_engine_destroy(engine: *mut ShootingEngine) {
    if !engine.is_null() {
        drop(Box::from_raw(engine));
    }
}

/// Start a sensing session, resetting all detection state.
///
/// # Safety
/// - `engine` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn shooting_engine_start(engine: *mut ShootingEngine) -> ShootingStatus {
    if engine.is_null() {
        return ShootingStatus::NullPointer;
    }
    (*engine).session.start();
    ShootingStatus::Ok
}

/// Stop the sensing session. Sounds must be reported loaded again afterwards.
///
/// # Safety
/// - `engine` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn shooting_engine_stop(engine: *mut ShootingEngine) -> ShootingStatus {
    if engine.is_null() {
        return ShootingStatus::NullPointer;
    }
    (*engine).session.stop();
    ShootingStatus::Ok
}

// ============================================================================
// SAMPLE PROCESSING
// ============================================================================

/// Process a single sensor sample.
///
/// # Safety
/// - `engine` must be a valid pointer.
/// - `output` must be a valid pointer to receive results.
///
/// # Parameters
/// - `sensor_kind`: 0 = gravity, 1 = linear acceleration, 2 = magnetic field.
/// - `timestamp_ms`: Sample timestamp in milliseconds.
/// - `x/y/z`: Sensor reading in the device frame.
///
/// On `InvalidSample` the output still reflects the current session state.
#[no_mangle]
pub unsafe extern "C" fn shooting_process_sample(
    engine: *mut ShootingEngine,
    sensor_kind: i32,
    timestamp_ms: u64,
    x: f32,
    y: f32,
    z: f32,
    output: *mut ShootingSampleOutput,
) -> ShootingStatus {
    if engine.is_null() || output.is_null() {
        return ShootingStatus::NullPointer;
    }
    let Some(kind) = SensorKind::from_code(sensor_kind) else {
        return ShootingStatus::InvalidParameter;
    };

    let engine = &mut *engine;
    let output = &mut *output;

    engine.session.sound_player_mut().sink_mut().index = None;
    let sample = Sample::new(timestamp_ms, kind, Vector3::new(x, y, z));
    let result = engine.session.process_sample(&sample);
    let sound = engine.session.sound_player_mut().sink_mut().index.take();

    match result {
        Ok(event) => {
            engine.fill_output(output, event.is_some(), sound);
            ShootingStatus::Ok
        }
        Err(err) => {
            engine.fill_output(output, false, None);
            ShootingStatus::from(&err)
        }
    }
}

/// Push a heading (degrees, clockwise from the reference direction) from a
/// host-side heading source.
///
/// # Safety
/// - `engine` must be a valid pointer.
/// - `output` must be a valid pointer to receive results.
#[no_mangle]
pub unsafe extern "C" fn shooting_update_heading(
    engine: *mut ShootingEngine,
    timestamp_ms: u64,
    heading_deg: f32,
    output: *mut ShootingSampleOutput,
) -> ShootingStatus {
    if engine.is_null() || output.is_null() {
        return ShootingStatus::NullPointer;
    }
    let engine = &mut *engine;
    let status = match engine.session.update_heading(timestamp_ms, heading_deg) {
        Ok(_) => ShootingStatus::Ok,
        Err(err) => ShootingStatus::from(&err),
    };
    engine.fill_output(&mut *output, false, None);
    status
}

/// Report that one sound asset finished loading. `load_status` 0 is success.
///
/// # Safety
/// - `engine` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn shooting_sound_loaded(
    engine: *mut ShootingEngine,
    load_status: i32,
) -> ShootingStatus {
    if engine.is_null() {
        return ShootingStatus::NullPointer;
    }
    match (*engine).session.on_sound_loaded(load_status) {
        Ok(_) => ShootingStatus::Ok,
        Err(err) => ShootingStatus::from(&err),
    }
}

// ============================================================================
// TESTS
// ============================================================================
