//! Shooting Gesture Replay
//!
//! Drives a scripted session through the sensing core and logs what a host
//! would see: face-up changes, fired gestures, sounds and display refreshes.
//!
//! Usage: `shooting-replay [config.json]`. Log verbosity follows `RUST_LOG`.

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use shooting_sensing::{
    AudioSink, DisplaySink, GestureSnapshot, OrientationSnapshot, Sample, SensorCapabilities,
    SessionConfig, ShootingSession, ShootingSnapshot,
};

/// Audio sink that logs each gunshot instead of playing it.
struct LoggedAudio;

impl AudioSink for LoggedAudio {
    fn play_sound(&mut self, index: usize) {
        info!(sound = index, "bang");
    }
}

/// Display that logs each refresh.
struct LoggedDisplay;

impl DisplaySink for LoggedDisplay {
    fn show_orientation(&mut self, s: &OrientationSnapshot) {
        info!(t = s.timestamp_ms, angle = s.angle_deg, face_up = s.is_face_up, "orientation");
    }

    fn show_gestures(&mut self, s: &GestureSnapshot) {
        info!(t = s.timestamp_ms, z = s.acceleration.z, count = s.gesture_count, "gestures");
    }

    fn show_shooting(&mut self, s: &ShootingSnapshot) {
        info!(t = s.timestamp_ms, direction = s.direction_deg, region = s.region_index, "shooting");
    }
}

fn load_config() -> Result<SessionConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            Ok(SessionConfig::from_json(&json)?)
        }
        None => Ok(SessionConfig::default()),
    }
}

/// Scripted 50 Hz stream: pick the phone up, lay it flat, then flick it
/// while turning through the compass.
fn script() -> Vec<Sample> {
    let mut samples = Vec::new();
    let mut t = 0u64;

    // Held upright, then laid down face up.
    for g in [[0.0, 9.81, 0.0], [0.0, 6.9, 6.9], [0.0, 1.0, 9.76], [0.0, 0.0, 9.81]] {
        samples.push(Sample::gravity(t, g));
        t += 20;
    }

    // One flick per heading, north-east-south-west.
    for heading in [0.0_f32, 90.0, 180.0, 270.0] {
        let h = heading.to_radians() + 0.1;
        samples.push(Sample::magnetic_field(t, [-h.sin() * 20.0, h.cos() * 20.0, -40.0]));
        t += 20;
        for z in [0.2, 3.5, 8.4, 9.0, 5.0, 0.6, 0.1] {
            samples.push(Sample::linear_acceleration(t, [0.0, 0.0, z]));
            t += 20;
        }
        samples.push(Sample::gravity(t, [0.1, -0.1, 9.81]));
        t += 300;
    }

    // Tipped on its edge: flicks no longer count.
    samples.push(Sample::gravity(t, [9.81, 0.0, 0.0]));
    t += 20;
    for z in [8.0, 0.0] {
        samples.push(Sample::linear_acceleration(t, [0.0, 0.0, z]));
        t += 20;
    }
    samples
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    let mut session = match ShootingSession::new(
        config,
        SensorCapabilities::all(),
        LoggedAudio,
        LoggedDisplay,
    ) {
        Ok(session) => session,
        Err(err) => {
            error!(%err, "cannot start replay");
            return ExitCode::FAILURE;
        }
    };

    info!(config = ?session.config(), "replay configured");
    let variants = session.config().audio.num_sound_variants;
    session.start();
    for _ in 0..variants {
        if let Err(err) = session.on_sound_loaded(0) {
            error!(%err, "sound bank failed to load");
        }
    }

    let mut fired = 0u32;
    for sample in script() {
        // Per-sample errors are already logged by the session.
        if let Ok(Some(event)) = session.process_sample(&sample) {
            fired += 1;
            info!(
                count = event.gesture_count,
                region = event.region_index,
                sound = event.sound_index,
                peak = event.peak_accel,
                "gesture"
            );
        }
    }
    session.stop();

    info!(
        gestures = fired,
        samples = session.samples_processed(),
        "replay finished"
    );
    ExitCode::SUCCESS
}
