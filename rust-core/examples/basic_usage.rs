/// Basic usage example: feed sensor samples, get gesture events
use shooting_sensing::{
    GestureEvent, NullDisplay, Sample, SensorCapabilities, SessionConfig, ShootingSession,
    SilentAudio,
};

fn main() {
    println!("=== Shooting Sensing: Basic Example ===\n");

    // Default config: 30° face-up tolerance, peak zone 7.0 / 1.0 m/s², 8 regions
    let mut session = ShootingSession::new(
        SessionConfig::default(),
        SensorCapabilities::default(),
        SilentAudio,
        NullDisplay,
    )
    .expect("device has gravity and linear acceleration sensors");
    session.start();

    // Simulated stream: laid flat, two flicks, a turn, then tipped on its edge
    let samples = vec![
        Sample::gravity(0, [0.0, 0.0, 9.81]),
        // First flick
        Sample::linear_acceleration(20, [0.0, 0.0, 0.3]),
        Sample::linear_acceleration(40, [0.0, 0.0, 4.2]),
        Sample::linear_acceleration(60, [0.0, 0.0, 8.1]),
        Sample::linear_acceleration(80, [0.0, 0.0, 9.4]),
        Sample::linear_acceleration(100, [0.0, 0.0, 3.0]),
        Sample::linear_acceleration(120, [0.0, 0.0, 1.2]),
        // Still above peak_exit: no re-arm, so this bump does nothing
        Sample::linear_acceleration(140, [0.0, 0.0, 1.5]),
        Sample::linear_acceleration(160, [0.0, 0.0, 7.5]),
        Sample::linear_acceleration(180, [0.0, 0.0, 0.2]),
        // Second flick
        Sample::linear_acceleration(200, [0.0, 0.0, 7.9]),
        Sample::linear_acceleration(220, [0.0, 0.0, 0.1]),
        // Tipped over: flicks are ignored
        Sample::gravity(240, [9.81, 0.0, 0.0]),
        Sample::linear_acceleration(260, [0.0, 0.0, 12.0]),
    ];

    println!("Processing {} samples...\n", samples.len());

    let mut gestures = 0;
    for sample in &samples {
        match session.process_sample(sample) {
            Ok(Some(event)) => {
                gestures += 1;
                print_event(&event);
            }
            Ok(None) => {}
            Err(err) => println!("Skipped sample at {}ms: {}", sample.timestamp_ms, err),
        }

        if sample.timestamp_ms == 200 {
            // Host-supplied heading: 100° is region 3
            let state = session.update_heading(200, 100.0).expect("finite heading");
            println!("Turned to {:.0}°, region {}", state.direction_deg, state.region_index);
        }
    }

    let orientation = session.orientation();
    println!("\n=== Summary ===");
    println!("Gestures fired: {}", gestures);
    println!("Gesture count: {}", session.peak_state().gesture_count);
    println!(
        "Final tilt: {:.1}° (face up: {})",
        orientation.last_angle_deg, orientation.is_face_up
    );
}

fn print_event(event: &GestureEvent) {
    println!("--- Gesture {} ---", event.gesture_count);
    println!("Peak: {:.1} m/s²", event.peak_accel);
    println!("Region: {}", event.region_index);
    println!("Sound variant: {}", event.sound_index);
}
