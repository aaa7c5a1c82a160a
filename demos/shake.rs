//! # Shake
//!
//! Feeds a recorded accelerometer trace into the simulator. Only the spike
//! above the threshold resets the piles.
//!
//! Run with: `RUST_LOG=snowpile=debug cargo run --example shake`

use snowpile::prelude::*;
use tracing_subscriber::filter::EnvFilter;

fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = SnowConfig::default()
        .with_capacity(2_000)
        .with_bounds(400.0, 300.0)
        .with_seed(11);
    let mut sim = Simulator::new(config)?;

    let trace = [
        MotionSample::new(0.1, -9.7, 0.3),
        MotionSample::new(2.5, -8.9, 1.0),
        MotionSample { x: None, y: Some(-12.0), z: None },
        MotionSample::new(18.4, -3.0, 6.2),
        MotionSample::new(0.0, -9.8, 0.0),
    ];

    for (i, sample) in trace.iter().enumerate() {
        for _ in 0..300 {
            sim.tick(1.0 / 60.0);
        }
        let layers = sim.pile().total_layers();
        let shaken = sim.on_motion(*sample);
        println!(
            "sample {}: accel {:?} -> shake: {:5}  layers before: {:5}  after: {:5}",
            i,
            sample.acceleration(),
            shaken,
            layers,
            sim.pile().total_layers()
        );
    }

    println!("shakes: {}", sim.shakes());
    Ok(())
}
