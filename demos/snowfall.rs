//! # Snowfall
//!
//! Headless driver: paces frames, holds a pointer in the middle of the field
//! for a second, and prints the resulting pile as ASCII art.
//!
//! Run with: `RUST_LOG=snowpile=debug cargo run --example snowfall`

use snowpile::prelude::*;
use std::time::{Duration, Instant};
use tracing_subscriber::filter::EnvFilter;

const COLUMNS: usize = 80;
const ROWS: usize = 20;

fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = SnowConfig::default()
        .with_capacity(3_000)
        .with_initial_count(1_500)
        .with_bounds(COLUMNS as f64, 60.0);
    let mut sim = Simulator::new(config)?;
    let mut pacer = FramePacer::from_config(sim.config());
    let mut gesture = SpawnGesture::from_config(sim.config());

    let start = Instant::now();
    let mut now = start;
    let half = sim.bounds().width / 2.0;
    if let Some(req) = gesture.press(half, 0.0) {
        sim.apply(req);
    }

    // Simulated 60Hz display for 10 seconds.
    for _ in 0..600 {
        now += Duration::from_micros(16_667);
        let Some(dt) = pacer.poll_at(now) else {
            continue;
        };
        if now - start > Duration::from_secs(1) && gesture.is_held() {
            gesture.release();
        }
        if let Some(req) = gesture.advance(dt) {
            sim.apply(req);
        }
        sim.tick(dt.as_secs_f64());
    }

    println!(
        "frames: {}  settled: {}  falling: {}  tallest: {:.0}",
        pacer.frame(),
        sim.settled_count(),
        sim.active_count(),
        sim.pile().max_height()
    );
    print_pile(&sim);
    Ok(())
}

fn print_pile(sim: &Simulator) {
    let tallest = sim.pile().max_height().max(1.0);
    let heights: Vec<f64> = (0..COLUMNS as i64).map(|bin| sim.pile_height(bin)).collect();

    for row in (0..ROWS).rev() {
        let level = tallest * row as f64 / ROWS as f64;
        let line: String = heights
            .iter()
            .map(|&h| if h > level { '#' } else { ' ' })
            .collect();
        println!("|{}|", line);
    }
    println!("+{}+", "-".repeat(COLUMNS));
}
