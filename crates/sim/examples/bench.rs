//! Quick benchmark for profiling the clustering update loop.
//!
//! Run with: cargo run --release --example bench -p sim
//! Profile with: cargo flamegraph --example bench -p sim

use sim::{scatter, ParticleSystem, Rect, DEFAULT_COLOR};
use std::time::Instant;

fn main() {
    const WIDTH: f32 = 1920.0;
    const HEIGHT: f32 = 1080.0;
    const MAX_RADIUS: f32 = 20.0;
    const FRAMES: usize = 300;

    let bounds = Rect::new(0.0, 0.0, WIDTH, HEIGHT);
    let mut sys = ParticleSystem::new(bounds, MAX_RADIUS).expect("valid configuration");

    for pos in scatter(&bounds, 10.0, 50.0, 7) {
        sys.spawn(pos, 8.0, 0);
    }
    sys.add_cluster(0, DEFAULT_COLOR, None, 1.0);
    println!("Particles: {}", sys.particles().len());

    // Warm up
    for frame in 0..50 {
        sys.update(frame as f32 / 60.0);
    }

    println!("Running {FRAMES} frames...");
    let start = Instant::now();
    for frame in 0..FRAMES {
        sys.update(frame as f32 / 60.0);
    }
    let elapsed = start.elapsed();

    let avg_frame_time = elapsed.as_secs_f64() / FRAMES as f64;
    println!("\n=== Results ===");
    println!("Total time: {:.2?}", elapsed);
    println!("Avg frame time: {:.2}ms", avg_frame_time * 1000.0);
    println!("Effective FPS: {:.1}", 1.0 / avg_frame_time);
}
