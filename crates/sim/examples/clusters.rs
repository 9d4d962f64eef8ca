//! Headless clustering demo: scatter a population, split it into three
//! clusters, then merge everything back together.
//!
//! Run with: RUST_LOG=debug cargo run --release --example clusters -p sim

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sim::{scatter, ParticleSystem, Rect, SplitItem, DEFAULT_COLOR};
use std::time::Instant;

fn main() {
    env_logger::init();

    const WIDTH: f32 = 1920.0;
    const HEIGHT: f32 = 1080.0;
    const MAX_RADIUS: f32 = 20.0;
    const FRAMES: usize = 600;

    let bounds = Rect::new(0.0, 0.0, WIDTH, HEIGHT);
    let mut sys = ParticleSystem::new(bounds, MAX_RADIUS).expect("valid configuration");

    // Mixed starting population: some unassigned drifters, some in the
    // primary cluster.
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for pos in scatter(&bounds, 12.0, 100.0, 42) {
        sys.spawn(pos, MAX_RADIUS, rng.gen_range(-1..2));
    }
    sys.add_cluster(0, DEFAULT_COLOR, None, 1.0);
    sys.add_cluster(1, [0, 0, 255, 255], None, 1.0);
    println!("Scattered {} particles", sys.particles().len());

    let start = Instant::now();
    for frame in 0..FRAMES {
        let elapsed = start.elapsed().as_secs_f32();

        if frame == 120 {
            println!("Frame {frame}: splitting into three more clusters");
            sys.split(&[
                SplitItem {
                    weight: 1.0,
                    color: [255, 80, 80, 255],
                    target: Some(Vec2::new(WIDTH * 0.25, HEIGHT * 0.5)),
                },
                SplitItem {
                    weight: 1.0,
                    color: [80, 255, 80, 255],
                    target: Some(Vec2::new(WIDTH * 0.75, HEIGHT * 0.5)),
                },
            ]);
        }
        if frame == 420 {
            println!("Frame {frame}: joining everything into cluster 0");
            sys.join(0);
        }

        sys.update(elapsed);

        if frame % 60 == 0 {
            let mut tags: Vec<i32> = sys.particles().iter().map(|p| p.cluster).collect();
            tags.sort_unstable();
            tags.dedup();
            println!(
                "Frame {frame}: {} clusters registered, tags {:?}, split={}, busy={}",
                sys.clusters().len(),
                tags,
                sys.is_split(),
                sys.is_busy(),
            );
        }
    }

    println!(
        "Done after {:.2?}: {} particles, split={}",
        start.elapsed(),
        sys.particles().len(),
        sys.is_split()
    );
}
