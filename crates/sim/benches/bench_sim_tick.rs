use std::hint::black_box;
use std::time::Instant;

use glam::Vec3;
use pixelsand_sim::{SimConfig, Simulation};

fn make_sim(size: u32, rows: u32) -> Simulation {
    let mut sim = Simulation::new(SimConfig {
        width: size,
        height: size,
        initial_rows: rows,
        ..SimConfig::default()
    })
    .expect("valid bench config");
    sim.set_gravity(Vec3::new(12.0, -24.0, 48.0));
    sim
}

fn bench_tick(size: u32, rows: u32, iterations: usize) {
    let mut sim = make_sim(size, rows);
    let particles = sim.particles().len();

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(&mut sim).tick();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  tick ({size}x{size}, {particles} particles, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_state_hash(size: u32, rows: u32, iterations: usize) {
    let sim = make_sim(size, rows);

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(black_box(&sim).state_hash());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  state_hash ({size}x{size}, {iterations} iters): {per_iter:?}/iter");
}

fn main() {
    println!("pixelsand-sim benchmarks");
    bench_tick(32, 2, 10_000);
    bench_tick(64, 16, 2_000);
    bench_tick(256, 64, 200);
    bench_state_hash(256, 64, 1_000);
}
