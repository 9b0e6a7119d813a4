//! Falling-sand simulation: occupancy bitmap, integer particle physics.
//!
//! # Invariants
//! - At most one particle per cell; the bitmap mirrors particle positions
//!   after every tick.
//! - Velocities stay within one cell per tick on each axis, whatever the
//!   gravity.
//! - A tick is deterministic for a given seed, gravity and starting state.

pub mod config;
pub mod grid;
pub mod rng;
pub mod simulation;

pub use config::{ConfigError, SimConfig};
pub use grid::OccupancyGrid;
pub use simulation::{Particle, SimError, Simulation};
