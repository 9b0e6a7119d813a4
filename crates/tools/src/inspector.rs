use pixelsand_common::CellCoord;
use pixelsand_sim::Simulation;
use serde::Serialize;

/// Simulation inspector for developer tooling.
///
/// Provides read-only queries against the simulation for debugging,
/// the desktop side panel and CLI output.
pub struct SimInspector;

impl SimInspector {
    /// Produce a summary of the simulation state.
    pub fn summary(sim: &Simulation) -> SimSummary {
        let g = sim.gravity();
        SimSummary {
            tick: sim.tick_count(),
            width: sim.width(),
            height: sim.height(),
            particle_count: sim.particles().len(),
            occupied_cells: sim.grid().count(),
            gravity: [g.x, g.y, g.z],
            state_hash: sim.state_hash(),
        }
    }

    /// Details of the particle at `index` in insertion order.
    pub fn inspect_particle(sim: &Simulation, index: usize) -> Option<ParticleInfo> {
        sim.particles().get(index).map(|p| ParticleInfo {
            index,
            cell: p.cell(),
            position: [p.x, p.y],
            velocity: [p.vx, p.vy],
        })
    }

    /// Number of occupied cells in each row, bottom row first.
    pub fn row_fill(sim: &Simulation) -> Vec<u32> {
        let mut rows = vec![0; sim.height() as usize];
        for cell in sim.grid().iter_set() {
            rows[cell.y as usize] += 1;
        }
        rows
    }
}

/// Summary of simulation state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct SimSummary {
    pub tick: u64,
    pub width: u32,
    pub height: u32,
    pub particle_count: usize,
    pub occupied_cells: usize,
    pub gravity: [f32; 3],
    pub state_hash: u64,
}

impl SimSummary {
    /// Bitmap and particle list agree.
    pub fn is_consistent(&self) -> bool {
        self.particle_count == self.occupied_cells
    }
}

impl std::fmt::Display for SimSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Simulation: tick={} grid={}x{} particles={} occupied={} gravity=({:.1}, {:.1}, {:.1}) hash={:#018x}",
            self.tick,
            self.width,
            self.height,
            self.particle_count,
            self.occupied_cells,
            self.gravity[0],
            self.gravity[1],
            self.gravity[2],
            self.state_hash
        )
    }
}

/// Detailed info about a single particle.
#[derive(Debug, Clone, Serialize)]
pub struct ParticleInfo {
    pub index: usize,
    pub cell: CellCoord,
    pub position: [i32; 2],
    pub velocity: [i32; 2],
}

impl std::fmt::Display for ParticleInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Particle #{} cell=({}, {}) pos=({}, {}) vel=({}, {})",
            self.index,
            self.cell.x,
            self.cell.y,
            self.position[0],
            self.position[1],
            self.velocity[0],
            self.velocity[1],
        )
    }
}
