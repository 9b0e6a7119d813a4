//! Developer Tooling: simulation inspector and summaries.
//!
//! # Invariants
//! - Tools only read simulation state.

pub mod inspector;

pub use inspector::{ParticleInfo, SimInspector, SimSummary};

pub fn crate_info() -> &'static str {
    "pixelsand-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
