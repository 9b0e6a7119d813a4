//! Input mapping: raw window events become simulation actions.
//!
//! # Invariants
//! - The simulation consumes actions, never raw input events.
//! - Gravity mapping is a pure function of cursor position and window size.

pub mod action;
pub mod gravity;

pub use action::Action;
pub use gravity::GravityMapper;

pub fn crate_info() -> &'static str {
    "pixelsand-input v0.1.0"
}
