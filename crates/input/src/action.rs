use glam::Vec3;

/// A high-level action produced from window input.
///
/// The simulation loop consumes actions, never raw input events, so the
/// desktop app and any scripted driver share the same handling.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the gravity vector.
    SetGravity(Vec3),
    /// Pause or resume fixed-rate ticking.
    TogglePause,
    /// Advance exactly one tick (only meaningful while paused).
    Step,
    /// Restore the initial particle layout.
    Reset,
    /// Show or hide the inspector panel.
    ToggleInspector,
    /// Close the application.
    Quit,
    /// No-op (used for input that has no binding).
    Noop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_gravity_carries_vector() {
        let a = Action::SetGravity(Vec3::new(1.0, -2.0, 0.0));
        assert!(matches!(a, Action::SetGravity(v) if v.y == -2.0));
    }
}
