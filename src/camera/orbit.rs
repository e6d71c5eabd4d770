use glam::{Vec2, Vec3};

/// Starting accumulator value: on the +Z axis before scaling.
pub const INITIAL_STATE: Vec3 = Vec3::Z;

/// Orbit camera driven by accumulated pointer deltas.
///
/// The state is a raw accumulator, not a point on a sphere. It drifts
/// additively with every drag step and is only normalized and scaled when the
/// eye position is read, which keeps the effective eye on a sphere of the
/// requested radius around the origin.
///
/// Every drag step also adds `drift` to z regardless of pointer motion, so a
/// long drag slowly pulls the eye toward the +Z pole. `drift` defaults to 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    state: Vec3,
    drift: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl OrbitCamera {
    /// Create a camera at the initial state with the given z drift per step.
    #[must_use]
    pub fn new(drift: f32) -> Self {
        Self {
            state: INITIAL_STATE,
            drift,
        }
    }

    /// Raw accumulator values.
    #[must_use]
    pub fn state(&self) -> Vec3 {
        self.state
    }

    /// Z drift added on every drag step.
    #[must_use]
    pub fn drift(&self) -> f32 {
        self.drift
    }

    /// Accumulate one drag step.
    ///
    /// `delta` is the normalized screen-space offset of the pointer, in
    /// `[-1, 1]` for pointers inside the canvas.
    pub fn apply_drag(&mut self, delta: Vec2) {
        self.state.x += delta.x;
        self.state.y += delta.y;
        self.state.z += self.drift;
    }

    /// Eye position: the normalized state scaled to `radius`.
    ///
    /// A zero or non-finite state has no direction; the eye then falls back
    /// to the initial +Z direction.
    #[must_use]
    pub fn effective_eye_position(&self, radius: f32) -> Vec3 {
        let direction = self.state.try_normalize().unwrap_or_else(|| {
            log::warn!(
                "degenerate orbit state {:?}, falling back to +Z",
                self.state
            );
            INITIAL_STATE
        });
        direction * radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RADIUS: f32 = 200.0;

    #[test]
    fn initial_eye_sits_on_positive_z() {
        let camera = OrbitCamera::default();
        assert_eq!(camera.state(), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(
            camera.effective_eye_position(RADIUS),
            Vec3::new(0.0, 0.0, 200.0)
        );
    }

    #[test]
    fn drag_adds_deltas_and_drift() {
        let mut camera = OrbitCamera::default();
        camera.apply_drag(Vec2::new(0.5, 0.0));
        assert_eq!(camera.state(), Vec3::new(0.5, 0.0, 2.0));

        camera.apply_drag(Vec2::new(-0.25, 0.75));
        assert_eq!(camera.state(), Vec3::new(0.25, 0.75, 3.0));
    }

    #[test]
    fn zero_drift_leaves_z_alone() {
        let mut camera = OrbitCamera::new(0.0);
        camera.apply_drag(Vec2::new(1.0, -1.0));
        assert_eq!(camera.state(), Vec3::new(1.0, -1.0, 1.0));
    }

    #[test]
    fn eye_stays_on_sphere_after_arbitrary_drags() {
        let mut camera = OrbitCamera::default();
        let deltas = [
            Vec2::new(0.9, -0.3),
            Vec2::new(-2.5, 1.7),
            Vec2::new(0.0, 0.0),
            Vec2::new(14.0, -9.0),
            Vec2::new(-0.01, 0.02),
        ];
        for delta in deltas {
            camera.apply_drag(delta);
            let eye = camera.effective_eye_position(RADIUS);
            assert!(
                (eye.length() - RADIUS).abs() < 1e-3,
                "eye {eye} off sphere"
            );
        }
    }

    #[test]
    fn accumulators_drift_without_bound() {
        let mut camera = OrbitCamera::default();
        for _ in 0..1000 {
            camera.apply_drag(Vec2::ZERO);
        }
        assert_eq!(camera.state().z, 1001.0);
        assert!(camera
            .effective_eye_position(RADIUS)
            .abs_diff_eq(Vec3::new(0.0, 0.0, RADIUS), 1e-3));
    }

    #[test]
    fn degenerate_state_falls_back_to_initial_direction() {
        let mut camera = OrbitCamera::new(-1.0);
        camera.apply_drag(Vec2::ZERO);
        assert_eq!(camera.state(), Vec3::ZERO);
        assert_eq!(
            camera.effective_eye_position(RADIUS),
            Vec3::new(0.0, 0.0, RADIUS)
        );
    }

    #[test]
    fn non_finite_state_falls_back_to_initial_direction() {
        let mut camera = OrbitCamera::default();
        camera.apply_drag(Vec2::new(f32::NAN, 0.0));
        assert_eq!(
            camera.effective_eye_position(RADIUS),
            Vec3::new(0.0, 0.0, RADIUS)
        );
    }
}
