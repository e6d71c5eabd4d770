use glam::{Mat4, Vec3};

use crate::options::CameraOptions;

/// Build a right-handed perspective projection.
///
/// Uses the `[0, 1]` depth range expected by wgpu.
#[must_use]
pub fn build_projection(
    fovy_radians: f32,
    aspect: f32,
    znear: f32,
    zfar: f32,
) -> Mat4 {
    Mat4::perspective_rh(fovy_radians, aspect, znear, zfar)
}

/// Build a right-handed look-at view matrix.
///
/// When the view direction is parallel to `up` the cross product vanishes, so
/// an axis perpendicular to `up` is used in its place.
#[must_use]
pub fn build_view(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let forward = (target - eye).normalize_or_zero();
    let up = up.normalize_or_zero();
    if forward.cross(up).length_squared() < PARALLEL_EPSILON {
        let fallback = if up.z.abs() < 0.9 { Vec3::Z } else { Vec3::X };
        log::warn!("view direction {forward} is parallel to up {up}, using {fallback}");
        return Mat4::look_at_rh(eye, target, fallback);
    }
    Mat4::look_at_rh(eye, target, up)
}

/// Squared sine of the angle below which two unit vectors count as parallel.
const PARALLEL_EPSILON: f32 = 1e-10;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Camera {
    /// Camera looking at the origin with +Y up, eye at `eye`.
    #[must_use]
    pub fn looking_at_origin(
        eye: Vec3,
        aspect: f32,
        options: &CameraOptions,
    ) -> Self {
        Self {
            eye,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        }
    }

    /// View matrix for the current eye, target and up vector.
    #[must_use]
    pub fn build_view(&self) -> Mat4 {
        build_view(self.eye, self.target, self.up)
    }

    /// Projection matrix for the fixed field of view and aspect ratio.
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        build_projection(self.fovy.to_radians(), self.aspect, self.znear, self.zfar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    #[test]
    fn view_inverse_maps_origin_back_to_eye() {
        let eye = Vec3::new(0.0, 0.0, 200.0);
        let view = build_view(eye, Vec3::ZERO, Vec3::Y);
        let recovered = view.inverse().transform_point3(Vec3::ZERO);
        assert!(
            recovered.abs_diff_eq(eye, EPS),
            "expected {eye}, got {recovered}"
        );
    }

    #[test]
    fn view_on_z_axis_is_a_pure_translation() {
        let view = build_view(Vec3::new(0.0, 0.0, 200.0), Vec3::ZERO, Vec3::Y);
        let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, -200.0));
        assert!(view.abs_diff_eq(expected, EPS));
    }

    #[test]
    fn view_places_target_on_negative_z() {
        let eye = Vec3::new(120.0, -40.0, 80.0);
        let view = build_view(eye, Vec3::ZERO, Vec3::Y);
        let target_in_view = view.transform_point3(Vec3::ZERO);
        assert!(target_in_view.x.abs() < EPS);
        assert!(target_in_view.y.abs() < EPS);
        assert!((target_in_view.z + eye.length()).abs() < EPS);
    }

    #[test]
    fn view_along_up_axis_stays_finite() {
        let eye = Vec3::new(0.0, 200.0, 0.0);
        let view = build_view(eye, Vec3::ZERO, Vec3::Y);
        assert!(view.is_finite(), "{view}");
        let target_in_view = view.transform_point3(Vec3::ZERO);
        assert!(target_in_view.abs_diff_eq(Vec3::new(0.0, 0.0, -200.0), EPS));
        assert!(view.transform_point3(eye).abs_diff_eq(Vec3::ZERO, EPS));

        let below = build_view(-eye, Vec3::ZERO, Vec3::Y);
        assert!(below.is_finite());
    }

    #[test]
    fn projection_maps_near_and_far_to_unit_depth_range() {
        let proj = build_projection(45f32.to_radians(), 1.5, 0.1, 1000.0);
        let near = proj.project_point3(Vec3::new(0.0, 0.0, -0.1));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -1000.0));
        assert!(near.z.abs() < EPS);
        assert!((far.z - 1.0).abs() < EPS);
    }

    #[test]
    fn camera_matrices_match_free_builders() {
        let options = CameraOptions::default();
        let eye = Vec3::new(0.0, 0.0, options.orbit_radius);
        let camera = Camera::looking_at_origin(eye, 4.0 / 3.0, &options);
        assert_eq!(camera.build_view(), build_view(eye, Vec3::ZERO, Vec3::Y));
        assert_eq!(
            camera.build_projection(),
            build_projection(
                options.fovy.to_radians(),
                4.0 / 3.0,
                options.znear,
                options.zfar
            )
        );
    }
}
