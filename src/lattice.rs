//! Static cubic lattice of sample points.
//!
//! The lattice is generated once at startup and uploaded as a tightly packed
//! `Float32x3` vertex buffer. It is never mutated afterwards.

/// A single lattice sample, laid out for direct upload as a vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LatticePoint {
    /// World-space position.
    pub position: [f32; 3],
}

impl LatticePoint {
    /// Create a point from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
        }
    }
}

/// Coordinate of the `i`-th sample along an axis.
fn axis_coord(half_extent: f32, step: f32, i: usize) -> f32 {
    (-f64::from(half_extent) + i as f64 * f64::from(step)) as f32
}

/// Number of samples along one axis for the given extent and step.
///
/// This is `ceil(2 * half_extent / step)`, trimmed when rounding in the `f32`
/// inputs would push the last sample onto `half_extent` itself. Returns zero
/// for non-finite or non-positive parameters.
#[must_use]
pub fn samples_per_axis(half_extent: f32, step: f32) -> usize {
    if !half_extent.is_finite()
        || !step.is_finite()
        || half_extent <= 0.0
        || step <= 0.0
    {
        return 0;
    }
    let mut n =
        (2.0 * f64::from(half_extent) / f64::from(step)).ceil() as usize;
    while n > 0 && axis_coord(half_extent, step, n - 1) >= half_extent {
        n -= 1;
    }
    n
}

/// Total number of points `generate` yields, or `None` when the cube of
/// [`samples_per_axis`] does not fit in `usize`.
#[must_use]
pub fn point_count(half_extent: f32, step: f32) -> Option<usize> {
    let n = samples_per_axis(half_extent, step);
    n.checked_mul(n).and_then(|square| square.checked_mul(n))
}

/// Generate every point with coordinates in `[-half_extent, half_extent)`
/// spaced by `step`, ordered x-outer, y-middle, z-inner.
///
/// Coordinates are computed as `-half_extent + i * step` so long rows do not
/// accumulate rounding error. A lattice too large to count yields no points;
/// [`Options::validate`](crate::options::Options::validate) rejects such
/// parameters before startup.
#[must_use]
pub fn generate(half_extent: f32, step: f32) -> Vec<LatticePoint> {
    let Some(total) = point_count(half_extent, step) else {
        log::warn!(
            "lattice with half extent {half_extent} and step {step} is too large, generating nothing"
        );
        return Vec::new();
    };
    let n = samples_per_axis(half_extent, step);
    let coord = |i: usize| axis_coord(half_extent, step, i);

    let mut points = Vec::with_capacity(total);
    for ix in 0..n {
        let x = coord(ix);
        for iy in 0..n {
            let y = coord(iy);
            for iz in 0..n {
                points.push(LatticePoint::new(x, y, coord(iz)));
            }
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_lattice_shape(half_extent: f32, step: f32) {
        let points = generate(half_extent, step);
        let per_axis = (2.0 * f64::from(half_extent) / f64::from(step)).ceil()
            as usize;
        assert_eq!(
            points.len(),
            per_axis.pow(3),
            "half_extent={half_extent} step={step}"
        );
        assert_lattice_range(half_extent, step);
    }

    fn assert_lattice_range(half_extent: f32, step: f32) {
        let points = generate(half_extent, step);
        assert!(!points.is_empty());
        for p in &points {
            for c in p.position {
                assert!(
                    c >= -half_extent && c < half_extent,
                    "coordinate {c} out of range for half_extent={half_extent}"
                );
            }
        }
    }

    #[test]
    fn default_lattice_has_fifty_samples_per_axis() {
        let points = generate(50.0, 2.0);
        assert_eq!(points.len(), 125_000);
        assert_eq!(points[0], LatticePoint::new(-50.0, -50.0, -50.0));
        assert_eq!(
            points[points.len() - 1],
            LatticePoint::new(48.0, 48.0, 48.0)
        );
    }

    #[test]
    fn count_and_range_hold_for_uneven_steps() {
        assert_lattice_shape(1.0, 0.3);
        assert_lattice_shape(2.5, 1.0);
        assert_lattice_shape(3.0, 3.0);
        assert_lattice_shape(10.0, 0.75);
    }

    #[test]
    fn ordering_is_x_outer_z_inner() {
        let points = generate(1.0, 1.0);
        let expected = [
            [-1.0, -1.0, -1.0],
            [-1.0, -1.0, 0.0],
            [-1.0, 0.0, -1.0],
            [-1.0, 0.0, 0.0],
            [0.0, -1.0, -1.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, -1.0],
            [0.0, 0.0, 0.0],
        ];
        let actual: Vec<[f32; 3]> =
            points.iter().map(|p| p.position).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn last_sample_never_reaches_half_extent() {
        // 0.6 / 0.1 lands just above 6 once both are widened from f32.
        let n = samples_per_axis(0.3, 0.1);
        assert!(n == 6 || n == 7, "unexpected sample count {n}");
        assert_lattice_range(0.3, 0.1);
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(generate(4.0, 0.5), generate(4.0, 0.5));
    }

    #[test]
    fn degenerate_parameters_yield_empty_lattice() {
        assert!(generate(0.0, 1.0).is_empty());
        assert!(generate(5.0, 0.0).is_empty());
        assert!(generate(5.0, -1.0).is_empty());
        assert!(generate(f32::NAN, 1.0).is_empty());
        assert!(generate(5.0, f32::INFINITY).is_empty());
    }

    #[test]
    fn points_cast_to_flat_float_buffer() {
        let points = [LatticePoint::new(1.0, 2.0, 3.0), LatticePoint::new(4.0, 5.0, 6.0)];
        let flat: &[f32] = bytemuck::cast_slice(&points);
        assert_eq!(flat, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn point_count_matches_generated_length() {
        assert_eq!(point_count(50.0, 2.0), Some(125_000));
        assert_eq!(point_count(0.0, 1.0), Some(0));
        assert_eq!(point_count(1.0, 0.3), Some(generate(1.0, 0.3).len()));
    }

    #[test]
    fn oversized_lattice_is_uncountable_and_empty() {
        assert_eq!(point_count(1e6, 1e-3), None);
        assert!(generate(1e6, 1e-3).is_empty());
    }
}
