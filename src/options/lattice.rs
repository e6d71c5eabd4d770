use serde::{Deserialize, Serialize};

/// Extent and spacing of the sample lattice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LatticeOptions {
    /// Half the edge length of the lattice cube.
    pub half_extent: f32,
    /// Spacing between neighbouring samples.
    pub step: f32,
}

impl Default for LatticeOptions {
    fn default() -> Self {
        Self {
            half_extent: 50.0,
            step: 2.0,
        }
    }
}
