use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Locations of the WGSL shader sources read at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShaderOptions {
    /// Vertex stage source file.
    pub vertex: PathBuf,
    /// Fragment stage source file.
    pub fragment: PathBuf,
}

impl Default for ShaderOptions {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("assets/shaders/lattice.vert.wgsl"),
            fragment: PathBuf::from("assets/shaders/lattice.frag.wgsl"),
        }
    }
}
