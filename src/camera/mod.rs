//! Camera system for orbiting the lattice.
//!
//! Provides the orbit accumulator model and the view/projection matrix
//! builders fed to the GPU as uniforms.

/// Camera struct and view/projection matrix construction.
pub mod core;
/// Drag-accumulating orbit model that yields the eye position.
pub mod orbit;

pub use self::core::{build_projection, build_view, Camera};
pub use self::orbit::OrbitCamera;
