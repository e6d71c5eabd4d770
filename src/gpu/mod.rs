//! GPU backend abstraction and its wgpu implementation.
//!
//! The viewer only talks to [`GpuBackend`]: compile a program from two WGSL
//! sources, upload the lattice, bind it to the position attribute, set the
//! view and projection matrices, and clear-and-draw points. WGSL is compiled
//! and reflected with naga in [`program`] so both backends report compile and
//! link failures the same way.

/// Backend trait, handles, shader interface names and errors.
pub mod backend;
/// WGSL compilation, link checks and interface reflection.
pub mod program;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Depth attachment and depth test state.
pub mod texture;
/// wgpu implementation of [`GpuBackend`].
pub mod wgpu_backend;

#[cfg(test)]
pub(crate) mod recording;

pub use backend::{
    BufferHandle, GpuBackend, GpuError, ProgramHandle, ShaderStage,
    MODEL_VIEW_UNIFORM, POSITION_ATTRIBUTE, PROJECTION_UNIFORM,
};
pub use program::ProgramLayout;
pub use render_context::RenderContext;
pub use wgpu_backend::WgpuBackend;
