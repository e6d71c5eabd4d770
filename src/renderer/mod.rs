//! Per-frame drawing of the uploaded lattice.

use crate::gpu::{GpuBackend, GpuError};

/// Issues one clear-and-draw per frame for a fixed number of points.
///
/// Matrices are uploaded by the engine before each call; the renderer only
/// owns the draw range and a frame counter.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    point_count: u32,
    frames: u64,
}

impl FrameRenderer {
    /// Renderer drawing `point_count` vertices from the bound buffer.
    #[must_use]
    pub fn new(point_count: u32) -> Self {
        Self {
            point_count,
            frames: 0,
        }
    }

    /// Number of points drawn per frame.
    #[must_use]
    pub fn point_count(&self) -> u32 {
        self.point_count
    }

    /// Frames drawn so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Clear color and depth, then draw every lattice point.
    ///
    /// # Errors
    ///
    /// Propagates the backend's [`GpuError`]; the frame counter is only
    /// advanced on success.
    pub fn render_frame<B: GpuBackend>(
        &mut self,
        backend: &mut B,
    ) -> Result<(), GpuError> {
        backend.clear_and_draw_points(self.point_count)?;
        self.frames += 1;
        log::trace!("frame {} ({} points)", self.frames, self.point_count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::recording::RecordingBackend;
    use crate::gpu::POSITION_ATTRIBUTE;
    use crate::shaders::ShaderSources;

    #[test]
    fn draw_without_program_fails_and_does_not_count() {
        let mut backend = RecordingBackend::new();
        let mut renderer = FrameRenderer::new(8);
        assert!(matches!(
            renderer.render_frame(&mut backend),
            Err(GpuError::NoActiveProgram)
        ));
        assert_eq!(renderer.frames(), 0);
        assert!(backend.draws.is_empty());
    }

    #[test]
    fn empty_draw_still_clears() {
        let sources = ShaderSources::builtin();
        let mut backend = RecordingBackend::new();
        let program = backend
            .create_program(&sources.vertex, &sources.fragment)
            .unwrap();
        let buffer = backend.upload_vertex_buffer(&[]).unwrap();
        backend
            .bind_attribute(program, POSITION_ATTRIBUTE, buffer)
            .unwrap();

        let mut renderer = FrameRenderer::new(0);
        renderer.render_frame(&mut backend).unwrap();
        assert_eq!(renderer.frames(), 1);
        assert_eq!(backend.draws, vec![0]);
    }
}
