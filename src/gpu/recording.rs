//! Headless backend that records what it is asked to do.

use std::collections::HashMap;

use glam::Mat4;

use super::{
    backend::{BufferHandle, GpuBackend, GpuError, ProgramHandle},
    program::{AttributeBindings, ProgramLayout, VertexBufferInfo},
};
use crate::lattice::LatticePoint;

struct RecordedProgram {
    layout: ProgramLayout,
    bindings: AttributeBindings,
    uniforms: HashMap<String, Mat4>,
}

/// [`GpuBackend`] that compiles and links with naga like the wgpu backend,
/// but keeps uploads in memory and logs draws instead of rasterizing.
#[derive(Default)]
pub(crate) struct RecordingBackend {
    programs: Vec<RecordedProgram>,
    buffers: Vec<Vec<LatticePoint>>,
    active: Option<ProgramHandle>,
    /// Vertex count of every draw issued, in order.
    pub(crate) draws: Vec<u32>,
    /// Number of uniform writes accepted.
    pub(crate) uniform_writes: usize,
}

impl RecordingBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Last value written to `name` on `program`.
    pub(crate) fn uniform(&self, program: ProgramHandle, name: &str) -> Option<Mat4> {
        self.programs
            .get(program.0)
            .and_then(|p| p.uniforms.get(name).copied())
    }

    /// Contents of an uploaded buffer.
    pub(crate) fn buffer(&self, buffer: BufferHandle) -> Option<&[LatticePoint]> {
        self.buffers.get(buffer.0).map(Vec::as_slice)
    }

    fn program_mut(
        &mut self,
        handle: ProgramHandle,
    ) -> Result<&mut RecordedProgram, GpuError> {
        self.programs
            .get_mut(handle.0)
            .ok_or(GpuError::UnknownProgram(handle))
    }
}

impl GpuBackend for RecordingBackend {
    fn create_program(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<ProgramHandle, GpuError> {
        let layout = ProgramLayout::link(vertex_src, fragment_src)?;
        let handle = ProgramHandle(self.programs.len());
        self.programs.push(RecordedProgram {
            bindings: AttributeBindings::new(&layout),
            layout,
            uniforms: HashMap::new(),
        });
        self.active = Some(handle);
        Ok(handle)
    }

    fn use_program(&mut self, program: ProgramHandle) -> Result<(), GpuError> {
        let _ = self.program_mut(program)?;
        self.active = Some(program);
        Ok(())
    }

    fn upload_vertex_buffer(
        &mut self,
        points: &[LatticePoint],
    ) -> Result<BufferHandle, GpuError> {
        let handle = BufferHandle(self.buffers.len());
        self.buffers.push(points.to_vec());
        Ok(handle)
    }

    fn bind_attribute(
        &mut self,
        program: ProgramHandle,
        name: &str,
        buffer: BufferHandle,
    ) -> Result<(), GpuError> {
        let points = self
            .buffers
            .get(buffer.0)
            .ok_or(GpuError::UnknownBuffer(buffer))?;
        let info = VertexBufferInfo {
            handle: buffer,
            stride: size_of::<LatticePoint>() as u64,
            vertex_count: u32::try_from(points.len()).unwrap_or(u32::MAX),
        };
        let program = self.program_mut(program)?;
        program.bindings.bind(&program.layout, name, info)
    }

    fn set_uniform_matrix4(
        &mut self,
        program: ProgramHandle,
        name: &str,
        matrix: &Mat4,
    ) -> Result<(), GpuError> {
        let program = self.program_mut(program)?;
        if program.layout.uniform_matrix(name).is_none() {
            return Err(GpuError::UnknownUniform(name.to_owned()));
        }
        let _ = program.uniforms.insert(name.to_owned(), *matrix);
        self.uniform_writes += 1;
        Ok(())
    }

    fn clear_and_draw_points(&mut self, vertex_count: u32) -> Result<(), GpuError> {
        let handle = self.active.ok_or(GpuError::NoActiveProgram)?;
        let program = self.program_mut(handle)?;
        program.bindings.check_draw(&program.layout, vertex_count)?;
        self.draws.push(vertex_count);
        Ok(())
    }
}
