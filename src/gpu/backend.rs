use std::fmt;

use glam::Mat4;

use crate::lattice::LatticePoint;

/// Vertex attribute carrying lattice positions.
pub const POSITION_ATTRIBUTE: &str = "aPosition";
/// Uniform receiving the view matrix.
pub const MODEL_VIEW_UNIFORM: &str = "uModelViewMatrix";
/// Uniform receiving the projection matrix.
pub const PROJECTION_UNIFORM: &str = "uProjectionMatrix";

/// Opaque reference to a linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub(crate) usize);

/// Opaque reference to an uploaded vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub(crate) usize);

/// Pipeline stage a shader source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Per-vertex stage.
    Vertex,
    /// Per-fragment stage.
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors reported by a [`GpuBackend`].
#[derive(Debug)]
pub enum GpuError {
    /// Shader source failed to parse or validate.
    ShaderCompile {
        /// Stage whose source was rejected.
        stage: ShaderStage,
        /// Rendered compiler diagnostic.
        message: String,
    },
    /// Stages could not be combined into a usable program.
    ProgramLink(String),
    /// Handle does not name a program created by this backend.
    UnknownProgram(ProgramHandle),
    /// Handle does not name a buffer uploaded to this backend.
    UnknownBuffer(BufferHandle),
    /// The program has no vertex input with this name.
    UnknownAttribute(String),
    /// The program has no `mat4x4<f32>` uniform with this name.
    UnknownUniform(String),
    /// Buffer element size does not match the attribute format.
    AttributeLayout {
        /// Attribute being bound.
        name: String,
        /// Bytes per vertex the attribute expects.
        expected: u64,
        /// Bytes per vertex in the buffer.
        actual: u64,
    },
    /// A vertex input was never bound to a buffer.
    UnboundAttribute(String),
    /// Draw requested before any program was made current.
    NoActiveProgram,
    /// Draw would read past the end of a bound buffer.
    DrawRange {
        /// Vertices requested.
        requested: u32,
        /// Vertices available in the shortest bound buffer.
        available: u32,
    },
    /// The presentation surface could not provide a frame.
    Surface(wgpu::SurfaceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShaderCompile { stage, message } => {
                write!(f, "{stage} shader failed to compile:\n{message}")
            }
            Self::ProgramLink(msg) => write!(f, "program link failed: {msg}"),
            Self::UnknownProgram(handle) => {
                write!(f, "unknown program {handle:?}")
            }
            Self::UnknownBuffer(handle) => {
                write!(f, "unknown vertex buffer {handle:?}")
            }
            Self::UnknownAttribute(name) => {
                write!(f, "program has no vertex attribute `{name}`")
            }
            Self::UnknownUniform(name) => {
                write!(f, "program has no mat4x4<f32> uniform `{name}`")
            }
            Self::AttributeLayout {
                name,
                expected,
                actual,
            } => write!(
                f,
                "attribute `{name}` expects {expected} bytes per vertex, \
                 buffer has {actual}"
            ),
            Self::UnboundAttribute(name) => {
                write!(f, "vertex attribute `{name}` has no buffer bound")
            }
            Self::NoActiveProgram => f.write_str("no program in use"),
            Self::DrawRange {
                requested,
                available,
            } => write!(
                f,
                "draw of {requested} vertices exceeds the {available} \
                 available"
            ),
            Self::Surface(e) => write!(f, "surface error: {e}"),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            _ => None,
        }
    }
}

/// Rasterization backend the viewer draws through.
///
/// Mirrors the small slice of a GL-style API the viewer needs: build a
/// program from two shader sources, upload lattice vertices, wire them to a
/// named attribute, set named matrix uniforms, and clear-and-draw points with
/// whatever is currently bound.
pub trait GpuBackend {
    /// Compile both stages, link them, and make the result current.
    ///
    /// # Errors
    ///
    /// [`GpuError::ShaderCompile`] or [`GpuError::ProgramLink`] when the
    /// sources do not form a usable program.
    fn create_program(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<ProgramHandle, GpuError>;

    /// Make `program` the one used by subsequent draws.
    ///
    /// # Errors
    ///
    /// [`GpuError::UnknownProgram`] for a foreign handle.
    fn use_program(&mut self, program: ProgramHandle) -> Result<(), GpuError>;

    /// Upload lattice points as a static vertex buffer.
    ///
    /// # Errors
    ///
    /// Backend-specific upload failures.
    fn upload_vertex_buffer(
        &mut self,
        points: &[LatticePoint],
    ) -> Result<BufferHandle, GpuError>;

    /// Feed `buffer` to the vertex input called `name`.
    ///
    /// # Errors
    ///
    /// Unknown handles or attribute, or a buffer whose element size does not
    /// match the attribute.
    fn bind_attribute(
        &mut self,
        program: ProgramHandle,
        name: &str,
        buffer: BufferHandle,
    ) -> Result<(), GpuError>;

    /// Write a 4x4 matrix into the uniform called `name`.
    ///
    /// # Errors
    ///
    /// Unknown program or uniform.
    fn set_uniform_matrix4(
        &mut self,
        program: ProgramHandle,
        name: &str,
        matrix: &Mat4,
    ) -> Result<(), GpuError>;

    /// Clear color and depth, then draw `vertex_count` points.
    ///
    /// # Errors
    ///
    /// No current program, unbound attributes, a draw past the end of a
    /// buffer, or a surface that cannot provide a frame.
    fn clear_and_draw_points(&mut self, vertex_count: u32) -> Result<(), GpuError>;
}
