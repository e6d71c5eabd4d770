//! The engine that ties the lattice, orbit camera and GPU backend together.
//!
//! [`MandelbulbEngine`] is generic over [`GpuBackend`] so the same startup
//! sequence and drag handling run against wgpu in the viewer and against a
//! recording backend in tests.

/// Commands the engine executes.
pub mod command;
mod input;

use glam::Mat4;

use crate::camera::{Camera, OrbitCamera};
use crate::error::MandelbulbError;
use crate::gpu::{
    BufferHandle, GpuBackend, ProgramHandle, MODEL_VIEW_UNIFORM,
    POSITION_ATTRIBUTE, PROJECTION_UNIFORM,
};
use crate::input::{CanvasRect, InputProcessor};
use crate::lattice;
use crate::options::Options;
use crate::renderer::FrameRenderer;
use crate::shaders::ShaderSources;

/// Owns the orbit state, drag session and GPU resources of one viewer
/// session.
pub struct MandelbulbEngine<B: GpuBackend> {
    backend: B,
    program: ProgramHandle,
    lattice_buffer: BufferHandle,
    orbit: OrbitCamera,
    camera: Camera,
    orbit_radius: f32,
    view: Mat4,
    input: InputProcessor,
    renderer: FrameRenderer,
}

impl<B: GpuBackend> MandelbulbEngine<B> {
    /// Run the startup sequence and draw the initial frame.
    ///
    /// In order: validate `options`, compile and link the program from
    /// `shaders`, generate and upload the lattice, bind it to
    /// [`POSITION_ATTRIBUTE`], upload the projection and the initial view,
    /// then render once.
    ///
    /// # Errors
    ///
    /// [`MandelbulbError::InvalidOption`] for unusable options, and
    /// [`MandelbulbError::Gpu`] when the backend rejects a step. Compile and
    /// link failures stop startup before anything is uploaded or drawn.
    pub fn new(
        mut backend: B,
        shaders: &ShaderSources,
        options: &Options,
        canvas: CanvasRect,
    ) -> Result<Self, MandelbulbError> {
        options.validate()?;

        let program = backend.create_program(&shaders.vertex, &shaders.fragment)?;
        backend.use_program(program)?;

        let points =
            lattice::generate(options.lattice.half_extent, options.lattice.step);
        log::info!(
            "generated {} lattice points (half extent {}, step {})",
            points.len(),
            options.lattice.half_extent,
            options.lattice.step
        );
        let point_count = u32::try_from(points.len()).map_err(|_| {
            MandelbulbError::InvalidOption(format!(
                "lattice of {} points does not fit a single draw",
                points.len()
            ))
        })?;
        let lattice_buffer = backend.upload_vertex_buffer(&points)?;
        backend.bind_attribute(program, POSITION_ATTRIBUTE, lattice_buffer)?;

        let orbit = OrbitCamera::new(options.camera.drift);
        let orbit_radius = options.camera.orbit_radius;
        let camera = Camera::looking_at_origin(
            orbit.effective_eye_position(orbit_radius),
            canvas.aspect(),
            &options.camera,
        );
        let projection = camera.build_projection();
        let view = camera.build_view();
        backend.set_uniform_matrix4(program, PROJECTION_UNIFORM, &projection)?;
        backend.set_uniform_matrix4(program, MODEL_VIEW_UNIFORM, &view)?;

        let mut engine = Self {
            backend,
            program,
            lattice_buffer,
            orbit,
            camera,
            orbit_radius,
            view,
            input: InputProcessor::new(canvas),
            renderer: FrameRenderer::new(point_count),
        };
        engine.redraw()?;
        Ok(engine)
    }

    /// Draw a frame with the current matrices without touching the camera.
    ///
    /// # Errors
    ///
    /// [`MandelbulbError::Gpu`] if the backend fails to draw or present.
    pub fn redraw(&mut self) -> Result<(), MandelbulbError> {
        self.renderer.render_frame(&mut self.backend)?;
        Ok(())
    }

    /// Orbit accumulator state.
    #[must_use]
    pub fn orbit(&self) -> &OrbitCamera {
        &self.orbit
    }

    /// Camera built from the current eye position.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Last view matrix uploaded to the backend.
    #[must_use]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    /// Frames drawn so far, including the initial frame.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.renderer.frames()
    }

    /// Number of lattice points drawn per frame.
    #[must_use]
    pub fn point_count(&self) -> u32 {
        self.renderer.point_count()
    }

    /// Whether a pointer button is currently held.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.input.is_dragging()
    }

    /// The linked lattice program.
    #[must_use]
    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    /// The uploaded lattice buffer.
    #[must_use]
    pub fn lattice_buffer(&self) -> BufferHandle {
        self.lattice_buffer
    }

    /// The GPU backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the GPU backend, e.g. to reconfigure a lost
    /// surface.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
