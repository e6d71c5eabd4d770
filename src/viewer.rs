//! Standalone lattice window backed by winit.
//!
//! ```no_run
//! # use mandelbulb::Viewer;
//! Viewer::builder()
//!     .with_title("Mandelbulb")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    error::MandelbulbError,
    gpu::{GpuError, RenderContext, WgpuBackend},
    input::CanvasRect,
    options::Options,
    shaders::ShaderSources,
    InputEvent, MandelbulbEngine, MouseButton,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Options,
    shaders: Option<ShaderSources>,
    title: Option<String>,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: Options::default(),
            shaders: None,
            title: None,
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Use these shader sources instead of reading the configured files.
    #[must_use]
    pub fn with_shaders(mut self, shaders: ShaderSources) -> Self {
        self.shaders = Some(shaders);
        self
    }

    /// Set the window title, overriding `display.title`.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        let title = self
            .title
            .unwrap_or_else(|| self.options.display.title.clone());
        Viewer {
            options: self.options,
            shaders: self.shaders,
            title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A fixed-size window that displays the lattice point cloud and orbits it
/// while a pointer button is held.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    shaders: Option<ShaderSources>,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Load shaders, open the window and run the event loop. Blocks until
    /// the window is closed.
    ///
    /// # Errors
    ///
    /// [`MandelbulbError::InvalidOption`] or
    /// [`MandelbulbError::ResourceFetch`] before any window is opened,
    /// [`MandelbulbError::Viewer`] if the event loop fails, and any
    /// startup error from the engine once the window exists.
    pub fn run(self) -> Result<(), MandelbulbError> {
        self.options.validate()?;
        let shaders = match self.shaders {
            Some(shaders) => shaders,
            None => ShaderSources::load(&self.options.shaders)?,
        };

        let event_loop = EventLoop::new()
            .map_err(|e| MandelbulbError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            options: self.options,
            shaders,
            title: self.title,
            startup_error: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| MandelbulbError::Viewer(e.to_string()))?;
        app.startup_error.map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<MandelbulbEngine<WgpuBackend>>,
    options: Options,
    shaders: ShaderSources,
    title: String,
    startup_error: Option<MandelbulbError>,
}

impl ViewerApp {
    fn start_engine(
        &self,
        window: Arc<Window>,
    ) -> Result<MandelbulbEngine<WgpuBackend>, MandelbulbError> {
        let inner = window.inner_size();
        let size = (inner.width.max(1), inner.height.max(1));
        let context = pollster::block_on(RenderContext::new(window, size))?;
        let backend = WgpuBackend::new(context, self.options.display.clear_color);
        MandelbulbEngine::new(
            backend,
            &self.shaders,
            &self.options,
            CanvasRect::from_size(size.0, size.1),
        )
    }

    /// Forward an event and recover from a lost or outdated surface.
    fn dispatch(&mut self, event: InputEvent) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        let result = engine.handle_input(event).map(|_| ());
        recover_frame(engine, result);
    }

    fn redraw(&mut self) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        let result = engine.redraw();
        recover_frame(engine, result);
    }
}

fn recover_frame(
    engine: &mut MandelbulbEngine<WgpuBackend>,
    result: Result<(), MandelbulbError>,
) {
    match result {
        Ok(()) => {}
        Err(MandelbulbError::Gpu(GpuError::Surface(
            wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost,
        ))) => {
            log::warn!("surface lost, reconfiguring");
            engine.backend_mut().reconfigure();
            if let Err(e) = engine.redraw() {
                log::error!("redraw after reconfigure failed: {e}");
            }
        }
        Err(e) => log::error!("render error: {e}"),
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_resizable(false);
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            #[allow(clippy::cast_possible_truncation)]
            let logical_w = (f64::from(mon_size.width) / scale * 0.75) as u32;
            #[allow(clippy::cast_possible_truncation)]
            let logical_h = (f64::from(mon_size.height) / scale * 0.75) as u32;
            attrs.with_inner_size(winit::dpi::LogicalSize::new(
                logical_w, logical_h,
            ))
        } else {
            attrs
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                self.startup_error = Some(MandelbulbError::Viewer(e.to_string()));
                event_loop.exit();
                return;
            }
        };

        match self.start_engine(window.clone()) {
            Ok(engine) => {
                log::info!(
                    "viewer ready: {} points, {}x{}",
                    engine.point_count(),
                    window.inner_size().width,
                    window.inner_size().height
                );
                self.engine = Some(engine);
                self.window = Some(window);
            }
            Err(e) => {
                log::error!("Failed to initialize engine: {e}");
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        match event {
            // The initial frame is drawn during startup; this repaints after
            // the compositor discards the surface contents.
            WindowEvent::RedrawRequested => self.redraw(),

            WindowEvent::MouseInput { button, state, .. } => {
                self.dispatch(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.dispatch(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            _ => (),
        }
    }
}
