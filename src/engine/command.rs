//! The engine's interactive vocabulary.
//!
//! Pointer gestures are turned into `CameraCommand`s by the
//! [`InputProcessor`](crate::input::InputProcessor) and passed to
//! [`MandelbulbEngine::execute`](super::MandelbulbEngine::execute).
//! Programmatic callers may construct them directly.

use glam::Vec2;

/// A camera operation the engine can execute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    /// Accumulate a normalized drag delta into the orbit state, then
    /// re-upload the view and redraw.
    Orbit {
        /// Horizontal and vertical delta, roughly `[-1, 1]` inside the
        /// canvas.
        delta: Vec2,
    },
}
