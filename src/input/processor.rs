//! Converts raw platform events into camera commands.
//!
//! The `InputProcessor` owns the drag session and the canvas rectangle the
//! pointer is measured against. It is the only thing that sits between raw
//! window events and the engine's
//! [`execute`](crate::MandelbulbEngine::execute) method.

use glam::Vec2;

use super::event::InputEvent;
use super::mouse::{CanvasRect, DragSession};
use crate::engine::command::CameraCommand;

/// Converts raw window events into [`CameraCommand`]s.
///
/// # Usage
///
/// ```ignore
/// if let Some(cmd) = input_processor.handle_event(event) {
///     engine.execute(cmd)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct InputProcessor {
    canvas: CanvasRect,
    session: DragSession,
}

impl InputProcessor {
    /// Create an idle processor measuring pointer positions against
    /// `canvas`.
    #[must_use]
    pub fn new(canvas: CanvasRect) -> Self {
        Self {
            canvas,
            session: DragSession::Idle,
        }
    }

    /// Current drag session.
    #[must_use]
    pub fn session(&self) -> DragSession {
        self.session
    }

    /// Whether a button is currently held.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging()
    }

    /// Process a raw input event and return zero or one commands.
    ///
    /// Button events only move the drag session. Cursor moves produce an
    /// [`CameraCommand::Orbit`] while dragging and nothing while idle.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<CameraCommand> {
        match event {
            InputEvent::MouseButton { button, pressed } => {
                let next = self.session.on_button(pressed);
                if next != self.session {
                    let action = if pressed { "pressed" } else { "released" };
                    log::debug!("{button:?} {action}, drag session {next:?}");
                }
                self.session = next;
                None
            }
            InputEvent::CursorMoved { x, y } => {
                if !self.session.is_dragging() {
                    return None;
                }
                let delta = self.canvas.normalized_delta(Vec2::new(x, y));
                Some(CameraCommand::Orbit { delta })
            }
        }
    }
}
