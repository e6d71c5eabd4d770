//! Input dispatch and command execution for [`MandelbulbEngine`].

use super::command::CameraCommand;
use super::MandelbulbEngine;
use crate::error::MandelbulbError;
use crate::gpu::{GpuBackend, MODEL_VIEW_UNIFORM};
use crate::input::InputEvent;

impl<B: GpuBackend> MandelbulbEngine<B> {
    /// Process a platform-agnostic input event.
    ///
    /// Press and release only move the drag session. A cursor move while
    /// dragging orbits the camera and redraws.
    ///
    /// Returns `true` if a frame was drawn.
    ///
    /// # Errors
    ///
    /// [`MandelbulbError::Gpu`] if uploading the view or drawing fails.
    pub fn handle_input(
        &mut self,
        event: InputEvent,
    ) -> Result<bool, MandelbulbError> {
        match self.input.handle_event(event) {
            Some(command) => {
                self.execute(command)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Execute a camera command.
    ///
    /// # Errors
    ///
    /// [`MandelbulbError::Gpu`] if uploading the view or drawing fails.
    pub fn execute(&mut self, command: CameraCommand) -> Result<(), MandelbulbError> {
        match command {
            CameraCommand::Orbit { delta } => {
                self.orbit.apply_drag(delta);
                self.camera.eye = self.orbit.effective_eye_position(self.orbit_radius);
                self.view = self.camera.build_view();
                self.backend.set_uniform_matrix4(
                    self.program,
                    MODEL_VIEW_UNIFORM,
                    &self.view,
                )?;
                log::trace!(
                    "orbit state {} eye {}",
                    self.orbit.state(),
                    self.camera.eye
                );
            }
        }
        self.redraw()
    }
}
