//! Centralized viewer options with TOML file support.
//!
//! Camera, lattice, shader and display settings are consolidated here.
//! Every section uses `#[serde(default)]`, so a file that only overrides
//! `[camera]` keeps defaults everywhere else.

mod camera;
mod display;
mod lattice;
mod shaders;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use lattice::LatticeOptions;
use serde::{Deserialize, Serialize};
pub use shaders::ShaderOptions;

use crate::error::MandelbulbError;

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Projection and orbit parameters.
    pub camera: CameraOptions,
    /// Sample lattice extent and spacing.
    pub lattice: LatticeOptions,
    /// Shader source locations.
    pub shaders: ShaderOptions,
    /// Window and clear color.
    pub display: DisplayOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MandelbulbError::Io`] if the file cannot be read and
    /// [`MandelbulbError::OptionsParse`] if it is not valid TOML for these
    /// options.
    pub fn load(path: &Path) -> Result<Self, MandelbulbError> {
        let content = std::fs::read_to_string(path).map_err(MandelbulbError::Io)?;
        toml::from_str(&content)
            .map_err(|e| MandelbulbError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`MandelbulbError::OptionsParse`] if serialization fails and
    /// [`MandelbulbError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), MandelbulbError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MandelbulbError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MandelbulbError::Io)?;
        }
        std::fs::write(path, content).map_err(MandelbulbError::Io)
    }

    /// Reject values the camera or lattice cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`MandelbulbError::InvalidOption`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<(), MandelbulbError> {
        let camera = &self.camera;
        let invalid = |msg: &str| Err(MandelbulbError::InvalidOption(msg.to_owned()));

        if !(camera.fovy > 0.0 && camera.fovy < 180.0) {
            return invalid("camera.fovy must be between 0 and 180 degrees");
        }
        if !(camera.znear > 0.0 && camera.znear.is_finite()) {
            return invalid("camera.znear must be positive");
        }
        if !(camera.zfar > camera.znear && camera.zfar.is_finite()) {
            return invalid("camera.zfar must be greater than camera.znear");
        }
        if !(camera.orbit_radius > 0.0 && camera.orbit_radius.is_finite()) {
            return invalid("camera.orbit_radius must be positive");
        }
        if !camera.drift.is_finite() {
            return invalid("camera.drift must be finite");
        }
        if !(self.lattice.step > 0.0 && self.lattice.step.is_finite()) {
            return invalid("lattice.step must be positive");
        }
        if !(self.lattice.half_extent > 0.0
            && self.lattice.half_extent.is_finite())
        {
            return invalid("lattice.half_extent must be positive");
        }
        let fits_one_draw = crate::lattice::point_count(
            self.lattice.half_extent,
            self.lattice.step,
        )
        .is_some_and(|count| u32::try_from(count).is_ok());
        if !fits_one_draw {
            return invalid(
                "lattice.half_extent / lattice.step gives more points than one draw can hold",
            );
        }
        Ok(())
    }
}
