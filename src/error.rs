//! Crate-level error types.

use std::{fmt, path::PathBuf};

use crate::gpu::{render_context::RenderContextError, GpuError};

/// Errors produced by the mandelbulb crate.
#[derive(Debug)]
pub enum MandelbulbError {
    /// A shader source file could not be read.
    ResourceFetch {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying read failure.
        source: std::io::Error,
    },
    /// The GPU backend rejected a program, buffer, uniform or draw.
    Gpu(GpuError),
    /// GPU context initialization failure.
    RenderContext(RenderContextError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// An option value outside its usable range.
    InvalidOption(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for MandelbulbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceFetch { path, source } => {
                write!(f, "failed to load {}: {source}", path.display())
            }
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::RenderContext(e) => write!(f, "render context error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::InvalidOption(msg) => write!(f, "invalid option: {msg}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for MandelbulbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ResourceFetch { source, .. } => Some(source),
            Self::Gpu(e) => Some(e),
            Self::RenderContext(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GpuError> for MandelbulbError {
    fn from(e: GpuError) -> Self {
        Self::Gpu(e)
    }
}

impl From<RenderContextError> for MandelbulbError {
    fn from(e: RenderContextError) -> Self {
        Self::RenderContext(e)
    }
}

impl From<std::io::Error> for MandelbulbError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
