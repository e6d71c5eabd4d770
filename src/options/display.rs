use serde::{Deserialize, Serialize};

/// Window and framebuffer presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayOptions {
    /// RGBA color the frame is cleared to.
    pub clear_color: [f64; 4],
    /// Window title.
    pub title: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            title: "Mandelbulb".into(),
        }
    }
}
