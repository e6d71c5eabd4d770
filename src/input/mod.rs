//! Input handling: event types, the drag session, and the input processor
//! that converts raw window events into camera commands.

/// Platform-agnostic input events.
pub mod event;
/// Drag session state and canvas-relative pointer math.
pub mod mouse;
/// Converts raw events into camera commands.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use mouse::{CanvasRect, DragSession};
pub use processor::InputProcessor;
