use glam::Vec2;

/// Whether pointer motion currently steers the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragSession {
    /// No button held; moves are ignored.
    #[default]
    Idle,
    /// A press has been seen without its release.
    Dragging,
}

impl DragSession {
    /// Transition on a button press or release.
    ///
    /// Any button counts. A release that never arrives (pointer released
    /// outside the window) leaves the session in `Dragging` until the next
    /// press/release pair.
    #[must_use]
    pub fn on_button(self, pressed: bool) -> Self {
        if pressed {
            Self::Dragging
        } else {
            Self::Idle
        }
    }

    /// `true` while moves are actionable.
    #[must_use]
    pub fn is_dragging(self) -> bool {
        self == Self::Dragging
    }
}

/// Canvas bounding rectangle in client coordinates.
///
/// Read once at startup; the canvas is not resized afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    /// Left edge in client space.
    pub left: f32,
    /// Top edge in client space.
    pub top: f32,
    /// Width in pixels (at least 1).
    pub width: f32,
    /// Height in pixels (at least 1).
    pub height: f32,
}

impl CanvasRect {
    /// Rectangle with its size clamped to at least one pixel.
    #[must_use]
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Rectangle at the client origin covering a whole window.
    #[must_use]
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// Width over height.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Client-space point relative to the canvas top-left corner.
    #[must_use]
    pub fn to_local(&self, client: Vec2) -> Vec2 {
        client - Vec2::new(self.left, self.top)
    }

    /// Normalized drag delta for a client-space pointer position.
    ///
    /// Horizontal is `(0.5 - x / width) * 2` and vertical is
    /// `(y / height - 0.5) * 2`, so both axes are inverted relative to screen
    /// direction and span `[-1, 1]` inside the canvas. Points outside the
    /// canvas extrapolate past that range.
    #[must_use]
    pub fn normalized_delta(&self, client: Vec2) -> Vec2 {
        let local = self.to_local(client);
        Vec2::new(
            (0.5 - local.x / self.width) * 2.0,
            (local.y / self.height - 0.5) * 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_toggle_session() {
        let session = DragSession::default();
        assert_eq!(session, DragSession::Idle);
        let session = session.on_button(true);
        assert!(session.is_dragging());
        assert_eq!(session.on_button(true), DragSession::Dragging);
        assert_eq!(session.on_button(false), DragSession::Idle);
    }

    #[test]
    fn canvas_corners_and_center_normalize() {
        let canvas = CanvasRect::from_size(800, 600);
        assert_eq!(canvas.normalized_delta(Vec2::new(400.0, 300.0)), Vec2::ZERO);
        assert_eq!(
            canvas.normalized_delta(Vec2::new(0.0, 0.0)),
            Vec2::new(1.0, -1.0)
        );
        assert_eq!(
            canvas.normalized_delta(Vec2::new(800.0, 600.0)),
            Vec2::new(-1.0, 1.0)
        );
    }

    #[test]
    fn offset_canvas_uses_local_coordinates() {
        let canvas = CanvasRect::new(100.0, 50.0, 200.0, 100.0);
        assert_eq!(canvas.to_local(Vec2::new(150.0, 75.0)), Vec2::new(50.0, 25.0));
        assert_eq!(
            canvas.normalized_delta(Vec2::new(200.0, 100.0)),
            Vec2::ZERO
        );
    }

    #[test]
    fn positions_outside_canvas_extrapolate() {
        let canvas = CanvasRect::from_size(100, 100);
        let delta = canvas.normalized_delta(Vec2::new(-50.0, 250.0));
        assert_eq!(delta, Vec2::new(2.0, 4.0));
    }

    #[test]
    fn degenerate_size_is_clamped() {
        let canvas = CanvasRect::from_size(0, 0);
        assert_eq!(canvas.width, 1.0);
        assert_eq!(canvas.height, 1.0);
        assert_eq!(canvas.aspect(), 1.0);
    }
}
