//! Frame-coherent pointer state tracker.
//!
//! [`PointerState`] accumulates winit cursor events and exposes the
//! normalized parallax vector the scene consumes: `[-1, 1]²` with (0, 0) at
//! the viewport center and +y pointing up.

use glam::Vec2;

/// Frame-coherent pointer state.
///
/// # Usage
///
/// 1. Forward winit events via the `on_*` methods during event collection.
/// 2. Keep the viewport size current via [`set_viewport`](Self::set_viewport).
/// 3. Query [`parallax_vector`](Self::parallax_vector) each frame.
#[derive(Debug, Clone)]
pub struct PointerState {
    /// Last cursor position in logical pixels, if the cursor has ever moved.
    position: Option<Vec2>,
    /// Viewport size in logical pixels.
    viewport: Vec2,
    cursor_in_window: bool,
}

impl PointerState {
    /// Creates a new `PointerState` for the given viewport size.
    #[must_use]
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: None,
            viewport: Vec2::new(viewport_width.max(1.0), viewport_height.max(1.0)),
            cursor_in_window: false,
        }
    }

    // ── Event handlers ──────────────────────────────────────────────

    /// Process a `CursorMoved` event (logical coordinates).
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        self.position = Some(Vec2::new(x as f32, y as f32));
    }

    /// Process a `CursorEntered` event.
    pub fn on_cursor_entered(&mut self) {
        self.cursor_in_window = true;
    }

    /// Process a `CursorLeft` event. The last position is retained so the
    /// parallax target does not snap back when the cursor leaves.
    pub fn on_cursor_left(&mut self) {
        self.cursor_in_window = false;
    }

    /// Update the viewport size after a resize (logical pixels).
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Last cursor position in logical pixels, if any.
    #[must_use]
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Whether the cursor is inside the window.
    #[must_use]
    pub fn is_cursor_in_window(&self) -> bool {
        self.cursor_in_window
    }

    /// The normalized parallax vector in `[-1, 1]²`, +y up, (0, 0) at
    /// center. Zero until the cursor first moves.
    #[must_use]
    pub fn parallax_vector(&self) -> Vec2 {
        match self.position {
            Some(pos) => {
                let x = (pos.x / self.viewport.x) * 2.0 - 1.0;
                let y = -((pos.y / self.viewport.y) * 2.0 - 1.0);
                Vec2::new(x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0))
            }
            None => Vec2::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_movement_yields_zero_vector() {
        let pointer = PointerState::new(800.0, 600.0);
        assert_eq!(pointer.parallax_vector(), Vec2::ZERO);
    }

    #[test]
    fn test_center_maps_to_origin() {
        let mut pointer = PointerState::new(800.0, 600.0);
        pointer.on_cursor_moved(400.0, 300.0);
        let v = pointer.parallax_vector();
        assert!(v.x.abs() < 1e-6);
        assert!(v.y.abs() < 1e-6);
    }

    #[test]
    fn test_corners_map_to_unit_square() {
        let mut pointer = PointerState::new(800.0, 600.0);

        pointer.on_cursor_moved(0.0, 0.0);
        let v = pointer.parallax_vector();
        assert!((v.x - -1.0).abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6, "top of screen is +y");

        pointer.on_cursor_moved(800.0, 600.0);
        let v = pointer.parallax_vector();
        assert!((v.x - 1.0).abs() < 1e-6);
        assert!((v.y - -1.0).abs() < 1e-6);
    }

    #[test]
    fn test_vector_clamped_outside_viewport() {
        let mut pointer = PointerState::new(800.0, 600.0);
        pointer.on_cursor_moved(1600.0, -50.0);
        let v = pointer.parallax_vector();
        assert!(v.x <= 1.0 && v.x >= -1.0);
        assert!(v.y <= 1.0 && v.y >= -1.0);
    }

    #[test]
    fn test_cursor_left_retains_last_vector() {
        let mut pointer = PointerState::new(800.0, 600.0);
        pointer.on_cursor_entered();
        pointer.on_cursor_moved(600.0, 150.0);
        let before = pointer.parallax_vector();
        pointer.on_cursor_left();
        assert!(!pointer.is_cursor_in_window());
        assert_eq!(pointer.parallax_vector(), before);
    }

    #[test]
    fn test_resize_rescales_vector() {
        let mut pointer = PointerState::new(800.0, 600.0);
        pointer.on_cursor_moved(400.0, 300.0);
        assert_eq!(pointer.parallax_vector(), Vec2::ZERO);

        // Same cursor position is off-center in a smaller viewport.
        pointer.set_viewport(400.0, 300.0);
        let v = pointer.parallax_vector();
        assert!((v.x - 1.0).abs() < 1e-6);
        assert!((v.y - -1.0).abs() < 1e-6);
    }
}
