//! Pointer tracking for the calibration overlay.
//!
//! Independent of the GUI toolkit: the overlay feeds pointer positions in and
//! reads back the rectangle to draw and the final drag corners.

/// A pointer position `(x, y)`.
pub type ScreenPoint = (f32, f32);

/// Tracks one press-drag-release gesture.
#[derive(Clone, Debug, Default)]
pub struct DragSelection {
    origin: Option<ScreenPoint>,
    current: Option<ScreenPoint>,
}

impl DragSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer pressed: records the drag origin.
    pub fn press(&mut self, pos: ScreenPoint) {
        self.origin = Some(pos);
        self.current = Some(pos);
    }

    /// Pointer moved while pressed. Ignored before a press.
    pub fn drag(&mut self, pos: ScreenPoint) {
        if self.origin.is_some() {
            self.current = Some(pos);
        }
    }

    /// Pointer released: returns `(origin, end)` and resets.
    /// Returns `None` if no press was recorded.
    pub fn release(&mut self, pos: ScreenPoint) -> Option<(ScreenPoint, ScreenPoint)> {
        let origin = self.origin.take()?;
        self.current = None;
        Some((origin, pos))
    }

    /// Rectangle to draw as live feedback, as `(min, max)` corners.
    pub fn preview(&self) -> Option<(ScreenPoint, ScreenPoint)> {
        let (x0, y0) = self.origin?;
        let (x1, y1) = self.current?;
        Some(((x0.min(x1), y0.min(y1)), (x0.max(x1), y0.max(y1))))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_drag_release() {
        let mut sel = DragSelection::new();
        sel.press((250.0, 120.0));
        sel.drag((100.0, 60.0));
        assert_eq!(sel.preview(), Some(((100.0, 60.0), (250.0, 120.0))));

        let corners = sel.release((50.0, 50.0));
        assert_eq!(corners, Some(((250.0, 120.0), (50.0, 50.0))));
        assert_eq!(sel.preview(), None);
    }

    #[test]
    fn test_release_without_press() {
        let mut sel = DragSelection::new();
        sel.drag((10.0, 10.0));
        assert_eq!(sel.preview(), None);
        assert_eq!(sel.release((20.0, 20.0)), None);
    }

    #[test]
    fn test_second_press_restarts() {
        let mut sel = DragSelection::new();
        sel.press((0.0, 0.0));
        sel.press((5.0, 5.0));
        assert_eq!(sel.release((50.0, 50.0)), Some(((5.0, 5.0), (50.0, 50.0))));
    }
}
