use egui::{Color32, CursorIcon, Painter, Pos2, Rect, Stroke, Vec2};

use crate::element::Handle;

const HANDLE_FILL: Color32 = Color32::from_rgb(30, 120, 255);
const FONT_HANDLE_FILL: Color32 = Color32::from_rgb(255, 140, 0);

/// On-canvas marker for one control point of the selected element.
///
/// Purely visual; grabbing a handle is decided by hit testing in base space.
#[derive(Debug, Clone, Copy)]
pub struct HandleMarker {
    handle: Handle,
    position: Pos2,
    size: f32,
}

impl HandleMarker {
    /// `position` in screen coordinates; `size` is the side length in screen pixels
    pub fn new(handle: Handle, position: Pos2, size: f32) -> Self {
        Self { handle, position, size }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.position, Vec2::splat(self.size))
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        self.handle.cursor_icon()
    }

    pub fn paint(&self, painter: &Painter) {
        let rect = self.rect();
        if self.handle == Handle::FontSize {
            painter.circle_filled(rect.center(), self.size / 2.0, FONT_HANDLE_FILL);
            painter.circle_stroke(rect.center(), self.size / 2.0, Stroke::new(1.0, Color32::WHITE));
        } else {
            painter.rect_filled(rect, 2.0, HANDLE_FILL);
            painter.rect_stroke(rect, 2.0, Stroke::new(1.0, Color32::WHITE));
        }
    }

    /// True when the screen point lies on this marker
    pub fn contains(&self, point: Pos2) -> bool {
        self.rect().contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn marker_is_centred_on_its_handle() {
        let marker = HandleMarker::new(Handle::East, pos2(100.0, 50.0), 10.0);
        assert_eq!(marker.rect(), Rect::from_min_max(pos2(95.0, 45.0), pos2(105.0, 55.0)));
        assert!(marker.contains(pos2(104.0, 46.0)));
        assert!(!marker.contains(pos2(106.0, 50.0)));
        assert_eq!(marker.cursor_icon(), CursorIcon::ResizeHorizontal);
    }
}
