use egui::{CursorIcon, Pos2, Rect, pos2};

use super::{Element, ElementType};

/// A control point on an element's bounding box.
///
/// The order of [`Handle::ALL`] is fixed: north, east, south, west, then the
/// top-right corner which sets the font size of text elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    North,
    East,
    South,
    West,
    FontSize,
}

impl Handle {
    pub const ALL: [Handle; 5] = [
        Handle::North,
        Handle::East,
        Handle::South,
        Handle::West,
        Handle::FontSize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Handle::North => "north",
            Handle::East => "east",
            Handle::South => "south",
            Handle::West => "west",
            Handle::FontSize => "font_size",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            Handle::North | Handle::South => CursorIcon::ResizeVertical,
            Handle::East | Handle::West => CursorIcon::ResizeHorizontal,
            Handle::FontSize => CursorIcon::ResizeNeSw,
        }
    }

    /// Whether this handle does anything on an element of the given type
    pub fn is_active_for(&self, element_type: ElementType) -> bool {
        match self {
            Handle::FontSize => element_type == ElementType::Text,
            Handle::North | Handle::East | Handle::South | Handle::West => true,
        }
    }

    /// Position of this handle on `rect`
    pub fn position(&self, rect: Rect) -> Pos2 {
        match self {
            Handle::North => pos2(rect.center().x, rect.min.y),
            Handle::East => pos2(rect.max.x, rect.center().y),
            Handle::South => pos2(rect.center().x, rect.max.y),
            Handle::West => pos2(rect.min.x, rect.center().y),
            Handle::FontSize => pos2(rect.max.x, rect.min.y),
        }
    }
}

/// The five control points of `element`, in [`Handle::ALL`] order
pub fn resize_handles(element: &Element) -> [(Handle, Pos2); 5] {
    let rect = element.rect();
    Handle::ALL.map(|handle| (handle, handle.position(rect)))
}

/// True when `point` lies within `tolerance` of `handle_pos` on both axes
pub fn is_point_on_handle(point: Pos2, handle_pos: Pos2, tolerance: f32) -> bool {
    (point.x - handle_pos.x).abs() <= tolerance && (point.y - handle_pos.y).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory;

    #[test]
    fn handles_are_in_fixed_order() {
        let mut element = factory::create_rectangle(pos2(10.0, 20.0));
        element.width = 40.0;
        element.height = 60.0;
        let handles = resize_handles(&element);
        assert_eq!(handles[0], (Handle::North, pos2(30.0, 20.0)));
        assert_eq!(handles[1], (Handle::East, pos2(50.0, 50.0)));
        assert_eq!(handles[2], (Handle::South, pos2(30.0, 80.0)));
        assert_eq!(handles[3], (Handle::West, pos2(10.0, 50.0)));
        assert_eq!(handles[4], (Handle::FontSize, pos2(50.0, 20.0)));
    }

    #[test]
    fn font_handle_is_inert_except_on_text() {
        assert!(Handle::FontSize.is_active_for(ElementType::Text));
        for ty in [ElementType::Image, ElementType::Rectangle, ElementType::Obscure] {
            assert!(!Handle::FontSize.is_active_for(ty));
            assert!(Handle::East.is_active_for(ty));
        }
    }

    #[test]
    fn tolerance_is_per_axis() {
        let handle = pos2(100.0, 100.0);
        assert!(is_point_on_handle(pos2(110.0, 90.0), handle, 10.0));
        assert!(!is_point_on_handle(pos2(110.5, 100.0), handle, 10.0));
    }
}
