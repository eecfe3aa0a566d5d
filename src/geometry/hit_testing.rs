use egui::{Pos2, Rect};

use crate::element::Element;
use crate::element::handle::{Handle, is_point_on_handle, resize_handles};

/// Finds the first handle under `point` across all elements, in list order.
///
/// `handle_size` is the grab tolerance in screen pixels; dividing by `zoom` keeps the
/// target the same apparent size at every zoom level. Handles that are inert for an
/// element's type never match.
pub fn hit_handle(elements: &[Element], point: Pos2, zoom: f32, handle_size: f32) -> Option<(usize, Handle)> {
    let tolerance = handle_size / zoom;
    elements.iter().enumerate().find_map(|(index, element)| {
        let element_type = element.element_type();
        resize_handles(element)
            .into_iter()
            .find(|(handle, pos)| handle.is_active_for(element_type) && is_point_on_handle(point, *pos, tolerance))
            .map(|(handle, _)| (index, handle))
    })
}

/// Indices of every element whose box contains `point`
pub fn elements_at(elements: &[Element], point: Pos2) -> Vec<usize> {
    elements
        .iter()
        .enumerate()
        .filter(|(_, element)| element.contains(point))
        .map(|(index, _)| index)
        .collect()
}

/// Open-interval overlap on both axes; boxes that only touch do not overlap
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && b.min.x < a.max.x && a.min.y < b.max.y && b.min.y < a.max.y
}

/// Indices of every element overlapping the marquee, ascending
pub fn elements_in_marquee(elements: &[Element], marquee: Rect) -> Vec<usize> {
    elements
        .iter()
        .enumerate()
        .filter(|(_, element)| overlaps(element.rect(), marquee))
        .map(|(index, _)| index)
        .collect()
}

/// Normalised rectangle spanned by two drag corners
pub fn marquee_rect(start: Pos2, current: Pos2) -> Rect {
    Rect::from_two_pos(start, current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory;
    use egui::{pos2, vec2};

    fn sample() -> Vec<Element> {
        vec![
            factory::create_rectangle(pos2(0.0, 0.0)),
            factory::create_text(pos2(200.0, 200.0)),
        ]
    }

    #[test]
    fn handle_tolerance_shrinks_with_zoom() {
        let elements = sample();
        // north handle of the rectangle sits at (50, 0)
        assert_eq!(hit_handle(&elements, pos2(50.0, 8.0), 1.0, 10.0), Some((0, Handle::North)));
        assert_eq!(hit_handle(&elements, pos2(50.0, 8.0), 2.0, 10.0), None);
        assert_eq!(hit_handle(&elements, pos2(50.0, 4.0), 2.0, 10.0), Some((0, Handle::North)));
    }

    #[test]
    fn font_handle_only_on_text() {
        let elements = sample();
        // top-right corner of the rectangle: no handle, falls through to the body
        assert_eq!(hit_handle(&elements, pos2(100.0, 0.0), 1.0, 5.0), None);
        // top-right corner of the text box
        assert_eq!(hit_handle(&elements, pos2(350.0, 200.0), 1.0, 5.0), Some((1, Handle::FontSize)));
    }

    #[test]
    fn marquee_needs_real_overlap() {
        let elements = sample();
        let touching = Rect::from_min_size(pos2(100.0, 0.0), vec2(50.0, 50.0));
        assert!(elements_in_marquee(&elements, touching).is_empty());

        let partial = Rect::from_min_size(pos2(90.0, 40.0), vec2(150.0, 200.0));
        assert_eq!(elements_in_marquee(&elements, partial), vec![0, 1]);

        let outside = Rect::from_min_size(pos2(500.0, 500.0), vec2(50.0, 50.0));
        assert!(elements_in_marquee(&elements, outside).is_empty());
    }

    #[test]
    fn point_hits_all_containing_boxes() {
        let mut elements = sample();
        elements.push(factory::create_obscure(pos2(50.0, 25.0)));
        assert_eq!(elements_at(&elements, pos2(60.0, 30.0)), vec![0, 2]);
        assert!(elements_at(&elements, pos2(1000.0, 1000.0)).is_empty());
    }

    #[test]
    fn marquee_rect_normalises_corners() {
        let rect = marquee_rect(pos2(50.0, 80.0), pos2(10.0, 20.0));
        assert_eq!(rect, Rect::from_min_max(pos2(10.0, 20.0), pos2(50.0, 80.0)));
    }
}
