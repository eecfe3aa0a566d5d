use egui::Pos2;
use log::{debug, warn};

use crate::element::resize::{resize_box, resize_font};
use crate::element::{ElementType, Handle};
use crate::geometry::{elements_at, elements_in_marquee, hit_handle};
use crate::state::context::{LastClick, MIN_MARQUEE_SCREEN_SIZE};
use crate::state::{EditorContext, EditorState, MarqueePurpose};
use crate::selection::Selection;

impl EditorContext {
    /// Left press with the select tool.
    ///
    /// Handles win over bodies. Among bodies under the pointer, a repeat click on the
    /// selected element moves on to the next one in pick order, wrapping around, so
    /// stacked elements can be reached one by one. A quick second click on the same
    /// text element starts editing it instead.
    pub(crate) fn select_pointer_down(&mut self, base: Pos2, time: f64) {
        let zoom = self.viewport.zoom();
        let handle_size = self.config.handle_size;

        if let Some((index, handle)) = hit_handle(&self.page().elements, base, zoom, handle_size) {
            let element = &self.page().elements[index];
            self.state = match (handle, element.as_text()) {
                (Handle::FontSize, Some(text)) => EditorState::FontResizing {
                    index,
                    orig_size: text.font_size,
                    start_mouse: base,
                },
                _ => EditorState::Resizing {
                    index,
                    handle,
                    orig: element.rect(),
                    start_mouse: base,
                },
            };
            debug!("{} element {index} via {} handle", self.state.name(), handle.as_str());
            self.selection = Selection::single(index);
            self.sync_panel();
            return;
        }

        let hits = elements_at(&self.page().elements, base);
        if hits.is_empty() {
            self.selection.clear();
            self.sync_panel();
            self.state = EditorState::MarqueeSelecting {
                start: base,
                current: base,
                purpose: MarqueePurpose::Select,
            };
            return;
        }

        if let Some(last) = self.last_click {
            let is_text = self
                .page()
                .element(last.index)
                .is_some_and(|element| element.element_type() == ElementType::Text);
            if is_text && hits.contains(&last.index) && time - last.time < self.config.double_click_secs {
                self.last_click = None;
                self.begin_text_edit(last.index);
                return;
            }
        }

        let order = self.page().pick_order(&hits);
        let index = match self.selection.primary().and_then(|primary| order.iter().position(|&i| i == primary)) {
            Some(position) if order.len() > 1 => order[(position + 1) % order.len()],
            _ => order[0],
        };
        let start_pos = self.page().elements[index].position();
        debug!("picked element {index} of {} under pointer", order.len());
        self.selection = Selection::single(index);
        self.sync_panel();
        self.last_click = Some(LastClick { index, time });
        self.state = EditorState::Dragging {
            index,
            start_mouse: base,
            start_pos,
        };
    }

    /// Pointer motion during a drag, resize or font resize.
    ///
    /// Geometry is recomputed from the gesture origin every time.
    pub(crate) fn drag_to(&mut self, base: Pos2) {
        let state = self.state.clone();
        let Some(index) = state.active_element() else {
            return;
        };
        let Some(element) = self.page_mut().element_mut(index) else {
            warn!("{} target {index} is gone; abandoning gesture", state.name());
            self.state = EditorState::Idle;
            return;
        };
        match state {
            EditorState::Dragging { start_mouse, start_pos, .. } => {
                element.set_position(start_pos + (base - start_mouse));
            }
            EditorState::Resizing { handle, orig, start_mouse, .. } => {
                let keep_aspect = element.element_type() == ElementType::Image;
                element.set_rect(resize_box(orig, handle, base - start_mouse, keep_aspect));
            }
            EditorState::FontResizing { orig_size, start_mouse, .. } => match element.as_text_mut() {
                Some(text) => text.font_size = resize_font(orig_size, start_mouse, base),
                None => {
                    warn!("font resize on non-text element {index}; abandoning gesture");
                    self.state = EditorState::Idle;
                }
            },
            _ => {}
        }
    }

    /// Marquee release: select what it overlaps, or queue a region scan
    pub(crate) fn finish_marquee(&mut self) {
        let Some((rect, purpose)) = self.state.marquee() else {
            return;
        };
        self.state = EditorState::Idle;
        let zoom = self.viewport.zoom();
        if rect.width().max(rect.height()) * zoom < MIN_MARQUEE_SCREEN_SIZE {
            debug!("marquee too small; treated as a click");
            return;
        }
        match purpose {
            MarqueePurpose::Select => {
                let picked = elements_in_marquee(&self.page().elements, rect);
                debug!("marquee selected {} element(s)", picked.len());
                self.selection = Selection::from_indices(picked);
                self.sync_panel();
            }
            MarqueePurpose::Recognize => self.queue_region_scan(rect),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EditorConfig;
    use crate::document::{Document, Page};
    use crate::element::{Element, ElementType, Handle, factory};
    use crate::state::{EditorContext, EditorState};
    use egui::{PointerButton, Pos2, Rect, pos2, vec2};
    use pretty_assertions::assert_eq;

    fn context_with(elements: Vec<Element>) -> EditorContext {
        let document = Document {
            pages: vec![Page {
                width: 1000,
                height: 1000,
                elements,
                ..Page::default()
            }],
            template_values: Vec::new(),
        };
        EditorContext::new(document, &EditorConfig::default()).unwrap()
    }

    fn click(context: &mut EditorContext, at: Pos2, time: f64) {
        context.pointer_down(at, at, PointerButton::Primary, time);
        context.pointer_up();
    }

    #[test]
    fn drag_moves_from_origin_and_records_once() {
        let mut context = context_with(vec![factory::create_rectangle(pos2(10.0, 10.0))]);
        context.pointer_down(pos2(20.0, 20.0), Pos2::ZERO, PointerButton::Primary, 0.0);
        context.pointer_move(pos2(25.0, 22.0), Pos2::ZERO);
        context.pointer_move(pos2(40.0, 30.0), Pos2::ZERO);
        context.pointer_up();

        assert_eq!(context.page().elements[0].position(), pos2(30.0, 20.0));
        assert_eq!(context.history().len(), 2);
        assert!(context.state().is_idle());
    }

    #[test]
    fn click_without_motion_records_nothing() {
        let mut context = context_with(vec![factory::create_rectangle(pos2(10.0, 10.0))]);
        click(&mut context, pos2(20.0, 20.0), 0.0);
        assert_eq!(context.selection().indices(), &[0]);
        assert_eq!(context.history().len(), 1);
    }

    #[test]
    fn east_handle_resizes_width_only() {
        let mut context = context_with(vec![factory::create_rectangle(pos2(0.0, 0.0))]);
        let east = pos2(100.0, 25.0);
        context.pointer_down(east, east, PointerButton::Primary, 0.0);
        assert!(matches!(context.state(), EditorState::Resizing { handle: Handle::East, .. }));
        context.pointer_move(pos2(-500.0, 80.0), Pos2::ZERO);
        context.pointer_up();

        assert_eq!(context.page().elements[0].rect(), Rect::from_min_size(Pos2::ZERO, vec2(10.0, 50.0)));
        assert_eq!(context.history().len(), 2);
    }

    #[test]
    fn font_handle_changes_size_not_box() {
        let mut context = context_with(vec![factory::create_text(pos2(0.0, 0.0))]);
        let corner = pos2(150.0, 0.0);
        context.pointer_down(corner, corner, PointerButton::Primary, 0.0);
        context.pointer_move(pos2(160.0, -10.0), Pos2::ZERO);
        context.pointer_up();

        let element = &context.page().elements[0];
        assert_eq!(element.as_text().unwrap().font_size, 22);
        assert_eq!(element.rect().size(), vec2(150.0, 50.0));
    }

    #[test]
    fn font_handle_is_inert_on_rectangles() {
        let mut context = context_with(vec![factory::create_rectangle(pos2(0.0, 0.0))]);
        let corner = pos2(100.0, 0.0);
        context.pointer_down(corner, corner, PointerButton::Primary, 0.0);
        assert!(matches!(context.state(), EditorState::Dragging { index: 0, .. }));
    }

    #[test]
    fn empty_click_clears_and_starts_marquee() {
        let mut context = context_with(vec![factory::create_rectangle(pos2(0.0, 0.0))]);
        context.select([0]);
        context.pointer_down(pos2(500.0, 500.0), Pos2::ZERO, PointerButton::Primary, 0.0);
        assert!(context.selection().is_empty());
        assert!(context.state().marquee().is_some());
        context.pointer_up();
        assert!(context.selection().is_empty());
    }

    #[test]
    fn double_click_on_text_enters_editing() {
        let mut context = context_with(vec![factory::create_text(pos2(0.0, 0.0))]);
        click(&mut context, pos2(10.0, 10.0), 1.0);
        context.pointer_down(pos2(12.0, 10.0), Pos2::ZERO, PointerButton::Primary, 1.2);
        assert_eq!(context.state().text_cursor(), Some((0, 11)));

        let mut slow = context_with(vec![factory::create_text(pos2(0.0, 0.0))]);
        click(&mut slow, pos2(10.0, 10.0), 1.0);
        slow.pointer_down(pos2(12.0, 10.0), Pos2::ZERO, PointerButton::Primary, 1.5);
        assert!(matches!(slow.state(), EditorState::Dragging { .. }));
    }

    #[test]
    fn right_button_pans_in_screen_space() {
        let mut context = context_with(Vec::new());
        context.pointer_down(Pos2::ZERO, pos2(100.0, 100.0), PointerButton::Secondary, 0.0);
        context.pointer_move(Pos2::ZERO, pos2(130.0, 90.0));
        assert_eq!(context.viewport().pan, vec2(30.0, -10.0));
        context.pointer_up();
        assert!(context.state().is_idle());
    }

    #[test]
    fn repeat_click_cycles_from_obscure_to_rectangle() {
        let mut context = context_with(vec![
            factory::create_rectangle(pos2(0.0, 0.0)),
            factory::create_obscure(pos2(0.0, 0.0)),
        ]);
        click(&mut context, pos2(5.0, 5.0), 0.0);
        assert_eq!(context.page().elements[1].element_type(), ElementType::Obscure);
        assert_eq!(context.selection().indices(), &[1]);
        click(&mut context, pos2(5.0, 5.0), 1.0);
        assert_eq!(context.selection().indices(), &[0]);
    }
}
