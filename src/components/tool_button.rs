use egui::{Align2, FontId, Response, Sense, Stroke, Ui, Widget, vec2};

const BUTTON_SIZE: f32 = 34.0;

/// Square icon button for the tool strip, showing its label on hover
pub struct ToolButton {
    label: &'static str,
    icon: &'static str,
    selected: bool,
}

impl ToolButton {
    pub fn new(label: &'static str, icon: &'static str, selected: bool) -> Self {
        Self { label, icon, selected }
    }
}

impl Widget for ToolButton {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(vec2(BUTTON_SIZE, BUTTON_SIZE), Sense::click());
        if ui.is_rect_visible(rect) {
            let visuals = ui.style().interact_selectable(&response, self.selected);
            let painter = ui.painter();
            painter.rect_filled(rect, visuals.rounding, visuals.weak_bg_fill);
            if self.selected {
                painter.rect_stroke(rect, visuals.rounding, Stroke::new(2.0, ui.visuals().selection.stroke.color));
            }
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                self.icon,
                FontId::proportional(BUTTON_SIZE * 0.5),
                visuals.text_color(),
            );
        }
        response.on_hover_text(self.label)
    }
}
