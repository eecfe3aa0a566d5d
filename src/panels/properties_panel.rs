use uuid::Uuid;

use super::PickerPurpose;
use crate::TemplateEditorApp;
use crate::command::PropertyChange;
use crate::element::{
    BACKGROUND_CHOICES, COLOR_CHOICES, Element, ElementKind, FONT_CHOICES, MAX_FONT_SIZE, MIN_FONT_SIZE,
    ObscureMode, Padding, Rgb,
};
use crate::state::PanelKind;
use crate::template_data::{CUSTOM_TEXT_KEY, KeyCatalog};

/// Widget values being edited in the open property panel.
///
/// Edits stay here until the widget is released, so one finished edit becomes one
/// property command.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelDraft {
    panel: Uuid,
    value: String,
    editing_value: bool,
    font_size: u32,
    padding: Padding,
    dragging: bool,
}

impl PanelDraft {
    fn new(panel: Uuid) -> Self {
        Self {
            panel,
            value: String::new(),
            editing_value: false,
            font_size: MIN_FONT_SIZE,
            padding: Padding::default(),
            dragging: false,
        }
    }

    /// Picks up the element's current values for widgets not being edited
    fn refresh(&mut self, element: &Element) {
        if !self.editing_value {
            self.value = element.value().unwrap_or_default().to_string();
        }
        if !self.dragging {
            match &element.kind {
                ElementKind::Text(text) => self.font_size = text.font_size,
                ElementKind::Image(image) => self.padding = image.padding,
                ElementKind::Rectangle(_) | ElementKind::Obscure(_) => {}
            }
        }
    }
}

enum PanelAction {
    Set(PropertyChange),
    Delete,
    ConvertToObscure,
    ChooseImage,
}

/// True once a drag value's edit is finished
fn edit_finished(response: &egui::Response) -> bool {
    (response.changed() && !response.dragged()) || response.drag_stopped()
}

fn color_name(choices: &[(&'static str, Rgb)], color: Rgb) -> &'static str {
    choices
        .iter()
        .find(|(_, choice)| *choice == color)
        .map(|(name, _)| *name)
        .unwrap_or("Custom")
}

fn color_combo(ui: &mut egui::Ui, id: &str, choices: &[(&'static str, Rgb)], current: Rgb) -> Option<Rgb> {
    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(color_name(choices, current))
        .show_ui(ui, |ui| {
            for (name, color) in choices {
                if ui.selectable_label(*color == current, *name).clicked() && *color != current {
                    picked = Some(*color);
                }
            }
        });
    picked
}

pub fn properties_panel(app: &mut TemplateEditorApp, ctx: &egui::Context) {
    let Some(handle) = app.editor.active_panel().cloned() else {
        app.draft = None;
        return;
    };
    let Some(element) = app.editor.page().element(handle.element).cloned() else {
        return;
    };
    if app.draft.as_ref().is_none_or(|draft| draft.panel != handle.id) {
        app.draft = Some(PanelDraft::new(handle.id));
    }
    let Some(draft) = app.draft.as_mut() else {
        return;
    };
    draft.refresh(&element);

    let keys = &app.keys;
    let mut actions = Vec::new();
    egui::SidePanel::right("properties_panel")
        .resizable(true)
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.push_id(handle.egui_id(), |ui| {
                ui.heading(handle.kind.title());
                let rect = element.rect();
                ui.label(format!(
                    "x: {:.0}  y: {:.0}  w: {:.0}  h: {:.0}",
                    rect.min.x,
                    rect.min.y,
                    rect.width(),
                    rect.height()
                ));
                ui.separator();

                match (&handle.kind, &element.kind) {
                    (PanelKind::Text, ElementKind::Text(text)) => {
                        text_properties(ui, draft, keys, text, &mut actions);
                    }
                    (PanelKind::Image, ElementKind::Image(image)) => {
                        ui.label("Image:");
                        let shown = if image.value.is_empty() { "(none)" } else { image.value.as_str() };
                        ui.monospace(shown);
                        if ui.button("Choose image…").clicked() {
                            actions.push(PanelAction::ChooseImage);
                        }
                        ui.separator();
                        padding_properties(ui, draft, image.padding, &mut actions);
                    }
                    (PanelKind::Obscure, ElementKind::Obscure(obscure)) => {
                        ui.label("Mode:");
                        for mode in ObscureMode::ALL {
                            if ui.radio(obscure.mode == mode, mode.as_str()).clicked() && obscure.mode != mode {
                                actions.push(PanelAction::Set(PropertyChange::ObscureMode(mode)));
                            }
                        }
                    }
                    _ => {
                        ui.label("Properties unavailable for this element");
                    }
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if handle.kind != PanelKind::Obscure && ui.button("Convert to Obscure").clicked() {
                        actions.push(PanelAction::ConvertToObscure);
                    }
                    if ui.button("🗑 Delete").clicked() {
                        actions.push(PanelAction::Delete);
                    }
                });
            });
        });

    for action in actions {
        match action {
            PanelAction::Set(change) => {
                app.editor.set_property(handle.element, change);
            }
            PanelAction::Delete => {
                app.editor.select([handle.element]);
                app.editor.delete_selected();
            }
            PanelAction::ConvertToObscure => {
                app.editor.select([handle.element]);
                app.editor.convert_selection_to_obscure();
            }
            PanelAction::ChooseImage => app.open_image_picker(PickerPurpose::Replace(handle.element)),
        }
    }
}

fn text_properties(
    ui: &mut egui::Ui,
    draft: &mut PanelDraft,
    keys: &KeyCatalog,
    text: &crate::element::TextContent,
    actions: &mut Vec<PanelAction>,
) {
    let current_key = if keys.is_key(&text.value) { text.value.as_str() } else { CUSTOM_TEXT_KEY };
    ui.label("Data key:");
    egui::ComboBox::from_id_salt("template_key")
        .selected_text(current_key)
        .width(200.0)
        .show_ui(ui, |ui| {
            for key in keys.keys() {
                let picked = ui.selectable_label(key == current_key, key.as_str()).clicked();
                if picked && key != current_key && key != CUSTOM_TEXT_KEY {
                    actions.push(PanelAction::Set(PropertyChange::Value(key.clone())));
                }
            }
        });

    ui.label("Text:");
    let response = ui.add(egui::TextEdit::multiline(&mut draft.value).desired_rows(2));
    draft.editing_value = response.has_focus();
    if response.lost_focus() && draft.value != text.value {
        actions.push(PanelAction::Set(PropertyChange::Value(draft.value.clone())));
    }

    egui::Grid::new("text_style").num_columns(2).show(ui, |ui| {
        ui.label("Font:");
        egui::ComboBox::from_id_salt("font").selected_text(text.font.as_str()).show_ui(ui, |ui| {
            for font in FONT_CHOICES {
                if ui.selectable_label(text.font == font, font).clicked() && text.font != font {
                    actions.push(PanelAction::Set(PropertyChange::Font(font.to_string())));
                }
            }
        });
        ui.end_row();

        ui.label("Size:");
        let response = ui.add(egui::DragValue::new(&mut draft.font_size).range(MIN_FONT_SIZE..=MAX_FONT_SIZE));
        draft.dragging = response.dragged();
        if edit_finished(&response) && draft.font_size != text.font_size {
            actions.push(PanelAction::Set(PropertyChange::FontSize(draft.font_size)));
        }
        ui.end_row();

        ui.label("Color:");
        if let Some(color) = color_combo(ui, "font_color", &COLOR_CHOICES, text.font_color) {
            actions.push(PanelAction::Set(PropertyChange::FontColor(color)));
        }
        ui.end_row();

        ui.label("Background:");
        if let Some(color) = color_combo(ui, "background_color", &BACKGROUND_CHOICES, text.background_color) {
            actions.push(PanelAction::Set(PropertyChange::BackgroundColor(color)));
        }
        ui.end_row();
    });
}

fn padding_properties(ui: &mut egui::Ui, draft: &mut PanelDraft, current: Padding, actions: &mut Vec<PanelAction>) {
    ui.label("Padding:");
    let mut finished = false;
    let mut dragging = false;
    egui::Grid::new("padding").num_columns(2).show(ui, |ui| {
        let sides = [
            ("Left", &mut draft.padding.left),
            ("Top", &mut draft.padding.top),
            ("Right", &mut draft.padding.right),
            ("Bottom", &mut draft.padding.bottom),
        ];
        for (label, value) in sides {
            ui.label(label);
            let response = ui.add(egui::DragValue::new(value).range(0.0..=500.0).speed(0.5));
            dragging |= response.dragged();
            finished |= edit_finished(&response);
            ui.end_row();
        }
    });
    draft.dragging = dragging;
    if finished && draft.padding != current {
        actions.push(PanelAction::Set(PropertyChange::Padding(draft.padding)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory;
    use egui::pos2;

    #[test]
    fn draft_keeps_value_while_editing() {
        let mut element = factory::create_text(pos2(0.0, 0.0));
        let mut draft = PanelDraft::new(Uuid::new_v4());
        draft.refresh(&element);
        assert_eq!(draft.value, "Sample Text");
        assert_eq!(draft.font_size, 18);

        draft.editing_value = true;
        draft.value = "typing".into();
        element.as_text_mut().unwrap().font_size = 30;
        draft.refresh(&element);
        assert_eq!(draft.value, "typing");
        assert_eq!(draft.font_size, 30);
    }

    #[test]
    fn unknown_colors_show_as_custom() {
        assert_eq!(color_name(&COLOR_CHOICES, Rgb::RED), "Red");
        assert_eq!(color_name(&COLOR_CHOICES, Rgb([1, 2, 3])), "Custom");
    }
}
