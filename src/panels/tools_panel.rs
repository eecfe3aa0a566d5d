use log::info;

use super::PickerPurpose;
use crate::TemplateEditorApp;
use crate::components::ToolButton;
use crate::element::ElementType;
use crate::tools::{InsertKind, ToolMode};

/// Entries of the tool strip, in shortcut order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolSlot {
    Select,
    Text,
    Image,
    Rectangle,
    Obscure,
    SmartGenerate,
}

impl ToolSlot {
    const ALL: [ToolSlot; 6] = [
        ToolSlot::Select,
        ToolSlot::Text,
        ToolSlot::Image,
        ToolSlot::Rectangle,
        ToolSlot::Obscure,
        ToolSlot::SmartGenerate,
    ];

    fn label(&self) -> &'static str {
        match self {
            ToolSlot::Select => "Select (1)",
            ToolSlot::Text => "Text (2)",
            ToolSlot::Image => "Image (3)",
            ToolSlot::Rectangle => "Rectangle (4)",
            ToolSlot::Obscure => "Obscure (5)",
            ToolSlot::SmartGenerate => "Smart generate",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            ToolSlot::Select => "⬉",
            ToolSlot::Text => "T",
            ToolSlot::Image => "🖼",
            ToolSlot::Rectangle => "▭",
            ToolSlot::Obscure => "▒",
            ToolSlot::SmartGenerate => "🔍",
        }
    }

    fn matches(&self, tool: &ToolMode) -> bool {
        match (self, tool) {
            (ToolSlot::Select, ToolMode::Select) => true,
            (ToolSlot::SmartGenerate, ToolMode::SmartGenerate) => true,
            (ToolSlot::Text, ToolMode::Insert(InsertKind::Text)) => true,
            (ToolSlot::Image, ToolMode::Insert(InsertKind::Image { .. })) => true,
            (ToolSlot::Rectangle, ToolMode::Insert(InsertKind::Rectangle)) => true,
            (ToolSlot::Obscure, ToolMode::Insert(InsertKind::Obscure)) => true,
            _ => false,
        }
    }

    /// The tool this slot arms; images need a picture first
    fn mode(&self) -> Option<ToolMode> {
        match self {
            ToolSlot::Select => Some(ToolMode::Select),
            ToolSlot::Text => Some(ToolMode::Insert(InsertKind::Text)),
            ToolSlot::Image => None,
            ToolSlot::Rectangle => Some(ToolMode::Insert(InsertKind::Rectangle)),
            ToolSlot::Obscure => Some(ToolMode::Insert(InsertKind::Obscure)),
            ToolSlot::SmartGenerate => Some(ToolMode::SmartGenerate),
        }
    }
}

pub fn tools_panel(app: &mut TemplateEditorApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(false)
        .default_width(190.0)
        .show(ctx, |ui| {
            ui.heading("Tools");
            let active = app.editor.tool().clone();
            ui.horizontal_wrapped(|ui| {
                for slot in ToolSlot::ALL {
                    if ui.add(ToolButton::new(slot.label(), slot.icon(), slot.matches(&active))).clicked() {
                        info!("Tool selected from UI: {}", slot.label());
                        match slot.mode() {
                            Some(mode) => app.editor.set_tool(mode),
                            None => app.open_image_picker(PickerPurpose::Insert),
                        }
                    }
                }
            });
            ui.separator();

            ui.label("Zoom");
            ui.horizontal(|ui| {
                if ui.button("−").clicked() {
                    app.editor.viewport_mut().zoom_out();
                }
                ui.label(format!("{:.0}%", app.editor.viewport().zoom() * 100.0));
                if ui.button("+").clicked() {
                    app.editor.viewport_mut().zoom_in();
                }
                if ui.button("Reset").clicked() {
                    let viewport = app.editor.viewport_mut();
                    viewport.reset_zoom();
                    viewport.reset_pan();
                }
            });

            ui.label("Page");
            ui.horizontal(|ui| {
                let index = app.editor.page_index();
                let count = app.editor.page_count();
                if ui.add_enabled(index > 0, egui::Button::new("◀")).clicked() {
                    app.editor.previous_page();
                }
                ui.label(format!("{} / {count}", index + 1));
                if ui.add_enabled(index + 1 < count, egui::Button::new("▶")).clicked() {
                    app.editor.next_page();
                }
            });
            ui.separator();

            let selected = app.editor.selection().len();
            ui.label(format!("Selection: {selected}"));
            ui.label("Merge into:");
            ui.horizontal_wrapped(|ui| {
                for target in ElementType::ALL {
                    if ui.add_enabled(selected >= 2, egui::Button::new(target.as_str())).clicked() {
                        app.editor.merge_selection(target);
                    }
                }
            });
            ui.horizontal_wrapped(|ui| {
                if ui.add_enabled(selected == 1, egui::Button::new("To obscure")).clicked() {
                    app.editor.convert_selection_to_obscure();
                }
                if ui.add_enabled(selected > 0, egui::Button::new("Copy")).clicked() {
                    app.editor.copy_selection();
                }
                let can_paste = !app.editor.clipboard().is_empty();
                if ui.add_enabled(can_paste, egui::Button::new("Paste")).clicked() {
                    app.editor.paste();
                }
                if ui.add_enabled(selected > 0, egui::Button::new("Delete")).clicked() {
                    app.editor.delete_selected();
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                if ui.add_enabled(app.editor.can_undo(), egui::Button::new("Undo")).clicked() {
                    app.editor.undo();
                }
                if ui.button("💾 Save").clicked() {
                    app.save_template();
                }
                if ui.button("⟳ Reload images").clicked() {
                    app.reload_images();
                }
            });
            let history = app.editor.history();
            ui.label(format!("History: {} / {}", history.cursor() + 1, history.len()));
            ui.separator();

            ui.label(format!("Tool: {}", app.editor.tool().name()));
            ui.label(format!("State: {}", app.editor.state().name()));
            if app.editor.is_dirty() {
                ui.label("Unsaved changes");
            }
            if let Some(status) = app.editor.status() {
                ui.separator();
                ui.label(status);
            }
        });
}
