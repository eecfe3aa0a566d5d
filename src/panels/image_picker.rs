use std::path::PathBuf;

use log::{info, warn};

use crate::TemplateEditorApp;
use crate::assets::{AssetResolver, natural_size};
use crate::command::PropertyChange;
use crate::tools::{InsertKind, ToolMode};

/// What the chosen picture is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerPurpose {
    /// Arm the image insert tool with it
    Insert,
    /// Fill the merged image at this index
    Resolve(usize),
    /// Replace the picture of the image at this index
    Replace(usize),
}

/// Image chooser listing the shared image directory
#[derive(Debug, Clone)]
pub struct ImagePicker {
    pub purpose: PickerPurpose,
    images: Vec<PathBuf>,
    filter: String,
}

impl ImagePicker {
    pub fn new(purpose: PickerPurpose, assets: &AssetResolver) -> Self {
        Self {
            purpose,
            images: assets.list_images(),
            filter: String::new(),
        }
    }

    /// Images whose file name contains the filter, ignoring case
    pub fn visible(&self) -> Vec<&PathBuf> {
        let filter = self.filter.to_lowercase();
        self.images
            .iter()
            .filter(|path| {
                path.file_name()
                    .is_some_and(|name| name.to_string_lossy().to_lowercase().contains(&filter))
            })
            .collect()
    }

    fn title(&self) -> &'static str {
        match self.purpose {
            PickerPurpose::Insert => "Insert image",
            PickerPurpose::Resolve(_) => "Choose image for merged area",
            PickerPurpose::Replace(_) => "Replace image",
        }
    }
}

enum PickerOutcome {
    Chosen(PathBuf),
    Cancelled,
}

pub fn image_picker(app: &mut TemplateEditorApp, ctx: &egui::Context) {
    let image_dir = app.assets.image_dir().display().to_string();
    let Some(picker) = app.image_picker.as_mut() else {
        return;
    };
    let purpose = picker.purpose;
    let mut outcome = None;
    let mut open = true;

    egui::Window::new(picker.title())
        .collapsible(false)
        .resizable(true)
        .open(&mut open)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Filter:");
                ui.text_edit_singleline(&mut picker.filter);
            });
            ui.separator();
            egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                let visible = picker.visible();
                if visible.is_empty() {
                    ui.label(format!("No images in {image_dir}"));
                }
                for path in visible {
                    let name = path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    if ui.selectable_label(false, name).clicked() {
                        outcome = Some(PickerOutcome::Chosen(path.clone()));
                    }
                }
            });
            ui.separator();
            if ui.button("Cancel").clicked() {
                outcome = Some(PickerOutcome::Cancelled);
            }
        });

    if !open {
        outcome = Some(PickerOutcome::Cancelled);
    }
    match outcome {
        Some(PickerOutcome::Chosen(path)) => {
            app.image_picker = None;
            choose(app, purpose, path);
        }
        Some(PickerOutcome::Cancelled) => {
            app.image_picker = None;
            if let PickerPurpose::Resolve(_) = purpose {
                app.editor.cancel_pending_image();
            }
        }
        None => {}
    }
}

fn choose(app: &mut TemplateEditorApp, purpose: PickerPurpose, path: PathBuf) {
    let value = app.assets.relative_value(&path);
    let size = natural_size(&path);
    info!("picked {} for {purpose:?}", path.display());
    match purpose {
        PickerPurpose::Insert => app.editor.set_tool(ToolMode::Insert(InsertKind::Image {
            path: value,
            natural_size: size,
        })),
        PickerPurpose::Resolve(_) => match size {
            Some(size) => {
                app.editor.resolve_pending_image(&value, size);
            }
            None => {
                warn!("{} has no readable size; leaving the merged area empty", path.display());
                app.editor.cancel_pending_image();
                app.editor.set_status(format!("Could not read {}", path.display()));
            }
        },
        PickerPurpose::Replace(index) => {
            app.editor.set_property(index, PropertyChange::Value(value));
        }
    }
}
