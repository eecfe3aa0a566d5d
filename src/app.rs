use std::path::Path;

use log::{error, info, warn};

use crate::assets::AssetResolver;
use crate::error::{TemplateError, TemplateResult};
use crate::geometry::{DEFAULT_ZOOM_INDEX, Viewport};
use crate::input::{CLIPBOARD_MARKER, EditorAction, InputHandler};
use crate::ocr::{OcrProvider, crop_region};
use crate::page_cache::PageImages;
use crate::panels::{self, ImagePicker, PanelDraft, PickerPurpose};
use crate::render::PdftoppmRasterizer;
use crate::renderer::Renderer;
use crate::state::EditorContext;
use crate::template_data::KeyCatalog;
use crate::workspace::{Workspace, stem_of};

/// Storage key for the persisted view preferences
const VIEW_SETTINGS_KEY: &str = "template_editor_view";

/// View preferences restored between runs
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Copy)]
#[serde(default)]
struct ViewSettings {
    zoom_index: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            zoom_index: DEFAULT_ZOOM_INDEX,
        }
    }
}

/// The editor window for one PDF's template
pub struct TemplateEditorApp {
    pub(crate) workspace: Workspace,
    pub(crate) stem: String,
    pub(crate) editor: EditorContext,
    pub(crate) input: InputHandler,
    pub(crate) renderer: Renderer,
    pub(crate) pages: PageImages,
    pub(crate) assets: AssetResolver,
    pub(crate) keys: KeyCatalog,
    pub(crate) ocr: Option<Box<dyn OcrProvider>>,
    pub(crate) image_picker: Option<ImagePicker>,
    pub(crate) draft: Option<PanelDraft>,
    title: String,
}

impl TemplateEditorApp {
    /// Called once before the first frame.
    ///
    /// Opens the template for `pdf`, creating one from the PDF's pages if needed.
    pub fn new(cc: &eframe::CreationContext<'_>, workspace: Workspace, pdf: &Path) -> TemplateResult<Self> {
        let stem = stem_of(pdf);
        let document = workspace.open_or_init(pdf)?;
        let config = workspace.config().clone();
        let mut editor =
            EditorContext::new(document, &config).ok_or_else(|| TemplateError::NoPages(workspace.template_path(&stem)))?;

        let settings: ViewSettings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, VIEW_SETTINGS_KEY))
            .unwrap_or_default();
        *editor.viewport_mut() = Viewport::with_zoom_index(settings.zoom_index);

        let rasterizer = PdftoppmRasterizer::new(config.temp_img_dir.clone(), config.target_height);
        info!("editing {} ({} page(s))", pdf.display(), editor.page_count());

        Ok(Self {
            assets: workspace.assets(&stem),
            keys: KeyCatalog::load(&config.template_keys_file),
            pages: PageImages::new(Box::new(rasterizer), pdf.to_path_buf(), stem.clone()),
            workspace,
            stem,
            editor,
            input: InputHandler::new(),
            renderer: Renderer::new(),
            ocr: None,
            image_picker: None,
            draft: None,
            title: String::new(),
        })
    }

    /// Plugs in a text recognition engine for smart generate
    pub fn with_ocr(mut self, provider: Box<dyn OcrProvider>) -> Self {
        self.ocr = Some(provider);
        self
    }

    pub(crate) fn handle_action(&mut self, ctx: &egui::Context, action: EditorAction) {
        match action {
            EditorAction::Save => self.save_template(),
            EditorAction::ChooseInsertImage => self.open_image_picker(PickerPurpose::Insert),
            EditorAction::ElementsCopied => ctx.copy_text(CLIPBOARD_MARKER.to_string()),
        }
    }

    pub(crate) fn open_image_picker(&mut self, purpose: PickerPurpose) {
        self.image_picker = Some(ImagePicker::new(purpose, &self.assets));
    }

    pub(crate) fn save_template(&mut self) {
        let path = self.workspace.template_path(&self.stem);
        if let Err(err) = self.editor.save(&path) {
            error!("{err}");
            self.editor.set_status(format!("Save failed: {err}"));
        }
    }

    /// Reads page backgrounds and pictures from disk again on the next frame
    pub(crate) fn reload_images(&mut self) {
        info!("reloading images for {}", self.stem);
        self.pages.clear();
        self.renderer.reset();
        self.editor.set_status("Images reloaded");
    }

    /// Scans the region a smart-generate marquee asked for
    fn run_pending_ocr(&mut self) {
        let Some(request) = self.editor.take_ocr_request() else {
            return;
        };
        let Some(provider) = self.ocr.as_ref() else {
            warn!("smart generate requested without a text recognition engine");
            self.editor.set_status("No text recognition engine configured");
            return;
        };
        let page_size = self.editor.page().size();
        let Some(page) = self.pages.load(request.page_index, page_size) else {
            self.editor.set_status("Page image unavailable for text recognition");
            return;
        };
        let detections = crop_region(page, request.region)
            .and_then(|(origin, crop)| provider.detect(&crop).map(|detections| (origin, detections)));
        match detections {
            Ok((origin, detections)) => {
                self.editor.apply_ocr_detections(request, origin, &detections);
            }
            Err(err) => {
                warn!("{err}");
                self.editor.set_status(format!("Text recognition failed: {err}"));
            }
        }
    }

    /// Keeps the merged-image picker open exactly while an image waits for content
    fn sync_pending_picker(&mut self) {
        let pending = self.editor.pending_image();
        let resolving = match self.image_picker.as_ref().map(|picker| picker.purpose) {
            Some(PickerPurpose::Resolve(index)) => Some(index),
            _ => None,
        };
        match (pending, resolving) {
            (Some(index), Some(open)) if index == open => {}
            (Some(index), _) => self.open_image_picker(PickerPurpose::Resolve(index)),
            (None, Some(_)) => self.image_picker = None,
            (None, None) => {}
        }
    }

    fn update_title(&mut self, ctx: &egui::Context) {
        let dirty = if self.editor.is_dirty() { " *" } else { "" };
        let title = format!("{}{dirty} - Template Editor", self.stem);
        if title != self.title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.title = title;
        }
    }
}

impl eframe::App for TemplateEditorApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = ViewSettings {
            zoom_index: self.editor.viewport().zoom_index(),
        };
        eframe::set_value(storage, VIEW_SETTINGS_KEY, &settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        panels::tools_panel(self, ctx);
        panels::properties_panel(self, ctx);
        panels::central_panel(self, ctx);
        self.run_pending_ocr();
        self.sync_pending_picker();
        panels::image_picker(self, ctx);
        self.editor.sync_panel();
        self.update_title(ctx);
    }
}
