/// The editing session for one template.
///
/// `EditorContext` owns the live document and everything the interaction state machine
/// needs around it: the current page, selection, active gesture, tool, viewport,
/// snapshot history, clipboard and the open property panel. Pointer handling lives in
/// `tools`, keyboard handling in `input`; both only reach the document through the
/// methods here, so every completed edit ends in exactly one history snapshot.
///
/// ```rust,no_run
/// use doc_templater::{Document, EditorConfig, EditorContext};
/// # fn run(document: Document) {
/// let config = EditorConfig::default();
/// let mut context = EditorContext::new(document, &config).expect("template has pages");
/// context.select_all();
/// context.delete_selected();
/// context.undo();
/// # }
/// ```
use std::path::Path;

use egui::{Pos2, Vec2, vec2};
use log::{debug, info, warn};

use super::panel::{PanelHandle, PanelKind};
use super::EditorState;
use crate::command::{Command, History, PropertyChange, merge};
use crate::config::EditorConfig;
use crate::document::{Document, Page};
use crate::element::{Element, ElementType};
use crate::error::{CommandResult, TemplateResult};
use crate::geometry::Viewport;
use crate::input::ArrowRepeat;
use crate::ocr::{Detection, OcrRequest, place_detections};
use crate::selection::Selection;
use crate::tools::ToolMode;

/// Vertical gap between pasted copies and their originals
pub const PASTE_SPACING: f32 = 5.0;
/// Paste offset used when the first copied element has no usable height
pub const PASTE_FALLBACK_OFFSET: f32 = 20.0;
/// Marquees smaller than this on screen count as plain clicks
pub const MIN_MARQUEE_SCREEN_SIZE: f32 = 2.0;

/// Snapshot of copied elements and where they came from
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    pub elements: Vec<Element>,
    pub source_indices: Vec<usize>,
}

impl Clipboard {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// The element a previous click selected, for double-click detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LastClick {
    pub index: usize,
    pub time: f64,
}

#[derive(Debug)]
pub struct EditorContext {
    pub(crate) document: Document,
    pub(crate) page_index: usize,
    pub(crate) selection: Selection,
    pub(crate) state: EditorState,
    pub(crate) tool: ToolMode,
    pub(crate) viewport: Viewport,
    pub(crate) history: History,
    pub(crate) clipboard: Clipboard,
    pub(crate) active_panel: Option<PanelHandle>,
    pub(crate) last_click: Option<LastClick>,
    pub(crate) arrow_repeat: ArrowRepeat,
    pub(crate) pending_ocr: Option<OcrRequest>,
    pub(crate) config: EditorConfig,
    dirty: bool,
    status: Option<String>,
}

impl EditorContext {
    /// Starts a session on `document`; `None` when it has no pages to edit.
    pub fn new(document: Document, config: &EditorConfig) -> Option<Self> {
        if document.pages.is_empty() {
            warn!("refusing to edit a template without pages");
            return None;
        }
        let history = History::new(&document, config.max_history);
        Some(Self {
            document,
            page_index: 0,
            selection: Selection::new(),
            state: EditorState::Idle,
            tool: ToolMode::Select,
            viewport: Viewport::default(),
            history,
            clipboard: Clipboard::default(),
            active_panel: None,
            last_click: None,
            arrow_repeat: ArrowRepeat::new(config.key_repeat_delay, config.key_repeat_interval),
            pending_ocr: None,
            config: config.clone(),
            dirty: false,
            status: None,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_count(&self) -> usize {
        self.document.pages.len()
    }

    /// The page being edited. `page_index` is always kept inside the page list.
    pub fn page(&self) -> &Page {
        &self.document.pages[self.page_index]
    }

    pub(crate) fn page_mut(&mut self) -> &mut Page {
        &mut self.document.pages[self.page_index]
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn tool(&self) -> &ToolMode {
        &self.tool
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn active_panel(&self) -> Option<&PanelHandle> {
        self.active_panel.as_ref()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// True when the document changed since it was loaded or last saved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub(crate) fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!("status: {message}");
        self.status = Some(message);
    }

    /// Runs a command against the current page and records the result.
    ///
    /// On error nothing changes: no snapshot, same selection.
    pub fn execute(&mut self, command: Command) -> CommandResult<()> {
        let name = command.name();
        let selection = command.execute(self.page_mut())?;
        debug!("executed {name} on page {}", self.page_index);
        self.selection = selection;
        self.commit();
        self.sync_panel();
        Ok(())
    }

    /// Like [`execute`](Self::execute), but failures become a warning and a status line
    pub(crate) fn run(&mut self, command: Command) -> bool {
        let name = command.name();
        match self.execute(command) {
            Ok(()) => true,
            Err(err) => {
                warn!("{name} failed: {err}");
                self.set_status(format!("Cannot {name}: {err}"));
                false
            }
        }
    }

    /// Records the live document as one history step
    pub(crate) fn commit(&mut self) {
        self.history.push(&self.document);
        self.dirty = true;
    }

    /// Steps the document back one snapshot.
    ///
    /// An uncommitted text edit is reverted first and counts as the undo. Returns
    /// false when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.state.is_text_editing() {
            self.cancel_text_edit();
            return true;
        }
        let Some(document) = self.history.undo() else {
            info!("nothing to undo");
            self.set_status("Nothing to undo");
            return false;
        };
        self.document = document;
        self.page_index = self.page_index.min(self.document.pages.len().saturating_sub(1));
        self.selection.clear();
        self.state = EditorState::Idle;
        self.active_panel = None;
        self.pending_ocr = None;
        self.last_click = None;
        self.arrow_repeat.clear();
        self.dirty = true;
        info!("undo: history cursor at {}", self.history.cursor());
        self.set_status("Undone");
        true
    }

    pub fn can_undo(&self) -> bool {
        self.state.is_text_editing() || self.history.can_undo()
    }

    pub fn delete_selected(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let indices = self.selection.indices().to_vec();
        self.run(Command::Delete(indices))
    }

    /// Copies the selected elements by value
    pub fn copy_selection(&mut self) -> usize {
        let page = &self.document.pages[self.page_index];
        let source_indices: Vec<usize> = self
            .selection
            .indices()
            .iter()
            .copied()
            .filter(|&index| index < page.elements.len())
            .collect();
        if source_indices.is_empty() {
            return 0;
        }
        let elements = source_indices.iter().map(|&index| page.elements[index].clone()).collect();
        self.clipboard = Clipboard { elements, source_indices };
        let count = self.clipboard.elements.len();
        self.set_status(format!("Copied {count} element(s)"));
        count
    }

    /// Inserts the clipboard below its originals, right after the last copied index
    pub fn paste(&mut self) -> bool {
        let Some(first) = self.clipboard.elements.first() else {
            self.set_status("Clipboard is empty");
            return false;
        };
        let offset = if first.height.is_finite() && first.height > 0.0 {
            first.height + PASTE_SPACING
        } else {
            PASTE_FALLBACK_OFFSET
        };
        let elements: Vec<Element> = self
            .clipboard
            .elements
            .iter()
            .map(|element| {
                let mut copy = element.clone();
                copy.translate(vec2(0.0, offset));
                copy
            })
            .collect();
        let at = self.clipboard.source_indices.iter().max().map_or(0, |&max| max + 1);
        self.run(Command::Paste { elements, at })
    }

    pub fn select_all(&mut self) {
        self.selection = Selection::from_indices(0..self.page().elements.len());
        self.sync_panel();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.sync_panel();
    }

    /// Replaces the selection, dropping indices that are not on the page
    pub fn select(&mut self, indices: impl IntoIterator<Item = usize>) {
        let len = self.page().elements.len();
        self.selection = Selection::from_indices(indices.into_iter().filter(|&index| index < len));
        self.sync_panel();
    }

    /// Moves the selection by `delta` base units as one history step
    pub fn nudge(&mut self, delta: Vec2) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let indices = self.selection.indices().to_vec();
        self.run(Command::Nudge { indices, delta })
    }

    pub fn merge_selection(&mut self, target: ElementType) -> bool {
        let indices = self.selection.indices().to_vec();
        let merged = self.run(Command::Merge { indices, target });
        if merged && target == ElementType::Image {
            self.set_status("Choose an image for the merged element");
        }
        merged
    }

    pub fn convert_selection_to_obscure(&mut self) -> bool {
        match self.selection.only() {
            Some(index) => self.run(Command::ConvertToObscure(index)),
            None => {
                self.set_status("Select exactly one text element to convert");
                false
            }
        }
    }

    pub fn set_property(&mut self, index: usize, change: PropertyChange) -> bool {
        self.run(Command::SetProperty { index, change })
    }

    /// The merged image on this page still waiting for its picture
    pub fn pending_image(&self) -> Option<usize> {
        self.page().elements.iter().position(Element::is_awaiting_content)
    }

    pub fn resolve_pending_image(&mut self, path: &str, natural_size: Vec2) -> bool {
        let Some(index) = self.pending_image() else {
            return false;
        };
        self.run(Command::ResolveImage {
            index,
            path: path.to_string(),
            natural_size,
        })
    }

    /// Leaves the pending image without content; the merge itself stays recorded.
    ///
    /// Recorded snapshots lose the marker too, so undoing later edits cannot bring the
    /// picker back.
    pub fn cancel_pending_image(&mut self) -> bool {
        let Some(index) = self.pending_image() else {
            return false;
        };
        match merge::cancel_image(self.page_mut(), index) {
            Ok(()) => {
                let page_index = self.page_index;
                self.history.amend(|document| {
                    if let Some(page) = document.pages.get_mut(page_index) {
                        merge::settle_pending_images(page);
                    }
                });
                self.dirty = true;
                info!("image choice for element {index} cancelled; element kept empty");
                true
            }
            Err(err) => {
                warn!("cancel image failed: {err}");
                false
            }
        }
    }

    /// Context-sensitive unwind: text edit, then tool mode, then selection
    pub fn escape(&mut self) {
        if self.state.is_text_editing() {
            self.commit_text_edit();
        } else if !self.state.is_idle() {
            debug!("escape ends {}", self.state.name());
            self.finish_gesture();
        } else if self.tool != ToolMode::Select {
            debug!("escape leaves {} tool", self.tool.name());
            self.tool = ToolMode::Select;
        } else {
            self.clear_selection();
        }
    }

    pub fn set_tool(&mut self, tool: ToolMode) {
        if self.state.is_text_editing() {
            self.commit_text_edit();
        }
        if !self.state.is_idle() {
            self.finish_gesture();
        }
        debug!("tool: {} -> {}", self.tool.name(), tool.name());
        self.tool = tool;
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page_index.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> bool {
        match self.page_index.checked_sub(1) {
            Some(index) => self.go_to_page(index),
            None => false,
        }
    }

    /// Switches pages, saturating at the ends. Returns false when nothing changed.
    pub fn go_to_page(&mut self, index: usize) -> bool {
        let index = index.min(self.page_count() - 1);
        if index == self.page_index {
            return false;
        }
        if self.state.is_text_editing() {
            self.commit_text_edit();
        }
        self.state = EditorState::Idle;
        self.page_index = index;
        self.selection.clear();
        self.active_panel = None;
        self.last_click = None;
        self.arrow_repeat.clear();
        self.viewport.reset_pan();
        info!("page {} of {}", index + 1, self.page_count());
        true
    }

    /// Writes the document and marks the session clean
    pub fn save(&mut self, path: &Path) -> TemplateResult<()> {
        if self.state.is_text_editing() {
            self.commit_text_edit();
        }
        self.document.save(path)?;
        self.dirty = false;
        self.set_status(format!("Saved {}", path.display()));
        Ok(())
    }

    /// The region a smart-generate marquee asked to scan, if any
    pub fn take_ocr_request(&mut self) -> Option<OcrRequest> {
        self.pending_ocr.take()
    }

    /// Adds one text element per detection. `origin` is the base-space corner of the
    /// scanned crop.
    pub fn apply_ocr_detections(&mut self, request: OcrRequest, origin: Pos2, detections: &[Detection]) -> usize {
        if request.page_index != self.page_index {
            warn!(
                "discarding text detections for page {}; page {} is open",
                request.page_index + 1,
                self.page_index + 1
            );
            return 0;
        }
        let elements = place_detections(origin, detections);
        let count = elements.len();
        if count == 0 {
            self.set_status("No text found in region");
            return 0;
        }
        if self.run(Command::InsertMany(elements)) {
            self.set_status(format!("Added {count} text field(s)"));
            count
        } else {
            0
        }
    }

    /// Opens, keeps or closes the property panel to match the selection
    pub fn sync_panel(&mut self) {
        let wanted = self.selection.only().and_then(|index| {
            let element = self.page().element(index)?;
            PanelKind::for_element(element.element_type()).map(|kind| (kind, index))
        });
        match (wanted, &self.active_panel) {
            (Some((kind, index)), Some(panel)) if panel.kind == kind && panel.element == index => {}
            (Some((kind, index)), _) => {
                debug!("opening {} for element {index}", kind.title());
                self.active_panel = Some(PanelHandle::new(kind, index));
            }
            (None, _) => self.active_panel = None,
        }
    }

    /// Ends any pointer gesture, keeping whatever geometry it produced so far
    pub(crate) fn finish_gesture(&mut self) {
        let state = std::mem::take(&mut self.state);
        let changed = match state {
            EditorState::Dragging { index, start_pos, .. } => {
                self.page().element(index).is_some_and(|element| element.position() != start_pos)
            }
            EditorState::Resizing { index, orig, .. } => {
                self.page().element(index).is_some_and(|element| element.rect() != orig)
            }
            EditorState::FontResizing { index, orig_size, .. } => self
                .page()
                .element(index)
                .and_then(Element::as_text)
                .is_some_and(|text| text.font_size != orig_size),
            EditorState::TextEditing { .. } => {
                self.state = state;
                self.commit_text_edit();
                return;
            }
            EditorState::Idle | EditorState::MarqueeSelecting { .. } | EditorState::PanningCanvas { .. } => false,
        };
        if changed {
            self.commit();
        }
    }
}
