//! Tool modes and pointer dispatch.
//!
//! The active [`ToolMode`] decides what a left press on the canvas does; the
//! handlers for each mode are `impl EditorContext` blocks in the submodules. All
//! positions arrive twice: in base space for geometry and in screen space for panning.

use egui::{PointerButton, Pos2, Vec2};
use log::debug;

use crate::element::{Element, factory};
use crate::state::{EditorContext, EditorState};

mod insert_tool;
mod selection_tool;
mod smart_generate;

/// What the next canvas click does
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ToolMode {
    #[default]
    Select,
    /// Place one new element, then fall back to `Select`
    Insert(InsertKind),
    /// Draw a region to scan for text
    SmartGenerate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertKind {
    Text,
    /// `path` is relative to the image input directory
    Image { path: String, natural_size: Option<Vec2> },
    Rectangle,
    Obscure,
}

impl ToolMode {
    pub fn name(&self) -> &'static str {
        match self {
            ToolMode::Select => "select",
            ToolMode::Insert(kind) => kind.name(),
            ToolMode::SmartGenerate => "smart generate",
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, ToolMode::Insert(_))
    }
}

impl InsertKind {
    pub fn name(&self) -> &'static str {
        match self {
            InsertKind::Text => "insert text",
            InsertKind::Image { .. } => "insert image",
            InsertKind::Rectangle => "insert rectangle",
            InsertKind::Obscure => "insert obscure",
        }
    }

    /// The element this tool places with its top-left corner at `at`
    pub fn create(&self, at: Pos2) -> Element {
        match self {
            InsertKind::Text => factory::create_text(at),
            InsertKind::Image { path, natural_size } => factory::create_image(at, path, *natural_size),
            InsertKind::Rectangle => factory::create_rectangle(at),
            InsertKind::Obscure => factory::create_obscure(at),
        }
    }
}

impl EditorContext {
    /// A button went down on the canvas
    pub fn pointer_down(&mut self, base: Pos2, screen: Pos2, button: PointerButton, time: f64) {
        match button {
            PointerButton::Secondary | PointerButton::Middle => {
                if !self.tool.is_insert() && !self.state.is_text_editing() {
                    debug!("panning from {screen:?}");
                    self.state = EditorState::PanningCanvas {
                        start_screen: screen,
                        start_pan: self.viewport.pan,
                    };
                }
            }
            PointerButton::Primary => {
                if self.state.is_text_editing() {
                    self.commit_text_edit();
                }
                match self.tool.clone() {
                    ToolMode::Select => self.select_pointer_down(base, time),
                    ToolMode::Insert(kind) => self.insert_at(&kind, base),
                    ToolMode::SmartGenerate => self.begin_region_scan(base),
                }
            }
            PointerButton::Extra1 | PointerButton::Extra2 => {}
        }
    }

    /// The pointer moved; updates whatever gesture is active
    pub fn pointer_move(&mut self, base: Pos2, screen: Pos2) {
        if matches!(
            self.state,
            EditorState::Dragging { .. } | EditorState::Resizing { .. } | EditorState::FontResizing { .. }
        ) {
            self.drag_to(base);
            return;
        }
        match &mut self.state {
            EditorState::MarqueeSelecting { current, .. } => *current = base,
            EditorState::PanningCanvas { start_screen, start_pan } => {
                self.viewport.pan = *start_pan + (screen - *start_screen);
            }
            _ => {}
        }
    }

    /// The button was released; ends the active gesture
    pub fn pointer_up(&mut self) {
        match &self.state {
            EditorState::MarqueeSelecting { .. } => self.finish_marquee(),
            EditorState::TextEditing { .. } => {}
            _ => self.finish_gesture(),
        }
    }
}
