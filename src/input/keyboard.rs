use egui::{Key, Modifiers};
use log::debug;

use super::key_repeat::{NUDGE_STEP, NUDGE_STEP_LARGE, arrow_direction};
use crate::state::EditorContext;
use crate::tools::{InsertKind, ToolMode};

/// Text left on the system clipboard after an element copy. Paste shortcuts only
/// reach the canvas while the system clipboard holds text.
pub const CLIPBOARD_MARKER: &str = "doc_templater: copied elements";

/// Requests the editor cannot fulfil on its own and hands to the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Save,
    /// The image tool needs a picture chosen first
    ChooseInsertImage,
    /// Elements were copied; the system clipboard should hold [`CLIPBOARD_MARKER`]
    ElementsCopied,
}

fn nudge_step(modifiers: Modifiers) -> f32 {
    if modifiers.shift { NUDGE_STEP_LARGE } else { NUDGE_STEP }
}

impl EditorContext {
    /// A key went down. Toolkit auto-repeat must be filtered out by the caller;
    /// arrows repeat through [`tick`](Self::tick) instead.
    pub fn key_pressed(&mut self, key: Key, modifiers: Modifiers, now: f64) -> Option<EditorAction> {
        if self.state.is_text_editing() {
            self.text_edit_key(key);
            return None;
        }

        if modifiers.command {
            match key {
                Key::Z => {
                    self.undo();
                }
                Key::A => self.select_all(),
                Key::C => return self.copy_for_clipboard(),
                Key::V => {
                    self.paste();
                }
                Key::S => return Some(EditorAction::Save),
                _ => {}
            }
            return None;
        }

        if let Some(direction) = arrow_direction(key) {
            if self.state.is_idle() && !self.selection.is_empty() {
                self.nudge(direction * nudge_step(modifiers));
                self.arrow_repeat.press(key, now);
            }
            return None;
        }

        match key {
            Key::Delete | Key::Backspace => {
                self.delete_selected();
            }
            Key::Escape => self.escape(),
            Key::Num1 => self.set_tool(ToolMode::Select),
            Key::Num2 => self.set_tool(ToolMode::Insert(InsertKind::Text)),
            Key::Num3 => return Some(EditorAction::ChooseInsertImage),
            Key::Num4 => self.set_tool(ToolMode::Insert(InsertKind::Rectangle)),
            Key::Num5 => self.set_tool(ToolMode::Insert(InsertKind::Obscure)),
            Key::PageDown => {
                self.next_page();
            }
            Key::PageUp => {
                self.previous_page();
            }
            _ => {}
        }
        None
    }

    /// Copies the selection and asks for the clipboard marker when anything was copied
    pub(crate) fn copy_for_clipboard(&mut self) -> Option<EditorAction> {
        (self.copy_selection() > 0).then_some(EditorAction::ElementsCopied)
    }

    pub fn key_released(&mut self, key: Key) {
        self.arrow_repeat.release(key);
    }

    /// Per-frame clock: fires arrow auto-repeat moves that are due
    pub fn tick(&mut self, now: f64, modifiers: Modifiers) {
        if self.arrow_repeat.held_key().is_none() {
            return;
        }
        if !self.state.is_idle() || self.selection.is_empty() {
            self.arrow_repeat.clear();
            return;
        }
        if let Some(direction) = self.arrow_repeat.poll(now).and_then(arrow_direction) {
            debug!("arrow repeat");
            self.nudge(direction * nudge_step(modifiers));
        }
    }
}
