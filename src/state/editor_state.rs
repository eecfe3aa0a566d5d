/// The interaction state machine of the template editor.
///
/// Exactly one state is active at a time. Pointer-down in the select tool leaves
/// `Idle` for one of the gesture states, pointer-up returns to `Idle`:
///
/// ```text
///              ┌──────────────► Dragging ──────────────┐
///              ├──────────────► Resizing ──────────────┤
///   ┌──────┐   ├──────────────► FontResizing ──────────┤   ┌──────┐
///   │ Idle ├───┼──────────────► MarqueeSelecting ──────┼───► Idle │
///   └──────┘   ├──────────────► PanningCanvas ─────────┤   └──────┘
///              └─ double click ► TextEditing ─ Enter/Esc┘
/// ```
///
/// Each gesture state records where it started, so every pointer move is computed
/// from the origin rather than accumulated.
use egui::{Pos2, Rect, Vec2};

use crate::element::Handle;
use crate::geometry::marquee_rect;

/// What a marquee drag is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarqueePurpose {
    /// Select every element it overlaps
    Select,
    /// Scan the region for text
    Recognize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditorState {
    #[default]
    Idle,
    /// Moving one element with the pointer
    Dragging {
        index: usize,
        start_mouse: Pos2,
        start_pos: Pos2,
    },
    /// Dragging a box handle
    Resizing {
        index: usize,
        handle: Handle,
        orig: Rect,
        start_mouse: Pos2,
    },
    /// Dragging the font size handle of a text element
    FontResizing {
        index: usize,
        orig_size: u32,
        start_mouse: Pos2,
    },
    /// Rubber-band rectangle in base space
    MarqueeSelecting {
        start: Pos2,
        current: Pos2,
        purpose: MarqueePurpose,
    },
    /// Panning with the middle or right button, in screen space
    PanningCanvas { start_screen: Pos2, start_pan: Vec2 },
    /// Typing into a text element; `cursor` counts characters
    TextEditing {
        index: usize,
        buffer: String,
        cursor: usize,
        original: String,
    },
}

impl EditorState {
    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Idle => "idle",
            EditorState::Dragging { .. } => "dragging",
            EditorState::Resizing { .. } => "resizing",
            EditorState::FontResizing { .. } => "font resizing",
            EditorState::MarqueeSelecting { .. } => "marquee",
            EditorState::PanningCanvas { .. } => "panning",
            EditorState::TextEditing { .. } => "text editing",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    pub fn is_text_editing(&self) -> bool {
        matches!(self, EditorState::TextEditing { .. })
    }

    /// Index of the element a gesture or text edit is working on
    pub fn active_element(&self) -> Option<usize> {
        match self {
            EditorState::Dragging { index, .. }
            | EditorState::Resizing { index, .. }
            | EditorState::FontResizing { index, .. }
            | EditorState::TextEditing { index, .. } => Some(*index),
            EditorState::Idle | EditorState::MarqueeSelecting { .. } | EditorState::PanningCanvas { .. } => None,
        }
    }

    /// The marquee rectangle in base space while one is being drawn
    pub fn marquee(&self) -> Option<(Rect, MarqueePurpose)> {
        match self {
            EditorState::MarqueeSelecting { start, current, purpose } => Some((marquee_rect(*start, *current), *purpose)),
            _ => None,
        }
    }

    /// Caret position while editing text
    pub fn text_cursor(&self) -> Option<(usize, usize)> {
        match self {
            EditorState::TextEditing { index, cursor, .. } => Some((*index, *cursor)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn marquee_is_normalised() {
        let state = EditorState::MarqueeSelecting {
            start: pos2(50.0, 50.0),
            current: pos2(10.0, 70.0),
            purpose: MarqueePurpose::Select,
        };
        let (rect, purpose) = state.marquee().unwrap();
        assert_eq!(rect, Rect::from_min_max(pos2(10.0, 50.0), pos2(50.0, 70.0)));
        assert_eq!(purpose, MarqueePurpose::Select);
        assert_eq!(state.active_element(), None);
    }

    #[test]
    fn gesture_states_report_their_element() {
        let state = EditorState::FontResizing { index: 3, orig_size: 12, start_mouse: Pos2::ZERO };
        assert_eq!(state.active_element(), Some(3));
        assert!(!state.is_idle());
        assert_eq!(EditorState::default(), EditorState::Idle);
    }
}
