//! In-place editing of a text element's value.
//!
//! The element's value follows the buffer on every keystroke so the canvas shows the
//! edit live; history only sees the result when the edit ends.

use egui::Key;
use log::{debug, warn};

use super::{EditorContext, EditorState};

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(offset, _)| offset)
}

impl EditorContext {
    /// Enters text editing on `index` with the caret at the end
    pub fn begin_text_edit(&mut self, index: usize) -> bool {
        let Some(text) = self.page().element(index).and_then(|element| element.as_text()) else {
            return false;
        };
        let value = text.value.clone();
        debug!("editing text of element {index}");
        self.state = EditorState::TextEditing {
            index,
            cursor: value.chars().count(),
            buffer: value.clone(),
            original: value,
        };
        self.select([index]);
        self.arrow_repeat.clear();
        true
    }

    /// Inserts typed text at the caret
    pub fn text_input(&mut self, typed: &str) {
        let EditorState::TextEditing { buffer, cursor, .. } = &mut self.state else {
            return;
        };
        let typed: String = typed.chars().filter(|c| !c.is_control()).collect();
        if typed.is_empty() {
            return;
        }
        let at = byte_offset(buffer, *cursor);
        buffer.insert_str(at, &typed);
        *cursor += typed.chars().count();
        self.sync_text_value();
    }

    /// Editing keys; returns false for keys text editing does not use
    pub(crate) fn text_edit_key(&mut self, key: Key) -> bool {
        match key {
            Key::Enter | Key::Escape => {
                self.commit_text_edit();
                return true;
            }
            _ => {}
        }
        let EditorState::TextEditing { buffer, cursor, .. } = &mut self.state else {
            return false;
        };
        let len = buffer.chars().count();
        match key {
            Key::Backspace if *cursor > 0 => {
                *cursor -= 1;
                let at = byte_offset(buffer, *cursor);
                buffer.remove(at);
            }
            Key::Delete if *cursor < len => {
                let at = byte_offset(buffer, *cursor);
                buffer.remove(at);
            }
            Key::ArrowLeft => *cursor = cursor.saturating_sub(1),
            Key::ArrowRight => *cursor = (*cursor + 1).min(len),
            Key::Home => *cursor = 0,
            Key::End => *cursor = len,
            Key::Backspace | Key::Delete => {}
            _ => return false,
        }
        self.sync_text_value();
        true
    }

    fn sync_text_value(&mut self) {
        let EditorState::TextEditing { index, buffer, .. } = &self.state else {
            return;
        };
        let (index, value) = (*index, buffer.clone());
        match self.page_mut().element_mut(index).and_then(|element| element.as_text_mut()) {
            Some(text) => text.value = value,
            None => {
                warn!("text edit target {index} vanished; leaving text edit");
                self.state = EditorState::Idle;
            }
        }
    }

    /// Leaves text editing, recording one history step if the value changed
    pub fn commit_text_edit(&mut self) {
        let EditorState::TextEditing { index, buffer, original, .. } = std::mem::take(&mut self.state) else {
            return;
        };
        if buffer != original {
            debug!("text of element {index} changed");
            self.commit();
        }
    }

    /// Leaves text editing and puts the original value back
    pub fn cancel_text_edit(&mut self) {
        let EditorState::TextEditing { index, original, .. } = std::mem::take(&mut self.state) else {
            return;
        };
        if let Some(text) = self.page_mut().element_mut(index).and_then(|element| element.as_text_mut()) {
            text.value = original;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EditorConfig;
    use crate::document::{Document, Page};
    use crate::element::factory;
    use crate::state::{EditorContext, EditorState};
    use egui::{Key, pos2};

    fn editing(value: &str) -> EditorContext {
        let mut element = factory::create_text(pos2(0.0, 0.0));
        element.as_text_mut().unwrap().value = value.to_string();
        let document = Document {
            pages: vec![Page {
                width: 500,
                height: 500,
                elements: vec![element],
                ..Page::default()
            }],
            template_values: Vec::new(),
        };
        let mut context = EditorContext::new(document, &EditorConfig::default()).unwrap();
        assert!(context.begin_text_edit(0));
        context
    }

    fn value(context: &EditorContext) -> &str {
        &context.page().elements[0].as_text().unwrap().value
    }

    #[test]
    fn typing_and_deleting_tracks_live_value() {
        let mut context = editing("héllo");
        context.text_edit_key(Key::ArrowLeft);
        context.text_input("!");
        assert_eq!(value(&context), "héll!o");

        context.text_edit_key(Key::Home);
        context.text_edit_key(Key::Delete);
        context.text_edit_key(Key::ArrowRight);
        context.text_edit_key(Key::Backspace);
        assert_eq!(value(&context), "ll!o");
        assert_eq!(context.state().text_cursor(), Some((0, 0)));
    }

    #[test]
    fn commit_pushes_history_only_on_change() {
        let mut context = editing("a");
        context.text_edit_key(Key::Enter);
        assert_eq!(context.state(), &EditorState::Idle);
        assert_eq!(context.history().len(), 1);

        assert!(context.begin_text_edit(0));
        context.text_input("b");
        context.text_edit_key(Key::Escape);
        assert_eq!(context.history().len(), 2);
        assert_eq!(value(&context), "ab");
    }

    #[test]
    fn undo_during_edit_restores_original() {
        let mut context = editing("keep");
        context.text_input(" me");
        assert!(context.undo());
        assert_eq!(value(&context), "keep");
        assert!(context.state().is_idle());
        assert_eq!(context.history().len(), 1);
    }
}
