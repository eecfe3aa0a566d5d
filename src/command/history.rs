use crate::document::Document;

/// Default number of snapshots kept
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Snapshot history over the whole document.
///
/// Each entry is an independent deep copy, so later in-place edits of the live document
/// can never reach back into the past. `cursor` points at the snapshot that matches the
/// live document.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Document>,
    cursor: usize,
    max_len: usize,
}

impl History {
    /// Starts a history whose first entry is `initial`
    pub fn new(initial: &Document, max_len: usize) -> Self {
        Self {
            snapshots: vec![initial.clone()],
            cursor: 0,
            max_len: max_len.max(1),
        }
    }

    /// Records the current document, dropping any undone future and the oldest entries
    /// beyond the size limit.
    pub fn push(&mut self, document: &Document) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(document.clone());
        if self.snapshots.len() > self.max_len {
            let excess = self.snapshots.len() - self.max_len;
            self.snapshots.drain(..excess);
        }
        self.cursor = self.snapshots.len() - 1;
    }

    /// Steps back one snapshot and returns a copy of it, or `None` when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Option<Document> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.snapshots.get(self.cursor).cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Rewrites every recorded snapshot in place without adding an entry
    pub fn amend(&mut self, mut edit: impl FnMut(&mut Document)) {
        for snapshot in &mut self.snapshots {
            edit(snapshot);
        }
    }
}
