mod editor_state;
pub mod context;
pub mod panel;
mod text_edit;

pub use context::{Clipboard, EditorContext};
pub use editor_state::{EditorState, MarqueePurpose};
pub use panel::{PanelHandle, PanelKind};
