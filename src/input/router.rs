use log::trace;

use super::{CLIPBOARD_MARKER, EditorAction, InputEvent};
use crate::geometry::CanvasLayout;
use crate::state::EditorContext;

/// Applies one canvas event to the editor.
///
/// `layout` maps the event's screen position into base space for this frame.
pub fn route_event(
    event: &InputEvent,
    context: &mut EditorContext,
    layout: &CanvasLayout,
    time: f64,
) -> Option<EditorAction> {
    trace!("{event:?} in {}", context.state().name());
    match event {
        InputEvent::PointerDown { position, button } => {
            context.pointer_down(layout.to_base(*position), *position, *button, time);
        }
        InputEvent::PointerMove { position } => context.pointer_move(layout.to_base(*position), *position),
        InputEvent::PointerUp { .. } => context.pointer_up(),
        InputEvent::Key { key, pressed: true, modifiers } => return context.key_pressed(*key, *modifiers, time),
        InputEvent::Key { key, pressed: false, .. } => context.key_released(*key),
        InputEvent::Text(text) => context.text_input(text),
        InputEvent::Copy => {
            if !context.state().is_text_editing() {
                return context.copy_for_clipboard();
            }
        }
        InputEvent::Paste(text) => {
            if !context.state().is_text_editing() {
                context.paste();
            } else if text != CLIPBOARD_MARKER {
                context.text_input(text);
            }
        }
        InputEvent::Zoom { steps } => {
            let viewport = context.viewport_mut();
            for _ in 0..steps.unsigned_abs() {
                if *steps > 0 {
                    viewport.zoom_in();
                } else {
                    viewport.zoom_out();
                }
            }
        }
    }
    None
}
