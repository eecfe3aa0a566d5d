use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect};

mod key_repeat;
mod keyboard;
mod router;

pub use key_repeat::{ArrowRepeat, NUDGE_STEP, NUDGE_STEP_LARGE, arrow_direction};
pub use keyboard::{CLIPBOARD_MARKER, EditorAction};
pub use router::route_event;

/// Canvas input, already stripped of everything the editor does not react to
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A button went down over the canvas; screen coordinates
    PointerDown { position: Pos2, button: PointerButton },
    PointerMove { position: Pos2 },
    PointerUp { position: Pos2, button: PointerButton },
    /// A physical press or release; toolkit auto-repeat is never forwarded
    Key { key: Key, pressed: bool, modifiers: Modifiers },
    Text(String),
    /// The platform turned the copy shortcut into a clipboard event
    Copy,
    /// The platform turned the paste shortcut into a clipboard event
    Paste(String),
    /// Ctrl+scroll; positive zooms in
    Zoom { steps: i32 },
}

/// Turns raw egui input into [`InputEvent`]s for the canvas
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects this frame's events.
    ///
    /// Presses only count when they land inside `canvas_rect` and nothing else has
    /// the pointer; moves and releases are always reported so gestures can end off
    /// the canvas. Keyboard events are skipped while a widget has keyboard focus.
    pub fn process_input(&mut self, ctx: &Context, canvas_rect: Rect, canvas_hovered: bool) -> Vec<InputEvent> {
        let wants_keyboard = ctx.wants_keyboard_input();
        let mut events = Vec::new();

        ctx.input(|input| {
            let hover = input.pointer.hover_pos();
            if let Some(pos) = hover {
                if Some(pos) != self.last_pointer_pos {
                    events.push(InputEvent::PointerMove { position: pos });
                }
            }
            self.last_pointer_pos = hover.or(self.last_pointer_pos);

            let press_pos = input.pointer.interact_pos().or(self.last_pointer_pos);
            for button in [PointerButton::Primary, PointerButton::Secondary, PointerButton::Middle] {
                if let Some(pos) = press_pos {
                    if input.pointer.button_pressed(button) && canvas_hovered && canvas_rect.contains(pos) {
                        events.push(InputEvent::PointerDown { position: pos, button });
                    }
                    if input.pointer.button_released(button) {
                        events.push(InputEvent::PointerUp { position: pos, button });
                    }
                }
            }

            for event in &input.events {
                match event {
                    egui::Event::MouseWheel { delta, modifiers, .. } if modifiers.command && canvas_hovered => {
                        if delta.y > 0.0 {
                            events.push(InputEvent::Zoom { steps: 1 });
                        } else if delta.y < 0.0 {
                            events.push(InputEvent::Zoom { steps: -1 });
                        }
                    }
                    _ if wants_keyboard => {}
                    egui::Event::Key { key, pressed, repeat, modifiers, .. } if !repeat => {
                        events.push(InputEvent::Key {
                            key: *key,
                            pressed: *pressed,
                            modifiers: *modifiers,
                        });
                    }
                    egui::Event::Text(text) => events.push(InputEvent::Text(text.clone())),
                    egui::Event::Copy => events.push(InputEvent::Copy),
                    egui::Event::Paste(text) => events.push(InputEvent::Paste(text.clone())),
                    _ => {}
                }
            }
        });

        events
    }
}
