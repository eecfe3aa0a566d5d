use egui::{Key, Vec2, vec2};

/// Base units moved per arrow press, and with shift held
pub const NUDGE_STEP: f32 = 1.0;
pub const NUDGE_STEP_LARGE: f32 = 10.0;

/// Unit offset for an arrow key
pub fn arrow_direction(key: Key) -> Option<Vec2> {
    match key {
        Key::ArrowLeft => Some(vec2(-1.0, 0.0)),
        Key::ArrowRight => Some(vec2(1.0, 0.0)),
        Key::ArrowUp => Some(vec2(0.0, -1.0)),
        Key::ArrowDown => Some(vec2(0.0, 1.0)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct HeldArrow {
    key: Key,
    pressed_at: f64,
    last_fired: f64,
}

/// Auto-repeat for a held arrow key, driven by the frame clock.
///
/// The press itself moves immediately (the caller handles that); repeats start once the
/// key has been held for `delay` seconds and then fire at most every `interval`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowRepeat {
    held: Option<HeldArrow>,
    delay: f64,
    interval: f64,
}

impl ArrowRepeat {
    pub fn new(delay: f64, interval: f64) -> Self {
        Self {
            held: None,
            delay,
            interval,
        }
    }

    pub fn press(&mut self, key: Key, now: f64) {
        if arrow_direction(key).is_some() {
            self.held = Some(HeldArrow {
                key,
                pressed_at: now,
                last_fired: now,
            });
        }
    }

    pub fn release(&mut self, key: Key) {
        if self.held.is_some_and(|held| held.key == key) {
            self.held = None;
        }
    }

    pub fn clear(&mut self) {
        self.held = None;
    }

    pub fn held_key(&self) -> Option<Key> {
        self.held.map(|held| held.key)
    }

    /// Returns the held key if a repeat is due at `now`
    pub fn poll(&mut self, now: f64) -> Option<Key> {
        let held = self.held.as_mut()?;
        if now - held.pressed_at >= self.delay && now - held.last_fired >= self.interval {
            held.last_fired = now;
            Some(held.key)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeats_after_delay_at_interval() {
        let mut repeat = ArrowRepeat::new(0.3, 0.05);
        repeat.press(Key::ArrowLeft, 10.0);
        assert_eq!(repeat.poll(10.1), None);
        assert_eq!(repeat.poll(10.29), None);
        assert_eq!(repeat.poll(10.3), Some(Key::ArrowLeft));
        assert_eq!(repeat.poll(10.32), None);
        assert_eq!(repeat.poll(10.36), Some(Key::ArrowLeft));
    }

    #[test]
    fn release_stops_only_the_held_key() {
        let mut repeat = ArrowRepeat::new(0.3, 0.05);
        repeat.press(Key::ArrowUp, 0.0);
        repeat.release(Key::ArrowDown);
        assert_eq!(repeat.held_key(), Some(Key::ArrowUp));
        repeat.release(Key::ArrowUp);
        assert_eq!(repeat.poll(5.0), None);
    }

    #[test]
    fn non_arrow_keys_are_ignored() {
        let mut repeat = ArrowRepeat::new(0.3, 0.05);
        repeat.press(Key::A, 0.0);
        assert_eq!(repeat.held_key(), None);
    }
}
