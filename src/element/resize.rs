//! Geometry laws for handle drags.
//!
//! All functions are pure: they take the box (or font size) recorded when the drag
//! started plus the pointer travel since then, and return the new value. Applying the
//! result to the element is left to the caller.

use egui::{Pos2, Rect, Vec2, pos2, vec2};

use super::common::{FONT_RESIZE_SENSITIVITY, MIN_ELEMENT_SIZE, clamp_font_size};
use super::Handle;

/// New box for a drag of `handle` by `delta` starting from `orig`.
///
/// With `keep_aspect` (image elements) the dragged dimension drives the other through
/// the original aspect ratio and the box stays centred on the orthogonal axis. Without
/// it only the dragged edge moves. Both dimensions are floored at [`MIN_ELEMENT_SIZE`].
/// The font size handle leaves the box unchanged.
pub fn resize_box(orig: Rect, handle: Handle, delta: Vec2, keep_aspect: bool) -> Rect {
    if keep_aspect {
        resize_keeping_aspect(orig, handle, delta)
    } else {
        resize_free(orig, handle, delta)
    }
}

fn resize_free(orig: Rect, handle: Handle, delta: Vec2) -> Rect {
    let (mut x, mut y, mut w, mut h) = (orig.min.x, orig.min.y, orig.width(), orig.height());
    match handle {
        Handle::North => {
            y = orig.min.y + delta.y;
            h = orig.height() - delta.y;
            if h < MIN_ELEMENT_SIZE {
                h = MIN_ELEMENT_SIZE;
                y = orig.max.y - MIN_ELEMENT_SIZE;
            }
        }
        Handle::South => {
            h = (orig.height() + delta.y).max(MIN_ELEMENT_SIZE);
        }
        Handle::West => {
            x = orig.min.x + delta.x;
            w = orig.width() - delta.x;
            if w < MIN_ELEMENT_SIZE {
                w = MIN_ELEMENT_SIZE;
                x = orig.max.x - MIN_ELEMENT_SIZE;
            }
        }
        Handle::East => {
            w = (orig.width() + delta.x).max(MIN_ELEMENT_SIZE);
        }
        Handle::FontSize => {}
    }
    Rect::from_min_size(pos2(x, y), vec2(w, h))
}

fn resize_keeping_aspect(orig: Rect, handle: Handle, delta: Vec2) -> Rect {
    let aspect = aspect_ratio(orig);
    match handle {
        Handle::North | Handle::South => {
            let dragged = match handle {
                Handle::North => orig.height() - delta.y,
                _ => orig.height() + delta.y,
            };
            let (w, h) = fit_floor(dragged.max(MIN_ELEMENT_SIZE), aspect, Axis::Height);
            let x = orig.center().x - w / 2.0;
            let y = match handle {
                Handle::North => orig.max.y - h,
                _ => orig.min.y,
            };
            Rect::from_min_size(pos2(x, y), vec2(w, h))
        }
        Handle::East | Handle::West => {
            let dragged = match handle {
                Handle::West => orig.width() - delta.x,
                _ => orig.width() + delta.x,
            };
            let (w, h) = fit_floor(dragged.max(MIN_ELEMENT_SIZE), aspect, Axis::Width);
            let y = orig.center().y - h / 2.0;
            let x = match handle {
                Handle::West => orig.max.x - w,
                _ => orig.min.x,
            };
            Rect::from_min_size(pos2(x, y), vec2(w, h))
        }
        Handle::FontSize => orig,
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Width,
    Height,
}

/// Derives the other dimension from `driving`; if that falls below the floor it is
/// pinned to the floor and the driving dimension is recomputed from it.
fn fit_floor(driving: f32, aspect: f32, axis: Axis) -> (f32, f32) {
    match axis {
        Axis::Height => {
            let w = driving * aspect;
            if w < MIN_ELEMENT_SIZE {
                (MIN_ELEMENT_SIZE, MIN_ELEMENT_SIZE / aspect)
            } else {
                (w, driving)
            }
        }
        Axis::Width => {
            let h = driving / aspect;
            if h < MIN_ELEMENT_SIZE {
                (MIN_ELEMENT_SIZE * aspect, MIN_ELEMENT_SIZE)
            } else {
                (driving, h)
            }
        }
    }
}

/// Width over height, or 1.0 for a degenerate box
pub fn aspect_ratio(rect: Rect) -> f32 {
    if rect.width() > 0.0 && rect.height() > 0.0 {
        rect.width() / rect.height()
    } else {
        1.0
    }
}

/// Font size after dragging the font handle from `start` to `current`.
///
/// Dragging outward (right or up) grows the text.
pub fn resize_font(orig_size: u32, start: Pos2, current: Pos2) -> u32 {
    let delta = current - start;
    clamp_font_size(orig_size as f32 + (delta.x - delta.y) / FONT_RESIZE_SENSITIVITY)
}

/// Largest size with the aspect ratio of `natural` that fits inside `bounds`
pub fn fit_within(natural: Vec2, bounds: Vec2) -> Vec2 {
    if natural.x <= 0.0 || natural.y <= 0.0 || bounds.x <= 0.0 || bounds.y <= 0.0 {
        return Vec2::ZERO;
    }
    let scale = (bounds.x / natural.x).min(bounds.y / natural.y);
    natural * scale
}
