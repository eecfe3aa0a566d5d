use egui::{Color32, Rect, pos2};
use serde::{Deserialize, Serialize};

// Common constants for all element types
pub const MIN_ELEMENT_SIZE: f32 = 10.0;
pub const MIN_FONT_SIZE: u32 = 6;
pub const MAX_FONT_SIZE: u32 = 100;
/// Base units of pointer travel per font size step
pub const FONT_RESIZE_SENSITIVITY: f32 = 5.0;
pub const DEFAULT_FONT: &str = "arial";
pub const FONT_CHOICES: [&str; 3] = ["arial", "timesnewroman", "couriernew"];

/// An opaque RGB color, stored as `[r, g, b]` in templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);
    pub const LIGHT_GRAY: Rgb = Rgb([200, 200, 200]);
    pub const RED: Rgb = Rgb([220, 0, 0]);
    pub const BLUE: Rgb = Rgb([0, 0, 220]);
    pub const GREEN: Rgb = Rgb([0, 180, 0]);

    pub fn to_color32(self) -> Color32 {
        let [r, g, b] = self.0;
        Color32::from_rgb(r, g, b)
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        let [r, g, b] = self.0;
        image::Rgba([r, g, b, 255])
    }
}

/// Named font colors offered by the text property panel
pub const COLOR_CHOICES: [(&str, Rgb); 4] = [
    ("Black", Rgb::BLACK),
    ("Red", Rgb::RED),
    ("Blue", Rgb::BLUE),
    ("Green", Rgb::GREEN),
];

/// Fill colors offered for text backgrounds and rectangles
pub const BACKGROUND_CHOICES: [(&str, Rgb); 3] = [
    ("White", Rgb::WHITE),
    ("Light Gray", Rgb::LIGHT_GRAY),
    ("Black", Rgb::BLACK),
];

/// Inner margins of an image element, in base units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Padding {
    /// The content area left inside `rect`; never inverted
    pub fn inset(&self, rect: Rect) -> Rect {
        let min = pos2(rect.min.x + self.left, rect.min.y + self.top);
        let max = pos2(
            (rect.max.x - self.right).max(min.x),
            (rect.max.y - self.bottom).max(min.y),
        );
        Rect::from_min_max(min, max)
    }
}

/// Clamps a rounded font size into the supported range
pub(crate) fn clamp_font_size(size: f32) -> u32 {
    let rounded = size.round_ties_even();
    if rounded.is_nan() {
        return MIN_FONT_SIZE;
    }
    (rounded.max(MIN_FONT_SIZE as f32) as u32).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}
