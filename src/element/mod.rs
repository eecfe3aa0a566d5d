use egui::{Pos2, Rect, Vec2, pos2, vec2};
use serde::{Deserialize, Serialize};

mod common;
pub mod handle;
pub mod resize;

pub use common::{
    BACKGROUND_CHOICES, COLOR_CHOICES, DEFAULT_FONT, FONT_CHOICES, FONT_RESIZE_SENSITIVITY, MAX_FONT_SIZE,
    MIN_ELEMENT_SIZE, MIN_FONT_SIZE, Padding, Rgb,
};
pub(crate) use common::clamp_font_size;
pub use handle::Handle;

/// A positioned field on a page.
///
/// The box (`x`, `y`, `width`, `height`) is in base units and is the only geometry any
/// consumer uses; rendered content never feeds back into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(flatten)]
    pub kind: ElementKind,
}

/// Type-specific payload, tagged by `"type"` in JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text(TextContent),
    Image(ImageContent),
    Rectangle(RectangleContent),
    Obscure(ObscureContent),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextContent {
    /// Literal text or a dot-path key into the data record
    pub value: String,
    pub font: String,
    pub font_size: u32,
    pub font_color: Rgb,
    pub background_color: Rgb,
    pub text_align_h: HorizontalAlign,
    pub text_align_v: VerticalAlign,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            value: String::new(),
            font: DEFAULT_FONT.to_string(),
            font_size: 16,
            font_color: Rgb::BLACK,
            background_color: Rgb::WHITE,
            text_align_h: HorizontalAlign::Left,
            text_align_v: VerticalAlign::Top,
        }
    }
}

/// Stored for the template author; rendering always anchors text top-left
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageContent {
    /// Image path (relative to the image input directory) or a data record key
    pub value: String,
    pub padding: Padding,
    /// Set on an image created by a merge until its picture is chosen
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub awaiting_content: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectangleContent {
    pub background_color: Rgb,
}

impl Default for RectangleContent {
    fn default() -> Self {
        Self {
            background_color: Rgb::LIGHT_GRAY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObscureContent {
    pub mode: ObscureMode,
}

/// How an obscure element redacts what lies beneath it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObscureMode {
    #[default]
    Pixelate,
    Blur,
    Blacken,
}

impl ObscureMode {
    pub const ALL: [ObscureMode; 3] = [ObscureMode::Pixelate, ObscureMode::Blur, ObscureMode::Blacken];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObscureMode::Pixelate => "pixelate",
            ObscureMode::Blur => "blur",
            ObscureMode::Blacken => "blacken",
        }
    }
}

/// Payload-free discriminant of [`ElementKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Text,
    Image,
    Rectangle,
    Obscure,
}

impl ElementType {
    pub const ALL: [ElementType; 4] = [
        ElementType::Text,
        ElementType::Image,
        ElementType::Rectangle,
        ElementType::Obscure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Text => "text",
            ElementType::Image => "image",
            ElementType::Rectangle => "rectangle",
            ElementType::Obscure => "obscure",
        }
    }

    /// Paint pass; lower passes are drawn first so obscure regions cover everything
    pub fn render_rank(&self) -> u8 {
        match self {
            ElementType::Rectangle => 0,
            ElementType::Image => 1,
            ElementType::Text => 2,
            ElementType::Obscure => 3,
        }
    }

    /// Click priority; lower ranks are picked first
    pub fn pick_rank(&self) -> u8 {
        match self {
            ElementType::Text => 0,
            ElementType::Image => 1,
            ElementType::Obscure => 2,
            ElementType::Rectangle => 3,
        }
    }
}

impl Element {
    pub fn new(rect: Rect, kind: ElementKind) -> Self {
        Self {
            x: rect.min.x,
            y: rect.min.y,
            width: rect.width(),
            height: rect.height(),
            kind,
        }
    }

    pub fn element_type(&self) -> ElementType {
        match &self.kind {
            ElementKind::Text(_) => ElementType::Text,
            ElementKind::Image(_) => ElementType::Image,
            ElementKind::Rectangle(_) => ElementType::Rectangle,
            ElementKind::Obscure(_) => ElementType::Obscure,
        }
    }

    /// The stored bounding box
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(pos2(self.x, self.y), vec2(self.width, self.height))
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.min.x;
        self.y = rect.min.y;
        self.width = rect.width();
        self.height = rect.height();
    }

    pub fn position(&self) -> Pos2 {
        pos2(self.x, self.y)
    }

    pub fn set_position(&mut self, pos: Pos2) {
        self.x = pos.x;
        self.y = pos.y;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Inclusive containment test against the bounding box
    pub fn contains(&self, point: Pos2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// The value field of text and image elements
    pub fn value(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Text(text) => Some(&text.value),
            ElementKind::Image(image) => Some(&image.value),
            ElementKind::Rectangle(_) | ElementKind::Obscure(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextContent> {
        match &self.kind {
            ElementKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextContent> {
        match &mut self.kind {
            ElementKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageContent> {
        match &self.kind {
            ElementKind::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_awaiting_content(&self) -> bool {
        matches!(&self.kind, ElementKind::Image(image) if image.awaiting_content)
    }
}

/// Constructors for the elements the editor creates
pub mod factory {
    use super::*;

    pub const TEXT_SIZE: Vec2 = vec2(150.0, 50.0);
    pub const TEXT_FONT_SIZE: u32 = 18;
    pub const TEXT_SAMPLE: &str = "Sample Text";
    pub const IMAGE_FALLBACK_SIZE: Vec2 = vec2(200.0, 200.0);
    pub const RECTANGLE_SIZE: Vec2 = vec2(100.0, 50.0);
    pub const OBSCURE_SIZE: Vec2 = vec2(100.0, 50.0);

    /// A text field placed by the insert tool
    pub fn create_text(at: Pos2) -> Element {
        Element::new(
            Rect::from_min_size(at, TEXT_SIZE),
            ElementKind::Text(TextContent {
                value: TEXT_SAMPLE.to_string(),
                font_size: TEXT_FONT_SIZE,
                ..TextContent::default()
            }),
        )
    }

    /// An image field sized to the picture's natural pixel size when known
    pub fn create_image(at: Pos2, path: &str, natural_size: Option<Vec2>) -> Element {
        let size = natural_size
            .filter(|size| size.x > 0.0 && size.y > 0.0)
            .unwrap_or(IMAGE_FALLBACK_SIZE);
        Element::new(
            Rect::from_min_size(at, size),
            ElementKind::Image(ImageContent {
                value: path.to_string(),
                ..ImageContent::default()
            }),
        )
    }

    pub fn create_rectangle(at: Pos2) -> Element {
        Element::new(
            Rect::from_min_size(at, RECTANGLE_SIZE),
            ElementKind::Rectangle(RectangleContent::default()),
        )
    }

    pub fn create_obscure(at: Pos2) -> Element {
        Element::new(
            Rect::from_min_size(at, OBSCURE_SIZE),
            ElementKind::Obscure(ObscureContent::default()),
        )
    }

    /// The element a merge produces: type defaults, empty content, the union box
    pub fn create_merged(target: ElementType, rect: Rect) -> Element {
        let kind = match target {
            ElementType::Text => ElementKind::Text(TextContent::default()),
            ElementType::Image => ElementKind::Image(ImageContent {
                awaiting_content: true,
                ..ImageContent::default()
            }),
            ElementType::Rectangle => ElementKind::Rectangle(RectangleContent::default()),
            ElementType::Obscure => ElementKind::Obscure(ObscureContent::default()),
        };
        Element::new(rect, kind)
    }

    /// A text field for recognised text at a base-space box
    pub fn create_detected_text(rect: Rect, text: &str, font_size: f32) -> Element {
        Element::new(
            rect,
            ElementKind::Text(TextContent {
                value: text.to_string(),
                font_size: clamp_font_size(font_size),
                ..TextContent::default()
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_shape_is_flat_and_tagged() {
        let element = factory::create_rectangle(pos2(10.0, 20.0));
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "rectangle",
                "x": 10.0,
                "y": 20.0,
                "width": 100.0,
                "height": 50.0,
                "background_color": [200, 200, 200]
            })
        );
    }

    #[test]
    fn parses_integer_geometry_and_missing_fields() {
        let element: Element = serde_json::from_str(
            r#"{"type": "text", "x": 5, "y": 6, "width": 70, "height": 20, "value": "employee.name", "font_size": 12}"#,
        )
        .unwrap();
        assert_eq!(element.rect(), Rect::from_min_size(pos2(5.0, 6.0), vec2(70.0, 20.0)));
        let text = element.as_text().unwrap();
        assert_eq!(text.value, "employee.name");
        assert_eq!(text.font, DEFAULT_FONT);
        assert_eq!(text.background_color, Rgb::WHITE);
    }

    #[test]
    fn awaiting_marker_is_only_written_when_set() {
        let mut element = factory::create_merged(ElementType::Image, Rect::from_min_size(Pos2::ZERO, vec2(30.0, 30.0)));
        assert!(element.is_awaiting_content());
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["awaiting_content"], serde_json::json!(true));

        if let ElementKind::Image(image) = &mut element.kind {
            image.awaiting_content = false;
        }
        let json = serde_json::to_value(&element).unwrap();
        assert!(json.get("awaiting_content").is_none());
    }

    #[test]
    fn obscure_modes_round_trip_by_name() {
        let element: Element =
            serde_json::from_str(r#"{"type": "obscure", "x": 0, "y": 0, "width": 10, "height": 10, "mode": "blacken"}"#)
                .unwrap();
        assert_eq!(element.kind, ElementKind::Obscure(ObscureContent { mode: ObscureMode::Blacken }));
    }

    #[test]
    fn containment_is_inclusive() {
        let element = factory::create_obscure(pos2(0.0, 0.0));
        assert!(element.contains(pos2(0.0, 0.0)));
        assert!(element.contains(pos2(100.0, 50.0)));
        assert!(!element.contains(pos2(100.1, 50.0)));
    }

    #[test]
    fn detected_text_font_size_is_clamped() {
        let element = factory::create_detected_text(Rect::from_min_size(Pos2::ZERO, vec2(10.0, 3.0)), "x", 3.0);
        assert_eq!(element.as_text().unwrap().font_size, MIN_FONT_SIZE);
    }
}
