use uuid::Uuid;

use crate::element::ElementType;

/// Which property panel is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Text,
    Image,
    Obscure,
}

impl PanelKind {
    /// The panel for an element type; rectangles have none
    pub fn for_element(element_type: ElementType) -> Option<Self> {
        match element_type {
            ElementType::Text => Some(PanelKind::Text),
            ElementType::Image => Some(PanelKind::Image),
            ElementType::Obscure => Some(PanelKind::Obscure),
            ElementType::Rectangle => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PanelKind::Text => "Text properties",
            PanelKind::Image => "Image properties",
            PanelKind::Obscure => "Obscure properties",
        }
    }
}

/// The open property panel and the element it edits.
///
/// A new handle (with a fresh id) is created whenever the panel switches to a
/// different element, so the UI drops any widget state from the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelHandle {
    pub id: Uuid,
    pub kind: PanelKind,
    pub element: usize,
}

impl PanelHandle {
    pub fn new(kind: PanelKind, element: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            element,
        }
    }

    pub fn egui_id(&self) -> egui::Id {
        egui::Id::new(("property_panel", self.id))
    }
}
