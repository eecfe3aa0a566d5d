use egui::Pos2;
use log::info;

use super::{InsertKind, ToolMode};
use crate::command::Command;
use crate::state::EditorContext;

impl EditorContext {
    /// Places one element with its top-left corner at `base` and returns to the select tool
    pub(crate) fn insert_at(&mut self, kind: &InsertKind, base: Pos2) {
        let element = kind.create(base);
        if self.run(Command::Insert(element)) {
            info!("{} at ({:.0}, {:.0})", kind.name(), base.x, base.y);
        }
        self.tool = ToolMode::Select;
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EditorConfig;
    use crate::document::{Document, Page};
    use crate::element::ElementType;
    use crate::state::{EditorContext, PanelKind};
    use crate::tools::{InsertKind, ToolMode};
    use egui::{PointerButton, Pos2, pos2, vec2};
    use pretty_assertions::assert_eq;

    fn empty_context() -> EditorContext {
        let document = Document {
            pages: vec![Page {
                width: 800,
                height: 600,
                ..Page::default()
            }],
            template_values: Vec::new(),
        };
        EditorContext::new(document, &EditorConfig::default()).unwrap()
    }

    #[test]
    fn insert_places_selects_and_returns_to_select() {
        let mut context = empty_context();
        context.set_tool(ToolMode::Insert(InsertKind::Obscure));
        context.pointer_down(pos2(30.0, 40.0), Pos2::ZERO, PointerButton::Primary, 0.0);
        context.pointer_up();

        let element = &context.page().elements[0];
        assert_eq!(element.element_type(), ElementType::Obscure);
        assert_eq!(element.position(), pos2(30.0, 40.0));
        assert_eq!(context.selection().indices(), &[0]);
        assert_eq!(context.tool(), &ToolMode::Select);
        assert_eq!(context.active_panel().map(|panel| panel.kind), Some(PanelKind::Obscure));
        assert_eq!(context.history().len(), 2);
    }

    #[test]
    fn image_insert_uses_natural_size() {
        let mut context = empty_context();
        context.set_tool(ToolMode::Insert(InsertKind::Image {
            path: "logos/acme.png".into(),
            natural_size: Some(vec2(64.0, 32.0)),
        }));
        context.pointer_down(pos2(0.0, 0.0), Pos2::ZERO, PointerButton::Primary, 0.0);

        let element = &context.page().elements[0];
        assert_eq!(element.rect().size(), vec2(64.0, 32.0));
        assert_eq!(element.value(), Some("logos/acme.png"));
    }

    #[test]
    fn insert_mode_blocks_panning() {
        let mut context = empty_context();
        context.set_tool(ToolMode::Insert(InsertKind::Text));
        context.pointer_down(Pos2::ZERO, pos2(10.0, 10.0), PointerButton::Middle, 0.0);
        assert!(context.state().is_idle());
    }
}
