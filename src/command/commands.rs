use egui::Vec2;

use super::merge;
use crate::document::Page;
use crate::element::{Element, ElementKind, ElementType, ObscureMode, Padding, Rgb};
use crate::error::{CommandError, CommandResult};
use crate::selection::Selection;

/// A discrete, completed edit of the current page.
///
/// Every successful command ends in one history snapshot. In-progress pointer drags
/// mutate the page directly and are recorded once on release instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Append an element to the end of the page
    Insert(Element),
    /// Append several elements at once (recognised text fields)
    InsertMany(Vec<Element>),
    /// Remove elements; indices may be in any order
    Delete(Vec<usize>),
    /// Move elements by a base-space offset
    Nudge { indices: Vec<usize>, delta: Vec2 },
    /// Insert copies starting at `at`
    Paste { elements: Vec<Element>, at: usize },
    Merge { indices: Vec<usize>, target: ElementType },
    ConvertToObscure(usize),
    SetProperty { index: usize, change: PropertyChange },
    /// Give a merged image its picture
    ResolveImage { index: usize, path: String, natural_size: Vec2 },
}

/// A single edit made from a property panel
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyChange {
    Value(String),
    Font(String),
    FontSize(u32),
    FontColor(Rgb),
    BackgroundColor(Rgb),
    Padding(Padding),
    ObscureMode(ObscureMode),
}

impl PropertyChange {
    pub fn name(&self) -> &'static str {
        match self {
            PropertyChange::Value(_) => "value",
            PropertyChange::Font(_) => "font",
            PropertyChange::FontSize(_) => "font_size",
            PropertyChange::FontColor(_) => "font_color",
            PropertyChange::BackgroundColor(_) => "background_color",
            PropertyChange::Padding(_) => "padding",
            PropertyChange::ObscureMode(_) => "mode",
        }
    }

    fn apply(&self, element: &mut Element) -> CommandResult<()> {
        let mismatch = CommandError::PropertyMismatch {
            property: self.name(),
            element: element.element_type().as_str(),
        };
        match (self, &mut element.kind) {
            (PropertyChange::Value(value), ElementKind::Text(text)) => text.value = value.clone(),
            (PropertyChange::Value(value), ElementKind::Image(image)) => image.value = value.clone(),
            (PropertyChange::Font(font), ElementKind::Text(text)) => text.font = font.clone(),
            (PropertyChange::FontSize(size), ElementKind::Text(text)) => {
                text.font_size = crate::element::clamp_font_size(*size as f32)
            }
            (PropertyChange::FontColor(color), ElementKind::Text(text)) => text.font_color = *color,
            (PropertyChange::BackgroundColor(color), ElementKind::Text(text)) => text.background_color = *color,
            (PropertyChange::BackgroundColor(color), ElementKind::Rectangle(rect)) => {
                rect.background_color = *color
            }
            (PropertyChange::Padding(padding), ElementKind::Image(image)) => image.padding = *padding,
            (PropertyChange::ObscureMode(mode), ElementKind::Obscure(obscure)) => obscure.mode = *mode,
            _ => return Err(mismatch),
        }
        Ok(())
    }
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Insert(_) => "insert",
            Command::InsertMany(_) => "insert many",
            Command::Delete(_) => "delete",
            Command::Nudge { .. } => "nudge",
            Command::Paste { .. } => "paste",
            Command::Merge { .. } => "merge",
            Command::ConvertToObscure(_) => "convert to obscure",
            Command::SetProperty { .. } => "set property",
            Command::ResolveImage { .. } => "resolve image",
        }
    }

    /// Applies the command to `page` and returns the selection that should follow it.
    ///
    /// A failing command leaves the page untouched.
    pub fn execute(&self, page: &mut Page) -> CommandResult<Selection> {
        let len = page.elements.len();
        let check = |index: usize| if index < len { Ok(index) } else { Err(CommandError::InvalidIndex(index)) };

        match self {
            Command::Insert(element) => {
                page.elements.push(element.clone());
                Ok(Selection::single(len))
            }
            Command::InsertMany(elements) => {
                page.elements.extend(elements.iter().cloned());
                Ok(Selection::from_indices(len..len + elements.len()))
            }
            Command::Delete(indices) => {
                let mut indices = indices.clone();
                indices.sort_unstable();
                indices.dedup();
                for &index in &indices {
                    check(index)?;
                }
                for &index in indices.iter().rev() {
                    page.elements.remove(index);
                }
                Ok(Selection::new())
            }
            Command::Nudge { indices, delta } => {
                for &index in indices {
                    check(index)?;
                }
                for &index in indices {
                    page.elements[index].translate(*delta);
                }
                Ok(Selection::from_indices(indices.iter().copied()))
            }
            Command::Paste { elements, at } => {
                if elements.is_empty() {
                    return Err(CommandError::EmptyClipboard);
                }
                let at = (*at).min(len);
                page.elements.splice(at..at, elements.iter().cloned());
                Ok(Selection::from_indices(at..at + elements.len()))
            }
            Command::Merge { indices, target } => {
                let index = merge::merge(page, indices, *target)?;
                Ok(Selection::single(index))
            }
            Command::ConvertToObscure(index) => {
                merge::convert_to_obscure(page, *index)?;
                Ok(Selection::single(*index))
            }
            Command::SetProperty { index, change } => {
                let element = page.element_mut(check(*index)?).ok_or(CommandError::InvalidIndex(*index))?;
                change.apply(element)?;
                Ok(Selection::single(*index))
            }
            Command::ResolveImage { index, path, natural_size } => {
                merge::resolve_image(page, *index, path, *natural_size)?;
                Ok(Selection::single(*index))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory;
    use egui::{pos2, vec2};
    use pretty_assertions::assert_eq;

    fn page_of(count: usize) -> Page {
        Page {
            width: 1000,
            height: 1000,
            elements: (0..count)
                .map(|i| factory::create_rectangle(pos2(i as f32 * 10.0, 0.0)))
                .collect(),
            ..Page::default()
        }
    }

    #[test]
    fn delete_keeps_survivors_in_order() {
        let mut page = page_of(5);
        let selection = Command::Delete(vec![3, 1]).execute(&mut page).unwrap();
        assert!(selection.is_empty());
        let xs: Vec<f32> = page.elements.iter().map(|e| e.x).collect();
        assert_eq!(xs, vec![0.0, 20.0, 40.0]);
    }

    #[test]
    fn delete_with_stale_index_changes_nothing() {
        let mut page = page_of(2);
        assert_eq!(Command::Delete(vec![0, 5]).execute(&mut page), Err(CommandError::InvalidIndex(5)));
        assert_eq!(page.elements.len(), 2);
    }

    #[test]
    fn paste_inserts_after_point_and_selects_copies() {
        let mut page = page_of(3);
        let copy = factory::create_text(pos2(1.0, 2.0));
        let selection = Command::Paste { elements: vec![copy.clone(), copy.clone()], at: 2 }
            .execute(&mut page)
            .unwrap();
        assert_eq!(selection.indices(), &[2, 3]);
        assert_eq!(page.elements[2], copy);
        assert_eq!(page.elements[4].x, 20.0);

        let selection = Command::Paste { elements: vec![copy], at: 99 }.execute(&mut page).unwrap();
        assert_eq!(selection.indices(), &[5]);
    }

    #[test]
    fn nudge_moves_every_index() {
        let mut page = page_of(3);
        Command::Nudge { indices: vec![0, 2], delta: vec2(1.0, -10.0) }
            .execute(&mut page)
            .unwrap();
        assert_eq!(page.elements[0].position(), pos2(1.0, -10.0));
        assert_eq!(page.elements[1].position(), pos2(10.0, 0.0));
        assert_eq!(page.elements[2].position(), pos2(21.0, -10.0));
    }

    #[test]
    fn property_changes_are_type_checked() {
        let mut page = page_of(1);
        page.elements.push(factory::create_text(pos2(0.0, 0.0)));

        Command::SetProperty { index: 1, change: PropertyChange::FontSize(300) }
            .execute(&mut page)
            .unwrap();
        assert_eq!(page.elements[1].as_text().unwrap().font_size, 100);

        Command::SetProperty { index: 0, change: PropertyChange::BackgroundColor(Rgb::RED) }
            .execute(&mut page)
            .unwrap();

        assert_eq!(
            Command::SetProperty { index: 0, change: PropertyChange::Font("arial".into()) }.execute(&mut page),
            Err(CommandError::PropertyMismatch { property: "font", element: "rectangle" })
        );
    }

    #[test]
    fn insert_many_selects_all_new_elements() {
        let mut page = page_of(2);
        let selection = Command::InsertMany(vec![factory::create_text(pos2(0.0, 0.0)); 3])
            .execute(&mut page)
            .unwrap();
        assert_eq!(selection.indices(), &[2, 3, 4]);
    }
}
