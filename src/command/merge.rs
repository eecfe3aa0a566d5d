//! Merging several elements into one and narrowing a text field into a redaction.

use egui::{Rect, Vec2, pos2, vec2};

use crate::document::Page;
use crate::element::resize::fit_within;
use crate::element::{Element, ElementKind, ElementType, ObscureContent, factory};
use crate::error::{CommandError, CommandResult};

/// Smallest box covering every element at `indices`
pub fn union_rect(elements: &[Element], indices: &[usize]) -> CommandResult<Rect> {
    let mut union: Option<Rect> = None;
    for &index in indices {
        let rect = elements.get(index).ok_or(CommandError::InvalidIndex(index))?.rect();
        union = Some(union.map_or(rect, |acc| acc.union(rect)));
    }
    union.ok_or(CommandError::NotEnoughElements(0))
}

/// Replaces the elements at `indices` with one `target` element covering their union.
///
/// The new element takes the position of the lowest merged index. Returns that index.
pub fn merge(page: &mut Page, indices: &[usize], target: ElementType) -> CommandResult<usize> {
    let mut indices = indices.to_vec();
    indices.sort_unstable();
    indices.dedup();
    if indices.len() < 2 {
        return Err(CommandError::NotEnoughElements(indices.len()));
    }
    let rect = union_rect(&page.elements, &indices)?;
    let insert_at = indices[0];

    for &index in indices.iter().rev() {
        page.elements.remove(index);
    }
    page.elements.insert(insert_at, factory::create_merged(target, rect));
    log::debug!("Merged {} elements into a {} at index {insert_at}", indices.len(), target.as_str());
    Ok(insert_at)
}

/// Turns a text element into a pixelating obscure region with the same box
pub fn convert_to_obscure(page: &mut Page, index: usize) -> CommandResult<()> {
    let element = page.element_mut(index).ok_or(CommandError::InvalidIndex(index))?;
    match element.kind {
        ElementKind::Text(_) => {
            element.kind = ElementKind::Obscure(ObscureContent::default());
            Ok(())
        }
        ElementKind::Image(_) | ElementKind::Rectangle(_) | ElementKind::Obscure(_) => {
            Err(CommandError::UnsupportedConversion(element.element_type().as_str()))
        }
    }
}

/// Box for a picture of `natural` size fitted and centred inside `container`.
///
/// The fitted size is rounded to whole base units. A picture without a usable size
/// keeps the container box.
pub fn fitted_image_rect(container: Rect, natural: Vec2) -> Rect {
    let fitted = fit_within(natural, container.size());
    if fitted == Vec2::ZERO {
        return container;
    }
    let size = vec2(fitted.x.round(), fitted.y.round());
    let min = pos2(
        container.min.x + (container.width() - size.x) / 2.0,
        container.min.y + (container.height() - size.y) / 2.0,
    );
    Rect::from_min_size(min, size)
}

/// Gives an image waiting for content its picture and shrinks it around it
pub fn resolve_image(page: &mut Page, index: usize, path: &str, natural: Vec2) -> CommandResult<()> {
    let element = page.element_mut(index).ok_or(CommandError::InvalidIndex(index))?;
    let container = element.rect();
    let ElementKind::Image(image) = &mut element.kind else {
        return Err(CommandError::NotAwaitingContent(index));
    };
    if !image.awaiting_content {
        return Err(CommandError::NotAwaitingContent(index));
    }
    image.value = path.to_string();
    image.awaiting_content = false;
    element.set_rect(fitted_image_rect(container, natural));
    Ok(())
}

/// Leaves an image waiting for content permanently empty
pub fn cancel_image(page: &mut Page, index: usize) -> CommandResult<()> {
    match page.element_mut(index).map(|element| &mut element.kind) {
        Some(ElementKind::Image(image)) if image.awaiting_content => {
            image.awaiting_content = false;
            Ok(())
        }
        Some(_) => Err(CommandError::NotAwaitingContent(index)),
        None => Err(CommandError::InvalidIndex(index)),
    }
}

/// Clears every awaiting-content marker on `page`, returning how many were set
pub fn settle_pending_images(page: &mut Page) -> usize {
    let mut settled = 0;
    for element in &mut page.elements {
        if let ElementKind::Image(image) = &mut element.kind {
            if image.awaiting_content {
                image.awaiting_content = false;
                settled += 1;
            }
        }
    }
    settled
}
