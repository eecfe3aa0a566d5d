use std::collections::{HashMap, HashSet};

use egui::{Align2, Color32, Context, FontFamily, FontId, Painter, Pos2, Rect, Stroke, TextureId, Vec2, pos2, vec2};
use image::RgbaImage;
use log::warn;

use crate::assets::AssetResolver;
use crate::command::merge::fitted_image_rect;
use crate::element::{Element, ElementKind, ObscureMode, Rgb, handle::resize_handles};
use crate::geometry::CanvasLayout;
use crate::render::raster::{apply_obscure, pixel_bounds};
use crate::state::{EditorContext, MarqueePurpose};
use crate::texture_manager::{TextureGenerationError, TextureManager, color_image};
use crate::widgets::HandleMarker;

const TEXTURE_CACHE_SIZE: usize = 64;
const FULL_UV: Rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));

const OUTLINE: Stroke = Stroke {
    width: 1.0,
    color: Color32::from_gray(160),
};
const SELECTED_OUTLINE: Stroke = Stroke {
    width: 2.0,
    color: Color32::from_rgb(30, 120, 255),
};
const EDITING_OUTLINE: Stroke = Stroke {
    width: 2.0,
    color: Color32::from_rgb(0, 170, 90),
};
const AWAITING_OUTLINE: Stroke = Stroke {
    width: 1.5,
    color: Color32::from_rgb(255, 140, 0),
};

/// The page image behind the elements, with the key its texture is cached under
#[derive(Debug, Clone, Copy)]
pub struct PageBackdrop<'a> {
    pub key: &'a str,
    pub image: &'a RgbaImage,
}

/// egui font family used for an element font name
pub fn font_family(font: &str) -> FontFamily {
    if font == "couriernew" { FontFamily::Monospace } else { FontFamily::Proportional }
}

/// Draws the current page of the editor onto the canvas
#[derive(Debug)]
pub struct Renderer {
    textures: TextureManager,
    picture_sizes: HashMap<String, Vec2>,
    /// Pictures that failed to decode; not retried until the cache is reset
    broken_pictures: HashSet<String>,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            textures: TextureManager::new(TEXTURE_CACHE_SIZE),
            picture_sizes: HashMap::new(),
            broken_pictures: HashSet::new(),
        }
    }

    /// Drops every cached texture so pictures are read from disk again
    pub fn reset(&mut self) {
        self.textures.clear_cache();
        self.picture_sizes.clear();
        self.broken_pictures.clear();
    }

    pub fn render(
        &mut self,
        ctx: &Context,
        painter: &Painter,
        layout: &CanvasLayout,
        editor: &EditorContext,
        backdrop: Option<PageBackdrop<'_>>,
        assets: &AssetResolver,
    ) {
        self.textures.begin_frame();
        let page_rect = layout.page_rect();
        painter.rect_filled(page_rect, 0.0, Color32::WHITE);
        if let Some(backdrop) = backdrop {
            match self.textures.get_or_create_texture(backdrop.key, || color_image(backdrop.image), ctx) {
                Ok(id) => {
                    painter.image(id, page_rect, FULL_UV, Color32::WHITE);
                }
                Err(err) => warn!("page texture {} unavailable: {err}", backdrop.key),
            }
        }
        painter.rect_stroke(page_rect, 0.0, Stroke::new(1.0, Color32::DARK_GRAY));

        let page_painter = painter.with_clip_rect(page_rect.intersect(painter.clip_rect()));
        let page = editor.page();
        for index in page.render_order() {
            self.paint_element(ctx, &page_painter, layout, &page.elements[index], backdrop, assets);
        }

        let editing = editor.state().text_cursor().map(|(index, _)| index);
        for (index, element) in page.elements.iter().enumerate() {
            let rect = layout.rect_to_screen(element.rect());
            let stroke = if editing == Some(index) {
                EDITING_OUTLINE
            } else if editor.selection().contains(index) {
                SELECTED_OUTLINE
            } else {
                OUTLINE
            };
            painter.rect_stroke(rect, 0.0, stroke);
            if element.is_awaiting_content() {
                paint_awaiting(painter, rect);
            }
        }

        for marker in handle_markers(layout, editor) {
            marker.paint(painter);
        }
        if let Some((index, cursor)) = editor.state().text_cursor() {
            if let Some(element) = page.element(index) {
                paint_caret(painter, layout, element, cursor);
            }
        }
        if let Some((region, purpose)) = editor.state().marquee() {
            let (fill, stroke) = match purpose {
                MarqueePurpose::Select => (Color32::from_rgba_unmultiplied(30, 120, 255, 30), SELECTED_OUTLINE.color),
                MarqueePurpose::Recognize => (Color32::from_rgba_unmultiplied(0, 170, 90, 30), EDITING_OUTLINE.color),
            };
            let rect = layout.rect_to_screen(region);
            painter.rect_filled(rect, 0.0, fill);
            painter.rect_stroke(rect, 0.0, Stroke::new(1.0, stroke));
        }
    }

    fn paint_element(
        &mut self,
        ctx: &Context,
        painter: &Painter,
        layout: &CanvasLayout,
        element: &Element,
        backdrop: Option<PageBackdrop<'_>>,
        assets: &AssetResolver,
    ) {
        let screen = layout.rect_to_screen(element.rect());
        match &element.kind {
            ElementKind::Rectangle(rectangle) => {
                painter.rect_filled(screen, 0.0, rectangle.background_color.to_color32());
            }
            ElementKind::Text(text) => {
                painter.rect_filled(screen, 0.0, text.background_color.to_color32());
                if text.value.is_empty() {
                    return;
                }
                let font = FontId::new(text.font_size as f32 * layout.zoom, font_family(&text.font));
                let galley = painter.layout_no_wrap(text.value.clone(), font, text.font_color.to_color32());
                painter
                    .with_clip_rect(screen.intersect(painter.clip_rect()))
                    .galley(screen.min, galley, text.font_color.to_color32());
            }
            ElementKind::Image(picture) => {
                if picture.value.trim().is_empty() {
                    return;
                }
                let content = picture.padding.inset(element.rect());
                match self.picture_texture(ctx, assets, &picture.value) {
                    Some((id, natural)) => {
                        let fitted = layout.rect_to_screen(fitted_image_rect(content, natural));
                        painter.image(id, fitted, FULL_UV, Color32::WHITE);
                    }
                    None => paint_error_marker(painter, screen),
                }
            }
            ElementKind::Obscure(obscure) => match (obscure.mode, backdrop) {
                (ObscureMode::Blacken, _) => {
                    painter.rect_filled(screen, 0.0, Color32::BLACK);
                }
                (mode, Some(backdrop)) => self.paint_obscure_preview(ctx, painter, layout, element.rect(), mode, backdrop),
                (_, None) => {
                    painter.rect_filled(screen, 0.0, Color32::from_gray(128));
                }
            },
        }
    }

    fn picture_texture(&mut self, ctx: &Context, assets: &AssetResolver, value: &str) -> Option<(TextureId, Vec2)> {
        let path = assets.resolve(value)?;
        let key = path.to_string_lossy().into_owned();
        if self.broken_pictures.contains(&key) {
            return None;
        }
        let mut generated = None;
        let result = self.textures.get_or_create_texture(
            &key,
            || {
                let decoded = image::open(&path).map_err(|err| TextureGenerationError::LoadFailed {
                    path: path.display().to_string(),
                    reason: err.to_string(),
                })?;
                let rgba = decoded.to_rgba8();
                generated = Some(vec2(rgba.width() as f32, rgba.height() as f32));
                color_image(&rgba)
            },
            ctx,
        );
        if let Some(size) = generated {
            self.picture_sizes.insert(key.clone(), size);
        }
        match result {
            Ok(id) => Some((id, self.picture_sizes.get(&key).copied().unwrap_or(Vec2::ZERO))),
            Err(err) => {
                warn!("{err}");
                self.broken_pictures.insert(key);
                None
            }
        }
    }

    fn paint_obscure_preview(
        &mut self,
        ctx: &Context,
        painter: &Painter,
        layout: &CanvasLayout,
        region: Rect,
        mode: ObscureMode,
        backdrop: PageBackdrop<'_>,
    ) {
        let image = backdrop.image;
        let Some((x0, y0, x1, y1)) = pixel_bounds(region, image.width(), image.height()) else {
            return;
        };
        let key = format!("{}:obscure:{}:{x0},{y0},{x1},{y1}", backdrop.key, mode.as_str());
        let generated = self.textures.get_or_create_texture(
            &key,
            || {
                let mut crop = image::imageops::crop_imm(image, x0, y0, x1 - x0, y1 - y0).to_image();
                let whole = Rect::from_min_size(Pos2::ZERO, vec2(crop.width() as f32, crop.height() as f32));
                apply_obscure(&mut crop, whole, mode);
                color_image(&crop)
            },
            ctx,
        );
        let target = layout.rect_to_screen(Rect::from_min_max(
            pos2(x0 as f32, y0 as f32),
            pos2(x1 as f32, y1 as f32),
        ));
        match generated {
            Ok(id) => {
                painter.image(id, target, FULL_UV, Color32::WHITE);
            }
            Err(err) => {
                warn!("obscure preview unavailable: {err}");
                painter.rect_filled(target, 0.0, Color32::from_gray(128));
            }
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Markers for the handles of the single selected element, in screen space
pub fn handle_markers(layout: &CanvasLayout, editor: &EditorContext) -> Vec<HandleMarker> {
    if editor.state().is_text_editing() {
        return Vec::new();
    }
    let Some(element) = editor.selection().only().and_then(|index| editor.page().element(index)) else {
        return Vec::new();
    };
    let size = editor.config().handle_size;
    resize_handles(element)
        .into_iter()
        .filter(|(handle, _)| handle.is_active_for(element.element_type()))
        .map(|(handle, position)| HandleMarker::new(handle, layout.to_screen(position), size))
        .collect()
}

fn paint_error_marker(painter: &Painter, rect: Rect) {
    let stroke = Stroke::new(2.0, Rgb::RED.to_color32());
    painter.line_segment([rect.left_top(), rect.right_bottom()], stroke);
    painter.line_segment([rect.right_top(), rect.left_bottom()], stroke);
}

fn paint_awaiting(painter: &Painter, rect: Rect) {
    let corners = [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom(), rect.left_top()];
    painter.add(egui::Shape::dashed_line(&corners, AWAITING_OUTLINE, 6.0, 4.0));
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        "Choose an image",
        FontId::proportional(12.0),
        AWAITING_OUTLINE.color,
    );
}

fn paint_caret(painter: &Painter, layout: &CanvasLayout, element: &Element, cursor: usize) {
    let Some(text) = element.as_text() else {
        return;
    };
    let prefix: String = text.value.chars().take(cursor).collect();
    let font = FontId::new(text.font_size as f32 * layout.zoom, font_family(&text.font));
    let galley = painter.layout_no_wrap(prefix, font, Color32::BLACK);
    let origin = layout.to_screen(element.position());
    let Some(row) = galley.rows.last() else {
        return;
    };
    let top = origin + vec2(row.rect.max.x, row.rect.min.y);
    let bottom = origin + vec2(row.rect.max.x, row.rect.max.y);
    painter.line_segment([top, bottom], Stroke::new(1.5, EDITING_OUTLINE.color));
}

/// Cursor to show while hovering `screen` over the canvas
pub fn hover_cursor(layout: &CanvasLayout, editor: &EditorContext, screen: Pos2) -> Option<egui::CursorIcon> {
    handle_markers(layout, editor)
        .into_iter()
        .find(|marker| marker.contains(screen))
        .map(|marker| marker.cursor_icon())
}
