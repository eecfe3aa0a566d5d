//! Painting elements onto a page image in base space.
//!
//! Used by the batch renderer for final output and by the editor for the obscure
//! preview, so both see the same pixels.

use std::collections::HashMap;
use std::path::PathBuf;

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use egui::{Pos2, Rect, vec2};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use log::warn;
use serde_json::Value;

use super::fonts::FontBook;
use crate::assets::AssetResolver;
use crate::command::merge::fitted_image_rect;
use crate::document::Page;
use crate::element::{Element, ElementKind, ObscureMode, Rgb};
use crate::template_data::resolve;

/// Fraction of the original resolution kept by pixelation
pub const PIXELATE_FACTOR: f32 = 0.08;
/// Gaussian sigma matching a 7-pixel kernel
pub const BLUR_SIGMA: f32 = 1.4;
const ERROR_MARKER_WIDTH: i32 = 3;

/// Whole-pixel bounds of `rect` clipped to a `width`x`height` image, or `None` if empty
pub fn pixel_bounds(rect: Rect, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let clamp = |value: f32, max: u32| value.round().clamp(0.0, max as f32) as u32;
    let (x0, x1) = (clamp(rect.min.x, width), clamp(rect.max.x, width));
    let (y0, y1) = (clamp(rect.min.y, height), clamp(rect.max.y, height));
    (x1 > x0 && y1 > y0).then_some((x0, y0, x1, y1))
}

pub fn fill_rect(image: &mut RgbaImage, rect: Rect, color: Rgb) {
    let Some((x0, y0, x1, y1)) = pixel_bounds(rect, image.width(), image.height()) else {
        return;
    };
    let color = color.to_rgba();
    for y in y0..y1 {
        for x in x0..x1 {
            image.put_pixel(x, y, color);
        }
    }
}

fn blend(pixel: &mut Rgba<u8>, color: Rgb, alpha: f32) {
    let alpha = alpha.clamp(0.0, 1.0);
    for (channel, target) in pixel.0.iter_mut().zip(color.0) {
        *channel = (*channel as f32 * (1.0 - alpha) + target as f32 * alpha).round() as u8;
    }
}

/// Red cross over `rect`, drawn where an image could not be loaded
pub fn draw_error_marker(image: &mut RgbaImage, rect: Rect) {
    let (width, height) = (image.width() as i32, image.height() as i32);
    let steps = rect.width().max(rect.height()).ceil().max(1.0) as i32;
    let half = ERROR_MARKER_WIDTH / 2;
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let x = rect.min.x + rect.width() * t;
        for y in [rect.min.y + rect.height() * t, rect.max.y - rect.height() * t] {
            for dy in -half..=half {
                for dx in -half..=half {
                    let (px, py) = (x as i32 + dx, y as i32 + dy);
                    if px >= 0 && py >= 0 && px < width && py < height {
                        image.put_pixel(px as u32, py as u32, Rgb::RED.to_rgba());
                    }
                }
            }
        }
    }
}

/// Scales `picture` into `container` the way image elements are laid out: aspect
/// kept, whole pixels, centered, alpha-composited.
pub fn paste_fitted(image: &mut RgbaImage, picture: &RgbaImage, container: Rect) {
    let natural = vec2(picture.width() as f32, picture.height() as f32);
    let target = fitted_image_rect(container, natural);
    let (width, height) = (target.width().round() as u32, target.height().round() as u32);
    if width == 0 || height == 0 {
        return;
    }
    let scaled = imageops::resize(picture, width, height, FilterType::Lanczos3);
    imageops::overlay(image, &scaled, target.min.x.round() as i64, target.min.y.round() as i64);
}

/// Font scale for an em size in pixels, the convention egui uses for font sizes
fn em_scale(font: &FontArc, size: f32) -> PxScale {
    match font.units_per_em() {
        Some(units_per_em) if units_per_em > 0.0 => PxScale::from(size * font.height_unscaled() / units_per_em),
        _ => PxScale::from(size),
    }
}

/// Draws `text` with its first line's top at `origin`, clipped to `clip`
pub fn draw_text(image: &mut RgbaImage, clip: Rect, origin: Pos2, text: &str, font: &FontArc, size: f32, color: Rgb) {
    let Some((cx0, cy0, cx1, cy1)) = pixel_bounds(clip, image.width(), image.height()) else {
        return;
    };
    let scale = em_scale(font, size);
    let scaled = font.as_scaled(scale);
    let line_height = scaled.height() + scaled.line_gap();
    let mut caret = point(origin.x, origin.y + scaled.ascent());
    let mut previous: Option<GlyphId> = None;

    for ch in text.chars() {
        if ch == '\n' {
            caret = point(origin.x, caret.y + line_height);
            previous = None;
            continue;
        }
        if ch.is_control() {
            continue;
        }
        let id = scaled.glyph_id(ch);
        if let Some(previous) = previous {
            caret.x += scaled.kern(previous, id);
        }
        let glyph = id.with_scale_and_position(scale, caret);
        caret.x += scaled.h_advance(id);
        previous = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let x = bounds.min.x as i64 + gx as i64;
            let y = bounds.min.y as i64 + gy as i64;
            if x >= cx0 as i64 && x < cx1 as i64 && y >= cy0 as i64 && y < cy1 as i64 {
                blend(image.get_pixel_mut(x as u32, y as u32), color, coverage);
            }
        });
    }
}

/// Redacts whatever lies under `rect`
pub fn apply_obscure(image: &mut RgbaImage, rect: Rect, mode: ObscureMode) {
    let Some((x0, y0, x1, y1)) = pixel_bounds(rect, image.width(), image.height()) else {
        return;
    };
    let (width, height) = (x1 - x0, y1 - y0);
    let region = imageops::crop_imm(image, x0, y0, width, height).to_image();
    let redacted = match mode {
        ObscureMode::Pixelate => {
            let small_w = ((width as f32 * PIXELATE_FACTOR) as u32).max(1);
            let small_h = ((height as f32 * PIXELATE_FACTOR) as u32).max(1);
            let small = imageops::resize(&region, small_w, small_h, FilterType::Triangle);
            imageops::resize(&small, width, height, FilterType::Nearest)
        }
        ObscureMode::Blur => imageops::blur(&region, BLUR_SIGMA),
        ObscureMode::Blacken => RgbaImage::from_pixel(width, height, Rgb::BLACK.to_rgba()),
    };
    imageops::replace(image, &redacted, x0 as i64, y0 as i64);
}

/// Paints template elements with a data record resolved into their values
#[derive(Debug)]
pub struct RasterPainter {
    assets: AssetResolver,
    fonts: FontBook,
    pictures: HashMap<PathBuf, Option<RgbaImage>>,
}

impl RasterPainter {
    pub fn new(assets: AssetResolver, fonts: FontBook) -> Self {
        Self {
            assets,
            fonts,
            pictures: HashMap::new(),
        }
    }

    /// Paints every element of `page` in render order
    pub fn paint_page(&mut self, image: &mut RgbaImage, page: &Page, record: &Value) {
        for index in page.render_order() {
            self.paint_element(image, &page.elements[index], record);
        }
    }

    pub fn paint_element(&mut self, image: &mut RgbaImage, element: &Element, record: &Value) {
        let rect = element.rect();
        match &element.kind {
            ElementKind::Rectangle(rectangle) => fill_rect(image, rect, rectangle.background_color),
            ElementKind::Obscure(obscure) => apply_obscure(image, rect, obscure.mode),
            ElementKind::Text(text) => {
                fill_rect(image, rect, text.background_color);
                let value = resolve(record, &text.value);
                if value.is_empty() {
                    return;
                }
                if let Some(font) = self.fonts.font(&text.font) {
                    draw_text(image, rect, rect.min, &value, &font, text.font_size as f32, text.font_color);
                }
            }
            ElementKind::Image(picture) => {
                let value = resolve(record, &picture.value);
                if value.trim().is_empty() {
                    return;
                }
                match self.picture(&value) {
                    Some(loaded) => paste_fitted(image, &loaded, picture.padding.inset(rect)),
                    None => draw_error_marker(image, rect),
                }
            }
        }
    }

    fn picture(&mut self, value: &str) -> Option<RgbaImage> {
        let Some(path) = self.assets.resolve(value) else {
            warn!("image '{value}' not found under {}", self.assets.image_dir().display());
            return None;
        };
        self.pictures
            .entry(path.clone())
            .or_insert_with(|| match image::open(&path) {
                Ok(decoded) => Some(decoded.to_rgba8()),
                Err(err) => {
                    warn!("cannot decode {}: {err}", path.display());
                    None
                }
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory;
    use egui::{Vec2, pos2};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn blank_page(size: Vec2) -> RgbaImage {
        RgbaImage::from_pixel(size.x as u32, size.y as u32, Rgb::WHITE.to_rgba())
    }

    fn painter(dir: &std::path::Path) -> RasterPainter {
        RasterPainter::new(AssetResolver::new(dir, None), FontBook::new(None))
    }

    #[test]
    fn bounds_are_rounded_and_clipped() {
        assert_eq!(pixel_bounds(Rect::from_min_max(pos2(-5.0, 1.4), pos2(10.6, 20.0)), 8, 8), Some((0, 1, 8, 8)));
        assert_eq!(pixel_bounds(Rect::from_min_max(pos2(9.0, 0.0), pos2(12.0, 5.0)), 8, 8), None);
    }

    #[test]
    fn rectangle_fills_its_box() {
        let mut image = blank_page(vec2(20.0, 20.0));
        let rect = Element::new(
            Rect::from_min_size(pos2(2.0, 3.0), vec2(4.0, 5.0)),
            ElementKind::Rectangle(Default::default()),
        );
        painter(std::path::Path::new(".")).paint_element(&mut image, &rect, &json!({}));
        assert_eq!(image.get_pixel(2, 3), &Rgb::LIGHT_GRAY.to_rgba());
        assert_eq!(image.get_pixel(5, 7), &Rgb::LIGHT_GRAY.to_rgba());
        assert_eq!(image.get_pixel(6, 7), &Rgb::WHITE.to_rgba());
    }

    #[test]
    fn blacken_covers_only_its_region() {
        let mut image = blank_page(vec2(10.0, 10.0));
        apply_obscure(&mut image, Rect::from_min_max(pos2(5.0, 5.0), pos2(30.0, 30.0)), ObscureMode::Blacken);
        assert_eq!(image.get_pixel(9, 9), &Rgb::BLACK.to_rgba());
        assert_eq!(image.get_pixel(4, 4), &Rgb::WHITE.to_rgba());
    }

    #[test]
    fn pixelate_flattens_detail() {
        let mut image = RgbaImage::from_fn(50, 50, |x, _| if x % 2 == 0 { Rgba([0, 0, 0, 255]) } else { Rgba([255, 255, 255, 255]) });
        apply_obscure(&mut image, Rect::from_min_size(Pos2::ZERO, vec2(50.0, 50.0)), ObscureMode::Pixelate);
        assert_eq!(image.get_pixel(0, 0), image.get_pixel(1, 0));
    }

    #[test]
    fn missing_image_draws_marker_and_empty_value_draws_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut painter = painter(dir.path());
        let mut image = blank_page(vec2(40.0, 40.0));
        let element = factory::create_merged(crate::element::ElementType::Image, Rect::from_min_size(Pos2::ZERO, vec2(40.0, 40.0)));
        painter.paint_element(&mut image, &element, &json!({}));
        assert!(image.pixels().all(|pixel| *pixel == Rgb::WHITE.to_rgba()));

        let element = factory::create_image(Pos2::ZERO, "missing.png", Some(vec2(40.0, 40.0)));
        painter.paint_element(&mut image, &element, &json!({}));
        assert_eq!(image.get_pixel(20, 20), &Rgb::RED.to_rgba());
    }

    #[test]
    fn image_is_fitted_and_centered() {
        let dir = tempfile::tempdir().unwrap();
        RgbaImage::from_pixel(20, 10, Rgba([0, 0, 255, 255])).save(dir.path().join("wide.png")).unwrap();
        let mut painter = painter(dir.path());
        let mut image = blank_page(vec2(40.0, 40.0));
        let element = factory::create_image(Pos2::ZERO, "wide.png", Some(vec2(40.0, 40.0)));
        painter.paint_element(&mut image, &element, &json!({}));

        let center = image.get_pixel(20, 20).0;
        assert!(center[0] < 30 && center[2] > 225, "{center:?}");
        assert_eq!(image.get_pixel(20, 5), &Rgb::WHITE.to_rgba());
        assert_eq!(image.get_pixel(20, 35), &Rgb::WHITE.to_rgba());
    }

    #[test]
    fn text_resolves_key_and_stays_in_its_box() {
        let mut painter = painter(std::path::Path::new("."));
        let mut image = blank_page(vec2(200.0, 100.0));
        let mut element = factory::create_text(pos2(10.0, 10.0));
        element.set_rect(Rect::from_min_size(pos2(10.0, 10.0), vec2(120.0, 40.0)));
        element.as_text_mut().unwrap().value = "person.name".into();
        element.as_text_mut().unwrap().background_color = Rgb::LIGHT_GRAY;
        painter.paint_element(&mut image, &element, &json!({"person": {"name": "WWWWWWWWWWWWWWWWWWWW"}}));

        let dark = image.enumerate_pixels().filter(|(_, _, pixel)| pixel.0[0] < 100).collect::<Vec<_>>();
        assert!(!dark.is_empty());
        assert!(dark.iter().all(|(x, y, _)| (10..130).contains(x) && (10..50).contains(y)));
    }
}
