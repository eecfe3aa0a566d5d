//! Turning recognised text in a page region into text fields.
//!
//! No recognition engine ships with the crate; hosts plug one in through [`OcrProvider`].

use egui::{Pos2, Rect, pos2, vec2};
use image::RgbaImage;
use thiserror::Error;

use crate::element::{Element, factory};

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR engine failed: {0}")]
    Engine(String),
    #[error("OCR region is empty")]
    EmptyRegion,
}

/// One recognised word or line, in the region image's pixel space
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub text: String,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    /// Engine confidence, 0..100
    pub confidence: f32,
    /// Estimated font size; the box height is used when absent
    pub font_size: Option<f32>,
}

pub trait OcrProvider {
    fn detect(&self, region: &RgbaImage) -> Result<Vec<Detection>, OcrError>;
}

/// A region the user asked to scan, in base space of the page it was drawn on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OcrRequest {
    pub page_index: usize,
    pub region: Rect,
}

/// Crops `region` out of the page image, clipped to the image bounds.
///
/// Returns the crop with its whole-pixel base-space origin.
pub fn crop_region(page: &RgbaImage, region: Rect) -> Result<(Pos2, RgbaImage), OcrError> {
    let x0 = region.min.x.max(0.0).floor() as u32;
    let y0 = region.min.y.max(0.0).floor() as u32;
    let x1 = (region.max.x.max(0.0).floor() as u32).min(page.width());
    let y1 = (region.max.y.max(0.0).floor() as u32).min(page.height());
    if x1 <= x0 || y1 <= y0 {
        return Err(OcrError::EmptyRegion);
    }
    let crop = image::imageops::crop_imm(page, x0, y0, x1 - x0, y1 - y0).to_image();
    Ok((pos2(x0 as f32, y0 as f32), crop))
}

/// Text fields for `detections`, offset by the region origin.
///
/// Blank text and non-positive confidence are dropped.
pub fn place_detections(origin: Pos2, detections: &[Detection]) -> Vec<Element> {
    detections
        .iter()
        .filter(|detection| detection.confidence > 0.0 && !detection.text.trim().is_empty())
        .map(|detection| {
            let rect = Rect::from_min_size(
                pos2(origin.x + detection.left, origin.y + detection.top),
                vec2(detection.width, detection.height),
            );
            let font_size = detection.font_size.unwrap_or(detection.height);
            factory::create_detected_text(rect, detection.text.trim(), font_size)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(text: &str, confidence: f32) -> Detection {
        Detection {
            text: text.to_string(),
            left: 4.0,
            top: 6.0,
            width: 40.0,
            height: 12.0,
            confidence,
            font_size: None,
        }
    }

    #[test]
    fn detections_are_offset_by_region_origin() {
        let elements = place_detections(pos2(100.0, 200.0), &[detection("Name", 91.0)]);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].rect(), Rect::from_min_size(pos2(104.0, 206.0), vec2(40.0, 12.0)));
        let text = elements[0].as_text().unwrap();
        assert_eq!(text.value, "Name");
        assert_eq!(text.font_size, 12);
    }

    #[test]
    fn blank_and_unconfident_detections_are_dropped() {
        let elements = place_detections(Pos2::ZERO, &[detection("  ", 90.0), detection("x", 0.0), detection("ok", 1.0)]);
        assert_eq!(elements.len(), 1);
    }

    #[test]
    fn crop_is_clipped_to_page() {
        let page = RgbaImage::new(100, 50);
        let (origin, crop) = crop_region(&page, Rect::from_min_max(pos2(90.5, -10.0), pos2(200.0, 20.0))).unwrap();
        assert_eq!(origin, pos2(90.0, 0.0));
        assert_eq!(crop.dimensions(), (10, 20));

        assert!(crop_region(&page, Rect::from_min_max(pos2(150.0, 0.0), pos2(200.0, 20.0))).is_err());
    }
}
