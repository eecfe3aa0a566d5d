use std::cmp::Reverse;
use std::fs;
use std::path::Path;

use egui::{Vec2, vec2};
use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::error::{TemplateError, TemplateResult};

/// A template: ordered pages of elements plus the data records to bake them with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub pages: Vec<Page>,
    /// One output document is produced per record
    #[serde(default)]
    pub template_values: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    /// Base-space size; equals the rasterized page image size
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub elements: Vec<Element>,
    /// PDF point size recorded when the page was migrated to rendered dimensions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_factor: Option<f32>,
}

/// A PDF page's size in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub width: f32,
    pub height: f32,
}

impl PageBox {
    /// Scale from points to base pixels when rasterizing at `target_height`
    pub fn zoom_factor(&self, target_height: u32) -> f32 {
        if self.height > 0.0 {
            target_height as f32 / self.height
        } else {
            1.0
        }
    }

    /// Pixel size of the page rasterized at `target_height`.
    ///
    /// The width follows `pdftoppm -scale-to-x -1`: resolution from the height, then
    /// the scaled width rounded up, computed in double precision.
    pub fn rendered_size(&self, target_height: u32) -> (u32, u32) {
        if self.height <= 0.0 {
            return (self.width.max(0.0).ceil() as u32, target_height);
        }
        let resolution = 72.0 * f64::from(target_height) / f64::from(self.height);
        let width = f64::from(self.width) * (resolution / 72.0);
        (width.max(0.0).ceil() as u32, target_height)
    }
}

/// A page whose stored size disagrees with its expected rendered size
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionMismatch {
    pub page_index: usize,
    pub stored: (u32, u32),
    pub expected: (u32, u32),
}

/// Pixel tolerance used when verifying page sizes
pub const DIMENSION_TOLERANCE: u32 = 2;
/// Pages within this many units of the PDF point size are treated as unmigrated
pub const MIGRATION_TOLERANCE: f32 = 10.0;

impl Page {
    pub fn size(&self) -> Vec2 {
        vec2(self.width as f32, self.height as f32)
    }

    /// Element indices in paint order: rectangles, images, text, then obscure regions,
    /// list order within each pass.
    pub fn render_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.elements.len()).collect();
        order.sort_by_key(|&index| (self.elements[index].element_type().render_rank(), index));
        order
    }

    /// Sorts `hits` into click priority: text, image, obscure, rectangle, and the later
    /// element first within a type.
    pub fn pick_order(&self, hits: &[usize]) -> Vec<usize> {
        let mut order: Vec<usize> = hits
            .iter()
            .copied()
            .filter(|&index| index < self.elements.len())
            .collect();
        order.sort_by_key(|&index| (self.elements[index].element_type().pick_rank(), Reverse(index)));
        order
    }

    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn element_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.elements.get_mut(index)
    }
}

impl Document {
    /// Reads and validates a template file
    pub fn load(path: &Path) -> TemplateResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Document = serde_json::from_str(&text).map_err(|source| TemplateError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if document.pages.is_empty() {
            return Err(TemplateError::NoPages(path.to_path_buf()));
        }
        log::debug!("Loaded template {} with {} pages", path.display(), document.pages.len());
        Ok(document)
    }

    /// Writes the template as pretty JSON, creating the parent directory if needed
    pub fn save(&self, path: &Path) -> TemplateResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        let io_err = |source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, json).map_err(io_err)?;
        log::info!("Saved template to {}", path.display());
        Ok(())
    }

    /// An empty template for a PDF with the given page boxes, sized for rasterization
    /// at `target_height`.
    pub fn skeleton(page_boxes: &[PageBox], target_height: u32) -> Self {
        let pages = page_boxes
            .iter()
            .enumerate()
            .map(|(index, page_box)| {
                let (width, height) = page_box.rendered_size(target_height);
                Page {
                    page_number: Some(index as u32 + 1),
                    width,
                    height,
                    ..Page::default()
                }
            })
            .collect();
        Self {
            pages,
            template_values: vec![serde_json::Value::Object(serde_json::Map::new())],
        }
    }

    /// Data records to render; a template without records renders once with an empty one
    pub fn records(&self) -> Vec<serde_json::Value> {
        if self.template_values.is_empty() {
            vec![serde_json::Value::Object(serde_json::Map::new())]
        } else {
            self.template_values.clone()
        }
    }

    pub fn is_migrated(&self) -> bool {
        self.pages.first().is_some_and(|page| page.original_width.is_some())
    }

    /// Rewrites page sizes still expressed in PDF points to rendered pixel sizes.
    ///
    /// Element coordinates are left untouched. Returns the number of pages changed.
    pub fn migrate_dimensions(&mut self, page_boxes: &[PageBox], target_height: u32) -> usize {
        if self.is_migrated() {
            return 0;
        }
        let mut migrated = 0;
        for (page, page_box) in self.pages.iter_mut().zip(page_boxes) {
            let close_to_points = (page.width as f32 - page_box.width).abs() < MIGRATION_TOLERANCE
                && (page.height as f32 - page_box.height).abs() < MIGRATION_TOLERANCE;
            if !close_to_points {
                continue;
            }
            let (width, height) = page_box.rendered_size(target_height);
            page.width = width;
            page.height = height;
            page.original_width = Some(page_box.width);
            page.original_height = Some(page_box.height);
            page.zoom_factor = Some(page_box.zoom_factor(target_height));
            migrated += 1;
        }
        migrated
    }

    /// Pages whose stored size is more than [`DIMENSION_TOLERANCE`] away from the size
    /// the rasterizer will produce.
    pub fn verify_dimensions(&self, page_boxes: &[PageBox], target_height: u32) -> Vec<DimensionMismatch> {
        self.pages
            .iter()
            .zip(page_boxes)
            .enumerate()
            .filter_map(|(page_index, (page, page_box))| {
                let expected = page_box.rendered_size(target_height);
                let off = page.width.abs_diff(expected.0) > DIMENSION_TOLERANCE
                    || page.height.abs_diff(expected.1) > DIMENSION_TOLERANCE;
                off.then_some(DimensionMismatch {
                    page_index,
                    stored: (page.width, page.height),
                    expected,
                })
            })
            .collect()
    }
}
