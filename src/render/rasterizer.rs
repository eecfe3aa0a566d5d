use std::path::{Path, PathBuf};
use std::process::Command;

use egui::Vec2;
use image::RgbaImage;
use image::imageops::{self, FilterType};
use log::{debug, info, warn};
use lopdf::{Dictionary, Document, Object};

use crate::document::PageBox;
use crate::error::{RenderError, TemplateError, TemplateResult};
use crate::workspace::stem_of;

/// US Letter, used for pages without a readable MediaBox
const FALLBACK_PAGE_BOX: PageBox = PageBox {
    width: 612.0,
    height: 792.0,
};
/// Bound on Parent hops when looking for an inherited MediaBox
const MAX_PAGE_TREE_DEPTH: usize = 32;

/// Turns a page of a source PDF into a bitmap
pub trait Rasterizer {
    fn render_page(&self, pdf: &Path, page_index: usize) -> Result<RgbaImage, RenderError>;
}

/// Renders pages with poppler's `pdftoppm`, caching each page as a PNG.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    cache_dir: PathBuf,
    target_height: u32,
}

impl PdftoppmRasterizer {
    pub fn new(cache_dir: impl Into<PathBuf>, target_height: u32) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            target_height,
        }
    }

    /// Where page `page_index` of `pdf` is cached (numbered from 1 on disk)
    pub fn cached_path(&self, pdf: &Path, page_index: usize) -> PathBuf {
        self.cache_dir.join(format!("{}_page{}.png", stem_of(pdf), page_index + 1))
    }

    fn failure(pdf: &Path, page_index: usize, reason: impl Into<String>) -> RenderError {
        RenderError::Rasterizer {
            path: pdf.to_path_buf(),
            page: page_index + 1,
            reason: reason.into(),
        }
    }
}

impl Rasterizer for PdftoppmRasterizer {
    fn render_page(&self, pdf: &Path, page_index: usize) -> Result<RgbaImage, RenderError> {
        let cached = self.cached_path(pdf, page_index);
        if cached.is_file() {
            debug!("using cached page image {}", cached.display());
            return Ok(image::open(&cached)?.to_rgba8());
        }

        std::fs::create_dir_all(&self.cache_dir)?;
        let page = (page_index + 1).to_string();
        // pdftoppm appends ".png" to the prefix when -singlefile is given
        let prefix = cached.with_extension("");
        info!("rasterizing page {page} of {}", pdf.display());
        let output = Command::new("pdftoppm")
            .args(["-png", "-singlefile", "-f", &page, "-l", &page])
            .args(["-scale-to-y", &self.target_height.to_string(), "-scale-to-x", "-1"])
            .arg(pdf)
            .arg(&prefix)
            .output()
            .map_err(|err| Self::failure(pdf, page_index, format!("cannot run pdftoppm: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::failure(pdf, page_index, stderr.trim().to_string()));
        }
        if !cached.is_file() {
            return Err(Self::failure(pdf, page_index, "pdftoppm produced no image"));
        }
        Ok(image::open(&cached)?.to_rgba8())
    }
}

/// Resizes a page bitmap to the template's page size when the two disagree
pub fn fit_to_page(image: RgbaImage, page_size: Vec2) -> RgbaImage {
    let (width, height) = (page_size.x as u32, page_size.y as u32);
    if image.dimensions() == (width, height) || width == 0 || height == 0 {
        return image;
    }
    warn!(
        "page image is {}x{} but the template page is {width}x{height}; resizing",
        image.width(),
        image.height()
    );
    imageops::resize(&image, width, height, FilterType::Lanczos3)
}

fn media_box(doc: &Document, page: &Dictionary) -> Option<PageBox> {
    let mut node = page;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Ok(raw) = node.get(b"MediaBox") {
            let (_, resolved) = doc.dereference(raw).ok()?;
            let values = resolved.as_array().ok()?;
            if values.len() != 4 {
                return None;
            }
            let coords: Vec<f32> = values
                .iter()
                .map(|value| doc.dereference(value).ok().and_then(|(_, value)| value.as_float().ok()))
                .collect::<Option<_>>()?;
            return Some(PageBox {
                width: (coords[2] - coords[0]).abs(),
                height: (coords[3] - coords[1]).abs(),
            });
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Point size of every page of `pdf`, in page order.
///
/// The MediaBox is inherited through the page tree; a page without one is taken to
/// be US Letter.
pub fn read_page_boxes(pdf: &Path) -> TemplateResult<Vec<PageBox>> {
    let doc = Document::load(pdf)?;
    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(TemplateError::NoPages(pdf.to_path_buf()));
    }
    pages
        .into_iter()
        .map(|(number, id)| -> TemplateResult<PageBox> {
            let page = doc.get_dictionary(id)?;
            Ok(media_box(&doc, page).unwrap_or_else(|| {
                warn!("page {number} of {} has no usable MediaBox; assuming US Letter", pdf.display());
                FALLBACK_PAGE_BOX
            }))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn cached_page_skips_pdftoppm() {
        let dir = tempfile::tempdir().unwrap();
        let rasterizer = PdftoppmRasterizer::new(dir.path(), 20);
        let pdf = Path::new("/nowhere/form.pdf");
        let cached = rasterizer.cached_path(pdf, 1);
        assert_eq!(cached, dir.path().join("form_page2.png"));
        RgbaImage::from_pixel(4, 20, Rgba([1, 2, 3, 255])).save(&cached).unwrap();

        let page = rasterizer.render_page(pdf, 1).unwrap();
        assert_eq!(page.dimensions(), (4, 20));
        assert_eq!(page.get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn mismatched_page_is_resized() {
        let fitted = fit_to_page(RgbaImage::new(11, 20), egui::vec2(10.0, 20.0));
        assert_eq!(fitted.dimensions(), (10, 20));
        let untouched = fit_to_page(RgbaImage::new(10, 20), egui::vec2(10.0, 20.0));
        assert_eq!(untouched.dimensions(), (10, 20));
    }

    #[test]
    fn unreadable_pdf_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf").unwrap();
        assert!(read_page_boxes(&path).is_err());
    }
}
