use std::collections::HashMap;
use std::path::PathBuf;

use egui::Vec2;
use image::RgbaImage;
use log::error;

use crate::render::{Rasterizer, fit_to_page};

/// Rasterized backgrounds of the PDF being edited, loaded on first use.
///
/// A page that fails to rasterize is remembered as missing so the editor does not
/// retry it every frame.
pub struct PageImages {
    rasterizer: Box<dyn Rasterizer>,
    pdf: PathBuf,
    stem: String,
    images: HashMap<usize, Option<RgbaImage>>,
}

impl PageImages {
    pub fn new(rasterizer: Box<dyn Rasterizer>, pdf: PathBuf, stem: impl Into<String>) -> Self {
        Self {
            rasterizer,
            pdf,
            stem: stem.into(),
            images: HashMap::new(),
        }
    }

    /// Texture key for page `index`
    pub fn key(&self, index: usize) -> String {
        format!("page:{}:{index}", self.stem)
    }

    /// The background of page `index`, sized to `page_size`
    pub fn load(&mut self, index: usize, page_size: Vec2) -> Option<&RgbaImage> {
        let rasterizer = &self.rasterizer;
        let pdf = &self.pdf;
        self.images
            .entry(index)
            .or_insert_with(|| match rasterizer.render_page(pdf, index) {
                Ok(image) => Some(fit_to_page(image, page_size)),
                Err(err) => {
                    error!("no background for page {}: {err}", index + 1);
                    None
                }
            })
            .as_ref()
    }

    pub fn get(&self, index: usize) -> Option<&RgbaImage> {
        self.images.get(&index).and_then(Option::as_ref)
    }

    /// Forgets every loaded page
    pub fn clear(&mut self) {
        self.images.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use egui::vec2;
    use std::cell::Cell;
    use std::path::Path;
    use std::rc::Rc;

    struct CountingRasterizer {
        calls: Rc<Cell<usize>>,
    }

    impl Rasterizer for CountingRasterizer {
        fn render_page(&self, pdf: &Path, page_index: usize) -> Result<RgbaImage, RenderError> {
            self.calls.set(self.calls.get() + 1);
            if page_index == 0 {
                Ok(RgbaImage::new(20, 10))
            } else {
                Err(RenderError::Rasterizer {
                    path: pdf.to_path_buf(),
                    page: page_index + 1,
                    reason: "boom".into(),
                })
            }
        }
    }

    #[test]
    fn pages_are_rasterized_once() {
        let calls = Rc::new(Cell::new(0));
        let mut pages = PageImages::new(
            Box::new(CountingRasterizer { calls: calls.clone() }),
            PathBuf::from("form.pdf"),
            "form",
        );

        assert_eq!(pages.load(0, vec2(10.0, 5.0)).map(|image| image.dimensions()), Some((10, 5)));
        assert!(pages.load(0, vec2(10.0, 5.0)).is_some());
        assert!(pages.load(1, vec2(10.0, 5.0)).is_none());
        assert!(pages.load(1, vec2(10.0, 5.0)).is_none());
        assert_eq!(calls.get(), 2);
        assert_eq!(pages.key(1), "page:form:1");
        assert!(pages.get(0).is_some());

        pages.clear();
        assert!(pages.get(0).is_none());
    }
}
