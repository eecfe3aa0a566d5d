//! Baking templates into output PDFs, one per data record.

use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbImage, RgbaImage};
use log::{error, info, warn};
use serde_json::Value;

use super::fonts::FontBook;
use super::pdf_writer::PdfWriter;
use super::raster::RasterPainter;
use super::rasterizer::{Rasterizer, fit_to_page, read_page_boxes};
use crate::document::Document;
use crate::error::RenderError;
use crate::workspace::{Workspace, stem_of};

/// Outcome of a batch run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchSummary {
    pub written: Vec<PathBuf>,
    pub failed: usize,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    fn absorb(&mut self, other: BatchSummary) {
        self.written.extend(other.written);
        self.failed += other.failed;
    }
}

/// Paints one record onto copies of the page backgrounds.
///
/// `backgrounds[i]` belongs to `document.pages[i]`; pages without a background are
/// not rendered.
pub fn render_record(
    document: &Document,
    backgrounds: &[RgbaImage],
    record: &Value,
    painter: &mut RasterPainter,
) -> Vec<RgbImage> {
    document
        .pages
        .iter()
        .zip(backgrounds)
        .map(|(page, background)| {
            let mut canvas = background.clone();
            painter.paint_page(&mut canvas, page, record);
            DynamicImage::ImageRgba8(canvas).to_rgb8()
        })
        .collect()
}

/// Page backgrounds for `document`, rasterized from `pdf` and sized to the template
pub fn page_backgrounds(
    document: &Document,
    pdf: &Path,
    rasterizer: &dyn Rasterizer,
) -> Result<Vec<RgbaImage>, RenderError> {
    let pdf_pages = read_page_boxes(pdf)?.len();
    if document.pages.len() > pdf_pages {
        warn!(
            "template for {} has {} pages but the PDF has {pdf_pages}; extra pages are skipped",
            pdf.display(),
            document.pages.len()
        );
    }
    document
        .pages
        .iter()
        .take(pdf_pages)
        .enumerate()
        .map(|(index, page)| -> Result<RgbaImage, RenderError> {
            Ok(fit_to_page(rasterizer.render_page(pdf, index)?, page.size()))
        })
        .collect()
}

/// Renders every record of the template belonging to `pdf`
pub fn render_template(
    workspace: &Workspace,
    pdf: &Path,
    rasterizer: &dyn Rasterizer,
) -> Result<BatchSummary, RenderError> {
    let stem = stem_of(pdf);
    let document = Document::load(&workspace.template_path(&stem))?;
    let backgrounds = page_backgrounds(&document, pdf, rasterizer)?;
    if backgrounds.is_empty() {
        return Err(RenderError::NoPages(pdf.to_path_buf()));
    }

    let fonts = FontBook::new(workspace.config().fonts_dir.clone());
    let mut painter = RasterPainter::new(workspace.assets(&stem), fonts);
    let mut summary = BatchSummary::default();

    for (index, record) in document.records().iter().enumerate() {
        let output = workspace.output_path(&stem, index);
        let pages = render_record(&document, &backgrounds, record, &mut painter);
        let result = pages
            .iter()
            .try_fold(PdfWriter::new(), |mut writer, page| writer.add_page(page).map(|_| writer))
            .and_then(|writer| writer.save(&output));
        match result {
            Ok(()) => {
                info!("wrote {}", output.display());
                summary.written.push(output);
            }
            Err(err) => {
                error!("record {} of {stem} failed: {err}", index + 1);
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

/// Renders every PDF in the input directory that has a template, or only `only`
pub fn render_all(workspace: &Workspace, only: Option<&str>, rasterizer: &dyn Rasterizer) -> BatchSummary {
    let pdfs = match only {
        Some(name) => vec![workspace.pdf_path(name)],
        None => match workspace.scan_pdfs() {
            Ok(pdfs) => pdfs,
            Err(err) => {
                error!("cannot list {}: {err}", workspace.config().input_dir.display());
                return BatchSummary { written: Vec::new(), failed: 1 };
            }
        },
    };

    let mut summary = BatchSummary::default();
    for pdf in pdfs {
        let template = workspace.template_path(&stem_of(&pdf));
        if !template.exists() {
            if only.is_some() {
                error!("no template at {} for {}", template.display(), pdf.display());
                summary.failed += 1;
            } else {
                info!("skipping {}: no template", pdf.display());
            }
            continue;
        }
        match render_template(workspace, &pdf, rasterizer) {
            Ok(done) => summary.absorb(done),
            Err(err) => {
                error!("cannot render {}: {err}", pdf.display());
                summary.failed += 1;
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetResolver;
    use crate::element::{Rgb, factory};
    use egui::pos2;
    use serde_json::json;

    #[test]
    fn each_record_gets_its_own_pages() {
        let mut document = Document::skeleton(&[crate::document::PageBox { width: 50.0, height: 50.0 }], 50);
        let mut text = factory::create_text(pos2(0.0, 0.0));
        text.set_rect(egui::Rect::from_min_size(pos2(0.0, 0.0), egui::vec2(50.0, 30.0)));
        text.as_text_mut().unwrap().value = "name".into();
        document.pages[0].elements.push(text);
        document.pages[0].elements.push(factory::create_rectangle(pos2(0.0, 40.0)));

        let background = RgbaImage::from_pixel(50, 50, Rgb::WHITE.to_rgba());
        let mut painter = RasterPainter::new(AssetResolver::new(".", None), FontBook::new(None));
        let first = render_record(&document, &[background.clone()], &json!({"name": "A"}), &mut painter);
        let second = render_record(&document, &[background], &json!({"name": "WWW"}), &mut painter);

        assert_eq!(first.len(), 1);
        assert_eq!(first[0].dimensions(), (50, 50));
        assert_eq!(first[0].get_pixel(10, 45).0, Rgb::LIGHT_GRAY.0);
        assert_ne!(first[0], second[0]);
    }

    #[test]
    fn pages_without_background_are_dropped() {
        let boxes = [crate::document::PageBox { width: 10.0, height: 10.0 }; 2];
        let document = Document::skeleton(&boxes, 10);
        let mut painter = RasterPainter::new(AssetResolver::new(".", None), FontBook::new(None));
        let pages = render_record(&document, &[RgbaImage::new(10, 10)], &json!({}), &mut painter);
        assert_eq!(pages.len(), 1);
    }
}
