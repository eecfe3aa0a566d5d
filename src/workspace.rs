//! Where templates, PDFs, page images and outputs live on disk.
//!
//! Everything is keyed by the PDF's file stem: `input_pdfs/invoice.pdf` is edited
//! through `configs/invoice.json` and baked into `output_pdfs/invoice_output_1.pdf`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

use crate::assets::AssetResolver;
use crate::config::EditorConfig;
use crate::document::{DimensionMismatch, Document};
use crate::error::{TemplateError, TemplateResult};
use crate::render::read_page_boxes;

/// File stem of a path as an owned string
pub fn stem_of(path: &Path) -> String {
    path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default()
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[derive(Debug, Clone)]
pub struct Workspace {
    config: EditorConfig,
}

impl Workspace {
    pub fn new(config: EditorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn ensure_dirs(&self) -> io::Result<()> {
        for dir in [
            &self.config.config_dir,
            &self.config.input_dir,
            &self.config.output_dir,
            &self.config.temp_img_dir,
            &self.config.input_img_dir,
        ] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// A PDF in the input directory; `name` may omit the extension
    pub fn pdf_path(&self, name: &str) -> PathBuf {
        let path = self.config.input_dir.join(name);
        if is_pdf(&path) { path } else { path.with_extension("pdf") }
    }

    pub fn template_path(&self, stem: &str) -> PathBuf {
        self.config.config_dir.join(format!("{stem}.json"))
    }

    /// Output file for the record at `record_index` (numbered from 1 on disk)
    pub fn output_path(&self, stem: &str, record_index: usize) -> PathBuf {
        self.config.output_dir.join(format!("{stem}_output_{}.pdf", record_index + 1))
    }

    pub fn assets(&self, stem: &str) -> AssetResolver {
        AssetResolver::new(&self.config.input_img_dir, Some(stem))
    }

    /// PDFs in the input directory, sorted by name
    pub fn scan_pdfs(&self) -> io::Result<Vec<PathBuf>> {
        let mut pdfs: Vec<PathBuf> = fs::read_dir(&self.config.input_dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_pdf(path))
            .collect();
        pdfs.sort();
        Ok(pdfs)
    }

    /// Loads the template for `pdf`, creating an empty one from the PDF's page
    /// boxes when none exists yet.
    pub fn open_or_init(&self, pdf: &Path) -> TemplateResult<Document> {
        let template = self.template_path(&stem_of(pdf));
        if template.exists() {
            return Document::load(&template);
        }
        let page_boxes = read_page_boxes(pdf)?;
        if page_boxes.is_empty() {
            return Err(TemplateError::NoPages(pdf.to_path_buf()));
        }
        let document = Document::skeleton(&page_boxes, self.config.target_height);
        document.save(&template)?;
        info!("created template {} with {} page(s)", template.display(), document.pages.len());
        Ok(document)
    }

    /// Rescales page sizes still stored in PDF points, backing the template up first.
    ///
    /// Returns the number of pages changed; an already migrated template is left alone.
    pub fn migrate_template(&self, pdf: &Path) -> TemplateResult<usize> {
        let template = self.template_path(&stem_of(pdf));
        let mut document = Document::load(&template)?;
        let page_boxes = read_page_boxes(pdf)?;
        let migrated = document.migrate_dimensions(&page_boxes, self.config.target_height);
        if migrated > 0 {
            let backup = template.with_extension("json.backup");
            fs::copy(&template, &backup).map_err(|source| TemplateError::Io {
                path: backup.clone(),
                source,
            })?;
            document.save(&template)?;
            info!("migrated {migrated} page(s) of {} (backup at {})", template.display(), backup.display());
        }
        Ok(migrated)
    }

    /// Pages of the template for `pdf` whose size will not match the rendered page
    pub fn verify_template(&self, pdf: &Path) -> TemplateResult<Vec<DimensionMismatch>> {
        let document = Document::load(&self.template_path(&stem_of(pdf)))?;
        let page_boxes = read_page_boxes(pdf)?;
        Ok(document.verify_dimensions(&page_boxes, self.config.target_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{PdfWriter, read_page_boxes};
    use pretty_assertions::assert_eq;

    fn workspace_in(root: &Path) -> Workspace {
        Workspace::new(EditorConfig {
            config_dir: root.join("configs"),
            input_dir: root.join("input_pdfs"),
            output_dir: root.join("output_pdfs"),
            temp_img_dir: root.join("temp_images"),
            input_img_dir: root.join("input_img"),
            target_height: 200,
            ..EditorConfig::default()
        })
    }

    #[test]
    fn paths_follow_the_pdf_stem() {
        let workspace = workspace_in(Path::new("/w"));
        assert_eq!(workspace.pdf_path("invoice"), Path::new("/w/input_pdfs/invoice.pdf"));
        assert_eq!(workspace.pdf_path("invoice.PDF"), Path::new("/w/input_pdfs/invoice.PDF"));
        assert_eq!(workspace.template_path("invoice"), Path::new("/w/configs/invoice.json"));
        assert_eq!(workspace.output_path("invoice", 0), Path::new("/w/output_pdfs/invoice_output_1.pdf"));
    }

    #[test]
    fn missing_template_is_created_from_page_boxes() {
        let root = tempfile::tempdir().unwrap();
        let workspace = workspace_in(root.path());
        workspace.ensure_dirs().unwrap();

        let pdf = workspace.pdf_path("form");
        let mut writer = PdfWriter::new();
        writer.add_page(&image::RgbImage::new(100, 50)).unwrap();
        writer.add_page(&image::RgbImage::new(50, 100)).unwrap();
        writer.save(&pdf).unwrap();
        assert_eq!(read_page_boxes(&pdf).unwrap().len(), 2);

        let document = workspace.open_or_init(&pdf).unwrap();
        assert_eq!(document.pages.len(), 2);
        assert_eq!((document.pages[0].width, document.pages[0].height), (400, 200));
        assert_eq!((document.pages[1].width, document.pages[1].height), (100, 200));
        assert!(workspace.template_path("form").exists());

        assert_eq!(workspace.scan_pdfs().unwrap(), vec![pdf.clone()]);
        assert_eq!(workspace.open_or_init(&pdf).unwrap(), document);
    }

    #[test]
    fn point_sized_templates_migrate_once() {
        let root = tempfile::tempdir().unwrap();
        let workspace = workspace_in(root.path());
        workspace.ensure_dirs().unwrap();

        let pdf = workspace.pdf_path("legacy");
        let mut writer = PdfWriter::new();
        writer.add_page(&image::RgbImage::new(100, 50)).unwrap();
        writer.save(&pdf).unwrap();

        let mut document = workspace.open_or_init(&pdf).unwrap();
        document.pages[0].width = 100;
        document.pages[0].height = 50;
        document.save(&workspace.template_path("legacy")).unwrap();
        assert_eq!(workspace.verify_template(&pdf).unwrap().len(), 1);

        assert_eq!(workspace.migrate_template(&pdf).unwrap(), 1);
        assert!(workspace.template_path("legacy").with_extension("json.backup").exists());
        assert!(workspace.verify_template(&pdf).unwrap().is_empty());
        assert_eq!(workspace.migrate_template(&pdf).unwrap(), 0);
    }
}
