use std::path::Path;

use doc_templater::element::{Rgb, factory};
use doc_templater::error::RenderError;
use doc_templater::render::{PdfWriter, Rasterizer, read_page_boxes, render_all};
use doc_templater::{Document, EditorConfig, PageBox, Workspace};
use egui::{Rect, pos2, vec2};
use image::{Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use serde_json::json;

/// Serves plain white pages instead of shelling out to a PDF renderer
struct WhitePages;

impl Rasterizer for WhitePages {
    fn render_page(&self, _pdf: &Path, _page_index: usize) -> Result<RgbaImage, RenderError> {
        Ok(RgbaImage::from_pixel(40, 20, Rgba([255, 255, 255, 255])))
    }
}

fn workspace_in(root: &Path) -> Workspace {
    let workspace = Workspace::new(EditorConfig {
        config_dir: root.join("configs"),
        input_dir: root.join("input_pdfs"),
        output_dir: root.join("output_pdfs"),
        temp_img_dir: root.join("temp_images"),
        input_img_dir: root.join("input_img"),
        target_height: 100,
        ..EditorConfig::default()
    });
    workspace.ensure_dirs().unwrap();
    workspace
}

fn write_pdf(path: &Path, pages: usize) {
    let mut writer = PdfWriter::new();
    for _ in 0..pages {
        writer.add_page(&image::RgbImage::new(200, 100)).unwrap();
    }
    writer.save(path).unwrap();
}

#[test]
fn every_record_becomes_an_output_pdf() {
    let root = tempfile::tempdir().unwrap();
    let workspace = workspace_in(root.path());
    let pdf = workspace.pdf_path("letter");
    write_pdf(&pdf, 2);

    let mut document = workspace.open_or_init(&pdf).unwrap();
    assert_eq!((document.pages[0].width, document.pages[0].height), (200, 100));
    document.pages[0].elements.push(factory::create_rectangle(pos2(10.0, 10.0)));
    let mut name = factory::create_text(pos2(100.0, 10.0));
    name.as_text_mut().unwrap().value = "customer.name".into();
    document.pages[1].elements.push(name);
    document.template_values = vec![json!({"customer": {"name": "Ada"}}), json!({"customer": {"name": "Grace"}})];
    document.save(&workspace.template_path("letter")).unwrap();

    let summary = render_all(&workspace, None, &WhitePages);
    assert!(summary.is_success());
    assert_eq!(
        summary.written,
        vec![workspace.output_path("letter", 0), workspace.output_path("letter", 1)]
    );
    for output in &summary.written {
        let boxes = read_page_boxes(output).unwrap();
        assert_eq!(boxes, vec![PageBox { width: 200.0, height: 100.0 }; 2]);
    }
}

#[test]
fn pdfs_without_templates_are_skipped_unless_named() {
    let root = tempfile::tempdir().unwrap();
    let workspace = workspace_in(root.path());
    write_pdf(&workspace.pdf_path("untouched"), 1);

    let summary = render_all(&workspace, None, &WhitePages);
    assert!(summary.is_success());
    assert!(summary.written.is_empty());

    let summary = render_all(&workspace, Some("untouched"), &WhitePages);
    assert_eq!(summary.failed, 1);
}

#[test]
fn extra_template_pages_are_dropped() {
    let root = tempfile::tempdir().unwrap();
    let workspace = workspace_in(root.path());
    let pdf = workspace.pdf_path("short");
    write_pdf(&pdf, 1);

    let boxes = [PageBox { width: 200.0, height: 100.0 }; 3];
    let mut document = Document::skeleton(&boxes, 100);
    document.pages[2].elements.push(factory::create_obscure(pos2(0.0, 0.0)));
    document.save(&workspace.template_path("short")).unwrap();

    let summary = render_all(&workspace, Some("short.pdf"), &WhitePages);
    assert_eq!(summary.written.len(), 1);
    assert_eq!(read_page_boxes(&summary.written[0]).unwrap().len(), 1);
}

#[test]
fn painted_pixels_follow_the_element_boxes() {
    use doc_templater::render::{FontBook, RasterPainter, render_record};

    let root = tempfile::tempdir().unwrap();
    let workspace = workspace_in(root.path());
    let mut document = Document::skeleton(&[PageBox { width: 200.0, height: 100.0 }], 100);
    let mut rectangle = factory::create_rectangle(pos2(0.0, 0.0));
    rectangle.set_rect(Rect::from_min_size(pos2(20.0, 20.0), vec2(30.0, 30.0)));
    document.pages[0].elements.push(rectangle);
    let mut redacted = factory::create_obscure(pos2(0.0, 0.0));
    redacted.set_rect(Rect::from_min_size(pos2(120.0, 20.0), vec2(40.0, 40.0)));
    if let doc_templater::ElementKind::Obscure(obscure) = &mut redacted.kind {
        obscure.mode = doc_templater::element::ObscureMode::Blacken;
    }
    document.pages[0].elements.push(redacted);

    let background = RgbaImage::from_pixel(200, 100, Rgba([255, 255, 255, 255]));
    let mut painter = RasterPainter::new(workspace.assets("letter"), FontBook::new(None));
    let pages = render_record(&document, &[background], &json!({}), &mut painter);

    let page = &pages[0];
    let Rgb(gray) = Rgb::LIGHT_GRAY;
    assert_eq!(page.get_pixel(30, 30).0, gray);
    assert_eq!(page.get_pixel(140, 40).0, [0, 0, 0]);
    assert_eq!(page.get_pixel(5, 5).0, [255, 255, 255]);
}
