//! Offline rendering: rasterizing source PDFs, painting elements with data records
//! and writing the baked pages back out as PDFs.

pub mod batch;
mod fonts;
pub mod pdf_writer;
pub mod raster;
pub mod rasterizer;

pub use batch::{BatchSummary, page_backgrounds, render_all, render_record, render_template};
pub use fonts::FontBook;
pub use pdf_writer::PdfWriter;
pub use raster::{RasterPainter, apply_obscure};
pub use rasterizer::{PdftoppmRasterizer, Rasterizer, fit_to_page, read_page_boxes};
