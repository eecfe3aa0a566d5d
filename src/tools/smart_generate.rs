use egui::{Pos2, Rect};
use log::info;

use super::ToolMode;
use crate::ocr::OcrRequest;
use crate::state::{EditorContext, EditorState, MarqueePurpose};

impl EditorContext {
    /// Starts the marquee that picks a region to scan for text
    pub(crate) fn begin_region_scan(&mut self, base: Pos2) {
        self.clear_selection();
        self.state = EditorState::MarqueeSelecting {
            start: base,
            current: base,
            purpose: MarqueePurpose::Recognize,
        };
    }

    /// Records the scan request for the host to pick up
    pub(crate) fn queue_region_scan(&mut self, region: Rect) {
        let page_size = self.page().size();
        let region = region.intersect(Rect::from_min_size(Pos2::ZERO, page_size));
        if !region.is_positive() {
            self.set_status("Scan region is outside the page");
            return;
        }
        info!(
            "scan requested for {:.0}x{:.0} region at ({:.0}, {:.0})",
            region.width(),
            region.height(),
            region.min.x,
            region.min.y
        );
        self.pending_ocr = Some(OcrRequest {
            page_index: self.page_index,
            region,
        });
        self.tool = ToolMode::Select;
        self.set_status("Scanning region for text");
    }
}
