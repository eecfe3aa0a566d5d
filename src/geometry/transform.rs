//! Conversions between the three coordinate spaces of the editor.
//!
//! * **Base space**: the page pixel grid at zoom 1.0. This is what templates store
//!   and the only space the batch renderer knows about.
//! * **Scaled-canvas space**: base space multiplied by the zoom factor.
//! * **Screen space**: scaled-canvas space translated to the canvas anchor, which
//!   centres the scaled page in the viewport and then applies the pan offset.

use egui::{Pos2, Rect, Vec2, pos2, vec2};

/// Discrete zoom factors, ascending
pub const ZOOM_LEVELS: [f32; 16] = [
    0.25, 0.33, 0.5, 0.66, 0.75, 0.8, 0.9, 1.0, 1.1, 1.25, 1.5, 1.75, 2.0, 2.5, 3.0, 4.0,
];

/// Index of 1.0 in [`ZOOM_LEVELS`]
pub const DEFAULT_ZOOM_INDEX: usize = 7;

pub const DEFAULT_PAN_LEEWAY: f32 = 500.0;

/// Half of the free space along one axis, floored to a whole pixel
fn centering_offset(window: f32, scaled: f32) -> f32 {
    ((window - scaled) / 2.0).floor()
}

/// Top-left of the scaled canvas relative to the viewport's own origin.
pub fn canvas_origin(window: Vec2, scaled: Vec2, pan: Vec2) -> Pos2 {
    pos2(
        centering_offset(window.x, scaled.x) + pan.x,
        centering_offset(window.y, scaled.y) + pan.y,
    )
}

pub fn screen_to_base(screen: Pos2, canvas: Pos2, zoom: f32) -> Pos2 {
    ((screen - canvas) / zoom).to_pos2()
}

pub fn base_to_screen(base: Pos2, canvas: Pos2, zoom: f32) -> Pos2 {
    canvas + base.to_vec2() * zoom
}

/// Limits panning so the page never leaves the viewport by more than `leeway` pixels.
///
/// Each axis is clamped to `[min(0, c) - leeway, max(0, c) + leeway]` where `c` is the
/// centering offset on that axis. The range does not depend on `pan`, so clamping twice
/// gives the same result as clamping once.
pub fn clamp_pan(pan: Vec2, window: Vec2, scaled: Vec2, leeway: f32) -> Vec2 {
    let clamp_axis = |pan: f32, window: f32, scaled: f32| {
        let centre = centering_offset(window, scaled);
        let min = centre.min(0.0) - leeway;
        let max = centre.max(0.0) + leeway;
        pan.clamp(min, max)
    };
    vec2(
        clamp_axis(pan.x, window.x, scaled.x),
        clamp_axis(pan.y, window.y, scaled.y),
    )
}

/// Zoom and pan of the editor view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom_index: usize,
    pub pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom_index: DEFAULT_ZOOM_INDEX,
            pan: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub fn with_zoom_index(zoom_index: usize) -> Self {
        Self {
            zoom_index: zoom_index.min(ZOOM_LEVELS.len() - 1),
            pan: Vec2::ZERO,
        }
    }

    pub fn zoom(&self) -> f32 {
        ZOOM_LEVELS[self.zoom_index.min(ZOOM_LEVELS.len() - 1)]
    }

    pub fn zoom_index(&self) -> usize {
        self.zoom_index
    }

    /// Steps one level up; saturates at the largest level
    pub fn zoom_in(&mut self) {
        if self.zoom_index + 1 < ZOOM_LEVELS.len() {
            self.zoom_index += 1;
        }
    }

    /// Steps one level down; saturates at the smallest level
    pub fn zoom_out(&mut self) {
        self.zoom_index = self.zoom_index.saturating_sub(1);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom_index = DEFAULT_ZOOM_INDEX;
    }

    pub fn reset_pan(&mut self) {
        self.pan = Vec2::ZERO;
    }

    /// Clamps the pan offset for the given viewport and page size
    pub fn clamp(&mut self, window: Vec2, page_size: Vec2, leeway: f32) {
        self.pan = clamp_pan(self.pan, window, page_size * self.zoom(), leeway);
    }

    /// Lays the page out inside `viewport_rect` (screen coordinates)
    pub fn layout(&self, viewport_rect: Rect, page_size: Vec2) -> CanvasLayout {
        let zoom = self.zoom();
        let origin = canvas_origin(viewport_rect.size(), page_size * zoom, self.pan);
        CanvasLayout {
            origin: viewport_rect.min + origin.to_vec2(),
            zoom,
            page_size,
        }
    }
}

/// Where the page sits on screen for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasLayout {
    /// Screen position of the page's base-space origin
    pub origin: Pos2,
    pub zoom: f32,
    pub page_size: Vec2,
}

impl CanvasLayout {
    pub fn to_base(&self, screen: Pos2) -> Pos2 {
        screen_to_base(screen, self.origin, self.zoom)
    }

    pub fn to_screen(&self, base: Pos2) -> Pos2 {
        base_to_screen(base, self.origin, self.zoom)
    }

    pub fn rect_to_screen(&self, base: Rect) -> Rect {
        Rect::from_min_max(self.to_screen(base.min), self.to_screen(base.max))
    }

    /// Screen rectangle covered by the page
    pub fn page_rect(&self) -> Rect {
        Rect::from_min_size(self.origin, self.page_size * self.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_is_centred_then_panned() {
        let origin = canvas_origin(vec2(1000.0, 800.0), vec2(600.0, 401.0), vec2(10.0, -5.0));
        assert_eq!(origin, pos2(210.0, 194.0));
    }

    #[test]
    fn centering_floors_negative_offsets() {
        // (500 - 801) / 2 = -150.5, floored like integer division
        let origin = canvas_origin(vec2(500.0, 500.0), vec2(801.0, 500.0), Vec2::ZERO);
        assert_eq!(origin.x, -151.0);
    }

    #[test]
    fn zoom_saturates_at_both_ends() {
        let mut viewport = Viewport::default();
        assert_eq!(viewport.zoom(), 1.0);
        for _ in 0..40 {
            viewport.zoom_in();
        }
        assert_eq!(viewport.zoom(), 4.0);
        for _ in 0..40 {
            viewport.zoom_out();
        }
        assert_eq!(viewport.zoom(), 0.25);
        viewport.reset_zoom();
        assert_eq!(viewport.zoom_index(), DEFAULT_ZOOM_INDEX);
    }

    #[test]
    fn clamp_small_canvas_is_symmetric_around_centre() {
        // canvas fits: centre = 200, range = [-500, 700]
        let window = vec2(1000.0, 1000.0);
        let scaled = vec2(600.0, 600.0);
        assert_eq!(clamp_pan(vec2(5000.0, -5000.0), window, scaled, 500.0), vec2(700.0, -500.0));
    }

    #[test]
    fn clamp_large_canvas_allows_scrolling_to_far_edge() {
        // canvas overflows: centre = -500, range = [-1000, 500]
        let window = vec2(1000.0, 1000.0);
        let scaled = vec2(2000.0, 2000.0);
        assert_eq!(clamp_pan(vec2(-2000.0, 2000.0), window, scaled, 500.0), vec2(-1000.0, 500.0));
    }

    #[test]
    fn layout_round_trips_points() {
        let mut viewport = Viewport::with_zoom_index(12);
        viewport.pan = vec2(30.0, -20.0);
        let layout = viewport.layout(
            Rect::from_min_size(pos2(200.0, 40.0), vec2(1200.0, 900.0)),
            vec2(1545.0, 2000.0),
        );
        let base = pos2(123.0, 456.0);
        let back = layout.to_base(layout.to_screen(base));
        assert!((back.x - base.x).abs() < 0.001 && (back.y - base.y).abs() < 0.001);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn screen_to_base_inverts_base_to_screen(
                bx in -5000.0f32..5000.0,
                by in -5000.0f32..5000.0,
                cx in -3000.0f32..3000.0,
                cy in -3000.0f32..3000.0,
                zoom_index in 0usize..ZOOM_LEVELS.len(),
            ) {
                let zoom = ZOOM_LEVELS[zoom_index];
                let canvas = pos2(cx.round(), cy.round());
                let base = pos2(bx, by);
                let back = screen_to_base(base_to_screen(base, canvas, zoom), canvas, zoom);
                prop_assert!((back.x - base.x).abs() < 0.01);
                prop_assert!((back.y - base.y).abs() < 0.01);
            }

            #[test]
            fn clamp_pan_is_idempotent(
                px in -10000.0f32..10000.0,
                py in -10000.0f32..10000.0,
                ww in 1.0f32..4000.0,
                wh in 1.0f32..4000.0,
                sw in 1.0f32..8000.0,
                sh in 1.0f32..8000.0,
                leeway in 0.0f32..1000.0,
            ) {
                let window = vec2(ww.round(), wh.round());
                let scaled = vec2(sw.round(), sh.round());
                let once = clamp_pan(vec2(px, py), window, scaled, leeway);
                let twice = clamp_pan(once, window, scaled, leeway);
                prop_assert_eq!(once, twice);
            }
        }
    }
}
