pub mod hit_testing;
pub mod transform;

pub use hit_testing::{elements_at, elements_in_marquee, hit_handle, marquee_rect, overlaps};
pub use transform::{
    CanvasLayout, DEFAULT_PAN_LEEWAY, DEFAULT_ZOOM_INDEX, Viewport, ZOOM_LEVELS, base_to_screen,
    canvas_origin, clamp_pan, screen_to_base,
};
