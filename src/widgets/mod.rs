mod handle_marker;

pub use handle_marker::HandleMarker;
