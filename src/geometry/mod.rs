//! Rectangle overlap tests and rotation with canvas growth.

mod rect;
pub mod rotate;

pub use rect::{overlap_ratio, overlaps, Corners, Rect};
pub use rotate::{rotate_gray, rotated_canvas};
