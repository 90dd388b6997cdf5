use crate::geometry::Rect;
use crate::label::Rgb;
use image::RgbImage;
use imageproc::drawing::draw_hollow_rect_mut;

/// Draws a `thickness`-pixel outline inside `rect`.
///
/// Inner rings stop once the rectangle is too small to hold them.
pub fn draw_outline(canvas: &mut RgbImage, rect: Rect, color: Rgb, thickness: u32) {
    let color = image::Rgb::from(color);
    for t in 0..thickness.max(1) {
        let inset = 2 * t;
        if rect.width <= inset || rect.height <= inset {
            break;
        }
        let ring = imageproc::rect::Rect::at((rect.x + t) as i32, (rect.y + t) as i32)
            .of_size(rect.width - inset, rect.height - inset);
        draw_hollow_rect_mut(canvas, ring, color);
    }
}
