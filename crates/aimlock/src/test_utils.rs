//! Shared test utilities for frame-based unit tests.

use image::{Rgb, RgbImage};

pub(crate) const RED_RGB: [u8; 3] = [255, 0, 0];
pub(crate) const BLUE_RGB: [u8; 3] = [0, 0, 255];

/// A solid-color frame.
pub(crate) fn solid_frame(w: u32, h: u32, color: [u8; 3]) -> RgbImage {
    let mut img = RgbImage::new(w, h);
    for px in img.pixels_mut() {
        *px = Rgb(color);
    }
    img
}

/// Paint an axis-aligned filled rectangle centered at `(cx, cy)`.
///
/// Covers `x ∈ [cx - w/2, cx - w/2 + w)` and the matching y span, clipped
/// to the frame.
pub(crate) fn draw_axis_rect(img: &mut RgbImage, cx: u32, cy: u32, w: u32, h: u32, color: [u8; 3]) {
    let (fw, fh) = img.dimensions();
    let x0 = cx.saturating_sub(w / 2);
    let y0 = cy.saturating_sub(h / 2);
    for y in y0..(y0 + h).min(fh) {
        for x in x0..(x0 + w).min(fw) {
            img.put_pixel(x, y, Rgb(color));
        }
    }
}

/// The standard 640×480 battlefield backdrop with one armor plate.
pub(crate) fn battlefield_with_plate(cx: u32, cy: u32, w: u32, h: u32, color: [u8; 3]) -> RgbImage {
    let mut frame = solid_frame(640, 480, [40, 40, 40]);
    draw_axis_rect(&mut frame, cx, cy, w, h, color);
    frame
}
