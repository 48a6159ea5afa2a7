//! Enemy-color mask extraction.
//!
//! Frames are converted pixel-wise to HSV using the OpenCV 8-bit convention
//! (hue halved into 0..=180, saturation/value in 0..=255) so the range
//! constants keep their customary values. Red needs two hue windows because
//! it straddles the hue wrap; blue is a single window. The raw mask is
//! cleaned with a morphological open (erode, then a slightly larger dilate).

use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};

use crate::config::DetectionParams;
use crate::types::EnemyColor;

/// Inclusive HSV window, OpenCV 8-bit convention.
#[derive(Debug, Clone, Copy)]
pub struct HsvRange {
    pub lo: [u8; 3],
    pub hi: [u8; 3],
}

impl HsvRange {
    fn contains(self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| self.lo[i] <= hsv[i] && hsv[i] <= self.hi[i])
    }
}

/// Low-hue half of the red window.
pub const RED_LOW: HsvRange = HsvRange {
    lo: [0, 100, 100],
    hi: [10, 255, 255],
};

/// Wrap-around half of the red window.
pub const RED_HIGH: HsvRange = HsvRange {
    lo: [170, 100, 100],
    hi: [180, 255, 255],
};

/// The blue window.
pub const BLUE: HsvRange = HsvRange {
    lo: [100, 100, 100],
    hi: [130, 255, 255],
};

/// Convert an RGB pixel to OpenCV-convention HSV.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> [u8; 3] {
    let (rf, gf, bf) = (r as f64, g as f64, b as f64);
    let v = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = v - min;

    let s = if v > 0.0 { 255.0 * delta / v } else { 0.0 };

    let h = if delta > 0.0 {
        let h_deg = if v == rf {
            60.0 * (gf - bf) / delta
        } else if v == gf {
            120.0 + 60.0 * (bf - rf) / delta
        } else {
            240.0 + 60.0 * (rf - gf) / delta
        };
        let h_deg = if h_deg < 0.0 { h_deg + 360.0 } else { h_deg };
        h_deg / 2.0
    } else {
        0.0
    };

    [
        h.round().min(180.0) as u8,
        s.round().min(255.0) as u8,
        v.round().min(255.0) as u8,
    ]
}

fn pixel_matches(hsv: [u8; 3], color: EnemyColor) -> bool {
    match color {
        EnemyColor::Red => RED_LOW.contains(hsv) || RED_HIGH.contains(hsv),
        EnemyColor::Blue => BLUE.contains(hsv),
    }
}

/// Binary mask (0/255) of enemy-colored pixels, morphologically cleaned.
pub fn enemy_color_mask(frame: &RgbImage, color: EnemyColor, params: &DetectionParams) -> GrayImage {
    let (w, h) = frame.dimensions();
    let mut mask = GrayImage::new(w, h);
    for (x, y, px) in frame.enumerate_pixels() {
        let hsv = rgb_to_hsv(px[0], px[1], px[2]);
        if pixel_matches(hsv, color) {
            mask.put_pixel(x, y, Luma([255u8]));
        }
    }

    // Disc structuring elements: radius is half the configured kernel size.
    let erode_radius = (params.erosion_size / 2).max(1) as u8;
    let dilate_radius = (params.dilation_size / 2).max(1) as u8;
    let mask = erode(&mask, Norm::L2, erode_radius);
    dilate(&mask, Norm::L2, dilate_radius)
}

/// Adapt a raw BGR byte frame (the frame-source wire layout) to an [`RgbImage`].
///
/// Returns `None` when `data` does not hold exactly `width * height * 3` bytes.
pub fn frame_from_bgr(width: u32, height: u32, data: &[u8]) -> Option<RgbImage> {
    if data.len() != (width as usize) * (height as usize) * 3 {
        return None;
    }
    let rgb: Vec<u8> = data
        .chunks_exact(3)
        .flat_map(|bgr| [bgr[2], bgr[1], bgr[0]])
        .collect();
    RgbImage::from_raw(width, height, rgb)
}
