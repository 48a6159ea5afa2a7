//! Candidate blob enumeration and scoring.
//!
//! Outer contours of the color mask are scored by area and the aspect ratio
//! of their minimum-area rotated rectangle; the best-scoring contour becomes
//! the armor candidate. Ties keep the earliest contour in input order.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry::min_area_rect;
use imageproc::point::Point;

use crate::config::DetectionParams;

/// Blob area above which a plate is classified as the large armor.
pub(crate) const BIG_ARMOR_AREA_PX: f64 = 2000.0;

/// Oriented bounding rectangle of a contour.
#[derive(Debug, Clone, Copy)]
pub struct RotatedRect {
    /// Corner points in consecutive (hull) order.
    pub corners: [[f64; 2]; 4],
    /// Center of the rectangle.
    pub center: [f64; 2],
    /// Length of the first side.
    pub width: f64,
    /// Length of the second side.
    pub height: f64,
}

impl RotatedRect {
    /// Minimum-area rotated rectangle of a point set.
    ///
    /// Returns `None` for degenerate inputs (fewer than 4 points).
    pub fn from_points(points: &[Point<i32>]) -> Option<Self> {
        if points.len() < 4 {
            return None;
        }
        let rect = min_area_rect(points);
        let corners: [[f64; 2]; 4] =
            std::array::from_fn(|i| [rect[i].x as f64, rect[i].y as f64]);
        let center = [
            corners.iter().map(|c| c[0]).sum::<f64>() / 4.0,
            corners.iter().map(|c| c[1]).sum::<f64>() / 4.0,
        ];
        let side = |a: [f64; 2], b: [f64; 2]| ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt();
        Some(Self {
            corners,
            center,
            width: side(corners[0], corners[1]),
            height: side(corners[1], corners[2]),
        })
    }

    /// Longer side length in pixels.
    pub fn long_side(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Shorter side length in pixels.
    pub fn short_side(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Long/short side ratio; infinite for zero-thickness rects.
    pub fn aspect_ratio(&self) -> f64 {
        let short = self.short_side();
        if short > 0.0 {
            self.long_side() / short
        } else {
            f64::INFINITY
        }
    }

    /// Axis-aligned bounding box as (x, y, width, height).
    pub fn bounding_box(&self) -> [f64; 4] {
        let min_x = self.corners.iter().map(|c| c[0]).fold(f64::INFINITY, f64::min);
        let max_x = self.corners.iter().map(|c| c[0]).fold(f64::NEG_INFINITY, f64::max);
        let min_y = self.corners.iter().map(|c| c[1]).fold(f64::INFINITY, f64::min);
        let max_y = self.corners.iter().map(|c| c[1]).fold(f64::NEG_INFINITY, f64::max);
        [min_x, min_y, max_x - min_x, max_y - min_y]
    }
}

/// Shoelace area of a closed pixel contour.
pub fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0i64;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        twice_area += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
    }
    (twice_area.abs() as f64) / 2.0
}

/// A qualifying blob with its score.
#[derive(Debug, Clone, Copy)]
pub struct ArmorCandidate {
    pub rect: RotatedRect,
    pub area: f64,
    pub aspect: f64,
    pub score: f64,
}

/// Pick the best-scoring armor candidate from the mask, if any qualifies.
pub fn find_best_candidate(mask: &GrayImage, params: &DetectionParams) -> Option<ArmorCandidate> {
    let contours = find_contours::<i32>(mask);
    let n_outer = contours
        .iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .count();
    tracing::debug!(n_outer, "contours extracted");

    let mut best: Option<ArmorCandidate> = None;
    for contour in &contours {
        if contour.border_type != BorderType::Outer {
            continue;
        }
        let area = contour_area(&contour.points);
        if area < params.area_threshold {
            continue;
        }
        let Some(rect) = RotatedRect::from_points(&contour.points) else {
            continue;
        };
        let aspect = rect.aspect_ratio();
        if aspect < params.aspect_ratio_min || aspect > params.aspect_ratio_max {
            continue;
        }

        let score = area / (aspect * 100.0);
        if best.map_or(true, |b| score > b.score) {
            best = Some(ArmorCandidate {
                rect,
                area,
                aspect,
                score,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn rect_mask(w: u32, h: u32, x0: u32, y0: u32, rw: u32, rh: u32) -> GrayImage {
        let mut mask = GrayImage::new(w, h);
        for y in y0..y0 + rh {
            for x in x0..x0 + rw {
                mask.put_pixel(x, y, Luma([255u8]));
            }
        }
        mask
    }

    #[test]
    fn shoelace_area_of_square_contour() {
        let square = [
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 10),
        ];
        assert_eq!(contour_area(&square), 100.0);
    }

    #[test]
    fn degenerate_contour_has_zero_area() {
        let p = Point::new(3, 3);
        assert_eq!(contour_area(&[p, p, p, p]), 0.0);
        assert_eq!(contour_area(&[p]), 0.0);
    }

    #[test]
    fn rect_of_identical_points_is_rejected() {
        assert!(RotatedRect::from_points(&[Point::new(1, 1); 2]).is_none());
    }

    #[test]
    fn axis_aligned_blob_yields_matching_rect() {
        let mask = rect_mask(100, 100, 20, 30, 40, 20);
        let cand = find_best_candidate(&mask, &DetectionParams::default()).unwrap();
        assert!((cand.rect.long_side() - 39.0).abs() <= 1.0);
        assert!((cand.rect.short_side() - 19.0).abs() <= 1.0);
        assert!((cand.rect.center[0] - 39.5).abs() <= 1.0);
        assert!((cand.rect.center[1] - 39.5).abs() <= 1.0);
        assert!((cand.aspect - 2.0).abs() < 0.2);
    }

    #[test]
    fn area_below_threshold_is_rejected() {
        // 9x11 blob: boundary-polygon area is 80, just below the default 100.
        let mask = rect_mask(64, 64, 10, 10, 9, 11);
        assert!(find_best_candidate(&mask, &DetectionParams::default()).is_none());
    }

    #[test]
    fn aspect_above_maximum_is_rejected() {
        // 61x11 boundary polygon: aspect 6 > 5.
        let mask = rect_mask(128, 64, 5, 5, 61, 11);
        assert!(find_best_candidate(&mask, &DetectionParams::default()).is_none());
        let mut relaxed = DetectionParams::default();
        relaxed.widen_aspect_ratio();
        relaxed.widen_aspect_ratio();
        assert!(find_best_candidate(&mask, &relaxed).is_some());
    }

    #[test]
    fn best_score_wins_among_multiple_blobs() {
        let mut mask = rect_mask(200, 100, 10, 10, 40, 20);
        // Second, smaller blob with the same shape scores lower.
        for y in 60..70 {
            for x in 120..140 {
                mask.put_pixel(x, y, Luma([255u8]));
            }
        }
        let cand = find_best_candidate(&mask, &DetectionParams::default()).unwrap();
        assert!(cand.rect.center[0] < 100.0, "expected the large blob to win");
    }

    #[test]
    fn empty_mask_yields_no_candidate() {
        let mask = GrayImage::new(64, 64);
        assert!(find_best_candidate(&mask, &DetectionParams::default()).is_none());
    }

    #[test]
    fn bounding_box_covers_rect() {
        let mask = rect_mask(100, 100, 20, 30, 40, 20);
        let cand = find_best_candidate(&mask, &DetectionParams::default()).unwrap();
        let [x, y, w, h] = cand.rect.bounding_box();
        assert!(x <= 20.0 && y <= 30.0);
        assert!(w >= 38.0 && h >= 18.0);
    }
}
