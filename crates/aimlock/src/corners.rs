//! Image-plane corner ordering.
//!
//! The rotated rect's corners arrive in hull order with an arbitrary start.
//! Pose solving needs them aligned with the armor model's TL, TR, BR, BL
//! convention. Corners are bucketed into rows by y (5 px tolerance), sorted
//! left-to-right within a row, then the bottom pair is swapped into clockwise
//! order. For strongly rotated rects the row split is approximate and the
//! result is a quasi-ordering; the pose acceptance gate downstream rejects
//! solutions this breaks.

/// Two corners within this vertical distance count as one row.
pub const ROW_TOLERANCE_PX: f64 = 5.0;

/// Order rect corners as TL, TR, BR, BL.
pub fn order_corners(corners: [[f64; 2]; 4]) -> [[f64; 2]; 4] {
    let mut pts = corners;
    pts.sort_by(|a, b| {
        if (a[1] - b[1]).abs() < ROW_TOLERANCE_PX {
            a[0].total_cmp(&b[0])
        } else {
            a[1].total_cmp(&b[1])
        }
    });
    // Row-major gives TL, TR, BL, BR; swap the bottom pair into ring order.
    pts.swap(2, 3);
    pts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_aligned_corners_order_clockwise() {
        let shuffled = [
            [360.0, 260.0],
            [280.0, 220.0],
            [280.0, 260.0],
            [360.0, 220.0],
        ];
        let ordered = order_corners(shuffled);
        assert_eq!(ordered[0], [280.0, 220.0]); // TL
        assert_eq!(ordered[1], [360.0, 220.0]); // TR
        assert_eq!(ordered[2], [360.0, 260.0]); // BR
        assert_eq!(ordered[3], [280.0, 260.0]); // BL
    }

    #[test]
    fn slight_tilt_within_tolerance_keeps_row_grouping() {
        let shuffled = [
            [360.0, 223.0],
            [280.0, 220.0],
            [283.0, 260.0],
            [363.0, 263.0],
        ];
        let ordered = order_corners(shuffled);
        assert_eq!(ordered[0], [280.0, 220.0]);
        assert_eq!(ordered[1], [360.0, 223.0]);
        assert_eq!(ordered[2], [363.0, 263.0]);
        assert_eq!(ordered[3], [283.0, 260.0]);
    }

    #[test]
    fn ordering_is_idempotent() {
        let corners = [
            [280.0, 220.0],
            [360.0, 220.0],
            [360.0, 260.0],
            [280.0, 260.0],
        ];
        assert_eq!(order_corners(order_corners(corners)), order_corners(corners));
    }

    #[test]
    fn midpoint_of_first_and_third_is_rect_center() {
        let ordered = order_corners([
            [280.0, 220.0],
            [360.0, 220.0],
            [280.0, 260.0],
            [360.0, 260.0],
        ]);
        let cx = (ordered[0][0] + ordered[2][0]) / 2.0;
        let cy = (ordered[0][1] + ordered[2][1]) / 2.0;
        assert_eq!([cx, cy], [320.0, 240.0]);
    }
}
