//! Synthetic battlefield frame source.
//!
//! Stands in for the camera when none is attached: one enemy robot orbits
//! the field center while its plate slowly spins.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use aimlock::EnemyColor;

pub const FRAME_WIDTH: u32 = 640;
pub const FRAME_HEIGHT: u32 = 480;

/// Plate footprint in pixels.
const PLATE_W: f64 = 80.0;
const PLATE_H: f64 = 40.0;

/// Per-frame advance of the simulation clock.
pub const TICK_STEP: f64 = 0.05;

/// Render the battlefield at simulation time `tick`.
pub fn battlefield_frame(tick: f64, enemy_color: EnemyColor) -> RgbImage {
    let mut frame = RgbImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, Rgb([40, 40, 40]));

    let cx = 320.0 + 150.0 * tick.sin();
    let cy = 240.0 + 100.0 * (tick * 0.7).cos();
    let angle_deg = tick * 10.0;

    let color = match enemy_color {
        EnemyColor::Red => Rgb([255u8, 0, 0]),
        EnemyColor::Blue => Rgb([0u8, 0, 255]),
    };

    let corners = plate_corners(cx, cy, angle_deg);
    draw_polygon_mut(&mut frame, &corners, color);
    frame
}

/// Rotated plate corners, clockwise, as integer pixel points.
fn plate_corners(cx: f64, cy: f64, angle_deg: f64) -> [Point<i32>; 4] {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let (hw, hh) = (PLATE_W / 2.0, PLATE_H / 2.0);
    let local = [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)];
    local.map(|(x, y)| {
        Point::new(
            (cx + x * cos - y * sin).round() as i32,
            (cy + x * sin + y * cos).round() as i32,
        )
    })
}
