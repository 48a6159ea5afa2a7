//! Degree-valued aim angles with non-finite guards.
//!
//! All camera-frame positions use the pinhole convention: X right, Y down,
//! Z forward. Yaw is positive to the right, pitch positive upward (hence the
//! sign flip on Y). Degenerate inputs never propagate NaN into angle fields:
//! the affected angle collapses to 0 and a warning is emitted.

use nalgebra::Vector3;

pub(crate) const RAD_TO_DEG: f64 = 180.0 / std::f64::consts::PI;

/// Horizontal-range threshold below which pitch is forced to 0.
const HORIZ_EPS_MM: f64 = 1e-3;

pub(crate) fn all_finite(v: Vector3<f64>) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

/// Yaw and pitch in degrees toward a camera-frame point, in that order.
///
/// Returns `(0, 0)` when the point is non-finite or sits on the camera's
/// vertical axis (`x == 0 && z == 0`).
pub fn aim_angles_deg(p: Vector3<f64>) -> (f64, f64) {
    aim_angles_with_drop_deg(p, 0.0)
}

/// Like [`aim_angles_deg`], with the pitch aimed above the point by
/// `drop` (same length unit as `p`) to compensate projectile fall.
pub fn aim_angles_with_drop_deg(p: Vector3<f64>, drop: f64) -> (f64, f64) {
    if !all_finite(p) || !drop.is_finite() {
        tracing::warn!(x = p.x, y = p.y, z = p.z, drop, "non-finite aim input, forcing angles to 0");
        return (0.0, 0.0);
    }
    if p.x == 0.0 && p.z == 0.0 {
        return (0.0, 0.0);
    }

    let yaw = p.x.atan2(p.z) * RAD_TO_DEG;
    let horiz = (p.x * p.x + p.z * p.z).sqrt();
    let pitch = if horiz > HORIZ_EPS_MM {
        (-(p.y - drop)).atan2(horiz) * RAD_TO_DEG
    } else {
        0.0
    };
    (yaw, pitch)
}
