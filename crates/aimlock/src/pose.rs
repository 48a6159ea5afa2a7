//! 3D position recovery with a 2D range fallback.
//!
//! A PnP solution is accepted only when it is finite and lands inside a sane
//! range bracket. Anything else drops to the pinhole width-ratio estimate:
//! the plate's pixel width gives range, the corner midpoint gives bearing.
//! The fallback costs confidence — a little when PnP merely produced an
//! implausible pose, more when it failed outright.

use nalgebra::Vector3;

use crate::config::PipelineConfig;
use crate::contour::RotatedRect;
use crate::geom;
use crate::pipeline::TargetingResult;
use crate::pnp;

/// Accepted PnP range bracket, cm.
pub const MIN_POSE_DISTANCE_CM: f64 = 5.0;
pub const MAX_POSE_DISTANCE_CM: f64 = 1000.0;

/// Pinhole constant for the width-ratio range estimate: a 100 mm-class plate
/// at focal length 800 px spans `RANGE_CONSTANT / width_px` centimeters.
const RANGE_CONSTANT: f64 = 100.0 * 100.0;

/// Confidence penalty when PnP succeeded but the pose was rejected.
const FALLBACK_PENALTY: f64 = 10.0;
/// Confidence penalty when PnP failed outright.
const FAILURE_PENALTY: f64 = 20.0;

/// Stage E: fill the 3D position fields of `result`, or leave
/// `position_solved` false when even the fallback cannot produce one.
pub fn resolve_position(
    mut result: TargetingResult,
    rect: &RotatedRect,
    config: &PipelineConfig,
) -> TargetingResult {
    if !result.armor_detected || result.armor_corners.len() != 4 {
        return result;
    }

    let model = config.armor.model_corners_mm(result.armor_size);
    let corners: [[f64; 2]; 4] = [
        result.armor_corners[0],
        result.armor_corners[1],
        result.armor_corners[2],
        result.armor_corners[3],
    ];

    match pnp::solve_planar_pose(&model, &corners, &config.camera) {
        Ok(pose) => {
            let distance_cm = pose.tvec.norm() / 10.0;
            if geom::all_finite(pose.tvec)
                && (MIN_POSE_DISTANCE_CM..=MAX_POSE_DISTANCE_CM).contains(&distance_cm)
            {
                result.position_3d = pose.tvec;
                result.rotation_3d = pose.rvec;
                result.position_solved = true;
                result.distance_3d = distance_cm;
            } else {
                tracing::debug!(distance_cm, "pnp pose out of range, using 2d fallback");
                apply_fallback(&mut result, rect, config, FALLBACK_PENALTY);
            }
        }
        Err(err) => {
            tracing::debug!(%err, "pnp solve failed, using 2d fallback");
            apply_fallback(&mut result, rect, config, FAILURE_PENALTY);
        }
    }

    if result.position_solved {
        let (yaw, pitch) = geom::aim_angles_deg(result.position_3d);
        result.yaw_angle = yaw;
        result.pitch_angle = pitch;
    }
    result
}

/// Pinhole width-ratio range estimate with back-projected bearing.
fn apply_fallback(
    result: &mut TargetingResult,
    rect: &RotatedRect,
    config: &PipelineConfig,
    penalty: f64,
) {
    let width_px = rect.long_side();
    if !width_px.is_finite() || width_px <= 0.0 {
        result.position_solved = false;
        return;
    }

    let distance_cm = RANGE_CONSTANT / width_px;
    // Midpoint of the TL and BR corners is the plate center.
    let cx = (result.armor_corners[0][0] + result.armor_corners[2][0]) / 2.0;
    let cy = (result.armor_corners[0][1] + result.armor_corners[2][1]) / 2.0;

    let k = config.camera.intrinsics;
    let x_mm = (cx - k.cx) * distance_cm * 10.0 / k.fx;
    let y_mm = (cy - k.cy) * distance_cm * 10.0 / k.fx;
    let z_mm = distance_cm * 10.0;

    // Y inverted to keep "up is positive" in the synthetic estimate.
    let position = Vector3::new(x_mm, -y_mm, z_mm);
    if !geom::all_finite(position) {
        result.position_solved = false;
        return;
    }

    result.position_3d = position;
    result.distance_3d = distance_cm;
    result.position_solved = true;
    result.confidence = (result.confidence - penalty).max(0.0);
}
