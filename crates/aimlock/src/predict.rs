//! Short-horizon motion prediction.
//!
//! Velocity is a finite difference against the previous frame's solved
//! position at a fixed 30 fps frame interval, and the aim point is a linear
//! extrapolation over the nominal projectile flight time. Without a usable
//! previous frame the target is treated as stationary.

use crate::config::BallisticsParams;
use crate::pipeline::TargetingResult;

/// Fixed inter-frame interval (30 fps), seconds.
pub const FRAME_DT_S: f64 = 1.0 / 30.0;

/// Nominal flight time used for extrapolation.
///
/// Legacy form divides the range in centimeters by the muzzle speed in m/s,
/// a deliberate unit mismatch the downstream gating is tuned around; the
/// physical variant converts to meters first.
pub(crate) fn nominal_flight_time(distance_cm: f64, params: &BallisticsParams) -> f64 {
    if params.physical_flight_time {
        (distance_cm / 100.0) / params.bullet_speed_mps
    } else {
        distance_cm / params.bullet_speed_mps
    }
}

/// Stage G: fill `velocity_3d`, `flight_time` and `predicted_pos`.
pub fn predict_motion(
    mut result: TargetingResult,
    previous: Option<&TargetingResult>,
    params: &BallisticsParams,
) -> TargetingResult {
    if !result.position_solved {
        return result;
    }

    match previous {
        Some(prev) if prev.position_solved => {
            let velocity = (result.position_3d - prev.position_3d) / FRAME_DT_S;
            let flight_time = nominal_flight_time(result.distance_3d, params);
            result.velocity_3d = velocity;
            result.flight_time = flight_time;
            result.predicted_pos = result.position_3d + velocity * flight_time;
        }
        _ => {
            result.predicted_pos = result.position_3d;
        }
    }
    result
}
