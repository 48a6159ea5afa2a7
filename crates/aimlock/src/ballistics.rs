//! Gravity-compensated firing solution.
//!
//! Flight time is recomputed against the predicted aim point, the vertical
//! drop over that flight follows `d = g·t²/2`, and the firing pitch aims
//! above the target by the drop. Yaw is unaffected by gravity.

use crate::config::BallisticsParams;
use crate::geom;
use crate::pipeline::TargetingResult;

/// Stage H: fill `flight_time`, `bullet_drop`, `firing_yaw`, `firing_pitch`.
pub fn firing_solution(
    mut result: TargetingResult,
    params: &BallisticsParams,
) -> TargetingResult {
    if !result.position_solved {
        return result;
    }

    let predicted_range = result.predicted_pos.norm();
    // Legacy form divides the mm-magnitude range by m/s (see predict.rs for
    // the matching nominal time); the physical variant uses meters.
    let flight_time = if params.physical_flight_time {
        (predicted_range / 1000.0) / params.bullet_speed_mps
    } else {
        predicted_range / params.bullet_speed_mps
    };
    result.flight_time = flight_time;
    result.bullet_drop = 0.5 * params.gravity_mps2 * flight_time * flight_time;

    let (yaw, pitch) = geom::aim_angles_with_drop_deg(result.predicted_pos, result.bullet_drop);
    result.firing_yaw = yaw;
    result.firing_pitch = pitch;
    result
}
