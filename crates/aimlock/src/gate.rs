//! Fire-decision gate and turret command emission.
//!
//! Hit probability multiplies three factors: range (linear falloff to the
//! maximum engagement range), detection confidence, and a speed penalty for
//! fast movers. The fire flag additionally demands a valid classified target
//! and a strict engagement-range bracket.

use serde::{Deserialize, Serialize};

use crate::pipeline::TargetingResult;

/// Engagement range bracket, meters. Both bounds are strict.
pub const MIN_ENGAGE_RANGE_M: f64 = 1.0;
pub const MAX_ENGAGE_RANGE_M: f64 = 8.0;

/// Targets at or above this speed (m/s) halve the hit probability.
pub const SLOW_TARGET_MPS: f64 = 2.0;

/// Minimum hit probability to fire (strict).
pub const FIRE_PROBABILITY_FLOOR: f64 = 0.5;

/// Stage J: fill `hit_probability` and `can_fire`.
pub fn fire_decision(mut result: TargetingResult) -> TargetingResult {
    if !result.position_solved {
        return result;
    }

    let dist_m = result.distance_3d / 100.0;
    let distance_factor = (1.0 - dist_m / MAX_ENGAGE_RANGE_M).max(0.0);
    let confidence_factor = result.confidence / 100.0;
    let speed_mps = result.velocity_3d.norm() / 1000.0;
    let velocity_factor = if speed_mps < SLOW_TARGET_MPS { 1.0 } else { 0.5 };

    result.hit_probability = distance_factor * confidence_factor * velocity_factor;
    result.can_fire = result.hit_probability > FIRE_PROBABILITY_FLOOR
        && dist_m > MIN_ENGAGE_RANGE_M
        && dist_m < MAX_ENGAGE_RANGE_M
        && result.is_valid_target;

    if result.can_fire {
        tracing::info!(
            hit_probability = result.hit_probability,
            yaw = result.firing_yaw,
            pitch = result.firing_pitch,
            "firing solution ready"
        );
    }
    result
}

/// Aim command handed to the turret transport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurretCommand {
    /// Firing yaw, degrees.
    pub yaw_deg: f64,
    /// Firing pitch, degrees.
    pub pitch_deg: f64,
}

/// The command for this frame, iff the gate opened.
pub fn turret_command(result: &TargetingResult) -> Option<TurretCommand> {
    result.can_fire.then(|| TurretCommand {
        yaw_deg: result.firing_yaw,
        pitch_deg: result.firing_pitch,
    })
}

/// Operator force-fire: command from any solved result, bypassing the gate.
pub fn force_command(result: &TargetingResult) -> Option<TurretCommand> {
    result.position_solved.then(|| TurretCommand {
        yaw_deg: result.firing_yaw,
        pitch_deg: result.firing_pitch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn engageable(distance_cm: f64, confidence: f64) -> TargetingResult {
        TargetingResult {
            position_solved: true,
            is_valid_target: true,
            distance_3d: distance_cm,
            confidence,
            ..TargetingResult::empty()
        }
    }

    #[test]
    fn close_confident_target_fires() {
        let result = fire_decision(engageable(200.0, 90.0));
        assert!(result.hit_probability > 0.5);
        assert!(result.can_fire);
        assert!(turret_command(&result).is_some());
    }

    #[test]
    fn range_bounds_are_strict() {
        assert!(!fire_decision(engageable(100.0, 100.0)).can_fire);
        assert!(!fire_decision(engageable(800.0, 100.0)).can_fire);
        assert!(fire_decision(engageable(101.0, 100.0)).can_fire);
    }

    #[test]
    fn far_target_has_zero_probability() {
        let result = fire_decision(engageable(2000.0, 100.0));
        assert_eq!(result.hit_probability, 0.0);
        assert!(!result.can_fire);
    }

    #[test]
    fn probability_stays_in_unit_interval() {
        for &(d, c) in &[(0.0, 100.0), (150.0, 100.0), (799.0, 100.0), (400.0, 0.0)] {
            let result = fire_decision(engageable(d, c));
            assert!(
                (0.0..=1.0).contains(&result.hit_probability),
                "p = {} for d={d} c={c}",
                result.hit_probability
            );
        }
    }

    #[test]
    fn speed_boundary_uses_strict_comparison() {
        let mut slow = engageable(200.0, 100.0);
        slow.velocity_3d = Vector3::new(1999.0, 0.0, 0.0);
        let slow = fire_decision(slow);

        let mut at_limit = engageable(200.0, 100.0);
        at_limit.velocity_3d = Vector3::new(2000.0, 0.0, 0.0);
        let at_limit = fire_decision(at_limit);

        assert_relative_eq!(slow.hit_probability, at_limit.hit_probability * 2.0);
    }

    #[test]
    fn invalid_target_never_fires() {
        let mut result = engageable(200.0, 100.0);
        result.is_valid_target = false;
        let result = fire_decision(result);
        assert!(result.hit_probability > 0.5);
        assert!(!result.can_fire);
        assert!(turret_command(&result).is_none());
    }

    #[test]
    fn force_command_only_needs_a_solved_position() {
        let mut result = engageable(2000.0, 10.0);
        result.firing_yaw = 12.5;
        let result = fire_decision(result);
        assert!(!result.can_fire);
        let cmd = force_command(&result).unwrap();
        assert_eq!(cmd.yaw_deg, 12.5);
        assert!(force_command(&TargetingResult::empty()).is_none());
    }

    #[test]
    fn unsolved_result_keeps_defaults() {
        let result = fire_decision(TargetingResult::empty());
        assert_eq!(result.hit_probability, 0.0);
        assert!(!result.can_fire);
    }
}
