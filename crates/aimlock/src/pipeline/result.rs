//! Per-frame targeting result.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::types::{ArmorSize, EnemyColor, TargetId};

/// Axis-aligned bounding box in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub(crate) fn from_xywh([x, y, width, height]: [f64; 4]) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Pipeline progress marker. The orchestrator walks the stages in order;
/// any failure returns it straight to `Idle` with a partial result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Idle,
    Detect,
    Pose,
    Predict,
    Ballistics,
    Classify,
    Decide,
}

/// Everything the pipeline knows about the current frame.
///
/// Produced fresh per frame and pushed to the history whether or not a plate
/// was found. Downstream fields keep their defaults when an earlier stage
/// aborted the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetingResult {
    // Vision detection
    pub armor_detected: bool,
    pub armor_bbox: BoundingBox,
    /// Rect center in float pixels.
    pub center_2d: [f64; 2],
    /// Ordered TL, TR, BR, BL image corners; exactly 4 entries when
    /// `armor_detected`.
    pub armor_corners: Vec<[f64; 2]>,
    pub detected_color: Option<EnemyColor>,
    pub armor_size: ArmorSize,
    /// Detection confidence in [0, 100].
    pub confidence: f64,

    // 3D positioning
    pub position_solved: bool,
    /// Camera-frame position in mm (X right, Y down, Z forward).
    pub position_3d: Vector3<f64>,
    /// Axis-angle rotation (radians).
    pub rotation_3d: Vector3<f64>,
    /// Range in centimeters.
    pub distance_3d: f64,

    // Motion prediction
    /// Finite-difference velocity in mm/s.
    pub velocity_3d: Vector3<f64>,
    /// Extrapolated position at projectile arrival, mm.
    pub predicted_pos: Vector3<f64>,

    // Aim at the current position
    /// Yaw to the current position, degrees.
    pub yaw_angle: f64,
    /// Pitch to the current position, degrees.
    pub pitch_angle: f64,

    // Firing solution
    /// Nominal projectile flight time (see `BallisticsParams` for units).
    pub flight_time: f64,
    /// Gravity drop over the flight, mm.
    pub bullet_drop: f64,
    /// Yaw to the predicted position, degrees.
    pub firing_yaw: f64,
    /// Drop-compensated pitch to the predicted position, degrees.
    pub firing_pitch: f64,
    /// Heuristic hit probability in [0, 1].
    pub hit_probability: f64,
    pub can_fire: bool,

    // Classification
    pub target_id: TargetId,
    /// Engagement priority, 1 (highest) to 5; 0 when unclassified.
    pub target_priority: u8,
    pub is_valid_target: bool,
}

impl TargetingResult {
    /// A fully defaulted result, as returned for frames with no detection.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl Default for TargetingResult {
    fn default() -> Self {
        Self {
            armor_detected: false,
            armor_bbox: BoundingBox::default(),
            center_2d: [0.0, 0.0],
            armor_corners: Vec::new(),
            detected_color: None,
            armor_size: ArmorSize::Unknown,
            confidence: 0.0,
            position_solved: false,
            position_3d: Vector3::zeros(),
            rotation_3d: Vector3::zeros(),
            distance_3d: 0.0,
            velocity_3d: Vector3::zeros(),
            predicted_pos: Vector3::zeros(),
            yaw_angle: 0.0,
            pitch_angle: 0.0,
            flight_time: 0.0,
            bullet_drop: 0.0,
            firing_yaw: 0.0,
            firing_pitch: 0.0,
            hit_probability: 0.0,
            can_fire: false,
            target_id: TargetId::Unknown,
            target_priority: 0,
            is_valid_target: false,
        }
    }
}
