//! Pipeline configuration.
//!
//! Owned by the orchestrator; read-only while a frame is in flight. The
//! operator-input collaborator mutates it between frames through the
//! adjustment methods below.

use serde::{Deserialize, Serialize};

use crate::camera::CameraModel;
use crate::types::{ArmorSize, EnemyColor, ValidTargetMask};

/// Detection tuning knobs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DetectionParams {
    /// Grayscale binarization threshold, kept for the tuning interface.
    pub binary_threshold: f64,
    /// Minimum contour area in pixels.
    pub area_threshold: f64,
    /// Minimum accepted long/short aspect ratio of the rotated rect.
    pub aspect_ratio_min: f64,
    /// Maximum accepted long/short aspect ratio of the rotated rect.
    pub aspect_ratio_max: f64,
    /// Structuring-element size for mask erosion (pixels).
    pub erosion_size: u32,
    /// Structuring-element size for mask dilation (pixels).
    pub dilation_size: u32,
}

impl DetectionParams {
    pub const AREA_STEP: f64 = 50.0;
    pub const AREA_FLOOR: f64 = 50.0;
    pub const ASPECT_STEP: f64 = 0.5;
    pub const ASPECT_FLOOR: f64 = 2.0;

    /// Operator `+`: demand bigger blobs.
    pub fn raise_area_threshold(&mut self) {
        self.area_threshold += Self::AREA_STEP;
    }

    /// Operator `-`: accept smaller blobs, floored at [`Self::AREA_FLOOR`].
    pub fn lower_area_threshold(&mut self) {
        self.area_threshold = (self.area_threshold - Self::AREA_STEP).max(Self::AREA_FLOOR);
    }

    /// Operator `a`: accept more elongated blobs.
    pub fn widen_aspect_ratio(&mut self) {
        self.aspect_ratio_max += Self::ASPECT_STEP;
    }

    /// Operator `z`: tighten the aspect gate, floored at [`Self::ASPECT_FLOOR`].
    pub fn narrow_aspect_ratio(&mut self) {
        self.aspect_ratio_max = (self.aspect_ratio_max - Self::ASPECT_STEP).max(Self::ASPECT_FLOOR);
    }
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            binary_threshold: 100.0,
            area_threshold: 100.0,
            aspect_ratio_min: 1.0,
            aspect_ratio_max: 5.0,
            erosion_size: 2,
            dilation_size: 3,
        }
    }
}

/// Projectile parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BallisticsParams {
    /// Muzzle velocity in m/s.
    pub bullet_speed_mps: f64,
    /// Gravitational acceleration in m/s².
    pub gravity_mps2: f64,
    /// Compute flight times from meters instead of the legacy raw cm/mm
    /// magnitudes. Off by default; downstream gating is tuned for the
    /// legacy behavior.
    pub physical_flight_time: bool,
}

impl Default for BallisticsParams {
    fn default() -> Self {
        Self {
            bullet_speed_mps: 30.0,
            gravity_mps2: 9.81,
            physical_flight_time: false,
        }
    }
}

/// Armor plate footprints in millimeters.
///
/// Plates are planar rectangles centered at the model origin; corners run
/// TL, TR, BR, BL, i.e. (−x, −y), (+x, −y), (+x, +y), (−x, +y).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ArmorGeometry {
    /// Half extents of the small plate (x, y) in mm.
    pub small_half_extents_mm: [f64; 2],
    /// Half extents of the large plate (x, y) in mm.
    pub large_half_extents_mm: [f64; 2],
}

impl ArmorGeometry {
    /// The 4 model corners in mm for the given plate class.
    ///
    /// `Unknown` falls back to the small plate.
    pub fn model_corners_mm(&self, size: ArmorSize) -> [[f64; 3]; 4] {
        let [hx, hy] = match size {
            ArmorSize::Big => self.large_half_extents_mm,
            ArmorSize::Small | ArmorSize::Unknown => self.small_half_extents_mm,
        };
        [
            [-hx, -hy, 0.0],
            [hx, -hy, 0.0],
            [hx, hy, 0.0],
            [-hx, hy, 0.0],
        ]
    }
}

impl Default for ArmorGeometry {
    fn default() -> Self {
        Self {
            small_half_extents_mm: [67.5, 27.5],
            large_half_extents_mm: [115.0, 27.5],
        }
    }
}

/// Complete per-session configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    pub enemy_color: EnemyColor,
    pub camera: CameraModel,
    pub detection: DetectionParams,
    pub ballistics: BallisticsParams,
    pub valid_targets: ValidTargetMask,
    pub armor: ArmorGeometry,
}

impl PipelineConfig {
    /// Operator `t`: swap the hunted team color.
    pub fn toggle_enemy_color(&mut self) {
        self.enemy_color = self.enemy_color.toggled();
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_threshold_never_drops_below_floor() {
        let mut params = DetectionParams::default();
        for _ in 0..10 {
            params.lower_area_threshold();
        }
        assert_eq!(params.area_threshold, DetectionParams::AREA_FLOOR);
        params.raise_area_threshold();
        assert_eq!(params.area_threshold, 100.0);
    }

    #[test]
    fn aspect_ratio_max_never_drops_below_floor() {
        let mut params = DetectionParams::default();
        for _ in 0..20 {
            params.narrow_aspect_ratio();
        }
        assert_eq!(params.aspect_ratio_max, DetectionParams::ASPECT_FLOOR);
    }

    #[test]
    fn small_model_corners_run_tl_tr_br_bl() {
        let armor = ArmorGeometry::default();
        let corners = armor.model_corners_mm(ArmorSize::Small);
        assert_eq!(corners[0], [-67.5, -27.5, 0.0]);
        assert_eq!(corners[1], [67.5, -27.5, 0.0]);
        assert_eq!(corners[2], [67.5, 27.5, 0.0]);
        assert_eq!(corners[3], [-67.5, 27.5, 0.0]);
    }

    #[test]
    fn unknown_size_uses_small_model() {
        let armor = ArmorGeometry::default();
        assert_eq!(
            armor.model_corners_mm(ArmorSize::Unknown),
            armor.model_corners_mm(ArmorSize::Small)
        );
    }

    #[test]
    fn big_model_is_wider_only() {
        let armor = ArmorGeometry::default();
        let big = armor.model_corners_mm(ArmorSize::Big);
        assert_eq!(big[1][0], 115.0);
        assert_eq!(big[2][1], 27.5);
    }

    #[test]
    fn config_json_roundtrip() {
        let mut config = PipelineConfig::default();
        config.toggle_enemy_color();
        config.detection.raise_area_threshold();
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
