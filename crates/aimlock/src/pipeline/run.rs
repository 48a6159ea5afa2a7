//! Stage composition for a single frame.

use image::RgbImage;

use crate::ballistics;
use crate::classify::{self, ArmorClassifier};
use crate::config::PipelineConfig;
use crate::contour::{self, RotatedRect, BIG_ARMOR_AREA_PX};
use crate::corners;
use crate::gate;
use crate::history::TargetHistory;
use crate::mask;
use crate::pose;
use crate::predict;
use crate::types::ArmorSize;

use super::{BoundingBox, Stage, TargetingResult};

pub(super) fn process_frame(
    frame: &RgbImage,
    config: &PipelineConfig,
    history: &TargetHistory,
    classifier: &mut dyn ArmorClassifier,
    stage: &mut Stage,
) -> TargetingResult {
    *stage = Stage::Detect;
    let (result, rect) = detect_armor(frame, config);
    let Some(rect) = rect else {
        *stage = Stage::Idle;
        return result;
    };

    *stage = Stage::Pose;
    let result = pose::resolve_position(result, &rect, config);
    if !result.position_solved {
        *stage = Stage::Idle;
        return result;
    }

    *stage = Stage::Predict;
    let result = predict::predict_motion(result, history.back(), &config.ballistics);

    *stage = Stage::Ballistics;
    let result = ballistics::firing_solution(result, &config.ballistics);

    *stage = Stage::Classify;
    let result = classify::classify_target(result, frame, classifier, config.valid_targets);

    *stage = Stage::Decide;
    let result = gate::fire_decision(result);

    *stage = Stage::Idle;
    result
}

/// Stages B–D: color mask, contour scoring, corner ordering.
fn detect_armor(frame: &RgbImage, config: &PipelineConfig) -> (TargetingResult, Option<RotatedRect>) {
    let mut result = TargetingResult::empty();

    let mask = mask::enemy_color_mask(frame, config.enemy_color, &config.detection);
    let Some(candidate) = contour::find_best_candidate(&mask, &config.detection) else {
        tracing::debug!("no qualifying contour");
        return (result, None);
    };

    result.armor_detected = true;
    result.confidence = (candidate.score / 10.0).min(100.0);
    result.detected_color = Some(config.enemy_color);
    result.armor_bbox = BoundingBox::from_xywh(candidate.rect.bounding_box());
    result.center_2d = candidate.rect.center;
    result.armor_corners = corners::order_corners(candidate.rect.corners).to_vec();
    result.armor_size = if candidate.area > BIG_ARMOR_AREA_PX {
        ArmorSize::Big
    } else {
        ArmorSize::Small
    };
    tracing::debug!(
        area = candidate.area,
        aspect = candidate.aspect,
        score = candidate.score,
        size = ?result.armor_size,
        "armor candidate selected"
    );

    (result, Some(candidate.rect))
}
