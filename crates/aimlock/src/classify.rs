//! Target classification and validity gating.
//!
//! Classification is behind a trait so a real digit/number recognizer can
//! replace the default. The default implementation draws a uniform robot
//! class — demonstration behavior carried over from the original system —
//! from a seeded generator so runs are reproducible.

use image::RgbImage;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::pipeline::TargetingResult;
use crate::types::{TargetId, ValidTargetMask};

/// Maps a detected plate patch to a robot class and its priority.
pub trait ArmorClassifier {
    fn classify(&mut self, patch: &RgbImage) -> (TargetId, u8);
}

/// Placeholder classifier: uniform over the five known classes.
#[derive(Debug)]
pub struct RandomClassifier {
    rng: StdRng,
}

impl RandomClassifier {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomClassifier {
    fn default() -> Self {
        Self::seeded(0)
    }
}

impl ArmorClassifier for RandomClassifier {
    fn classify(&mut self, _patch: &RgbImage) -> (TargetId, u8) {
        let id = match self.rng.gen_range(1..=5) {
            1 => TargetId::Hero,
            2 => TargetId::Sentry,
            3 => TargetId::Infantry3,
            4 => TargetId::Infantry4,
            _ => TargetId::Infantry5,
        };
        (id, id.priority())
    }
}

/// Stage I: classify the detected plate and apply the validity mask.
pub fn classify_target(
    mut result: TargetingResult,
    frame: &RgbImage,
    classifier: &mut dyn ArmorClassifier,
    mask: ValidTargetMask,
) -> TargetingResult {
    if !result.position_solved {
        return result;
    }

    let patch = crop_bbox(frame, &result);
    let (id, priority) = classifier.classify(&patch);
    result.target_id = id;
    result.target_priority = priority;
    result.is_valid_target = mask.allows(id);
    if !result.is_valid_target {
        tracing::debug!(?id, "target class rejected by validity mask");
    }
    result
}

/// Clamp the armor bbox to the frame and crop it out for the classifier.
fn crop_bbox(frame: &RgbImage, result: &TargetingResult) -> RgbImage {
    let (fw, fh) = frame.dimensions();
    let bb = &result.armor_bbox;
    let x0 = bb.x.max(0.0) as u32;
    let y0 = bb.y.max(0.0) as u32;
    let x0 = x0.min(fw.saturating_sub(1));
    let y0 = y0.min(fh.saturating_sub(1));
    let w = (bb.width.max(1.0) as u32).min(fw - x0);
    let h = (bb.height.max(1.0) as u32).min(fh - y0);
    image::imageops::crop_imm(frame, x0, y0, w.max(1), h.max(1)).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::BoundingBox;

    fn solved_result() -> TargetingResult {
        TargetingResult {
            position_solved: true,
            armor_bbox: BoundingBox {
                x: 10.0,
                y: 10.0,
                width: 20.0,
                height: 10.0,
            },
            ..TargetingResult::empty()
        }
    }

    #[test]
    fn classified_target_gets_a_known_class_and_priority() {
        let frame = RgbImage::new(64, 48);
        let mut classifier = RandomClassifier::seeded(7);
        let result = classify_target(
            solved_result(),
            &frame,
            &mut classifier,
            ValidTargetMask::ALL,
        );
        assert_ne!(result.target_id, TargetId::Unknown);
        assert_eq!(result.target_priority, result.target_id.priority());
        assert!(result.is_valid_target);
    }

    #[test]
    fn empty_mask_marks_target_invalid() {
        let frame = RgbImage::new(64, 48);
        let mut classifier = RandomClassifier::seeded(7);
        let result = classify_target(
            solved_result(),
            &frame,
            &mut classifier,
            ValidTargetMask::NONE,
        );
        assert_ne!(result.target_id, TargetId::Unknown);
        assert!(!result.is_valid_target);
    }

    #[test]
    fn seeded_classifier_is_reproducible() {
        let frame = RgbImage::new(8, 8);
        let mut a = RandomClassifier::seeded(42);
        let mut b = RandomClassifier::seeded(42);
        for _ in 0..16 {
            assert_eq!(a.classify(&frame), b.classify(&frame));
        }
    }

    #[test]
    fn unsolved_result_is_not_classified() {
        let frame = RgbImage::new(64, 48);
        let mut classifier = RandomClassifier::seeded(7);
        let result = classify_target(
            TargetingResult::empty(),
            &frame,
            &mut classifier,
            ValidTargetMask::ALL,
        );
        assert_eq!(result.target_id, TargetId::Unknown);
        assert!(!result.is_valid_target);
    }

    #[test]
    fn bbox_outside_frame_is_clamped() {
        let frame = RgbImage::new(32, 32);
        let mut result = solved_result();
        result.armor_bbox = BoundingBox {
            x: 28.0,
            y: 30.0,
            width: 100.0,
            height: 100.0,
        };
        let patch = crop_bbox(&frame, &result);
        assert!(patch.width() >= 1 && patch.height() >= 1);
        assert!(patch.width() <= 32 && patch.height() <= 32);
    }

    /// A fixed classifier stands in for a real recognizer behind the trait.
    struct AlwaysHero;

    impl ArmorClassifier for AlwaysHero {
        fn classify(&mut self, _patch: &RgbImage) -> (TargetId, u8) {
            (TargetId::Hero, TargetId::Hero.priority())
        }
    }

    #[test]
    fn pluggable_classifier_drives_the_mask() {
        let frame = RgbImage::new(16, 16);
        let mut classifier = AlwaysHero;
        let mask = ValidTargetMask {
            hero: false,
            ..ValidTargetMask::ALL
        };
        let result = classify_target(solved_result(), &frame, &mut classifier, mask);
        assert_eq!(result.target_id, TargetId::Hero);
        assert!(!result.is_valid_target);
    }
}
