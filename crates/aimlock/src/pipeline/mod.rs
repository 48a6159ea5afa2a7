//! Frame-to-firing-solution orchestration.
//!
//! The pipeline is a strict chain — detect → pose → predict → ballistics →
//! classify → decide — where any stage may abort the rest. A failed stage
//! leaves downstream fields at their defaults; nothing escapes as an error.
//! Every frame's result lands in the history, detection or not, so the
//! predictor always sees the previous frame at `history.back()`.

mod result;
mod run;

pub use result::{BoundingBox, Stage, TargetingResult};

use image::RgbImage;

use crate::classify::{ArmorClassifier, RandomClassifier};
use crate::config::PipelineConfig;
use crate::gate::{self, TurretCommand};
use crate::history::TargetHistory;

/// Run one frame through the full targeting chain.
///
/// This is the functional entry point: stages read `config` and the previous
/// entry of `history`, and the produced result is pushed into `history`
/// before being returned.
pub fn process(
    frame: &RgbImage,
    config: &PipelineConfig,
    history: &mut TargetHistory,
    classifier: &mut dyn ArmorClassifier,
) -> TargetingResult {
    let mut stage = Stage::Idle;
    let result = run::process_frame(frame, config, history, classifier, &mut stage);
    history.push(result.clone());
    result
}

/// Primary targeting interface.
///
/// Owns the configuration, history and classifier. Create once, feed frames.
pub struct Pipeline {
    config: PipelineConfig,
    history: TargetHistory,
    classifier: Box<dyn ArmorClassifier>,
    stage: Stage,
}

impl Pipeline {
    /// Pipeline with the default (placeholder) classifier.
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_classifier(config, Box::new(RandomClassifier::default()))
    }

    /// Pipeline with a caller-supplied classifier implementation.
    pub fn with_classifier(config: PipelineConfig, classifier: Box<dyn ArmorClassifier>) -> Self {
        Self {
            config,
            history: TargetHistory::new(),
            classifier,
            stage: Stage::Idle,
        }
    }

    /// Access the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Mutable configuration access for between-frame operator input.
    pub fn config_mut(&mut self) -> &mut PipelineConfig {
        &mut self.config
    }

    /// Recent results, oldest first.
    pub fn history(&self) -> &TargetHistory {
        &self.history
    }

    /// Stage the orchestrator last settled in (`Idle` between frames).
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Process one frame and record its result.
    pub fn process(&mut self, frame: &RgbImage) -> TargetingResult {
        let result = run::process_frame(
            frame,
            &self.config,
            &self.history,
            &mut *self.classifier,
            &mut self.stage,
        );
        self.history.push(result.clone());
        result
    }

    /// The turret command for a result, iff its fire gate opened.
    pub fn command_for(result: &TargetingResult) -> Option<TurretCommand> {
        gate::turret_command(result)
    }

    /// Operator force-fire from the most recent frame, gate bypassed.
    pub fn force_fire(&self) -> Option<TurretCommand> {
        self.history.back().and_then(gate::force_command)
    }
}
