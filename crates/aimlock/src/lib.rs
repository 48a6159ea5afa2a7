//! aimlock — auto-aim targeting pipeline for armor-plate robot combat.
//!
//! Given a camera frame, the pipeline:
//!
//! 1. **Mask** – isolate enemy-colored pixels in HSV, clean morphologically.
//! 2. **Contour** – enumerate blobs, score by area and aspect, pick the best.
//! 3. **Corners** – order the rotated rect corners for the pose solver.
//! 4. **Pose** – planar PnP via homography decomposition, with a pinhole
//!    width-ratio fallback when the solution is implausible.
//! 5. **Predict** – finite-difference velocity, extrapolate over flight time.
//! 6. **Ballistics** – gravity-compensated firing yaw/pitch.
//! 7. **Classify** – robot class and priority behind a pluggable trait.
//! 8. **Decide** – hit probability and the binary fire gate.
//!
//! # Public API
//! [`Pipeline`] (or the functional [`pipeline::process`]) is the entry point;
//! [`PipelineConfig`] carries all tuning; [`TargetingResult`] is the per-frame
//! output and [`TurretCommand`] the actuator-facing product. Stage internals
//! are exported for tooling but are not needed for normal use.

pub mod ballistics;
pub mod camera;
pub mod classify;
pub mod config;
pub mod contour;
pub mod corners;
pub mod gate;
mod geom;
pub mod history;
pub mod mask;
pub mod pipeline;
pub mod pnp;
pub mod pose;
pub mod predict;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use camera::{CameraIntrinsics, CameraModel, RadialDistortion};
pub use classify::{ArmorClassifier, RandomClassifier};
pub use config::{ArmorGeometry, BallisticsParams, DetectionParams, PipelineConfig};
pub use gate::TurretCommand;
pub use geom::{aim_angles_deg, aim_angles_with_drop_deg};
pub use history::{TargetHistory, HISTORY_DEPTH};
pub use mask::frame_from_bgr;
pub use pipeline::{BoundingBox, Pipeline, Stage, TargetingResult};
pub use pnp::{PlanarPose, PnpError};
pub use types::{ArmorSize, EnemyColor, TargetId, ValidTargetMask};
