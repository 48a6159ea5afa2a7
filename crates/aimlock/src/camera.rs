//! Pinhole camera intrinsics and radial distortion.
//!
//! The pose solver consumes undistorted pixel corners; the 2D range fallback
//! reads `fx`/`cx`/`cy` directly. Distortion defaults to zero, which makes
//! undistortion the identity on the default configuration.

use serde::{Deserialize, Serialize};

/// Pinhole camera intrinsics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CameraIntrinsics {
    /// Focal length in x (pixels).
    pub fx: f64,
    /// Focal length in y (pixels).
    pub fy: f64,
    /// Principal point x (pixels).
    pub cx: f64,
    /// Principal point y (pixels).
    pub cy: f64,
}

impl CameraIntrinsics {
    /// Returns `true` when all entries are finite and focal lengths non-zero.
    pub fn is_valid(self) -> bool {
        self.fx.is_finite()
            && self.fy.is_finite()
            && self.cx.is_finite()
            && self.cy.is_finite()
            && self.fx.abs() > 1e-12
            && self.fy.abs() > 1e-12
    }

    /// Convert pixel coordinates to normalized pinhole coordinates.
    pub fn pixel_to_normalized(self, pixel_xy: [f64; 2]) -> Option<[f64; 2]> {
        if !self.is_valid() {
            return None;
        }
        let x = (pixel_xy[0] - self.cx) / self.fx;
        let y = (pixel_xy[1] - self.cy) / self.fy;
        if x.is_finite() && y.is_finite() {
            Some([x, y])
        } else {
            None
        }
    }

    /// Convert normalized pinhole coordinates to pixel coordinates.
    pub fn normalized_to_pixel(self, normalized_xy: [f64; 2]) -> [f64; 2] {
        [
            self.fx * normalized_xy[0] + self.cx,
            self.fy * normalized_xy[1] + self.cy,
        ]
    }
}

impl Default for CameraIntrinsics {
    fn default() -> Self {
        Self {
            fx: 800.0,
            fy: 800.0,
            cx: 320.0,
            cy: 240.0,
        }
    }
}

/// Radial distortion coefficients k1…k4.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RadialDistortion {
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
    pub k4: f64,
}

impl RadialDistortion {
    /// Returns `true` when every coefficient is zero.
    pub fn is_zero(self) -> bool {
        self.k1 == 0.0 && self.k2 == 0.0 && self.k3 == 0.0 && self.k4 == 0.0
    }

    fn radial_factor(self, r2: f64) -> f64 {
        let r4 = r2 * r2;
        let r6 = r4 * r2;
        let r8 = r4 * r4;
        1.0 + self.k1 * r2 + self.k2 * r4 + self.k3 * r6 + self.k4 * r8
    }

    /// Apply distortion to normalized coordinates.
    pub fn distort_normalized(self, normalized_xy: [f64; 2]) -> [f64; 2] {
        let [x, y] = normalized_xy;
        let radial = self.radial_factor(x * x + y * y);
        [x * radial, y * radial]
    }
}

/// Distortion inversion settings used by iterative undistortion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UndistortConfig {
    /// Maximum fixed-point iterations.
    pub max_iters: usize,
    /// Stop when the coordinate update norm is below this threshold.
    pub eps: f64,
}

impl Default for UndistortConfig {
    fn default() -> Self {
        Self {
            max_iters: 15,
            eps: 1e-12,
        }
    }
}

/// Complete camera model (intrinsics + radial distortion).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CameraModel {
    pub intrinsics: CameraIntrinsics,
    pub distortion: RadialDistortion,
}

impl CameraModel {
    /// Distort an undistorted pixel point into image pixel coordinates.
    pub fn distort_pixel(self, undistorted_pixel_xy: [f64; 2]) -> Option<[f64; 2]> {
        let xn = self.intrinsics.pixel_to_normalized(undistorted_pixel_xy)?;
        let xd = self.distortion.distort_normalized(xn);
        let pix = self.intrinsics.normalized_to_pixel(xd);
        if pix[0].is_finite() && pix[1].is_finite() {
            Some(pix)
        } else {
            None
        }
    }

    /// Undistort a pixel point with default iterative settings.
    pub fn undistort_pixel(self, distorted_pixel_xy: [f64; 2]) -> Option<[f64; 2]> {
        self.undistort_pixel_with(distorted_pixel_xy, UndistortConfig::default())
    }

    /// Undistort a pixel point with custom iterative settings.
    pub fn undistort_pixel_with(
        self,
        distorted_pixel_xy: [f64; 2],
        cfg: UndistortConfig,
    ) -> Option<[f64; 2]> {
        let xd = self.intrinsics.pixel_to_normalized(distorted_pixel_xy)?;
        if self.distortion.is_zero() {
            return Some(distorted_pixel_xy);
        }

        let mut x = xd[0];
        let mut y = xd[1];
        for _ in 0..cfg.max_iters.max(1) {
            let radial = self.distortion.radial_factor(x * x + y * y);
            if !radial.is_finite() || radial.abs() < 1e-12 {
                return None;
            }

            let x_next = xd[0] / radial;
            let y_next = xd[1] / radial;
            if !x_next.is_finite() || !y_next.is_finite() {
                return None;
            }

            let dx = x_next - x;
            let dy = y_next - y;
            x = x_next;
            y = y_next;
            if (dx * dx + dy * dy).sqrt() <= cfg.eps.max(0.0) {
                break;
            }
        }

        let out = self.intrinsics.normalized_to_pixel([x, y]);
        if out[0].is_finite() && out[1].is_finite() {
            Some(out)
        } else {
            None
        }
    }
}
