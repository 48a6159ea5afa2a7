//! Planar perspective-n-point pose recovery.
//!
//! The armor plate is a planar target, so its pose follows from the
//! plane-to-image homography: estimate H from the 4 model corners to the
//! undistorted, normalized image corners via DLT with Hartley normalization,
//! then read the rigid pose out of the columns of H (r1, r2, t up to a common
//! scale; r3 = r1 × r2). The rotation block is projected onto SO(3) before
//! conversion to axis-angle.

use nalgebra::{DMatrix, Matrix3, Rotation3, Vector3};

use crate::camera::CameraModel;

// ── Error type ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum PnpError {
    /// Corner set is collapsed or otherwise unusable.
    DegenerateCorners,
    /// Camera model cannot map the corners (invalid intrinsics, diverging
    /// undistortion).
    BadCamera,
    NumericalFailure(String),
}

impl std::fmt::Display for PnpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DegenerateCorners => write!(f, "degenerate corner configuration"),
            Self::BadCamera => write!(f, "camera model rejected the corners"),
            Self::NumericalFailure(msg) => write!(f, "numerical failure: {}", msg),
        }
    }
}

impl std::error::Error for PnpError {}

// ── Pose ─────────────────────────────────────────────────────────────────

/// Recovered rigid pose of the plate in the camera frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarPose {
    /// Translation in model units (mm), camera frame.
    pub tvec: Vector3<f64>,
    /// Axis-angle rotation (radians).
    pub rvec: Vector3<f64>,
}

/// Solve the plate pose from 4 model corners (mm, z = 0) and 4 pixel corners.
pub fn solve_planar_pose(
    model_mm: &[[f64; 3]; 4],
    corners_px: &[[f64; 2]; 4],
    camera: &CameraModel,
) -> Result<PlanarPose, PnpError> {
    // Undistort and normalize the image corners.
    let mut normalized = [[0.0f64; 2]; 4];
    for (i, &px) in corners_px.iter().enumerate() {
        if !px[0].is_finite() || !px[1].is_finite() {
            return Err(PnpError::DegenerateCorners);
        }
        let undist = camera.undistort_pixel(px).ok_or(PnpError::BadCamera)?;
        normalized[i] = camera
            .intrinsics
            .pixel_to_normalized(undist)
            .ok_or(PnpError::BadCamera)?;
    }

    let model_xy: [[f64; 2]; 4] = std::array::from_fn(|i| [model_mm[i][0], model_mm[i][1]]);
    let h = estimate_homography_dlt(&model_xy, &normalized)?;

    decompose_homography(&h)
}

// ── Hartley normalization ────────────────────────────────────────────────

/// Compute a normalizing transform: translate centroid to origin, scale so
/// mean distance from origin is sqrt(2).
fn normalize_points(pts: &[[f64; 2]; 4]) -> Result<(Matrix3<f64>, [[f64; 2]; 4]), PnpError> {
    let n = pts.len() as f64;
    let cx: f64 = pts.iter().map(|p| p[0]).sum::<f64>() / n;
    let cy: f64 = pts.iter().map(|p| p[1]).sum::<f64>() / n;

    let mean_dist: f64 = pts
        .iter()
        .map(|p| ((p[0] - cx).powi(2) + (p[1] - cy).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    if !mean_dist.is_finite() || mean_dist < 1e-12 {
        return Err(PnpError::DegenerateCorners);
    }

    let s = std::f64::consts::SQRT_2 / mean_dist;
    let t = Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0);
    let normalized = std::array::from_fn(|i| [s * (pts[i][0] - cx), s * (pts[i][1] - cy)]);
    Ok((t, normalized))
}

// ── DLT ──────────────────────────────────────────────────────────────────

/// Estimate the homography mapping the 4 plane corners to the 4 image
/// corners, via DLT on Hartley-normalized coordinates.
fn estimate_homography_dlt(
    src: &[[f64; 2]; 4],
    dst: &[[f64; 2]; 4],
) -> Result<Matrix3<f64>, PnpError> {
    let (t_src, src_n) = normalize_points(src)?;
    let (t_dst, dst_n) = normalize_points(dst)?;

    // Build the 8 × 9 DLT matrix.
    let mut a = DMatrix::zeros(8, 9);
    for i in 0..4 {
        let (sx, sy) = (src_n[i][0], src_n[i][1]);
        let (dx, dy) = (dst_n[i][0], dst_n[i][1]);

        a[(2 * i, 3)] = -sx;
        a[(2 * i, 4)] = -sy;
        a[(2 * i, 5)] = -1.0;
        a[(2 * i, 6)] = dy * sx;
        a[(2 * i, 7)] = dy * sy;
        a[(2 * i, 8)] = dy;

        a[(2 * i + 1, 0)] = sx;
        a[(2 * i + 1, 1)] = sy;
        a[(2 * i + 1, 2)] = 1.0;
        a[(2 * i + 1, 6)] = -dx * sx;
        a[(2 * i + 1, 7)] = -dx * sy;
        a[(2 * i + 1, 8)] = -dx;
    }

    // h is the eigenvector of A^T A with the smallest eigenvalue.
    let ata = a.transpose() * &a;
    let eig = nalgebra::SymmetricEigen::new(ata);
    let mut min_idx = 0;
    let mut min_val = eig.eigenvalues[0].abs();
    for i in 1..9 {
        let v = eig.eigenvalues[i].abs();
        if v < min_val {
            min_val = v;
            min_idx = i;
        }
    }
    let h_vec: Vec<f64> = (0..9).map(|j| eig.eigenvectors[(j, min_idx)]).collect();
    #[rustfmt::skip]
    let h_norm = Matrix3::new(
        h_vec[0], h_vec[1], h_vec[2],
        h_vec[3], h_vec[4], h_vec[5],
        h_vec[6], h_vec[7], h_vec[8],
    );

    let t_dst_inv = t_dst
        .try_inverse()
        .ok_or_else(|| PnpError::NumericalFailure("normalization not invertible".into()))?;
    let h = t_dst_inv * h_norm * t_src;

    if h.iter().any(|v| !v.is_finite()) {
        return Err(PnpError::NumericalFailure("non-finite homography".into()));
    }
    Ok(h)
}

// ── Decomposition ────────────────────────────────────────────────────────

/// Extract (R, t) from a plane-to-normalized-image homography.
fn decompose_homography(h: &Matrix3<f64>) -> Result<PlanarPose, PnpError> {
    let h1 = h.column(0).into_owned();
    let h2 = h.column(1).into_owned();
    let h3 = h.column(2).into_owned();

    let n1 = h1.norm();
    let n2 = h2.norm();
    if !(n1.is_finite() && n2.is_finite()) || n1 < 1e-12 || n2 < 1e-12 {
        return Err(PnpError::NumericalFailure("rank-deficient homography".into()));
    }
    let lambda = 2.0 / (n1 + n2);

    let mut r1 = h1 * lambda;
    let mut r2 = h2 * lambda;
    let mut t = h3 * lambda;
    // The plate must sit in front of the camera.
    if t.z < 0.0 {
        r1 = -r1;
        r2 = -r2;
        t = -t;
    }

    let r3 = r1.cross(&r2);
    if r3.norm() < 1e-9 {
        return Err(PnpError::NumericalFailure("collapsed rotation basis".into()));
    }
    let approx = Matrix3::from_columns(&[r1, r2, r3]);
    let rotation = Rotation3::from_matrix(&approx);
    let rvec = rotation.scaled_axis();

    if t.iter().any(|v| !v.is_finite()) || rvec.iter().any(|v| !v.is_finite()) {
        return Err(PnpError::NumericalFailure("non-finite pose".into()));
    }
    Ok(PlanarPose { tvec: t, rvec })
}

// ── Tests ────────────────────────────────────────────────────────────────
