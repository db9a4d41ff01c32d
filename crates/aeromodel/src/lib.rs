//! Aerodynamic model fitter.
//!
//! Turns a measured polar table into the compact parametric model a rotor
//! performance solver expects for one blade section: a linear lift curve
//! with zero-lift angle, a quadratic drag polar, and a post-stall lift
//! slope. The routine is special-purpose, tuned to this shape of polar
//! curve; it is not a general curve-fitting facility.

use std::f64::consts::PI;

use thiserror::Error;

use rotor_core::scan::nearest_index;
use rotor_core::units::deg_to_rad;
use rotor_importer::PolarTable;

/// Local d(Cd)/d(Cl) slopes at or above this magnitude mark the end of the
/// drag bucket; the drag-polar and lift-slope fits only use points below it.
const DRAG_SLOPE_LIMIT: f64 = 0.05;

/// Leading quadratic coefficients below this magnitude are treated as a
/// degenerate drag polar: the vertex division would blow up. Physical values
/// sit around 1e-2..1e-1.
const QUADRATIC_EPS: f64 = 1.0e-12;

/// Fitted aero-section model. Assembled once, after every fitting step has
/// succeeded; a failed fit never yields a partially-populated value.
#[derive(Debug, Clone, PartialEq)]
pub struct AeroModel {
    /// Zero-lift angle of attack in degrees.
    pub zero_lift_alpha: f64,
    /// Lift-curve slope per radian.
    pub dcl_dalpha: f64,
    /// Post-stall lift slope per radian, negative across a lift break.
    pub dcl_dalpha_stall: f64,
    /// Last lift coefficient inside the linear region.
    pub max_cl: f64,
    /// First lift coefficient inside the linear region.
    pub min_cl: f64,
    /// Lift margin between the end of the linear region and the stall peak.
    pub cl_increment_to_stall: f64,
    /// Drag at the bottom of the drag bucket.
    pub min_cd: f64,
    /// Lift coefficient at the bottom of the drag bucket.
    pub cl_at_min_cd: f64,
    /// d(Cd)/d(Cl**2), the curvature of the drag polar.
    pub dcd_ddcl: f64,
    /// Reynolds number the polar was measured at.
    pub reynolds: f64,
    /// Measured angles of attack in radians, retained for plotting.
    pub alpha_list: Vec<f64>,
    /// Measured lift coefficients, aligned with `alpha_list`.
    pub cl_list: Vec<f64>,
    /// Measured drag coefficients, aligned with `alpha_list`.
    pub cd_list: Vec<f64>,
}

/// Numeric degeneracies of the characterization. None of these are masked
/// into NaN or infinite results; the caller discards the attempt.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("polar table needs at least 2 samples, got {0}")]
    InsufficientSamples(usize),
    #[error("duplicate Cl between points {0} and {1}; the local drag slope is undefined")]
    ZeroClStep(usize, usize),
    #[error("duplicate alpha between linear-region points {0} and {1}; the lift slope is undefined")]
    ZeroAlphaStep(usize, usize),
    #[error("degenerate drag polar; no usable quadratic through the linear region")]
    DegenerateDragPolar,
    #[error("minimum-drag point sits at the edge of the linear region; the lift slope needs a right neighbour")]
    LiftSlopeAtEdge,
    #[error("no post-stall candidates with positive lift; cannot characterise stall")]
    NoStallCandidates,
}

/// Characterise a measured polar.
///
/// All point filtering works on the leading N-1 samples; the last raw sample
/// never enters any fitting stage. The retained `*_list` sequences share that
/// truncation and stay unfiltered.
pub fn fit_polar(table: &PolarTable, reynolds: f64) -> Result<AeroModel, FitError> {
    let n = table.len();
    if n < 2 {
        return Err(FitError::InsufficientSamples(n));
    }
    let alpha = &table.alpha_deg;
    let cl = &table.cl;
    let cd = &table.cd;

    // Partition by the local drag-polar slope: points inside the drag bucket
    // feed the quadratic and lift-slope fits, points past it with positive
    // lift feed the stall characterization.
    let mut cl_lin = Vec::new();
    let mut cd_lin = Vec::new();
    let mut alpha_lin = Vec::new();
    let mut cl_posi = Vec::new();
    let mut alpha_posi = Vec::new();
    for i in 0..n - 1 {
        let dcl = cl[i + 1] - cl[i];
        if dcl == 0.0 {
            return Err(FitError::ZeroClStep(i, i + 1));
        }
        let slope = (cd[i + 1] - cd[i]) / dcl;
        if slope.abs() < DRAG_SLOPE_LIMIT {
            cl_lin.push(cl[i]);
            cd_lin.push(cd[i]);
            alpha_lin.push(alpha[i]);
        }
        if slope >= DRAG_SLOPE_LIMIT && cl[i] > 0.0 {
            cl_posi.push(cl[i]);
            alpha_posi.push(alpha[i]);
        }
    }
    log::debug!(
        "slope partition: {} linear-region points, {} stall candidates",
        cl_lin.len(),
        cl_posi.len()
    );

    // Drag bucket: least-squares parabola cd = a*cl^2 + b*cl + c.
    let [a, b, c] = polyfit2(&cl_lin, &cd_lin)?;
    if a.abs() < QUADRATIC_EPS {
        return Err(FitError::DegenerateDragPolar);
    }
    let cl_at_min_cd = -b / (2.0 * a);
    let min_cd = c - b * b / (4.0 * a);

    // Lift slope between the linear-region point closest to the bottom of
    // the drag bucket and its right neighbour.
    let j = nearest_index(&cl_lin, cl_at_min_cd).ok_or(FitError::DegenerateDragPolar)?;
    if j + 1 >= cl_lin.len() {
        return Err(FitError::LiftSlopeAtEdge);
    }
    let dalpha = alpha_lin[j + 1] - alpha_lin[j];
    if dalpha == 0.0 {
        return Err(FitError::ZeroAlphaStep(j, j + 1));
    }
    let slope_per_deg = (cl_lin[j + 1] - cl_lin[j]) / dalpha;
    if slope_per_deg == 0.0 {
        return Err(FitError::ZeroClStep(j, j + 1));
    }
    let dcl_dalpha = slope_per_deg * 180.0 / PI;
    // alpha_lin is in degrees, so this comes out in degrees; plotting code
    // converts before mixing it with radian angles.
    let zero_lift_alpha = alpha_lin[j] - cl_lin[j] / slope_per_deg;

    let max_cl = cl_lin[cl_lin.len() - 1];
    let min_cl = cl_lin[0];

    // Stall: highest positive-lift candidate past the drag bucket, first
    // occurrence on ties.
    let mut stall = None;
    for (k, &candidate) in cl_posi.iter().enumerate() {
        match stall {
            Some((best, _)) if candidate <= best => {}
            _ => stall = Some((candidate, alpha_posi[k])),
        }
    }
    let Some((cl_stall, alpha_stall)) = stall else {
        return Err(FitError::NoStallCandidates);
    };
    let alpha_last = alpha_lin[alpha_lin.len() - 1];
    let dcl_dalpha_stall = (cl_stall - max_cl) / (alpha_stall - alpha_last) * 180.0 / PI;
    let cl_increment_to_stall = cl_stall - max_cl;

    Ok(AeroModel {
        zero_lift_alpha,
        dcl_dalpha,
        dcl_dalpha_stall,
        max_cl,
        min_cl,
        cl_increment_to_stall,
        min_cd,
        cl_at_min_cd,
        dcd_ddcl: a,
        reynolds,
        alpha_list: alpha[..n - 1].iter().map(|&v| deg_to_rad(v)).collect(),
        cl_list: cl[..n - 1].to_vec(),
        cd_list: cd[..n - 1].to_vec(),
    })
}

/// Least-squares parabola through the `(x, y)` pairs, coefficients returned
/// highest power first.
fn polyfit2(x: &[f64], y: &[f64]) -> Result<[f64; 3], FitError> {
    let n = x.len() as f64;
    let (mut s1, mut s2, mut s3, mut s4) = (0.0, 0.0, 0.0, 0.0);
    let (mut sy, mut sxy, mut sx2y) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let x2 = xi * xi;
        s1 += xi;
        s2 += x2;
        s3 += x2 * xi;
        s4 += x2 * x2;
        sy += yi;
        sxy += xi * yi;
        sx2y += x2 * yi;
    }
    let normal = [
        [s4, s3, s2, sx2y],
        [s3, s2, s1, sxy],
        [s2, s1, n, sy],
    ];
    solve3(normal).ok_or(FitError::DegenerateDragPolar)
}

/// Gaussian elimination with partial pivoting on a 3x4 augmented matrix.
fn solve3(mut m: [[f64; 4]; 3]) -> Option<[f64; 3]> {
    for col in 0..3 {
        let mut pivot = col;
        for row in col + 1..3 {
            if m[row][col].abs() > m[pivot][col].abs() {
                pivot = row;
            }
        }
        if m[pivot][col].abs() < 1.0e-30 {
            return None;
        }
        m.swap(col, pivot);
        for row in col + 1..3 {
            let factor = m[row][col] / m[col][col];
            for k in col..4 {
                m[row][k] -= factor * m[col][k];
            }
        }
    }
    let mut out = [0.0; 3];
    for row in (0..3).rev() {
        let mut acc = m[row][3];
        for k in row + 1..3 {
            acc -= m[row][k] * out[k];
        }
        out[row] = acc / m[row][row];
    }
    Some(out)
}
