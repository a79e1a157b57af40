//! Two points (closed form) solver: intersection of two circles
use log::{debug, warn};
use nalgebra::{Matrix2, Matrix3, RowVector2, Vector2, Vector3};

use crate::{
    cfg::Config,
    ellipsoid::Ellipsoid,
    error::Error,
    frame::local_tangent_rotation,
    fusion::fuse_scalar,
    hidden_point::{AnalyticalSolution, Input, Sample, Warnings},
};

/// Local solutions of a two point problem
#[derive(Debug, Clone, Copy)]
pub(crate) struct LocalSolution {
    pub right: Sample,
    pub left: Sample,
    pub warnings: Warnings,
}

pub(crate) fn solve(
    ellipsoid: &Ellipsoid,
    cfg: &Config,
    a: &Input,
    b: &Input,
) -> Result<AnalyticalSolution, Error> {
    let origin = a.sample.position;
    let rotation = local_tangent_rotation(ellipsoid, &origin, None);

    let local_a = a.to_local(&origin, &rotation);
    let local_b = b.to_local(&origin, &rotation);

    let solution = solve_local(cfg, &local_a, &local_b, true)?;

    // a two point solution can never pick a side on its own
    let warnings = solution.warnings | Warnings::AMBIGUOUS;

    debug!("analytical solution: {}", warnings);

    Ok(AnalyticalSolution {
        right: solution.right.to_global(&origin, &rotation),
        left: solution.left.to_global(&origin, &rotation),
        warnings,
    })
}

/// Returns the horizontal normal equations (HᵗH)⁻¹ and the observation matrix H,
/// made of the unit vectors from this candidate towards A and B.
fn normal_equations(
    a: &Input,
    b: &Input,
    candidate: &Vector3<f64>,
) -> (Option<Matrix2<f64>>, Matrix2<f64>) {
    let xy = candidate.xy();
    let h_a = (a.sample.position.xy() - xy).normalize();
    let h_b = (b.sample.position.xy() - xy).normalize();

    let h = Matrix2::from_rows(&[h_a.transpose(), h_b.transpose()]);
    ((h.transpose() * h).try_inverse(), h)
}

/// Range measurement noise, projected along this line of sight:
/// hᵗ·C·h + horizontal distance variance.
fn range_variance(input: &Input, h: &RowVector2<f64>) -> f64 {
    let horizontal = input.sample.covariance.fixed_view::<2, 2>(0, 0);
    (h * horizontal * h.transpose())[(0, 0)] + input.horiz_variance
}

/// Propagates the range variances into this candidate's covariance,
/// and runs the horizontal residual tests.
fn candidate_covariance(
    cfg: &Config,
    a: &Input,
    b: &Input,
    candidate: &Vector3<f64>,
    z_var: f64,
    warnings: &mut Warnings,
) -> Result<Matrix3<f64>, Error> {
    let (g, h) = normal_equations(a, b, candidate);
    let g = g.ok_or(Error::MatrixInversion)?;

    let r = Vector2::new(
        range_variance(a, &h.row(0).into_owned()),
        range_variance(b, &h.row(1).into_owned()),
    );

    let j = g * h.transpose();
    let p = j * Matrix2::from_diagonal(&r) * j.transpose();

    for (input, r_i) in [(a, r[0]), (b, r[1])] {
        // distance is not significant with respect to its own noise
        if input.horiz_distance.powi(2) < cfg.residual_gate * r_i {
            debug!(
                "horizontal imprecision: d={:.4}m within noise (var={:.4E}m²)",
                input.horiz_distance, r_i
            );
            *warnings |= Warnings::HORIZ_IMPRECISE;
        }

        let residual = (input.sample.position.xy() - candidate.xy()).norm() - input.horiz_distance;
        if residual.powi(2) > cfg.residual_gate * r_i {
            debug!("horizontal imprecision: residual={:.4E}m", residual);
            *warnings |= Warnings::HORIZ_IMPRECISE;
        }
    }

    let mut covar = Matrix3::zeros();
    covar.fixed_view_mut::<2, 2>(0, 0).copy_from(&p);
    covar[(2, 2)] = z_var;
    Ok(covar)
}

/// Solves both intersections of the circles centered on A and B,
/// both inputs being expressed in the same local frame.
/// When `with_covariance` is false, only the horizontal PDOP test runs and
/// the vertical component is the plain mean of A and B.
pub(crate) fn solve_local(
    cfg: &Config,
    a: &Input,
    b: &Input,
    with_covariance: bool,
) -> Result<LocalSolution, Error> {
    let mut warnings = Warnings::OK;

    let ab = b.sample.position.xy() - a.sample.position.xy();
    let (diff_x2, diff_y2) = (ab[0] * ab[0], ab[1] * ab[1]);
    let dist_ab = (diff_x2 + diff_y2).sqrt();

    let (d_a, d_b) = (a.horiz_distance, b.horiz_distance);

    if dist_ab + d_a <= d_b || dist_ab + d_b <= d_a || d_a + d_b <= dist_ab {
        debug!(
            "inconsistent geometry: |AB|={:.4}m dA={:.4}m dB={:.4}m",
            dist_ab, d_a, d_b
        );
        return Err(Error::InconsistentGeometry);
    }

    // We divide by the difference along dim1: pick the largest one.
    let (dim0, dim1) = if diff_x2 > diff_y2 { (1, 0) } else { (0, 1) };

    let (ax, ay) = (a.sample.position[dim0], a.sample.position[dim1]);
    let (bx, by) = (b.sample.position[dim0], b.sample.position[dim1]);

    let (dx, dy) = (bx - ax, by - ay);
    let (dx2, dy2) = (dx * dx, dy * dy);

    let (d_a2, d_b2) = (d_a * d_a, d_b * d_b);
    let (ax2, ay2, bx2, by2) = (ax * ax, ay * ay, bx * bx, by * by);

    // subtracting both circle equations gives the radical line:
    //  x·dx + y·dy = ka
    let ka = (d_a2 - d_b2 + bx2 + by2 - ax2 - ay2) / 2.0;
    let kb = d_a2 - ax2 - ay2;

    // which we inject into circle A
    let qa = 1.0 + dx2 / dy2;
    let qb = 2.0 * ay * dx / dy - 2.0 * ka * dx / dy2 - 2.0 * ax;
    let qc = ka * ka / dy2 - 2.0 * ay * ka / dy - kb;

    let discriminant = qb * qb - 4.0 * qa * qc;
    if discriminant < 0.0 {
        // tangent circles, within rounding errors
        warn!("negative discriminant {:.4E}: tangent circles", discriminant);
    }

    let first_term = -qb / (2.0 * qa);
    let sqrt_term = discriminant.max(0.0).sqrt() / (2.0 * qa);

    let root = |x: f64| {
        let mut coords = Vector3::zeros();
        coords[dim0] = x;
        coords[dim1] = (ka - x * dx) / dy;
        coords
    };

    let (mut right, mut left) = (root(first_term - sqrt_term), root(first_term + sqrt_term));

    // Right or left of AB, when facing B from A: sign of AB × AX
    let ax_vec = right.xy() - a.sample.position.xy();
    let cross = ab[0] * ax_vec[1] - ab[1] * ax_vec[0];
    if cross > 0.0 {
        std::mem::swap(&mut right, &mut left);
    }

    let (z_a, z_b) = (a.sample.position[2], b.sample.position[2]);
    let (var_z_a, var_z_b) = (a.sample.covariance[(2, 2)], b.sample.covariance[(2, 2)]);

    let (z, z_var) = if with_covariance {
        let (z, _) = fuse_scalar(&[z_a, z_b], &[var_z_a, var_z_b])?;
        // Only the best vertical variance is reported, not the fused one.
        (z, var_z_a.min(var_z_b))
    } else {
        (0.5 * (z_a + z_b), 0.0)
    };

    right[2] = z;
    left[2] = z;

    // PDOP is identical for both mirrored solutions
    let (g, _) = normal_equations(a, b, &right);
    match g {
        Some(g) => {
            let pdop2 = g.trace();
            if pdop2 >= cfg.max_pdop2 {
                debug!("horizontal imprecision: pdop²={:.4}", pdop2);
                warnings |= Warnings::HORIZ_IMPRECISE;
            }
        },
        None => {
            debug!("horizontal imprecision: singular geometry");
            warnings |= Warnings::HORIZ_IMPRECISE;
        },
    }

    if !with_covariance {
        return Ok(LocalSolution {
            right: Sample::new(right, Matrix3::zeros()),
            left: Sample::new(left, Matrix3::zeros()),
            warnings,
        });
    }

    let right_covar = candidate_covariance(cfg, a, b, &right, z_var, &mut warnings)?;
    let left_covar = candidate_covariance(cfg, a, b, &left, z_var, &mut warnings)?;

    for (z_i, var_i) in [(z_a, var_z_a), (z_b, var_z_b)] {
        if (z - z_i).powi(2) >= cfg.residual_gate * var_i {
            debug!("vertical imprecision: dz={:.4}m", z - z_i);
            warnings |= Warnings::VERT_IMPRECISE;
        }
    }

    Ok(LocalSolution {
        right: Sample::new(right, right_covar),
        left: Sample::new(left, left_covar),
        warnings,
    })
}
