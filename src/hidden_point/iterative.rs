//! N points (N >= 3) weighted non linear least squares solver
use log::{debug, trace};
use nalgebra::{DMatrix, DVector, Matrix3, Vector2, Vector3};

use crate::{
    cfg::Config,
    ellipsoid::Ellipsoid,
    error::Error,
    frame::local_tangent_rotation,
    fusion::fuse_scalar,
    hidden_point::{
        analytical::solve_local, Input, Sample, SeedCandidates, SeedChoice, Solution, Warnings,
    },
};

/// Linearized horizontal problem, at the current estimate
struct Linearization {
    /// Observation matrix: unit vectors from the estimate towards each input (n x 2)
    h: DMatrix<f64>,
    /// Diagonal of the observation noise matrix (n)
    r: DVector<f64>,
    /// Residuals: predicted minus measured distances (n)
    z: DVector<f64>,
}

impl Linearization {
    fn new(inputs: &[Input], estimate: &Vector2<f64>) -> Result<Self, Error> {
        let n = inputs.len();
        let mut h = DMatrix::<f64>::zeros(n, 2);
        let mut r = DVector::<f64>::zeros(n);
        let mut z = DVector::<f64>::zeros(n);

        for (j, input) in inputs.iter().enumerate() {
            let delta = input.sample.position.xy() - estimate;
            let range = delta.norm();

            let los = if range > 0.0 {
                delta / range
            } else {
                Vector2::zeros()
            };

            let horizontal = input.sample.covariance.fixed_view::<2, 2>(0, 0);
            let r_j = (los.transpose() * horizontal * los)[(0, 0)] + input.horiz_variance;

            if r_j <= 0.0 {
                debug!("null range variance on input #{}", j);
                return Err(Error::MatrixInversion);
            }

            h[(j, 0)] = los[0];
            h[(j, 1)] = los[1];
            r[j] = r_j;
            z[j] = range - input.horiz_distance;

            trace!("input #{}: residual={:.4E}m var={:.4E}m²", j, z[j], r_j);
        }

        Ok(Self { h, r, z })
    }

    /// Weighted pseudo inverse J = (HᵗR⁻¹H)⁻¹HᵗR⁻¹ (2 x n)
    fn transition(&self) -> Result<DMatrix<f64>, Error> {
        let r_inv = DMatrix::from_diagonal(&self.r.map(|r_j| 1.0 / r_j));
        let ht_r_inv = self.h.transpose() * r_inv;
        let normal = (&ht_r_inv * &self.h)
            .try_inverse()
            .ok_or(Error::MatrixInversion)?;
        Ok(normal * ht_r_inv)
    }
}

pub(crate) fn solve(
    ellipsoid: &Ellipsoid,
    cfg: &Config,
    inputs: &[Input],
) -> Result<Solution, Error> {
    let n = inputs.len();

    // with two points, we'd need to know whether the solution is on the left or the right
    if n < 3 {
        debug!("{} inputs: ambiguous", n);
        return Err(Error::NotEnoughInputs);
    }

    let mut warnings = Warnings::OK;

    // local frame, first input as origin
    let origin = inputs[0].sample.position;
    let rotation = local_tangent_rotation(ellipsoid, &origin, None);

    let local = inputs
        .iter()
        .map(|input| input.to_local(&origin, &rotation))
        .collect::<Vec<_>>();

    // initial guess: both solutions of (#0, #1) and (#0, #n-1)
    let pair_a = solve_local(cfg, &local[0], &local[1], false)?;
    let pair_b = solve_local(cfg, &local[0], &local[n - 1], false)?;

    let imprecise = (pair_a.warnings | pair_b.warnings).contains(Warnings::HORIZ_IMPRECISE);

    let candidates = SeedCandidates {
        right_a: pair_a.right.position,
        left_a: pair_a.left.position,
        right_b: pair_b.right.position,
        left_b: pair_b.left.position,
    };

    let decision = candidates.resolve(imprecise, cfg.ratio_test);
    if decision.ambiguous {
        warnings |= Warnings::AMBIGUOUS;
    }

    let mut estimate = match decision.choice {
        SeedChoice::Right => pair_a.right.position.xy(),
        SeedChoice::Left => pair_a.left.position.xy(),
    };

    // Gauss-Newton
    let mut linearization = Linearization::new(&local, &estimate)?;
    let mut transition = linearization.transition()?;

    for iter in 0..cfg.max_iterations {
        if iter > 0 {
            linearization = Linearization::new(&local, &estimate)?;
            transition = linearization.transition()?;
        }

        let dx = &transition * &linearization.z;
        let step = Vector2::new(dx[0], dx[1]);
        estimate += step;

        debug!("iteration #{}: |dx|={:.4E}m", iter, step.norm());

        if step.norm() < cfg.convergence_m {
            break;
        }
    }

    // horizontal precision
    let g = (linearization.h.transpose() * &linearization.h).try_inverse();
    match g {
        Some(g) => {
            let pdop2 = g[(0, 0)] + g[(1, 1)];
            if pdop2 >= cfg.max_pdop2 {
                debug!("horizontal imprecision: pdop²={:.4}", pdop2);
                warnings |= Warnings::HORIZ_IMPRECISE;
            } else if let Some(i) = (0..n).find(|i| {
                linearization.z[*i].powi(2) >= cfg.residual_gate * linearization.r[*i]
            }) {
                debug!(
                    "horizontal imprecision: input #{} residual={:.4E}m",
                    i, linearization.z[i]
                );
                warnings |= Warnings::HORIZ_IMPRECISE;
            }
        },
        None => {
            debug!("horizontal imprecision: singular geometry");
            warnings |= Warnings::HORIZ_IMPRECISE;
        },
    }

    // vertical component
    let (z_coords, z_vars): (Vec<f64>, Vec<f64>) = local
        .iter()
        .map(|input| (input.sample.position[2], input.sample.covariance[(2, 2)]))
        .unzip();

    let (z, z_var) = fuse_scalar(&z_coords, &z_vars)?;

    for (i, (z_i, var_i)) in z_coords.iter().zip(z_vars.iter()).enumerate() {
        if (z_i - z).powi(2) >= cfg.residual_gate * var_i {
            debug!("vertical imprecision: input #{} dz={:.4}m", i, z_i - z);
            warnings |= Warnings::VERT_IMPRECISE;
        }
    }

    // horizontal covariance J·R·Jᵗ
    let p = &transition * DMatrix::from_diagonal(&linearization.r) * transition.transpose();

    let mut covariance = Matrix3::zeros();
    covariance[(0, 0)] = p[(0, 0)];
    covariance[(0, 1)] = p[(0, 1)];
    covariance[(1, 0)] = p[(1, 0)];
    covariance[(1, 1)] = p[(1, 1)];
    covariance[(2, 2)] = z_var;

    let local_solution = Sample::new(Vector3::new(estimate[0], estimate[1], z), covariance);

    debug!(
        "solution: {} ({})",
        local_solution.position.transpose(),
        warnings
    );

    Ok(Solution {
        sample: local_solution.to_global(&origin, &rotation),
        warnings,
    })
}

#[cfg(test)]
mod test {
    use super::Linearization;
    use crate::hidden_point::{Input, Sample};
    use nalgebra::{Vector2, Vector3};

    #[test]
    fn linearization_at_solution() {
        let inputs = [(0.0, 0.0, 200.0_f64.sqrt()), (10.0, 0.0, 10.0), (0.0, 10.0, 10.0)]
            .iter()
            .map(|(x, y, d)| {
                Input::new(
                    Sample::from_variances(
                        Vector3::new(*x, *y, 0.0),
                        Vector3::new(0.01, 0.01, 0.01),
                    ),
                    *d,
                    0.01,
                )
            })
            .collect::<Vec<_>>();

        let lin = Linearization::new(&inputs, &Vector2::new(10.0, 10.0)).unwrap();

        for j in 0..3 {
            assert!(lin.z[j].abs() < 1.0E-12);
            assert!((lin.r[j] - 0.02).abs() < 1.0E-12);
            let los = Vector2::new(lin.h[(j, 0)], lin.h[(j, 1)]);
            assert!((los.norm() - 1.0).abs() < 1.0E-12);
        }

        let j = lin.transition().unwrap();
        assert_eq!(j.nrows(), 2);
        assert_eq!(j.ncols(), 3);
    }
}
