//! Covariance frame transforms and scalar accuracy metrics
use nalgebra::{Matrix2, Matrix3, RealField, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{CEP_50_FACTOR, SEP_50_FACTOR, SEP_99_FACTOR},
    ellipsoid::Ellipsoid,
    frame::local_tangent_rotation,
};

/// Rotates a global (ECEF) covariance matrix into the local tangent frame
/// at this ECEF reference point: R·C·Rᵗ.
/// See "Transforming Positions and Velocities between the International
/// Terrestrial Reference Frame" (Soler & Marshall).
pub fn to_local<T: RealField + Copy>(
    ellipsoid: &Ellipsoid,
    ecef_m: &Vector3<f64>,
    covar: &Matrix3<T>,
) -> Matrix3<T> {
    let r = local_tangent_rotation(ellipsoid, ecef_m, None).cast::<T>();
    r * covar * r.transpose()
}

/// Rotates a local tangent covariance matrix at this ECEF reference point
/// back into the global (ECEF) frame: Rᵗ·C·R.
pub fn to_global<T: RealField + Copy>(
    ellipsoid: &Ellipsoid,
    ecef_m: &Vector3<f64>,
    covar: &Matrix3<T>,
) -> Matrix3<T> {
    let r = local_tangent_rotation(ellipsoid, ecef_m, None).cast::<T>();
    r.transpose() * covar * r
}

fn horizontal_eigenvalues<T: RealField + Copy>(covar: &Matrix3<T>) -> [T; 2] {
    let block: Matrix2<T> = covar.fixed_view::<2, 2>(0, 0).into_owned();
    let eigen = block.symmetric_eigenvalues();
    [eigen[0].abs(), eigen[1].abs()]
}

fn eigenvalues<T: RealField + Copy>(covar: &Matrix3<T>) -> [T; 3] {
    let eigen = covar.symmetric_eigenvalues();
    [eigen[0].abs(), eigen[1].abs(), eigen[2].abs()]
}

/// Sums the square roots of these (absolute) eigenvalues
fn sum_of_sqrt<T: RealField + Copy>(eigen: &[T]) -> T {
    eigen
        .iter()
        .fold(nalgebra::zero::<T>(), |acc, lambda| acc + lambda.sqrt())
}

/// Horizontal DRMS, from the local covariance horizontal block.
pub fn drms_horizontal<T: RealField + Copy>(covar: &Matrix3<T>) -> T {
    let [l1, l2] = horizontal_eigenvalues(covar);
    (l1 + l2).sqrt()
}

/// Vertical DRMS, from the local covariance.
pub fn drms_vertical<T: RealField + Copy>(covar: &Matrix3<T>) -> T {
    covar[(2, 2)].sqrt()
}

/// Mean Radial Spherical Error: DRMS in 3D.
pub fn mrse_3d<T: RealField + Copy>(covar: &Matrix3<T>) -> T {
    let [l1, l2, l3] = eigenvalues(covar);
    (l1 + l2 + l3).sqrt()
}

/// Circular Error Probable (50%), from the local covariance horizontal block.
/// This approximation only holds when the larger standard deviation is no more than
/// 3 times the smaller one, which is not verified here.
pub fn cep_horizontal<T: RealField + Copy>(covar: &Matrix3<T>) -> T {
    let factor: T = nalgebra::convert(CEP_50_FACTOR);
    factor * sum_of_sqrt(&horizontal_eigenvalues(covar)).sqrt()
}

/// Spherical Error Probable (50%)
pub fn sep_3d<T: RealField + Copy>(covar: &Matrix3<T>) -> T {
    let factor: T = nalgebra::convert(SEP_50_FACTOR);
    factor * sum_of_sqrt(&eigenvalues(covar)).sqrt()
}

/// Spherical Error Probable (99%)
pub fn sep_3d_99<T: RealField + Copy>(covar: &Matrix3<T>) -> T {
    let factor: T = nalgebra::convert(SEP_99_FACTOR);
    factor * sum_of_sqrt(&eigenvalues(covar)).sqrt()
}

/// [Accuracy] summary of a local covariance matrix
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Accuracy {
    /// Horizontal DRMS
    pub drms_horizontal: f64,
    /// Vertical DRMS
    pub drms_vertical: f64,
    /// Mean Radial Spherical Error
    pub mrse: f64,
    /// Circular Error Probable (50%)
    pub cep: f64,
    /// Spherical Error Probable (50%)
    pub sep: f64,
    /// Spherical Error Probable (99%)
    pub sep_99: f64,
}

impl Accuracy {
    /// Evaluates all metrics of this local covariance
    pub fn from_covariance(covar: &Matrix3<f64>) -> Self {
        Self {
            drms_horizontal: drms_horizontal(covar),
            drms_vertical: drms_vertical(covar),
            mrse: mrse_3d(covar),
            cep: cep_horizontal(covar),
            sep: sep_3d(covar),
            sep_99: sep_3d_99(covar),
        }
    }
}

impl std::fmt::Display for Accuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "drms(h)={:.4}m drms(v)={:.4}m mrse={:.4}m cep={:.4}m sep={:.4}m sep99={:.4}m",
            self.drms_horizontal, self.drms_vertical, self.mrse, self.cep, self.sep, self.sep_99,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{frame::geodetic_to_ecef, prelude::Ellipsoid};
    use nalgebra::{Matrix3, Vector3};

    #[test]
    fn diagonal_accuracy() {
        let covar = Matrix3::new(2.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 15.0);

        assert!((drms_horizontal(&covar) - (2.0_f64 + 10.0).sqrt()).abs() < 1.0E-12);
        assert_eq!(drms_vertical(&covar), 15.0_f64.sqrt());
        assert!((mrse_3d(&covar) - 27.0_f64.sqrt()).abs() < 1.0E-12);

        let cep = 0.589 * (2.0_f64.sqrt() + 10.0_f64.sqrt()).sqrt();
        assert!((cep_horizontal(&covar) - cep).abs() < 1.0E-12);

        let sum = 2.0_f64.sqrt() + 10.0_f64.sqrt() + 15.0_f64.sqrt();
        assert!((sep_3d(&covar) - 0.51 * sum.sqrt()).abs() < 1.0E-12);
        assert!((sep_3d_99(&covar) - 1.122 * sum.sqrt()).abs() < 1.0E-12);

        let accuracy = Accuracy::from_covariance(&covar);
        assert_eq!(accuracy.drms_vertical, 15.0_f64.sqrt());
        assert!(accuracy.sep_99 > accuracy.sep);
    }

    #[test]
    fn single_precision_accuracy() {
        let covar = Matrix3::<f32>::new(2.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 15.0);
        assert!((drms_horizontal(&covar) - 12.0_f32.sqrt()).abs() < 1.0E-5);
    }

    #[test]
    fn rotation_preserves_eigenvalues() {
        let wgs84 = Ellipsoid::wgs84();
        let ecef = geodetic_to_ecef(&wgs84, 43.6, 1.44, 150.0);

        let covar = Matrix3::<f64>::new(4.0, 0.5, 0.1, 0.5, 3.0, -0.2, 0.1, -0.2, 9.0);

        let local = to_local(&wgs84, &ecef, &covar);
        assert!((local - local.transpose()).norm() < 1.0E-12);
        assert!((mrse_3d(&local) - mrse_3d(&covar)).abs() < 1.0E-9);
        assert!((sep_3d_99(&local) - sep_3d_99(&covar)).abs() < 1.0E-9);

        let global = to_global(&wgs84, &ecef, &local);
        assert!((global - covar).norm() < 1.0E-9);
    }

    #[test]
    fn equator_local_frame() {
        // at the equator/greenwich crossing, ECEF x is the vertical
        let wgs84 = Ellipsoid::wgs84();
        let ecef = Vector3::new(wgs84.a, 0.0, 0.0);
        let covar = Matrix3::new(1.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 3.0);
        let local = to_local(&wgs84, &ecef, &covar);
        assert!((drms_vertical(&local) - 1.0_f64).abs() < 1.0E-12);
        assert!((drms_horizontal(&local) - 5.0_f64.sqrt()).abs() < 1.0E-12);
    }
}
