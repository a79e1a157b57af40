//! Inverse variance weighting (information filter) fusion.
//! See "Combining Error Ellipses", J. E. Davis (Chandra X-ray Center).
use nalgebra::{allocator::Allocator, DefaultAllocator, DimName, OMatrix, OVector, RealField};
use num_traits::Float;

use crate::error::Error;

mod integrator;
pub use integrator::{Integrator, Status};

/// Fused [Estimate]
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate<T, D>
where
    T: RealField + Copy,
    D: DimName,
    DefaultAllocator: Allocator<D, D>,
    DefaultAllocator: Allocator<D>,
{
    /// Fused value
    pub x: OVector<T, D>,

    /// Fused covariance
    pub p: OMatrix<T, D, D>,
}

impl<T, D> Estimate<T, D>
where
    T: RealField + Copy,
    D: DimName,
    DefaultAllocator: Allocator<D, D>,
    DefaultAllocator: Allocator<D>,
{
    /// Create new [Estimate]
    pub fn new(x: OVector<T, D>, p: OMatrix<T, D, D>) -> Self {
        Self { x, p }
    }
}

/// Inverse variance weighted mean of these scalar values.
/// Returns (value, variance). All variances must be strictly positive.
pub fn fuse_scalar<T: Float>(values: &[T], variances: &[T]) -> Result<(T, T), Error> {
    if values.len() != variances.len() {
        return Err(Error::LengthMismatch);
    }
    if values.is_empty() {
        return Err(Error::EmptyBatch);
    }

    let (weighted, information) = values.iter().zip(variances.iter()).fold(
        (T::zero(), T::zero()),
        |(weighted, information), (x, var)| {
            let inv = T::one() / *var;
            (weighted + inv * *x, information + inv)
        },
    );

    let variance = T::one() / information;
    Ok((variance * weighted, variance))
}

/// Matrix form of [fuse_scalar]: P = (Σ Pi⁻¹)⁻¹ and x = P · Σ Pi⁻¹ xi.
/// Each covariance must be invertible.
pub fn fuse_vector<T, D>(
    values: &[OVector<T, D>],
    covariances: &[OMatrix<T, D, D>],
) -> Result<Estimate<T, D>, Error>
where
    T: RealField + Copy,
    D: DimName,
    DefaultAllocator: Allocator<D, D>,
    DefaultAllocator: Allocator<D>,
{
    if values.len() != covariances.len() {
        return Err(Error::LengthMismatch);
    }
    if values.is_empty() {
        return Err(Error::EmptyBatch);
    }

    let mut weighted = OVector::<T, D>::zeros();
    let mut information = OMatrix::<T, D, D>::zeros();

    for (x_i, p_i) in values.iter().zip(covariances.iter()) {
        let p_inv = p_i.clone().try_inverse().ok_or(Error::MatrixInversion)?;
        weighted += &p_inv * x_i;
        information += p_inv;
    }

    let p = information.try_inverse().ok_or(Error::MatrixInversion)?;
    let x = &p * weighted;

    Ok(Estimate { x, p })
}

/// Two elements form of [fuse_vector], that updates the running
/// (value, covariance) accumulator in place with a new measurement.
/// The accumulator is left untouched on error.
pub fn fuse_update<T, D>(
    new_value: &OVector<T, D>,
    new_covar: &OMatrix<T, D, D>,
    running_value: &mut OVector<T, D>,
    running_covar: &mut OMatrix<T, D, D>,
) -> Result<(), Error>
where
    T: RealField + Copy,
    D: DimName,
    DefaultAllocator: Allocator<D, D>,
    DefaultAllocator: Allocator<D>,
{
    let new_inv = new_covar.clone().try_inverse().ok_or(Error::MatrixInversion)?;
    let running_inv = running_covar
        .clone()
        .try_inverse()
        .ok_or(Error::MatrixInversion)?;

    let weighted = &running_inv * &*running_value + &new_inv * new_value;

    let p = (running_inv + new_inv)
        .try_inverse()
        .ok_or(Error::MatrixInversion)?;

    *running_value = &p * weighted;
    *running_covar = p;
    Ok(())
}

/// Sequential form of [fuse_vector], folding the batch left to right:
///  S = P + Pi
///  x = Pi·S⁻¹·x + P·S⁻¹·xi
///  P = P·S⁻¹·Pi
///
/// Requires one inversion per element instead of two, which may run faster or
/// slower depending on dimensions and target. Results match [fuse_vector]
/// up to rounding errors.
pub fn fuse_ellipsis<T, D>(
    values: &[OVector<T, D>],
    covariances: &[OMatrix<T, D, D>],
) -> Result<Estimate<T, D>, Error>
where
    T: RealField + Copy,
    D: DimName,
    DefaultAllocator: Allocator<D, D>,
    DefaultAllocator: Allocator<D>,
{
    if values.len() != covariances.len() {
        return Err(Error::LengthMismatch);
    }

    let (mut x, mut p) = match (values.first(), covariances.first()) {
        (Some(x), Some(p)) => (x.clone(), p.clone()),
        _ => return Err(Error::EmptyBatch),
    };

    for (x_i, p_i) in values.iter().zip(covariances.iter()).skip(1) {
        let s_inv = (&p + p_i).try_inverse().ok_or(Error::MatrixInversion)?;
        x = p_i * &s_inv * &x + &p * &s_inv * x_i;
        p = &p * &s_inv * p_i;
    }

    Ok(Estimate { x, p })
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::{Matrix2, Matrix3, Vector2, Vector3};

    #[test]
    fn scalar_fusion() {
        let (value, variance) = fuse_scalar(&[1.0_f64, 3.0], &[1.0, 1.0]).unwrap();
        assert_eq!(value, 2.0);
        assert_eq!(variance, 0.5);

        let (value, variance) = fuse_scalar(&[0.0_f64, 10.0], &[1.0, 4.0]).unwrap();
        assert!((variance - 0.8).abs() < 1.0E-12);
        assert!((value - 2.0).abs() < 1.0E-12);

        let (value, variance) = fuse_scalar(&[5.0_f32], &[2.0]).unwrap();
        assert_eq!((value, variance), (5.0, 2.0));
    }

    #[test]
    fn fusion_errors() {
        assert_eq!(fuse_scalar::<f64>(&[], &[]), Err(Error::EmptyBatch));
        assert_eq!(fuse_scalar(&[1.0_f64], &[]), Err(Error::LengthMismatch));

        let values: Vec<Vector3<f64>> = vec![];
        let covars: Vec<Matrix3<f64>> = vec![];
        assert_eq!(fuse_vector(&values, &covars), Err(Error::EmptyBatch));
        assert_eq!(fuse_ellipsis(&values, &covars), Err(Error::EmptyBatch));

        let values = vec![Vector3::new(1.0, 2.0, 3.0)];
        let covars = vec![Matrix3::zeros()];
        assert_eq!(fuse_vector(&values, &covars), Err(Error::MatrixInversion));
    }

    #[test]
    fn single_element_is_identity() {
        let values = vec![Vector2::new(1.0, -1.0)];
        let covars = vec![Matrix2::new(2.0, 0.5, 0.5, 1.0)];

        let davis = fuse_vector(&values, &covars).unwrap();
        let ellipsis = fuse_ellipsis(&values, &covars).unwrap();

        assert!((davis.x - values[0]).norm() < 1.0E-12);
        assert!((davis.p - covars[0]).norm() < 1.0E-12);
        assert_eq!(ellipsis, Estimate::new(values[0], covars[0]));
    }

    #[test]
    fn update_matches_batch() {
        let values = vec![Vector3::new(1.0, 2.0, 3.0), Vector3::new(1.5, 1.0, 2.0)];
        let covars = vec![
            Matrix3::new(1.0, 0.1, 0.0, 0.1, 2.0, 0.2, 0.0, 0.2, 3.0),
            Matrix3::new(2.0, 0.0, 0.3, 0.0, 1.0, 0.0, 0.3, 0.0, 0.5),
        ];

        let batch = fuse_vector(&values, &covars).unwrap();

        let (mut x, mut p) = (values[0], covars[0]);
        fuse_update(&values[1], &covars[1], &mut x, &mut p).unwrap();

        assert!((batch.x - x).norm() < 1.0E-12);
        assert!((batch.p - p).norm() < 1.0E-12);
    }
}
