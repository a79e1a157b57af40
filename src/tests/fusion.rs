use rand::{prelude::*, rngs::SmallRng, SeedableRng};

use crate::{
    prelude::{fuse_ellipsis, fuse_scalar, fuse_update, fuse_vector, mean, Matrix3, Vector3},
    tests::init_logger,
};

/// Random symmetric positive definite covariance: L·Lᵗ + εI
fn random_covariance(rng: &mut SmallRng) -> Matrix3<f64> {
    let l = Matrix3::<f64>::from_fn(|_, _| rng.random_range(-1.0..1.0));
    l * l.transpose() + Matrix3::identity() * 0.1
}

#[test]
fn batch_sequential_equivalence() {
    init_logger();

    let mut rng = SmallRng::seed_from_u64(0x5eed);

    for _ in 0..20 {
        let size = rng.random_range(2..12_usize);

        let values = (0..size)
            .map(|_| Vector3::<f64>::from_fn(|_, _| rng.random_range(-10.0..10.0)))
            .collect::<Vec<_>>();

        let covariances = (0..size)
            .map(|_| random_covariance(&mut rng))
            .collect::<Vec<_>>();

        let davis = fuse_vector(&values, &covariances).unwrap();
        let ellipsis = fuse_ellipsis(&values, &covariances).unwrap();

        let (mut x, mut p) = (values[0], covariances[0]);
        for (x_i, p_i) in values.iter().zip(covariances.iter()).skip(1) {
            fuse_update(x_i, p_i, &mut x, &mut p).unwrap();
        }

        assert!((davis.x - ellipsis.x).norm() < 1.0E-6);
        assert!((davis.p - ellipsis.p).norm() < 1.0E-6);
        assert!((davis.x - x).norm() < 1.0E-6);
        assert!((davis.p - p).norm() < 1.0E-6);
    }
}

#[test]
fn scalar_fusion_equal_weights() {
    let values = [1.0_f64, 2.5, -3.0, 7.25];
    let variances = [0.2_f64; 4];

    let (value, variance) = fuse_scalar(&values, &variances).unwrap();

    assert!((value - mean(&values).unwrap()).abs() < 1.0E-12);
    assert!((variance - 0.05).abs() < 1.0E-12);
}
