use num_traits::Float;

/// Returns the mean value of this series, None when empty.
pub fn mean<T: Float>(values: &[T]) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let sum = values.iter().fold(T::zero(), |acc, x| acc + *x);
    T::from(values.len()).map(|n| sum / n)
}

/// Returns the (population) variance of this series, around the precomputed mean.
/// None when empty.
pub fn variance<T: Float>(values: &[T], mean: T) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let sum = values
        .iter()
        .fold(T::zero(), |acc, x| acc + (*x - mean) * (*x - mean));
    T::from(values.len()).map(|n| sum / n)
}

#[cfg(test)]
mod test {
    use super::{mean, variance};

    #[test]
    fn mean_and_variance() {
        let values = [1.0_f64, 2.0, 3.0, 4.0];
        let m = mean(&values).unwrap();
        assert_eq!(m, 2.5);
        assert_eq!(variance(&values, m).unwrap(), 1.25);

        assert!(mean::<f32>(&[]).is_none());
        assert!(variance::<f32>(&[], 0.0).is_none());
    }
}
