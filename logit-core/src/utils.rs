use crate::{Float, LogitError, Matrix, Result, Vector};

/// Prepends a constant column of ones to `x`.
///
/// The returned matrix has shape `(n × (d + 1))`; column `0` is the bias
/// feature and columns `1..=d` are the original features in order.
///
/// # Examples
///
/// ```rust
/// use logit_core::{add_bias_column, Matrix};
///
/// let x = Matrix::from_row_slice(2, 1, &[3.0, 4.0]);
/// let aug = add_bias_column(&x);
///
/// assert_eq!(aug.shape(), (2, 2));
/// assert_eq!(aug[(0, 0)], 1.0);
/// assert_eq!(aug[(1, 1)], 4.0);
/// ```
pub fn add_bias_column(x: &Matrix) -> Matrix {
    x.clone().insert_column(0, 1.0)
}

/// Returns `true` when the Euclidean distance between two successive weight
/// vectors is at most `epsilon`.
///
/// ```text
/// ||θ_old − θ_new||₂ ≤ ε
/// ```
///
/// Both vectors must have the same length. The solvers always compare two
/// snapshots of one weight vector, so a mismatch is a caller bug.
///
/// # Panics
///
/// In debug builds, if the lengths differ. Release builds return `false`.
pub fn has_converged(theta_new: &Vector, theta_old: &Vector, epsilon: Float) -> bool {
    debug_assert_eq!(theta_new.len(), theta_old.len(), "weight vectors differ in length");
    if theta_new.len() != theta_old.len() {
        return false;
    }

    (theta_old - theta_new).norm() <= epsilon
}

/// Checks that `y` has one entry per row of `x` and that there is at least one row.
pub fn check_samples(x: &Matrix, y: &Vector) -> Result<()> {
    if x.nrows() == 0 {
        return Err(LogitError::EmptyTrainingData);
    }
    if y.len() != x.nrows() {
        return Err(LogitError::ShapeMismatch {
            expected: format!("Expected {} labels", x.nrows()),
            got: format!("Got {}", y.len()),
        });
    }
    Ok(())
}

/// Checks that every label is exactly `0.0` or `1.0`.
pub fn check_binary_labels(y: &Vector) -> Result<()> {
    match y.iter().position(|&v| v != 0.0 && v != 1.0) {
        Some(i) => Err(LogitError::InvalidTrainingData {
            message: format!("label at row {} is {}, expected 0 or 1", i, y[i]),
        }),
        None => Ok(()),
    }
}

/// Checks that a training cost is finite.
pub fn check_finite_cost(cost: Float) -> Result<()> {
    if cost.is_finite() {
        Ok(())
    } else {
        Err(LogitError::InvalidValue {
            message: format!("cost is {}, training diverged", cost),
        })
    }
}

/// Checks that every entry of `v` is finite.
pub fn check_finite(v: &Vector, what: &str) -> Result<()> {
    if v.iter().all(|x| x.is_finite()) {
        Ok(())
    } else {
        Err(LogitError::InvalidValue {
            message: format!("{} contains a non-finite value", what),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_add_bias_column_prepends_ones() {
        let x = Matrix::from_row_slice(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let aug = add_bias_column(&x);

        assert_eq!(aug.shape(), (3, 3));
        for i in 0..3 {
            assert_eq!(aug[(i, 0)], 1.0);
            assert_eq!(aug[(i, 1)], x[(i, 0)]);
            assert_eq!(aug[(i, 2)], x[(i, 1)]);
        }
    }

    #[test]
    fn test_add_bias_column_empty_features() {
        let x = Matrix::zeros(2, 0);
        let aug = add_bias_column(&x);
        assert_eq!(aug, Matrix::from_element(2, 1, 1.0));
    }

    #[test]
    fn test_has_converged_threshold() {
        let old = Vector::from_vec(vec![0.0, 0.0]);
        let new = Vector::from_vec(vec![3.0, 4.0]);

        assert!(has_converged(&new, &old, 5.0));
        assert!(!has_converged(&new, &old, 4.99));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "weight vectors differ in length")]
    fn test_has_converged_length_mismatch_panics() {
        let old = Vector::zeros(2);
        let new = Vector::zeros(3);
        has_converged(&new, &old, 1.0);
    }

    #[test]
    fn test_check_samples() {
        let x = Matrix::zeros(3, 2);
        assert!(check_samples(&x, &Vector::zeros(3)).is_ok());
        assert!(matches!(
            check_samples(&x, &Vector::zeros(2)),
            Err(LogitError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            check_samples(&Matrix::zeros(0, 2), &Vector::zeros(0)),
            Err(LogitError::EmptyTrainingData)
        ));
    }

    #[test]
    fn test_check_binary_labels() {
        assert!(check_binary_labels(&Vector::from_vec(vec![0.0, 1.0, 1.0])).is_ok());
        assert!(matches!(
            check_binary_labels(&Vector::from_vec(vec![0.0, 0.5])),
            Err(LogitError::InvalidTrainingData { .. })
        ));
    }

    #[test]
    fn test_check_finite() {
        assert!(check_finite(&Vector::from_vec(vec![1.0, -2.0]), "theta").is_ok());
        assert!(check_finite(&Vector::from_vec(vec![1.0, Float::NAN]), "theta").is_err());
        assert!(check_finite(&Vector::from_vec(vec![Float::INFINITY]), "theta").is_err());
    }

    #[test]
    fn test_check_finite_cost() {
        assert!(check_finite_cost(3.5).is_ok());
        for bad in [Float::NAN, Float::INFINITY, Float::NEG_INFINITY] {
            assert!(matches!(
                check_finite_cost(bad),
                Err(LogitError::InvalidValue { .. })
            ));
        }
    }

    proptest! {
        #[test]
        fn zero_displacement_always_converges(
            values in prop::collection::vec(-1e6f32..1e6f32, 1..16),
            epsilon in 0.0f32..10.0,
        ) {
            let theta = Vector::from_vec(values);
            prop_assert!(has_converged(&theta, &theta, epsilon));
        }
    }
}
