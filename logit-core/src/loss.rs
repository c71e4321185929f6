#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::utils::check_samples;
use crate::{Float, LogitError, Matrix, Result, Vector};

/// Logistic function `σ(z) = 1 / (1 + e^(−z))`.
///
/// The result is clamped to `[Float::MIN_POSITIVE, 1 − Float::EPSILON]`, so
/// for every finite `z` the output lies strictly inside `(0, 1)` even where
/// `exp` underflows or the exact value would round to `1`.
///
/// The two branches avoid overflowing `exp` for large `|z|`.
///
/// ```rust
/// use logit_core::sigmoid;
///
/// assert_eq!(sigmoid(0.0), 0.5);
/// assert!(sigmoid(1_000.0) < 1.0);
/// assert!(sigmoid(-1_000.0) > 0.0);
/// ```
pub fn sigmoid(z: Float) -> Float {
    let p = if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    };
    p.clamp(Float::MIN_POSITIVE, 1.0 - Float::EPSILON)
}

/// Applies [`sigmoid`] elementwise, consuming and returning the vector.
pub fn sigmoid_vector(mut z: Vector) -> Vector {
    #[cfg(feature = "parallel")]
    {
        z.as_mut_slice()
            .par_iter_mut()
            .for_each(|v| *v = sigmoid(*v));
    }

    #[cfg(not(feature = "parallel"))]
    {
        for v in z.iter_mut() {
            *v = sigmoid(*v);
        }
    }

    z
}

/// `ln(1 + e^z)` without overflow for large `z`.
fn softplus(z: Float) -> Float {
    z.max(0.0) + (-z.abs()).exp().ln_1p()
}

/// Penalty applied to the non-bias weights `θ₁..θ_d`.
///
/// The bias `θ₀` is never regularized.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Regularization {
    /// `λ·‖θ₁:‖₁`, gradient `λ·sign(θ)`.
    L1,
    /// `λ·‖θ₁:‖₂²`, gradient `λ·θ`.
    #[default]
    L2,
}

impl Regularization {
    /// Maps a numeric norm identifier (`1` or `2`) to a [`Regularization`].
    ///
    /// # Errors
    ///
    /// - [`LogitError::InvalidHyperparameter`] for any other identifier.
    pub fn from_norm(norm: u32) -> Result<Self> {
        match norm {
            1 => Ok(Regularization::L1),
            2 => Ok(Regularization::L2),
            other => Err(LogitError::InvalidHyperparameter {
                name: "regularization".into(),
                value: format!("unsupported norm {}, expected 1 or 2", other),
            }),
        }
    }

    /// The numeric norm identifier, inverse of [`from_norm`](Regularization::from_norm).
    pub fn norm(&self) -> u32 {
        match self {
            Regularization::L1 => 1,
            Regularization::L2 => 2,
        }
    }

    /// Penalty value for `theta`, skipping the bias entry.
    pub fn penalty(&self, theta: &Vector, lambda: Float) -> Float {
        let weights = theta.iter().skip(1);
        let norm = match self {
            Regularization::L1 => weights.map(|w| w.abs()).sum::<Float>(),
            Regularization::L2 => weights.map(|w| w * w).sum::<Float>(),
        };
        lambda * norm
    }

    /// Adds the penalty gradient to `grad`, skipping the bias entry.
    ///
    /// For [`L1`](Regularization::L1) the subgradient at `θⱼ = 0` is taken as `0`.
    /// For [`L2`](Regularization::L2) the term is `λ·θ`, half the derivative of
    /// [`penalty`](Regularization::penalty), so the regularized gradient is not
    /// the exact derivative of the regularized cost.
    pub fn add_gradient(&self, theta: &Vector, lambda: Float, grad: &mut Vector) {
        for (g, &w) in grad.iter_mut().zip(theta.iter()).skip(1) {
            *g += match self {
                Regularization::L1 => {
                    if w == 0.0 {
                        0.0
                    } else {
                        lambda * w.signum()
                    }
                }
                Regularization::L2 => lambda * w,
            };
        }
    }
}

/// Regularized negative log-likelihood over a bias-augmented design matrix.
///
/// ```text
/// J(θ) = Σᵢ [ ln(1 + e^{zᵢ}) − yᵢ zᵢ ] + penalty(θ₁:),   z = X θ
/// ```
///
/// which equals `−Σᵢ [ yᵢ ln ŷᵢ + (1 − yᵢ) ln(1 − ŷᵢ) ]` with `ŷ = σ(z)`, but
/// stays finite when `ŷ` saturates.
///
/// The objective borrows its data; `x` must already contain the bias column
/// (see [`add_bias_column`](crate::add_bias_column)).
#[derive(Debug, Clone, Copy)]
pub struct Objective<'a> {
    x: &'a Matrix,
    y: &'a Vector,
    lambda: Float,
    regularization: Regularization,
}

impl<'a> Objective<'a> {
    /// Builds an objective over augmented `x` and labels `y`.
    ///
    /// # Errors
    ///
    /// - [`LogitError::EmptyTrainingData`] if `x` has zero rows.
    /// - [`LogitError::ShapeMismatch`] if `y.len() != x.nrows()`.
    pub fn new(
        x: &'a Matrix,
        y: &'a Vector,
        lambda: Float,
        regularization: Regularization,
    ) -> Result<Self> {
        check_samples(x, y)?;
        Ok(Self {
            x,
            y,
            lambda,
            regularization,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    /// Number of weights, bias included.
    pub fn n_params(&self) -> usize {
        self.x.ncols()
    }

    fn check_theta(&self, theta: &Vector) -> Result<()> {
        if theta.len() != self.x.ncols() {
            return Err(LogitError::ShapeMismatch {
                expected: format!("Expected theta of length {}", self.x.ncols()),
                got: format!("Got {}", theta.len()),
            });
        }
        Ok(())
    }

    /// Regularized cost `J(θ)`.
    pub fn cost(&self, theta: &Vector) -> Result<Float> {
        self.check_theta(theta)?;

        let z = self.x * theta;
        let nll: Float = z
            .iter()
            .zip(self.y.iter())
            .map(|(&zi, &yi)| softplus(zi) - yi * zi)
            .sum();

        Ok(nll + self.regularization.penalty(theta, self.lambda))
    }

    /// Full-dataset gradient `Xᵀ(σ(Xθ) − y)` plus the penalty gradient.
    pub fn gradient(&self, theta: &Vector) -> Result<Vector> {
        self.check_theta(theta)?;

        let residual = sigmoid_vector(self.x * theta) - self.y;
        let mut grad = self.x.tr_mul(&residual);
        self.regularization.add_gradient(theta, self.lambda, &mut grad);
        Ok(grad)
    }

    /// Gradient contributed by the single instance at row `i`, penalty included.
    ///
    /// # Errors
    ///
    /// - [`LogitError::ShapeMismatch`] if `theta` has the wrong length.
    /// - [`LogitError::InvalidValue`] if `i` is out of range.
    pub fn instance_gradient(&self, theta: &Vector, i: usize) -> Result<Vector> {
        self.check_theta(theta)?;
        if i >= self.n_samples() {
            return Err(LogitError::InvalidValue {
                message: format!("row {} out of range for {} samples", i, self.n_samples()),
            });
        }

        let xi = self.x.row(i);
        let zi: Float = xi.iter().zip(theta.iter()).map(|(a, b)| a * b).sum();
        let err = sigmoid(zi) - self.y[i];

        let mut grad = Vector::from_iterator(xi.len(), xi.iter().map(|&v| v * err));
        self.regularization.add_gradient(theta, self.lambda, &mut grad);
        Ok(grad)
    }
}

/// Regularized cost of `theta` on augmented `x` and labels `y`.
///
/// Convenience wrapper around [`Objective::cost`].
pub fn cost(
    theta: &Vector,
    x: &Matrix,
    y: &Vector,
    lambda: Float,
    regularization: Regularization,
) -> Result<Float> {
    Objective::new(x, y, lambda, regularization)?.cost(theta)
}

/// Regularized gradient of `theta` on augmented `x` and labels `y`.
///
/// Convenience wrapper around [`Objective::gradient`].
pub fn gradient(
    theta: &Vector,
    x: &Matrix,
    y: &Vector,
    lambda: Float,
    regularization: Regularization,
) -> Result<Vector> {
    Objective::new(x, y, lambda, regularization)?.gradient(theta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::add_bias_column;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use proptest::prelude::*;
    use rstest::rstest;

    fn toy() -> (Matrix, Vector) {
        let x = Matrix::from_row_slice(4, 1, &[0.0, 1.0, 2.0, 3.0]);
        let y = Vector::from_vec(vec![0.0, 0.0, 1.0, 1.0]);
        (add_bias_column(&x), y)
    }

    #[test]
    fn test_sigmoid_known_values() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert_relative_eq!(sigmoid(2.0), 0.880_797, epsilon = 1e-6);
        assert_relative_eq!(sigmoid(-2.0), 0.119_203, epsilon = 1e-6);
    }

    #[test]
    fn test_sigmoid_saturates_inside_open_interval() {
        assert!(sigmoid(1e6) < 1.0);
        assert!(sigmoid(-1e6) > 0.0);
        assert!(sigmoid(Float::MAX) < 1.0);
        assert!(sigmoid(Float::MIN) > 0.0);
    }

    #[test]
    fn test_sigmoid_keeps_small_probabilities() {
        assert_relative_eq!(sigmoid(-20.0), 2.061_153_6e-9, max_relative = 1e-3);
        assert_relative_eq!(sigmoid(-50.0), 1.928_749_8e-22, max_relative = 1e-3);
    }

    #[test]
    fn test_regularization_from_norm() {
        assert_eq!(Regularization::from_norm(1).unwrap(), Regularization::L1);
        assert_eq!(Regularization::from_norm(2).unwrap(), Regularization::L2);
        assert_eq!(Regularization::L1.norm(), 1);
    }

    #[rstest]
    #[case(0)]
    #[case(3)]
    #[case(42)]
    fn test_regularization_rejects_unknown_norm(#[case] norm: u32) {
        assert!(matches!(
            Regularization::from_norm(norm),
            Err(LogitError::InvalidHyperparameter { .. })
        ));
    }

    #[rstest]
    #[case(Regularization::L1, 0.5 * (2.0 + 3.0))]
    #[case(Regularization::L2, 0.5 * (4.0 + 9.0))]
    fn test_penalty_skips_bias(#[case] reg: Regularization, #[case] expected: Float) {
        let theta = Vector::from_vec(vec![100.0, -2.0, 3.0]);
        assert_relative_eq!(reg.penalty(&theta, 0.5), expected);
    }

    #[test]
    fn test_l1_gradient_at_zero_is_zero() {
        let theta = Vector::from_vec(vec![1.0, 0.0, -2.0, 4.0]);
        let mut grad = Vector::zeros(4);
        Regularization::L1.add_gradient(&theta, 0.3, &mut grad);

        assert_eq!(grad[0], 0.0);
        assert_eq!(grad[1], 0.0);
        assert_relative_eq!(grad[2], -0.3);
        assert_relative_eq!(grad[3], 0.3);
    }

    #[test]
    fn test_l2_gradient_skips_bias() {
        let theta = Vector::from_vec(vec![5.0, -2.0, 3.0]);
        let mut grad = Vector::zeros(3);
        Regularization::L2.add_gradient(&theta, 0.5, &mut grad);
        assert_relative_eq!(grad, Vector::from_vec(vec![0.0, -1.0, 1.5]));
    }

    #[test]
    fn test_cost_at_zero_theta_is_n_ln2() {
        let (x, y) = toy();
        let theta = Vector::zeros(2);
        let c = cost(&theta, &x, &y, 0.0, Regularization::L2).unwrap();
        assert_relative_eq!(c, 4.0 * (2.0 as Float).ln(), epsilon = 1e-5);
    }

    #[test]
    fn test_cost_matches_cross_entropy() {
        let (x, y) = toy();
        let theta = Vector::from_vec(vec![-1.0, 0.7]);
        let c = cost(&theta, &x, &y, 0.0, Regularization::L2).unwrap();

        let p = sigmoid_vector(&x * &theta);
        let expected: Float = p
            .iter()
            .zip(y.iter())
            .map(|(&pi, &yi)| -(yi * pi.ln() + (1.0 - yi) * (1.0 - pi).ln()))
            .sum();
        assert_relative_eq!(c, expected, epsilon = 1e-4);
    }

    #[test]
    fn test_cost_finite_for_saturated_predictions() {
        let (x, y) = toy();
        let theta = Vector::from_vec(vec![500.0, -500.0]);
        let c = cost(&theta, &x, &y, 0.0, Regularization::L2).unwrap();
        assert!(c.is_finite());
    }

    #[test]
    fn test_gradient_matches_finite_differences() {
        let (x, y) = toy();
        let theta = Vector::from_vec(vec![-0.4, 0.3]);
        let objective = Objective::new(&x, &y, 0.0, Regularization::L2).unwrap();
        let grad = objective.gradient(&theta).unwrap();

        let h = 1e-2;
        for j in 0..theta.len() {
            let mut plus = theta.clone();
            let mut minus = theta.clone();
            plus[j] += h;
            minus[j] -= h;
            let numeric =
                (objective.cost(&plus).unwrap() - objective.cost(&minus).unwrap()) / (2.0 * h);
            assert_abs_diff_eq!(grad[j], numeric, epsilon = 1e-2);
        }
    }

    #[rstest]
    #[case(Regularization::L1, vec![0.0, 0.2, -0.2])]
    #[case(Regularization::L2, vec![0.0, 0.06, -0.1])]
    fn test_penalty_gradient_term(#[case] reg: Regularization, #[case] expected: Vec<Float>) {
        let x = add_bias_column(&Matrix::from_row_slice(3, 2, &[0.0, 1.0, 1.0, 2.0, -1.0, 0.5]));
        let y = Vector::from_vec(vec![0.0, 1.0, 1.0]);
        let theta = Vector::from_vec(vec![0.7, 0.3, -0.5]);

        let plain = Objective::new(&x, &y, 0.0, reg).unwrap();
        let penalized = Objective::new(&x, &y, 0.2, reg).unwrap();
        let term = penalized.gradient(&theta).unwrap() - plain.gradient(&theta).unwrap();

        assert_relative_eq!(term, Vector::from_vec(expected), epsilon = 1e-6);
    }

    #[test]
    fn test_instance_gradients_sum_to_unregularized_gradient() {
        let (x, y) = toy();
        let theta = Vector::from_vec(vec![0.1, -0.2]);
        let objective = Objective::new(&x, &y, 0.0, Regularization::L2).unwrap();

        let mut total = Vector::zeros(2);
        for i in 0..objective.n_samples() {
            total += objective.instance_gradient(&theta, i).unwrap();
        }
        assert_relative_eq!(total, objective.gradient(&theta).unwrap(), epsilon = 1e-5);
    }

    #[test]
    fn test_instance_gradient_out_of_range() {
        let (x, y) = toy();
        let objective = Objective::new(&x, &y, 0.0, Regularization::L2).unwrap();
        assert!(matches!(
            objective.instance_gradient(&Vector::zeros(2), 4),
            Err(LogitError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_theta_length_mismatch() {
        let (x, y) = toy();
        let theta = Vector::zeros(3);
        assert!(matches!(
            cost(&theta, &x, &y, 0.0, Regularization::L2),
            Err(LogitError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            gradient(&theta, &x, &y, 0.0, Regularization::L1),
            Err(LogitError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_objective_rejects_label_mismatch() {
        let (x, _) = toy();
        let y = Vector::zeros(3);
        assert!(matches!(
            Objective::new(&x, &y, 0.0, Regularization::L2),
            Err(LogitError::ShapeMismatch { .. })
        ));
    }

    proptest! {
        #[test]
        fn sigmoid_stays_in_open_unit_interval(z in prop::num::f32::NORMAL | prop::num::f32::ZERO) {
            let p = sigmoid(z);
            prop_assert!(p > 0.0 && p < 1.0);
        }
    }
}
