use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use logit_core::utils::{check_binary_labels, check_samples};
use logit_core::{
    add_bias_column, sigmoid_vector, Float, LogitError, Matrix, Objective, Predictions,
    Regularization, Result, TrainingLogger, Vector, Verbosity,
};

use crate::adaptive_descent::adaptive_instance_descent;
use crate::batch_descent::batch_gradient_descent;
use crate::{FitReport, LogisticRegressionParams, Solver, ThetaInit};

/// Binary **logistic regression** with L1 or L2 regularization, trained by
/// gradient descent.
///
/// The model predicts
///
/// ```text
/// P(y = 1 | x) = σ(θ₀ + θ₁x₁ + … + θ_d x_d),   σ(z) = 1 / (1 + e^(−z))
/// ```
///
/// where `θ₀` is the bias. Inputs never contain the constant feature; it is
/// prepended internally (see [`add_bias_column`]), so `θ` always has
/// `n_features + 1` entries.
///
/// # Training objective
///
/// ```text
/// J(θ) = −Σᵢ [ yᵢ ln ŷᵢ + (1 − yᵢ) ln(1 − ŷᵢ) ] + λ·R(θ₁:)
/// ```
///
/// with `R = ‖·‖₁` for [`Regularization::L1`] and `R = ‖·‖₂²` for
/// [`Regularization::L2`]. The bias is not regularized.
///
/// Two solvers are available through [`Solver`]:
///
/// - [`Solver::BatchGradientDescent`]: full-dataset gradient per iteration.
/// - [`Solver::AdaptiveInstanceDescent`]: shuffled per-instance updates with a
///   step size that shrinks with the accumulated gradient norm.
///
/// # Stored parameters
///
/// - `theta`: `Some(θ)` after a successful [`fit`](LogisticRegression::fit);
///   `None` before fitting. It is the model's only learned state.
///
/// # Example
///
/// ```rust
/// use logit_core::{Matrix, Vector};
/// use logit_models::{LogisticRegression, ThetaInit};
///
/// let x = Matrix::from_row_slice(4, 1, &[0.0, 1.0, 2.0, 3.0]);
/// let y = Vector::from_vec(vec![0.0, 0.0, 1.0, 1.0]);
///
/// let mut model = LogisticRegression::new()
///     .with_learning_rate(0.1)
///     .with_reg_lambda(0.0)
///     .with_max_iters(1_000)
///     .with_init(ThetaInit::Zeros);
/// model.fit(&x, &y).unwrap();
///
/// assert_eq!(model.predict(&x).unwrap(), vec![0, 0, 1, 1]);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct LogisticRegression {
    params: LogisticRegressionParams,

    /// Weights `θ`, bias first. `None` until fitted.
    theta: Option<Vector>,
}

impl LogisticRegression {
    /// Creates a new, unfitted model with default hyperparameters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: LogisticRegressionParams) -> Self {
        Self {
            params,
            theta: None,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: Float) -> Self {
        self.params.learning_rate = learning_rate;
        self
    }

    pub fn with_reg_lambda(mut self, reg_lambda: Float) -> Self {
        self.params.reg_lambda = reg_lambda;
        self
    }

    pub fn with_regularization(mut self, regularization: Regularization) -> Self {
        self.params.regularization = regularization;
        self
    }

    pub fn with_epsilon(mut self, epsilon: Float) -> Self {
        self.params.epsilon = epsilon;
        self
    }

    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.params.max_iters = max_iters;
        self
    }

    pub fn with_init(mut self, init: ThetaInit) -> Self {
        self.params.init = init;
        self
    }

    pub fn with_solver(mut self, solver: Solver) -> Self {
        self.params.solver = solver;
        self
    }

    pub fn with_warm_start(mut self, warm_start: bool) -> Self {
        self.params.warm_start = warm_start;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.params.seed = Some(seed);
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.params.verbosity = verbosity;
        self
    }

    pub fn params(&self) -> &LogisticRegressionParams {
        &self.params
    }

    /// Learned weights, bias first, or `None` if not fitted.
    pub fn theta(&self) -> Option<&Vector> {
        self.theta.as_ref()
    }

    /// Learned intercept `θ₀`.
    pub fn bias(&self) -> Option<Float> {
        self.theta.as_ref().map(|t| t[0])
    }

    /// Regularized cost `J(θ)` of `theta` on raw features `x` and labels `y`,
    /// using this model's `λ` and norm.
    ///
    /// # Errors
    ///
    /// - [`LogitError::EmptyTrainingData`] if `x` has zero rows.
    /// - [`LogitError::ShapeMismatch`] if `y.len() != x.nrows()` or
    ///   `theta.len() != x.ncols() + 1`.
    pub fn cost(&self, theta: &Vector, x: &Matrix, y: &Vector) -> Result<Float> {
        let x_aug = add_bias_column(x);
        self.objective(&x_aug, y)?.cost(theta)
    }

    /// Gradient `Xᵀ(ŷ − y)` plus the penalty gradient on the non-bias weights.
    ///
    /// Same inputs and errors as [`cost`](LogisticRegression::cost).
    pub fn gradient(&self, theta: &Vector, x: &Matrix, y: &Vector) -> Result<Vector> {
        let x_aug = add_bias_column(x);
        self.objective(&x_aug, y)?.gradient(theta)
    }

    /// `true` iff `‖θ_old − θ_new‖₂ ≤ ε` for this model's `ε`.
    ///
    /// Both vectors must have the same length.
    pub fn has_converged(&self, theta_new: &Vector, theta_old: &Vector) -> bool {
        logit_core::has_converged(theta_new, theta_old, self.params.epsilon)
    }

    fn objective<'a>(&self, x_aug: &'a Matrix, y: &'a Vector) -> Result<Objective<'a>> {
        Objective::new(x_aug, y, self.params.reg_lambda, self.params.regularization)
    }

    /// Fits `θ` on training data `x` and binary labels `y`.
    ///
    /// # Parameters
    ///
    /// - `x`: Design matrix `X` with shape `(n × d)`, without a bias column.
    /// - `y`: Labels of length `n`, each exactly `0.0` or `1.0`.
    ///
    /// # Algorithm
    ///
    /// 1. Prepend a column of ones to `X`.
    /// 2. Initialize `θ` (length `d + 1`) from the previous fit when
    ///    `warm_start` is set, otherwise from `init`.
    /// 3. Run the configured [`Solver`] until the convergence test passes or
    ///    `max_iters` is reached.
    ///
    /// # Returns
    ///
    /// A [`FitReport`] with the iteration count, convergence flag and cost
    /// history. The fitted weights are stored in the model.
    ///
    /// # Errors
    ///
    /// - [`LogitError::InvalidHyperparameter`] if the parameters fail
    ///   [`validate`](LogisticRegressionParams::validate).
    /// - [`LogitError::EmptyTrainingData`] if `x.nrows() == 0`.
    /// - [`LogitError::ShapeMismatch`] if `y.len() != x.nrows()`, or the
    ///   initial `θ` does not have `d + 1` entries.
    /// - [`LogitError::InvalidTrainingData`] if a label is not `0` or `1`.
    /// - [`LogitError::InvalidValue`] if training diverges to non-finite weights
    ///   or a non-finite cost.
    ///
    /// # Complexity
    ///
    /// Let `n = nrows`, `d = ncols`, `t = iterations`:
    /// - Time: `O(t n d)` for both solvers
    /// - Memory: `O(n d)` for the augmented copy of `X`
    pub fn fit(&mut self, x: &Matrix, y: &Vector) -> Result<FitReport> {
        self.params.validate()?;
        check_samples(x, y)?;
        check_binary_labels(y)?;

        let x_aug = add_bias_column(x);
        let objective = self.objective(&x_aug, y)?;

        let mut rng = match self.params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let theta = self.initial_theta(objective.n_params(), &mut rng)?;

        let mut logger = TrainingLogger::new(self.params.verbosity);
        logger.start_training(self.params.solver.name(), self.params.max_iters);

        let (theta, report) = match self.params.solver {
            Solver::BatchGradientDescent => {
                batch_gradient_descent(&objective, theta, &self.params, &logger)?
            }
            Solver::AdaptiveInstanceDescent { convergence } => adaptive_instance_descent(
                &objective,
                theta,
                &self.params,
                convergence,
                &mut rng,
                &logger,
            )?,
        };

        logger.finish_training(report.iterations, report.converged, report.final_cost());

        self.theta = Some(theta);
        Ok(report)
    }

    fn initial_theta<R: Rng>(&self, n_params: usize, rng: &mut R) -> Result<Vector> {
        let theta = match (&self.theta, &self.params.init) {
            (Some(previous), _) if self.params.warm_start => previous.clone(),
            (_, ThetaInit::Given(theta)) => theta.clone(),
            (_, ThetaInit::Zeros) => Vector::zeros(n_params),
            (_, &ThetaInit::Uniform { low, high }) => {
                Vector::from_fn(n_params, |_, _| rng.random_range(low..=high))
            }
        };

        if theta.len() != n_params {
            return Err(LogitError::ShapeMismatch {
                expected: format!("Expected initial theta of length {}", n_params),
                got: format!("Got {}", theta.len()),
            });
        }
        Ok(theta)
    }

    /// Predicts `P(y = 1 | x)` for every row of `x`.
    ///
    /// Computes `σ([1 | X] θ)`. Every output lies strictly inside `(0, 1)`.
    ///
    /// # Errors
    ///
    /// - [`LogitError::NotFitted`] if the model has not been trained.
    /// - [`LogitError::ShapeMismatch`] if `x.ncols() + 1 != θ.len()`.
    ///
    /// # Complexity
    ///
    /// - Time: `O(n d)`
    /// - Space: `O(n d)` for the augmented copy of `X`
    pub fn predict_proba(&self, x: &Matrix) -> Result<Vector> {
        let theta = self.theta.as_ref().ok_or(LogitError::NotFitted)?;

        if x.ncols() + 1 != theta.len() {
            return Err(LogitError::ShapeMismatch {
                expected: format!("Expected {} features", theta.len() - 1),
                got: format!("Got {}", x.ncols()),
            });
        }

        let x_aug = add_bias_column(x);
        Ok(sigmoid_vector(&x_aug * theta))
    }

    /// Predicts class labels by thresholding
    /// [`predict_proba`](LogisticRegression::predict_proba) at `0.5`
    /// (`p ≥ 0.5 → 1`).
    pub fn predict(&self, x: &Matrix) -> Result<Predictions> {
        let proba = self.predict_proba(x)?;
        Ok(proba.iter().map(|&p| (p >= 0.5) as usize).collect())
    }
}
