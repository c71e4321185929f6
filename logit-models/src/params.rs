#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use logit_core::{Float, LogitError, Regularization, Result, Vector, Verbosity};

/// How the weight vector is initialized at the start of [`fit`](crate::LogisticRegression::fit).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum ThetaInit {
    /// Each weight drawn independently from `[low, high]`.
    Uniform { low: Float, high: Float },
    /// All weights start at zero.
    Zeros,
    /// Caller-supplied weights, bias first. Length must be `n_features + 1`.
    Given(Vector),
}

impl Default for ThetaInit {
    fn default() -> Self {
        ThetaInit::Uniform {
            low: -0.5,
            high: 0.5,
        }
    }
}

/// When the adaptive solver tests for convergence.
///
/// Both compare θ with its value at the start of the current pass over the data.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConvergenceCheck {
    /// After every instance update; the first hit ends training mid-pass.
    #[default]
    PerInstance,
    /// Once, after the full pass.
    PerEpoch,
}

/// Update rule used by [`fit`](crate::LogisticRegression::fit).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Solver {
    /// `θ ← θ − α·∇J(θ)` over the full dataset each iteration.
    #[default]
    BatchGradientDescent,
    /// Shuffled per-instance updates with step `α / (‖G‖₂ + 1e-5)`, where `G`
    /// is the running sum of instance gradients.
    AdaptiveInstanceDescent { convergence: ConvergenceCheck },
}

impl Solver {
    pub fn adaptive() -> Self {
        Solver::AdaptiveInstanceDescent {
            convergence: ConvergenceCheck::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Solver::BatchGradientDescent => "batch gradient descent",
            Solver::AdaptiveInstanceDescent { .. } => "adaptive instance descent",
        }
    }
}

/// Hyperparameters for [`LogisticRegression`](crate::LogisticRegression).
///
/// Immutable for the duration of one fit.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegressionParams {
    /// Learning rate `α`.
    pub learning_rate: Float,
    /// Regularization strength `λ`.
    pub reg_lambda: Float,
    pub regularization: Regularization,
    /// Convergence tolerance `ε` on `‖θ_old − θ_new‖₂`.
    pub epsilon: Float,
    /// Iteration cap. For the adaptive solver one iteration is one pass over the data.
    pub max_iters: usize,
    pub init: ThetaInit,
    pub solver: Solver,
    /// Continue from the weights of a previous fit instead of `init`.
    pub warm_start: bool,
    /// Seed for initialization and shuffling. `None` draws a fresh seed per fit.
    pub seed: Option<u64>,
    pub verbosity: Verbosity,
}

impl Default for LogisticRegressionParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            reg_lambda: 0.01,
            regularization: Regularization::L2,
            epsilon: 1e-4,
            max_iters: 10_000,
            init: ThetaInit::default(),
            solver: Solver::default(),
            warm_start: false,
            seed: None,
            verbosity: Verbosity::default(),
        }
    }
}

fn invalid(name: &str, value: impl ToString) -> LogitError {
    LogitError::InvalidHyperparameter {
        name: name.into(),
        value: value.to_string(),
    }
}

impl LogisticRegressionParams {
    /// Checks every field.
    ///
    /// # Errors
    ///
    /// - [`LogitError::InvalidHyperparameter`] if `learning_rate` is not positive
    ///   and finite, `reg_lambda` or `epsilon` is negative or non-finite,
    ///   `max_iters == 0`, or a uniform initializer has `low > high` or a
    ///   non-finite bound.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(invalid("learning_rate", self.learning_rate));
        }
        if !(self.reg_lambda.is_finite() && self.reg_lambda >= 0.0) {
            return Err(invalid("reg_lambda", self.reg_lambda));
        }
        if !(self.epsilon.is_finite() && self.epsilon >= 0.0) {
            return Err(invalid("epsilon", self.epsilon));
        }
        if self.max_iters == 0 {
            return Err(invalid("max_iters", 0));
        }
        if let ThetaInit::Uniform { low, high } = self.init {
            if !(low.is_finite() && high.is_finite() && low <= high) {
                return Err(invalid("init", format!("uniform range [{}, {}]", low, high)));
            }
        }
        Ok(())
    }
}
