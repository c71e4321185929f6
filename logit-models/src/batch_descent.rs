use logit_core::utils::{check_finite, check_finite_cost};
use logit_core::{has_converged, Objective, Result, TrainingLogger, Vector};

use crate::{FitReport, LogisticRegressionParams};

/// Full-batch gradient descent.
///
/// Each iteration applies
///
/// ```text
/// θ ← θ − α · ∇J(θ)
/// ```
///
/// using the gradient over every instance, then records `J(θ)`. From the
/// second iteration on, training stops as soon as `‖θ_old − θ‖₂ ≤ ε`.
///
/// # Errors
///
/// - [`LogitError::ShapeMismatch`](logit_core::LogitError::ShapeMismatch) if
///   `theta` does not match the objective's parameter count.
/// - [`LogitError::InvalidValue`](logit_core::LogitError::InvalidValue) if the
///   weights or the cost stop being finite (the learning rate is too large,
///   or `X·θ` overflows).
pub(crate) fn batch_gradient_descent(
    objective: &Objective<'_>,
    mut theta: Vector,
    params: &LogisticRegressionParams,
    logger: &TrainingLogger,
) -> Result<(Vector, FitReport)> {
    let mut report = FitReport::default();

    for iter in 0..params.max_iters {
        let theta_old = theta.clone();
        let grad = objective.gradient(&theta)?;
        theta.axpy(-params.learning_rate, &grad, 1.0);
        check_finite(&theta, "theta")?;

        let cost = objective.cost(&theta)?;
        check_finite_cost(cost)?;
        report.record(cost);
        logger.log_iteration(iter, cost);

        if iter > 0 && has_converged(&theta, &theta_old, params.epsilon) {
            report.converged = true;
            logger.log_converged(iter);
            break;
        }
    }

    Ok((theta, report))
}
