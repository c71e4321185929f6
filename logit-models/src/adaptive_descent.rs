use rand::seq::SliceRandom;
use rand::Rng;

use logit_core::utils::{check_finite, check_finite_cost};
use logit_core::{has_converged, Float, Objective, Result, TrainingLogger, Vector};

use crate::{ConvergenceCheck, FitReport, LogisticRegressionParams};

/// Keeps the adaptive step finite while the accumulated gradient is zero.
pub const MIN_STEP_DENOMINATOR: Float = 1e-5;

/// Per-instance descent with an adaptive step size.
///
/// Each outer iteration shuffles the instance order, then for every instance `i`:
///
/// ```text
/// gᵢ = ∇Jᵢ(θ)
/// G  ← G + gᵢ
/// θ  ← θ − α / (‖G‖₂ + 1e-5) · gᵢ
/// ```
///
/// `G` is never reset, so the step shrinks as training progresses.
///
/// Convergence compares θ against its value at the start of the outer
/// iteration and is only tested from the second outer iteration on. With
/// [`ConvergenceCheck::PerInstance`] it is tested after every update and the
/// first hit ends training immediately; with [`ConvergenceCheck::PerEpoch`] it
/// is tested once per pass.
///
/// The cost is recorded once per outer iteration, including a pass cut short
/// by convergence.
pub(crate) fn adaptive_instance_descent<R: Rng>(
    objective: &Objective<'_>,
    mut theta: Vector,
    params: &LogisticRegressionParams,
    check: ConvergenceCheck,
    rng: &mut R,
    logger: &TrainingLogger,
) -> Result<(Vector, FitReport)> {
    let mut report = FitReport::default();
    let mut order: Vec<usize> = (0..objective.n_samples()).collect();
    let mut accumulated = Vector::zeros(theta.len());

    for iter in 0..params.max_iters {
        order.shuffle(rng);
        let theta_old = theta.clone();
        let mut converged = false;

        for &i in &order {
            let grad = objective.instance_gradient(&theta, i)?;
            accumulated += &grad;

            let step = params.learning_rate / (accumulated.norm() + MIN_STEP_DENOMINATOR);
            theta.axpy(-step, &grad, 1.0);

            if check == ConvergenceCheck::PerInstance
                && iter > 0
                && has_converged(&theta, &theta_old, params.epsilon)
            {
                converged = true;
                break;
            }
        }

        check_finite(&theta, "theta")?;
        let cost = objective.cost(&theta)?;
        check_finite_cost(cost)?;
        report.record(cost);
        logger.log_iteration(iter, cost);

        if check == ConvergenceCheck::PerEpoch
            && iter > 0
            && has_converged(&theta, &theta_old, params.epsilon)
        {
            converged = true;
        }

        if converged {
            report.converged = true;
            logger.log_converged(iter);
            break;
        }
    }

    Ok((theta, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use logit_core::{add_bias_column, Matrix, Regularization};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::ThetaInit;

    /// Two identical positive instances, so the shuffle order cannot matter.
    fn run(max_iters: usize) -> (Vector, FitReport) {
        let x = add_bias_column(&Matrix::from_element(2, 1, 1.0));
        let y = Vector::from_element(2, 1.0);
        let objective = Objective::new(&x, &y, 0.0, Regularization::L2).unwrap();
        let params = LogisticRegressionParams {
            learning_rate: 0.1,
            reg_lambda: 0.0,
            epsilon: 0.0,
            max_iters,
            init: ThetaInit::Zeros,
            ..Default::default()
        };

        adaptive_instance_descent(
            &objective,
            Vector::zeros(2),
            &params,
            ConvergenceCheck::PerInstance,
            &mut StdRng::seed_from_u64(0),
            &TrainingLogger::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_first_step_divides_by_gradient_norm() {
        // g = [-0.5, -0.5], G = g, step = 0.1 / (‖G‖ + 1e-5)
        let x = add_bias_column(&Matrix::from_element(1, 1, 1.0));
        let y = Vector::from_element(1, 1.0);
        let objective = Objective::new(&x, &y, 0.0, Regularization::L2).unwrap();
        let params = LogisticRegressionParams {
            learning_rate: 0.1,
            max_iters: 1,
            ..Default::default()
        };

        let (theta, _) = adaptive_instance_descent(
            &objective,
            Vector::zeros(2),
            &params,
            ConvergenceCheck::PerEpoch,
            &mut StdRng::seed_from_u64(0),
            &TrainingLogger::default(),
        )
        .unwrap();

        let norm = (0.5 as Float).sqrt();
        let expected = 0.1 * 0.5 / (norm + MIN_STEP_DENOMINATOR);
        assert_relative_eq!(theta, Vector::from_element(2, expected), max_relative = 1e-5);
    }

    #[test]
    fn test_accumulated_gradient_spans_instances() {
        // Two updates: g₁ = [-0.5, -0.5], then g₂ at θ₁ with G = g₁ + g₂.
        let (theta, report) = run(1);
        assert_relative_eq!(theta, Vector::from_element(2, 0.104_771_2), max_relative = 1e-4);
        assert_eq!(report.iterations, 1);
    }

    #[test]
    fn test_accumulated_gradient_persists_across_epochs() {
        // A per-epoch reset of G would give 0.2094, a root-sum-of-squares
        // denominator 0.1898.
        let (theta, report) = run(2);
        assert_relative_eq!(theta, Vector::from_element(2, 0.143_888_3), max_relative = 1e-4);
        assert_eq!(report.cost_history.len(), 2);
        assert!(!report.converged);
    }
}
