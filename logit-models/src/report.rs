#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use logit_core::Float;

/// Outcome of one call to [`fit`](crate::LogisticRegression::fit).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitReport {
    /// Iterations actually run (passes over the data for the adaptive solver).
    pub iterations: usize,
    /// Whether training stopped on the convergence test rather than the iteration cap.
    pub converged: bool,
    /// Regularized cost recorded after each iteration.
    pub cost_history: Vec<Float>,
}

impl FitReport {
    pub(crate) fn record(&mut self, cost: Float) {
        self.cost_history.push(cost);
        self.iterations = self.cost_history.len();
    }

    pub fn final_cost(&self) -> Option<Float> {
        self.cost_history.last().copied()
    }
}
