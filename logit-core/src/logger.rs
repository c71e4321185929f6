//! Training progress output with verbosity levels.
//!
//! Messages go to stderr and are prefixed with `[logit]`. Each level includes
//! everything printed by the levels below it.

use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Float;

/// How much a training run reports.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Only problems, e.g. hitting the iteration cap without converging.
    Warning,
    /// Start, convergence and summary lines.
    Info,
    /// Cost after every iteration.
    Debug,
}

/// Logger for a single training run.
#[derive(Debug, Clone)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    started: Option<Instant>,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            started: None,
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Whether messages at `level` are printed.
    pub fn enabled(&self, level: Verbosity) -> bool {
        level != Verbosity::Silent && self.verbosity >= level
    }

    pub fn start_training(&mut self, solver: &str, max_iters: usize) {
        self.started = Some(Instant::now());
        self.info(&format!(
            "{}: training for up to {} iterations",
            solver, max_iters
        ));
    }

    pub fn log_iteration(&self, iter: usize, cost: Float) {
        if self.enabled(Verbosity::Debug) {
            eprintln!("[logit] iter {:>6}  cost {:.6}", iter, cost);
        }
    }

    pub fn log_converged(&self, iter: usize) {
        self.info(&format!("converged at iteration {}", iter));
    }

    pub fn finish_training(&self, iterations: usize, converged: bool, final_cost: Option<Float>) {
        if !converged {
            self.warn(&format!(
                "stopped after {} iterations without converging",
                iterations
            ));
        }

        if self.enabled(Verbosity::Info) {
            let elapsed = self
                .started
                .map(|t| format!(" in {:.2?}", t.elapsed()))
                .unwrap_or_default();
            let cost = final_cost
                .map(|c| format!(", final cost {:.6}", c))
                .unwrap_or_default();
            eprintln!(
                "[logit] finished {} iterations{}{}",
                iterations, elapsed, cost
            );
        }
    }

    pub fn info(&self, msg: &str) {
        if self.enabled(Verbosity::Info) {
            eprintln!("[logit] {}", msg);
        }
    }

    pub fn warn(&self, msg: &str) {
        if self.enabled(Verbosity::Warning) {
            eprintln!("[logit] warning: {}", msg);
        }
    }
}

impl Default for TrainingLogger {
    fn default() -> Self {
        Self::new(Verbosity::default())
    }
}
