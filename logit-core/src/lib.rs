pub mod error;
pub mod logger;
pub mod loss;
pub mod types;
pub mod utils;

pub use types::{Float, Label, Matrix, Predictions, Vector};

pub use error::{LogitError, Result};

pub use logger::{TrainingLogger, Verbosity};
pub use loss::{cost, gradient, sigmoid, sigmoid_vector, Objective, Regularization};
pub use utils::{add_bias_column, has_converged};
