mod adaptive_descent;
mod batch_descent;
pub mod logistic_regression;
pub mod params;
pub mod report;

pub use adaptive_descent::MIN_STEP_DENOMINATOR;
pub use logistic_regression::LogisticRegression;
pub use params::{ConvergenceCheck, LogisticRegressionParams, Solver, ThetaInit};
pub use report::FitReport;
