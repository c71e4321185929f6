pub mod datasets;
pub mod metrics;
pub mod preprocessors;

// Re-export public API
pub use logit_core::*;
pub use logit_models::*;
