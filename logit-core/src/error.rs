use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogitError {
    /// Shape or dimensionality mismatch
    #[error("shape mismatch: {expected}, {got}")]
    ShapeMismatch { expected: String, got: String },

    /// Model used before calling `fit`
    #[error("model used before calling `fit`")]
    NotFitted,

    /// The training dataset contains zero samples.
    #[error("training dataset contains zero samples")]
    EmptyTrainingData,

    /// Invalid Hyperparameter Value
    #[error("invalid hyperparameter `{name}`: {value}")]
    InvalidHyperparameter { name: String, value: String },

    /// Invalid value
    #[error("invalid value: {message}")]
    InvalidValue { message: String },

    /// Labels or features the optimizer cannot train on.
    #[error("invalid training data: {message}")]
    InvalidTrainingData { message: String },
}

pub type Result<T> = std::result::Result<T, LogitError>;
