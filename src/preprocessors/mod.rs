pub mod polynomial;
pub mod standard_scaler;

pub use polynomial::{map_feature, mapped_feature_count};
pub use standard_scaler::StandardScaler;
