pub type Float = f32;
pub type Matrix = nalgebra::DMatrix<Float>;
pub type Vector = nalgebra::DVector<Float>;

/// Binary class label, either `0` or `1`.
pub type Label = usize;
pub type Predictions = Vec<Label>;
