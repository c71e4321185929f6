#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use logit_core::{Float, LogitError, Matrix, Result, Vector};

/// Standardizes features to zero mean and unit variance.
///
/// For each column `j`:
///
/// ```text
/// z[i, j] = (x[i, j] − μ_j) / σ_j
/// ```
///
/// where `σ_j` is the population standard deviation (divides by `n`).
/// Constant columns get `σ_j = 1`, so they map to zero instead of `NaN`.
///
/// Statistics are learned once by [`fit`](StandardScaler::fit) and reused by
/// [`transform`](StandardScaler::transform), so test data is scaled with the
/// training set's mean and deviation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    mean: Option<Vector>,
    scale: Option<Vector>,
}

fn column_stats(x: &Matrix, j: usize) -> (Float, Float) {
    let col = x.column(j);
    let n = col.len() as Float;
    let mean = col.sum() / n;
    let var = col.iter().map(|&v| (v - mean) * (v - mean)).sum::<Float>() / n;
    let std = var.sqrt();
    (mean, if std > 0.0 { std } else { 1.0 })
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learns per-column mean and standard deviation from `x`.
    ///
    /// # Errors
    ///
    /// - [`LogitError::EmptyTrainingData`] if `x` has zero rows.
    /// - [`LogitError::InvalidValue`] if a column contains a non-finite value.
    pub fn fit(&mut self, x: &Matrix) -> Result<()> {
        if x.nrows() == 0 {
            return Err(LogitError::EmptyTrainingData);
        }

        let d = x.ncols();

        #[cfg(feature = "parallel")]
        let stats: Vec<(Float, Float)> = (0..d)
            .into_par_iter()
            .map(|j| column_stats(x, j))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let stats: Vec<(Float, Float)> = (0..d).map(|j| column_stats(x, j)).collect();

        if let Some(j) = stats
            .iter()
            .position(|(m, s)| !m.is_finite() || !s.is_finite())
        {
            return Err(LogitError::InvalidValue {
                message: format!("column {} contains a non-finite value", j),
            });
        }

        self.mean = Some(Vector::from_iterator(d, stats.iter().map(|s| s.0)));
        self.scale = Some(Vector::from_iterator(d, stats.iter().map(|s| s.1)));
        Ok(())
    }

    fn fitted(&self, x: &Matrix) -> Result<(&Vector, &Vector)> {
        let (mean, scale) = match (&self.mean, &self.scale) {
            (Some(m), Some(s)) => (m, s),
            _ => return Err(LogitError::NotFitted),
        };

        if x.ncols() != mean.len() {
            return Err(LogitError::ShapeMismatch {
                expected: format!("Expected {} features", mean.len()),
                got: format!("Got {}", x.ncols()),
            });
        }
        Ok((mean, scale))
    }

    /// Applies the learned scaling to `x`.
    ///
    /// # Errors
    ///
    /// - [`LogitError::NotFitted`] if [`fit`](StandardScaler::fit) has not been called.
    /// - [`LogitError::ShapeMismatch`] if `x` has a different number of columns.
    pub fn transform(&self, x: &Matrix) -> Result<Matrix> {
        let (mean, scale) = self.fitted(x)?;
        Ok(Matrix::from_fn(x.nrows(), x.ncols(), |i, j| {
            (x[(i, j)] - mean[j]) / scale[j]
        }))
    }

    pub fn fit_transform(&mut self, x: &Matrix) -> Result<Matrix> {
        self.fit(x)?;
        self.transform(x)
    }

    /// Maps standardized values back to the original units.
    pub fn inverse_transform(&self, z: &Matrix) -> Result<Matrix> {
        let (mean, scale) = self.fitted(z)?;
        Ok(Matrix::from_fn(z.nrows(), z.ncols(), |i, j| {
            z[(i, j)] * scale[j] + mean[j]
        }))
    }

    pub fn mean(&self) -> Option<&Vector> {
        self.mean.as_ref()
    }

    /// Per-column divisor: the standard deviation, or `1` for constant columns.
    pub fn scale(&self) -> Option<&Vector> {
        self.scale.as_ref()
    }
}
