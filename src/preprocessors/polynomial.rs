use logit_core::{LogitError, Matrix, Result};

/// Number of columns produced by [`map_feature`] for `max_power`.
///
/// ```text
/// 2 + Σ_{d=1}^{max_power−1} (d + 2)
/// ```
pub fn mapped_feature_count(max_power: usize) -> usize {
    2 + (1..max_power).map(|d| d + 2).sum::<usize>()
}

/// Expands two columns of `x` into polynomial features.
///
/// Given `X1 = x[:, col1]` and `X2 = x[:, col2]`, the output columns are
///
/// ```text
/// X1, X2,
/// X1², X1·X2, X2²,                       (d = 1)
/// X1³, X1²·X2, X1·X2², X2³,              (d = 2)
/// …
/// X1^(d+1−i) · X2^i  for i = 0..=d+1,    d = 1..=max_power−1
/// ```
///
/// Monomials are ordered by total degree, then by increasing power of `X2`.
/// Columns other than `col1` and `col2` are dropped. No bias column is added
/// and nothing is standardized.
///
/// # Errors
///
/// - [`LogitError::InvalidValue`] if `col1` or `col2` is not a column of `x`.
/// - [`LogitError::InvalidHyperparameter`] if `max_power == 0`.
///
/// # Examples
///
/// ```rust
/// use logit::preprocessors::map_feature;
/// use logit::Matrix;
///
/// let x = Matrix::from_row_slice(1, 2, &[2.0, 3.0]);
/// let mapped = map_feature(&x, 0, 1, 2).unwrap();
///
/// assert_eq!(mapped.row(0).iter().copied().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0, 6.0, 9.0]);
/// ```
pub fn map_feature(x: &Matrix, col1: usize, col2: usize, max_power: usize) -> Result<Matrix> {
    for col in [col1, col2] {
        if col >= x.ncols() {
            return Err(LogitError::InvalidValue {
                message: format!("column {} out of range for {} columns", col, x.ncols()),
            });
        }
    }
    if max_power == 0 {
        return Err(LogitError::InvalidHyperparameter {
            name: "max_power".into(),
            value: "0".into(),
        });
    }

    let n = x.nrows();
    let mut out = Matrix::zeros(n, mapped_feature_count(max_power));
    out.set_column(0, &x.column(col1));
    out.set_column(1, &x.column(col2));

    let mut k = 2;
    for d in 1..max_power {
        for i in 0..=d + 1 {
            for r in 0..n {
                let (a, b) = (x[(r, col1)], x[(r, col2)]);
                out[(r, k)] = a.powi((d + 1 - i) as i32) * b.powi(i as i32);
            }
            k += 1;
        }
    }

    Ok(out)
}
