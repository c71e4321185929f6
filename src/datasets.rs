//! Seeded synthetic binary datasets for tests, benchmarks and demos.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use logit_core::{Float, LogitError, Matrix, Result, Vector};

/// Half-width of the cube `[-BOX, BOX]^d` that [`linearly_separable`] samples from.
const BOX: Float = 3.0;

/// Two classes split by the hyperplane `Σⱼ xⱼ = 0`.
///
/// Points are drawn uniformly from `[-3, 3]^d`. Any point closer than
/// `margin / 2` to the hyperplane is rejected, so the classes are separated by
/// a gap of width `margin`. Class `1` lies on the positive side. Each class
/// gets exactly `n_per_class` rows, in sampling order.
///
/// # Errors
///
/// - [`LogitError::InvalidHyperparameter`] if `n_features == 0`, or `margin`
///   is negative, non-finite, or at least `3·√d` (which would leave almost no
///   room to sample).
pub fn linearly_separable(
    n_per_class: usize,
    n_features: usize,
    margin: Float,
    seed: u64,
) -> Result<(Matrix, Vector)> {
    if n_features == 0 {
        return Err(LogitError::InvalidHyperparameter {
            name: "n_features".into(),
            value: "0".into(),
        });
    }
    let norm = (n_features as Float).sqrt();
    if !(margin.is_finite() && margin >= 0.0 && margin < BOX * norm) {
        return Err(LogitError::InvalidHyperparameter {
            name: "margin".into(),
            value: margin.to_string(),
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows: Vec<Float> = Vec::with_capacity(2 * n_per_class * n_features);
    let mut labels: Vec<Float> = Vec::with_capacity(2 * n_per_class);
    let mut counts = [0usize; 2];
    let mut point = vec![0.0; n_features];

    while counts[0] < n_per_class || counts[1] < n_per_class {
        for v in point.iter_mut() {
            *v = rng.random_range(-BOX..BOX);
        }
        let signed = point.iter().sum::<Float>() / norm;
        if signed.abs() < margin / 2.0 {
            continue;
        }

        let label = (signed > 0.0) as usize;
        if counts[label] == n_per_class {
            continue;
        }
        counts[label] += 1;
        rows.extend_from_slice(&point);
        labels.push(label as Float);
    }

    let n = labels.len();
    Ok((
        Matrix::from_row_slice(n, n_features, &rows),
        Vector::from_vec(labels),
    ))
}

/// A disc of class `1` (radius `< 1`) inside a ring of class `0`
/// (radius in `[1.5, 2.5]`), in two dimensions.
///
/// Not linearly separable in the raw features; separable after
/// [`map_feature`](crate::preprocessors::map_feature) with `max_power ≥ 2`.
pub fn concentric_rings(n_per_class: usize, seed: u64) -> (Matrix, Vector) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows: Vec<Float> = Vec::with_capacity(4 * n_per_class);
    let mut labels: Vec<Float> = Vec::with_capacity(2 * n_per_class);

    for _ in 0..n_per_class {
        for (label, lo, hi) in [(1.0, 0.0, 1.0), (0.0, 1.5, 2.5)] {
            let angle = rng.random_range(0.0..TAU);
            let radius: Float = rng.random_range(lo..hi);
            rows.push(radius * angle.cos());
            rows.push(radius * angle.sin());
            labels.push(label);
        }
    }

    let n = labels.len();
    (Matrix::from_row_slice(n, 2, &rows), Vector::from_vec(labels))
}
