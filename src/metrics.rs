use logit_core::{Float, Label, LogitError, Result, Vector};

fn check_lengths(y_true: &Vector, other: usize) -> Result<()> {
    if y_true.is_empty() {
        return Err(LogitError::InvalidValue {
            message: String::from("cannot score an empty label vector"),
        });
    }
    if y_true.len() != other {
        return Err(LogitError::ShapeMismatch {
            expected: format!("Expected {} predictions", y_true.len()),
            got: format!("Got {}", other),
        });
    }
    Ok(())
}

fn as_label(v: Float) -> Label {
    (v >= 0.5) as Label
}

/// Fraction of predictions equal to the true label.
///
/// # Errors
///
/// - [`LogitError::InvalidValue`] if `y_true` is empty.
/// - [`LogitError::ShapeMismatch`] if the lengths differ.
pub fn accuracy(y_true: &Vector, y_pred: &[Label]) -> Result<Float> {
    check_lengths(y_true, y_pred.len())?;

    let hits = y_true
        .iter()
        .zip(y_pred)
        .filter(|&(&t, &p)| as_label(t) == p)
        .count();
    Ok(hits as Float / y_true.len() as Float)
}

/// Mean binary cross-entropy of predicted probabilities.
///
/// ```text
/// −(1/n) Σᵢ [ yᵢ ln pᵢ + (1 − yᵢ) ln(1 − pᵢ) ]
/// ```
///
/// Probabilities are clipped to `[ε, 1 − ε]` first.
pub fn log_loss(y_true: &Vector, proba: &Vector) -> Result<Float> {
    check_lengths(y_true, proba.len())?;

    let eps = Float::EPSILON;
    let total: Float = y_true
        .iter()
        .zip(proba.iter())
        .map(|(&y, &p)| {
            let p = p.clamp(eps, 1.0 - eps);
            -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        })
        .sum();
    Ok(total / y_true.len() as Float)
}

/// Binary confusion-matrix counts, with `1` as the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl ConfusionCounts {
    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    /// `tp / (tp + fp)`, or `0` when nothing was predicted positive.
    pub fn precision(&self) -> Float {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// `tp / (tp + fn)`, or `0` when there are no positives.
    pub fn recall(&self) -> Float {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    pub fn f1(&self) -> Float {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

fn ratio(num: usize, den: usize) -> Float {
    if den == 0 {
        0.0
    } else {
        num as Float / den as Float
    }
}

pub fn confusion_counts(y_true: &Vector, y_pred: &[Label]) -> Result<ConfusionCounts> {
    check_lengths(y_true, y_pred.len())?;

    let mut counts = ConfusionCounts::default();
    for (&t, &p) in y_true.iter().zip(y_pred) {
        match (as_label(t), p) {
            (1, 1) => counts.true_positive += 1,
            (0, 1) => counts.false_positive += 1,
            (1, _) => counts.false_negative += 1,
            _ => counts.true_negative += 1,
        }
    }
    Ok(counts)
}
