//! Class probability handling for classifier outputs

/// Per-class probabilities for a single document, indexed by class id
#[derive(Debug, Clone, PartialEq)]
pub struct ClassProbabilities {
    values: Vec<f64>,
}

impl ClassProbabilities {
    /// Build from raw model output.
    ///
    /// Outputs that already form a distribution (non-negative, summing to
    /// ~1) are kept as-is; anything else is treated as logits and passed
    /// through a softmax.
    pub fn from_scores(scores: &[f32]) -> Self {
        let values: Vec<f64> = scores.iter().map(|&s| s as f64).collect();
        if is_distribution(&values) {
            Self { values }
        } else {
            Self {
                values: softmax(&values),
            }
        }
    }

    /// Build from `(class_id, probability)` pairs such as a zipmap output.
    ///
    /// Only ids in `0..num_classes` are kept; missing ones get probability 0.
    /// Returns an empty set when no pair falls in range.
    pub fn from_class_map(pairs: &[(i64, f32)], num_classes: usize) -> Self {
        let in_range = |id: i64| usize::try_from(id).ok().filter(|&i| i < num_classes);
        if !pairs.iter().any(|&(id, _)| in_range(id).is_some()) {
            return Self { values: Vec::new() };
        }
        let mut values = vec![0.0; num_classes];
        for &(id, prob) in pairs {
            if let Some(index) = in_range(id) {
                values[index] = prob as f64;
            }
        }
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Arg-max class and its probability; ties go to the lowest class id
    pub fn best(&self) -> Option<(usize, f64)> {
        self.values
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, p)| !p.is_nan())
            .fold(None, |best, (idx, p)| match best {
                Some((_, best_p)) if best_p >= p => best,
                _ => Some((idx, p)),
            })
    }
}

fn is_distribution(values: &[f64]) -> bool {
    if values.is_empty() || values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return false;
    }
    (values.iter().sum::<f64>() - 1.0).abs() < 1e-3
}

fn softmax(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return vec![0.0; values.len()];
    }
    let exps: Vec<f64> = values.iter().map(|v| (v - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}
