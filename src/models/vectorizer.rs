//! TF-IDF text vectorizer matching the exported training vocabulary.
//!
//! The training pipeline fits a scikit-learn `TfidfVectorizer` and exports
//! its vocabulary and idf weights as JSON. This module reproduces the
//! transform with the same defaults: `\b\w\w+\b` tokens, raw term counts
//! scaled by idf, then per-document normalisation.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

/// Output normalisation applied to each document vector
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    L1,
    None,
}

/// Serialized vectorizer state as exported by the training scripts
#[derive(Debug, Clone, Deserialize)]
pub struct VectorizerSpec {
    /// Term → feature column
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature column
    pub idf: Vec<f32>,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub norm: Norm,
    #[serde(default)]
    pub sublinear_tf: bool,
}

fn default_lowercase() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// Vectorizer that turns text into a dense TF-IDF feature row
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    spec: VectorizerSpec,
}

impl TfidfVectorizer {
    /// Build a vectorizer, validating the exported state
    pub fn new(spec: VectorizerSpec) -> Result<Self> {
        let (min_n, max_n) = spec.ngram_range;
        if min_n == 0 || min_n > max_n {
            bail!("Invalid ngram_range ({}, {})", min_n, max_n);
        }
        if spec.vocabulary.is_empty() {
            bail!("Vectorizer vocabulary is empty");
        }
        if let Some(&max_index) = spec.vocabulary.values().max() {
            if max_index >= spec.idf.len() {
                bail!(
                    "Vocabulary index {} out of range for {} idf weights",
                    max_index,
                    spec.idf.len()
                );
            }
        }
        Ok(Self { spec })
    }

    /// Load an exported vectorizer from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vectorizer from {}", path.display()))?;
        let spec: VectorizerSpec = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse vectorizer {}", path.display()))?;
        Self::new(spec)
    }

    /// Number of features produced per document
    pub fn dimension(&self) -> usize {
        self.spec.idf.len()
    }

    /// Transform a document into its TF-IDF feature row
    pub fn transform(&self, text: &str) -> Vec<f32> {
        let mut features = vec![0.0_f32; self.dimension()];

        let text = if self.spec.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let tokens: Vec<&str> = TOKEN_PATTERN.find_iter(&text).map(|m| m.as_str()).collect();

        let (min_n, max_n) = self.spec.ngram_range;
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                let term = window.join(" ");
                if let Some(&column) = self.spec.vocabulary.get(&term) {
                    features[column] += 1.0;
                }
            }
        }

        for (column, value) in features.iter_mut().enumerate() {
            if *value > 0.0 {
                let tf = if self.spec.sublinear_tf {
                    1.0 + value.ln()
                } else {
                    *value
                };
                *value = tf * self.spec.idf[column];
            }
        }

        let norm = match self.spec.norm {
            Norm::L2 => features.iter().map(|v| v * v).sum::<f32>().sqrt(),
            Norm::L1 => features.iter().map(|v| v.abs()).sum::<f32>(),
            Norm::None => 0.0,
        };
        if norm > 0.0 {
            features.iter_mut().for_each(|v| *v /= norm);
        }

        features
    }
}
