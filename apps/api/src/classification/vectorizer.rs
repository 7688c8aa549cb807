use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use serde::Deserialize;

/// Dense feature vector; length equals the model's input dimension.
pub type FeatureVector = Vec<f64>;

/// Maps text to a fixed-dimension feature vector.
///
/// Implementations are loaded once and shared read-only across requests.
pub trait Vectorizer: Send + Sync {
    fn dimension(&self) -> usize;
    fn transform(&self, text: &str) -> Result<FeatureVector>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// TF-IDF vectorizer restored from the attributes of a fitted vectorizer.
///
/// Tokens are maximal runs of word characters, at least two long. Terms
/// outside the vocabulary are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default = "default_true")]
    lowercase: bool,
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
    #[serde(default)]
    stop_words: HashSet<String>,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_true() -> bool {
    true
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

impl TfidfVectorizer {
    pub fn from_json(json: &str) -> Result<Self> {
        let vectorizer: Self =
            serde_json::from_str(json).context("Vectorizer artifact is not valid JSON")?;
        vectorizer.check()?;
        Ok(vectorizer)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vectorizer from {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid vectorizer in {}", path.display()))
    }

    fn check(&self) -> Result<()> {
        ensure!(!self.idf.is_empty(), "idf is empty");
        let (min_n, max_n) = self.ngram_range;
        ensure!(
            min_n >= 1 && min_n <= max_n,
            "invalid ngram_range ({min_n}, {max_n})"
        );
        for (term, &column) in &self.vocabulary {
            if column >= self.idf.len() {
                bail!(
                    "term '{term}' maps to column {column}, but idf has {} entries",
                    self.idf.len()
                );
            }
        }
        Ok(())
    }

    fn tokens<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|t| t.chars().count() >= 2)
            .filter(|t| !self.stop_words.contains(*t))
            .collect()
    }
}

impl Vectorizer for TfidfVectorizer {
    fn dimension(&self) -> usize {
        self.idf.len()
    }

    fn transform(&self, text: &str) -> Result<FeatureVector> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let tokens = self.tokens(&text);

        let mut features: FeatureVector = vec![0.0; self.dimension()];
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                if let Some(&column) = self.vocabulary.get(&window.join(" ")) {
                    features[column] += 1.0;
                }
            }
        }

        for (value, idf) in features.iter_mut().zip(&self.idf) {
            if *value > 0.0 {
                let tf = if self.sublinear_tf {
                    1.0 + value.ln()
                } else {
                    *value
                };
                *value = tf * idf;
            }
        }

        let norm = match self.norm {
            Some(Norm::L2) => features.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => features.iter().map(|v| v.abs()).sum::<f64>(),
            None => 0.0,
        };
        if norm > 0.0 {
            features.iter_mut().for_each(|v| *v /= norm);
        }

        Ok(features)
    }
}
