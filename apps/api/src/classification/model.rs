use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

/// One decision score per class, in class-label order.
pub type ScoreVector = Vec<f64>;

/// A trained multi-class scorer.
///
/// `decision_scores` must return exactly one score per entry of
/// `class_labels`, in the same order.
pub trait DecisionModel: Send + Sync {
    fn class_labels(&self) -> &[String];
    fn input_dimension(&self) -> usize;
    fn decision_scores(&self, features: &[f64]) -> Result<ScoreVector>;
}

/// One-vs-rest linear classifier: `score[c] = coef[c] · x + intercept[c]`.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    classes: Vec<String>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

impl LinearModel {
    pub fn from_json(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json).context("Model artifact is not valid JSON")?;
        model.check()?;
        Ok(model)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model from {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid model in {}", path.display()))
    }

    fn check(&self) -> Result<()> {
        ensure!(!self.classes.is_empty(), "model has no classes");
        ensure!(
            self.coef.len() == self.classes.len(),
            "coef has {} rows for {} classes",
            self.coef.len(),
            self.classes.len()
        );
        ensure!(
            self.intercept.len() == self.classes.len(),
            "intercept has {} entries for {} classes",
            self.intercept.len(),
            self.classes.len()
        );
        let width = self.input_dimension();
        ensure!(width > 0, "coef rows are empty");
        for (i, row) in self.coef.iter().enumerate() {
            ensure!(
                row.len() == width,
                "coef row {i} has {} columns, expected {width}",
                row.len()
            );
        }
        Ok(())
    }
}

impl DecisionModel for LinearModel {
    fn class_labels(&self) -> &[String] {
        &self.classes
    }

    fn input_dimension(&self) -> usize {
        self.coef.first().map(Vec::len).unwrap_or(0)
    }

    fn decision_scores(&self, features: &[f64]) -> Result<ScoreVector> {
        ensure!(
            features.len() == self.input_dimension(),
            "feature vector has {} entries, model expects {}",
            features.len(),
            self.input_dimension()
        );

        Ok(self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect())
    }
}
