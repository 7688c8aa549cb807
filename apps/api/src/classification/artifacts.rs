use std::path::Path;
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use tracing::info;

use crate::classification::model::{DecisionModel, LinearModel};
use crate::classification::ranker::ensure_enough_classes;
use crate::classification::vectorizer::{TfidfVectorizer, Vectorizer};

/// A vectorizer and model that were trained together.
#[derive(Clone)]
pub struct ModelArtifacts {
    pub vectorizer: Arc<dyn Vectorizer>,
    pub model: Arc<dyn DecisionModel>,
}

impl ModelArtifacts {
    /// Pairs a vectorizer with a model, failing when they cannot work together.
    pub fn new(vectorizer: Arc<dyn Vectorizer>, model: Arc<dyn DecisionModel>) -> Result<Self> {
        check_pair(vectorizer.as_ref(), model.as_ref())?;
        Ok(Self { vectorizer, model })
    }

    /// Loads the exported vectorizer and model from disk. Called once at startup.
    pub fn load(vectorizer_path: &Path, model_path: &Path) -> Result<Self> {
        let vectorizer = TfidfVectorizer::load(vectorizer_path)?;
        let model = LinearModel::load(model_path)?;

        let artifacts = Self::new(Arc::new(vectorizer), Arc::new(model)).with_context(|| {
            format!(
                "{} and {} are not a matched pair",
                vectorizer_path.display(),
                model_path.display()
            )
        })?;

        info!(
            features = artifacts.vectorizer.dimension(),
            classes = artifacts.model.class_labels().len(),
            "Model artifacts loaded"
        );
        Ok(artifacts)
    }
}

fn check_pair(vectorizer: &dyn Vectorizer, model: &dyn DecisionModel) -> Result<()> {
    ensure!(
        vectorizer.dimension() == model.input_dimension(),
        "vectorizer produces {} features but model expects {}",
        vectorizer.dimension(),
        model.input_dimension()
    );
    ensure_enough_classes(model.class_labels().len())?;
    Ok(())
}
