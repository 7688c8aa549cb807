use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::classification::artifacts::ModelArtifacts;
use crate::classification::model::DecisionModel;
use crate::classification::ranker;
use crate::classification::validator::ResumeValidator;
use crate::classification::vectorizer::Vectorizer;
use crate::classification::ClassificationError;
use crate::extraction;
use crate::models::document::Document;
use crate::models::prediction::RankedRoles;

/// Minimum trimmed character count before any résumé heuristics run.
pub const MIN_CONTENT_CHARS: usize = 10;

/// Document → text → verdict → features → ranked roles.
///
/// Holds only read-only shared capabilities; one instance serves every
/// request concurrently.
pub struct Pipeline {
    vectorizer: Arc<dyn Vectorizer>,
    model: Arc<dyn DecisionModel>,
    validator: ResumeValidator,
    min_content_chars: usize,
}

impl Pipeline {
    pub fn new(artifacts: ModelArtifacts) -> Self {
        Self {
            vectorizer: artifacts.vectorizer,
            model: artifacts.model,
            validator: ResumeValidator::default(),
            min_content_chars: MIN_CONTENT_CHARS,
        }
    }

    #[cfg(test)]
    pub fn with_validator(mut self, validator: ResumeValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn class_labels(&self) -> &[String] {
        self.model.class_labels()
    }

    /// Classifies `document` into its top three roles.
    pub fn classify(&self, document: &Document) -> Result<RankedRoles, ClassificationError> {
        let result = self.run(document);

        if let Err(e) = &result {
            if e.kind().is_caller_error() {
                warn!(stage = %e.stage(), kind = ?e.kind(), "Classification rejected: {e}");
            } else {
                error!(stage = %e.stage(), kind = ?e.kind(), "Classification failed: {e}");
            }
        }
        result
    }

    fn run(&self, document: &Document) -> Result<RankedRoles, ClassificationError> {
        let text = extraction::extract(document)?;

        let content_chars = text.trim().chars().count();
        if content_chars < self.min_content_chars {
            return Err(ClassificationError::InsufficientContent {
                chars: content_chars,
                required: self.min_content_chars,
            });
        }

        let verdict = self.validator.validate(&text);
        if !verdict.is_valid {
            return Err(ClassificationError::NotAResume {
                reason: verdict.reason,
                expected_sections: self.validator.expected_sections().to_vec(),
            });
        }
        debug!(chars = content_chars, "Résumé text validated");

        let features = self
            .vectorizer
            .transform(&text)
            .map_err(|e| ClassificationError::Inference(format!("vectorization failed: {e:#}")))?;
        debug!(dimension = features.len(), "Text vectorized");

        let ranked = ranker::rank(&features, self.model.as_ref())?;
        debug!(top = ?ranked.labels(), "Roles ranked");
        Ok(ranked)
    }
}
