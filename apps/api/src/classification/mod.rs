//! Résumé classification — validates extracted text and ranks job roles
//! against a pre-trained linear model.
//!
//! `Pipeline` is the single entry point. It is constructed with the loaded
//! vectorizer and model (`Arc<dyn Vectorizer>`, `Arc<dyn DecisionModel>`) so
//! tests can swap in fakes.

pub mod artifacts;
pub mod handlers;
pub mod model;
pub mod pipeline;
pub mod ranker;
pub mod upload;
pub mod validator;
pub mod vectorizer;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::extraction::ExtractionError;

/// Pipeline stage at which a classification failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Extraction,
    Validation,
    Inference,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Extraction => "extraction",
            Stage::Validation => "validation",
            Stage::Inference => "inference",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    UnsupportedFormat,
    ExtractionError,
    InsufficientContent,
    NotAResume,
    InsufficientClasses,
    InferenceError,
}

impl ErrorKind {
    /// Caller errors are fixed by sending a different document; everything
    /// else is an operator or internal failure.
    pub fn is_caller_error(self) -> bool {
        matches!(
            self,
            ErrorKind::UnsupportedFormat
                | ErrorKind::ExtractionError
                | ErrorKind::InsufficientContent
                | ErrorKind::NotAResume
        )
    }
}

#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("Unsupported document format '{0}'")]
    UnsupportedFormat(String),

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Document contains {chars} readable characters, at least {required} required")]
    InsufficientContent { chars: usize, required: usize },

    #[error("Document is not a résumé: {reason}")]
    NotAResume {
        reason: String,
        expected_sections: Vec<String>,
    },

    #[error("Model exposes {found} classes, at least {required} required")]
    InsufficientClasses { found: usize, required: usize },

    #[error("Inference failed: {0}")]
    Inference(String),
}

impl ClassificationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClassificationError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            ClassificationError::Extraction(_) => ErrorKind::ExtractionError,
            ClassificationError::InsufficientContent { .. } => ErrorKind::InsufficientContent,
            ClassificationError::NotAResume { .. } => ErrorKind::NotAResume,
            ClassificationError::InsufficientClasses { .. } => ErrorKind::InsufficientClasses,
            ClassificationError::Inference(_) => ErrorKind::InferenceError,
        }
    }

    pub fn stage(&self) -> Stage {
        match self.kind() {
            ErrorKind::UnsupportedFormat | ErrorKind::ExtractionError => Stage::Extraction,
            ErrorKind::InsufficientContent | ErrorKind::NotAResume => Stage::Validation,
            ErrorKind::InsufficientClasses | ErrorKind::InferenceError => Stage::Inference,
        }
    }

    /// Message safe to show the uploader. Caller errors say what to fix;
    /// operator and internal errors stay generic.
    pub fn user_message(&self) -> String {
        match self {
            ClassificationError::UnsupportedFormat(tag) => format!(
                "Unsupported file format '{tag}'. Upload a PDF (.pdf) or Word (.docx) document."
            ),
            ClassificationError::Extraction(_) => {
                "The document could not be read. Check that the file is not corrupted or password protected."
                    .to_string()
            }
            ClassificationError::InsufficientContent { .. } => {
                "No readable text was found in the document. Scanned images are not supported; upload a text-based résumé."
                    .to_string()
            }
            ClassificationError::NotAResume {
                reason,
                expected_sections,
            } => {
                let sections: Vec<&str> = expected_sections
                    .iter()
                    .take(5)
                    .map(String::as_str)
                    .collect();
                format!(
                    "This document does not look like a résumé ({reason}). \
                     A résumé should contain sections such as {}.",
                    sections.join(", ")
                )
            }
            ClassificationError::InsufficientClasses { .. }
            | ClassificationError::Inference(_) => {
                "The résumé could not be analysed right now. Please try again later.".to_string()
            }
        }
    }
}

impl From<ExtractionError> for ClassificationError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnsupportedFormat(tag) => ClassificationError::UnsupportedFormat(tag),
            e @ ExtractionError::Unreadable { .. } => ClassificationError::Extraction(e.to_string()),
        }
    }
}

/// Fake capabilities for exercising the pipeline without trained artifacts.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::{bail, Result};

    use super::model::{DecisionModel, ScoreVector};
    use super::vectorizer::{FeatureVector, Vectorizer};

    /// Returns a zero vector of fixed length and counts invocations.
    pub struct ZeroVectorizer {
        pub dimension: usize,
        pub calls: AtomicUsize,
    }

    impl ZeroVectorizer {
        pub fn new(dimension: usize) -> Self {
            Self {
                dimension,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Vectorizer for ZeroVectorizer {
        fn dimension(&self) -> usize {
            self.dimension
        }

        fn transform(&self, _text: &str) -> Result<FeatureVector> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![0.0; self.dimension])
        }
    }

    pub struct FailingVectorizer;

    impl Vectorizer for FailingVectorizer {
        fn dimension(&self) -> usize {
            4
        }

        fn transform(&self, _text: &str) -> Result<FeatureVector> {
            bail!("tokenizer exploded")
        }
    }

    /// Returns the same scores for every input.
    pub struct FixedScoreModel {
        pub labels: Vec<String>,
        pub scores: Vec<f64>,
        pub dimension: usize,
    }

    impl FixedScoreModel {
        pub fn new(pairs: &[(&str, f64)], dimension: usize) -> Self {
            Self {
                labels: pairs.iter().map(|(l, _)| l.to_string()).collect(),
                scores: pairs.iter().map(|(_, s)| *s).collect(),
                dimension,
            }
        }
    }

    impl DecisionModel for FixedScoreModel {
        fn class_labels(&self) -> &[String] {
            &self.labels
        }

        fn input_dimension(&self) -> usize {
            self.dimension
        }

        fn decision_scores(&self, _features: &[f64]) -> Result<ScoreVector> {
            Ok(self.scores.clone())
        }
    }
}
