use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Minimum character count for text to be considered a résumé.
pub const MIN_RESUME_CHARS: usize = 100;

/// Minimum number of distinct section keywords a résumé must mention.
pub const MIN_KEYWORD_HITS: usize = 3;

/// Section keywords expected in a résumé. Matched case-insensitively as
/// substrings.
pub const RESUME_KEYWORDS: &[&str] = &[
    "experience",
    "education",
    "skills",
    "projects",
    "summary",
    "objective",
    "certification",
    "employment",
    "work history",
    "internship",
    "achievements",
    "qualifications",
    "profile",
    "references",
    "languages",
];

pub const REASON_TOO_SHORT: &str = "too short";
pub const REASON_MISSING_SECTIONS: &str = "missing résumé sections";
pub const REASON_OK: &str = "looks like a résumé";

/// Outcome of résumé validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub reason: String,
}

impl ValidationVerdict {
    fn valid() -> Self {
        Self {
            is_valid: true,
            reason: REASON_OK.to_string(),
        }
    }

    fn invalid(reason: &str) -> Self {
        Self {
            is_valid: false,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    pub min_chars: usize,
    pub min_keyword_hits: usize,
    pub keywords: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_chars: MIN_RESUME_CHARS,
            min_keyword_hits: MIN_KEYWORD_HITS,
            keywords: RESUME_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Keyword and length heuristics deciding whether text is plausibly a résumé.
#[derive(Debug, Clone)]
pub struct ResumeValidator {
    config: ValidatorConfig,
}

impl Default for ResumeValidator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

impl ResumeValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Keywords a résumé is expected to mention, for user-facing hints.
    pub fn expected_sections(&self) -> &[String] {
        &self.config.keywords
    }

    /// Validates `text`.
    ///
    /// Rule 1: fewer than `min_chars` characters → "too short".
    /// Rule 2: fewer than `min_keyword_hits` distinct keywords → "missing résumé sections".
    pub fn validate(&self, text: &str) -> ValidationVerdict {
        if text.chars().count() < self.config.min_chars {
            return ValidationVerdict::invalid(REASON_TOO_SHORT);
        }

        if self.matched_keywords(text).len() < self.config.min_keyword_hits {
            return ValidationVerdict::invalid(REASON_MISSING_SECTIONS);
        }

        ValidationVerdict::valid()
    }

    /// Distinct keywords present in `text`. Repeats of a keyword count once.
    pub fn matched_keywords(&self, text: &str) -> BTreeSet<&str> {
        let text_lower = text.to_lowercase();
        self.config
            .keywords
            .iter()
            .map(String::as_str)
            .filter(|kw| text_lower.contains(&kw.to_lowercase()))
            .collect()
    }
}
