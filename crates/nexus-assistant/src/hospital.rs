//! Canned hospital FAQ lookup.

use std::path::Path;

use nexus_models::QaPair;
use tracing::debug;

use crate::error::{AssistantError, Result};

/// Environment variable naming a JSON file of question/answer pairs.
pub const HOSPITAL_DATA_ENV: &str = "NEXUS_HOSPITAL_DATA";

/// Answer given when nothing matches.
pub const UNKNOWN_ANSWER: &str = "Sorry, I don't have an answer for that question.";

/// Characters of a stored question used for partial matching.
const PREFIX_CHARS: usize = 10;

const BUILTIN_DATA: &str = include_str!("../data/hospital_qa.json");

/// A fixed set of hospital questions and answers.
#[derive(Debug, Clone, Default)]
pub struct HospitalKnowledge {
    pairs: Vec<QaPair>,
}

impl HospitalKnowledge {
    pub fn new(pairs: Vec<QaPair>) -> Self {
        Self { pairs }
    }

    /// The dataset bundled with the crate.
    pub fn builtin() -> Self {
        // The bundled file is checked by a unit test.
        Self::new(serde_json::from_str(BUILTIN_DATA).unwrap_or_default())
    }

    /// Load a JSON array of `{question, answer}` objects.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| AssistantError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let pairs: Vec<QaPair> =
            serde_json::from_str(&content).map_err(|source| AssistantError::InvalidData {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), count = pairs.len(), "hospital data loaded");
        Ok(Self::new(pairs))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Look up an answer.
    ///
    /// An exact case-insensitive match wins; otherwise the first record whose
    /// leading characters appear in the question.
    pub fn find_answer(&self, question: &str) -> &str {
        let question = question.trim().to_lowercase();

        if let Some(pair) = self
            .pairs
            .iter()
            .find(|qa| qa.question.to_lowercase() == question)
        {
            return &pair.answer;
        }

        self.pairs
            .iter()
            .find(|qa| {
                let prefix: String = qa.question.to_lowercase().chars().take(PREFIX_CHARS).collect();
                !prefix.is_empty() && question.contains(&prefix)
            })
            .map(|qa| qa.answer.as_str())
            .unwrap_or(UNKNOWN_ANSWER)
    }
}
