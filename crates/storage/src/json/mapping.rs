use quiz_core::model::{Question, QuestionId, QuizOption};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

/// Serialized shape of one question in a bank file.
///
/// Field aliases accept the Spanish keys used by existing banks
/// (`categoria`, `sustento`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub text: String,
    pub options: Vec<OptionRecord>,
    #[serde(default, alias = "categoria", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        alias = "sustento",
        alias = "explanation",
        skip_serializing_if = "Option::is_none"
    )]
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRecord {
    pub text: String,
    #[serde(default)]
    pub correct: bool,
}

impl QuestionRecord {
    /// Convert the record into a domain `Question` identified by `index`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidRecord` if the question fails validation.
    pub fn into_question(self, index: usize) -> Result<Question, StorageError> {
        let options = self
            .options
            .into_iter()
            .map(|o| QuizOption::new(o.text, o.correct))
            .collect();
        let id = QuestionId::new(u64::try_from(index).unwrap_or(u64::MAX));
        Question::new(id, self.text, options, self.category, self.rationale)
            .map_err(|source| StorageError::InvalidRecord { index, source })
    }
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Decode a JSON array of question records into domain questions.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON and
/// `StorageError::InvalidRecord` for the first record that fails validation.
pub fn parse_questions(json: &str) -> Result<Vec<Question>, StorageError> {
    let records: Vec<QuestionRecord> = serde_json::from_str(json).map_err(ser)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.into_question(index))
        .collect()
}
