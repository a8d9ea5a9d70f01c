use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question must have at least one option")]
    NoOptions,
}

//
// ─── OPTION ────────────────────────────────────────────────────────────────────
//

/// A single answer choice of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    text: String,
    correct: bool,
}

impl QuizOption {
    #[must_use]
    pub fn new(text: impl Into<String>, correct: bool) -> Self {
        Self {
            text: text.into(),
            correct,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.correct
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question as loaded from the bank.
///
/// Questions are immutable once built. Options keep their original order;
/// any shuffling for display happens outside and refers back to positions here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<QuizOption>,
    category: Option<String>,
    rationale: Option<String>,
}

impl Question {
    /// Build a validated question.
    ///
    /// Blank category and rationale values are normalized to `None`. Option
    /// texts are kept as given, blank ones included.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the prompt is blank.
    /// Returns `QuestionError::NoOptions` if no options are given.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<QuizOption>,
        category: Option<String>,
        rationale: Option<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }

        Ok(Self {
            id,
            text,
            options,
            category: normalize_optional(category),
            rationale: normalize_optional(rationale),
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    /// Option at its original (unshuffled) index.
    #[must_use]
    pub fn option(&self, original_index: usize) -> Option<&QuizOption> {
        self.options.get(original_index)
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn rationale(&self) -> Option<&str> {
        self.rationale.as_deref()
    }

    /// Number of options flagged as correct.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.options.iter().filter(|o| o.correct).count()
    }

    /// Positions of options whose text is blank.
    pub fn blank_options(&self) -> impl Iterator<Item = usize> + '_ {
        self.options
            .iter()
            .enumerate()
            .filter(|(_, o)| o.text.trim().is_empty())
            .map(|(index, _)| index)
    }

    /// First option flagged as correct, if any.
    #[must_use]
    pub fn correct_option(&self) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.correct)
    }

    /// True when the option at `original_index` exists and is flagged correct.
    #[must_use]
    pub fn is_correct_choice(&self, original_index: usize) -> bool {
        self.option(original_index).is_some_and(QuizOption::is_correct)
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<QuizOption> {
        vec![QuizOption::new("A", false), QuizOption::new("B", true)]
    }

    #[test]
    fn rejects_blank_text() {
        let err = Question::new(QuestionId::new(0), "  ", options(), None, None).unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn rejects_missing_options() {
        let err = Question::new(QuestionId::new(0), "Q", Vec::new(), None, None).unwrap_err();
        assert_eq!(err, QuestionError::NoOptions);
    }

    #[test]
    fn keeps_blank_option_text() {
        let opts = vec![QuizOption::new("A", true), QuizOption::new(" ", false)];
        let q = Question::new(QuestionId::new(0), "Q", opts, None, None).unwrap();
        assert_eq!(q.options()[1].text(), " ");
        assert_eq!(q.blank_options().collect::<Vec<_>>(), vec![1]);
        assert_eq!(q.correct_count(), 1);
    }

    #[test]
    fn normalizes_blank_category_and_rationale() {
        let q = Question::new(
            QuestionId::new(3),
            "Q",
            options(),
            Some(" ".into()),
            Some(" Art. 5 ".into()),
        )
        .unwrap();
        assert_eq!(q.category(), None);
        assert_eq!(q.rationale(), Some("Art. 5"));
    }

    #[test]
    fn correct_choice_is_positional() {
        let opts = vec![
            QuizOption::new("same", false),
            QuizOption::new("same", true),
        ];
        let q = Question::new(QuestionId::new(0), "Q", opts, None, None).unwrap();
        assert!(!q.is_correct_choice(0));
        assert!(q.is_correct_choice(1));
        assert!(!q.is_correct_choice(2));
        assert_eq!(q.correct_count(), 1);
    }
}
