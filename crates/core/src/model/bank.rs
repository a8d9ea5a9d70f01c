use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("question {question} has {correct} correct options, expected exactly one")]
    AmbiguousAnswerKey { question: QuestionId, correct: usize },
}

//
// ─── ANSWER KEY POLICY ─────────────────────────────────────────────────────────
//

/// How strictly the "exactly one correct option" rule is enforced at load time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKeyPolicy {
    /// Accept questions with zero or several correct options; scoring only
    /// looks at the flag of the chosen option.
    #[default]
    Permissive,
    /// Reject the whole bank if any question does not have exactly one
    /// correct option.
    Strict,
}

//
// ─── CATEGORY FILTER ───────────────────────────────────────────────────────────
//

/// Restricts selection to one category, or takes the whole bank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => question.category() == Some(name.as_str()),
        }
    }

    /// The category name, or `None` for the whole bank.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Named(name) => Some(name),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    /// Blank input, `all` and `todas` (any case) select the whole bank.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("all")
            || trimmed.eq_ignore_ascii_case("todas")
        {
            Ok(Self::All)
        } else {
            Ok(Self::Named(trimmed.to_string()))
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Named(name) => f.write_str(name),
        }
    }
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

/// Number of questions filed under one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub name: String,
    pub questions: usize,
}

/// The full set of loaded questions. Read-only after construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
    policy: AnswerKeyPolicy,
}

impl QuestionBank {
    /// Build a bank, validating answer keys according to `policy`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::AmbiguousAnswerKey` under `AnswerKeyPolicy::Strict`
    /// when a question does not have exactly one correct option.
    pub fn new(
        questions: Vec<Question>,
        policy: AnswerKeyPolicy,
    ) -> Result<Self, QuestionBankError> {
        if policy == AnswerKeyPolicy::Strict {
            if let Some(q) = questions.iter().find(|q| q.correct_count() != 1) {
                return Err(QuestionBankError::AmbiguousAnswerKey {
                    question: q.id(),
                    correct: q.correct_count(),
                });
            }
        }
        Ok(Self { questions, policy })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn policy(&self) -> AnswerKeyPolicy {
        self.policy
    }

    /// Questions that do not have exactly one correct option.
    pub fn ambiguous_answer_keys(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| q.correct_count() != 1)
    }

    /// Distinct categories, sorted by name, with their question counts.
    #[must_use]
    pub fn categories(&self) -> Vec<CategoryCount> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for category in self.questions.iter().filter_map(Question::category) {
            *counts.entry(category).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(name, questions)| CategoryCount {
                name: name.to_string(),
                questions,
            })
            .collect()
    }

    /// Questions eligible under the given filter, in bank order.
    #[must_use]
    pub fn candidates(&self, filter: &CategoryFilter) -> Vec<&Question> {
        self.questions.iter().filter(|q| filter.matches(q)).collect()
    }
}
