use std::sync::Arc;

use quiz_core::model::{AnswerKeyPolicy, QuestionBank};
use storage::QuestionSource;

use crate::error::BankError;

/// Loads and validates the question bank from a configured source.
#[derive(Clone)]
pub struct QuestionBankService {
    source: Arc<dyn QuestionSource>,
    policy: AnswerKeyPolicy,
}

impl QuestionBankService {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self {
            source,
            policy: AnswerKeyPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: AnswerKeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn policy(&self) -> AnswerKeyPolicy {
        self.policy
    }

    #[must_use]
    pub fn describe_source(&self) -> String {
        self.source.describe()
    }

    /// Fetch the bank once and validate it against the answer-key policy.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Load` if the source cannot be read or decoded.
    /// Returns `BankError::Validation` if the strict policy rejects a question.
    pub async fn load(&self) -> Result<QuestionBank, BankError> {
        let location = self.source.describe();
        let questions = self.source.load_questions().await.map_err(|source| {
            tracing::warn!(%location, error = %source, "question bank load failed");
            BankError::Load {
                location: location.clone(),
                source,
            }
        })?;

        let bank = QuestionBank::new(questions, self.policy)?;
        for question in bank.ambiguous_answer_keys() {
            tracing::warn!(
                question = %question.id(),
                correct = question.correct_count(),
                "question does not have exactly one correct option"
            );
        }
        for question in bank.questions() {
            let blank: Vec<usize> = question.blank_options().collect();
            if !blank.is_empty() {
                tracing::warn!(
                    question = %question.id(),
                    options = ?blank,
                    "question has options with blank text"
                );
            }
        }
        tracing::info!(
            %location,
            questions = bank.len(),
            categories = bank.categories().len(),
            "question bank loaded"
        );
        Ok(bank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiz_core::model::{Question, QuestionBankError, QuestionId, QuizOption};
    use storage::{InMemoryQuestionSource, StorageError};

    struct MissingSource;

    #[async_trait]
    impl QuestionSource for MissingSource {
        async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
            Err(StorageError::NotFound)
        }

        fn describe(&self) -> String {
            "nowhere.json".into()
        }
    }

    fn question(id: u64, correct: [bool; 2]) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            vec![
                QuizOption::new("A", correct[0]),
                QuizOption::new("B", correct[1]),
            ],
            Some("General".into()),
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn loads_bank_from_source() {
        let source = InMemoryQuestionSource::new(vec![question(0, [true, false]), question(1, [false, true])]);
        let bank = QuestionBankService::new(Arc::new(source)).load().await.unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.categories().len(), 1);
    }

    #[tokio::test]
    async fn permissive_policy_accepts_ambiguous_keys() {
        let source = InMemoryQuestionSource::new(vec![question(0, [true, true])]);
        let bank = QuestionBankService::new(Arc::new(source)).load().await.unwrap();
        assert_eq!(bank.ambiguous_answer_keys().count(), 1);
    }

    #[tokio::test]
    async fn strict_policy_rejects_ambiguous_keys() {
        let source = InMemoryQuestionSource::new(vec![question(0, [false, false])]);
        let err = QuestionBankService::new(Arc::new(source))
            .with_policy(AnswerKeyPolicy::Strict)
            .load()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BankError::Validation(QuestionBankError::AmbiguousAnswerKey { correct: 0, .. })
        ));
    }

    #[tokio::test]
    async fn load_failure_names_location() {
        let err = QuestionBankService::new(Arc::new(MissingSource))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(&err, BankError::Load { location, source: StorageError::NotFound } if location == "nowhere.json"));
        assert!(err.to_string().contains("nowhere.json"));
    }
}
