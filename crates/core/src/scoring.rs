use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AnswerSheet, Question, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoringPolicyError {
    #[error("seconds per question must be > 0")]
    InvalidSecondsPerQuestion,
}

//
// ─── POLICY ────────────────────────────────────────────────────────────────────
//

/// Default time budget per question (1.5 minutes).
pub const DEFAULT_SECONDS_PER_QUESTION: u32 = 90;

/// Default width of the on-pace band around the ideal time, in seconds.
pub const DEFAULT_TOLERANCE_SECS: u32 = 60;

/// Time budget used to produce the pacing verdict.
///
/// # Examples
///
/// ```
/// # use quiz_core::scoring::ScoringPolicy;
/// let policy = ScoringPolicy::new(60, 30).unwrap();
/// assert_eq!(policy.ideal_secs(10), 600);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    seconds_per_question: u32,
    tolerance_secs: u32,
}

impl ScoringPolicy {
    /// # Errors
    ///
    /// Returns `ScoringPolicyError::InvalidSecondsPerQuestion` if the budget is zero.
    pub fn new(seconds_per_question: u32, tolerance_secs: u32) -> Result<Self, ScoringPolicyError> {
        if seconds_per_question == 0 {
            return Err(ScoringPolicyError::InvalidSecondsPerQuestion);
        }
        Ok(Self {
            seconds_per_question,
            tolerance_secs,
        })
    }

    #[must_use]
    pub fn seconds_per_question(&self) -> u32 {
        self.seconds_per_question
    }

    #[must_use]
    pub fn tolerance_secs(&self) -> u32 {
        self.tolerance_secs
    }

    /// Ideal total time for `question_count` questions.
    #[must_use]
    pub fn ideal_secs(&self, question_count: usize) -> u64 {
        u64::try_from(question_count)
            .unwrap_or(u64::MAX)
            .saturating_mul(u64::from(self.seconds_per_question))
    }

    /// Classify a signed difference between elapsed and ideal time.
    ///
    /// A delta exactly on the tolerance boundary counts as on pace.
    #[must_use]
    pub fn verdict(&self, delta_secs: i64) -> TimeVerdict {
        let tolerance = i64::from(self.tolerance_secs);
        if delta_secs > tolerance {
            TimeVerdict::Slow
        } else if delta_secs < -tolerance {
            TimeVerdict::Fast
        } else {
            TimeVerdict::OnPace
        }
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            seconds_per_question: DEFAULT_SECONDS_PER_QUESTION,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }
}

//
// ─── REPORT ────────────────────────────────────────────────────────────────────
//

/// Pacing of a finished attempt relative to the ideal time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeVerdict {
    Fast,
    OnPace,
    Slow,
}

impl TimeVerdict {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TimeVerdict::Fast => "fast",
            TimeVerdict::OnPace => "on-pace",
            TimeVerdict::Slow => "slow",
        }
    }
}

/// What the user picked for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChosenAnswer {
    Unanswered,
    Chosen { original_index: usize, text: String },
}

/// Review line for one question of the attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionReview {
    pub position: usize,
    pub question_id: QuestionId,
    pub question_text: String,
    pub chosen: ChosenAnswer,
    /// Text of the first option flagged correct; `None` when the question
    /// has no correct option defined.
    pub correct_text: Option<String>,
    pub is_correct: bool,
    pub rationale: Option<String>,
}

/// Result of scoring a completed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub correct_count: usize,
    pub total_count: usize,
    pub percentage: u32,
    pub elapsed_secs: u64,
    pub ideal_secs: u64,
    /// `elapsed_secs - ideal_secs`; negative when faster than ideal.
    pub time_delta_secs: i64,
    pub verdict: TimeVerdict,
    pub reviews: Vec<QuestionReview>,
}

//
// ─── SCORER ────────────────────────────────────────────────────────────────────
//

/// Computes the final score of an attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    policy: ScoringPolicy,
}

impl Scorer {
    #[must_use]
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    /// Score `questions` against `answers`.
    ///
    /// Unanswered positions and answers pointing at options that are not
    /// flagged correct count as wrong. Extra slots beyond `questions` are ignored.
    #[must_use]
    pub fn score(&self, questions: &[Question], answers: &AnswerSheet, elapsed_secs: u64) -> ScoreReport {
        let reviews: Vec<QuestionReview> = questions
            .iter()
            .enumerate()
            .map(|(position, question)| review_question(position, question, answers.get(position)))
            .collect();

        let correct_count = reviews.iter().filter(|r| r.is_correct).count();
        let total_count = questions.len();
        let ideal_secs = self.policy.ideal_secs(total_count);
        let time_delta_secs = signed_delta(elapsed_secs, ideal_secs);

        ScoreReport {
            correct_count,
            total_count,
            percentage: rounded_percentage(correct_count, total_count),
            elapsed_secs,
            ideal_secs,
            time_delta_secs,
            verdict: self.policy.verdict(time_delta_secs),
            reviews,
        }
    }
}

fn review_question(position: usize, question: &Question, answer: Option<usize>) -> QuestionReview {
    let chosen = answer
        .and_then(|idx| question.option(idx).map(|opt| (idx, opt)))
        .map_or(ChosenAnswer::Unanswered, |(original_index, opt)| {
            ChosenAnswer::Chosen {
                original_index,
                text: opt.text().to_string(),
            }
        });

    QuestionReview {
        position,
        question_id: question.id(),
        question_text: question.text().to_string(),
        chosen,
        correct_text: question.correct_option().map(|o| o.text().to_string()),
        is_correct: answer.is_some_and(|idx| question.is_correct_choice(idx)),
        rationale: question.rationale().map(str::to_string),
    }
}

/// `round(correct / total * 100)` with halves rounded up, in integer math.
fn rounded_percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = correct as u128;
    let total = total as u128;
    u32::try_from((correct * 200 + total) / (total * 2)).unwrap_or(100)
}

fn signed_delta(elapsed: u64, ideal: u64) -> i64 {
    let elapsed = i128::from(elapsed);
    let ideal = i128::from(ideal);
    i64::try_from(elapsed - ideal).unwrap_or(if elapsed > ideal { i64::MAX } else { i64::MIN })
}
