use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::model::{AnswerSheet, AttemptId, Question};

use super::progress::{MapEntry, SessionProgress};
use crate::error::SessionError;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    InProgress,
    Completed,
}

/// Result of moving forward from the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved { position: usize },
    Completed,
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

struct Attempt {
    id: AttemptId,
    questions: Vec<Question>,
    answers: AnswerSheet,
    current: usize,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state machine for one quiz attempt.
///
/// Answers are keyed by the option's original index so display shuffling
/// never affects what is recorded. `reset` discards the attempt; a new
/// `start` always creates a fresh one.
#[derive(Default)]
pub struct QuizSession {
    attempt: Option<Attempt>,
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match &self.attempt {
            None => SessionPhase::NotStarted,
            Some(a) if a.completed_at.is_some() => SessionPhase::Completed,
            Some(_) => SessionPhase::InProgress,
        }
    }

    /// Begin a new attempt over `questions`.
    ///
    /// `started_at` should come from the services layer clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` unless the session is `NotStarted`.
    /// Returns `SessionError::Empty` if no questions are provided.
    pub fn start(
        &mut self,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<AttemptId, SessionError> {
        if self.attempt.is_some() {
            return Err(SessionError::AlreadyStarted);
        }
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        let id = AttemptId::generate();
        self.attempt = Some(Attempt {
            id,
            answers: AnswerSheet::new(questions.len()),
            questions,
            current: 0,
            started_at,
            completed_at: None,
        });
        Ok(id)
    }

    /// Record `original_index` as the answer to the current question.
    ///
    /// Re-answering overwrites the previous value. The position does not move.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` outside an active attempt.
    /// Returns `SessionError::InvalidOption` if the index is not an option of
    /// the current question.
    pub fn record_answer(&mut self, original_index: usize) -> Result<(), SessionError> {
        let attempt = self.active_mut()?;
        let options = attempt.questions[attempt.current].options().len();
        if original_index >= options {
            return Err(SessionError::InvalidOption {
                index: original_index,
                options,
            });
        }
        attempt.answers.record(attempt.current, original_index);
        Ok(())
    }

    /// Move to the next question, or complete the attempt from the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` outside an active attempt.
    pub fn advance(&mut self, at: DateTime<Utc>) -> Result<Advance, SessionError> {
        let attempt = self.active_mut()?;
        if attempt.current + 1 >= attempt.questions.len() {
            attempt.completed_at = Some(at);
            return Ok(Advance::Completed);
        }
        attempt.current += 1;
        Ok(Advance::Moved {
            position: attempt.current,
        })
    }

    /// Step back one question. Returns false (and does nothing) at the first
    /// question or outside an active attempt.
    pub fn retreat(&mut self) -> bool {
        match self.active_mut() {
            Ok(attempt) if attempt.current > 0 => {
                attempt.current -= 1;
                true
            }
            _ => false,
        }
    }

    /// Jump directly to `position`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` outside an active attempt.
    /// Returns `SessionError::OutOfRange` if `position` is past the last
    /// question; the current position is left unchanged.
    pub fn jump_to(&mut self, position: usize) -> Result<(), SessionError> {
        let attempt = self.active_mut()?;
        let len = attempt.questions.len();
        if position >= len {
            return Err(SessionError::OutOfRange { position, len });
        }
        attempt.current = position;
        Ok(())
    }

    /// Discard the attempt and return to `NotStarted`.
    pub fn reset(&mut self) {
        self.attempt = None;
    }

    #[must_use]
    pub fn attempt_id(&self) -> Option<AttemptId> {
        self.attempt.as_ref().map(|a| a.id)
    }

    #[must_use]
    pub fn current_position(&self) -> Option<usize> {
        self.attempt.as_ref().map(|a| a.current)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.attempt.as_ref().map(|a| &a.questions[a.current])
    }

    /// Recorded answer (original option index) at `position`.
    #[must_use]
    pub fn answer_at(&self, position: usize) -> Option<usize> {
        self.attempt.as_ref().and_then(|a| a.answers.get(position))
    }

    #[must_use]
    pub fn answers(&self) -> Option<&AnswerSheet> {
        self.attempt.as_ref().map(|a| &a.answers)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        self.attempt
            .as_ref()
            .map(|a| a.questions.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions().len()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.attempt.as_ref().map(|a| a.started_at)
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.attempt.as_ref().and_then(|a| a.completed_at)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase() == SessionPhase::Completed
    }

    /// True when the current question is the last one of the attempt.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.attempt
            .as_ref()
            .is_some_and(|a| a.current + 1 == a.questions.len())
    }

    #[must_use]
    pub fn can_retreat(&self) -> bool {
        self.phase() == SessionPhase::InProgress && self.current_position().is_some_and(|p| p > 0)
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.total_questions();
        let answered = self.answers().map_or(0, AnswerSheet::answered_count);
        SessionProgress {
            total,
            answered,
            unanswered: total - answered,
            position: self.current_position().unwrap_or(0),
            is_complete: self.is_complete(),
        }
    }

    /// Per-question entries for the jump-to map.
    #[must_use]
    pub fn question_map(&self) -> Vec<MapEntry> {
        let Some(attempt) = &self.attempt else {
            return Vec::new();
        };
        (0..attempt.questions.len())
            .map(|position| MapEntry {
                position,
                answered: attempt.answers.is_answered(position),
                current: position == attempt.current,
            })
            .collect()
    }

    fn active_mut(&mut self) -> Result<&mut Attempt, SessionError> {
        match self.attempt.as_mut() {
            Some(attempt) if attempt.completed_at.is_none() => Ok(attempt),
            _ => Err(SessionError::NotInProgress),
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.phase())
            .field("attempt_id", &self.attempt_id())
            .field("questions_len", &self.total_questions())
            .field("current", &self.current_position())
            .field("started_at", &self.started_at())
            .field("completed_at", &self.completed_at())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionId, QuizOption};
    use quiz_core::time::fixed_now;

    fn build_question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            vec![
                QuizOption::new("A", false),
                QuizOption::new("B", true),
                QuizOption::new("C", false),
            ],
            None,
            None,
        )
        .unwrap()
    }

    fn started(len: u64) -> QuizSession {
        let mut session = QuizSession::new();
        session
            .start((0..len).map(build_question).collect(), fixed_now())
            .unwrap();
        session
    }

    #[test]
    fn start_initializes_attempt() {
        let session = started(3);
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.current_position(), Some(0));
        assert_eq!(session.answers().unwrap().len(), 3);
        assert_eq!(session.progress().answered, 0);
        assert_eq!(session.started_at(), Some(fixed_now()));
    }

    #[test]
    fn empty_start_leaves_session_untouched() {
        let mut session = QuizSession::new();
        let err = session.start(Vec::new(), fixed_now()).unwrap_err();
        assert_eq!(err, SessionError::Empty);
        assert_eq!(session.phase(), SessionPhase::NotStarted);
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut session = started(2);
        let err = session.start(vec![build_question(9)], fixed_now()).unwrap_err();
        assert_eq!(err, SessionError::AlreadyStarted);
        assert_eq!(session.total_questions(), 2);
    }

    #[test]
    fn record_answer_is_queryable_and_overwrites() {
        let mut session = started(2);
        session.record_answer(2).unwrap();
        assert_eq!(session.answer_at(0), Some(2));
        session.record_answer(1).unwrap();
        assert_eq!(session.answer_at(0), Some(1));
        assert_eq!(session.progress().answered, 1);
        assert_eq!(session.current_position(), Some(0));
    }

    #[test]
    fn record_answer_rejects_unknown_option() {
        let mut session = started(1);
        let err = session.record_answer(3).unwrap_err();
        assert_eq!(err, SessionError::InvalidOption { index: 3, options: 3 });
        assert_eq!(session.answer_at(0), None);
    }

    #[test]
    fn advance_reaches_last_then_completes() {
        let mut session = started(3);
        assert_eq!(session.advance(fixed_now()), Ok(Advance::Moved { position: 1 }));
        assert_eq!(session.advance(fixed_now()), Ok(Advance::Moved { position: 2 }));
        assert!(session.is_last());
        assert_eq!(session.phase(), SessionPhase::InProgress);

        assert_eq!(session.advance(fixed_now()), Ok(Advance::Completed));
        assert!(session.is_complete());
        assert_eq!(session.completed_at(), Some(fixed_now()));
        assert_eq!(session.advance(fixed_now()), Err(SessionError::NotInProgress));
        assert_eq!(session.record_answer(0), Err(SessionError::NotInProgress));
    }

    #[test]
    fn retreat_is_noop_at_first_question() {
        let mut session = started(2);
        assert!(!session.can_retreat());
        assert!(!session.retreat());
        assert_eq!(session.current_position(), Some(0));

        session.advance(fixed_now()).unwrap();
        assert!(session.retreat());
        assert_eq!(session.current_position(), Some(0));
    }

    #[test]
    fn jump_out_of_range_keeps_position() {
        let mut session = started(4);
        session.jump_to(2).unwrap();
        let err = session.jump_to(4).unwrap_err();
        assert_eq!(err, SessionError::OutOfRange { position: 4, len: 4 });
        assert_eq!(session.current_position(), Some(2));
    }

    #[test]
    fn question_map_marks_answered_and_current() {
        let mut session = started(3);
        session.record_answer(0).unwrap();
        session.jump_to(2).unwrap();

        let map = session.question_map();
        assert_eq!(map.len(), 3);
        assert!(map[0].answered && !map[0].current);
        assert!(!map[1].answered && !map[1].current);
        assert!(!map[2].answered && map[2].current);
    }

    #[test]
    fn reset_discards_attempt() {
        let mut session = started(2);
        let first = session.attempt_id().unwrap();
        session.record_answer(1).unwrap();
        session.advance(fixed_now()).unwrap();
        session.advance(fixed_now()).unwrap();

        session.reset();
        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert!(session.answers().is_none());
        assert!(session.question_map().is_empty());

        let second = session.start(vec![build_question(5)], fixed_now()).unwrap();
        assert_ne!(first, second);
        assert_eq!(session.answer_at(0), None);
    }
}
