use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

use quiz_core::Clock;
use quiz_core::model::{AnswerKeyPolicy, AttemptId, CategoryFilter, QuestionBank};
use quiz_core::scoring::{ScoreReport, Scorer, ScoringPolicy};
use storage::QuestionSource;

use super::progress::{MapEntry, SessionProgress};
use super::selector::Selector;
use super::service::{Advance, QuizSession, SessionPhase};
use super::shuffle::shuffle_options;
use super::timer::SessionTimer;
use super::view::QuestionView;
use crate::bank_service::QuestionBankService;
use crate::error::{QuizError, SessionError};

/// Result of starting an exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamStart {
    pub attempt_id: AttemptId,
    pub total: usize,
    pub ideal_secs: u64,
}

/// Result of moving forward in an exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Continue { position: usize },
    Completed(ScoreReport),
}

/// Owns everything one quiz run needs: bank, attempt, timer, scorer and RNG.
///
/// The presenter drives it through navigation and answer events and asks for
/// a fresh `QuestionView` after each one.
pub struct QuizLoopService {
    clock: Clock,
    banks: QuestionBankService,
    bank: Option<QuestionBank>,
    session: QuizSession,
    timer: SessionTimer,
    scorer: Scorer,
    rng: StdRng,
    report: Option<ScoreReport>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, source: Arc<dyn QuestionSource>) -> Self {
        Self {
            clock,
            banks: QuestionBankService::new(source),
            bank: None,
            session: QuizSession::new(),
            timer: SessionTimer::new(clock),
            scorer: Scorer::default(),
            rng: StdRng::from_os_rng(),
            report: None,
        }
    }

    #[must_use]
    pub fn with_answer_key_policy(mut self, policy: AnswerKeyPolicy) -> Self {
        self.banks = self.banks.with_policy(policy);
        self
    }

    #[must_use]
    pub fn with_scoring_policy(mut self, policy: ScoringPolicy) -> Self {
        self.scorer = Scorer::new(policy);
        self
    }

    /// Use a deterministic RNG for selection and shuffling.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ─── Bank ──────────────────────────────────────────────────────────────

    /// Load the bank from the configured source.
    ///
    /// On failure the previous bank is dropped, so `start_exam` reports
    /// `QuizError::BankUnavailable` until a later load succeeds.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Bank` if the source fails or validation rejects the bank.
    pub async fn load_bank(&mut self) -> Result<&QuestionBank, QuizError> {
        self.bank = None;
        let bank = self.banks.load().await?;
        Ok(self.bank.insert(bank))
    }

    #[must_use]
    pub fn bank(&self) -> Option<&QuestionBank> {
        self.bank.as_ref()
    }

    #[must_use]
    pub fn scoring_policy(&self) -> ScoringPolicy {
        self.scorer.policy()
    }

    #[must_use]
    pub fn ideal_secs_for(&self, count: usize) -> u64 {
        self.scorer.policy().ideal_secs(count)
    }

    // ─── Exam lifecycle ────────────────────────────────────────────────────

    /// Select questions and start the attempt and its timer.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::BankUnavailable` if no bank is loaded,
    /// `QuizError::Selection` for invalid counts or pools, and
    /// `QuizError::Session` if an attempt is already running. The session
    /// is left untouched on every error.
    pub fn start_exam(
        &mut self,
        count: usize,
        category: &CategoryFilter,
    ) -> Result<ExamStart, QuizError> {
        let now = self.clock.now();
        self.start_exam_at(count, category, now)
    }

    /// Same as `start_exam`, with an explicit start instant.
    ///
    /// # Errors
    ///
    /// See `start_exam`.
    pub fn start_exam_at(
        &mut self,
        count: usize,
        category: &CategoryFilter,
        now: DateTime<Utc>,
    ) -> Result<ExamStart, QuizError> {
        let bank = self.bank.as_ref().ok_or(QuizError::BankUnavailable)?;
        if self.session.phase() != SessionPhase::NotStarted {
            return Err(SessionError::AlreadyStarted.into());
        }

        let questions = Selector::new(bank)
            .with_category(category.clone())
            .select(&mut self.rng, count)?;
        let total = questions.len();
        let attempt_id = self.session.start(questions, now)?;
        self.timer.start_at(now);
        self.report = None;

        let ideal_secs = self.ideal_secs_for(total);
        tracing::info!(%attempt_id, total, %category, ideal_secs, "exam started");
        Ok(ExamStart {
            attempt_id,
            total,
            ideal_secs,
        })
    }

    /// Discard the attempt and timer, then reload the bank.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Bank` if the reload fails; the session is reset
    /// regardless.
    pub async fn restart(&mut self) -> Result<(), QuizError> {
        if let Some(attempt_id) = self.session.attempt_id() {
            tracing::info!(%attempt_id, "attempt discarded");
        }
        self.session.reset();
        self.timer.reset();
        self.report = None;
        self.load_bank().await?;
        Ok(())
    }

    // ─── Rendering ─────────────────────────────────────────────────────────

    /// Render data for the current question with a fresh option order.
    ///
    /// Returns `None` unless an attempt is in progress.
    pub fn current_view(&mut self) -> Option<QuestionView> {
        if self.session.phase() != SessionPhase::InProgress {
            return None;
        }
        let position = self.session.current_position()?;
        let question = self.session.current_question()?;
        let shuffled = shuffle_options(&mut self.rng, question.options());
        Some(QuestionView::build(
            position,
            self.session.total_questions(),
            question,
            &shuffled,
            self.session.answer_at(position),
        ))
    }

    #[must_use]
    pub fn question_map(&self) -> Vec<MapEntry> {
        self.session.question_map()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.session.progress()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.timer.elapsed_seconds()
    }

    /// Receiver for per-second elapsed updates while the exam runs.
    #[must_use]
    pub fn timer_updates(&self) -> watch::Receiver<u64> {
        self.timer.subscribe()
    }

    /// Score of the completed attempt, if any.
    #[must_use]
    pub fn report(&self) -> Option<&ScoreReport> {
        self.report.as_ref()
    }

    // ─── Answering & navigation ────────────────────────────────────────────

    /// Record the option with `original_index` for the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` if no attempt is running or the index is invalid.
    pub fn answer(&mut self, original_index: usize) -> Result<(), QuizError> {
        self.session.record_answer(original_index)?;
        tracing::debug!(
            position = self.session.current_position(),
            original_index,
            "answer recorded"
        );
        Ok(())
    }

    /// Record the option shown at 1-based `slot` of `view`.
    ///
    /// Returns the original index that was recorded.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOption` (wrapped) if `slot` is not on screen,
    /// or any error from `answer`.
    pub fn answer_display_slot(
        &mut self,
        view: &QuestionView,
        slot: usize,
    ) -> Result<usize, QuizError> {
        let original_index =
            view.original_index_for_slot(slot)
                .ok_or(SessionError::InvalidOption {
                    index: slot,
                    options: view.options.len(),
                })?;
        self.answer(original_index)?;
        Ok(original_index)
    }

    /// Move forward, completing and scoring the attempt from the last question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` if no attempt is in progress.
    pub fn next(&mut self) -> Result<AdvanceOutcome, QuizError> {
        let now = self.clock.now();
        self.next_at(now)
    }

    /// Same as `next`, with an explicit instant for completion.
    ///
    /// # Errors
    ///
    /// See `next`.
    pub fn next_at(&mut self, now: DateTime<Utc>) -> Result<AdvanceOutcome, QuizError> {
        match self.session.advance(now)? {
            Advance::Moved { position } => {
                tracing::debug!(position, "moved to next question");
                Ok(AdvanceOutcome::Continue { position })
            }
            Advance::Completed => {
                let elapsed = self.timer.stop_at(now);
                let answers = self.session.answers().ok_or(SessionError::NotInProgress)?;
                let report = self.scorer.score(self.session.questions(), answers, elapsed);
                tracing::info!(
                    attempt_id = ?self.session.attempt_id(),
                    correct = report.correct_count,
                    total = report.total_count,
                    percentage = report.percentage,
                    elapsed_secs = report.elapsed_secs,
                    verdict = report.verdict.as_str(),
                    "exam completed"
                );
                self.report = Some(report.clone());
                Ok(AdvanceOutcome::Completed(report))
            }
        }
    }

    /// Step back one question; returns whether the position moved.
    pub fn previous(&mut self) -> bool {
        let moved = self.session.retreat();
        if moved {
            tracing::debug!(position = self.session.current_position(), "moved to previous question");
        }
        moved
    }

    /// Jump to `position` (0-based).
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` if no attempt is in progress or the
    /// position is out of range.
    pub fn jump_to(&mut self, position: usize) -> Result<(), QuizError> {
        self.session.jump_to(position)?;
        tracing::debug!(position, "jumped to question");
        Ok(())
    }
}

impl fmt::Debug for QuizLoopService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizLoopService")
            .field("clock", &self.clock)
            .field("source", &self.banks.describe_source())
            .field("bank_len", &self.bank.as_ref().map(QuestionBank::len))
            .field("session", &self.session)
            .field("timer", &self.timer)
            .field("scorer", &self.scorer)
            .finish_non_exhaustive()
    }
}
