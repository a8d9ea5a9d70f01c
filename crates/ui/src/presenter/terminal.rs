use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use quiz_core::model::CategoryFilter;
use quiz_core::scoring::ScoreReport;
use services::{AdvanceOutcome, QuestionView, QuizError, QuizLoopService, parse_count};

use super::command::{Command, HELP};
use crate::error::{PresenterError, user_message};
use crate::vm::{BankSummaryVm, ExamVm, ResultsVm, format_clock, format_ideal_minutes};

/// Values chosen up front (e.g. on the command line) for the first attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamRequest {
    pub count: Option<usize>,
    pub category: Option<CategoryFilter>,
}

enum Flow {
    Finished(ScoreReport),
    Restart,
    Quit,
}

/// Line-oriented presenter driving a `QuizLoopService`.
///
/// Reads commands from any async buffered reader and writes screens to a
/// plain writer, so tests can feed a byte script and inspect a `Vec<u8>`.
pub struct TerminalPresenter<R, W> {
    service: QuizLoopService,
    input: R,
    output: W,
    request: ExamRequest,
    last_view: Option<QuestionView>,
}

impl<R, W> TerminalPresenter<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    #[must_use]
    pub fn new(service: QuizLoopService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
            request: ExamRequest::default(),
            last_view: None,
        }
    }

    #[must_use]
    pub fn with_request(mut self, request: ExamRequest) -> Self {
        self.request = request;
        self
    }

    #[must_use]
    pub fn service(&self) -> &QuizLoopService {
        &self.service
    }

    pub fn into_parts(self) -> (QuizLoopService, W) {
        (self.service, self.output)
    }

    /// Load the bank and run attempts until the user quits or input ends.
    ///
    /// A failed bank load is reported on the output and ends the run normally.
    ///
    /// # Errors
    ///
    /// Returns `PresenterError::Io` if reading input or writing output fails.
    pub async fn run(&mut self) -> Result<(), PresenterError> {
        if let Err(err) = self.service.load_bank().await {
            self.report_error(&err)?;
            return Ok(());
        }

        loop {
            if !self.start_screen().await? {
                return Ok(());
            }
            let flow = match self.exam_screen().await? {
                Flow::Finished(report) => self.results_screen(&report).await?,
                other => other,
            };
            match flow {
                Flow::Quit | Flow::Finished(_) => return Ok(()),
                Flow::Restart => {
                    self.last_view = None;
                    if let Err(err) = self.service.restart().await {
                        self.report_error(&err)?;
                        return Ok(());
                    }
                    writeln!(self.output, "\nExam restarted.")?;
                }
            }
        }
    }

    // ─── Screens ───────────────────────────────────────────────────────────

    async fn start_screen(&mut self) -> Result<bool, PresenterError> {
        let Some(bank) = self.service.bank() else {
            return Ok(false);
        };
        let summary = BankSummaryVm::from(bank);
        writeln!(self.output, "{}", summary.total_line)?;
        let has_categories = !summary.categories.is_empty();
        if has_categories {
            writeln!(self.output, "Categories: all, {}", summary.categories.join(", "))?;
        }

        let mut preset = std::mem::take(&mut self.request);
        loop {
            let count = match preset.count.take() {
                Some(count) => count,
                None => {
                    let Some(line) = self.prompt("How many questions? ").await? else {
                        return Ok(false);
                    };
                    match parse_count(&line) {
                        Ok(count) => count,
                        Err(err) => {
                            self.report_error(&QuizError::from(err))?;
                            continue;
                        }
                    }
                }
            };

            let category = match preset.category.take() {
                Some(category) => category,
                None if has_categories => {
                    let Some(line) = self.prompt("Category [all]: ").await? else {
                        return Ok(false);
                    };
                    let Ok(category) = line.parse::<CategoryFilter>();
                    category
                }
                None => CategoryFilter::All,
            };

            match self.service.start_exam(count, &category) {
                Ok(start) => {
                    writeln!(
                        self.output,
                        "Ideal time: {}. Type h for help.",
                        format_ideal_minutes(start.ideal_secs)
                    )?;
                    return Ok(true);
                }
                Err(err) => self.report_error(&err)?,
            }
        }
    }

    async fn exam_screen(&mut self) -> Result<Flow, PresenterError> {
        let mut redraw = true;
        loop {
            if redraw {
                self.render_question()?;
            }
            redraw = true;

            let Some(line) = self.exam_prompt().await? else {
                return Ok(Flow::Quit);
            };
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(err) => {
                    writeln!(self.output, "{err}")?;
                    redraw = false;
                    continue;
                }
            };
            tracing::debug!(?command, "presenter command");

            match command {
                Command::Answer(slot) => {
                    let Some(view) = &self.last_view else {
                        continue;
                    };
                    if let Err(err) = self.service.answer_display_slot(view, slot) {
                        self.report_error(&err)?;
                        redraw = false;
                    }
                }
                Command::Next => match self.service.next() {
                    Ok(AdvanceOutcome::Continue { .. }) => {}
                    Ok(AdvanceOutcome::Completed(report)) => return Ok(Flow::Finished(report)),
                    Err(err) => self.report_error(&err)?,
                },
                Command::Previous => {
                    if !self.service.previous() {
                        writeln!(self.output, "Already at the first question.")?;
                        redraw = false;
                    }
                }
                Command::Jump(position) => {
                    if let Err(err) = self.service.jump_to(position) {
                        self.report_error(&err)?;
                        redraw = false;
                    }
                }
                Command::Restart => return Ok(Flow::Restart),
                Command::Quit => return Ok(Flow::Quit),
                Command::Help => {
                    writeln!(self.output, "{HELP}")?;
                    redraw = false;
                }
                Command::Redraw => {}
            }
        }
    }

    async fn results_screen(&mut self, report: &ScoreReport) -> Result<Flow, PresenterError> {
        let vm = ResultsVm::from(report);
        writeln!(self.output, "\nResult: {}", vm.score_line)?;
        writeln!(self.output, "{}", vm.time_spent)?;
        writeln!(self.output, "{}", vm.ideal_time)?;
        writeln!(self.output, "{}\n", vm.verdict_line)?;
        for item in &vm.reviews {
            let mark = if item.is_correct { "[ok]" } else { "[x]" };
            writeln!(self.output, "{mark} {}", item.heading)?;
            writeln!(self.output, "     Your answer: {}", item.your_answer)?;
            writeln!(self.output, "     Correct answer: {}", item.correct_answer)?;
            if let Some(rationale) = &item.rationale {
                writeln!(self.output, "     Rationale: {rationale}")?;
            }
        }

        loop {
            let Some(line) = self.prompt("\nr to restart, q to quit: ").await? else {
                return Ok(Flow::Quit);
            };
            match line.parse::<Command>() {
                Ok(Command::Restart) => return Ok(Flow::Restart),
                Ok(Command::Quit) => return Ok(Flow::Quit),
                _ => {}
            }
        }
    }

    fn render_question(&mut self) -> Result<(), PresenterError> {
        let Some(view) = self.service.current_view() else {
            return Ok(());
        };
        let vm = ExamVm::new(
            &view,
            &self.service.question_map(),
            self.service.elapsed_seconds(),
        );

        writeln!(self.output, "\n{}  [{}]", vm.counter, vm.timer)?;
        writeln!(self.output, "{}", vm.question)?;
        for option in &vm.options {
            let mark = if option.selected { '>' } else { ' ' };
            writeln!(self.output, " {mark} {}) {}", option.slot, option.text)?;
        }
        writeln!(self.output, "Map: {}", vm.map)?;
        let back = if vm.can_go_back { "p previous, " } else { "" };
        writeln!(self.output, "n {}, {back}g <k> go to, q quit", vm.next_label)?;

        self.last_view = Some(view);
        Ok(())
    }

    // ─── IO ────────────────────────────────────────────────────────────────

    async fn prompt(&mut self, label: &str) -> Result<Option<String>, PresenterError> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end().to_string()))
    }

    /// Exam prompt carrying the elapsed clock.
    ///
    /// While waiting for input the prompt line is redrawn in place on every
    /// timer tick. Pending input always wins over a tick.
    async fn exam_prompt(&mut self) -> Result<Option<String>, PresenterError> {
        let mut ticks = self.service.timer_updates();
        let elapsed = *ticks.borrow_and_update();
        write!(self.output, "{}", clock_prompt(elapsed))?;
        self.output.flush()?;

        let mut line = String::new();
        let read = {
            let mut read = std::pin::pin!(self.input.read_line(&mut line));
            loop {
                tokio::select! {
                    biased;
                    bytes = &mut read => break bytes?,
                    Ok(()) = ticks.changed() => {
                        let elapsed = *ticks.borrow_and_update();
                        write!(self.output, "\r{}", clock_prompt(elapsed))?;
                        self.output.flush()?;
                    }
                }
            }
        };

        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end().to_string()))
    }

    fn report_error(&mut self, err: &QuizError) -> Result<(), PresenterError> {
        writeln!(self.output, "{}", user_message(err))?;
        Ok(())
    }
}

fn clock_prompt(elapsed_secs: u64) -> String {
    format!("[{}] > ", format_clock(elapsed_secs))
}
