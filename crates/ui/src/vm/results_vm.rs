use quiz_core::scoring::{ChosenAnswer, QuestionReview, ScoreReport, TimeVerdict};

use crate::vm::time_fmt::format_duration;

pub const UNANSWERED: &str = "(unanswered)";
pub const NOT_DEFINED: &str = "(not defined)";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewItemVm {
    pub heading: String,
    pub your_answer: String,
    pub correct_answer: String,
    pub rationale: Option<String>,
    pub is_correct: bool,
}

impl From<&QuestionReview> for ReviewItemVm {
    fn from(review: &QuestionReview) -> Self {
        let your_answer = match &review.chosen {
            ChosenAnswer::Unanswered => UNANSWERED.to_string(),
            ChosenAnswer::Chosen { text, .. } => text.clone(),
        };
        Self {
            heading: format!("Question {}: {}", review.position + 1, review.question_text),
            your_answer,
            correct_answer: review
                .correct_text
                .clone()
                .unwrap_or_else(|| NOT_DEFINED.to_string()),
            rationale: review.rationale.clone(),
            is_correct: review.is_correct,
        }
    }
}

/// Final screen of an attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub score_line: String,
    pub time_spent: String,
    pub ideal_time: String,
    pub verdict_line: String,
    pub reviews: Vec<ReviewItemVm>,
}

impl From<&ScoreReport> for ResultsVm {
    fn from(report: &ScoreReport) -> Self {
        Self {
            score_line: format!(
                "{}/{} ({}%)",
                report.correct_count, report.total_count, report.percentage
            ),
            time_spent: format!("Time spent: {}", format_duration(report.elapsed_secs)),
            ideal_time: format!("Ideal time: {}", format_duration(report.ideal_secs)),
            verdict_line: verdict_line(report.verdict, report.time_delta_secs),
            reviews: report.reviews.iter().map(ReviewItemVm::from).collect(),
        }
    }
}

fn verdict_line(verdict: TimeVerdict, delta_secs: i64) -> String {
    let magnitude = format_duration(delta_secs.unsigned_abs());
    match verdict {
        TimeVerdict::Slow => format!("+{magnitude} (slow)"),
        TimeVerdict::Fast => format!("-{magnitude} (fast)"),
        TimeVerdict::OnPace => "Excellent time!".to_string(),
    }
}
