use quiz_core::model::QuestionBank;
use services::{MapEntry, QuestionView};

use crate::vm::time_fmt::format_clock;

/// Start screen: bank size and the categories a user can pick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BankSummaryVm {
    pub total_line: String,
    pub categories: Vec<String>,
}

impl From<&QuestionBank> for BankSummaryVm {
    fn from(bank: &QuestionBank) -> Self {
        Self {
            total_line: format!("There are {} questions available in the bank.", bank.len()),
            categories: bank
                .categories()
                .into_iter()
                .map(|c| format!("{} ({})", c.name, c.questions))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionLineVm {
    pub slot: usize,
    pub text: String,
    pub selected: bool,
}

/// One question screen, ready to print.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExamVm {
    pub counter: String,
    pub timer: String,
    pub question: String,
    pub options: Vec<OptionLineVm>,
    pub map: String,
    pub next_label: &'static str,
    pub can_go_back: bool,
}

impl ExamVm {
    #[must_use]
    pub fn new(view: &QuestionView, map: &[MapEntry], elapsed_secs: u64) -> Self {
        Self {
            counter: format!("Question {} of {}", view.position + 1, view.total),
            timer: format_clock(elapsed_secs),
            question: view.text.clone(),
            options: view
                .options
                .iter()
                .map(|o| OptionLineVm {
                    slot: o.slot,
                    text: o.text.clone(),
                    selected: o.selected,
                })
                .collect(),
            map: format_map(map),
            next_label: if view.is_last { "finish" } else { "next" },
            can_go_back: !view.is_first,
        }
    }
}

/// Render the jump map as `[1*] [2x] [3 ]`: `*` current, `x` answered.
#[must_use]
pub fn format_map(map: &[MapEntry]) -> String {
    map.iter()
        .map(|entry| {
            let mark = if entry.current {
                '*'
            } else if entry.answered {
                'x'
            } else {
                ' '
            };
            format!("[{}{}]", entry.position + 1, mark)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
