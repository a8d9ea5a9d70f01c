use quiz_core::model::{Question, QuestionId};

use super::shuffle::ShuffledOption;

/// Presentation-agnostic render data for the current question.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings beyond the question's own text
/// - slots are 1-based display positions for this render only
///
/// Display order changes on every render; answers must always be recorded
/// through `original_index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub question_id: QuestionId,
    pub position: usize,
    pub total: usize,
    pub text: String,
    pub category: Option<String>,
    pub options: Vec<OptionView>,
    pub is_first: bool,
    pub is_last: bool,
}

/// One option as displayed in a `QuestionView`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub slot: usize,
    pub original_index: usize,
    pub text: String,
    pub selected: bool,
}

impl QuestionView {
    #[must_use]
    pub(crate) fn build(
        position: usize,
        total: usize,
        question: &Question,
        shuffled: &[ShuffledOption<'_>],
        selected: Option<usize>,
    ) -> Self {
        let options = shuffled
            .iter()
            .enumerate()
            .map(|(i, entry)| OptionView {
                slot: i + 1,
                original_index: entry.original_index,
                text: entry.option.text().to_string(),
                selected: selected == Some(entry.original_index),
            })
            .collect();

        Self {
            question_id: question.id(),
            position,
            total,
            text: question.text().to_string(),
            category: question.category().map(str::to_string),
            options,
            is_first: position == 0,
            is_last: position + 1 == total,
        }
    }

    /// Map a 1-based display slot back to the option's original index.
    #[must_use]
    pub fn original_index_for_slot(&self, slot: usize) -> Option<usize> {
        self.options
            .iter()
            .find(|o| o.slot == slot)
            .map(|o| o.original_index)
    }
}
