use serde::{Deserialize, Serialize};

/// Recorded answers for one attempt, one slot per selected question.
///
/// A slot holds the chosen option's original (pre-shuffle) index, or `None`
/// while unanswered. Bounds against the question's options are checked by
/// the session before recording.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnswerSheet {
    slots: Vec<Option<usize>>,
}

impl AnswerSheet {
    /// All-unanswered sheet with `len` slots.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Answer recorded at `position`. `None` when unanswered or out of range.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<usize> {
        self.slots.get(position).copied().flatten()
    }

    #[must_use]
    pub fn is_answered(&self, position: usize) -> bool {
        self.get(position).is_some()
    }

    /// Overwrite the slot at `position`. Returns false if `position` is out of range.
    pub fn record(&mut self, position: usize, original_index: usize) -> bool {
        match self.slots.get_mut(position) {
            Some(slot) => {
                *slot = Some(original_index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    #[must_use]
    pub fn slots(&self) -> &[Option<usize>] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unanswered() {
        let sheet = AnswerSheet::new(3);
        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet.answered_count(), 0);
        assert_eq!(sheet.get(0), None);
    }

    #[test]
    fn record_overwrites_previous_value() {
        let mut sheet = AnswerSheet::new(2);
        assert!(sheet.record(1, 0));
        assert!(sheet.record(1, 3));
        assert_eq!(sheet.get(1), Some(3));
        assert_eq!(sheet.answered_count(), 1);
    }

    #[test]
    fn record_out_of_range_is_rejected() {
        let mut sheet = AnswerSheet::new(1);
        assert!(!sheet.record(1, 0));
        assert_eq!(sheet.answered_count(), 0);
    }
}
