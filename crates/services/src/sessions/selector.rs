use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{CategoryFilter, Question, QuestionBank};

use crate::error::SelectionError;

/// Draw `count` distinct elements uniformly at random without replacement.
///
/// Shuffles an index permutation (Fisher–Yates) and keeps the first `count`
/// entries, so `pool` itself is never reordered.
///
/// # Errors
///
/// Returns `SelectionError::InvalidCount` if `count` is zero.
/// Returns `SelectionError::InsufficientPool` if `count` exceeds the pool size.
pub fn sample_without_replacement<T, R>(
    rng: &mut R,
    pool: &[T],
    count: usize,
) -> Result<Vec<T>, SelectionError>
where
    T: Clone,
    R: Rng + ?Sized,
{
    if count == 0 {
        return Err(SelectionError::InvalidCount);
    }
    if count > pool.len() {
        return Err(SelectionError::InsufficientPool {
            requested: count,
            available: pool.len(),
            category: None,
        });
    }

    let mut indices: Vec<usize> = (0..pool.len()).collect();
    indices.shuffle(rng);
    indices.truncate(count);
    Ok(indices.into_iter().map(|i| pool[i].clone()).collect())
}

/// Parse a user-entered question count.
///
/// # Errors
///
/// Returns `SelectionError::InvalidCount` unless `raw` is a positive integer.
pub fn parse_count(raw: &str) -> Result<usize, SelectionError> {
    match raw.trim().parse::<usize>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(SelectionError::InvalidCount),
    }
}

/// Picks the questions of a new attempt from a bank, optionally within one category.
pub struct Selector<'a> {
    bank: &'a QuestionBank,
    category: CategoryFilter,
}

impl<'a> Selector<'a> {
    #[must_use]
    pub fn new(bank: &'a QuestionBank) -> Self {
        Self {
            bank,
            category: CategoryFilter::All,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    /// Select `count` random questions from the filtered pool.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::InvalidCount` for a zero count,
    /// `SelectionError::EmptyCategory` if the category has no questions, and
    /// `SelectionError::InsufficientPool` if the pool is smaller than `count`.
    pub fn select<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
    ) -> Result<Vec<Question>, SelectionError> {
        if count == 0 {
            return Err(SelectionError::InvalidCount);
        }

        let pool = self.bank.candidates(&self.category);
        if pool.is_empty() {
            if let CategoryFilter::Named(name) = &self.category {
                return Err(SelectionError::EmptyCategory {
                    category: name.clone(),
                });
            }
        }

        let picked = sample_without_replacement(rng, &pool, count).map_err(|err| match err {
            SelectionError::InsufficientPool {
                requested,
                available,
                ..
            } => SelectionError::InsufficientPool {
                requested,
                available,
                category: self.category.name().map(str::to_string),
            },
            other => other,
        })?;

        Ok(picked.into_iter().cloned().collect())
    }
}
