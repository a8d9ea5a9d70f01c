use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::QuizOption;

/// One option in display order, tagged with its position in the original list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShuffledOption<'a> {
    pub option: &'a QuizOption,
    pub original_index: usize,
}

/// Produce a fresh Fisher–Yates permutation of `options`.
///
/// Identity is carried by `original_index`, never by option text, so
/// duplicated texts still map back to the right slot. Every call reshuffles.
pub fn shuffle_options<'a, R: Rng + ?Sized>(
    rng: &mut R,
    options: &'a [QuizOption],
) -> Vec<ShuffledOption<'a>> {
    let mut order: Vec<usize> = (0..options.len()).collect();
    order.shuffle(rng);
    order
        .into_iter()
        .map(|original_index| ShuffledOption {
            option: &options[original_index],
            original_index,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn build_options(texts: &[&str]) -> Vec<QuizOption> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| QuizOption::new(*t, i == 0))
            .collect()
    }

    #[test]
    fn duplicate_texts_keep_positional_identity() {
        let options = build_options(&["same", "same", "other"]);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..20 {
            let shuffled = shuffle_options(&mut rng, &options);
            for entry in &shuffled {
                assert!(std::ptr::eq(entry.option, &options[entry.original_index]));
            }
            let correct: Vec<_> = shuffled
                .iter()
                .filter(|s| s.option.is_correct())
                .map(|s| s.original_index)
                .collect();
            assert_eq!(correct, vec![0]);
        }
    }

    #[test]
    fn reshuffles_between_calls() {
        // Display order is not stable across renders of the same question.
        let options = build_options(&["a", "b", "c", "d", "e", "f"]);
        let mut rng = StdRng::seed_from_u64(5);
        let orders: std::collections::HashSet<Vec<usize>> = (0..10)
            .map(|_| {
                shuffle_options(&mut rng, &options)
                    .iter()
                    .map(|s| s.original_index)
                    .collect()
            })
            .collect();
        assert!(orders.len() > 1);
    }

    #[test]
    fn every_position_reachable_for_first_slot() {
        let options = build_options(&["a", "b", "c", "d"]);
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen = [0_usize; 4];
        for _ in 0..4_000 {
            let first = shuffle_options(&mut rng, &options)[0].original_index;
            seen[first] += 1;
        }
        for count in seen {
            assert!((800..1_200).contains(&count), "first-slot counts {seen:?}");
        }
    }

    proptest! {
        #[test]
        fn shuffle_is_a_permutation(len in 1_usize..12, seed in any::<u64>()) {
            let texts: Vec<String> = (0..len).map(|i| format!("opt {i}")).collect();
            let options: Vec<QuizOption> =
                texts.iter().map(|t| QuizOption::new(t.as_str(), false)).collect();
            let mut rng = StdRng::seed_from_u64(seed);

            let shuffled = shuffle_options(&mut rng, &options);
            prop_assert_eq!(shuffled.len(), options.len());

            let mut indices: Vec<usize> = shuffled.iter().map(|s| s.original_index).collect();
            indices.sort_unstable();
            prop_assert_eq!(indices, (0..len).collect::<Vec<_>>());

            for entry in &shuffled {
                prop_assert_eq!(entry.option, &options[entry.original_index]);
            }
        }
    }
}
