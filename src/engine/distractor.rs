use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

/// Default number of wrong answers shown next to the correct one.
pub const DEFAULT_DISTRACTOR_COUNT: usize = 3;

/// Answer options for one question, already shuffled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceSet {
    pub choices: Vec<String>,
    pub requested_distractors: usize,
}

impl ChoiceSet {
    /// True when both pools together could not supply every requested
    /// distractor. Not an error; the question simply has fewer options.
    pub fn is_short(&self) -> bool {
        self.choices.len() < self.requested_distractors + 1
    }
}

/// Distinct values of `values` in first-seen order, skipping `correct` and
/// anything in `taken`.
fn distinct_candidates<'a>(
    values: &[&'a str],
    correct: &str,
    taken: &HashSet<&'a str>,
) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values
        .iter()
        .copied()
        .filter(|v| *v != correct && !taken.contains(v) && seen.insert(*v))
        .collect()
}

/// Builds a choice set holding `correct` exactly once plus up to `k`
/// distinct distractors.
///
/// Distractors come from `pool` first. If `pool` has fewer than `k` distinct
/// values besides `correct`, the shortfall is topped up from `fallback`.
/// When both run dry the set is returned smaller than `k + 1`.
pub fn generate<R: Rng + ?Sized>(
    correct: &str,
    pool: &[&str],
    fallback: &[&str],
    k: usize,
    rng: &mut R,
) -> ChoiceSet {
    let mut chosen: Vec<&str> = Vec::with_capacity(k + 1);

    if k > 0 {
        let primary = distinct_candidates(pool, correct, &HashSet::new());
        if primary.len() >= k {
            chosen.extend(primary.choose_multiple(rng, k).copied());
        } else {
            chosen.extend(primary);
            let taken: HashSet<&str> = chosen.iter().copied().collect();
            let secondary = distinct_candidates(fallback, correct, &taken);
            let need = k - chosen.len();
            chosen.extend(secondary.choose_multiple(rng, need).copied());
        }
    }

    if chosen.len() < k {
        tracing::debug!(
            "only {} of {k} distractors available for '{correct}'",
            chosen.len()
        );
    }

    chosen.push(correct);
    chosen.shuffle(rng);

    ChoiceSet {
        choices: chosen.into_iter().map(str::to_string).collect(),
        requested_distractors: k,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn count_of(set: &ChoiceSet, value: &str) -> usize {
        set.choices.iter().filter(|c| *c == value).count()
    }

    fn assert_distinct(set: &ChoiceSet) {
        let unique: HashSet<&String> = set.choices.iter().collect();
        assert_eq!(unique.len(), set.choices.len(), "duplicate in {:?}", set.choices);
    }

    #[test]
    fn full_pool_yields_k_plus_one_choices() {
        let mut rng = SmallRng::seed_from_u64(42);
        let pool = ["猫", "犬", "卵", "本", "木", "川"];
        let set = generate("猫", &pool, &[], 3, &mut rng);
        assert_eq!(set.choices.len(), 4);
        assert_eq!(count_of(&set, "猫"), 1);
        assert!(!set.is_short());
        assert_distinct(&set);
    }

    #[test]
    fn duplicate_and_correct_values_in_pool_collapse() {
        let mut rng = SmallRng::seed_from_u64(7);
        let pool = ["猫", "猫", "犬", "犬", "犬"];
        let set = generate("猫", &pool, &[], 3, &mut rng);
        assert_eq!(set.choices.len(), 2);
        assert_eq!(count_of(&set, "猫"), 1);
        assert_eq!(count_of(&set, "犬"), 1);
        assert!(set.is_short());
    }

    #[test]
    fn pool_of_only_correct_value_is_singleton() {
        let mut rng = SmallRng::seed_from_u64(1);
        let set = generate("猫", &["猫", "猫"], &[], 3, &mut rng);
        assert_eq!(set.choices, vec!["猫".to_string()]);
    }

    #[test]
    fn zero_distractors_is_singleton() {
        let mut rng = SmallRng::seed_from_u64(1);
        let set = generate("猫", &["犬", "卵"], &["本"], 0, &mut rng);
        assert_eq!(set.choices, vec!["猫".to_string()]);
        assert!(!set.is_short());
    }

    #[test]
    fn fallback_tops_up_without_repeating_pool_values() {
        let mut rng = SmallRng::seed_from_u64(3);
        let pool = ["猫", "犬"];
        let fallback = ["犬", "猫", "卵", "本"];
        let set = generate("猫", &pool, &fallback, 3, &mut rng);
        assert_eq!(set.choices.len(), 4);
        assert_eq!(count_of(&set, "犬"), 1);
        assert!(set.choices.contains(&"卵".to_string()));
        assert!(set.choices.contains(&"本".to_string()));
        assert_distinct(&set);
    }

    #[test]
    fn thin_fallback_returns_smaller_set() {
        let mut rng = SmallRng::seed_from_u64(3);
        let set = generate("猫", &["犬"], &["犬", "卵"], 5, &mut rng);
        assert_eq!(set.choices.len(), 3);
        assert!(set.is_short());
        assert_distinct(&set);
    }

    #[test]
    fn correct_answer_position_varies() {
        let pool = ["a", "b", "c", "d", "e"];
        let mut positions = HashSet::new();
        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let set = generate("a", &pool, &[], 3, &mut rng);
            positions.insert(set.choices.iter().position(|c| c == "a").unwrap());
        }
        assert!(positions.len() > 1);
    }

    #[test]
    fn same_seed_same_choices() {
        let pool = ["a", "b", "c", "d", "e", "f"];
        let first = generate("a", &pool, &[], 3, &mut SmallRng::seed_from_u64(99));
        let second = generate("a", &pool, &[], 3, &mut SmallRng::seed_from_u64(99));
        assert_eq!(first, second);
    }
}
