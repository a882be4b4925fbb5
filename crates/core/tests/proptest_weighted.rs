//! Property tests for weighted draws and item amounts
//!
//! These tests validate that weighted bags only ever draw live entries,
//! that their odds string describes exactly what was added, and that
//! item builders keep amounts inside the stack limits.

use proptest::prelude::*;
use yggdrasil_core::{ItemCreator, Material, WeightedRandomBag, MAX_STACK_SIZE};

fn bag_of(entries: &[(u16, f64)], seed: u64) -> WeightedRandomBag<u16> {
    let mut bag = WeightedRandomBag::seeded(seed);
    for &(value, weight) in entries {
        bag.add(weight, value);
    }
    bag
}

fn live(entries: &[(u16, f64)]) -> Vec<(u16, f64)> {
    entries
        .iter()
        .copied()
        .filter(|(_, weight)| *weight > 0.0)
        .collect()
}

proptest! {
    /// Property: Draws only return values added with a positive weight
    #[test]
    fn draws_only_return_live_entries(
        entries in prop::collection::vec((any::<u16>(), -5.0f64..10.0), 0..40),
        seed in any::<u64>(),
    ) {
        let live = live(&entries);
        let mut bag = bag_of(&entries, seed);
        prop_assert_eq!(bag.len(), live.len());
        prop_assert_eq!(bag.is_empty(), live.is_empty());

        for _ in 0..25 {
            match bag.pick().copied() {
                Some(value) => prop_assert!(live.iter().any(|(v, _)| *v == value)),
                None => prop_assert!(live.is_empty()),
            }
        }
    }

    /// Property: Filtered draws respect the filter
    #[test]
    fn filtered_draws_respect_the_filter(
        entries in prop::collection::vec((any::<u16>(), 0.1f64..10.0), 0..40),
        seed in any::<u64>(),
    ) {
        let mut bag = bag_of(&entries, seed);
        let any_even = entries.iter().any(|(value, _)| value % 2 == 0);
        for _ in 0..25 {
            match bag.pick_matching(|_, value| value % 2 == 0).copied() {
                Some(value) => prop_assert_eq!(value % 2, 0),
                None => prop_assert!(!any_even),
            }
        }
    }

    /// Property: Chances of all entries add up to one
    #[test]
    fn chances_sum_to_one(
        entries in prop::collection::vec((any::<u16>(), 0.1f64..10.0), 1..40),
    ) {
        let bag = bag_of(&entries, 0);
        let sum: f64 = (0..bag.len()).filter_map(|index| bag.chance_of(index)).sum();
        prop_assert!((sum - 1.0).abs() < 1e-9);
        prop_assert!(bag.chance_of(bag.len()).is_none());
    }

    /// Property: The raw odds string lists every live entry with its weight
    #[test]
    fn raw_odds_describe_the_bag(
        entries in prop::collection::vec((any::<u16>(), -2.0f64..10.0), 0..30),
    ) {
        let bag = bag_of(&entries, 0);
        let odds = bag.to_raw_odds();

        let mut parsed: Vec<(u16, f64)> = Vec::new();
        if !odds.is_empty() {
            for pair in odds.split(',') {
                let (value, weight) = pair.rsplit_once(':').expect("value:weight pair");
                parsed.push((
                    value.parse().expect("value parses"),
                    weight.parse().expect("weight parses"),
                ));
            }
        }

        let mut expected = live(&entries);
        let order = |a: &(u16, f64), b: &(u16, f64)| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1));
        parsed.sort_by(order);
        expected.sort_by(order);
        prop_assert_eq!(parsed, expected);
    }

    /// Property: Built items always hold a legal amount
    #[test]
    fn built_amounts_stay_in_stack_limits(amount in any::<u8>()) {
        let stack = ItemCreator::of(Material::STONE).amount(amount).make();
        prop_assert!((1..=MAX_STACK_SIZE).contains(&stack.amount));
        if (1..=MAX_STACK_SIZE).contains(&amount) {
            prop_assert_eq!(stack.amount, amount);
        }
    }
}
