//! Property tests for state encoding and goal masks

use proptest::prelude::*;
use std::collections::HashSet;

use gridworld_rl_core::{GoalMask, GridState, Position, StateIndexer};

proptest! {
    #[test]
    fn indices_are_dense_and_distinct(size in 1_i32..=5, goals in 0_usize..=4) {
        let indexer = StateIndexer::new(size, goals);
        let mut seen = HashSet::new();
        for x in 1..=size {
            for y in 1..=size {
                for bits in 0..(1_u64 << goals) {
                    let state = GridState::new(Position::new(x, y), GoalMask::from_bits(bits, goals).unwrap());
                    let index = indexer.checked_index(&state).unwrap();
                    prop_assert!(index < indexer.len());
                    prop_assert!(seen.insert(index));
                }
            }
        }
        prop_assert_eq!(seen.len(), indexer.len());
    }

    #[test]
    fn out_of_grid_states_are_rejected(size in 1_i32..=5, x in -2_i32..=8, y in -2_i32..=8) {
        let indexer = StateIndexer::new(size, 1);
        let state = GridState::new(Position::new(x, y), GoalMask::empty(1).unwrap());
        let inside = (1..=size).contains(&x) && (1..=size).contains(&y);
        prop_assert_eq!(indexer.checked_index(&state).is_ok(), inside);
    }

    #[test]
    fn collecting_never_clears_a_flag(flags in proptest::collection::vec(any::<bool>(), 1..10), pick in 0_usize..10) {
        let mask = GoalMask::from_flags(&flags).unwrap();
        let index = pick % flags.len();
        let next = mask.with_collected(index);
        prop_assert!(next.is_collected(index));
        prop_assert!(next.collected_count() >= mask.collected_count());
        for i in 0..flags.len() {
            prop_assert!(!mask.is_collected(i) || next.is_collected(i));
        }
        prop_assert_eq!(next.all_collected(), next.collected_count() == flags.len());
    }
}
