//! Property-based tests for the search engine.

use kinrow_core::State;
use kinrow_mcts::{
    Decision, FirstTieBreak, LinearExpansion, Mcts, NodeId, RandomRollout, SearchBudget,
    SearchConfig, Tree, Ucb1,
};
use kinrow_mnk::MnkState;
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

// =============================================================================
// Strategies
// =============================================================================

/// A non-terminal tic-tac-toe position reached by random play.
fn arb_position() -> impl Strategy<Value = MnkState> {
    (0usize..8, any::<u64>()).prop_filter_map("terminal position", |(moves, seed)| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut state = MnkState::tic_tac_toe();
        for _ in 0..moves {
            if state.is_terminal() {
                break;
            }
            let actions = state.actions();
            let action = actions[rng.gen_range(0..actions.len())];
            state.apply(&action).unwrap();
        }
        (!state.is_terminal()).then_some(state)
    })
}

fn create_mcts(state: &MnkState, seed: u64) -> Mcts<MnkState> {
    let player = state.current_player();
    Mcts::new(
        Ucb1::seeded(seed).with_utility_indices(vec![player]),
        LinearExpansion,
        RandomRollout::seeded(seed),
    )
    .with_utility_indices(vec![player])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Root visits equal iterations times simulations per iteration.
    #[test]
    fn prop_visit_conservation(
        state in arb_position(),
        iterations in 1u64..120,
        sims in 1u32..4,
        seed in any::<u64>(),
    ) {
        let mut mcts = create_mcts(&state, seed);
        let mut tree = Tree::new(state);
        let budget = SearchBudget {
            max_iterations: iterations,
            max_time: Duration::from_secs(60),
            sims_per_iter: sims,
        };
        let done = mcts
            .run_iterations(&mut tree, budget, None, &mut FirstTieBreak, &AtomicBool::new(false), |_| {})
            .unwrap();

        prop_assert_eq!(done, iterations);
        prop_assert_eq!(tree.root().visits() as u64, iterations * sims as u64);
    }

    /// Every node is reachable from the single root, listed once by its
    /// parent, and accumulates zero-sum utility.
    #[test]
    fn prop_tree_structure(state in arb_position(), seed in any::<u64>()) {
        let mut mcts = create_mcts(&state, seed);
        let mut tree = Tree::new(state);
        for _ in 0..150 {
            mcts.iterate(&mut tree, 1).unwrap();
        }

        let mut seen_root = 0;
        let mut stack = vec![NodeId::ROOT];
        let mut reachable = 0;
        while let Some(id) = stack.pop() {
            reachable += 1;
            let node = tree.get(id);
            match node.parent() {
                None => seen_root += 1,
                Some(parent) => {
                    let listed = tree
                        .get(parent)
                        .children()
                        .iter()
                        .filter(|(_, child)| *child == id)
                        .count();
                    prop_assert_eq!(listed, 1);
                }
            }
            if let Some(utility) = node.utility() {
                prop_assert!(utility.total().abs() < 1e-9);
            }
            stack.extend(node.children().iter().map(|(_, child)| *child));
        }

        prop_assert_eq!(seen_root, 1);
        prop_assert_eq!(reachable, tree.len());
    }

    /// The returned action is legal, and replaying the seed reproduces it.
    #[test]
    fn prop_search_deterministic_and_legal(
        state in arb_position(),
        iterations in 2u64..200,
        seed in any::<u64>(),
    ) {
        let config = SearchConfig::with_iterations(iterations)
            .with_max_time(Duration::from_secs(60))
            .seeded(seed);

        let first = create_mcts(&state, seed).search(&state, &config).unwrap();
        let second = create_mcts(&state, seed).search(&state, &config).unwrap();

        prop_assert_eq!(&first.decision, &second.decision);
        prop_assert!(matches!(first.decision, Decision::Best(_)));
        prop_assert!(state.actions().contains(first.action()));
    }
}
