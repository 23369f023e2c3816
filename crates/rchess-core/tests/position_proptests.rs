//! Randomized playouts: do/undo restores everything, the hash is a pure
//! function of the position, and generated moves are legal.

use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rchess_core::position::zobrist;
use rchess_core::{Color, Position};

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_random_playout_undoes_cleanly(seed in any::<u64>(), plies in 1usize..60) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut pos = Position::startpos();
        let mut stack = Vec::new();

        for _ in 0..plies {
            let moves = pos.generate_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.random_range(0..moves.len())];
            let before = pos.clone();
            pos.do_move(&mv);

            // Never leaves the mover in check
            prop_assert!(!pos.is_in_check(!pos.side_to_move()));
            prop_assert_eq!(pos.hash(), zobrist::hash(&pos));
            // FEN is a faithful encoding
            prop_assert_eq!(&Position::from_fen(&pos.to_fen()).unwrap(), &pos);

            stack.push((mv, before));
        }

        while let Some((mv, before)) = stack.pop() {
            pos.undo_move(&mv);
            prop_assert_eq!(&pos, &before);
            prop_assert_eq!(pos.hash(), before.hash());
        }
        prop_assert_eq!(pos, Position::startpos());
    }

    #[test]
    fn prop_side_to_move_alternates(seed in any::<u64>()) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut pos = Position::startpos();
        let mut expected = Color::White;
        for _ in 0..20 {
            prop_assert_eq!(pos.side_to_move(), expected);
            let moves = pos.generate_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.random_range(0..moves.len())];
            pos.do_move(&mv);
            expected = !expected;
        }
    }
}
