use std::cmp::Reverse;
use std::time::Instant;

use super::Strategy;
use crate::core::{flips, legal_moves, Board, Move, Player};

/// Takes whichever move flips the most discs right now
pub struct GreedyStrategy;

impl Strategy for GreedyStrategy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn best_move(&mut self, board: &Board, player: Player, _deadline: Instant) -> Option<Move> {
        legal_moves(player, board)
            .into_iter()
            .max_by_key(|&mv| (flips(mv, player, board), Reverse(mv)))
    }
}
