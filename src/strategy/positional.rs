use lazy_static::lazy_static;
use std::time::Instant;

use super::Strategy;
use crate::core::{any_legal_move, legal_moves, make_move, score, Board, Cell, Move, Player, BOARD_SIZE};

const MAX_DEPTH: u32 = 60;
const WIN: i32 = 1_000_000;
const INF: i32 = 10 * WIN;

lazy_static! {
    /// Classic square weights: corners good, squares next to corners bad
    static ref WEIGHTS: [i32; BOARD_SIZE] = {
        let quadrant = [
            [120, -20, 20, 5],
            [-20, -40, -5, -5],
            [20, -5, 15, 3],
            [5, -5, 3, 3],
        ];
        let mut weights = [0; BOARD_SIZE];
        for row in 1..=8i32 {
            for col in 1..=8i32 {
                let r = if row <= 4 { row - 1 } else { 8 - row };
                let c = if col <= 4 { col - 1 } else { 8 - col };
                weights[(row * 10 + col) as usize] = quadrant[r as usize][c as usize];
            }
        }
        weights
    };
}

fn evaluate(player: Player, board: &Board) -> i32 {
    board
        .cells()
        .iter()
        .zip(WEIGHTS.iter())
        .map(|(&cell, &weight)| match cell.player() {
            Some(p) if p == player => weight,
            Some(_) => -weight,
            None => 0,
        })
        .sum()
}

/// Iterative-deepening alpha-beta search over a square-weight evaluation
#[derive(Default)]
pub struct PositionalStrategy {
    nodes: u64,
}

impl PositionalStrategy {
    /// Negamax value of `board` for `player`, or `None` once the deadline passes
    fn negamax(
        &mut self,
        board: &Board,
        player: Player,
        depth: u32,
        mut alpha: i32,
        beta: i32,
        deadline: Instant,
    ) -> Option<i32> {
        self.nodes += 1;
        if Instant::now() >= deadline {
            return None;
        }

        let moves = legal_moves(player, board);
        if moves.is_empty() {
            if !any_legal_move(player.opponent(), board) {
                return Some(score(player, board).signum() * WIN + score(player, board));
            }
            if depth == 0 {
                return Some(evaluate(player, board));
            }
            return self
                .negamax(board, player.opponent(), depth - 1, -beta, -alpha, deadline)
                .map(|v| -v);
        }

        if depth == 0 {
            return Some(evaluate(player, board));
        }

        let mut best = -INF;
        for mv in moves {
            let next = make_move(mv, player, board);
            let value = -self.negamax(&next, player.opponent(), depth - 1, -beta, -alpha, deadline)?;
            best = best.max(value);
            alpha = alpha.max(value);
            if alpha >= beta {
                break;
            }
        }

        Some(best)
    }

    fn search_root(&mut self, board: &Board, player: Player, depth: u32, deadline: Instant) -> Option<Move> {
        let mut best = None;
        let mut alpha = -INF;

        for mv in legal_moves(player, board) {
            let next = make_move(mv, player, board);
            let value = -self.negamax(&next, player.opponent(), depth - 1, -INF, -alpha, deadline)?;
            if best.is_none() || value > alpha {
                alpha = value;
                best = Some(mv);
            }
        }

        best
    }
}

impl Strategy for PositionalStrategy {
    fn name(&self) -> &'static str {
        "positional"
    }

    fn best_move(&mut self, board: &Board, player: Player, deadline: Instant) -> Option<Move> {
        let mut best = legal_moves(player, board).first().copied()?;
        let empties = board.count(Cell::Empty) as u32;
        self.nodes = 0;

        for depth in 1..=MAX_DEPTH.min(empties) {
            match self.search_root(board, player, depth, deadline) {
                Some(mv) => best = mv,
                None => break,
            }
        }

        tracing::debug!(nodes = self.nodes, mv = %best, "positional search finished");
        Some(best)
    }
}
