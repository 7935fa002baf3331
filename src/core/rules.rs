//! Othello rules as pure functions over board values

use std::cmp::Ordering;

use super::board::Board;
use super::moves::{Move, DIRECTIONS, SQUARES};
use super::player::{Cell, Player};

/// The standard starting position
pub fn initial_board() -> Board {
    Board::empty()
        .with(Move(44), Cell::White)
        .with(Move(45), Cell::Black)
        .with(Move(54), Cell::Black)
        .with(Move(55), Cell::White)
}

/// Square of `player`'s disc closing a run of opponent discs that starts
/// next to `mv` in direction `dir`
fn find_bracket(mv: Move, player: Player, board: &Board, dir: i32) -> Option<Move> {
    let opponent = player.opponent().cell();
    let mut square = Move(mv.0 + dir);

    if board.get(square) != opponent {
        return None;
    }
    while board.get(square) == opponent {
        square = Move(square.0 + dir);
    }

    (board.get(square) == player.cell()).then_some(square)
}

pub fn is_legal(mv: Move, player: Player, board: &Board) -> bool {
    mv.is_playable()
        && board.get(mv) == Cell::Empty
        && DIRECTIONS
            .iter()
            .any(|&dir| find_bracket(mv, player, board, dir).is_some())
}

/// Apply a move, flipping every bracketed run.
///
/// The move must be legal; nothing is validated here.
pub fn make_move(mv: Move, player: Player, board: &Board) -> Board {
    let mut next = *board;
    next.set(mv, player.cell());

    for &dir in DIRECTIONS.iter() {
        if let Some(bracket) = find_bracket(mv, player, board, dir) {
            let mut square = Move(mv.0 + dir);
            while square != bracket {
                next.set(square, player.cell());
                square = Move(square.0 + dir);
            }
        }
    }

    next
}

/// Number of discs `mv` would flip for `player`
pub fn flips(mv: Move, player: Player, board: &Board) -> usize {
    if !mv.is_playable() || board.get(mv) != Cell::Empty {
        return 0;
    }

    DIRECTIONS
        .iter()
        .filter_map(|&dir| find_bracket(mv, player, board, dir).map(|b| (dir, b)))
        .map(|(dir, bracket)| ((bracket.0 - mv.0) / dir - 1) as usize)
        .sum()
}

pub fn legal_moves(player: Player, board: &Board) -> Vec<Move> {
    SQUARES
        .iter()
        .copied()
        .filter(|&mv| is_legal(mv, player, board))
        .collect()
}

pub fn any_legal_move(player: Player, board: &Board) -> bool {
    SQUARES.iter().any(|&mv| is_legal(mv, player, board))
}

/// Who moves after `prev` has moved: the opponent if they can, else `prev`
/// again if they can, else nobody (game over)
pub fn next_player(board: &Board, prev: Player) -> Option<Player> {
    let opponent = prev.opponent();
    if any_legal_move(opponent, board) {
        Some(opponent)
    } else if any_legal_move(prev, board) {
        Some(prev)
    } else {
        None
    }
}

pub fn opponent(player: Player) -> Player {
    player.opponent()
}

/// Disc difference from `player`'s point of view
pub fn score(player: Player, board: &Board) -> i32 {
    board.discs(player) as i32 - board.discs(player.opponent()) as i32
}

/// Result of a finished game from `player`'s point of view
pub fn final_value(player: Player, board: &Board) -> Ordering {
    score(player, board).cmp(&0)
}

/// Winner by disc count; `Cell::Empty` for a draw
pub fn winner(board: &Board) -> Cell {
    match final_value(Player::Black, board) {
        Ordering::Greater => Cell::Black,
        Ordering::Less => Cell::White,
        Ordering::Equal => Cell::Empty,
    }
}
