//! Core game representations and rules

pub mod board;
pub mod display;
pub mod moves;
pub mod player;
pub mod rules;

pub use board::Board;
pub use moves::{Move, BOARD_SIZE, DIRECTIONS, SQUARES};
pub use player::{Cell, Player, PlayerArray};
pub use rules::{
    any_legal_move, final_value, flips, initial_board, is_legal, legal_moves, make_move,
    next_player, opponent, score, winner,
};
