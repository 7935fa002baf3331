//! Events a game session reports to the outside world

use serde::{Deserialize, Serialize};

use crate::core::board::board_or_empty;
use crate::core::{Board, Cell};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// New position. `tomove` is `.` once nobody can move.
    #[serde(rename = "board.update")]
    BoardUpdate {
        board: Board,
        tomove: Cell,
        black: String,
        white: String,
    },

    /// The human to move should submit a move
    #[serde(rename = "move.request")]
    MoveRequest,

    /// Final event of every session. `winner` is `.` for a tie and `?`
    /// (with an empty board) when the game ended abnormally.
    #[serde(rename = "game.end")]
    GameEnd {
        winner: Cell,
        #[serde(with = "board_or_empty")]
        board: Option<Board>,
        forfeit: bool,
    },

    #[serde(rename = "game.error")]
    GameError { error: String },
}

impl GameEvent {
    pub fn error(error: impl Into<String>) -> Self {
        GameEvent::GameError {
            error: error.into(),
        }
    }

    /// `game.end` for a session that never finished a game
    pub fn degraded_end() -> Self {
        GameEvent::GameEnd {
            winner: Cell::Outer,
            board: None,
            forfeit: false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::BoardUpdate { .. } => "board.update",
            GameEvent::MoveRequest => "move.request",
            GameEvent::GameEnd { .. } => "game.end",
            GameEvent::GameError { .. } => "game.error",
        }
    }
}

/// An event stamped with the session it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub session_id: String,
    #[serde(flatten)]
    pub event: GameEvent,
}
