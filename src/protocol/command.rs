//! Sandbox protocol messages

use anyhow::{bail, ensure, Context, Result};
use std::fmt;
use std::str::FromStr;

use crate::core::{Board, Move, Player};

/// Commands sent from the supervisor to a strategy process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    IsReady,
    Position { board: Board, player: Player },
    Go { movetime: u64 },
    SetOption { name: String, value: String },
    Quit,
}

/// Lines sent back from a strategy process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    ReadyOk,
    BestMove(Move),
    Info(String),
}

/// Parse a command line; blank lines yield `None`
pub fn parse_command(input: &str) -> Option<Result<Command>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    Some(input.parse())
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        ensure!(!parts.is_empty(), "empty command");

        match parts[0] {
            "isready" => Ok(Command::IsReady),
            "quit" => Ok(Command::Quit),
            "position" => {
                ensure!(parts.len() == 3, "position command requires a board and a player");
                Ok(Command::Position {
                    board: parts[1].parse().context("invalid board")?,
                    player: parts[2].parse()?,
                })
            }
            "go" => {
                ensure!(
                    parts.len() == 3 && parts[1] == "movetime",
                    "invalid go command"
                );
                let movetime = parts[2].parse().context("invalid movetime")?;
                Ok(Command::Go { movetime })
            }
            "setoption" => {
                ensure!(
                    parts.len() == 5 && parts[1] == "name" && parts[3] == "value",
                    "invalid setoption command"
                );
                Ok(Command::SetOption {
                    name: parts[2].to_string(),
                    value: parts[4].to_string(),
                })
            }
            cmd => bail!("Unknown command: {}", cmd),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::IsReady => write!(f, "isready"),
            Command::Position { board, player } => {
                write!(f, "position {} {}", board.encode(), player.to_char())
            }
            Command::Go { movetime } => write!(f, "go movetime {}", movetime),
            Command::SetOption { name, value } => {
                write!(f, "setoption name {} value {}", name, value)
            }
            Command::Quit => write!(f, "quit"),
        }
    }
}

impl FromStr for Reply {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (head, rest) = s.split_once(' ').unwrap_or((s, ""));

        match head {
            "readyok" => Ok(Reply::ReadyOk),
            "bestmove" => {
                let mv = rest.trim().parse::<i32>().context("invalid bestmove")?;
                Ok(Reply::BestMove(Move(mv)))
            }
            "info" => Ok(Reply::Info(rest.to_string())),
            _ => bail!("unexpected reply: {}", s),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::ReadyOk => write!(f, "readyok"),
            Reply::BestMove(mv) => write!(f, "bestmove {}", mv),
            Reply::Info(text) => write!(f, "info {}", text),
        }
    }
}
