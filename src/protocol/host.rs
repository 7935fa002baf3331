//! Strategy-process side of the sandbox protocol

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use super::command::{parse_command, Command, Reply};
use crate::core::{Board, Move, Player};
use crate::strategy::Strategy;

/// Whether the serve loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A strategy plus the position it was last given
pub struct Host {
    strategy: Box<dyn Strategy>,
    position: Option<(Board, Player)>,
}

impl Host {
    pub fn new(strategy: Box<dyn Strategy>) -> Self {
        Self {
            strategy,
            position: None,
        }
    }

    /// Handle one command, writing any reply to `out`
    pub fn handle_command(&mut self, cmd: &Command, out: &mut impl Write) -> Result<Flow> {
        match cmd {
            Command::IsReady => {
                writeln!(out, "{}", Reply::ReadyOk)?;
            }
            Command::Position { board, player } => {
                self.position = Some((*board, *player));
            }
            Command::Go { movetime } => {
                let deadline = Instant::now() + Duration::from_millis(*movetime);
                let mv = match self.position {
                    Some((board, player)) => self
                        .strategy
                        .best_move(&board, player, deadline)
                        .unwrap_or(Move::NONE),
                    None => {
                        // Answer anyway so the supervisor does not sit out its timeout
                        writeln!(out, "{}", Reply::BestMove(Move::NONE))?;
                        out.flush()?;
                        anyhow::bail!("go received before position");
                    }
                };
                writeln!(out, "{}", Reply::BestMove(mv))?;
            }
            Command::SetOption { name, value } => {
                self.strategy.set_option(name, value)?;
            }
            Command::Quit => return Ok(Flow::Quit),
        }

        out.flush()?;
        Ok(Flow::Continue)
    }
}

/// Run the protocol until `quit` or end of input.
///
/// Malformed commands are reported on `diagnostics` and otherwise ignored;
/// only I/O failures on `output` end the loop early.
pub fn serve(
    strategy: Box<dyn Strategy>,
    input: impl BufRead,
    mut output: impl Write,
    mut diagnostics: impl Write,
) -> Result<()> {
    let mut host = Host::new(strategy);

    for line in input.lines() {
        let line = line.context("failed to read command")?;

        let Some(cmd) = parse_command(&line) else {
            continue;
        };

        let result = cmd.and_then(|cmd| host.handle_command(&cmd, &mut output));
        match result {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => {
                if err.downcast_ref::<std::io::Error>().is_some() {
                    return Err(err);
                }
                writeln!(diagnostics, "{}", err)?;
                diagnostics.flush()?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{initial_board, is_legal};
    use crate::strategy::GreedyStrategy;
    use std::io::Cursor;

    fn run(input: &str) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        serve(Box::new(GreedyStrategy), Cursor::new(input), &mut out, &mut err).unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_ready_handshake() {
        let (out, err) = run("isready\n");
        assert_eq!(out, "readyok\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_go_after_position() {
        let position = Command::Position {
            board: initial_board(),
            player: Player::Black,
        };
        let (out, _) = run(&format!("{}\ngo movetime 100\n", position));
        assert_eq!(out, "bestmove 34\n");
        assert!(is_legal(Move(34), Player::Black, &initial_board()));
    }

    #[test]
    fn test_go_without_position_still_answers() {
        let (out, err) = run("go movetime 100\n");
        assert_eq!(out, "bestmove -1\n");
        assert!(err.contains("before position"));
    }

    #[test]
    fn test_bad_commands_are_reported_and_skipped() {
        let (out, err) = run("frobnicate\nsetoption name depth value 3\n\nisready\n");
        assert_eq!(out, "readyok\n");
        assert!(err.contains("Unknown command: frobnicate"));
        assert!(err.contains("Unknown option: depth"));
    }

    #[test]
    fn test_quit_stops_reading() {
        let (out, _) = run("quit\nisready\n");
        assert!(out.is_empty());
    }
}
