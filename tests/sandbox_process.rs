use othello_arena::core::{initial_board, is_legal, Move, Player};
use othello_arena::{LaunchSpec, ProcessSandbox, Sandbox, SandboxOptions, SandboxState};
use std::time::Duration;

fn hosted(name: &str) -> ProcessSandbox {
    let launch = LaunchSpec::new(env!("CARGO_BIN_EXE_othello-arena")).with_args(["strategy", name]);
    ProcessSandbox::new(name, launch, SandboxOptions::default())
}

#[test]
fn test_builtin_strategies_answer_through_sandbox() {
    for name in ["random", "greedy", "positional"] {
        let mut sandbox = hosted(name);
        sandbox.start().unwrap();
        assert_eq!(sandbox.state(), SandboxState::Ready);

        let board = initial_board();
        let reply = sandbox.get_move(&board, Player::Black, Duration::from_millis(300));
        assert!(is_legal(reply.mv, Player::Black, &board), "{} played {}", name, reply.mv);
        assert!(reply.diagnostics.is_empty(), "{}: {}", name, reply.diagnostics);

        sandbox.stop();
        assert_eq!(sandbox.state(), SandboxState::Stopped);
    }
}

#[test]
fn test_greedy_plays_lowest_best_square() {
    let mut sandbox = hosted("greedy");
    sandbox.start().unwrap();
    let reply = sandbox.get_move(&initial_board(), Player::Black, Duration::from_millis(300));
    assert_eq!(reply.mv, Move(34));
}

#[test]
fn test_unknown_builtin_fails_to_start() {
    let mut sandbox = hosted("alphazero");
    let err = sandbox.start().unwrap_err();
    assert!(err.to_string().contains("alphazero"));
    assert_eq!(sandbox.state(), SandboxState::Stopped);
}

#[test]
fn test_positional_respects_time_limit() {
    let mut sandbox = hosted("positional");
    sandbox.start().unwrap();

    let started = std::time::Instant::now();
    let reply = sandbox.get_move(&initial_board(), Player::White, Duration::from_millis(200));
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(is_legal(reply.mv, Player::White, &initial_board()));
}
