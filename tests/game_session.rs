use othello_arena::core::winner;
use othello_arena::registry::Resolver;
use othello_arena::{
    Cell, EmissionBridge, GameEvent, GameRunner, RunnerOptions, SandboxOptions, StrategyRegistry,
    Termination, HUMAN,
};
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn registry() -> Arc<dyn Resolver> {
    Arc::new(StrategyRegistry::builtin(
        Path::new(env!("CARGO_BIN_EXE_othello-arena")),
        SandboxOptions::default(),
    ))
}

#[test]
fn test_sandboxed_game_runs_to_the_end() {
    let (bridge, mut events) = EmissionBridge::channel();
    let runner = GameRunner::new(
        "greedy",
        "random",
        Duration::from_secs(1),
        bridge.emitter("integration"),
        registry(),
        CancellationToken::new(),
    );
    let (_tx, rx) = mpsc::channel();

    let termination = runner.spawn(rx).unwrap().join().unwrap();

    let mut received = Vec::new();
    while let Ok(envelope) = events.try_recv() {
        received.push(envelope.event);
    }
    assert!(!received.iter().any(|e| e.kind() == "game.error"), "{:?}", received);

    let n = received.len();
    let GameEvent::BoardUpdate { board, tomove, black, white } = &received[n - 2] else {
        panic!("expected final board.update, got {:?}", received[n - 2]);
    };
    assert_eq!(*tomove, Cell::Empty);
    assert_eq!((black.as_str(), white.as_str()), ("greedy", "random"));
    assert_eq!(termination, Termination::NaturalEnd { winner: winner(board) });
    assert_eq!(
        received[n - 1],
        GameEvent::GameEnd {
            winner: winner(board),
            board: Some(*board),
            forfeit: false,
        }
    );
}

#[test]
fn test_cancel_during_human_turn_stops_sandbox() {
    let (bridge, mut events) = EmissionBridge::channel();
    let quit = CancellationToken::new();
    let runner = GameRunner::new(
        HUMAN,
        "positional",
        Duration::from_secs(1),
        bridge.emitter("cancelled"),
        registry(),
        quit.clone(),
    )
    .with_options(RunnerOptions {
        poll_interval: Duration::from_millis(50),
    });
    let (_tx, rx) = mpsc::channel();

    let handle = runner.spawn(rx).unwrap();

    let mut kinds = Vec::new();
    while let Some(envelope) = events.blocking_recv() {
        kinds.push(envelope.event.kind());
        if envelope.event == GameEvent::MoveRequest {
            break;
        }
    }
    std::thread::sleep(Duration::from_millis(150));
    quit.cancel();
    assert_eq!(handle.join().unwrap(), Termination::Cancelled);

    while let Ok(envelope) = events.try_recv() {
        kinds.push(envelope.event.kind());
    }
    assert_eq!(kinds, vec!["board.update", "move.request", "game.error", "game.end"]);
}
