//! Turn scheduling for a single game.
//!
//! A [`GameRunner`] owns one session from participant resolution to
//! teardown. It runs on its own OS thread and blocks freely: human moves
//! arrive on a `std::sync::mpsc` channel polled every
//! [`RunnerOptions::poll_interval`], automated moves come from sandbox calls
//! bounded by the time limit. Everything it has to say goes out through an
//! [`Emitter`].
//!
//! Every path out of a session goes through one cleanup step that stops
//! all participants. Paths that did not already report a `game.end`
//! (cancellation, startup failures, internal errors, panics) get a
//! `game.error` followed by a degraded `game.end` there.

mod session;

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn};

use crate::bridge::Emitter;
use crate::core::{is_legal, make_move, next_player, opponent, winner, Cell, Move, Player, PlayerArray};
use crate::error::RunnerError;
use crate::event::GameEvent;
use crate::registry::{Participant, Resolver};

pub use session::{GameSession, Phase, Termination};

const CLEANUP_MESSAGE: &str = "game runner asked to clean up early";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerOptions {
    /// How often a waiting human turn re-checks the quit flag
    pub poll_interval: Duration,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Outcome of one step of play that did not end the session
enum Turn {
    Continue,
    Over(Termination),
}

pub struct GameRunner {
    black: String,
    white: String,
    time_limit: Duration,
    emitter: Emitter,
    resolver: Arc<dyn Resolver>,
    quit: CancellationToken,
    options: RunnerOptions,
}

impl GameRunner {
    pub fn new(
        black: impl Into<String>,
        white: impl Into<String>,
        time_limit: Duration,
        emitter: Emitter,
        resolver: Arc<dyn Resolver>,
        quit: CancellationToken,
    ) -> Self {
        Self {
            black: black.into(),
            white: white.into(),
            time_limit,
            emitter,
            resolver,
            quit,
            options: RunnerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunnerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn session_id(&self) -> &str {
        self.emitter.session_id()
    }

    fn should_stop(&self) -> bool {
        self.quit.is_cancelled()
    }

    /// Run the session on a dedicated thread
    pub fn spawn(self, moves: Receiver<Move>) -> io::Result<JoinHandle<Termination>> {
        thread::Builder::new()
            .name(format!("game-{}", self.session_id()))
            .spawn(move || self.run(moves))
    }

    /// Play the session to completion on the calling thread
    pub fn run(self, moves: Receiver<Move>) -> Termination {
        let span = info_span!("game", session_id = %self.session_id());
        let _guard = span.enter();
        info!(black = %self.black, white = %self.white, time_limit = ?self.time_limit, "session starting");

        let mut session = None;
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.play(&mut session, &moves)));

        let termination = match result {
            Ok(Ok(termination)) => termination,
            Ok(Err(e)) => {
                error!(error = %e, "session failed");
                Termination::Aborted(e.to_string())
            }
            Err(payload) => {
                let e = RunnerError::Panicked(panic_message(payload));
                error!(error = %e, "session panicked");
                Termination::Aborted(e.to_string())
            }
        };

        self.clean_up(session.as_mut(), termination)
    }

    fn play(&self, slot: &mut Option<GameSession>, moves: &Receiver<Move>) -> Result<Termination, RunnerError> {
        let Some(participants) = self.resolve_participants()? else {
            return Ok(Termination::Aborted("unresolvable participant".into()));
        };
        let session = slot.insert(GameSession::new(participants, self.time_limit));
        session.set_phase(Phase::StartingParticipants);

        for player in Player::all() {
            let participant = session.participant_mut(player);
            if let Err(e) = participant.sandbox.start() {
                warn!(error = %e, "participant failed to start");
                self.emitter.emit(GameEvent::error(e.to_string()))?;
                return Ok(Termination::Aborted(e.to_string()));
            }
        }

        if self.should_stop() {
            session.set_phase(Phase::Cancelled);
            return Ok(Termination::Cancelled);
        }

        session.set_phase(Phase::Playing);
        self.emit_board(session)?;

        loop {
            if let Turn::Over(termination) = self.take_turn(session, moves)? {
                return Ok(termination);
            }
        }
    }

    /// Resolve both sides before anything is started. Unknown names are
    /// reported, and any side that did resolve is stopped again.
    fn resolve_participants(&self) -> Result<Option<PlayerArray<Participant>>, RunnerError> {
        let black = self.resolver.resolve(&self.black);
        let white = self.resolver.resolve(&self.white);

        match (black, white) {
            (Some(black), Some(white)) => Ok(Some(PlayerArray::new(black, white))),
            (black, white) => {
                for (name, resolved) in [(&self.black, black), (&self.white, white)] {
                    match resolved {
                        Some(mut participant) => participant.sandbox.stop(),
                        None => {
                            warn!(name = %name, "unknown participant");
                            self.emitter
                                .emit(GameEvent::error(format!("{} is not a valid AI name", name)))?;
                        }
                    }
                }
                Ok(None)
            }
        }
    }

    fn take_turn(&self, session: &mut GameSession, moves: &Receiver<Move>) -> Result<Turn, RunnerError> {
        if self.should_stop() {
            session.set_phase(Phase::Cancelled);
            return Ok(Turn::Over(Termination::Cancelled));
        }

        let Some(player) = session.to_move() else {
            return Ok(Turn::Over(self.finish(session)?));
        };

        let mv = if session.participant(player).is_human() {
            match self.wait_for_human(moves)? {
                Some(mv) => mv,
                None => {
                    session.set_phase(Phase::Cancelled);
                    return Ok(Turn::Over(Termination::Cancelled));
                }
            }
        } else {
            let board = *session.board();
            let time_limit = session.time_limit();
            let reply = session
                .participant_mut(player)
                .sandbox
                .get_move(&board, player, time_limit);

            if self.should_stop() {
                session.set_phase(Phase::Cancelled);
                return Ok(Turn::Over(Termination::Cancelled));
            }

            if !reply.diagnostics.is_empty() {
                self.emitter.emit(GameEvent::error(format!(
                    "{} error on board {}:\n{}",
                    session.name(player),
                    board.encode(),
                    reply.diagnostics
                )))?;
            }
            reply.mv
        };

        let board = *session.board();
        if !is_legal(mv, player, &board) {
            info!(player = ?player, mv = %mv, "illegal move, forfeiting");
            self.emitter.emit(GameEvent::error(format!(
                "{}: {} is an invalid move for board {}",
                session.name(player),
                mv,
                board.encode()
            )))?;

            let winner = opponent(player);
            session.set_phase(Phase::Forfeited);
            self.emitter.emit(GameEvent::GameEnd {
                winner: winner.cell(),
                board: Some(board),
                forfeit: true,
            })?;
            return Ok(Turn::Over(Termination::Forfeited { winner }));
        }

        debug!(player = ?player, mv = %mv, "applying move");
        let board = make_move(mv, player, &board);
        session.advance(board, next_player(&board, player));
        self.emit_board(session)?;

        if session.to_move().is_none() {
            return Ok(Turn::Over(self.finish(session)?));
        }
        Ok(Turn::Continue)
    }

    /// Ask for a human move and wait for it, watching the quit flag.
    /// `None` means the session was cancelled.
    fn wait_for_human(&self, moves: &Receiver<Move>) -> Result<Option<Move>, RunnerError> {
        self.emitter.emit(GameEvent::MoveRequest)?;

        loop {
            match moves.recv_timeout(self.options.poll_interval) {
                Ok(mv) => {
                    if self.should_stop() {
                        return Ok(None);
                    }
                    return Ok(Some(mv));
                }
                Err(RecvTimeoutError::Timeout) => {
                    if self.should_stop() {
                        return Ok(None);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    info!("move input closed, cancelling");
                    return Ok(None);
                }
            }
        }
    }

    fn emit_board(&self, session: &GameSession) -> Result<(), RunnerError> {
        self.emitter.emit(GameEvent::BoardUpdate {
            board: *session.board(),
            tomove: session.to_move().map_or(Cell::Empty, Player::cell),
            black: session.name(Player::Black).to_string(),
            white: session.name(Player::White).to_string(),
        })?;
        Ok(())
    }

    fn finish(&self, session: &mut GameSession) -> Result<Termination, RunnerError> {
        let board = *session.board();
        let winner = winner(&board);
        session.set_phase(Phase::NaturalEnd);
        self.emitter.emit(GameEvent::GameEnd {
            winner,
            board: Some(board),
            forfeit: false,
        })?;
        Ok(Termination::NaturalEnd { winner })
    }

    fn clean_up(&self, session: Option<&mut GameSession>, termination: Termination) -> Termination {
        if let Some(session) = session {
            if !session.clean_up() {
                return termination;
            }
        }

        if termination.is_abnormal() {
            let reported = self
                .emitter
                .emit(GameEvent::error(CLEANUP_MESSAGE))
                .and_then(|_| self.emitter.emit(GameEvent::degraded_end()));
            if let Err(e) = reported {
                warn!(error = %e, "could not report abnormal end");
            }
        }

        info!(result = %termination, "session over");
        termination
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::EmissionBridge;
    use crate::core::{initial_board, legal_moves, Board};
    use crate::error::SandboxError;
    use crate::event::Envelope;
    use crate::registry::HUMAN;
    use crate::sandbox::{MoveReply, Sandbox, SandboxState};
    use parking_lot::Mutex;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use tokio::sync::mpsc::UnboundedReceiver;

    const POLL: Duration = Duration::from_millis(20);

    #[derive(Default)]
    struct Counters {
        starts: AtomicUsize,
        stops: AtomicUsize,
        queries: AtomicUsize,
    }

    #[derive(Clone)]
    enum Script {
        Replies(Vec<MoveReply>),
        FirstLegal,
        FailStart,
        Panic,
        /// Raises the quit flag while answering, then plays a legal move
        CancelMidCall(CancellationToken),
    }

    struct ScriptedSandbox {
        script: Script,
        replies: VecDeque<MoveReply>,
        state: SandboxState,
        counters: Arc<Counters>,
    }

    impl Sandbox for ScriptedSandbox {
        fn state(&self) -> SandboxState {
            self.state
        }

        fn start(&mut self) -> Result<(), SandboxError> {
            self.counters.starts.fetch_add(1, Ordering::SeqCst);
            if let Script::FailStart = self.script {
                self.state = SandboxState::Stopped;
                return Err(SandboxError::startup("broken", "no readyok"));
            }
            self.state = SandboxState::Ready;
            Ok(())
        }

        fn get_move(&mut self, board: &Board, player: Player, _time_limit: Duration) -> MoveReply {
            self.counters.queries.fetch_add(1, Ordering::SeqCst);
            match self.script {
                Script::FirstLegal => match legal_moves(player, board).first() {
                    Some(&mv) => MoveReply::new(mv),
                    None => MoveReply::new(Move::NONE),
                },
                Script::Panic => panic!("strategy bug"),
                Script::CancelMidCall(ref quit) => {
                    quit.cancel();
                    MoveReply::new(legal_moves(player, board)[0])
                }
                _ => self.replies.pop_front().unwrap_or_else(|| MoveReply::new(Move::NONE)),
            }
        }

        fn stop(&mut self) {
            self.counters.stops.fetch_add(1, Ordering::SeqCst);
            self.state = SandboxState::Stopped;
        }
    }

    #[derive(Default)]
    struct FakeResolver {
        scripts: HashMap<String, Script>,
        counters: Mutex<HashMap<String, Arc<Counters>>>,
    }

    impl FakeResolver {
        fn with(mut self, name: &str, script: Script) -> Self {
            self.scripts.insert(name.to_string(), script);
            self
        }

        fn counters(&self, name: &str) -> Arc<Counters> {
            self.counters.lock().entry(name.to_string()).or_default().clone()
        }
    }

    impl Resolver for FakeResolver {
        fn resolve(&self, name: &str) -> Option<Participant> {
            if name == HUMAN {
                return Some(Participant::human());
            }
            let script = self.scripts.get(name)?.clone();
            let replies = match &script {
                Script::Replies(replies) => replies.iter().cloned().collect(),
                _ => VecDeque::new(),
            };
            let sandbox = ScriptedSandbox {
                script,
                replies,
                state: SandboxState::NotStarted,
                counters: self.counters(name),
            };
            Some(Participant::automated(name, Box::new(sandbox)))
        }
    }

    struct Harness {
        resolver: Arc<FakeResolver>,
        events: UnboundedReceiver<Envelope>,
        bridge: EmissionBridge,
        quit: CancellationToken,
    }

    impl Harness {
        fn new(resolver: FakeResolver) -> Self {
            let (bridge, events) = EmissionBridge::channel();
            Self {
                resolver: Arc::new(resolver),
                events,
                bridge,
                quit: CancellationToken::new(),
            }
        }

        fn runner(&self, black: &str, white: &str) -> GameRunner {
            GameRunner::new(
                black,
                white,
                Duration::from_secs(1),
                self.bridge.emitter("test-session"),
                self.resolver.clone(),
                self.quit.clone(),
            )
            .with_options(RunnerOptions { poll_interval: POLL })
        }

        fn events(&mut self) -> Vec<GameEvent> {
            let mut events = Vec::new();
            while let Ok(envelope) = self.events.try_recv() {
                assert_eq!(envelope.session_id, "test-session");
                events.push(envelope.event);
            }
            events
        }
    }

    fn kinds(events: &[GameEvent]) -> Vec<&'static str> {
        events.iter().map(GameEvent::kind).collect()
    }

    fn error_text(event: &GameEvent) -> &str {
        match event {
            GameEvent::GameError { error } => error,
            other => panic!("expected game.error, got {:?}", other),
        }
    }

    fn assert_degraded_tail(events: &[GameEvent]) {
        let n = events.len();
        assert!(n >= 2);
        assert_eq!(error_text(&events[n - 2]), CLEANUP_MESSAGE);
        assert_eq!(events[n - 1], GameEvent::degraded_end());
    }

    #[test]
    fn test_human_game_opens_with_board_then_request() {
        let mut harness = Harness::new(FakeResolver::default());
        let (tx, rx) = mpsc::channel();
        tx.send(Move(34)).unwrap();
        drop(tx);

        let termination = harness.runner(HUMAN, HUMAN).run(rx);
        assert_eq!(termination, Termination::Cancelled);

        let events = harness.events();
        assert_eq!(
            kinds(&events[..4]),
            vec!["board.update", "move.request", "board.update", "move.request"]
        );
        assert_eq!(
            events[0],
            GameEvent::BoardUpdate {
                board: initial_board(),
                tomove: Cell::Black,
                black: "human".into(),
                white: "human".into(),
            }
        );
        match &events[2] {
            GameEvent::BoardUpdate { board, tomove, .. } => {
                assert_eq!(*board, make_move(Move(34), Player::Black, &initial_board()));
                assert_eq!(*tomove, Cell::White);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_degraded_tail(&events);
    }

    #[test]
    fn test_unknown_participant() {
        let resolver = FakeResolver::default().with("greedy", Script::FirstLegal);
        let mut harness = Harness::new(resolver);
        let (_tx, rx) = mpsc::channel();

        let termination = harness.runner("deep-thought", "greedy").run(rx);
        assert!(matches!(termination, Termination::Aborted(_)));

        let events = harness.events();
        assert_eq!(kinds(&events), vec!["game.error", "game.error", "game.end"]);
        assert_eq!(error_text(&events[0]), "deep-thought is not a valid AI name");
        assert_degraded_tail(&events);

        let counters = harness.resolver.counters("greedy");
        assert_eq!(counters.starts.load(Ordering::SeqCst), 0);
        assert_eq!(counters.queries.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_both_participants_unknown() {
        let mut harness = Harness::new(FakeResolver::default());
        let (_tx, rx) = mpsc::channel();

        harness.runner("foo", "bar").run(rx);

        let events = harness.events();
        assert_eq!(error_text(&events[0]), "foo is not a valid AI name");
        assert_eq!(error_text(&events[1]), "bar is not a valid AI name");
        assert_degraded_tail(&events);
        assert!(!kinds(&events).contains(&"board.update"));
    }

    #[test]
    fn test_illegal_move_forfeits() {
        let resolver = FakeResolver::default()
            .with("cheater", Script::Replies(vec![MoveReply::new(Move(11))]))
            .with("greedy", Script::FirstLegal);
        let mut harness = Harness::new(resolver);
        let (_tx, rx) = mpsc::channel();

        let termination = harness.runner("cheater", "greedy").run(rx);
        assert_eq!(termination, Termination::Forfeited { winner: Player::White });

        let events = harness.events();
        assert_eq!(kinds(&events), vec!["board.update", "game.error", "game.end"]);
        assert_eq!(
            error_text(&events[1]),
            format!("cheater: 11 is an invalid move for board {}", initial_board().encode())
        );
        assert_eq!(
            events[2],
            GameEvent::GameEnd {
                winner: Cell::White,
                board: Some(initial_board()),
                forfeit: true,
            }
        );

        for name in ["cheater", "greedy"] {
            let counters = harness.resolver.counters(name);
            assert_eq!(counters.starts.load(Ordering::SeqCst), 1);
            assert_eq!(counters.stops.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn test_diagnostics_are_reported_without_ending_the_game() {
        let noisy = MoveReply {
            mv: Move(34),
            diagnostics: "warming up".into(),
        };
        let resolver = FakeResolver::default()
            .with("noisy", Script::Replies(vec![noisy, MoveReply::failed("timed out")]))
            .with("greedy", Script::FirstLegal);
        let mut harness = Harness::new(resolver);
        let (_tx, rx) = mpsc::channel();

        let termination = harness.runner("noisy", "greedy").run(rx);
        assert_eq!(termination, Termination::Forfeited { winner: Player::White });

        let events = harness.events();
        assert_eq!(
            kinds(&events),
            vec![
                "board.update",
                "game.error",
                "board.update",
                "board.update",
                "game.error",
                "game.error",
                "game.end"
            ]
        );
        assert_eq!(
            error_text(&events[1]),
            format!("noisy error on board {}:\nwarming up", initial_board().encode())
        );
        assert!(error_text(&events[5]).starts_with("noisy: -1 is an invalid move"));
    }

    #[test]
    fn test_natural_end() {
        let resolver = FakeResolver::default().with("first", Script::FirstLegal);
        let mut harness = Harness::new(resolver);
        let (_tx, rx) = mpsc::channel();

        let termination = harness.runner("first", "first").run(rx);

        let events = harness.events();
        assert!(!kinds(&events).contains(&"game.error"));
        let n = events.len();
        let GameEvent::BoardUpdate { board, tomove, .. } = &events[n - 2] else {
            panic!("expected final board.update, got {:?}", events[n - 2]);
        };
        assert_eq!(*tomove, Cell::Empty);
        assert_eq!(
            events[n - 1],
            GameEvent::GameEnd {
                winner: winner(board),
                board: Some(*board),
                forfeit: false,
            }
        );
        assert_eq!(termination, Termination::NaturalEnd { winner: winner(board) });

        // Both seats share a name, so the counters see both of them
        let counters = harness.resolver.counters("first");
        assert_eq!(counters.starts.load(Ordering::SeqCst), 2);
        assert_eq!(counters.stops.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_startup_failure() {
        let resolver = FakeResolver::default()
            .with("broken", Script::FailStart)
            .with("greedy", Script::FirstLegal);
        let mut harness = Harness::new(resolver);
        let (_tx, rx) = mpsc::channel();

        let termination = harness.runner("greedy", "broken").run(rx);
        assert!(matches!(termination, Termination::Aborted(_)));

        let events = harness.events();
        assert_eq!(kinds(&events), vec!["game.error", "game.error", "game.end"]);
        assert!(error_text(&events[0]).contains("failed to start strategy 'broken'"));
        assert_degraded_tail(&events);

        for name in ["greedy", "broken"] {
            assert_eq!(harness.resolver.counters(name).stops.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn test_cancel_while_waiting_for_human() {
        let resolver = FakeResolver::default().with("greedy", Script::FirstLegal);
        let mut harness = Harness::new(resolver);
        let (tx, rx) = mpsc::channel::<Move>();

        let handle = harness.runner(HUMAN, "greedy").spawn(rx).unwrap();

        let mut events = Vec::new();
        while let Some(envelope) = harness.events.blocking_recv() {
            events.push(envelope.event);
            if events.last() == Some(&GameEvent::MoveRequest) {
                break;
            }
        }
        thread::sleep(POLL * 3);
        harness.quit.cancel();

        let termination = handle.join().unwrap();
        assert_eq!(termination, Termination::Cancelled);
        drop(tx);

        events.extend(harness.events());
        assert_eq!(
            kinds(&events),
            vec!["board.update", "move.request", "game.error", "game.end"]
        );
        assert_degraded_tail(&events);

        let counters = harness.resolver.counters("greedy");
        assert_eq!(counters.stops.load(Ordering::SeqCst), 1);
        assert_eq!(counters.queries.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_cancel_during_strategy_call() {
        let quit = CancellationToken::new();
        let resolver = FakeResolver::default()
            .with("stopper", Script::CancelMidCall(quit.clone()))
            .with("greedy", Script::FirstLegal);
        let mut harness = Harness::new(resolver);
        harness.quit = quit;
        let (_tx, rx) = mpsc::channel();

        let termination = harness.runner("stopper", "greedy").run(rx);
        assert_eq!(termination, Termination::Cancelled);

        let events = harness.events();
        assert_eq!(kinds(&events), vec!["board.update", "game.error", "game.end"]);
        assert_degraded_tail(&events);

        assert_eq!(harness.resolver.counters("stopper").queries.load(Ordering::SeqCst), 1);
        let counters = harness.resolver.counters("greedy");
        assert_eq!(counters.queries.load(Ordering::SeqCst), 0);
        assert_eq!(counters.stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_before_start() {
        let resolver = FakeResolver::default().with("greedy", Script::FirstLegal);
        let mut harness = Harness::new(resolver);
        harness.quit.cancel();
        let (_tx, rx) = mpsc::channel();

        let termination = harness.runner("greedy", "greedy").run(rx);
        assert_eq!(termination, Termination::Cancelled);

        let events = harness.events();
        assert_eq!(kinds(&events), vec!["game.error", "game.end"]);
        assert_eq!(harness.resolver.counters("greedy").queries.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_panic_is_contained() {
        let resolver = FakeResolver::default()
            .with("buggy", Script::Panic)
            .with("greedy", Script::FirstLegal);
        let mut harness = Harness::new(resolver);
        let (_tx, rx) = mpsc::channel();

        let termination = harness.runner("buggy", "greedy").run(rx);
        match termination {
            Termination::Aborted(reason) => assert!(reason.contains("strategy bug")),
            other => panic!("unexpected termination {:?}", other),
        }

        let events = harness.events();
        assert_eq!(kinds(&events), vec!["board.update", "game.error", "game.end"]);
        assert_degraded_tail(&events);
        for name in ["buggy", "greedy"] {
            assert_eq!(harness.resolver.counters(name).stops.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn test_closed_bridge_aborts() {
        let resolver = FakeResolver::default().with("greedy", Script::FirstLegal);
        let harness = Harness::new(resolver);
        let runner = harness.runner("greedy", "greedy");
        let resolver = harness.resolver.clone();
        drop(harness);
        let (_tx, rx) = mpsc::channel();

        let termination = runner.run(rx);
        match termination {
            Termination::Aborted(reason) => assert!(reason.contains("event bridge closed")),
            other => panic!("unexpected termination {:?}", other),
        }
        assert_eq!(resolver.counters("greedy").stops.load(Ordering::SeqCst), 2);
    }
}
