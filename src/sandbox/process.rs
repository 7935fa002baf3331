use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::process::{self, Child, ChildStdin, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{MoveReply, Sandbox, SandboxOptions, SandboxState};
use crate::core::{Board, Move, Player};
use crate::error::SandboxError;
use crate::protocol::{Command, Reply};

/// How to launch a strategy process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchSpec {
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
    /// Variables passed to the child; everything else except `PATH` is cleared
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

impl LaunchSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            working_dir: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// A strategy running in a child process, spoken to over its stdin/stdout.
///
/// stdout and stderr are drained by dedicated reader threads into channels,
/// so every wait on the child is a bounded `recv_timeout`.
pub struct ProcessSandbox {
    name: String,
    launch: LaunchSpec,
    options: SandboxOptions,
    state: SandboxState,
    process: Option<Running>,
}

struct Running {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Receiver<String>,
    stderr: Receiver<String>,
}

/// Diagnostic text with a size cap
struct Diagnostics {
    text: String,
    limit: usize,
    truncated: bool,
}

impl Diagnostics {
    fn new(limit: usize) -> Self {
        Self {
            text: String::new(),
            limit,
            truncated: false,
        }
    }

    fn push(&mut self, line: &str) {
        if self.text.len() + line.len() + 1 > self.limit {
            self.truncated = true;
            return;
        }
        self.text.push_str(line);
        self.text.push('\n');
    }

    fn is_full(&self) -> bool {
        self.truncated
    }

    fn finish(mut self) -> String {
        if self.truncated {
            self.text.push_str("[diagnostics truncated]\n");
        }
        self.text.trim_end().to_string()
    }
}

fn spawn_line_reader<R>(thread_name: String, reader: R) -> io::Result<Receiver<String>>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new().name(thread_name).spawn(move || {
        for line in BufReader::new(reader).lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    })?;
    Ok(rx)
}

impl Running {
    fn send(&mut self, cmd: &Command) -> Result<(), String> {
        let stdin = self.stdin.as_mut().ok_or("stdin already closed")?;
        writeln!(stdin, "{}", cmd)
            .and_then(|_| stdin.flush())
            .map_err(|e| format!("failed to write '{}': {}", cmd, e))
    }

    fn wait_for_ready(&mut self, timeout: Duration) -> Result<(), String> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.stdout.recv_timeout(remaining) {
                Ok(line) if line.trim() == "readyok" => return Ok(()),
                Ok(line) => debug!(line = %line, "ignoring output before readyok"),
                Err(RecvTimeoutError::Timeout) => {
                    return Err(format!("no readyok within {:?}", timeout))
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err("process exited before becoming ready".into())
                }
            }
        }
    }

    /// Collect stderr lines until the stream stays quiet for `settle`, the
    /// diagnostics are full, or `deadline` passes
    fn collect_stderr(&self, diagnostics: &mut Diagnostics, settle: Duration, deadline: Instant) {
        while !diagnostics.is_full() {
            let wait = settle.min(deadline.saturating_duration_since(Instant::now()));
            if wait.is_zero() {
                break;
            }
            match self.stderr.recv_timeout(wait) {
                Ok(line) => diagnostics.push(&line),
                Err(_) => break,
            }
        }
    }

    /// Stderr that is already queued, without waiting for more
    fn drain_stderr(&self, diagnostics: &mut Diagnostics) {
        while !diagnostics.is_full() {
            match self.stderr.try_recv() {
                Ok(line) => diagnostics.push(&line),
                Err(_) => break,
            }
        }
    }

    /// SIGKILL everything left in the child's process group
    #[cfg(unix)]
    fn kill_group(&self) {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        let pgid = Pid::from_raw(self.child.id() as i32);
        if let Err(e) = killpg(pgid, Signal::SIGKILL) {
            debug!(error = %e, "process group already gone");
        }
    }

    fn kill(&mut self) {
        #[cfg(unix)]
        self.kill_group();
        if let Err(e) = self.child.kill() {
            debug!(error = %e, "kill failed, process probably already exited");
        }
        if let Err(e) = self.child.wait() {
            warn!(error = %e, "failed to reap strategy process");
        }
    }
}

impl ProcessSandbox {
    pub fn new(name: impl Into<String>, launch: LaunchSpec, options: SandboxOptions) -> Self {
        Self {
            name: name.into(),
            launch,
            options,
            state: SandboxState::NotStarted,
            process: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// OS process id while the sandbox is running
    pub fn pid(&self) -> Option<u32> {
        self.process.as_ref().map(|p| p.child.id())
    }

    fn spawn(&self) -> Result<Running, SandboxError> {
        let mut cmd = process::Command::new(&self.launch.program);
        cmd.args(&self.launch.args)
            .env_clear()
            .envs(&self.launch.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(path) = std::env::var_os("PATH") {
            cmd.env("PATH", path);
        }
        if let Some(dir) = &self.launch.working_dir {
            cmd.current_dir(dir);
        }

        // Keep terminal signals aimed at the runner away from strategies
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| SandboxError::startup(&self.name, e))?;

        let pipes = (child.stdin.take(), child.stdout.take(), child.stderr.take());
        let (Some(stdin), Some(stdout), Some(stderr)) = pipes else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(SandboxError::startup(&self.name, "child pipes unavailable"));
        };

        let readers = spawn_line_reader(format!("sandbox-{}-out", self.name), stdout).and_then(
            |out| spawn_line_reader(format!("sandbox-{}-err", self.name), stderr).map(|err| (out, err)),
        );
        let (stdout, stderr) = match readers {
            Ok(readers) => readers,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(SandboxError::startup(&self.name, e));
            }
        };

        let mut running = Running {
            child,
            stdin: Some(stdin),
            stdout,
            stderr,
        };

        let handshake = running
            .send(&Command::IsReady)
            .and_then(|_| running.wait_for_ready(self.options.ready_timeout));
        if let Err(reason) = handshake {
            let mut diagnostics = Diagnostics::new(self.options.max_diagnostic_bytes);
            running.kill();
            let settle = self.options.diagnostic_settle;
            running.collect_stderr(&mut diagnostics, settle, Instant::now() + settle);
            let stderr = diagnostics.finish();
            let reason = if stderr.is_empty() {
                reason
            } else {
                format!("{}: {}", reason, stderr)
            };
            return Err(SandboxError::startup(&self.name, reason));
        }

        Ok(running)
    }
}

impl Sandbox for ProcessSandbox {
    fn state(&self) -> SandboxState {
        self.state
    }

    fn start(&mut self) -> Result<(), SandboxError> {
        if self.state != SandboxState::NotStarted {
            return Err(SandboxError::AlreadyStarted(self.name.clone()));
        }

        match self.spawn() {
            Ok(running) => {
                info!(strategy = %self.name, pid = running.child.id(), "strategy process ready");
                self.process = Some(running);
                self.state = SandboxState::Ready;
                Ok(())
            }
            Err(e) => {
                self.state = SandboxState::Stopped;
                Err(e)
            }
        }
    }

    fn get_move(&mut self, board: &Board, player: Player, time_limit: Duration) -> MoveReply {
        let name = self.name.clone();
        let options = self.options.clone();
        let Some(running) = self.process.as_mut() else {
            return MoveReply::failed(format!("strategy {} is not running", name));
        };

        let mut diagnostics = Diagnostics::new(options.max_diagnostic_bytes);

        // Replies that arrived after an earlier query gave up on them
        for stale in running.stdout.try_iter() {
            debug!(strategy = %name, line = %stale, "discarding stale output");
        }
        running.drain_stderr(&mut diagnostics);

        let started = Instant::now();
        let deadline = started + time_limit + options.slack;
        let movetime = time_limit.as_millis() as u64;
        let sent = running
            .send(&Command::Position { board: *board, player })
            .and_then(|_| running.send(&Command::Go { movetime }));
        if let Err(e) = sent {
            diagnostics.push(&e);
            let settle = options.diagnostic_settle;
            running.collect_stderr(&mut diagnostics, settle, deadline + settle);
            return MoveReply::failed(diagnostics.finish());
        }

        let mv = loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match running.stdout.recv_timeout(remaining) {
                Ok(line) => match line.parse::<Reply>() {
                    Ok(Reply::BestMove(mv)) => break mv,
                    Ok(Reply::Info(text)) => debug!(strategy = %name, info = %text, "strategy info"),
                    Ok(Reply::ReadyOk) => {}
                    Err(_) => diagnostics.push(&format!("unexpected output: {}", line)),
                },
                Err(RecvTimeoutError::Timeout) => {
                    diagnostics.push(&format!(
                        "{} timed out after {:.2}s (limit {:.2}s)",
                        name,
                        started.elapsed().as_secs_f64(),
                        time_limit.as_secs_f64()
                    ));
                    break Move::NONE;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    diagnostics.push(&format!("{} exited unexpectedly", name));
                    break Move::NONE;
                }
            }
        };

        // A child that never stops writing to stderr cannot hold the call
        // past time_limit + slack + settle
        let settle = options.diagnostic_settle;
        running.collect_stderr(&mut diagnostics, settle, deadline + settle);
        debug!(strategy = %name, mv = %mv, elapsed_ms = started.elapsed().as_millis() as u64, "move received");

        MoveReply {
            mv,
            diagnostics: diagnostics.finish(),
        }
    }

    fn stop(&mut self) {
        if self.state == SandboxState::Stopped {
            return;
        }
        self.state = SandboxState::Stopped;

        let Some(mut running) = self.process.take() else {
            return;
        };

        if let Err(e) = running.send(&Command::Quit) {
            debug!(strategy = %self.name, error = %e, "could not send quit");
        }
        running.stdin = None;

        let deadline = Instant::now() + self.options.grace;
        loop {
            match running.child.try_wait() {
                Ok(Some(status)) => {
                    debug!(strategy = %self.name, %status, "strategy process exited");
                    // Background children outlive a clean exit
                    #[cfg(unix)]
                    running.kill_group();
                    return;
                }
                Ok(None) if Instant::now() < deadline => thread::sleep(Duration::from_millis(10)),
                Ok(None) => {
                    warn!(strategy = %self.name, "strategy ignored quit, killing it");
                    break;
                }
                Err(e) => {
                    warn!(strategy = %self.name, error = %e, "failed to poll strategy process");
                    break;
                }
            }
        }

        running.kill();
    }
}

impl Drop for ProcessSandbox {
    fn drop(&mut self) {
        self.stop();
    }
}
