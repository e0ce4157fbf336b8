//! A UCI engine running as a child process.
//!
//! Stdout is read on a dedicated thread and forwarded line by line over a
//! channel, so the owner can poll without blocking.

use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};

use super::protocol::{parse_line, EngineMessage, UciCommand};
use crate::config::EngineConfig;
use crate::error::{Error, Result};

pub struct Engine {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
    name: Option<String>,
    exited: bool,
    reaped: bool,
}

impl Engine {
    /// Start the engine and complete the `uci` / `isready` handshake.
    pub fn spawn(config: &EngineConfig) -> Result<Self> {
        let mut child = Command::new(&config.path)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| Error::EngineSpawn {
                path: config.path.clone(),
                source,
            })?;
        let stdin = child.stdin.take().ok_or(Error::EngineExited)?;
        let stdout = child.stdout.take().ok_or(Error::EngineExited)?;

        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("uci-reader".into())
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let Ok(line) = line else {
                        break;
                    };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            })?;

        let mut engine = Self {
            child,
            stdin,
            lines: rx,
            name: None,
            exited: false,
            reaped: false,
        };
        engine.handshake(config)?;
        info!(
            "engine ready: {} (pid {})",
            engine.name().unwrap_or(&config.path),
            engine.child.id()
        );
        Ok(engine)
    }

    fn handshake(&mut self, config: &EngineConfig) -> Result<()> {
        self.send(&UciCommand::Uci)?;
        let deadline = Instant::now() + config.handshake_timeout;
        loop {
            let line = self.recv_before(deadline, "uci")?;
            match parse_line(&line) {
                EngineMessage::IdName(name) => self.name = Some(name),
                EngineMessage::UciOk => break,
                _ => {}
            }
        }
        for (name, value) in [
            ("Threads", config.threads),
            ("Hash", config.hash_mb),
            ("MultiPV", config.multipv),
        ] {
            self.send(&UciCommand::SetOption {
                name: name.to_string(),
                value: value.to_string(),
            })?;
        }
        self.sync(config.handshake_timeout)
    }

    /// `isready`, then wait for `readyok`, discarding anything else.
    pub fn sync(&mut self, timeout: Duration) -> Result<()> {
        self.send(&UciCommand::IsReady)?;
        let deadline = Instant::now() + timeout;
        loop {
            let line = self.recv_before(deadline, "isready")?;
            if parse_line(&line) == EngineMessage::ReadyOk {
                return Ok(());
            }
        }
    }

    fn recv_before(&mut self, deadline: Instant, what: &str) -> Result<String> {
        let now = Instant::now();
        if now >= deadline {
            return Err(Error::EngineTimeout(what.to_string()));
        }
        match self.lines.recv_timeout(deadline - now) {
            Ok(line) => {
                trace!("<< {}", line);
                Ok(line)
            }
            Err(RecvTimeoutError::Timeout) => Err(Error::EngineTimeout(what.to_string())),
            Err(RecvTimeoutError::Disconnected) => {
                self.exited = true;
                Err(Error::EngineExited)
            }
        }
    }

    pub fn send(&mut self, cmd: &UciCommand) -> Result<()> {
        if self.exited {
            return Err(Error::EngineExited);
        }
        trace!(">> {}", cmd);
        let written = writeln!(self.stdin, "{}", cmd).and_then(|_| self.stdin.flush());
        match written {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                self.exited = true;
                Err(Error::EngineExited)
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Next buffered line, if one has arrived.
    pub fn try_line(&mut self) -> Result<Option<String>> {
        match self.lines.try_recv() {
            Ok(line) => {
                trace!("<< {}", line);
                Ok(Some(line))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                self.exited = true;
                Err(Error::EngineExited)
            }
        }
    }

    /// Block up to `timeout` for the next line; `None` on timeout.
    pub fn wait_line(&mut self, timeout: Duration) -> Result<Option<String>> {
        match self.recv_before(Instant::now() + timeout, "go") {
            Ok(line) => Ok(Some(line)),
            Err(Error::EngineTimeout(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Ask the engine to quit, killing it if it lingers.
    pub fn quit(&mut self) {
        if self.reaped {
            return;
        }
        if !self.exited {
            let _ = self.send(&UciCommand::Quit);
        }
        let deadline = Instant::now() + Duration::from_millis(500);
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => {
                    debug!("engine exited with {}", status);
                    break;
                }
                Ok(None) if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(10));
                }
                Ok(None) => {
                    warn!("engine did not quit, killing it");
                    let _ = self.child.kill();
                    let _ = self.child.wait();
                    break;
                }
                Err(e) => {
                    warn!("failed to wait for engine: {}", e);
                    break;
                }
            }
        }
        self.exited = true;
        self.reaped = true;
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if !self.reaped {
            self.quit();
        }
    }
}
