//! tmux backend.
//!
//! Every operation is one `tmux` invocation with an argument vector, so command
//! text never passes through an intermediate shell. Ids of created objects are
//! read back with `-P -F`.

use std::env;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::process::{Command, Output, Stdio};

use tracing::debug;

use crate::error::{FleetError, Result};

use super::{Layout, Multiplexer, Pane, Session};

const PANE_FORMAT: &str = "#{window_id} #{pane_id}";
const SESSION_FORMAT: &str = "#{session_id} #{window_id} #{pane_id}";
/// Set by tmux inside its own panes.
const TMUX_ENV: &str = "TMUX";

pub struct Tmux {
    binary: OsString,
}

impl Default for Tmux {
    fn default() -> Self {
        Self::new()
    }
}

impl Tmux {
    pub fn new() -> Self {
        Self::with_binary("tmux")
    }

    pub fn with_binary(binary: impl Into<OsString>) -> Self {
        Self { binary: binary.into() }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args);
        cmd
    }

    fn spawn_error(&self, e: std::io::Error) -> FleetError {
        if e.kind() == ErrorKind::NotFound {
            FleetError::Multiplexer(format!("{} is not installed or not on PATH", self.binary.to_string_lossy()))
        } else {
            FleetError::Multiplexer(format!("failed to run {}: {e}", self.binary.to_string_lossy()))
        }
    }

    /// Runs tmux and returns its trimmed stdout.
    fn run(&self, args: &[&str]) -> Result<String> {
        debug!(?args, "tmux");
        let output: Output = self
            .command(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FleetError::Multiplexer(format!("{}: {}", args[0], stderr.trim())));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Multiplexer for Tmux {
    fn ensure_attachable(&self) -> Result<()> {
        refuse_nesting(env::var_os(TMUX_ENV))
    }

    fn new_session(&self, name: Option<&str>, window: Option<&str>) -> Result<Session> {
        let mut args = vec!["new-session", "-d", "-P", "-F", SESSION_FORMAT];
        if let Some(name) = name {
            args.extend(["-s", name]);
        }
        if let Some(window) = window {
            args.extend(["-n", window]);
        }
        parse_session(&self.run(&args)?)
    }

    fn new_window(&self, session: &str, name: &str) -> Result<Pane> {
        let target = format!("{session}:");
        parse_pane(&self.run(&["new-window", "-d", "-t", &target, "-n", name, "-P", "-F", PANE_FORMAT])?)
    }

    fn split_window(&self, window: &str) -> Result<Pane> {
        parse_pane(&self.run(&["split-window", "-t", window, "-P", "-F", PANE_FORMAT])?)
    }

    fn select_layout(&self, window: &str, layout: Layout) -> Result<()> {
        self.run(&["select-layout", "-t", window, layout.as_str()]).map(drop)
    }

    fn select_window(&self, window: &str) -> Result<()> {
        self.run(&["select-window", "-t", window]).map(drop)
    }

    fn select_pane(&self, pane: &str) -> Result<()> {
        self.run(&["select-pane", "-t", pane]).map(drop)
    }

    fn send_keys(&self, pane: &str, keys: &str) -> Result<()> {
        // `-l` keeps tmux from reading words like "Enter" as key names.
        self.run(&["send-keys", "-t", pane, "-l", keys])?;
        self.run(&["send-keys", "-t", pane, "Enter"]).map(drop)
    }

    fn attach(&self, session: &str) -> Result<()> {
        let status = self
            .command(&["attach-session", "-t", session])
            .status()
            .map_err(|e| self.spawn_error(e))?;
        if status.success() {
            Ok(())
        } else {
            Err(FleetError::Multiplexer(format!("attach-session exited with {status}")))
        }
    }

    fn kill_session(&self, session: &str) -> Result<()> {
        self.run(&["kill-session", "-t", session]).map(drop)
    }
}

/// tmux will not attach to a session from inside another one.
fn refuse_nesting(tmux: Option<OsString>) -> Result<()> {
    match tmux {
        Some(value) if !value.is_empty() => Err(FleetError::Multiplexer(
            "already inside a tmux session; run from a plain terminal or unset TMUX".to_string(),
        )),
        _ => Ok(()),
    }
}

fn parse_session(output: &str) -> Result<Session> {
    match output.split_whitespace().collect::<Vec<_>>()[..] {
        [id, window, pane] => Ok(Session {
            id: id.to_string(),
            first: Pane {
                window: window.to_string(),
                pane: pane.to_string(),
            },
        }),
        _ => Err(unexpected("new-session", output)),
    }
}

fn parse_pane(output: &str) -> Result<Pane> {
    match output.split_whitespace().collect::<Vec<_>>()[..] {
        [window, pane] => Ok(Pane {
            window: window.to_string(),
            pane: pane.to_string(),
        }),
        _ => Err(unexpected("pane", output)),
    }
}

fn unexpected(what: &str, output: &str) -> FleetError {
    FleetError::Multiplexer(format!("unexpected {what} output {output:?}"))
}
