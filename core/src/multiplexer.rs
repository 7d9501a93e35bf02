//! # Multiplexed launcher
//!
//! Runs dispatched commands side by side in one multiplexer session, either as
//! tiled panes of a single window or as one window per command, then attaches
//! the operator's terminal to that session.
//!
//! The launcher only hands command text to panes. Exit codes stay with the
//! panes; nothing is collected here.

mod signals;
mod tmux;

use std::sync::atomic::AtomicBool;

use tracing::debug;

use crate::error::Result;

pub use tmux::Tmux;

use signals::SignalGuard;

/// Pane layouts understood by [`Multiplexer::select_layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Tiled,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Tiled => "tiled",
        }
    }
}

/// A pane and the window it lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pane {
    pub window: String,
    pub pane: String,
}

/// A freshly created session with its first window and pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub first: Pane,
}

/// Operations the launcher needs from a terminal multiplexer.
pub trait Multiplexer {
    /// Fails when [`attach`](Self::attach) could not succeed from here, before
    /// any session is created.
    fn ensure_attachable(&self) -> Result<()> {
        Ok(())
    }

    /// Creates a detached session. `window` names its first window.
    fn new_session(&self, name: Option<&str>, window: Option<&str>) -> Result<Session>;
    fn new_window(&self, session: &str, name: &str) -> Result<Pane>;
    fn split_window(&self, window: &str) -> Result<Pane>;
    fn select_layout(&self, window: &str, layout: Layout) -> Result<()>;
    fn select_window(&self, window: &str) -> Result<()>;
    fn select_pane(&self, pane: &str) -> Result<()>;
    /// Types `keys` into `pane` and presses enter.
    fn send_keys(&self, pane: &str, keys: &str) -> Result<()>;
    /// Blocks until the operator detaches or the session ends.
    fn attach(&self, session: &str) -> Result<()>;
    fn kill_session(&self, session: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub session_name: Option<String>,
    /// One window per command instead of tiled panes.
    pub use_windows: bool,
    /// Seconds a pane stays open after its command ends; `None` keeps it open.
    pub keep_open: Option<u64>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            session_name: None,
            use_windows: false,
            keep_open: Some(DEFAULT_KEEP_OPEN),
        }
    }
}

pub const DEFAULT_KEEP_OPEN: u64 = 5;

/// Starts `commands` (target name, shell command) in one session and attaches to it.
///
/// The session is killed before returning, whether attaching succeeded, any
/// step after creating the session failed, or SIGINT, SIGTERM or SIGHUP arrived
/// while it was being set up.
pub fn launch<M: Multiplexer + ?Sized>(mux: &M, commands: &[(String, String)], options: &LaunchOptions) -> Result<()> {
    if commands.is_empty() {
        debug!("nothing to launch");
        return Ok(());
    }
    let guard = SignalGuard::install()?;
    launch_until(mux, commands, options, guard.flag())
}

/// [`launch`] that gives up with [`Interrupted`](crate::FleetError::Interrupted) once `interrupted`
/// is set, checked between multiplexer steps.
pub fn launch_until<M: Multiplexer + ?Sized>(
    mux: &M,
    commands: &[(String, String)],
    options: &LaunchOptions,
    interrupted: &AtomicBool,
) -> Result<()> {
    let Some((first_name, _)) = commands.first() else {
        debug!("nothing to launch");
        return Ok(());
    };

    mux.ensure_attachable()?;
    signals::check(interrupted)?;

    let first_window = options.use_windows.then_some(first_name.as_str());
    let session = mux.new_session(options.session_name.as_deref(), first_window)?;
    debug!(session = %session.id, count = commands.len(), "session created");

    let result = populate(mux, &session, commands, options, interrupted)
        .and_then(|()| signals::check(interrupted))
        .and_then(|()| mux.attach(&session.id));

    if let Err(e) = mux.kill_session(&session.id) {
        // The session is usually gone already once every pane exited.
        debug!(session = %session.id, error = %e, "kill-session failed");
    }
    result
}

fn populate<M: Multiplexer + ?Sized>(
    mux: &M,
    session: &Session,
    commands: &[(String, String)],
    options: &LaunchOptions,
    interrupted: &AtomicBool,
) -> Result<()> {
    let mut panes = vec![session.first.clone()];
    for (name, _) in &commands[1..] {
        signals::check(interrupted)?;
        let pane = if options.use_windows {
            mux.new_window(&session.id, name)?
        } else {
            let pane = mux.split_window(&session.first.window)?;
            // Geometry changes with every split, so re-tile each time.
            mux.select_layout(&session.first.window, Layout::Tiled)?;
            pane
        };
        panes.push(pane);
    }

    for (pane, (name, command)) in panes.iter().zip(commands) {
        signals::check(interrupted)?;
        let keys = with_keep_open(command, options.keep_open);
        debug!(target_name = %name, pane = %pane.pane, "sending command");
        mux.select_window(&pane.window)?;
        mux.select_pane(&pane.pane)?;
        mux.send_keys(&pane.pane, &keys)?;
    }
    Ok(())
}

/// Appends `; sleep <seconds>; exit` so the pane closes on its own.
pub fn with_keep_open(command: &str, keep_open: Option<u64>) -> String {
    match keep_open {
        Some(seconds) => format!("{command}; sleep {seconds}; exit"),
        None => command.to_string(),
    }
}
