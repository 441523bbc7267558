use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of the remote control process as this client models it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessState {
    /// No process; the profile is editable.
    Idle,
    /// Control loop active; all editing is locked.
    Running,
    /// The loop ran the whole profile to completion.
    Finished,
    /// The loop was terminated early.
    Killed,
}

impl ProcessState {
    /// Map the backend's status string. The backend emits exactly four
    /// strings; anything unrecognized is treated as "not running" so a
    /// confused client converges through the reset path instead of
    /// wedging in Running.
    pub fn from_status(status: &str) -> Self {
        match status {
            "running" => Self::Running,
            "finished" => Self::Finished,
            "killed" => Self::Killed,
            _ => Self::Idle,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Killed)
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "not running"),
            Self::Running => write!(f, "running"),
            Self::Finished => write!(f, "finished"),
            Self::Killed => write!(f, "killed"),
        }
    }
}

impl Default for ProcessState {
    fn default() -> Self {
        Self::Idle
    }
}

/// State machine driven from two directions: local user actions
/// (start / stop / clear) and backend status observed on every poll.
///
/// `Idle → Running → {Finished, Killed}`; terminal states return to
/// `Idle` only through an explicit clear. Profile editing is allowed in
/// `Idle` only — a killed or finished run keeps the curve locked so the
/// recorded trace stays comparable to the profile that produced it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLifecycle {
    state: ProcessState,
}

impl ProcessLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn editing_locked(&self) -> bool {
        self.state != ProcessState::Idle
    }

    pub fn can_start(&self) -> bool {
        self.state == ProcessState::Idle
    }

    pub fn can_stop(&self) -> bool {
        self.state == ProcessState::Running
    }

    /// Local start action accepted: lock in Running before the request is
    /// even on the wire, so duplicate clicks have no effect.
    pub fn start(&mut self) -> bool {
        if !self.can_start() {
            return false;
        }
        self.state = ProcessState::Running;
        true
    }

    /// Kill acknowledged by the backend. Editing stays locked until clear.
    pub fn stopped(&mut self) {
        self.state = ProcessState::Killed;
    }

    /// Reconcile with the status observed on a poll. Running →
    /// Finished/Killed is the normal end of a run, not an error; an
    /// externally started run moves an idle client into Running.
    pub fn observe(&mut self, observed: ProcessState) {
        self.state = observed;
    }

    /// Explicit clear (or externally observed reset): back to Idle,
    /// editing re-enabled.
    pub fn reset(&mut self) {
        self.state = ProcessState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_string_mapping() {
        assert_eq!(ProcessState::from_status("not running"), ProcessState::Idle);
        assert_eq!(ProcessState::from_status("running"), ProcessState::Running);
        assert_eq!(ProcessState::from_status("finished"), ProcessState::Finished);
        assert_eq!(ProcessState::from_status("killed"), ProcessState::Killed);
        // unknown strings fall back to not-running semantics
        assert_eq!(ProcessState::from_status("rebooting"), ProcessState::Idle);
    }

    #[test]
    fn start_only_from_idle() {
        let mut lifecycle = ProcessLifecycle::new();
        assert!(lifecycle.start());
        assert_eq!(lifecycle.state(), ProcessState::Running);
        // duplicate start is a no-op
        assert!(!lifecycle.start());
    }

    #[test]
    fn terminal_observation_ends_a_run() {
        let mut lifecycle = ProcessLifecycle::new();
        lifecycle.start();
        lifecycle.observe(ProcessState::Finished);
        assert_eq!(lifecycle.state(), ProcessState::Finished);
        assert!(lifecycle.editing_locked());
        assert!(!lifecycle.can_start());
    }

    #[test]
    fn kill_keeps_editing_locked_until_clear() {
        let mut lifecycle = ProcessLifecycle::new();
        lifecycle.start();
        lifecycle.stopped();
        assert_eq!(lifecycle.state(), ProcessState::Killed);
        assert!(lifecycle.editing_locked());
        lifecycle.reset();
        assert_eq!(lifecycle.state(), ProcessState::Idle);
        assert!(!lifecycle.editing_locked());
    }

    #[test]
    fn externally_started_run_locks_editing() {
        let mut lifecycle = ProcessLifecycle::new();
        lifecycle.observe(ProcessState::Running);
        assert!(lifecycle.editing_locked());
        assert!(lifecycle.can_stop());
    }

    #[test]
    fn display_matches_backend_strings() {
        assert_eq!(ProcessState::Idle.to_string(), "not running");
        assert_eq!(ProcessState::Killed.to_string(), "killed");
    }
}
