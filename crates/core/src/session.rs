use std::fmt;

use ovenpilot_protocol::{MessageReply, PidParams, Recipe, RunRequest, StatusQuery, StatusReply};

use crate::lifecycle::{ProcessLifecycle, ProcessState};
use crate::model::{ProfileSeries, RecordedSeries};
use crate::recipe::{self, RecipeError};
use crate::sync::{Readouts, StatusSync, SyncOutcome, SyncTargets};
use crate::viewport::Bounds;

/// Operator-editable PID gain fields, kept as text until a start request
/// needs them as numbers.
#[derive(Debug, Clone, Default)]
pub struct PidInputs {
    pub kp: String,
    pub ki: String,
    pub kd: String,
}

impl PidInputs {
    pub fn set_from(&mut self, params: PidParams) {
        self.kp = params.kp.to_string();
        self.ki = params.ki.to_string();
        self.kd = params.kd.to_string();
    }

    /// A full parameter block when all three gains parse as finite
    /// numbers, `None` otherwise — the backend then falls back to its own
    /// defaults. `dt` is fixed client-side.
    pub fn parse(&self) -> Option<PidParams> {
        let kp: f64 = self.kp.trim().parse().ok()?;
        let ki: f64 = self.ki.trim().parse().ok()?;
        let kd: f64 = self.kd.trim().parse().ok()?;
        Some(PidParams::new(kp, ki, kd)).filter(PidParams::is_finite)
    }
}

/// Top-level session state: owns the profile being authored, the recorded
/// trace, the lifecycle machine, the axis bounds, and the sync cursor.
///
/// All methods are pure state manipulation. I/O lives with the caller:
/// the session hands out typed requests (`StatusQuery`, `RunRequest`) and
/// consumes decoded replies, so a frontend drives it from whatever event
/// loop it has.
#[derive(Debug, Default)]
pub struct Session {
    profile: ProfileSeries,
    recorded: RecordedSeries,
    lifecycle: ProcessLifecycle,
    bounds: Bounds,
    sync: StatusSync,
    inputs: PidInputs,
    readouts: Readouts,
    /// Last user-visible notification (transport failures, kill replies).
    notice: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> &ProfileSeries {
        &self.profile
    }

    pub fn recorded(&self) -> &RecordedSeries {
        &self.recorded
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn state(&self) -> ProcessState {
        self.lifecycle.state()
    }

    pub fn editing_locked(&self) -> bool {
        self.lifecycle.editing_locked()
    }

    pub fn readouts(&self) -> Readouts {
        self.readouts
    }

    pub fn pid_inputs(&self) -> &PidInputs {
        &self.inputs
    }

    pub fn pid_inputs_mut(&mut self) -> &mut PidInputs {
        &mut self.inputs
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    // --- polling -----------------------------------------------------

    /// Query for the next poll tick, or `None` while one is outstanding.
    pub fn next_poll(&mut self) -> Option<StatusQuery> {
        self.sync.next_query()
    }

    /// Merge a decoded status reply. On `ResyncRequired` the caller
    /// should poll again immediately to reseed from the full history.
    pub fn apply_status(&mut self, reply: &StatusReply) -> SyncOutcome {
        self.sync.apply(
            reply,
            SyncTargets {
                profile: &mut self.profile,
                recorded: &mut self.recorded,
                lifecycle: &mut self.lifecycle,
                bounds: &mut self.bounds,
                inputs: &mut self.inputs,
                readouts: &mut self.readouts,
            },
        )
    }

    /// The outstanding poll failed; surface it and let the next tick
    /// retry. No local state changes.
    pub fn poll_failed(&mut self, error: impl fmt::Display) {
        self.sync.fail();
        self.notice = Some(format!("status request failed: {error}"));
    }

    // --- run / stop / clear ------------------------------------------

    /// Accept a start action: lock into Running, snap the time axis
    /// around the planned curve, and hand back the request to submit.
    /// `None` when the profile is empty or a process is already active.
    pub fn request_start(&mut self) -> Option<RunRequest> {
        if self.profile.is_empty() || !self.lifecycle.can_start() {
            return None;
        }
        self.profile.release();
        self.lifecycle.start();
        if let Some(last) = self.profile.last() {
            self.bounds.snap_to_run(last.x);
        }
        Some(RunRequest {
            profile: self.profile.points().to_vec(),
            pid_param: self.inputs.parse(),
        })
    }

    /// The run request was rejected. Local state stays Running; the next
    /// poll observes "not running" and resets, so the UI self-heals.
    pub fn start_failed(&mut self, error: impl fmt::Display) {
        self.notice = Some(format!("run request failed: {error}"));
    }

    /// Whether a stop action is currently meaningful.
    pub fn request_stop(&mut self) -> bool {
        self.lifecycle.can_stop()
    }

    /// Kill acknowledged. Any reply message counts as a stop; only the
    /// canonical one is silent.
    pub fn apply_kill(&mut self, reply: &MessageReply) {
        self.lifecycle.stopped();
        if reply.message != MessageReply::TASK_KILLED {
            self.notice = Some(reply.message.clone());
        }
    }

    pub fn kill_failed(&mut self, error: impl fmt::Display) {
        self.notice = Some(format!("kill request failed: {error}"));
    }

    /// Reset everything local and go back to Idle. The caller sends the
    /// server-side `status_clear` alongside and polls again right away —
    /// the next query is init-style and reseeds the session.
    pub fn clear(&mut self) {
        self.profile.clear();
        self.recorded.clear();
        self.lifecycle.reset();
        self.bounds.reset();
        self.sync.reset();
        self.readouts = Readouts::default();
        self.notice = None;
    }

    // --- recipe interchange ------------------------------------------

    /// Import a recipe file, replacing the profile wholesale. Nothing is
    /// touched on a malformed file.
    pub fn import_recipe(&mut self, data: &[u8]) -> Result<(), RecipeError> {
        if self.editing_locked() {
            return Err(RecipeError::EditingLocked);
        }
        let recipe = recipe::parse_recipe(data)?;
        self.profile.replace(recipe.profile);
        if let Some(last) = self.profile.last() {
            let max_y = self.profile.max_y().unwrap_or(last.y);
            self.bounds.fit_profile(last.x, max_y);
        }
        if let Some(params) = recipe.pid_param {
            self.inputs.set_from(params);
        }
        Ok(())
    }

    /// Current profile and (parseable) gains as a recipe file payload.
    pub fn export_recipe(&self) -> Recipe {
        Recipe {
            profile: self.profile.points().to_vec(),
            pid_param: self.inputs.parse(),
        }
    }

    // --- curve editing (gated on lifecycle) --------------------------

    pub fn add_point(&mut self, x: f64, y: f64) -> bool {
        if self.editing_locked() {
            return false;
        }
        let added = self.profile.add_point(x, y);
        if added && let Some(last) = self.profile.last() {
            self.bounds.extend_for(last);
        }
        added
    }

    pub fn select_point(&mut self, x: f64, y: f64, x_tol: f64, y_tol: f64) -> Option<usize> {
        if self.editing_locked() {
            return None;
        }
        self.profile.select_near(x, y, x_tol, y_tol)
    }

    pub fn drag_to(&mut self, x: f64, y: f64) -> bool {
        if self.editing_locked() {
            return false;
        }
        let moved = self.profile.drag_to(x, y);
        if moved
            && let Some(index) = self.profile.selected()
        {
            self.bounds.extend_for(self.profile.points()[index]);
        }
        moved
    }

    pub fn release_drag(&mut self) {
        self.profile.release();
    }

    pub fn delete_near(&mut self, x: f64, y: f64, x_tol: f64, y_tol: f64) -> bool {
        if self.editing_locked() {
            return false;
        }
        match self.profile.nearest_within(x, y, x_tol, y_tol) {
            Some(index) => self.profile.delete_point(index),
            None => false,
        }
    }
}
