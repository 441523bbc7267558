use ovenpilot_protocol::{ProfilePoint, StatusQuery, StatusReply, TemperatureSample};

use crate::lifecycle::{ProcessLifecycle, ProcessState};
use crate::model::{ProfileSeries, RecordedSeries};
use crate::session::PidInputs;
use crate::viewport::Bounds;

/// Live values surfaced next to the chart.
#[derive(Debug, Clone, Copy, Default)]
pub struct Readouts {
    /// Latest measured temperature in °C.
    pub current_temp: f64,
    /// Instantaneous heater output in percent, from the newest sample.
    pub power_pct: f64,
}

/// Result of applying a poll reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Reply merged into local state.
    Applied,
    /// A reset outside this client was detected: recorded data was
    /// dropped and the next poll must re-request the full history.
    /// Callers should issue that poll immediately.
    ResyncRequired,
    /// No poll was outstanding (the reply raced an explicit clear);
    /// the reply was discarded whole.
    Stale,
}

/// Mutable views of everything a poll reply may touch.
pub struct SyncTargets<'a> {
    pub profile: &'a mut ProfileSeries,
    pub recorded: &'a mut RecordedSeries,
    pub lifecycle: &'a mut ProcessLifecycle,
    pub bounds: &'a mut Bounds,
    pub inputs: &'a mut PidInputs,
    pub readouts: &'a mut Readouts,
}

/// Incremental status reconciliation against the backend's sample stream.
///
/// Keeps a monotonic cursor (largest `seconds_since_start` merged so far)
/// so each poll transfers only new samples, plus the unix timestamp the
/// run started at, used to place the terminal point. At most one poll is
/// outstanding at a time: `next_query` hands out nothing while a reply is
/// pending, which serializes merges and removes the out-of-order risk of
/// a fixed timer racing slow responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusSync {
    initialized: bool,
    in_flight: bool,
    cursor: f64,
    process_start_ut: Option<f64>,
}

impl StatusSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn poll_outstanding(&self) -> bool {
        self.in_flight
    }

    /// The query the next poll tick should issue: full history before the
    /// first successful sync (and after any reset), otherwise only
    /// samples past the cursor. `None` while a poll is outstanding — the
    /// caller drops that tick.
    pub fn next_query(&mut self) -> Option<StatusQuery> {
        if self.in_flight {
            return None;
        }
        self.in_flight = true;
        Some(if self.initialized {
            StatusQuery::incremental(self.cursor as u64)
        } else {
            StatusQuery::init()
        })
    }

    /// The outstanding poll failed; local state is untouched and the next
    /// tick retries.
    pub fn fail(&mut self) {
        self.in_flight = false;
    }

    /// Forget everything learned from the stream; the next query is
    /// init-style again.
    pub fn reset(&mut self) {
        self.initialized = false;
        self.in_flight = false;
        self.cursor = 0.0;
        self.process_start_ut = None;
    }

    /// Merge a decoded status reply into local state.
    pub fn apply(&mut self, reply: &StatusReply, t: SyncTargets<'_>) -> SyncOutcome {
        if !self.in_flight {
            return SyncOutcome::Stale;
        }
        self.in_flight = false;

        t.readouts.current_temp = reply.current_temp;
        let observed = ProcessState::from_status(&reply.process_status);

        if !self.initialized {
            self.seed(reply, observed, t);
            return SyncOutcome::Applied;
        }

        match observed {
            ProcessState::Idle => {
                if t.lifecycle.state() != ProcessState::Idle {
                    // the process was reset outside this client (another
                    // client's clear, or a backend restart)
                    t.recorded.clear();
                    t.readouts.power_pct = 0.0;
                    t.lifecycle.reset();
                    self.reset();
                    return SyncOutcome::ResyncRequired;
                }
                t.profile.set_anchor(reply.current_temp);
                SyncOutcome::Applied
            }
            ProcessState::Running => {
                self.track_stream(&reply.status_data);
                for sample in &reply.status_data {
                    t.recorded
                        .merge(ProfilePoint::new(sample.seconds_since_start, sample.current_temp));
                }
                if let Some(sample) = reply.status_data.last() {
                    t.readouts.power_pct = sample.power_fraction * 100.0;
                }
                t.lifecycle.observe(ProcessState::Running);
                if let Some(point) = t.recorded.last() {
                    t.bounds.extend_for(point);
                }
                SyncOutcome::Applied
            }
            terminal => {
                // finished or killed: exactly one closing point from the
                // final temperature/timestamp pair
                self.track_stream(&reply.status_data);
                if let Some(start_ut) = self.process_start_ut {
                    let x = (reply.current_timestamp - start_ut).floor();
                    t.recorded.merge(ProfilePoint::new(x, reply.current_temp));
                }
                t.lifecycle.observe(terminal);
                if let Some(point) = t.recorded.last() {
                    t.bounds.extend_for(point);
                }
                SyncOutcome::Applied
            }
        }
    }

    /// First reply of a session (or after a reset): seed every local
    /// structure from the full snapshot.
    fn seed(&mut self, reply: &StatusReply, observed: ProcessState, t: SyncTargets<'_>) {
        self.initialized = true;
        self.cursor = 0.0;
        self.process_start_ut = None;

        t.recorded.clear();
        t.readouts.power_pct = 0.0;
        t.profile.replace(reply.profile.clone().unwrap_or_default());
        if let Some(params) = reply.pid_param {
            t.inputs.set_from(params);
        }

        self.track_stream(&reply.status_data);
        for sample in &reply.status_data {
            t.recorded
                .merge(ProfilePoint::new(sample.seconds_since_start, sample.current_temp));
        }

        t.lifecycle.observe(observed);
        if observed == ProcessState::Idle {
            t.profile.set_anchor(reply.current_temp);
        }
        if let Some(point) = t.recorded.last() {
            t.bounds.extend_for(point);
        }
    }

    /// Advance the cursor and pin the run's start timestamp from a
    /// delivered sample batch.
    fn track_stream(&mut self, samples: &[TemperatureSample]) {
        if let Some(first) = samples.iter().find(|s| s.seconds_since_start == 0.0) {
            self.process_start_ut = Some(first.timestamp);
        }
        if let Some(last) = samples.last() {
            self.cursor = last.seconds_since_start;
        }
    }
}
