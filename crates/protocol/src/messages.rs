use serde::{Deserialize, Serialize};

use crate::types::{InterpPoint, PidParams, ProfilePoint, TemperatureSample};

/// Parameters for a `get_status` request.
///
/// An init query asks for the full sample history plus the current
/// profile and PID parameters; an incremental query asks only for samples
/// past the client's sync cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusQuery {
    pub is_init: bool,
    /// Samples with `seconds_since_start > min_key` are returned.
    /// Ignored for init queries.
    pub min_key: u64,
}

impl StatusQuery {
    pub fn init() -> Self {
        Self {
            is_init: true,
            min_key: 0,
        }
    }

    pub fn incremental(min_key: u64) -> Self {
        Self {
            is_init: false,
            min_key,
        }
    }
}

/// Decoded `get_status` reply.
///
/// `pid_param` and `profile` are only present on init replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReply {
    pub current_temp: f64,
    /// Unix timestamp the backend answered at.
    pub current_timestamp: f64,
    /// Backend lifecycle string: "not running", "running", "finished"
    /// or "killed".
    #[serde(rename = "pid_process_status")]
    pub process_status: String,
    #[serde(default)]
    pub status_data: Vec<TemperatureSample>,
    #[serde(default)]
    pub pid_param: Option<PidParams>,
    #[serde(default)]
    pub profile: Option<Vec<ProfilePoint>>,
}

/// Payload for `run_process`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    pub profile: Vec<ProfilePoint>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pid_param: Option<PidParams>,
}

/// Plain acknowledgment reply used by `run_process`, `kill_process` and
/// `status_clear`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageReply {
    pub message: String,
}

impl MessageReply {
    /// The reply text signalling a clean kill. Anything else from
    /// `kill_process` still means the process is no longer running.
    pub const TASK_KILLED: &'static str = "Task killed";
}

/// The recipe the run was started from, as echoed back by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedRecipe {
    pub profile: Vec<ProfilePoint>,
    pub pid_param: PidParams,
}

/// Full `get_chart_data` reply for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartData {
    pub status_data: Vec<TemperatureSample>,
    pub recipe: RecordedRecipe,
    pub interp_profile: Vec<InterpPoint>,
}

/// On-disk recipe interchange format.
///
/// `profile` is required; `pid_param` is optional and ignored when
/// malformed (import-side leniency lives in the core crate).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub profile: Vec<ProfilePoint>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pid_param: Option<PidParams>,
}
