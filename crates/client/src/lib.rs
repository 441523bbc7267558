//! HTTP collaborator for the control backend.
//!
//! Thin by design: every method issues one request and decodes one reply
//! into a protocol type. All reconciliation logic lives in
//! `ovenpilot-core`; a failed request here surfaces as a notification
//! there and the next poll tick retries.

use ovenpilot_protocol::{ChartData, MessageReply, RunRequest, StatusQuery, StatusReply};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-2xx reply; the backend sends human-readable error bodies, so
    /// the body is the message.
    #[error("{body}")]
    Status { code: u16, body: String },
}

/// Client for one backend instance.
#[derive(Debug, Clone)]
pub struct OvenClient {
    base: String,
    http: reqwest::Client,
}

impl OvenClient {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            base,
            http: reqwest::Client::new(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// `GET /get_status` — full history on init, otherwise only samples
    /// past the cursor.
    pub async fn status(&self, query: StatusQuery) -> Result<StatusReply, ClientError> {
        let url = status_url(&self.base, query);
        debug!(%url, "polling status");
        let response = self.http.get(&url).send().await?;
        decode(response).await
    }

    /// `POST /run_process` — submit the profile (and optional gains) and
    /// start the control loop.
    pub async fn run(&self, request: &RunRequest) -> Result<MessageReply, ClientError> {
        debug!(points = request.profile.len(), "submitting run request");
        let response = self
            .http
            .post(format!("{}/run_process", self.base))
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    /// `GET /kill_process` — terminate the control loop.
    pub async fn kill(&self) -> Result<MessageReply, ClientError> {
        debug!("sending kill request");
        let response = self
            .http
            .get(format!("{}/kill_process", self.base))
            .send()
            .await?;
        decode(response).await
    }

    /// `GET /status_clear` — reset the backend's recorded state.
    pub async fn clear_status(&self) -> Result<MessageReply, ClientError> {
        debug!("sending clear request");
        let response = self
            .http
            .get(format!("{}/status_clear", self.base))
            .send()
            .await?;
        decode(response).await
    }

    /// `GET /get_chart_data` — the whole run (samples, recipe,
    /// interpolated target curve) for export.
    pub async fn chart_data(&self) -> Result<ChartData, ClientError> {
        debug!("fetching chart data");
        let response = self
            .http
            .get(format!("{}/get_chart_data", self.base))
            .send()
            .await?;
        decode(response).await
    }
}

fn status_url(base: &str, query: StatusQuery) -> String {
    if query.is_init {
        format!("{base}/get_status?isInit=True")
    } else {
        format!("{base}/get_status?minKey={}", query.min_key)
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let code = response.status();
    if !code.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(%code, %body, "backend rejected request");
        return Err(ClientError::Status {
            code: code.as_u16(),
            body,
        });
    }
    Ok(response.json::<T>().await?)
}
