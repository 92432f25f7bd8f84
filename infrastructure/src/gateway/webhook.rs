//! Webhook gateway: the registration sheet behind a single HTTPS endpoint.
//!
//! Both operations are JSON `POST`s to the same URL, distinguished by an
//! `action` field:
//!
//! - `{"action":"checkCount"}` → `{"count": <n>}`
//! - `{"action":"submit", "teamName": …, "members": [...], "timestamp": …}`
//!
//! The endpoint enforces the ceiling itself. A write refused for capacity is
//! reported in the response body, sometimes with a 2xx status, so the body
//! is always inspected for the capacity signal.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use signup_application::ports::registration_gateway::{
    GatewayError, RegistrationGateway, Submission, WriteReceipt,
};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("team-signup/", env!("CARGO_PKG_VERSION"));

/// Body values that mark a write as refused for capacity.
const CAPACITY_MARKERS: [&str; 2] = ["capacity_exceeded", "capacity_reached"];

/// Errors constructing a [`WebhookGateway`].
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("invalid webhook URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct CountRequest {
    action: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MemberPayload<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    action: &'static str,
    team_name: &'a str,
    members: Vec<MemberPayload<'a>>,
    timestamp: String,
}

impl<'a> SubmitRequest<'a> {
    fn from_submission(submission: &'a Submission) -> Self {
        let record = &submission.record;
        Self {
            action: "submit",
            team_name: record.team_name(),
            members: record
                .members()
                .iter()
                .map(|m| MemberPayload {
                    first_name: m.first_name(),
                    last_name: m.last_name(),
                    email: m.email(),
                })
                .collect(),
            timestamp: submission
                .submitted_at
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        }
    }
}

/// [`RegistrationGateway`] over HTTP.
pub struct WebhookGateway {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl WebhookGateway {
    /// Create a gateway for `url`; only `http` and `https` are accepted.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, WebhookError> {
        let url = parse_webhook_url(url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        body: &T,
    ) -> Result<reqwest::Response, GatewayError> {
        self.client
            .post(self.url.clone())
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)
    }
}

#[async_trait]
impl RegistrationGateway for WebhookGateway {
    async fn fetch_count(&self) -> Result<u32, GatewayError> {
        let response = self
            .post(&CountRequest {
                action: "checkCount",
            })
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::HttpStatus(status.as_u16()));
        }
        let body = response.text().await.map_err(map_transport_error)?;
        debug!("checkCount -> {} ({} bytes)", status, body.len());
        parse_count(&body)
    }

    async fn submit(&self, submission: &Submission) -> Result<WriteReceipt, GatewayError> {
        let response = self.post(&SubmitRequest::from_submission(submission)).await?;

        let status = response.status().as_u16();
        // An unreadable body carries no capacity signal
        let body = response.text().await.unwrap_or_default();
        let capacity_exceeded = capacity_signal(&body);
        debug!(
            "submit -> {} (capacity signal: {})",
            status, capacity_exceeded
        );
        Ok(WriteReceipt::new(status, capacity_exceeded))
    }
}

/// Check that a webhook URL is absolute `http(s)`.
pub fn parse_webhook_url(url: &str) -> Result<reqwest::Url, WebhookError> {
    let invalid = |reason: String| WebhookError::InvalidUrl {
        url: url.to_string(),
        reason,
    };
    let parsed = reqwest::Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

fn map_transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::ConnectionError(e.to_string())
    }
}

/// Read the registration count from a `checkCount` response body.
///
/// A JSON object without `count` (or with `count: null`) reads as zero.
pub fn parse_count(body: &str) -> Result<u32, GatewayError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|_| GatewayError::MalformedResponse("response is not JSON".to_string()))?;

    let Value::Object(map) = value else {
        return Err(GatewayError::MalformedResponse(
            "response is not a JSON object".to_string(),
        ));
    };

    match map.get("count") {
        None | Some(Value::Null) => Ok(0),
        Some(count) => count
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                GatewayError::MalformedResponse(format!("count is not a valid integer: {}", count))
            }),
    }
}

/// True when a write response body says the sheet is full.
pub fn capacity_signal(body: &str) -> bool {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
        return false;
    };

    let flagged = |key: &str| map.get(key).and_then(Value::as_bool).unwrap_or(false);
    if flagged("capacityReached") || flagged("capacityExceeded") {
        return true;
    }

    ["error", "status"].iter().any(|key| {
        map.get(*key)
            .and_then(Value::as_str)
            .is_some_and(|s| {
                CAPACITY_MARKERS
                    .iter()
                    .any(|marker| s.trim().eq_ignore_ascii_case(marker))
            })
    })
}
