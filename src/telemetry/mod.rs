//! 请求观测：注入式结构化日志接口，凭据头在构造时即被脱敏。
//!
//! Request observation.
//!
//! The transport reports every outbound call to a [`RequestObserver`]. The
//! records it hands over are built from the final `reqwest::Request`, and the
//! only constructor redacts credential headers, so an observer can never see
//! the API key.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`RequestLog`] | Redacted view of one outbound request |
//! | [`ResponseLog`] | Status and timing of one completed call |
//! | [`TracingObserver`] | Default; forwards to `tracing` at debug level |
//! | [`NoopObserver`] | Drops everything |
//! | [`InMemoryObserver`] | Keeps records, for tests |

use crate::operation::OperationKey;
use crate::request::BodyMode;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::debug;

pub const REDACTED: &str = "***";

const SENSITIVE_HEADERS: &[&str] = &["x-api-key", "authorization", "proxy-authorization"];

/// Replace the value of every credential-bearing header with [`REDACTED`].
pub fn redact_headers<'a, I>(headers: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    headers
        .into_iter()
        .map(|(name, value)| {
            let lowered = name.to_ascii_lowercase();
            let value = if SENSITIVE_HEADERS.contains(&lowered.as_str()) {
                REDACTED.to_string()
            } else {
                value.to_string()
            };
            (lowered, value)
        })
        .collect()
}

/// Redacted view of one outbound request.
#[derive(Debug, Clone)]
pub struct RequestLog {
    pub request_id: String,
    /// `None` for calls outside the operation table (credential test, downloads).
    pub operation: Option<OperationKey>,
    pub method: String,
    pub url: String,
    pub body_mode: BodyMode,
    pub body_bytes: usize,
    headers: Vec<(String, String)>,
}

impl RequestLog {
    pub fn from_request(
        request_id: impl Into<String>,
        operation: Option<OperationKey>,
        body_mode: BodyMode,
        body_bytes: usize,
        request: &reqwest::Request,
    ) -> Self {
        let headers = redact_headers(
            request
                .headers()
                .iter()
                .map(|(name, value)| (name.as_str(), value.to_str().unwrap_or("<binary>"))),
        );
        Self {
            request_id: request_id.into(),
            operation,
            method: request.method().as_str().to_string(),
            url: request.url().to_string(),
            body_mode,
            body_bytes,
            headers,
        }
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Outcome of one call as seen by the transport.
#[derive(Debug, Clone)]
pub struct ResponseLog {
    pub request_id: String,
    pub operation: Option<OperationKey>,
    /// `None` when the call never produced an HTTP response.
    pub status: Option<u16>,
    pub duration: Duration,
    pub body_bytes: usize,
}

impl ResponseLog {
    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(s) if (200..300).contains(&s))
    }
}

pub trait RequestObserver: Send + Sync {
    fn on_request(&self, log: &RequestLog);
    fn on_response(&self, log: &ResponseLog);
}

pub struct NoopObserver;

impl RequestObserver for NoopObserver {
    fn on_request(&self, _log: &RequestLog) {}
    fn on_response(&self, _log: &ResponseLog) {}
}

pub struct TracingObserver;

impl RequestObserver for TracingObserver {
    fn on_request(&self, log: &RequestLog) {
        debug!(
            request_id = log.request_id.as_str(),
            operation = ?log.operation,
            method = log.method.as_str(),
            url = log.url.as_str(),
            body_mode = ?log.body_mode,
            body_bytes = log.body_bytes,
            headers = ?log.headers,
            "heygen request"
        );
    }

    fn on_response(&self, log: &ResponseLog) {
        debug!(
            request_id = log.request_id.as_str(),
            status = log.status,
            duration_ms = log.duration.as_millis() as u64,
            body_bytes = log.body_bytes,
            "heygen response"
        );
    }
}

pub fn default_observer() -> Arc<dyn RequestObserver> {
    Arc::new(TracingObserver)
}

/// Keeps every record; meant for tests.
#[derive(Default)]
pub struct InMemoryObserver {
    requests: RwLock<Vec<RequestLog>>,
    responses: RwLock<Vec<ResponseLog>>,
}

impl InMemoryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<RequestLog> {
        self.requests
            .read()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn responses(&self) -> Vec<ResponseLog> {
        self.responses
            .read()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl RequestObserver for InMemoryObserver {
    fn on_request(&self, log: &RequestLog) {
        if let Ok(mut requests) = self.requests.write() {
            requests.push(log.clone());
        }
    }

    fn on_response(&self, log: &ResponseLog) {
        if let Ok(mut responses) = self.responses.write() {
            responses.push(log.clone());
        }
    }
}
