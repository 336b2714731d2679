//! 传输执行器：附加认证、按 bodyMode 编码、发送并归一化响应。
//!
//! # Transport Executor
//!
//! Executes a [`RequestSpec`] against the live API: one network attempt per
//! call, no retry. The [`RequestSender`] trait is the seam to the HTTP layer;
//! [`HttpTransport`] is the production implementation and tests substitute
//! their own.

mod config;
mod http;

pub use config::TransportConfig;
pub use http::HttpTransport;

use crate::request::{BinaryAttachment, RequestBody, RequestSpec};
use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

#[async_trait]
pub trait RequestSender: Send + Sync {
    /// Issue the request and return the normalized response body.
    ///
    /// Non-2xx statuses and transport faults are reported as `Error::Api`.
    async fn send(&self, request: &RequestSpec) -> Result<Value>;

    /// Raw GET of an arbitrary URL (no credential attached).
    async fn fetch_binary(&self, url: &str) -> Result<Bytes>;

    /// `GET /v1/user_info`, used to validate the configured credential.
    async fn verify_credentials(&self) -> Result<Value>;
}

/// Turn a textual response into a JSON value when it looks like an object.
///
/// Bodies starting with `{` are parsed; anything else, including a body that
/// fails to parse, is returned unchanged as a string.
pub fn normalize_response(text: &str) -> Value {
    if text.trim_start().starts_with('{') {
        if let Ok(parsed) = serde_json::from_str::<Value>(text) {
            return parsed;
        }
    }
    Value::String(text.to_string())
}

/// Download URL-sourced upload content so the request carries raw bytes.
pub async fn resolve_body(sender: &dyn RequestSender, request: RequestSpec) -> Result<RequestSpec> {
    match request.body {
        RequestBody::RemoteBinary { url, mime_type } => {
            let bytes = sender.fetch_binary(&url).await?;
            Ok(RequestSpec {
                body: RequestBody::Binary(BinaryAttachment::new(bytes, mime_type)),
                ..request
            })
        }
        _ => Ok(request),
    }
}

/// Resolve the body, then send. `Built -> Sent -> Succeeded | Failed`.
pub async fn execute_request(sender: &dyn RequestSender, request: RequestSpec) -> Result<Value> {
    let operation = request.operation;
    let request = resolve_body(sender, request)
        .await
        .map_err(|e| e.with_operation(operation.to_string()))?;
    sender
        .send(&request)
        .await
        .map_err(|e| e.with_operation(operation.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_text_is_parsed() {
        assert_eq!(normalize_response(r#"{"ok":true}"#), json!({ "ok": true }));
        assert_eq!(
            normalize_response("  {\"data\":{\"id\":1}}"),
            json!({ "data": { "id": 1 } })
        );
    }

    struct StaticSender;

    #[async_trait]
    impl RequestSender for StaticSender {
        async fn send(&self, _request: &RequestSpec) -> Result<Value> {
            Ok(Value::Null)
        }
        async fn fetch_binary(&self, _url: &str) -> Result<Bytes> {
            Ok(Bytes::from_static(b"downloaded"))
        }
        async fn verify_credentials(&self) -> Result<Value> {
            Ok(Value::Null)
        }
    }

    #[test]
    fn remote_body_is_resolved_to_bytes() {
        let spec = crate::operation::build_request(
            crate::operation::OperationKey::DocumentUpload,
            &crate::params::Item::new(
                crate::params::ParameterBag::new().with("fileUrl", "https://x.test/a.mp3"),
            ),
        )
        .unwrap();
        let resolved = tokio_test::block_on(resolve_body(&StaticSender, spec)).unwrap();
        match resolved.body {
            RequestBody::Binary(attachment) => {
                assert_eq!(&attachment.bytes[..], b"downloaded");
                assert_eq!(attachment.mime_type, "audio/mpeg");
            }
            other => panic!("expected binary body, got {:?}", other),
        }
    }

    #[test]
    fn other_text_is_kept() {
        assert_eq!(normalize_response("not json"), json!("not json"));
        assert_eq!(normalize_response("{broken"), json!("{broken"));
        assert_eq!(normalize_response("[1,2]"), json!("[1,2]"));
        assert_eq!(normalize_response(""), json!(""));
    }
}
