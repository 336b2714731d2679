use super::{normalize_response, RequestSender, TransportConfig};
use crate::credentials::{Credentials, API_KEY_HEADER};
use crate::operation::{ApiVersion, HostPrefix, HttpMethod, OperationKey, USER_INFO};
use crate::request::{BodyMode, FormPart, RequestBody, RequestSpec};
use crate::telemetry::{default_observer, RequestLog, RequestObserver, ResponseLog};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

pub struct HttpTransport {
    client: reqwest::Client,
    credentials: Credentials,
    base_url_override: Option<String>,
    observer: Arc<dyn RequestObserver>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url_override", &self.base_url_override)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl HttpTransport {
    pub fn new(credentials: Credentials, config: &TransportConfig) -> Result<Self> {
        Ok(Self {
            client: config.build_client()?,
            credentials,
            base_url_override: config
                .base_url_override
                .as_ref()
                .map(|u| u.trim_end_matches('/').to_string()),
            observer: default_observer(),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// `https://{host}.heygen.com/{version}{path}`, or the override base.
    fn url_for(&self, host: HostPrefix, version: ApiVersion, path: &str) -> String {
        let base = match &self.base_url_override {
            Some(base) => base.clone(),
            None => host.base_url(),
        };
        format!("{}/{}{}", base, version.as_str(), path)
    }

    fn encode_body(
        &self,
        builder: reqwest::RequestBuilder,
        body: &RequestBody,
    ) -> Result<reqwest::RequestBuilder> {
        Ok(match body {
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Binary(attachment) => builder
                .header(CONTENT_TYPE, attachment.mime_type.as_str())
                .body(attachment.bytes.clone()),
            RequestBody::RemoteBinary { url, .. } => {
                return Err(Error::configuration_with_context(
                    "Remote upload content must be downloaded before sending",
                    ErrorContext::new()
                        .with_details(url.clone())
                        .with_source("http_transport"),
                ));
            }
            RequestBody::FormData(parts) => builder.multipart(build_form(parts)?),
            RequestBody::None => builder,
        })
    }

    /// Single attempt: send, report to the observer, classify the status.
    async fn dispatch(
        &self,
        request: reqwest::Request,
        operation: Option<OperationKey>,
        body_mode: BodyMode,
        body_bytes: usize,
    ) -> Result<Bytes> {
        let request_id = Uuid::new_v4().to_string();
        let method = request.method().clone();
        let url = request.url().clone();
        self.observer.on_request(&RequestLog::from_request(
            request_id.as_str(),
            operation,
            body_mode,
            body_bytes,
            &request,
        ));

        let start = Instant::now();
        let outcome = self.client.execute(request).await;
        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                self.observer.on_response(&ResponseLog {
                    request_id: request_id.clone(),
                    operation,
                    status: None,
                    duration: start.elapsed(),
                    body_bytes: 0,
                });
                return Err(Error::Api {
                    status: None,
                    message: format!("{} {} failed: {}", method, url.path(), e),
                    body: None,
                    context: ErrorContext::new()
                        .with_details(format!("request_id: {}", request_id))
                        .with_source("http_transport"),
                });
            }
        };

        let status = response.status();
        let body = response.bytes().await.map_err(|e| Error::Api {
            status: Some(status.as_u16()),
            message: format!("Failed to read response of {} {}: {}", method, url.path(), e),
            body: None,
            context: ErrorContext::new()
                .with_details(format!("request_id: {}", request_id))
                .with_source("http_transport"),
        })?;

        self.observer.on_response(&ResponseLog {
            request_id: request_id.clone(),
            operation,
            status: Some(status.as_u16()),
            duration: start.elapsed(),
            body_bytes: body.len(),
        });

        if !status.is_success() {
            return Err(Error::Api {
                status: Some(status.as_u16()),
                message: format!("{} {} returned {}", method, url.path(), status),
                body: Some(String::from_utf8_lossy(&body).into_owned()),
                context: ErrorContext::new()
                    .with_details(format!("request_id: {}", request_id))
                    .with_source("http_transport"),
            });
        }

        Ok(body)
    }

    fn build(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Request> {
        builder
            .build()
            .map_err(|e| Error::configuration(format!("Invalid request: {}", e)))
    }
}

fn build_form(parts: &[FormPart]) -> Result<reqwest::multipart::Form> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
            FormPart::File { name, attachment } => {
                let mut file = reqwest::multipart::Part::bytes(attachment.bytes.to_vec())
                    .mime_str(&attachment.mime_type)
                    .map_err(|e| {
                        Error::validation_with_context(
                            format!("Invalid MIME type \"{}\": {}", attachment.mime_type, e),
                            ErrorContext::new()
                                .with_field_path(name.clone())
                                .with_source("http_transport"),
                        )
                    })?;
                if let Some(file_name) = &attachment.file_name {
                    file = file.file_name(file_name.clone());
                }
                form.part(name.clone(), file)
            }
        };
    }
    Ok(form)
}

#[async_trait]
impl RequestSender for HttpTransport {
    async fn send(&self, request: &RequestSpec) -> Result<Value> {
        let url = self.url_for(request.host, request.version, &request.path);
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };
        builder = builder.header(API_KEY_HEADER, self.credentials.header_value()?);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = self.encode_body(builder, &request.body)?;

        let body = self
            .dispatch(
                self.build(builder)?,
                Some(request.operation),
                request.body_mode(),
                request.body.size_hint(),
            )
            .await?;
        Ok(normalize_response(&String::from_utf8_lossy(&body)))
    }

    async fn fetch_binary(&self, url: &str) -> Result<Bytes> {
        let parsed = url::Url::parse(url).map_err(|e| {
            Error::validation_with_context(
                format!("Invalid file URL \"{}\": {}", url, e),
                ErrorContext::new()
                    .with_field_path("fileUrl")
                    .with_source("http_transport"),
            )
        })?;
        let request = self.build(self.client.get(parsed))?;
        let body = self.dispatch(request, None, BodyMode::None, 0).await?;
        Ok(body)
    }

    async fn verify_credentials(&self) -> Result<Value> {
        let url = self.url_for(USER_INFO.host, USER_INFO.version, USER_INFO.path);
        let builder = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, self.credentials.header_value()?);
        let body = self
            .dispatch(self.build(builder)?, None, BodyMode::None, 0)
            .await?;
        Ok(normalize_response(&String::from_utf8_lossy(&body)))
    }
}
