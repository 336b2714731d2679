//! Normalized description of one outbound call.

use crate::operation::{ApiVersion, HostPrefix, HttpMethod, OperationKey};
use bytes::Bytes;
use serde_json::Value;

/// How the request body is encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    Json,
    Binary,
    FormData,
    None,
}

/// Raw bytes plus the MIME type they are sent with.
#[derive(Clone, PartialEq)]
pub struct BinaryAttachment {
    pub bytes: Bytes,
    pub mime_type: String,
    pub file_name: Option<String>,
}

impl BinaryAttachment {
    pub fn new(bytes: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Payloads can be large; never dump them into logs.
impl std::fmt::Debug for BinaryAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryAttachment")
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

/// One field of a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, attachment: BinaryAttachment },
}

/// Request payload, tagged by encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Binary(BinaryAttachment),
    /// Binary content that still has to be downloaded from `url` before the
    /// request can be sent. The executor resolves it into [`RequestBody::Binary`].
    RemoteBinary { url: String, mime_type: String },
    FormData(Vec<FormPart>),
    None,
}

impl RequestBody {
    pub fn mode(&self) -> BodyMode {
        match self {
            RequestBody::Json(_) => BodyMode::Json,
            RequestBody::Binary(_) | RequestBody::RemoteBinary { .. } => BodyMode::Binary,
            RequestBody::FormData(_) => BodyMode::FormData,
            RequestBody::None => BodyMode::None,
        }
    }

    /// Approximate payload size for logs.
    pub fn size_hint(&self) -> usize {
        match self {
            RequestBody::Json(value) => value.to_string().len(),
            RequestBody::Binary(attachment) => attachment.len(),
            RequestBody::RemoteBinary { .. } | RequestBody::None => 0,
            RequestBody::FormData(parts) => parts
                .iter()
                .map(|p| match p {
                    FormPart::Text { value, .. } => value.len(),
                    FormPart::File { attachment, .. } => attachment.len(),
                })
                .sum(),
        }
    }
}

/// Builder output: everything the executor needs to issue one call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub operation: OperationKey,
    pub method: HttpMethod,
    pub host: HostPrefix,
    pub version: ApiVersion,
    /// Path with identifiers already interpolated.
    pub path: String,
    pub body: RequestBody,
    pub query: Vec<(String, String)>,
}

impl RequestSpec {
    pub fn body_mode(&self) -> BodyMode {
        self.body.mode()
    }

    /// `/{version}{path}`, the part of the URL below the host.
    pub fn versioned_path(&self) -> String {
        format!("/{}{}", self.version.as_str(), self.path)
    }

    /// Canonical URL `https://{host}.heygen.com/{version}{path}` (query excluded).
    pub fn url(&self) -> String {
        format!("{}{}", self.host.base_url(), self.versioned_path())
    }
}

const MIME_BY_SUFFIX: &[(&str, &str)] = &[
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".png", "image/png"),
    (".mp4", "video/mp4"),
    (".webm", "video/webm"),
    (".mp3", "audio/mpeg"),
];

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Infer the upload MIME type from a file URL's extension.
///
/// The extension is read from the URL path when the URL parses, so query
/// strings and fragments do not hide it. Matching is case-insensitive.
pub fn mime_type_from_url(file_url: &str) -> &'static str {
    let path = url::Url::parse(file_url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| file_url.to_string());
    let path = path.to_ascii_lowercase();

    MIME_BY_SUFFIX
        .iter()
        .find(|(suffix, _)| path.ends_with(suffix))
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_MIME_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_suffix_table() {
        assert_eq!(mime_type_from_url("https://cdn.example.com/a.jpg"), "image/jpeg");
        assert_eq!(mime_type_from_url("https://cdn.example.com/a.jpeg"), "image/jpeg");
        assert_eq!(mime_type_from_url("https://cdn.example.com/a.png"), "image/png");
        assert_eq!(mime_type_from_url("https://cdn.example.com/a.mp4"), "video/mp4");
        assert_eq!(mime_type_from_url("https://cdn.example.com/a.webm"), "video/webm");
        assert_eq!(mime_type_from_url("https://cdn.example.com/a.mp3"), "audio/mpeg");
        assert_eq!(
            mime_type_from_url("https://cdn.example.com/a.gif"),
            DEFAULT_MIME_TYPE
        );
    }

    #[test]
    fn mime_ignores_query_and_case() {
        assert_eq!(
            mime_type_from_url("https://cdn.example.com/Photo.PNG?sig=abc"),
            "image/png"
        );
        assert_eq!(mime_type_from_url("not a url.mp3"), "audio/mpeg");
    }

    #[test]
    fn attachment_debug_hides_bytes() {
        let attachment = BinaryAttachment::new(vec![1u8, 2, 3], "image/png");
        let text = format!("{:?}", attachment);
        assert!(text.contains("len: 3"));
        assert!(!text.contains("[1, 2, 3]"));
    }
}
