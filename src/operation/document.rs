//! Asset upload (`document.upload`).

use crate::params::Item;
use crate::request::{mime_type_from_url, BinaryAttachment, RequestBody};
use crate::{Error, ErrorContext, Result};

/// Where the uploaded bytes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadSource {
    /// Binary payload already attached to the input item.
    Attachment(BinaryAttachment),
    /// File to download first; the MIME type is inferred from the URL.
    Url { url: String, mime_type: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadAsset {
    pub source: UploadSource,
}

impl UploadAsset {
    pub(crate) fn from_item(item: &Item) -> Result<Self> {
        let params = &item.json;

        let source = if params.bool_or("binaryData", false)? {
            let property = params.str_or("binaryPropertyName", "data")?;
            let binary = item.binary_property(&property)?;
            let mut attachment =
                BinaryAttachment::new(binary.decode()?, binary.mime_type.clone());
            if let Some(name) = &binary.file_name {
                attachment = attachment.with_file_name(name.clone());
            }
            UploadSource::Attachment(attachment)
        } else {
            let url = params.optional_str("fileUrl")?.ok_or_else(|| {
                Error::validation_with_context(
                    "File URL is required!",
                    ErrorContext::new()
                        .with_field_path("fileUrl")
                        .with_source("request_builder"),
                )
            })?;
            let mime_type = mime_type_from_url(&url).to_string();
            UploadSource::Url { url, mime_type }
        };

        Ok(Self { source })
    }

    pub(crate) fn into_body(self) -> RequestBody {
        match self.source {
            UploadSource::Attachment(attachment) => RequestBody::Binary(attachment),
            UploadSource::Url { url, mime_type } => RequestBody::RemoteBinary { url, mime_type },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{BinaryData, ParameterBag};
    use serde_json::json;

    fn params(value: serde_json::Value) -> ParameterBag {
        ParameterBag::from_value(value).unwrap()
    }

    #[test]
    fn attached_binary_is_decoded() {
        let item = Item::new(params(json!({ "binaryData": true, "binaryPropertyName": "file" })))
            .with_binary(
                "file",
                BinaryData::new(b"\x89PNG", "image/png").with_file_name("a.png"),
            );
        let upload = UploadAsset::from_item(&item).unwrap();
        match upload.source {
            UploadSource::Attachment(a) => {
                assert_eq!(&a.bytes[..], b"\x89PNG");
                assert_eq!(a.mime_type, "image/png");
                assert_eq!(a.file_name.as_deref(), Some("a.png"));
            }
            other => panic!("unexpected source {:?}", other),
        }
    }

    #[test]
    fn default_property_name_is_data() {
        let item = Item::new(params(json!({ "binaryData": true })))
            .with_binary("data", BinaryData::new(b"abc", "text/plain"));
        assert!(UploadAsset::from_item(&item).is_ok());
    }

    #[test]
    fn missing_item_binary() {
        let item = Item::new(params(json!({ "binaryData": true })));
        let err = UploadAsset::from_item(&item).unwrap_err();
        assert!(matches!(err, Error::MissingBinary { .. }));
        assert_eq!(err.record_message(), "No binary data exists on item!");
    }

    #[test]
    fn url_source_infers_mime() {
        let item = Item::new(params(json!({ "fileUrl": "https://x.test/clip.webm" })));
        let upload = UploadAsset::from_item(&item).unwrap();
        assert_eq!(
            upload.into_body(),
            RequestBody::RemoteBinary {
                url: "https://x.test/clip.webm".to_string(),
                mime_type: "video/webm".to_string(),
            }
        );
    }

    #[test]
    fn empty_url_is_rejected() {
        let item = Item::new(params(json!({ "binaryData": false, "fileUrl": "" })));
        let err = UploadAsset::from_item(&item).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(err.record_message(), "File URL is required!");
    }
}
