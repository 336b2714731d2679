//! 请求构建器：把 (资源, 操作) 与条目参数翻译为 [`RequestSpec`]。
//!
//! # Request Builder
//!
//! Pure translation of one `(OperationKey, Item)` pair into a [`RequestSpec`].
//! No I/O happens here: URL-sourced uploads are described as
//! [`RequestBody::RemoteBinary`] and downloaded by the executor.
//!
//! ## Two stages
//!
//! | Stage | Function | Output |
//! |-------|----------|--------|
//! | Parse | [`Operation::from_item`] | typed parameters, validated |
//! | Encode | [`Operation::into_request`] | method, host, version, path, body |
//!
//! Every [`OperationKey`] maps to exactly one [`Operation`] variant; both
//! matches are exhaustive so a new operation cannot be half-wired.

mod document;
mod endpoint;
mod photo_avatar;
mod video;

pub use document::{UploadAsset, UploadSource};
pub use endpoint::{ApiVersion, Endpoint, HostPrefix, HttpMethod, USER_INFO};
pub use photo_avatar::{
    split_image_keys, AddLooks, AddMotion, CreateAvatarGroup, GenerateAvatarLooks, GeneratePhoto,
};
pub use video::{
    Background, Character, CreateVideo, CreateWebmVideo, Dimension, Offset, VideoScene, Voice,
    WebmInput,
};

use crate::params::{Item, ParameterBag};
use crate::request::{RequestBody, RequestSpec};
use crate::{Error, ErrorContext, Result};
use serde_json::json;
use std::fmt;

/// Top-level category of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Document,
    PhotoAvatar,
    Video,
}

impl Resource {
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Document => "document",
            Resource::PhotoAvatar => "photoAvatar",
            Resource::Video => "video",
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "document" => Ok(Resource::Document),
            "photoAvatar" => Ok(Resource::PhotoAvatar),
            "video" => Ok(Resource::Video),
            other => Err(Error::validation_with_context(
                format!("Unknown resource \"{}\"", other),
                ErrorContext::new()
                    .with_field_path("resource")
                    .with_source("request_builder"),
            )),
        }
    }
}

/// `(resource, operation)` pair selecting exactly one builder rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKey {
    DocumentUpload,
    GeneratePhoto,
    CheckGenerationStatus,
    CreateAvatarGroup,
    AddLooks,
    TrainAvatarGroup,
    GetTrainingStatus,
    GenerateAvatarLooks,
    GetAvatarDetails,
    AddMotion,
    AddSoundEffect,
    UpscaleAvatar,
    ListAllAvatars,
    ListAllVoices,
    ListAvatarGroups,
    CreateVideo,
    GetVideoStatus,
    CreateWebmVideo,
}

impl OperationKey {
    pub const ALL: &'static [OperationKey] = &[
        OperationKey::DocumentUpload,
        OperationKey::GeneratePhoto,
        OperationKey::CheckGenerationStatus,
        OperationKey::CreateAvatarGroup,
        OperationKey::AddLooks,
        OperationKey::TrainAvatarGroup,
        OperationKey::GetTrainingStatus,
        OperationKey::GenerateAvatarLooks,
        OperationKey::GetAvatarDetails,
        OperationKey::AddMotion,
        OperationKey::AddSoundEffect,
        OperationKey::UpscaleAvatar,
        OperationKey::ListAllAvatars,
        OperationKey::ListAllVoices,
        OperationKey::ListAvatarGroups,
        OperationKey::CreateVideo,
        OperationKey::GetVideoStatus,
        OperationKey::CreateWebmVideo,
    ];

    pub fn resource(self) -> Resource {
        match self {
            OperationKey::DocumentUpload => Resource::Document,
            OperationKey::CreateVideo
            | OperationKey::GetVideoStatus
            | OperationKey::CreateWebmVideo => Resource::Video,
            _ => Resource::PhotoAvatar,
        }
    }

    /// Operation name as the host declares it.
    pub fn name(self) -> &'static str {
        match self {
            OperationKey::DocumentUpload => "upload",
            OperationKey::GeneratePhoto => "generatePhoto",
            OperationKey::CheckGenerationStatus => "checkGenerationStatus",
            OperationKey::CreateAvatarGroup => "createAvatarGroup",
            OperationKey::AddLooks => "addLooks",
            OperationKey::TrainAvatarGroup => "trainAvatarGroup",
            OperationKey::GetTrainingStatus => "getTrainingStatus",
            OperationKey::GenerateAvatarLooks => "generateAvatarLooks",
            OperationKey::GetAvatarDetails => "getAvatarDetails",
            OperationKey::AddMotion => "addMotion",
            OperationKey::AddSoundEffect => "addSoundEffect",
            OperationKey::UpscaleAvatar => "upscaleAvatar",
            OperationKey::ListAllAvatars => "listAllAvatars",
            OperationKey::ListAllVoices => "listAllVoices",
            OperationKey::ListAvatarGroups => "listAvatarGroups",
            OperationKey::CreateVideo => "createVideo",
            OperationKey::GetVideoStatus => "getVideoStatus",
            OperationKey::CreateWebmVideo => "createWebmVideo",
        }
    }

    /// Resolve the host's `resource` / `operation` strings.
    pub fn parse(resource: &str, operation: &str) -> Result<Self> {
        let resource = Resource::parse(resource)?;
        OperationKey::ALL
            .iter()
            .copied()
            .find(|key| key.resource() == resource && key.name() == operation)
            .ok_or_else(|| {
                Error::validation_with_context(
                    format!(
                        "The operation \"{}\" is not known for resource \"{}\"",
                        operation,
                        resource.as_str()
                    ),
                    ErrorContext::new()
                        .with_field_path("operation")
                        .with_source("request_builder"),
                )
            })
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource().as_str(), self.name())
    }
}

/// Typed parameters of one operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    UploadAsset(UploadAsset),
    GeneratePhoto(GeneratePhoto),
    CheckGenerationStatus { generation_id: String },
    CreateAvatarGroup(CreateAvatarGroup),
    AddLooks(AddLooks),
    TrainAvatarGroup { group_id: String },
    GetTrainingStatus { group_id: String },
    GenerateAvatarLooks(GenerateAvatarLooks),
    GetAvatarDetails { avatar_id: String },
    AddMotion(AddMotion),
    AddSoundEffect { avatar_id: String },
    UpscaleAvatar { avatar_id: String },
    ListAllAvatars,
    ListAllVoices,
    ListAvatarGroups,
    CreateVideo(CreateVideo),
    GetVideoStatus { video_id: String },
    CreateWebmVideo(CreateWebmVideo),
}

impl Operation {
    pub fn key(&self) -> OperationKey {
        match self {
            Operation::UploadAsset(_) => OperationKey::DocumentUpload,
            Operation::GeneratePhoto(_) => OperationKey::GeneratePhoto,
            Operation::CheckGenerationStatus { .. } => OperationKey::CheckGenerationStatus,
            Operation::CreateAvatarGroup(_) => OperationKey::CreateAvatarGroup,
            Operation::AddLooks(_) => OperationKey::AddLooks,
            Operation::TrainAvatarGroup { .. } => OperationKey::TrainAvatarGroup,
            Operation::GetTrainingStatus { .. } => OperationKey::GetTrainingStatus,
            Operation::GenerateAvatarLooks(_) => OperationKey::GenerateAvatarLooks,
            Operation::GetAvatarDetails { .. } => OperationKey::GetAvatarDetails,
            Operation::AddMotion(_) => OperationKey::AddMotion,
            Operation::AddSoundEffect { .. } => OperationKey::AddSoundEffect,
            Operation::UpscaleAvatar { .. } => OperationKey::UpscaleAvatar,
            Operation::ListAllAvatars => OperationKey::ListAllAvatars,
            Operation::ListAllVoices => OperationKey::ListAllVoices,
            Operation::ListAvatarGroups => OperationKey::ListAvatarGroups,
            Operation::CreateVideo(_) => OperationKey::CreateVideo,
            Operation::GetVideoStatus { .. } => OperationKey::GetVideoStatus,
            Operation::CreateWebmVideo(_) => OperationKey::CreateWebmVideo,
        }
    }

    /// Parse and validate the parameters of `item` for `key`.
    pub fn from_item(key: OperationKey, item: &Item) -> Result<Self> {
        let params: &ParameterBag = &item.json;
        let operation = match key {
            OperationKey::DocumentUpload => Operation::UploadAsset(UploadAsset::from_item(item)?),
            OperationKey::GeneratePhoto => {
                Operation::GeneratePhoto(GeneratePhoto::from_params(params)?)
            }
            OperationKey::CheckGenerationStatus => Operation::CheckGenerationStatus {
                generation_id: params.required_str("generationId")?,
            },
            OperationKey::CreateAvatarGroup => {
                Operation::CreateAvatarGroup(CreateAvatarGroup::from_params(params)?)
            }
            OperationKey::AddLooks => Operation::AddLooks(AddLooks::from_params(params)?),
            OperationKey::TrainAvatarGroup => Operation::TrainAvatarGroup {
                group_id: params.required_str("groupId")?,
            },
            OperationKey::GetTrainingStatus => Operation::GetTrainingStatus {
                group_id: params.required_str("groupId")?,
            },
            OperationKey::GenerateAvatarLooks => {
                Operation::GenerateAvatarLooks(GenerateAvatarLooks::from_params(params)?)
            }
            OperationKey::GetAvatarDetails => Operation::GetAvatarDetails {
                avatar_id: params.required_str("avatarId")?,
            },
            OperationKey::AddMotion => Operation::AddMotion(AddMotion::from_params(params)?),
            OperationKey::AddSoundEffect => Operation::AddSoundEffect {
                avatar_id: params.required_str("avatarId")?,
            },
            OperationKey::UpscaleAvatar => Operation::UpscaleAvatar {
                avatar_id: params.required_str("avatarId")?,
            },
            OperationKey::ListAllAvatars => Operation::ListAllAvatars,
            OperationKey::ListAllVoices => Operation::ListAllVoices,
            OperationKey::ListAvatarGroups => Operation::ListAvatarGroups,
            OperationKey::CreateVideo => Operation::CreateVideo(CreateVideo::from_params(params)?),
            OperationKey::GetVideoStatus => Operation::GetVideoStatus {
                video_id: params.required_str("videoId")?,
            },
            OperationKey::CreateWebmVideo => {
                Operation::CreateWebmVideo(CreateWebmVideo::from_params(params)?)
            }
        };
        Ok(operation)
    }

    /// Encode into the wire-level request description.
    pub fn into_request(self) -> Result<RequestSpec> {
        let key = self.key();
        let endpoint = key.endpoint();
        let mut path = endpoint.path.to_string();
        let mut query = Vec::new();

        let body = match self {
            Operation::UploadAsset(upload) => upload.into_body(),
            Operation::GeneratePhoto(body) => RequestBody::Json(serde_json::to_value(body)?),
            Operation::CheckGenerationStatus { generation_id } => {
                path = endpoint.render("id", &path_segment("generationId", &generation_id)?);
                RequestBody::None
            }
            Operation::CreateAvatarGroup(body) => RequestBody::Json(serde_json::to_value(body)?),
            Operation::AddLooks(body) => RequestBody::Json(serde_json::to_value(body)?),
            Operation::TrainAvatarGroup { group_id } => {
                RequestBody::Json(json!({ "group_id": group_id }))
            }
            Operation::GetTrainingStatus { group_id } => {
                path = endpoint.render("groupId", &path_segment("groupId", &group_id)?);
                RequestBody::None
            }
            Operation::GenerateAvatarLooks(body) => RequestBody::Json(serde_json::to_value(body)?),
            Operation::GetAvatarDetails { avatar_id } => {
                path = endpoint.render("avatarId", &path_segment("avatarId", &avatar_id)?);
                RequestBody::None
            }
            Operation::AddMotion(body) => RequestBody::Json(serde_json::to_value(body)?),
            Operation::AddSoundEffect { avatar_id } | Operation::UpscaleAvatar { avatar_id } => {
                RequestBody::Json(json!({ "id": avatar_id }))
            }
            Operation::ListAllAvatars | Operation::ListAllVoices | Operation::ListAvatarGroups => {
                RequestBody::None
            }
            Operation::CreateVideo(body) => RequestBody::Json(serde_json::to_value(body)?),
            Operation::GetVideoStatus { video_id } => {
                query.push(("video_id".to_string(), video_id));
                RequestBody::None
            }
            Operation::CreateWebmVideo(body) => RequestBody::Json(serde_json::to_value(body)?),
        };

        Ok(RequestSpec {
            operation: key,
            method: endpoint.method,
            host: endpoint.host,
            version: endpoint.version,
            path,
            body,
            query,
        })
    }
}

/// Percent-encode an identifier as exactly one path segment.
///
/// `.` and `..` would be resolved away by URL normalization and are rejected.
fn path_segment(field: &str, value: &str) -> Result<String> {
    if value == "." || value == ".." {
        return Err(Error::validation_with_context(
            format!("Parameter \"{}\" is not a valid identifier", field),
            ErrorContext::new()
                .with_field_path(field)
                .with_details(format!("got \"{}\"", value))
                .with_source("request_builder"),
        ));
    }
    Ok(urlencoding::encode(value).into_owned())
}

/// Build the request for one item, tagging failures with the operation.
pub fn build_request(key: OperationKey, item: &Item) -> Result<RequestSpec> {
    Operation::from_item(key, item)
        .and_then(Operation::into_request)
        .map_err(|e| e.with_operation(key.to_string()))
}
