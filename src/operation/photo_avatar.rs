//! Photo avatar pipeline: photo generation, groups, looks, training, effects.

use crate::params::ParameterBag;
use crate::Result;
use serde::Serialize;

/// Body of `photoAvatar.generatePhoto`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratePhoto {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub ethnicity: String,
    pub orientation: String,
    pub pose: String,
    pub style: String,
    pub appearance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_id: Option<String>,
}

impl GeneratePhoto {
    pub(crate) fn from_params(params: &ParameterBag) -> Result<Self> {
        Ok(Self {
            name: params.required_str("name")?,
            age: params.str_or("age", "Young Adult")?,
            gender: params.str_or("gender", "Man")?,
            ethnicity: params.str_or("ethnicity", "Unspecified")?,
            orientation: params.str_or("orientation", "vertical")?,
            pose: params.str_or("pose", "close_up")?,
            style: params.str_or("style", "Realistic")?,
            appearance: params.str_or(
                "appearance",
                "Professional looking person with a warm smile",
            )?,
            callback_url: params.optional_str("callbackUrl")?,
            callback_id: params.optional_str("callbackId")?,
        })
    }
}

/// Body of `photoAvatar.createAvatarGroup`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateAvatarGroup {
    /// Supplied as `groupName`.
    pub name: String,
    /// Supplied as `imageKey`.
    pub image_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_id: Option<String>,
}

impl CreateAvatarGroup {
    pub(crate) fn from_params(params: &ParameterBag) -> Result<Self> {
        Ok(Self {
            name: params.required_str("groupName")?,
            image_key: params.required_str("imageKey")?,
            generation_id: params.optional_str("generationId")?,
        })
    }
}

/// Body of `photoAvatar.addLooks`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddLooks {
    pub group_id: String,
    pub image_keys: Vec<String>,
    /// Supplied as `lookName`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_id: Option<String>,
}

impl AddLooks {
    pub(crate) fn from_params(params: &ParameterBag) -> Result<Self> {
        Ok(Self {
            group_id: params.required_str("groupId")?,
            image_keys: split_image_keys(&params.required_str("imageKeys")?),
            name: params.optional_str("lookName")?,
            generation_id: params.optional_str("generationId")?,
        })
    }
}

/// Split a comma-separated key list, trimming each segment.
///
/// Empty segments (e.g. from a trailing comma) are kept as empty strings.
pub fn split_image_keys(keys: &str) -> Vec<String> {
    keys.split(',').map(|key| key.trim().to_string()).collect()
}

/// Body of `photoAvatar.generateAvatarLooks`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateAvatarLooks {
    pub group_id: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl GenerateAvatarLooks {
    pub(crate) fn from_params(params: &ParameterBag) -> Result<Self> {
        Ok(Self {
            group_id: params.required_str("groupId")?,
            prompt: params.required_str("prompt")?,
            orientation: params.optional_str("orientation")?,
            pose: params.optional_str("pose")?,
            style: params.optional_str("style")?,
        })
    }
}

/// Body of `photoAvatar.addMotion`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddMotion {
    /// Supplied as `avatarId`.
    pub id: String,
    pub prompt: String,
}

impl AddMotion {
    pub(crate) fn from_params(params: &ParameterBag) -> Result<Self> {
        Ok(Self {
            id: params.required_str("avatarId")?,
            prompt: params.required_str("prompt")?,
        })
    }
}
