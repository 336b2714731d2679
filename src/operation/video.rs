//! Video generation: multi-scene studio videos and WebM avatar clips.

use crate::params::ParameterBag;
use crate::{Error, ErrorContext, Result};
use serde::Serialize;

const SCENES_PATH: &str = "videoInput.videoInputValues";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

impl Default for Dimension {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Dimension {
    /// Read `{name}.dimensionValues`, falling back to 1280x720.
    fn from_params(params: &ParameterBag, name: &str) -> Result<Self> {
        let defaults = Self::default();
        match params.record(&format!("{}.dimensionValues", name))? {
            None => Ok(defaults),
            Some(values) => Ok(Self {
                width: values.u32_or("width", defaults.width)?,
                height: values.u32_or("height", defaults.height)?,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    fn from_params(params: &ParameterBag) -> Result<Self> {
        Ok(Self {
            x: params.f64_or("offsetX", 0.0)?,
            y: params.f64_or("offsetY", 0.0)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Character {
    Avatar {
        avatar_id: String,
        scale: f64,
        avatar_style: String,
        offset: Offset,
    },
    TalkingPhoto {
        talking_photo_id: String,
        scale: f64,
        talking_photo_style: String,
        offset: Offset,
        talking_style: String,
        expression: String,
    },
}

impl Character {
    fn from_params(params: &ParameterBag) -> Result<Self> {
        match params.str_or("characterType", "avatar")?.as_str() {
            "avatar" => Ok(Character::Avatar {
                avatar_id: params.required_str("avatarId")?,
                scale: params.f64_or("scale", 1.0)?,
                avatar_style: optional_or(params, "avatarStyle", "normal")?,
                offset: Offset::from_params(params)?,
            }),
            "talking_photo" => Ok(Character::TalkingPhoto {
                talking_photo_id: params.required_str("talkingPhotoId")?,
                scale: params.f64_or("scale", 1.0)?,
                talking_photo_style: optional_or(params, "talkingPhotoStyle", "square")?,
                offset: Offset::from_params(params)?,
                talking_style: optional_or(params, "talkingStyle", "stable")?,
                expression: optional_or(params, "expression", "default")?,
            }),
            other => Err(unknown_variant(params, "characterType", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Voice {
    Text {
        voice_id: String,
        input_text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        locale: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        emotion: Option<String>,
        speed: f64,
    },
    Audio {
        audio_url: String,
    },
    Silence {
        duration: f64,
    },
}

impl Voice {
    fn from_params(params: &ParameterBag) -> Result<Self> {
        match params.str_or("voiceType", "text")?.as_str() {
            "text" => Ok(Voice::Text {
                voice_id: params.required_str("voiceId")?,
                input_text: params.required_str("inputText")?,
                locale: params.optional_str("locale")?,
                emotion: params.optional_str("emotion")?,
                speed: params.f64_or("speed", 1.0)?,
            }),
            "audio" => Ok(Voice::Audio {
                audio_url: params.required_str("audioUrl")?,
            }),
            "silence" => Ok(Voice::Silence {
                duration: params.f64_or("duration", 1.0)?,
            }),
            other => Err(unknown_variant(params, "voiceType", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Background {
    Color {
        value: String,
    },
    Image {
        url: String,
        fit: String,
    },
    Video {
        url: String,
        play_style: String,
        fit: String,
    },
}

impl Background {
    fn from_params(params: &ParameterBag) -> Result<Self> {
        match params.str_or("backgroundType", "color")?.as_str() {
            "color" => Ok(Background::Color {
                value: optional_or(params, "backgroundColor", "#f6f6fc")?,
            }),
            "image" => Ok(Background::Image {
                url: params.required_str("backgroundImageUrl")?,
                fit: optional_or(params, "backgroundFit", "cover")?,
            }),
            "video" => Ok(Background::Video {
                url: params.required_str("backgroundVideoUrl")?,
                play_style: optional_or(params, "backgroundPlayStyle", "fit_to_scene")?,
                fit: optional_or(params, "backgroundFit", "cover")?,
            }),
            other => Err(unknown_variant(params, "backgroundType", other)),
        }
    }
}

/// One scene of a studio video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoScene {
    pub character: Character,
    pub voice: Voice,
    pub background: Background,
}

impl VideoScene {
    fn from_params(params: &ParameterBag) -> Result<Self> {
        Ok(Self {
            character: Character::from_params(params)?,
            voice: Voice::from_params(params)?,
            background: Background::from_params(params)?,
        })
    }
}

/// Body of `video.createVideo`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateVideo {
    pub caption: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    pub dimension: Dimension,
    pub video_inputs: Vec<VideoScene>,
}

impl CreateVideo {
    pub(crate) fn from_params(params: &ParameterBag) -> Result<Self> {
        let scenes = params.collection(SCENES_PATH)?;
        if scenes.is_empty() {
            return Err(Error::validation_with_context(
                "At least one video input scene is required",
                ErrorContext::new()
                    .with_field_path(SCENES_PATH)
                    .with_source("request_builder"),
            ));
        }
        let video_inputs = scenes
            .iter()
            .map(VideoScene::from_params)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            caption: params.bool_or("caption", false)?,
            title: params.optional_str("title")?,
            callback_id: params.optional_str("callbackId")?,
            callback_url: params.optional_str("callbackUrl")?,
            folder_id: params.optional_str("folderId")?,
            dimension: Dimension::from_params(params, "dimension")?,
            video_inputs,
        })
    }
}

/// Speech source of a WebM clip.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WebmInput {
    Text {
        input_text: String,
        voice_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        locale: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        emotion: Option<String>,
    },
    Audio {
        input_audio: String,
    },
}

/// Body of `video.createWebmVideo`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateWebmVideo {
    pub avatar_pose_id: String,
    pub avatar_style: String,
    #[serde(flatten)]
    pub input: WebmInput,
    pub dimension: Dimension,
}

impl CreateWebmVideo {
    pub(crate) fn from_params(params: &ParameterBag) -> Result<Self> {
        let input = match params.str_or("inputMethod", "text")?.as_str() {
            "text" => WebmInput::Text {
                input_text: params
                    .str_or("inputText", "This is a WebM video generated by HeyGen API")?,
                voice_id: params.str_or("voiceId", "1bd001e7e50f421d891986aad5158bc8")?,
                locale: params.optional_str("locale")?,
                emotion: params.optional_str("emotion")?,
            },
            "audio" => WebmInput::Audio {
                input_audio: params.required_str("inputAudio")?,
            },
            other => return Err(unknown_variant(params, "inputMethod", other)),
        };

        Ok(Self {
            avatar_pose_id: params.str_or("avatarPoseId", "Vanessa-invest-20220722")?,
            avatar_style: params.str_or("avatarStyle", "normal")?,
            input,
            dimension: Dimension::from_params(params, "webmDimension")?,
        })
    }
}

/// Scene styling fields fall back to their default when unset or empty.
fn optional_or(params: &ParameterBag, name: &str, default: &str) -> Result<String> {
    Ok(params
        .optional_str(name)?
        .unwrap_or_else(|| default.to_string()))
}

fn unknown_variant(params: &ParameterBag, name: &str, value: &str) -> Error {
    Error::validation_with_context(
        format!("Unknown {} \"{}\"", name, value),
        ErrorContext::new()
            .with_field_path(params.field_path(name))
            .with_source("request_builder"),
    )
}
