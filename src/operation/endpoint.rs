//! Endpoint table: the wire location of every operation.

use super::OperationKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Sub-domain of `heygen.com` the call goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostPrefix {
    Api,
    Upload,
}

impl HostPrefix {
    pub fn as_str(self) -> &'static str {
        match self {
            HostPrefix::Api => "api",
            HostPrefix::Upload => "upload",
        }
    }

    pub fn base_url(self) -> String {
        format!("https://{}.heygen.com", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    V1,
    V2,
}

impl ApiVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }
}

/// Fixed `(method, host, version, path)` tuple of one operation.
///
/// `path` may contain one `{name}` placeholder that is filled from the
/// operation's identifier parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub host: HostPrefix,
    pub version: ApiVersion,
    pub path: &'static str,
}

impl Endpoint {
    const fn new(
        method: HttpMethod,
        host: HostPrefix,
        version: ApiVersion,
        path: &'static str,
    ) -> Self {
        Self {
            method,
            host,
            version,
            path,
        }
    }

    /// Replace `{name}` in the path template with `value`, which must already be
    /// encoded as a single segment.
    pub fn render(&self, name: &str, value: &str) -> String {
        self.path.replace(&format!("{{{}}}", name), value)
    }
}

/// Credential check, outside the operation table.
pub const USER_INFO: Endpoint = Endpoint::new(
    HttpMethod::Get,
    HostPrefix::Api,
    ApiVersion::V1,
    "/user_info",
);

impl OperationKey {
    pub const fn endpoint(self) -> Endpoint {
        use ApiVersion::*;
        use HostPrefix::*;
        use HttpMethod::*;

        match self {
            OperationKey::DocumentUpload => Endpoint::new(Post, Upload, V1, "/asset"),
            OperationKey::GeneratePhoto => {
                Endpoint::new(Post, Api, V2, "/photo_avatar/photo/generate")
            }
            OperationKey::CheckGenerationStatus => {
                Endpoint::new(Get, Api, V2, "/photo_avatar/generation/{id}")
            }
            OperationKey::CreateAvatarGroup => {
                Endpoint::new(Post, Api, V2, "/photo_avatar/avatar_group/create")
            }
            OperationKey::AddLooks => {
                Endpoint::new(Post, Api, V2, "/photo_avatar/avatar_group/add")
            }
            OperationKey::TrainAvatarGroup => Endpoint::new(Post, Api, V2, "/photo_avatar/train"),
            OperationKey::GetTrainingStatus => {
                Endpoint::new(Get, Api, V2, "/photo_avatar/train/status/{groupId}")
            }
            OperationKey::GenerateAvatarLooks => {
                Endpoint::new(Post, Api, V2, "/photo_avatar/look/generate")
            }
            OperationKey::GetAvatarDetails => {
                Endpoint::new(Get, Api, V2, "/photo_avatar/{avatarId}")
            }
            OperationKey::AddMotion => Endpoint::new(Post, Api, V2, "/photo_avatar/add_motion"),
            OperationKey::AddSoundEffect => {
                Endpoint::new(Post, Api, V2, "/photo_avatar/add_sound_effect")
            }
            OperationKey::UpscaleAvatar => Endpoint::new(Post, Api, V2, "/photo_avatar/upscale"),
            OperationKey::ListAllAvatars => Endpoint::new(Get, Api, V2, "/avatars"),
            OperationKey::ListAllVoices => Endpoint::new(Get, Api, V2, "/voices"),
            OperationKey::ListAvatarGroups => Endpoint::new(Get, Api, V2, "/avatar_group.list"),
            OperationKey::CreateVideo => Endpoint::new(Post, Api, V2, "/video/generate"),
            OperationKey::GetVideoStatus => Endpoint::new(Get, Api, V1, "/video_status.get"),
            OperationKey::CreateWebmVideo => Endpoint::new(Post, Api, V1, "/video.webm"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_fills_placeholder() {
        let ep = OperationKey::GetTrainingStatus.endpoint();
        assert_eq!(ep.render("groupId", "g-1"), "/photo_avatar/train/status/g-1");
    }

    #[test]
    fn upload_is_the_only_upload_host_operation() {
        for key in OperationKey::ALL {
            let expected = if *key == OperationKey::DocumentUpload {
                HostPrefix::Upload
            } else {
                HostPrefix::Api
            };
            assert_eq!(key.endpoint().host, expected, "{}", key);
        }
    }

    #[test]
    fn user_info_url() {
        assert_eq!(
            format!(
                "{}/{}{}",
                USER_INFO.host.base_url(),
                USER_INFO.version.as_str(),
                USER_INFO.path
            ),
            "https://api.heygen.com/v1/user_info"
        );
    }
}
