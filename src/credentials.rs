//! 凭据：API Key 的解析（显式值 → 系统钥匙串 → 环境变量）与安全持有。
//!
//! API key handling.

use crate::{Error, Result};
use keyring::Entry;
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use std::env;

pub const API_KEY_HEADER: &str = "X-Api-Key";
pub const API_KEY_ENV: &str = "HEYGEN_API_KEY";
const KEYRING_SERVICE: &str = "heygen";
const KEYRING_USER: &str = "api_key";

/// The single credential shared read-only by every item of a batch.
#[derive(Clone, Debug)]
pub struct Credentials {
    api_key: SecretString,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Credentials("API key must not be empty".to_string()));
        }
        Ok(Self {
            api_key: SecretString::from(api_key),
        })
    }

    /// Resolve the key: explicit value, then OS keyring, then `HEYGEN_API_KEY`.
    pub fn resolve(explicit: Option<String>) -> Result<Self> {
        if let Some(key) = explicit {
            return Self::new(key);
        }
        if let Some(key) = Self::from_keyring() {
            return Ok(key);
        }
        match env::var(API_KEY_ENV) {
            Ok(key) => Self::new(key),
            Err(_) => Err(Error::Credentials(format!(
                "No API key configured; pass one explicitly, store it in the keyring \
                 (service \"{}\", user \"{}\") or set {}",
                KEYRING_SERVICE, KEYRING_USER, API_KEY_ENV
            ))),
        }
    }

    fn from_keyring() -> Option<Self> {
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_USER).ok()?;
        let key = entry.get_password().ok()?;
        Self::new(key).ok()
    }

    /// Header value for `X-Api-Key`, flagged sensitive so `reqwest` never prints it.
    pub(crate) fn header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(self.api_key.expose_secret())
            .map_err(|_| Error::Credentials("API key contains invalid characters".to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}
