//! HTTP client settings, env-overridable.

use crate::{Error, ErrorContext, Result};
use reqwest::Proxy;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
    pub proxy_url: Option<String>,
    /// Replaces `https://{host}.heygen.com`; the `/{version}{path}` suffix is kept.
    /// Primarily for testing against mock servers.
    pub base_url_override: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 8,
            pool_idle_timeout: Duration::from_secs(90),
            proxy_url: None,
            base_url_override: None,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse::<T>().ok())
}

impl TransportConfig {
    /// Defaults with `HEYGEN_HTTP_*` / `HEYGEN_PROXY_URL` overrides applied.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout: env_parse::<u64>("HEYGEN_HTTP_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            pool_max_idle_per_host: env_parse::<usize>("HEYGEN_HTTP_POOL_MAX_IDLE_PER_HOST")
                .unwrap_or(defaults.pool_max_idle_per_host),
            pool_idle_timeout: env_parse::<u64>("HEYGEN_HTTP_POOL_IDLE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.pool_idle_timeout),
            proxy_url: env::var("HEYGEN_PROXY_URL").ok().filter(|s| !s.is_empty()),
            base_url_override: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_proxy(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    pub fn with_base_url_override(mut self, url: impl Into<String>) -> Self {
        self.base_url_override = Some(url.into());
        self
    }

    pub(crate) fn build_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .pool_idle_timeout(Some(self.pool_idle_timeout));

        if let Some(proxy_url) = &self.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("Invalid proxy URL: {}", e),
                    ErrorContext::new()
                        .with_field_path("proxy_url")
                        .with_source("transport_config"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        builder
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_methods() {
        let cfg = TransportConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_base_url_override("http://127.0.0.1:9999");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.base_url_override.as_deref(), Some("http://127.0.0.1:9999"));
        assert!(cfg.build_client().is_ok());
    }

    #[test]
    fn invalid_proxy_is_a_configuration_error() {
        let cfg = TransportConfig::default().with_proxy("::not a url::");
        assert!(matches!(
            cfg.build_client(),
            Err(Error::Configuration { .. })
        ));
    }
}
