use crate::batch::{BatchExecutor, BatchExecutorConfig};
use crate::client::core::HeyGenClient;
use crate::credentials::Credentials;
use crate::telemetry::{default_observer, RequestObserver};
use crate::transport::{HttpTransport, RequestSender, TransportConfig};
use crate::Result;
use std::sync::Arc;

/// Builder for [`HeyGenClient`].
pub struct HeyGenClientBuilder {
    api_key: Option<String>,
    transport_config: Option<TransportConfig>,
    base_url_override: Option<String>,
    observer: Arc<dyn RequestObserver>,
    continue_on_fail: bool,
    sender: Option<Arc<dyn RequestSender>>,
}

impl HeyGenClientBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            transport_config: None,
            base_url_override: None,
            observer: default_observer(),
            continue_on_fail: false,
            sender: None,
        }
    }

    /// Use this key instead of the keyring / `HEYGEN_API_KEY` lookup.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// HTTP settings. Defaults to [`TransportConfig::from_env`].
    pub fn transport_config(mut self, config: TransportConfig) -> Self {
        self.transport_config = Some(config);
        self
    }

    /// Replace `https://{host}.heygen.com` (primarily for mock servers).
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// Inject a request observer. Default forwards to `tracing`.
    pub fn observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn continue_on_fail(mut self, enable: bool) -> Self {
        self.continue_on_fail = enable;
        self
    }

    /// Send through a custom implementation instead of the HTTP transport.
    ///
    /// Credentials and transport settings are not consulted in that case.
    pub fn sender(mut self, sender: Arc<dyn RequestSender>) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn build(self) -> Result<HeyGenClient> {
        let executor = BatchExecutor::with_config(
            BatchExecutorConfig::new().with_continue_on_fail(self.continue_on_fail),
        );

        let sender = match self.sender {
            Some(sender) => sender,
            None => {
                let credentials = Credentials::resolve(self.api_key)?;
                let mut config = self.transport_config.unwrap_or_else(TransportConfig::from_env);
                if let Some(base_url) = self.base_url_override {
                    config = config.with_base_url_override(base_url);
                }
                Arc::new(HttpTransport::new(credentials, &config)?.with_observer(self.observer))
            }
        };

        Ok(HeyGenClient { sender, executor })
    }
}

impl Default for HeyGenClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
