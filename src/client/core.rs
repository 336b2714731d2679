use crate::batch::{BatchExecutor, BatchResult};
use crate::client::builder::HeyGenClientBuilder;
use crate::operation::{Operation, OperationKey};
use crate::params::Item;
use crate::transport::{execute_request, RequestSender};
use crate::Result;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Entry point for running HeyGen operations.
pub struct HeyGenClient {
    pub(crate) sender: Arc<dyn RequestSender>,
    pub(crate) executor: BatchExecutor,
}

impl HeyGenClient {
    pub fn builder() -> HeyGenClientBuilder {
        HeyGenClientBuilder::new()
    }

    /// Client with credentials from the keyring or `HEYGEN_API_KEY` and env transport settings.
    pub fn from_env() -> Result<Self> {
        HeyGenClientBuilder::new().build()
    }

    pub fn continue_on_fail(&self) -> bool {
        self.executor.config().continue_on_fail
    }

    /// Run `key` over every item, in order.
    pub async fn execute(&self, key: OperationKey, items: &[Item]) -> Result<BatchResult> {
        self.execute_with_cancel(key, items, &CancellationToken::new())
            .await
    }

    pub async fn execute_with_cancel(
        &self,
        key: OperationKey,
        items: &[Item],
        cancel: &CancellationToken,
    ) -> Result<BatchResult> {
        self.executor
            .execute(self.sender.as_ref(), key, items, cancel)
            .await
    }

    /// Send a single, already typed operation.
    pub async fn call(&self, operation: Operation) -> Result<Value> {
        let key = operation.key();
        let request = operation
            .into_request()
            .map_err(|e| e.with_operation(key.to_string()))?;
        execute_request(self.sender.as_ref(), request).await
    }

    /// `GET /v1/user_info` with the configured key.
    pub async fn test_credentials(&self) -> Result<Value> {
        let body = self.sender.verify_credentials().await?;
        info!("heygen credentials verified");
        Ok(body)
    }
}
