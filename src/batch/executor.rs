//! Batch executor.

use crate::operation::{build_request, OperationKey};
use crate::params::Item;
use crate::transport::{execute_request, RequestSender};
use crate::Result;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

/// Outcome of one input item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Success(Value),
    Failure { error: String },
}

/// One output record, tagged with the index of the item it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResult {
    pub item_index: usize,
    pub outcome: ItemOutcome,
}

impl NormalizedResult {
    pub fn success(item_index: usize, payload: Value) -> Self {
        Self {
            item_index,
            outcome: ItemOutcome::Success(payload),
        }
    }

    pub fn failure(item_index: usize, error: impl Into<String>) -> Self {
        Self {
            item_index,
            outcome: ItemOutcome::Failure {
                error: error.into(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Failure { .. })
    }

    /// The success payload, or `{ "error": message }`.
    pub fn to_json(&self) -> Value {
        match &self.outcome {
            ItemOutcome::Success(payload) => payload.clone(),
            ItemOutcome::Failure { error } => json!({ "error": error }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Records in input order.
    pub records: Vec<NormalizedResult>,
    /// Set when the run stopped on cancellation; the in-flight item has no record.
    pub cancelled: bool,
    pub execution_time: Duration,
    pub total_items: usize,
}

impl BatchResult {
    fn new(total_items: usize) -> Self {
        Self {
            records: Vec::with_capacity(total_items),
            cancelled: false,
            execution_time: Duration::ZERO,
            total_items,
        }
    }
    pub fn success_count(&self) -> usize {
        self.records.iter().filter(|r| !r.is_error()).count()
    }
    pub fn failure_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_error()).count()
    }
    pub fn all_succeeded(&self) -> bool {
        !self.cancelled && self.failure_count() == 0 && self.records.len() == self.total_items
    }
    pub fn to_json(&self) -> Vec<Value> {
        self.records.iter().map(NormalizedResult::to_json).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchExecutorConfig {
    /// Record per-item failures as `{ "error": ... }` and keep going.
    pub continue_on_fail: bool,
}
impl BatchExecutorConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_continue_on_fail(mut self, c: bool) -> Self {
        self.continue_on_fail = c;
        self
    }
}

/// Drives items one at a time through build, send and normalization.
#[derive(Debug, Clone, Default)]
pub struct BatchExecutor {
    config: BatchExecutorConfig,
}
impl BatchExecutor {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_config(config: BatchExecutorConfig) -> Self {
        Self { config }
    }
    pub fn config(&self) -> &BatchExecutorConfig {
        &self.config
    }

    /// Run every item through `key` in input order.
    ///
    /// With `continue_on_fail` off, the first failure is returned as is. With it
    /// on, every item yields exactly one record. Cancellation is checked before
    /// each item and raced against the in-flight call.
    pub async fn execute(
        &self,
        sender: &dyn RequestSender,
        key: OperationKey,
        items: &[Item],
        cancel: &CancellationToken,
    ) -> Result<BatchResult> {
        let batch_id = Uuid::new_v4().to_string();
        let start = Instant::now();
        let mut result = BatchResult::new(items.len());

        for (index, item) in items.iter().enumerate() {
            if cancel.is_cancelled() {
                result.cancelled = true;
                break;
            }

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    result.cancelled = true;
                    break;
                }
                outcome = run_item(sender, key, item) => outcome,
            };

            match outcome {
                Ok(payload) => result.records.push(NormalizedResult::success(index, payload)),
                Err(e) => {
                    // Fail-fast hands the item's error back exactly as raised.
                    if !self.config.continue_on_fail {
                        return Err(e);
                    }
                    let e = e.with_operation(key.to_string()).with_item_index(index);
                    warn!(
                        batch_id = batch_id.as_str(),
                        item = index,
                        operation = %key,
                        item_local = e.is_item_error(),
                        error = %e,
                        "heygen item failed, continuing"
                    );
                    result
                        .records
                        .push(NormalizedResult::failure(index, e.record_message()));
                }
            }
        }

        result.execution_time = start.elapsed();
        info!(
            batch_id = batch_id.as_str(),
            operation = %key,
            items = result.total_items,
            succeeded = result.success_count(),
            failed = result.failure_count(),
            cancelled = result.cancelled,
            duration_ms = result.execution_time.as_millis() as u64,
            "heygen batch finished"
        );
        Ok(result)
    }
}

async fn run_item(sender: &dyn RequestSender, key: OperationKey, item: &Item) -> Result<Value> {
    let request = build_request(key, item)?;
    execute_request(sender, request).await
}
