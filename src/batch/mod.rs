//! 批处理驱动：按输入顺序逐条构建、发送并归一化结果。
//!
//! # Item Batch Driver
//!
//! Iterates the input items of one execution, one request in flight at a time,
//! and produces an ordered sequence of [`NormalizedResult`] records.
//!
//! ## Failure modes
//!
//! | `continue_on_fail` | Item fails | Batch result |
//! |--------------------|------------|--------------|
//! | `false` | first failure | `Err(error)`, nothing else runs |
//! | `true` | any number | `Ok`, one record per item, errors as `{ "error": ... }` |
//!
//! ## Example
//!
//! ```rust,no_run
//! use heygen_lib_rust::batch::{BatchExecutor, BatchExecutorConfig};
//! use heygen_lib_rust::operation::OperationKey;
//! use heygen_lib_rust::params::{Item, ParameterBag};
//! use heygen_lib_rust::transport::{HttpTransport, TransportConfig};
//! use heygen_lib_rust::credentials::Credentials;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> heygen_lib_rust::Result<()> {
//! let transport = HttpTransport::new(Credentials::resolve(None)?, &TransportConfig::from_env())?;
//! let config = BatchExecutorConfig::new().with_continue_on_fail(true);
//! let executor = BatchExecutor::with_config(config);
//! let items = vec![Item::new(ParameterBag::new().with("videoId", "abc"))];
//! let result = executor
//!     .execute(&transport, OperationKey::GetVideoStatus, &items, &CancellationToken::new())
//!     .await?;
//! println!("{:?}", result.to_json());
//! # Ok(())
//! # }
//! ```

mod executor;

pub use executor::{
    BatchExecutor, BatchExecutorConfig, BatchResult, ItemOutcome, NormalizedResult,
};
