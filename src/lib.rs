//! # heygen-lib-rust
//!
//! HeyGen API 集成适配器：把宿主传入的参数项翻译为 HeyGen REST 请求，并将响应归一化为结果记录。
//!
//! Integration adapter for the HeyGen AI video/avatar REST API. Each input item
//! carries a parameter bag (and optionally named binary payloads); the adapter
//! turns it into exactly one authenticated HTTP call and hands back a
//! normalized JSON record.
//!
//! ## Resources
//!
//! - **document**: `upload` (binary or URL-sourced asset upload)
//! - **photoAvatar**: photo generation, avatar groups, looks, training, motion,
//!   sound effects, upscaling, listings
//! - **video**: multi-scene `create`, `getStatus`, `createWebm`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use heygen_lib_rust::{HeyGenClient, Item, OperationKey, ParameterBag};
//!
//! #[tokio::main]
//! async fn main() -> heygen_lib_rust::Result<()> {
//!     let client = HeyGenClient::builder()
//!         .api_key("your-api-key")
//!         .continue_on_fail(true)
//!         .build()?;
//!
//!     let items = vec![Item::new(ParameterBag::new().with("videoId", "abc123"))];
//!     let result = client.execute(OperationKey::GetVideoStatus, &items).await?;
//!     for record in result.to_json() {
//!         println!("{}", record);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`operation`] | Operation table and per-operation request builders |
//! | [`params`] | Parameter bags, input items and binary payloads |
//! | [`request`] | Wire-level request description and body kinds |
//! | [`transport`] | Authenticated execution and response normalization |
//! | [`credentials`] | API key resolution and handling |
//! | [`telemetry`] | Redacting request observers |
//! | [`batch`] | Item-by-item driver with continue-on-fail |
//! | [`client`] | Client facade and builder |

pub mod batch;
pub mod client;
pub mod credentials;
pub mod operation;
pub mod params;
pub mod request;
pub mod telemetry;
pub mod transport;

pub use batch::{BatchExecutor, BatchExecutorConfig, BatchResult, NormalizedResult};
pub use client::{HeyGenClient, HeyGenClientBuilder};
pub use credentials::Credentials;
pub use operation::{build_request, Operation, OperationKey, Resource};
pub use params::{BinaryData, Item, ParameterBag};
pub use request::{BodyMode, RequestBody, RequestSpec};
pub use transport::{HttpTransport, RequestSender, TransportConfig};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
