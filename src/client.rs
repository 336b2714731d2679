//! HeyGen client facade.
//!
//! Keep the public surface small: build once with [`HeyGenClientBuilder`],
//! then run batches of items or single typed operations through [`HeyGenClient`].

pub mod builder;
pub mod core;

pub use self::builder::HeyGenClientBuilder;
pub use self::core::HeyGenClient;
