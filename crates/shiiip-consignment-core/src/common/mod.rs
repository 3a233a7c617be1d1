//! Shared contracts for the consignment service.
//!
//! - [`proto`] - generated protobuf messages, clients and servers.
//! - [`types`] - short aliases for the generated types used across crates.
//! - [`error`] - the service [`Error`] and its mapping onto `tonic::Status`.

pub mod error;
pub mod proto;
pub mod types;

pub use error::{Error, Result};
