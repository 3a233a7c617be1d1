//! Server-side components of the consignment service.
//!
//! - [`config`] - CLI/environment configuration.
//! - [`repository`] - consignment storage.
//! - [`vessel`] - vessel lookups against the remote vessel service.
//! - [`service`] - the `ShippingService` gRPC implementation.
//! - [`telemetry`] - logging, tracing and metrics.

pub mod config;
pub mod repository;
pub mod service;
pub mod telemetry;
pub mod vessel;
