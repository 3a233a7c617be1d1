//! Generated gRPC bindings.
//!
//! The `consignment` package is served by this service. The `vessel` package
//! is consumed: only its client is used in production, its server half backs
//! in-process fakes in tests.

pub mod consignment {
    tonic::include_proto!("consignment");
}

pub mod vessel {
    tonic::include_proto!("vessel");
}

/// Encoded descriptor set covering both packages, for `tonic-reflection`.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("shiiip_descriptor");
