//! # Common Types
//!
//! Both protobuf packages define a message called `Response`, so the aliases
//! here give each a distinct name and let callers avoid the nested
//! `proto::<package>::` paths.
//!
//! A [`Consignment`] identifies a shipment: its weight, an ordered list of
//! [`Container`]s and the id of the vessel it was assigned to. Containers are
//! opaque; only their count feeds into vessel selection.

use crate::proto::{consignment, vessel};

pub use consignment::{Consignment, Container, GetRequest};
pub use vessel::{Specification, Vessel};

/// Reply to both `CreateConsignment` and `GetConsignments`.
pub type ConsignmentResponse = consignment::Response;

/// Reply from the vessel service's `FindAvailable`.
pub type VesselResponse = vessel::Response;
