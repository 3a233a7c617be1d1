//! gRPC service implementation for consignment registration.
//!
//! This module defines [`ConsignmentService`], the concrete implementation of
//! the [`ShippingService`] gRPC service defined in the protobuf
//! specification.
//!
//! ## Responsibilities
//!
//! - Ask the vessel service for a vessel matching each new consignment.
//! - Stamp the vessel id onto the consignment and append it to the store.
//! - Return the full store contents on read.
//!
//! Any failure aborts the creation as a whole: nothing is stored and the
//! error reaches the caller unchanged. There are no retries and no
//! compensation.

use crate::server::{
    repository::ConsignmentStore,
    telemetry::{
        increment_consignment_reads, increment_consignments_created, increment_creation_errors,
        record_vessel_lookup_duration,
    },
    vessel::{VesselFinder, specification_for},
};
use shiiip_consignment_core::{
    Error, Result,
    proto::consignment::shipping_service_server::ShippingService,
    types::{Consignment, ConsignmentResponse, GetRequest},
};
use std::sync::Arc;
use std::time::Instant;
use tonic::{Request, Response, Status};

/// gRPC service that registers consignments against available vessels.
///
/// Both collaborators are injected so either can be swapped (a durable
/// store, a fake vessel service) without touching the workflow.
#[derive(Clone)]
pub struct ConsignmentService {
    store: Arc<dyn ConsignmentStore>,
    vessel_finder: Arc<dyn VesselFinder>,
}

impl ConsignmentService {
    pub fn new(store: Arc<dyn ConsignmentStore>, vessel_finder: Arc<dyn VesselFinder>) -> Self {
        Self {
            store,
            vessel_finder,
        }
    }

    /// Assigns a vessel to `consignment` and stores it.
    ///
    /// The vessel lookup happens before the store is touched, so a failed or
    /// cancelled lookup leaves the store unchanged. Any `vessel_id` supplied
    /// by the caller is overwritten.
    pub async fn create(&self, mut consignment: Consignment) -> Result<ConsignmentResponse> {
        let specification = specification_for(&consignment);

        let start = Instant::now();
        let lookup = self.vessel_finder.find_available(specification).await;
        record_vessel_lookup_duration(start.elapsed().as_secs_f64() * 1000.0);

        // Stored consignments always carry a vessel id, whatever the finder.
        let vessel = lookup
            .and_then(|vessel| {
                if vessel.id.is_empty() {
                    Err(Error::no_vessel_available())
                } else {
                    Ok(vessel)
                }
            })
            .inspect_err(|e| {
                increment_creation_errors(error_kind(e));
            })?;

        consignment.vessel_id = vessel.id;

        let stored = self.store.create(consignment).inspect_err(|e| {
            increment_creation_errors(error_kind(e));
        })?;
        increment_consignments_created();

        #[cfg(feature = "tracing")]
        tracing::debug!(vessel_id = %stored.vessel_id, "Consignment stored");

        Ok(ConsignmentResponse {
            created: true,
            consignment: Some(stored),
            consignments: Vec::new(),
        })
    }

    /// Returns every stored consignment in creation order.
    pub fn get_all(&self) -> ConsignmentResponse {
        increment_consignment_reads();
        ConsignmentResponse {
            created: false,
            consignment: None,
            consignments: self.store.get_all(),
        }
    }
}

fn error_kind(err: &Error) -> &'static str {
    match err {
        Error::CollaboratorUnavailable(_) => "collaborator_unavailable",
        Error::NoMatchingVessel(_) => "no_matching_vessel",
        Error::StoreFailure { .. } => "store_failure",
    }
}

#[tonic::async_trait]
impl ShippingService for ConsignmentService {
    /// Handles `CreateConsignment`.
    ///
    /// Collaborator failures are returned as the vessel service's own status.
    /// If the client cancels, tonic drops this future and nothing is stored.
    #[cfg_attr(feature = "tracing", tracing::instrument(
        skip_all,
        fields(weight = req.get_ref().weight, containers = req.get_ref().containers.len())
    ))]
    async fn create_consignment(
        &self,
        req: Request<Consignment>,
    ) -> core::result::Result<Response<ConsignmentResponse>, Status> {
        match self.create(req.into_inner()).await {
            Ok(response) => Ok(Response::new(response)),
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Consignment not created: {}", e);
                Err(e.into())
            }
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    async fn get_consignments(
        &self,
        _req: Request<GetRequest>,
    ) -> core::result::Result<Response<ConsignmentResponse>, Status> {
        Ok(Response::new(self.get_all()))
    }
}
