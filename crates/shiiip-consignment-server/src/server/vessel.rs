//! Vessel allocation through the remote vessel service.
//!
//! [`VesselFinder`] is the capability the consignment workflow depends on.
//! [`GrpcVesselFinder`] implements it with the generated tonic client. Each
//! lookup is a single unary call: no caching of earlier answers, no retries.

use crate::server::config::ServerConfig;
use shiiip_consignment_core::{
    Error, Result,
    proto::vessel::vessel_service_client::VesselServiceClient,
    types::{Consignment, Specification, Vessel},
};
use tonic::transport::{Channel, Endpoint};

/// Finds a vessel able to carry a given specification.
#[tonic::async_trait]
pub trait VesselFinder: Send + Sync {
    /// Returns an available vessel, or [`Error::NoMatchingVessel`] /
    /// [`Error::CollaboratorUnavailable`].
    async fn find_available(&self, specification: Specification) -> Result<Vessel>;
}

/// Builds the lookup for `consignment`: its weight and container count.
///
/// An empty container list yields a capacity of 0 and a weight of 0 is kept
/// as is; whether such a specification matches anything is up to the vessel
/// service.
pub fn specification_for(consignment: &Consignment) -> Specification {
    Specification {
        max_weight: consignment.weight,
        capacity: i32::try_from(consignment.containers.len()).unwrap_or(i32::MAX),
    }
}

/// [`VesselFinder`] backed by the `vessel.VesselService` gRPC API.
#[derive(Clone, Debug)]
pub struct GrpcVesselFinder {
    client: VesselServiceClient<Channel>,
}

impl GrpcVesselFinder {
    /// Creates a finder over a lazily connected channel.
    ///
    /// No connection is attempted here. An unreachable vessel service
    /// surfaces as [`Error::CollaboratorUnavailable`] on the first lookup.
    pub fn new(config: &ServerConfig) -> Self {
        let channel = Endpoint::from(config.vessel_addr.clone())
            .connect_timeout(config.vessel_connect_timeout)
            .timeout(config.vessel_timeout)
            .connect_lazy();
        Self::with_channel(channel)
    }

    pub fn with_channel(channel: Channel) -> Self {
        Self {
            client: VesselServiceClient::new(channel),
        }
    }
}

#[tonic::async_trait]
impl VesselFinder for GrpcVesselFinder {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_available(&self, specification: Specification) -> Result<Vessel> {
        // Generated clients take `&mut self`; cloning shares the channel.
        let mut client = self.client.clone();
        let response = client
            .find_available(specification)
            .await
            .map_err(Error::from_vessel_status)?
            .into_inner();

        // A vessel without an id cannot be assigned, so it counts as no match.
        response
            .vessel
            .filter(|vessel| !vessel.id.is_empty())
            .ok_or_else(Error::no_vessel_available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{
        repository::{ConsignmentStore, MemoryStore},
        service::handler::ConsignmentService,
    };
    use core::time::Duration;
    use shiiip_consignment_core::{
        proto::vessel::vessel_service_server::{VesselService, VesselServiceServer},
        types::{Container, VesselResponse},
    };
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;
    use tokio_stream::wrappers::TcpListenerStream;
    use tonic::{Code, Request, Response, Status, transport::Server};

    /// In-process vessel service matching against a fixed fleet, optionally
    /// stalling before it answers.
    #[derive(Default)]
    struct FakeVesselService {
        fleet: Vec<Vessel>,
        seen: Arc<Mutex<Vec<Specification>>>,
        delay: Duration,
    }

    #[tonic::async_trait]
    impl VesselService for FakeVesselService {
        async fn find_available(
            &self,
            request: Request<Specification>,
        ) -> core::result::Result<Response<VesselResponse>, Status> {
            let spec = request.into_inner();
            self.seen.lock().unwrap().push(spec.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let vessel = self
                .fleet
                .iter()
                .find(|v| v.capacity >= spec.capacity && v.max_weight >= spec.max_weight)
                .cloned()
                .ok_or_else(|| Status::not_found("no vessel matches"))?;
            Ok(Response::new(VesselResponse {
                vessel: Some(vessel),
                vessels: vec![],
            }))
        }
    }

    async fn spawn_fake_endpoint(service: FakeVesselService) -> Endpoint {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(
            Server::builder()
                .add_service(VesselServiceServer::new(service))
                .serve_with_incoming(TcpListenerStream::new(listener)),
        );
        Endpoint::from_shared(format!("http://{addr}")).unwrap()
    }

    async fn spawn_fake(service: FakeVesselService) -> Channel {
        spawn_fake_endpoint(service).await.connect().await.unwrap()
    }

    fn boaty() -> Vessel {
        Vessel {
            id: "vessel001".to_string(),
            name: "Boaty McBoatface".to_string(),
            capacity: 500,
            max_weight: 200_000,
            available: true,
            ..Default::default()
        }
    }

    #[test]
    fn specification_uses_weight_and_container_count() {
        let consignment = Consignment {
            weight: 55_000,
            containers: vec![Container::default(); 3],
            ..Default::default()
        };
        let spec = specification_for(&consignment);
        assert_eq!(spec.max_weight, 55_000);
        assert_eq!(spec.capacity, 3);
    }

    #[test]
    fn empty_containers_and_zero_weight_pass_through() {
        let spec = specification_for(&Consignment::default());
        assert_eq!(spec.capacity, 0);
        assert_eq!(spec.max_weight, 0);
    }

    #[tokio::test]
    async fn finds_vessel_from_remote_service() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let channel = spawn_fake(FakeVesselService {
            fleet: vec![boaty()],
            seen: Arc::clone(&seen),
            ..Default::default()
        })
        .await;
        let finder = GrpcVesselFinder::with_channel(channel);

        let spec = Specification {
            capacity: 2,
            max_weight: 1_000,
        };
        let vessel = finder.find_available(spec.clone()).await.unwrap();

        assert_eq!(vessel.id, "vessel001");
        assert_eq!(*seen.lock().unwrap(), vec![spec]);
    }

    #[tokio::test]
    async fn not_found_from_remote_is_no_matching_vessel() {
        let channel = spawn_fake(FakeVesselService {
            fleet: vec![boaty()],
            ..Default::default()
        })
        .await;
        let finder = GrpcVesselFinder::with_channel(channel);

        let err = finder
            .find_available(Specification {
                capacity: 10_000,
                max_weight: 1,
            })
            .await
            .unwrap_err();

        match err {
            Error::NoMatchingVessel(status) => {
                assert_eq!(status.code(), Code::NotFound);
                assert_eq!(status.message(), "no vessel matches");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_service_is_collaborator_unavailable() {
        // Bind then drop to get a local port with nothing listening on it.
        let addr = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap()
            .local_addr()
            .unwrap();
        let channel = Endpoint::from_shared(format!("http://{addr}"))
            .unwrap()
            .connect_timeout(Duration::from_millis(200))
            .timeout(Duration::from_millis(500))
            .connect_lazy();
        let finder = GrpcVesselFinder::with_channel(channel);

        let err = finder
            .find_available(Specification::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CollaboratorUnavailable(_)), "{err:?}");
    }

    #[tokio::test]
    async fn vessel_without_id_is_no_matching_vessel() {
        let channel = spawn_fake(FakeVesselService {
            fleet: vec![Vessel {
                id: String::new(),
                ..boaty()
            }],
            ..Default::default()
        })
        .await;
        let finder = Arc::new(GrpcVesselFinder::with_channel(channel));
        let store = Arc::new(MemoryStore::new());
        let service = ConsignmentService::new(store.clone(), finder.clone());

        let err = finder
            .find_available(Specification::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoMatchingVessel(_)), "{err:?}");

        let err = service.create(Consignment::default()).await.unwrap_err();
        assert!(matches!(err, Error::NoMatchingVessel(_)), "{err:?}");
        assert!(store.get_all().is_empty());
    }

    #[tokio::test]
    async fn slow_service_times_out_and_nothing_is_stored() {
        let endpoint = spawn_fake_endpoint(FakeVesselService {
            fleet: vec![boaty()],
            delay: Duration::from_secs(5),
            ..Default::default()
        })
        .await;
        let channel = endpoint
            .timeout(Duration::from_millis(100))
            .connect()
            .await
            .unwrap();
        let finder = Arc::new(GrpcVesselFinder::with_channel(channel));
        let store = Arc::new(MemoryStore::new());
        let service = ConsignmentService::new(store.clone(), finder.clone());

        let err = finder
            .find_available(Specification::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CollaboratorUnavailable(_)), "{err:?}");

        let err = service.create(Consignment::default()).await.unwrap_err();
        assert!(matches!(err, Error::CollaboratorUnavailable(_)), "{err:?}");
        assert!(store.is_empty());
    }
}
