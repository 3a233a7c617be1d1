//! Error types for the consignment service.
//!
//! Failures from the vessel service are carried as the original
//! [`tonic::Status`] so they reach the caller unchanged. Converting an
//! [`Error`] back into a `Status` never rewrites the code or message of a
//! collaborator failure.
//!
//! ## Error Cases
//! - `CollaboratorUnavailable`: the vessel service could not be reached,
//!   timed out, or failed for any reason other than "no match".
//! - `NoMatchingVessel`: the vessel service found no vessel for the
//!   specification.
//! - `StoreFailure`: the consignment store rejected a write.

use tonic::{Code, Status};

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the consignment service.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The vessel service is unreachable, timed out or failed internally.
    #[error("Vessel service unavailable: {0}")]
    CollaboratorUnavailable(Status),

    /// No vessel satisfies the requested specification.
    #[error("No matching vessel: {0}")]
    NoMatchingVessel(Status),

    /// The store could not persist the consignment.
    #[error("Store failure: {reason}")]
    StoreFailure { reason: String },
}

impl Error {
    /// Classifies a status returned by the vessel service.
    ///
    /// `NotFound` means the lookup ran and matched nothing; every other code
    /// is treated as the collaborator being unavailable.
    pub fn from_vessel_status(status: Status) -> Self {
        match status.code() {
            Code::NotFound => Self::NoMatchingVessel(status),
            _ => Self::CollaboratorUnavailable(status),
        }
    }

    /// Error used when the vessel service answers without a vessel.
    pub fn no_vessel_available() -> Self {
        Self::NoMatchingVessel(Status::not_found("no vessel available"))
    }
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        match err {
            Error::CollaboratorUnavailable(status) | Error::NoMatchingVessel(status) => status,
            Error::StoreFailure { reason } => Status::internal(format!("Store failure: {reason}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_no_matching_vessel() {
        let err = Error::from_vessel_status(Status::not_found("no vessel available"));
        assert!(matches!(err, Error::NoMatchingVessel(_)));
    }

    #[test]
    fn other_codes_are_collaborator_unavailable() {
        for code in [Code::Unavailable, Code::DeadlineExceeded, Code::Cancelled, Code::Internal] {
            let err = Error::from_vessel_status(Status::new(code, "boom"));
            assert!(matches!(err, Error::CollaboratorUnavailable(_)), "{code:?}");
        }
    }

    #[test]
    fn collaborator_status_is_returned_verbatim() {
        let status: Status = Error::from_vessel_status(Status::deadline_exceeded("too slow")).into();
        assert_eq!(status.code(), Code::DeadlineExceeded);
        assert_eq!(status.message(), "too slow");

        let status: Status = Error::no_vessel_available().into();
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "no vessel available");
    }

    #[test]
    fn store_failure_is_internal() {
        let status: Status = Error::StoreFailure {
            reason: "disk full".to_string(),
        }
        .into();
        assert_eq!(status.code(), Code::Internal);
        assert!(status.message().contains("disk full"));
    }
}
