//! Consignment storage.
//!
//! [`ConsignmentStore`] is the capability the service depends on. The only
//! implementation here is [`MemoryStore`], an append-only list that lives for
//! the lifetime of the process.

use parking_lot::Mutex;
use shiiip_consignment_core::{Result, types::Consignment};

/// Append-only storage for consignments.
///
/// Implementations must be safe to share between concurrent requests.
/// Entries are kept in the order writes complete; there is no key and no
/// deduplication.
pub trait ConsignmentStore: Send + Sync {
    /// Appends `consignment` and returns the stored value.
    fn create(&self, consignment: Consignment) -> Result<Consignment>;

    /// Returns every stored consignment in insertion order.
    fn get_all(&self) -> Vec<Consignment>;
}

/// In-memory [`ConsignmentStore`]. Starts empty; contents are lost when the
/// process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    consignments: Mutex<Vec<Consignment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.consignments.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ConsignmentStore for MemoryStore {
    fn create(&self, consignment: Consignment) -> Result<Consignment> {
        self.consignments.lock().push(consignment.clone());
        Ok(consignment)
    }

    // Reads take the same lock as writes and copy out a snapshot, so a
    // reader never observes a partially appended list.
    fn get_all(&self) -> Vec<Consignment> {
        self.consignments.lock().clone()
    }
}
