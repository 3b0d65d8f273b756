//! Per-name record storage with soft expiry.
//!
//! A record past `expiry + grace` is reported as absent by every read while
//! the backing entry stays in place; there is no background sweep. Mutation
//! entry points call [`RecordStore::clear_if_expired`] first so stale
//! permission bits never leak into new decisions.

use namevault_fuses::FuseSet;
use namevault_ledger::Clock;
use namevault_types::{AccountId, NodeId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// State of one wrapped name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    /// Holder of the custody token.
    pub owner: AccountId,
    /// Burned restrictions.
    pub fuses: FuseSet,
    /// Expiry timestamp in seconds. Zero means no controlled expiry.
    pub expiry: u64,
}

impl NameRecord {
    pub fn new(owner: AccountId, fuses: FuseSet, expiry: u64) -> Self {
        Self {
            owner,
            fuses,
            expiry,
        }
    }

    /// Expired once `expiry + grace` has passed. Records with zero expiry
    /// never expire this way.
    pub fn is_expired(&self, now: u64, grace_period: u64) -> bool {
        if self.expiry == 0 {
            return false;
        }
        match self.expiry.checked_add(grace_period) {
            Some(limit) => now > limit,
            None => false,
        }
    }
}

/// Record store keyed by node id.
pub struct RecordStore {
    records: RwLock<HashMap<NodeId, NameRecord>>,
    clock: Arc<dyn Clock>,
    grace_period: u64,
}

impl RecordStore {
    pub fn new(clock: Arc<dyn Clock>, grace_period: u64) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            clock,
            grace_period,
        }
    }

    /// Expiry-checked read: `None` for missing or soft-expired records.
    pub fn get(&self, node: NodeId) -> Option<NameRecord> {
        let now = self.clock.now();
        let records = self.records.read();
        records
            .get(&node)
            .filter(|record| !record.is_expired(now, self.grace_period))
            .copied()
    }

    /// Backing state, pre expiry check.
    pub fn get_raw(&self, node: NodeId) -> Option<NameRecord> {
        self.records.read().get(&node).copied()
    }

    pub fn put(&self, node: NodeId, record: NameRecord) {
        self.records.write().insert(node, record);
    }

    pub fn remove(&self, node: NodeId) {
        self.records.write().remove(&node);
    }

    /// Drop the physical entry if it is soft-expired. Returns whether an
    /// entry was dropped.
    pub fn clear_if_expired(&self, node: NodeId) -> bool {
        let now = self.clock.now();
        let mut records = self.records.write();
        if let Some(record) = records.get(&node) {
            if record.is_expired(now, self.grace_period) {
                records.remove(&node);
                return true;
            }
        }
        false
    }
}
