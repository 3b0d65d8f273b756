//! Name-state transition notifications.

use namevault_fuses::FuseSet;
use namevault_types::{AccountId, EncodedName, NodeId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One observable state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    NameWrapped {
        node: NodeId,
        name: EncodedName,
        owner: AccountId,
        fuses: FuseSet,
        expiry: u64,
    },
    NameUnwrapped {
        node: NodeId,
        owner: AccountId,
    },
    FusesSet {
        node: NodeId,
        fuses: FuseSet,
    },
    ExpiryExtended {
        node: NodeId,
        expiry: u64,
    },
    Transferred {
        node: NodeId,
        from: AccountId,
        to: AccountId,
    },
    /// Final handoff tuple delivered to the successor, emitted exactly once
    /// per successful upgrade.
    NameUpgraded {
        name: EncodedName,
        owner: AccountId,
        fuses: FuseSet,
        expiry: u64,
        resolver: Option<AccountId>,
        extra: Vec<u8>,
    },
}

/// Where events go. Sinks must not fail the emitting operation.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: Event) {}
}

/// Sink that records every event, for assertions in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<RwLock<Vec<Event>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.read().clone()
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.write())
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: Event) {
        self.events.write().push(event);
    }
}
