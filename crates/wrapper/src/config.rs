//! Wrapper deployment parameters.

use namevault_types::{AccountId, NodeId, GRACE_PERIOD};
use serde::{Deserialize, Serialize};

/// Fixed parameters of one wrapper generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrapperConfig {
    /// The wrapper's own ledger principal; custodial owner of every
    /// wrapped node.
    pub custodian: AccountId,
    /// Principal allowed to configure the successor and retire this
    /// generation.
    pub administrator: AccountId,
    /// Node whose second-level children are governed by the expiry
    /// registrar.
    pub suffix_node: NodeId,
    /// Window after expiry during which a record is still honored.
    pub grace_period: u64,
}

impl WrapperConfig {
    pub fn new(custodian: AccountId, administrator: AccountId, suffix_node: NodeId) -> Self {
        Self {
            custodian,
            administrator,
            suffix_node,
            grace_period: GRACE_PERIOD,
        }
    }

    pub fn with_grace_period(mut self, grace_period: u64) -> Self {
        self.grace_period = grace_period;
        self
    }
}
