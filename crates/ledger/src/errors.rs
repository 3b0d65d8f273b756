//! Error types for the ledger and registrar ports.

use namevault_types::{AccountId, LabelHash, NodeId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("node {node} has no record")]
    NodeNotFound { node: NodeId },

    #[error("account {account} is not authorized to act on node {node}")]
    Unauthorized { account: AccountId, node: NodeId },

    #[error("ledger backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrarError {
    #[error("label {label} is not available for registration")]
    NotAvailable { label: LabelHash },

    #[error("label {label} has no live registration")]
    NotRegistered { label: LabelHash },

    #[error("account {account} is not a registrar controller")]
    ControllerOnly { account: AccountId },

    #[error("account {account} does not hold the registration for label {label}")]
    Unauthorized { account: AccountId, label: LabelHash },

    #[error("renewal window for label {label} has closed")]
    RenewalWindowClosed { label: LabelHash },

    #[error("registration duration overflows the expiry clock")]
    DurationOverflow,

    #[error("ledger write-through failed: {0}")]
    Ledger(#[from] LedgerError),
}
