//! Error types for the wrapper.
//!
//! Four families: authorization (caller lacks a right), fuse violations
//! (request contradicts a burned restriction), temporal (expiry ordering),
//! and state (operation invalid for the current wrap or generation state).
//! Collaborator failures are carried verbatim. Every error aborts its
//! operation with no partial state change; nothing is retried internally.

use crate::policy::PolicyViolation;
use crate::upgrade::UpgradeHandoffError;
use namevault_fuses::{Fuse, FuseError};
use namevault_ledger::{LedgerError, RegistrarError};
use namevault_types::{AccountId, NameCodecError, NodeId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WrapperError {
    // -- authorization --
    #[error("account {account} is not the record owner of node {node} nor an approved operator")]
    NotRecordOwner { account: AccountId, node: NodeId },

    #[error("account {account} neither owns node {node} on the ledger nor is approved for it")]
    NotOwnerOrApproved { account: AccountId, node: NodeId },

    #[error("account {account} has no parental control over node {node}")]
    ParentControlForbidden { account: AccountId, node: NodeId },

    #[error("account {account} is not the wrapper administrator")]
    NotAdministrator { account: AccountId },

    // -- fuse violations --
    #[error("operation on node {node} forbidden by fuse {fuse}")]
    OperationForbiddenByFuse { node: NodeId, fuse: Fuse },

    #[error("parent of node {node} has burned CANNOT_CREATE_SUBDOMAIN")]
    SubdomainCreationForbidden { node: NodeId },

    #[error("invalid fuses: {0}")]
    InvalidFuses(#[from] FuseError),

    #[error("fuse policy violation: {0}")]
    Policy(#[from] PolicyViolation),

    // -- temporal --
    #[error("expiry {requested} for node {node} exceeds the parent bound {bound}")]
    ExpiryExceedsParent {
        node: NodeId,
        requested: u64,
        bound: u64,
    },

    // -- state --
    #[error("node {node} is already wrapped")]
    AlreadyWrapped { node: NodeId },

    #[error("node {node} is not wrapped")]
    NameNotWrapped { node: NodeId },

    #[error("the root name cannot be wrapped")]
    RootNotWrappable,

    #[error("node {node} cannot be handed to that owner")]
    InvalidTargetOwner { node: NodeId },

    #[error("custody tokens move one at a time, got amount {amount}")]
    InvalidAmount { amount: u64 },

    #[error("no successor wrapper is configured")]
    UpgradeNotConfigured,

    #[error("this wrapper generation is retired; only upgrades are accepted")]
    WrapperRetired,

    // -- collaborators --
    #[error("ledger call failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("registrar call failed: {0}")]
    Registrar(#[from] RegistrarError),

    #[error("successor rejected the handoff: {0}")]
    Successor(#[from] UpgradeHandoffError),

    #[error("malformed name: {0}")]
    Name(#[from] NameCodecError),
}

pub type Result<T> = std::result::Result<T, WrapperError>;
