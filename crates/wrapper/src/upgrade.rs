//! Forward migration to a successor wrapper.
//!
//! A wrapper generation is `Active` until its administrator retires it;
//! retired generations accept reads and upgrades only. The successor is
//! explicit configuration with an unset initial state, never ambient: it is
//! installed (and replaced or cleared) by the administrator, and read once
//! per operation.

use crate::errors::{Result, WrapperError};
use crate::events::Event;
use crate::wrapper::{NameWrapper, Staged};
use namevault_fuses::{Fuse, FuseSet};
use namevault_ledger::RegistrarError;
use namevault_types::{AccountId, EncodedName};
use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failure returned by a successor refusing a handoff.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpgradeHandoffError {
    #[error("record refused: {reason}")]
    Rejected { reason: String },

    #[error("successor backend error: {0}")]
    Backend(String),
}

/// Record-creation entry point of the next wrapper generation.
pub trait SuccessorWrapper: Send + Sync {
    fn wrap_from_upgrade(
        &self,
        name: &EncodedName,
        owner: AccountId,
        fuses: FuseSet,
        expiry: u64,
        resolver: Option<AccountId>,
        extra: &[u8],
    ) -> std::result::Result<(), UpgradeHandoffError>;
}

/// The configured successor: its record entry point plus the ledger
/// principal that takes custody of migrated nodes.
#[derive(Clone)]
pub struct SuccessorConfig {
    pub custodian: AccountId,
    pub port: Arc<dyn SuccessorWrapper>,
}

impl SuccessorConfig {
    pub fn new(custodian: AccountId, port: Arc<dyn SuccessorWrapper>) -> Self {
        Self { custodian, port }
    }
}

/// Lifecycle of one wrapper generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Active,
    Retired,
}

/// One handoff received by [`RecordingSuccessor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    pub name: EncodedName,
    pub owner: AccountId,
    pub fuses: FuseSet,
    pub expiry: u64,
    pub resolver: Option<AccountId>,
    pub extra: Vec<u8>,
}

/// Successor stub that records every handoff, optionally rejecting them.
#[derive(Clone, Default)]
pub struct RecordingSuccessor {
    handoffs: Arc<RwLock<Vec<Handoff>>>,
    rejection: Arc<RwLock<Option<String>>>,
}

impl RecordingSuccessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent handoffs fail with the given reason.
    pub fn reject_with(&self, reason: &str) {
        *self.rejection.write() = Some(reason.to_string());
    }

    pub fn accept(&self) {
        *self.rejection.write() = None;
    }

    pub fn handoffs(&self) -> Vec<Handoff> {
        self.handoffs.read().clone()
    }
}

impl SuccessorWrapper for RecordingSuccessor {
    fn wrap_from_upgrade(
        &self,
        name: &EncodedName,
        owner: AccountId,
        fuses: FuseSet,
        expiry: u64,
        resolver: Option<AccountId>,
        extra: &[u8],
    ) -> std::result::Result<(), UpgradeHandoffError> {
        if let Some(reason) = self.rejection.read().clone() {
            return Err(UpgradeHandoffError::Rejected { reason });
        }
        self.handoffs.write().push(Handoff {
            name: name.clone(),
            owner,
            fuses,
            expiry,
            resolver,
            extra: extra.to_vec(),
        });
        Ok(())
    }
}

impl NameWrapper {
    pub fn generation_state(&self) -> GenerationState {
        *self.state.read()
    }

    pub fn administrator(&self) -> AccountId {
        *self.administrator.read()
    }

    /// Currently configured successor, if any.
    pub fn upgrade_contract(&self) -> Option<SuccessorConfig> {
        self.successor.read().clone()
    }

    /// Install, replace or clear the successor. Administrator only.
    ///
    /// Custody approvals on the ledger and registrar follow the
    /// configuration: the outgoing successor loses its operator grant, the
    /// incoming one receives it.
    pub fn set_upgrade_contract(
        &self,
        caller: AccountId,
        successor: Option<SuccessorConfig>,
    ) -> Result<()> {
        self.require_admin(caller)?;

        let previous = self.successor.read().clone();
        if let Some(previous) = previous {
            self.ledger
                .set_approval_for_all(self.config.custodian, previous.custodian, false)?;
            self.registrar
                .set_approval_for_all(self.config.custodian, previous.custodian, false)?;
        }
        if let Some(next) = &successor {
            self.ledger
                .set_approval_for_all(self.config.custodian, next.custodian, true)?;
            self.registrar
                .set_approval_for_all(self.config.custodian, next.custodian, true)?;
        }

        match &successor {
            Some(next) => info!(custodian = %next.custodian, "successor wrapper configured"),
            None => info!("successor wrapper cleared"),
        }
        *self.successor.write() = successor;
        Ok(())
    }

    /// One-way switch: stop accepting new state, keep forwarding upgrades.
    /// Administrator only.
    pub fn retire(&self, caller: AccountId) -> Result<()> {
        self.require_admin(caller)?;
        *self.state.write() = GenerationState::Retired;
        info!("wrapper generation retired");
        Ok(())
    }

    pub fn transfer_admin(&self, caller: AccountId, new_admin: AccountId) -> Result<()> {
        self.require_admin(caller)?;
        *self.administrator.write() = new_admin;
        info!(administrator = %new_admin, "administrator changed");
        Ok(())
    }

    /// Move a wrapped record to the configured successor.
    ///
    /// Works in both generation states. Custody preconditions (ledger
    /// ownership by the custodian; for registrar-governed names a live
    /// registration held by it) are checked before the successor learns of
    /// the handoff, and custody plus the local record move only after its
    /// acceptance, so a failure on either side leaves both generations
    /// unchanged. For registrar-governed names the delivered fuse set gains
    /// `PARENT_CANNOT_CONTROL | IS_DOT_ETH` and the delivered expiry gains
    /// the grace period; other names migrate verbatim. Exactly one
    /// `NameUpgraded` event carries the final tuple.
    pub fn upgrade(&self, caller: AccountId, name: &EncodedName, extra: &[u8]) -> Result<()> {
        let node = name.node();
        self.clear_if_expired(node);
        let record = self
            .records
            .get(node)
            .ok_or(WrapperError::NameNotWrapped { node })?;
        if !self.controls_record(caller, &record) {
            return Err(WrapperError::NotRecordOwner {
                account: caller,
                node,
            });
        }
        let successor = self
            .successor
            .read()
            .clone()
            .ok_or(WrapperError::UpgradeNotConfigured)?;
        // A record whose ledger custody was revoked behind our back is stale.
        if self.ledger.owner_of(node)? != Some(self.config.custodian) {
            return Err(WrapperError::NameNotWrapped { node });
        }

        let suffix_governed = record.fuses.contains(Fuse::IsDotEth);
        let suffix_label = if suffix_governed {
            name.leaf_labelhash()
        } else {
            None
        };
        // A registration that has expired (grace included) or moved away
        // cannot transfer; fail before the successor sees the handoff.
        if let Some(label) = suffix_label {
            if self.registrar.owner_of(label)? != Some(self.config.custodian) {
                return Err(RegistrarError::NotRegistered { label }.into());
            }
        }

        let fuses = if suffix_governed {
            record.fuses | Fuse::ParentCannotControl | Fuse::IsDotEth
        } else {
            record.fuses
        };
        let expiry = if suffix_governed {
            record.expiry.saturating_add(self.config.grace_period)
        } else {
            record.expiry
        };
        let resolver = self.ledger.resolver_of(node)?;

        if let Err(err) = successor
            .port
            .wrap_from_upgrade(name, record.owner, fuses, expiry, resolver, extra)
        {
            warn!(node = %node, error = %err, "successor refused the handoff");
            return Err(err.into());
        }

        if let Some(label) = suffix_label {
            if let Err(err) =
                self.registrar
                    .transfer(self.config.custodian, label, successor.custodian)
            {
                warn!(node = %node, error = %err, "registrar custody handoff failed");
                return Err(err.into());
            }
        }
        if let Err(err) = self
            .ledger
            .set_owner(self.config.custodian, node, successor.custodian)
        {
            warn!(node = %node, error = %err, "ledger custody handoff failed");
            return Err(err.into());
        }

        let mut staged = Staged::default();
        staged.remove_record(node);
        staged.drop_name(node);
        staged.drop_delegate(node);
        staged.emit(Event::NameUpgraded {
            name: name.clone(),
            owner: record.owner,
            fuses,
            expiry,
            resolver,
            extra: extra.to_vec(),
        });
        self.commit(staged);

        debug!(node = %node, owner = %record.owner, "upgraded name to successor");
        Ok(())
    }
}
