//! Expiry registrar port for second-level names under a distinguished suffix.
//!
//! The registrar is the source of truth for when a second-level name expires
//! and who registered it. It owns the suffix node on the ledger and syncs the
//! governed subnode on register/reclaim; plain transfers move only the
//! registration. Registrations survive expiry through a grace window during
//! which only renewal is possible, then the label becomes available again.

use crate::clock::Clock;
use crate::errors::RegistrarError;
use crate::registry::NameLedger;
use namevault_types::{AccountId, LabelHash, NodeId, GRACE_PERIOD};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

pub trait SuffixRegistrar: Send + Sync {
    /// The ledger node whose children this registrar governs.
    fn base_node(&self) -> NodeId;

    /// Raw expiry of a registration. Zero when the label was never registered.
    fn name_expires(&self, label: LabelHash) -> Result<u64, RegistrarError>;

    /// Current registrant. `None` once expiry has passed, grace included.
    fn owner_of(&self, label: LabelHash) -> Result<Option<AccountId>, RegistrarError>;

    /// Whether the label can be registered afresh.
    fn available(&self, label: LabelHash) -> Result<bool, RegistrarError>;

    /// Register an available label. Controller only. Returns the new expiry.
    fn register(
        &self,
        caller: AccountId,
        label: LabelHash,
        owner: AccountId,
        duration: u64,
    ) -> Result<u64, RegistrarError>;

    /// Extend a registration whose grace window has not closed. Controller
    /// only. Returns the new expiry.
    fn renew(
        &self,
        caller: AccountId,
        label: LabelHash,
        duration: u64,
    ) -> Result<u64, RegistrarError>;

    /// Move a live registration to a new registrant. Does not touch the
    /// governed ledger subnode.
    fn transfer(
        &self,
        caller: AccountId,
        label: LabelHash,
        new_owner: AccountId,
    ) -> Result<(), RegistrarError>;

    /// Point the governed ledger subnode at `owner`. Live registrations only.
    fn reclaim(
        &self,
        caller: AccountId,
        label: LabelHash,
        owner: AccountId,
    ) -> Result<(), RegistrarError>;

    fn set_approval_for_all(
        &self,
        caller: AccountId,
        operator: AccountId,
        approved: bool,
    ) -> Result<(), RegistrarError>;

    fn is_approved_for_all(
        &self,
        owner: AccountId,
        operator: AccountId,
    ) -> Result<bool, RegistrarError>;
}

#[derive(Debug, Clone)]
struct Registration {
    owner: AccountId,
    expires_at: u64,
}

/// In-memory reference registrar.
pub struct InMemoryRegistrar {
    ledger: Arc<dyn NameLedger>,
    clock: Arc<dyn Clock>,
    /// The registrar's own ledger principal; must own `base_node` there.
    account: AccountId,
    base_node: NodeId,
    grace_period: u64,
    controllers: Arc<RwLock<HashSet<AccountId>>>,
    registrations: Arc<RwLock<HashMap<LabelHash, Registration>>>,
    operators: Arc<RwLock<HashMap<AccountId, HashSet<AccountId>>>>,
}

impl InMemoryRegistrar {
    pub fn new(
        ledger: Arc<dyn NameLedger>,
        clock: Arc<dyn Clock>,
        account: AccountId,
        base_node: NodeId,
    ) -> Self {
        Self {
            ledger,
            clock,
            account,
            base_node,
            grace_period: GRACE_PERIOD,
            controllers: Arc::new(RwLock::new(HashSet::new())),
            registrations: Arc::new(RwLock::new(HashMap::new())),
            operators: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_grace_period(mut self, grace_period: u64) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// The registrar's ledger principal.
    pub fn account(&self) -> AccountId {
        self.account
    }

    pub fn add_controller(&self, controller: AccountId) {
        self.controllers.write().insert(controller);
    }

    pub fn remove_controller(&self, controller: AccountId) {
        self.controllers.write().remove(&controller);
    }

    fn require_controller(&self, caller: AccountId) -> Result<(), RegistrarError> {
        if self.controllers.read().contains(&caller) {
            Ok(())
        } else {
            Err(RegistrarError::ControllerOnly { account: caller })
        }
    }

    /// Registrant of a live (unexpired) registration.
    fn live_owner(&self, label: LabelHash, now: u64) -> Result<AccountId, RegistrarError> {
        let registrations = self.registrations.read();
        registrations
            .get(&label)
            .filter(|registration| registration.expires_at > now)
            .map(|registration| registration.owner)
            .ok_or(RegistrarError::NotRegistered { label })
    }

    fn approved(&self, owner: AccountId, operator: AccountId) -> bool {
        let operators = self.operators.read();
        operators
            .get(&owner)
            .is_some_and(|set| set.contains(&operator))
    }

    fn past_grace(&self, expires_at: u64, now: u64) -> bool {
        match expires_at.checked_add(self.grace_period) {
            Some(limit) => limit < now,
            None => false,
        }
    }
}

impl SuffixRegistrar for InMemoryRegistrar {
    fn base_node(&self) -> NodeId {
        self.base_node
    }

    fn name_expires(&self, label: LabelHash) -> Result<u64, RegistrarError> {
        Ok(self
            .registrations
            .read()
            .get(&label)
            .map(|registration| registration.expires_at)
            .unwrap_or(0))
    }

    fn owner_of(&self, label: LabelHash) -> Result<Option<AccountId>, RegistrarError> {
        let now = self.clock.now();
        Ok(self
            .registrations
            .read()
            .get(&label)
            .filter(|registration| registration.expires_at > now)
            .map(|registration| registration.owner))
    }

    fn available(&self, label: LabelHash) -> Result<bool, RegistrarError> {
        let now = self.clock.now();
        let registrations = self.registrations.read();
        Ok(match registrations.get(&label) {
            Some(registration) => self.past_grace(registration.expires_at, now),
            None => true,
        })
    }

    fn register(
        &self,
        caller: AccountId,
        label: LabelHash,
        owner: AccountId,
        duration: u64,
    ) -> Result<u64, RegistrarError> {
        self.require_controller(caller)?;
        if !self.available(label)? {
            return Err(RegistrarError::NotAvailable { label });
        }
        let now = self.clock.now();
        let expires_at = now
            .checked_add(duration)
            .ok_or(RegistrarError::DurationOverflow)?;

        self.ledger
            .set_subnode_owner(self.account, self.base_node, label, owner)?;

        {
            let mut registrations = self.registrations.write();
            registrations.insert(label, Registration { owner, expires_at });
        }

        debug!(label = %label, owner = %owner, expires_at, "registered name");
        Ok(expires_at)
    }

    fn renew(
        &self,
        caller: AccountId,
        label: LabelHash,
        duration: u64,
    ) -> Result<u64, RegistrarError> {
        self.require_controller(caller)?;
        let now = self.clock.now();
        let mut registrations = self.registrations.write();
        let registration = registrations
            .get_mut(&label)
            .ok_or(RegistrarError::NotRegistered { label })?;
        if self.past_grace(registration.expires_at, now) {
            return Err(RegistrarError::RenewalWindowClosed { label });
        }
        let expires_at = registration
            .expires_at
            .checked_add(duration)
            .ok_or(RegistrarError::DurationOverflow)?;
        registration.expires_at = expires_at;

        debug!(label = %label, expires_at, "renewed name");
        Ok(expires_at)
    }

    fn transfer(
        &self,
        caller: AccountId,
        label: LabelHash,
        new_owner: AccountId,
    ) -> Result<(), RegistrarError> {
        let now = self.clock.now();
        let owner = self.live_owner(label, now)?;
        if caller != owner && !self.approved(owner, caller) {
            return Err(RegistrarError::Unauthorized {
                account: caller,
                label,
            });
        }
        {
            let mut registrations = self.registrations.write();
            if let Some(registration) = registrations.get_mut(&label) {
                registration.owner = new_owner;
            }
        }
        debug!(label = %label, from = %owner, to = %new_owner, "transferred registration");
        Ok(())
    }

    fn reclaim(
        &self,
        caller: AccountId,
        label: LabelHash,
        owner: AccountId,
    ) -> Result<(), RegistrarError> {
        let now = self.clock.now();
        let registrant = self.live_owner(label, now)?;
        if caller != registrant && !self.approved(registrant, caller) {
            return Err(RegistrarError::Unauthorized {
                account: caller,
                label,
            });
        }
        self.ledger
            .set_subnode_owner(self.account, self.base_node, label, owner)?;
        Ok(())
    }

    fn set_approval_for_all(
        &self,
        caller: AccountId,
        operator: AccountId,
        approved: bool,
    ) -> Result<(), RegistrarError> {
        let mut operators = self.operators.write();
        if approved {
            operators.entry(caller).or_default().insert(operator);
        } else if let Some(set) = operators.get_mut(&caller) {
            set.remove(&operator);
        }
        Ok(())
    }

    fn is_approved_for_all(
        &self,
        owner: AccountId,
        operator: AccountId,
    ) -> Result<bool, RegistrarError> {
        Ok(self.approved(owner, operator))
    }
}
