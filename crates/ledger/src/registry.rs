//! Ownership ledger port.
//!
//! The ledger is the system of record for raw node ownership, resolver and
//! TTL fields. It knows nothing about wrapping or fuses; the wrapper mirrors
//! its own state into it. Every mutation carries an explicit caller and the
//! ledger enforces owner-or-operator authorization itself.

use crate::errors::LedgerError;
use namevault_types::{child_node, AccountId, LabelHash, NodeId, ROOT_NODE};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub trait NameLedger: Send + Sync {
    /// Current owner of a node, if a record exists.
    fn owner_of(&self, node: NodeId) -> Result<Option<AccountId>, LedgerError>;

    /// Resolver stored for a node.
    fn resolver_of(&self, node: NodeId) -> Result<Option<AccountId>, LedgerError>;

    /// TTL stored for a node. Zero when unset.
    fn ttl_of(&self, node: NodeId) -> Result<u64, LedgerError>;

    /// Hand an existing node to a new owner.
    fn set_owner(
        &self,
        caller: AccountId,
        node: NodeId,
        new_owner: AccountId,
    ) -> Result<(), LedgerError>;

    /// Create or reassign the child of `node` under `label`. The caller must
    /// control `node`, not the child. Returns the child's id.
    fn set_subnode_owner(
        &self,
        caller: AccountId,
        node: NodeId,
        label: LabelHash,
        new_owner: AccountId,
    ) -> Result<NodeId, LedgerError>;

    fn set_resolver(
        &self,
        caller: AccountId,
        node: NodeId,
        resolver: Option<AccountId>,
    ) -> Result<(), LedgerError>;

    fn set_ttl(&self, caller: AccountId, node: NodeId, ttl: u64) -> Result<(), LedgerError>;

    /// Grant or revoke `operator`'s right to act on every node the caller owns.
    fn set_approval_for_all(
        &self,
        caller: AccountId,
        operator: AccountId,
        approved: bool,
    ) -> Result<(), LedgerError>;

    fn is_approved_for_all(
        &self,
        owner: AccountId,
        operator: AccountId,
    ) -> Result<bool, LedgerError>;
}

#[derive(Debug, Clone)]
struct LedgerRecord {
    owner: AccountId,
    resolver: Option<AccountId>,
    ttl: u64,
}

impl LedgerRecord {
    fn new(owner: AccountId) -> Self {
        Self {
            owner,
            resolver: None,
            ttl: 0,
        }
    }
}

/// In-memory reference ledger.
///
/// Seeded with an owned root node; everything below it is created via
/// `set_subnode_owner` by whoever controls the parent.
#[derive(Debug)]
pub struct InMemoryLedger {
    records: Arc<RwLock<HashMap<NodeId, LedgerRecord>>>,
    operators: Arc<RwLock<HashMap<AccountId, HashSet<AccountId>>>>,
}

impl InMemoryLedger {
    pub fn new(root_owner: AccountId) -> Self {
        let mut records = HashMap::new();
        records.insert(ROOT_NODE, LedgerRecord::new(root_owner));
        Self {
            records: Arc::new(RwLock::new(records)),
            operators: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn authorize(&self, caller: AccountId, node: NodeId) -> Result<AccountId, LedgerError> {
        let owner = {
            let records = self.records.read();
            records
                .get(&node)
                .map(|record| record.owner)
                .ok_or(LedgerError::NodeNotFound { node })?
        };
        if owner == caller || self.approved(owner, caller) {
            Ok(owner)
        } else {
            Err(LedgerError::Unauthorized {
                account: caller,
                node,
            })
        }
    }

    fn approved(&self, owner: AccountId, operator: AccountId) -> bool {
        let operators = self.operators.read();
        operators
            .get(&owner)
            .is_some_and(|set| set.contains(&operator))
    }
}

impl NameLedger for InMemoryLedger {
    fn owner_of(&self, node: NodeId) -> Result<Option<AccountId>, LedgerError> {
        Ok(self.records.read().get(&node).map(|record| record.owner))
    }

    fn resolver_of(&self, node: NodeId) -> Result<Option<AccountId>, LedgerError> {
        Ok(self
            .records
            .read()
            .get(&node)
            .and_then(|record| record.resolver))
    }

    fn ttl_of(&self, node: NodeId) -> Result<u64, LedgerError> {
        Ok(self
            .records
            .read()
            .get(&node)
            .map(|record| record.ttl)
            .unwrap_or(0))
    }

    fn set_owner(
        &self,
        caller: AccountId,
        node: NodeId,
        new_owner: AccountId,
    ) -> Result<(), LedgerError> {
        self.authorize(caller, node)?;
        let mut records = self.records.write();
        if let Some(record) = records.get_mut(&node) {
            record.owner = new_owner;
        }
        Ok(())
    }

    fn set_subnode_owner(
        &self,
        caller: AccountId,
        node: NodeId,
        label: LabelHash,
        new_owner: AccountId,
    ) -> Result<NodeId, LedgerError> {
        self.authorize(caller, node)?;
        let child = child_node(node, label);
        let mut records = self.records.write();
        records
            .entry(child)
            .and_modify(|record| record.owner = new_owner)
            .or_insert_with(|| LedgerRecord::new(new_owner));
        Ok(child)
    }

    fn set_resolver(
        &self,
        caller: AccountId,
        node: NodeId,
        resolver: Option<AccountId>,
    ) -> Result<(), LedgerError> {
        self.authorize(caller, node)?;
        let mut records = self.records.write();
        if let Some(record) = records.get_mut(&node) {
            record.resolver = resolver;
        }
        Ok(())
    }

    fn set_ttl(&self, caller: AccountId, node: NodeId, ttl: u64) -> Result<(), LedgerError> {
        self.authorize(caller, node)?;
        let mut records = self.records.write();
        if let Some(record) = records.get_mut(&node) {
            record.ttl = ttl;
        }
        Ok(())
    }

    fn set_approval_for_all(
        &self,
        caller: AccountId,
        operator: AccountId,
        approved: bool,
    ) -> Result<(), LedgerError> {
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
    ) -> Result<bool, LedgerError> {
        Ok(self.approved(owner, operator))
    }
}
