//! The custodial wrapper core.
//!
//! Every public entry point follows the same shape: re-validate against
//! current state (soft-expired records cleared first), perform the
//! collaborator calls that can still fail, then commit the staged work in
//! one step that never aborts. Nothing observable changes on a failed
//! operation; once custody has moved, the operation can no longer fail.

use crate::config::WrapperConfig;
use crate::errors::{Result, WrapperError};
use crate::events::{Event, EventSink, NullSink};
use crate::metadata::{MetadataService, StaticMetadata};
use crate::policy::{BurnPolicy, EmancipationPolicy, PolicyViolation};
use crate::records::{NameRecord, RecordStore};
use crate::upgrade::{GenerationState, SuccessorConfig};
use namevault_fuses::{validate, Fuse, FuseSet, OWNER_CONTROLLED_FUSES};
use namevault_ledger::{Clock, NameLedger, SuffixRegistrar};
use namevault_types::{child_node, label_hash, AccountId, EncodedName, LabelHash, NodeId};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Custodian of wrapped names.
///
/// Holds ledger ownership of every wrapped node under one principal and
/// tracks the logical owner, burned fuses and expiry per node. Collaborators
/// (ledger, registrar, clock, event sink, metadata) are injected.
pub struct NameWrapper {
    pub(crate) config: WrapperConfig,
    pub(crate) ledger: Arc<dyn NameLedger>,
    pub(crate) registrar: Arc<dyn SuffixRegistrar>,
    pub(crate) events: Arc<dyn EventSink>,
    pub(crate) metadata: Arc<dyn MetadataService>,
    pub(crate) policy: Arc<dyn BurnPolicy>,
    pub(crate) records: RecordStore,
    /// Wire encoding of every wrapped name, kept so child ids and registrar
    /// labels can be re-derived without a reverse hash.
    pub(crate) names: RwLock<HashMap<NodeId, EncodedName>>,
    /// owner -> operators approved for all of that owner's records.
    pub(crate) operators: RwLock<HashMap<AccountId, HashSet<AccountId>>>,
    /// Per-node delegate, cleared on transfer.
    pub(crate) delegates: RwLock<HashMap<NodeId, AccountId>>,
    pub(crate) administrator: RwLock<AccountId>,
    pub(crate) successor: RwLock<Option<SuccessorConfig>>,
    pub(crate) state: RwLock<GenerationState>,
}

impl NameWrapper {
    pub fn new(
        config: WrapperConfig,
        ledger: Arc<dyn NameLedger>,
        registrar: Arc<dyn SuffixRegistrar>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let records = RecordStore::new(clock, config.grace_period);
        let administrator = RwLock::new(config.administrator);
        Self {
            config,
            ledger,
            registrar,
            events: Arc::new(NullSink),
            metadata: Arc::new(StaticMetadata::default()),
            policy: Arc::new(EmancipationPolicy),
            records,
            names: RwLock::new(HashMap::new()),
            operators: RwLock::new(HashMap::new()),
            delegates: RwLock::new(HashMap::new()),
            administrator,
            successor: RwLock::new(None),
            state: RwLock::new(GenerationState::Active),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_metadata(mut self, metadata: Arc<dyn MetadataService>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_policy(mut self, policy: Arc<dyn BurnPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// The wrapper's own ledger principal.
    pub fn custodian(&self) -> AccountId {
        self.config.custodian
    }

    /// Current record of `node` after the expiry check: `(owner, fuses,
    /// expiry)`, or `None` for unwrapped and soft-expired names.
    pub fn get_data(&self, node: NodeId) -> Option<(AccountId, FuseSet, u64)> {
        self.records
            .get(node)
            .map(|record| (record.owner, record.fuses, record.expiry))
    }

    pub fn is_wrapped(&self, node: NodeId) -> bool {
        self.records.get(node).is_some()
    }

    /// Stored wire encoding of a wrapped name.
    pub fn name_of(&self, node: NodeId) -> Option<EncodedName> {
        self.stored_name(node)
    }

    // ---- wrapping protocol ----

    /// Take custody of `name` and create its record.
    ///
    /// For second-level names under the registrar suffix the caller must be
    /// the registrant (or its registrar operator); custody of the
    /// registration moves too, the expiry is read from the registrar and
    /// `expiry` is ignored, and the record gains
    /// `PARENT_CANNOT_CONTROL | IS_DOT_ETH`. For every other name the caller
    /// must own the node on the ledger (or be approved there), and `expiry`
    /// is honored up to the wrapped parent's own expiry.
    pub fn wrap(
        &self,
        caller: AccountId,
        name: &EncodedName,
        wrapped_owner: AccountId,
        fuses: FuseSet,
        resolver: Option<AccountId>,
        expiry: u64,
    ) -> Result<()> {
        self.ensure_active()?;
        if name.is_root() {
            return Err(WrapperError::RootNotWrappable);
        }
        let node = name.node();
        self.clear_if_expired(node);
        if self.records.get(node).is_some() {
            return Err(WrapperError::AlreadyWrapped { node });
        }
        if wrapped_owner == AccountId::ZERO || wrapped_owner == self.config.custodian {
            return Err(WrapperError::InvalidTargetOwner { node });
        }
        let stray = fuses.difference(OWNER_CONTROLLED_FUSES);
        if !stray.is_empty() {
            return Err(PolicyViolation::NotOwnerControlled { fuses: stray }.into());
        }

        let suffix_label = if name.parent_node() == Some(self.config.suffix_node) {
            name.leaf_labelhash()
        } else {
            None
        };
        let (resulting, expiry) = if let Some(label) = suffix_label {
            self.take_registration(caller, node, label, fuses)?
        } else {
            self.take_node(caller, name, node, fuses, expiry)?
        };

        let mut staged = Staged::default();
        staged.put_record(node, NameRecord::new(wrapped_owner, resulting, expiry));
        staged.set_name(node, name.clone());
        if resolver.is_some() {
            staged.push_resolver(node, resolver);
        }
        staged.emit(Event::NameWrapped {
            node,
            name: name.clone(),
            owner: wrapped_owner,
            fuses: resulting,
            expiry,
        });
        self.commit(staged);

        debug!(node = %node, owner = %wrapped_owner, fuses = %resulting, expiry, "wrapped name");
        Ok(())
    }

    /// Suffix path of [`NameWrapper::wrap`]: pull the registration with the
    /// caller's own authority, then point the governed subnode at the
    /// custodian.
    fn take_registration(
        &self,
        caller: AccountId,
        node: NodeId,
        label: LabelHash,
        fuses: FuseSet,
    ) -> Result<(FuseSet, u64)> {
        let registrant = self
            .registrar
            .owner_of(label)?
            .ok_or(WrapperError::NotOwnerOrApproved {
                account: caller,
                node,
            })?;
        if caller != registrant && !self.registrar.is_approved_for_all(registrant, caller)? {
            return Err(WrapperError::NotOwnerOrApproved {
                account: caller,
                node,
            });
        }
        let expiry = self.registrar.name_expires(label)?;
        let resulting = validate(
            fuses | Fuse::ParentCannotControl | Fuse::IsDotEth,
            FuseSet::EMPTY,
        )?;
        self.policy.check_burn(node, resulting)?;

        self.registrar
            .transfer(caller, label, self.config.custodian)?;
        self.registrar
            .reclaim(self.config.custodian, label, self.config.custodian)?;
        Ok((resulting, expiry))
    }

    /// Interior path of [`NameWrapper::wrap`]: move ledger ownership only.
    /// The caller-supplied expiry is honored while the wrapped parent's
    /// window allows it; under an unwrapped parent there is no controlled
    /// expiry.
    fn take_node(
        &self,
        caller: AccountId,
        name: &EncodedName,
        node: NodeId,
        fuses: FuseSet,
        expiry: u64,
    ) -> Result<(FuseSet, u64)> {
        let owner = self
            .ledger
            .owner_of(node)?
            .ok_or(WrapperError::NotOwnerOrApproved {
                account: caller,
                node,
            })?;
        if caller != owner && !self.ledger.is_approved_for_all(owner, caller)? {
            return Err(WrapperError::NotOwnerOrApproved {
                account: caller,
                node,
            });
        }
        let expiry = match name.parent_node().and_then(|parent| self.records.get(parent)) {
            Some(parent) if parent.expiry != 0 => expiry.min(parent.expiry),
            Some(_) => expiry,
            None => 0,
        };
        let resulting = validate(fuses, FuseSet::EMPTY)?;
        self.policy.check_burn(node, resulting)?;

        self.ledger.set_owner(caller, node, self.config.custodian)?;
        Ok((resulting, expiry))
    }

    /// Destroy the record and hand both custody handles to `new_owner`.
    pub fn unwrap(&self, caller: AccountId, node: NodeId, new_owner: AccountId) -> Result<()> {
        self.ensure_active()?;
        let record = self.require_record(node)?;
        if !self.controls_record(caller, &record) {
            return Err(WrapperError::NotRecordOwner {
                account: caller,
                node,
            });
        }
        if record.fuses.contains(Fuse::CannotUnwrap) {
            return Err(WrapperError::OperationForbiddenByFuse {
                node,
                fuse: Fuse::CannotUnwrap,
            });
        }
        if new_owner == AccountId::ZERO || new_owner == self.config.custodian {
            return Err(WrapperError::InvalidTargetOwner { node });
        }

        if record.fuses.contains(Fuse::IsDotEth) {
            let name = self
                .stored_name(node)
                .ok_or(WrapperError::NameNotWrapped { node })?;
            if let Some(label) = name.leaf_labelhash() {
                self.registrar
                    .transfer(self.config.custodian, label, new_owner)?;
            }
        }
        self.ledger
            .set_owner(self.config.custodian, node, new_owner)?;

        let mut staged = Staged::default();
        staged.remove_record(node);
        staged.drop_name(node);
        staged.drop_delegate(node);
        staged.emit(Event::NameUnwrapped {
            node,
            owner: new_owner,
        });
        self.commit(staged);

        debug!(node = %node, to = %new_owner, "unwrapped name");
        Ok(())
    }

    // ---- subdomains ----

    /// Create or replace the child of a wrapped parent, including its
    /// resolver and TTL on the ledger. Returns the child's id.
    #[allow(clippy::too_many_arguments)]
    pub fn set_subnode_record(
        &self,
        caller: AccountId,
        parent: NodeId,
        label: &str,
        owner: AccountId,
        fuses: FuseSet,
        expiry: u64,
        resolver: Option<AccountId>,
        ttl: u64,
    ) -> Result<NodeId> {
        let (child, mut staged) = self.stage_subnode(caller, parent, label, owner, fuses, expiry)?;
        staged.push_resolver(child, resolver);
        staged.push_ttl(child, ttl);
        self.commit(staged);
        Ok(child)
    }

    /// Create or replace the child of a wrapped parent, ledger ownership
    /// only. Returns the child's id.
    pub fn set_subnode_owner(
        &self,
        caller: AccountId,
        parent: NodeId,
        label: &str,
        owner: AccountId,
        fuses: FuseSet,
        expiry: u64,
    ) -> Result<NodeId> {
        let (child, staged) = self.stage_subnode(caller, parent, label, owner, fuses, expiry)?;
        self.commit(staged);
        Ok(child)
    }

    /// Shared validation and staging for the two subnode entry points. On
    /// success the ledger subnode exists under the custodian and the staged
    /// record is ready to commit.
    fn stage_subnode(
        &self,
        caller: AccountId,
        parent: NodeId,
        label: &str,
        owner: AccountId,
        fuses: FuseSet,
        expiry: u64,
    ) -> Result<(NodeId, Staged)> {
        self.ensure_active()?;
        let parent_record = self.require_record(parent)?;
        let parent_name = self
            .stored_name(parent)
            .ok_or(WrapperError::NameNotWrapped { node: parent })?;
        let child_name = parent_name.child(label)?;
        let child = child_name.node();

        if !self.controls_record(caller, &parent_record) {
            return Err(WrapperError::ParentControlForbidden {
                account: caller,
                node: child,
            });
        }
        if parent_record.fuses.contains(Fuse::CannotCreateSubdomain) {
            return Err(WrapperError::SubdomainCreationForbidden { node: parent });
        }
        if owner == AccountId::ZERO || owner == self.config.custodian {
            return Err(WrapperError::InvalidTargetOwner { node: child });
        }

        self.clear_if_expired(child);
        let current = match self.records.get(child) {
            Some(existing) if existing.fuses.contains(Fuse::ParentCannotControl) => {
                return Err(WrapperError::ParentControlForbidden {
                    account: caller,
                    node: child,
                });
            }
            Some(existing) => existing.fuses,
            None => FuseSet::EMPTY,
        };

        // A child must not outlive the parent's control window; the
        // extension right relaxes the bound by the grace period.
        if parent_record.expiry != 0 {
            let bound = if fuses.contains(Fuse::CanExtendExpiry) {
                parent_record
                    .expiry
                    .checked_add(self.config.grace_period)
                    .unwrap_or(u64::MAX)
            } else {
                parent_record.expiry
            };
            if expiry > bound {
                return Err(WrapperError::ExpiryExceedsParent {
                    node: child,
                    requested: expiry,
                    bound,
                });
            }
        }

        self.policy.check_child_grant(child, &parent_record, fuses)?;
        // An existing child keeps its burned bits; the request only adds.
        let resulting = validate(fuses.union(current), current)?;
        self.policy.check_burn(child, resulting)?;

        self.ledger.set_subnode_owner(
            self.config.custodian,
            parent,
            label_hash(label.as_bytes()),
            self.config.custodian,
        )?;

        let mut staged = Staged::default();
        staged.put_record(child, NameRecord::new(owner, resulting, expiry));
        staged.set_name(child, child_name.clone());
        staged.emit(Event::NameWrapped {
            node: child,
            name: child_name,
            owner,
            fuses: resulting,
            expiry,
        });
        debug!(parent = %parent, child = %child, owner = %owner, "set subnode");
        Ok((child, staged))
    }

    // ---- fuses ----

    /// Burn fuses on a wrapped name; the one mutation path for fuse bits.
    ///
    /// `fuses` is the full target mask and must contain everything already
    /// burned. The caller acts as the record owner when only
    /// owner-controlled bits are added and it controls the record itself;
    /// otherwise the call is treated as the parent imposing bits on a
    /// child, which requires control of the parent record and a child that
    /// has not been emancipated. Returns the merged set.
    pub fn set_fuses(&self, caller: AccountId, node: NodeId, fuses: FuseSet) -> Result<FuseSet> {
        self.ensure_active()?;
        let record = self.require_record(node)?;
        let delta = fuses.difference(record.fuses);

        let owner_path = delta.difference(OWNER_CONTROLLED_FUSES).is_empty()
            && self.controls_record(caller, &record);
        if !owner_path {
            self.authorize_parent_burn(caller, node, &record, delta)?;
        }

        let merged = validate(fuses, record.fuses)?;
        self.policy.check_burn(node, merged)?;

        let mut staged = Staged::default();
        staged.put_record(node, NameRecord::new(record.owner, merged, record.expiry));
        staged.emit(Event::FusesSet {
            node,
            fuses: merged,
        });
        self.commit(staged);

        debug!(node = %node, fuses = %merged, "set fuses");
        Ok(merged)
    }

    /// Parent-side authorization for [`NameWrapper::set_fuses`]: the caller
    /// must control the parent record, the child must still be under
    /// parental control, and the imposed bits must pass the grant policy.
    fn authorize_parent_burn(
        &self,
        caller: AccountId,
        node: NodeId,
        record: &NameRecord,
        delta: FuseSet,
    ) -> Result<()> {
        if record.fuses.contains(Fuse::ParentCannotControl) {
            return Err(WrapperError::ParentControlForbidden {
                account: caller,
                node,
            });
        }
        let parent = self
            .stored_name(node)
            .and_then(|name| name.parent_node())
            .ok_or(WrapperError::ParentControlForbidden {
                account: caller,
                node,
            })?;
        let parent_record = self
            .records
            .get(parent)
            .ok_or(WrapperError::ParentControlForbidden {
                account: caller,
                node,
            })?;
        if !self.controls_record(caller, &parent_record) {
            return Err(WrapperError::ParentControlForbidden {
                account: caller,
                node,
            });
        }
        self.policy.check_child_grant(node, &parent_record, delta)?;
        Ok(())
    }

    // ---- expiry ----

    /// Push a child's expiry forward, clamped to the parent's bound.
    ///
    /// Callable by whoever controls the parent record (or its delegate),
    /// or by the child's own controller once `CAN_EXTEND_EXPIRY` is burned.
    /// Registrar-governed names extend through [`NameWrapper::renew`]
    /// instead.
    pub fn extend_expiry(
        &self,
        caller: AccountId,
        parent: NodeId,
        label: LabelHash,
        expiry: u64,
    ) -> Result<u64> {
        self.ensure_active()?;
        let node = child_node(parent, label);
        let record = self.require_record(node)?;
        if record.fuses.contains(Fuse::IsDotEth) {
            return Err(WrapperError::OperationForbiddenByFuse {
                node,
                fuse: Fuse::IsDotEth,
            });
        }

        let parent_record = self.require_record(parent)?;
        let parent_side =
            self.controls_record(caller, &parent_record) || self.delegate_of(parent) == Some(caller);
        let child_side = record.fuses.contains(Fuse::CanExtendExpiry)
            && (self.controls_record(caller, &record) || self.delegate_of(node) == Some(caller));
        if !parent_side && !child_side {
            return Err(WrapperError::NotRecordOwner {
                account: caller,
                node,
            });
        }

        let bound = if parent_record.expiry == 0 {
            u64::MAX
        } else if record.fuses.contains(Fuse::CanExtendExpiry) {
            parent_record
                .expiry
                .checked_add(self.config.grace_period)
                .unwrap_or(u64::MAX)
        } else {
            parent_record.expiry
        };
        // Monotone and bounded: never shrink, never pass the parent window.
        let new_expiry = expiry.clamp(record.expiry, bound.max(record.expiry));

        let mut staged = Staged::default();
        staged.put_record(node, NameRecord::new(record.owner, record.fuses, new_expiry));
        staged.emit(Event::ExpiryExtended {
            node,
            expiry: new_expiry,
        });
        self.commit(staged);

        debug!(node = %node, expiry = new_expiry, "extended expiry");
        Ok(new_expiry)
    }

    /// Extend a registrar-governed name through the registrar and mirror
    /// the new expiry into the record. Returns the new expiry.
    pub fn renew(&self, caller: AccountId, label: LabelHash, duration: u64) -> Result<u64> {
        self.ensure_active()?;
        let node = child_node(self.config.suffix_node, label);
        let record = self.require_record(node)?;
        if !self.controls_record(caller, &record) && self.delegate_of(node) != Some(caller) {
            return Err(WrapperError::NotRecordOwner {
                account: caller,
                node,
            });
        }

        let expiry = self
            .registrar
            .renew(self.config.custodian, label, duration)?;

        let mut staged = Staged::default();
        staged.put_record(node, NameRecord::new(record.owner, record.fuses, expiry));
        staged.emit(Event::ExpiryExtended { node, expiry });
        self.commit(staged);

        debug!(node = %node, expiry, "renewed name");
        Ok(expiry)
    }

    // ---- ledger pass-throughs ----

    /// Point the ledger resolver of a wrapped name somewhere else.
    pub fn set_resolver(
        &self,
        caller: AccountId,
        node: NodeId,
        resolver: Option<AccountId>,
    ) -> Result<()> {
        self.ensure_active()?;
        let record = self.require_record(node)?;
        if !self.controls_record(caller, &record) {
            return Err(WrapperError::NotRecordOwner {
                account: caller,
                node,
            });
        }
        if record.fuses.contains(Fuse::CannotSetResolver) {
            return Err(WrapperError::OperationForbiddenByFuse {
                node,
                fuse: Fuse::CannotSetResolver,
            });
        }
        self.ledger
            .set_resolver(self.config.custodian, node, resolver)?;
        Ok(())
    }

    /// Set the ledger TTL of a wrapped name.
    pub fn set_ttl(&self, caller: AccountId, node: NodeId, ttl: u64) -> Result<()> {
        self.ensure_active()?;
        let record = self.require_record(node)?;
        if !self.controls_record(caller, &record) {
            return Err(WrapperError::NotRecordOwner {
                account: caller,
                node,
            });
        }
        if record.fuses.contains(Fuse::CannotSetTtl) {
            return Err(WrapperError::OperationForbiddenByFuse {
                node,
                fuse: Fuse::CannotSetTtl,
            });
        }
        self.ledger.set_ttl(self.config.custodian, node, ttl)?;
        Ok(())
    }

    // ---- shared internals ----

    pub(crate) fn ensure_active(&self) -> Result<()> {
        match *self.state.read() {
            GenerationState::Active => Ok(()),
            GenerationState::Retired => Err(WrapperError::WrapperRetired),
        }
    }

    pub(crate) fn require_admin(&self, caller: AccountId) -> Result<()> {
        if *self.administrator.read() != caller {
            return Err(WrapperError::NotAdministrator { account: caller });
        }
        Ok(())
    }

    /// Expiry-checked record fetch, clearing a stale entry first.
    pub(crate) fn require_record(&self, node: NodeId) -> Result<NameRecord> {
        self.clear_if_expired(node);
        self.records
            .get(node)
            .ok_or(WrapperError::NameNotWrapped { node })
    }

    /// Physically drop a soft-expired record together with its name and
    /// delegate entries.
    pub(crate) fn clear_if_expired(&self, node: NodeId) {
        if self.records.clear_if_expired(node) {
            self.names.write().remove(&node);
            self.delegates.write().remove(&node);
        }
    }

    /// Record-level control: the logical owner or one of its operators.
    pub(crate) fn controls_record(&self, caller: AccountId, record: &NameRecord) -> bool {
        caller == record.owner || self.operator_approved(record.owner, caller)
    }

    pub(crate) fn operator_approved(&self, owner: AccountId, operator: AccountId) -> bool {
        let operators = self.operators.read();
        operators
            .get(&owner)
            .is_some_and(|set| set.contains(&operator))
    }

    pub(crate) fn delegate_of(&self, node: NodeId) -> Option<AccountId> {
        self.delegates.read().get(&node).copied()
    }

    pub(crate) fn stored_name(&self, node: NodeId) -> Option<EncodedName> {
        self.names.read().get(&node).cloned()
    }

    /// Apply a staged unit of work: records and bookkeeping first, ledger
    /// follow-ups next, events last. Never aborts; a follow-up the ledger
    /// refuses is logged and skipped.
    pub(crate) fn commit(&self, staged: Staged) {
        {
            let mut names = self.names.write();
            let mut delegates = self.delegates.write();
            for (node, record) in &staged.record_puts {
                self.records.put(*node, *record);
            }
            for node in &staged.record_removes {
                self.records.remove(*node);
            }
            for (node, name) in staged.name_puts {
                names.insert(node, name);
            }
            for node in &staged.name_drops {
                names.remove(node);
            }
            for node in &staged.delegate_drops {
                delegates.remove(node);
            }
        }
        for (node, resolver) in staged.resolver_pushes {
            if let Err(err) = self
                .ledger
                .set_resolver(self.config.custodian, node, resolver)
            {
                warn!(node = %node, error = %err, "ledger refused the resolver update");
            }
        }
        for (node, ttl) in staged.ttl_pushes {
            if let Err(err) = self.ledger.set_ttl(self.config.custodian, node, ttl) {
                warn!(node = %node, error = %err, "ledger refused the ttl update");
            }
        }
        for event in staged.events {
            self.events.emit(event);
        }
    }
}

/// Work staged by an entry point, applied only after every step that can
/// abort the operation has succeeded. The ledger pushes staged here are
/// record follow-ups on nodes the custodian owns by commit time; their
/// failure cannot undo the commit.
#[derive(Default)]
pub(crate) struct Staged {
    record_puts: Vec<(NodeId, NameRecord)>,
    record_removes: Vec<NodeId>,
    name_puts: Vec<(NodeId, EncodedName)>,
    name_drops: Vec<NodeId>,
    delegate_drops: Vec<NodeId>,
    resolver_pushes: Vec<(NodeId, Option<AccountId>)>,
    ttl_pushes: Vec<(NodeId, u64)>,
    events: Vec<Event>,
}

impl Staged {
    pub(crate) fn put_record(&mut self, node: NodeId, record: NameRecord) {
        self.record_puts.push((node, record));
    }

    pub(crate) fn remove_record(&mut self, node: NodeId) {
        self.record_removes.push(node);
    }

    pub(crate) fn set_name(&mut self, node: NodeId, name: EncodedName) {
        self.name_puts.push((node, name));
    }

    pub(crate) fn drop_name(&mut self, node: NodeId) {
        self.name_drops.push(node);
    }

    pub(crate) fn drop_delegate(&mut self, node: NodeId) {
        self.delegate_drops.push(node);
    }

    pub(crate) fn push_resolver(&mut self, node: NodeId, resolver: Option<AccountId>) {
        self.resolver_pushes.push((node, resolver));
    }

    pub(crate) fn push_ttl(&mut self, node: NodeId, ttl: u64) {
        self.ttl_pushes.push((node, ttl));
    }

    pub(crate) fn emit(&mut self, event: Event) {
        self.events.push(event);
    }
}
