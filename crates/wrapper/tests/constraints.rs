//! Fuse monotonicity, expiry bounds and custody flows end to end.

use namevault_fuses::{Fuse, FuseSet};
use namevault_ledger::{
    InMemoryLedger, InMemoryRegistrar, LedgerError, ManualClock, NameLedger, SuffixRegistrar,
};
use namevault_types::{
    label_hash, AccountId, EncodedName, LabelHash, NodeId, GRACE_PERIOD, ROOT_NODE, SECONDS_PER_DAY,
};
use namevault_wrapper::{NameWrapper, WrapperConfig, WrapperError};
use std::sync::Arc;

fn account(byte: u8) -> AccountId {
    AccountId::new([byte; 32])
}

struct Harness {
    wrapper: NameWrapper,
    ledger: Arc<InMemoryLedger>,
    registrar: Arc<InMemoryRegistrar>,
    clock: ManualClock,
    controller: AccountId,
}

fn harness() -> Harness {
    let root = account(1);
    let registrar_account = account(2);
    let controller = account(3);
    let custodian = account(10);
    let admin = account(11);

    let ledger = Arc::new(InMemoryLedger::new(root));
    let suffix_node = ledger
        .set_subnode_owner(root, ROOT_NODE, label_hash(b"eth"), registrar_account)
        .unwrap();
    let clock = ManualClock::new(1_700_000_000);
    let registrar = Arc::new(InMemoryRegistrar::new(
        ledger.clone(),
        Arc::new(clock.clone()),
        registrar_account,
        suffix_node,
    ));
    registrar.add_controller(controller);
    registrar.add_controller(custodian);

    let wrapper = NameWrapper::new(
        WrapperConfig::new(custodian, admin, suffix_node),
        ledger.clone(),
        registrar.clone(),
        Arc::new(clock.clone()),
    );

    Harness {
        wrapper,
        ledger,
        registrar,
        clock,
        controller,
    }
}

impl Harness {
    fn register_and_wrap(&self, label: &str, owner: AccountId, days: u64) -> (NodeId, u64) {
        let expiry = self
            .registrar
            .register(
                self.controller,
                label_hash(label.as_bytes()),
                owner,
                days * SECONDS_PER_DAY,
            )
            .unwrap();
        let name = EncodedName::from_dotted(&format!("{label}.eth")).unwrap();
        self.wrapper
            .wrap(owner, &name, owner, FuseSet::EMPTY, None, 0)
            .unwrap();
        (name.node(), expiry)
    }

    fn fuses_of(&self, node: NodeId) -> FuseSet {
        let (_, fuses, _) = self.wrapper.get_data(node).unwrap();
        fuses
    }
}

#[test]
fn fuse_masks_never_shrink_across_call_sequences() {
    let h = harness();
    let alice = account(20);
    let (node, _) = h.register_and_wrap("mono", alice, 30);

    let mut seen = h.fuses_of(node);
    for extra in [
        FuseSet::from(Fuse::CannotUnwrap),
        FuseSet::from(Fuse::CannotCreateSubdomain),
        Fuse::CannotSetTtl | Fuse::CannotSetResolver,
    ] {
        let merged = h.wrapper.set_fuses(alice, node, seen.union(extra)).unwrap();
        assert!(merged.contains_all(seen));
        seen = merged;
    }

    // No request can clear what is burned.
    let err = h
        .wrapper
        .set_fuses(alice, node, FuseSet::from(Fuse::CannotUnwrap))
        .unwrap_err();
    assert!(matches!(err, WrapperError::InvalidFuses(_)));
    assert_eq!(h.fuses_of(node), seen);
}

#[test]
fn fuse_freeze_stops_even_supersets() {
    let h = harness();
    let alice = account(20);
    let (node, _) = h.register_and_wrap("frozen", alice, 30);

    let frozen = h
        .wrapper
        .set_fuses(
            alice,
            node,
            h.fuses_of(node) | Fuse::CannotUnwrap | Fuse::CannotBurnFuses,
        )
        .unwrap();

    let err = h
        .wrapper
        .set_fuses(alice, node, frozen | Fuse::CannotTransfer)
        .unwrap_err();
    assert!(matches!(err, WrapperError::InvalidFuses(_)));

    // Re-sending the exact mask is an allowed no-op.
    let unchanged = h.wrapper.set_fuses(alice, node, frozen).unwrap();
    assert_eq!(unchanged, frozen);
}

#[test]
fn child_expiry_is_bounded_by_the_parent_window() {
    let h = harness();
    let alice = account(20);
    let bob = account(21);
    let (parent, parent_expiry) = h.register_and_wrap("parent", alice, 30);

    let err = h
        .wrapper
        .set_subnode_owner(
            alice,
            parent,
            "strict",
            bob,
            FuseSet::EMPTY,
            parent_expiry + 1,
        )
        .unwrap_err();
    assert!(matches!(err, WrapperError::ExpiryExceedsParent { .. }));

    // The extension right relaxes the bound by the grace period, at
    // creation time too.
    let child = h
        .wrapper
        .set_subnode_owner(
            alice,
            parent,
            "roomy",
            bob,
            FuseSet::from(Fuse::CanExtendExpiry),
            parent_expiry + GRACE_PERIOD,
        )
        .unwrap();
    let (_, _, expiry) = h.wrapper.get_data(child).unwrap();
    assert_eq!(expiry, parent_expiry + GRACE_PERIOD);

    let err = h
        .wrapper
        .set_subnode_owner(
            alice,
            parent,
            "toofar",
            bob,
            FuseSet::from(Fuse::CanExtendExpiry),
            parent_expiry + GRACE_PERIOD + 1,
        )
        .unwrap_err();
    assert!(matches!(err, WrapperError::ExpiryExceedsParent { .. }));
}

#[test]
fn full_expiry_resets_fuses_for_the_next_registrant() {
    let h = harness();
    let alice = account(20);
    let bob = account(21);
    let label = label_hash(b"cycled");
    let (node, expiry) = h.register_and_wrap("cycled", alice, 1);
    h.wrapper
        .set_fuses(alice, node, h.fuses_of(node) | Fuse::CannotUnwrap)
        .unwrap();

    h.clock.set(expiry + GRACE_PERIOD + 1);
    let err = h
        .wrapper
        .set_fuses(alice, node, FuseSet::from(Fuse::CannotUnwrap))
        .unwrap_err();
    assert!(matches!(err, WrapperError::NameNotWrapped { .. }));
    assert!(h.registrar.available(label).unwrap());

    // The label cycles to a new registrant with a clean slate.
    h.registrar
        .register(h.controller, label, bob, 30 * SECONDS_PER_DAY)
        .unwrap();
    let name = EncodedName::from_dotted("cycled.eth").unwrap();
    h.wrapper
        .wrap(bob, &name, bob, FuseSet::EMPTY, None, 0)
        .unwrap();
    let (owner, fuses, _) = h.wrapper.get_data(node).unwrap();
    assert_eq!(owner, bob);
    assert_eq!(fuses, Fuse::ParentCannotControl | Fuse::IsDotEth);
    assert!(!fuses.contains(Fuse::CannotUnwrap));
}

#[test]
fn parent_delegate_extends_child_expiry() {
    let h = harness();
    let alice = account(20);
    let bob = account(21);
    let carol = account(22);
    let (parent, parent_expiry) = h.register_and_wrap("estate", alice, 30);
    h.wrapper
        .set_subnode_owner(
            alice,
            parent,
            "plot",
            bob,
            FuseSet::EMPTY,
            parent_expiry - SECONDS_PER_DAY,
        )
        .unwrap();

    let err = h
        .wrapper
        .extend_expiry(carol, parent, label_hash(b"plot"), parent_expiry)
        .unwrap_err();
    assert!(matches!(err, WrapperError::NotRecordOwner { .. }));

    h.wrapper.approve(alice, parent, Some(carol)).unwrap();
    let extended = h
        .wrapper
        .extend_expiry(carol, parent, label_hash(b"plot"), parent_expiry)
        .unwrap();
    assert_eq!(extended, parent_expiry);
}

#[test]
fn delegate_renews_registrar_governed_names() {
    let h = harness();
    let alice = account(20);
    let carol = account(22);
    let label = label_hash(b"lease");
    let (node, expiry) = h.register_and_wrap("lease", alice, 30);

    let err = h
        .wrapper
        .renew(carol, label, 30 * SECONDS_PER_DAY)
        .unwrap_err();
    assert!(matches!(err, WrapperError::NotRecordOwner { .. }));

    h.wrapper.approve(alice, node, Some(carol)).unwrap();
    let renewed = h.wrapper.renew(carol, label, 30 * SECONDS_PER_DAY).unwrap();
    assert_eq!(renewed, expiry + 30 * SECONDS_PER_DAY);
    assert_eq!(h.registrar.name_expires(label).unwrap(), renewed);
    let (_, _, stored) = h.wrapper.get_data(node).unwrap();
    assert_eq!(stored, renewed);
}

#[test]
fn unwrap_returns_both_custody_handles() {
    let h = harness();
    let alice = account(20);
    let bob = account(21);
    let label = label_hash(b"leaving");
    let (node, _) = h.register_and_wrap("leaving", alice, 30);

    h.wrapper.unwrap(alice, node, bob).unwrap();
    assert_eq!(h.wrapper.owner_of(node), None);
    assert_eq!(h.ledger.owner_of(node).unwrap(), Some(bob));
    assert_eq!(h.registrar.owner_of(label).unwrap(), Some(bob));
}

#[test]
fn operators_on_the_external_systems_can_wrap() {
    let h = harness();
    let alice = account(20);
    let operator = account(23);

    // Ledger-side operator wraps an interior name on the owner's behalf.
    h.ledger
        .set_subnode_owner(account(1), ROOT_NODE, label_hash(b"plain"), alice)
        .unwrap();
    h.ledger
        .set_approval_for_all(alice, operator, true)
        .unwrap();
    let plain = EncodedName::from_dotted("plain").unwrap();
    h.wrapper
        .wrap(operator, &plain, alice, FuseSet::EMPTY, None, 0)
        .unwrap();
    assert_eq!(h.wrapper.owner_of(plain.node()), Some(alice));

    // Registrar-side operator wraps a registered name.
    h.registrar
        .register(
            h.controller,
            label_hash(b"leased"),
            alice,
            30 * SECONDS_PER_DAY,
        )
        .unwrap();
    h.registrar
        .set_approval_for_all(alice, operator, true)
        .unwrap();
    let leased = EncodedName::from_dotted("leased.eth").unwrap();
    h.wrapper
        .wrap(operator, &leased, alice, FuseSet::EMPTY, None, 0)
        .unwrap();
    assert_eq!(h.wrapper.owner_of(leased.node()), Some(alice));
}

/// Ledger double that accepts everything except resolver writes.
struct ResolverlessLedger(Arc<InMemoryLedger>);

impl NameLedger for ResolverlessLedger {
    fn owner_of(&self, node: NodeId) -> Result<Option<AccountId>, LedgerError> {
        self.0.owner_of(node)
    }

    fn resolver_of(&self, node: NodeId) -> Result<Option<AccountId>, LedgerError> {
        self.0.resolver_of(node)
    }

    fn ttl_of(&self, node: NodeId) -> Result<u64, LedgerError> {
        self.0.ttl_of(node)
    }

    fn set_owner(
        &self,
        caller: AccountId,
        node: NodeId,
        new_owner: AccountId,
    ) -> Result<(), LedgerError> {
        self.0.set_owner(caller, node, new_owner)
    }

    fn set_subnode_owner(
        &self,
        caller: AccountId,
        node: NodeId,
        label: LabelHash,
        new_owner: AccountId,
    ) -> Result<NodeId, LedgerError> {
        self.0.set_subnode_owner(caller, node, label, new_owner)
    }

    fn set_resolver(
        &self,
        _caller: AccountId,
        _node: NodeId,
        _resolver: Option<AccountId>,
    ) -> Result<(), LedgerError> {
        Err(LedgerError::Backend("resolver writes disabled".into()))
    }

    fn set_ttl(&self, caller: AccountId, node: NodeId, ttl: u64) -> Result<(), LedgerError> {
        self.0.set_ttl(caller, node, ttl)
    }

    fn set_approval_for_all(
        &self,
        caller: AccountId,
        operator: AccountId,
        approved: bool,
    ) -> Result<(), LedgerError> {
        self.0.set_approval_for_all(caller, operator, approved)
    }

    fn is_approved_for_all(
        &self,
        owner: AccountId,
        operator: AccountId,
    ) -> Result<bool, LedgerError> {
        self.0.is_approved_for_all(owner, operator)
    }
}

#[test]
fn rejected_resolver_write_does_not_strand_custody() {
    let root = account(1);
    let registrar_account = account(2);
    let custodian = account(10);
    let alice = account(20);
    let bob = account(21);

    let inner = Arc::new(InMemoryLedger::new(root));
    let suffix_node = inner
        .set_subnode_owner(root, ROOT_NODE, label_hash(b"eth"), registrar_account)
        .unwrap();
    let clock = ManualClock::new(1_700_000_000);
    let registrar = Arc::new(InMemoryRegistrar::new(
        inner.clone(),
        Arc::new(clock.clone()),
        registrar_account,
        suffix_node,
    ));
    let wrapper = NameWrapper::new(
        WrapperConfig::new(custodian, account(11), suffix_node),
        Arc::new(ResolverlessLedger(inner.clone())),
        registrar,
        Arc::new(clock.clone()),
    );

    inner
        .set_subnode_owner(root, ROOT_NODE, label_hash(b"plain"), alice)
        .unwrap();
    let name = EncodedName::from_dotted("plain").unwrap();
    let node = name.node();
    wrapper
        .wrap(alice, &name, alice, FuseSet::EMPTY, Some(account(30)), 0)
        .unwrap();

    // Custody and the record are in place; only the resolver write was lost.
    assert_eq!(wrapper.owner_of(node), Some(alice));
    assert_eq!(inner.owner_of(node).unwrap(), Some(custodian));
    assert_eq!(inner.resolver_of(node).unwrap(), None);

    // The subnode entry point carries the same guarantee: the child record
    // and its ttl land even though the resolver write is refused.
    let child = wrapper
        .set_subnode_record(alice, node, "sub", bob, FuseSet::EMPTY, 0, Some(account(30)), 3600)
        .unwrap();
    assert_eq!(wrapper.owner_of(child), Some(bob));
    assert_eq!(inner.owner_of(child).unwrap(), Some(custodian));
    assert_eq!(inner.ttl_of(child).unwrap(), 3600);
    assert_eq!(inner.resolver_of(child).unwrap(), None);
}

#[test]
fn interior_wrap_expiry_is_capped_by_a_wrapped_parent() {
    let h = harness();
    let alice = account(20);
    let bob = account(21);

    // Alice creates the grandchild on the ledger before handing the parent
    // to the wrapper.
    h.registrar
        .register(
            h.controller,
            label_hash(b"corp"),
            alice,
            30 * SECONDS_PER_DAY,
        )
        .unwrap();
    let parent_name = EncodedName::from_dotted("corp.eth").unwrap();
    let child_name = EncodedName::from_dotted("api.corp.eth").unwrap();
    h.ledger
        .set_subnode_owner(alice, parent_name.node(), label_hash(b"api"), bob)
        .unwrap();
    h.wrapper
        .wrap(alice, &parent_name, alice, FuseSet::EMPTY, None, 0)
        .unwrap();
    let (_, _, parent_expiry) = h.wrapper.get_data(parent_name.node()).unwrap();

    h.wrapper
        .wrap(bob, &child_name, bob, FuseSet::EMPTY, None, u64::MAX)
        .unwrap();
    let (_, _, child_expiry) = h.wrapper.get_data(child_name.node()).unwrap();
    assert_eq!(child_expiry, parent_expiry);

    // Under an unwrapped parent there is no controlled expiry to honor.
    h.ledger
        .set_subnode_owner(account(1), ROOT_NODE, label_hash(b"solo"), alice)
        .unwrap();
    let solo = EncodedName::from_dotted("solo").unwrap();
    h.wrapper
        .wrap(alice, &solo, alice, FuseSet::EMPTY, None, 999)
        .unwrap();
    let (_, _, solo_expiry) = h.wrapper.get_data(solo.node()).unwrap();
    assert_eq!(solo_expiry, 0);
}
