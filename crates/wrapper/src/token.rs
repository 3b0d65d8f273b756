//! Custody-token surface of the wrapper.
//!
//! Every wrapped name doubles as a single-unit token held by the record
//! owner. All reads reflect the post-expiry-check record state: an expired
//! or never-wrapped name has no owner, a zero balance everywhere, and no
//! delegate.

use crate::errors::{Result, WrapperError};
use crate::events::Event;
use crate::records::NameRecord;
use crate::wrapper::{NameWrapper, Staged};
use namevault_fuses::Fuse;
use namevault_types::{AccountId, NodeId};
use tracing::debug;

impl NameWrapper {
    /// Holder of the custody token for `node`.
    pub fn owner_of(&self, node: NodeId) -> Option<AccountId> {
        self.records.get(node).map(|record| record.owner)
    }

    /// Units of `node` held by `owner`: one for the record owner, zero for
    /// everyone else.
    pub fn balance_of(&self, owner: AccountId, node: NodeId) -> u64 {
        match self.records.get(node) {
            Some(record) if record.owner == owner => 1,
            _ => 0,
        }
    }

    /// Metadata URI for a wrapped name's custody token.
    pub fn uri(&self, node: NodeId) -> String {
        self.metadata.uri(node)
    }

    /// Move the custody token of `node` from `from` to `to`.
    ///
    /// Custody tokens are indivisible, so `amount` must be exactly one.
    /// `data` is accepted for transfer-interface parity and not interpreted.
    /// The per-name delegate does not survive a transfer.
    pub fn safe_transfer_from(
        &self,
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        node: NodeId,
        amount: u64,
        _data: &[u8],
    ) -> Result<()> {
        self.ensure_active()?;
        if amount != 1 {
            return Err(WrapperError::InvalidAmount { amount });
        }
        let record = self.require_record(node)?;
        if record.owner != from {
            return Err(WrapperError::NotRecordOwner {
                account: from,
                node,
            });
        }
        if caller != from && !self.operator_approved(from, caller) {
            return Err(WrapperError::NotRecordOwner {
                account: caller,
                node,
            });
        }
        if record.fuses.contains(Fuse::CannotTransfer) {
            return Err(WrapperError::OperationForbiddenByFuse {
                node,
                fuse: Fuse::CannotTransfer,
            });
        }
        if to == AccountId::ZERO || to == self.config.custodian {
            return Err(WrapperError::InvalidTargetOwner { node });
        }

        let mut staged = Staged::default();
        staged.put_record(node, NameRecord::new(to, record.fuses, record.expiry));
        staged.drop_delegate(node);
        staged.emit(Event::Transferred { node, from, to });
        self.commit(staged);

        debug!(node = %node, from = %from, to = %to, "transferred custody token");
        Ok(())
    }

    /// Grant or revoke `operator`'s right to act on every record the
    /// caller owns.
    pub fn set_approval_for_all(
        &self,
        caller: AccountId,
        operator: AccountId,
        approved: bool,
    ) -> Result<()> {
        self.ensure_active()?;
        let mut operators = self.operators.write();
        if approved {
            operators.entry(caller).or_default().insert(operator);
        } else if let Some(set) = operators.get_mut(&caller) {
            set.remove(&operator);
        }
        Ok(())
    }

    pub fn is_approved_for_all(&self, owner: AccountId, operator: AccountId) -> bool {
        self.operator_approved(owner, operator)
    }

    /// Install or clear the single per-name delegate for `node`.
    pub fn approve(
        &self,
        caller: AccountId,
        node: NodeId,
        delegate: Option<AccountId>,
    ) -> Result<()> {
        self.ensure_active()?;
        let record = self.require_record(node)?;
        if !self.controls_record(caller, &record) {
            return Err(WrapperError::NotRecordOwner {
                account: caller,
                node,
            });
        }
        if record.fuses.contains(Fuse::CannotApprove) {
            return Err(WrapperError::OperationForbiddenByFuse {
                node,
                fuse: Fuse::CannotApprove,
            });
        }
        let mut delegates = self.delegates.write();
        match delegate {
            Some(delegate) => {
                delegates.insert(node, delegate);
            }
            None => {
                delegates.remove(&node);
            }
        }
        Ok(())
    }

    /// Current delegate of `node`, absent for expired or unwrapped names.
    pub fn get_approved(&self, node: NodeId) -> Option<AccountId> {
        self.records.get(node)?;
        self.delegate_of(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrapper::tests::{account, fixture};

    #[test]
    fn transfer_moves_the_custody_token() {
        let fix = fixture();
        let alice = account(20);
        let bob = account(21);
        let node = fix.wrap_plain_name("alpha", alice);

        fix.wrapper
            .safe_transfer_from(alice, alice, bob, node, 1, &[])
            .unwrap();
        assert_eq!(fix.wrapper.owner_of(node), Some(bob));
        assert_eq!(fix.wrapper.balance_of(alice, node), 0);
        assert_eq!(fix.wrapper.balance_of(bob, node), 1);
        assert!(matches!(
            fix.sink.events().last(),
            Some(Event::Transferred { .. })
        ));
    }

    #[test]
    fn transfer_gating_leaves_owner_unchanged() {
        let fix = fixture();
        let alice = account(20);
        let bob = account(21);
        let (node, _) = fix.wrap_suffix_name("frozen", alice, 30);
        fix.burn(alice, node, Fuse::CannotUnwrap | Fuse::CannotTransfer);

        let err = fix
            .wrapper
            .safe_transfer_from(alice, alice, bob, node, 1, &[])
            .unwrap_err();
        assert!(matches!(
            err,
            WrapperError::OperationForbiddenByFuse {
                fuse: Fuse::CannotTransfer,
                ..
            }
        ));
        assert_eq!(fix.wrapper.owner_of(node), Some(alice));
    }

    #[test]
    fn operator_transfers_on_behalf_of_the_owner() {
        let fix = fixture();
        let alice = account(20);
        let bob = account(21);
        let operator = account(22);
        let node = fix.wrap_plain_name("alpha", alice);

        let err = fix
            .wrapper
            .safe_transfer_from(operator, alice, bob, node, 1, &[])
            .unwrap_err();
        assert!(matches!(err, WrapperError::NotRecordOwner { .. }));

        fix.wrapper
            .set_approval_for_all(alice, operator, true)
            .unwrap();
        assert!(fix.wrapper.is_approved_for_all(alice, operator));
        fix.wrapper
            .safe_transfer_from(operator, alice, bob, node, 1, &[])
            .unwrap();
        assert_eq!(fix.wrapper.owner_of(node), Some(bob));
    }

    #[test]
    fn custody_tokens_are_indivisible() {
        let fix = fixture();
        let alice = account(20);
        let node = fix.wrap_plain_name("alpha", alice);

        let err = fix
            .wrapper
            .safe_transfer_from(alice, alice, account(21), node, 2, &[])
            .unwrap_err();
        assert!(matches!(err, WrapperError::InvalidAmount { amount: 2 }));
    }

    #[test]
    fn delegate_lifecycle_and_gating() {
        let fix = fixture();
        let alice = account(20);
        let bob = account(21);
        let carol = account(22);
        let (node, _) = fix.wrap_suffix_name("delegated", alice, 30);

        fix.wrapper.approve(alice, node, Some(carol)).unwrap();
        assert_eq!(fix.wrapper.get_approved(node), Some(carol));

        // Transfers clear the delegate.
        fix.wrapper
            .safe_transfer_from(alice, alice, bob, node, 1, &[])
            .unwrap();
        assert_eq!(fix.wrapper.get_approved(node), None);

        fix.burn(bob, node, Fuse::CannotUnwrap | Fuse::CannotApprove);
        let err = fix.wrapper.approve(bob, node, Some(carol)).unwrap_err();
        assert!(matches!(
            err,
            WrapperError::OperationForbiddenByFuse {
                fuse: Fuse::CannotApprove,
                ..
            }
        ));
    }

    #[test]
    fn balances_of_distinct_names_do_not_alias() {
        let fix = fixture();
        let alice = account(20);
        let bob = account(21);
        let (node_a, _) = fix.wrap_suffix_name("first", alice, 30);
        let (node_b, _) = fix.wrap_suffix_name("second", bob, 30);

        assert_eq!(fix.wrapper.balance_of(alice, node_a), 1);
        assert_eq!(fix.wrapper.balance_of(alice, node_b), 0);
        assert_eq!(fix.wrapper.balance_of(bob, node_b), 1);
        assert_eq!(fix.wrapper.balance_of(bob, node_a), 0);
        assert_ne!(node_a, node_b);
    }

    #[test]
    fn uri_comes_from_the_metadata_service() {
        let fix = fixture();
        let alice = account(20);
        let node = fix.wrap_plain_name("alpha", alice);
        assert!(fix.wrapper.uri(node).starts_with("namevault://metadata/"));
    }

    #[test]
    fn expired_name_reads_as_ownerless() {
        let fix = fixture();
        let alice = account(20);
        let (node, expiry) = fix.wrap_suffix_name("gone", alice, 1);
        fix.wrapper.approve(alice, node, Some(account(22))).unwrap();

        fix.clock
            .set(expiry + fix.wrapper.config.grace_period + 1);
        assert_eq!(fix.wrapper.owner_of(node), None);
        assert_eq!(fix.wrapper.balance_of(alice, node), 0);
        assert_eq!(fix.wrapper.get_approved(node), None);
    }
}
