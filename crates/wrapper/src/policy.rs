//! Structural rules for fuse burning, beyond monotonicity.
//!
//! Monotonicity (a burned bit stays burned) lives in the fuse crate. What
//! else a burn must satisfy (which bits a parent may impose on a child,
//! and when owner-side restrictions count as permanent) is policy, kept
//! behind a trait because the inheritance rule is a deployment decision.

use crate::records::NameRecord;
use namevault_fuses::{
    Fuse, FuseSet, OWNER_CONTROLLED_FUSES, PARENT_CONTROLLED_FUSES, SETTABLE_FUSES,
};
use namevault_types::NodeId;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("fuses [{fuses}] cannot be requested through this entry point")]
    NotSettable { fuses: FuseSet },

    #[error("fuses [{fuses}] are outside the owner-controlled range")]
    NotOwnerControlled { fuses: FuseSet },

    #[error(
        "owner-controlled fuses on node {node} require PARENT_CANNOT_CONTROL \
         and CANNOT_UNWRAP in the same record"
    )]
    UnlockedOwnerFuses { node: NodeId },

    #[error("the parent of node {node} must burn CANNOT_UNWRAP before imposing parent-side fuses")]
    ParentStillUnwrappable { node: NodeId },
}

/// Decides whether a fuse burn is structurally permitted.
pub trait BurnPolicy: Send + Sync {
    /// Applied at every burn site to the record's resulting fuse set.
    fn check_burn(&self, node: NodeId, resulting: FuseSet) -> Result<(), PolicyViolation>;

    /// Applied when a parent imposes `requested` on a child record.
    fn check_child_grant(
        &self,
        node: NodeId,
        parent: &NameRecord,
        requested: FuseSet,
    ) -> Result<(), PolicyViolation>;
}

/// Default policy: restrictions only bind once they cannot be undone.
///
/// - A child restriction the parent could still erase (by replacing the
///   record) is no restriction, so burning any owner-controlled fuse
///   requires `PARENT_CANNOT_CONTROL` in the resulting set.
/// - A permanent-looking record under a parent that can still abandon
///   custody is no guarantee either, so the same burn requires
///   `CANNOT_UNWRAP` alongside it, and a parent must have burned its own
///   `CANNOT_UNWRAP` before imposing parent-side fuses on a child.
/// - `CAN_EXTEND_EXPIRY` is independent of parental scope and exempt from
///   the parent lock requirement.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmancipationPolicy;

impl EmancipationPolicy {
    const LOCK: FuseSet =
        FuseSet::new(Fuse::ParentCannotControl.bit() | Fuse::CannotUnwrap.bit());
}

impl BurnPolicy for EmancipationPolicy {
    fn check_burn(&self, node: NodeId, resulting: FuseSet) -> Result<(), PolicyViolation> {
        if resulting.intersects(OWNER_CONTROLLED_FUSES) && !resulting.contains_all(Self::LOCK) {
            return Err(PolicyViolation::UnlockedOwnerFuses { node });
        }
        Ok(())
    }

    fn check_child_grant(
        &self,
        node: NodeId,
        parent: &NameRecord,
        requested: FuseSet,
    ) -> Result<(), PolicyViolation> {
        let unsettable = requested.difference(SETTABLE_FUSES);
        if !unsettable.is_empty() {
            return Err(PolicyViolation::NotSettable { fuses: unsettable });
        }
        let guarded = requested
            .intersection(PARENT_CONTROLLED_FUSES)
            .difference(FuseSet::from(Fuse::CanExtendExpiry));
        if !guarded.is_empty() && !parent.fuses.contains(Fuse::CannotUnwrap) {
            return Err(PolicyViolation::ParentStillUnwrappable { node });
        }
        Ok(())
    }
}
