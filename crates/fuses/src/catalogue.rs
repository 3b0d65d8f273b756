//! The fuse catalogue: every named permission bit and the masks scoping who
//! may burn them.
//!
//! Bit positions are part of the observable surface and must never change.
//! The low half of the word is owner controlled; bits from `1 << 16` up are
//! parent controlled.

use crate::set::FuseSet;
use std::fmt;

/// A single named permission bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Fuse {
    /// The name can never leave wrapped custody again.
    CannotUnwrap = 1,
    /// No further fuse may ever be burned.
    CannotBurnFuses = 1 << 1,
    /// The custody token cannot change owner.
    CannotTransfer = 1 << 2,
    /// The resolver record is frozen.
    CannotSetResolver = 1 << 3,
    /// The TTL record is frozen.
    CannotSetTtl = 1 << 4,
    /// The owner may not mint new child records.
    CannotCreateSubdomain = 1 << 5,
    /// The owner cannot delegate a per-name approval.
    CannotApprove = 1 << 6,
    /// The parent loses its override right over this record.
    ParentCannotControl = 1 << 16,
    /// The name is a second-level name governed by the expiry registrar.
    /// Only the wrapper itself applies this bit.
    IsDotEth = 1 << 17,
    /// The owner may push expiry forward independent of the parent.
    CanExtendExpiry = 1 << 18,
}

impl Fuse {
    /// Every named fuse, in bit order.
    pub const ALL: [Fuse; 10] = [
        Fuse::CannotUnwrap,
        Fuse::CannotBurnFuses,
        Fuse::CannotTransfer,
        Fuse::CannotSetResolver,
        Fuse::CannotSetTtl,
        Fuse::CannotCreateSubdomain,
        Fuse::CannotApprove,
        Fuse::ParentCannotControl,
        Fuse::IsDotEth,
        Fuse::CanExtendExpiry,
    ];

    /// The raw bit for this fuse.
    pub const fn bit(self) -> u32 {
        self as u32
    }

    /// Canonical upper-case name, as it appears in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Fuse::CannotUnwrap => "CANNOT_UNWRAP",
            Fuse::CannotBurnFuses => "CANNOT_BURN_FUSES",
            Fuse::CannotTransfer => "CANNOT_TRANSFER",
            Fuse::CannotSetResolver => "CANNOT_SET_RESOLVER",
            Fuse::CannotSetTtl => "CANNOT_SET_TTL",
            Fuse::CannotCreateSubdomain => "CANNOT_CREATE_SUBDOMAIN",
            Fuse::CannotApprove => "CANNOT_APPROVE",
            Fuse::ParentCannotControl => "PARENT_CANNOT_CONTROL",
            Fuse::IsDotEth => "IS_DOT_ETH",
            Fuse::CanExtendExpiry => "CAN_EXTEND_EXPIRY",
        }
    }
}

impl fmt::Display for Fuse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The empty set: no restriction burned.
pub const CAN_DO_EVERYTHING: FuseSet = FuseSet::EMPTY;

/// Bits the record's own owner may burn.
pub const OWNER_CONTROLLED_FUSES: FuseSet = FuseSet::new(0x0000_FFFF);

/// Bits only the parent's controller may burn.
pub const PARENT_CONTROLLED_FUSES: FuseSet = FuseSet::new(0xFFFF_0000);

/// Every bit in the catalogue.
pub const KNOWN_FUSES: FuseSet = FuseSet::new(
    Fuse::CannotUnwrap.bit()
        | Fuse::CannotBurnFuses.bit()
        | Fuse::CannotTransfer.bit()
        | Fuse::CannotSetResolver.bit()
        | Fuse::CannotSetTtl.bit()
        | Fuse::CannotCreateSubdomain.bit()
        | Fuse::CannotApprove.bit()
        | Fuse::ParentCannotControl.bit()
        | Fuse::IsDotEth.bit()
        | Fuse::CanExtendExpiry.bit(),
);

/// Every bit a caller may request. The registrar-suffix marker is excluded:
/// the wrapper applies it itself when wrapping a registrar-governed name.
pub const SETTABLE_FUSES: FuseSet = FuseSet::new(KNOWN_FUSES.bits() & !Fuse::IsDotEth.bit());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_positions_are_fixed() {
        assert_eq!(Fuse::CannotUnwrap.bit(), 1);
        assert_eq!(Fuse::CannotBurnFuses.bit(), 2);
        assert_eq!(Fuse::CannotTransfer.bit(), 4);
        assert_eq!(Fuse::CannotSetResolver.bit(), 8);
        assert_eq!(Fuse::CannotSetTtl.bit(), 16);
        assert_eq!(Fuse::CannotCreateSubdomain.bit(), 32);
        assert_eq!(Fuse::CannotApprove.bit(), 64);
        assert_eq!(Fuse::ParentCannotControl.bit(), 1 << 16);
        assert_eq!(Fuse::IsDotEth.bit(), 1 << 17);
        assert_eq!(Fuse::CanExtendExpiry.bit(), 1 << 18);
        assert_eq!(CAN_DO_EVERYTHING.bits(), 0);
    }

    #[test]
    fn all_table_has_distinct_single_bits() {
        let mut seen = 0u32;
        for fuse in Fuse::ALL {
            let bit = fuse.bit();
            assert_eq!(bit.count_ones(), 1, "{fuse} is not a single bit");
            assert_eq!(seen & bit, 0, "{fuse} duplicates a bit");
            seen |= bit;
        }
        assert_eq!(seen, KNOWN_FUSES.bits());
    }

    #[test]
    fn masks_partition_the_word() {
        assert_eq!(
            OWNER_CONTROLLED_FUSES.bits() & PARENT_CONTROLLED_FUSES.bits(),
            0
        );
        assert_eq!(
            OWNER_CONTROLLED_FUSES.bits() | PARENT_CONTROLLED_FUSES.bits(),
            u32::MAX
        );
    }

    #[test]
    fn settable_excludes_only_the_suffix_marker() {
        assert!(!SETTABLE_FUSES.contains(Fuse::IsDotEth));
        for fuse in Fuse::ALL {
            if fuse != Fuse::IsDotEth {
                assert!(SETTABLE_FUSES.contains(fuse), "{fuse} should be settable");
            }
        }
    }
}
