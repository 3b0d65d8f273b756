//! Typed fuse sets and the validated merge.

use crate::catalogue::{Fuse, KNOWN_FUSES};
use crate::errors::FuseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A set of fuses, stored as the wire-compatible 32-bit mask.
///
/// Serializes as the raw integer. Arbitrary bit patterns can be carried (a
/// caller's request is data, not yet a decision); [`validate`] is where
/// unknown bits are rejected and monotonicity is enforced.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FuseSet(u32);

impl FuseSet {
    /// No fuse burned.
    pub const EMPTY: FuseSet = FuseSet(0);

    /// Wrap a raw mask.
    pub const fn new(bits: u32) -> Self {
        FuseSet(bits)
    }

    /// The raw mask.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether no bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether `fuse` is burned in this set.
    pub const fn contains(self, fuse: Fuse) -> bool {
        self.0 & fuse.bit() != 0
    }

    /// Whether every bit of `other` is also set here.
    pub const fn contains_all(self, other: FuseSet) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether any bit is shared with `other`.
    pub const fn intersects(self, other: FuseSet) -> bool {
        self.0 & other.0 != 0
    }

    /// Bits present in both sets.
    pub const fn intersection(self, other: FuseSet) -> FuseSet {
        FuseSet(self.0 & other.0)
    }

    /// Bits of `self` not present in `other`.
    pub const fn difference(self, other: FuseSet) -> FuseSet {
        FuseSet(self.0 & !other.0)
    }

    /// Bits of both sets.
    pub const fn union(self, other: FuseSet) -> FuseSet {
        FuseSet(self.0 | other.0)
    }

    /// Bits set here that are outside the named catalogue.
    pub const fn unknown_bits(self) -> u32 {
        self.0 & !KNOWN_FUSES.bits()
    }

    /// Named fuses present, in bit order.
    pub fn iter(self) -> impl Iterator<Item = Fuse> {
        Fuse::ALL.into_iter().filter(move |fuse| self.contains(*fuse))
    }
}

impl From<Fuse> for FuseSet {
    fn from(fuse: Fuse) -> Self {
        FuseSet(fuse.bit())
    }
}

impl BitOr for FuseSet {
    type Output = FuseSet;
    fn bitor(self, rhs: FuseSet) -> FuseSet {
        self.union(rhs)
    }
}

impl BitOr<Fuse> for FuseSet {
    type Output = FuseSet;
    fn bitor(self, rhs: Fuse) -> FuseSet {
        FuseSet(self.0 | rhs.bit())
    }
}

impl BitOr for Fuse {
    type Output = FuseSet;
    fn bitor(self, rhs: Fuse) -> FuseSet {
        FuseSet(self.bit() | rhs.bit())
    }
}

impl BitOrAssign for FuseSet {
    fn bitor_assign(&mut self, rhs: FuseSet) {
        self.0 |= rhs.0;
    }
}

impl BitOrAssign<Fuse> for FuseSet {
    fn bitor_assign(&mut self, rhs: Fuse) {
        self.0 |= rhs.bit();
    }
}

impl fmt::Display for FuseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("CAN_DO_EVERYTHING");
        }
        let mut first = true;
        for fuse in self.iter() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(fuse.name())?;
            first = false;
        }
        let unknown = self.unknown_bits();
        if unknown != 0 {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "0x{unknown:08x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for FuseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FuseSet({self})")
    }
}

/// Merge `requested` into `current` under the burn rules.
///
/// `requested` is the full target mask. Fails when it carries bits outside
/// the catalogue, when it would clear a bit already burned in `current`, or
/// when `current` has `CANNOT_BURN_FUSES` and `requested` differs from it.
/// Returns the merged mask otherwise. This is the only mutation path for a
/// record's fuse field.
pub fn validate(requested: FuseSet, current: FuseSet) -> Result<FuseSet, FuseError> {
    let unknown = requested.unknown_bits();
    if unknown != 0 {
        return Err(FuseError::UnknownFuses { bits: unknown });
    }
    if !requested.contains_all(current) {
        return Err(FuseError::InvalidFuseTransition { current, requested });
    }
    if current.contains(Fuse::CannotBurnFuses) && requested != current {
        return Err(FuseError::InvalidFuseTransition { current, requested });
    }
    Ok(current.union(requested))
}
