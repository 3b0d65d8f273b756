//! Shared identifiers for the namevault workspace.
//!
//! Provides account principals, hierarchical name identifiers and their
//! derivation rules, and the wire-format name encoding passed across
//! operation boundaries (e.g. into the migration protocol).

pub mod account;
pub mod name;

pub use account::*;
pub use name::*;

/// Seconds in one day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Fixed window after a name's expiry during which the name is expired for
/// control purposes but not yet reclaimable by third parties.
pub const GRACE_PERIOD: u64 = 90 * SECONDS_PER_DAY;
