//! Fuse validation errors.

use crate::set::FuseSet;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FuseError {
    /// The request carries bits outside the named catalogue.
    #[error("unknown fuse bits 0x{bits:08x}")]
    UnknownFuses { bits: u32 },
    /// The request would clear an already-burned bit, or the record is
    /// frozen by CANNOT_BURN_FUSES.
    #[error("invalid fuse transition: current [{current}], requested [{requested}]")]
    InvalidFuseTransition {
        current: FuseSet,
        requested: FuseSet,
    },
}
