//! One-way permission fuses for wrapped names.
//!
//! A fuse is a single permission bit that can only move from unset to set
//! ("burned") for the lifetime of a name record. This crate owns the bit
//! catalogue, the typed set over it, and the validated merge every record
//! mutation goes through. No other crate does raw bit arithmetic on fuses.

pub mod catalogue;
pub mod errors;
pub mod set;

pub use catalogue::*;
pub use errors::*;
pub use set::*;
