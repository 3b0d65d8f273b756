//! Collaborator ports for the namevault wrapper.
//!
//! The wrapper treats the underlying ownership ledger, the expiry registrar
//! for second-level names, and wall-clock time as injected collaborators.
//! This crate defines those ports and ships the in-memory reference
//! implementations used by tests and demos.

pub mod clock;
pub mod errors;
pub mod registrar;
pub mod registry;

pub use clock::*;
pub use errors::*;
pub use registrar::*;
pub use registry::*;
