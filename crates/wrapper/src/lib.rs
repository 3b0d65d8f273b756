//! Custodial wrapper for hierarchically-named ledger resources.
//!
//! Wrapping moves a name's ledger ownership under the wrapper's own
//! principal and mints a custody token to the logical owner, together with
//! a set of one-way permission fuses and an expiry. Burned fuses only ever
//! accumulate; a parent can constrain its children until it irrevocably
//! gives that right up; expired records soft-reset to unwrapped. A
//! configured successor generation can take over wrapped records through
//! the upgrade protocol without weakening any of their restrictions.
//!
//! The underlying ownership ledger, the expiry registrar for second-level
//! names, the clock, event delivery and token metadata are all injected
//! ports defined here and in `namevault-ledger`.

pub mod config;
pub mod errors;
pub mod events;
pub mod metadata;
pub mod policy;
pub mod records;
mod token;
pub mod upgrade;
pub mod wrapper;

pub use config::*;
pub use errors::*;
pub use events::*;
pub use metadata::*;
pub use policy::*;
pub use records::*;
pub use upgrade::*;
pub use wrapper::*;
