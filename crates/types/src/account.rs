//! Account principals holding or operating on wrapped names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of raw bytes in an account identifier.
pub const ACCOUNT_BYTES: usize = 32;

/// Address-like principal.
///
/// Accounts are opaque 32-byte identifiers; the wrapper compares them for
/// equality and never interprets their contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub [u8; ACCOUNT_BYTES]);

impl AccountId {
    /// All-zero sentinel, rejected wherever a real owner is required.
    pub const ZERO: AccountId = AccountId([0u8; ACCOUNT_BYTES]);

    /// Create from a raw byte array.
    pub fn new(bytes: [u8; ACCOUNT_BYTES]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; ACCOUNT_BYTES] {
        &self.0
    }
}

impl From<[u8; ACCOUNT_BYTES]> for AccountId {
    fn from(bytes: [u8; ACCOUNT_BYTES]) -> Self {
        AccountId(bytes)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
