//! Hierarchical name identifiers and the wire-format name encoding.
//!
//! Names form a tree rooted at [`ROOT_NODE`]. A name's identity is the
//! digest chain over its labels: `child = sha256(parent || sha256(label))`.
//! Operations that need the full label path (the migration protocol, wrap
//! entry points) carry an [`EncodedName`], which is the length-prefixed wire
//! form of the name; everything else addresses records by [`NodeId`].

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

/// Maximum byte length of a single label in the wire encoding.
pub const MAX_LABEL_LEN: usize = 255;

/// Digest identity of a name node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub [u8; 32]);

/// Identity of the name tree root (the empty name).
pub const ROOT_NODE: NodeId = NodeId([0u8; 32]);

impl NodeId {
    /// Get the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Digest of a single label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelHash(pub [u8; 32]);

impl LabelHash {
    /// Get the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for LabelHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Hash one label.
pub fn label_hash(label: &[u8]) -> LabelHash {
    let mut hasher = Sha256::new();
    hasher.update(label);
    LabelHash(hasher.finalize().into())
}

/// Derive a child node identity from its parent and hashed label.
pub fn child_node(parent: NodeId, label: LabelHash) -> NodeId {
    let mut hasher = Sha256::new();
    hasher.update(parent.0);
    hasher.update(label.0);
    NodeId(hasher.finalize().into())
}

/// Errors raised while decoding or constructing wire-format names.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameCodecError {
    #[error("encoded name is empty")]
    Empty,
    #[error("encoded name is missing the zero terminator")]
    MissingTerminator,
    #[error("label at offset {offset} declares {length} bytes past the end of the buffer")]
    TruncatedLabel { offset: usize, length: usize },
    #[error("{trailing} trailing bytes after the zero terminator")]
    TrailingBytes { trailing: usize },
    #[error("label length {length} is outside 1..=255")]
    InvalidLabelLength { length: usize },
    #[error("label contains a dot")]
    DottedLabel,
}

/// Wire-format name: a sequence of length-prefixed labels, leaf first,
/// terminated by a zero byte.
///
/// The root name is the single byte `0x00`. Deserialization goes through
/// [`EncodedName::from_bytes`], so a decoded value is always well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "serde_bytes::ByteBuf", into = "serde_bytes::ByteBuf")]
pub struct EncodedName(Vec<u8>);

impl EncodedName {
    /// The root name.
    pub fn root() -> Self {
        EncodedName(vec![0])
    }

    /// Decode and validate a wire-format buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, NameCodecError> {
        if bytes.is_empty() {
            return Err(NameCodecError::Empty);
        }
        let mut offset = 0usize;
        loop {
            let Some(&len) = bytes.get(offset) else {
                return Err(NameCodecError::MissingTerminator);
            };
            if len == 0 {
                let trailing = bytes.len() - offset - 1;
                if trailing != 0 {
                    return Err(NameCodecError::TrailingBytes { trailing });
                }
                return Ok(EncodedName(bytes.to_vec()));
            }
            let length = len as usize;
            let end = offset + 1 + length;
            if end > bytes.len() {
                return Err(NameCodecError::TruncatedLabel { offset, length });
            }
            offset = end;
        }
    }

    /// Build from dotted text, e.g. `"vault.example"`. The empty string maps
    /// to the root name.
    pub fn from_dotted(name: &str) -> Result<Self, NameCodecError> {
        if name.is_empty() {
            return Ok(Self::root());
        }
        let mut out = Vec::with_capacity(name.len() + 2);
        for label in name.split('.') {
            push_label(&mut out, label.as_bytes())?;
        }
        out.push(0);
        Ok(EncodedName(out))
    }

    /// Get the raw wire bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether this is the root name.
    pub fn is_root(&self) -> bool {
        self.0 == [0]
    }

    /// Labels in wire order, leaf first.
    pub fn labels(&self) -> Vec<&[u8]> {
        let mut labels = Vec::new();
        let mut offset = 0usize;
        while self.0[offset] != 0 {
            let len = self.0[offset] as usize;
            labels.push(&self.0[offset + 1..offset + 1 + len]);
            offset += 1 + len;
        }
        labels
    }

    /// The leaf (first) label, or `None` for the root name.
    pub fn leaf_label(&self) -> Option<&[u8]> {
        if self.is_root() {
            return None;
        }
        let len = self.0[0] as usize;
        Some(&self.0[1..1 + len])
    }

    /// Hash of the leaf label, or `None` for the root name.
    pub fn leaf_labelhash(&self) -> Option<LabelHash> {
        self.leaf_label().map(label_hash)
    }

    /// Identity of this name.
    pub fn node(&self) -> NodeId {
        self.labels()
            .iter()
            .rev()
            .fold(ROOT_NODE, |parent, label| {
                child_node(parent, label_hash(label))
            })
    }

    /// Identity of this name's parent, or `None` for the root name.
    pub fn parent_node(&self) -> Option<NodeId> {
        if self.is_root() {
            return None;
        }
        let labels = self.labels();
        Some(labels[1..].iter().rev().fold(ROOT_NODE, |parent, label| {
            child_node(parent, label_hash(label))
        }))
    }

    /// Prepend one label, producing the encoding of `label.self`.
    pub fn child(&self, label: &str) -> Result<Self, NameCodecError> {
        let mut out = Vec::with_capacity(self.0.len() + label.len() + 1);
        push_label(&mut out, label.as_bytes())?;
        out.extend_from_slice(&self.0);
        Ok(EncodedName(out))
    }

    /// Render as dotted text. Non-UTF-8 label bytes are replaced.
    pub fn to_dotted(&self) -> String {
        self.labels()
            .iter()
            .map(|label| String::from_utf8_lossy(label).into_owned())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl TryFrom<serde_bytes::ByteBuf> for EncodedName {
    type Error = NameCodecError;

    fn try_from(bytes: serde_bytes::ByteBuf) -> Result<Self, Self::Error> {
        EncodedName::from_bytes(&bytes)
    }
}

impl From<EncodedName> for serde_bytes::ByteBuf {
    fn from(name: EncodedName) -> Self {
        serde_bytes::ByteBuf::from(name.0)
    }
}

fn push_label(out: &mut Vec<u8>, label: &[u8]) -> Result<(), NameCodecError> {
    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return Err(NameCodecError::InvalidLabelLength {
            length: label.len(),
        });
    }
    if label.contains(&b'.') {
        return Err(NameCodecError::DottedLabel);
    }
    out.push(label.len() as u8);
    out.extend_from_slice(label);
    Ok(())
}

impl fmt::Display for EncodedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.to_dotted())
        }
    }
}
