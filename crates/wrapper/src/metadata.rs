//! Custody-token metadata port.

use namevault_types::NodeId;

/// Resolves the metadata URI for a wrapped name's custody token.
pub trait MetadataService: Send + Sync {
    fn uri(&self, node: NodeId) -> String;
}

/// Static service: a fixed base with the hex node id appended.
#[derive(Debug, Clone)]
pub struct StaticMetadata {
    base: String,
}

impl StaticMetadata {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl Default for StaticMetadata {
    fn default() -> Self {
        Self::new("namevault://metadata/")
    }
}

impl MetadataService for StaticMetadata {
    fn uri(&self, node: NodeId) -> String {
        format!("{}{}", self.base, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_appends_hex_node() {
        let service = StaticMetadata::new("https://meta.example/name/");
        let uri = service.uri(NodeId([0xab; 32]));
        assert!(uri.starts_with("https://meta.example/name/abab"));
        assert_eq!(uri.len(), "https://meta.example/name/".len() + 64);
    }
}
