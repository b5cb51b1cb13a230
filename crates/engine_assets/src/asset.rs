//! The decompressed-asset contract.

use std::collections::HashMap;

/// Asset payload type tag, as stored in the container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetKind(pub u32);

impl AssetKind {
    pub const TEXTURE: Self = Self(1);
    pub const MODEL: Self = Self(2);
    pub const MAP: Self = Self(3);
    pub const SOUND: Self = Self(4);
}

/// A decompressed asset: type tag, payload schema version, and payload.
#[derive(Debug, Clone)]
pub struct Asset {
    pub kind: AssetKind,
    pub type_version: u32,
    pub data: Vec<u8>,
}

impl Asset {
    /// Create an asset record.
    #[must_use]
    pub fn new(kind: AssetKind, type_version: u32, data: Vec<u8>) -> Self {
        Self {
            kind,
            type_version,
            data,
        }
    }
}

/// Errors from asset retrieval and structural decode.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// No asset exists at the path.
    #[error("asset not found: {0}")]
    NotFound(String),

    /// The container or payload failed to decode.
    #[error("corrupt asset {path}: {reason}")]
    Corrupt { path: String, reason: String },

    /// The payload type tag did not match what the loader expected.
    #[error("asset {path} has kind {found}, expected {expected}")]
    KindMismatch {
        path: String,
        found: u32,
        expected: u32,
    },

    /// The payload schema version did not match what the loader expected.
    #[error("asset {path} has version {found}, expected {expected}")]
    VersionMismatch {
        path: String,
        found: u32,
        expected: u32,
    },
}

/// The consumed retrieval capability: fetch and decompress an asset by
/// path. The container format (magic tag, zlib framing, cache policy) is
/// the implementor's concern.
pub trait AssetSource: Send {
    /// Fetch the decompressed asset at `path`. `cache` hints that the
    /// source may keep the decoded bytes resident.
    fn decompress_asset(&mut self, path: &str, cache: bool) -> Result<Asset, AssetError>;
}

/// An in-memory [`AssetSource`] for tests and generated content.
#[derive(Debug, Default)]
pub struct MemoryAssets {
    assets: HashMap<String, Asset>,
}

impl MemoryAssets {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an asset at `path`, replacing any existing one.
    pub fn insert(&mut self, path: impl Into<String>, asset: Asset) {
        self.assets.insert(path.into(), asset);
    }
}

impl AssetSource for MemoryAssets {
    fn decompress_asset(&mut self, path: &str, _cache: bool) -> Result<Asset, AssetError> {
        self.assets
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_hit_and_miss() {
        let mut source = MemoryAssets::new();
        source.insert("model/crate", Asset::new(AssetKind::MODEL, 1, vec![1, 2, 3]));

        let asset = source.decompress_asset("model/crate", false).unwrap();
        assert_eq!(asset.kind, AssetKind::MODEL);
        assert_eq!(asset.data, vec![1, 2, 3]);

        assert!(matches!(
            source.decompress_asset("model/missing", false),
            Err(AssetError::NotFound(_))
        ));
    }
}
