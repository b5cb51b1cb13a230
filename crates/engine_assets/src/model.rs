//! Structural model decode with degenerate-model fallback.

use std::collections::HashMap;
use std::sync::Arc;

use engine_param::ByteReader;
use glam::Vec3;
use tracing::error;

use crate::asset::{Asset, AssetError, AssetKind, AssetSource};

/// Payload schema version this loader understands.
pub const MODEL_VERSION: u32 = 2;

/// Collision data a model ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionModelType {
    /// No collision mesh; only the bounding box is usable.
    None,
    /// A full collision mesh is present.
    Mesh,
}

/// One level-of-detail record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelLod {
    /// Squared camera distance at which this LOD becomes active.
    pub distance_squared: f32,
    /// Triangle count, for renderer bookkeeping.
    pub triangle_count: u32,
}

/// The structural fields of a model the actor core reads: skins, LOD
/// thresholds, and collision extents. Mesh data stays with the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDefinition {
    pub name: String,
    pub skin_count: u32,
    /// LOD records ordered nearest-first; index 0 is the full-detail mesh.
    pub lods: Vec<ModelLod>,
    pub collision: CollisionModelType,
    /// Half extents of the model's axis-aligned bounding box.
    pub bounding_half_extents: Vec3,
}

impl ModelDefinition {
    /// Number of LOD levels. Always at least 1.
    #[must_use]
    pub fn lod_count(&self) -> usize {
        self.lods.len()
    }

    /// The degenerate model substituted when a model fails to load: one
    /// skin, one LOD, unit bounds, no collision mesh.
    #[must_use]
    pub fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            skin_count: 1,
            lods: vec![ModelLod {
                distance_squared: 0.0,
                triangle_count: 0,
            }],
            collision: CollisionModelType::None,
            bounding_half_extents: Vec3::splat(0.5),
        }
    }

    /// Decode the structural fields from a model asset.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError`] on kind/version mismatch or truncated payload.
    pub fn decode(path: &str, asset: &Asset) -> Result<Self, AssetError> {
        if asset.kind != AssetKind::MODEL {
            return Err(AssetError::KindMismatch {
                path: path.to_string(),
                found: asset.kind.0,
                expected: AssetKind::MODEL.0,
            });
        }
        if asset.type_version != MODEL_VERSION {
            return Err(AssetError::VersionMismatch {
                path: path.to_string(),
                found: asset.type_version,
                expected: MODEL_VERSION,
            });
        }
        let mut reader = ByteReader::new(&asset.data);
        let decode = |reason: engine_param::ReadError| AssetError::Corrupt {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let skin_count = reader.read_u32().map_err(decode)?.max(1);
        let lod_count = reader.read_u32().map_err(decode)?.max(1);
        let mut lods = Vec::with_capacity(lod_count as usize);
        for _ in 0..lod_count {
            lods.push(ModelLod {
                distance_squared: reader.read_f32().map_err(decode)?,
                triangle_count: reader.read_u32().map_err(decode)?,
            });
        }
        let collision = match reader.read_u8().map_err(decode)? {
            0 => CollisionModelType::None,
            _ => CollisionModelType::Mesh,
        };
        let bounding_half_extents = Vec3::new(
            reader.read_f32().map_err(decode)?,
            reader.read_f32().map_err(decode)?,
            reader.read_f32().map_err(decode)?,
        );

        Ok(Self {
            name: path.to_string(),
            skin_count,
            lods,
            collision,
            bounding_half_extents,
        })
    }
}

/// Path-keyed model cache. Loads through an [`AssetSource`] once and hands
/// out shared definitions; failed loads cache the placeholder so a broken
/// model logs once, not every spawn.
#[derive(Debug, Default)]
pub struct ModelCache {
    models: HashMap<String, Arc<ModelDefinition>>,
}

impl ModelCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if nothing has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Fetch the model at `path`, loading it on first use. Substitutes the
    /// placeholder (and logs) on failure. Never fails.
    pub fn load(&mut self, source: &mut dyn AssetSource, path: &str) -> Arc<ModelDefinition> {
        if let Some(model) = self.models.get(path) {
            return Arc::clone(model);
        }
        let model = match source
            .decompress_asset(path, true)
            .and_then(|asset| ModelDefinition::decode(path, &asset))
        {
            Ok(model) => Arc::new(model),
            Err(err) => {
                error!(path, %err, "model failed to load, using placeholder");
                Arc::new(ModelDefinition::placeholder(path))
            }
        };
        self.models.insert(path.to_string(), Arc::clone(&model));
        model
    }
}
