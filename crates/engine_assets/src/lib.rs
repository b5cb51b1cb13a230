//! # engine_assets
//!
//! The boundary between the actor core and asset storage. Container
//! decompression (magic framing, zlib) lives behind the [`AssetSource`]
//! trait; this crate decodes the *structural* fields the core needs from
//! model and texture payloads and supplies placeholder fallbacks when an
//! asset is missing, corrupt, or version-mismatched.
//!
//! Asset failure is never fatal: a level with broken art degrades visually
//! and keeps running.

pub mod asset;
pub mod model;
pub mod texture;

pub use asset::{Asset, AssetError, AssetKind, AssetSource, MemoryAssets};
pub use model::{CollisionModelType, ModelCache, ModelDefinition, ModelLod, MODEL_VERSION};
pub use texture::{TextureDefinition, TEXTURE_VERSION};
