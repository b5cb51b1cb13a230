//! Structural texture decode with checkerboard fallback.

use engine_param::ByteReader;
use tracing::error;

use crate::asset::{Asset, AssetError, AssetKind, AssetSource};

/// Payload schema version this loader understands.
pub const TEXTURE_VERSION: u32 = 1;

const PLACEHOLDER_SIZE: u32 = 64;
const PLACEHOLDER_CELL: u32 = 8;

/// The structural fields of a texture: dimensions and RGBA8 pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDefinition {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl TextureDefinition {
    /// The magenta/black checkerboard substituted when a texture fails to
    /// load.
    #[must_use]
    pub fn placeholder() -> Self {
        let size = PLACEHOLDER_SIZE;
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let cell = (x / PLACEHOLDER_CELL + y / PLACEHOLDER_CELL) % 2 == 0;
                if cell {
                    pixels.extend_from_slice(&[0xff, 0x00, 0xff, 0xff]);
                } else {
                    pixels.extend_from_slice(&[0x00, 0x00, 0x00, 0xff]);
                }
            }
        }
        Self {
            width: size,
            height: size,
            pixels,
        }
    }

    /// Decode the structural fields from a texture asset.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError`] on kind/version mismatch or a payload whose
    /// pixel data does not match its declared dimensions.
    pub fn decode(path: &str, asset: &Asset) -> Result<Self, AssetError> {
        if asset.kind != AssetKind::TEXTURE {
            return Err(AssetError::KindMismatch {
                path: path.to_string(),
                found: asset.kind.0,
                expected: AssetKind::TEXTURE.0,
            });
        }
        if asset.type_version != TEXTURE_VERSION {
            return Err(AssetError::VersionMismatch {
                path: path.to_string(),
                found: asset.type_version,
                expected: TEXTURE_VERSION,
            });
        }
        let mut reader = ByteReader::new(&asset.data);
        let decode = |reason: engine_param::ReadError| AssetError::Corrupt {
            path: path.to_string(),
            reason: reason.to_string(),
        };
        let width = reader.read_u32().map_err(decode)?;
        let height = reader.read_u32().map_err(decode)?;
        let expected = width as usize * height as usize * 4;
        if reader.remaining() < expected {
            return Err(AssetError::Corrupt {
                path: path.to_string(),
                reason: format!(
                    "pixel data truncated: {} of {expected} bytes",
                    reader.remaining()
                ),
            });
        }
        let pixels = asset.data[reader.offset()..reader.offset() + expected].to_vec();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Load a texture through `source`, substituting the placeholder on any
    /// failure. Never fails; failures are logged.
    pub fn load(source: &mut dyn AssetSource, path: &str) -> Self {
        match source
            .decompress_asset(path, true)
            .and_then(|asset| Self::decode(path, &asset))
        {
            Ok(texture) => texture,
            Err(err) => {
                error!(path, %err, "texture failed to load, using placeholder");
                Self::placeholder()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::MemoryAssets;

    fn encode_texture(width: u32, height: u32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&width.to_le_bytes());
        data.extend_from_slice(&height.to_le_bytes());
        data.extend(std::iter::repeat_n(0x80u8, (width * height * 4) as usize));
        data
    }

    #[test]
    fn test_decode_valid_texture() {
        let asset = Asset::new(AssetKind::TEXTURE, TEXTURE_VERSION, encode_texture(2, 3));
        let texture = TextureDefinition::decode("texture/t", &asset).unwrap();
        assert_eq!(texture.width, 2);
        assert_eq!(texture.height, 3);
        assert_eq!(texture.pixels.len(), 24);
    }

    #[test]
    fn test_version_mismatch_is_an_error() {
        let asset = Asset::new(AssetKind::TEXTURE, TEXTURE_VERSION + 1, encode_texture(1, 1));
        assert!(matches!(
            TextureDefinition::decode("texture/t", &asset),
            Err(AssetError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_truncated_pixels_is_an_error() {
        let mut data = encode_texture(4, 4);
        data.truncate(20);
        let asset = Asset::new(AssetKind::TEXTURE, TEXTURE_VERSION, data);
        assert!(matches!(
            TextureDefinition::decode("texture/t", &asset),
            Err(AssetError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_load_falls_back_to_placeholder() {
        let mut source = MemoryAssets::new();
        let texture = TextureDefinition::load(&mut source, "texture/missing");
        assert_eq!(texture, TextureDefinition::placeholder());
        assert_eq!(texture.width, 64);
        assert_eq!(texture.pixels.len(), 64 * 64 * 4);
    }

    #[test]
    fn test_placeholder_is_checkerboard() {
        let placeholder = TextureDefinition::placeholder();
        // Opposite corners of adjacent cells differ.
        let first = &placeholder.pixels[0..4];
        let neighbor_offset = (8 * 4) as usize;
        let neighbor = &placeholder.pixels[neighbor_offset..neighbor_offset + 4];
        assert_ne!(first, neighbor);
    }
}
