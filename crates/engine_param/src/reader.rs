//! Bounded little-endian reader for authored binary data.
//!
//! The map format stores numbers little-endian and strings as a `u64` byte
//! length followed by UTF-8 bytes. Every read is bounds-checked; truncated
//! data surfaces as a [`ReadError`] for the caller to treat as a content
//! defect.

use crate::kvlist::KvList;
use crate::param::{Param, ParamKind};
use crate::Color;

/// Errors produced while decoding binary content.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The buffer ended before the requested bytes.
    #[error("unexpected end of data at offset {offset}: wanted {wanted} more bytes")]
    UnexpectedEof { offset: usize, wanted: usize },

    /// A string field held invalid UTF-8.
    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// An unknown parameter tag byte.
    #[error("unknown param tag {tag} at offset {offset}")]
    UnknownParamTag { tag: u8, offset: usize },

    /// A declared length is larger than the remaining data.
    #[error("declared length {length} at offset {offset} exceeds remaining data")]
    LengthOutOfRange { length: u64, offset: usize },
}

/// A cursor over a byte slice with bounds-checked primitive reads.
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader over `data`, positioned at the start.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current read position.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left to read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Returns `true` when the cursor has consumed the whole buffer.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.offset == self.data.len()
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], ReadError> {
        if self.remaining() < count {
            return Err(ReadError::UnexpectedEof {
                offset: self.offset,
                wanted: count - self.remaining(),
            });
        }
        let slice = &self.data[self.offset..self.offset + count];
        self.offset += count;
        Ok(slice)
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        Ok(self.take(1)?[0])
    }

    /// Read a little-endian `i32`.
    pub fn read_i32(&mut self) -> Result<i32, ReadError> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a little-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a little-endian `u64`.
    pub fn read_u64(&mut self) -> Result<u64, ReadError> {
        let bytes = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(buf))
    }

    /// Read a little-endian `f32`.
    pub fn read_f32(&mut self) -> Result<f32, ReadError> {
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a length-prefixed UTF-8 string (`u64` byte count + bytes).
    pub fn read_string(&mut self) -> Result<String, ReadError> {
        let start = self.offset;
        let length = self.read_u64()?;
        if length > self.remaining() as u64 {
            return Err(ReadError::LengthOutOfRange {
                length,
                offset: start,
            });
        }
        let bytes = self.take(length as usize)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ReadError::InvalidUtf8 { offset: start })
    }

    /// Read a tagged [`Param`]: one tag byte followed by the variant payload.
    pub fn read_param(&mut self) -> Result<Param, ReadError> {
        let tag_offset = self.offset;
        let tag = self.read_u8()?;
        let Some(kind) = ParamKind::from_tag(tag) else {
            return Err(ReadError::UnknownParamTag {
                tag,
                offset: tag_offset,
            });
        };
        Ok(match kind {
            ParamKind::Byte => Param::Byte(self.read_u8()?),
            ParamKind::Int => Param::Int(self.read_i32()?),
            ParamKind::Float => Param::Float(self.read_f32()?),
            ParamKind::Bool => Param::Bool(self.read_u8()? != 0),
            ParamKind::String => Param::String(self.read_string()?),
            ParamKind::None => Param::None,
            ParamKind::Color => Param::Color(Color::rgba(
                self.read_f32()?,
                self.read_f32()?,
                self.read_f32()?,
                self.read_f32()?,
            )),
            ParamKind::Array => {
                let start = self.offset;
                let length = self.read_u64()?;
                // Each element takes at least a tag byte.
                if length > self.remaining() as u64 {
                    return Err(ReadError::LengthOutOfRange {
                        length,
                        offset: start,
                    });
                }
                let mut items = Vec::with_capacity(length as usize);
                for _ in 0..length {
                    items.push(self.read_param()?);
                }
                Param::Array(items)
            }
            ParamKind::KvList => Param::KvList(self.read_kvlist()?),
            ParamKind::Uint64 => Param::Uint64(self.read_u64()?),
        })
    }

    /// Read a [`KvList`]: a `u64` entry count followed by key/param pairs.
    pub fn read_kvlist(&mut self) -> Result<KvList, ReadError> {
        let start = self.offset;
        let count = self.read_u64()?;
        if count > self.remaining() as u64 {
            return Err(ReadError::LengthOutOfRange {
                length: count,
                offset: start,
            });
        }
        let mut list = KvList::new();
        for _ in 0..count {
            let key = self.read_string()?;
            let value = self.read_param()?;
            list.set(key, value);
        }
        Ok(list)
    }
}
