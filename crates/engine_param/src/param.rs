//! The tagged transport value.
//!
//! A [`Param`] is the single value type that flows through the signal graph:
//! connection overrides, signal payloads, and the entries of construction
//! [`KvList`]s are all `Param`s. Owned payloads (`String`, `Array`, `KvList`)
//! are deep-copied on clone and freed with their owner — two copies never
//! share a backing allocation.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::kvlist::KvList;

/// The variant tag of a [`Param`], matching the wire encoding.
///
/// Tag values are part of the map binary format and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ParamKind {
    Byte = 0,
    Int = 1,
    Float = 2,
    Bool = 3,
    String = 4,
    None = 5,
    Color = 6,
    Array = 7,
    KvList = 8,
    Uint64 = 9,
}

impl ParamKind {
    /// The wire tag byte for this kind.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Decode a wire tag byte. Returns `None` for unknown tags.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            0 => Self::Byte,
            1 => Self::Int,
            2 => Self::Float,
            3 => Self::Bool,
            4 => Self::String,
            5 => Self::None,
            6 => Self::Color,
            7 => Self::Array,
            8 => Self::KvList,
            9 => Self::Uint64,
            _ => return None,
        })
    }
}

/// A tagged value with deep-copy semantics.
///
/// Exactly one variant is active. `Param::None` is the absent/placeholder
/// value; connection overrides use it to mean "no override".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Param {
    Byte(u8),
    Int(i32),
    Float(f32),
    Bool(bool),
    String(String),
    #[default]
    None,
    Color(Color),
    Array(Vec<Param>),
    KvList(KvList),
    Uint64(u64),
}

impl Param {
    /// The variant tag of this value.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::Byte(_) => ParamKind::Byte,
            Self::Int(_) => ParamKind::Int,
            Self::Float(_) => ParamKind::Float,
            Self::Bool(_) => ParamKind::Bool,
            Self::String(_) => ParamKind::String,
            Self::None => ParamKind::None,
            Self::Color(_) => ParamKind::Color,
            Self::Array(_) => ParamKind::Array,
            Self::KvList(_) => ParamKind::KvList,
            Self::Uint64(_) => ParamKind::Uint64,
        }
    }

    /// Returns `true` for `Param::None`.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The integer payload, if this is an `Int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The float payload, if this is a `Float`.
    #[must_use]
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The bool payload, if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The string payload, if this is a `String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_match_wire_order() {
        assert_eq!(ParamKind::Byte.tag(), 0);
        assert_eq!(ParamKind::String.tag(), 4);
        assert_eq!(ParamKind::None.tag(), 5);
        assert_eq!(ParamKind::Uint64.tag(), 9);
    }

    #[test]
    fn test_tag_roundtrip() {
        for tag in 0..=9 {
            let kind = ParamKind::from_tag(tag).unwrap();
            assert_eq!(kind.tag(), tag);
        }
        assert!(ParamKind::from_tag(10).is_none());
    }

    #[test]
    fn test_clone_is_deep_for_strings() {
        let original = Param::String("payload".to_string());
        let copy = original.clone();
        drop(original);
        assert_eq!(copy.as_str(), Some("payload"));
    }

    #[test]
    fn test_clone_is_deep_for_nested_arrays() {
        let mut inner = KvList::new();
        inner.set_int("depth", 2);
        let original = Param::Array(vec![
            Param::Int(1),
            Param::KvList(inner),
            Param::Array(vec![Param::String("leaf".to_string())]),
        ]);
        let copy = original.clone();
        drop(original);

        let Param::Array(items) = &copy else {
            panic!("clone changed variant");
        };
        assert_eq!(items.len(), 3);
        let Param::KvList(list) = &items[1] else {
            panic!("nested kvlist lost");
        };
        assert_eq!(list.get_int("depth", 0), 2);
    }

    #[test]
    fn test_default_is_none() {
        assert!(Param::default().is_none());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let param = Param::Array(vec![
            Param::Bool(true),
            Param::Color(Color::rgb(0.5, 0.25, 0.125)),
            Param::Uint64(u64::MAX),
        ]);
        let bytes = rmp_serde::to_vec(&param).unwrap();
        let restored: Param = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(param, restored);
    }
}
