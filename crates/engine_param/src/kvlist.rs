//! String-keyed property bag.
//!
//! A [`KvList`] carries the optional, typed construction parameters of an
//! actor, and nests inside [`Param::KvList`]. Keys are unique; setting an
//! existing key drops the old value. The typed getters are deliberately
//! lenient: a missing key *or* a value of the wrong variant both yield the
//! caller-supplied default. Authored content relies on this.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::param::{Param, ParamKind};

/// An insertion-ordered map from string key to [`Param`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KvList {
    entries: Vec<(String, Param)>,
}

impl KvList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Upsert a value. An existing entry for `key` is replaced, dropping the
    /// old value.
    pub fn set(&mut self, key: impl Into<String>, value: Param) {
        let key = key.into();
        if let Some((_, slot)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            *slot = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Look up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Param> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Remove an entry, returning its value if it existed.
    pub fn remove(&mut self, key: &str) -> Option<Param> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Returns `true` if `key` is present with the expected variant.
    #[must_use]
    pub fn has(&self, key: &str, kind: ParamKind) -> bool {
        self.get(key).is_some_and(|p| p.kind() == kind)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn get_kind(&self, key: &str, kind: ParamKind) -> Option<&Param> {
        self.get(key).filter(|p| p.kind() == kind)
    }

    /// Get a byte value, or `default` when absent or mistyped.
    #[must_use]
    pub fn get_byte(&self, key: &str, default: u8) -> u8 {
        match self.get_kind(key, ParamKind::Byte) {
            Some(Param::Byte(v)) => *v,
            _ => default,
        }
    }

    /// Get an integer value, or `default` when absent or mistyped.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        match self.get_kind(key, ParamKind::Int) {
            Some(Param::Int(v)) => *v,
            _ => default,
        }
    }

    /// Get a float value, or `default` when absent or mistyped.
    #[must_use]
    pub fn get_float(&self, key: &str, default: f32) -> f32 {
        match self.get_kind(key, ParamKind::Float) {
            Some(Param::Float(v)) => *v,
            _ => default,
        }
    }

    /// Get a bool value, or `default` when absent or mistyped.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get_kind(key, ParamKind::Bool) {
            Some(Param::Bool(v)) => *v,
            _ => default,
        }
    }

    /// Get a string value, or `default` when absent, mistyped, or empty.
    ///
    /// The empty-string case matches the original content pipeline, which
    /// wrote `""` for "unset" string parameters.
    #[must_use]
    pub fn get_string<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.get_kind(key, ParamKind::String) {
            Some(Param::String(v)) if !v.is_empty() => v,
            _ => default,
        }
    }

    /// Get a color value, or `default` when absent or mistyped.
    #[must_use]
    pub fn get_color(&self, key: &str, default: Color) -> Color {
        match self.get_kind(key, ParamKind::Color) {
            Some(Param::Color(v)) => *v,
            _ => default,
        }
    }

    /// Get a u64 value, or `default` when absent or mistyped.
    #[must_use]
    pub fn get_uint64(&self, key: &str, default: u64) -> u64 {
        match self.get_kind(key, ParamKind::Uint64) {
            Some(Param::Uint64(v)) => *v,
            _ => default,
        }
    }

    /// Get an array value. Arrays have no meaningful default; absence and
    /// mismatch both yield `None`.
    #[must_use]
    pub fn get_array(&self, key: &str) -> Option<&[Param]> {
        match self.get_kind(key, ParamKind::Array) {
            Some(Param::Array(v)) => Some(v),
            _ => None,
        }
    }

    /// Get a nested list. Absence and mismatch both yield `None`.
    #[must_use]
    pub fn get_list(&self, key: &str) -> Option<&KvList> {
        match self.get_kind(key, ParamKind::KvList) {
            Some(Param::KvList(v)) => Some(v),
            _ => None,
        }
    }

    pub fn set_byte(&mut self, key: impl Into<String>, value: u8) {
        self.set(key, Param::Byte(value));
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i32) {
        self.set(key, Param::Int(value));
    }

    pub fn set_float(&mut self, key: impl Into<String>, value: f32) {
        self.set(key, Param::Float(value));
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, Param::Bool(value));
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key, Param::String(value.into()));
    }

    pub fn set_color(&mut self, key: impl Into<String>, value: Color) {
        self.set(key, Param::Color(value));
    }

    pub fn set_uint64(&mut self, key: impl Into<String>, value: u64) {
        self.set(key, Param::Uint64(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let mut list = KvList::new();
        list.set_int("count", 3);
        list.set_float("speed", 1.5);
        assert_eq!(list.get_int("count", 0), 3);
        assert_eq!(list.get_float("speed", 0.0), 1.5);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_last_set_wins() {
        let mut list = KvList::new();
        list.set_int("k", 1);
        list.set_int("k", 2);
        assert_eq!(list.get_int("k", 0), 2);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_missing_key_yields_default() {
        let list = KvList::new();
        assert_eq!(list.get_int("absent", 7), 7);
        assert!(list.get_bool("absent", true));
    }

    #[test]
    fn test_type_mismatch_yields_default() {
        let mut list = KvList::new();
        list.set_string("k", "not a number");
        assert_eq!(list.get_int("k", 7), 7);
        assert_eq!(list.get_byte("k", 9), 9);
        assert!(!list.has("k", ParamKind::Int));
        assert!(list.has("k", ParamKind::String));
    }

    #[test]
    fn test_empty_string_yields_default() {
        let mut list = KvList::new();
        list.set_string("name", "");
        assert_eq!(list.get_string("name", "fallback"), "fallback");
        list.set_string("name", "real");
        assert_eq!(list.get_string("name", "fallback"), "real");
    }

    #[test]
    fn test_remove() {
        let mut list = KvList::new();
        list.set_bool("flag", true);
        assert_eq!(list.remove("flag"), Some(Param::Bool(true)));
        assert!(list.remove("flag").is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut list = KvList::new();
        list.set_int("a", 1);
        list.set_int("b", 2);
        list.set_int("c", 3);
        let keys: Vec<&str> = list.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_array_accessor() {
        let mut list = KvList::new();
        list.set("items", Param::Array(vec![Param::Int(1), Param::Int(2)]));
        assert_eq!(list.get_array("items").unwrap().len(), 2);
        assert!(list.get_array("missing").is_none());
        list.set_int("items", 5);
        assert!(list.get_array("items").is_none());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut list = KvList::new();
        list.set_string("model", "crate");
        list.set_color("tint", Color::rgb(1.0, 0.0, 0.0));
        let bytes = rmp_serde::to_vec(&list).unwrap();
        let restored: KvList = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(list, restored);
    }
}
