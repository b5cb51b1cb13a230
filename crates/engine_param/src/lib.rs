//! # engine_param
//!
//! Tagged transport values and property bags, plus the bounded byte reader
//! used to decode them from authored binary data.
//!
//! This crate provides:
//!
//! - [`Param`] — the tagged value carried by every signal payload and
//!   construction argument.
//! - [`KvList`] — a string-keyed bag of [`Param`] with lenient typed getters.
//! - [`Color`] — an RGBA float color, one of the [`Param`] variants.
//! - [`ByteReader`] — a bounds-checked little-endian reader for the map and
//!   asset binary formats.

pub mod color;
pub mod kvlist;
pub mod param;
pub mod reader;

pub use color::Color;
pub use kvlist::KvList;
pub use param::{Param, ParamKind};
pub use reader::{ByteReader, ReadError};
