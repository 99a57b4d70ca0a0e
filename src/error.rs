use std::{fmt, io};

use crate::{de::obj::ParseError, de::sm::DecodeError, Attribute, FaceFormat};

/// Parts of an SM file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Header,
    Indices,
    Attributes,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Header => f.write_str("header"),
            Section::Indices => f.write_str("index buffer"),
            Section::Attributes => f.write_str("attribute buffer"),
        }
    }
}

/// Errors which abort a conversion.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input text was malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("face {face}, point {point}: {attribute} index {index} out of range (0..{len})")]
    IndexOutOfRange {
        face: usize,
        point: usize,
        attribute: Attribute,
        index: usize,
        len: usize,
    },
    #[error("index {position} refers to attribute record {index}, but there are only {count}")]
    DanglingIndex {
        position: usize,
        index: u32,
        count: usize,
    },
    #[error("face format `{0}` cannot be serialized; only `vn` is supported")]
    UnsupportedFormat(FaceFormat),
    #[error("{section} length {count} does not fit in a u32")]
    CountOverflow { section: Section, count: usize },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Io(#[from] io::Error),
}
