//! Utilities for serializing deduplicated meshes to SM data.
//!
//! # Notes
//!
//! ## SM Structure
//!
//! All multi-byte values are little-endian. Fields, in order:
//!
//! * `version`: `u8`, the protocol version; currently [PROTOCOL_VERSION]
//! * `format`: 4 ASCII bytes naming the per-corner attributes, left-aligned and space-padded.
//!   Only `vn  ` (vertex + normal) exists.
//! * `index_width`: `u8`, the size of one index in bytes; `2` or `4`. See [IndexWidth].
//! * `index_count`: `u32`
//! * `indices`: `index_count` unsigned integers of `index_width` bytes each
//! * `attribute_count`: `u32`
//! * `attributes`: `attribute_count` records of 7 `f32`s each: `vx vy vz vw nx ny nz`
//!
//! There is no checksum, compression, or alternate byte order.

use std::{fmt, io::Write};

use smconv_common::IndexElement;

use crate::{error::Section, AttributeRecord, Error, FaceFormat};

/// The only protocol version this crate reads or writes.
pub const PROTOCOL_VERSION: u8 = 1;

/// Size of one element of an SM index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum IndexWidth {
    U16 = 2,
    U32 = 4,
}

impl IndexWidth {
    /// The narrowest width able to address `count` attribute records.
    #[inline]
    pub const fn for_attribute_count(count: usize) -> Self {
        if count <= u16::MAX as usize {
            Self::U16
        } else {
            Self::U32
        }
    }

    #[inline]
    pub const fn bytes(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            2 => Some(Self::U16),
            4 => Some(Self::U32),
            _ => None,
        }
    }
}

impl fmt::Display for IndexWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}B", self.bytes())
    }
}

/// Fail with [Error::UnsupportedFormat] unless `format` can be written as SM data.
#[inline]
pub fn check_format(format: FaceFormat) -> Result<(), Error> {
    match format {
        FaceFormat::Vn => Ok(()),
        other => Err(Error::UnsupportedFormat(other)),
    }
}

/// Write the leading protocol version byte. Returns the number of bytes written.
pub fn write_version<W: Write + ?Sized>(writer: &mut W) -> Result<usize, Error> {
    writer.write_all(&[PROTOCOL_VERSION])?;
    Ok(1)
}

fn count_u32(section: Section, count: usize) -> Result<u32, Error> {
    u32::try_from(count).map_err(|_| Error::CountOverflow { section, count })
}

/// Write everything following the protocol version byte. Returns the number of bytes written.
///
/// `indices` and `attributes` are validated before anything is written: the format must be
/// [FaceFormat::Vn], both lengths must fit in a `u32`, and every index must refer to an existing
/// attribute record.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip_all, fields(indices = indices.len(), attributes = attributes.len()))
)]
pub fn encode<W: Write + ?Sized>(
    format: FaceFormat,
    indices: &[u32],
    attributes: &[AttributeRecord],
    writer: &mut W,
) -> Result<usize, Error> {
    check_format(format)?;
    let index_count = count_u32(Section::Indices, indices.len())?;
    let attribute_count = count_u32(Section::Attributes, attributes.len())?;
    if let Some(position) = indices.iter().position(|&i| i >= attribute_count) {
        return Err(Error::DanglingIndex {
            position,
            index: indices[position],
            count: attributes.len(),
        });
    }

    let width = IndexWidth::for_attribute_count(attributes.len());
    crate::event!(trace, %width, "selected index width");

    writer.write_all(&format.to_bytes())?;
    writer.write_all(&[width.bytes()])?;
    writer.write_all(&index_count.to_le_bytes())?;
    let index_bytes = match width {
        IndexWidth::U16 => write_indices::<u16, W>(indices, attributes.len(), writer)?,
        IndexWidth::U32 => write_indices::<u32, W>(indices, attributes.len(), writer)?,
    };
    writer.write_all(&attribute_count.to_le_bytes())?;
    for record in attributes {
        for component in record.values() {
            writer.write_all(&component.to_le_bytes())?;
        }
    }

    let written = FaceFormat::TAG_WIDTH
        + 1
        + 4
        + index_bytes
        + 4
        + attributes.len() * AttributeRecord::SIZE;
    crate::event!(
        debug,
        bytes = written,
        indices = indices.len(),
        attributes = attributes.len(),
        "encoded SM payload"
    );
    Ok(written)
}

fn write_indices<I: IndexElement, W: Write + ?Sized>(
    indices: &[u32],
    attribute_count: usize,
    writer: &mut W,
) -> Result<usize, Error> {
    for (position, &index) in indices.iter().enumerate() {
        let element = <I as num_traits::NumCast>::from(index).ok_or(Error::DanglingIndex {
            position,
            index,
            count: attribute_count,
        })?;
        element.write_le(&mut *writer)?;
    }
    Ok(indices.len() * I::WIDTH as usize)
}
