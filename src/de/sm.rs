//! Reading SM data back into memory.
//!
//! See [crate::ser::sm] for the layout. Every length is checked against the data actually present
//! before anything is read, so truncated files are reported rather than partially loaded.

use std::io;

use num_traits::AsPrimitive;
use smconv_common::IndexElement;

use crate::{
    error::Section,
    ser::sm::{IndexWidth, PROTOCOL_VERSION},
    AttributeRecord, Deduplicated, FaceFormat,
};

/// Errors related to malformed SM data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("{section} truncated: expected {needed} bytes, found {available}")]
    Truncated {
        section: Section,
        needed: usize,
        available: usize,
    },
    #[error("unsupported protocol version {0}; expected {}", PROTOCOL_VERSION)]
    UnsupportedVersion(u8),
    #[error("unknown attribute format tag {0:?}")]
    UnknownFormat([u8; FaceFormat::TAG_WIDTH]),
    #[error("face format `{0}` has no SM payload")]
    UnsupportedFormat(FaceFormat),
    #[error("invalid index width {0}; expected 2 or 4")]
    InvalidIndexWidth(u8),
    #[error("index {position} refers to attribute record {index}, but there are only {count}")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        count: usize,
    },
    #[error("{0} unexpected bytes after the attribute buffer")]
    TrailingBytes(usize),
}

/// A decoded SM file.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub format: FaceFormat,
    pub index_width: IndexWidth,
    pub indices: Vec<u32>,
    pub attributes: Vec<AttributeRecord>,
}

impl From<Model> for Deduplicated {
    fn from(model: Model) -> Self {
        Self {
            indices: model.indices,
            attributes: model.attributes,
        }
    }
}

struct Cursor<'b> {
    bytes: &'b [u8],
}

impl<'b> Cursor<'b> {
    fn take(&mut self, section: Section, len: usize) -> Result<&'b [u8], DecodeError> {
        if self.bytes.len() < len {
            return Err(DecodeError::Truncated {
                section,
                needed: len,
                available: self.bytes.len(),
            });
        }
        let (head, tail) = self.bytes.split_at(len);
        self.bytes = tail;
        Ok(head)
    }

    fn u8(&mut self, section: Section) -> Result<u8, DecodeError> {
        Ok(self.take(section, 1)?[0])
    }

    fn u32(&mut self, section: Section) -> Result<u32, DecodeError> {
        let mut raw = [0; 4];
        raw.copy_from_slice(self.take(section, 4)?);
        Ok(u32::from_le_bytes(raw))
    }
}

fn read_indices<I: IndexElement>(raw: &[u8]) -> Vec<u32> {
    raw.chunks_exact(I::WIDTH as usize)
        .filter_map(I::read_le)
        .map(<I as AsPrimitive<u32>>::as_)
        .collect()
}

fn read_record(raw: &[u8]) -> AttributeRecord {
    let mut values = [0.0; AttributeRecord::LEN];
    for (value, c) in values.iter_mut().zip(raw.chunks_exact(4)) {
        *value = f32::from_le_bytes([c[0], c[1], c[2], c[3]]);
    }
    AttributeRecord(values)
}

/// Decode a complete SM file, including the leading protocol version byte.
pub fn decode(bytes: &[u8]) -> Result<Model, DecodeError> {
    let mut cur = Cursor { bytes };

    let version = cur.u8(Section::Header)?;
    if version != PROTOCOL_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let mut tag = [0; FaceFormat::TAG_WIDTH];
    tag.copy_from_slice(cur.take(Section::Header, FaceFormat::TAG_WIDTH)?);
    let format = FaceFormat::from_bytes(tag).ok_or(DecodeError::UnknownFormat(tag))?;
    if format != FaceFormat::Vn {
        return Err(DecodeError::UnsupportedFormat(format));
    }

    let width = cur.u8(Section::Header)?;
    let index_width = IndexWidth::from_byte(width).ok_or(DecodeError::InvalidIndexWidth(width))?;

    let index_count = cur.u32(Section::Indices)? as usize;
    let raw = cur.take(
        Section::Indices,
        index_count.saturating_mul(index_width.bytes() as usize),
    )?;
    let indices = match index_width {
        IndexWidth::U16 => read_indices::<u16>(raw),
        IndexWidth::U32 => read_indices::<u32>(raw),
    };

    let attribute_count = cur.u32(Section::Attributes)? as usize;
    let raw = cur.take(
        Section::Attributes,
        attribute_count.saturating_mul(AttributeRecord::SIZE),
    )?;
    let attributes: Vec<_> = raw.chunks_exact(AttributeRecord::SIZE).map(read_record).collect();

    if !cur.bytes.is_empty() {
        return Err(DecodeError::TrailingBytes(cur.bytes.len()));
    }
    if let Some(position) = indices.iter().position(|&i| i as usize >= attributes.len()) {
        return Err(DecodeError::IndexOutOfRange {
            position,
            index: indices[position],
            count: attributes.len(),
        });
    }

    Ok(Model {
        format,
        index_width,
        indices,
        attributes,
    })
}

impl Model {
    /// Write a human-readable listing of this model.
    pub fn dump<W: io::Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "format: {}", self.format)?;
        writeln!(out, "index width: {}", self.index_width)?;
        writeln!(
            out,
            "attributes: {} ({} bytes each)",
            self.attributes.len(),
            AttributeRecord::SIZE
        )?;
        for (i, record) in self.attributes.iter().enumerate() {
            let v = record.vertex().0;
            let n = record.normal().0;
            writeln!(
                out,
                "  {i}: v {} {} {} {} | n {} {} {}",
                v.x, v.y, v.z, v.w, n.x, n.y, n.z
            )?;
        }
        writeln!(out, "indices: {}", self.indices.len())?;
        for (i, tri) in self.indices.chunks(3).enumerate() {
            write!(out, "  {i}:")?;
            for index in tri {
                write!(out, " {index}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
