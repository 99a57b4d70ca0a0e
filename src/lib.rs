//! Conversion of Wavefront OBJ meshes into the SM binary format.
//!
//! The pipeline is: [parse](de::obj::parse) → [deduplicate] → [encode](ser::sm::encode). Each
//! stage either succeeds completely or returns an [Error]; nothing is recovered or skipped.
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

/// Emit a [tracing](https://docs.rs/tracing) event if the `tracing` feature is enabled.
macro_rules! event {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        tracing::$level!($($arg)+);
    };
}
pub(crate) use event;

mod data;
pub mod de;
mod dedup;
pub mod error;
pub mod ser;

use std::io::Write;

pub use data::*;
pub use dedup::*;
pub use error::Error;
pub use ser::sm::PROTOCOL_VERSION;

/// Convert OBJ `text` into an SM file written to `writer`, returning the number of bytes written.
///
/// Everything that can be rejected (malformed text, an unsupported face format, out-of-range
/// indices) is rejected before the first byte reaches `writer`. An I/O error partway through
/// leaves whatever was already written; callers wanting an all-or-nothing file should write to a
/// temporary path and rename it afterwards.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip_all, fields(len = text.len()))
)]
pub fn convert<W: Write + ?Sized>(text: &str, writer: &mut W) -> Result<usize, Error> {
    let mesh = de::obj::parse(text)?;
    event!(
        debug,
        format = %mesh.format,
        faces = mesh.faces.len(),
        vertices = mesh.vertices.len(),
        normals = mesh.normals.len(),
        "parsed OBJ"
    );
    ser::sm::check_format(mesh.format)?;
    let dedup = mesh.deduplicate()?;
    write_model(mesh.format, &dedup, writer)
}

/// Write the protocol version followed by the SM payload for already-deduplicated geometry.
pub fn write_model<W: Write + ?Sized>(
    format: FaceFormat,
    dedup: &Deduplicated,
    writer: &mut W,
) -> Result<usize, Error> {
    ser::sm::check_format(format)?;
    let version = ser::sm::write_version(writer)?;
    let payload = ser::sm::encode(format, &dedup.indices, &dedup.attributes, writer)?;
    event!(debug, bytes = version + payload, "wrote SM model");
    Ok(version + payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1
";

    #[test]
    fn convert_triangle() {
        let mut out = Vec::new();
        let written = convert(TRIANGLE, &mut out).unwrap();
        assert_eq!(written, out.len());
        // version + tag + width + count + 3×u16 + count + 3×record
        assert_eq!(out.len(), 1 + 4 + 1 + 4 + 3 * 2 + 4 + 3 * AttributeRecord::SIZE);
        assert_eq!(&out[..6], b"\x01vn  \x02");
    }

    #[test]
    fn unsupported_format_writes_nothing() {
        let text = "v 0 0 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 1/1/1 1/1/1\n";
        let mut out = Vec::new();
        let err = convert(text, &mut out).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(FaceFormat::Vtn)));
        assert!(out.is_empty());
    }

    #[test]
    fn out_of_range_writes_nothing() {
        let text = "v 0 0 0\nvn 0 0 1\nf 1//1 2//1 1//1\n";
        let mut out = Vec::new();
        let err = convert(text, &mut out).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { .. }));
        assert!(out.is_empty());
    }
}
