//! Merging of identical face corners into shared attribute records.

use std::collections::HashMap;

use crate::{
    data::RecordKey, error::Section, Attribute, AttributeRecord, Error, Face, Normal, Vertex,
};

/// The output of [deduplicate].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Deduplicated {
    /// One entry per face corner, in face order and then point order.
    pub indices: Vec<u32>,
    /// Unique records, in order of first use.
    pub attributes: Vec<AttributeRecord>,
}

impl Deduplicated {
    /// Replay the index buffer against the attribute buffer, yielding one record per face corner.
    ///
    /// # Panics
    /// Will panic if an index is out of range of `self.attributes`; [deduplicate] never produces
    /// such an index.
    pub fn corners(&self) -> impl ExactSizeIterator<Item = &AttributeRecord> + '_ {
        self.indices.iter().map(|&i| &self.attributes[i as usize])
    }
}

/// Assigns each distinct record the position at which it was first seen.
#[derive(Debug, Default)]
struct Dedup {
    positions: HashMap<RecordKey, u32>,
    out: Deduplicated,
}

impl Dedup {
    fn with_capacity(corners: usize) -> Self {
        Self {
            positions: HashMap::with_capacity(corners),
            out: Deduplicated {
                indices: Vec::with_capacity(corners),
                attributes: Vec::new(),
            },
        }
    }

    fn push(&mut self, record: AttributeRecord) -> Result<(), Error> {
        let next = self.out.attributes.len();
        let index = match self.positions.get(&record.key()) {
            Some(&index) => {
                crate::event!(trace, index, ?record, "reusing attribute record");
                index
            }
            None => {
                let index = u32::try_from(next).map_err(|_| Error::CountOverflow {
                    section: Section::Attributes,
                    count: next + 1,
                })?;
                crate::event!(trace, index, ?record, "adding attribute record");
                self.positions.insert(record.key(), index);
                self.out.attributes.push(record);
                index
            }
        };
        self.out.indices.push(index);
        Ok(())
    }
}

/// Build an index buffer and a buffer of unique [AttributeRecords](AttributeRecord) from a list of
/// faces.
///
/// Corners are visited in face order, then point order. The first corner to produce a given record
/// decides its position; later corners with an equal record reuse that position. Records are equal
/// only if every component is exactly equal, so positions which merely look alike are kept apart.
///
/// Fails with [Error::IndexOutOfRange] on the first corner referencing a vertex or normal that
/// doesn't exist; nothing is returned in that case.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip_all, fields(faces = faces.len()))
)]
pub fn deduplicate(
    faces: &[Face],
    vertices: &[Vertex],
    normals: &[Normal],
) -> Result<Deduplicated, Error> {
    let mut dedup = Dedup::with_capacity(faces.len() * 3);
    for (f, face) in faces.iter().enumerate() {
        for (p, point) in face.points.iter().enumerate() {
            let out_of_range = |attribute, index, len| Error::IndexOutOfRange {
                face: f,
                point: p,
                attribute,
                index,
                len,
            };
            let vertex = vertices.get(point.vertex).ok_or_else(|| {
                out_of_range(Attribute::Vertex, point.vertex, vertices.len())
            })?;
            let normal = normals.get(point.normal).ok_or_else(|| {
                out_of_range(Attribute::Normal, point.normal, normals.len())
            })?;
            dedup.push(AttributeRecord::new(vertex, normal))?;
        }
    }
    crate::event!(
        debug,
        indices = dedup.out.indices.len(),
        attributes = dedup.out.attributes.len(),
        "deduplicated face corners"
    );
    Ok(dedup.out)
}
