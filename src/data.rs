//! Geometry consumed by the converter.
//!
//! Everything here is built once by a parser, read by [deduplicate](crate::deduplicate), and then
//! dropped. Nothing is mutated after construction.

use std::fmt;

use nalgebra::{Vector3, Vector4};
use static_assertions::assert_eq_size;

/// A vertex position in homogeneous coordinates. `{ X, Y, Z, W }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex(pub Vector4<f32>);

impl Vertex {
    #[inline]
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self(Vector4::new(x, y, z, w))
    }

    /// A vertex with `w = 1.0`.
    #[inline]
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, 1.0)
    }
}

/// A vertex normal. `{ X, Y, Z }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal(pub Vector3<f32>);

impl Normal {
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vector3::new(x, y, z))
    }
}

/// The tables a [Point] may index into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Vertex,
    Texcoord,
    Normal,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Vertex => f.write_str("vertex"),
            Attribute::Texcoord => f.write_str("texture coordinate"),
            Attribute::Normal => f.write_str("normal"),
        }
    }
}

/// One corner of a [Face]. All indices are zero-based.
///
/// The texture coordinate index is kept so that the face format can be reported, but nothing
/// downstream reads it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub vertex: usize,
    pub texcoord: Option<usize>,
    pub normal: usize,
}

impl Point {
    #[inline]
    pub const fn new(vertex: usize, normal: usize) -> Self {
        Self {
            vertex,
            texcoord: None,
            normal,
        }
    }

    #[inline]
    pub const fn with_texcoord(mut self, texcoord: usize) -> Self {
        self.texcoord = Some(texcoord);
        self
    }
}

/// A triangle. Polygons with more than three points are not representable.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face {
    pub points: [Point; 3],
}

impl Face {
    #[inline]
    pub const fn new(points: [Point; 3]) -> Self {
        Self { points }
    }
}

impl From<[Point; 3]> for Face {
    fn from(points: [Point; 3]) -> Self {
        Self::new(points)
    }
}

/// Which per-corner attributes a set of faces provides.
///
/// Only [FaceFormat::Vn] can be written as SM data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceFormat {
    V,
    Vt,
    Vn,
    Vtn,
}

impl FaceFormat {
    /// Width of the tag as stored in an SM header.
    pub const TAG_WIDTH: usize = 4;

    pub const fn from_flags(texcoord: bool, normal: bool) -> Self {
        match (texcoord, normal) {
            (false, false) => Self::V,
            (true, false) => Self::Vt,
            (false, true) => Self::Vn,
            (true, true) => Self::Vtn,
        }
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Self::V => "v",
            Self::Vt => "vt",
            Self::Vn => "vn",
            Self::Vtn => "vtn",
        }
    }

    /// The tag, left-aligned and padded with ASCII spaces. `Vn` becomes `b"vn  "`.
    pub fn to_bytes(self) -> [u8; Self::TAG_WIDTH] {
        let mut res = [b' '; Self::TAG_WIDTH];
        let tag = self.tag().as_bytes();
        res[..tag.len()].copy_from_slice(tag);
        res
    }

    pub fn from_bytes(bytes: [u8; Self::TAG_WIDTH]) -> Option<Self> {
        [Self::V, Self::Vt, Self::Vn, Self::Vtn]
            .into_iter()
            .find(|f| f.to_bytes() == bytes)
    }
}

impl fmt::Display for FaceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Validated geometry: a uniform face format and non-empty vertex, normal, and face lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub format: FaceFormat,
    pub faces: Vec<Face>,
    pub vertices: Vec<Vertex>,
    pub normals: Vec<Normal>,
}

impl Mesh {
    /// See [deduplicate](crate::deduplicate).
    pub fn deduplicate(&self) -> Result<crate::Deduplicated, crate::Error> {
        crate::deduplicate(&self.faces, &self.vertices, &self.normals)
    }
}

const RECORD_LEN: usize = 7;

/// One vertex and one normal, concatenated. `{ VX, VY, VZ, VW, NX, NY, NZ }`
#[repr(transparent)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct AttributeRecord(pub [f32; RECORD_LEN]);

assert_eq_size!(AttributeRecord, [u8; AttributeRecord::SIZE]);

impl AttributeRecord {
    /// Number of components.
    pub const LEN: usize = RECORD_LEN;
    /// Serialized size, in bytes.
    pub const SIZE: usize = Self::LEN * std::mem::size_of::<f32>();

    pub fn new(vertex: &Vertex, normal: &Normal) -> Self {
        let v = &vertex.0;
        let n = &normal.0;
        Self([v.x, v.y, v.z, v.w, n.x, n.y, n.z])
    }

    #[inline]
    pub fn vertex(&self) -> Vertex {
        let [x, y, z, w, ..] = self.0;
        Vertex::new(x, y, z, w)
    }

    #[inline]
    pub fn normal(&self) -> Normal {
        let [.., x, y, z] = self.0;
        Normal::new(x, y, z)
    }

    #[inline]
    pub fn values(&self) -> &[f32; Self::LEN] {
        &self.0
    }

    /// Hashable identity of this record; two keys are equal iff the records compare equal with
    /// `==` on every component.
    ///
    /// `-0.0` is folded into `0.0`. NaN components compare by bit pattern.
    pub(crate) fn key(&self) -> RecordKey {
        RecordKey(self.0.map(|c| if c == 0.0 { 0 } else { c.to_bits() }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RecordKey([u32; RECORD_LEN]);
