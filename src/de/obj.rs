//! Parsing of [Wavefront OBJ](https://paulbourke.net/dataformats/obj/) text into a [Mesh].
//!
//! # Notes
//!
//! * Only `v`, `vn`, and `f` statements are read. Everything else (`o`, `g`, `s`, `vt`, `usemtl`,
//!   `mtllib`, ...) is skipped.
//! * `#` starts a comment, which runs to the end of the line.
//! * Faces must be triangles. Each point is `v`, `v/t`, `v//n`, or `v/t/n`, and must have both a
//!   vertex and a normal index.
//! * Indices are 1-based. Relative (negative) indices are not supported.
//! * The [format](FaceFormat) of a face is taken from its first point. All faces must share one
//!   format.

use std::fmt;

use crate::{Attribute, Face, FaceFormat, Mesh, Normal, Point, Vertex};

/// OBJ statements understood by [parse].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Vertex,
    Normal,
    Face,
}

impl Element {
    pub const fn keyword(self) -> &'static str {
        match self {
            Element::Vertex => "v",
            Element::Normal => "vn",
            Element::Face => "f",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self.keyword())
    }
}

/// Errors related to malformed OBJ input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: {element} has {found} fields; expected {expected}")]
    FieldCount {
        line: usize,
        element: Element,
        expected: &'static str,
        found: usize,
    },
    #[error("line {line}: invalid number {token:?}")]
    InvalidNumber { line: usize, token: String },
    #[error("line {line}: invalid {attribute} index {token:?}")]
    InvalidIndex {
        line: usize,
        attribute: Attribute,
        token: String,
    },
    #[error("line {line}, point {point}: missing {attribute} index")]
    MissingIndex {
        line: usize,
        point: usize,
        attribute: Attribute,
    },
    #[error("line {line}: face format changed from `{expected}` to `{found}`")]
    FormatChanged {
        line: usize,
        expected: FaceFormat,
        found: FaceFormat,
    },
    #[error("input contains no {0} statements")]
    Empty(Element),
}

/// Parse OBJ `text` into a [Mesh].
///
/// Fails on the first malformed statement. A mesh without faces, vertices, or normals is rejected,
/// checked in that order.
pub fn parse(text: &str) -> Result<Mesh, ParseError> {
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut faces = Vec::new();
    let mut format: Option<FaceFormat> = None;

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let content = line.split_once('#').map_or(line, |(content, _)| content);
        let mut fields = content.split_whitespace();
        match fields.next() {
            Some("v") => vertices.push(parse_vertex(line_no, fields)?),
            Some("vn") => normals.push(parse_normal(line_no, fields)?),
            Some("f") => {
                let (face, found) = parse_face(line_no, fields)?;
                match format {
                    Some(expected) if expected != found => {
                        return Err(ParseError::FormatChanged {
                            line: line_no,
                            expected,
                            found,
                        })
                    }
                    _ => format = Some(found),
                }
                faces.push(face);
            }
            _ => {}
        }
    }

    let format = format.ok_or(ParseError::Empty(Element::Face))?;
    if vertices.is_empty() {
        return Err(ParseError::Empty(Element::Vertex));
    }
    if normals.is_empty() {
        return Err(ParseError::Empty(Element::Normal));
    }

    Ok(Mesh {
        format,
        faces,
        vertices,
        normals,
    })
}

fn parse_floats<'l>(
    line: usize,
    fields: impl Iterator<Item = &'l str>,
) -> Result<Vec<f32>, ParseError> {
    fields
        .map(|token| {
            token.parse::<f32>().map_err(|_| ParseError::InvalidNumber {
                line,
                token: token.to_owned(),
            })
        })
        .collect()
}

fn parse_vertex<'l>(
    line: usize,
    fields: impl Iterator<Item = &'l str>,
) -> Result<Vertex, ParseError> {
    match parse_floats(line, fields)?[..] {
        [x, y, z] => Ok(Vertex::from_xyz(x, y, z)),
        [x, y, z, w] => Ok(Vertex::new(x, y, z, w)),
        ref values => Err(ParseError::FieldCount {
            line,
            element: Element::Vertex,
            expected: "3 or 4",
            found: values.len(),
        }),
    }
}

fn parse_normal<'l>(
    line: usize,
    fields: impl Iterator<Item = &'l str>,
) -> Result<Normal, ParseError> {
    match parse_floats(line, fields)?[..] {
        [x, y, z] => Ok(Normal::new(x, y, z)),
        ref values => Err(ParseError::FieldCount {
            line,
            element: Element::Normal,
            expected: "3",
            found: values.len(),
        }),
    }
}

/// A 1-based OBJ index, converted to 0-based.
fn parse_index(line: usize, attribute: Attribute, token: &str) -> Result<usize, ParseError> {
    match token.parse::<usize>() {
        Ok(i) if i > 0 => Ok(i - 1),
        _ => Err(ParseError::InvalidIndex {
            line,
            attribute,
            token: token.to_owned(),
        }),
    }
}

fn parse_face<'l>(
    line: usize,
    fields: impl Iterator<Item = &'l str>,
) -> Result<(Face, FaceFormat), ParseError> {
    let tokens: Vec<&str> = fields.collect();
    if tokens.len() != 3 {
        return Err(ParseError::FieldCount {
            line,
            element: Element::Face,
            expected: "3",
            found: tokens.len(),
        });
    }

    let mut format = FaceFormat::Vn;
    let mut points = [Point::default(); 3];
    for (p, token) in tokens.into_iter().enumerate() {
        let mut keys = token.splitn(3, '/');
        let vertex = keys.next().filter(|k| !k.is_empty());
        let texcoord = keys.next().filter(|k| !k.is_empty());
        let normal = keys.next().filter(|k| !k.is_empty());

        if p == 0 {
            format = FaceFormat::from_flags(texcoord.is_some(), normal.is_some());
        }

        let missing = |attribute| ParseError::MissingIndex {
            line,
            point: p,
            attribute,
        };
        let vertex = vertex.ok_or_else(|| missing(Attribute::Vertex))?;
        let normal = normal.ok_or_else(|| missing(Attribute::Normal))?;

        points[p] = Point {
            vertex: parse_index(line, Attribute::Vertex, vertex)?,
            texcoord: texcoord
                .map(|t| parse_index(line, Attribute::Texcoord, t))
                .transpose()?,
            normal: parse_index(line, Attribute::Normal, normal)?,
        };
    }

    Ok((Face::new(points), format))
}
