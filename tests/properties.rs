//! Properties of the deduplication and encoding pipeline over randomly generated geometry.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use smconv::{de, deduplicate, AttributeRecord, Face, FaceFormat, Normal, Point, Vertex};

/// Small value set so that generated corners collide often; includes both signs of zero.
const VALUES: [f32; 4] = [0.0, -0.0, 0.5, 1.0];

fn value(g: &mut Gen) -> f32 {
    *g.choose(&VALUES).unwrap()
}

#[derive(Debug, Clone)]
struct Geometry {
    faces: Vec<Face>,
    vertices: Vec<Vertex>,
    normals: Vec<Normal>,
}

impl Arbitrary for Geometry {
    fn arbitrary(g: &mut Gen) -> Self {
        let vertices: Vec<_> = (0..1 + usize::arbitrary(g) % 6)
            .map(|_| Vertex::from_xyz(value(g), value(g), value(g)))
            .collect();
        let normals: Vec<_> = (0..1 + usize::arbitrary(g) % 3)
            .map(|_| Normal::new(value(g), value(g), value(g)))
            .collect();
        let faces = (0..1 + usize::arbitrary(g) % 12)
            .map(|_| {
                let mut point = || {
                    Point::new(
                        usize::arbitrary(g) % vertices.len(),
                        usize::arbitrary(g) % normals.len(),
                    )
                };
                Face::new([point(), point(), point()])
            })
            .collect();
        Self {
            faces,
            vertices,
            normals,
        }
    }
}

#[quickcheck]
fn index_count_and_validity(geo: Geometry) -> bool {
    let res = deduplicate(&geo.faces, &geo.vertices, &geo.normals).unwrap();
    res.indices.len() == geo.faces.len() * 3
        && res.attributes.len() <= res.indices.len()
        && res
            .indices
            .iter()
            .all(|&i| (i as usize) < res.attributes.len())
}

#[quickcheck]
fn reconstructs_every_corner(geo: Geometry) -> bool {
    let res = deduplicate(&geo.faces, &geo.vertices, &geo.normals).unwrap();
    let expected = geo.faces.iter().flat_map(|f| f.points).map(|p| {
        AttributeRecord::new(&geo.vertices[p.vertex], &geo.normals[p.normal])
    });
    res.corners().copied().eq(expected)
}

#[quickcheck]
fn records_are_unique(geo: Geometry) -> bool {
    let res = deduplicate(&geo.faces, &geo.vertices, &geo.normals).unwrap();
    res.attributes
        .iter()
        .enumerate()
        .all(|(i, a)| res.attributes[i + 1..].iter().all(|b| a != b))
}

#[quickcheck]
fn first_use_order(geo: Geometry) -> bool {
    // each new record gets the next position, so the first appearance of index `n` comes after
    // the first appearance of every index below `n`
    let res = deduplicate(&geo.faces, &geo.vertices, &geo.normals).unwrap();
    let mut next = 0;
    res.indices.iter().all(|&i| {
        if i == next {
            next += 1;
        }
        i < next
    })
}

#[quickcheck]
fn encoding_is_deterministic(geo: Geometry) -> bool {
    let encode = || {
        let dedup = deduplicate(&geo.faces, &geo.vertices, &geo.normals).unwrap();
        let mut out = Vec::new();
        smconv::write_model(FaceFormat::Vn, &dedup, &mut out).unwrap();
        out
    };
    encode() == encode()
}

#[quickcheck]
fn decodes_what_was_written(geo: Geometry) -> bool {
    let dedup = deduplicate(&geo.faces, &geo.vertices, &geo.normals).unwrap();
    let mut out = Vec::new();
    let written = smconv::write_model(FaceFormat::Vn, &dedup, &mut out).unwrap();
    let model = de::sm::decode(&out).unwrap();
    written == out.len()
        && model.indices == dedup.indices
        && model
            .attributes
            .iter()
            .zip(&dedup.attributes)
            .all(|(a, b)| a.values().map(f32::to_bits) == b.values().map(f32::to_bits))
}
