//! End-to-end conversion of OBJ text into SM bytes.

use smconv::{
    de::{self, obj::ParseError},
    ser::sm::IndexWidth,
    AttributeRecord, Error, FaceFormat,
};

fn convert(text: &str) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    let written = smconv::convert(text, &mut out)?;
    assert_eq!(written, out.len());
    Ok(out)
}

/// A unit cube with one normal per side, as exported by most modelling tools.
const CUBE: &str = "\
# cube
o Cube
v 1.000000 1.000000 -1.000000
v 1.000000 -1.000000 -1.000000
v 1.000000 1.000000 1.000000
v 1.000000 -1.000000 1.000000
v -1.000000 1.000000 -1.000000
v -1.000000 -1.000000 -1.000000
v -1.000000 1.000000 1.000000
v -1.000000 -1.000000 1.000000
vn 0.0000 1.0000 0.0000
vn 0.0000 0.0000 1.0000
vn -1.0000 0.0000 0.0000
vn 0.0000 -1.0000 0.0000
vn 1.0000 0.0000 0.0000
vn 0.0000 0.0000 -1.0000
s off
f 5//1 3//1 1//1
f 3//2 8//2 4//2
f 7//3 6//3 8//3
f 2//4 8//4 6//4
f 1//5 4//5 2//5
f 5//6 2//6 6//6
f 5//1 7//1 3//1
f 3//2 7//2 8//2
f 7//3 5//3 6//3
f 2//4 4//4 8//4
f 1//5 3//5 4//5
f 5//6 1//6 2//6
";

#[test]
fn cube() {
    let out = convert(CUBE).unwrap();
    let model = de::sm::decode(&out).unwrap();
    assert_eq!(model.format, FaceFormat::Vn);
    assert_eq!(model.index_width, IndexWidth::U16);
    assert_eq!(model.indices.len(), 36);
    // four corners per side
    assert_eq!(model.attributes.len(), 24);
    assert_eq!(out.len(), 1 + 4 + 1 + 4 + 36 * 2 + 4 + 24 * AttributeRecord::SIZE);
}

#[test]
fn cube_is_deterministic() {
    assert_eq!(convert(CUBE).unwrap(), convert(CUBE).unwrap());
}

#[test]
fn header_bytes() {
    let out = convert("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n").unwrap();
    assert_eq!(out[0], 1);
    assert_eq!(&out[1..5], b"vn  ");
    assert_eq!(out[5], 2);
    assert_eq!(&out[6..10], &3u32.to_le_bytes());
    assert_eq!(&out[10..16], &[0, 0, 1, 0, 2, 0]);
    assert_eq!(&out[16..20], &3u32.to_le_bytes());
    // w defaults to 1
    assert_eq!(&out[20 + 12..20 + 16], &1.0f32.to_le_bytes());
}

#[test]
fn shared_edge() {
    let text = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1
f 1//1 3//1 4//1
";
    let model = de::sm::decode(&convert(text).unwrap()).unwrap();
    assert_eq!(model.indices, [0, 1, 2, 0, 2, 3]);
    assert!(model.attributes.len() < 6);
}

#[test]
fn wide_indices() {
    // a strip of 65536 distinct vertices needs 4-byte indices
    let count = 65536;
    let mut text = String::from("vn 0 0 1\n");
    for i in 0..count {
        text.push_str(&format!("v {i} 0 0\n"));
    }
    for i in (0..count).step_by(3) {
        let a = i + 1;
        let b = (i + 1) % count + 1;
        let c = (i + 2) % count + 1;
        text.push_str(&format!("f {a}//1 {b}//1 {c}//1\n"));
    }
    let out = convert(&text).unwrap();
    assert_eq!(out[5], 4);
    let model = de::sm::decode(&out).unwrap();
    assert_eq!(model.index_width, IndexWidth::U32);
    assert_eq!(model.attributes.len(), count);
}

#[test]
fn inconsistent_format() {
    let text = "v 0 0 0\nvn 0 0 1\nf 1//1 1//1 1//1\nf 1/1/1 1/1/1 1/1/1\n";
    assert!(matches!(
        convert(text),
        Err(Error::Parse(ParseError::FormatChanged {
            line: 4,
            expected: FaceFormat::Vn,
            found: FaceFormat::Vtn
        }))
    ));
}

#[test]
fn missing_tables() {
    assert!(matches!(
        convert("# nothing here\n"),
        Err(Error::Parse(ParseError::Empty(_)))
    ));
}
