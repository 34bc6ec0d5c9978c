use std::io::Cursor;

use crate::ParserError;
use crate::obj::reader::ObjReader;

const TRIANGLE_OBJ: &str = "\
# simple triangle
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1
";

#[test]
fn parses_triangle_with_texcoords_and_normals() -> Result<(), anyhow::Error> {
    let asset = ObjReader::parse_asset(&mut Cursor::new(TRIANGLE_OBJ))?;

    assert_eq!(asset.positions.len(), 3);
    assert_eq!(asset.tex_coords.len(), 3);
    assert_eq!(asset.normals.len(), 1);
    assert_eq!(asset.triangles.len(), 1);

    let tri = &asset.triangles[0];
    assert_eq!(tri.position_indices, [0, 1, 2]);
    assert_eq!(tri.tex_coord_indices, Some([0, 1, 2]));
    assert_eq!(tri.normal_indices, Some([0, 0, 0]));
    Ok(())
}

#[test]
fn fan_triangulates_quads() -> Result<(), anyhow::Error> {
    let obj = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
    let asset = ObjReader::parse_asset(&mut Cursor::new(obj))?;

    assert_eq!(asset.triangles.len(), 2);
    assert_eq!(asset.triangles[0].position_indices, [0, 1, 2]);
    assert_eq!(asset.triangles[1].position_indices, [0, 2, 3]);
    Ok(())
}

#[test]
fn resolves_negative_indices_against_current_pool() -> Result<(), anyhow::Error> {
    let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
f -3 -2 -1
";
    let asset = ObjReader::parse_asset(&mut Cursor::new(obj))?;

    assert_eq!(asset.triangles[0].position_indices, [0, 1, 2]);
    Ok(())
}

#[test]
fn bounding_box_covers_all_positions() -> Result<(), anyhow::Error> {
    let asset = ObjReader::parse_asset(&mut Cursor::new(TRIANGLE_OBJ))?;
    let aabb = asset.bounding_box().expect("non-empty mesh");

    assert_eq!(aabb.min.x, 0.0);
    assert_eq!(aabb.max.x, 1.0);
    assert_eq!(aabb.max.y, 1.0);
    assert_eq!(aabb.extents().z, 0.0);
    Ok(())
}

#[test]
fn rejects_malformed_floats() {
    let result = ObjReader::parse_asset(&mut Cursor::new("v 0.0 nope 0.0\n"));
    assert!(matches!(
        result,
        Err(ParserError::MalformedNumber { line: 1, .. })
    ));
}

#[test]
fn rejects_out_of_bounds_face_indices() {
    let obj = "v 0 0 0\nf 1 2 3\n";
    let result = ObjReader::parse_asset(&mut Cursor::new(obj));
    assert!(matches!(
        result,
        Err(ParserError::IndexOutOfBounds { index: 2, line: 2 })
    ));
}

#[test]
fn wavefront_dump_roundtrips() -> Result<(), anyhow::Error> {
    let asset = ObjReader::parse_asset(&mut Cursor::new(TRIANGLE_OBJ))?;

    let mut buf = Vec::new();
    asset.dump_to_wavefront_obj(&mut buf)?;
    let reread = ObjReader::parse_asset(&mut Cursor::new(&buf))?;

    assert_eq!(reread.positions.len(), asset.positions.len());
    assert_eq!(reread.triangles.len(), asset.triangles.len());
    assert_eq!(
        reread.triangles[0].position_indices,
        asset.triangles[0].position_indices
    );
    assert_eq!(
        reread.triangles[0].tex_coord_indices,
        asset.triangles[0].tex_coord_indices
    );
    Ok(())
}

#[test]
fn skips_comments_materials_and_groups() -> Result<(), anyhow::Error> {
    let obj = "\
mtllib scene.mtl
o Marmelade
g body
usemtl tex
v 0 0 0
v 1 0 0
v 0 1 0
s off
f 1 2 3
";
    let asset = ObjReader::parse_asset(&mut Cursor::new(obj))?;
    assert_eq!(asset.triangles.len(), 1);
    Ok(())
}
