use crate::ParserError;
use crate::common::types::C3Vector;
use crate::obj::types::ObjAsset;

/// A triangle soup as stored in an STL file. MuJoCo only loads the binary
/// flavour, so this is what the writer emits.
#[derive(Debug, Clone)]
pub struct StlAsset {
    pub triangles: Vec<StlTriangle>,
}

#[derive(Debug, Copy, Clone)]
pub struct StlTriangle {
    pub normal: C3Vector,
    pub vertices: [C3Vector; 3],
    /// Attribute byte count, unused by every relevant consumer but part of
    /// the on-disk record.
    pub attributes: u16,
}

impl StlAsset {
    /// Flattens an indexed OBJ asset into an STL triangle soup, deriving
    /// facet normals from the winding order.
    pub fn from_obj(asset: &ObjAsset) -> Result<StlAsset, ParserError> {
        if asset.triangles.is_empty() {
            return Err(ParserError::EmptySource);
        }

        let triangles = asset
            .triangles
            .iter()
            .map(|triangle| {
                let [a, b, c] = asset.triangle_positions(triangle);
                let normal = b.sub(&a).cross(&c.sub(&a)).normalized_or_zero();
                StlTriangle {
                    normal,
                    vertices: [a, b, c],
                    attributes: 0,
                }
            })
            .collect();

        Ok(StlAsset { triangles })
    }
}
