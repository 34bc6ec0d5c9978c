use std::io::Write;

use crate::ParserError;
use crate::common::types::{C2Vector, C3Vector, CAaBox};

/// A triangulated Wavefront OBJ asset. Faces with more than three corners
/// are split into triangle fans at parse time.
#[derive(Debug, Clone)]
pub struct ObjAsset {
    pub positions: Vec<C3Vector>,
    pub tex_coords: Vec<C2Vector>,
    pub normals: Vec<C3Vector>,
    pub triangles: Vec<ObjTriangle>,
}

/// One triangle, indexing into the position/texcoord/normal pools.
#[derive(Debug, Copy, Clone)]
pub struct ObjTriangle {
    pub position_indices: [u32; 3],
    pub tex_coord_indices: Option<[u32; 3]>,
    pub normal_indices: Option<[u32; 3]>,
}

impl ObjAsset {
    pub fn bounding_box(&self) -> Option<CAaBox> {
        let first = self.positions.first()?;
        let mut aabb = CAaBox {
            min: *first,
            max: *first,
        };

        for pos in &self.positions[1..] {
            aabb.expand(pos);
        }
        Some(aabb)
    }

    /// Corner positions of one triangle.
    pub fn triangle_positions(&self, triangle: &ObjTriangle) -> [C3Vector; 3] {
        [
            self.positions[triangle.position_indices[0] as usize],
            self.positions[triangle.position_indices[1] as usize],
            self.positions[triangle.position_indices[2] as usize],
        ]
    }

    /// Surface area of one triangle, via the cross product.
    pub fn triangle_area(&self, triangle: &ObjTriangle) -> f32 {
        let [a, b, c] = self.triangle_positions(triangle);
        let ab = b.sub(&a);
        let ac = c.sub(&a);
        0.5 * ab.cross(&ac).length()
    }

    /// Serializes the asset back into Wavefront OBJ text. Texture and
    /// normal indices are emitted only when every corner of a triangle
    /// carries them.
    pub fn dump_to_wavefront_obj<W: Write>(&self, w: &mut W) -> Result<(), ParserError> {
        for p in &self.positions {
            writeln!(w, "v {} {} {}", p.x, p.y, p.z)?;
        }
        for t in &self.tex_coords {
            writeln!(w, "vt {} {}", t.x, t.y)?;
        }
        for n in &self.normals {
            writeln!(w, "vn {} {} {}", n.x, n.y, n.z)?;
        }

        for triangle in &self.triangles {
            write!(w, "f")?;
            for corner in 0..3 {
                let v = triangle.position_indices[corner] + 1;
                match (triangle.tex_coord_indices, triangle.normal_indices) {
                    (Some(vt), Some(vn)) => {
                        write!(w, " {}/{}/{}", v, vt[corner] + 1, vn[corner] + 1)?
                    }
                    (Some(vt), None) => write!(w, " {}/{}", v, vt[corner] + 1)?,
                    (None, Some(vn)) => write!(w, " {}//{}", v, vn[corner] + 1)?,
                    (None, None) => write!(w, " {}", v)?,
                }
            }
            writeln!(w)?;
        }

        Ok(())
    }
}
