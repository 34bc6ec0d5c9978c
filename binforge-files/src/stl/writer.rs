use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::ParserError;
use crate::common::types::C3Vector;
use crate::stl::types::StlAsset;

pub struct StlWriter {}

impl StlWriter {
    /// Writes the asset in the binary STL layout: 80 byte header, triangle
    /// count, then 50 bytes per triangle.
    pub fn write_asset<W: Write>(w: &mut W, asset: &StlAsset) -> Result<(), ParserError> {
        if asset.triangles.is_empty() {
            return Err(ParserError::EmptySource);
        }

        let mut header = [0u8; 80];
        let tag = b"binforge binary stl";
        header[..tag.len()].copy_from_slice(tag);
        w.write_all(&header)?;

        w.write_u32::<LittleEndian>(asset.triangles.len() as u32)?;
        for triangle in &asset.triangles {
            Self::write_vector(w, &triangle.normal)?;
            for vertex in &triangle.vertices {
                Self::write_vector(w, vertex)?;
            }
            w.write_u16::<LittleEndian>(triangle.attributes)?;
        }

        Ok(())
    }

    fn write_vector<W: Write>(w: &mut W, v: &C3Vector) -> Result<(), ParserError> {
        w.write_f32::<LittleEndian>(v.x)?;
        w.write_f32::<LittleEndian>(v.y)?;
        w.write_f32::<LittleEndian>(v.z)?;
        Ok(())
    }
}
