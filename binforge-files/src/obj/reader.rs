use std::io::BufRead;

use crate::ParserError;
use crate::common::types::{C2Vector, C3Vector};
use crate::obj::types::{ObjAsset, ObjTriangle};

pub struct ObjReader {}

impl ObjReader {
    pub fn parse_asset<R: BufRead>(rdr: &mut R) -> Result<ObjAsset, ParserError> {
        let mut asset = ObjAsset {
            positions: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            triangles: Vec::new(),
        };

        for (line_number, line) in rdr.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            // cannot be empty, we skipped empty lines above
            let keyword = parts.next().expect("split of a non-empty line");
            let operands: Vec<&str> = parts.collect();

            match keyword {
                "v" => asset.positions.push(Self::parse_vec3(&operands, line_number)?),
                "vn" => asset.normals.push(Self::parse_vec3(&operands, line_number)?),
                "vt" => asset.tex_coords.push(Self::parse_vec2(&operands, line_number)?),
                "f" => Self::parse_face(&mut asset, &operands, line_number)?,
                // groups, objects, materials and smoothing don't affect geometry
                _ => continue,
            }
        }

        Ok(asset)
    }

    fn parse_float(token: &str, line: usize) -> Result<f32, ParserError> {
        token.parse::<f32>().map_err(|_| ParserError::MalformedNumber {
            line: line + 1,
            token: token.to_owned(),
        })
    }

    fn parse_vec3(operands: &[&str], line: usize) -> Result<C3Vector, ParserError> {
        if operands.len() < 3 {
            return Err(ParserError::FormatError {
                reason: "Vertex directive with fewer than 3 components",
            });
        }

        Ok(C3Vector {
            x: Self::parse_float(operands[0], line)?,
            y: Self::parse_float(operands[1], line)?,
            z: Self::parse_float(operands[2], line)?,
        })
    }

    fn parse_vec2(operands: &[&str], line: usize) -> Result<C2Vector, ParserError> {
        if operands.len() < 2 {
            return Err(ParserError::FormatError {
                reason: "Texture coordinate directive with fewer than 2 components",
            });
        }

        Ok(C2Vector {
            x: Self::parse_float(operands[0], line)?,
            y: Self::parse_float(operands[1], line)?,
        })
    }

    fn parse_face(asset: &mut ObjAsset, operands: &[&str], line: usize) -> Result<(), ParserError> {
        if operands.len() < 3 {
            return Err(ParserError::FormatError {
                reason: "Face directive with fewer than 3 corners",
            });
        }

        let mut corners = Vec::with_capacity(operands.len());
        for corner in operands {
            corners.push(Self::parse_corner(asset, corner, line)?);
        }

        // fan triangulation, OBJ polygons are convex by convention
        for i in 1..corners.len() - 1 {
            let fan = [corners[0], corners[i], corners[i + 1]];
            asset.triangles.push(ObjTriangle {
                position_indices: [fan[0].0, fan[1].0, fan[2].0],
                tex_coord_indices: Self::lift_indices([fan[0].1, fan[1].1, fan[2].1]),
                normal_indices: Self::lift_indices([fan[0].2, fan[1].2, fan[2].2]),
            });
        }

        Ok(())
    }

    /// Parses one `v`, `v/vt`, `v//vn` or `v/vt/vn` corner into absolute indices.
    fn parse_corner(
        asset: &ObjAsset,
        corner: &str,
        line: usize,
    ) -> Result<(u32, Option<u32>, Option<u32>), ParserError> {
        let mut fields = corner.split('/');

        let position = fields.next().filter(|field| !field.is_empty()).ok_or(
            ParserError::FormatError {
                reason: "Face corner without a position index",
            },
        )?;
        let position = Self::resolve_index(position, asset.positions.len(), line)?;

        let tex_coord = match fields.next() {
            Some("") | None => None,
            Some(field) => Some(Self::resolve_index(field, asset.tex_coords.len(), line)?),
        };

        let normal = match fields.next() {
            Some("") | None => None,
            Some(field) => Some(Self::resolve_index(field, asset.normals.len(), line)?),
        };

        Ok((position, tex_coord, normal))
    }

    /// OBJ indices are 1-based, negative values count back from the end of
    /// the pool as filled so far.
    fn resolve_index(token: &str, pool_len: usize, line: usize) -> Result<u32, ParserError> {
        let raw = token.parse::<i64>().map_err(|_| ParserError::MalformedNumber {
            line: line + 1,
            token: token.to_owned(),
        })?;

        let resolved = if raw > 0 {
            raw - 1
        } else if raw < 0 {
            pool_len as i64 + raw
        } else {
            -1
        };

        if resolved < 0 || resolved >= pool_len as i64 {
            return Err(ParserError::IndexOutOfBounds {
                index: raw,
                line: line + 1,
            });
        }
        Ok(resolved as u32)
    }

    fn lift_indices(indices: [Option<u32>; 3]) -> Option<[u32; 3]> {
        match indices {
            [Some(a), Some(b), Some(c)] => Some([a, b, c]),
            _ => None,
        }
    }
}
