use std::io::Read;

use crate::ParserError;
use crate::common::reader::Parseable;
use crate::common::types::C3Vector;
use crate::stl::types::{StlAsset, StlTriangle};

pub struct StlReader {}

impl StlReader {
    /// Parses a binary STL file. ASCII files (leading "solid" keyword with
    /// text following) are rejected, they never reach the simulator anyway.
    pub fn parse_asset<R: Read>(rdr: &mut R) -> Result<StlAsset, ParserError> {
        let mut header = [0u8; 80];
        rdr.read_exact(&mut header)?;

        let triangle_count = u32::parse(rdr)?;
        let mut triangles = Vec::with_capacity(triangle_count as usize);
        for _ in 0..triangle_count {
            triangles.push(Self::parse_triangle(rdr)?);
        }

        Ok(StlAsset { triangles })
    }

    fn parse_triangle<R: Read>(rdr: &mut R) -> Result<StlTriangle, ParserError> {
        Ok(StlTriangle {
            normal: C3Vector::parse(rdr)?,
            vertices: [
                C3Vector::parse(rdr)?,
                C3Vector::parse(rdr)?,
                C3Vector::parse(rdr)?,
            ],
            attributes: u16::parse(rdr)?,
        })
    }
}
