use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// One row of the physical-property spreadsheet export: mass in grams and
/// up to three measured extents in millimetres (zero means "not measured").
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct PhysicalRecord {
    pub mass_g: f64,
    pub longitude1_mm: f64,
    pub longitude2_mm: f64,
    pub longitude3_mm: f64,
}

/// Source bounding dimensions in metres.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SourceDimensions {
    pub height: f64,
    pub radius_x: f64,
    pub radius_y: f64,
}

impl PhysicalRecord {
    pub fn mass_kg(&self) -> f64 {
        self.mass_g / 1000.0
    }

    /// Interprets the measured extents: the third extent is the height when
    /// present; with two extents the second is the height and the object is
    /// rotationally symmetric; with one the object is treated as a sphereish
    /// blob. Radii are half-extents.
    pub fn dimensions(&self) -> SourceDimensions {
        if self.longitude3_mm != 0.0 {
            SourceDimensions {
                height: self.longitude3_mm / 1000.0,
                radius_x: self.longitude1_mm / 2000.0,
                radius_y: self.longitude2_mm / 2000.0,
            }
        } else if self.longitude2_mm != 0.0 {
            SourceDimensions {
                height: self.longitude2_mm / 1000.0,
                radius_x: self.longitude1_mm / 2000.0,
                radius_y: self.longitude1_mm / 2000.0,
            }
        } else {
            SourceDimensions {
                height: self.longitude1_mm / 1000.0,
                radius_x: self.longitude1_mm / 2000.0,
                radius_y: self.longitude1_mm / 2000.0,
            }
        }
    }
}

/// Physical properties keyed by asset id, deserialized from a RON file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PropertyTable {
    pub records: HashMap<u32, PhysicalRecord>,
}

impl PropertyTable {
    pub fn load(path: &Path) -> anyhow::Result<PropertyTable> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read property table {}", path.display()))?;
        ron::from_str(&text)
            .with_context(|| format!("Failed to parse property table {}", path.display()))
    }

    pub fn get(&self, id: u32) -> Option<&PhysicalRecord> {
        self.records.get(&id)
    }
}
