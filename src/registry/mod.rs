use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::trace;
use serde::{Deserialize, Serialize};

/// One pooled object: its full-body descriptor and, when generated, the
/// visual-only variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub descriptor: PathBuf,
    pub visual: Option<PathBuf>,
}

/// Id-keyed index over a generated descriptor pool.
///
/// Simulator-side consumers used to get one generated wrapper class pair
/// per asset id; this registry replaces that with data they can look up.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ObjectRegistry {
    pub entries: BTreeMap<u32, RegistryEntry>,
}

impl ObjectRegistry {
    /// Scans `objects_dir` for `o<4-digit id>.xml` descriptors, pairing
    /// each with its `o<id>v.xml` visual when present. The `meshes/` pool
    /// and anything else that is not a descriptor is skipped.
    pub fn build(objects_dir: &Path) -> anyhow::Result<ObjectRegistry> {
        let mut entries = BTreeMap::new();

        let dir_entries = fs::read_dir(objects_dir)
            .with_context(|| format!("Failed to enumerate {}", objects_dir.display()))?;
        for entry in dir_entries.filter_map(|entry| entry.ok()) {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            let Some(id) = parse_descriptor_name(&name) else {
                trace!("Skipping non-descriptor entry {}", name);
                continue;
            };

            let visual_path = objects_dir.join(format!("o{:04}v.xml", id));
            entries.insert(
                id,
                RegistryEntry {
                    descriptor: entry.path(),
                    visual: visual_path.is_file().then_some(visual_path),
                },
            );
        }

        Ok(ObjectRegistry { entries })
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = ron::ser::to_string_pretty(self, Default::default())
            .context("Failed to serialize object registry")?;
        fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> anyhow::Result<ObjectRegistry> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        ron::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// `o0191.xml` -> 191. Visual descriptors (`o0191v.xml`) and everything
/// else return None.
fn parse_descriptor_name(name: &str) -> Option<u32> {
    let stem = name.strip_prefix('o')?.strip_suffix(".xml")?;
    if stem.len() != 4 || !stem.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    stem.parse::<u32>().ok()
}
