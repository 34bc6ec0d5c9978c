use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use itertools::Itertools;
use log::trace;

/// Where an asset directory keeps its mesh and texture files.
///
/// KIT downloads carry a `meshes/` folder with resolution-suffixed files,
/// YCB downloads either the high quality `google_16k` scan or the lower
/// quality `tsdf` reconstruction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MeshLayout {
    Kit,
    Google16k,
    Tsdf,
}

impl MeshLayout {
    fn detect(dir: &Path) -> MeshLayout {
        if dir.join("google_16k").is_dir() {
            MeshLayout::Google16k
        } else if dir.join("tsdf").is_dir() {
            MeshLayout::Tsdf
        } else {
            MeshLayout::Kit
        }
    }

    /// The subfolder name, also the `$MESH_TYPE` template value.
    pub fn mesh_type(&self) -> &'static str {
        match self {
            MeshLayout::Kit => "meshes",
            MeshLayout::Google16k => "google_16k",
            MeshLayout::Tsdf => "tsdf",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssetEntry {
    pub id: u32,
    /// Human readable name, e.g. `OrangeMarmelade`
    pub short_name: String,
    /// Directory name, e.g. `191_OrangeMarmelade`
    pub long_name: String,
    pub dir: PathBuf,
    pub layout: MeshLayout,
}

impl AssetEntry {
    /// Pool file stem: ids are 4-wide here even though the dataset folders
    /// are 3-wide (the pool encoding goes beyond 999).
    pub fn pool_id(&self) -> String {
        format!("{:04}", self.id)
    }

    fn kit_file(&self, resolution: &str, extension: &str) -> PathBuf {
        self.dir
            .join("meshes")
            .join(format!("{}_{}_tex.{}", self.short_name, resolution, extension))
    }

    pub fn mesh_obj(&self, resolution: &str) -> PathBuf {
        match self.layout {
            MeshLayout::Kit => self.kit_file(resolution, "obj"),
            layout => self.dir.join(layout.mesh_type()).join("textured.obj"),
        }
    }

    pub fn mesh_msh(&self, resolution: &str) -> PathBuf {
        match self.layout {
            MeshLayout::Kit => self.kit_file(resolution, "msh"),
            layout => self.dir.join(layout.mesh_type()).join("textured.msh"),
        }
    }

    pub fn texture(&self, resolution: &str) -> PathBuf {
        match self.layout {
            MeshLayout::Kit => self.kit_file(resolution, "png"),
            MeshLayout::Google16k => self.dir.join("google_16k").join("texture_map.png"),
            MeshLayout::Tsdf => self.dir.join("tsdf").join("textured.png"),
        }
    }

    /// The untextured collision scan only exists in the YCB layouts.
    pub fn untextured_stl(&self) -> Option<PathBuf> {
        match self.layout {
            MeshLayout::Kit => None,
            layout => Some(self.dir.join(layout.mesh_type()).join("nontextured.stl")),
        }
    }

    /// Collision mesh reference relative to the asset directory. Descriptor
    /// text reaches it through the `$ADDRESS` prefix, which differs between
    /// the per-asset and the pooled destination.
    pub fn collision_mesh_rel(&self, resolution: &str) -> String {
        match self.layout {
            MeshLayout::Kit => format!("meshes/{}_{}_tex.obj", self.short_name, resolution),
            layout => format!("{}/textured.obj", layout.mesh_type()),
        }
    }

    /// Texture reference relative to the asset directory.
    pub fn texture_rel(&self, resolution: &str) -> String {
        match self.layout {
            MeshLayout::Kit => format!("meshes/{}_{}_tex.png", self.short_name, resolution),
            MeshLayout::Google16k => "google_16k/texture_map.png".to_owned(),
            MeshLayout::Tsdf => "tsdf/textured.png".to_owned(),
        }
    }
}

/// Enumerates all asset directories under the mesh root, sorted by id.
///
/// Anything that is not a `<3-digit id>_<ShortName>` directory (the
/// `template` folder, `meshes` pools, `.DS_Store` droppings) is skipped.
pub fn scan(mesh_root: &Path) -> anyhow::Result<Vec<AssetEntry>> {
    let entries = fs::read_dir(mesh_root)
        .with_context(|| format!("Failed to enumerate mesh root {}", mesh_root.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            match parse_folder_name(&name) {
                Some((id, short_name)) => {
                    let dir = entry.path();
                    let layout = MeshLayout::detect(&dir);
                    Some(AssetEntry {
                        id,
                        short_name,
                        long_name: name,
                        dir,
                        layout,
                    })
                }
                None => {
                    trace!("Skipping non-asset entry {}", name);
                    None
                }
            }
        })
        .sorted_by_key(|entry| entry.id)
        .collect_vec();

    Ok(entries)
}

/// Splits `191_OrangeMarmelade` into `(191, "OrangeMarmelade")`.
fn parse_folder_name(name: &str) -> Option<(u32, String)> {
    let (digits, rest) = name.split_at_checked(3)?;
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let short_name = rest.strip_prefix('_')?;
    if short_name.is_empty() {
        return None;
    }

    let id = digits.trim_start_matches('0').parse::<u32>().ok()?;
    Some((id, short_name.to_owned()))
}
