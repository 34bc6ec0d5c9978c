use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{error, info};

use crate::catalog::{self, AssetEntry};
use crate::pipeline::{FailedAsset, OpReport};

pub struct CollectConfig {
    pub mesh_root: PathBuf,
    pub out_dir: PathBuf,
    pub resolution: String,
}

/// Copies every asset's converted mesh and texture into the flat pools
/// (`objects/meshes/<Short>.msh`, `textures/<Short>.png`). Assets with
/// missing files are logged and skipped.
pub fn run(config: &CollectConfig) -> anyhow::Result<OpReport> {
    let entries = catalog::scan(&config.mesh_root)?;

    for dir in ["objects/meshes", "textures"] {
        let dir = config.out_dir.join(dir);
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let mut report = OpReport::default();
    for entry in entries {
        info!("Pooling mesh and texture for {} ...", entry.long_name);
        match collect_entry(config, &entry) {
            Ok(()) => report.completed.push(entry.long_name),
            Err(cause) => {
                error!("Error pooling {}: {:#}", entry.long_name, cause);
                report.failed.push(FailedAsset {
                    folder: entry.long_name,
                    reason: format!("{:#}", cause),
                });
            }
        }
    }

    Ok(report)
}

fn collect_entry(config: &CollectConfig, entry: &AssetEntry) -> anyhow::Result<()> {
    let mesh = entry.mesh_msh(&config.resolution);
    copy_into(
        &mesh,
        &config
            .out_dir
            .join("objects/meshes")
            .join(format!("{}.msh", entry.short_name)),
    )?;

    let texture = entry.texture(&config.resolution);
    copy_into(
        &texture,
        &config
            .out_dir
            .join("textures")
            .join(format!("{}.png", entry.short_name)),
    )?;

    Ok(())
}

fn copy_into(source: &Path, target: &Path) -> anyhow::Result<()> {
    fs::copy(source, target)
        .with_context(|| format!("Failed to copy {}", source.display()))?;
    Ok(())
}
