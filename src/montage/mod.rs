use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, bail};
use log::{error, info};

use crate::pipeline::{FailedAsset, OpReport};
use crate::registry::ObjectRegistry;

pub struct MontageConfig {
    pub objects_dir: PathBuf,
    pub viewer: String,
}

/// Shows every pooled object in the simulator viewer, one after the other.
/// Closing the viewer advances to the next descriptor; a viewer that exits
/// nonzero is logged and the montage continues.
pub fn run(config: &MontageConfig) -> anyhow::Result<OpReport> {
    let registry = ObjectRegistry::build(&config.objects_dir)?;

    let mut report = OpReport::default();
    // BTreeMap iteration is already id-ordered
    for (id, entry) in &registry.entries {
        info!("Showing simulator XML for o{:04} ...", id);
        match show_descriptor(&config.viewer, &entry.descriptor) {
            Ok(()) => report.completed.push(format!("o{:04}", id)),
            Err(cause) => {
                error!("Viewer failed for o{:04}: {:#}", id, cause);
                report.failed.push(FailedAsset {
                    folder: format!("o{:04}", id),
                    reason: format!("{:#}", cause),
                });
            }
        }
    }

    Ok(report)
}

fn show_descriptor(viewer: &str, descriptor: &Path) -> anyhow::Result<()> {
    let mut parts = viewer.split_whitespace();
    let program = parts.next().context("Empty viewer command")?;

    let status = Command::new(program)
        .args(parts)
        .arg(descriptor)
        .status()
        .with_context(|| format!("Failed to launch viewer {}", viewer))?;

    if !status.success() {
        bail!("Viewer exited with {}", status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn montage_tolerates_failing_viewers() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("o0001.xml"), b"<mujoco/>")?;
        fs::write(dir.path().join("o0002.xml"), b"<mujoco/>")?;

        let report = run(&MontageConfig {
            objects_dir: dir.path().to_path_buf(),
            viewer: "false".to_owned(),
        })?;
        assert!(report.completed.is_empty());
        assert_eq!(report.failed.len(), 2);

        let report = run(&MontageConfig {
            objects_dir: dir.path().to_path_buf(),
            viewer: "true".to_owned(),
        })?;
        assert_eq!(report.completed, vec!["o0001".to_owned(), "o0002".to_owned()]);
        Ok(())
    }
}
