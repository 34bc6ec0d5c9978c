use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, bail};
use binforge_files::obj::reader::ObjReader;
use binforge_files::stl::types::StlAsset;
use binforge_files::stl::writer::StlWriter;
use log::{error, info};

use crate::catalog;
use crate::pipeline::{FailedAsset, OpReport};

/// External OBJ-to-MSH converter (the legacy simulator mesh format is an
/// out-of-tree collaborator). The command string is split on whitespace,
/// the OBJ path is appended as the last argument.
pub struct MshConverter {
    program: String,
    args: Vec<String>,
}

impl MshConverter {
    pub fn from_command(command: &str) -> anyhow::Result<MshConverter> {
        let mut parts = command.split_whitespace().map(str::to_owned);
        let program = parts.next().context("Empty MSH converter command")?;
        Ok(MshConverter {
            program,
            args: parts.collect(),
        })
    }

    /// Runs the converter and returns the path of the produced `.msh`.
    /// A nonzero exit is an error carrying the converter's stderr.
    pub fn convert(&self, obj_path: &Path) -> anyhow::Result<PathBuf> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(obj_path)
            .output()
            .with_context(|| format!("Failed to execute MSH converter {}", self.program))?;

        if !output.status.success() {
            bail!(
                "MSH conversion of {} failed ({}): {}",
                obj_path.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(obj_path.with_extension("msh"))
    }
}

pub struct StlExportConfig {
    pub mesh_root: PathBuf,
    pub out_dir: PathBuf,
    pub resolution: String,
}

/// Exports a binary STL per asset into `<out>/objects/<long name>/` and
/// copies the texture next to it. Binary STL is written directly, the
/// simulator does not load the ASCII flavour.
pub fn export_stl(config: &StlExportConfig) -> anyhow::Result<OpReport> {
    let entries = catalog::scan(&config.mesh_root)?;
    let mut report = OpReport::default();

    for entry in entries {
        info!("Creating STL files for {} ...", entry.long_name);
        match export_entry(config, &entry) {
            Ok(()) => report.completed.push(entry.long_name),
            Err(cause) => {
                error!("Creating failed for {}: {:#}", entry.long_name, cause);
                report.failed.push(FailedAsset {
                    folder: entry.long_name,
                    reason: format!("{:#}", cause),
                });
            }
        }
    }

    Ok(report)
}

fn export_entry(config: &StlExportConfig, entry: &catalog::AssetEntry) -> anyhow::Result<()> {
    let obj_path = entry.mesh_obj(&config.resolution);
    let file = File::open(&obj_path)
        .with_context(|| format!("Failed to open mesh {}", obj_path.display()))?;
    let asset = ObjReader::parse_asset(&mut BufReader::new(file))
        .with_context(|| format!("Failed to parse mesh {}", obj_path.display()))?;
    let stl = StlAsset::from_obj(&asset)?;

    let target_dir = config.out_dir.join("objects").join(&entry.long_name);
    fs::create_dir_all(&target_dir)
        .with_context(|| format!("Failed to create {}", target_dir.display()))?;

    let stl_name = format!("{}_{}_tex.stl", entry.short_name, config.resolution);
    let stl_path = target_dir.join(stl_name);
    let mut writer = BufWriter::new(File::create(&stl_path)?);
    StlWriter::write_asset(&mut writer, &stl)
        .with_context(|| format!("Failed to write {}", stl_path.display()))?;

    let texture = entry.texture(&config.resolution);
    let texture_target = target_dir.join(
        texture
            .file_name()
            .context("Texture path without a file name")?,
    );
    fs::copy(&texture, &texture_target)
        .with_context(|| format!("Failed to copy texture {}", texture.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use binforge_files::stl::reader::StlReader;
    use std::io::Cursor;

    const TET_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
f 1 3 2
f 1 2 4
f 1 4 3
f 2 3 4
";

    fn fixture(root: &Path) -> anyhow::Result<()> {
        let meshes = root.join("191_OrangeMarmelade").join("meshes");
        fs::create_dir_all(&meshes)?;
        fs::write(meshes.join("OrangeMarmelade_Orig_tex.obj"), TET_OBJ)?;
        fs::write(meshes.join("OrangeMarmelade_Orig_tex.png"), b"png")?;
        Ok(())
    }

    #[test]
    fn exports_binary_stl_and_texture() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        fixture(dir.path())?;

        let config = StlExportConfig {
            mesh_root: dir.path().to_path_buf(),
            out_dir: dir.path().join("out"),
            resolution: "Orig".to_owned(),
        };
        let report = export_stl(&config)?;
        assert_eq!(report.completed, vec!["191_OrangeMarmelade".to_owned()]);
        assert!(report.failed.is_empty());

        let target = dir.path().join("out/objects/191_OrangeMarmelade");
        let stl_bytes = fs::read(target.join("OrangeMarmelade_Orig_tex.stl"))?;
        let stl = StlReader::parse_asset(&mut Cursor::new(&stl_bytes))?;
        assert_eq!(stl.triangles.len(), 4);
        assert!(target.join("OrangeMarmelade_Orig_tex.png").exists());
        Ok(())
    }

    #[test]
    fn missing_meshes_fail_per_asset_not_per_batch() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        fixture(dir.path())?;
        fs::create_dir(dir.path().join("002_broken"))?;

        let config = StlExportConfig {
            mesh_root: dir.path().to_path_buf(),
            out_dir: dir.path().join("out"),
            resolution: "Orig".to_owned(),
        };
        let report = export_stl(&config)?;
        assert_eq!(report.completed.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].folder, "002_broken");
        Ok(())
    }

    #[test]
    fn nonzero_converter_exit_is_surfaced() {
        let converter = MshConverter::from_command("false").unwrap();
        let result = converter.convert(Path::new("whatever.obj"));
        assert!(result.is_err());
    }

    #[test]
    fn successful_conversion_reports_the_msh_path() -> Result<(), anyhow::Error> {
        let converter = MshConverter::from_command("true")?;
        let msh = converter.convert(Path::new("meshes/model.obj"))?;
        assert_eq!(msh, PathBuf::from("meshes/model.msh"));
        Ok(())
    }
}
