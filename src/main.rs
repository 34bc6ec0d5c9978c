use clap::Parser;
use log::{info, warn};

use crate::convert::{MshConverter, StlExportConfig};
use crate::pipeline::{GenerateConfig, OpReport};
use crate::registry::ObjectRegistry;
use crate::settings::{CliArgs, Operation};

mod catalog;
mod collect;
mod convert;
mod derive;
mod geometry;
mod montage;
mod pipeline;
mod props;
mod registry;
mod settings;
mod template;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    log::trace!("Starting with args: {:?}", args);

    match args.operation {
        Operation::Generate {
            mesh_root,
            template_dir,
            out_dir,
            resolution,
            properties,
            downsample_ratio,
            msh_converter,
        } => {
            let config = GenerateConfig {
                mesh_root,
                template_dir,
                out_dir,
                resolution,
                properties,
                downsample_ratio,
                msh_converter: msh_converter
                    .as_deref()
                    .map(MshConverter::from_command)
                    .transpose()?,
            };

            let report = pipeline::run(&config, &mut rand::rng())?;
            info!(
                "Generation completed: {} descriptors, {} failures.",
                report.generated.len(),
                report.failed.len()
            );
            for failed in &report.failed {
                warn!("  {}: {}", failed.folder, failed.reason);
            }
        }
        Operation::ConvertStl {
            mesh_root,
            out_dir,
            resolution,
        } => {
            let report = convert::export_stl(&StlExportConfig {
                mesh_root,
                out_dir,
                resolution,
            })?;
            log_op_report("STL export", &report);
        }
        Operation::Collect {
            mesh_root,
            out_dir,
            resolution,
        } => {
            let report = collect::run(&collect::CollectConfig {
                mesh_root,
                out_dir,
                resolution,
            })?;
            log_op_report("Pool collection", &report);
        }
        Operation::Registry {
            objects_dir,
            output,
        } => {
            let registry = ObjectRegistry::build(&objects_dir)?;
            registry.save(&output)?;
            info!(
                "Registered {} objects into {}.",
                registry.entries.len(),
                output.display()
            );
        }
        Operation::Montage {
            objects_dir,
            viewer,
        } => {
            let report = montage::run(&montage::MontageConfig {
                objects_dir,
                viewer,
            })?;
            log_op_report("Montage", &report);
        }
    }

    Ok(())
}

fn log_op_report(operation: &str, report: &OpReport) {
    info!(
        "{} completed: {} assets, {} failures.",
        operation,
        report.completed.len(),
        report.failed.len()
    );
    for failed in &report.failed {
        warn!("  {}: {}", failed.folder, failed.reason);
    }
}
