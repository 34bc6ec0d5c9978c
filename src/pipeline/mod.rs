use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use binforge_files::obj::reader::ObjReader;
use binforge_files::obj::types::{ObjAsset, ObjTriangle};
use itertools::Itertools;
use log::{error, info, warn};
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use crate::catalog::{self, AssetEntry};
use crate::convert::MshConverter;
use crate::derive::{self, DerivedBody};
use crate::geometry::MassProperties;
use crate::props::PropertyTable;
use crate::template::{Template, leftover_tokens, tokens};

pub struct GenerateConfig {
    pub mesh_root: PathBuf,
    pub template_dir: PathBuf,
    pub out_dir: PathBuf,
    pub resolution: String,
    pub properties: Option<PathBuf>,
    pub downsample_ratio: f64,
    pub msh_converter: Option<MshConverter>,
}

#[derive(Debug)]
pub struct FailedAsset {
    pub folder: String,
    pub reason: String,
}

/// Outcome of the simple copy-style operations (stl export, pool collect,
/// montage): which assets went through and which failed.
#[derive(Debug, Default)]
pub struct OpReport {
    pub completed: Vec<String>,
    pub failed: Vec<FailedAsset>,
}

/// Accumulated outcome of a generation batch. Per-id mass and footprint
/// used to live in module-global dictionaries in an earlier incarnation of
/// this pipeline; they are threaded through the loop explicitly instead.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub generated: Vec<u32>,
    pub failed: Vec<FailedAsset>,
    pub mass_by_id: BTreeMap<u32, f64>,
    /// height and smallest horizontal diameter per asset
    pub footprint_by_id: BTreeMap<u32, (f64, f64)>,
}

/// Generates the full descriptor pool: per-asset metadata derivation,
/// template substitution, output materialization and pool copies.
///
/// Per-asset failures are logged and recorded but never abort the batch;
/// missing templates and an unreadable mesh root are fatal.
pub fn run<R: Rng>(config: &GenerateConfig, rng: &mut R) -> anyhow::Result<BatchReport> {
    let model_template = Template::load(&config.template_dir.join("template.xml"))?;
    let visual_template = Template::load(&config.template_dir.join("visual.xml"))?;

    let properties = match &config.properties {
        Some(path) => match PropertyTable::load(path) {
            Ok(table) => table,
            Err(cause) => {
                warn!("Property table unusable, falling back to defaults: {:#}", cause);
                PropertyTable::default()
            }
        },
        None => PropertyTable::default(),
    };

    let entries = catalog::scan(&config.mesh_root)?;

    for dir in ["objects", "objects/meshes", "textures"] {
        let dir = config.out_dir.join(dir);
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let mut report = BatchReport::default();
    for entry in entries {
        info!("Creating simulator XML files for {} ...", entry.long_name);
        match process_asset(config, &properties, &model_template, &visual_template, &entry, rng) {
            Ok(body) => {
                report.generated.push(entry.id);
                report.mass_by_id.insert(entry.id, body.mass);
                report
                    .footprint_by_id
                    .insert(entry.id, (body.height, body.min_diameter()));
            }
            Err(cause) => {
                error!("Error processing {}: {:#}", entry.long_name, cause);
                report.failed.push(FailedAsset {
                    folder: entry.long_name.clone(),
                    reason: format!("{:#}", cause),
                });
            }
        }
    }

    Ok(report)
}

fn process_asset<R: Rng>(
    config: &GenerateConfig,
    properties: &PropertyTable,
    model_template: &Template,
    visual_template: &Template,
    entry: &AssetEntry,
    rng: &mut R,
) -> anyhow::Result<DerivedBody> {
    let obj_path = entry.mesh_obj(&config.resolution);
    let file = File::open(&obj_path)
        .with_context(|| format!("Failed to open mesh {}", obj_path.display()))?;
    let asset = ObjReader::parse_asset(&mut BufReader::new(file))
        .with_context(|| format!("Failed to parse mesh {}", obj_path.display()))?;

    let (mass, dims) = match properties.get(entry.id) {
        Some(record) => (record.mass_kg(), record.dimensions()),
        None => (derive::DEFAULT_MASS, derive::DEFAULT_DIMENSIONS),
    };
    let body = derive::derive_body(rng, mass, dims);

    let mass_properties = MassProperties::compute(&asset)
        .with_context(|| format!("Failed to derive inertia for {}", obj_path.display()))?;
    let inertia = mass_properties.principal_inertia();
    let com = mass_properties.center_mass;

    // Downsampled collision meshes land next to the source mesh, like every
    // other derived per-asset file. References stay relative to the asset
    // directory so both $ADDRESS destinations resolve them.
    let collision_rel = if config.downsample_ratio < 1.0 {
        let downsampled = downsample(&asset, config.downsample_ratio, rng);
        let path = entry.dir.join("downsampled.obj");
        let mut writer = BufWriter::new(File::create(&path)?);
        downsampled
            .dump_to_wavefront_obj(&mut writer)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        "downsampled.obj".to_owned()
    } else {
        entry.collision_mesh_rel(&config.resolution)
    };

    // Without a converter the descriptors and the pool keep the OBJ itself;
    // with one, the produced MSH is referenced and pooled instead.
    let collision_path = entry.dir.join(&collision_rel);
    let (pool_mesh_source, pool_mesh_name, mesh_rel) = match &config.msh_converter {
        Some(converter) => (
            converter.convert(&collision_path)?,
            format!("{}.msh", entry.short_name),
            std::path::Path::new(&collision_rel)
                .with_extension("msh")
                .display()
                .to_string(),
        ),
        None => (
            collision_path,
            format!("{}.obj", entry.short_name),
            collision_rel,
        ),
    };

    let substitutions = vec![
        (tokens::ID, entry.pool_id()),
        (tokens::MODEL_SHORT, entry.short_name.clone()),
        (tokens::MODEL_LONG, entry.long_name.clone()),
        (tokens::YCB_FOLDER, config.mesh_root.display().to_string()),
        (tokens::MESH_TYPE, entry.layout.mesh_type().to_owned()),
        (tokens::MASS, body.mass.to_string()),
        (tokens::BOTTOM, body.bottom().to_string()),
        (tokens::UPPER, body.upper().to_string()),
        (tokens::RADIUS, body.radius().to_string()),
        (tokens::VERTICAL_RADIUS, body.vertical_radius().to_string()),
        (tokens::RATIO, body.scale_ratio.to_string()),
        (tokens::COM, format!("{} {} {}", com.x, com.y, com.z)),
        (tokens::IXX, inertia.x_axis.x.to_string()),
        (tokens::IYY, inertia.y_axis.y.to_string()),
        (tokens::IZZ, inertia.z_axis.z.to_string()),
        (tokens::IXY, inertia.y_axis.x.to_string()),
        (tokens::IXZ, inertia.z_axis.x.to_string()),
        (tokens::IYZ, inertia.z_axis.y.to_string()),
        (tokens::MESH_MODEL_SHORT_FILE, mesh_rel),
        (
            tokens::TEXTURE_MODEL_SHORT_FILE,
            entry.texture_rel(&config.resolution),
        ),
        (
            tokens::UNTEX_MESH_MODEL_SHORT_FILE,
            format!("untextured_{}.stl", entry.short_name),
        ),
    ];

    // the pool descriptor references the asset folder relative to objects/
    let pool_address = format!("../{}", config.mesh_root.join(&entry.long_name).display());

    write_descriptor_pair(
        model_template,
        &substitutions,
        &pool_address,
        &entry.dir.join(format!("{}.xml", entry.short_name)),
        &config
            .out_dir
            .join("objects")
            .join(format!("o{}.xml", entry.pool_id())),
    )?;
    write_descriptor_pair(
        visual_template,
        &substitutions,
        &pool_address,
        &entry.dir.join(format!("{}v.xml", entry.short_name)),
        &config
            .out_dir
            .join("objects")
            .join(format!("o{}v.xml", entry.pool_id())),
    )?;

    // pool copies: collision mesh, untextured scan (YCB layouts), texture
    let mesh_target = config.out_dir.join("objects/meshes").join(&pool_mesh_name);
    fs::copy(&pool_mesh_source, &mesh_target)
        .with_context(|| format!("Failed to copy mesh {}", pool_mesh_source.display()))?;

    if let Some(untextured) = entry.untextured_stl() {
        let target = config
            .out_dir
            .join("objects/meshes")
            .join(format!("untextured_{}.stl", entry.short_name));
        fs::copy(&untextured, &target)
            .with_context(|| format!("Failed to copy {}", untextured.display()))?;
    }

    let texture = entry.texture(&config.resolution);
    let texture_target = config
        .out_dir
        .join("textures")
        .join(format!("{}.png", entry.short_name));
    fs::copy(&texture, &texture_target)
        .with_context(|| format!("Failed to copy texture {}", texture.display()))?;

    Ok(body)
}

fn write_descriptor_pair(
    template: &Template,
    substitutions: &[(&str, String)],
    pool_address: &str,
    local_path: &std::path::Path,
    pool_path: &std::path::Path,
) -> anyhow::Result<()> {
    let mut local = substitutions.to_vec();
    local.push((tokens::ADDRESS, ".".to_owned()));
    let local_text = template.render(&local);

    let mut pool = substitutions.to_vec();
    pool.push((tokens::ADDRESS, pool_address.to_owned()));
    let pool_text = template.render(&pool);

    for (path, text) in [(local_path, &local_text), (pool_path, &pool_text)] {
        let leftover = leftover_tokens(text);
        if !leftover.is_empty() {
            warn!(
                "Descriptor {} still contains placeholder tokens: {}",
                path.display(),
                leftover.join(", ")
            );
        }
        fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}

/// Area-weighted face subset, the poor man's mesh decimation: sample
/// `ratio * face count` faces proportionally to their area and keep the
/// deduplicated selection.
fn downsample<R: Rng>(asset: &ObjAsset, ratio: f64, rng: &mut R) -> ObjAsset {
    let target = ((asset.triangles.len() as f64) * ratio) as usize;
    let target = target.max(1);

    let weights = asset
        .triangles
        .iter()
        .map(|triangle| asset.triangle_area(triangle).max(f32::EPSILON))
        .collect_vec();

    // all weights are >= epsilon, the distribution cannot fail
    let distribution = WeightedIndex::new(&weights).expect("positive face areas");
    let triangles: Vec<ObjTriangle> = (0..target)
        .map(|_| distribution.sample(rng))
        .unique()
        .sorted()
        .map(|index| asset.triangles[index])
        .collect_vec();

    ObjAsset {
        positions: asset.positions.clone(),
        tex_coords: asset.tex_coords.clone(),
        normals: asset.normals.clone(),
        triangles,
    }
}
