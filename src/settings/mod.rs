use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "binforge")]
#[command(version)]
#[command(about = "Converts KIT/YCB mesh datasets into MuJoCo assets for bin-picking simulation")]
pub struct CliArgs {
    #[command(subcommand)]
    pub operation: Operation,
}

#[derive(Subcommand, Debug)]
pub enum Operation {
    /// Derive physical metadata and generate the MuJoCo descriptor pool
    Generate {
        /// Folder holding one `<3-digit id>_<ShortName>` directory per asset
        #[arg(long, env = "BINFORGE_MESH_ROOT", default_value = "KIT_mesh")]
        mesh_root: PathBuf,

        #[arg(long, env = "BINFORGE_TEMPLATE_DIR", default_value = "templates/ycb")]
        template_dir: PathBuf,

        #[arg(long, env = "BINFORGE_OUT_DIR", default_value = ".")]
        out_dir: PathBuf,

        /// KIT mesh resolution suffix, one of 800, 5k, 25k, Orig.
        /// Not every object ships a textured OBJ at Orig.
        #[arg(long, default_value = "25k")]
        resolution: String,

        /// RON export of the physical-property spreadsheet. Assets without
        /// a row fall back to the KIT defaults.
        #[arg(long, env = "BINFORGE_PROPERTIES")]
        properties: Option<PathBuf>,

        /// Mesh face downsample ratio (1 leaves meshes as they are)
        #[arg(long, default_value_t = 1.0)]
        downsample_ratio: f64,

        /// External OBJ-to-MSH converter command, e.g. "python3 convert_obj_to_mujoco_msh.py".
        /// Without it the collision mesh is pooled as OBJ.
        #[arg(long, env = "BINFORGE_MSH_CONVERTER")]
        msh_converter: Option<String>,
    },
    /// Export binary STL collision meshes for every asset
    ConvertStl {
        #[arg(long, env = "BINFORGE_MESH_ROOT", default_value = "KIT_mesh")]
        mesh_root: PathBuf,

        #[arg(long, env = "BINFORGE_OUT_DIR", default_value = ".")]
        out_dir: PathBuf,

        #[arg(long, default_value = "Orig")]
        resolution: String,
    },
    /// Copy converted meshes and textures into the flat destination pools
    Collect {
        #[arg(long, env = "BINFORGE_MESH_ROOT", default_value = "KIT_mesh")]
        mesh_root: PathBuf,

        #[arg(long, env = "BINFORGE_OUT_DIR", default_value = ".")]
        out_dir: PathBuf,

        #[arg(long, default_value = "25k")]
        resolution: String,
    },
    /// Build the id-to-descriptor registry from a generated pool
    Registry {
        #[arg(long, default_value = "objects")]
        objects_dir: PathBuf,

        #[arg(long, default_value = "objects_registry.ron")]
        output: PathBuf,
    },
    /// Launch the simulator viewer once per pooled descriptor
    Montage {
        #[arg(long, default_value = "objects")]
        objects_dir: PathBuf,

        #[arg(long, default_value = "./simulate")]
        viewer: String,
    },
}
