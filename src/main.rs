//! landgen CLI - procedural landform generator.
//!
//! Generate 3D-printable terrain solids as ASCII STL, optionally with
//! heightmap images of the same terrain.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::Rng;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use landgen::export::{
    estimated_stl_bytes, export_heightmap, export_stl, solid_name, suggested_filename, HeightRange,
    HeightmapFormat, NormalMode, StlOptions,
};
use landgen::mesh::MeshStats;
use landgen::{generate_heightfield, Landform, SolidMesh, TerrainParams};

/// Largest resolution accepted from the command line.
const CLI_MAX_RESOLUTION: u32 = 2048;

/// Seeds drawn when none is given are in `0..RANDOM_SEED_RANGE`.
const RANDOM_SEED_RANGE: i64 = 100_000;

/// Procedural landform generator for 3D printing.
#[derive(Parser)]
#[command(name = "landgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a terrain solid and write it as ASCII STL.
    Generate {
        #[command(flatten)]
        params: ParamArgs,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Output file stem (default: landgen_<landform>_s<seed>).
        #[arg(short, long)]
        name: Option<String>,

        /// Write placeholder `0 0 0` facet normals.
        #[arg(long)]
        zero_normals: bool,

        /// Also export the height field in this format.
        #[arg(long)]
        heightmap: Option<HeightmapArg>,

        /// Also write the resolved parameters as JSON next to the STL.
        #[arg(long)]
        save_params: bool,
    },

    /// Display mesh statistics for a parameter set without writing files.
    Info {
        #[command(flatten)]
        params: ParamArgs,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the available landforms.
    Landforms,
}

/// Terrain parameters; flags override values loaded from `--config`.
#[derive(Args)]
struct ParamArgs {
    /// JSON parameter file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Landform archetype (see `landgen landforms`).
    #[arg(short, long)]
    landform: Option<Landform>,

    /// Footprint edge length in mm.
    #[arg(long)]
    size: Option<f64>,

    /// Height of a fully raised vertex above the base, in mm.
    #[arg(long)]
    max_height: Option<f64>,

    /// Grid segments per side.
    #[arg(short, long)]
    resolution: Option<u32>,

    /// Base frequency of the detail noise.
    #[arg(long)]
    noise_scale: Option<f64>,

    /// Per-octave amplitude falloff (0-1).
    #[arg(long)]
    roughness: Option<f64>,

    /// Shape warp strength (0-1).
    #[arg(long)]
    distortion: Option<f64>,

    /// Random seed; drawn at random when neither given nor in the config.
    #[arg(short, long, allow_negative_numbers = true)]
    seed: Option<i64>,

    /// Solid thickness under every vertex, in mm.
    #[arg(long)]
    base_thickness: Option<f64>,
}

impl ParamArgs {
    /// Merges defaults, the config file and explicit flags, then validates.
    fn resolve(&self) -> Result<TerrainParams> {
        let (mut params, config_has_seed) = match &self.config {
            Some(path) => load_params(path)?,
            None => (TerrainParams::default(), false),
        };

        if let Some(landform) = self.landform {
            params.landform = landform;
        }
        if let Some(size) = self.size {
            params.size = size;
        }
        if let Some(max_height) = self.max_height {
            params.max_height = max_height;
        }
        if let Some(resolution) = self.resolution {
            params.resolution = resolution;
        }
        if let Some(noise_scale) = self.noise_scale {
            params.noise_scale = noise_scale;
        }
        if let Some(roughness) = self.roughness {
            params.roughness = roughness;
        }
        if let Some(distortion) = self.distortion {
            params.distortion = distortion;
        }
        if let Some(base_thickness) = self.base_thickness {
            params.base_thickness = base_thickness;
        }
        match self.seed {
            Some(seed) => params.seed = seed,
            None if !config_has_seed => params.seed = rand::thread_rng().gen_range(0..RANDOM_SEED_RANGE),
            None => {}
        }

        if params.resolution > CLI_MAX_RESOLUTION {
            bail!("Resolution must be at most {}", CLI_MAX_RESOLUTION);
        }
        params.validate()?;
        Ok(params)
    }
}

/// Reads a JSON parameter file, reporting whether it pinned the seed.
fn load_params(path: &Path) -> Result<(TerrainParams, bool)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    let has_seed = value.get("seed").is_some();
    let params = serde_json::from_value(value)
        .with_context(|| format!("Invalid terrain parameters in {}", path.display()))?;
    Ok((params, has_seed))
}

#[derive(Clone, Copy, ValueEnum)]
enum HeightmapArg {
    /// 16-bit grayscale PNG.
    Png,
    /// 16-bit RAW little-endian (Unity).
    Raw,
    /// 32-bit float RAW in millimetres.
    RawFloat,
}

impl From<HeightmapArg> for HeightmapFormat {
    fn from(arg: HeightmapArg) -> Self {
        match arg {
            HeightmapArg::Png => HeightmapFormat::Png16,
            HeightmapArg::Raw => HeightmapFormat::Raw16Le,
            HeightmapArg::RawFloat => HeightmapFormat::Raw32,
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            params,
            output,
            name,
            zero_normals,
            heightmap,
            save_params,
        } => {
            let params = params.resolve()?;
            let normals = if zero_normals {
                NormalMode::Zero
            } else {
                NormalMode::Computed
            };
            run_generate(&params, &output, name, normals, heightmap, save_params)
        }
        Commands::Info { params, json } => run_info(&params.resolve()?, json),
        Commands::Landforms => {
            run_landforms();
            Ok(())
        }
    }
}

fn run_generate(
    params: &TerrainParams,
    output: &Path,
    name: Option<String>,
    normals: NormalMode,
    heightmap: Option<HeightmapArg>,
    save_params: bool,
) -> Result<()> {
    info!(
        landform = %params.landform,
        seed = params.seed,
        resolution = params.resolution,
        "generating terrain"
    );

    let start = Instant::now();
    let field = generate_heightfield(params)?;
    let mesh = SolidMesh::build(&field, params);
    let (min_h, max_h) = field.height_range();
    info!(
        elapsed = ?start.elapsed(),
        triangles = mesh.triangle_count(),
        min_h,
        max_h,
        "generation completed"
    );

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory {}", output.display()))?;

    let stem = name.unwrap_or_else(|| solid_name(params));
    let stl_path = output.join(format!("{}.stl", stem));
    let options = StlOptions {
        solid_name: stem.clone(),
        normals,
    };

    let export_start = Instant::now();
    export_stl(&mesh, &stl_path, &options)
        .with_context(|| format!("Failed to write {}", stl_path.display()))?;
    info!(path = %stl_path.display(), elapsed = ?export_start.elapsed(), "STL exported");

    if let Some(arg) = heightmap {
        let format = HeightmapFormat::from(arg);
        let path = output.join(format!("{}{}", stem, format.suffix()));
        export_heightmap(&field, &path, format, HeightRange::of_field(&field))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "heightmap exported");
    }

    if save_params {
        let params_path = output.join(format!("{}.json", stem));
        let json = serde_json::to_string_pretty(params)?;
        fs::write(&params_path, json)
            .with_context(|| format!("Failed to write {}", params_path.display()))?;
        info!(path = %params_path.display(), "parameters saved");
    }

    Ok(())
}

#[derive(Serialize)]
struct InfoReport<'a> {
    params: &'a TerrainParams,
    filename: String,
    estimated_stl_bytes: u64,
    mesh: MeshStats,
}

fn run_info(params: &TerrainParams, json: bool) -> Result<()> {
    let field = generate_heightfield(params)?;
    let mesh = SolidMesh::build(&field, params);
    let report = InfoReport {
        params,
        filename: suggested_filename(params),
        estimated_stl_bytes: estimated_stl_bytes(mesh.triangle_count()),
        mesh: mesh.stats(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let stats = &report.mesh;
    println!("landgen - Terrain Info");
    println!("======================");
    println!();
    println!("Landform:   {} ({})", params.landform.label(), params.landform);
    println!("Seed:       {}", params.seed);
    println!("Footprint:  {} x {} mm", params.size, params.size);
    println!("Resolution: {} segments ({}x{} vertices)", params.resolution, field.side(), field.side());
    println!();
    println!("Mesh:");
    println!("  Vertices:        {:>10}", stats.vertex_count);
    println!("  Top triangles:   {:>10}", stats.top_triangles);
    println!("  Skirt triangles: {:>10}", stats.skirt_triangles);
    println!("  Base triangles:  {:>10}", stats.base_triangles);
    println!("  Total:           {:>10}", stats.triangle_count);
    println!();
    println!("Height range: [{:.4}, {:.4}] mm", stats.min_height, stats.max_height);
    println!("Volume:       {:.1} mm^3 ({:.2} cm^3)", stats.volume, stats.volume / 1000.0);
    println!();
    println!(
        "STL output:   {} (~{:.2} MB)",
        report.filename,
        report.estimated_stl_bytes as f64 / 1024.0 / 1024.0
    );

    Ok(())
}

fn run_landforms() {
    for landform in Landform::all() {
        println!("{:<16} {}", landform.slug(), landform.label());
    }
}
