//! Application entry point for the n-body viewer.
//!
//! This binary parses the command line, optionally loads a JSON settings
//! file, and hands a seeded [`Viewer`] to eframe, which owns the window and
//! event loop from there on.

mod viewer;

use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use nbody_core::{SimConfig, distribution::DiskSpawn};
use rand::Rng;
use serde::Deserialize;

use viewer::{SpawnMode, Viewer};

#[derive(Parser, Debug)]
#[command(about = "Gravitating bodies that merge on contact")]
struct Args {
    /// JSON file with simulation parameters and an optional `spawn` section;
    /// missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of initial bodies, overrides the config file
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Radius of the initial disk, overrides the config file
    #[arg(short, long)]
    radius: Option<f32>,

    /// Vertices per contact polygon, overrides the config file
    #[arg(short, long)]
    vertices: Option<usize>,

    /// Initial layout of the bodies
    #[arg(short, long, value_enum, default_value_t = SpawnMode::Disk)]
    mode: SpawnMode,

    /// Seed for the initial distribution; random when omitted
    #[arg(short, long)]
    seed: Option<u64>,
}

/// Contents of the `--config` file.
///
/// Simulation parameters sit at the top level, the initial distribution
/// under `spawn`:
///
/// ```json
/// { "gravity": 2.0, "spawn": { "count": 500, "max_radius": 80.0 } }
/// ```
#[derive(Debug, Default, Deserialize)]
struct Settings {
    #[serde(flatten)]
    sim: SimConfig,
    #[serde(default)]
    spawn: DiskSpawn,
}

impl Settings {
    fn apply_args(mut self, args: &Args) -> Self {
        if let Some(n) = args.vertices {
            self.sim = self.sim.with_vertex_count(n);
        }
        if let Some(count) = args.count {
            self.spawn.count = count;
        }
        if let Some(radius) = args.radius {
            self.spawn.max_radius = radius;
        }
        self
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let settings = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(settings)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = load_settings(args.config.as_ref())?.apply_args(&args);
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    info!(
        "starting with {} bodies ({:?}), seed {seed}",
        settings.spawn.count, args.mode
    );

    let viewer = Viewer::new(settings.sim, settings.spawn, args.mode, seed)?;

    eframe::run_native(
        "n-body",
        eframe::NativeOptions::default(),
        Box::new(|_cc| Ok(Box::new(viewer))),
    )
    .map_err(|e| anyhow::anyhow!("eframe failed: {e}"))
}
