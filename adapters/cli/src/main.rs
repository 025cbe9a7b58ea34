#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for the Find Gold maze core.

mod autoplay;
mod render;
mod snapshot_transfer;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use find_gold_core::Command as WorldCommand;
use find_gold_system_camera::{compute_frustum, maze_center, OrthoFrustum};
use find_gold_world::{apply, query, World, WorldConfig};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Generates, plays and inspects Find Gold mazes.
#[derive(Parser, Debug)]
#[command(name = "find-gold", author, version, about, long_about = None)]
struct Cli {
    /// TOML file with world settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the number of maze columns.
    #[arg(long, global = true)]
    columns: Option<u32>,

    /// Overrides the number of maze rows.
    #[arg(long, global = true)]
    rows: Option<u32>,

    /// Overrides the root seed.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Level to build before running the command.
    #[arg(long, global = true, default_value_t = 1)]
    level: u32,

    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Prints the level as ASCII art.
    Render,
    /// Plays consecutive levels automatically and reports each one.
    Autoplay {
        /// Number of levels to clear.
        #[arg(long, default_value_t = 3)]
        levels: u32,
    },
    /// Prints the overhead camera frustum for the configured maze size.
    Frustum {
        /// Viewport width over height.
        #[arg(long, default_value_t = 16.0 / 9.0)]
        aspect: f32,
        /// Zoom-out multiplier.
        #[arg(long, default_value_t = 1.0)]
        zoom: f32,
    },
    /// Prints the level as a transfer string.
    Export,
    /// Decodes a transfer string and prints the maze.
    Import {
        /// String produced by `export`.
        code: String,
    },
}

const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 1000.0;

/// Overhead camera framing printed by `frustum`.
#[derive(Serialize, Debug)]
struct FrustumReport {
    #[serde(flatten)]
    frustum: OrthoFrustum,
    center: [f32; 2],
    half_extents: [f32; 2],
    /// Column-major orthographic projection matrix.
    projection: [f32; 16],
}

/// Entry point for the Find Gold command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Action::Render => {
            let world = start_world(config, cli.level)?;
            let snapshot = query::maze_snapshot(&world);
            print!(
                "{}",
                render::render_ascii(
                    snapshot,
                    query::secondary_items(&world),
                    Some(query::current_cell(&world)),
                )
            );
            println!(
                "level {} | exit {:?} | gold {} | nearest gold {}",
                query::level(&world),
                snapshot.exit(),
                snapshot.gold().len(),
                query::nearest_gold_distance(&world)
                    .map_or_else(|| "-".to_owned(), |distance| distance.to_string()),
            );
        }
        Action::Autoplay { levels } => {
            let mut world = start_world(config, cli.level)?;
            for report in autoplay::autoplay(&mut world, levels)? {
                println!("{}", serde_json::to_string(&report)?);
            }
        }
        Action::Frustum { aspect, zoom } => {
            let (cols, rows) = (config.columns as f32, config.rows as f32);
            let frustum = compute_frustum(cols, rows, aspect, zoom);
            let report = FrustumReport {
                frustum,
                center: maze_center(cols, rows).to_array(),
                half_extents: frustum.half_extents().to_array(),
                projection: frustum.projection(CAMERA_NEAR, CAMERA_FAR).to_cols_array(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Action::Export => {
            let world = start_world(config, cli.level)?;
            let code = snapshot_transfer::encode(query::maze_snapshot(&world))
                .context("failed to encode maze")?;
            println!("{code}");
        }
        Action::Import { code } => {
            let snapshot = snapshot_transfer::decode(&code).context("failed to decode maze")?;
            info!(
                columns = snapshot.columns(),
                rows = snapshot.rows(),
                "imported maze"
            );
            print!("{}", render::render_ascii(&snapshot, &[], None));
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_config(cli: &Cli) -> Result<WorldConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => WorldConfig::default(),
    };

    if let Some(columns) = cli.columns {
        config.columns = columns;
    }
    if let Some(rows) = cli.rows {
        config.rows = rows;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn start_world(config: WorldConfig, level: u32) -> Result<World> {
    let mut world = World::with_config(config)?;
    let mut events = Vec::new();
    apply(&mut world, WorldCommand::StartLevel { level }, &mut events);
    Ok(world)
}
