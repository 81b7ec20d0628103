//! Rubik'scape CLI - inspect levels, replay rotations and walk the avatar

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use avatar::Navigator;
use clap::{Parser, Subcommand};
use rubik::{DragGesture, FacePainter, Grid, Level, SliceRotator};
use rubikscape::{
    build_course, load_level, parse_choices, parse_moves, parse_swipes, run_moves, run_swipes,
    walk, RubikscapeConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Rubik'scape - headless level runner
#[derive(Parser)]
#[command(name = "rubikscape")]
#[command(about = "Inspect, rotate and walk Rubik'scape levels", long_about = None)]
struct Cli {
    /// Config file (TOML); defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "rubik=debug" (overrides RUST_LOG)
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a level summary and its painted tile counts
    Inspect {
        /// Level JSON file (bare level or service envelope)
        level: PathBuf,

        /// Level id when the file holds several
        #[arg(long)]
        id: Option<String>,
    },

    /// Apply slice rotations and print the resulting grid as JSON
    Rotate {
        level: PathBuf,

        #[arg(long)]
        id: Option<String>,

        /// Moves such as "Y2+ X0-" (axis, slice index, + or -)
        #[arg(short, long, default_value = "")]
        moves: String,

        /// Drags applied after the moves, such as "1,0,-1>1,0.5,-1"
        #[arg(short, long, default_value = "")]
        swipes: String,
    },

    /// Walk the avatar over the level's course and print a report as JSON
    Walk {
        level: PathBuf,

        #[arg(long)]
        id: Option<String>,

        /// Junction choices in order, F/R/B/L
        #[arg(long, default_value = "")]
        choices: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match &cli.log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = RubikscapeConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { level, id } => inspect_command(&config, &level, id.as_deref()),
        Commands::Rotate {
            level,
            id,
            moves,
            swipes,
        } => rotate_command(&config, &level, id.as_deref(), &moves, &swipes),
        Commands::Walk { level, id, choices } => {
            walk_command(&config, &level, id.as_deref(), &choices)
        }
    }
}

fn build_grid(config: &RubikscapeConfig, level: &Level) -> anyhow::Result<Grid> {
    level
        .build_grid(config.grid.origin(), config.grid.spacing)
        .with_context(|| format!("building grid for level {}", level.id))
}

fn inspect_command(config: &RubikscapeConfig, path: &Path, id: Option<&str>) -> anyhow::Result<()> {
    let level = load_level(path, id)?;
    let grid = build_grid(config, &level)?;
    let painter = FacePainter::new(config.tiles.variant_count)?;
    let placements = painter.paint(&grid, &level);

    let mut per_variant: BTreeMap<usize, usize> = BTreeMap::new();
    for placement in &placements {
        *per_variant.entry(placement.variant).or_default() += 1;
    }

    println!("Level {} - {}", level.id, level.name);
    println!("Cube size: {0}x{0}x{0} ({1} cells)", grid.size(), grid.len());
    println!("Exterior faces: {}", grid.exterior_tiles().len());
    println!("Painted faces: {}", placements.len());
    for (variant, count) in per_variant {
        println!("  variant {variant}: {count}");
    }
    Ok(())
}

fn rotate_command(
    config: &RubikscapeConfig,
    path: &Path,
    id: Option<&str>,
    moves: &str,
    swipes: &str,
) -> anyhow::Result<()> {
    let level = load_level(path, id)?;
    let moves = parse_moves(moves)?;
    let swipes = parse_swipes(swipes)?;
    let mut grid = build_grid(config, &level)?;
    let mut rotator = SliceRotator::new(config.rotator_config());
    let mut gesture = DragGesture::new(config.drag_config());

    let mut ticks = run_moves(&mut grid, &mut rotator, &moves, &config.simulation)?;
    ticks += run_swipes(
        &mut grid,
        &mut rotator,
        &mut gesture,
        &swipes,
        &config.simulation,
    )?;
    info!(ticks, "Grid verified");
    println!("{}", serde_json::to_string_pretty(&grid.snapshot())?);
    Ok(())
}

fn walk_command(
    config: &RubikscapeConfig,
    path: &Path,
    id: Option<&str>,
    choices: &str,
) -> anyhow::Result<()> {
    let level = load_level(path, id)?;
    let choices = parse_choices(choices)?;
    let grid = build_grid(config, &level)?;
    let painter = FacePainter::new(config.tiles.variant_count)?;
    let placements = painter.paint(&grid, &level);

    let layout = build_course(&grid.exterior_tiles(), &placements, &config.tiles)?;
    let Some((position, rotation)) = layout.start else {
        anyhow::bail!("level {} has no start tile", level.id);
    };
    let mut course = layout.course;
    let mut navigator = Navigator::new(config.navigator_config())?;
    navigator.spawn(position, rotation);

    let report = walk(&mut navigator, &mut course, &choices, &config.simulation);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
