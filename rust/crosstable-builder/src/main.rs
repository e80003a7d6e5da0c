use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crosstable_builder::input::{load_game_graph, load_level_graph};
use crosstable_core::{build_cross_table, write_cross_table, LogProgress};

const LEVEL_GRAPH_NAME: &str = "level_graph.json";
const GAME_GRAPH_NAME: &str = "game_graph.json";
const CROSS_TABLE_NAME: &str = "level.gct";

#[derive(Parser, Debug)]
#[command(name = "crosstable-builder", version, about = "Build the nearest-waypoint cross table for a level")]
struct Args {
    /// Project directory holding level_graph.json and game_graph.json
    #[arg(long = "project", value_name = "DIR")]
    project: PathBuf,

    /// Output artifact path (defaults to <project>/level.gct)
    #[arg(long = "out", value_name = "PATH")]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_ansi(false).json().finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let args = Args::parse();
    info!(?args, "starting cross table build");

    info!(phase = "loading level graph", "phase");
    let level = load_level_graph(&args.project.join(LEVEL_GRAPH_NAME))?;

    info!(phase = "loading game graph", "phase");
    let waypoints = load_game_graph(&args.project.join(GAME_GRAPH_NAME))?;

    let mut progress = LogProgress::new();
    let out = build_cross_table(&level, &waypoints, &mut progress)
        .context("building cross table")?;
    if !out.conflicts.is_empty() {
        // Each conflict was already logged with full context by the
        // assembly pass.
        warn!(count = out.conflicts.len(), "anchor conflicts were auto-corrected");
    }

    let path = args
        .out
        .unwrap_or_else(|| args.project.join(CROSS_TABLE_NAME));
    info!(phase = "saving cross table", "phase");
    write_cross_table(&path, &out.header, &out.cells)
        .with_context(|| format!("writing cross table {path:?}"))?;
    info!(path = ?path, cells = out.cells.len(), "cross table written");

    Ok(())
}
