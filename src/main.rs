use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::viewer::ViewerOptions;

mod camera;
mod config;
mod config_watcher;
mod engine;
mod equipment;
mod geometry;
mod rendering;
mod scene_graph;
mod ui;
mod viewer;
mod window;

/// Animated 3D view of conveyor belts and rotary tables.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// JSON layout to load instead of the built-in one
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not reload the layout file when it changes
    #[arg(long)]
    no_watch: bool,
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = Args::parse();
    let options = ViewerOptions {
        config_path: args.config,
        watch: !args.no_watch,
    };

    pollster::block_on(window::run(options))?;

    Ok(())
}
