mod app;
mod engine;
mod util;
mod world;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Alternative world dataset (JSON); defaults to the embedded world.
    #[arg(long)]
    world: Option<PathBuf>,
    /// Initial grouping (ecosystem, domain, tech, status).
    #[arg(long, default_value = world::DEFAULT_GROUPING)]
    grouping: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let graph = match &args.world {
        Some(path) => world::load_world(path)?,
        None => world::builtin_world()?,
    };
    log::info!(
        "world loaded: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    let grouping = args.grouping.clone();
    eframe::run_native(
        "pteraworld",
        options,
        Box::new(move |cc| Ok(Box::new(app::PteraworldApp::new(cc, graph, &grouping)))),
    )
    .map_err(|error| anyhow!("failed to start UI: {error}"))
    .context("pteraworld exited abnormally")
}
