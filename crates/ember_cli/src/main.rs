mod cli;
mod logger;
mod scenes;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use ember_renderer::{render, save_image, RenderConfig};
use std::path::Path;

fn load_config(path: Option<&Path>) -> Result<RenderConfig> {
    let Some(path) = path else {
        return Ok(RenderConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_logger(args.log_level.into());

    let config = args.apply_overrides(load_config(args.config.as_deref())?);
    config.validate().context("Invalid render configuration")?;

    log::info!(
        "Rendering {:?} at {}x{}, {} spp, depth {}, {} workers, seed {}",
        args.scene,
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        config.workers,
        config.seed
    );

    let scene = scenes::build_scene(args.scene, &config, &args.texture_dir)
        .context("Failed to build scene")?;
    let image = render(&scene, &config).context("Render failed")?;

    save_image(&image, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}
