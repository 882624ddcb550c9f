use clap::{Parser, ValueEnum};
use ember_renderer::RenderConfig;
use log::LevelFilter;
use std::path::PathBuf;

/// Log levels selectable from the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Built-in demo scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Field of small random spheres with motion blur over a checker ground
    RandomSpheres,
    /// Diffuse, metal and hollow glass spheres side by side
    Materials,
    /// Two large checker-textured spheres
    CheckerSpheres,
    /// Marble Perlin noise on a ground sphere and a ball
    PerlinSpheres,
    /// Turbulent Perlin noise on a ground sphere and a ball
    TurbulentSpheres,
    /// Wave, tinted noise and gradient noise textures
    Textures,
    /// Image-textured globe
    Earth,
    /// Three colored lights around metal and glass balls
    LightTest,
    /// Cornell box with two blocks
    CornellBox,
    /// Cornell box with the blocks replaced by smoke and fog
    CornellSmoke,
    /// Triangle pyramid under an area light
    Triangles,
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "ember")]
#[command(about = "Offline Monte Carlo path tracer")]
pub struct Args {
    /// JSON render configuration; explicit flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Scene to render
    #[arg(long, value_enum, default_value = "random-spheres")]
    pub scene: SceneKind,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum bounce depth (0 renders black)
    #[arg(long)]
    pub depth: Option<u32>,

    /// Worker threads (one tile each)
    #[arg(long, short = 'j')]
    pub workers: Option<usize>,

    /// Render seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file path (.ppm for plain PPM, anything else through the image encoders)
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// Directory that image textures are resolved against
    #[arg(long, default_value = "assets")]
    pub texture_dir: PathBuf,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Apply the explicit flags on top of `config`.
    pub fn apply_overrides(&self, mut config: RenderConfig) -> RenderConfig {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(samples) = self.samples {
            config.samples_per_pixel = samples;
        }
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config
    }
}
