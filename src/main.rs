mod colors;
mod config;
mod control;
mod error;
mod gradient;
mod normalizer;
mod output;
mod params;
mod pixels;
mod regions;
mod render;
mod scene;
mod settings;
mod sphere;
mod terminal;
mod viz;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use config::{AnimationKind, Overrides, RunConfig};
use output::preview::PreviewSink;
use output::serial::SerialSink;
use output::spawn_output;
use params::{ParamStore, BRIGHTNESS_VAR};
use pixels::{row_latitude, PixelMap, COLUMN_COUNT, ROW_COUNT, SLOT_COUNT};
use render::Renderer;
use scene::Scene;
use settings::Settings;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ledglobe")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.1.0")]
#[command(about = "Procedural animations for a spherical LED display", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an animation to the globe (or the terminal with --preview)
    Run {
        /// Animation: simplex, movers, bubbles, gradient-test, brightness-test, test-pattern
        #[arg(short, long)]
        animation: Option<String>,

        /// Draw frames in the terminal instead of the serial device
        #[arg(long)]
        preview: bool,

        /// Serial device (auto-detected by USB id when omitted)
        #[arg(short, long)]
        port: Option<PathBuf>,

        /// Initial brightness (0.0-1.0)
        #[arg(short, long)]
        brightness: Option<f64>,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Control surface address
        #[arg(long)]
        bind: Option<String>,

        /// Do not start the HTTP control surface
        #[arg(long)]
        no_control: bool,

        /// Target frames per second (0 = as fast as the device accepts)
        #[arg(short, long)]
        fps: Option<f64>,
    },

    /// List the available animations
    List,

    /// Print the pixel geometry table summary
    Geometry,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            animation,
            preview,
            port,
            brightness,
            seed,
            bind,
            no_control,
            fps,
        } => {
            init_tracing(preview);
            let settings = Settings::load();
            let overrides = Overrides {
                animation,
                preview,
                port,
                brightness,
                seed,
                fps,
                bind,
                no_control,
            };
            run(RunConfig::resolve(&settings, overrides))?;
        }
        Commands::List => {
            for kind in AnimationKind::ALL {
                println!("{:<16} {}", kind.name(), kind.description());
            }
        }
        Commands::Geometry => {
            let pixels = PixelMap::load().context("loading pixel geometry")?;
            println!("slots:  {} ({} rows x {} columns)", SLOT_COUNT, ROW_COUNT, COLUMN_COUNT);
            println!("active: {}", pixels.active_len());
            let per_column: Vec<usize> = (0..COLUMN_COUNT).map(|c| pixels.column(c).count()).collect();
            let fewest = per_column.iter().min().copied().unwrap_or(0);
            let most = per_column.iter().max().copied().unwrap_or(0);
            println!("column: {} to {} leds", fewest, most);
            for row in 0..ROW_COUNT {
                println!("row {:>2}: {:>2} leds at {:>7.2}°", row, pixels.row(row).count(), row_latitude(row));
            }
        }
    }

    Ok(())
}

/// Log to stderr, filtered by RUST_LOG. The preview owns the terminal, so it
/// only gets warnings unless asked for more.
fn init_tracing(preview: bool) {
    let default = if preview { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(config: RunConfig) -> anyhow::Result<()> {
    let pixels = PixelMap::load().context("loading pixel geometry")?;
    let enabled: Vec<bool> = pixels.all().iter().map(|p| p.enabled).collect();
    let mut scene = Scene::new(pixels, config.seed);

    let params = ParamStore::new();
    params.set_var(BRIGHTNESS_VAR, config.brightness);
    let animation = viz::build(config.animation, &mut scene, &params);
    info!(animation = animation.name(), seed = ?config.seed, "animation ready");

    if let Some(bind) = &config.control {
        if let Err(e) = control::spawn(params.clone(), bind.clone()) {
            warn!(error = %e, "control surface not started");
        }
    }

    let (frames, output) = if config.preview {
        let sink = PreviewSink::new(enabled).context("starting terminal preview")?;
        spawn_output(sink)
    } else {
        spawn_output(SerialSink::new(config.serial.clone()))
    }
    .context("starting output thread")?;

    let mut renderer = Renderer::new(scene, animation, params, frames);
    renderer.run(config.fps);
    info!(frames = renderer.frame(), "render loop finished");
    drop(renderer);

    output.join().map_err(|_| anyhow!("output thread panicked"))
}
