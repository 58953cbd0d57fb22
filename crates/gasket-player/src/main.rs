//! Gasket Player - animated 3D Sierpinski gasket viewer
//!
//! Usage:
//!   gasket-player [--config <path>] [--sequence <path>] [--speed <f>] [--depth <n>]
//!   gasket-player --screenshot out.png [--ticks <n>] [--width <w>] [--height <h>]

use anyhow::{Context, Result};
use clap::Parser;
use gasket_animation::Sequence;
use gasket_core::GasketConfig;
use gasket_player::{capture_frames, CaptureOptions, GasketApp, Session, CONTROLS};
use std::path::PathBuf;
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser)]
#[command(name = "gasket-player")]
#[command(about = "Animated 3D Sierpinski gasket driven by an editable action sequence")]
#[command(version)]
struct Args {
    /// Config file applied on top of the global and project configs
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sequence file (TOML with an [[actions]] array)
    #[arg(long)]
    sequence: Option<PathBuf>,

    /// Animation speed factor
    #[arg(long)]
    speed: Option<f64>,

    /// Subdivision depth
    #[arg(long)]
    depth: Option<u32>,

    /// Recolor the faces on every bounce reflection
    #[arg(long)]
    random_colors: bool,

    /// Launch in fullscreen mode
    #[arg(long)]
    fullscreen: bool,

    /// Start the sequence immediately
    #[arg(long)]
    autostart: bool,

    /// Render headless and write the final frame to this PNG instead of opening a window
    #[arg(long)]
    screenshot: Option<PathBuf>,

    /// Ticks to simulate before a screenshot
    #[arg(long, default_value = "120")]
    ticks: u32,

    /// Screenshot width (defaults to the window width)
    #[arg(long)]
    width: Option<u32>,

    /// Screenshot height (defaults to the window height)
    #[arg(long)]
    height: Option<u32>,

    /// Seed for bounce headings and random colors
    #[arg(long)]
    seed: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter(None, log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let mut config =
        GasketConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    apply_args(&mut config, &args);
    config.validate().context("Invalid configuration")?;

    let sequence = match args.sequence.as_ref().or(config.sequence_file.as_ref()) {
        Some(path) => Sequence::load_from_file(path)
            .with_context(|| format!("Failed to load sequence {}", path.display()))?,
        None => Sequence::with_defaults(),
    };

    let mut session = Session::new(config.clone(), sequence, args.seed);

    if let Some(output) = &args.screenshot {
        let options = CaptureOptions {
            width: args.width.unwrap_or(config.window.width),
            height: args.height.unwrap_or(config.window.height),
            ticks: args.ticks,
            ..CaptureOptions::default()
        };
        let image = capture_frames(&mut session, &options)?;
        image
            .save(output)
            .with_context(|| format!("Failed to save image to {}", output.display()))?;
        println!(
            "Rendered {}x{} image to {}",
            options.width,
            options.height,
            output.display()
        );
        return Ok(());
    }

    println!(
        "Speed {:.1}, depth {}, {} actions",
        config.speed_factor,
        config.subdivision_depth,
        session.sequence().len()
    );
    println!();
    println!("Controls:");
    for (key, description) in CONTROLS {
        println!("  {:<10} - {}", key, description);
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GasketApp::new(session, config.window, args.autostart);
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.take_error() {
        return Err(e);
    }
    Ok(())
}

/// Command-line flags override every config layer
fn apply_args(config: &mut GasketConfig, args: &Args) {
    if let Some(speed) = args.speed {
        config.speed_factor = speed;
    }
    if let Some(depth) = args.depth {
        config.subdivision_depth = depth;
    }
    if args.random_colors {
        config.random_colors = true;
    }
    if args.fullscreen {
        config.window.fullscreen = true;
    }
}
