//! Headless capture: run the session at a fixed tick rate and read back the last frame

use crate::session::Session;
use anyhow::{Context, Result};
use gasket_animation::{Clock, ManualClock};
use gasket_render::HeadlessRenderer;

pub struct CaptureOptions {
    pub width: u32,
    pub height: u32,
    pub ticks: u32,
    /// Simulated frames per second
    pub tick_rate: f64,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            ticks: 120,
            tick_rate: 60.0,
        }
    }
}

/// Start the sequence, advance `ticks` frames of simulated time and return the final image
pub fn capture_frames(session: &mut Session, options: &CaptureOptions) -> Result<image::RgbaImage> {
    let mut renderer = pollster::block_on(HeadlessRenderer::new(options.width, options.height))
        .context("Failed to create headless renderer")?;
    let mut clock = ManualClock::new();
    let step = 1.0 / options.tick_rate.max(1.0);

    session.start();
    renderer.sync_geometry(session.geometry());
    // Always draw at least one frame so the image is never empty
    for _ in 0..options.ticks.max(1) {
        clock.advance(step);
        session.tick_and_render(clock.now(), &mut renderer);
        renderer.sync_geometry(session.geometry());
    }
    log::info!(
        "Captured after {} frames ({})",
        renderer.frames(),
        session.status_line()
    );

    renderer.capture().context("Failed to read rendered pixels")
}
