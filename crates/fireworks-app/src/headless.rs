//! Windowless runs against an in-memory frame, stopped by a timer thread.

use std::thread;
use std::time::Duration;

use fireworks_core::{Runner, ShowConfig, StopSignal};
use fireworks_platform::{Result, SystemClock};
use tracing::info;

use crate::raster::FrameSurface;

pub fn run(config: ShowConfig, duration: Duration) -> Result<()> {
    let stop = StopSignal::new();
    let timer = {
        let stop = stop.clone();
        thread::spawn(move || {
            thread::sleep(duration);
            stop.raise();
        })
    };

    let background = config.background;
    let surface = FrameSurface::new(config.viewport.width, config.viewport.height);
    info!("headless run for {duration:?}");
    let mut runner = Runner::new(config, surface, SystemClock::new(), stop);
    let ticks = runner.run();
    timer.join().map_err(|_| "stop timer panicked")?;

    let stats = runner.show().stats();
    info!(
        ticks,
        frames = runner.surface().presented(),
        lit_pixels = runner.surface().lit_pixels(background),
        launched = stats.launched,
        shells = stats.shells,
        particles = stats.particles,
        "headless run finished"
    );
    Ok(())
}
