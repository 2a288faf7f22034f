use std::path::Path;
use std::time::Duration;

use fireworks_core::ShowConfig;
use fireworks_platform::Result;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod headless;
mod raster;
mod window;

fn main() {
    // Init logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    info!("Fireworks starting");
    if let Err(e) = run() {
        error!("Fireworks error: {e}");
        eprintln!("Fireworks error: {e}");
        std::process::exit(1);
    }
}

/// `fireworks [config.toml|config.json]`
fn run() -> Result<()> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => ShowConfig::load(Path::new(&path))?,
        None => {
            info!("no config given, using the built-in show");
            ShowConfig::default()
        }
    };
    match config.headless_ms {
        Some(ms) => headless::run(config, Duration::from_millis(ms)),
        None => window::run_app(config),
    }
}
