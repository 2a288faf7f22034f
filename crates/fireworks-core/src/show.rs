use std::time::Duration;

use fireworks_platform::Surface;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::ShowConfig;
use crate::launcher::Launcher;
use crate::shell::BurstContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShowStats {
    pub launchers: usize,
    pub shells: usize,
    pub particles: usize,
    /// Shells fired since the show started.
    pub launched: u64,
}

/// Owns every launcher plus the single random source they draw from.
pub struct Show {
    config: ShowConfig,
    launchers: Vec<Launcher>,
    rng: StdRng,
}

impl Show {
    pub fn new(config: ShowConfig, now: Duration) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let pad_y = config.viewport.height as f32 - config.pad.height;
        let launchers: Vec<Launcher> = config
            .launchers
            .iter()
            .map(|l| Launcher::new(Vec2::new(l.x as f32, pad_y), config.pad, l.period(), now))
            .collect();
        info!(
            "show ready: {}x{} @ {} Hz, {} launchers, seed {:?}",
            config.viewport.width,
            config.viewport.height,
            config.tick_rate,
            launchers.len(),
            config.seed
        );
        Self {
            config,
            launchers,
            rng,
        }
    }

    pub fn launchers(&self) -> &[Launcher] {
        &self.launchers
    }

    /// Updates every launcher in order against the same timestamp.
    pub fn update(&mut self, now: Duration) {
        let config = &self.config;
        let ctx = BurstContext {
            burst: &config.burst,
            particle: &config.particle,
            palette: &config.palette,
        };
        let bounds = config.viewport.size();
        for launcher in &mut self.launchers {
            launcher.update(now, bounds, &config.shell, &ctx, &mut self.rng);
        }
    }

    /// Clears to the background and draws every launcher. Presenting is left
    /// to the caller.
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.clear(self.config.background);
        for launcher in &self.launchers {
            launcher.render(surface);
        }
    }

    pub fn stats(&self) -> ShowStats {
        let mut stats = ShowStats {
            launchers: self.launchers.len(),
            ..ShowStats::default()
        };
        for launcher in &self.launchers {
            stats.launched += launcher.launched();
            stats.shells += launcher.shells().len();
            stats.particles += launcher
                .shells()
                .iter()
                .map(|s| s.particles().len())
                .sum::<usize>();
        }
        stats
    }
}
