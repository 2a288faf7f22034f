use std::time::Duration;

use fireworks_platform::{Rect, Rgb, Surface};
use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::config::{PadConfig, ShellConfig};
use crate::shell::{BurstContext, Shell};

/// A fixed pad that fires one shell per elapsed period.
#[derive(Debug, Clone, PartialEq)]
pub struct Launcher {
    pub pos: Vec2,
    pad: PadConfig,
    period: Duration,
    last_emission: Duration,
    shells: Vec<Shell>,
    launched: u64,
}

impl Launcher {
    /// `now` starts the emission timer; the first shell fires one period later.
    pub fn new(pos: Vec2, pad: PadConfig, period: Duration, now: Duration) -> Self {
        Self {
            pos,
            pad,
            period,
            last_emission: now,
            shells: Vec::new(),
            launched: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn shells(&self) -> &[Shell] {
        &self.shells
    }

    /// Total shells fired since creation.
    pub fn launched(&self) -> u64 {
        self.launched
    }

    /// Advances one tick. Returns whether a shell was fired.
    ///
    /// The spawn check runs before the shell pass, so a fresh shell moves on
    /// the tick it is fired. Spent shells are dropped afterwards.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        now: Duration,
        bounds: Vec2,
        shell: &ShellConfig,
        ctx: &BurstContext<'_>,
        rng: &mut R,
    ) -> bool {
        let fired = now.saturating_sub(self.last_emission) >= self.period;
        if fired {
            self.last_emission = now;
            self.launch(shell, ctx.palette, rng);
        }

        for s in &mut self.shells {
            s.update(bounds, ctx, rng);
        }
        self.shells.retain(|s| !s.is_spent());
        fired
    }

    fn launch<R: Rng + ?Sized>(&mut self, config: &ShellConfig, palette: &[Rgb], rng: &mut R) {
        let color = palette.choose(rng).copied().unwrap_or(Rgb::WHITE);
        let explode_height =
            rng.gen_range(config.explode_height_min..config.explode_height_max) as f32;
        let origin = Vec2::new(self.pos.x + self.pad.width / 2.0, self.pos.y);
        self.shells.push(Shell::new(
            origin,
            -config.ascent_speed,
            explode_height,
            color,
            config.radius,
        ));
        self.launched += 1;
        debug!(
            x = origin.x,
            explode_height,
            shells = self.shells.len(),
            "shell launched"
        );
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        let pad = Rect::new(self.pos.x, self.pos.y, self.pad.width, self.pad.height);
        surface.fill_rect_alpha(pad, self.pad.color, u8::MAX);
        for shell in &self.shells {
            shell.render(surface);
        }
    }
}
