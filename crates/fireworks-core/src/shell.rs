//! Rising shells and their burst patterns.

use std::f32::consts::{FRAC_PI_4, TAU};

use fireworks_platform::{Rgb, Surface};
use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::config::{BurstConfig, ParticleConfig, PatternMode};
use crate::particle::Particle;

/// Star bursts always emit this many particles, in `STAR_TIERS` speed tiers.
pub const STAR_POINTS: u32 = 64;
pub const STAR_TIERS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Radial,
    Star,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Ascending,
    Bursting,
    /// Exploded and every particle has left the screen.
    Spent,
}

/// Everything a shell needs to generate its burst.
#[derive(Debug, Clone, Copy)]
pub struct BurstContext<'a> {
    pub burst: &'a BurstConfig,
    pub particle: &'a ParticleConfig,
    pub palette: &'a [Rgb],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shell {
    pub pos: Vec2,
    /// Per-tick vertical velocity, negative is upward.
    pub vel_y: f32,
    pub explode_height: f32,
    pub color: Rgb,
    pub radius: f32,
    exploded: bool,
    pattern: Option<Pattern>,
    particles: Vec<Particle>,
}

impl Shell {
    pub fn new(pos: Vec2, vel_y: f32, explode_height: f32, color: Rgb, radius: f32) -> Self {
        Self {
            pos,
            vel_y,
            explode_height,
            color,
            radius,
            exploded: false,
            pattern: None,
            particles: Vec::new(),
        }
    }

    pub fn is_exploded(&self) -> bool {
        self.exploded
    }

    /// The pattern chosen at explosion time.
    pub fn pattern(&self) -> Option<Pattern> {
        self.pattern
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn state(&self) -> ShellState {
        match (self.exploded, self.particles.is_empty()) {
            (false, _) => ShellState::Ascending,
            (true, false) => ShellState::Bursting,
            (true, true) => ShellState::Spent,
        }
    }

    pub fn is_spent(&self) -> bool {
        self.state() == ShellState::Spent
    }

    pub fn update<R: Rng + ?Sized>(&mut self, bounds: Vec2, ctx: &BurstContext<'_>, rng: &mut R) {
        if !self.exploded {
            self.pos.y += self.vel_y;
            if self.pos.y <= self.explode_height {
                self.explode(ctx, rng);
            }
        }

        for particle in &mut self.particles {
            particle.update();
        }
        self.particles
            .retain(|p| !p.is_offscreen(bounds.x, bounds.y));
    }

    fn explode<R: Rng + ?Sized>(&mut self, ctx: &BurstContext<'_>, rng: &mut R) {
        debug_assert!(!self.exploded, "a shell explodes once");
        self.exploded = true;

        let burst = ctx.burst;
        let count = rng.gen_range(burst.min_particles..=burst.max_particles);
        let pattern = match burst.pattern {
            PatternMode::Radial => Pattern::Radial,
            PatternMode::Star => Pattern::Star,
            PatternMode::Random => {
                if rng.gen_bool(0.5) {
                    Pattern::Star
                } else {
                    Pattern::Radial
                }
            }
        };
        match pattern {
            Pattern::Radial => self.radial_burst(count, ctx, rng),
            Pattern::Star => self.star_burst(ctx, rng),
        }
        self.pattern = Some(pattern);
        debug!(
            x = self.pos.x,
            y = self.pos.y,
            ?pattern,
            particles = self.particles.len(),
            "shell exploded"
        );
    }

    /// `count` particles evenly spaced on a circle, sharing one jittered speed.
    fn radial_burst<R: Rng + ?Sized>(&mut self, count: u32, ctx: &BurstContext<'_>, rng: &mut R) {
        let burst = ctx.burst;
        debug_assert!(
            (burst.min_particles..=burst.max_particles).contains(&count),
            "radial count {count} outside configured range"
        );
        let speed = rng.gen_range(
            burst.base_speed - burst.speed_jitter..=burst.base_speed + burst.speed_jitter,
        ) as f32;
        let step = TAU / count as f32;
        self.particles.reserve(count as usize);
        for i in 0..count {
            let angle = step * i as f32;
            self.push_particle(angle, speed, ctx, rng);
        }
    }

    /// Eight rays of eight particles, each ray stepping through eight speed tiers.
    fn star_burst<R: Rng + ?Sized>(&mut self, ctx: &BurstContext<'_>, rng: &mut R) {
        let base = ctx.burst.base_speed as f32;
        let per_tier = STAR_POINTS / STAR_TIERS;
        let mut angle = 0.0_f32;
        self.particles.reserve(STAR_POINTS as usize);
        for i in 1..=STAR_POINTS {
            let speed = base + (i % per_tier) as f32;
            self.push_particle(angle, speed, ctx, rng);
            if i % per_tier == 0 {
                angle += FRAC_PI_4;
            }
            angle += FRAC_PI_4;
        }
    }

    fn push_particle<R: Rng + ?Sized>(
        &mut self,
        angle: f32,
        speed: f32,
        ctx: &BurstContext<'_>,
        rng: &mut R,
    ) {
        let vel = Vec2::new(angle.sin(), angle.cos()) * speed;
        let color = ctx.palette.choose(rng).copied().unwrap_or(self.color);
        self.particles.push(Particle::new(
            self.pos,
            vel,
            color,
            ctx.particle.fade_step,
            ctx.particle.size(),
        ));
    }

    /// Body first while ascending, debris on top.
    pub fn render(&self, surface: &mut dyn Surface) {
        if !self.exploded {
            surface.fill_circle(self.pos, self.radius, self.color);
        }
        for particle in &self.particles {
            particle.render(surface);
        }
    }
}
