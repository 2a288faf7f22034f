use fireworks_platform::{Rect, Rgb, Surface};
use glam::Vec2;

/// A single fading debris point. Opacity only ever decreases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgb,
    opacity: u8,
    fade_step: u8,
    size: Vec2,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, color: Rgb, fade_step: u8, size: Vec2) -> Self {
        Self {
            pos,
            vel,
            color,
            opacity: u8::MAX,
            fade_step,
            size,
        }
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    /// One tick of constant-velocity motion and linear fade.
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.opacity = self.opacity.saturating_sub(self.fade_step);
    }

    /// Outside `[0, width) x [0, height)`.
    pub fn is_offscreen(&self, width: f32, height: f32) -> bool {
        self.pos.x < 0.0 || self.pos.x >= width || self.pos.y < 0.0 || self.pos.y >= height
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        let rect = Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y);
        surface.fill_rect_alpha(rect, self.color, self.opacity);
    }
}
