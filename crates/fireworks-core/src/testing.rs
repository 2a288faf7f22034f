//! Test doubles for the platform boundary.

use std::time::Duration;

use fireworks_platform::{Clock, Rect, Rgb, Surface};
use glam::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Rgb),
    Circle { center: Vec2, radius: f32, color: Rgb },
    Rect { rect: Rect, color: Rgb, alpha: u8 },
    Present,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Rgb) {
        self.calls.push(DrawCall::Clear(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_rect_alpha(&mut self, rect: Rect, color: Rgb, alpha: u8) {
        self.calls.push(DrawCall::Rect { rect, color, alpha });
    }

    fn present(&mut self) -> fireworks_platform::Result<()> {
        self.calls.push(DrawCall::Present);
        Ok(())
    }
}

/// Simulated time: waiting jumps straight to the deadline.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn wait_until(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}
