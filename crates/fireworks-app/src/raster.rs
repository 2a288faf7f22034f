//! Software rasteriser for the RGBA8 frames handed out by `pixels`.

use bytemuck::{Pod, Zeroable};
use fireworks_platform::{Rect, Result, Rgb, Surface};
use glam::Vec2;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub fn opaque(c: Rgb) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        }
    }

    fn blend(self, c: Rgb, alpha: u8) -> Self {
        let mix = |dst: u8, src: u8| -> u8 {
            let a = u32::from(alpha);
            ((u32::from(src) * a + u32::from(dst) * (255 - a) + 127) / 255) as u8
        };
        Self {
            r: mix(self.r, c.r),
            g: mix(self.g, c.g),
            b: mix(self.b, c.b),
            a: 255,
        }
    }
}

/// Borrowed view of a `width * height * 4` byte frame.
pub struct Canvas<'a> {
    pixels: &'a mut [Pixel],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        let pixels: &mut [Pixel] = bytemuck::cast_slice_mut(frame);
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            pixels,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(Pixel::opaque(color));
    }

    /// Clamps `[x0, x1) x [y0, y1)` to the frame.
    fn clip(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> (u32, u32, u32, u32) {
        let clamp_x = |v: f32| v.clamp(0.0, self.width as f32) as u32;
        let clamp_y = |v: f32| v.clamp(0.0, self.height as f32) as u32;
        (clamp_x(x0), clamp_y(y0), clamp_x(x1), clamp_y(y1))
    }

    /// Fills every pixel whose centre lies within `radius` of `center`.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        let (x0, y0, x1, y1) = self.clip(
            (center.x - radius).floor(),
            (center.y - radius).floor(),
            (center.x + radius).ceil() + 1.0,
            (center.y + radius).ceil() + 1.0,
        );
        let r2 = radius * radius;
        for y in y0..y1 {
            for x in x0..x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
                if d.length_squared() <= r2 {
                    self.pixels[(y * self.width + x) as usize] = Pixel::opaque(color);
                }
            }
        }
    }

    pub fn blend_rect(&mut self, rect: Rect, color: Rgb, alpha: u8) {
        if alpha == 0 {
            return;
        }
        let (x0, y0, x1, y1) = self.clip(
            rect.x.round(),
            rect.y.round(),
            (rect.x + rect.width).round(),
            (rect.y + rect.height).round(),
        );
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        for y in y0..y1 {
            let row = (y * self.width) as usize;
            for px in &mut self.pixels[row + x0 as usize..row + x1 as usize] {
                *px = px.blend(color, alpha);
            }
        }
    }
}

/// In-memory surface for headless runs.
pub struct FrameSurface {
    frame: Vec<u8>,
    width: u32,
    height: u32,
    presented: u64,
}

impl FrameSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: [0, 0, 0, 255].repeat((width * height) as usize),
            width,
            height,
            presented: 0,
        }
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }

    fn canvas(&mut self) -> Canvas<'_> {
        Canvas::new(&mut self.frame, self.width, self.height)
    }

    /// Pixels that differ from `background` in the last drawn frame.
    pub fn lit_pixels(&self, background: Rgb) -> usize {
        let bg = Pixel::opaque(background);
        bytemuck::cast_slice::<u8, Pixel>(&self.frame)
            .iter()
            .filter(|p| **p != bg)
            .count()
    }
}

impl Surface for FrameSurface {
    fn clear(&mut self, color: Rgb) {
        self.canvas().clear(color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        self.canvas().fill_circle(center, radius, color);
    }

    fn fill_rect_alpha(&mut self, rect: Rect, color: Rgb, alpha: u8) {
        self.canvas().blend_rect(rect, color, alpha);
    }

    fn present(&mut self) -> Result<()> {
        self.presented += 1;
        Ok(())
    }
}
