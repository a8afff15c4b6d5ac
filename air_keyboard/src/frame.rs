//! Video frame buffer and the drawing primitives the overlay is built from.
//!
//! Pixels are packed `0xAARRGGBB` words in row-major order, the layout
//! `minifb` presents directly.  All drawing clips silently at the frame edge,
//! so callers may pass coordinates partly (or entirely) off-screen.

use crate::font::{self, ADVANCE, GLYPH_H, GLYPH_W};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width:  usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Frame {
    pub fn new(width: usize, height: usize, fill: u32) -> Self {
        Frame { width, height, pixels: vec![fill; width * height] }
    }

    /// Build a frame from packed 8-bit RGB.  Returns `None` if `rgb` is not
    /// exactly `width * height * 3` bytes.
    pub fn from_rgb(width: usize, height: usize, rgb: &[u8]) -> Option<Self> {
        if rgb.len() != width * height * 3 {
            return None;
        }
        let pixels = rgb.chunks_exact(3)
            .map(|p| 0xFF000000 | (p[0] as u32) << 16 | (p[1] as u32) << 8 | p[2] as u32)
            .collect();
        Some(Frame { width, height, pixels })
    }

    /// Packed 8-bit RGB copy of the frame.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for &p in &self.pixels {
            out.extend_from_slice(&[(p >> 16) as u8, (p >> 8) as u8, p as u8]);
        }
        out
    }

    pub fn width(&self)    -> usize  { self.width }
    pub fn height(&self)   -> usize  { self.height }
    pub fn pixels(&self)   -> &[u32] { &self.pixels }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Flip left/right in place.
    pub fn mirror_horizontal(&mut self) {
        if self.width == 0 {
            return;
        }
        for row in self.pixels.chunks_exact_mut(self.width) {
            row.reverse();
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        for row in y0..y1 {
            let base = row as usize * self.width;
            for col in x0..x1 {
                self.pixels[base + col as usize] = color;
            }
        }
    }

    /// Blend every pixel of the rectangle toward `color` by `t` (0.0–1.0).
    pub fn blend_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32, t: f32) {
        for row in y.max(0)..(y + h).min(self.height as i32) {
            for col in x.max(0)..(x + w).min(self.width as i32) {
                let i = row as usize * self.width + col as usize;
                self.pixels[i] = blend(self.pixels[i], color, t);
            }
        }
    }

    /// Rectangle outline `thickness` pixels wide, drawn inside the rectangle.
    pub fn draw_border(&mut self, x: i32, y: i32, w: i32, h: i32, thickness: i32, color: u32) {
        let t = thickness.min(w / 2).min(h / 2).max(1);
        self.fill_rect(x,         y,         w, t, color);
        self.fill_rect(x,         y + h - t, w, t, color);
        self.fill_rect(x,         y,         t, h, color);
        self.fill_rect(x + w - t, y,         t, h, color);
    }

    pub fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Circle outline with outer radius `r`.
    pub fn draw_ring(&mut self, cx: i32, cy: i32, r: i32, thickness: i32, color: u32) {
        let inner = (r - thickness).max(0);
        for dy in -r..=r {
            for dx in -r..=r {
                let d2 = dx * dx + dy * dy;
                if d2 <= r * r && d2 > inner * inner {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Bresenham line, endpoints included.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    /// Draw text with the 3×5 bitmap font, each font pixel `scale`×`scale`.
    /// `(x, y)` is the top-left corner of the first glyph.
    pub fn draw_label(&mut self, text: &str, x: i32, y: i32, scale: i32, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = font::glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH_W {
                    if bits & (1 << (GLYPH_W - 1 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row as i32 * scale, scale, scale, color);
                    }
                }
            }
            cx += ADVANCE * scale;
            if cx >= self.width as i32 { break; }
        }
    }
}

/// Pixel size of `text` drawn at `scale`.
pub fn label_size(text: &str, scale: i32) -> (i32, i32) {
    let n = text.chars().count() as i32;
    let w = if n == 0 { 0 } else { (n * ADVANCE - (ADVANCE - GLYPH_W)) * scale };
    (w, GLYPH_H * scale)
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
pub fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t).round() as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
