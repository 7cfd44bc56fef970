use crate::particle::FireworkType;
use crate::world::World;
use std::io::{self, Write};

const FADE_ALPHA: f32 = 0.15;
const KIKU_TRAIL_COLOR: (u8, u8, u8) = (255, 221, 153); // hsl(40, 100%, 80%)

// A particle grazing the camera plane projects to an absurd span; cap the
// brush and the segment walk so one particle cannot stall a frame.
const MAX_BRUSH_RADIUS: f32 = 24.0;
const MAX_SEGMENT_STEPS: i32 = 4096;
const MAX_COORD: f32 = 8192.0;

pub struct Renderer {
    width: usize,
    height: usize,
    bg: (u8, u8, u8),
    // Working canvas in f32 so repeated fades do not quantize to a halt
    frame: Vec<(f32, f32, f32)>,
    // Id of the primitive that last touched each pixel. One primitive adds
    // to a pixel at most once; distinct primitives accumulate.
    stamp: Vec<u32>,
    stamp_id: u32,
    output_buf: Vec<u8>,
}

impl Renderer {
    pub fn new(width: usize, height: usize, bg: (u8, u8, u8)) -> Self {
        Self {
            width,
            height,
            bg,
            frame: vec![(bg.0 as f32, bg.1 as f32, bg.2 as f32); width * height],
            stamp: vec![0; width * height],
            stamp_id: 0,
            output_buf: Vec::with_capacity(width * height * 25),
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.frame = vec![
            (self.bg.0 as f32, self.bg.1 as f32, self.bg.2 as f32);
            width * height
        ];
        self.stamp = vec![0; width * height];
        self.stamp_id = 0;
    }

    pub fn render<W: Write>(&mut self, world: &World, out: &mut W) -> io::Result<()> {
        self.fade();

        // Launchers draw as short strokes along their last step
        for fw in &world.fireworks {
            let p = &fw.launcher;
            let cur = world.projection.project(p.position);
            let alpha = (p.life as f32 / 80.0).min(1.0) * (cur.scale * 1.5).clamp(0.0, 1.0);
            if alpha <= 0.0 {
                continue;
            }
            let prev = world.projection.project(p.prev_position);
            self.stroke_segment(
                prev.x,
                prev.y,
                cur.x,
                cur.y,
                p.size * cur.scale,
                p.color,
                alpha,
            );
        }

        for p in &world.particles {
            let cur = world.projection.project(p.position);
            let alpha = (p.life as f32 / 80.0).min(1.0) * (cur.scale * 1.5).clamp(0.0, 1.0);
            if alpha <= 0.0 {
                continue;
            }

            // Fresh kiku fragments burn with the golden trail color first
            let color = match p.trail_life {
                Some(t) if t > 0 => KIKU_TRAIL_COLOR,
                _ => p.color,
            };

            if p.kind == FireworkType::Kiku {
                let prev = world.projection.project(p.prev_position);
                self.stroke_segment(
                    prev.x,
                    prev.y,
                    cur.x,
                    cur.y,
                    p.size * cur.scale,
                    color,
                    alpha,
                );
            } else {
                self.fill_dot(
                    cur.x,
                    cur.y,
                    p.size * cur.scale * 0.5,
                    color,
                    p.glow_color,
                    alpha,
                );
            }
        }

        self.emit(out)
    }

    // Pull every pixel toward the background, leaving trails behind movers
    fn fade(&mut self) {
        let bg = (self.bg.0 as f32, self.bg.1 as f32, self.bg.2 as f32);
        for px in &mut self.frame {
            px.0 += (bg.0 - px.0) * FADE_ALPHA;
            px.1 += (bg.1 - px.1) * FADE_ALPHA;
            px.2 += (bg.2 - px.2) * FADE_ALPHA;
        }
    }

    fn add_pixel(&mut self, x: i32, y: i32, color: (u8, u8, u8), alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if self.stamp[idx] == self.stamp_id {
            return;
        }
        self.stamp[idx] = self.stamp_id;

        let px = &mut self.frame[idx];
        px.0 = (px.0 + color.0 as f32 * alpha).min(255.0);
        px.1 = (px.1 + color.1 as f32 * alpha).min(255.0);
        px.2 = (px.2 + color.2 as f32 * alpha).min(255.0);
    }

    fn stamp_disc(&mut self, cx: i32, cy: i32, radius: f32, color: (u8, u8, u8), alpha: f32) {
        if radius <= 0.5 {
            self.add_pixel(cx, cy, color, alpha);
            return;
        }
        let r = radius.ceil() as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                if (dx * dx + dy * dy) as f32 <= radius * radius {
                    self.add_pixel(cx + dx, cy + dy, color, alpha);
                }
            }
        }
    }

    fn stroke_segment(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        width: f32,
        color: (u8, u8, u8),
        alpha: f32,
    ) {
        if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
            return;
        }
        self.stamp_id += 1;

        let radius = (width * 0.5).min(MAX_BRUSH_RADIUS);

        let x0 = x0.clamp(-MAX_COORD, MAX_COORD) as i32;
        let y0 = y0.clamp(-MAX_COORD, MAX_COORD) as i32;
        let x1 = x1.clamp(-MAX_COORD, MAX_COORD) as i32;
        let y1 = y1.clamp(-MAX_COORD, MAX_COORD) as i32;

        // Both endpoints off the same edge means nothing can land on screen
        let margin = radius.ceil() as i32 + 1;
        let w = self.width as i32;
        let h = self.height as i32;
        if (x0 < -margin && x1 < -margin)
            || (y0 < -margin && y1 < -margin)
            || (x0 >= w + margin && x1 >= w + margin)
            || (y0 >= h + margin && y1 >= h + margin)
        {
            return;
        }

        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;

        let mut x = x0;
        let mut y = y0;
        let mut steps = 0;

        loop {
            self.stamp_disc(x, y, radius, color, alpha);

            if x == x1 && y == y1 {
                break;
            }
            steps += 1;
            if steps > MAX_SEGMENT_STEPS {
                break;
            }

            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn fill_dot(
        &mut self,
        x: f32,
        y: f32,
        radius: f32,
        color: (u8, u8, u8),
        glow: (u8, u8, u8),
        alpha: f32,
    ) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        self.stamp_id += 1;

        let core = radius.min(MAX_BRUSH_RADIUS).max(0.5);
        let cx = x.clamp(-MAX_COORD, MAX_COORD) as i32;
        let cy = y.clamp(-MAX_COORD, MAX_COORD) as i32;

        let r = (core + 1.0).ceil() as i32;
        if cx + r < 0 || cy + r < 0 || cx - r >= self.width as i32 || cy - r >= self.height as i32 {
            return;
        }

        // Solid core with a one pixel rim of the darker shell glow
        for dy in -r..=r {
            for dx in -r..=r {
                let d2 = (dx * dx + dy * dy) as f32;
                if d2 <= core * core {
                    self.add_pixel(cx + dx, cy + dy, color, alpha);
                } else if d2 <= (core + 1.0) * (core + 1.0) {
                    self.add_pixel(cx + dx, cy + dy, glow, alpha * 0.5);
                }
            }
        }
    }

    fn to_rgb(px: (f32, f32, f32)) -> (u8, u8, u8) {
        (px.0 as u8, px.1 as u8, px.2 as u8)
    }

    fn emit<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H"); // Move to home

        let mut prev_top_color: (u8, u8, u8) = (255, 255, 255);
        let mut prev_bot_color: (u8, u8, u8) = (255, 255, 255);

        // Render using half-blocks
        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top_color = Self::to_rgb(self.frame[y * self.width + x]);
                let bot_color = if y + 1 < self.height {
                    Self::to_rgb(self.frame[(y + 1) * self.width + x])
                } else {
                    self.bg
                };

                // Only emit color codes if changed
                if top_color != prev_top_color {
                    write!(
                        self.output_buf,
                        "\x1b[48;2;{};{};{}m",
                        top_color.0, top_color.1, top_color.2
                    )?;
                    prev_top_color = top_color;
                }
                if bot_color != prev_bot_color {
                    write!(
                        self.output_buf,
                        "\x1b[38;2;{};{};{}m",
                        bot_color.0, bot_color.1, bot_color.2
                    )?;
                    prev_bot_color = bot_color;
                }

                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top_color = (255, 255, 255);
            prev_bot_color = (255, 255, 255);
            if y + 2 < self.height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()
    }
}
