use crate::{
    config::{self, SimConfig},
    controls::DisplayFlags,
    types::{ParticleView, Rgb, Vec2},
};

const PARTICLE_GLYPH: char = '•';
const ATTRACTOR_GLYPH: char = '@';
const VELOCITY_AXIS_GLYPH: char = '·';
const ACCEL_AXIS_GLYPH: char = '·';

const ATTRACTOR_PRIORITY: u8 = 3;
const PARTICLE_PRIORITY: u8 = 2;
const AXIS_PRIORITY: u8 = 1;

/// Terminal cells are roughly twice as tall as they are wide.
pub const CELL_ASPECT: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pos: Vec2,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pos: config::CENTER,
            zoom: 0.1,
        }
    }
}

impl Camera {
    /// Centers on `pos` with the whole `world_width` across the viewport.
    pub fn fit(pos: Vec2, world_width: f64, viewport: Viewport) -> Self {
        let zoom = if world_width > 0.0 {
            viewport.width as f64 / world_width
        } else {
            1.0
        };
        Self { pos, zoom }
    }

    pub fn zoom_by(&mut self, factor: f64) {
        self.zoom = (self.zoom * factor).clamp(1.0e-4, 100.0);
    }

    pub fn to_screen(&self, world: Vec2, viewport: Viewport) -> (i32, i32) {
        let half_w = viewport.width as f64 / 2.0;
        let half_h = viewport.height as f64 / 2.0;
        let sx = ((world.x - self.pos.x) * self.zoom + half_w).round() as i32;
        let sy = ((world.y - self.pos.y) * self.zoom * CELL_ASPECT + half_h).round() as i32;
        (sx, sy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

/// Low/high speed clamp for the velocity gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedPalette {
    pub low: f64,
    pub high: f64,
}

impl SpeedPalette {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            low: config.speed_color_low,
            high: config.speed_color_high,
        }
    }

    /// Slow particles are blue, fast ones tangelo.
    pub fn color(&self, speed: f64) -> Rgb {
        let t = (speed - self.low) / (self.high - self.low);
        Rgb::BLUE.lerp(Rgb::TANGELO, t)
    }
}

impl Default for SpeedPalette {
    fn default() -> Self {
        Self {
            low: config::SPEED_COLOR_LOW,
            high: config::SPEED_COLOR_HIGH,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderCell {
    pub ch: char,
    pub priority: u8,
    pub color: Rgb,
}

const BLANK: RenderCell = RenderCell {
    ch: ' ',
    priority: 0,
    color: Rgb::WHITE,
};

#[derive(Debug)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<RenderCell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let mut buffer = Self {
            width,
            height,
            cells: Vec::new(),
        };
        buffer.resize(width, height);
        buffer
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let len = (width as usize).saturating_mul(height as usize);
        self.cells.resize(len, BLANK);
        self.clear();
    }

    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> RenderCell {
        debug_assert!(x < self.width && y < self.height, "get() out of bounds");
        self.cells[(y as usize) * (self.width as usize) + (x as usize)]
    }

    fn set(&mut self, x: i32, y: i32, ch: char, priority: u8, color: Rgb) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        let cell = &mut self.cells[idx];
        if priority >= cell.priority {
            *cell = RenderCell { ch, priority, color };
        }
    }

    fn line(&mut self, from: (i32, i32), to: (i32, i32), ch: char, color: Rgb) {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        let steps = dx.abs().max(dy.abs());
        if steps == 0 {
            self.set(from.0, from.1, ch, AXIS_PRIORITY, color);
            return;
        }
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = from.0 + (dx as f64 * t).round() as i32;
            let y = from.1 + (dy as f64 * t).round() as i32;
            self.set(x, y, ch, AXIS_PRIORITY, color);
        }
    }
}

pub fn draw(
    particles: &[ParticleView],
    center: Vec2,
    flags: DisplayFlags,
    palette: SpeedPalette,
    camera: &Camera,
    viewport: Viewport,
    frame: &mut FrameBuffer,
) {
    if frame.width() != viewport.width || frame.height() != viewport.height {
        frame.resize(viewport.width, viewport.height);
    } else {
        frame.clear();
    }

    if flags.show_axes {
        for particle in particles {
            draw_axes(particle, center, camera, viewport, frame);
        }
    }

    for particle in particles {
        let (sx, sy) = camera.to_screen(particle.position, viewport);
        let color = if flags.color_by_velocity {
            palette.color(particle.speed)
        } else {
            Rgb::WHITE
        };
        frame.set(sx, sy, PARTICLE_GLYPH, PARTICLE_PRIORITY, color);
    }

    let (cx, cy) = camera.to_screen(center, viewport);
    frame.set(cx, cy, ATTRACTOR_GLYPH, ATTRACTOR_PRIORITY, Rgb::WHITE);
}

/// Red along the velocity, blue toward the attractor.
fn draw_axes(
    particle: &ParticleView,
    center: Vec2,
    camera: &Camera,
    viewport: Viewport,
    frame: &mut FrameBuffer,
) {
    let origin = camera.to_screen(particle.position, viewport);
    let velocity_tip = particle.position + particle.velocity.unit() * config::AXIS_LENGTH;
    let accel_tip = particle.position + (center - particle.position).unit() * config::AXIS_LENGTH;
    frame.line(
        origin,
        camera.to_screen(velocity_tip, viewport),
        VELOCITY_AXIS_GLYPH,
        Rgb::RED,
    );
    frame.line(
        origin,
        camera.to_screen(accel_tip, viewport),
        ACCEL_AXIS_GLYPH,
        Rgb::BLUE,
    );
}
