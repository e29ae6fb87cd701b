use log::warn;

use crate::{
    error::{require_positive, ConfigError},
    types::Vec2,
};

pub const FRAME_WIDTH: f64 = 1200.0;
pub const FRAME_HEIGHT: f64 = 800.0;
pub const CENTER: Vec2 = Vec2::new(FRAME_WIDTH / 2.0, FRAME_HEIGHT / 2.0);

pub const GRAVITY_G: f64 = 0.2;
pub const ATTRACTOR_MASS_MIN: f64 = 1.0e7;
pub const ATTRACTOR_MASS_MAX: f64 = 1.0e8;
pub const ATTRACTOR_MASS_DEFAULT: f64 = (ATTRACTOR_MASS_MIN + ATTRACTOR_MASS_MAX) / 2.0;
pub const MASS_STEP_FRACTION: f64 = 0.01;

pub const PARTICLE_MASS: f64 = 2.0;
pub const PARTICLE_MOMENTUM: Vec2 = Vec2::new(500.0, 500.0);

pub const CULL_RADIUS: f64 = 6500.0;
pub const CULL_INTERVAL: f64 = 1.0;

pub const FRAME_RATE_CAP: f64 = 120.0;
/// Slowest allowed cap: one frame per 1000 s.
pub const MIN_FRAME_RATE_CAP: f64 = 1.0e-3;
pub const TIME_DILATION: f64 = 5000.0;
pub const MAX_FRAME_MS: f64 = 100.0;

pub const DISC_RADIUS: f64 = 200.0;
pub const DISC_COUNT: usize = 1000;

pub const SPEED_COLOR_LOW: f64 = 10.0;
pub const SPEED_COLOR_HIGH: f64 = 1000.0;

pub const AXIS_LENGTH: f64 = 20.0;

/// Closed interval backing a slider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MassRange {
    min: f64,
    max: f64,
}

impl MassRange {
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "attractor mass range",
            });
        }
        if min > max {
            return Err(ConfigError::InvertedRange {
                name: "attractor mass",
                min,
                max,
            });
        }
        require_positive("attractor mass minimum", min)?;
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Maps a slider position in `[0, 1]` onto the range.
    pub fn lerp(&self, fraction: f64) -> f64 {
        let fraction = fraction.clamp(0.0, 1.0);
        self.min + fraction * (self.max - self.min)
    }

    /// Inverse of [`MassRange::lerp`]; a degenerate range reports 0.
    pub fn fraction(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 {
            ((value - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Default for MassRange {
    fn default() -> Self {
        Self {
            min: ATTRACTOR_MASS_MIN,
            max: ATTRACTOR_MASS_MAX,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SeedMode {
    /// Area-uniform disc around the attractor.
    #[default]
    Disc,
    /// A single particle at (300, 300).
    One,
    /// Two particles at (300, 300) and (800, 500).
    Two,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub gravitational_constant: f64,
    pub attractor_mass: MassRange,
    pub attractor_mass_default: f64,
    pub mass_step_fraction: f64,
    pub particle_mass: f64,
    pub particle_momentum: Vec2,
    pub center: Vec2,
    pub cull_radius: f64,
    pub cull_interval: f64,
    pub frame_rate_cap: f64,
    pub time_dilation: f64,
    pub max_frame_ms: f64,
    pub seed_mode: SeedMode,
    pub disc_radius: f64,
    pub disc_count: usize,
    pub speed_color_low: f64,
    pub speed_color_high: f64,
    pub rng_seed: Option<u64>,
    pub initial_flags: Vec<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: GRAVITY_G,
            attractor_mass: MassRange::default(),
            attractor_mass_default: ATTRACTOR_MASS_DEFAULT,
            mass_step_fraction: MASS_STEP_FRACTION,
            particle_mass: PARTICLE_MASS,
            particle_momentum: PARTICLE_MOMENTUM,
            center: CENTER,
            cull_radius: CULL_RADIUS,
            cull_interval: CULL_INTERVAL,
            frame_rate_cap: FRAME_RATE_CAP,
            time_dilation: TIME_DILATION,
            max_frame_ms: MAX_FRAME_MS,
            seed_mode: SeedMode::Disc,
            disc_radius: DISC_RADIUS,
            disc_count: DISC_COUNT,
            speed_color_low: SPEED_COLOR_LOW,
            speed_color_high: SPEED_COLOR_HIGH,
            rng_seed: None,
            initial_flags: Vec::new(),
        }
    }
}

impl SimConfig {
    /// Rejects anything that would end up as a bad divisor or a NaN in the
    /// per-frame path. An out-of-range default attractor mass is clamped.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        require_positive("gravitational constant", self.gravitational_constant)?;
        require_positive("particle mass", self.particle_mass)?;
        require_positive("cull radius", self.cull_radius)?;
        require_positive("cull interval", self.cull_interval)?;
        require_positive("frame rate cap", self.frame_rate_cap)?;
        if self.frame_rate_cap < MIN_FRAME_RATE_CAP {
            return Err(ConfigError::BelowMinimum {
                name: "frame rate cap",
                value: self.frame_rate_cap,
                min: MIN_FRAME_RATE_CAP,
            });
        }
        require_positive("time dilation", self.time_dilation)?;
        require_positive("max frame ms", self.max_frame_ms)?;
        require_positive("mass step fraction", self.mass_step_fraction)?;

        if !self.particle_momentum.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "particle momentum",
            });
        }
        if !self.center.is_finite() {
            return Err(ConfigError::NonFinite { name: "center" });
        }
        if !self.disc_radius.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "disc radius",
            });
        }
        if self.disc_radius < 0.0 {
            return Err(ConfigError::NonPositive {
                name: "disc radius",
                value: self.disc_radius,
            });
        }
        if !self.speed_color_low.is_finite() || !self.speed_color_high.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "speed color bounds",
            });
        }
        if self.speed_color_low >= self.speed_color_high {
            return Err(ConfigError::InvertedRange {
                name: "speed color",
                min: self.speed_color_low,
                max: self.speed_color_high,
            });
        }

        // Rebuild so a hand-assembled range gets the same checks as MassRange::new.
        self.attractor_mass = MassRange::new(self.attractor_mass.min, self.attractor_mass.max)?;
        let clamped = self.attractor_mass.clamp(self.attractor_mass_default);
        if clamped != self.attractor_mass_default {
            warn!(
                "default attractor mass {} outside [{}, {}], using {}",
                self.attractor_mass_default,
                self.attractor_mass.min,
                self.attractor_mass.max,
                clamped
            );
            self.attractor_mass_default = clamped;
        }
        Ok(self)
    }
}
