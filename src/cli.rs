use std::path::PathBuf;

use clap::Parser;

use crate::config::{MassRange, SeedMode, SimConfig};
use crate::error::ConfigError;

/// Interactive central-mass gravity toy for the terminal.
#[derive(Debug, Parser)]
#[command(name = "gravitoy", version)]
pub struct Cli {
    /// Initial particle layout.
    #[arg(long, value_enum, default_value_t = SeedMode::Disc)]
    pub seed_mode: SeedMode,

    /// Particles seeded in disc mode.
    #[arg(short = 'n', long, default_value_t = crate::config::DISC_COUNT)]
    pub count: usize,

    /// Radius of the seeding disc.
    #[arg(long, default_value_t = crate::config::DISC_RADIUS)]
    pub disc_radius: f64,

    /// Gravitational constant.
    #[arg(short = 'g', long, default_value_t = crate::config::GRAVITY_G)]
    pub gravity: f64,

    /// Starting attractor mass (clamped into the slider range).
    #[arg(short, long)]
    pub mass: Option<f64>,

    /// Lower bound of the attractor mass slider.
    #[arg(long, default_value_t = crate::config::ATTRACTOR_MASS_MIN)]
    pub mass_min: f64,

    /// Upper bound of the attractor mass slider.
    #[arg(long, default_value_t = crate::config::ATTRACTOR_MASS_MAX)]
    pub mass_max: f64,

    /// Particles farther than this from the attractor are removed.
    #[arg(long, default_value_t = crate::config::CULL_RADIUS)]
    pub cull_radius: f64,

    /// Frame rate cap.
    #[arg(long, default_value_t = crate::config::FRAME_RATE_CAP)]
    pub fps: f64,

    /// Wall-clock milliseconds per simulated time unit.
    #[arg(long, default_value_t = crate::config::TIME_DILATION)]
    pub time_dilation: f64,

    /// Seed for reproducible particle layouts.
    #[arg(long)]
    pub rng_seed: Option<u64>,

    /// Display flag to switch on at startup (color-by-velocity, show-axes).
    #[arg(long = "flag")]
    pub flags: Vec<String>,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn into_config(self) -> Result<SimConfig, ConfigError> {
        let defaults = SimConfig::default();
        let attractor_mass = MassRange::new(self.mass_min, self.mass_max)?;
        Ok(SimConfig {
            gravitational_constant: self.gravity,
            attractor_mass,
            attractor_mass_default: self.mass.unwrap_or_else(|| attractor_mass.lerp(0.5)),
            cull_radius: self.cull_radius,
            frame_rate_cap: self.fps,
            time_dilation: self.time_dilation,
            seed_mode: self.seed_mode,
            disc_radius: self.disc_radius,
            disc_count: self.count,
            rng_seed: self.rng_seed,
            initial_flags: self.flags,
            ..defaults
        })
    }
}
