//! The only channel through which operator input reaches the physics.
//!
//! Input collaborators write through `&ControlState`; the simulation reads the
//! latest value every step. Scalars live in atomics so a read never observes a
//! half-written value, and one frame of staleness is fine, so `Relaxed` is enough.

use std::{
    fmt,
    str::FromStr,
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
};

use log::warn;

use crate::{
    config::{MassRange, SimConfig},
    error::ConfigError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flag {
    ColorByVelocity,
    ShowAxes,
}

impl Flag {
    pub const ALL: [Flag; 2] = [Flag::ColorByVelocity, Flag::ShowAxes];

    pub fn name(self) -> &'static str {
        match self {
            Flag::ColorByVelocity => "color-by-velocity",
            Flag::ShowAxes => "show-axes",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Flag {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Flag::ALL
            .into_iter()
            .find(|flag| flag.name() == s)
            .ok_or_else(|| ConfigError::UnknownFlag(s.to_string()))
    }
}

/// Plain copy of the flags for one render pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayFlags {
    pub color_by_velocity: bool,
    pub show_axes: bool,
}

#[derive(Debug)]
pub struct ControlState {
    range: MassRange,
    step_fraction: f64,
    attractor_mass: AtomicU64,
    flags: [AtomicBool; Flag::ALL.len()],
}

impl ControlState {
    pub fn new(range: MassRange, initial_mass: f64) -> Self {
        Self {
            range,
            step_fraction: crate::config::MASS_STEP_FRACTION,
            attractor_mass: AtomicU64::new(range.clamp(initial_mass).to_bits()),
            flags: [AtomicBool::new(false), AtomicBool::new(false)],
        }
    }

    /// Builds the control surface and switches on `initial_flags`; an unknown
    /// name is rejected here so it never reaches the frame loop.
    pub fn from_config(config: &SimConfig) -> Result<Self, ConfigError> {
        let mut controls = Self::new(config.attractor_mass, config.attractor_mass_default);
        controls.step_fraction = config.mass_step_fraction;
        for name in &config.initial_flags {
            let flag: Flag = name.parse()?;
            controls.set_flag(flag, true);
        }
        Ok(controls)
    }

    pub fn attractor_mass(&self) -> f64 {
        f64::from_bits(self.attractor_mass.load(Ordering::Relaxed))
    }

    /// Stores `value` clamped to the configured bounds. Non-finite input is dropped.
    pub fn set_attractor_mass(&self, value: f64) {
        if !value.is_finite() {
            warn!("ignoring non-finite attractor mass {value}");
            return;
        }
        let clamped = self.range.clamp(value);
        self.attractor_mass.store(clamped.to_bits(), Ordering::Relaxed);
    }

    pub fn attractor_mass_fraction(&self) -> f64 {
        self.range.fraction(self.attractor_mass())
    }

    pub fn set_attractor_mass_fraction(&self, fraction: f64) {
        if fraction.is_finite() {
            self.set_attractor_mass(self.range.lerp(fraction));
        }
    }

    /// Moves the slider by `steps` increments; negative steps move it down.
    pub fn nudge_attractor_mass(&self, steps: i32) {
        let fraction = self.attractor_mass_fraction() + steps as f64 * self.step_fraction;
        self.set_attractor_mass_fraction(fraction);
    }

    pub fn flag(&self, flag: Flag) -> bool {
        self.flags[flag.index()].load(Ordering::Relaxed)
    }

    pub fn set_flag(&self, flag: Flag, on: bool) {
        self.flags[flag.index()].store(on, Ordering::Relaxed);
    }

    pub fn toggle(&self, flag: Flag) -> bool {
        !self.flags[flag.index()].fetch_xor(true, Ordering::Relaxed)
    }

    /// Runtime toggle by name. Unknown names do nothing; returns whether a flag changed.
    pub fn toggle_named(&self, name: &str) -> bool {
        match name.parse::<Flag>() {
            Ok(flag) => {
                self.toggle(flag);
                true
            }
            Err(err) => {
                warn!("{err}");
                false
            }
        }
    }

    pub fn display_flags(&self) -> DisplayFlags {
        DisplayFlags {
            color_by_velocity: self.flag(Flag::ColorByVelocity),
            show_axes: self.flag(Flag::ShowAxes),
        }
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new(MassRange::default(), crate::config::ATTRACTOR_MASS_DEFAULT)
    }
}
