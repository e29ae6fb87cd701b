//! Frame loop. Each iteration: check for stop, turn wall time into a bounded
//! `dt`, step the field, cull when the timer says so, then hand the frame to
//! the render side and let the input side touch the controls.

mod clock;

pub use clock::{CullTimer, FrameClock, Timestep};

use std::time::Duration;

use log::info;

use crate::{
    config::SimConfig,
    controls::{ControlState, DisplayFlags},
    core::{ParticleField, ParticleTemplate, Seeding},
    error::{ConfigError, SimError},
    types::{FieldStats, ParticleView, Vec2},
};

/// Everything the render side needs for one frame, borrowed read-only.
#[derive(Clone, Copy, Debug)]
pub struct RenderView<'a> {
    pub particles: &'a [ParticleView],
    pub center: Vec2,
    pub flags: DisplayFlags,
    pub attractor_mass: f64,
    pub mass_fraction: f64,
    pub stats: FieldStats,
    pub sim_time: f64,
    pub culled_total: usize,
    pub fps: f64,
}

/// The collaborators outside the physics: an event source, a renderer and
/// an input surface. The loop only ever hands each of them what it needs.
pub trait Frontend {
    /// Polled once per iteration before any work; `true` ends the loop.
    fn poll_stop(&mut self) -> Result<bool, SimError>;

    fn render(&mut self, view: &RenderView<'_>) -> Result<(), SimError>;

    fn apply_input(&mut self, controls: &ControlState) -> Result<(), SimError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub dt: f64,
    pub culled: Option<usize>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub sim_time: f64,
    pub culled_total: usize,
    pub survivors: usize,
}

pub struct Simulation {
    field: ParticleField,
    controls: ControlState,
    timestep: Timestep,
    cull_timer: CullTimer,
    views: Vec<ParticleView>,
    sim_time: f64,
    frames: u64,
    culled_total: usize,
}

impl Simulation {
    pub fn new(field: ParticleField, controls: ControlState, config: &SimConfig) -> Self {
        Self {
            field,
            controls,
            timestep: Timestep {
                time_dilation: config.time_dilation,
                max_frame_ms: config.max_frame_ms,
            },
            cull_timer: CullTimer::new(config.cull_interval),
            views: Vec::new(),
            sim_time: 0.0,
            frames: 0,
            culled_total: 0,
        }
    }

    /// Validates `config`, builds the field and controls, and seeds the field.
    pub fn from_config(config: SimConfig) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        let controls = ControlState::from_config(&config)?;
        let mut field = ParticleField::from_config(&config)?;
        field.seed(
            &Seeding::from_config(&config),
            ParticleTemplate::from_config(&config),
        )?;
        info!(
            "simulation ready: {} particles, G = {}, cull radius {}, attractor mass {:.3e} in [{:.3e}, {:.3e}]",
            field.len(),
            field.gravitational_constant(),
            field.cull_radius(),
            controls.attractor_mass(),
            config.attractor_mass.min(),
            config.attractor_mass.max()
        );
        Ok(Self::new(field, controls, &config))
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn culled_total(&self) -> usize {
        self.culled_total
    }

    /// Advances by the wall time `elapsed`, scaled and capped by the timestep.
    pub fn advance(&mut self, elapsed: Duration) -> FrameReport {
        let dt = self.timestep.dt_for(elapsed);
        self.advance_dt(dt)
    }

    pub fn advance_dt(&mut self, dt: f64) -> FrameReport {
        self.field.step(dt, &self.controls);
        self.sim_time += dt;
        self.frames += 1;

        let culled = if self.cull_timer.advance(dt) {
            let removed = self.field.cull();
            self.culled_total += removed;
            Some(removed)
        } else {
            None
        };
        FrameReport { dt, culled }
    }

    pub fn render_view(&mut self, fps: f64) -> RenderView<'_> {
        self.field.view(&mut self.views);
        let attractor_mass = self.controls.attractor_mass();
        RenderView {
            particles: &self.views,
            center: self.field.center(),
            flags: self.controls.display_flags(),
            attractor_mass,
            mass_fraction: self.controls.attractor_mass_fraction(),
            stats: self.field.stats(attractor_mass),
            sim_time: self.sim_time,
            culled_total: self.culled_total,
            fps,
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            frames: self.frames(),
            sim_time: self.sim_time(),
            culled_total: self.culled_total(),
            survivors: self.field().len(),
        }
    }
}

/// Drives `sim` until `frontend` asks to stop, capping the frame rate.
pub fn run<F: Frontend>(
    sim: &mut Simulation,
    frontend: &mut F,
    frame_rate_cap: f64,
) -> Result<RunSummary, SimError> {
    let mut clock = FrameClock::new(frame_rate_cap);
    loop {
        if frontend.poll_stop()? {
            break;
        }
        let elapsed = clock.tick();
        sim.advance(elapsed);
        frontend.render(&sim.render_view(clock.fps()))?;
        frontend.apply_input(sim.controls())?;
    }
    let summary = sim.summary();
    if sim.field().is_empty() {
        info!("every particle has escaped");
    }
    info!(
        "stopped after {} frames, {:.2} simulated units, {} culled, {} left",
        summary.frames, summary.sim_time, summary.culled_total, summary.survivors
    );
    Ok(summary)
}
