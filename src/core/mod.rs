mod particle;

pub use particle::Particle;

use std::f64::consts::TAU;

use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::{SeedMode, SimConfig},
    controls::ControlState,
    error::{require_positive, ConfigError},
    types::{FieldStats, ParticleView, Vec2},
};

/// How a batch of particles gets placed.
#[derive(Clone, Debug, PartialEq)]
pub enum Seeding {
    /// Area-uniform points inside a disc.
    Disc {
        center: Vec2,
        max_radius: f64,
        count: usize,
    },
    /// Fixed coordinates, for deterministic scenarios.
    Points(Vec<Vec2>),
}

impl Seeding {
    pub fn one() -> Self {
        Seeding::Points(vec![Vec2::new(300.0, 300.0)])
    }

    pub fn two() -> Self {
        Seeding::Points(vec![Vec2::new(300.0, 300.0), Vec2::new(800.0, 500.0)])
    }

    pub fn from_config(config: &SimConfig) -> Self {
        match config.seed_mode {
            SeedMode::Disc => Seeding::Disc {
                center: config.center,
                max_radius: config.disc_radius,
                count: config.disc_count,
            },
            SeedMode::One => Seeding::one(),
            SeedMode::Two => Seeding::two(),
        }
    }
}

/// Initial mass and momentum handed to every seeded particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleTemplate {
    pub mass: f64,
    pub momentum: Vec2,
}

impl ParticleTemplate {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            mass: config.particle_mass,
            momentum: config.particle_momentum,
        }
    }

    fn spawn(&self, position: Vec2) -> Result<Particle, ConfigError> {
        Particle::new(position, self.mass, self.momentum)
    }
}

pub struct ParticleField {
    particles: Vec<Particle>,
    center: Vec2,
    cull_radius: f64,
    gravitational_constant: f64,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(
        center: Vec2,
        cull_radius: f64,
        gravitational_constant: f64,
        rng_seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if !center.is_finite() {
            return Err(ConfigError::NonFinite { name: "center" });
        }
        require_positive("cull radius", cull_radius)?;
        require_positive("gravitational constant", gravitational_constant)?;
        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            particles: Vec::new(),
            center,
            cull_radius,
            gravitational_constant,
            rng,
        })
    }

    pub fn from_config(config: &SimConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.center,
            config.cull_radius,
            config.gravitational_constant,
            config.rng_seed,
        )
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn cull_radius(&self) -> f64 {
        self.cull_radius
    }

    pub fn gravitational_constant(&self) -> f64 {
        self.gravitational_constant
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Adds particles per `seeding`; returns how many were added.
    pub fn seed(
        &mut self,
        seeding: &Seeding,
        template: ParticleTemplate,
    ) -> Result<usize, ConfigError> {
        let before = self.particles.len();
        match seeding {
            Seeding::Disc {
                center,
                max_radius,
                count,
            } => {
                if !max_radius.is_finite() || *max_radius < 0.0 {
                    return Err(ConfigError::NonPositive {
                        name: "disc radius",
                        value: *max_radius,
                    });
                }
                self.particles.reserve(*count);
                for _ in 0..*count {
                    let angle = self.rng.gen_range(0.0_f64..1.0) * TAU;
                    // sqrt keeps the density uniform per unit area
                    let radius = self.rng.gen_range(0.0_f64..1.0).sqrt() * max_radius;
                    let offset = Vec2::new(angle.cos() * radius, angle.sin() * radius);
                    self.push(template.spawn(*center + offset)?);
                }
            }
            Seeding::Points(points) => {
                for &point in points {
                    self.push(template.spawn(point)?);
                }
            }
        }
        let added = self.particles.len() - before;
        info!("seeded {added} particles ({} live)", self.particles.len());
        Ok(added)
    }

    /// Advances every particle by `dt` under the current attractor mass.
    pub fn step(&mut self, dt: f64, controls: &ControlState) {
        let attractor_mass = controls.attractor_mass();
        let center = self.center;
        let g = self.gravitational_constant;
        for particle in &mut self.particles {
            particle.integrate(dt, center, attractor_mass, g);
        }
    }

    /// Drops every particle farther than the cull radius from the center;
    /// returns how many were removed.
    pub fn cull(&mut self) -> usize {
        let center = self.center;
        let radius = self.cull_radius;
        let before = self.particles.len();
        self.particles.retain(|p| p.position().distance(center) <= radius);
        let removed = before - self.particles.len();
        if removed > 0 {
            debug!("culled {removed} particles ({} live)", self.particles.len());
        }
        removed
    }

    pub fn view(&self, out: &mut Vec<ParticleView>) {
        out.clear();
        out.extend(self.particles().iter().map(Particle::view));
    }

    pub fn stats(&self, attractor_mass: f64) -> FieldStats {
        let mut stats = FieldStats {
            count: self.particles.len(),
            ..FieldStats::default()
        };
        if self.is_empty() {
            return stats;
        }
        let mut speed_sum = 0.0;
        for p in &self.particles {
            let speed = p.speed();
            speed_sum += speed;
            stats.max_speed = stats.max_speed.max(speed);
            stats.total_energy += p.kinetic_energy()
                + p.potential_energy(self.center, attractor_mass, self.gravitational_constant);
        }
        stats.mean_speed = speed_sum / self.particles.len() as f64;
        stats
    }
}
