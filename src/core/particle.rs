use crate::{
    error::{require_positive, ConfigError},
    types::{ParticleView, Vec2},
};

/// One free body. Velocity is never stored; it is always `momentum / mass`.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    position: Vec2,
    mass: f64,
    momentum: Vec2,
}

impl Particle {
    pub fn new(position: Vec2, mass: f64, momentum: Vec2) -> Result<Self, ConfigError> {
        require_positive("particle mass", mass)?;
        if !position.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "particle position",
            });
        }
        if !momentum.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "particle momentum",
            });
        }
        Ok(Self {
            position,
            mass,
            momentum,
        })
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn momentum(&self) -> Vec2 {
        self.momentum
    }

    pub fn velocity(&self) -> Vec2 {
        self.momentum() / self.mass()
    }

    pub fn speed(&self) -> f64 {
        self.velocity().magnitude()
    }

    pub fn view(&self) -> ParticleView {
        let velocity = self.velocity();
        ParticleView {
            position: self.position,
            velocity,
            speed: velocity.magnitude(),
        }
    }

    /// Inverse-square pull toward `attractor`. Zero when sitting exactly on it.
    pub fn force_toward(&self, attractor: Vec2, attractor_mass: f64, g: f64) -> Vec2 {
        let dir = attractor - self.position;
        let r2 = dir.x * dir.x + dir.y * dir.y;
        if r2 <= 0.0 {
            return Vec2::ZERO;
        }
        let unit = dir / r2.sqrt();
        let magnitude = g * attractor_mass * self.mass / r2;
        unit * magnitude
    }

    /// Semi-implicit Euler: momentum first, then position from the new velocity.
    pub fn integrate(&mut self, dt: f64, attractor: Vec2, attractor_mass: f64, g: f64) {
        let force = self.force_toward(attractor, attractor_mass, g);
        self.momentum += force * dt;
        self.position += self.velocity() * dt;
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.momentum().magnitude_sq() / (2.0 * self.mass())
    }

    /// `-G M m / r`; zero at the singular point to match the force guard.
    pub fn potential_energy(&self, attractor: Vec2, attractor_mass: f64, g: f64) -> f64 {
        let r = self.position.distance(attractor);
        if r > 0.0 {
            -g * attractor_mass * self.mass / r
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: f64 = 0.2;
    const M: f64 = 1.0e7;

    fn particle(x: f64, y: f64, mass: f64, px: f64, py: f64) -> Particle {
        Particle::new(Vec2::new(x, y), mass, Vec2::new(px, py)).unwrap()
    }

    mod new {
        use super::*;

        #[test]
        fn velocity_is_momentum_over_mass() {
            let p = particle(300.0, 300.0, 2.0, 500.0, 500.0);
            assert_eq!(p.velocity(), Vec2::new(250.0, 250.0));
        }

        #[test]
        fn rejects_zero_and_negative_mass() {
            assert!(Particle::new(Vec2::ZERO, 0.0, Vec2::ZERO).is_err());
            assert!(Particle::new(Vec2::ZERO, -1.0, Vec2::ZERO).is_err());
        }

        #[test]
        fn rejects_non_finite_state() {
            assert!(Particle::new(Vec2::new(f64::NAN, 0.0), 1.0, Vec2::ZERO).is_err());
            assert!(Particle::new(Vec2::ZERO, 1.0, Vec2::new(0.0, f64::INFINITY)).is_err());
        }
    }

    mod force_toward {
        use super::*;

        #[test]
        fn points_at_attractor() {
            let p = particle(0.0, 0.0, 1.0, 0.0, 0.0);
            let f = p.force_toward(Vec2::new(10.0, 0.0), M, G);
            assert!(f.x > 0.0);
            assert_eq!(f.y, 0.0);
        }

        #[test]
        fn follows_inverse_square_law() {
            let near = particle(100.0, 0.0, 2.0, 0.0, 0.0);
            let far = particle(200.0, 0.0, 2.0, 0.0, 0.0);
            let f_near = near.force_toward(Vec2::ZERO, M, G).magnitude();
            let f_far = far.force_toward(Vec2::ZERO, M, G).magnitude();
            assert!((f_near / f_far - 4.0).abs() < 1e-12);
            assert!((f_near - G * M * 2.0 / 10_000.0).abs() < 1e-9);
        }

        #[test]
        fn zero_at_attractor() {
            let p = particle(600.0, 400.0, 2.0, 0.0, 0.0);
            assert_eq!(p.force_toward(Vec2::new(600.0, 400.0), M, G), Vec2::ZERO);
        }
    }

    mod integrate {
        use super::*;
        use proptest::prelude::*;

        #[test]
        fn updates_momentum_before_position() {
            // From rest, naive Euler would not move the particle on the first step.
            let mut p = particle(100.0, 0.0, 1.0, 0.0, 0.0);
            let dt = 0.01;
            p.integrate(dt, Vec2::ZERO, M, G);
            let accel = G * M / 10_000.0;
            assert!((p.velocity().x + accel * dt).abs() < 1e-9);
            assert!((p.position().x - (100.0 - accel * dt * dt)).abs() < 1e-9);
        }

        #[test]
        fn zero_dt_changes_nothing() {
            let mut p = particle(300.0, 300.0, 2.0, 500.0, 500.0);
            let before = p.clone();
            p.integrate(0.0, Vec2::new(600.0, 400.0), M, G);
            assert_eq!(p, before);
        }

        #[test]
        fn first_step_matches_hand_computation() {
            let mut p = particle(300.0, 300.0, 2.0, 500.0, 500.0);
            p.integrate(0.002, Vec2::new(600.0, 400.0), M, G);
            assert!((p.position().x - 300.500_075_894_663_84).abs() < 1e-9);
            assert!((p.position().y - 300.500_025_298_221_26).abs() < 1e-9);
            assert!((p.velocity().x - 250.037_947_331_922_03).abs() < 1e-9);
            assert!((p.velocity().y - 250.012_649_110_640_67).abs() < 1e-9);
        }

        #[test]
        fn circular_orbit_conserves_energy() {
            let r = 100.0;
            let m = 1.0;
            let v = (G * M / r).sqrt();
            let mut p = particle(r, 0.0, m, 0.0, v * m);
            let energy = |p: &Particle| p.kinetic_energy() + p.potential_energy(Vec2::ZERO, M, G);
            let initial = energy(&p);
            let mut worst = 0.0_f64;
            for _ in 0..20_000 {
                p.integrate(1.0e-3, Vec2::ZERO, M, G);
                worst = worst.max(((energy(&p) - initial) / initial).abs());
            }
            assert!(worst < 1.0e-3, "energy drifted by {worst}");
            assert!((p.position().magnitude() - r).abs() < 1.0, "orbit radius wandered");
        }

        #[test]
        fn eccentric_orbit_energy_stays_bounded() {
            let r = 150.0;
            let m = 2.0;
            let v = 0.8 * (G * M / r).sqrt();
            let mut p = particle(r, 0.0, m, 0.0, v * m);
            let energy = |p: &Particle| p.kinetic_energy() + p.potential_energy(Vec2::ZERO, M, G);
            let initial = energy(&p);
            for _ in 0..20_000 {
                p.integrate(5.0e-4, Vec2::ZERO, M, G);
            }
            let drift = ((energy(&p) - initial) / initial).abs();
            assert!(drift < 0.02, "energy drifted by {drift}");
        }

        proptest! {
            #[test]
            fn particle_on_attractor_gets_no_impulse(
                x in -1.0e4_f64..1.0e4,
                y in -1.0e4_f64..1.0e4,
                px in -1.0e3_f64..1.0e3,
                py in -1.0e3_f64..1.0e3,
                dt in 0.0_f64..10.0,
            ) {
                let center = Vec2::new(x, y);
                let mut p = particle(x, y, 2.0, px, py);
                p.integrate(dt, center, M, G);
                prop_assert_eq!(p.momentum(), Vec2::new(px, py));
                prop_assert!(p.position().is_finite());
            }
        }
    }

    mod energy {
        use super::*;

        #[test]
        fn kinetic_energy_is_half_m_v_squared() {
            let p = particle(0.0, 0.0, 2.0, 6.0, 8.0);
            // v = (3, 4), |v|^2 = 25, KE = 0.5 * 2 * 25
            assert_eq!(p.kinetic_energy(), 25.0);
        }

        #[test]
        fn potential_energy_is_negative_and_zero_at_center() {
            let p = particle(100.0, 0.0, 2.0, 0.0, 0.0);
            assert!((p.potential_energy(Vec2::ZERO, M, G) + G * M * 2.0 / 100.0).abs() < 1e-9);
            let q = particle(0.0, 0.0, 2.0, 0.0, 0.0);
            assert_eq!(q.potential_energy(Vec2::ZERO, M, G), 0.0);
        }
    }

    mod view {
        use super::*;

        #[test]
        fn reports_speed_of_current_velocity() {
            let p = particle(1.0, 2.0, 2.0, 6.0, 8.0);
            let view = p.view();
            assert_eq!(view.position, Vec2::new(1.0, 2.0));
            assert_eq!(view.velocity, Vec2::new(3.0, 4.0));
            assert_eq!(view.speed, 5.0);
            assert_eq!(p.speed(), 5.0);
        }
    }
}
