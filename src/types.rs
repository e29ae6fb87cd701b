use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scale(self, by: f64) -> Vec2 {
        Vec2::new(self.x * by, self.y * by)
    }

    pub fn magnitude_sq(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn magnitude(self) -> f64 {
        self.magnitude_sq().sqrt()
    }

    /// Unit vector in the same direction, or [`Vec2::ZERO`] for the zero vector.
    pub fn unit(self) -> Vec2 {
        let len = self.magnitude();
        if len > 0.0 {
            Vec2::new(self.x / len, self.y / len)
        } else {
            Vec2::ZERO
        }
    }

    pub fn distance(self, other: Vec2) -> f64 {
        (other - self).magnitude()
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        self.scale(rhs)
    }
}

impl Mul<Vec2> for f64 {
    type Output = Vec2;

    fn mul(self, rhs: Vec2) -> Vec2 {
        rhs.scale(self)
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;

    fn div(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const TANGELO: Rgb = Rgb(249, 110, 21);

    /// Linear blend from `self` (t = 0) to `other` (t = 1); `t` is clamped.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + t * (b as f64 - a as f64)) as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

/// What the render side gets to see of one live particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleView {
    pub position: Vec2,
    pub velocity: Vec2,
    pub speed: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldStats {
    pub count: usize,
    pub mean_speed: f64,
    pub max_speed: f64,
    pub total_energy: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod vec2_new {
        use super::*;

        #[test]
        fn creates_vector_with_given_coordinates() {
            let v = Vec2::new(3.0, 4.0);
            assert_eq!(v.x, 3.0);
            assert_eq!(v.y, 4.0);
        }

        #[test]
        fn zero_constant_is_origin() {
            assert_eq!(Vec2::ZERO, Vec2::new(0.0, 0.0));
        }
    }

    mod vec2_magnitude {
        use super::*;

        #[test]
        fn calculates_magnitude_squared() {
            assert_eq!(Vec2::new(3.0, 4.0).magnitude_sq(), 25.0);
        }

        #[test]
        fn calculates_magnitude() {
            assert_eq!(Vec2::new(3.0, 4.0).magnitude(), 5.0);
        }

        #[test]
        fn distance_is_symmetric() {
            let a = Vec2::new(600.0, 400.0);
            let b = Vec2::new(300.0, 0.0);
            assert_eq!(a.distance(b), 500.0);
            assert_eq!(b.distance(a), 500.0);
        }
    }

    mod vec2_unit {
        use super::*;

        #[test]
        fn normalizes_non_zero_vector() {
            let v = Vec2::new(3.0, 4.0).unit();
            assert!((v.x - 0.6).abs() < 1e-12);
            assert!((v.y - 0.8).abs() < 1e-12);
            assert!((v.magnitude() - 1.0).abs() < 1e-12);
        }

        #[test]
        fn zero_vector_has_zero_unit() {
            assert_eq!(Vec2::ZERO.unit(), Vec2::ZERO);
        }
    }

    mod vec2_ops {
        use super::*;

        #[test]
        fn adds_and_subtracts() {
            let a = Vec2::new(1.0, 2.0);
            let b = Vec2::new(3.0, 5.0);
            assert_eq!(a + b, Vec2::new(4.0, 7.0));
            assert_eq!(b - a, Vec2::new(2.0, 3.0));
        }

        #[test]
        fn assign_ops_modify_in_place() {
            let mut a = Vec2::new(1.0, 2.0);
            a += Vec2::new(3.0, 4.0);
            assert_eq!(a, Vec2::new(4.0, 6.0));
            a -= Vec2::new(1.0, 1.0);
            assert_eq!(a, Vec2::new(3.0, 5.0));
        }

        #[test]
        fn scales_from_either_side() {
            let v = Vec2::new(2.0, 3.0);
            assert_eq!(v * 2.0, Vec2::new(4.0, 6.0));
            assert_eq!(2.0 * v, Vec2::new(4.0, 6.0));
            assert_eq!(v.scale(0.0), Vec2::ZERO);
        }

        #[test]
        fn divides_by_scalar() {
            assert_eq!(Vec2::new(500.0, 500.0) / 2.0, Vec2::new(250.0, 250.0));
        }

        #[test]
        fn negates() {
            assert_eq!(-Vec2::new(1.0, -2.0), Vec2::new(-1.0, 2.0));
        }

        #[test]
        fn perpendicular_vectors_have_zero_dot_product() {
            assert_eq!(Vec2::new(1.0, 0.0).dot(Vec2::new(0.0, 1.0)), 0.0);
        }
    }

    mod rgb_lerp {
        use super::*;

        #[test]
        fn endpoints_are_exact() {
            assert_eq!(Rgb::BLUE.lerp(Rgb::TANGELO, 0.0), Rgb::BLUE);
            assert_eq!(Rgb::BLUE.lerp(Rgb::TANGELO, 1.0), Rgb::TANGELO);
        }

        #[test]
        fn clamps_out_of_range_t() {
            assert_eq!(Rgb::BLUE.lerp(Rgb::TANGELO, -3.0), Rgb::BLUE);
            assert_eq!(Rgb::BLUE.lerp(Rgb::TANGELO, 7.0), Rgb::TANGELO);
        }

        #[test]
        fn midpoint_truncates_like_int_cast() {
            // 0 + 0.5 * 249 = 124.5, 0 + 0.5 * 110 = 55, 255 + 0.5 * (21 - 255) = 138
            assert_eq!(Rgb::BLUE.lerp(Rgb::TANGELO, 0.5), Rgb(124, 55, 138));
        }
    }
}
