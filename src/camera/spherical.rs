use std::f32::consts::PI;

use glam::Vec3;

/// Polar angles closer than this to a pole are pushed back off it.
pub const POLE_EPSILON: f32 = 0.000_001;

/// Spherical coordinates in a Y-up frame.
///
/// `phi` is the polar angle measured from +Y, `theta` the azimuth around +Y
/// measured from +Z towards +X.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spherical {
    /// Distance from the origin.
    pub radius: f32,
    /// Polar angle in radians, `0` at +Y and `π` at -Y.
    pub phi: f32,
    /// Azimuthal angle in radians.
    pub theta: f32,
}

impl Spherical {
    /// Build from explicit components.
    #[must_use]
    pub const fn new(radius: f32, phi: f32, theta: f32) -> Self {
        Self { radius, phi, theta }
    }

    /// Derive from a Cartesian offset. A zero vector maps to all zeros.
    #[must_use]
    pub fn from_vec3(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::new(0.0, 0.0, 0.0);
        }
        Self {
            radius,
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
            theta: v.x.atan2(v.z),
        }
    }

    /// Convert back to a Cartesian offset.
    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Keep `phi` strictly inside `(0, π)` so the look-at up vector is
    /// never parallel to the view direction.
    pub fn make_safe(&mut self) {
        self.phi = self.phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_vector_is_degenerate() {
        assert_eq!(Spherical::from_vec3(Vec3::ZERO), Spherical::default());
    }

    #[test]
    fn axis_vectors() {
        let up = Spherical::from_vec3(Vec3::new(0.0, 5.0, 0.0));
        assert!((up.radius - 5.0).abs() < 1e-6);
        assert!(up.phi.abs() < 1e-6);

        let front = Spherical::from_vec3(Vec3::new(0.0, 0.0, 2.0));
        assert!((front.phi - PI / 2.0).abs() < 1e-6);
        assert!(front.theta.abs() < 1e-6);

        let right = Spherical::from_vec3(Vec3::new(3.0, 0.0, 0.0));
        assert!((right.theta - PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn cartesian_conversion_is_consistent() {
        let v = Vec3::new(1.5, -2.0, 4.0);
        let back = Spherical::from_vec3(v).to_vec3();
        assert!((back - v).length() < 1e-5, "got {back:?}");
    }

    #[test]
    fn make_safe_moves_off_the_poles() {
        let mut s = Spherical::new(1.0, 0.0, 0.0);
        s.make_safe();
        assert!(s.phi > 0.0);

        let mut s = Spherical::new(1.0, PI, 0.0);
        s.make_safe();
        assert!(s.phi < PI);
    }
}
