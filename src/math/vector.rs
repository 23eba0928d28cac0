//! Vector helpers on top of glam

use glam::DVec2;

/// 2D vector used for positions, speeds, accelerations and forces
pub type Vector2D = DVec2;

/// Operations the simulation needs beyond glam's arithmetic
pub trait VectorExt {
    /// Angle in radians between two vectors.
    ///
    /// The cosine ratio is clamped to `[-1, 1]` before `acos` so rounding
    /// overshoot never produces NaN. Returns 0 if either vector is zero.
    fn angle(self, other: Self) -> f64;

    /// Clamp each component's magnitude to `limit`, preserving sign.
    fn maximize(&mut self, limit: f64);

    /// Clamp x to `limit_x` and y to `limit_y`, preserving sign.
    fn maximize_xy(&mut self, limit_x: f64, limit_y: f64);
}

impl VectorExt for DVec2 {
    fn angle(self, other: Self) -> f64 {
        let lengths = self.length() * other.length();
        if lengths == 0.0 {
            return 0.0;
        }
        (self.dot(other) / lengths).clamp(-1.0, 1.0).acos()
    }

    fn maximize(&mut self, limit: f64) {
        self.maximize_xy(limit, limit);
    }

    fn maximize_xy(&mut self, limit_x: f64, limit_y: f64) {
        self.x = clamp_component(self.x, limit_x);
        self.y = clamp_component(self.y, limit_y);
    }
}

fn clamp_component(value: f64, limit: f64) -> f64 {
    if value.abs() > limit {
        value.signum() * limit
    } else {
        value
    }
}

/// Fold a sequence of forces into one vector, starting from zero
pub fn add_all<'a>(forces: impl IntoIterator<Item = &'a DVec2>) -> DVec2 {
    forces.into_iter().fold(DVec2::ZERO, |sum, f| sum + *f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maximize_preserves_sign() {
        let mut v = DVec2::new(-12.0, 3.0);
        v.maximize(5.0);
        assert_eq!(v, DVec2::new(-5.0, 3.0));
    }

    #[test]
    fn test_maximize_xy_independent_axes() {
        let mut v = DVec2::new(4.0, -9.0);
        v.maximize_xy(2.0, 8.0);
        assert_eq!(v, DVec2::new(2.0, -8.0));
    }

    #[test]
    fn test_maximize_with_infinite_limit_is_noop() {
        let mut v = DVec2::new(1e9, -1e9);
        v.maximize(f64::INFINITY);
        assert_eq!(v, DVec2::new(1e9, -1e9));
    }

    #[test]
    fn test_angle_clamps_rounding_overshoot() {
        let a = DVec2::new(0.1, 0.2);
        let b = a * 3.0;
        let angle = a.angle(b);
        assert!(!angle.is_nan());
        assert!(angle.abs() < 1e-6);
    }

    #[test]
    fn test_angle_between_perpendicular() {
        let angle = DVec2::X.angle(DVec2::Y);
        assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_angle_with_zero_vector() {
        assert_eq!(DVec2::ZERO.angle(DVec2::X), 0.0);
    }

    #[test]
    fn test_add_all_folds_from_zero() {
        let none: [DVec2; 0] = [];
        assert_eq!(add_all(&none), DVec2::ZERO);

        let forces = [DVec2::new(1.0, 2.0), DVec2::new(-3.0, 0.5), DVec2::new(0.0, 1.0)];
        assert_eq!(add_all(&forces), DVec2::new(-2.0, 3.5));
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(DVec2::ZERO.normalize_or_zero(), DVec2::ZERO);
    }
}
