//! Geometry helpers for clamping the handle onto a circle.
//!
//! All functions are pure and return full `f64` precision. Angles follow screen
//! space, where `y` grows downward.

use std::f64::consts::PI;

pub struct Trig;

impl Trig {
    pub fn hypotenuse(dx: f64, dy: f64) -> f64 {
        (dx * dx + dy * dy).sqrt()
    }

    pub fn angle_radians(dx: f64, dy: f64) -> f64 {
        dy.atan2(dx)
    }

    /// X coordinate of the point on a circle of `radius` at `radians`.
    pub fn max_x(radians: f64, radius: f64) -> f64 {
        radius * radians.cos()
    }

    /// Y coordinate of the point on a circle of `radius` at `radians`.
    pub fn max_y(radians: f64, radius: f64) -> f64 {
        radius * radians.sin()
    }

    pub fn radians_to_degrees(radians: f64) -> f64 {
        radians * 180.0 / PI
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_hypotenuse_of_3_4_5() {
        assert!((Trig::hypotenuse(3.0, 4.0) - 5.0).abs() < EPS);
        assert!((Trig::hypotenuse(-3.0, -4.0) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_angle_quadrants() {
        assert!(Trig::angle_radians(1.0, 0.0).abs() < EPS);
        assert!((Trig::angle_radians(0.0, 1.0) - PI / 2.0).abs() < EPS);
        assert!((Trig::angle_radians(-1.0, 0.0) - PI).abs() < EPS);
        assert!((Trig::angle_radians(0.0, -1.0) + PI / 2.0).abs() < EPS);
    }

    #[test]
    fn test_projection_lies_on_circle() {
        let theta = Trig::angle_radians(30.0, -70.0);
        let x = Trig::max_x(theta, 42.0);
        let y = Trig::max_y(theta, 42.0);
        assert!((Trig::hypotenuse(x, y) - 42.0).abs() < EPS);
        assert!((Trig::angle_radians(x, y) - theta).abs() < EPS);
    }

    #[test]
    fn test_radians_to_degrees() {
        assert!((Trig::radians_to_degrees(PI) - 180.0).abs() < EPS);
        assert!((Trig::radians_to_degrees(-PI / 4.0) + 45.0).abs() < EPS);
    }
}
