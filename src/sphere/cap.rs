//! Spherical caps: a center plus an angular radius
//!
//! Caps are plain values. Growing or moving one returns a new cap, so a mover
//! can keep old caps in its tail while its head keeps changing.

use super::Point;
use std::f64::consts::PI;

/// Area of the whole unit sphere in steradians
pub const FULL_SPHERE_AREA: f64 = 4.0 * PI;

/// Angular radius of a cap that covers the whole sphere
pub const MAX_RADIUS: f64 = PI;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cap {
    center: Point,
    radius: f64,
}

impl Cap {
    /// `center` must be a unit vector. The radius is clamped into [0, PI].
    pub fn new(center: Point, radius: f64) -> Self {
        let radius = if radius.is_nan() { 0.0 } else { radius.clamp(0.0, MAX_RADIUS) };
        Self { center, radius }
    }

    /// Cap whose surface area is `area` steradians (clamped to the sphere)
    pub fn from_center_area(center: Point, area: f64) -> Self {
        let area = if area.is_nan() { 0.0 } else { area.clamp(0.0, FULL_SPHERE_AREA) };
        let radius = (1.0 - area / (2.0 * PI)).clamp(-1.0, 1.0).acos();
        Self::new(center, radius)
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn area(&self) -> f64 {
        2.0 * PI * (1.0 - self.radius.cos())
    }

    /// Closed containment: points exactly on the rim are inside.
    pub fn contains(&self, point: &Point) -> bool {
        self.center.angle_to(point) <= self.radius
    }

    pub fn intersects(&self, other: &Cap) -> bool {
        self.center.angle_to(&other.center) <= self.radius + other.radius
    }

    pub fn expanded(&self, delta: f64) -> Cap {
        Cap::new(self.center, self.radius + delta)
    }

    pub fn with_center(&self, center: Point) -> Cap {
        Cap::new(center, self.radius)
    }
}
