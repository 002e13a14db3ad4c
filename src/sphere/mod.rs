//! Points on the unit sphere
//!
//! Pixels, region centers and geodesic results all live here as unit vectors;
//! latitude/longitude is only used at the edges (layout tables, geodesics).

pub mod cap;
pub mod geodesic;

pub use cap::Cap;

/// A 3-D vector, normally of unit length
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Geographic coordinate in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Point) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Point) -> Point {
        Point::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Angle between the two vectors in radians, in [0, PI].
    /// atan2 form stays accurate for nearly identical and nearly opposite points.
    pub fn angle_to(&self, other: &Point) -> f64 {
        self.cross(other).norm().atan2(self.dot(other))
    }

    pub fn to_lat_lng(&self) -> LatLng {
        LatLng {
            lat: self.z.atan2((self.x * self.x + self.y * self.y).sqrt()).to_degrees(),
            lng: self.y.atan2(self.x).to_degrees(),
        }
    }
}

impl LatLng {
    pub const fn from_degrees(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn to_point(self) -> Point {
        let (lat, lng) = (self.lat.to_radians(), self.lng.to_radians());
        Point::new(lat.cos() * lng.cos(), lat.cos() * lng.sin(), lat.sin())
    }
}

pub fn north_pole() -> Point {
    LatLng::from_degrees(90.0, 0.0).to_point()
}

pub fn south_pole() -> Point {
    LatLng::from_degrees(-90.0, 0.0).to_point()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn angle_between_identical_points_is_zero() {
        let p = LatLng::from_degrees(12.5, -77.0).to_point();
        assert_eq!(p.angle_to(&p), 0.0);
        assert_eq!(north_pole().angle_to(&north_pole()), 0.0);
    }

    #[test]
    fn angle_between_reference_points() {
        let equator = LatLng::from_degrees(0.0, 0.0).to_point();
        assert!((north_pole().angle_to(&equator) - FRAC_PI_2).abs() < 1e-12);
        assert!((north_pole().angle_to(&south_pole()) - PI).abs() < 1e-12);
    }

    #[test]
    fn lat_lng_round_trip() {
        let ll = LatLng::from_degrees(-48.75, 135.0);
        let back = ll.to_point().to_lat_lng();
        assert!((back.lat - ll.lat).abs() < 1e-9);
        assert!((back.lng - ll.lng).abs() < 1e-9);
    }

    #[test]
    fn lat_lng_points_are_unit_length() {
        for lat in [-90.0, -30.0, 0.0, 45.0, 90.0] {
            for lng in [-180.0, -90.0, 0.0, 33.3, 180.0] {
                let p = LatLng::from_degrees(lat, lng).to_point();
                assert!((p.norm() - 1.0).abs() < 1e-12);
            }
        }
    }
}
