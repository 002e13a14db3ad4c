//! Travel along the WGS84 ellipsoid
//!
//! Distances are kilometres, bearings are degrees clockwise from north.

use super::{LatLng, Point};
use std::f64::consts::PI;

/// WGS84 semi-major axis in km
const SEMI_MAJOR: f64 = 6378.137;
/// WGS84 flattening
const FLATTENING: f64 = 1.0 / 298.257223563;
const SEMI_MINOR: f64 = SEMI_MAJOR * (1.0 - FLATTENING);

const MAX_ITERATIONS: usize = 100;
const CONVERGENCE: f64 = 1e-12;

/// Relative tolerance used by [`float_approx_eq`]
pub const EPSILON: f64 = 0.00001;

/// Destination reached by travelling `distance` km from `start` along `bearing`.
///
/// Uses Vincenty's direct formula; the result is projected back onto the unit sphere.
pub fn translate(start: Point, distance: f64, bearing: f64) -> Point {
    let start = start.to_lat_lng();
    destination(start, distance, bearing).to_point()
}

/// Lat/long form of [`translate`]
pub fn destination(start: LatLng, distance: f64, bearing: f64) -> LatLng {
    let phi1 = start.lat.to_radians();
    let lambda1 = start.lng.to_radians();
    let alpha1 = bearing.to_radians();
    let (sin_alpha1, cos_alpha1) = alpha1.sin_cos();

    let tan_u1 = (1.0 - FLATTENING) * phi1.tan();
    let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
    let sin_u1 = tan_u1 * cos_u1;

    let sigma1 = tan_u1.atan2(cos_alpha1);
    let sin_alpha = cos_u1 * sin_alpha1;
    let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
    let u_sq = cos_sq_alpha * (SEMI_MAJOR * SEMI_MAJOR - SEMI_MINOR * SEMI_MINOR)
        / (SEMI_MINOR * SEMI_MINOR);
    let a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

    let base = distance / (SEMI_MINOR * a);
    let mut sigma = base;
    for _ in 0..MAX_ITERATIONS {
        let next = base + sigma_correction(sigma1, sigma, b);
        let converged = (next - sigma).abs() < CONVERGENCE;
        sigma = next;
        if converged {
            break;
        }
    }
    let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
    let (sin_sigma, cos_sigma) = sigma.sin_cos();

    let x = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
    let phi2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
        .atan2((1.0 - FLATTENING) * (sin_alpha * sin_alpha + x * x).sqrt());
    let lambda = (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
    let c = FLATTENING / 16.0 * cos_sq_alpha * (4.0 + FLATTENING * (4.0 - 3.0 * cos_sq_alpha));
    let l = lambda
        - (1.0 - c)
            * FLATTENING
            * sin_alpha
            * (sigma + c * sin_sigma * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));
    let lambda2 = (lambda1 + l + PI).rem_euclid(2.0 * PI) - PI;

    LatLng::from_degrees(phi2.to_degrees(), lambda2.to_degrees())
}

fn sigma_correction(sigma1: f64, sigma: f64, b: f64) -> f64 {
    let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
    let (sin_sigma, cos_sigma) = sigma.sin_cos();
    b * sin_sigma
        * (cos_2sigma_m
            + b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                    - b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)))
}

/// The opposite compass direction, normalized into [0, 360)
pub fn reverse_bearing(bearing: f64) -> f64 {
    (bearing + 180.0).rem_euclid(360.0)
}

/// Equality within a relative tolerance of [`EPSILON`]
pub fn float_approx_eq(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() / a.abs() < EPSILON
}
