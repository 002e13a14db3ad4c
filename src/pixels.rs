//! Pixel geometry: where every LED sits on the sphere
//!
//! The display is 64 vertical strips (columns) of 20 LEDs (rows). Strips run
//! from the north pole down to the southern edge of the visible area, and
//! slots are ordered strip by strip, which is the order the controller
//! expects bytes on the wire. Rows near the pole are crowded, so only some
//! strips carry an LED there; the missing slots are disabled.

use crate::colors::Rgb;
use crate::error::{LedError, Result};
use crate::sphere::{LatLng, Point};
use rand::prelude::*;

pub const ROW_COUNT: usize = 20;
pub const COLUMN_COUNT: usize = 64;
pub const SLOT_COUNT: usize = ROW_COUNT * COLUMN_COUNT;

/// Nothing south of this latitude carries LEDs
pub const MIN_VISIBLE_LATITUDE: f64 = -48.75;

/// Populated strips per row, north to south
const ROW_POPULATION: [usize; ROW_COUNT] = [
    1, 17, 33, 48, 63, 64, 64, 64, 64, 64, //
    64, 64, 64, 64, 64, 64, 64, 64, 64, 64,
];

#[derive(Clone, Debug, PartialEq)]
pub struct Pixel {
    pub row: usize,
    pub column: usize,
    pub point: Point,
    pub enabled: bool,
    pub color: Rgb,
}

impl Pixel {
    pub fn new(row: usize, column: usize, point: Point) -> Self {
        Self { row, column, point, enabled: true, color: Rgb::BLACK }
    }

    /// A slot with no LED behind it
    pub fn disabled(row: usize, column: usize) -> Self {
        Self { row, column, point: Point::default(), enabled: false, color: Rgb::BLACK }
    }

    pub fn lat_lng(&self) -> LatLng {
        self.point.to_lat_lng()
    }
}

/// Latitude of a row in degrees
pub fn row_latitude(row: usize) -> f64 {
    let step = (90.0 - MIN_VISIBLE_LATITUDE) / (ROW_COUNT - 1) as f64;
    90.0 - row as f64 * step
}

/// Longitude of a column in degrees, in (-180, 180]
pub fn column_longitude(column: usize) -> f64 {
    let lng = column as f64 * 360.0 / COLUMN_COUNT as f64;
    if lng > 180.0 {
        lng - 360.0
    } else {
        lng
    }
}

/// Wire position of a slot
pub fn slot_index(row: usize, column: usize) -> usize {
    column * ROW_COUNT + row
}

/// Spread `populated` strips evenly over the row, always including strip 0
fn is_populated(column: usize, populated: usize) -> bool {
    (column * populated) % COLUMN_COUNT < populated
}

pub struct PixelMap {
    slots: Vec<Pixel>,
    active: Vec<usize>,
}

impl PixelMap {
    /// Build the compiled-in table for the globe
    pub fn load() -> Result<Self> {
        let mut slots = Vec::with_capacity(SLOT_COUNT);
        for column in 0..COLUMN_COUNT {
            for (row, &populated) in ROW_POPULATION.iter().enumerate() {
                if is_populated(column, populated) {
                    let point = LatLng::from_degrees(row_latitude(row), column_longitude(column)).to_point();
                    slots.push(Pixel::new(row, column, point));
                } else {
                    slots.push(Pixel::disabled(row, column));
                }
            }
        }
        Self::from_slots(slots)
    }

    /// Fails when no slot is enabled: nothing could ever be animated.
    pub fn from_slots(slots: Vec<Pixel>) -> Result<Self> {
        let active: Vec<usize> = slots
            .iter()
            .enumerate()
            .filter(|(_, p)| p.enabled)
            .map(|(i, _)| i)
            .collect();
        if active.is_empty() {
            return Err(LedError::Geometry(format!("none of {} pixel slots is enabled", slots.len())));
        }
        Ok(Self { slots, active })
    }

    /// Every slot in wire order
    pub fn all(&self) -> &[Pixel] {
        &self.slots
    }

    pub fn active(&self) -> impl Iterator<Item = &Pixel> + '_ {
        self.active.iter().map(move |&i| &self.slots[i])
    }

    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut Pixel> + '_ {
        self.slots.iter_mut().filter(|p| p.enabled)
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Unit-sphere points of the enabled pixels, in slot order
    pub fn active_points(&self) -> Vec<Point> {
        self.active().map(|p| p.point).collect()
    }

    pub fn random_active<R: Rng>(&self, rng: &mut R) -> &Pixel {
        &self.slots[self.active[rng.gen_range(0..self.active.len())]]
    }

    pub fn row(&self, row: usize) -> impl Iterator<Item = &Pixel> + '_ {
        self.active().filter(move |p| p.row == row)
    }

    pub fn column(&self, column: usize) -> impl Iterator<Item = &Pixel> + '_ {
        self.active().filter(move |p| p.column == column)
    }

    /// Color buffer in wire order; disabled slots are always black
    pub fn colors(&self) -> Vec<Rgb> {
        self.slots
            .iter()
            .map(|p| if p.enabled { p.color } else { Rgb::BLACK })
            .collect()
    }

    /// Clear every active pixel back to the unset color
    pub fn reset(&mut self) {
        for pixel in self.active_mut() {
            pixel.color = Rgb::BLACK;
        }
    }
}
