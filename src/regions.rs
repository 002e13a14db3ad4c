//! Region simulation: growing bubbles and directed movers
//!
//! Both strategies keep their regions as plain [`Cap`] values and rebuild a cap
//! whenever it grows or moves. A region that dies is replaced wholesale.

use crate::colors::Rgb;
use crate::pixels::PixelMap;
use crate::sphere::geodesic::{float_approx_eq, translate};
use crate::sphere::{Cap, Point};
use rand::prelude::*;
use std::collections::VecDeque;
use std::ops::Range;

/// Candidates drawn before an overlapping spawn is accepted
pub const MAX_SPAWN_ATTEMPTS: usize = 100;

/// A new center keeps this many radii away from every live center
pub const CLEARANCE_FACTOR: f64 = 3.0;

/// Outcome of [`spawn_clear_of`]
#[derive(Clone, Copy, Debug)]
pub struct SpawnSite {
    pub center: Point,
    pub attempts: usize,
    /// False when the attempt bound ran out and the last candidate overlaps
    pub clear: bool,
}

/// Draw centers from `sample` until one sits at least
/// `CLEARANCE_FACTOR * max(r_live, radius)` from every live center.
pub fn spawn_clear_of<F>(mut sample: F, radius: f64, live: &[Cap]) -> SpawnSite
where
    F: FnMut() -> Point,
{
    let mut center = sample();
    for attempt in 1..=MAX_SPAWN_ATTEMPTS {
        let clear = live.iter().all(|cap| {
            cap.center().angle_to(&center) >= CLEARANCE_FACTOR * cap.radius().max(radius)
        });
        if clear {
            return SpawnSite { center, attempts: attempt, clear: true };
        }
        if attempt < MAX_SPAWN_ATTEMPTS {
            center = sample();
        }
    }
    SpawnSite { center, attempts: MAX_SPAWN_ATTEMPTS, clear: false }
}

/// One colored cap to paint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layer {
    pub cap: Cap,
    pub color: Rgb,
}

/// Color every active pixel covered by a layer. Layers are applied in order,
/// so a later layer wins where several overlap.
pub fn paint(pixels: &mut PixelMap, layers: &[Layer]) {
    for pixel in pixels.active_mut() {
        for layer in layers {
            if layer.cap.contains(&pixel.point) {
                pixel.color = layer.color;
            }
        }
    }
}

// ============================================================================
// Growth and pop
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bubble {
    pub cap: Cap,
    pub color: Rgb,
}

/// Regions that grow every tick and pop when they hit the area ceiling or
/// touch each other.
///
/// Collision policy: of two touching bubbles the one with the smaller area
/// pops; on equal areas the later one (higher index) pops. Bubbles already
/// popped by the ceiling take no part in collisions that tick.
pub struct GrowthField {
    bubbles: Vec<Bubble>,
    initial_area: f64,
    growth: f64,
}

impl GrowthField {
    pub fn new<R: Rng>(count: usize, initial_area: f64, growth: f64, pixels: &PixelMap, rng: &mut R) -> Self {
        let mut field = Self { bubbles: Vec::with_capacity(count), initial_area, growth };
        for _ in 0..count {
            let live: Vec<Cap> = field.bubbles.iter().map(|b| b.cap).collect();
            let bubble = field.spawn(&live, pixels, rng);
            field.bubbles.push(bubble);
        }
        field
    }

    /// Build from explicit bubbles (tests, replays)
    pub fn from_bubbles(bubbles: Vec<Bubble>, initial_area: f64, growth: f64) -> Self {
        Self { bubbles, initial_area, growth }
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    fn spawn<R: Rng>(&self, live: &[Cap], pixels: &PixelMap, rng: &mut R) -> Bubble {
        let radius = Cap::from_center_area(Point::default(), self.initial_area).radius();
        let site = spawn_clear_of(|| pixels.random_active(rng).point, radius, live);
        Bubble {
            cap: Cap::from_center_area(site.center, self.initial_area),
            color: Rgb::happy(rng),
        }
    }

    /// Indices of the bubbles that pop this tick, in index order
    pub fn popped(&self, ceiling: f64) -> Vec<usize> {
        let mut doomed: Vec<bool> = self.bubbles.iter().map(|b| b.cap.area() >= ceiling).collect();
        let mut collided = vec![false; self.bubbles.len()];

        for i in 0..self.bubbles.len() {
            for j in (i + 1)..self.bubbles.len() {
                if doomed[i] || doomed[j] {
                    continue;
                }
                let (a, b) = (&self.bubbles[i].cap, &self.bubbles[j].cap);
                if a.intersects(b) {
                    let loser = if a.area() < b.area() { i } else { j };
                    collided[loser] = true;
                }
            }
        }
        for (d, c) in doomed.iter_mut().zip(collided) {
            *d |= c;
        }
        doomed.iter().enumerate().filter(|&(_, &d)| d).map(|(i, _)| i).collect()
    }

    /// Grow every bubble, then replace the ones that popped.
    /// Returns how many were replaced.
    pub fn step<R: Rng>(&mut self, ceiling: f64, pixels: &PixelMap, rng: &mut R) -> usize {
        for bubble in &mut self.bubbles {
            bubble.cap = bubble.cap.expanded(self.growth);
        }

        let popped = self.popped(ceiling);
        let mut live: Vec<Cap> = self
            .bubbles
            .iter()
            .enumerate()
            .filter(|(i, _)| popped.binary_search(i).is_err())
            .map(|(_, b)| b.cap)
            .collect();
        for &i in &popped {
            let bubble = self.spawn(&live, pixels, rng);
            live.push(bubble.cap);
            self.bubbles[i] = bubble;
        }
        popped.len()
    }

    pub fn layers(&self) -> Vec<Layer> {
        self.bubbles.iter().map(|b| Layer { cap: b.cap, color: b.color }).collect()
    }
}

// ============================================================================
// Directed movement
// ============================================================================

#[derive(Clone, Debug)]
pub struct MoverConfig {
    pub count: usize,
    /// km/s
    pub speed: Range<f64>,
    /// km
    pub distance: Range<f64>,
    /// Cap area in steradians
    pub area: f64,
    pub tail_len: usize,
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            count: 20,
            speed: 10_000.0..20_000.0,
            distance: 20_000.0..120_000.0,
            area: 0.05,
            tail_len: 8,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Mover {
    cap: Cap,
    start: Point,
    speed: f64,
    bearing: f64,
    total_distance: Option<f64>,
    distance_so_far: f64,
    base_color: Rgb,
    color: Rgb,
    done: bool,
    tail: VecDeque<Layer>,
    tail_len: usize,
}

impl Mover {
    pub fn new(
        start: Point,
        area: f64,
        speed: f64,
        bearing: f64,
        total_distance: Option<f64>,
        color: Rgb,
        tail_len: usize,
    ) -> Self {
        Self {
            cap: Cap::from_center_area(start, area),
            start,
            speed,
            bearing,
            total_distance,
            distance_so_far: 0.0,
            base_color: color,
            color,
            done: false,
            tail: VecDeque::with_capacity(tail_len + 1),
            tail_len,
        }
    }

    /// Random start pixel, bearing in tenths of a degree, warm color
    pub fn random<R: Rng>(config: &MoverConfig, pixels: &PixelMap, rng: &mut R) -> Self {
        let start = pixels.random_active(rng).point;
        let bearing = rng.gen_range(0..3600) as f64 / 10.0;
        let speed = rng.gen_range(config.speed.clone());
        let distance = rng.gen_range(config.distance.clone());
        Self::new(start, config.area, speed, bearing, Some(distance), Rgb::warm(rng), config.tail_len)
    }

    pub fn cap(&self) -> Cap {
        self.cap
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn distance_so_far(&self) -> f64 {
        self.distance_so_far
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Travel for `dt` seconds from the fixed start point.
    /// The previous position is kept in the tail before moving.
    pub fn advance(&mut self, dt: f64) {
        if self.done {
            return;
        }
        if self.tail_len > 0 {
            self.tail.push_back(Layer { cap: self.cap, color: self.color });
            while self.tail.len() > self.tail_len {
                self.tail.pop_front();
            }
        }

        let mut travelled = self.distance_so_far + self.speed * dt;
        if let Some(total) = self.total_distance {
            if travelled >= total || float_approx_eq(travelled, total) {
                travelled = total;
                self.done = true;
            }
            let frac = if total > 0.0 { (travelled / total).clamp(0.0, 1.0) } else { 1.0 };
            let (h, s, v) = self.base_color.to_hsv();
            self.color = Rgb::from_hsv(h, s, v * (1.0 - frac) + 0.01).clamped();
        }
        self.distance_so_far = travelled;
        self.cap = self.cap.with_center(translate(self.start, travelled, self.bearing));
    }

    /// Tail snapshots faded toward black, oldest first, then the head.
    /// Entry `i` of a `K` long tail carries weight `i / K`; weight 0 is skipped.
    pub fn layers(&self) -> impl Iterator<Item = Layer> + '_ {
        let k = self.tail_len.max(1) as f64;
        self.tail
            .iter()
            .enumerate()
            .filter(|(i, _)| *i > 0)
            .map(move |(i, entry)| Layer {
                cap: entry.cap,
                color: Rgb::BLACK.blend_oklab(entry.color, i as f64 / k),
            })
            .chain(std::iter::once(Layer { cap: self.cap, color: self.color }))
    }
}

pub struct MoverField {
    movers: Vec<Mover>,
    config: MoverConfig,
}

impl MoverField {
    pub fn new<R: Rng>(config: MoverConfig, pixels: &PixelMap, rng: &mut R) -> Self {
        let movers = (0..config.count).map(|_| Mover::random(&config, pixels, rng)).collect();
        Self { movers, config }
    }

    pub fn from_movers(movers: Vec<Mover>, config: MoverConfig) -> Self {
        Self { movers, config }
    }

    pub fn movers(&self) -> &[Mover] {
        &self.movers
    }

    /// Movers that finished last tick are replaced (and stay put this tick);
    /// the rest advance by `dt` seconds.
    pub fn step<R: Rng>(&mut self, dt: f64, pixels: &PixelMap, rng: &mut R) {
        for mover in &mut self.movers {
            if mover.is_done() {
                *mover = Mover::random(&self.config, pixels, rng);
            } else {
                mover.advance(dt);
            }
        }
    }

    pub fn layers(&self) -> Vec<Layer> {
        self.movers.iter().flat_map(|m| m.layers()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::{north_pole, LatLng};

    fn pixels() -> PixelMap {
        PixelMap::load().unwrap()
    }

    fn equator(lng: f64) -> Point {
        LatLng::from_degrees(0.0, lng).to_point()
    }

    #[test]
    fn mover_budget_caps_and_respawns() {
        let pixels = pixels();
        let mut rng = StdRng::seed_from_u64(1);
        let mover = Mover::new(equator(0.0), 0.05, 40.0, 90.0, Some(100.0), Rgb::RED, 0);
        let mut field = MoverField::from_movers(vec![mover], MoverConfig { count: 1, ..MoverConfig::default() });

        let mut seen = Vec::new();
        for _ in 0..3 {
            field.step(1.0, &pixels, &mut rng);
            let m = &field.movers()[0];
            seen.push((m.distance_so_far(), m.is_done()));
        }
        assert_eq!(seen, vec![(40.0, false), (80.0, false), (100.0, true)]);

        field.step(1.0, &pixels, &mut rng);
        let fresh = &field.movers()[0];
        assert_eq!(fresh.distance_so_far(), 0.0);
        assert!(!fresh.is_done());
    }

    #[test]
    fn mover_travels_along_bearing() {
        let mut m = Mover::new(equator(0.0), 0.05, 111.319490793, 90.0, None, Rgb::RED, 0);
        m.advance(1.0);
        let ll = m.cap().center().to_lat_lng();
        assert!(ll.lat.abs() < 1e-6);
        assert!((ll.lng - 1.0).abs() < 1e-6);
        assert!((m.cap().area() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn mover_fades_with_distance() {
        let mut m = Mover::new(equator(0.0), 0.05, 50.0, 0.0, Some(100.0), Rgb::RED, 0);
        m.advance(1.0);
        let (_, _, v) = m.color().to_hsv();
        assert!((v - 0.51).abs() < 1e-9);
        m.advance(1.0);
        let (_, _, v) = m.color().to_hsv();
        assert!((v - 0.01).abs() < 1e-9);
    }

    #[test]
    fn tail_is_oldest_first_and_bounded() {
        let mut m = Mover::new(equator(0.0), 0.01, 100.0, 90.0, None, Rgb::RED, 4);
        for _ in 0..10 {
            m.advance(1.0);
        }
        let layers: Vec<Layer> = m.layers().collect();
        // Four snapshots, the zero-weight oldest one skipped, then the head
        assert_eq!(layers.len(), 4);
        let lngs: Vec<f64> = layers.iter().map(|l| l.cap.center().to_lat_lng().lng).collect();
        assert!(lngs.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(layers.last().unwrap().color, m.color());
        let brightness: Vec<f64> = layers.iter().map(|l| l.color.to_hsv().2).collect();
        assert!(brightness.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn spawned_centers_keep_clearance() {
        let pixels = pixels();
        let mut rng = StdRng::seed_from_u64(9);
        let radii = [0.02, 0.12, 0.05];
        let mut live: Vec<Cap> = Vec::new();
        let mut cleared = 0;
        for i in 0..9 {
            let radius = radii[i % radii.len()];
            let site = spawn_clear_of(|| pixels.random_active(&mut rng).point, radius, &live);
            if site.clear {
                cleared += 1;
                for cap in &live {
                    let d = cap.center().angle_to(&site.center);
                    assert!(d >= CLEARANCE_FACTOR * cap.radius(), "too close to a larger cap");
                    assert!(d >= CLEARANCE_FACTOR * radius, "too close for the new cap");
                }
            }
            live.push(Cap::new(site.center, radius));
        }
        assert!(cleared > 0);
    }

    #[test]
    fn clearance_uses_the_larger_radius() {
        let live = [Cap::new(equator(0.0), 0.2), Cap::new(equator(90.0), 0.02)];
        // 25 degrees clears 3 * 0.1 but not 3 * 0.2 around the large cap;
        // 10 degrees clears 3 * 0.02 but not 3 * 0.1 around the small one.
        let mut candidates = [equator(25.0), equator(80.0), equator(180.0)].into_iter();
        let site = spawn_clear_of(|| candidates.next().unwrap_or_else(north_pole), 0.1, &live);
        assert!(site.clear);
        assert_eq!(site.attempts, 3);
        assert!(site.center.angle_to(&equator(180.0)) < 1e-9);
    }

    #[test]
    fn spawn_gives_up_after_bound() {
        let live = [Cap::new(north_pole(), 0.5)];
        let mut calls = 0;
        let site = spawn_clear_of(
            || {
                calls += 1;
                north_pole()
            },
            0.1,
            &live,
        );
        assert!(!site.clear);
        assert_eq!(site.attempts, MAX_SPAWN_ATTEMPTS);
        assert_eq!(calls, MAX_SPAWN_ATTEMPTS);
    }

    #[test]
    fn smaller_bubble_pops_on_collision() {
        let big = Bubble { cap: Cap::new(equator(0.0), 0.3), color: Rgb::RED };
        let small = Bubble { cap: Cap::new(equator(20.0), 0.1), color: Rgb::GREEN };
        let apart = Bubble { cap: Cap::new(equator(180.0), 0.1), color: Rgb::BLUE };
        let field = GrowthField::from_bubbles(vec![small, big, apart], 0.01, 0.0);
        assert_eq!(field.popped(10.0), vec![0]);

        let twin = Bubble { cap: Cap::new(equator(20.0), 0.3), color: Rgb::GREEN };
        let field = GrowthField::from_bubbles(vec![big, twin], 0.01, 0.0);
        assert_eq!(field.popped(10.0), vec![1]);
    }

    #[test]
    fn ceiling_pops_before_collisions() {
        let huge = Bubble { cap: Cap::new(equator(0.0), 1.0), color: Rgb::RED };
        let small = Bubble { cap: Cap::new(equator(20.0), 0.1), color: Rgb::GREEN };
        let field = GrowthField::from_bubbles(vec![huge, small], 0.01, 0.0);
        // The huge bubble is over the ceiling, so the small one survives
        assert_eq!(field.popped(1.0), vec![0]);
    }

    #[test]
    fn bubbles_grow_and_respawn_small() {
        let pixels = pixels();
        let mut rng = StdRng::seed_from_u64(5);
        let initial = 4.0 * std::f64::consts::PI / 1000.0;
        let mut field = GrowthField::new(3, initial, 0.005, &pixels, &mut rng);
        let before: Vec<f64> = field.bubbles().iter().map(|b| b.cap.radius()).collect();
        field.step(100.0, &pixels, &mut rng);
        for (b, r) in field.bubbles().iter().zip(before) {
            assert!((b.cap.radius() - (r + 0.005)).abs() < 1e-12 || (b.cap.area() - initial).abs() < 1e-9);
        }

        let replaced = field.step(0.0, &pixels, &mut rng);
        assert_eq!(replaced, 3);
        for b in field.bubbles() {
            assert!((b.cap.area() - initial).abs() < 1e-9);
        }
    }

    #[test]
    fn later_layers_win() {
        let mut pixels = pixels();
        let cap = Cap::new(north_pole(), 0.2);
        paint(&mut pixels, &[Layer { cap, color: Rgb::RED }, Layer { cap, color: Rgb::BLUE }]);
        let inside: Vec<Rgb> = pixels.active().filter(|p| cap.contains(&p.point)).map(|p| p.color).collect();
        assert!(!inside.is_empty());
        assert!(inside.iter().all(|&c| c == Rgb::BLUE));
        assert!(pixels.active().filter(|p| !cap.contains(&p.point)).all(|p| p.color == Rgb::BLACK));
    }
}
