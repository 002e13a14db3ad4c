//! Simplex noise drifting over the sphere, colored through the live gradient

use super::{seed_gradient_defaults, Animation, FrameContext};
use crate::gradient::{GradientTable, GRADIENT_KEYS};
use crate::normalizer::NoiseNormalizer;
use crate::params::ParamStore;
use crate::scene::Scene;
use crate::sphere::Point;
use noise::{NoiseFn, OpenSimplex};
use rand::prelude::*;
use rayon::prelude::*;
use tracing::debug;

/// Noise time advances this many times slower than wall time
const TIME_SCALE: f64 = 10.0;

/// Frames between histogram reports
const REPORT_EVERY: u64 = 1000;

/// Stateless signal sampled once per pixel per tick
pub trait SignalSource: Sync {
    fn sample(&self, x: f64, y: f64, z: f64, t: f64) -> f64;
}

impl SignalSource for OpenSimplex {
    fn sample(&self, x: f64, y: f64, z: f64, t: f64) -> f64 {
        self.get([x, y, z, t])
    }
}

pub struct Simplex<S: SignalSource = OpenSimplex> {
    source: S,
    points: Vec<Point>,
    samples: Vec<f64>,
    normalizer: NoiseNormalizer,
}

impl Simplex<OpenSimplex> {
    pub fn new(scene: &mut Scene, params: &ParamStore) -> Self {
        let source = OpenSimplex::new(scene.rng.gen());
        Self::with_source(source, scene, params)
    }
}

impl<S: SignalSource> Simplex<S> {
    pub fn with_source(source: S, scene: &Scene, params: &ParamStore) -> Self {
        seed_gradient_defaults(params);
        let points = scene.pixels.active_points();
        Self {
            source,
            samples: Vec::with_capacity(points.len()),
            normalizer: NoiseNormalizer::for_pixels(points.len()),
            points,
        }
    }

    pub fn normalizer(&self) -> &NoiseNormalizer {
        &self.normalizer
    }
}

impl<S: SignalSource> Animation for Simplex<S> {
    fn name(&self) -> &'static str {
        "simplex"
    }

    fn step(&mut self, _scene: &mut Scene, ctx: &FrameContext) {
        let t = ctx.elapsed / TIME_SCALE;
        let source = &self.source;
        self.samples = self
            .points
            .par_iter()
            .map(|p| source.sample(p.x, p.y, p.z, t))
            .collect();
    }

    fn composite(&mut self, scene: &mut Scene, ctx: &FrameContext) {
        let table = GradientTable::from_params(ctx.params, &GRADIENT_KEYS);
        for (pixel, &sample) in scene.pixels.active_mut().zip(&self.samples) {
            pixel.color = table.at(self.normalizer.normalize(sample));
        }

        if ctx.frame > 0 && ctx.frame % REPORT_EVERY == 0 {
            if let Some(summary) = self.normalizer.histogram().summary() {
                debug!(frame = ctx.frame, min = self.normalizer.min(), max = self.normalizer.max(), "noise histogram {}", summary);
            }
        }
    }
}
