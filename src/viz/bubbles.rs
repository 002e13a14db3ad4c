//! Bright caps that swell until they touch each other or get too big, then pop

use super::{Animation, FrameContext};
use crate::regions::{paint, GrowthField};
use crate::scene::Scene;
use crate::sphere::cap::FULL_SPHERE_AREA;

const COUNT: usize = 15;

/// Radians added to every radius per tick
const GROWTH: f64 = 0.005;

/// Roughly one pixel's share of the sphere
const INITIAL_AREA: f64 = FULL_SPHERE_AREA / 1000.0;

const MIN_CEILING: f64 = 0.05;

/// Used while var `A` is unset
const DEFAULT_CEILING: f64 = 1.0;

pub struct Bubbles {
    field: GrowthField,
}

impl Bubbles {
    pub fn new(scene: &mut Scene) -> Self {
        let Scene { pixels, rng } = scene;
        Self { field: GrowthField::new(COUNT, INITIAL_AREA, GROWTH, pixels, rng) }
    }
}

/// Map var `A` in [0, 1] onto an area ceiling in steradians
pub fn ceiling(a: f64) -> f64 {
    if a == 0.0 || !a.is_finite() {
        return DEFAULT_CEILING;
    }
    MIN_CEILING + a.clamp(0.0, 1.0) * (FULL_SPHERE_AREA - MIN_CEILING)
}

impl Animation for Bubbles {
    fn name(&self) -> &'static str {
        "bubbles"
    }

    fn step(&mut self, scene: &mut Scene, ctx: &FrameContext) {
        let ceiling = ceiling(ctx.params.get_var("A"));
        let Scene { pixels, rng } = scene;
        self.field.step(ceiling, pixels, rng);
    }

    fn composite(&mut self, scene: &mut Scene, _ctx: &FrameContext) {
        paint(&mut scene.pixels, &self.field.layers());
    }
}
