//! Warm colored caps sliding along geodesics, trailing a fading tail

use super::{Animation, FrameContext};
use crate::regions::{paint, MoverConfig, MoverField};
use crate::scene::Scene;

pub struct Movers {
    field: MoverField,
}

impl Movers {
    pub fn new(scene: &mut Scene) -> Self {
        Self::with_config(scene, MoverConfig::default())
    }

    pub fn with_config(scene: &mut Scene, config: MoverConfig) -> Self {
        let Scene { pixels, rng } = scene;
        Self { field: MoverField::new(config, pixels, rng) }
    }
}

impl Animation for Movers {
    fn name(&self) -> &'static str {
        "movers"
    }

    fn step(&mut self, scene: &mut Scene, ctx: &FrameContext) {
        let Scene { pixels, rng } = scene;
        self.field.step(ctx.delta, pixels, rng);
    }

    fn composite(&mut self, scene: &mut Scene, _ctx: &FrameContext) {
        paint(&mut scene.pixels, &self.field.layers());
    }
}
