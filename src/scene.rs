//! Per-process animation world, owned by the render loop

use crate::pixels::PixelMap;
use rand::prelude::*;

/// Everything an animation may mutate during a tick
pub struct Scene {
    pub pixels: PixelMap,
    pub rng: StdRng,
}

impl Scene {
    /// A fixed seed makes every animation reproducible
    pub fn new(pixels: PixelMap, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { pixels, rng }
    }
}
