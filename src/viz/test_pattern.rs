//! Wiring check: light each row in turn in red, then green, then blue,
//! then each column the same way

use super::{Animation, FrameContext};
use crate::colors::Rgb;
use crate::pixels::{COLUMN_COUNT, ROW_COUNT};
use crate::scene::Scene;

const STEP_MS: f64 = 50.0;
const ROW_STEPS: usize = ROW_COUNT * COLORS.len();
const SWEEP: usize = ROW_STEPS + COLUMN_COUNT * COLORS.len();
const COLORS: [Rgb; 3] = [Rgb::RED, Rgb::GREEN, Rgb::BLUE];

pub struct TestPattern;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lit {
    Row(usize),
    Column(usize),
}

/// Which line is lit, and in what color, after `elapsed` seconds
pub fn lit_at(elapsed: f64) -> (Lit, Rgb) {
    let step = (elapsed.max(0.0) * 1000.0 / STEP_MS) as usize % SWEEP;
    if step < ROW_STEPS {
        (Lit::Row(step % ROW_COUNT), COLORS[step / ROW_COUNT])
    } else {
        let k = step - ROW_STEPS;
        (Lit::Column(k % COLUMN_COUNT), COLORS[k / COLUMN_COUNT])
    }
}

impl Animation for TestPattern {
    fn name(&self) -> &'static str {
        "test-pattern"
    }

    fn step(&mut self, _scene: &mut Scene, _ctx: &FrameContext) {}

    fn composite(&mut self, scene: &mut Scene, ctx: &FrameContext) {
        let (lit, color) = lit_at(ctx.elapsed);
        for pixel in scene.pixels.active_mut() {
            let on = match lit {
                Lit::Row(r) => pixel.row == r,
                Lit::Column(c) => pixel.column == c,
            };
            if on {
                pixel.color = color;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamStore;
    use crate::viz::testing;

    #[test]
    fn sweep_order() {
        assert_eq!(lit_at(0.0), (Lit::Row(0), Rgb::RED));
        assert_eq!(lit_at(0.06), (Lit::Row(1), Rgb::RED));
        // every row goes through all three colors before any column lights
        assert_eq!(lit_at(1.01), (Lit::Row(0), Rgb::GREEN));
        assert_eq!(lit_at(2.96), (Lit::Row(19), Rgb::BLUE));
        assert_eq!(lit_at(3.01), (Lit::Column(0), Rgb::RED));
        assert_eq!(lit_at(6.21), (Lit::Column(0), Rgb::GREEN));
        assert_eq!(lit_at(SWEEP as f64 * 0.05 + 0.01), (Lit::Row(0), Rgb::RED));
    }

    #[test]
    fn lights_exactly_one_column() {
        let params = ParamStore::new();
        let mut scene = testing::scene(9);
        let colors = testing::render(&mut TestPattern, &mut scene, &testing::ctx(&params, 0, 3.26));
        let lit: Vec<usize> = scene
            .pixels
            .all()
            .iter()
            .zip(&colors)
            .filter(|(_, c)| **c != Rgb::BLACK)
            .map(|(p, _)| p.column)
            .collect();
        assert!(!lit.is_empty());
        assert!(lit.iter().all(|&c| c == 5));
    }
}
