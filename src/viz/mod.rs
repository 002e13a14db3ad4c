//! Animations
//!
//! Each animation is its own module. The render loop calls `step` to advance
//! state for the current tick, then `composite` to color the active pixels.
//! Pixels come in cleared every tick.

pub mod bubbles;
pub mod movers;
pub mod simplex;
pub mod test_pattern;

use crate::colors::Rgb;
use crate::config::AnimationKind;
use crate::gradient::GRADIENT_KEYS;
use crate::params::ParamStore;
use crate::scene::Scene;

/// What an animation may know about the current tick
pub struct FrameContext<'a> {
    /// Seconds since the animation started
    pub elapsed: f64,
    /// Seconds since the previous tick
    pub delta: f64,
    pub frame: u64,
    pub params: &'a ParamStore,
}

pub trait Animation {
    fn name(&self) -> &'static str;

    /// Advance internal state (regions, noise samples) for this tick
    fn step(&mut self, scene: &mut Scene, ctx: &FrameContext);

    /// Set the color of every active pixel this animation covers
    fn composite(&mut self, scene: &mut Scene, ctx: &FrameContext);
}

pub fn build(kind: AnimationKind, scene: &mut Scene, params: &ParamStore) -> Box<dyn Animation> {
    match kind {
        AnimationKind::Simplex => Box::new(simplex::Simplex::new(scene, params)),
        AnimationKind::Movers => Box::new(movers::Movers::new(scene)),
        AnimationKind::Bubbles => Box::new(bubbles::Bubbles::new(scene)),
        AnimationKind::GradientTest => Box::new(gradient_test::GradientTest::new(params)),
        AnimationKind::BrightnessTest => Box::new(brightness_test::BrightnessTest),
        AnimationKind::TestPattern => Box::new(test_pattern::TestPattern),
    }
}

/// Stop colors and positions for the live gradient: dark red fading to black,
/// a long black stretch, then dark blue.
pub fn seed_gradient_defaults(params: &ParamStore) {
    let stops = [
        (Rgb::from_hsv(0.0, 1.0, 0.3), 0.0),
        (Rgb::from_hsv(0.0, 1.0, 0.0), 0.1),
        (Rgb::from_hsv(234.0, 0.0, 0.0), 0.9),
        (Rgb::from_hsv(234.0, 1.0, 0.3), 1.0),
    ];
    for (key, (color, pos)) in GRADIENT_KEYS.iter().zip(stops) {
        params.set_color(key, color);
        params.set_var(key, pos);
    }
}
