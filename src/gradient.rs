//! Gradient tables: ordered color stops sampled by a scalar

use crate::colors::Rgb;
use crate::params::ParamStore;

/// Parameter names holding the four stops of the live gradient.
/// Each name is used both as a color key and as a position var.
pub const GRADIENT_KEYS: [&str; 4] = ["A", "B", "C", "D"];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stop {
    pub color: Rgb,
    pub pos: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GradientTable {
    stops: Vec<Stop>,
}

impl GradientTable {
    /// Stops are sorted by position (stable, so duplicates keep their order);
    /// stops with a non-finite position are dropped.
    pub fn new(stops: impl IntoIterator<Item = Stop>) -> Self {
        let mut stops: Vec<Stop> = stops.into_iter().filter(|s| s.pos.is_finite()).collect();
        stops.sort_by(|a, b| a.pos.total_cmp(&b.pos));
        Self { stops }
    }

    /// Snapshot the current (color, var) pairs from the store
    pub fn from_params(params: &ParamStore, keys: &[&str]) -> Self {
        Self::new(keys.iter().map(|key| Stop {
            color: params.get_color(key),
            pos: params.get_var(key),
        }))
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Color at `t`, clamped to the end stops outside their range
    pub fn at(&self, t: f64) -> Rgb {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Rgb::BLACK,
        };
        if t.is_nan() || t <= first.pos {
            return first.color;
        }
        if t >= last.pos {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (lo, hi) = (&pair[0], &pair[1]);
            if lo.pos <= t && t <= hi.pos {
                return match bracket_weight(lo.pos, hi.pos, t) {
                    Some(w) => lo.color.blend_oklab(hi.color, w),
                    None => lo.color,
                };
            }
        }
        last.color
    }
}

/// Linear position of `t` inside [lo, hi]; `None` for a zero-width bracket
fn bracket_weight(lo: f64, hi: f64, t: f64) -> Option<f64> {
    let span = hi - lo;
    if span <= 0.0 {
        return None;
    }
    Some((t - lo) / span)
}
