use crate::settings::Settings;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Animations available to `run`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationKind {
    Simplex,        // Noise through the live gradient
    Movers,         // Caps travelling along geodesics
    Bubbles,        // Growing caps that pop
    GradientTest,   // Red below a latitude from var A
    BrightnessTest, // Red ramp by column
    TestPattern,    // Row and column sweep for wiring checks
}

impl AnimationKind {
    pub const ALL: [AnimationKind; 6] = [
        AnimationKind::Simplex,
        AnimationKind::Movers,
        AnimationKind::Bubbles,
        AnimationKind::GradientTest,
        AnimationKind::BrightnessTest,
        AnimationKind::TestPattern,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "simplex" | "noise" => Some(AnimationKind::Simplex),
            "movers" | "mover" => Some(AnimationKind::Movers),
            "bubbles" | "bubble" => Some(AnimationKind::Bubbles),
            "gradient-test" | "gradient" => Some(AnimationKind::GradientTest),
            "brightness-test" | "brightness" => Some(AnimationKind::BrightnessTest),
            "test-pattern" | "test" => Some(AnimationKind::TestPattern),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnimationKind::Simplex => "simplex",
            AnimationKind::Movers => "movers",
            AnimationKind::Bubbles => "bubbles",
            AnimationKind::GradientTest => "gradient-test",
            AnimationKind::BrightnessTest => "brightness-test",
            AnimationKind::TestPattern => "test-pattern",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AnimationKind::Simplex => "4-D simplex noise mapped through gradient stops A-D",
            AnimationKind::Movers => "warm caps sliding along geodesics with fading tails",
            AnimationKind::Bubbles => "bright caps that grow until they touch or reach the size set by var A",
            AnimationKind::GradientTest => "red south of the latitude set by var A",
            AnimationKind::BrightnessTest => "red ramp from column 0 to column 63",
            AnimationKind::TestPattern => "one row then one column at a time in red, green, blue",
        }
    }
}

/// Serial link parameters for the output stage
#[derive(Clone, Debug)]
pub struct SerialConfig {
    pub port: Option<PathBuf>,
    pub baud: u32,
    pub vendor_id: u16,
    pub product_id: u16,
    pub retry: Duration,
    pub write_timeout: Duration,
}

/// Command line values that take precedence over the settings file
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub animation: Option<String>,
    pub preview: bool,
    pub port: Option<PathBuf>,
    pub brightness: Option<f64>,
    pub seed: Option<u64>,
    pub fps: Option<f64>,
    pub bind: Option<String>,
    pub no_control: bool,
}

/// Configuration for one `run`
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub animation: AnimationKind,
    pub preview: bool,
    pub serial: SerialConfig,
    pub brightness: f64,
    /// Target frames per second; 0 runs as fast as the output accepts frames
    pub fps: f64,
    pub seed: Option<u64>,
    /// Control surface address, `None` when disabled
    pub control: Option<String>,
}

impl RunConfig {
    pub fn resolve(settings: &Settings, overrides: Overrides) -> Self {
        let name = overrides.animation.unwrap_or_else(|| settings.render.animation.clone());
        let animation = AnimationKind::from_name(&name).unwrap_or_else(|| {
            let available: Vec<&str> = AnimationKind::ALL.iter().map(|k| k.name()).collect();
            warn!(animation = %name, available = %available.join(", "), "unknown animation, using simplex");
            AnimationKind::Simplex
        });

        let output = &settings.output;
        let serial = SerialConfig {
            port: overrides.port.or_else(|| output.port.clone()),
            baud: output.baud,
            vendor_id: output.vendor_id,
            product_id: output.product_id,
            retry: Duration::from_millis(output.retry_ms),
            write_timeout: Duration::from_millis(output.write_timeout_ms),
        };

        let control = if overrides.no_control || !settings.control.enabled {
            None
        } else {
            Some(overrides.bind.unwrap_or_else(|| settings.control.bind.clone()))
        };

        Self {
            animation,
            preview: overrides.preview,
            serial,
            brightness: overrides.brightness.unwrap_or(settings.render.brightness).clamp(0.0, 1.0),
            fps: overrides.fps.unwrap_or(settings.render.fps).max(0.0),
            seed: overrides.seed.or(settings.render.seed),
            control,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in AnimationKind::ALL {
            assert_eq!(AnimationKind::from_name(kind.name()), Some(kind));
            assert!(!kind.description().is_empty());
        }
        assert_eq!(AnimationKind::from_name("NOISE"), Some(AnimationKind::Simplex));
        assert_eq!(AnimationKind::from_name("plasma"), None);
    }

    #[test]
    fn settings_fill_in_missing_flags() {
        let settings = Settings::default();
        let config = RunConfig::resolve(&settings, Overrides::default());
        assert_eq!(config.animation, AnimationKind::Simplex);
        assert_eq!(config.brightness, 1.0);
        assert_eq!(config.fps, 60.0);
        assert_eq!(config.serial.baud, 115_200);
        assert_eq!(config.serial.retry, Duration::from_millis(1000));
        assert_eq!(config.control.as_deref(), Some("0.0.0.0:4000"));
    }

    #[test]
    fn flags_win_over_settings() {
        let settings = Settings::default();
        let overrides = Overrides {
            animation: Some("bubbles".into()),
            brightness: Some(2.5),
            seed: Some(42),
            bind: Some("127.0.0.1:9000".into()),
            ..Overrides::default()
        };
        let config = RunConfig::resolve(&settings, overrides);
        assert_eq!(config.animation, AnimationKind::Bubbles);
        assert_eq!(config.brightness, 1.0);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.control.as_deref(), Some("127.0.0.1:9000"));
    }

    #[test]
    fn unknown_animation_falls_back_and_control_can_be_disabled() {
        let overrides = Overrides { animation: Some("plasma".into()), no_control: true, ..Overrides::default() };
        let config = RunConfig::resolve(&Settings::default(), overrides);
        assert_eq!(config.animation, AnimationKind::Simplex);
        assert!(config.control.is_none());
    }
}
