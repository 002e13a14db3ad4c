use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub control: ControlSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub port: Option<PathBuf>, // Serial device; auto-detected by USB id when unset
    pub baud: u32,
    pub vendor_id: u16,
    pub product_id: u16,
    pub retry_ms: u64,
    pub write_timeout_ms: u64,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            port: None,
            baud: 115_200,
            vendor_id: 0x16C0,  // Teensy
            product_id: 0x0483,
            retry_ms: 1000,
            write_timeout_ms: 20,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub animation: String,
    pub brightness: f64,
    pub fps: f64,
    pub seed: Option<u64>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            animation: "simplex".to_string(),
            brightness: 1.0,
            fps: 60.0,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub enabled: bool,
    pub bind: String,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: "0.0.0.0:4000".to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring malformed settings");
                Self::default()
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read settings");
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> crate::error::Result<Self> {
        toml::from_str(content).map_err(|e| crate::error::LedError::Config(e.to_string()))
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ledglobe")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let s = Settings::parse("").unwrap();
        assert_eq!(s.render.animation, "simplex");
        assert_eq!(s.output.vendor_id, 0x16C0);
        assert!(s.control.enabled);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let s = Settings::parse(
            "[output]\nport = \"/dev/ttyACM0\"\n\n[render]\nanimation = \"movers\"\nseed = 7\n",
        )
        .unwrap();
        assert_eq!(s.output.port, Some(PathBuf::from("/dev/ttyACM0")));
        assert_eq!(s.output.baud, 115_200);
        assert_eq!(s.render.animation, "movers");
        assert_eq!(s.render.seed, Some(7));
        assert_eq!(s.render.fps, 60.0);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        assert!(matches!(
            Settings::parse("[render]\nbrightness = \"loud\""),
            Err(crate::error::LedError::Config(_))
        ));
    }
}
