//! Show configuration: schema, defaults, file loading and validation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use fireworks_platform::Rgb;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format for {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Launch pad glyph. Launchers sit on the bottom edge of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadConfig {
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 20.0,
            color: Rgb::GREY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauncherConfig {
    pub x: u32,
    pub period_ms: u64,
}

impl LauncherConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Pixels climbed per tick.
    pub ascent_speed: f32,
    /// Explosion heights are drawn from `explode_height_min..explode_height_max`.
    pub explode_height_min: u32,
    pub explode_height_max: u32,
    pub radius: f32,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            ascent_speed: 5.0,
            explode_height_min: 50,
            explode_height_max: 400,
            radius: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternMode {
    /// Radial or star with equal odds.
    #[default]
    Random,
    /// Rings only.
    Radial,
    Star,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstConfig {
    /// Inclusive particle count range for radial bursts.
    pub min_particles: u32,
    pub max_particles: u32,
    pub base_speed: u32,
    pub speed_jitter: u32,
    pub pattern: PatternMode,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            min_particles: 25,
            max_particles: 49,
            base_speed: 4,
            speed_jitter: 1,
            pattern: PatternMode::Random,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Opacity lost per tick.
    pub fade_step: u8,
    pub width: f32,
    pub height: f32,
}

impl ParticleConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            fade_step: 3,
            width: 5.0,
            height: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    pub viewport: Viewport,
    pub tick_rate: u32,
    /// Fixed RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub background: Rgb,
    pub palette: Vec<Rgb>,
    pub pad: PadConfig,
    pub launchers: Vec<LauncherConfig>,
    pub shell: ShellConfig,
    pub burst: BurstConfig,
    pub particle: ParticleConfig,
    /// Run without a window for this many milliseconds.
    pub headless_ms: Option<u64>,
}

pub fn default_palette() -> Vec<Rgb> {
    vec![
        Rgb::BLACK,
        Rgb::GREY,
        Rgb::WHITE,
        Rgb::RED,
        Rgb::GREEN,
        Rgb::BLUE,
        Rgb::YELLOW,
        Rgb::CYAN,
        Rgb::MAGENTA,
    ]
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            tick_rate: 60,
            seed: None,
            background: Rgb::BLACK,
            palette: default_palette(),
            pad: PadConfig::default(),
            launchers: vec![
                LauncherConfig { x: 100, period_ms: 3000 },
                LauncherConfig { x: 300, period_ms: 4000 },
                LauncherConfig { x: 500, period_ms: 2000 },
                LauncherConfig { x: 700, period_ms: 5000 },
            ],
            shell: ShellConfig::default(),
            burst: BurstConfig::default(),
            particle: ParticleConfig::default(),
            headless_ms: None,
        }
    }
}

impl ShowConfig {
    /// Loads and validates a `.toml` or `.json` config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&text)?,
            Some("json") => Self::from_json_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        tracing::info!(
            "loaded config from {} ({} launchers)",
            path.display(),
            config.launchers.len()
        );
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        let Viewport { width, height } = self.viewport;
        if width == 0 || height == 0 {
            return invalid(format!("viewport must be non-empty, got {width}x{height}"));
        }
        if self.tick_rate == 0 {
            return invalid("tick_rate must be positive".into());
        }
        if self.palette.is_empty() {
            return invalid("palette must contain at least one colour".into());
        }
        let sizes = [
            ("pad.width", self.pad.width),
            ("pad.height", self.pad.height),
            ("shell.radius", self.shell.radius),
            ("shell.ascent_speed", self.shell.ascent_speed),
            ("particle.width", self.particle.width),
            ("particle.height", self.particle.height),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return invalid(format!("{name} must be finite and positive, got {value}"));
            }
        }
        if self.pad.height > height as f32 {
            return invalid(format!(
                "pad height {} exceeds viewport height {height}",
                self.pad.height
            ));
        }
        for (index, launcher) in self.launchers.iter().enumerate() {
            if launcher.period_ms == 0 {
                return invalid(format!("launcher {index}: period_ms must be positive"));
            }
            if launcher.x >= width {
                return invalid(format!(
                    "launcher {index}: x = {} lies outside viewport width {width}",
                    launcher.x
                ));
            }
        }
        let shell = &self.shell;
        if shell.explode_height_min >= shell.explode_height_max {
            return invalid(format!(
                "shell explode height range {}..{} is empty",
                shell.explode_height_min, shell.explode_height_max
            ));
        }
        let burst = &self.burst;
        if burst.min_particles == 0 || burst.min_particles > burst.max_particles {
            return invalid(format!(
                "burst particle range {}..={} is empty",
                burst.min_particles, burst.max_particles
            ));
        }
        if burst.base_speed == 0 || burst.speed_jitter >= burst.base_speed {
            return invalid(format!(
                "burst speed {} must exceed its jitter {}",
                burst.base_speed, burst.speed_jitter
            ));
        }
        if self.particle.fade_step == 0 {
            return invalid("particle.fade_step must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_show() {
        let config = ShowConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.viewport, Viewport { width: 800, height: 600 });
        assert_eq!(config.tick_rate, 60);
        let xs: Vec<u32> = config.launchers.iter().map(|l| l.x).collect();
        let periods: Vec<u64> = config.launchers.iter().map(|l| l.period_ms).collect();
        assert_eq!(xs, [100, 300, 500, 700]);
        assert_eq!(periods, [3000, 4000, 2000, 5000]);
        assert_eq!(config.palette.len(), 9);
        assert_eq!(config.burst.pattern, PatternMode::Random);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ShowConfig::from_toml_str(
            r#"
            tick_rate = 30
            seed = 42

            [burst]
            pattern = "star"

            [[launchers]]
            x = 400
            period_ms = 1500
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.tick_rate, 30);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.burst.pattern, PatternMode::Star);
        assert_eq!(config.burst.min_particles, 25);
        assert_eq!(config.launchers, vec![LauncherConfig { x: 400, period_ms: 1500 }]);
        assert_eq!(config.viewport.width, 800);
    }

    #[test]
    fn json_palette_is_rgb_triples() {
        let config = ShowConfig::from_json_str(
            r#"{ "palette": [[255, 0, 0], [0, 0, 255]], "background": [10, 10, 30] }"#,
        )
        .expect("valid json");
        assert_eq!(config.palette, vec![Rgb::RED, Rgb::BLUE]);
        assert_eq!(config.background, Rgb::new(10, 10, 30));
    }

    #[test]
    fn rejects_invalid_values() {
        let cases: Vec<(&str, Box<dyn Fn(&mut ShowConfig)>)> = vec![
            ("zero viewport", Box::new(|c| c.viewport.width = 0)),
            ("zero tick rate", Box::new(|c| c.tick_rate = 0)),
            ("empty palette", Box::new(|c| c.palette.clear())),
            ("zero period", Box::new(|c| c.launchers[0].period_ms = 0)),
            ("launcher off screen", Box::new(|c| c.launchers[0].x = 800)),
            ("inverted heights", Box::new(|c| c.shell.explode_height_min = 400)),
            ("empty particle range", Box::new(|c| c.burst.min_particles = 50)),
            ("jitter too large", Box::new(|c| c.burst.speed_jitter = 4)),
            ("no fade", Box::new(|c| c.particle.fade_step = 0)),
            ("negative particle width", Box::new(|c| c.particle.width = -5.0)),
            ("zero particle height", Box::new(|c| c.particle.height = 0.0)),
            ("negative pad width", Box::new(|c| c.pad.width = -1.0)),
            ("infinite pad height", Box::new(|c| c.pad.height = f32::INFINITY)),
            ("zero shell radius", Box::new(|c| c.shell.radius = 0.0)),
            ("nan ascent speed", Box::new(|c| c.shell.ascent_speed = f32::NAN)),
            ("negative ascent speed", Box::new(|c| c.shell.ascent_speed = -5.0)),
        ];
        for (name, mutate) in cases {
            let mut config = ShowConfig::default();
            mutate(&mut config);
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn toml_nan_and_negative_sizes_are_rejected() {
        assert!(matches!(
            ShowConfig::from_toml_str("[shell]\nascent_speed = nan"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ShowConfig::from_toml_str("[particle]\nwidth = -5.0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_input_reports_format_error() {
        assert!(matches!(
            ShowConfig::from_toml_str("tick_rate = \"fast\""),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            ShowConfig::from_json_str("{ \"seed\": "),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn load_rejects_unknown_extension_and_missing_file() {
        let dir = std::env::temp_dir().join(format!("fireworks-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");

        let yaml = dir.join("show.yaml");
        std::fs::write(&yaml, "tick_rate: 60").expect("write");
        assert!(matches!(
            ShowConfig::load(&yaml),
            Err(ConfigError::UnsupportedFormat(_))
        ));

        let toml_path = dir.join("show.toml");
        std::fs::write(&toml_path, "seed = 9").expect("write");
        assert_eq!(ShowConfig::load(&toml_path).expect("loads").seed, Some(9));

        assert!(matches!(
            ShowConfig::load(&dir.join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn bundled_configs_parse() {
        let reference =
            ShowConfig::from_toml_str(include_str!("../../../configs/reference.toml"))
                .expect("reference.toml");
        assert_eq!(
            ShowConfig {
                seed: None,
                ..reference
            },
            ShowConfig::default()
        );

        let headless = ShowConfig::from_json_str(include_str!("../../../configs/headless.json"))
            .expect("headless.json");
        assert_eq!(headless.headless_ms, Some(10_000));
        assert_eq!(headless.launchers.len(), 2);
        assert_eq!(headless.burst.pattern, PatternMode::Star);
    }

    #[test]
    fn tick_interval_follows_rate() {
        let config = ShowConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_nanos(16_666_666));
    }
}
