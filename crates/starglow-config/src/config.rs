//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level backdrop configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Sky simulation tuning.
    pub sky: SkyConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Which backdrop the application renders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum BackdropKind {
    /// Deep-sky scene: rotating starfield, nebula planes, meteor shower.
    Starfield,
    /// Simpler alternate backdrop: a 2D drifting particle field.
    ParticleField,
}

/// Motion-reduction preference.
///
/// Read once at scene construction; `Auto` defers to the platform, which on
/// current desktop targets exposes no portable preference API, so `Auto`
/// resolves to full motion. The CLI/config override is the working affordance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum MotionPreference {
    /// Follow the platform preference where one is exposed.
    Auto,
    /// Force reduced motion.
    Reduce,
    /// Force full motion.
    Full,
}

impl MotionPreference {
    /// Resolve the preference to a concrete reduced-motion flag.
    pub fn resolve(self) -> bool {
        match self {
            MotionPreference::Auto => false,
            MotionPreference::Reduce => true,
            MotionPreference::Full => false,
        }
    }
}

/// Per-device-class density and pacing constants.
///
/// Two instances live in [`SkyConfig`], one per class. Exact values are
/// tuning, not load-bearing behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassTuning {
    /// Number of starfield points.
    pub star_count: u32,
    /// Star point size in world units (scaled by the clamped pixel ratio).
    pub star_size: f32,
    /// Minimum gap between meteor spawns, in seconds.
    pub meteor_min_gap: f32,
    /// Maximum gap between meteor spawns, in seconds.
    pub meteor_max_gap: f32,
    /// Maximum number of concurrently active meteors.
    pub meteor_cap: usize,
    /// Particle-field pool ceiling.
    pub particle_count: u32,
}

/// Tuning for the 2D particle-field backdrop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParticleTuning {
    /// Particle pool size under reduced motion (both classes).
    pub reduced_count: u32,
    /// Twinkle opacity lower bound.
    pub twinkle_min: f32,
    /// Twinkle opacity upper bound.
    pub twinkle_max: f32,
    /// Twinkle opacity change per second.
    pub twinkle_rate: f32,
    /// Pointer repulsion radius in logical pixels.
    pub repulsion_radius: f32,
    /// Maximum repulsion push in pixels per second (at zero distance).
    pub repulsion_strength: f32,
    /// Squared link distance threshold in pixels².
    pub link_distance_sq: f32,
    /// Peak connective-line opacity.
    pub link_opacity: f32,
}

/// Tuning for the nebula plane set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NebulaTuning {
    /// Number of billboard planes.
    pub plane_count: u32,
    /// Base spin in radians per second; plane `i` spins at `base × (i + 1)`.
    pub base_spin: f32,
    /// Constant per-plane opacity.
    pub opacity: f32,
    /// Baked gradient texture size in pixels (square).
    pub texture_size: u32,
}

/// Sky simulation configuration: device adaptation, motion, and tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkyConfig {
    /// Which backdrop to render.
    pub backdrop: BackdropKind,
    /// Viewport logical width below which the compact class applies.
    pub breakpoint_width: f32,
    /// Device-pixel-ratio ceiling used when scaling point sizes.
    pub max_pixel_ratio: f64,
    /// Motion-reduction preference.
    pub motion: MotionPreference,
    /// Simulation seed; `None` draws a fresh seed at scene construction.
    pub seed: Option<u64>,
    /// Starfield rotation speed in radians per second.
    pub rotation_speed: f32,
    /// Rotation speed multiplier under reduced motion. Small but nonzero so
    /// the backdrop never reads as frozen.
    pub reduced_rotation_factor: f32,
    /// Parallax camera deflection scale.
    pub parallax_scale: f32,
    /// Parallax easing factor per advance step.
    pub parallax_easing: f32,
    /// Compact-class tuning.
    pub compact: ClassTuning,
    /// Wide-class tuning.
    pub wide: ClassTuning,
    /// Particle-field tuning.
    pub particles: ParticleTuning,
    /// Nebula tuning.
    pub nebula: NebulaTuning,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            vsync: true,
            title: "Starglow".to_string(),
        }
    }
}

impl Default for BackdropKind {
    fn default() -> Self {
        BackdropKind::Starfield
    }
}

impl Default for MotionPreference {
    fn default() -> Self {
        MotionPreference::Auto
    }
}

impl Default for ClassTuning {
    fn default() -> Self {
        // Wide-class defaults; `SkyConfig::default` overrides the compact set.
        Self {
            star_count: 1600,
            star_size: 0.015,
            meteor_min_gap: 5.0,
            meteor_max_gap: 12.0,
            meteor_cap: 2,
            particle_count: 120,
        }
    }
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            reduced_count: 40,
            twinkle_min: 0.2,
            twinkle_max: 0.7,
            twinkle_rate: 0.3,
            repulsion_radius: 100.0,
            repulsion_strength: 36.0,
            link_distance_sq: 8000.0,
            link_opacity: 0.12,
        }
    }
}

impl Default for NebulaTuning {
    fn default() -> Self {
        Self {
            plane_count: 4,
            base_spin: 0.018,
            opacity: 0.05,
            texture_size: 256,
        }
    }
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            backdrop: BackdropKind::default(),
            breakpoint_width: 768.0,
            max_pixel_ratio: 2.0,
            motion: MotionPreference::default(),
            seed: None,
            rotation_speed: 0.01,
            reduced_rotation_factor: 0.25,
            parallax_scale: 0.3,
            parallax_easing: 0.02,
            compact: ClassTuning {
                star_count: 800,
                star_size: 0.020,
                meteor_min_gap: 10.0,
                meteor_max_gap: 18.0,
                meteor_cap: 1,
                particle_count: 48,
            },
            wide: ClassTuning::default(),
            particles: ParticleTuning::default(),
            nebula: NebulaTuning::default(),
        }
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Show frame-time logging.
    pub show_fps: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_fps: false,
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
