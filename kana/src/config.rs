//! Configuration for the kana daemon
//!
//! Loads configuration from a TOML file. Every section is optional and falls
//! back to defaults; command-line values override the file. The result is
//! validated once at startup, before any component is built.

use crate::algorithms::MotionModelConfig;
use crate::error::{Error, Result};
use crate::io::ReceiverConfig;
use crate::render::RenderLoopConfig;
use crate::state::GridConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names tried when none is given.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["kana.toml", "/etc/kana.toml"];

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub grid: GridSection,
    pub filter: FilterSection,
    pub render: RenderSection,
    pub command: CommandSection,
    pub logging: LoggingSection,
}

/// Visualization grid
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GridSection {
    /// Rows
    pub height: usize,
    /// Columns
    pub width: usize,
    /// Cells per meter
    pub scale: f32,
    /// Intensity of a particle mark (1-255)
    pub mark_intensity: u8,
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            height: 500,
            width: 500,
            scale: 5.0,
            mark_intensity: 255,
        }
    }
}

/// Particle population and noise
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterSection {
    /// Number of particles
    pub particles: usize,
    /// Linear velocity noise amplitude (m/s)
    pub linear_noise: f32,
    /// Angular velocity noise amplitude (rad/s)
    pub angular_noise: f32,
    /// RNG seed; 0 draws from OS entropy
    pub seed: u64,
}

impl Default for FilterSection {
    fn default() -> Self {
        Self {
            particles: 100,
            linear_noise: 0.1,
            angular_noise: 0.1,
            seed: 0,
        }
    }
}

/// Render loop
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSection {
    /// Tick rate (Hz)
    pub rate_hz: f32,
    /// Directory that receives snapshot images
    pub snapshot_dir: PathBuf,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            rate_hz: 30.0,
            snapshot_dir: PathBuf::from("."),
        }
    }
}

/// Command source
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CommandSection {
    /// UDP bind address for velocity commands
    ///
    /// Examples:
    /// - `0.0.0.0:7400` - All interfaces
    /// - `127.0.0.1:7400` - Localhost only
    pub bind_address: String,
}

impl Default for CommandSection {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:7400".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub particles: Option<usize>,
    pub linear_noise: Option<f32>,
    pub angular_noise: Option<f32>,
    pub rate_hz: Option<f32>,
    pub bind_address: Option<String>,
    pub seed: Option<u64>,
    pub snapshot_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load from `path`, or from the first default path that exists.
    ///
    /// An explicit path must be readable and valid. With no path and no
    /// default file present, built-in defaults are used.
    pub fn load(path: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = path {
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }
        for candidate in DEFAULT_CONFIG_PATHS {
            let candidate = Path::new(candidate);
            if candidate.is_file() {
                return Ok((Self::from_file(candidate)?, Some(candidate.to_path_buf())));
            }
        }
        Ok((Self::default(), None))
    }

    /// Apply command-line overrides.
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(v) = overrides.particles {
            self.filter.particles = v;
        }
        if let Some(v) = overrides.linear_noise {
            self.filter.linear_noise = v;
        }
        if let Some(v) = overrides.angular_noise {
            self.filter.angular_noise = v;
        }
        if let Some(v) = overrides.rate_hz {
            self.render.rate_hz = v;
        }
        if let Some(v) = overrides.bind_address {
            self.command.bind_address = v;
        }
        if let Some(v) = overrides.seed {
            self.filter.seed = v;
        }
        if let Some(v) = overrides.snapshot_dir {
            self.render.snapshot_dir = v;
        }
        if let Some(v) = overrides.log_level {
            self.logging.level = v;
        }
    }

    /// Reject values no component can run with.
    pub fn validate(&self) -> Result<()> {
        if self.grid.height == 0 || self.grid.width == 0 {
            return Err(Error::Config(format!(
                "grid must be non-empty, got {}x{}",
                self.grid.height, self.grid.width
            )));
        }
        if u32::try_from(self.grid.height).is_err() || u32::try_from(self.grid.width).is_err() {
            return Err(Error::Config("grid dimensions exceed u32".to_string()));
        }
        if !(self.grid.scale.is_finite() && self.grid.scale > 0.0) {
            return Err(Error::Config(format!(
                "grid.scale must be positive, got {}",
                self.grid.scale
            )));
        }
        if self.grid.mark_intensity == 0 {
            return Err(Error::Config(
                "grid.mark_intensity must be non-zero".to_string(),
            ));
        }
        if self.filter.particles == 0 {
            return Err(Error::Config("filter.particles must be > 0".to_string()));
        }
        for (name, value) in [
            ("filter.linear_noise", self.filter.linear_noise),
            ("filter.angular_noise", self.filter.angular_noise),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::Config(format!(
                    "{} must be finite and >= 0, got {}",
                    name, value
                )));
            }
        }
        if !(self.render.rate_hz.is_finite() && self.render.rate_hz > 0.0) {
            return Err(Error::Config(format!(
                "render.rate_hz must be positive, got {}",
                self.render.rate_hz
            )));
        }
        if self.command.bind_address.is_empty() {
            return Err(Error::Config("command.bind_address is empty".to_string()));
        }
        Ok(())
    }

    pub fn grid_config(&self) -> GridConfig {
        GridConfig {
            height: self.grid.height,
            width: self.grid.width,
            scale: self.grid.scale,
        }
    }

    pub fn motion_model_config(&self) -> MotionModelConfig {
        MotionModelConfig {
            linear_noise: self.filter.linear_noise,
            angular_noise: self.filter.angular_noise,
        }
    }

    pub fn render_loop_config(&self) -> RenderLoopConfig {
        RenderLoopConfig {
            rate_hz: self.render.rate_hz,
        }
    }

    pub fn receiver_config(&self) -> ReceiverConfig {
        ReceiverConfig {
            bind_addr: self.command.bind_address.clone(),
        }
    }
}
