use anyhow::{Context, Result};
use config::{Config, File};
use log::{debug, info, LevelFilter};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::renderer::overlay::ScaleConfig;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SensorConfig {
    pub bus_path: String,
    pub interval_ms: u64,
    pub autostart: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OverlayConfig {
    pub width: u32,
    pub height: u32,
    pub file: String,
    pub font: String,
    pub save_to_file: bool,
    pub clamp_fill: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            bus_path: "/tmp/bus.txt".to_string(),
            interval_ms: 100,
            autostart: true,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 240,
            file: "thermometer.png".to_string(),
            font: "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf".to_string(),
            save_to_file: true,
            clamp_fill: true,
        }
    }
}

impl SensorConfig {
    pub fn interval(&self) -> Duration {
        // A zero period would make tokio's interval panic.
        Duration::from_millis(self.interval_ms.max(1))
    }
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        Self::from_file("config.ini")
    }

    pub fn get_log_level(&self) -> LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info, // Default to Info if invalid
        }
    }

    pub fn scale(&self) -> ScaleConfig {
        ScaleConfig {
            clamp_fill: self.overlay.clamp_fill,
            ..ScaleConfig::default()
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();
        debug!("Loading configuration from {}", config_path.display());

        let config = Config::builder()
            .add_source(File::from(config_path).format(config::FileFormat::Ini))
            .build()
            .context(format!("Failed to load config from {}", config_path.display()))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize config")?;

        Ok(app_config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_path = path.as_ref();

        let mut config_str = String::new();

        config_str.push_str(&format!(
            "[sensor]\nbus_path = {}\ninterval_ms = {}\nautostart = {}\n\n",
            self.sensor.bus_path, self.sensor.interval_ms, self.sensor.autostart
        ));

        config_str.push_str(&format!(
            "[overlay]\nwidth = {}\nheight = {}\nfile = {}\nfont = {}\nsave_to_file = {}\nclamp_fill = {}\n\n",
            self.overlay.width,
            self.overlay.height,
            self.overlay.file,
            self.overlay.font,
            self.overlay.save_to_file,
            self.overlay.clamp_fill
        ));

        config_str.push_str(&format!("[logging]\nlevel = {}\n", self.logging.level));

        fs::write(config_path, config_str)
            .context(format!("Failed to save config to {}", config_path.display()))?;

        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }
}
