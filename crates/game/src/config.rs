//! Session configuration. Loaded from config.ron at startup.

use anyhow::{Context, Result};
use engine_core::Vec3;
use flight::FlightConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vehicle::SeatConfig;

/// Everything a demo session reads from disk. Missing fields take defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Fixed simulation rate in ticks per second.
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: f64,
    /// Length of the scripted session, seconds.
    #[serde(default = "default_duration")]
    pub duration_secs: f32,
    /// Seconds between telemetry log lines.
    #[serde(default = "default_log_interval")]
    pub log_interval_secs: f32,
    /// Radius of the entry volume around the plane.
    #[serde(default = "default_trigger_radius")]
    pub trigger_radius: f32,
    /// Where the pilot starts, on foot.
    #[serde(default = "default_pilot_spawn")]
    pub pilot_spawn: Vec3,
    #[serde(default)]
    pub flight: FlightConfig,
    #[serde(default)]
    pub seat: SeatConfig,
}

fn default_tick_rate() -> f64 {
    60.0
}
fn default_duration() -> f32 {
    40.0
}
fn default_log_interval() -> f32 {
    1.0
}
fn default_trigger_radius() -> f32 {
    4.0
}
fn default_pilot_spawn() -> Vec3 {
    Vec3::new(-2.5, 0.0, 0.0)
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate(),
            duration_secs: default_duration(),
            log_interval_secs: default_log_interval(),
            trigger_radius: default_trigger_radius(),
            pilot_spawn: default_pilot_spawn(),
            flight: FlightConfig::default(),
            seat: SeatConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(data) = std::fs::read_to_string(path) else {
            log::info!("No config at {:?}, using defaults", path);
            return Self::default();
        };
        match ron::from_str(&data) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Write this config as pretty RON.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("serializing config")?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

pub fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flight::AeroMode;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg: SimConfig = ron::from_str("(duration_secs: 5.0, flight: (mode: Simple))").unwrap();
        assert_eq!(cfg.duration_secs, 5.0);
        assert_eq!(cfg.tick_rate_hz, 60.0);
        assert_eq!(cfg.flight.mode, AeroMode::Simple);
        assert_eq!(cfg.flight.mass, FlightConfig::default().mass);
        assert_eq!(cfg.seat, SeatConfig::default());
    }

    #[test]
    fn missing_or_broken_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join(format!("skyroam-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let missing = SimConfig::load_from(&dir.join("nope.ron"));
        assert_eq!(missing.trigger_radius, default_trigger_radius());

        let broken = dir.join("broken.ron");
        std::fs::write(&broken, "(tick_rate_hz: \"fast\"").unwrap();
        assert_eq!(SimConfig::load_from(&broken).tick_rate_hz, 60.0);

        let written = dir.join("written.ron");
        let mut custom = SimConfig::default();
        custom.trigger_radius = 9.0;
        custom.save_to(&written).unwrap();
        assert_eq!(SimConfig::load_from(&written).trigger_radius, 9.0);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
