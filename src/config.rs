//! Game tunables.
//!
//! Every field has a default, so a config file only needs the values it
//! overrides. The file is JSON and is picked up from `VIRUS_LANES_CONFIG`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::LANES;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "VIRUS_LANES_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === Playfield (logical pixels) ===
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Shrink applied to a live virus so it sits inside its lane.
    pub virus_padding: f64,
    /// Height of the danger zone band at the bottom of the playfield.
    pub danger_zone_height: f64,
    /// Height of the lower scenery; the kill line sits on top of it.
    pub ground_height: f64,

    // === Rules ===
    pub death_frames: u32,
    pub pulse_frames: u32,
    pub fail_threshold: u32,
    pub initial_speed: f64,
    /// Added to the virus speed on every simulated frame.
    pub speed_step: f64,
    pub countdown_seconds: u32,

    // === Timing ===
    pub timer_period_ms: u64,
    pub frame_period_ms: u64,

    // === Input ===
    /// One key per lane, left to right.
    pub lane_keys: Vec<String>,
    pub pause_key: String,

    // === Session ===
    pub player: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas_width: 260.0,
            canvas_height: 680.0,
            virus_padding: 20.0,
            danger_zone_height: 220.0,
            ground_height: 80.0,

            death_frames: 40,
            pulse_frames: 5,
            fail_threshold: 10,
            initial_speed: 1.0,
            speed_step: 0.001,
            countdown_seconds: 3,

            timer_period_ms: 1000,
            frame_period_ms: 16,

            lane_keys: vec!["d".into(), "f".into(), "j".into(), "k".into()],
            pause_key: "Esc".into(),

            player: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load from `VIRUS_LANES_CONFIG` when it is set, defaults otherwise.
    pub fn from_env() -> Result<Self, Error> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config =
            serde_json::from_str(&text).map_err(|source| Error::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.lane_keys.len() != LANES {
            return Err(Error::ConfigInvalid(format!(
                "expected {} lane keys, got {}",
                LANES,
                self.lane_keys.len()
            )));
        }
        if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
            return Err(Error::ConfigInvalid("canvas must have a positive size".into()));
        }
        if self.danger_zone_height + self.ground_height > self.canvas_height {
            return Err(Error::ConfigInvalid(
                "danger zone and ground do not fit on the canvas".into(),
            ));
        }
        if self.timer_period_ms == 0 || self.frame_period_ms == 0 {
            return Err(Error::ConfigInvalid("periods must be non-zero".into()));
        }
        Ok(())
    }

    /// Width of a single lane.
    pub fn lane_width(&self) -> f64 {
        self.canvas_width / LANES as f64
    }

    /// y at which a live virus has escaped.
    pub fn kill_line(&self) -> f64 {
        self.canvas_height - self.ground_height
    }

    /// Top edge of the danger zone.
    pub fn danger_line(&self) -> f64 {
        self.canvas_height - self.danger_zone_height
    }

    pub fn timer_period(&self) -> Duration {
        Duration::from_millis(self.timer_period_ms)
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_millis(self.frame_period_ms)
    }
}
