use crate::domain::tuning::{BalloonTuning, GestureTuning, InvalidTuning, RpsTuning};
use crate::use_cases::SessionSettings;
use serde::Deserialize;
use std::{
    env, fmt,
    net::{IpAddr, Ipv4Addr},
    path::{Path, PathBuf},
    time::Duration,
};

// Runtime/server constants (not gameplay tuning).

pub fn http_port() -> u16 {
    env::var("GESTURE_ARCADE_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001)
}

pub fn http_host() -> IpAddr {
    env::var("GESTURE_ARCADE_HOST")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Optional TOML file overriding the recognition and gameplay tuning.
pub fn tuning_path() -> Option<PathBuf> {
    env::var_os("GESTURE_ARCADE_TUNING")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

pub const RPS_FRAME_QUEUE_CAPACITY: usize = 32;
// One waiting frame at most; aiming only cares about the newest one.
pub const BALLOON_FRAME_QUEUE_CAPACITY: usize = 1;

pub const RENDER_TICK_INTERVAL: Duration = Duration::from_millis(1000 / 60);

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    Invalid {
        path: PathBuf,
        source: InvalidTuning,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
            ConfigError::Invalid { path, source } => {
                write!(f, "invalid tuning in {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Tuning overrides. Every table and every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TuningFile {
    pub gesture: GestureTuning,
    pub rps: RpsTuning,
    pub balloon: BalloonTuning,
}

impl TuningFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning: TuningFile = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tuning.validate().map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(tuning)
    }

    /// Rejects values that would stall or break a session.
    pub fn validate(&self) -> Result<(), InvalidTuning> {
        self.gesture.validate()?;
        self.rps.validate()?;
        self.balloon.validate()
    }

    pub fn into_settings(self) -> SessionSettings {
        SessionSettings {
            gesture: self.gesture,
            rps: self.rps,
            balloon: self.balloon,
            rps_frame_queue_capacity: RPS_FRAME_QUEUE_CAPACITY,
            balloon_frame_queue_capacity: BALLOON_FRAME_QUEUE_CAPACITY,
            render_tick_interval: RENDER_TICK_INTERVAL,
        }
    }
}

/// Tuning from `GESTURE_ARCADE_TUNING`, or the defaults when it is unset.
pub fn load_tuning() -> Result<TuningFile, ConfigError> {
    match tuning_path() {
        Some(path) => TuningFile::load(&path),
        None => Ok(TuningFile::default()),
    }
}
