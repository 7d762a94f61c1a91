use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use derive_more::{AsRef, Deref, Display, From, Into};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rotator::{AutoplayConfig, TimingError, TransitionTiming};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct CarouselName(String);

crate::impl_name_newtype!(CarouselName);

/// Timing presets for the two rotator styles found on the site.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    #[strum(to_string = "brisk", serialize = "hero")]
    Brisk,
    #[strum(to_string = "leisurely", serialize = "testimonial")]
    Leisurely,
}

impl Preset {
    pub fn interval_ms(&self) -> u64 {
        match self {
            Self::Brisk => 5_000,
            Self::Leisurely => 15_000,
        }
    }

    pub fn phase_duration_ms(&self) -> u64 {
        match self {
            Self::Brisk => rotator::DEFAULT_PHASE_DURATION_MS,
            Self::Leisurely => 600,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CarouselConfig {
    pub name: CarouselName,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub preset: Preset,
    pub interval_ms: Option<u64>,
    pub phase_duration_ms: Option<u64>,
    #[serde(default = "default_true")]
    pub autoplay: bool,
}

impl CarouselConfig {
    pub fn timing(&self) -> Result<TransitionTiming, TimingError> {
        TransitionTiming::new(
            self.phase_duration_ms
                .unwrap_or_else(|| self.preset.phase_duration_ms()),
        )
    }

    pub fn autoplay(&self) -> Result<AutoplayConfig, TimingError> {
        if !self.autoplay {
            return Ok(AutoplayConfig::disabled());
        }
        AutoplayConfig::new(self.interval_ms.unwrap_or_else(|| self.preset.interval_ms()))
    }

    /// True when switching from `other` requires remounting the controller.
    pub fn timing_differs(&self, other: &CarouselConfig) -> bool {
        self.timing() != other.timing() || self.autoplay() != other.autoplay()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub carousels: Vec<CarouselConfig>,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for carousel in &self.carousels {
            if !seen.insert(&carousel.name) {
                return Err(ConfigError::DuplicateCarousel(carousel.name.clone()));
            }
            let timing_error = |source| ConfigError::Timing {
                name: carousel.name.clone(),
                source,
            };
            carousel.timing().map_err(timing_error)?;
            carousel.autoplay().map_err(timing_error)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Invalid timing for carousel '{name}': {source}")]
    Timing {
        name: CarouselName,
        #[source]
        source: TimingError,
    },
    #[error("Carousel '{0}' is defined more than once")]
    DuplicateCarousel(CarouselName),
}

/// Set to point the daemon and `marquee-ctl init-config` at another file.
pub const CONFIG_PATH_VAR: &str = "MARQUEE_CONFIG_PATH";

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_VAR) {
        return Ok(PathBuf::from(path));
    }
    let proj_dirs =
        ProjectDirs::from("org", "marquee", "marquee").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&get_config_path()?)
}

/// Reads `path` (if present) and lets `MARQUEE_*` variables override it.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("MARQUEE"))
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

pub fn default_config() -> Config {
    parse_config(DEFAULT_CONFIG).unwrap_or_default()
}

pub fn load_or_default() -> Config {
    let path = match get_config_path() {
        Ok(path) => path,
        Err(e) => {
            log::warn!("{}, using built-in carousels", e);
            return default_config();
        }
    };
    if !path.exists() {
        log::info!("No config at {}, using built-in carousels", path.display());
        return default_config();
    }

    match load_config_from(&path) {
        Ok(c) => {
            log::info!("Loaded {} carousels from {}", c.carousels.len(), path.display());
            c
        }
        Err(e) => {
            log::error!("Failed to load config, using built-in carousels: {}", e);
            default_config()
        }
    }
}

/// Writes the bundled carousels to `path` unless a file is already there.
pub fn write_default_config_at(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(path, DEFAULT_CONFIG)?;
    Ok(true)
}

pub fn write_default_config() -> Result<PathBuf, ConfigError> {
    let path = get_config_path()?;
    if write_default_config_at(&path)? {
        log::info!("Wrote default carousels to {}", path.display());
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Whether a filesystem event touched the config file itself.
fn is_reload_trigger(event: &notify::Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

/// Sends one `ConfigReload` per burst of changes to the config file. Returns
/// once the stage stops listening.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let Some(config_dir) = config_path.parent().map(Path::to_path_buf) else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    // Editors replace files by rename, so the directory is watched.
    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }
    log::info!("Watching {}", config_path.display());

    while let Ok(res) = bridge_rx.recv().await {
        let mut triggered = match res {
            Ok(event) => is_reload_trigger(&event, &config_path),
            Err(e) => {
                log::error!("Watch error: {}", e);
                false
            }
        };
        while let Ok(res) = bridge_rx.try_recv() {
            triggered |= res.is_ok_and(|event| is_reload_trigger(&event, &config_path));
        }

        if triggered && tx.send(AppEvent::ConfigReload).await.is_err() {
            break;
        }
        if tx.is_closed() {
            break;
        }
    }
    log::debug!("Config watcher stopped");
}
