// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::Error;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "https://opendata.aemet.es/opendata/api";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub aemet: AemetConfig,
  pub prediction: PredictionConfig,
  pub translation: TranslationConfig,
  pub output: OutputConfig,
  pub stages: StagesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AemetConfig {
  pub base_url: String,
  /// INE code of the municipality used for the hourly forecast.
  pub municipality: String,
  pub timeout_secs: u64,
}

/// Text forecast query. `region` is an autonomous community code (`mad`,
/// `cat`, ...); an empty code requests the national forecast.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
  pub region: Option<String>,
  pub day: DayOffset,
  pub translate: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
  pub target_lang: String,
  pub source_lang: Option<String>,
  pub pro: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
  pub image_dir: PathBuf,
  pub municipalities_file: PathBuf,
  /// Program that receives each downloaded image path. Display is skipped when unset.
  pub viewer: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StagesConfig {
  pub weather: bool,
  pub uv: bool,
  pub satellite: bool,
  pub municipalities: bool,
  pub prediction: bool,
}

/// Forecast day. In the config file it is either a name (`today`,
/// `tomorrow`, `day_after_tomorrow`) or an offset from 0 to 2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawDayOffset")]
pub enum DayOffset {
  #[default]
  Today,
  Tomorrow,
  DayAfterTomorrow,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDayOffset {
  Index(u8),
  Name(String),
}

impl Default for AemetConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.into(),
      municipality: "28150".into(),
      timeout_secs: 30,
    }
  }
}

impl Default for PredictionConfig {
  fn default() -> Self {
    Self {
      region: Some("mad".into()),
      day: DayOffset::Today,
      translate: false,
    }
  }
}

impl Default for TranslationConfig {
  fn default() -> Self {
    Self {
      target_lang: "en".into(),
      source_lang: None,
      pro: false,
    }
  }
}

impl Default for OutputConfig {
  fn default() -> Self {
    Self {
      image_dir: PathBuf::from("data/img"),
      municipalities_file: PathBuf::from("muni.txt"),
      viewer: None,
    }
  }
}

impl Default for StagesConfig {
  fn default() -> Self {
    Self {
      weather: true,
      uv: true,
      satellite: true,
      municipalities: true,
      prediction: true,
    }
  }
}

impl Config {
  #[instrument(skip(path))]
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
    let path = path.as_ref();
    if !path.exists() {
      return Err(Error::PathNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let config = Self::from_toml(&content)?;
    debug!("Loaded configuration successfully");
    Ok(config)
  }

  /// Like [`Config::from_file`], but falls back to defaults when the file does not exist.
  pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
    match Self::from_file(path.as_ref()) {
      Err(Error::PathNotFound(p)) => {
        debug!("No configuration file at {}, using defaults", p.display());
        Ok(Self::default())
      }
      other => other,
    }
  }

  pub fn from_toml(content: &str) -> Result<Self, Error> {
    let mut config: Self =
      toml::from_str(content).map_err(|e| Error::ConfigError(e.to_string()))?;
    if matches!(&config.prediction.region, Some(r) if r.trim().is_empty()) {
      config.prediction.region = None;
    }
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> Result<(), Error> {
    if self.aemet.base_url.trim().is_empty() {
      return Err(Error::ConfigError("aemet.base_url cannot be empty".into()));
    }
    if self.aemet.municipality.trim().is_empty() {
      return Err(Error::ConfigError("aemet.municipality cannot be empty".into()));
    }
    if self.aemet.timeout_secs == 0 {
      return Err(Error::ConfigError("aemet.timeout_secs must be positive".into()));
    }
    if self.prediction.translate && self.translation.target_lang.trim().is_empty() {
      return Err(Error::ConfigError("translation.target_lang is required".into()));
    }
    Ok(())
  }
}

impl AemetConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

impl DayOffset {
  pub fn from_index(index: u8) -> Option<Self> {
    match index {
      0 => Some(DayOffset::Today),
      1 => Some(DayOffset::Tomorrow),
      2 => Some(DayOffset::DayAfterTomorrow),
      _ => None,
    }
  }

  pub fn from_name(name: &str) -> Option<Self> {
    match name {
      "today" => Some(DayOffset::Today),
      "tomorrow" => Some(DayOffset::Tomorrow),
      "day_after_tomorrow" => Some(DayOffset::DayAfterTomorrow),
      _ => None,
    }
  }

  /// Path segment AEMET uses for this offset.
  pub fn path_segment(&self) -> &'static str {
    match self {
      DayOffset::Today => "hoy",
      DayOffset::Tomorrow => "manana",
      DayOffset::DayAfterTomorrow => "pasadomanana",
    }
  }
}

impl TryFrom<RawDayOffset> for DayOffset {
  type Error = String;

  fn try_from(raw: RawDayOffset) -> Result<Self, Self::Error> {
    match raw {
      RawDayOffset::Index(index) => Self::from_index(index)
        .ok_or_else(|| format!("day offset must be 0, 1 or 2, got {}", index)),
      RawDayOffset::Name(name) => {
        Self::from_name(&name).ok_or_else(|| format!("unknown day offset `{}`", name))
      }
    }
  }
}

impl std::fmt::Display for DayOffset {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let offset = match self {
      DayOffset::Today => "today",
      DayOffset::Tomorrow => "tomorrow",
      DayOffset::DayAfterTomorrow => "day_after_tomorrow",
    };
    write!(f, "{}", offset)
  }
}
