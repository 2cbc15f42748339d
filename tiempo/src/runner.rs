// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use base::{Config, DeepLClient, Error, TranslationService};
use chrono::{DateTime, Utc};
use opendata::{viewer, ImageViewer, OpenDataService};
use std::io::Write;
use tracing::{info, instrument, warn};

pub const AEMET_API_KEY: &str = "AEMET_API_KEY";
pub const DEEPL_API_KEY: &str = "DEEPL_API_KEY";

#[derive(Clone)]
pub struct Credentials {
  aemet_api_key: String,
  deepl_api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  Weather,
  UvRadiation,
  Satellite,
  Municipalities,
  Prediction,
}

#[derive(Debug)]
pub enum StageStatus {
  Completed,
  Skipped,
  Failed(Error),
}

#[derive(Debug)]
pub struct StageOutcome {
  pub stage: Stage,
  pub status: StageStatus,
}

#[derive(Debug)]
pub struct RunReport {
  pub started_at: DateTime<Utc>,
  pub finished_at: DateTime<Utc>,
  pub outcomes: Vec<StageOutcome>,
}

pub struct ServiceRunner {
  config: Config,
  opendata: OpenDataService,
  translator: Option<Box<dyn TranslationService>>,
  viewer: Box<dyn ImageViewer>,
}

impl Credentials {
  /// Reads the API keys through `lookup`. The DeepL key is only required
  /// when the text forecast is translated.
  pub fn from_lookup<F>(lookup: F, config: &Config) -> Result<Self, Error>
  where
    F: Fn(&str) -> Option<String>,
  {
    let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let aemet_api_key = read(AEMET_API_KEY).ok_or_else(|| {
      Error::ConfigError(format!("Missing {} environment variable", AEMET_API_KEY))
    })?;

    let deepl_api_key = read(DEEPL_API_KEY);
    if config.prediction.translate && deepl_api_key.is_none() {
      return Err(Error::ConfigError(format!(
        "Translation is enabled but {} is not set",
        DEEPL_API_KEY
      )));
    }

    Ok(Self {
      aemet_api_key,
      deepl_api_key,
    })
  }
}

impl std::fmt::Debug for Credentials {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Credentials")
      .field("deepl", &self.deepl_api_key.is_some())
      .finish_non_exhaustive()
  }
}

impl Stage {
  pub const ALL: [Stage; 5] = [
    Stage::Weather,
    Stage::UvRadiation,
    Stage::Satellite,
    Stage::Municipalities,
    Stage::Prediction,
  ];

  /// Console message printed when the stage fails.
  pub fn failure_message(&self) -> &'static str {
    match self {
      Stage::Weather => "Could not retrieve weather information.",
      Stage::UvRadiation => "Could not retrieve UV radiation.",
      Stage::Satellite => "Could not retrieve satellite information.",
      Stage::Municipalities => "Not possible to obtain municipalities",
      Stage::Prediction => "Not possible to get weather predictions",
    }
  }

  fn enabled(&self, config: &Config) -> bool {
    match self {
      Stage::Weather => config.stages.weather,
      Stage::UvRadiation => config.stages.uv,
      Stage::Satellite => config.stages.satellite,
      Stage::Municipalities => config.stages.municipalities,
      Stage::Prediction => config.stages.prediction,
    }
  }
}

impl std::fmt::Display for Stage {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let stage = match self {
      Stage::Weather => "weather",
      Stage::UvRadiation => "uv_radiation",
      Stage::Satellite => "satellite",
      Stage::Municipalities => "municipalities",
      Stage::Prediction => "prediction",
    };
    write!(f, "{}", stage)
  }
}

impl RunReport {
  pub fn failed(&self) -> impl Iterator<Item = &StageOutcome> {
    self
      .outcomes
      .iter()
      .filter(|o| matches!(o.status, StageStatus::Failed(_)))
  }

  pub fn completed(&self) -> usize {
    self
      .outcomes
      .iter()
      .filter(|o| matches!(o.status, StageStatus::Completed))
      .count()
  }

  /// True when at least one stage ran and none of them completed.
  pub fn all_failed(&self) -> bool {
    self.completed() == 0 && self.failed().next().is_some()
  }
}

impl ServiceRunner {
  /// Resolves credentials through `lookup`, then builds the clients. No
  /// client exists unless every required key is present.
  pub fn from_lookup<F>(config: Config, lookup: F) -> Result<Self, Error>
  where
    F: Fn(&str) -> Option<String>,
  {
    let credentials = Credentials::from_lookup(lookup, &config)?;
    Self::new(config, credentials)
  }

  pub fn from_env(config: Config) -> Result<Self, Error> {
    Self::from_lookup(config, |name| std::env::var(name).ok())
  }

  #[instrument(skip(config, credentials))]
  pub fn new(config: Config, credentials: Credentials) -> Result<Self, Error> {
    let opendata = OpenDataService::new(credentials.aemet_api_key, &config.aemet)?;

    let translator: Option<Box<dyn TranslationService>> =
      match (config.prediction.translate, credentials.deepl_api_key) {
        (true, Some(key)) => Some(Box::new(DeepLClient::new(key, config.translation.pro)?)),
        _ => None,
      };

    let viewer = viewer::from_config(config.output.viewer.as_deref());
    Ok(Self::with_parts(config, opendata, translator, viewer))
  }

  pub fn with_parts(
    config: Config,
    opendata: OpenDataService,
    translator: Option<Box<dyn TranslationService>>,
    viewer: Box<dyn ImageViewer>,
  ) -> Self {
    Self {
      config,
      opendata,
      translator,
      viewer,
    }
  }

  /// Runs every enabled stage in order. A failing stage prints its message
  /// and the remaining stages still run.
  #[instrument(skip(self, console))]
  pub async fn run(&self, console: &mut dyn Write) -> RunReport {
    let started_at = Utc::now();
    let mut outcomes = Vec::with_capacity(Stage::ALL.len());

    for stage in Stage::ALL {
      if !stage.enabled(&self.config) {
        info!("Stage {} disabled", stage);
        outcomes.push(StageOutcome {
          stage,
          status: StageStatus::Skipped,
        });
        continue;
      }

      let status = match self.run_stage(stage).await {
        Ok(output) => {
          emit(console, &output);
          StageStatus::Completed
        }
        Err(e) => {
          warn!("Stage {} failed: {}", stage, e);
          emit(console, stage.failure_message());
          StageStatus::Failed(e)
        }
      };
      outcomes.push(StageOutcome { stage, status });
    }

    RunReport {
      started_at,
      finished_at: Utc::now(),
      outcomes,
    }
  }

  async fn run_stage(&self, stage: Stage) -> Result<String, Error> {
    match stage {
      Stage::Weather => self.weather().await,
      Stage::UvRadiation => self.uv_radiation().await,
      Stage::Satellite => self.satellite().await,
      Stage::Municipalities => self.municipalities().await,
      Stage::Prediction => self.prediction().await,
    }
  }

  async fn weather(&self) -> Result<String, Error> {
    let forecast = self
      .opendata
      .hourly_forecast(&self.config.aemet.municipality)
      .await?;
    Ok(forecast.summary())
  }

  async fn uv_radiation(&self) -> Result<String, Error> {
    let indices = self.opendata.uv_indices().await?;
    Ok(indices.iter().map(|uv| uv.render()).collect())
  }

  async fn satellite(&self) -> Result<String, Error> {
    let outcomes = self
      .opendata
      .satellite_images(&self.config.output.image_dir, self.viewer.as_ref())
      .await;

    let mut saved = String::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
      match outcome.result {
        Ok(path) => saved.push_str(&format!("{}: {}\n", outcome.product, path.display())),
        Err(e) => failures.push(format!("{} ({})", outcome.product, e)),
      }
    }

    if !failures.is_empty() {
      return Err(Error::DataUnavailable(failures.join(", ")));
    }
    Ok(saved)
  }

  async fn municipalities(&self) -> Result<String, Error> {
    let path = &self.config.output.municipalities_file;
    let entries = self.opendata.dump_municipalities(path).await?;
    Ok(format!("Saved {} municipalities to {}\n", entries, path.display()))
  }

  async fn prediction(&self) -> Result<String, Error> {
    let settings = &self.config.prediction;
    let mut forecast = self
      .opendata
      .text_forecast(settings.day, settings.region.as_deref())
      .await?;

    if settings.translate {
      let translator = self
        .translator
        .as_deref()
        .ok_or_else(|| Error::ConfigError("translation requested without a translator".into()))?;
      forecast = forecast
        .translate(
          translator,
          &self.config.translation.target_lang,
          self.config.translation.source_lang.as_deref(),
        )
        .await?;
    }

    Ok(format!(
      "Significant phenomena: {}\nWeather prediction: {}\n",
      forecast.hazards, forecast.prediction
    ))
  }
}

fn emit(console: &mut dyn Write, text: &str) {
  let text = text.trim_end_matches('\n');
  if let Err(e) = writeln!(console, "{}", text) {
    warn!("Failed to write to console: {}", e);
  }
}
