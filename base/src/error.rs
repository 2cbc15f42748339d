// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use std::path::PathBuf;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
  #[error("API error: {0}")]
  ApiError(String),
  #[error("Configuration error: {0}")]
  ConfigError(String),
  #[error("IO error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("HTTP error: {0}")]
  HttpError(#[from] reqwest::Error),
  #[error("Failed to parse response: {0}")]
  ParseError(String),
  #[error("Regex error: {0}")]
  RegexError(#[from] regex::Error),
  #[error("Invalid API key")]
  InvalidApiKey,
  #[error("Rate limit exceeded")]
  RateLimitExceeded,
  #[error("Data unavailable: {0}")]
  DataUnavailable(String),
  #[error("Unexpected text format: {0}")]
  UnexpectedFormat(String),
  #[error("Forecast day {0} is missing from the payload")]
  MissingForecastDay(usize),
  #[error("Path not found: {}", .0.display())]
  PathNotFound(PathBuf),
  #[error("{0}")]
  Err(String),
}
