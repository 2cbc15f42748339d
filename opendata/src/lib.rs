// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
pub mod catalog;
pub mod client;
pub mod endpoint;
pub mod models;
pub mod products;
pub mod service;
pub mod viewer;
mod utils;

#[cfg(test)]
mod test_support;

pub use client::{OpenDataApi, OpenDataClient};
pub use endpoint::Endpoint;
pub use models::forecast::{ForecastDay, ForecastField, MunicipalForecast};
pub use models::prediction::TextForecast;
pub use models::uv::UvIndex;
pub use products::{ProductOutcome, SatelliteProduct};
pub use service::OpenDataService;
pub use viewer::{CommandViewer, ImageViewer, NoViewer};

pub mod constants {
  pub(crate) const USER_AGENT: &str = concat!("tiempo/", env!("CARGO_PKG_VERSION"));
  pub(crate) const API_KEY_PARAM: &str = "api_key";
  /// AEMET's own status code inside the envelope; anything else means no data.
  pub(crate) const ENVELOPE_OK: u16 = 200;
  pub(crate) const UV_DAYS: u8 = 4;
  pub(crate) const UV_HEADER_LINES: usize = 5;
  pub(crate) const BOUNDARY_MARKER: &str = ".-";
}
