// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{constants::UV_DAYS, products::SatelliteProduct};
use base::{DayOffset, Error};

/// AEMET OpenData resources, relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
  HourlyForecast { municipality: String },
  UvIndex { day: u8 },
  Product(SatelliteProduct),
  Municipalities,
  NationalForecast { day: DayOffset },
  RegionalForecast { day: DayOffset, region: String },
}

impl Endpoint {
  pub fn hourly_forecast(municipality: impl Into<String>) -> Self {
    Endpoint::HourlyForecast {
      municipality: municipality.into(),
    }
  }

  pub fn uv_index(day: u8) -> Result<Self, Error> {
    if day >= UV_DAYS {
      return Err(Error::ConfigError(format!(
        "UV index day offset {} is out of range 0..{}",
        day, UV_DAYS
      )));
    }
    Ok(Endpoint::UvIndex { day })
  }

  /// Regional forecast when `region` is given, national otherwise.
  pub fn text_forecast(day: DayOffset, region: Option<&str>) -> Self {
    match region {
      Some(region) => Endpoint::RegionalForecast {
        day,
        region: region.to_string(),
      },
      None => Endpoint::NationalForecast { day },
    }
  }

  pub fn path(&self) -> String {
    match self {
      Endpoint::HourlyForecast { municipality } => {
        format!("prediccion/especifica/municipio/horaria/{}", municipality)
      }
      Endpoint::UvIndex { day } => format!("prediccion/especifica/uvi/{}", day),
      Endpoint::Product(product) => product.path().to_string(),
      Endpoint::Municipalities => "maestro/municipios".to_string(),
      Endpoint::NationalForecast { day } => {
        format!("prediccion/nacional/{}", day.path_segment())
      }
      Endpoint::RegionalForecast { day, region } => {
        format!("prediccion/ccaa/{}/{}", day.path_segment(), region)
      }
    }
  }

  /// The catalog answers with the data itself instead of a `datos` pointer.
  pub fn is_direct(&self) -> bool {
    matches!(self, Endpoint::Municipalities)
  }
}

impl std::fmt::Display for Endpoint {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.path())
  }
}
