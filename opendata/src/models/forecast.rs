// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use base::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of days the municipal forecast exposes: today and tomorrow.
pub const FORECAST_DAYS: usize = 2;

/// One day of the hourly municipal forecast. Every field is kept exactly as
/// AEMET sent it; absent fields read as `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ForecastDay {
  #[serde(rename = "fecha", default)]
  pub date: Value,
  #[serde(rename = "orto", default)]
  pub sunrise: Value,
  #[serde(rename = "ocaso", default)]
  pub sunset: Value,
  #[serde(rename = "estadoCielo", default)]
  pub sky: Value,
  #[serde(rename = "temperatura", default)]
  pub temperature: Value,
  #[serde(rename = "sensTermica", default)]
  pub thermal_sensation: Value,
  #[serde(rename = "humedadRelativa", default)]
  pub humidity: Value,
  #[serde(rename = "vientoAndRachaMax", default)]
  pub wind: Value,
  #[serde(rename = "precipitacion", default)]
  pub precipitation: Value,
  #[serde(rename = "probTormenta", default)]
  pub storm_probability: Value,
  #[serde(rename = "nieve", default)]
  pub snow: Value,
  #[serde(rename = "probNieve", default)]
  pub snow_probability: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastField {
  Sky,
  Temperature,
  ThermalSensation,
  Humidity,
  Wind,
  Precipitation,
  StormProbability,
  Snow,
  SnowProbability,
}

/// Date, sunrise and sunset of the first forecast day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayStatus<'a> {
  pub date: &'a Value,
  pub sunrise: &'a Value,
  pub sunset: &'a Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MunicipalForecast {
  pub location: Option<String>,
  pub province: Option<String>,
  days: [ForecastDay; FORECAST_DAYS],
}

impl ForecastField {
  pub const ALL: [ForecastField; 9] = [
    ForecastField::Sky,
    ForecastField::Temperature,
    ForecastField::ThermalSensation,
    ForecastField::Humidity,
    ForecastField::Wind,
    ForecastField::Precipitation,
    ForecastField::StormProbability,
    ForecastField::Snow,
    ForecastField::SnowProbability,
  ];

  pub fn label(&self) -> &'static str {
    match self {
      ForecastField::Sky => "sky",
      ForecastField::Temperature => "temperatures",
      ForecastField::ThermalSensation => "thermal_sensation",
      ForecastField::Humidity => "humidity",
      ForecastField::Wind => "wind",
      ForecastField::Precipitation => "precipitation",
      ForecastField::StormProbability => "storm",
      ForecastField::Snow => "snow",
      ForecastField::SnowProbability => "snow_probability",
    }
  }
}

impl ForecastDay {
  pub fn get(&self, field: ForecastField) -> &Value {
    match field {
      ForecastField::Sky => &self.sky,
      ForecastField::Temperature => &self.temperature,
      ForecastField::ThermalSensation => &self.thermal_sensation,
      ForecastField::Humidity => &self.humidity,
      ForecastField::Wind => &self.wind,
      ForecastField::Precipitation => &self.precipitation,
      ForecastField::StormProbability => &self.storm_probability,
      ForecastField::Snow => &self.snow,
      ForecastField::SnowProbability => &self.snow_probability,
    }
  }
}

impl MunicipalForecast {
  /// Extracts today and tomorrow from the decoded `municipio/horaria` payload,
  /// a JSON array whose first element carries `prediccion.dia`.
  pub fn from_payload(payload: &Value) -> Result<Self, Error> {
    let forecast = payload
      .as_array()
      .and_then(|items| items.first())
      .ok_or_else(|| Error::ParseError("forecast payload is not a non-empty array".into()))?;

    let days = forecast
      .pointer("/prediccion/dia")
      .and_then(Value::as_array)
      .ok_or_else(|| Error::ParseError("forecast payload has no `prediccion.dia` list".into()))?;

    let day = |index: usize| -> Result<ForecastDay, Error> {
      let raw = days.get(index).ok_or(Error::MissingForecastDay(index))?;
      ForecastDay::deserialize(raw)
        .map_err(|e| Error::ParseError(format!("forecast day {}: {}", index, e)))
    };

    let text = |key: &str| forecast.get(key).and_then(Value::as_str).map(String::from);

    Ok(Self {
      location: text("nombre"),
      province: text("provincia"),
      days: [day(0)?, day(1)?],
    })
  }

  pub fn day(&self, index: usize) -> Result<&ForecastDay, Error> {
    self.days.get(index).ok_or(Error::MissingForecastDay(index))
  }

  pub fn field(&self, field: ForecastField, day: usize) -> Result<&Value, Error> {
    Ok(self.day(day)?.get(field))
  }

  /// Today's and tomorrow's value of `field`.
  pub fn pair(&self, field: ForecastField) -> [&Value; FORECAST_DAYS] {
    [self.days[0].get(field), self.days[1].get(field)]
  }

  pub fn status(&self) -> DayStatus<'_> {
    let today = &self.days[0];
    DayStatus {
      date: &today.date,
      sunrise: &today.sunrise,
      sunset: &today.sunset,
    }
  }

  pub fn summary(&self) -> String {
    let status = self.status();
    let mut content = format!(
      "{} ({}): {} sunrise {} sunset {}\n",
      self.location.as_deref().unwrap_or("Unknown"),
      self.province.as_deref().unwrap_or("-"),
      plain(status.date),
      plain(status.sunrise),
      plain(status.sunset),
    );

    for field in ForecastField::ALL {
      let [today, tomorrow] = self.pair(field);
      content.push_str(&format!(
        "{:<18} today: {} | tomorrow: {}\n",
        field.label(),
        today,
        tomorrow
      ));
    }
    content
  }
}

fn plain(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    Value::Null => "-".to_string(),
    other => other.to_string(),
  }
}
