// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::constants::ENVELOPE_OK;
use base::Error;
use serde::Deserialize;

/// First-stage response of every indirect endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct Envelope {
  #[serde(default)]
  pub descripcion: Option<String>,
  #[serde(default)]
  pub estado: Option<u16>,
  #[serde(default)]
  pub datos: Option<String>,
  #[serde(default)]
  pub metadatos: Option<String>,
}

impl Envelope {
  /// URL of the actual payload.
  pub fn into_pointer(self) -> Result<String, Error> {
    if let Some(estado) = self.estado.filter(|&e| e != ENVELOPE_OK) {
      return Err(Error::DataUnavailable(format!(
        "AEMET status {}: {}",
        estado,
        self.descripcion.unwrap_or_default()
      )));
    }

    self
      .datos
      .filter(|d| !d.trim().is_empty())
      .ok_or_else(|| Error::DataUnavailable("response has no `datos` pointer".into()))
  }
}
