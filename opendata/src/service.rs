// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  catalog,
  client::{OpenDataApi, OpenDataClient},
  constants::UV_DAYS,
  endpoint::Endpoint,
  models::{forecast::MunicipalForecast, prediction::TextForecast, uv::UvIndex},
  products::{self, ProductOutcome},
  viewer::ImageViewer,
};
use base::{AemetConfig, DayOffset, Error};
use std::path::Path;
use tracing::{debug, info, instrument};

pub struct OpenDataService {
  api: Box<dyn OpenDataApi>,
}

impl OpenDataService {
  pub fn new(api_key: impl Into<String>, config: &AemetConfig) -> Result<Self, Error> {
    Ok(Self::with_api(Box::new(OpenDataClient::new(api_key, config)?)))
  }

  pub fn with_api(api: Box<dyn OpenDataApi>) -> Self {
    Self { api }
  }

  #[instrument(skip(self))]
  pub async fn hourly_forecast(&self, municipality: &str) -> Result<MunicipalForecast, Error> {
    info!("Fetching hourly forecast for municipality {}", municipality);
    let payload = self
      .api
      .fetch_json(&Endpoint::hourly_forecast(municipality))
      .await?;
    MunicipalForecast::from_payload(&payload)
  }

  /// UV index for today and the next three days. Stops at the first failing day.
  #[instrument(skip(self))]
  pub async fn uv_indices(&self) -> Result<Vec<UvIndex>, Error> {
    let mut indices = Vec::with_capacity(UV_DAYS as usize);
    for day in 0..UV_DAYS {
      let text = self.api.fetch_text(&Endpoint::uv_index(day)?).await?;
      let uv = UvIndex::parse(day, &text)?;
      debug!("UV index day +{}: {} zones", day, uv.zones.len());
      indices.push(uv);
    }
    Ok(indices)
  }

  #[instrument(skip(self))]
  pub async fn text_forecast(
    &self,
    day: DayOffset,
    region: Option<&str>,
  ) -> Result<TextForecast, Error> {
    let text = self
      .api
      .fetch_text(&Endpoint::text_forecast(day, region))
      .await?;
    TextForecast::parse(&text)
  }

  pub async fn satellite_images(
    &self,
    image_dir: &Path,
    viewer: &dyn ImageViewer,
  ) -> Vec<ProductOutcome> {
    info!("Fetching satellite products into {}", image_dir.display());
    products::fetch_all(self.api.as_ref(), viewer, image_dir).await
  }

  pub async fn dump_municipalities(&self, path: &Path) -> Result<usize, Error> {
    catalog::dump_municipalities(self.api.as_ref(), path).await
  }
}
