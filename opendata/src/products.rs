// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  client::OpenDataApi, endpoint::Endpoint, utils::file::update_file_atomically,
  viewer::ImageViewer,
};
use base::Error;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Satellite, radar and map images published as raw files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SatelliteProduct {
  VegetationIndex,
  SeaTemperature,
  PressureMap,
  Lightning,
  FireRisk,
  RadarReflectivity,
}

#[derive(Debug)]
pub struct ProductOutcome {
  pub product: SatelliteProduct,
  pub result: Result<PathBuf, Error>,
}

impl SatelliteProduct {
  pub const ALL: [SatelliteProduct; 6] = [
    SatelliteProduct::VegetationIndex,
    SatelliteProduct::SeaTemperature,
    SatelliteProduct::PressureMap,
    SatelliteProduct::Lightning,
    SatelliteProduct::FireRisk,
    SatelliteProduct::RadarReflectivity,
  ];

  pub fn path(&self) -> &'static str {
    match self {
      SatelliteProduct::VegetationIndex => "satelites/producto/nvdi",
      SatelliteProduct::SeaTemperature => "satelites/producto/sst",
      SatelliteProduct::PressureMap => "mapasygraficos/analisis",
      SatelliteProduct::Lightning => "red/rayos/mapa",
      SatelliteProduct::FireRisk => "incendios/mapasriesgo/estimado/area/p",
      SatelliteProduct::RadarReflectivity => "red/radar/nacional",
    }
  }

  pub fn file_name(&self) -> &'static str {
    match self {
      SatelliteProduct::VegetationIndex => "vegetation_index",
      SatelliteProduct::SeaTemperature => "sea_temperatures",
      SatelliteProduct::PressureMap => "pressure_map",
      SatelliteProduct::Lightning => "thunders",
      SatelliteProduct::FireRisk => "fire_risk",
      SatelliteProduct::RadarReflectivity => "reflectivity",
    }
  }
}

impl std::fmt::Display for SatelliteProduct {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let label = match self {
      SatelliteProduct::VegetationIndex => "vegetation index",
      SatelliteProduct::SeaTemperature => "sea surface temperature",
      SatelliteProduct::PressureMap => "pressure analysis map",
      SatelliteProduct::Lightning => "lightning map",
      SatelliteProduct::FireRisk => "estimated fire risk",
      SatelliteProduct::RadarReflectivity => "radar reflectivity",
    };
    write!(f, "{}", label)
  }
}

/// Downloads `product` into `image_dir` and hands the file to `viewer`.
/// A display failure is logged and does not fail the download.
#[instrument(skip(api, viewer))]
pub async fn fetch_product(
  api: &dyn OpenDataApi,
  viewer: &dyn ImageViewer,
  image_dir: &Path,
  product: SatelliteProduct,
) -> Result<PathBuf, Error> {
  let image = api.fetch_bytes(&Endpoint::Product(product)).await?;
  let path = image_dir.join(product.file_name());
  update_file_atomically(&path, &image).await?;
  info!("Saved {} ({} bytes) to {}", product, image.len(), path.display());

  if let Err(e) = viewer.show(&path).await {
    warn!("Could not display {}: {}", path.display(), e);
  }
  Ok(path)
}

/// Fetches every product in turn. Each product succeeds or fails on its own.
pub async fn fetch_all(
  api: &dyn OpenDataApi,
  viewer: &dyn ImageViewer,
  image_dir: &Path,
) -> Vec<ProductOutcome> {
  let mut outcomes = Vec::with_capacity(SatelliteProduct::ALL.len());
  for product in SatelliteProduct::ALL {
    let result = fetch_product(api, viewer, image_dir, product).await;
    if let Err(e) = &result {
      warn!("Product {} failed: {}", product, e);
    }
    outcomes.push(ProductOutcome { product, result });
  }
  outcomes
}
