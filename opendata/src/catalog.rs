// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{client::OpenDataApi, endpoint::Endpoint, utils::file::update_file_atomically};
use base::Error;
use std::path::Path;
use tracing::{info, instrument};

/// Writes the full municipality catalog to `path` as compact JSON with
/// non-ASCII characters kept literally. Returns the number of entries.
#[instrument(skip(api))]
pub async fn dump_municipalities(api: &dyn OpenDataApi, path: &Path) -> Result<usize, Error> {
  let catalog = api.fetch_json(&Endpoint::Municipalities).await?;
  let entries = catalog.as_array().map_or(0, Vec::len);

  let content = serde_json::to_string(&catalog).map_err(|e| Error::ParseError(e.to_string()))?;
  update_file_atomically(path, content.as_bytes()).await?;

  info!("Saved {} municipalities to {}", entries, path.display());
  Ok(entries)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::MockApi;

  const CATALOG: &str = r#"[
    {"latitud": "40°25'0.390\"", "id": "id28079", "nombre": "Madrid", "capital": "Madrid"},
    {"latitud": "42°52'49\"", "id": "id31201", "nombre": "Pamplona/Iruña", "capital": "Pamplona/Iruña"}
  ]"#;

  #[tokio::test]
  async fn keeps_non_ascii_literally() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("muni.txt");
    let api = MockApi::default().with(&Endpoint::Municipalities, CATALOG);

    let entries = dump_municipalities(&api, &path).await.unwrap();

    assert_eq!(entries, 2);
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"nombre\":\"Pamplona/Iruña\""));
    assert!(written.contains("40°25'0.390\\\""));
    assert!(!written.contains("\\u"));
    assert!(!written.contains('\n'));
  }

  #[tokio::test]
  async fn overwrites_existing_dump() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("muni.txt");
    std::fs::write(&path, "x".repeat(4096)).unwrap();
    let api = MockApi::default().with(&Endpoint::Municipalities, "[]");

    assert_eq!(dump_municipalities(&api, &path).await.unwrap(), 0);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
  }

  #[tokio::test]
  async fn unavailable_catalog_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("muni.txt");
    let api = MockApi::default().failing(&Endpoint::Municipalities, "timeout");

    assert!(matches!(
      dump_municipalities(&api, &path).await,
      Err(Error::DataUnavailable(_))
    ));
    assert!(!path.exists());
  }
}
