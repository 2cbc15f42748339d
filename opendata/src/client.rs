// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  constants::{API_KEY_PARAM, USER_AGENT},
  endpoint::Endpoint,
  models::api::Envelope,
};
use async_trait::async_trait;
use base::{AemetConfig, Error};
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

/// Access to AEMET OpenData payloads. Every failure is reported as
/// [`Error::DataUnavailable`] with the cause in the message.
#[async_trait]
pub trait OpenDataApi: Send + Sync {
  async fn fetch_bytes(&self, endpoint: &Endpoint) -> Result<Vec<u8>, Error>;

  async fn fetch_text(&self, endpoint: &Endpoint) -> Result<String, Error>;

  async fn fetch_json(&self, endpoint: &Endpoint) -> Result<Value, Error> {
    let text = self.fetch_text(endpoint).await?;
    serde_json::from_str(&text)
      .map_err(|e| Error::DataUnavailable(format!("{}: malformed JSON: {}", endpoint, e)))
  }
}

#[derive(Clone)]
pub struct OpenDataClient {
  client: Client,
  api_key: String,
  base_url: String,
}

impl std::fmt::Debug for OpenDataClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("OpenDataClient")
      .field("base_url", &self.base_url)
      .finish_non_exhaustive()
  }
}

impl OpenDataClient {
  pub fn new(api_key: impl Into<String>, config: &AemetConfig) -> Result<Self, Error> {
    let api_key = api_key.into();
    if api_key.trim().is_empty() {
      return Err(Error::InvalidApiKey);
    }

    let client = Client::builder()
      .timeout(config.timeout())
      .user_agent(USER_AGENT)
      .build()?;

    Ok(Self {
      client,
      api_key,
      base_url: config.base_url.trim_end_matches('/').to_string(),
    })
  }

  fn build_api_url(&self, endpoint: &Endpoint) -> Result<Url, Error> {
    Url::parse_with_params(
      &format!("{}/{}", self.base_url, endpoint.path()),
      &[(API_KEY_PARAM, self.api_key.as_str())],
    )
    .map_err(|e| Error::DataUnavailable(format!("{}: invalid URL: {}", endpoint, e)))
  }

  async fn get(&self, endpoint: &Endpoint, url: Url) -> Result<Response, Error> {
    let response = self
      .client
      .get(url)
      .send()
      .await
      .map_err(|e| Error::DataUnavailable(format!("{}: request failed: {}", endpoint, e)))?;

    let status = response.status();
    if !status.is_success() {
      warn!("{} answered with status {}", endpoint, status);
      return Err(Error::DataUnavailable(format!(
        "{}: request failed with status {}",
        endpoint, status
      )));
    }

    Ok(response)
  }

  /// Requests the endpoint and, unless it is direct, follows the `datos`
  /// pointer. Returns the response holding the actual payload.
  #[instrument(skip(self))]
  async fn resolve(&self, endpoint: &Endpoint) -> Result<Response, Error> {
    let response = self.get(endpoint, self.build_api_url(endpoint)?).await?;
    if endpoint.is_direct() {
      return Ok(response);
    }

    let body = response
      .text()
      .await
      .map_err(|e| Error::DataUnavailable(format!("{}: unreadable body: {}", endpoint, e)))?;
    let envelope: Envelope = serde_json::from_str(&body)
      .map_err(|e| Error::DataUnavailable(format!("{}: malformed envelope: {}", endpoint, e)))?;
    let pointer = envelope
      .into_pointer()
      .map_err(|e| match e {
        Error::DataUnavailable(cause) => Error::DataUnavailable(format!("{}: {}", endpoint, cause)),
        other => other,
      })?;
    debug!("Following data pointer for {}", endpoint);

    let url = Url::parse(&pointer)
      .map_err(|e| Error::DataUnavailable(format!("{}: invalid data pointer: {}", endpoint, e)))?;
    self.get(endpoint, url).await
  }

  #[cfg(test)]
  pub(crate) fn with_base_url(api_key: &str, base_url: &str) -> Self {
    let client = Client::builder()
      .no_proxy()
      .build()
      .expect("Failed to create HTTP client");

    Self {
      client,
      api_key: api_key.to_string(),
      base_url: base_url.to_string(),
    }
  }
}

#[async_trait]
impl OpenDataApi for OpenDataClient {
  async fn fetch_bytes(&self, endpoint: &Endpoint) -> Result<Vec<u8>, Error> {
    let response = self.resolve(endpoint).await?;
    let bytes = response
      .bytes()
      .await
      .map_err(|e| Error::DataUnavailable(format!("{}: unreadable body: {}", endpoint, e)))?;
    Ok(bytes.to_vec())
  }

  /// Decodes with the charset the server declares; AEMET serves ISO-8859-15.
  async fn fetch_text(&self, endpoint: &Endpoint) -> Result<String, Error> {
    let response = self.resolve(endpoint).await?;
    response
      .text()
      .await
      .map_err(|e| Error::DataUnavailable(format!("{}: unreadable body: {}", endpoint, e)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{Route, TestServer};
  use serde_json::json;

  fn envelope(server: &TestServer, data_path: &str) -> Route {
    Route::json(
      200,
      json!({
        "descripcion": "exito",
        "estado": 200,
        "datos": server.url(data_path),
        "metadatos": server.url("/sh/meta"),
      }),
    )
  }

  #[tokio::test]
  async fn follows_pointer_and_returns_second_body() {
    let server = TestServer::start().await;
    let endpoint = Endpoint::hourly_forecast("28150");
    server.route(
      "/api/prediccion/especifica/municipio/horaria/28150",
      envelope(&server, "/sh/forecast"),
    );
    server.route("/sh/forecast", Route::json(200, json!([{"nombre": "Madrid"}])));

    let client = OpenDataClient::with_base_url("secret", &server.url("/api"));
    let payload = client.fetch_json(&endpoint).await.unwrap();

    assert_eq!(payload, json!([{"nombre": "Madrid"}]));
    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with("/api/prediccion/especifica/municipio/horaria/28150?"));
    assert!(requests[0].contains("api_key=secret"));
    assert_eq!(requests[1], "/sh/forecast");
  }

  #[tokio::test]
  async fn raw_bytes_are_returned_untouched() {
    let server = TestServer::start().await;
    let image: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x00, 0xff, 0x10];
    server.route("/api/red/radar/nacional", envelope(&server, "/sh/radar"));
    server.route("/sh/radar", Route::bytes(200, "image/gif", image.clone()));

    let client = OpenDataClient::with_base_url("secret", &server.url("/api"));
    let endpoint = Endpoint::Product(crate::SatelliteProduct::RadarReflectivity);
    assert_eq!(client.fetch_bytes(&endpoint).await.unwrap(), image);
  }

  #[tokio::test]
  async fn text_is_decoded_with_declared_charset() {
    let server = TestServer::start().await;
    server.route("/api/prediccion/nacional/hoy", envelope(&server, "/sh/text"));
    // "Predicción" in ISO-8859-15
    let body = vec![b'P', b'r', b'e', b'd', b'i', b'c', b'c', b'i', 0xf3, b'n'];
    server.route(
      "/sh/text",
      Route::bytes(200, "text/plain;charset=ISO-8859-15", body),
    );

    let client = OpenDataClient::with_base_url("secret", &server.url("/api"));
    let endpoint = Endpoint::text_forecast(base::DayOffset::Today, None);
    assert_eq!(client.fetch_text(&endpoint).await.unwrap(), "Predicción");
  }

  #[tokio::test]
  async fn direct_endpoint_skips_indirection() {
    let server = TestServer::start().await;
    server.route(
      "/api/maestro/municipios",
      Route::json(200, json!([{"id": "id28079", "nombre": "Madrid"}])),
    );

    let client = OpenDataClient::with_base_url("secret", &server.url("/api"));
    let catalog = client.fetch_json(&Endpoint::Municipalities).await.unwrap();
    assert_eq!(catalog[0]["nombre"], "Madrid");
    assert_eq!(server.requests().len(), 1);
  }

  #[tokio::test]
  async fn failures_surface_as_data_unavailable() {
    let server = TestServer::start().await;
    server.route("/api/red/rayos/mapa", Route::json(401, json!({"estado": 401})));
    server.route(
      "/api/prediccion/especifica/uvi/0",
      Route::json(200, json!({"descripcion": "exito", "estado": 200})),
    );
    server.route(
      "/api/prediccion/especifica/uvi/1",
      Route::bytes(200, "application/json", b"not json".to_vec()),
    );
    server.route("/api/prediccion/especifica/uvi/2", envelope(&server, "/sh/gone"));
    server.route("/sh/gone", Route::bytes(404, "text/plain", b"gone".to_vec()));

    let client = OpenDataClient::with_base_url("secret", &server.url("/api"));
    let endpoints = [
      Endpoint::Product(crate::SatelliteProduct::Lightning),
      Endpoint::uv_index(0).unwrap(),
      Endpoint::uv_index(1).unwrap(),
      Endpoint::uv_index(2).unwrap(),
      Endpoint::uv_index(3).unwrap(),
    ];
    for endpoint in &endpoints {
      let err = client.fetch_text(endpoint).await.unwrap_err();
      assert!(
        matches!(err, Error::DataUnavailable(_)),
        "{} gave {:?}",
        endpoint,
        err
      );
    }
  }

  #[tokio::test]
  async fn malformed_final_json_is_data_unavailable() {
    let server = TestServer::start().await;
    server.route(
      "/api/prediccion/especifica/municipio/horaria/28150",
      envelope(&server, "/sh/bad"),
    );
    server.route("/sh/bad", Route::bytes(200, "application/json", b"[{".to_vec()));

    let client = OpenDataClient::with_base_url("secret", &server.url("/api"));
    let err = client
      .fetch_json(&Endpoint::hourly_forecast("28150"))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::DataUnavailable(_)));
  }

  #[test]
  fn blank_api_key_is_rejected() {
    let err = OpenDataClient::new("  ", &AemetConfig::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidApiKey));
  }

  #[test]
  fn debug_output_hides_api_key() {
    let client = OpenDataClient::with_base_url("secret", "http://localhost/api");
    assert!(!format!("{:?}", client).contains("secret"));
  }
}
