// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::Error;
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEEPL_FREE_URL: &str = "https://api-free.deepl.com/v2";
const DEEPL_PRO_URL: &str = "https://api.deepl.com/v2";
const DEEPL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize, Debug)]
struct TranslationResponse {
  translations: Vec<Translation>,
}

#[derive(Deserialize, Debug)]
struct Translation {
  text: String,
}

#[derive(Serialize, Debug)]
struct TranslationRequest<'a> {
  text: Vec<&'a str>,
  target_lang: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  source_lang: Option<String>,
}

/// Translates free text. Returns one entry per input text, in order.
#[async_trait]
pub trait TranslationService: Send + Sync {
  async fn translate_batch(
    &self,
    texts: Vec<String>,
    target_lang: &str,
    source_lang: Option<&str>,
  ) -> Result<Vec<Option<String>>, Error>;
}

#[derive(Clone, Debug)]
pub struct DeepLClient {
  api_key: String,
  client: Client,
  base_url: String,
}

impl DeepLClient {
  pub fn new(api_key: impl Into<String>, is_pro: bool) -> Result<Self, Error> {
    let api_key = api_key.into();
    let base_url = if is_pro { DEEPL_PRO_URL } else { DEEPL_FREE_URL };

    let mut headers = header::HeaderMap::new();
    headers.insert(
      header::AUTHORIZATION,
      header::HeaderValue::from_str(&format!("DeepL-Auth-Key {}", api_key))
        .map_err(|_| Error::InvalidApiKey)?,
    );

    let client = Client::builder()
      .default_headers(headers)
      .timeout(DEEPL_TIMEOUT)
      .build()?;

    Ok(Self {
      api_key,
      client,
      base_url: base_url.to_string(),
    })
  }

  fn validate_config(&self) -> Result<(), Error> {
    if self.api_key.trim().is_empty() {
      return Err(Error::InvalidApiKey);
    }
    Ok(())
  }
}

#[async_trait]
impl TranslationService for DeepLClient {
  #[instrument(skip(self, texts), fields(count = texts.len()))]
  async fn translate_batch(
    &self,
    texts: Vec<String>,
    target_lang: &str,
    source_lang: Option<&str>,
  ) -> Result<Vec<Option<String>>, Error> {
    self.validate_config()?;

    if texts.is_empty() {
      return Ok(Vec::new());
    }

    let request_body = TranslationRequest {
      text: texts.iter().map(|s| s.as_str()).collect(),
      target_lang: target_lang.to_uppercase(),
      source_lang: source_lang.map(|s| s.to_uppercase()),
    };

    let response = self
      .client
      .post(format!("{}/translate", self.base_url))
      .json(&request_body)
      .send()
      .await?;

    match response.status() {
      reqwest::StatusCode::OK => {
        let response_data: TranslationResponse = response
          .json()
          .await
          .map_err(|e| Error::ApiError(e.to_string()))?;
        debug!("Received {} translations", response_data.translations.len());

        let mut translated = response_data.translations.into_iter().map(|t| t.text);
        Ok(texts.iter().map(|_| translated.next()).collect())
      }
      reqwest::StatusCode::TOO_MANY_REQUESTS => Err(Error::RateLimitExceeded),
      _ => {
        let error_text = response
          .text()
          .await
          .unwrap_or_else(|_| "Unknown error".to_string());
        Err(Error::ApiError(error_text))
      }
    }
  }
}
