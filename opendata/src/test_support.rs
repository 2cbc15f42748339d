// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{client::OpenDataApi, endpoint::Endpoint, viewer::ImageViewer};
use async_trait::async_trait;
use base::{Error, TranslationService};
use serde_json::Value;
use std::{
  collections::HashMap,
  net::SocketAddr,
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
};
use tokio::{
  io::{AsyncReadExt, AsyncWriteExt},
  net::{TcpListener, TcpStream},
};

#[derive(Debug, Clone)]
pub(crate) struct Route {
  status: u16,
  content_type: String,
  body: Vec<u8>,
}

impl Route {
  pub fn json(status: u16, body: Value) -> Self {
    Self::bytes(status, "application/json", body.to_string().into_bytes())
  }

  pub fn bytes(status: u16, content_type: &str, body: Vec<u8>) -> Self {
    Self {
      status,
      content_type: content_type.to_string(),
      body,
    }
  }
}

type Routes = Arc<Mutex<HashMap<String, Route>>>;
type Requests = Arc<Mutex<Vec<String>>>;

/// Minimal HTTP/1.1 server answering GET requests from a path table.
/// Unknown paths get a 404; every request target is recorded in order.
pub(crate) struct TestServer {
  addr: SocketAddr,
  routes: Routes,
  requests: Requests,
}

impl TestServer {
  pub async fn start() -> Self {
    let listener = TcpListener::bind("127.0.0.1:0")
      .await
      .expect("bind test server");
    let addr = listener.local_addr().expect("test server address");
    let routes: Routes = Arc::default();
    let requests: Requests = Arc::default();

    let (shared_routes, shared_requests) = (routes.clone(), requests.clone());
    tokio::spawn(async move {
      while let Ok((socket, _)) = listener.accept().await {
        let (routes, requests) = (shared_routes.clone(), shared_requests.clone());
        tokio::spawn(async move {
          let _ = serve(socket, routes, requests).await;
        });
      }
    });

    Self {
      addr,
      routes,
      requests,
    }
  }

  pub fn url(&self, path: &str) -> String {
    format!("http://{}{}", self.addr, path)
  }

  pub fn route(&self, path: &str, route: Route) {
    self
      .routes
      .lock()
      .expect("routes lock")
      .insert(path.to_string(), route);
  }

  pub fn requests(&self) -> Vec<String> {
    self.requests.lock().expect("requests lock").clone()
  }
}

async fn serve(mut socket: TcpStream, routes: Routes, requests: Requests) -> std::io::Result<()> {
  let mut head = Vec::new();
  let mut chunk = [0u8; 1024];
  while !head.windows(4).any(|w| w == b"\r\n\r\n") {
    let n = socket.read(&mut chunk).await?;
    if n == 0 {
      return Ok(());
    }
    head.extend_from_slice(&chunk[..n]);
  }

  let target = String::from_utf8_lossy(&head)
    .lines()
    .next()
    .and_then(|line| line.split_whitespace().nth(1))
    .unwrap_or("/")
    .to_string();
  requests.lock().expect("requests lock").push(target.clone());

  let path = target.split('?').next().unwrap_or("/");
  let route = routes
    .lock()
    .expect("routes lock")
    .get(path)
    .cloned()
    .unwrap_or_else(|| Route::bytes(404, "text/plain", b"not found".to_vec()));

  let status_line = format!(
    "HTTP/1.1 {} Test\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
    route.status,
    route.content_type,
    route.body.len()
  );
  socket.write_all(status_line.as_bytes()).await?;
  socket.write_all(&route.body).await?;
  socket.shutdown().await
}

/// In-memory [`OpenDataApi`] keyed by endpoint path.
#[derive(Default)]
pub(crate) struct MockApi {
  responses: HashMap<String, Result<Vec<u8>, String>>,
  calls: Mutex<Vec<String>>,
}

impl MockApi {
  pub fn with(mut self, endpoint: &Endpoint, body: impl Into<Vec<u8>>) -> Self {
    self.responses.insert(endpoint.path(), Ok(body.into()));
    self
  }

  pub fn failing(mut self, endpoint: &Endpoint, cause: &str) -> Self {
    self.responses.insert(endpoint.path(), Err(cause.to_string()));
    self
  }

  pub fn calls(&self) -> Vec<String> {
    self.calls.lock().expect("calls lock").clone()
  }
}

#[async_trait]
impl OpenDataApi for MockApi {
  async fn fetch_bytes(&self, endpoint: &Endpoint) -> Result<Vec<u8>, Error> {
    self.calls.lock().expect("calls lock").push(endpoint.path());
    match self.responses.get(&endpoint.path()) {
      Some(Ok(body)) => Ok(body.clone()),
      Some(Err(cause)) => Err(Error::DataUnavailable(cause.clone())),
      None => Err(Error::DataUnavailable(format!("{}: no route", endpoint))),
    }
  }

  async fn fetch_text(&self, endpoint: &Endpoint) -> Result<String, Error> {
    let bytes = self.fetch_bytes(endpoint).await?;
    String::from_utf8(bytes).map_err(|e| Error::DataUnavailable(e.to_string()))
  }
}

#[derive(Default)]
pub(crate) struct UppercaseTranslator {
  pub drop_last: bool,
  pub targets: Mutex<Vec<String>>,
}

#[async_trait]
impl TranslationService for UppercaseTranslator {
  async fn translate_batch(
    &self,
    texts: Vec<String>,
    target_lang: &str,
    _source_lang: Option<&str>,
  ) -> Result<Vec<Option<String>>, Error> {
    self
      .targets
      .lock()
      .expect("targets lock")
      .push(target_lang.to_string());
    let mut out: Vec<Option<String>> = texts.iter().map(|t| Some(t.to_uppercase())).collect();
    if self.drop_last {
      out.pop();
    }
    Ok(out)
  }
}

#[derive(Default)]
pub(crate) struct RecordingViewer {
  pub fail: bool,
  pub shown: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl ImageViewer for RecordingViewer {
  async fn show(&self, path: &Path) -> Result<(), Error> {
    self
      .shown
      .lock()
      .expect("shown lock")
      .push(path.to_path_buf());
    if self.fail {
      return Err(Error::Err("viewer exited with status 1".into()));
    }
    Ok(())
  }
}
