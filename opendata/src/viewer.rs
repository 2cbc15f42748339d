// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use async_trait::async_trait;
use base::Error;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Displays a downloaded image.
#[async_trait]
pub trait ImageViewer: Send + Sync {
  async fn show(&self, path: &Path) -> Result<(), Error>;
}

/// Runs an external program with the image path as its only argument and
/// waits for it to exit.
#[derive(Debug, Clone)]
pub struct CommandViewer {
  program: String,
}

/// Skips display.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoViewer;

impl CommandViewer {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
    }
  }
}

#[async_trait]
impl ImageViewer for CommandViewer {
  #[instrument(skip(self), fields(program = %self.program))]
  async fn show(&self, path: &Path) -> Result<(), Error> {
    let status = Command::new(&self.program).arg(path).status().await?;
    if !status.success() {
      return Err(Error::Err(format!("{} exited with {}", self.program, status)));
    }
    Ok(())
  }
}

#[async_trait]
impl ImageViewer for NoViewer {
  async fn show(&self, path: &Path) -> Result<(), Error> {
    debug!("No viewer configured, not displaying {}", path.display());
    Ok(())
  }
}

pub fn from_config(program: Option<&str>) -> Box<dyn ImageViewer> {
  match program.map(str::trim).filter(|p| !p.is_empty()) {
    Some(program) => Box::new(CommandViewer::new(program)),
    None => Box::new(NoViewer),
  }
}
