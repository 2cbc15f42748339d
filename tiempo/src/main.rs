// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
mod runner;

use anyhow::{Context, Result};
use base::Config;
use runner::ServiceRunner;
use std::{env, path::PathBuf};
use tracing::{error, info};

const CONFIG_ENV: &str = "TIEMPO_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "tiempo.toml";

#[cfg(debug_assertions)]
fn setup_logging() {
  tracing_subscriber::fmt()
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_writer(std::io::stderr)
    .init();
}

#[cfg(not(debug_assertions))]
fn setup_logging() {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  #[cfg(debug_assertions)]
  base::dotenv::load()?;
  setup_logging();

  let config_path: PathBuf = env::var(CONFIG_ENV)
    .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    .into();
  let config = Config::load(&config_path)
    .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

  let runner = ServiceRunner::from_env(config).context("Missing API credentials")?;

  let report = runner.run(&mut std::io::stdout()).await;
  let elapsed = report.finished_at - report.started_at;
  info!(
    "Run finished in {} ms: {} completed, {} failed",
    elapsed.num_milliseconds(),
    report.completed(),
    report.failed().count()
  );

  if report.all_failed() {
    error!("Every enabled stage failed");
    std::process::exit(1);
  }
  Ok(())
}
