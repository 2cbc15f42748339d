// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use base::Error;
use std::path::Path;
use tokio::fs;

/// Replaces `path` with `content`, creating parent directories. The data is
/// written next to the target first, so a failed write leaves the old file intact.
pub async fn update_file_atomically(path: &Path, content: &[u8]) -> Result<(), Error> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent).await?;
  }

  let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
  temp_name.push(".tmp");
  let temp_path = path.with_file_name(temp_name);

  let written = match fs::write(&temp_path, content).await {
    Ok(()) => fs::rename(&temp_path, path).await,
    Err(e) => Err(e),
  };
  if let Err(e) = written {
    let _ = fs::remove_file(&temp_path).await;
    return Err(e.into());
  }
  Ok(())
}
