use crate::Error;
use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Once;

static INIT: Once = Once::new();
static DEFAULT_FILENAME: &str = ".env";

/// Variables read from a `.env` file. Values already present in the process
/// environment are never overwritten.
#[derive(Debug, Default)]
pub struct Dotenv {
  vars: HashMap<String, String>,
}

impl Dotenv {
  pub fn new() -> Self {
    Self::default()
  }

  /// Loads `KEY=VALUE` pairs from `filename`, or from `.env` when `None`.
  ///
  /// Blank lines and lines starting with `#` are ignored, an `export ` prefix
  /// is accepted, and surrounding single or double quotes are stripped from values.
  pub fn load_from_file<P: AsRef<Path>>(&mut self, filename: Option<P>) -> Result<(), Error> {
    let path = filename.map_or_else(
      || PathBuf::from(DEFAULT_FILENAME),
      |p| p.as_ref().to_path_buf(),
    );

    if !path.exists() {
      return Err(Error::PathNotFound(path));
    }

    let reader = BufReader::new(File::open(&path)?);
    for (line_num, line) in reader.lines().enumerate() {
      self.load_line(line_num + 1, &line?)?;
    }

    Ok(())
  }

  pub fn load_from_str(&mut self, content: &str) -> Result<(), Error> {
    for (line_num, line) in content.lines().enumerate() {
      self.load_line(line_num + 1, line)?;
    }
    Ok(())
  }

  fn load_line(&mut self, line_num: usize, line: &str) -> Result<(), Error> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
      return Ok(());
    }

    let (key, value) = Self::parse_line(trimmed)
      .map_err(|err| Error::Err(format!("Error on line {}: {}", line_num, err)))?;
    self.vars.insert(key, value);
    Ok(())
  }

  fn parse_line(line: &str) -> Result<(String, String), String> {
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line
      .split_once('=')
      .ok_or_else(|| "Invalid format: missing '='".to_string())?;

    let key = key.trim();
    if key.is_empty() {
      return Err("Empty key".to_string());
    }

    let value = value.trim().trim_matches('"').trim_matches('\'').to_string();
    Ok((key.to_string(), value))
  }

  pub fn set_env_vars(&self) {
    for (key, value) in &self.vars {
      if env::var_os(key).is_none() {
        env::set_var(key, value);
      }
    }
  }

  pub fn get(&self, key: &str) -> Option<&String> {
    self.vars.get(key)
  }
}

/// Loads `.env` from the working directory once per process. A missing file is not an error.
pub fn load() -> Result<(), Error> {
  let mut result = Ok(());
  INIT.call_once(|| {
    let mut dotenv = Dotenv::new();
    match dotenv.load_from_file::<&str>(None) {
      Ok(()) => dotenv.set_env_vars(),
      Err(Error::PathNotFound(_)) => {}
      Err(err) => result = Err(err),
    }
  });
  result
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn parses_quoted_and_exported_values() {
    let mut dotenv = Dotenv::new();
    dotenv
      .load_from_str("# secrets\n\nAEMET_API_KEY=\"abc.def\"\nexport DEEPL_API_KEY='k:fx'\n")
      .unwrap();

    assert_eq!(dotenv.get("AEMET_API_KEY").map(String::as_str), Some("abc.def"));
    assert_eq!(dotenv.get("DEEPL_API_KEY").map(String::as_str), Some("k:fx"));
  }

  #[test]
  fn reports_line_of_malformed_entry() {
    let mut dotenv = Dotenv::new();
    let err = dotenv.load_from_str("A=1\nnot a pair\n").unwrap_err();
    assert_eq!(err.to_string(), "Error on line 2: Invalid format: missing '='");
  }

  #[test]
  fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut dotenv = Dotenv::new();
    let err = dotenv
      .load_from_file(Some(dir.path().join(".env")))
      .unwrap_err();
    assert!(matches!(err, Error::PathNotFound(_)));
  }

  #[test]
  fn existing_environment_wins() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "TIEMPO_DOTENV_TEST_KEEP=from_file").unwrap();
    writeln!(file, "TIEMPO_DOTENV_TEST_NEW=from_file").unwrap();

    env::set_var("TIEMPO_DOTENV_TEST_KEEP", "from_env");
    let mut dotenv = Dotenv::new();
    dotenv.load_from_file(Some(file.path())).unwrap();
    dotenv.set_env_vars();

    assert_eq!(env::var("TIEMPO_DOTENV_TEST_KEEP").unwrap(), "from_env");
    assert_eq!(env::var("TIEMPO_DOTENV_TEST_NEW").unwrap(), "from_file");
  }
}
