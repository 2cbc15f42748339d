// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::constants::UV_HEADER_LINES;
use base::Error;

/// UV index per zone for one day offset. Values are kept as AEMET prints them,
/// zones in the order the file lists them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UvIndex {
  pub day: u8,
  pub zones: Vec<(String, String)>,
}

impl UvIndex {
  /// Parses the CSV-like `uvi` text: quotes are dropped, the five header
  /// lines and the trailing line are skipped, and every other line is split
  /// at its last comma into zone and index.
  pub fn parse(day: u8, text: &str) -> Result<Self, Error> {
    let cleaned = text.replace('"', "");
    let lines: Vec<&str> = cleaned.lines().collect();
    let body: &[&str] = if lines.len() > UV_HEADER_LINES {
      &lines[UV_HEADER_LINES..lines.len() - 1]
    } else {
      &[]
    };

    let mut zones: Vec<(String, String)> = Vec::new();
    for line in body.iter().filter(|l| !l.trim().is_empty()) {
      let (zone, index) = line
        .rsplit_once(',')
        .ok_or_else(|| Error::ParseError(format!("UV line without index: {:?}", line)))?;
      let (zone, index) = (zone.trim().to_string(), index.trim().to_string());
      match zones.iter_mut().find(|(known, _)| *known == zone) {
        Some(entry) => entry.1 = index,
        None => zones.push((zone, index)),
      }
    }

    Ok(Self { day, zones })
  }

  pub fn get(&self, zone: &str) -> Option<&str> {
    self
      .zones
      .iter()
      .find(|(known, _)| known == zone)
      .map(|(_, index)| index.as_str())
  }

  pub fn render(&self) -> String {
    let width = self
      .zones
      .iter()
      .map(|(z, _)| z.chars().count())
      .max()
      .unwrap_or(0);
    let mut content = format!("UV index, day +{}\n", self.day);
    for (zone, index) in &self.zones {
      content.push_str(&format!("  {:<width$}  {}\n", zone, index, width = width));
    }
    content
  }
}
