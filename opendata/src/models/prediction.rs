// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::constants::BOUNDARY_MARKER;
use base::{Error, TranslationService};
use regex::Regex;
use tracing::{debug, instrument};

/// National or regional text forecast split into its two prose sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextForecast {
  /// Significant phenomena.
  pub hazards: String,
  pub prediction: String,
}

impl TextForecast {
  /// Section headings look like `A.- FENÓMENOS SIGNIFICATIVOS`: any line with
  /// a character directly followed by a hyphen starts a section. The hazard
  /// block sits between the first two headings, the prediction follows the
  /// second one.
  #[instrument(skip(text), fields(len = text.len()))]
  pub fn parse(text: &str) -> Result<Self, Error> {
    let marker = Regex::new(BOUNDARY_MARKER)?;

    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let markers: Vec<usize> = lines
      .iter()
      .enumerate()
      .filter(|(_, line)| marker.is_match(line))
      .map(|(idx, _)| idx)
      .collect();

    let (first, second) = match markers.as_slice() {
      [first, second, ..] => (*first, *second),
      _ => {
        return Err(Error::UnexpectedFormat(format!(
          "expected two section headings, found {}",
          markers.len()
        )))
      }
    };
    debug!("Section headings at lines {} and {}", first, second);

    Ok(Self {
      hazards: lines[first + 1..second].join(" "),
      prediction: lines[second + 1..].join(" "),
    })
  }

  /// Translates both blocks in a single batch.
  #[instrument(skip(self, translator))]
  pub async fn translate(
    self,
    translator: &dyn TranslationService,
    target_lang: &str,
    source_lang: Option<&str>,
  ) -> Result<Self, Error> {
    let mut translated = translator
      .translate_batch(vec![self.hazards, self.prediction], target_lang, source_lang)
      .await?
      .into_iter();

    let mut next = |block: &str| {
      translated
        .next()
        .flatten()
        .ok_or_else(|| Error::ApiError(format!("translation of {} is missing", block)))
    };

    let hazards = next("hazard phenomena")?;
    let prediction = next("prediction")?;
    Ok(Self { hazards, prediction })
  }
}
