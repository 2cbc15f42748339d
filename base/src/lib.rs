// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
pub mod config;
pub mod dotenv;
pub mod error;
pub mod translate;

pub use config::{
  AemetConfig, Config, DayOffset, OutputConfig, PredictionConfig, StagesConfig,
  TranslationConfig,
};
pub use error::Error;
pub use translate::{DeepLClient, TranslationService};
