use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "sentiment";
pub const ENV_PREFIX: &str = "SENTIMENT";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
  /// Number of actix workers; actix picks one per core when unset.
  pub workers: Option<usize>,
  pub max_payload_bytes: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ModelConfig {
  pub path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
  pub server: ServerConfig,
  pub model: ModelConfig,
}

impl Settings {
  /// Layers built-in defaults, then the config file, then `SENTIMENT__*`
  /// environment variables (e.g. `SENTIMENT__SERVER__PORT=8080`).
  ///
  /// An explicitly named file must exist; otherwise `sentiment.{toml,yaml,json}`
  /// in the working directory is used when present.
  pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
    let file = match config_file {
      Some(name) => File::with_name(name).required(true),
      None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    Config::builder()
      .set_default("server.host", "0.0.0.0")?
      .set_default("server.port", 5000_i64)?
      .set_default("server.max_payload_bytes", 65_536_i64)?
      .set_default("model.path", "model/sentiment_pipeline.bin")?
      .add_source(file)
      .add_source(Environment::with_prefix(ENV_PREFIX).prefix_separator("__").separator("__"))
      .build()?
      .try_deserialize()
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server.host, self.server.port)
  }
}
