use crate::config::Settings;

use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "sentiment-api", about = "Sentiment140 logistic regression inference service")]
pub struct Cli {
  /// Configuration file (toml, yaml or json)
  #[structopt(short, long)]
  pub config: Option<String>,

  #[structopt(subcommand)]
  pub command: Command,
}

#[derive(StructOpt, Debug)]
pub enum Command {
  /// Run the HTTP prediction API
  Serve(ServeArgs),

  /// Predict the sentiment of one text and print it as JSON
  Predict {
    #[structopt(short, long, parse(from_os_str))]
    model: Option<PathBuf>,

    /// Text to classify; multiple words are joined with spaces
    #[structopt(required = true)]
    text: Vec<String>,
  },

  /// Score the model against a labelled Sentiment140 CSV file
  Evaluate(EvaluateArgs),

  /// Re-encode an artifact, e.g. the notebook's JSON export into .bin
  Convert {
    #[structopt(parse(from_os_str))]
    input: PathBuf,
    #[structopt(parse(from_os_str))]
    output: PathBuf,
  },
}

#[derive(StructOpt, Debug, Default)]
pub struct ServeArgs {
  #[structopt(long)]
  pub host: Option<String>,

  #[structopt(short, long)]
  pub port: Option<u16>,

  #[structopt(short, long, parse(from_os_str))]
  pub model: Option<PathBuf>,

  #[structopt(short, long)]
  pub workers: Option<usize>,
}

impl ServeArgs {
  /// Command line flags take precedence over file and environment settings.
  pub fn apply(&self, settings: &mut Settings) {
    if let Some(host) = &self.host {
      settings.server.host = host.clone();
    }
    if let Some(port) = self.port {
      settings.server.port = port;
    }
    if let Some(model) = &self.model {
      settings.model.path = model.clone();
    }
    if self.workers.is_some() {
      settings.server.workers = self.workers;
    }
  }
}

#[derive(StructOpt, Debug)]
pub struct EvaluateArgs {
  /// Labelled CSV file
  #[structopt(short, long, parse(from_os_str))]
  pub data: PathBuf,

  #[structopt(short, long, parse(from_os_str))]
  pub model: Option<PathBuf>,

  /// Column holding the 0/4 polarity code
  #[structopt(long, default_value = "0")]
  pub label_column: usize,

  /// Column holding the raw text
  #[structopt(long, default_value = "5")]
  pub text_column: usize,

  /// Skip the first row
  #[structopt(long)]
  pub has_headers: bool,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{ModelConfig, ServerConfig};

  #[test]
  fn test_serve_args() {
    let args = Cli::from_iter(&["sentiment-api", "--config", "sentiment.toml", "serve", "--port", "8080"]);
    assert_eq!(args.config.as_deref(), Some("sentiment.toml"));
    match args.command {
      Command::Serve(serve) => {
        assert_eq!(serve.port, Some(8080));
        assert_eq!(serve.host, None);
      }
      other => panic!("Expected Serve command, got {:?}", other),
    }
  }

  #[test]
  fn test_predict_joins_words() {
    let args = Cli::from_iter(&["sentiment-api", "predict", "-m", "model.json", "I", "love", "it"]);
    match args.command {
      Command::Predict { model, text } => {
        assert_eq!(model, Some(PathBuf::from("model.json")));
        assert_eq!(text.join(" "), "I love it");
      }
      other => panic!("Expected Predict command, got {:?}", other),
    }
  }

  #[test]
  fn test_evaluate_defaults() {
    let args = Cli::from_iter(&["sentiment-api", "evaluate", "--data", "test.csv"]);
    match args.command {
      Command::Evaluate(eval) => {
        assert_eq!(eval.data, PathBuf::from("test.csv"));
        assert_eq!(eval.label_column, 0);
        assert_eq!(eval.text_column, 5);
        assert!(!eval.has_headers);
      }
      other => panic!("Expected Evaluate command, got {:?}", other),
    }
  }

  #[test]
  fn test_flags_override_settings() {
    let mut settings: Settings = Settings {
      server: ServerConfig {
        host: "0.0.0.0".to_string(),
        port: 5000,
        workers: None,
        max_payload_bytes: 1024,
      },
      model: ModelConfig { path: PathBuf::from("a.bin") },
    };
    let args: ServeArgs = ServeArgs {
      port: Some(9000),
      model: Some(PathBuf::from("b.json")),
      ..Default::default()
    };
    args.apply(&mut settings);
    assert_eq!(settings.bind_address(), "0.0.0.0:9000");
    assert_eq!(settings.model.path, PathBuf::from("b.json"));
    assert_eq!(settings.server.workers, None);
  }
}
