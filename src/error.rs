use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing a pipeline artifact.
/// Read failures are fatal at startup.
#[derive(Error, Debug)]
pub enum LoadError {
  #[error("model artifact not found at {0}")]
  NotFound(PathBuf),

  #[error("failed to read model artifact {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("unsupported artifact format {0:?} (expected .json or .bin)")]
  UnsupportedFormat(String),

  #[error("artifact format version {found} is not supported (expected {expected})")]
  VersionMismatch { found: u32, expected: u32 },

  #[error("corrupt binary artifact: {0}")]
  Decode(#[from] bincode::Error),

  #[error("corrupt JSON artifact: {0}")]
  Json(#[from] serde_json::Error),

  #[error("incompatible artifact: {0}")]
  Incompatible(String),

  #[error("failed to encode model artifact: {0}")]
  Encode(String),

  #[error("failed to write model artifact {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Per-request errors surfaced by the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
  #[error("{0}")]
  InvalidInput(String),

  #[error("internal error: {0}")]
  Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
  error: String,
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match *self {
      ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    HttpResponse::build(self.status_code()).json(ErrorBody { error: self.to_string() })
  }
}

/// Errors from scoring an artifact against a labelled CSV file.
#[derive(Error, Debug)]
pub enum EvaluateError {
  #[error("failed to read dataset: {0}")]
  Csv(#[from] csv::Error),

  #[error("row {row}: column {column} is missing")]
  MissingColumn { row: u64, column: usize },

  #[error("row {row}: label {value:?} is not a polarity code")]
  BadLabel { row: u64, value: String },
}

/// Top level error for the command line entry points.
#[derive(Error, Debug)]
pub enum AppError {
  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),

  #[error(transparent)]
  Load(#[from] LoadError),

  #[error(transparent)]
  Evaluate(#[from] EvaluateError),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Json(#[from] serde_json::Error),
}
