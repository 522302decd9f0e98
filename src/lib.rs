pub mod api;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod model;
pub mod prediction;
pub mod preprocessing;
pub mod server;
pub mod vectorizer;

pub use crate::config::Settings;
pub use crate::error::{ApiError, AppError, EvaluateError, LoadError};
pub use crate::model::{Polarity, SentimentPipeline};
pub use crate::prediction::{PredictionOutcome, Predictor};
pub use crate::preprocessing::clean_text;

use std::path::Path;
use std::sync::Arc;

/// Sentiment Prediction
/// Loads the artifact at `model_path` and predicts the sentiment of one text.
/// Long-running callers should build a `Predictor` once and reuse it instead.
pub fn sentiment_prediction<P: AsRef<Path>>(model_path: P, sentence: &str) -> Result<PredictionOutcome, LoadError> {
  let pipeline: SentimentPipeline = SentimentPipeline::load(model_path)?;
  Ok(Predictor::new(Arc::new(pipeline)).predict(sentence))
}
