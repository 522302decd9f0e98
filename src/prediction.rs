use crate::model::{Polarity, SentimentPipeline};

use serde::Serialize;
use std::sync::Arc;

/// Result of predicting one raw input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
  pub input_text: String,
  pub cleaned_text: String,
  pub prediction: i64,
  pub label: &'static str,
  /// Probability of the positive class.
  pub score: f64,
}

impl PredictionOutcome {
  pub fn polarity(&self) -> Polarity {
    if self.prediction == Polarity::Positive.code() {
      Polarity::Positive
    } else {
      Polarity::Negative
    }
  }
}

/// Prediction Service
/// Cleans raw text with the artifact's own normalizer and runs the pipeline.
/// Cloning shares the same read-only pipeline.
#[derive(Debug, Clone)]
pub struct Predictor {
  pipeline: Arc<SentimentPipeline>,
}

impl Predictor {
  pub fn new(pipeline: Arc<SentimentPipeline>) -> Self {
    Self { pipeline }
  }

  pub fn pipeline(&self) -> &SentimentPipeline {
    &self.pipeline
  }

  pub fn predict(&self, text: &str) -> PredictionOutcome {
    // A batch of one always yields exactly one outcome.
    self.predict_batch(&[text]).remove(0)
  }

  pub fn predict_batch(&self, texts: &[&str]) -> Vec<PredictionOutcome> {
    let cleaned: Vec<String> = texts.iter().map(|t| self.pipeline.normalizer().normalize(t)).collect();
    let scored: Vec<(Polarity, f64)> = self.pipeline.predict_scored(&cleaned);

    texts
      .iter()
      .zip(cleaned)
      .zip(scored)
      .map(|((text, cleaned_text), (polarity, score))| PredictionOutcome {
        input_text: text.to_string(),
        cleaned_text,
        prediction: polarity.code(),
        label: polarity.label(),
        score,
      })
      .collect()
  }
}
