use crate::error::EvaluateError;
use crate::model::Polarity;
use crate::prediction::Predictor;

use csv::{ByteRecord, Reader, ReaderBuilder};
use log::debug;
use serde::Serialize;

use std::io::Read;

/// Dataset layout. The raw Sentiment140 files have no header, the polarity in
/// column 0 and the tweet in column 5.
#[derive(Debug, Clone, Copy)]
pub struct CsvLayout {
  pub label_column: usize,
  pub text_column: usize,
  pub has_headers: bool,
}

impl Default for CsvLayout {
  fn default() -> Self {
    Self { label_column: 0, text_column: 5, has_headers: false }
  }
}

/// Evaluation Report
/// Confusion counts indexed `[actual][predicted]`, 0 = negative, 1 = positive.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
  pub total: usize,
  pub correct: usize,
  /// Rows whose label is the neutral code 2, which a binary model cannot score.
  pub skipped: usize,
  pub confusion: [[usize; 2]; 2],
}

impl EvaluationReport {
  fn record(&mut self, actual: Polarity, predicted: Polarity) {
    self.total += 1;
    if actual == predicted {
      self.correct += 1;
    }
    self.confusion[slot(actual)][slot(predicted)] += 1;
  }

  pub fn accuracy(&self) -> f64 {
    ratio(self.correct, self.total)
  }

  /// Precision of the positive class.
  pub fn precision(&self) -> f64 {
    ratio(self.confusion[1][1], self.confusion[0][1] + self.confusion[1][1])
  }

  /// Recall of the positive class.
  pub fn recall(&self) -> f64 {
    ratio(self.confusion[1][1], self.confusion[1][0] + self.confusion[1][1])
  }
}

fn slot(polarity: Polarity) -> usize {
  match polarity {
    Polarity::Negative => 0,
    Polarity::Positive => 1,
  }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
  if denominator == 0 {
    0.0
  } else {
    numerator as f64 / denominator as f64
  }
}

const NEUTRAL_CODE: &str = "2";

/// Evaluate
/// Predicts every row of a labelled CSV and tallies the results. Text is
/// decoded lossily since the public Sentiment140 files are Latin-1.
pub fn evaluate<R: Read>(predictor: &Predictor, input: R, layout: CsvLayout) -> Result<EvaluationReport, EvaluateError> {
  let mut reader: Reader<R> = ReaderBuilder::new()
    .has_headers(layout.has_headers)
    .flexible(true)
    .from_reader(input);

  let mut report: EvaluationReport = EvaluationReport::default();
  let mut record: ByteRecord = ByteRecord::new();
  let mut row: u64 = 0;

  while reader.read_byte_record(&mut record)? {
    row += 1;
    let label: String = field(&record, layout.label_column, row)?;
    let label: &str = label.trim();
    if label == NEUTRAL_CODE {
      report.skipped += 1;
      continue;
    }
    let actual: Polarity = label
      .parse::<i64>()
      .ok()
      .and_then(Polarity::from_code)
      .ok_or_else(|| EvaluateError::BadLabel { row, value: label.to_string() })?;

    let text: String = field(&record, layout.text_column, row)?;
    let predicted: Polarity = predictor.predict(&text).polarity();
    report.record(actual, predicted);
  }

  debug!("Evaluated {} rows ({} skipped)", report.total, report.skipped);
  Ok(report)
}

fn field(record: &ByteRecord, column: usize, row: u64) -> Result<String, EvaluateError> {
  record
    .get(column)
    .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    .ok_or(EvaluateError::MissingColumn { row, column })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::SentimentPipeline;
  use std::sync::Arc;

  fn predictor() -> Predictor {
    let curr_dir: String = match std::env::current_dir() {
      Ok(path) => path.display().to_string(),
      Err(e) => panic!("Error: {:?}", e),
    };
    let pipeline: SentimentPipeline =
      SentimentPipeline::load(format!("{}/data/sentiment_pipeline.json", curr_dir)).unwrap();
    Predictor::new(Arc::new(pipeline))
  }

  #[test]
  fn it_scores_sentiment140_rows() {
    let data: &[u8] = b"\"4\",\"1\",\"Mon Apr 06\",\"NO_QUERY\",\"alice\",\"I love this course!\"\n\
\"0\",\"2\",\"Mon Apr 06\",\"NO_QUERY\",\"bob\",\"worst day ever @alice\"\n\
\"2\",\"3\",\"Mon Apr 06\",\"NO_QUERY\",\"carol\",\"it is a day\"\n\
\"0\",\"4\",\"Mon Apr 06\",\"NO_QUERY\",\"dave\",\"this is great\"\n";

    let report: EvaluationReport = evaluate(&predictor(), data, CsvLayout::default()).unwrap();
    assert_eq!(report.total, 3);
    assert_eq!(report.correct, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.confusion, [[1, 1], [0, 1]]);
    assert!((report.accuracy() - 2.0 / 3.0).abs() < 1e-12);
    assert!((report.precision() - 0.5).abs() < 1e-12);
    assert!((report.recall() - 1.0).abs() < 1e-12);
  }

  #[test]
  fn it_reads_custom_layouts_with_latin1_text() {
    let mut data: Vec<u8> = b"text,label\nhappy caf".to_vec();
    data.push(0xe9);
    data.extend_from_slice(b",4\n");
    let layout: CsvLayout = CsvLayout { label_column: 1, text_column: 0, has_headers: true };

    let report: EvaluationReport = evaluate(&predictor(), data.as_slice(), layout).unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.correct, 1);
  }

  #[test]
  fn it_rejects_unknown_labels() {
    let data: &[u8] = b"7,1,d,q,u,hello\n";
    let err: EvaluateError = evaluate(&predictor(), data, CsvLayout::default()).unwrap_err();
    assert!(matches!(err, EvaluateError::BadLabel { row: 1, .. }));
  }

  #[test]
  fn it_rejects_short_rows() {
    let data: &[u8] = b"4,1,d\n";
    let err: EvaluateError = evaluate(&predictor(), data, CsvLayout::default()).unwrap_err();
    assert!(matches!(err, EvaluateError::MissingColumn { row: 1, column: 5 }));
  }

  #[test]
  fn it_reports_zero_for_empty_input() {
    let report: EvaluationReport = evaluate(&predictor(), &b""[..], CsvLayout::default()).unwrap();
    assert_eq!(report, EvaluationReport::default());
    assert_eq!(report.accuracy(), 0.0);
  }
}
