use crate::vectorizer::SparseVector;

use ndarray::Array1;

/// Binary logistic regression over sparse tf-idf rows.
///
/// `classes[1]` is predicted when the decision value is strictly positive,
/// otherwise `classes[0]`.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
  classes: [i64; 2],
  coef: Array1<f64>,
  intercept: f64,
}

impl LogisticRegression {
  pub fn new(classes: [i64; 2], coef: Array1<f64>, intercept: f64) -> Self {
    Self { classes, coef, intercept }
  }

  pub fn classes(&self) -> [i64; 2] {
    self.classes
  }

  pub fn coef(&self) -> &Array1<f64> {
    &self.coef
  }

  pub fn intercept(&self) -> f64 {
    self.intercept
  }

  pub fn decision_function(&self, rows: &[SparseVector]) -> Array1<f64> {
    rows
      .iter()
      .map(|row| {
        row.iter().map(|&(index, weight)| self.coef[index] * weight).sum::<f64>() + self.intercept
      })
      .collect()
  }

  /// Probability of `classes[1]` for each row.
  pub fn predict_proba(&self, rows: &[SparseVector]) -> Array1<f64> {
    self.decision_function(rows).mapv(sigmoid)
  }

  pub fn predict(&self, rows: &[SparseVector]) -> Vec<i64> {
    self.decision_function(rows).iter().map(|&z| self.class_of(z)).collect()
  }

  /// Class and `classes[1]` probability per row from one decision pass.
  pub fn predict_scored(&self, rows: &[SparseVector]) -> Vec<(i64, f64)> {
    self.decision_function(rows).iter().map(|&z| (self.class_of(z), sigmoid(z))).collect()
  }

  fn class_of(&self, z: f64) -> i64 {
    if z > 0.0 {
      self.classes[1]
    } else {
      self.classes[0]
    }
  }
}

fn sigmoid(z: f64) -> f64 {
  1.0 / (1.0 + (-z).exp())
}
