use crate::preprocessing::{tokenize, word_ngrams};

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sparse feature row: (feature index, weight) pairs sorted by index.
pub type SparseVector = Vec<(usize, f64)>;

/// Row normalization applied after tf-idf weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
  L1,
  L2,
}

/// TF-IDF Vectorizer
/// Inference half of a word-level tf-idf vectorizer: counts vocabulary n-grams
/// in cleaned text, scales by idf and normalizes the row.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
  vocabulary: HashMap<String, usize>,
  idf: Array1<f64>,
  ngram_range: (usize, usize),
  sublinear_tf: bool,
  norm: Option<Norm>,
}

impl TfidfVectorizer {
  /// Callers are expected to have checked that every vocabulary index is below
  /// `idf.len()`; `model` does this when loading an artifact.
  pub fn new(
    vocabulary: HashMap<String, usize>,
    idf: Array1<f64>,
    ngram_range: (usize, usize),
    sublinear_tf: bool,
    norm: Option<Norm>,
  ) -> Self {
    Self { vocabulary, idf, ngram_range, sublinear_tf, norm }
  }

  pub fn n_features(&self) -> usize {
    self.idf.len()
  }

  pub fn vocabulary(&self) -> &HashMap<String, usize> {
    &self.vocabulary
  }

  pub fn idf(&self) -> &Array1<f64> {
    &self.idf
  }

  pub fn ngram_range(&self) -> (usize, usize) {
    self.ngram_range
  }

  pub fn sublinear_tf(&self) -> bool {
    self.sublinear_tf
  }

  pub fn norm(&self) -> Option<Norm> {
    self.norm
  }

  /// Transforms one cleaned document into its tf-idf row.
  /// Out-of-vocabulary n-grams are ignored; an empty document yields an empty row.
  pub fn transform_one(&self, document: &str) -> SparseVector {
    let tokens: Vec<&str> = tokenize(document);
    let (min_n, max_n) = self.ngram_range;

    let mut counts: HashMap<usize, f64> = HashMap::new();
    for gram in word_ngrams(&tokens, min_n, max_n) {
      if let Some(&index) = self.vocabulary.get(&gram) {
        *counts.entry(index).or_insert(0.0) += 1.0;
      }
    }

    let mut row: SparseVector = counts
      .into_iter()
      .map(|(index, tf)| {
        let tf: f64 = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
        (index, tf * self.idf[index])
      })
      .collect();
    row.sort_unstable_by_key(|&(index, _)| index);

    let length: f64 = match self.norm {
      Some(Norm::L2) => row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt(),
      Some(Norm::L1) => row.iter().map(|(_, w)| w.abs()).sum::<f64>(),
      None => 1.0,
    };
    if length > 0.0 {
      row.iter_mut().for_each(|(_, w)| *w /= length);
    }
    row
  }

  pub fn transform(&self, documents: &[String]) -> Vec<SparseVector> {
    documents.iter().map(|d| self.transform_one(d)).collect()
  }
}
