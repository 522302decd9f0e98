use crate::classifier::LogisticRegression;
use crate::error::LoadError;
use crate::preprocessing::{NormalizerConfig, TextNormalizer};
use crate::vectorizer::{Norm, SparseVector, TfidfVectorizer};

use log::info;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

pub const FORMAT_VERSION: u32 = 1;
pub const NEGATIVE_CODE: i64 = 0;
pub const POSITIVE_CODE: i64 = 4;

/// Sentiment140 polarity. Codes follow the dataset: 0 negative, 4 positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
  Negative,
  Positive,
}

impl Polarity {
  pub fn code(self) -> i64 {
    match self {
      Polarity::Negative => NEGATIVE_CODE,
      Polarity::Positive => POSITIVE_CODE,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Polarity::Negative => "negative",
      Polarity::Positive => "positive",
    }
  }

  pub fn from_code(code: i64) -> Option<Self> {
    match code {
      NEGATIVE_CODE => Some(Polarity::Negative),
      POSITIVE_CODE => Some(Polarity::Positive),
      _ => None,
    }
  }
}

// ============ On-disk document ============
//
// Field names mirror the fitted scikit-learn attributes (vocabulary_, idf_,
// classes_, coef_, intercept_) so the notebook can export with json.dump.

#[derive(Debug, Deserialize)]
struct VersionProbe {
  format_version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ArtifactDocument {
  format_version: u32,
  #[serde(default)]
  preprocessing: NormalizerConfig,
  vectorizer: VectorizerDocument,
  classifier: ClassifierDocument,
}

#[derive(Debug, Serialize, Deserialize)]
struct VectorizerDocument {
  vocabulary: HashMap<String, usize>,
  idf: Vec<f64>,
  #[serde(default = "default_ngram_range")]
  ngram_range: (usize, usize),
  #[serde(default)]
  sublinear_tf: bool,
  #[serde(default = "default_norm")]
  norm: Option<Norm>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClassifierDocument {
  classes: Vec<i64>,
  coef: Vec<Vec<f64>>,
  intercept: Vec<f64>,
}

fn default_ngram_range() -> (usize, usize) {
  (1, 1)
}

fn default_norm() -> Option<Norm> {
  Some(Norm::L2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArtifactFormat {
  Json,
  Bincode,
}

impl ArtifactFormat {
  fn from_path(path: &Path) -> Result<Self, LoadError> {
    let ext: String = path
      .extension()
      .and_then(|e| e.to_str())
      .map(|e| e.to_ascii_lowercase())
      .unwrap_or_default();
    match ext.as_str() {
      "json" => Ok(ArtifactFormat::Json),
      "bin" => Ok(ArtifactFormat::Bincode),
      _ => Err(LoadError::UnsupportedFormat(ext)),
    }
  }
}

/// Sentiment Pipeline
/// Normalizer settings, tf-idf vectorizer and logistic regression bundled as
/// one immutable unit, the way the training notebook fitted them.
#[derive(Debug, Clone)]
pub struct SentimentPipeline {
  normalizer: TextNormalizer,
  vectorizer: TfidfVectorizer,
  classifier: LogisticRegression,
}

impl SentimentPipeline {
  /// Builds a pipeline from parts. The vectorizer and classifier must agree on
  /// the number of features and the classifier must use the 0/4 codes.
  pub fn from_parts(
    normalizer: TextNormalizer,
    vectorizer: TfidfVectorizer,
    classifier: LogisticRegression,
  ) -> Result<Self, LoadError> {
    if vectorizer.n_features() != classifier.coef().len() {
      return Err(LoadError::Incompatible(format!(
        "vectorizer has {} features but classifier has {} coefficients",
        vectorizer.n_features(),
        classifier.coef().len()
      )));
    }
    check_classes(&classifier.classes())?;
    Ok(Self { normalizer, vectorizer, classifier })
  }

  /// Load Artifact
  /// Reads a `.json` or `.bin` artifact and validates its structure.
  pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
    let path: &Path = path.as_ref();
    let format: ArtifactFormat = ArtifactFormat::from_path(path)?;

    let bytes: Vec<u8> = fs::read(path).map_err(|source| {
      if source.kind() == std::io::ErrorKind::NotFound {
        LoadError::NotFound(path.to_path_buf())
      } else {
        LoadError::Io { path: path.to_path_buf(), source }
      }
    })?;

    let pipeline: SentimentPipeline = Self::from_bytes(&bytes, format)?;
    info!(
      "Loaded sentiment pipeline from {} ({} features, ngram range {:?})",
      path.display(),
      pipeline.vectorizer.n_features(),
      pipeline.vectorizer.ngram_range()
    );
    Ok(pipeline)
  }

  fn from_bytes(bytes: &[u8], format: ArtifactFormat) -> Result<Self, LoadError> {
    let found: u32 = match format {
      ArtifactFormat::Json => serde_json::from_slice::<VersionProbe>(bytes)?.format_version,
      // format_version is the first field, so it is the leading fixed-width u32.
      ArtifactFormat::Bincode => bincode::deserialize::<u32>(bytes)?,
    };
    if found != FORMAT_VERSION {
      return Err(LoadError::VersionMismatch { found, expected: FORMAT_VERSION });
    }

    let document: ArtifactDocument = match format {
      ArtifactFormat::Json => serde_json::from_slice(bytes)?,
      ArtifactFormat::Bincode => bincode::deserialize(bytes)?,
    };
    Self::from_document(document)
  }

  fn from_document(document: ArtifactDocument) -> Result<Self, LoadError> {
    let ArtifactDocument { preprocessing, vectorizer, classifier, .. } = document;

    let n_features: usize = vectorizer.idf.len();
    if vectorizer.vocabulary.len() != n_features {
      return Err(LoadError::Incompatible(format!(
        "vocabulary has {} terms but idf has {} weights",
        vectorizer.vocabulary.len(),
        n_features
      )));
    }
    let mut seen: HashSet<usize> = HashSet::with_capacity(n_features);
    for (term, &index) in &vectorizer.vocabulary {
      if index >= n_features || !seen.insert(index) {
        return Err(LoadError::Incompatible(format!(
          "vocabulary term {term:?} has invalid or duplicate index {index}"
        )));
      }
    }
    let (min_n, max_n) = vectorizer.ngram_range;
    if min_n == 0 || min_n > max_n {
      return Err(LoadError::Incompatible(format!("invalid ngram range ({min_n}, {max_n})")));
    }
    if !vectorizer.idf.iter().all(|w| w.is_finite()) {
      return Err(LoadError::Incompatible("idf contains non-finite weights".to_string()));
    }

    let classes: [i64; 2] = classifier.classes.as_slice().try_into().map_err(|_| {
      LoadError::Incompatible(format!(
        "expected a binary classifier, found {} classes",
        classifier.classes.len()
      ))
    })?;
    let (coef, intercept) = match (classifier.coef.as_slice(), classifier.intercept.as_slice()) {
      ([row], [intercept]) => (row, *intercept),
      _ => {
        return Err(LoadError::Incompatible(format!(
          "expected 1 coefficient row and 1 intercept, found {} and {}",
          classifier.coef.len(),
          classifier.intercept.len()
        )))
      }
    };
    if !coef.iter().all(|w| w.is_finite()) || !intercept.is_finite() {
      return Err(LoadError::Incompatible("classifier contains non-finite weights".to_string()));
    }

    let vectorizer: TfidfVectorizer = TfidfVectorizer::new(
      vectorizer.vocabulary,
      Array1::from(vectorizer.idf),
      vectorizer.ngram_range,
      vectorizer.sublinear_tf,
      vectorizer.norm,
    );
    let classifier: LogisticRegression =
      LogisticRegression::new(classes, Array1::from(coef.clone()), intercept);

    Self::from_parts(TextNormalizer::new(preprocessing), vectorizer, classifier)
  }

  fn to_document(&self) -> ArtifactDocument {
    ArtifactDocument {
      format_version: FORMAT_VERSION,
      preprocessing: self.normalizer.config(),
      vectorizer: VectorizerDocument {
        vocabulary: self.vectorizer.vocabulary().clone(),
        idf: self.vectorizer.idf().to_vec(),
        ngram_range: self.vectorizer.ngram_range(),
        sublinear_tf: self.vectorizer.sublinear_tf(),
        norm: self.vectorizer.norm(),
      },
      classifier: ClassifierDocument {
        classes: self.classifier.classes().to_vec(),
        coef: vec![self.classifier.coef().to_vec()],
        intercept: vec![self.classifier.intercept()],
      },
    }
  }

  /// Save Artifact
  /// Writes the pipeline in the format implied by the file extension.
  pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LoadError> {
    let path: &Path = path.as_ref();
    let document: ArtifactDocument = self.to_document();
    let bytes: Vec<u8> = match ArtifactFormat::from_path(path)? {
      ArtifactFormat::Json => serde_json::to_vec_pretty(&document).map_err(|e| LoadError::Encode(e.to_string()))?,
      ArtifactFormat::Bincode => bincode::serialize(&document).map_err(|e| LoadError::Encode(e.to_string()))?,
    };
    fs::write(path, bytes).map_err(|source| LoadError::Write { path: path.to_path_buf(), source })
  }

  pub fn normalizer(&self) -> &TextNormalizer {
    &self.normalizer
  }

  pub fn n_features(&self) -> usize {
    self.vectorizer.n_features()
  }

  fn features(&self, cleaned: &[String]) -> Vec<SparseVector> {
    self.vectorizer.transform(cleaned)
  }

  /// Predicts a polarity for each already-cleaned document.
  pub fn predict(&self, cleaned: &[String]) -> Vec<Polarity> {
    self
      .classifier
      .predict(&self.features(cleaned))
      .into_iter()
      .map(|code| if code == POSITIVE_CODE { Polarity::Positive } else { Polarity::Negative })
      .collect()
  }

  /// Polarity and positive-class probability for each already-cleaned
  /// document, vectorizing each one once.
  pub fn predict_scored(&self, cleaned: &[String]) -> Vec<(Polarity, f64)> {
    let positive_is_second: bool = self.classifier.classes()[1] == POSITIVE_CODE;
    self
      .classifier
      .predict_scored(&self.features(cleaned))
      .into_iter()
      .map(|(code, p)| {
        let polarity: Polarity = if code == POSITIVE_CODE { Polarity::Positive } else { Polarity::Negative };
        (polarity, if positive_is_second { p } else { 1.0 - p })
      })
      .collect()
  }

  /// Probability of the positive class for each already-cleaned document.
  pub fn predict_proba(&self, cleaned: &[String]) -> Vec<f64> {
    let p: Array1<f64> = self.classifier.predict_proba(&self.features(cleaned));
    if self.classifier.classes()[1] == POSITIVE_CODE {
      p.to_vec()
    } else {
      p.iter().map(|p| 1.0 - p).collect()
    }
  }
}

fn check_classes(classes: &[i64; 2]) -> Result<(), LoadError> {
  let mut sorted: [i64; 2] = *classes;
  sorted.sort_unstable();
  if sorted != [NEGATIVE_CODE, POSITIVE_CODE] {
    return Err(LoadError::Incompatible(format!(
      "classes must be {{{NEGATIVE_CODE}, {POSITIVE_CODE}}}, found {classes:?}"
    )));
  }
  Ok(())
}
