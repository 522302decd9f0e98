use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static URL_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"http\S+|www\.\S+").expect("hardcoded regex is valid"));
static MENTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@\w+").expect("hardcoded regex is valid"));
static NON_ALNUM_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"[^A-Za-z0-9\s]").expect("hardcoded regex is valid"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("hardcoded regex is valid"));
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("hardcoded regex is valid"));

/// Which noise patterns the normalizer strips. Stored in the artifact so that
/// inference cleans text exactly the way the training data was cleaned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
  #[serde(default = "enabled")]
  pub remove_urls: bool,
  #[serde(default = "enabled")]
  pub remove_mentions: bool,
}

fn enabled() -> bool {
  true
}

impl Default for NormalizerConfig {
  fn default() -> Self {
    Self { remove_urls: true, remove_mentions: true }
  }
}

/// Text Normalizer
/// Lowercases ASCII, strips URLs and @mentions, replaces anything that is not an
/// ASCII letter, digit or whitespace with a space, then collapses whitespace.
///
/// Output only ever contains `[a-z0-9 ]`, single spaced and trimmed, which makes
/// `normalize` idempotent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextNormalizer {
  config: NormalizerConfig,
}

impl TextNormalizer {
  pub fn new(config: NormalizerConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> NormalizerConfig {
    self.config
  }

  pub fn normalize(&self, text: &str) -> String {
    // ASCII-only lowercase: "HTTP://..." is caught by the URL pattern, while
    // non-ASCII letters ('İ', the Kelvin sign) stay non-ASCII and are stripped.
    let mut cleaned: String = text.to_ascii_lowercase();

    if self.config.remove_urls {
      cleaned = URL_RE.replace_all(&cleaned, " ").into_owned();
    }
    if self.config.remove_mentions {
      cleaned = MENTION_RE.replace_all(&cleaned, " ").into_owned();
    }

    let cleaned = NON_ALNUM_RE.replace_all(&cleaned, " ");
    WHITESPACE_RE.replace_all(&cleaned, " ").trim().to_string()
  }
}

/// Cleans text with the default normalizer settings.
pub fn clean_text(text: &str) -> String {
  TextNormalizer::default().normalize(text)
}

/// Splits cleaned text into word tokens of at least two characters.
pub fn tokenize(text: &str) -> Vec<&str> {
  TOKEN_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Builds the space-joined word n-grams for every `n` in `min_n..=max_n`.
pub fn word_ngrams(tokens: &[&str], min_n: usize, max_n: usize) -> Vec<String> {
  let mut grams: Vec<String> = Vec::new();
  if min_n == 0 {
    return grams;
  }
  for n in min_n..=max_n {
    if n > tokens.len() {
      break;
    }
    grams.extend(tokens.windows(n).map(|w| w.join(" ")));
  }
  grams
}

#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;

  #[test]
  fn it_cleans_a_tweet() {
    let cleaned: String = clean_text("@bob I LOVE this course!!! see http://t.co/xyz ;)");
    assert_eq!(cleaned, "i love this course see");
  }

  #[test]
  fn it_removes_urls_and_mentions() {
    let inputs: [&str; 4] = [
      "check www.example.com/page now",
      "HTTPS://EXAMPLE.COM/A?b=c done",
      "cc @someone_else and @x1",
      "mixed http://a.b @c www.d.e end",
    ];
    for input in inputs {
      let cleaned: String = clean_text(input);
      assert!(!cleaned.contains("http"), "{cleaned:?}");
      assert!(!cleaned.contains("www"), "{cleaned:?}");
      assert!(!cleaned.contains("someone"), "{cleaned:?}");
      assert!(!cleaned.contains('@'), "{cleaned:?}");
    }
    assert_eq!(clean_text("mixed http://a.b @c www.d.e end"), "mixed end");
  }

  #[test]
  fn it_is_idempotent() {
    let inputs: [&str; 9] = [
      "",
      "   ",
      "!!! ??? ...",
      "(http",
      "HTTPfoo bar",
      "Café naïve résumé",
      "tabs\tand\nnewlines\u{00a0}nbsp",
      "İstanbul ＡＢＣ",
      "@@@mention@@ http://x http ok",
    ];
    for input in inputs {
      let once: String = clean_text(input);
      let twice: String = clean_text(&once);
      assert_eq!(once, twice, "input {input:?}");
    }
  }

  #[test]
  fn it_never_folds_non_ascii_into_ascii() {
    assert_eq!(clean_text("\u{212A}elvin \u{0130}stanbul"), "elvin stanbul");
    assert_eq!(clean_text("ÀBC straße"), "bc stra e");
  }

  proptest! {
    #[test]
    fn normalize_is_idempotent(s in "(?s).*") {
      let once: String = clean_text(&s);
      prop_assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn normalize_is_idempotent_on_tweet_like_text(s in "(HTTP|Http|http|www\\.|@|[A-Za-z0-9 \t\n.,:/!?_]|\u{0130}|\u{212A}){0,40}") {
      let once: String = clean_text(&s);
      prop_assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn normalize_output_is_clean(s in "(?s).*|(http|www\\.|@|[A-Za-z0-9 ./]){0,40}") {
      let cleaned: String = clean_text(&s);
      let shape: Regex = Regex::new(r"^[a-z0-9]*( [a-z0-9]+)*$").unwrap();
      prop_assert!(shape.is_match(&cleaned), "{:?} -> {:?}", s, cleaned);
      prop_assert!(!URL_RE.is_match(&cleaned), "{:?} -> {:?}", s, cleaned);
      prop_assert!(!MENTION_RE.is_match(&cleaned), "{:?} -> {:?}", s, cleaned);
    }
  }

  #[test]
  fn it_maps_noise_to_empty() {
    assert_eq!(clean_text(""), "");
    assert_eq!(clean_text("@only http://links.com ..."), "");
  }

  #[test]
  fn it_respects_disabled_steps() {
    let normalizer: TextNormalizer =
      TextNormalizer::new(NormalizerConfig { remove_urls: false, remove_mentions: false });
    assert_eq!(normalizer.normalize("@bob www.x.com"), "bob www x com");
  }

  #[test]
  fn it_tokenizes_like_the_word_analyzer() {
    let tokens: Vec<&str> = tokenize("i love this a course 2 go");
    assert_eq!(tokens, vec!["love", "this", "course", "go"]);
  }

  #[test]
  fn it_builds_ngrams() {
    let tokens: Vec<&str> = vec!["not", "very", "good"];
    assert_eq!(word_ngrams(&tokens, 1, 1), vec!["not", "very", "good"]);
    assert_eq!(
      word_ngrams(&tokens, 1, 2),
      vec!["not", "very", "good", "not very", "very good"]
    );
    assert_eq!(word_ngrams(&tokens, 4, 5), Vec::<String>::new());
  }
}
