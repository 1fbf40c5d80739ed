//! Sentence-level sentiment over extracted MD&A text.
//!
//! Scoring needs two capabilities: a [`SentenceSegmenter`] that splits text into
//! sentences, and a [`SentimentClassifier`] that labels a batch of sentences. The
//! crate ships [`PunctuationSegmenter`]; classifiers backed by a financial language
//! model live outside the crate and plug in through the trait.
//!
//! A [`SentimentScorer`] owns both capabilities. Model-backed classifiers load their
//! weights when constructed, which can take seconds and a large amount of memory, so
//! build one scorer up front and pass it to the code that needs it. Scoring takes
//! `&self`; a scorer whose parts are `Send + Sync` can be shared across tasks behind an
//! `Arc` without locking.
//!
//! ```rust
//! use mdnakit::{Classification, Result, SentimentClassifier, SentimentLabel, SentimentScorer};
//!
//! struct Cautious;
//!
//! impl SentimentClassifier for Cautious {
//!     fn classify(&self, sentences: &[&str]) -> Result<Vec<Classification>> {
//!         Ok(sentences
//!             .iter()
//!             .map(|s| {
//!                 let label = if s.contains("decreased") {
//!                     SentimentLabel::Negative
//!                 } else {
//!                     SentimentLabel::Neutral
//!                 };
//!                 Classification { label, score: 0.9 }
//!             })
//!             .collect())
//!     }
//! }
//!
//! let scorer = SentimentScorer::with_classifier(Cautious);
//! let scored = scorer.score("Net sales decreased 4%. Gross margin was flat.").unwrap();
//! assert_eq!(scored.len(), 2);
//! assert_eq!(scored[0].label, SentimentLabel::Negative);
//! ```

use super::batch::MdnaRecord;
use super::error::{EdgarError, Result};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Terminal punctuation, optional closing quotes or brackets, then any whitespace.
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.!?]+["'\u{201D}\u{2019})\]]*\s*"#).expect("sentence end pattern is valid")
});

/// Words that end in a period without ending a sentence, lowercased.
const ABBREVIATIONS: &[&str] = &[
    "approx", "co", "corp", "dr", "e.g", "etc", "i.e", "inc", "jr", "ltd", "mr", "mrs", "ms",
    "no", "nos", "st", "u.k", "u.s", "vs", "jan", "feb", "mar", "apr", "jun", "jul", "aug",
    "sep", "sept", "oct", "nov", "dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = EdgarError;

    /// Accepts label names in any case, as model configurations spell them
    /// differently.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            other => Err(EdgarError::Classification(format!(
                "unknown sentiment label '{other}'"
            ))),
        }
    }
}

/// A classifier's verdict on one sentence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub label: SentimentLabel,
    /// Confidence in `label`, between 0 and 1.
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSentence {
    pub sentence: String,
    pub label: SentimentLabel,
    pub score: f32,
}

/// Splits text into sentences, in order.
pub trait SentenceSegmenter: Send + Sync {
    fn segment<'t>(&self, text: &'t str) -> Vec<&'t str>;
}

/// Labels each sentence of a batch.
///
/// The output must have one entry per input sentence, in the same order.
pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, sentences: &[&str]) -> Result<Vec<Classification>>;
}

/// Rule-based segmenter: a sentence ends at `.`, `!` or `?` followed by whitespace.
///
/// A period does not end a sentence after a known abbreviation or a single-letter
/// initial, or when the next word starts in lowercase.
///
/// Flattened filing text often loses the space between paragraphs
/// (`statements.Total net sales`). Punctuation followed directly by an uppercase
/// letter also ends a sentence when the word before it ends in a lowercase letter or
/// digit and has no inner period, so `U.S.Treasury` and `10-Q.Total` stay whole.
#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationSegmenter;

impl PunctuationSegmenter {
    fn ends_in_abbreviation(preceding: &str) -> bool {
        let word = preceding
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or_default()
            .trim_start_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();

        let is_initial = word.chars().count() == 1 && word.chars().all(char::is_alphabetic);
        is_initial || ABBREVIATIONS.contains(&word.as_str())
    }

    fn ends_run_on_sentence(preceding: &str) -> bool {
        let word = preceding
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or_default();
        !word.contains('.')
            && word
                .chars()
                .last()
                .is_some_and(|c| c.is_lowercase() || c.is_ascii_digit())
    }
}

impl SentenceSegmenter for PunctuationSegmenter {
    fn segment<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for boundary in SENTENCE_END.find_iter(text) {
            let preceding = &text[start..boundary.start()];
            if boundary.as_str().starts_with('.') && Self::ends_in_abbreviation(preceding) {
                continue;
            }
            let next = text[boundary.end()..].chars().next();
            if next.is_some_and(char::is_lowercase) {
                continue;
            }
            let spaced = boundary.as_str().ends_with(char::is_whitespace);
            if next.is_some()
                && !spaced
                && !(next.is_some_and(char::is_uppercase) && Self::ends_run_on_sentence(preceding))
            {
                continue;
            }

            let sentence = text[start..boundary.end()].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = boundary.end();
        }

        let rest = text[start..].trim();
        if !rest.is_empty() {
            sentences.push(rest);
        }
        sentences
    }
}

/// Sentence sentiment of one filing's MD&A.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredFiling {
    pub end_date: NaiveDate,
    pub sentences: Vec<ScoredSentence>,
}

impl ScoredFiling {
    pub fn count(&self, label: SentimentLabel) -> usize {
        self.sentences.iter().filter(|s| s.label == label).count()
    }

    /// `(positive - negative) / sentences`, or `None` when there are no sentences.
    pub fn net_sentiment(&self) -> Option<f64> {
        if self.sentences.is_empty() {
            return None;
        }
        let positive = self.count(SentimentLabel::Positive) as f64;
        let negative = self.count(SentimentLabel::Negative) as f64;
        Some((positive - negative) / self.sentences.len() as f64)
    }
}

/// Segments text and classifies every sentence.
#[derive(Debug, Clone)]
pub struct SentimentScorer<S, C> {
    segmenter: S,
    classifier: C,
}

impl<C: SentimentClassifier> SentimentScorer<PunctuationSegmenter, C> {
    pub fn with_classifier(classifier: C) -> Self {
        Self::new(PunctuationSegmenter, classifier)
    }
}

impl<S: SentenceSegmenter, C: SentimentClassifier> SentimentScorer<S, C> {
    pub fn new(segmenter: S, classifier: C) -> Self {
        Self {
            segmenter,
            classifier,
        }
    }

    /// Scores every sentence of `text`, in order.
    ///
    /// # Errors
    ///
    /// `EdgarError::Classification` when the classifier fails, returns a different
    /// number of results than sentences, or reports a score outside `0..=1`.
    pub fn score(&self, text: &str) -> Result<Vec<ScoredSentence>> {
        let sentences = self.segmenter.segment(text);
        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        let classifications = self.classifier.classify(&sentences)?;
        if classifications.len() != sentences.len() {
            return Err(EdgarError::Classification(format!(
                "classifier returned {} results for {} sentences",
                classifications.len(),
                sentences.len()
            )));
        }

        let scored = sentences
            .into_iter()
            .zip(classifications)
            .map(|(sentence, classification)| {
                if !(0.0..=1.0).contains(&classification.score) {
                    return Err(EdgarError::Classification(format!(
                        "score {} out of range for '{}'",
                        classification.score, sentence
                    )));
                }
                Ok(ScoredSentence {
                    sentence: sentence.to_string(),
                    label: classification.label,
                    score: classification.score,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("Scored {} sentences", scored.len());
        Ok(scored)
    }

    pub fn score_record(&self, record: &MdnaRecord) -> Result<ScoredFiling> {
        Ok(ScoredFiling {
            end_date: record.end_date,
            sentences: self.score(&record.mdna)?,
        })
    }
}
