//! Readability validator.
//!
//! Computes Flesch Reading Ease over all prose sentences:
//! `206.835 - 1.015 * (words / sentences) - 84.6 * (syllables / words)`.
//! The formula is unbounded, so the reported score is clamped to `[0, 100]`
//! while the raw value is kept in metadata.
//!
//! Options (`validators.readability.config`):
//! - `min_score` (default 30): below this a `low_readability` warning is
//!   emitted.
//! - `long_sentence_words` (default 25): sentences with more words get a
//!   `long_sentence` info issue each.
//!
//! Context key `audience` (`beginner`, `intermediate`, `advanced`, plural
//! forms accepted) can raise the threshold to 60, 45 or 30 respectively.

use super::Validator;
use crate::models::plugin::PluginMetadata;
use crate::models::{Context, Issue, PluginConfig, ValidationResult};
use crate::settings;
use crate::text::{self, LineIndex};

pub const NAME: &str = "readability";

pub fn metadata() -> PluginMetadata {
    PluginMetadata::new(NAME, "1.0.0", "readability")
        .describe("Flesch Reading Ease and overly long sentences")
        .by("proofkit")
        .tagged(&["readability", "sentences", "text"])
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadabilitySettings {
    pub min_score: f64,
    pub long_sentence_words: usize,
}

impl Default for ReadabilitySettings {
    fn default() -> Self {
        Self {
            min_score: 30.0,
            long_sentence_words: 25,
        }
    }
}

impl ReadabilitySettings {
    pub fn from_config(cfg: &PluginConfig) -> Self {
        let d = Self::default();
        Self {
            min_score: settings::read(cfg, "min_score", d.min_score),
            long_sentence_words: settings::read(cfg, "long_sentence_words", d.long_sentence_words),
        }
    }
}

pub struct ReadabilityValidator {
    settings: ReadabilitySettings,
}

impl ReadabilityValidator {
    pub fn new(settings: ReadabilitySettings) -> Self {
        Self { settings }
    }

    pub fn from_config(cfg: &PluginConfig) -> Self {
        Self::new(ReadabilitySettings::from_config(cfg))
    }

    fn threshold(&self, context: &Context) -> f64 {
        let audience = context
            .get("audience")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_ascii_lowercase());
        let floor = match audience.as_deref().map(|s| s.trim_end_matches('s')) {
            Some("beginner") => 60.0,
            Some("intermediate") => 45.0,
            Some("advanced") => 30.0,
            _ => f64::MIN,
        };
        self.settings.min_score.max(floor)
    }
}

/// Flesch Reading Ease for the given counts. Zero counts yield 100.
pub fn flesch_reading_ease(words: usize, sentences: usize, syllables: usize) -> f64 {
    if words == 0 || sentences == 0 {
        return 100.0;
    }
    let w = words as f64;
    206.835 - 1.015 * (w / sentences as f64) - 84.6 * (syllables as f64 / w)
}

impl Validator for ReadabilityValidator {
    fn validate(&self, content: &str, context: &Context) -> ValidationResult {
        let sentences = text::sentences(content);
        let mut words = 0usize;
        let mut syllables = 0usize;
        for s in &sentences {
            for w in text::words(s.text) {
                words += 1;
                syllables += text::count_syllables(w);
            }
        }
        if words == 0 {
            return ValidationResult::new(Vec::new(), 100.0)
                .with_metadata("words", 0)
                .with_metadata("sentences", 0);
        }

        let fre = flesch_reading_ease(words, sentences.len(), syllables);
        let min_score = self.threshold(context);
        let mut issues = Vec::new();
        if fre < min_score {
            issues.push(
                Issue::warning(
                    "low_readability",
                    format!(
                        "Reading ease is {:.1}, below the minimum of {:.1}",
                        fre, min_score
                    ),
                )
                .with_suggestion("Use shorter sentences and simpler words"),
            );
        }

        let index = LineIndex::new(content);
        let limit = self.settings.long_sentence_words;
        for s in &sentences {
            let count = s.word_count();
            if count > limit {
                issues.push(
                    Issue::info(
                        "long_sentence",
                        format!("Sentence has {} words (limit {})", count, limit),
                    )
                    .at(index.locate(s.start))
                    .with_suggestion(format!(
                        "Shorten this sentence to {} words or fewer, or split it in two",
                        limit
                    )),
                );
            }
        }

        ValidationResult::new(issues, fre)
            .with_metadata("flesch_reading_ease", fre)
            .with_metadata("words", words)
            .with_metadata("sentences", sentences.len())
            .with_metadata("syllables", syllables)
            .with_metadata("average_sentence_length", words as f64 / sentences.len() as f64)
    }
}
