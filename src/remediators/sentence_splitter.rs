//! Sentence splitter.
//!
//! Every prose sentence longer than `max_words` (default 20) is split at a
//! coordinating conjunction (`and`, `but`, `or`). The candidate closest to
//! the middle of the sentence wins, provided both sides keep at least
//! `min_clause_words` (default 3) words. The conjunction and a comma before
//! it are dropped, the left clause is closed with a period and the right
//! clause is capitalized. Pieces still over the limit are split again.
//!
//! A candidate is unsafe when the left clause already ends in terminal
//! punctuation, when it ends in an abbreviation (the new period would not
//! read as a sentence end), or when the right clause does not start with a
//! letter. Sentences without a safe candidate stay as they are.

use super::Remediator;
use crate::models::plugin::PluginMetadata;
use crate::models::{Context, Issue, PluginConfig, RemediationResult};
use crate::settings;
use crate::text::{self, word_count};
use regex::Regex;
use tracing::debug;

pub const NAME: &str = "sentence_splitter";

pub fn metadata() -> PluginMetadata {
    PluginMetadata::new(NAME, "1.0.0", "readability")
        .describe("Splits overly long sentences at coordinating conjunctions")
        .by("proofkit")
        .tagged(&["readability", "sentences", "rewrite"])
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitterSettings {
    pub max_words: usize,
    pub min_clause_words: usize,
}

impl Default for SplitterSettings {
    fn default() -> Self {
        Self {
            max_words: 20,
            min_clause_words: 3,
        }
    }
}

impl SplitterSettings {
    pub fn from_config(cfg: &PluginConfig) -> Self {
        let d = Self::default();
        Self {
            max_words: settings::read(cfg, "max_words", d.max_words),
            min_clause_words: settings::read(cfg, "min_clause_words", d.min_clause_words).max(1),
        }
    }
}

pub struct SentenceSplitter {
    settings: SplitterSettings,
}

impl SentenceSplitter {
    pub fn new(settings: SplitterSettings) -> Self {
        Self { settings }
    }

    pub fn from_config(cfg: &PluginConfig) -> Self {
        Self::new(SplitterSettings::from_config(cfg))
    }

    /// Split one sentence into pieces, recursing while pieces are too long.
    fn split(&self, sentence: &str, conj: &Regex) -> Vec<String> {
        if word_count(sentence) <= self.settings.max_words {
            return vec![sentence.to_string()];
        }
        match self.split_point(sentence, conj) {
            Some((left, right)) => {
                let mut out = self.split(&left, conj);
                out.extend(self.split(&right, conj));
                out
            }
            None => vec![sentence.to_string()],
        }
    }

    fn split_point(&self, sentence: &str, conj: &Regex) -> Option<(String, String)> {
        let total = word_count(sentence);
        let middle = total as f64 / 2.0;
        let min = self.settings.min_clause_words;
        let mut best: Option<(f64, String, String)> = None;

        for m in conj.find_iter(sentence) {
            let left_raw = &sentence[..m.start()];
            let right_raw = sentence[m.end()..].trim_start();
            let left_words = word_count(left_raw);
            if left_words < min || word_count(right_raw) < min {
                continue;
            }
            let left = left_raw.trim_end().trim_end_matches([',', ';']).trim_end();
            if left.is_empty()
                || left.ends_with(['.', '!', '?', ':'])
                || text::is_abbreviation(left)
                || !right_raw.chars().next().is_some_and(char::is_alphabetic)
            {
                continue;
            }
            let distance = (left_words as f64 - middle).abs();
            if best.as_ref().map_or(true, |(d, _, _)| distance < *d) {
                best = Some((
                    distance,
                    format!("{}.", left),
                    text::capitalize_first(right_raw),
                ));
            }
        }
        best.map(|(_, l, r)| (l, r))
    }
}

impl Remediator for SentenceSplitter {
    fn remediate(&self, content: &str, _issues: &[Issue], _context: &Context) -> RemediationResult {
        let conj = match Regex::new(r"(?i)\b(?:and|but|or)\b") {
            Ok(re) => re,
            Err(e) => return RemediationResult::failed(content, format!("conjunction pattern: {}", e)),
        };

        let mut out = String::with_capacity(content.len() + 16);
        let mut changes = Vec::new();
        let mut cursor = 0usize;
        for s in text::sentences(content) {
            let words = s.word_count();
            if words <= self.settings.max_words {
                continue;
            }
            let pieces = self.split(s.text, &conj);
            if pieces.len() < 2 {
                debug!(words, "no safe split point");
                continue;
            }
            out.push_str(&content[cursor..s.start]);
            out.push_str(&pieces.join(" "));
            cursor = s.end();
            changes.push(format!(
                "Split a sentence of {} words into {} sentences",
                words,
                pieces.len()
            ));
        }
        if changes.is_empty() {
            return RemediationResult::unchanged(content);
        }
        out.push_str(&content[cursor..]);
        RemediationResult::changed(out, changes)
    }
}
