//! Format corrector: mechanical whitespace and punctuation fixes.
//!
//! Rules run in this order over prose only (fenced code is copied as is),
//! each toggleable under `remediators.format_corrector.config`:
//!
//! | option               | fix                                        |
//! |----------------------|--------------------------------------------|
//! | `trailing_whitespace`| strip spaces/tabs at line ends             |
//! | `repeated_words`     | "the the" -> "the"                         |
//! | `inner_spaces`       | collapse runs of spaces inside a line      |
//! | `punctuation_spacing`| "end.Next" -> "end. Next", "a,b" -> "a, b" |
//! | `heading_spacing`    | "#Title" -> "# Title"                      |
//! | `blank_lines`        | 2+ blank lines -> 1                        |
//!
//! No rule creates input for an earlier one, so a second pass is a no-op.

use super::Remediator;
use crate::models::plugin::PluginMetadata;
use crate::models::{Context, Issue, PluginConfig, RemediationResult};
use crate::settings;
use crate::text;
use regex::Regex;
use std::ops::Range;

pub const NAME: &str = "format_corrector";

pub fn metadata() -> PluginMetadata {
    PluginMetadata::new(NAME, "1.0.0", "formatting")
        .describe("Whitespace, punctuation spacing, heading markers and repeated words")
        .by("proofkit")
        .tagged(&["formatting", "whitespace", "markdown"])
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormatSettings {
    pub trailing_whitespace: bool,
    pub repeated_words: bool,
    pub inner_spaces: bool,
    pub punctuation_spacing: bool,
    pub heading_spacing: bool,
    pub blank_lines: bool,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            trailing_whitespace: true,
            repeated_words: true,
            inner_spaces: true,
            punctuation_spacing: true,
            heading_spacing: true,
            blank_lines: true,
        }
    }
}

impl FormatSettings {
    pub fn from_config(cfg: &PluginConfig) -> Self {
        let d = Self::default();
        Self {
            trailing_whitespace: settings::read(cfg, "trailing_whitespace", d.trailing_whitespace),
            repeated_words: settings::read(cfg, "repeated_words", d.repeated_words),
            inner_spaces: settings::read(cfg, "inner_spaces", d.inner_spaces),
            punctuation_spacing: settings::read(cfg, "punctuation_spacing", d.punctuation_spacing),
            heading_spacing: settings::read(cfg, "heading_spacing", d.heading_spacing),
            blank_lines: settings::read(cfg, "blank_lines", d.blank_lines),
        }
    }
}

struct Patterns {
    trailing: Regex,
    blank_run: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            trailing: Regex::new(r"(?m)[ \t]+$")?,
            blank_run: Regex::new(r"\n(?:[ \t]*\n){2,}")?,
        })
    }
}

#[derive(Default)]
struct Tally {
    trailing: usize,
    repeated: usize,
    spaces: usize,
    punctuation: usize,
    headings: usize,
    blank_runs: usize,
}

impl Tally {
    fn describe(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.trailing > 0 {
            out.push(format!("Removed trailing whitespace from {} line(s)", self.trailing));
        }
        if self.repeated > 0 {
            out.push(format!("Removed {} repeated word(s)", self.repeated));
        }
        if self.spaces > 0 {
            out.push(format!("Collapsed {} run(s) of repeated spaces", self.spaces));
        }
        if self.punctuation > 0 {
            out.push(format!("Added {} missing space(s) after punctuation", self.punctuation));
        }
        if self.headings > 0 {
            out.push(format!("Added a space after {} heading marker(s)", self.headings));
        }
        if self.blank_runs > 0 {
            out.push(format!("Collapsed {} run(s) of blank lines", self.blank_runs));
        }
        out
    }
}

/// Apply sorted, non-overlapping replacements.
fn splice(text: &str, edits: &[(Range<usize>, &str)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for (range, with) in edits {
        out.push_str(&text[cursor..range.start]);
        out.push_str(with);
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out
}

pub struct FormatCorrector {
    settings: FormatSettings,
}

impl FormatCorrector {
    pub fn new(settings: FormatSettings) -> Self {
        Self { settings }
    }

    pub fn from_config(cfg: &PluginConfig) -> Self {
        Self::new(FormatSettings::from_config(cfg))
    }

    fn fix_segment(&self, segment: &str, p: &Patterns, tally: &mut Tally) -> String {
        let cfg = &self.settings;
        let mut s = segment.to_string();

        if cfg.trailing_whitespace {
            let n = p.trailing.find_iter(&s).count();
            if n > 0 {
                tally.trailing += n;
                s = p.trailing.replace_all(&s, "").into_owned();
            }
        }
        if cfg.repeated_words {
            let reps = text::repeated_words(&s);
            if !reps.is_empty() {
                tally.repeated += reps.len();
                let edits: Vec<(Range<usize>, &str)> =
                    reps.iter().map(|r| (r.first_end..r.second.end, "")).collect();
                s = splice(&s, &edits);
            }
        }
        if cfg.inner_spaces {
            let runs = text::inner_space_runs(&s);
            if !runs.is_empty() {
                tally.spaces += runs.len();
                let edits: Vec<(Range<usize>, &str)> = runs.into_iter().map(|r| (r, " ")).collect();
                s = splice(&s, &edits);
            }
        }
        if cfg.punctuation_spacing {
            let at = text::missing_punctuation_spaces(&s);
            if !at.is_empty() {
                tally.punctuation += at.len();
                let edits: Vec<(Range<usize>, &str)> = at.into_iter().map(|i| (i..i, " ")).collect();
                s = splice(&s, &edits);
            }
        }
        if cfg.heading_spacing {
            let at = text::unspaced_heading_markers(&s);
            if !at.is_empty() {
                tally.headings += at.len();
                let edits: Vec<(Range<usize>, &str)> = at.into_iter().map(|i| (i..i, " ")).collect();
                s = splice(&s, &edits);
            }
        }
        if cfg.blank_lines {
            let n = p.blank_run.find_iter(&s).count();
            if n > 0 {
                tally.blank_runs += n;
                s = p.blank_run.replace_all(&s, "\n\n").into_owned();
            }
        }
        s
    }
}

impl Remediator for FormatCorrector {
    fn remediate(&self, content: &str, _issues: &[Issue], _context: &Context) -> RemediationResult {
        let patterns = match Patterns::compile() {
            Ok(p) => p,
            Err(e) => return RemediationResult::failed(content, format!("format pattern: {}", e)),
        };

        let mut tally = Tally::default();
        let mut out = String::with_capacity(content.len());
        let mut cursor = 0usize;
        for range in text::prose_ranges(content) {
            out.push_str(&content[cursor..range.start]);
            out.push_str(&self.fix_segment(&content[range.clone()], &patterns, &mut tally));
            cursor = range.end;
        }
        out.push_str(&content[cursor..]);

        let changes = tally.describe();
        if changes.is_empty() {
            RemediationResult::unchanged(content)
        } else {
            RemediationResult::changed(out, changes)
        }
    }
}
