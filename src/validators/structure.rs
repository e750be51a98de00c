//! Document structure validator for markdown-style content.
//!
//! Checks, each configurable under `validators.structure.config`:
//! - `require_headings` (default true): at least one heading.
//! - `max_heading_depth` (default 3): deepest allowed heading level.
//! - `require_introduction` (default true): a heading such as
//!   "Introduction" or "Overview".
//! - `require_conclusion` (default true): a heading such as "Conclusion" or
//!   "Summary".
//!
//! Also reports `heading_format` (`#Title`) and `excess_blank_lines` as info.
//! Score: `100 - 25 * missing elements - 10 * too-deep headings`.

use super::{compile, Validator};
use crate::models::plugin::PluginMetadata;
use crate::models::{Context, Issue, Location, PluginConfig, ValidationResult};
use crate::settings;
use crate::text::{self, LineIndex};

pub const NAME: &str = "structure";

const INTRODUCTION_WORDS: &[&str] = &["introduction", "intro", "overview", "background"];
const CONCLUSION_WORDS: &[&str] = &[
    "conclusion",
    "summary",
    "recap",
    "wrap-up",
    "wrap up",
    "key takeaways",
    "next steps",
];

pub fn metadata() -> PluginMetadata {
    PluginMetadata::new(NAME, "1.0.0", "structure")
        .describe("Headings, heading depth and introduction/conclusion sections")
        .by("proofkit")
        .tagged(&["structure", "markdown", "headings"])
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructureSettings {
    pub require_headings: bool,
    pub max_heading_depth: usize,
    pub require_introduction: bool,
    pub require_conclusion: bool,
}

impl Default for StructureSettings {
    fn default() -> Self {
        Self {
            require_headings: true,
            max_heading_depth: 3,
            require_introduction: true,
            require_conclusion: true,
        }
    }
}

impl StructureSettings {
    pub fn from_config(cfg: &PluginConfig) -> Self {
        let d = Self::default();
        Self {
            require_headings: settings::read(cfg, "require_headings", d.require_headings),
            max_heading_depth: settings::read(cfg, "max_heading_depth", d.max_heading_depth),
            require_introduction: settings::read(cfg, "require_introduction", d.require_introduction),
            require_conclusion: settings::read(cfg, "require_conclusion", d.require_conclusion),
        }
    }
}

pub struct StructureValidator {
    settings: StructureSettings,
}

impl StructureValidator {
    pub fn new(settings: StructureSettings) -> Self {
        Self { settings }
    }

    pub fn from_config(cfg: &PluginConfig) -> Self {
        Self::new(StructureSettings::from_config(cfg))
    }
}

fn has_section(titles: &[String], words: &[&str]) -> bool {
    titles.iter().any(|t| words.iter().any(|w| t.contains(w)))
}

impl Validator for StructureValidator {
    fn validate(&self, content: &str, _context: &Context) -> ValidationResult {
        let blank_run = match compile("structure_failed", r"\n(?:[ \t]*\n){2,}") {
            Ok(re) => re,
            Err(failed) => return failed,
        };

        let cfg = &self.settings;
        let headings = text::headings(content);
        let titles: Vec<String> = headings.iter().map(|h| h.title.to_lowercase()).collect();
        let mut issues = Vec::new();
        let mut missing = 0usize;
        let mut too_deep = 0usize;

        if cfg.require_headings && headings.is_empty() {
            missing += 1;
            issues.push(
                Issue::warning("missing_heading", "Document has no headings")
                    .with_suggestion("Add a title heading such as '# Topic'"),
            );
        }
        for h in &headings {
            if h.level > cfg.max_heading_depth {
                too_deep += 1;
                issues.push(
                    Issue::warning(
                        "heading_too_deep",
                        format!(
                            "Heading '{}' is level {} (maximum {})",
                            h.title, h.level, cfg.max_heading_depth
                        ),
                    )
                    .at(Location {
                        line: h.line,
                        column: 1,
                    })
                    .with_suggestion("Flatten the outline or promote this heading"),
                );
            }
        }
        if cfg.require_introduction && !has_section(&titles, INTRODUCTION_WORDS) {
            missing += 1;
            issues.push(
                Issue::warning("missing_introduction", "Document has no introduction section")
                    .with_suggestion("Add an 'Introduction' or 'Overview' section"),
            );
        }
        if cfg.require_conclusion && !has_section(&titles, CONCLUSION_WORDS) {
            missing += 1;
            issues.push(
                Issue::warning("missing_conclusion", "Document has no conclusion section")
                    .with_suggestion("Add a 'Conclusion' or 'Summary' section"),
            );
        }

        let index = LineIndex::new(content);
        for range in text::prose_ranges(content) {
            let segment = &content[range.clone()];
            for at in text::unspaced_heading_markers(segment) {
                let line_start = segment[..at].rfind('\n').map_or(0, |i| i + 1);
                issues.push(
                    Issue::info("heading_format", "Heading marker is not followed by a space")
                        .at(index.locate(range.start + line_start))
                        .with_suggestion("Insert a space after the '#' characters"),
                );
            }
            for m in blank_run.find_iter(segment) {
                issues.push(
                    Issue::info("excess_blank_lines", "More than one blank line in a row")
                        .at(index.locate(range.start + m.start() + 1))
                        .with_suggestion("Keep a single blank line between paragraphs"),
                );
            }
        }

        let score = 100.0 - 25.0 * missing as f64 - 10.0 * too_deep as f64;
        ValidationResult::new(issues, score)
            .with_metadata("headings", headings.len())
            .with_metadata("max_depth", headings.iter().map(|h| h.level).max().unwrap_or(0))
    }
}
