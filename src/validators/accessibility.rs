//! Accessibility validator for markdown content: image alt text, link text
//! that makes sense out of context, and heading outlines without gaps.

use super::{compile, Validator};
use crate::models::plugin::PluginMetadata;
use crate::models::{Context, Issue, Location, PluginConfig, ValidationResult};
use crate::settings;
use crate::text::{self, LineIndex};

pub const NAME: &str = "accessibility";

pub fn metadata() -> PluginMetadata {
    PluginMetadata::new(NAME, "1.0.0", "accessibility")
        .describe("Image alt text, descriptive links and heading order")
        .by("proofkit")
        .tagged(&["accessibility", "markdown", "a11y"])
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccessibilitySettings {
    pub check_alt_text: bool,
    pub check_link_text: bool,
    pub check_heading_order: bool,
}

impl Default for AccessibilitySettings {
    fn default() -> Self {
        Self {
            check_alt_text: true,
            check_link_text: true,
            check_heading_order: true,
        }
    }
}

impl AccessibilitySettings {
    pub fn from_config(cfg: &PluginConfig) -> Self {
        let d = Self::default();
        Self {
            check_alt_text: settings::read(cfg, "check_alt_text", d.check_alt_text),
            check_link_text: settings::read(cfg, "check_link_text", d.check_link_text),
            check_heading_order: settings::read(cfg, "check_heading_order", d.check_heading_order),
        }
    }
}

pub struct AccessibilityValidator {
    settings: AccessibilitySettings,
}

impl AccessibilityValidator {
    pub fn new(settings: AccessibilitySettings) -> Self {
        Self { settings }
    }

    pub fn from_config(cfg: &PluginConfig) -> Self {
        Self::new(AccessibilitySettings::from_config(cfg))
    }
}

impl Validator for AccessibilityValidator {
    fn validate(&self, content: &str, _context: &Context) -> ValidationResult {
        let empty_alt = match compile("accessibility_failed", r"!\[\s*\]\(") {
            Ok(re) => re,
            Err(failed) => return failed,
        };
        let vague = match compile(
            "accessibility_failed",
            r"(?i)\[\s*(click here|here|read more|more|link|this)\s*\]\(",
        ) {
            Ok(re) => re,
            Err(failed) => return failed,
        };

        let index = LineIndex::new(content);
        let mut issues = Vec::new();
        for range in text::prose_ranges(content) {
            let segment = &content[range.clone()];
            if self.settings.check_alt_text {
                for m in empty_alt.find_iter(segment) {
                    issues.push(
                        Issue::error("missing_alt_text", "Image has no alternative text")
                            .at(index.locate(range.start + m.start()))
                            .with_suggestion("Describe the image inside the brackets"),
                    );
                }
            }
            if self.settings.check_link_text {
                for caps in vague.captures_iter(segment) {
                    let (Some(whole), Some(label)) = (caps.get(0), caps.get(1)) else {
                        continue;
                    };
                    // Images are covered by the alt text check.
                    if whole.start() > 0 && segment.as_bytes()[whole.start() - 1] == b'!' {
                        continue;
                    }
                    issues.push(
                        Issue::warning(
                            "vague_link_text",
                            format!("Link text '{}' does not describe the target", label.as_str()),
                        )
                        .at(index.locate(range.start + whole.start()))
                        .with_suggestion("Use link text that names the destination"),
                    );
                }
            }
        }

        if self.settings.check_heading_order {
            let headings = text::headings(content);
            for pair in headings.windows(2) {
                let (prev, next) = (&pair[0], &pair[1]);
                if next.level > prev.level + 1 {
                    issues.push(
                        Issue::warning(
                            "skipped_heading_level",
                            format!(
                                "Heading '{}' jumps from level {} to level {}",
                                next.title, prev.level, next.level
                            ),
                        )
                        .at(Location {
                            line: next.line,
                            column: 1,
                        })
                        .with_suggestion(format!("Use a level {} heading here", prev.level + 1)),
                    );
                }
            }
        }

        ValidationResult::with_penalties(issues, 20.0, 10.0, 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    fn run(content: &str) -> ValidationResult {
        AccessibilityValidator::new(AccessibilitySettings::default()).validate(content, &Context::new())
    }

    #[test]
    fn test_empty_alt_text_is_an_error() {
        let res = run("Look:\n![ ](diagram.png)\n![A labelled diagram](d.png)");
        assert_eq!(res.issues.len(), 1);
        assert_eq!(res.issues[0].kind, "missing_alt_text");
        assert_eq!(res.issues[0].severity, Severity::Error);
        assert_eq!(res.issues[0].location.unwrap().line, 2);
        assert_eq!(res.score, 80.0);
    }

    #[test]
    fn test_vague_links_warn_but_descriptive_links_pass() {
        let res = run("[Click here](a.html) or [Read More](b.html) or [the syllabus](c.html).");
        let kinds: Vec<_> = res.issues.iter().map(|i| i.kind.as_str()).collect();
        assert_eq!(kinds, vec!["vague_link_text", "vague_link_text"]);
        assert_eq!(res.score, 80.0);
    }

    #[test]
    fn test_image_named_here_is_not_a_link() {
        let res = run("![here](x.png)");
        assert!(res.issues.is_empty());
    }

    #[test]
    fn test_heading_level_jumps_are_reported() {
        let res = run("# Title\n### Skipped\n## Fine\n### Fine too\n");
        assert_eq!(res.issues.len(), 1);
        assert_eq!(res.issues[0].kind, "skipped_heading_level");
        assert_eq!(res.issues[0].location.unwrap().line, 2);
    }

    #[test]
    fn test_code_fences_are_ignored() {
        let res = run("```\n![](x.png) [here](y)\n```\n");
        assert!(res.issues.is_empty());
        assert_eq!(res.score, 100.0);
    }
}
