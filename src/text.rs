//! Text analysis helpers shared by validators and remediators.
//!
//! Content is treated as lightweight markdown: blank lines separate
//! paragraphs, ATX headings (`# Title`) and list items start their own
//! block, and fenced code (```` ``` ```` / `~~~`) is not prose. Sentences are
//! split inside prose blocks on `.`, `?` and `!` followed by whitespace,
//! skipping common abbreviations.

use crate::models::Location;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

const ABBREVIATIONS: &[&str] = &[
    "dr", "mr", "mrs", "ms", "prof", "sr", "jr", "inc", "ltd", "corp", "co", "e.g", "i.e", "vs",
    "etc", "approx", "u.s", "u.k", "p.m", "a.m", "st", "ave", "dept", "fig", "no",
];

/// A sentence slice with its byte offset in the analyzed content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub text: &'a str,
    pub start: usize,
}

impl<'a> Sentence<'a> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    pub fn word_count(&self) -> usize {
        word_count(self.text)
    }
}

/// An ATX heading line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading<'a> {
    pub level: usize,
    pub title: &'a str,
    /// 1-based line number.
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Prose,
    Heading,
}

#[derive(Debug, Clone, Copy)]
struct Block<'a> {
    kind: BlockKind,
    text: &'a str,
    start: usize,
}

/// Words as defined by Unicode word boundaries (punctuation excluded).
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.unicode_words()
}

pub fn word_count(text: &str) -> usize {
    text.unicode_words().count()
}

/// Heuristic English syllable count: vowel groups, minus a silent final
/// `e`, at least one per word.
pub fn count_syllables(word: &str) -> usize {
    let lower: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(|c| c.to_lowercase())
        .collect();
    if lower.is_empty() {
        return 0;
    }
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut groups = 0usize;
    let mut prev_vowel = false;
    for &c in &lower {
        let v = is_vowel(c);
        if v && !prev_vowel {
            groups += 1;
        }
        prev_vowel = v;
    }
    let n = lower.len();
    if n > 2 && lower[n - 1] == 'e' && lower[n - 2] != 'l' && !is_vowel(lower[n - 2]) && groups > 1 {
        groups -= 1;
    }
    groups.max(1)
}

/// Split content into blocks, dropping blank lines and fenced code.
fn blocks(content: &str) -> Vec<Block<'_>> {
    let mut out = Vec::new();
    let mut current: Option<(usize, usize)> = None;
    let mut in_fence = false;
    let mut offset = 0usize;

    for line in content.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let body = line.trim_end_matches(['\n', '\r']);
        let line_end = line_start + body.len();
        let trimmed = body.trim();

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            close_prose(content, &mut current, &mut out);
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if trimmed.is_empty() {
            close_prose(content, &mut current, &mut out);
            continue;
        }
        if heading_level(trimmed).is_some() {
            close_prose(content, &mut current, &mut out);
            out.push(Block {
                kind: BlockKind::Heading,
                text: body,
                start: line_start,
            });
            continue;
        }
        if is_list_item(trimmed) {
            close_prose(content, &mut current, &mut out);
        }
        current = match current {
            Some((s, _)) => Some((s, line_end)),
            None => Some((line_start, line_end)),
        };
    }
    close_prose(content, &mut current, &mut out);
    out
}

fn close_prose<'a>(content: &'a str, current: &mut Option<(usize, usize)>, out: &mut Vec<Block<'a>>) {
    if let Some((s, e)) = current.take() {
        out.push(Block {
            kind: BlockKind::Prose,
            text: &content[s..e],
            start: s,
        });
    }
}

/// Level of an ATX heading line (`#` run followed by whitespace or end).
fn heading_level(trimmed: &str) -> Option<usize> {
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    match trimmed[hashes..].chars().next() {
        None => Some(hashes),
        Some(c) if c.is_whitespace() => Some(hashes),
        _ => None,
    }
}

/// Offsets just past the `#` run of lines written as headings without the
/// space (`#Title`). Only lines that can start a block count: the first
/// line, a line after a blank line, or a line after another heading. The
/// marker must be followed by a letter, so `#1` and `#42` stay as they are.
pub fn unspaced_heading_markers(text: &str) -> Vec<usize> {
    let mut out = Vec::new();
    let mut offset = 0usize;
    let mut can_open = true;
    for line in text.split_inclusive('\n') {
        let body = line.trim_end_matches(['\n', '\r']);
        let indent = body.len() - body.trim_start_matches(' ').len();
        let rest = &body[indent..];
        let hashes = rest.chars().take_while(|c| *c == '#').count();
        if can_open
            && indent <= 3
            && (1..=6).contains(&hashes)
            && rest[hashes..].chars().next().is_some_and(char::is_alphabetic)
        {
            out.push(offset + indent + hashes);
        }
        let trimmed = body.trim();
        can_open = trimmed.is_empty() || heading_level(trimmed).is_some();
        offset += line.len();
    }
    out
}

fn is_list_item(trimmed: &str) -> bool {
    if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .or_else(|| trimmed.strip_prefix("+ "))
    {
        return !rest.is_empty();
    }
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && trimmed[digits..].starts_with(". ")
}

/// Headings found outside fenced code.
pub fn headings(content: &str) -> Vec<Heading<'_>> {
    let index = LineIndex::new(content);
    blocks(content)
        .into_iter()
        .filter(|b| b.kind == BlockKind::Heading)
        .filter_map(|b| {
            let trimmed = b.text.trim();
            let level = heading_level(trimmed)?;
            let title = trimmed[level..].trim().trim_end_matches('#').trim();
            Some(Heading {
                level,
                title,
                line: index.locate(b.start).line,
            })
        })
        .collect()
}

/// Sentences of all prose blocks, in document order.
pub fn sentences(content: &str) -> Vec<Sentence<'_>> {
    let mut out = Vec::new();
    for block in blocks(content) {
        if block.kind == BlockKind::Prose {
            split_block(block.text, block.start, &mut out);
        }
    }
    out
}

/// Sentences of a single run of prose (no block detection).
pub fn split_sentences(text: &str) -> Vec<Sentence<'_>> {
    let mut out = Vec::new();
    split_block(text, 0, &mut out);
    out
}

fn split_block<'a>(block: &'a str, offset: usize, out: &mut Vec<Sentence<'a>>) {
    let chars: Vec<(usize, char)> = block.char_indices().collect();
    let mut start = 0usize;
    for i in 0..chars.len() {
        let (pos, ch) = chars[i];
        if pos < start || !matches!(ch, '.' | '?' | '!') {
            continue;
        }
        let mut j = i + 1;
        while j < chars.len() && is_closing(chars[j].1) {
            j += 1;
        }
        let at_end = j == chars.len();
        if !at_end && !chars[j].1.is_whitespace() {
            continue;
        }
        if ch == '.' && is_abbreviation(&block[start..pos]) {
            continue;
        }
        let end = if at_end { block.len() } else { chars[j].0 };
        push_trimmed(block, start, end, offset, out);
        start = end;
    }
    push_trimmed(block, start, block.len(), offset, out);
}

fn is_closing(c: char) -> bool {
    matches!(c, '.' | '?' | '!' | '"' | '\'' | ')' | ']' | '\u{201D}' | '\u{2019}')
}

fn push_trimmed<'a>(block: &'a str, start: usize, end: usize, offset: usize, out: &mut Vec<Sentence<'a>>) {
    let raw = &block[start..end];
    let lead = raw.len() - raw.trim_start().len();
    let text = raw.trim();
    if !text.is_empty() {
        out.push(Sentence {
            text,
            start: offset + start + lead,
        });
    }
}

/// Whether the token just before a period is a known abbreviation or an
/// initial.
pub(crate) fn is_abbreviation(before_period: &str) -> bool {
    let token = before_period
        .split_whitespace()
        .last()
        .unwrap_or("")
        .trim_start_matches(['(', '"', '\'', '[']);
    if token.is_empty() {
        return false;
    }
    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_uppercase() {
            return true;
        }
    }
    let lower = token.to_lowercase();
    ABBREVIATIONS.contains(&lower.as_str())
}

/// Byte ranges outside fenced code blocks. Fence lines belong to the code.
pub fn prose_ranges(content: &str) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut in_fence = false;
    let mut seg_start = 0usize;
    let mut offset = 0usize;
    for line in content.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let trimmed = line.trim();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            if !in_fence && line_start > seg_start {
                out.push(seg_start..line_start);
            }
            in_fence = !in_fence;
            seg_start = offset;
        }
    }
    if !in_fence && content.len() > seg_start {
        out.push(seg_start..content.len());
    }
    out
}

/// An immediately repeated word such as "the the".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatedWord {
    pub word: String,
    /// End of the first occurrence.
    pub first_end: usize,
    /// Start and end of the repeated occurrence.
    pub second: Range<usize>,
}

/// Words repeated back to back on one line, separated only by spaces or
/// tabs. A line break ends the comparison, so a heading title followed by
/// a paragraph opening with the same word is not a repeat. "had had" and
/// "that that" are valid English and skipped. Ranges never overlap, so
/// "the the the" yields two contiguous removals.
pub fn repeated_words(text: &str) -> Vec<RepeatedWord> {
    let mut out = Vec::new();
    let mut prev: Option<(usize, &str)> = None;
    let mut gap_is_space = true;
    for (idx, token) in text.split_word_bound_indices() {
        let is_word = token.chars().any(|c| c.is_alphabetic());
        if is_word {
            if let Some((prev_end, prev_word)) = prev {
                let lower = token.to_lowercase();
                if gap_is_space
                    && prev_end < idx
                    && lower == prev_word.to_lowercase()
                    && !matches!(lower.as_str(), "had" | "that")
                {
                    out.push(RepeatedWord {
                        word: token.to_string(),
                        first_end: prev_end,
                        second: idx..idx + token.len(),
                    });
                }
            }
            prev = Some((idx + token.len(), token));
            gap_is_space = true;
        } else if token.contains(['\n', '\r']) {
            prev = None;
        } else if !token.chars().all(char::is_whitespace) {
            gap_is_space = false;
        }
    }
    out
}

/// Runs of two or more spaces/tabs between two non-whitespace characters.
/// Indentation and trailing whitespace are not included.
pub fn inner_space_runs(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b' ' || bytes[i] == b'\t' {
            let start = i;
            while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
                i += 1;
            }
            let preceded = start > 0 && !bytes[start - 1].is_ascii_whitespace();
            let followed = i < bytes.len() && !bytes[i].is_ascii_whitespace();
            if i - start >= 2 && preceded && followed {
                out.push(start..i);
            }
        } else {
            i += 1;
        }
    }
    out
}

/// Offsets where a space is missing after sentence punctuation
/// (`end.Next`) or a comma (`one,two`). Tokens that look like URLs, emails
/// or inline code are skipped.
pub fn missing_punctuation_spaces(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    if bytes.len() < 3 {
        return out;
    }
    for i in 1..bytes.len() - 1 {
        let (before, at, after) = (bytes[i - 1], bytes[i], bytes[i + 1]);
        let sentence_end = matches!(at, b'.' | b'!' | b'?')
            && before.is_ascii_lowercase()
            && after.is_ascii_uppercase()
            && bytes.get(i + 2).map_or(false, |b| b.is_ascii_lowercase());
        let comma = at == b',' && before.is_ascii_alphabetic() && after.is_ascii_alphabetic();
        if !(sentence_end || comma) {
            continue;
        }
        let tok_start = bytes[..i]
            .iter()
            .rposition(|b| b.is_ascii_whitespace())
            .map_or(0, |p| p + 1);
        let tok_end = bytes[i..]
            .iter()
            .position(|b| b.is_ascii_whitespace())
            .map_or(bytes.len(), |p| i + p);
        let token = &text[tok_start..tok_end];
        if token.contains("://") || token.contains('@') || token.contains('`') || token.contains("www.") {
            continue;
        }
        out.push(i + 1);
    }
    out
}

/// Maps byte offsets to 1-based line/column locations.
pub struct LineIndex<'a> {
    content: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(content: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(content.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            content,
            line_starts,
        }
    }

    pub fn locate(&self, offset: usize) -> Location {
        let offset = offset.min(self.content.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_starts[line];
        let column = self
            .content
            .get(line_start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(0)
            + 1;
        Location {
            line: line + 1,
            column,
        }
    }
}

/// Uppercase the first alphabetic character, leaving the rest untouched.
pub fn capitalize_first(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut done = false;
    for c in text.chars() {
        if !done && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            done = true;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentences_split_on_terminal_punctuation_and_skip_abbreviations() {
        let text = "Dr. Smith arrived at 3.5 p.m. today. Was it late? Yes!";
        let got: Vec<&str> = sentences(text).iter().map(|s| s.text).collect();
        assert_eq!(got, vec!["Dr. Smith arrived at 3.5 p.m. today.", "Was it late?", "Yes!"]);
    }

    #[test]
    fn test_sentence_offsets_point_into_content() {
        let text = "First one.  Second one.\n\nThird";
        for s in sentences(text) {
            assert_eq!(&text[s.start..s.end()], s.text);
        }
        assert_eq!(sentences(text).len(), 3);
    }

    #[test]
    fn test_headings_lists_and_fences_are_not_prose() {
        let text = "# Intro\nSome text here\n- item one\n- item two\n```\ncode. More code.\n```\n## Outro\n";
        let got: Vec<&str> = sentences(text).iter().map(|s| s.text).collect();
        assert_eq!(got, vec!["Some text here", "- item one", "- item two"]);
        let hs = headings(text);
        assert_eq!(hs.len(), 2);
        assert_eq!((hs[0].level, hs[0].title, hs[0].line), (1, "Intro", 1));
        assert_eq!((hs[1].level, hs[1].title, hs[1].line), (2, "Outro", 8));
    }

    #[test]
    fn test_heading_requires_space_after_hashes() {
        assert!(headings("#Title").is_empty());
        assert_eq!(headings("### Deep ###")[0].title, "Deep");
    }

    #[test]
    fn test_syllable_heuristic() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("readability"), 5);
        assert_eq!(count_syllables("42"), 0);
    }

    #[test]
    fn test_line_index_locates_lines_and_char_columns() {
        let text = "ab\nçd ef\n";
        let idx = LineIndex::new(text);
        assert_eq!(idx.locate(0), Location { line: 1, column: 1 });
        let e = text.find('e').unwrap();
        assert_eq!(idx.locate(e), Location { line: 2, column: 4 });
    }

    #[test]
    fn test_prose_ranges_exclude_fences() {
        let text = "intro\n```\nlet  x = 1;\n```\noutro\n";
        let ranges = prose_ranges(text);
        let parts: Vec<&str> = ranges.iter().map(|r| &text[r.clone()]).collect();
        assert_eq!(parts, vec!["intro\n", "outro\n"]);
        assert!(prose_ranges("```\nopen fence").is_empty());
    }

    #[test]
    fn test_repeated_words_collapse_runs_and_skip_valid_pairs() {
        let found = repeated_words("See the the the cat. It had had enough, that that is.");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|r| r.word == "the"));
        assert_eq!(found[0].second.end, found[1].first_end);
        let found = repeated_words("Word.\nword again");
        assert!(found.is_empty());
    }

    #[test]
    fn test_unspaced_heading_markers_only_open_blocks() {
        assert_eq!(unspaced_heading_markers("#Title\nbody"), vec![1]);
        assert_eq!(unspaced_heading_markers("# A\n##B\n\n  ###C\n"), vec![6, 14]);
        assert!(unspaced_heading_markers("Notes:\n#1 rule is safety.\n").is_empty());
        assert!(unspaced_heading_markers("#42 is the answer\n").is_empty());
        assert!(unspaced_heading_markers("Tagged with\n#hashtag today\n").is_empty());
        assert!(unspaced_heading_markers("#######Seven\n").is_empty());
    }

    #[test]
    fn test_repeated_words_stop_at_line_breaks() {
        assert!(repeated_words("# Photosynthesis\n\nPhotosynthesis is how plants make food.\n").is_empty());
        assert!(repeated_words("a list of the\nthe items").is_empty());
        let found = repeated_words("# The the title\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].second, 6..9);
    }

    #[test]
    fn test_inner_space_runs_ignore_indentation_and_trailing() {
        let text = "    indented  twice   here  \nnext";
        let runs = inner_space_runs(text);
        assert_eq!(runs.len(), 2);
        assert_eq!(&text[runs[0].clone()], "  ");
        assert_eq!(&text[runs[1].clone()], "   ");
    }

    #[test]
    fn test_missing_punctuation_spaces_skip_urls() {
        let text = "It ended.Then red,green and https://a.Example,b";
        let offsets = missing_punctuation_spaces(text);
        assert_eq!(offsets, vec![9, 18]);
    }

    #[test]
    fn test_capitalize_first_skips_leading_punctuation() {
        assert_eq!(capitalize_first("\"more words"), "\"More words");
        assert_eq!(capitalize_first(""), "");
    }
}
