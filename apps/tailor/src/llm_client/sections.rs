//! Labeled-section scanner for free-text generation replies.
//!
//! A section is located by its header and runs until the next boundary line
//! (a numbered line such as `3.` or a markdown `##` heading) or the end of text.
//! Used by job analysis, achievement ranking, and job-posting extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NUMBERED_BOUNDARY: Regex = Regex::new(r"\n\d+\.").unwrap();
    static ref MARKDOWN_BOUNDARY: Regex = Regex::new(r"\n##").unwrap();
    static ref BULLET_MARKER: Regex = Regex::new(r"^[-*•]+\s*").unwrap();
    static ref NUMERAL_MARKER: Regex = Regex::new(r"^\d+\.\s*").unwrap();
}

/// Where a section stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Next line starting with `<digits>.`
    Numbered,
    /// Next line starting with `##`
    Markdown,
}

impl Boundary {
    fn pattern(&self) -> &'static Regex {
        match self {
            Boundary::Numbered => &NUMBERED_BOUNDARY,
            Boundary::Markdown => &MARKDOWN_BOUNDARY,
        }
    }
}

/// A compiled section header.
#[derive(Debug, Clone)]
pub struct Header(Regex);

impl Header {
    /// Header whose content may start on the same line: `REQUIRED SKILLS: Rust, Go`.
    /// Tolerates a parenthetical hint, colons, and markdown emphasis after the label.
    pub fn inline(label: &str) -> Self {
        let pattern = format!(r"(?i)(?:{label})(?:[ \t]*\([^)\n]*\))?[:\s*]*");
        Self(Regex::new(&pattern).expect("section header label must be a valid regex"))
    }

    /// Header that owns its whole line: `## KEY REQUIREMENTS (must-have)`.
    pub fn line(label: &str) -> Self {
        let pattern = format!(r"(?i)(?:{label})[^\n]*(?:\n|$)");
        Self(Regex::new(&pattern).expect("section header label must be a valid regex"))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SectionScanner {
    boundary: Boundary,
}

impl SectionScanner {
    pub const NUMBERED: SectionScanner = SectionScanner {
        boundary: Boundary::Numbered,
    };
    pub const MARKDOWN: SectionScanner = SectionScanner {
        boundary: Boundary::Markdown,
    };

    /// Returns the trimmed content of the first section matching `header`,
    /// or `None` when the header does not occur.
    pub fn section<'a>(&self, text: &'a str, header: &Header) -> Option<&'a str> {
        let m = header.0.find(text)?;
        let content_start = m.end();
        // Search for the boundary from the end of the label itself, so a header
        // immediately followed by the next numbered line yields an empty section.
        let label_end = m.start() + m.as_str().trim_end().len();

        let content_end = self
            .boundary
            .pattern()
            .find(&text[label_end..])
            .map(|b| label_end + b.start())
            .unwrap_or(text.len());

        if content_end <= content_start {
            return Some("");
        }
        Some(text[content_start..content_end].trim())
    }
}

/// Splits section content into list items: one per line, leading bullet and
/// numeral markers stripped, keeping items longer than `min_chars` characters.
pub fn list_items(content: &str, min_chars: usize) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let line = BULLET_MARKER.replace(line, "");
            let line = NUMERAL_MARKER.replace(&line, "");
            line.trim().to_string()
        })
        .filter(|item| item.chars().count() > min_chars)
        .collect()
}

/// Extracts the value of a single-line `Label: value` field.
pub fn labeled_field(text: &str, label: &str) -> Option<String> {
    let pattern = format!(r"(?i){}:[ \t*]*(.+)", regex::escape(label));
    let re = Regex::new(&pattern).ok()?;
    let value = re.captures(text)?.get(1)?.as_str();
    let value = value.trim().trim_matches('*').trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
