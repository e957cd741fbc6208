//! Markdown-vs-plain-text classification and display reformatting.
//!
//! Detection is a weighted regex heuristic, not a parser: each markdown
//! cue contributes a capped score and text is classified as markdown when
//! the total clears a threshold. Stray `*` characters or numbered prose
//! can shift the score, so callers should treat results as best-effort.
//!
//! Reformatting only adjusts whitespace and line breaks; markdown syntax
//! is never stripped or rewritten.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Scores above this threshold classify as markdown.
const MARKDOWN_THRESHOLD: f64 = 0.3;

/// Soft wrap column for the plain-text pass.
const MAX_LINE_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextFormat {
    Markdown,
    PlainText,
}

impl TextFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextFormat::Markdown => "markdown",
            TextFormat::PlainText => "plain_text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FormatDetection {
    pub format: TextFormat,
    pub confidence: f64,
}

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#{1,6}\s+").unwrap());
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-*+]\s+").unwrap());
static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.\s+").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*[^*]+\*\*").unwrap());
// Applied after bold spans are removed; the regex engine has no
// lookarounds, so single-* spans are counted on the stripped text.
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*[^*]+\*").unwrap());

// Markdown reformatting pass.
static GLUED_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z.,!?])(#{1,6}\s+)").unwrap());
static GLUED_HEADER_WS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z.,!?])\s+(#{1,6}\s+)").unwrap());
static HEADER_RUNON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(#{1,6}\s+[^#\n]+?)\s+([A-Z][a-z]+\s+[a-z])").unwrap());
static GLUED_BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z.,!?:])(-\s+)").unwrap());
static GLUED_BULLET_WS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z.,!?:])\s+(-\s+)").unwrap());
static GLUED_NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z.,!?:])\s*(\d+\.)\s*([A-Z])").unwrap());

// Shared whitespace normalization.
static SPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static NEWLINE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

// Plain-text pass.
static SENTENCE_GAP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?])\s+([A-Z])").unwrap());
static SENTENCE_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Classify `text` as markdown or plain text.
///
/// Empty or whitespace-only input is plain text at full confidence. For
/// markdown the confidence is the heuristic score itself; for plain text
/// it is the score's complement.
pub fn detect_format(text: &str) -> FormatDetection {
    let text = text.trim();

    if text.is_empty() {
        return FormatDetection {
            format: TextFormat::PlainText,
            confidence: 1.0,
        };
    }

    let score = markdown_score(text);
    if score > MARKDOWN_THRESHOLD {
        FormatDetection {
            format: TextFormat::Markdown,
            confidence: score,
        }
    } else {
        FormatDetection {
            format: TextFormat::PlainText,
            confidence: 1.0 - score,
        }
    }
}

/// Weighted sum of markdown cue counts, each cue capped, total capped at 1.
fn markdown_score(text: &str) -> f64 {
    let mut score = 0.0;

    let headers = HEADER_RE.find_iter(text).count() as f64;
    score += (headers * 0.3).min(0.6);

    let bullets = BULLET_RE.find_iter(text).count() as f64;
    score += (bullets * 0.1).min(0.4);

    let numbered = NUMBERED_RE.find_iter(text).count() as f64;
    score += (numbered * 0.1).min(0.3);

    let bold = BOLD_RE.find_iter(text).count() as f64;
    score += (bold * 0.05).min(0.2);

    let without_bold = BOLD_RE.replace_all(text, "");
    let italic = ITALIC_RE.find_iter(&without_bold).count() as f64;
    score += (italic * 0.05).min(0.2);

    score.min(1.0)
}

/// Reformat `text` for display using the detected (or overridden) format.
///
/// Roughly idempotent: a second pass over already-formatted text only
/// re-normalizes whitespace. The substitution rules are heuristic, so
/// this is an approximate contract rather than a guarantee.
pub fn format_text(text: &str, format: Option<TextFormat>) -> String {
    let text = text.trim();

    if text.is_empty() {
        return String::new();
    }

    let format = format.unwrap_or_else(|| detect_format(text).format);

    match format {
        TextFormat::Markdown => format_markdown_text(text),
        TextFormat::PlainText => format_plain_text(text),
    }
}

/// Repair compressed markdown by re-inserting the line breaks that
/// headers and list markers need, without touching the syntax itself.
/// Step order matters; each step operates on the previous step's output.
fn format_markdown_text(text: &str) -> String {
    let text = text.trim();

    // Headers glued to preceding text ("word## Header", "word. ## Header").
    let text = GLUED_HEADER_RE.replace_all(text, "${1}\n\n${2}");
    let text = GLUED_HEADER_WS_RE.replace_all(&text, "${1}\n\n${2}");

    // Header trailing text running straight into a new sentence.
    let text = HEADER_RUNON_RE.replace_all(&text, "${1}\n\n${2}");

    // Bullet items glued to preceding text or colons.
    let text = GLUED_BULLET_RE.replace_all(&text, "${1}\n${2}");
    let text = GLUED_BULLET_WS_RE.replace_all(&text, "${1}\n${2}");

    // Numbered items, normalizing "1.Item" to "1. Item".
    let text = GLUED_NUMBERED_RE.replace_all(&text, "${1}\n${2} ${3}");

    // Whitespace normalization.
    let text = SPACE_RUN_RE.replace_all(&text, " ");
    let text = NEWLINE_RUN_RE.replace_all(&text, "\n\n");

    text.trim().to_string()
}

fn format_plain_text(text: &str) -> String {
    let text = text.trim();

    let text = SPACE_RUN_RE.replace_all(text, " ");

    // Blank line between sentences that start a new capitalized run.
    let text = SENTENCE_GAP_RE.replace_all(&text, "${1}\n\n${2}");

    let mut formatted_lines = Vec::new();
    for line in text.split('\n') {
        if line.len() > MAX_LINE_LEN {
            formatted_lines.extend(wrap_at_sentences(line));
        } else {
            formatted_lines.push(line.to_string());
        }
    }
    let text = formatted_lines.join("\n");

    let text = NEWLINE_RUN_RE.replace_all(&text, "\n\n");

    text.trim().to_string()
}

/// Greedily pack sentence chunks into lines of at most ~100 characters.
/// A single sentence longer than the limit is emitted as-is.
fn wrap_at_sentences(line: &str) -> Vec<String> {
    let mut chunks: Vec<&str> = Vec::new();
    let mut start = 0;
    for m in SENTENCE_SPLIT_RE.find_iter(line) {
        // Keep the sentence-ending punctuation with the left chunk.
        let end = m.start() + 1;
        chunks.push(&line[start..end]);
        start = m.end();
    }
    if start < line.len() {
        chunks.push(&line[start..]);
    }

    let mut out = Vec::new();
    let mut current = String::new();
    for chunk in chunks {
        if !current.is_empty() && current.len() + 1 + chunk.len() > MAX_LINE_LEN {
            out.push(current.trim().to_string());
            current = chunk.to_string();
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(chunk);
        }
    }
    if !current.is_empty() {
        out.push(current.trim().to_string());
    }
    out
}
