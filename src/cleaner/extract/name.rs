use std::sync::LazyLock;

use regex::Regex;

use crate::cleaner::lines::{EXPERIENCE_KEYWORD, TECHNICIAN_KEYWORD};
use crate::cleaner::normalize::normalize;

static AFTER_KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"{}[:：]\s*(.*)$", TECHNICIAN_KEYWORD)).unwrap());
static FIRST_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"{}[:：]\s*(\S+)", TECHNICIAN_KEYWORD)).unwrap());

/// A structured name column is trusted over anything embedded in the text;
/// the technician line is only consulted when no column value exists.
pub fn resolve(column: Option<&str>, technician_lines: &[String]) -> String {
    if let Some(value) = column.map(str::trim).filter(|v| !v.is_empty()) {
        return normalize(value);
    }
    technician_lines
        .iter()
        .find_map(|line| from_line(line))
        .map(|name| normalize(&name))
        .unwrap_or_default()
}

fn from_line(line: &str) -> Option<String> {
    full_capture(line).or_else(|| token_capture(line))
}

/// Everything after the keyword's colon, cut at the experience marker or at a
/// wide gap. A real name is short and carries no digit and no 年 — anything
/// else is a truncated sentence, not a name.
fn full_capture(line: &str) -> Option<String> {
    let captured = AFTER_KEYWORD_RE.captures(line)?.get(1)?.as_str();
    let cut = cut_at_gap(cut_at(captured, EXPERIENCE_KEYWORD)).trim();
    accept(cut, 5)
}

/// Stricter fallback: the first whitespace-free token after the keyword.
fn token_capture(line: &str) -> Option<String> {
    let token = FIRST_TOKEN_RE.captures(line)?.get(1)?.as_str();
    let cut = cut_at(token, EXPERIENCE_KEYWORD).trim();
    accept(cut, 4)
}

fn accept(candidate: &str, max_chars: usize) -> Option<String> {
    let ok = !candidate.is_empty()
        && candidate.chars().count() <= max_chars
        && !candidate.chars().any(|c| c.is_ascii_digit() || c == '年');
    ok.then(|| candidate.to_string())
}

fn cut_at<'a>(text: &'a str, marker: &str) -> &'a str {
    text.split(marker).next().unwrap_or(text)
}

fn cut_at_gap(text: &str) -> &str {
    text.split("  ").next().unwrap_or(text)
}

// ── Tests ──
