use std::sync::LazyLock;

use regex::Regex;

use crate::cleaner::lines::EXPERIENCE_KEYWORD;
use crate::cleaner::normalize::normalize;

static KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"{}[:：]\s*(\S+)", EXPERIENCE_KEYWORD)).unwrap());
// "10年", "10+年", "近10年" on a technician line
static LINE_DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:近)?\d{1,2}\+?年").unwrap());
// Whole-blob safety net, 余年 variant included
static BLOB_DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"近?\d+\+?年|\d+余年").unwrap());
// Stuttered prefixes from malformed cells: "匠龄：匠龄：10年"
static STUTTER_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^(?:{}|[:：])+", EXPERIENCE_KEYWORD)).unwrap());
// "10+年" reads better as "10年+"
static PLUS_BEFORE_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\+年").unwrap());

/// Ordered strategies, first match wins: explicit 匠龄 marker on a technician
/// line, a bare duration on a technician line, a duration anywhere in the
/// blob, and finally the value from a dedicated spreadsheet column.
pub fn resolve(technician_lines: &[String], raw: &str, column: Option<&str>) -> String {
    let found = technician_lines
        .iter()
        .find_map(|line| from_line(line))
        .or_else(|| from_blob(raw))
        .or_else(|| {
            column
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        });

    match found {
        Some(value) => polish(&value),
        None => String::new(),
    }
}

// Duration patterns assume no spaces inside "近10年"; matching runs on the
// normalized line so "近 10 年" still hits.
fn from_line(line: &str) -> Option<String> {
    let line = normalize(line);
    if let Some(caps) = KEYWORD_RE.captures(&line) {
        let cleaned = STUTTER_PREFIX_RE.replace(&caps[1], "").trim().to_string();
        if !cleaned.is_empty() {
            return Some(cleaned);
        }
    }
    LINE_DURATION_RE
        .find(&line)
        .map(|m| m.as_str().to_string())
}

fn from_blob(raw: &str) -> Option<String> {
    let blob = normalize(raw);
    BLOB_DURATION_RE.find(&blob).map(|m| m.as_str().to_string())
}

fn polish(value: &str) -> String {
    let cleaned = normalize(value);
    PLUS_BEFORE_YEAR_RE
        .replace_all(&cleaned, "$1年+")
        .into_owned()
}

// ── Tests ──
