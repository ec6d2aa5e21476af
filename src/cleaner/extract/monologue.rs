use std::sync::LazyLock;

use regex::Regex;

use crate::cleaner::lines::MONOLOGUE_KEYWORD;
use crate::cleaner::normalize::normalize;

// Multi-line fallback for blobs where the keyword and the text sit on
// different lines ("匠人独白：\n我热爱……")
static BLOB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?s){}[:：]\s*(.*)", MONOLOGUE_KEYWORD)).unwrap());

/// The segmented single-line candidate wins; otherwise everything after the
/// keyword in the whole blob. The result never keeps a trailing run of
/// sentence punctuation.
pub fn resolve(candidate: Option<&str>, raw: &str) -> String {
    let text = candidate
        .map(str::to_string)
        .or_else(|| {
            BLOB_RE
                .captures(raw)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
        .unwrap_or_default();

    strip_trailing_punct(&normalize(&text))
}

fn strip_trailing_punct(text: &str) -> String {
    text.trim_end_matches(|c: char| {
        matches!(c, '。' | '！' | '!' | '.' | ',' | '，') || c.is_whitespace()
    })
    .to_string()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_period_stripped() {
        assert_eq!(resolve(Some("我热爱这份工作。"), ""), "我热爱这份工作");
    }

    #[test]
    fn trailing_run_stripped() {
        assert_eq!(resolve(Some("认真对待每一块表。！， "), ""), "认真对待每一块表");
    }

    #[test]
    fn blob_fallback_spans_lines() {
        let raw = "*技能：修表\n匠人独白：\n把每一块表\n都当作自己的";
        assert_eq!(resolve(None, raw), "把每一块表都当作自己的");
    }

    #[test]
    fn empty_when_absent() {
        assert_eq!(resolve(None, "没有独白的文本"), "");
    }

    #[test]
    fn candidate_beats_blob() {
        let raw = "匠人独白：废弃版本";
        assert_eq!(resolve(Some("采用版本"), raw), "采用版本");
    }

    #[test]
    fn normalized_on_the_way_out() {
        assert_eq!(resolve(Some("热爱  这份 工作 。。"), ""), "热爱这份工作");
    }
}
