use std::sync::LazyLock;

use regex::Regex;

static COMMA_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[，,]{2,}").unwrap());
static PERIOD_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[。.]{2,}").unwrap());
static BANG_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[！!]{2,}").unwrap());
static QUESTION_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[？?]{2,}").unwrap());

/// Canonicalize whitespace and punctuation in one cell's worth of text.
///
/// Total function: never fails, empty in → empty out. Runs the pass pipeline
/// to a fixpoint, so `normalize(normalize(s)) == normalize(s)` holds for any
/// input (a single space removal can expose a new punctuation run, e.g.
/// "。 。").
pub fn normalize(text: &str) -> String {
    let mut cur = normalize_once(text);
    loop {
        let next = normalize_once(&cur);
        if next == cur {
            return cur;
        }
        cur = next;
    }
}

fn normalize_once(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    let plus_tight = collapsed.replace(" +", "+").replace("+ ", "+");
    let deduped = collapse_punct_runs(&plus_tight);
    strip_contextual_spaces(&deduped)
}

/// Any whitespace run (tabs, newlines, full-width space included) becomes a
/// single ASCII space; ends trimmed.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(segment);
    }
    out
}

/// Runs of repeated punctuation collapse within their own class only; a comma
/// run never becomes a period. Mixed-width runs resolve to the full-width
/// mark.
fn collapse_punct_runs(text: &str) -> String {
    let text = COMMA_RUN_RE.replace_all(text, "，");
    let text = PERIOD_RUN_RE.replace_all(&text, "。");
    let text = BANG_RUN_RE.replace_all(&text, "！");
    QUESTION_RUN_RE.replace_all(&text, "？").into_owned()
}

/// Drop spaces that touch CJK text or full-width punctuation on either side,
/// and spaces splitting a number ("15 00", "50 +"). The `regex` crate has no
/// lookaround, so this walks chars with one-neighbor context.
fn strip_contextual_spaces(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let prev = i.checked_sub(1).map(|j| chars[j]);
            let next = chars.get(i + 1).copied();
            let touches_cjk = prev.is_some_and(is_cjk_or_fullwidth)
                || next.is_some_and(is_cjk_or_fullwidth);
            let splits_number = prev.is_some_and(|p| p.is_ascii_digit())
                && next.is_some_and(|n| n.is_ascii_digit() || n == '+');
            if touches_cjk || splits_number {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// CJK ideographs plus the CJK and full-width punctuation blocks. Text in
/// this script carries no inter-character spaces.
pub fn is_cjk_or_fullwidth(c: char) -> bool {
    matches!(c, '\u{4e00}'..='\u{9fa5}' | '\u{3000}'..='\u{303f}' | '\u{ff00}'..='\u{ffef}')
}

pub fn is_cjk(c: char) -> bool {
    matches!(c, '\u{4e00}'..='\u{9fa5}')
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t"), "");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalize("hello   world"), "hello world");
        assert_eq!(normalize("a\t\nb"), "a b");
    }

    #[test]
    fn cjk_digit_gap_removed() {
        assert_eq!(normalize("从业 15 年"), "从业15年");
        assert_eq!(normalize("领域 15"), "领域15");
    }

    #[test]
    fn plus_suffix_tightened() {
        assert_eq!(normalize("50 +"), "50+");
        assert_eq!(normalize("+ 50"), "+50");
        assert_eq!(normalize("4000枚 +"), "4000枚+");
    }

    #[test]
    fn digit_gap_closed() {
        assert_eq!(normalize("15 00"), "1500");
        assert_eq!(normalize("50 + 年"), "50+年");
    }

    #[test]
    fn punct_runs_collapse_per_class() {
        assert_eq!(normalize("好，，，好"), "好，好");
        assert_eq!(normalize("完。。"), "完。");
        assert_eq!(normalize("真棒！！！"), "真棒！");
        assert_eq!(normalize("吗？？"), "吗？");
        // Classes are independent
        assert_eq!(normalize("，。"), "，。");
    }

    #[test]
    fn mixed_width_runs_resolve_fullwidth() {
        assert_eq!(normalize("了,，"), "了，");
        assert_eq!(normalize("了。."), "了。");
    }

    #[test]
    fn space_touching_fullwidth_punct_removed() {
        assert_eq!(normalize("结束 ：开始"), "结束：开始");
        assert_eq!(normalize("句号。 下一句"), "句号。下一句");
    }

    #[test]
    fn ascii_words_keep_spaces() {
        assert_eq!(normalize("ROLEX watch repair"), "ROLEX watch repair");
    }

    #[test]
    fn idempotent() {
        let cases = [
            "",
            "从业 15 年",
            "50 +",
            "。 。",
            "精通  ROLEX 、OMEGA  等品牌 ，维修 4000 枚 + ！！",
            "a  b　c",
            "匠龄 ： 近 10 年",
            "1 2 3 + 年。。，，",
        ];
        for case in cases {
            let once = normalize(case);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", case);
        }
    }

    #[test]
    fn space_removal_exposes_punct_run() {
        // The exposed "。。" must still collapse
        assert_eq!(normalize("。 。"), "。");
    }
}
