use crate::cleaner::normalize::{is_cjk, normalize};
use crate::cleaner::sections::SkillSection;

/// Slots on the card template.
pub const MAX_SKILLS: usize = 3;

const TERMINAL_PUNCT: &[char] = &['。', '！', '!', '？', '?', '.', '…'];

/// Sections in encounter order, truncated to the first three and padded to
/// exactly three slots. Description lines are joined, normalized, de-stuttered
/// and guaranteed to end in sentence punctuation when non-empty.
pub fn resolve(sections: &[SkillSection]) -> ([String; 3], [String; 3]) {
    let mut titles: [String; 3] = Default::default();
    let mut descriptions: [String; 3] = Default::default();

    for (i, section) in sections.iter().take(MAX_SKILLS).enumerate() {
        titles[i] = normalize(&section.title);
        descriptions[i] = polish_description(&section.desc_lines.join(" "));
    }

    (titles, descriptions)
}

fn polish_description(joined: &str) -> String {
    let mut text = collapse_stutter(&normalize(joined));
    if !text.is_empty() && !text.ends_with(TERMINAL_PUNCT) {
        text.push('。');
    }
    text
}

/// Collapse an immediately repeated CJK phrase of ≥2 chars ("维修维修手表" →
/// "维修手表") — a frequent paste artifact in the source cells. Longest
/// repeat wins at each position.
fn collapse_stutter(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let max_len = (chars.len() - i) / 2;
        let repeat = (2..=max_len)
            .rev()
            .find(|&k| is_cjk_run(&chars[i..i + k]) && chars[i..i + k] == chars[i + k..i + 2 * k]);
        if let Some(k) = repeat {
            out.extend(&chars[i..i + k]);
            i += 2 * k;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

fn is_cjk_run(chars: &[char]) -> bool {
    chars.iter().all(|&c| is_cjk(c))
}

// ── Tests ──
