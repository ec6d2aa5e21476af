use std::sync::LazyLock;

use regex::Regex;

// "Short text followed by a trailing colon with nothing after it"
static BARE_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.{2,15}[:：]\s*$").unwrap());

pub const MONOLOGUE_KEYWORD: &str = "匠人独白";
pub const TECHNICIAN_KEYWORD: &str = "维修技师";
pub const EXPERIENCE_KEYWORD: &str = "匠龄";

pub const BULLET_GLYPHS: &[char] = &['*', '●', '•'];

/// One classified line of a biography blob. Classification is positional and
/// keyword-driven; the section state machine decides what each line means in
/// context.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// Contains the monologue keyword; payload is the text after the first
    /// colon on the line (empty when the colon is missing or terminal).
    Monologue { text: String },
    /// Contains the technician or experience keyword; kept whole for
    /// name/experience extraction.
    Technician { text: String },
    /// Bullet-marked or trailing-colon section header, already split on the
    /// first colon.
    Header { title: String, desc: Option<String> },
    /// Anything else.
    Content { text: String },
}

pub fn classify_lines(raw: &str) -> Vec<Line> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(classify_line)
        .collect()
}

fn classify_line(line: &str) -> Line {
    if line.contains(MONOLOGUE_KEYWORD) {
        let text = split_first_colon(line)
            .map(|(_, rest)| rest.trim().to_string())
            .unwrap_or_default();
        return Line::Monologue { text };
    }

    // A short line carrying only 匠龄 is experience data, not a skill
    // section; long prose mentioning 匠龄 falls through.
    if line.contains(TECHNICIAN_KEYWORD)
        || (line.contains(EXPERIENCE_KEYWORD) && line.chars().count() < 30)
    {
        return Line::Technician {
            text: line.to_string(),
        };
    }

    let bulleted = line.starts_with(BULLET_GLYPHS);
    if bulleted || BARE_TITLE_RE.is_match(line) {
        return split_header(line);
    }

    Line::Content {
        text: line.to_string(),
    }
}

/// Split a header line on its FIRST colon into (title, first description
/// line). A line without a colon is a bare title. Leading bullet glyphs are
/// stripped from the title.
pub fn split_header(line: &str) -> Line {
    match split_first_colon(line) {
        Some((title_raw, desc_raw)) => {
            let desc = desc_raw.trim();
            Line::Header {
                title: strip_bullets(title_raw),
                desc: (!desc.is_empty()).then(|| desc.to_string()),
            }
        }
        None => Line::Header {
            title: strip_bullets(line),
            desc: None,
        },
    }
}

/// First half- or full-width colon, whichever comes first.
pub fn split_first_colon(line: &str) -> Option<(&str, &str)> {
    let idx = line.find([':', '：'])?;
    let colon_len = line[idx..].chars().next().map(char::len_utf8)?;
    Some((&line[..idx], &line[idx + colon_len..]))
}

fn strip_bullets(title: &str) -> String {
    title
        .trim_start_matches(|c: char| BULLET_GLYPHS.contains(&c) || c.is_whitespace())
        .trim()
        .to_string()
}

// ── Tests ──
