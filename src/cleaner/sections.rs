use tracing::debug;

use super::lines::{split_first_colon, Line};

/// Threshold under which an unmarked "label: value" line is recovered as a
/// skill section instead of being discarded.
const UNMARKED_PAIR_MAX_CHARS: usize = 50;

/// The segmented view of one biography blob: the monologue candidate, the
/// technician/experience lines, and the skill sections in encounter order
/// (all of them — truncation to three happens at extraction).
#[derive(Debug, Default)]
pub struct Segments {
    pub monologue: Option<String>,
    pub technician: Vec<String>,
    pub skills: Vec<SkillSection>,
    pub discarded: usize,
}

#[derive(Debug)]
pub struct SkillSection {
    pub title: String,
    pub desc_lines: Vec<String>,
}

/// Single pass over the classified lines, threading the open skill buffer
/// through the loop. Nothing is shared between rows, so rows can be
/// segmented in parallel.
pub fn segment(lines: &[Line]) -> Segments {
    let mut segments = Segments::default();
    let mut buffer: Option<SkillSection> = None;

    for line in lines {
        match line {
            Line::Monologue { text } => {
                flush(&mut buffer, &mut segments);
                if segments.monologue.is_none() && !text.is_empty() {
                    segments.monologue = Some(text.clone());
                }
            }
            Line::Technician { text } => {
                flush(&mut buffer, &mut segments);
                segments.technician.push(text.clone());
            }
            Line::Header { title, desc } => {
                flush(&mut buffer, &mut segments);
                buffer = Some(SkillSection {
                    title: title.clone(),
                    desc_lines: desc.iter().cloned().collect(),
                });
            }
            Line::Content { text } => match buffer.as_mut() {
                Some(open) => open.desc_lines.push(text.clone()),
                None => {
                    if let Some(recovered) = recover_unmarked_pair(text) {
                        buffer = Some(recovered);
                    } else {
                        debug!(line = %text, "discarding unstructured line");
                        segments.discarded += 1;
                    }
                }
            },
        }
    }

    flush(&mut buffer, &mut segments);
    segments
}

/// A short colon-bearing line with no open section is a title the author
/// forgot to bullet-mark.
fn recover_unmarked_pair(line: &str) -> Option<SkillSection> {
    if line.chars().count() >= UNMARKED_PAIR_MAX_CHARS {
        return None;
    }
    let (title, desc) = split_first_colon(line)?;
    let desc = desc.trim();
    Some(SkillSection {
        title: title.trim().to_string(),
        desc_lines: if desc.is_empty() {
            Vec::new()
        } else {
            vec![desc.to_string()]
        },
    })
}

fn flush(buffer: &mut Option<SkillSection>, segments: &mut Segments) {
    if let Some(section) = buffer.take() {
        if !section.title.is_empty() || section.desc_lines.iter().any(|l| !l.is_empty()) {
            segments.skills.push(section);
        }
    }
}

// ── Tests ──
