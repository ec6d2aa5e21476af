pub mod extract;
pub mod lines;
pub mod normalize;
pub mod sections;

use crate::record::Record;

/// One spreadsheet row as handed over by the tabular source: the raw
/// biography blob plus whatever the dedicated columns already supplied.
#[derive(Debug, Clone, Default)]
pub struct RowInput {
    pub name: Option<String>,
    pub store: Option<String>,
    pub experience: Option<String>,
    pub text: String,
}

/// Three-pass pipeline: raw blob → classified lines → segments → record.
/// Pure over its input; rows are independent.
pub fn clean_row(row: &RowInput) -> Record {
    let lines = lines::classify_lines(&row.text);
    let segments = sections::segment(&lines);
    if segments.discarded > 0 {
        tracing::debug!(count = segments.discarded, "ignored unstructured lines");
    }
    extract::extract_all(row, &segments, &row.text)
}

// ── Tests ──
