use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use thiserror::Error;
use tracing::{info, warn};

use crate::cleaner::RowInput;
use crate::record::{Record, OUTPUT_HEADERS};

/// How many leading physical rows are scanned for the header / for column
/// keywords before falling back.
const SCAN_ROWS: usize = 10;
/// Header row position in the layout the source spreadsheets ship with, used
/// when no header row is recognized.
const DEFAULT_HEADER_ROW: usize = 2;

// Positional fallbacks, matching the source layout.
const NAME_COL_FALLBACK: usize = 1;
const STORE_COL_FALLBACK: usize = 4;
const CONTENT_COL_FALLBACK: usize = 6;

const HEADER_KEYWORDS: [&str; 2] = ["姓名", "门店"];
const CONTENT_VALUE_KEYWORDS: [&str; 4] = ["匠人独白", "维修技师", "深耕", "服务至上"];
const STORE_VALUE_KEYWORDS: [&str; 3] = ["店", "服务点", "中心"];
const EXPERIENCE_VALUE_KEYWORDS: [&str; 3] = ["匠龄", "年", "从业"];

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("no biography column found (tried headers, cell keywords, and column {CONTENT_COL_FALLBACK})")]
    NoContentColumn,
    #[error("no rows below the header")]
    Empty,
}

/// Resolved positions of the columns the extractor consumes. Resolution is
/// three-tier: header substring, then cell-value keyword scan, then fixed
/// position — a known fragility on unseen layouts, preserved as-is.
#[derive(Debug)]
pub struct ColumnMap {
    pub name: Option<usize>,
    pub store: Option<usize>,
    pub content: Option<usize>,
    pub experience: Option<usize>,
}

pub fn read_rows(path: &Path) -> Result<Vec<RowInput>, TableError> {
    let file = File::open(path).map_err(|source| TableError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut rows: Vec<StringRecord> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| TableError::Csv {
            path: path.display().to_string(),
            source,
        })?;
        rows.push(record);
    }

    let header_idx = detect_header_row(&rows);
    if header_idx >= rows.len() {
        return Err(TableError::Empty);
    }
    let (header, data) = (&rows[header_idx], &rows[header_idx + 1..]);
    let columns = resolve_columns(header, data)?;
    info!(
        header_row = header_idx,
        ?columns,
        "resolved spreadsheet layout"
    );

    Ok(to_row_inputs(data, &columns))
}

/// First of the leading rows that mentions both header keywords; the source
/// files bury the header under title/banner rows.
fn detect_header_row(rows: &[StringRecord]) -> usize {
    rows.iter()
        .take(SCAN_ROWS)
        .position(|row| {
            let joined = row.iter().collect::<Vec<_>>().join(" ");
            HEADER_KEYWORDS.iter().all(|k| joined.contains(k))
        })
        .unwrap_or_else(|| {
            warn!(
                "no header row with 姓名/门店 in the first {} rows, assuming row {}",
                SCAN_ROWS, DEFAULT_HEADER_ROW
            );
            DEFAULT_HEADER_ROW
        })
}

fn resolve_columns(
    header: &StringRecord,
    data: &[StringRecord],
) -> Result<ColumnMap, TableError> {
    let mut columns = ColumnMap {
        name: find_header(header, &["姓名"]),
        store: find_header(header, &["门店"]),
        content: find_header(header, &["内容", "文案", "介绍"]),
        experience: find_header(header, &["匠龄"]),
    };

    // Tier 2: headers lie often enough that the content column is located by
    // what its cells actually say.
    if columns.content.is_none() {
        columns.content = find_by_values(data, header.len(), &CONTENT_VALUE_KEYWORDS);
    }
    if columns.store.is_none() {
        columns.store = find_by_values(data, header.len(), &STORE_VALUE_KEYWORDS);
    }
    if columns.experience.is_none() {
        columns.experience = find_by_values(data, header.len(), &EXPERIENCE_VALUE_KEYWORDS);
    }

    // Tier 3: fixed positions from the known layout.
    let width = header.len();
    if columns.name.is_none() && width > NAME_COL_FALLBACK {
        columns.name = Some(NAME_COL_FALLBACK);
    }
    if columns.store.is_none() && width > STORE_COL_FALLBACK {
        columns.store = Some(STORE_COL_FALLBACK);
    }
    if columns.content.is_none() && width > CONTENT_COL_FALLBACK {
        columns.content = Some(CONTENT_COL_FALLBACK);
    }

    if columns.content.is_none() {
        return Err(TableError::NoContentColumn);
    }
    Ok(columns)
}

fn find_header(header: &StringRecord, keywords: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|cell| keywords.iter().any(|k| cell.contains(k)))
}

/// First column whose leading non-empty cells mention one of the keywords.
fn find_by_values(data: &[StringRecord], width: usize, keywords: &[&str]) -> Option<usize> {
    (0..width).find(|&col| {
        data.iter()
            .filter_map(|row| row.get(col))
            .filter(|cell| !cell.trim().is_empty())
            .take(SCAN_ROWS)
            .any(|cell| keywords.iter().any(|k| cell.contains(k)))
    })
}

fn to_row_inputs(data: &[StringRecord], columns: &ColumnMap) -> Vec<RowInput> {
    let cell = |row: &StringRecord, col: Option<usize>| -> Option<String> {
        col.and_then(|c| row.get(c))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let mut rows = Vec::with_capacity(data.len());
    let mut last_store: Option<String> = None;
    for row in data {
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        // Merged store cells arrive empty below the first row; forward-fill.
        let store = cell(row, columns.store).or_else(|| last_store.clone());
        last_store.clone_from(&store);

        rows.push(RowInput {
            name: cell(row, columns.name),
            store,
            experience: cell(row, columns.experience),
            text: cell(row, columns.content).unwrap_or_default(),
        });
    }
    rows
}

pub fn write_records(path: &Path, records: &[Record]) -> Result<(), TableError> {
    let csv_err = |source: csv::Error| TableError::Csv {
        path: path.display().to_string(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(&csv_err)?;
    writer.write_record(OUTPUT_HEADERS).map_err(&csv_err)?;
    for record in records {
        writer.write_record(record.to_row()).map_err(&csv_err)?;
    }
    writer.flush().map_err(|source| TableError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(raw: &[&[&str]]) -> Vec<StringRecord> {
        raw.iter().map(|r| StringRecord::from(r.to_vec())).collect()
    }

    #[test]
    fn header_detected_behind_banner_rows() {
        let rows = rows(&[
            &["维修师资料汇总", "", ""],
            &["", "", ""],
            &["序号", "姓名", "门店"],
        ]);
        assert_eq!(detect_header_row(&rows), 2);
    }

    #[test]
    fn header_fallback_when_unrecognized() {
        let rows = rows(&[&["a"], &["b"], &["c"], &["d"]]);
        assert_eq!(detect_header_row(&rows), DEFAULT_HEADER_ROW);
    }

    #[test]
    fn columns_resolved_by_header_substring() {
        let header = StringRecord::from(vec!["序号", "姓名", "门店名称", "介绍文案", "匠龄"]);
        let columns = resolve_columns(&header, &[]).unwrap();
        assert_eq!(columns.name, Some(1));
        assert_eq!(columns.store, Some(2));
        assert_eq!(columns.content, Some(3));
        assert_eq!(columns.experience, Some(4));
    }

    #[test]
    fn content_column_found_by_cell_values() {
        let header = StringRecord::from(vec!["A", "B", "C"]);
        let data = rows(&[&["1", "张三", "维修技师：张三 匠龄：10年"]]);
        let columns = resolve_columns(&header, &data).unwrap();
        assert_eq!(columns.content, Some(2));
    }

    #[test]
    fn positional_fallback_used_last() {
        let header = StringRecord::from(vec!["a", "b", "c", "d", "e", "f", "g"]);
        let columns = resolve_columns(&header, &[]).unwrap();
        assert_eq!(columns.name, Some(NAME_COL_FALLBACK));
        assert_eq!(columns.store, Some(STORE_COL_FALLBACK));
        assert_eq!(columns.content, Some(CONTENT_COL_FALLBACK));
    }

    #[test]
    fn missing_content_column_is_an_error() {
        let header = StringRecord::from(vec!["a", "b"]);
        assert!(matches!(
            resolve_columns(&header, &[]),
            Err(TableError::NoContentColumn)
        ));
    }

    #[test]
    fn store_forward_filled() {
        let columns = ColumnMap {
            name: Some(0),
            store: Some(1),
            content: Some(2),
            experience: None,
        };
        let data = rows(&[
            &["张三", "新街口店", "匠人独白：一"],
            &["李四", "", "匠人独白：二"],
            &["王五", "夫子庙店", "匠人独白：三"],
        ]);
        let inputs = to_row_inputs(&data, &columns);
        assert_eq!(inputs[1].store.as_deref(), Some("新街口店"));
        assert_eq!(inputs[2].store.as_deref(), Some("夫子庙店"));
    }

    #[test]
    fn blank_rows_skipped() {
        let columns = ColumnMap {
            name: Some(0),
            store: None,
            content: Some(1),
            experience: None,
        };
        let data = rows(&[&["张三", "文本"], &["", ""], &["李四", "文本"]]);
        assert_eq!(to_row_inputs(&data, &columns).len(), 2);
    }

    #[test]
    fn roster_fixture_end_to_end() {
        let inputs = read_rows(Path::new("tests/fixtures/roster.csv")).unwrap();
        assert_eq!(inputs.len(), 4);
        // Header sits behind two banner rows; store column is merged/ffilled
        assert_eq!(inputs[0].name.as_deref(), Some("张伟"));
        assert_eq!(inputs[1].store.as_deref(), inputs[0].store.as_deref());
        assert!(inputs[0].text.contains("匠人独白"));
    }
}
