use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use chrono::Local;

use crate::record::Record;

/// Per-row checklist the operator eyeballs against the source spreadsheet
/// before any cards are generated.
pub fn write_checklist(path: &Path, records: &[Record]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(out, "=== 数据核对报告 ===")?;
    writeln!(out, "生成时间: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "请务必检查以下信息是否与原始表格对应。\n")?;

    for (i, record) in records.iter().enumerate() {
        writeln!(out, "[{}] {} @ {}", i + 1, record.name, record.store)?;
        writeln!(out, "     独白: {}", record.monologue)?;
        writeln!(
            out,
            "     T1: {} | D1: {}",
            record.titles[0],
            preview(&record.descriptions[0], 15)
        )?;
        let missing = record.missing_fields();
        if !missing.is_empty() {
            writeln!(out, "     缺失: {}", missing.join("、"))?;
        }
        writeln!(out, "{}", "-".repeat(50))?;
    }

    out.flush()?;
    Ok(())
}

pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_counts_chars_not_bytes() {
        assert_eq!(preview("短", 15), "短");
        let long = "很".repeat(20);
        assert_eq!(preview(&long, 15), format!("{}...", "很".repeat(15)));
    }
}
