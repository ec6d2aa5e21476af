mod cleaner;
mod record;
mod report;
mod table;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::warn;

use cleaner::RowInput;
use record::Record;

#[derive(Parser)]
#[command(name = "bio_cleaner", about = "Technician bio spreadsheet cleaner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a roster CSV and write the cleaned table + checklist
    Clean {
        /// Raw roster CSV exported from the source spreadsheet
        #[arg(short, long)]
        input: PathBuf,
        /// Cleaned CSV path (default: <input stem>_清洗版.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also dump the records as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Skip the verification checklist
        #[arg(long)]
        no_report: bool,
    },
    /// Dry run: extraction coverage per field, no files written
    Check {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Compact table of the extracted records
    Preview {
        #[arg(short, long)]
        input: PathBuf,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Clean {
            input,
            output,
            json,
            no_report,
        } => clean(&input, output, json, no_report),
        Commands::Check { input } => check(&input),
        Commands::Preview { input, limit } => preview_cmd(&input, limit),
    }
}

fn clean(
    input: &Path,
    output: Option<PathBuf>,
    json: Option<PathBuf>,
    no_report: bool,
) -> anyhow::Result<()> {
    let rows = table::read_rows(input)?;
    println!("Loaded {} rows from {}", rows.len(), input.display());

    let (records, skipped) = clean_rows(&rows);
    if skipped > 0 {
        warn!(skipped, "rows without a resolvable name were dropped");
    }

    let output = output.unwrap_or_else(|| sibling(input, "_清洗版.csv"));
    table::write_records(&output, &records)?;

    if !no_report {
        let report_path = sibling(input, "_数据核对单.txt");
        report::write_checklist(&report_path, &records)?;
        println!("Checklist: {}", report_path.display());
    }
    if let Some(json_path) = json {
        std::fs::write(&json_path, serde_json::to_string_pretty(&records)?)?;
        println!("JSON: {}", json_path.display());
    }

    let counts = Coverage::tally(&records);
    println!("Cleaned CSV: {}", output.display());
    counts.print(skipped);
    Ok(())
}

fn check(input: &Path) -> anyhow::Result<()> {
    let rows = table::read_rows(input)?;
    let (records, skipped) = clean_rows(&rows);

    Coverage::tally(&records).print(skipped);
    for (i, record) in records.iter().enumerate() {
        let missing = record.missing_fields();
        if !missing.is_empty() {
            println!("  row {} ({}): missing {}", i + 1, record.name, missing.join("、"));
        }
    }
    Ok(())
}

fn preview_cmd(input: &Path, limit: usize) -> anyhow::Result<()> {
    let rows = table::read_rows(input)?;
    let (records, _) = clean_rows(&rows);

    println!(
        "{:>3} | {:<8} | {:<14} | {:<8} | {:<4} | {}",
        "#", "姓名", "门店", "匠龄", "技能", "独白"
    );
    println!("{}", "-".repeat(72));
    for (i, r) in records.iter().take(limit).enumerate() {
        println!(
            "{:>3} | {:<8} | {:<14} | {:<8} | {:<4} | {}",
            i + 1,
            report::preview(&r.name, 8),
            report::preview(&r.store, 14),
            report::preview(&r.experience, 8),
            r.skill_count(),
            report::preview(&r.monologue, 18),
        );
    }
    println!("\n{} records", records.len());
    Ok(())
}

/// Data-parallel map over independent rows; records with no name after every
/// fallback are dropped (counted, not fatal).
fn clean_rows(rows: &[RowInput]) -> (Vec<Record>, usize) {
    let pb = ProgressBar::new(rows.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut records = Vec::with_capacity(rows.len());
    for chunk in rows.chunks(256) {
        records.extend(chunk.par_iter().map(cleaner::clean_row).collect::<Vec<_>>());
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    let total = records.len();
    let kept: Vec<Record> = records.into_iter().filter(Record::has_name).collect();
    let skipped = total - kept.len();
    (kept, skipped)
}

struct Coverage {
    total: usize,
    with_store: usize,
    with_experience: usize,
    with_monologue: usize,
    skill_sections: usize,
}

impl Coverage {
    fn tally(records: &[Record]) -> Self {
        Coverage {
            total: records.len(),
            with_store: records.iter().filter(|r| !r.store.is_empty()).count(),
            with_experience: records.iter().filter(|r| !r.experience.is_empty()).count(),
            with_monologue: records.iter().filter(|r| !r.monologue.is_empty()).count(),
            skill_sections: records.iter().map(Record::skill_count).sum(),
        }
    }

    fn print(&self, skipped: usize) {
        println!(
            "Saved {} records ({} with store, {} with experience, {} with monologue, {} skill sections), skipped {}.",
            self.total,
            self.with_store,
            self.with_experience,
            self.with_monologue,
            self.skill_sections,
            skipped,
        );
    }
}

fn sibling(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".into());
    input.with_file_name(format!("{}{}", stem, suffix))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_path_keeps_directory() {
        let p = sibling(Path::new("data/roster.csv"), "_清洗版.csv");
        assert_eq!(p, Path::new("data/roster_清洗版.csv"));
    }

    #[test]
    fn nameless_rows_skipped() {
        let rows = vec![
            RowInput {
                name: Some("张三".into()),
                text: "匠人独白：好".into(),
                ..RowInput::default()
            },
            RowInput {
                text: "没有姓名的一行".into(),
                ..RowInput::default()
            },
        ];
        let (records, skipped) = clean_rows(&rows);
        assert_eq!(records.len(), 1);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn roster_fixture_full_pipeline() {
        let rows = table::read_rows(Path::new("tests/fixtures/roster.csv")).unwrap();
        let (records, skipped) = clean_rows(&rows);
        assert_eq!(skipped, 0);
        assert_eq!(records.len(), 4);

        let zhang = &records[0];
        assert_eq!(zhang.name, "张伟");
        assert_eq!(zhang.store, "南京新街口店");
        assert_eq!(zhang.experience, "15年+");
        assert!(!zhang.monologue.is_empty());
        assert!(zhang.skill_count() >= 2);

        // Row 2 relies on the store forward-fill and the experience column
        let li = &records[1];
        assert_eq!(li.store, "南京新街口店");
        assert_eq!(li.experience, "近10年");

        for r in &records {
            assert_eq!(r.titles.len(), 3);
            for d in r.descriptions.iter().filter(|d| !d.is_empty()) {
                assert!(d.ends_with(['。', '！', '!', '？', '?', '.', '…']));
            }
        }
    }
}
