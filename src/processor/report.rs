//! Text and JSON rendering of census results
//!
//! The text layout follows the long-standing `getVarCounts` output so runs
//! can be compared line by line: one block per table, separated by `-----`,
//! and a `total <MIP> tables: N vars: M` line per era.

use crate::constants::REPORT_SEPARATOR;
use crate::error::Result;
use crate::models::{CensusReport, EraReport};
use colored::*;
use std::io::{self, Write};
use std::path::Path;

/// Path as shown in reports, with `prefix` removed when present
pub fn trim_display_path(path: &Path, prefix: Option<&str>) -> String {
    let display = path.to_string_lossy();
    match prefix {
        Some(prefix) if !prefix.is_empty() => display.replace(prefix, ""),
        _ => display.into_owned(),
    }
}

/// Variable names as a bracketed list of quoted strings, `['ta', 'ps']`
///
/// Names containing a single quote are wrapped in double quotes instead.
pub fn format_name_list(names: &[String]) -> String {
    let quoted: Vec<String> = names
        .iter()
        .map(|name| {
            if name.contains('\'') && !name.contains('"') {
                format!("\"{}\"", name)
            } else {
                format!("'{}'", name.replace('\'', "\\'"))
            }
        })
        .collect();
    format!("[{}]", quoted.join(", "))
}

enum Item<'a> {
    Skipped(&'a Path),
    Table(usize),
    Failure(usize),
}

/// Write the per-table blocks and totals of one era
pub fn write_era<W: Write>(out: &mut W, era: &EraReport) -> io::Result<()> {
    writeln!(out, "{} {}", "Processing:".bright_green().bold(), era.mip_id)?;

    let mut items: Vec<(&Path, Item)> = Vec::new();
    items.extend(era.skipped.iter().map(|p| (p.as_path(), Item::Skipped(p.as_path()))));
    items.extend(
        era.tables
            .iter()
            .enumerate()
            .map(|(i, t)| (t.path.as_path(), Item::Table(i))),
    );
    items.extend(
        era.failures
            .iter()
            .enumerate()
            .map(|(i, f)| (f.path.as_path(), Item::Failure(i))),
    );
    items.sort_by(|a, b| a.0.cmp(b.0));

    for (_, item) in items {
        match item {
            Item::Skipped(path) => {
                writeln!(out, "{} {}", "skipping:".bright_black(), path.display())?;
            }
            Item::Table(index) => {
                let table = &era.tables[index];
                writeln!(out, "{} {}", "table:".bright_cyan(), table.display_path)?;
                writeln!(
                    out,
                    "{} {}",
                    "len(varList):".bright_cyan(),
                    table.variable_count.to_string().bright_white().bold()
                )?;
                writeln!(
                    out,
                    "{} {}",
                    "varList:".bright_cyan(),
                    format_name_list(&table.variables)
                )?;
            }
            Item::Failure(index) => {
                let failure = &era.failures[index];
                writeln!(
                    out,
                    "{} {} - {}",
                    "failed:".bright_red(),
                    failure.path.display(),
                    failure.reason
                )?;
            }
        }
        writeln!(out, "{}", REPORT_SEPARATOR)?;
    }

    writeln!(
        out,
        "total {} tables: {} vars: {}",
        era.mip_id,
        era.table_count().to_string().bright_white().bold(),
        era.variable_count().to_string().bright_white().bold()
    )
}

/// Write every era, separated by a double separator line
pub fn write_census<W: Write>(out: &mut W, census: &CensusReport) -> io::Result<()> {
    for (i, era) in census.eras.iter().enumerate() {
        if i > 0 {
            writeln!(out, "{}", REPORT_SEPARATOR)?;
            writeln!(out, "{}", REPORT_SEPARATOR)?;
        }
        write_era(out, era)?;
    }
    Ok(())
}

/// Write the closing summary block
pub fn write_summary<W: Write>(out: &mut W, census: &CensusReport) -> io::Result<()> {
    writeln!(out, "\n{}", "Census Summary".bright_green().bold())?;
    writeln!(
        out,
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        census.processing_time_ms.to_string().bright_white()
    )?;
    for era in &census.eras {
        writeln!(
            out,
            "  {} {} tables, {} variables",
            format!("{}:", era.mip_id).bright_cyan(),
            era.table_count().to_string().bright_white(),
            era.variable_count().to_string().bright_white().bold()
        )?;
    }
    let failed = census.files_failed();
    if failed > 0 {
        writeln!(
            out,
            "  {} {}",
            "Tables failed:".bright_red(),
            failed.to_string().bright_red().bold()
        )?;
    }
    Ok(())
}

/// Render the census as pretty-printed JSON
pub fn render_json(census: &CensusReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(census)?)
}
