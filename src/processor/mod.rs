//! Census processing engine.
//!
//! Orchestrates the table census for each archive generation: table
//! discovery, concurrent reading and parsing on the blocking pool, the
//! variable query and per-era aggregation.

pub mod discovery;
pub mod report;

#[cfg(test)]
pub mod tests;

use self::discovery::TableDiscovery;
use self::report::trim_display_path;

use crate::config::{CensusConfig, EraConfig, ParserConfig};
use crate::error::{CensusError, Result};
use crate::json_table::read_json_table;
use crate::models::{CensusReport, EraReport, TableFailure, TableFormat, TableRecord, TableReport};
use crate::parser::parse_legacy_table;
use crate::query::count_variables;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::task;
use tracing::{debug, info, warn};

/// Parse raw table bytes in the given format
pub fn load_table(raw: &[u8], format: TableFormat, parser: &ParserConfig) -> Result<TableRecord> {
    match format {
        TableFormat::Legacy => parse_legacy_table(raw, parser),
        TableFormat::Json => read_json_table(raw),
    }
}

/// Read, parse and count the variables of one table file
///
/// `entry_type` overrides the format's variable entry type. Errors carry the
/// table path.
pub fn process_table(
    path: &Path,
    entry_type: Option<&str>,
    config: &CensusConfig,
) -> Result<TableReport> {
    let raw = std::fs::read(path).map_err(|e| CensusError::from(e).for_table(path))?;
    let format = TableFormat::from_path(path);
    let record = load_table(&raw, format, &config.parser).map_err(|e| e.for_table(path))?;

    let entry_type = entry_type.unwrap_or(format.variable_entry_type());
    let counted =
        count_variables(&record, entry_type, &config.query).map_err(|e| e.for_table(path))?;

    Ok(TableReport {
        path: path.to_path_buf(),
        display_path: trim_display_path(path, config.display_prefix.as_deref()),
        format,
        md5: record.actual_md5().unwrap_or_default().to_string(),
        variable_count: counted.count,
        variables: counted.names,
    })
}

/// Main processor for CMOR table censuses
#[derive(Debug)]
pub struct CensusProcessor {
    config: Arc<CensusConfig>,
    show_progress: bool,
}

impl CensusProcessor {
    /// Create a processor from a validated configuration
    pub fn new(config: CensusConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            show_progress: false,
        })
    }

    /// Show a progress bar while tables are parsed
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &CensusConfig {
        &self.config
    }

    /// Process every configured era in order
    pub async fn process_all(&self) -> Result<CensusReport> {
        let start_time = Instant::now();
        let mut eras = Vec::with_capacity(self.config.eras.len());

        for era in &self.config.eras {
            eras.push(self.process_era(era).await?);
        }

        Ok(CensusReport {
            generated_at: Utc::now(),
            eras,
            processing_time_ms: start_time.elapsed().as_millis(),
        })
    }

    /// Census one era
    ///
    /// Tables that fail to read, decode or query are recorded as failures and
    /// do not stop the era. Only an invalid or unreadable pattern is an error.
    pub async fn process_era(&self, era: &EraConfig) -> Result<EraReport> {
        info!("Processing: {}", era.mip_id);

        let discovered =
            TableDiscovery::new(era.pattern.as_str(), &self.config.non_table_files).discover()?;
        for path in &discovered.skipped {
            debug!("skipping: {}", path.display());
        }

        let mut report = EraReport::new(era.mip_id.as_str(), era.pattern.as_str());
        report.skipped = discovered.skipped;

        if discovered.tables.is_empty() {
            warn!("No tables matched {} for {}", era.pattern, era.mip_id);
            return Ok(report);
        }

        let pb = self.progress_bar(discovered.tables.len(), &era.mip_id);
        let workers = self.config.workers.min(discovered.tables.len()).max(1);

        let outcomes = stream::iter(discovered.tables)
            .map(|path| {
                let config = Arc::clone(&self.config);
                let entry_type = era.entry_type.clone();
                let pb = pb.clone();
                async move {
                    let task_path = path.clone();
                    let outcome = task::spawn_blocking(move || {
                        process_table(&task_path, entry_type.as_deref(), &config)
                    })
                    .await;
                    pb.inc(1);
                    (path, outcome)
                }
            })
            .buffered(workers)
            .collect::<Vec<_>>()
            .await;

        pb.finish_with_message(format!("{} tables parsed", era.mip_id));

        for (path, outcome) in outcomes {
            match outcome {
                Ok(Ok(table)) => {
                    debug!(
                        "{}: {} variables",
                        table.display_path, table.variable_count
                    );
                    report.tables.push(table);
                }
                Ok(Err(error)) => {
                    warn!("{}", error);
                    report.failures.push(failure(path, &error));
                }
                Err(join_error) => {
                    warn!("Table task failed for {}: {}", path.display(), join_error);
                    report.failures.push(TableFailure {
                        path,
                        reason: join_error.to_string(),
                    });
                }
            }
        }

        info!(
            "total {} tables: {} vars: {}",
            report.mip_id,
            report.table_count(),
            report.variable_count()
        );

        Ok(report)
    }

    fn progress_bar(&self, len: usize, mip_id: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message(format!("Parsing {} tables", mip_id));
        pb
    }
}

/// Failure record for a table, reporting the underlying cause
fn failure(path: PathBuf, error: &CensusError) -> TableFailure {
    let reason = match error {
        CensusError::TableFailed { source, .. } => source.to_string(),
        other => other.to_string(),
    };
    TableFailure { path, reason }
}
