//! Command-line interface components.

use crate::config::{CensusConfig, EraConfig, LegacyQuirks};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cmor_var_counts")]
#[command(about = "Count variables defined in CMIP3, CMIP5 and CMIP6 CMOR tables")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Archive generations to census, as ID=GLOB (e.g. CMIP5='/git/cmip5-cmor-tables/Tables/*')
    #[arg(value_name = "ERA")]
    pub eras: Vec<String>,

    /// Directory holding cmip3/5/6-cmor-tables checkouts; adds the default eras
    #[arg(short, long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// JSON configuration file (defaults to the user config directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of tables parsed concurrently
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Entry type to count instead of each format's variable entry type
    #[arg(long, value_name = "TYPE")]
    pub entry_type: Option<String>,

    /// Prefix removed from table paths in the report
    #[arg(long, value_name = "PREFIX")]
    pub strip_prefix: Option<String>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Reproduce the legacy reader's known defects exactly
    #[arg(long)]
    pub legacy_quirks: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors and hide progress bars
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }

    /// Progress bars are shown for interactive text reports only
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Text
    }

    /// Layer command-line overrides onto a base configuration
    ///
    /// Eras given on the command line replace the configured ones; `--base-dir`
    /// adds the default eras ahead of any explicit ones.
    pub fn apply_to(&self, mut config: CensusConfig) -> Result<CensusConfig> {
        let mut eras = Vec::new();
        if let Some(base_dir) = &self.base_dir {
            eras.extend(CensusConfig::default_eras(base_dir));
        }
        for spec in &self.eras {
            eras.push(EraConfig::parse_spec(spec)?);
        }
        if !eras.is_empty() {
            config.eras = eras;
        }

        if let Some(entry_type) = &self.entry_type {
            for era in &mut config.eras {
                era.entry_type = Some(entry_type.clone());
            }
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(prefix) = &self.strip_prefix {
            config.display_prefix = Some(prefix.clone());
        }
        if self.legacy_quirks {
            config.parser.quirks = LegacyQuirks::all();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cmor_var_counts={}", log_level)));

    // Compact stderr output keeps stdout free for the report
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    tracing::debug!("Logging initialized at level: {}", log_level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CensusError;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("cmor_var_counts").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let parsed = args(&[]);
        assert!(parsed.eras.is_empty());
        assert_eq!(parsed.format, OutputFormat::Text);
        assert_eq!(parsed.get_log_level(), "warn");
        assert!(parsed.show_progress());
    }

    #[test]
    fn test_explicit_eras_replace_configured() {
        let parsed = args(&["CMIP3=/a/Tables/*", "CMIP6=/b/Tables/*", "-w", "3"]);
        let base = CensusConfig::default().with_era(EraConfig::new("OLD", "x/*"));
        let config = parsed.apply_to(base).unwrap();

        let ids: Vec<_> = config.eras.iter().map(|e| e.mip_id.as_str()).collect();
        assert_eq!(ids, vec!["CMIP3", "CMIP6"]);
        assert_eq!(config.workers, 3);
    }

    #[test]
    fn test_base_dir_and_overrides() {
        let parsed = args(&[
            "--base-dir",
            "/git",
            "--entry-type",
            "axis",
            "--strip-prefix",
            "/git/",
            "--legacy-quirks",
            "--format",
            "json",
        ]);
        let config = parsed.apply_to(CensusConfig::default()).unwrap();

        assert_eq!(config.eras.len(), 3);
        assert!(config.eras.iter().all(|e| e.entry_type.as_deref() == Some("axis")));
        assert_eq!(config.display_prefix.as_deref(), Some("/git/"));
        assert_eq!(config.parser.quirks, LegacyQuirks::all());
        assert!(!parsed.show_progress());
    }

    #[test]
    fn test_bad_era_spec() {
        let result = args(&["CMIP5"]).apply_to(CensusConfig::default());
        assert!(matches!(result, Err(CensusError::Configuration { .. })));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Args::try_parse_from(["cmor_var_counts", "-q", "-v"]);
        assert!(result.is_err());
    }
}
