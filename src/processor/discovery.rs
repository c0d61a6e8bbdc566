//! Table file discovery for one archive generation
//!
//! Expands the era's glob pattern and separates genuine table files from
//! the grid, controlled-vocabulary and checksum files that share the
//! `Tables/` directory.

use crate::error::Result;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Files matched by an era pattern, in path order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiscoveredTables {
    pub tables: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Table discovery for a glob pattern
#[derive(Debug)]
pub struct TableDiscovery {
    pattern: String,
    non_table_files: Vec<String>,
}

impl TableDiscovery {
    pub fn new(pattern: impl Into<String>, non_table_files: &[String]) -> Self {
        Self {
            pattern: pattern.into(),
            non_table_files: non_table_files.to_vec(),
        }
    }

    /// Expand the pattern into table files and skipped non-table files
    ///
    /// Only an invalid pattern is an error. Matches that cannot be read are
    /// logged and left out.
    pub fn discover(&self) -> Result<DiscoveredTables> {
        debug!("Searching for tables matching: {}", self.pattern);

        let discovered = self.partition(glob::glob(&self.pattern)?);

        debug!(
            "Found {} tables, skipped {} non-table files",
            discovered.tables.len(),
            discovered.skipped.len()
        );

        Ok(discovered)
    }

    /// Split pattern matches into tables and non-table files
    ///
    /// Directories and unreadable matches are ignored.
    fn partition<I, E>(&self, matches: I) -> DiscoveredTables
    where
        I: IntoIterator<Item = std::result::Result<PathBuf, E>>,
        E: Display,
    {
        let mut discovered = DiscoveredTables::default();
        for entry in matches {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!("Skipping unreadable match for {}: {}", self.pattern, e);
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }

            if self.is_non_table(&path) {
                discovered.skipped.push(path);
            } else {
                discovered.tables.push(path);
            }
        }

        discovered.tables.sort();
        discovered.skipped.sort();
        discovered
    }

    fn is_non_table(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.non_table_files.iter().any(|skip| skip == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CensusConfig;
    use crate::error::CensusError;
    use std::fs;
    use tempfile::TempDir;

    /// Helper to create a CMIP6-like Tables directory
    fn create_tables_dir(temp_dir: &TempDir) -> PathBuf {
        let tables = temp_dir.path().join("cmip6-cmor-tables").join("Tables");
        fs::create_dir_all(&tables).unwrap();

        for name in [
            "CMIP6_Omon.json",
            "CMIP6_Amon.json",
            "CMIP6_CV.json",
            "CMIP6_coordinate.json",
        ] {
            fs::write(tables.join(name), "{}").unwrap();
        }
        fs::create_dir_all(tables.join("archive")).unwrap();

        tables
    }

    #[test]
    fn test_discover_splits_tables_and_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let tables = create_tables_dir(&temp_dir);
        let config = CensusConfig::default();

        let pattern = tables.join("*").to_string_lossy().to_string();
        let discovered = TableDiscovery::new(pattern, &config.non_table_files)
            .discover()
            .unwrap();

        let names = |paths: &[PathBuf]| -> Vec<String> {
            paths
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
                .collect()
        };

        assert_eq!(
            names(&discovered.tables),
            vec!["CMIP6_Amon.json", "CMIP6_Omon.json"]
        );
        assert_eq!(
            names(&discovered.skipped),
            vec!["CMIP6_CV.json", "CMIP6_coordinate.json"]
        );
    }

    #[test]
    fn test_discover_no_matches() {
        let temp_dir = TempDir::new().unwrap();
        let pattern = temp_dir.path().join("missing").join("*");
        let discovered = TableDiscovery::new(pattern.to_string_lossy(), &[])
            .discover()
            .unwrap();
        assert_eq!(discovered, DiscoveredTables::default());
    }

    #[test]
    fn test_unreadable_match_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let tables = create_tables_dir(&temp_dir);
        let config = CensusConfig::default();
        let discovery = TableDiscovery::new("Tables/*", &config.non_table_files);

        let matches = vec![
            Ok(tables.join("CMIP6_Omon.json")),
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied",
            )),
            Ok(tables.join("CMIP6_CV.json")),
            Ok(tables.join("CMIP6_Amon.json")),
        ];
        let discovered = discovery.partition(matches);

        assert_eq!(
            discovered.tables,
            vec![tables.join("CMIP6_Amon.json"), tables.join("CMIP6_Omon.json")]
        );
        assert_eq!(discovered.skipped, vec![tables.join("CMIP6_CV.json")]);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = TableDiscovery::new("Tables/[", &[]).discover();
        assert!(matches!(result, Err(CensusError::InvalidPattern(_))));
    }
}
