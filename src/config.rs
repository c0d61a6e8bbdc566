//! Configuration management and validation.
//!
//! Provides configuration structures for the legacy table parser, the
//! variable query and the census run (archive generations, worker count,
//! non-table file names), with JSON file loading and validation.

use crate::constants::{
    CMIP_COORDINATE_VARIABLES, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_ERAS, LIST_KEYWORDS,
    NON_TABLE_FILENAMES,
};
use crate::error::{CensusError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Known defects of the legacy CMOR 2 table reader that can be re-enabled
///
/// All flags are off by default. Turning them on reproduces the legacy
/// reader's output exactly, which is only useful when diffing against it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyQuirks {
    /// Join an existing token list with no separator before appending
    /// (`["x", "y"]` + `"z"` becomes `["xy", "z"]`)
    pub concat_list_without_separator: bool,

    /// Drop the last character of every line, even when it is not a newline
    pub truncate_final_character: bool,

    /// Remove every colon from header values (`'http://x'` becomes `http//x`)
    pub drop_header_colons: bool,
}

impl LegacyQuirks {
    /// Every quirk enabled
    pub fn all() -> Self {
        Self {
            concat_list_without_separator: true,
            truncate_final_character: true,
            drop_header_colons: true,
        }
    }
}

/// Settings for the legacy text table parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Entry attributes accumulated as token lists
    pub list_keywords: Vec<String>,

    /// Legacy defects to reproduce
    pub quirks: LegacyQuirks,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            list_keywords: LIST_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            quirks: LegacyQuirks::default(),
        }
    }
}

impl ParserConfig {
    pub fn is_list_keyword(&self, key: &str) -> bool {
        self.list_keywords.iter().any(|keyword| keyword == key)
    }

    pub fn with_list_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.list_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_quirks(mut self, quirks: LegacyQuirks) -> Self {
        self.quirks = quirks;
        self
    }
}

/// Settings for the variable count query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Entry names treated as coordinate variables and excluded from counts
    pub coordinate_variables: Vec<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            coordinate_variables: CMIP_COORDINATE_VARIABLES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl QueryConfig {
    pub fn is_coordinate(&self, name: &str) -> bool {
        self.coordinate_variables.iter().any(|coord| coord == name)
    }

    pub fn with_coordinate_variables<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.coordinate_variables = names.into_iter().map(Into::into).collect();
        self
    }
}

/// One archive generation to census
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraConfig {
    /// MIP identifier shown in the report (e.g. "CMIP5")
    pub mip_id: String,

    /// Glob matching the era's table files
    pub pattern: String,

    /// Entry type to count; defaults to the format's variable entry type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<String>,
}

impl EraConfig {
    pub fn new(mip_id: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            mip_id: mip_id.into(),
            pattern: pattern.into(),
            entry_type: None,
        }
    }

    pub fn with_entry_type(mut self, entry_type: impl Into<String>) -> Self {
        self.entry_type = Some(entry_type.into());
        self
    }

    /// Parse an `ID=GLOB` command-line spec
    pub fn parse_spec(spec: &str) -> Result<Self> {
        match spec.split_once('=') {
            Some((mip_id, pattern)) if !mip_id.trim().is_empty() && !pattern.is_empty() => {
                Ok(Self::new(mip_id.trim(), pattern))
            }
            _ => Err(CensusError::Configuration {
                message: format!("Era spec '{}' must have the form ID=GLOB", spec),
            }),
        }
    }
}

/// Global configuration for a census run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CensusConfig {
    /// Number of tables parsed concurrently
    pub workers: usize,

    /// File names skipped during table discovery
    pub non_table_files: Vec<String>,

    /// Prefix removed from paths in the report
    pub display_prefix: Option<String>,

    /// Archive generations, processed in order
    pub eras: Vec<EraConfig>,

    pub parser: ParserConfig,

    pub query: QueryConfig,
}

impl Default for CensusConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().max(1),
            non_table_files: NON_TABLE_FILENAMES.iter().map(|s| s.to_string()).collect(),
            display_prefix: None,
            eras: Vec::new(),
            parser: ParserConfig::default(),
            query: QueryConfig::default(),
        }
    }
}

impl CensusConfig {
    /// Default eras rooted at a directory holding the cmipN-cmor-tables checkouts
    pub fn default_eras(base_dir: &Path) -> Vec<EraConfig> {
        DEFAULT_ERAS
            .iter()
            .map(|(mip_id, pattern)| {
                EraConfig::new(*mip_id, base_dir.join(pattern).to_string_lossy())
            })
            .collect()
    }

    /// Location of the user config file
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| CensusError::Configuration {
            message: "Could not determine user config directory".to_string(),
        })?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from an explicit file, else the default file if present, else defaults
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_file {
            return Self::load_from_file(path);
        }

        match Self::default_config_path() {
            Ok(path) if path.exists() => Self::load_from_file(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(CensusError::Configuration {
                message: "workers must be at least 1".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for era in &self.eras {
            if era.mip_id.trim().is_empty() {
                return Err(CensusError::Configuration {
                    message: "era MIP id must not be empty".to_string(),
                });
            }
            if era.pattern.trim().is_empty() {
                return Err(CensusError::Configuration {
                    message: format!("era {} has an empty table pattern", era.mip_id),
                });
            }
            if !seen.insert(era.mip_id.as_str()) {
                return Err(CensusError::Configuration {
                    message: format!("era {} is listed more than once", era.mip_id),
                });
            }
        }

        Ok(())
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_era(mut self, era: EraConfig) -> Self {
        self.eras.push(era);
        self
    }

    pub fn with_display_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.display_prefix = Some(prefix.into());
        self
    }

    pub fn with_non_table_files<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.non_table_files = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_query(mut self, query: QueryConfig) -> Self {
        self.query = query;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_sets() {
        let config = CensusConfig::default();
        assert!(config.workers >= 1);
        assert!(config.non_table_files.iter().any(|f| f == "CMIP6_CV.json"));
        assert!(config.non_table_files.iter().any(|f| f == "md5s"));
        assert!(!config.non_table_files.iter().any(|f| f == "CMIP6_Amon.json"));
        assert!(config.parser.is_list_keyword("dimensions"));
        assert!(!config.parser.is_list_keyword("units"));
        assert!(config.query.is_coordinate("a_bnds"));
        assert!(!config.query.is_coordinate("ta"));
        assert_eq!(config.parser.quirks, LegacyQuirks::default());
    }

    #[test]
    fn test_era_spec_parsing() {
        let era = EraConfig::parse_spec("CMIP5=/data/cmip5-cmor-tables/Tables/*").unwrap();
        assert_eq!(era.mip_id, "CMIP5");
        assert_eq!(era.pattern, "/data/cmip5-cmor-tables/Tables/*");
        assert_eq!(era.entry_type, None);

        assert!(EraConfig::parse_spec("no-equals-sign").is_err());
        assert!(EraConfig::parse_spec("=Tables/*").is_err());
        assert!(EraConfig::parse_spec("CMIP3=").is_err());
    }

    #[test]
    fn test_default_eras() {
        let eras = CensusConfig::default_eras(Path::new("/git"));
        let ids: Vec<_> = eras.iter().map(|e| e.mip_id.as_str()).collect();
        assert_eq!(ids, vec!["CMIP3", "CMIP5", "CMIP6"]);
        assert_eq!(eras[1].pattern, "/git/cmip5-cmor-tables/Tables/*");
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        assert!(CensusConfig::default().with_workers(0).validate().is_err());

        let duplicate = CensusConfig::default()
            .with_era(EraConfig::new("CMIP5", "a/*"))
            .with_era(EraConfig::new("CMIP5", "b/*"));
        match duplicate.validate() {
            Err(CensusError::Configuration { message }) => {
                assert!(message.contains("CMIP5"));
            }
            other => panic!("Expected Configuration error, got {:?}", other),
        }

        let empty_pattern = CensusConfig::default().with_era(EraConfig::new("CMIP3", " "));
        assert!(empty_pattern.validate().is_err());

        let valid = CensusConfig::default().with_era(EraConfig::new("CMIP3", "Tables/*"));
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn test_load_partial_json_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "workers": 2,
                "display_prefix": "/Users/me/git/",
                "eras": [{{ "mip_id": "CMIP6", "pattern": "Tables/*.json" }}],
                "query": {{ "coordinate_variables": ["p0"] }},
                "parser": {{ "quirks": {{ "truncate_final_character": true }} }}
            }}"#
        )
        .unwrap();

        let config = CensusConfig::load_layered(Some(file.path())).unwrap();
        assert_eq!(config.workers, 2);
        assert_eq!(config.display_prefix.as_deref(), Some("/Users/me/git/"));
        assert_eq!(config.eras, vec![EraConfig::new("CMIP6", "Tables/*.json")]);
        assert!(config.query.is_coordinate("p0"));
        assert!(!config.query.is_coordinate("a_bnds"));
        // Unspecified sections keep their defaults
        assert!(config.parser.is_list_keyword("z_factors"));
        assert!(config.parser.quirks.truncate_final_character);
        assert!(!config.parser.quirks.drop_header_colons);
        assert!(config.non_table_files.iter().any(|f| f == "CMIP5_grids"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = CensusConfig::load_from_file(Path::new("/nonexistent/config.json"));
        assert!(matches!(result, Err(CensusError::Io(_))));
    }
}
