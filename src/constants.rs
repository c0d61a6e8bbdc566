//! Application constants for the CMOR table census
//!
//! This module contains the fixed keyword sets, markers and default archive
//! generations shared by the parsers, the variable query and the CLI.

// =============================================================================
// Legacy Table Syntax
// =============================================================================

/// Substring that marks an entry header line (`variable_entry: ta`)
pub const ENTRY_MARKER: &str = "_entry";

/// Separator between the entry type and the entry name
pub const ENTRY_SEPARATOR: &str = "_entry:";

/// Starts a comment line, or an inline comment after a value
pub const COMMENT_MARKER: char = '!';

/// Header values starting with this character have their outer quotes removed
pub const QUOTE_MARKER: char = '\'';

/// Separates attribute keys from values
pub const KEY_VALUE_SEPARATOR: char = ':';

// =============================================================================
// Table Record Keys
// =============================================================================

/// General attribute holding the MD5 hex digest of the raw table bytes
pub const ACTUAL_MD5_KEY: &str = "actual_md5";

/// Name of the general attribute block in the flattened legacy namespace
pub const GENERAL_KEY: &str = "general";

/// Entry type holding variable definitions in legacy text tables
pub const LEGACY_VARIABLE_ENTRY: &str = "variable";

/// Entry type holding variable definitions in JSON tables
pub const JSON_VARIABLE_ENTRY: &str = "variable_entry";

/// Top-level JSON object whose fields become general attributes
pub const JSON_HEADER_KEY: &str = "Header";

// =============================================================================
// Keyword and Exclusion Sets
// =============================================================================

/// Entry attributes whose values accumulate as whitespace-delimited token lists
pub const LIST_KEYWORDS: &[&str] = &[
    "requested",
    "bounds_requested",
    "z_factors",
    "z_bounds_requested",
    "dimensions",
    "required",
    "ignored",
    "optional",
];

/// Auxiliary coordinate definitions that are not counted as variables
///
/// These are the hybrid and sigma vertical coordinate terms that CMIP tables
/// declare as variable entries alongside the real output variables.
pub const CMIP_COORDINATE_VARIABLES: &[&str] = &[
    "a",
    "a_bnds",
    "ap",
    "ap_bnds",
    "az",
    "az_bnds",
    "b",
    "b_bnds",
    "bz",
    "bz_bnds",
    "p0",
    "ptop",
    "sigma",
    "sigma_bnds",
];

/// Files found in table directories that are not variable tables
pub const NON_TABLE_FILENAMES: &[&str] = &[
    "CMIP5_grids",              // CMIP5
    "CMIP6_coordinate.json",    // CMIP6
    "CMIP6_formula_terms.json", // CMIP6
    "CMIP6_input_example.json", // CMIP6
    "CMIP6_CV.json",            // CMIP6
    "md5s",                     // CMIP5
];

// =============================================================================
// Archive Generations
// =============================================================================

/// Default archive generations: (MIP id, table glob relative to the base directory)
///
/// The layout matches checkouts of the PCMDI `cmipN-cmor-tables` repositories
/// side by side in one directory.
pub const DEFAULT_ERAS: &[(&str, &str)] = &[
    ("CMIP3", "cmip3-cmor-tables/Tables/*"),
    ("CMIP5", "cmip5-cmor-tables/Tables/*"),
    ("CMIP6", "cmip6-cmor-tables/Tables/*"),
];

/// Directory name used under the user config directory
pub const CONFIG_DIR_NAME: &str = "cmor-var-counts";

/// Config file name inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Separator printed between tables and eras in the text report
pub const REPORT_SEPARATOR: &str = "-----";
