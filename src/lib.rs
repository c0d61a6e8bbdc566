//! CMOR Variable Counts Library
//!
//! A Rust library for counting the variables defined in CMOR metadata tables
//! across CMIP archive generations.
//!
//! This library provides tools for:
//! - Parsing legacy CMOR 2 text tables (CMIP3, CMIP5) into structured records
//! - Reading CMOR 3 JSON tables (CMIP6) into the same record shape
//! - Counting variable entries while excluding auxiliary coordinate variables
//! - Discovering table files and aggregating counts per archive generation
//!
//! ```rust
//! use cmor_var_counts::{count_variables_default, parse_legacy_table_default};
//!
//! let table = b"table_id: Table Amon\nvariable_entry: ta\nunits: K\nvariable_entry: p0\n";
//! let record = parse_legacy_table_default(table)?;
//! let counted = count_variables_default(&record, "variable")?;
//! assert_eq!(counted.names, vec!["ta"]);
//! # Ok::<(), cmor_var_counts::CensusError>(())
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod json_table;
pub mod models;
pub mod parser;
pub mod processor;
pub mod query;

pub use config::{CensusConfig, EraConfig, LegacyQuirks, ParserConfig, QueryConfig};
pub use error::{CensusError, Result};
pub use json_table::read_json_table;
pub use models::{AttributeValue, TableFormat, TableRecord, VariableCount};
pub use parser::{parse_legacy_table, parse_legacy_table_default};
pub use processor::CensusProcessor;
pub use query::{count_variables, count_variables_default};
