//! Integration tests for the processor module
//!
//! Tests the complete census pipeline using temporary table directories laid
//! out like the cmipN-cmor-tables repositories.

pub mod error_handling;

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const CMIP5_AMON: &str = "\
table_id: Table Amon
modeling_realm: atmos
frequency: mon

!============
axis_entry: plev17
!============
standard_name:    air_pressure
units:            Pa

!============
variable_entry:    ta
!============
units:             K
dimensions:        longitude latitude plev17 time

!============
variable_entry:    a_bnds
!============
dimensions:        alevel

!============
variable_entry:    ps
!============
units:             Pa
dimensions:        longitude latitude time
";

pub const CMIP5_FX: &str = "\
table_id: Table fx
variable_entry: orog
units: m
variable_entry: sftlf
units: %
";

pub const CMIP6_AMON: &str = r#"{
    "Header": { "table_id": "Table Amon", "realm": "atmos" },
    "variable_entry": {
        "ta": { "units": "K" },
        "ap": { "units": "Pa" },
        "pr": { "units": "kg m-2 s-1" }
    }
}"#;

/// Helper to create `<root>/<repo>/Tables` and write the given files into it
pub fn create_tables(temp_dir: &TempDir, repo: &str, files: &[(&str, &[u8])]) -> PathBuf {
    let tables = temp_dir.path().join(repo).join("Tables");
    fs::create_dir_all(&tables).unwrap();
    for (name, content) in files {
        fs::write(tables.join(name), content).unwrap();
    }
    tables
}

/// Glob pattern matching every file in `dir`
pub fn all_files(dir: &Path) -> String {
    dir.join("*").to_string_lossy().to_string()
}
