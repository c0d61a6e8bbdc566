//! Error handling tests for the census pipeline

use super::*;
use crate::config::{CensusConfig, EraConfig};
use crate::error::CensusError;
use crate::processor::{CensusProcessor, process_table};

#[tokio::test]
async fn test_undecodable_table_is_reported_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let tables = create_tables(
        &temp_dir,
        "cmip3-cmor-tables",
        &[
            ("CMIP3_A1", CMIP5_FX.as_bytes()),
            ("CMIP3_bad", [b'u', b':', 0xff, 0xfe, b'\n'].as_slice()),
        ],
    );

    let config = CensusConfig::default().with_era(EraConfig::new("CMIP3", all_files(&tables)));
    let census = CensusProcessor::new(config)
        .unwrap()
        .process_all()
        .await
        .unwrap();

    let era = &census.eras[0];
    assert_eq!(era.tables.len(), 1);
    assert_eq!(era.failures.len(), 1);
    assert_eq!(era.table_count(), 2);
    assert_eq!(era.variable_count(), 2);
    assert!(era.failures[0].path.ends_with("CMIP3_bad"));
    assert!(era.failures[0].reason.contains("UTF-8"));
}

#[tokio::test]
async fn test_missing_entry_type_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let tables = create_tables(
        &temp_dir,
        "cmip5-cmor-tables",
        &[("CMIP5_grids_like", b"table_id: Table grids\naxis_entry: x\nunits: m\n".as_slice())],
    );

    let config = CensusConfig::default().with_era(EraConfig::new("CMIP5", all_files(&tables)));
    let census = CensusProcessor::new(config)
        .unwrap()
        .process_all()
        .await
        .unwrap();

    let era = &census.eras[0];
    assert!(era.tables.is_empty());
    assert_eq!(era.failures.len(), 1);
    assert!(era.failures[0].reason.contains("'variable' not found"));
    assert_eq!(era.variable_count(), 0);
}

#[test]
fn test_process_table_errors_carry_path() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("CMIP5_none");

    match process_table(&missing, None, &CensusConfig::default()) {
        Err(CensusError::TableFailed { path, source }) => {
            assert_eq!(path, missing);
            assert!(matches!(*source, CensusError::Io(_)));
        }
        other => panic!("Expected TableFailed error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_no_matching_tables() {
    let temp_dir = TempDir::new().unwrap();
    let pattern = temp_dir.path().join("nothing-here").join("*");

    let config = CensusConfig::default()
        .with_era(EraConfig::new("CMIP3", pattern.to_string_lossy()));
    let census = CensusProcessor::new(config)
        .unwrap()
        .process_all()
        .await
        .unwrap();

    assert_eq!(census.eras[0].table_count(), 0);
    assert_eq!(census.eras[0].variable_count(), 0);
}

#[tokio::test]
async fn test_invalid_pattern_fails_era() {
    let config = CensusConfig::default().with_era(EraConfig::new("CMIP3", "Tables/[*"));
    let result = CensusProcessor::new(config).unwrap().process_all().await;
    assert!(matches!(result, Err(CensusError::InvalidPattern(_))));
}

#[test]
fn test_invalid_config_is_rejected() {
    let result = CensusProcessor::new(CensusConfig::default().with_workers(0));
    assert!(matches!(result, Err(CensusError::Configuration { .. })));
}
