//! File-level processing tests: real files on disk, default config.

use std::fs;
use std::path::Path;

use courier_batch::{BatchError, CourierConfig, JsonRow, OutputFormat, RowStatus, ShipmentProcessor};
use courier_core::{CapReset, Money};

const REFERENCE_INPUT: &str = "\
2015-02-01 S MR
2015-02-02 S MR
2015-02-03 L LP
2015-02-05 S LP
2015-02-06 S MR
2015-02-06 L LP
2015-02-07 L MR
2015-02-08 M MR
2015-02-09 L LP
2015-02-10 L LP
2015-02-10 S MR
2015-02-10 S MR
2015-02-11 L LP
2015-02-12 M MR
2015-02-13 M LP
2015-02-15 S MR
2015-02-17 L LP
2015-02-17 S MR
2015-02-24 L LP
2015-02-29 CUSPS
2015-03-01 S MR
";

const REFERENCE_OUTPUT: &str = "\
2015-02-01 S MR 1.50 0.50
2015-02-02 S MR 1.50 0.50
2015-02-03 L LP 6.90 -
2015-02-05 S LP 1.50 -
2015-02-06 S MR 1.50 0.50
2015-02-06 L LP 6.90 -
2015-02-07 L MR 4.00 -
2015-02-08 M MR 3.00 -
2015-02-09 L LP 0.00 6.90
2015-02-10 L LP 6.90 -
2015-02-10 S MR 1.50 0.50
2015-02-10 S MR 1.50 0.50
2015-02-11 L LP 6.90 -
2015-02-12 M MR 3.00 -
2015-02-13 M LP 4.90 -
2015-02-15 S MR 1.50 0.50
2015-02-17 L LP 6.90 -
2015-02-17 S MR 1.90 0.10
2015-02-24 L LP 6.90 -
2015-02-29 CUSPS Ignored -
2015-03-01 S MR 2.00 -
";

fn processor(config: &CourierConfig) -> ShipmentProcessor {
    ShipmentProcessor::new(config.build_engine().unwrap(), config.io.format)
}

fn write_input(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("input.txt");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn reference_file_produces_reference_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), REFERENCE_INPUT);
    let output = dir.path().join("out").join("output.txt");

    let summary = processor(&CourierConfig::default())
        .process_file(&input, &output)
        .unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), REFERENCE_OUTPUT);
    assert_eq!(summary.rows, 21);
    assert_eq!(summary.discounted, 8);
    assert_eq!(summary.ignored, 1);
    assert_eq!(summary.priced, 12);
    assert_eq!(summary.total_discount, Money::from_cents(1000));
}

#[test]
fn calendar_month_reset_discounts_march() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), REFERENCE_INPUT);
    let output = dir.path().join("output.txt");

    let mut config = CourierConfig::default();
    config.pricing.cap_reset = CapReset::CalendarMonth;
    processor(&config).process_file(&input, &output).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written.lines().last(), Some("2015-03-01 S MR 1.50 0.50"));
}

#[test]
fn missing_input_is_reported_and_nothing_written() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("absent.txt");
    let output = dir.path().join("output.txt");

    let err = processor(&CourierConfig::default())
        .process_file(&input, &output)
        .unwrap_err();

    assert!(matches!(err, BatchError::InputNotFound { ref path } if path == &input));
    assert!(!output.exists());
}

#[test]
fn json_output_has_one_row_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), REFERENCE_INPUT);
    let output = dir.path().join("output.jsonl");

    let mut config = CourierConfig::default();
    config.io.format = OutputFormat::Json;
    processor(&config).process_file(&input, &output).unwrap();

    let rows: Vec<JsonRow> = fs::read_to_string(&output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(rows.len(), 21);
    assert_eq!(rows[8].line, "2015-02-09 L LP");
    assert_eq!(rows[8].price, Money::zero());
    assert_eq!(rows[8].discount, Money::from_cents(690));
    assert_eq!(rows[8].status, RowStatus::Discounted);
    assert_eq!(rows[19].status, RowStatus::Ignored);
    assert_eq!(rows[20].status, RowStatus::Priced);
}

#[test]
fn config_file_drives_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("courier.toml");
    fs::write(
        &config_path,
        r#"
        [pricing]
        monthly_cap = "0.75"

        [[providers]]
        id = "LP"
        small = "1.50"
        large = "6.90"

        [[providers]]
        id = "MR"
        small = "2.00"

        [logging]
        level = "warn"
        "#,
    )
    .unwrap();

    let config = CourierConfig::load(Some(config_path)).unwrap();
    assert_eq!(config.pricing.monthly_cap, Money::from_cents(75));

    let input = write_input(dir.path(), "2015-02-01 S MR\n2015-02-02 S MR\n2015-02-03 M MR\n");
    let output = dir.path().join("output.txt");
    processor(&config).process_file(&input, &output).unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "2015-02-01 S MR 1.50 0.50\n2015-02-02 S MR 1.75 0.25\n2015-02-03 M MR Ignored -\n"
    );
}

#[test]
fn explicit_missing_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = CourierConfig::load(Some(dir.path().join("nope.toml")));
    assert!(matches!(result, Err(BatchError::InvalidConfig(_))));
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("courier.toml");

    let mut config = CourierConfig::default();
    config.pricing.monthly_cap = Money::from_cents(2500);
    config.logging.file = Default::default();
    config.save(Some(path.clone())).unwrap();

    let loaded = CourierConfig::from_file(&path).unwrap();
    assert_eq!(loaded.pricing.monthly_cap, Money::from_cents(2500));
    assert_eq!(loaded.providers, config.providers);
    assert_eq!(loaded.logging.file_path(), None);
}

#[test]
fn undecodable_row_is_ignored_and_run_continues() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    fs::write(&input, b"2015-02-01 S MR\n2015-02-02 \xff\xfe MR\n2015-02-03 S MR\n").unwrap();
    let output = dir.path().join("output.txt");

    let summary = processor(&CourierConfig::default())
        .process_file(&input, &output)
        .unwrap();

    let written = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].ends_with(" MR Ignored -"));
    assert_eq!(lines[2], "2015-02-03 S MR 1.50 0.50");
    assert_eq!(summary.ignored, 1);
}
