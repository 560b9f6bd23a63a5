//! File loading integration tests
//!
//! Tests for combining uploads into one series, including files that fail.

use crate::common::synthetic::{constant_file, CsvBuilder};
use crate::common::at;
use anodelog::error::PipelineError;
use anodelog::loader::{parse_batch, UploadedFile};
use anodelog::state::{build_series, SeriesStore};
use std::sync::Arc;

// ============================================
// Combining Files
// ============================================

#[test]
fn test_two_files_with_disjoint_columns() {
    let first = CsvBuilder::new(&["R6"])
        .row("00:00:00", &[Some(4.0)])
        .upload("r6.csv");
    let second = CsvBuilder::new(&["R8"])
        .row("00:00:05", &[Some(6.0)])
        .upload("r8.csv");

    let report = build_series(&[first, second]).unwrap();
    let series = &report.series;

    assert_eq!(series.timestamps(), &[at(0, 0, 0), at(0, 0, 5)]);
    assert_eq!(series.column("R6").unwrap().values, vec![Some(4.0), None]);
    assert_eq!(series.column("R8").unwrap().values, vec![None, Some(6.0)]);
    assert_eq!(
        series
            .column("Total Right Bare Anode (R6+R8)")
            .unwrap()
            .values,
        vec![Some(4.0), Some(6.0)]
    );
}

#[test]
fn test_rows_are_sorted_across_files() {
    let late = CsvBuilder::new(&["B7"])
        .row("00:00:10", &[Some(3.0)])
        .row("00:00:20", &[Some(5.0)])
        .upload("late.csv");
    let early = CsvBuilder::new(&["B7"])
        .row("00:00:00", &[Some(1.0)])
        .row("00:00:15", &[Some(4.0)])
        .upload("early.csv");

    let report = build_series(&[late, early]).unwrap();
    assert_eq!(
        report.series.column("B7").unwrap().values,
        vec![Some(1.0), Some(3.0), Some(4.0), Some(5.0)]
    );
}

#[test]
fn test_invalid_time_row_is_dropped() {
    let file = CsvBuilder::new(&["B7"])
        .raw_row("01/01/2025", "00:00:00", &["1"])
        .raw_row("01/01/2025", "99:99:99", &["2"])
        .raw_row("01/01/2025", "00:00:10", &["3"])
        .upload("bad-time.csv");

    let report = build_series(&[file]).unwrap();
    assert_eq!(report.dropped_rows, 1);
    assert_eq!(report.series.len(), 2);
    assert_eq!(
        report.series.column("B7").unwrap().values,
        vec![Some(1.0), Some(3.0)]
    );
}

#[test]
fn test_day_first_dates() {
    let file = CsvBuilder::new(&["B7"])
        .raw_row("02/03/2025", "12:00:00", &["1"])
        .upload("dates.csv");

    let report = build_series(&[file]).unwrap();
    let (start, _) = report.series.bounds().unwrap();
    assert_eq!(start.to_string(), "2025-03-02 12:00:00");
}

#[test]
fn test_missing_value_markers_keep_the_channel() {
    let file = UploadedFile::new(
        "markers.csv",
        "DATE,TIME,B7,R6\n\
         01/01/2025,00:00:00,10,NA\n\
         01/01/2025,00:00:05,20,4\n\
         01/01/2025,00:00:10,N/A,null\n",
    );

    let report = build_series(&[file]).unwrap();
    let series = &report.series;
    assert_eq!(
        series.column("R6").unwrap().values,
        vec![None, Some(4.0), None]
    );
    assert_eq!(
        series.column("B7").unwrap().values,
        vec![Some(10.0), Some(20.0), None]
    );
    assert_eq!(
        series
            .column("Total Right Bare Anode (R6+R8)")
            .unwrap()
            .values,
        vec![Some(0.0), Some(4.0), Some(0.0)]
    );
}

#[test]
fn test_padded_headers_and_cells() {
    let file = UploadedFile::new(
        "padded.csv",
        " DATE , TIME ,  B7 \n01/01/2025, 00:00:00 , 12.5 \n",
    );

    let report = build_series(&[file]).unwrap();
    assert_eq!(report.series.column("B7").unwrap().values, vec![Some(12.5)]);
}

// ============================================
// Failures
// ============================================

#[test]
fn test_bad_file_is_reported_and_skipped() {
    let good = constant_file("good.csv", &[("B7", 1.0)], 3, 5);
    let bad = UploadedFile::new("bad.csv", "DATE,TIME,B7\n01/01/2025,00:00:00,1,2,3\n");

    let report = build_series(&[good, bad]).unwrap();
    assert_eq!(report.series.len(), 3);
    assert_eq!(report.file_errors.len(), 1);
    assert_eq!(report.file_errors[0].file_name, "bad.csv");
}

#[test]
fn test_file_without_time_column_fails_alone() {
    let batch = parse_batch(&[
        UploadedFile::new("no-time.csv", "DATE,B7\n01/01/2025,1\n"),
        constant_file("good.csv", &[("B7", 1.0)], 2, 5),
    ]);
    assert_eq!(batch.tables.len(), 1);
    assert_eq!(batch.errors.len(), 1);
    assert!(batch.errors[0].to_string().contains("no-time.csv"));
}

#[test]
fn test_all_files_failing_is_an_error() {
    let err = build_series(&[
        UploadedFile::new("a.csv", "B7\n1\n"),
        UploadedFile::new("b.csv", vec![0xc3, 0x28]),
    ])
    .unwrap_err();

    match err {
        PipelineError::NoFilesParsed { errors } => {
            let names: Vec<&str> = errors.iter().map(|e| e.file_name.as_str()).collect();
            assert_eq!(names, vec!["a.csv", "b.csv"]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_no_valid_timestamps_is_an_error() {
    let file = CsvBuilder::new(&["B7"])
        .raw_row("yesterday", "noon", &["1"])
        .upload("words.csv");

    assert_eq!(
        build_series(&[file]).unwrap_err(),
        PipelineError::NoValidTimestamps
    );
}

// ============================================
// Caching
// ============================================

#[test]
fn test_identical_inputs_give_identical_series() {
    let files = vec![
        constant_file("a.csv", &[("B7", 1.0), ("L6", 2.0)], 20, 5),
        constant_file("b.csv", &[("R6", 3.0)], 20, 5),
    ];

    let first = build_series(&files).unwrap();
    let second = build_series(&files).unwrap();
    assert_eq!(first.series, second.series);
}

#[test]
fn test_store_rebuilds_when_a_file_is_added() {
    let mut store = SeriesStore::new();
    let mut files = vec![constant_file("a.csv", &[("B7", 1.0)], 3, 5)];

    let first = store.load(&files).unwrap();
    files.push(constant_file("b.csv", &[("R6", 3.0)], 3, 5));
    let second = store.load(&files).unwrap();

    assert!(!second.cached);
    assert!(!Arc::ptr_eq(&first.series, &second.series));
    assert!(second.series.has_column("R6"));
}
