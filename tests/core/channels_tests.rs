//! Tests for fixed/selectable column classification

use crate::common::synthetic::CsvBuilder;
use anodelog::channels::{chart_groups, classify, partition, summary_order, ColumnClass};
use anodelog::computed::DerivedColumn;
use anodelog::state::build_series;

fn logger_file() -> anodelog::loader::UploadedFile {
    CsvBuilder::new(&[
        "Total REC.1",
        "L10",
        "Total Left",
        "L2",
        "Enable Alarm Rec.1",
        "B7",
        "Total Tank",
    ])
    .raw_row("01/01/2025", "00:00:00", &["100", "1", "50", "2", "0", "3", "9"])
    .raw_row("01/01/2025", "00:00:05", &["101", "1", "51", "2", "1", "3", "9"])
    .upload("plant.csv")
}

#[test]
fn test_partition_fixed_columns() {
    let report = build_series(&[logger_file()]).unwrap();
    let sets = partition(&report.series);

    let mut expected = vec![
        "Total REC.1".to_string(),
        "Total Left".to_string(),
        "Total Tank".to_string(),
    ];
    expected.extend(DerivedColumn::all().map(|d| d.name().to_string()));
    assert_eq!(sets.fixed, expected);
}

#[test]
fn test_partition_selectable_excludes_flags_and_totals() {
    let report = build_series(&[logger_file()]).unwrap();
    let sets = partition(&report.series);

    assert_eq!(sets.selectable, vec!["B7", "L2", "L10"]);
    assert!(!sets.is_selectable("Enable Alarm Rec.1"));
    assert!(!sets.is_selectable("DATE"));
    assert!(!sets.is_selectable("Total REC.1"));
}

#[test]
fn test_bare_anode_name_is_not_a_legacy_total() {
    assert_eq!(classify("Total Bare Anode Spare"), ColumnClass::Selectable);
    assert_eq!(
        classify("Total Left Bare Anode (L6+B4)"),
        ColumnClass::Derived(DerivedColumn::LeftBareAnode)
    );
}

#[test]
fn test_summary_order_for_plant_file() {
    let report = build_series(&[logger_file()]).unwrap();
    let ordered = summary_order(&partition(&report.series).fixed);

    assert_eq!(ordered[0], "Total REC.1");
    assert_eq!(ordered[1], "Bare Anode B7 (REC.1)");
    assert_eq!(ordered[5], "Overall Bare Anode");
    assert_eq!(&ordered[6..], &["Total Left", "Total Tank"]);
}

#[test]
fn test_chart_groups_for_plant_file() {
    let report = build_series(&[logger_file()]).unwrap();
    let groups = chart_groups(&partition(&report.series).fixed);

    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].columns, vec!["Total REC.1"]);
    assert_eq!(groups[1].columns, vec!["Total Left"]);
    assert_eq!(groups[2].title, "Bare Anode Totals");
    assert_eq!(groups[2].columns.len(), 5);
}
