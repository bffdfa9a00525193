//! End-to-end tests for the batch checker: file on disk in, rendered
//! report out, using the same calls as the binary.

use std::io::Write;

use site_check::config::{CheckConfig, ReportFormat};
use site_check::input::{parse_entries, read_source, InputFormat};
use site_check::report::{check_entries, render, EntryStatus};

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

// ---------------------------------------------------------------------------
// Test: JSON input with the standard rules
// ---------------------------------------------------------------------------

#[test]
fn json_file_is_checked_against_standard_rules() {
    let input = write_temp(
        r#"[
            {"id": 1, "name": "HQ", "street": "1 Main St", "city": "Springfield", "state": "IL", "zip": "62704"},
            {"city": "Shelbyville", "state": "Illinois"},
            {"street": "No City Rd"}
        ]"#,
    );

    let text = read_source(Some(input.path())).unwrap();
    let entries = parse_entries(&text, InputFormat::Json).unwrap();
    let rules = CheckConfig::default().load_rules().unwrap();
    let report = check_entries(entries, &rules, false);

    let statuses: Vec<_> = report.entries.iter().map(|e| e.status).collect();
    assert_eq!(
        statuses,
        [EntryStatus::Valid, EntryStatus::Invalid, EntryStatus::Rejected]
    );
    assert_eq!(report.entries[0].record.as_ref().unwrap().id(), Some(1));
    assert!(!report.all_valid());

    let rendered = render(&report, ReportFormat::Text).unwrap();
    assert!(rendered.contains("[1] valid    HQ, 1 Main St, Springfield, IL 62704"));
    assert!(rendered.contains("[3] rejected json: Invalid argument: city: is required"));
}

// ---------------------------------------------------------------------------
// Test: line input with a custom rule file
// ---------------------------------------------------------------------------

#[test]
fn custom_rule_file_replaces_standard_rules() {
    let rules_file = write_temp(
        r#"[{"field": "zip", "rule_type": "required", "message": "zip is required"}]"#,
    );
    let input = write_temp("Springfield, IL 62704\nShelbyville, Ontario\n");

    let config = CheckConfig::default().with_overrides(
        Some(rules_file.path().to_path_buf()),
        Some(ReportFormat::Json),
        false,
    );
    let rules = config.load_rules().unwrap();
    assert_eq!(rules.len(), 1);

    let text = read_source(Some(input.path())).unwrap();
    let entries = parse_entries(&text, InputFormat::Lines).unwrap();
    let report = check_entries(entries, &rules, config.strict);

    assert_eq!(report.summary.valid, 1);
    assert_eq!(report.summary.invalid, 1);

    let json: serde_json::Value =
        serde_json::from_str(&render(&report, config.format).unwrap()).unwrap();
    assert_eq!(json["entries"][1]["source"], "line 2");
    assert_eq!(json["entries"][1]["result"]["errors"][0]["message"], "zip is required");
}

// ---------------------------------------------------------------------------
// Test: malformed inputs surface as errors, not panics
// ---------------------------------------------------------------------------

/// One badly typed element is rejected on its own; the rest of the batch is
/// still checked.
#[test]
fn badly_typed_element_does_not_abort_the_batch() {
    let input = write_temp(r#"[{"city": "Springfield", "state": "IL"}, {"city": 62704}]"#);

    let text = read_source(Some(input.path())).unwrap();
    let entries = parse_entries(&text, InputFormat::Json).unwrap();
    let report = check_entries(entries, &CheckConfig::default().load_rules().unwrap(), false);

    assert_eq!(report.summary.total, 2);
    assert_eq!(report.summary.valid, 1);
    assert_eq!(report.summary.rejected, 1);
    assert_eq!(report.entries[0].status, EntryStatus::Valid);
    assert_eq!(report.entries[1].status, EntryStatus::Rejected);

    let rendered = render(&report, ReportFormat::Text).unwrap();
    assert!(rendered.contains("[2] rejected json element 2: Invalid argument: entry: invalid type"));
}

#[test]
fn malformed_rule_file_is_an_error() {
    let rules_file = write_temp("not json");
    let config = CheckConfig {
        rules_path: Some(rules_file.path().to_path_buf()),
        ..CheckConfig::default()
    };
    let err = config.load_rules().unwrap_err();
    assert!(format!("{err:#}").contains("invalid rule file"));
}

#[test]
fn malformed_json_input_is_an_error() {
    let input = write_temp("[{\"city\": ");
    let text = read_source(Some(input.path())).unwrap();
    assert!(parse_entries(&text, InputFormat::Json).is_err());
}
