//! Batch checking and report rendering.

use std::fmt::Write as _;

use serde::Serialize;
use site_core::validation::{FieldViolation, RuleSet, ValidationResult};
use site_core::AddressRecord;

use crate::config::ReportFormat;
use crate::input::RawEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Valid,
    Invalid,
    /// No record could be built from the entry.
    Rejected,
}

impl EntryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    /// 1-based position in the input.
    pub index: usize,
    pub source: String,
    pub status: EntryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<AddressRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ValidationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub summary: Summary,
    pub entries: Vec<EntryReport>,
}

impl Report {
    pub fn all_valid(&self) -> bool {
        self.summary.valid == self.summary.total
    }
}

/// Build and check every entry. In strict mode a record with warnings
/// counts as invalid.
pub fn check_entries(entries: Vec<RawEntry>, rules: &RuleSet, strict: bool) -> Report {
    let mut summary = Summary::default();
    let mut reports = Vec::with_capacity(entries.len());

    for (i, entry) in entries.into_iter().enumerate() {
        let index = i + 1;
        let source = entry.source();
        summary.total += 1;

        let report = match entry.into_record() {
            Ok(record) => {
                let result = record.check(rules);
                let passed = result.is_valid && !(strict && !result.warnings.is_empty());
                let status = if passed {
                    summary.valid += 1;
                    EntryStatus::Valid
                } else {
                    summary.invalid += 1;
                    EntryStatus::Invalid
                };
                tracing::debug!(
                    index,
                    status = status.as_str(),
                    errors = result.errors.len(),
                    warnings = result.warnings.len(),
                    "Checked {record}"
                );
                EntryReport {
                    index,
                    source,
                    status,
                    record: Some(record),
                    result: Some(result),
                    error: None,
                }
            }
            Err(e) => {
                summary.rejected += 1;
                tracing::warn!(index, source = %source, error = %e, "Entry rejected");
                EntryReport {
                    index,
                    source,
                    status: EntryStatus::Rejected,
                    record: None,
                    result: None,
                    error: Some(e.to_string()),
                }
            }
        };
        reports.push(report);
    }

    Report {
        summary,
        entries: reports,
    }
}

pub fn render(report: &Report, format: ReportFormat) -> anyhow::Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => render_json(report),
    }
}

pub fn render_json(report: &Report) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    for entry in &report.entries {
        let subject = match (&entry.record, &entry.error) {
            (Some(record), _) => record.to_string(),
            (None, Some(error)) => format!("{}: {error}", entry.source),
            (None, None) => entry.source.clone(),
        };
        let _ = writeln!(out, "[{}] {:<9}{subject}", entry.index, entry.status.as_str());

        if let Some(result) = &entry.result {
            for v in &result.errors {
                write_violation(&mut out, "error", v);
            }
            for v in &result.warnings {
                write_violation(&mut out, "warning", v);
            }
        }
    }

    let s = &report.summary;
    let _ = writeln!(
        out,
        "{} entries: {} valid, {} invalid, {} rejected",
        s.total, s.valid, s.invalid, s.rejected
    );
    out
}

fn write_violation(out: &mut String, severity: &str, v: &FieldViolation) {
    let _ = writeln!(
        out,
        "      {severity:<8}{} ({}): {}",
        v.field, v.rule_type, v.message
    );
}
