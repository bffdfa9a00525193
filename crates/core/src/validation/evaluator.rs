//! Rule evaluator: pure logic over an [`AddressRecord`].

use regex::Regex;
use validator::ValidationErrors;

use super::rules::{
    FieldRule, FieldViolation, RuleKind, RuleSet, ValidationResult, ValidationSeverity,
};
use crate::address::AddressRecord;

/// Evaluate all rules against a single record.
pub fn evaluate_rules(rules: &RuleSet, record: &AddressRecord) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (rule, pattern) in rules.compiled() {
        if let Some(violation) = evaluate_single_rule(rule, pattern, record) {
            match rule.severity {
                ValidationSeverity::Error => errors.push(violation),
                ValidationSeverity::Warning => warnings.push(violation),
            }
        }
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

fn evaluate_single_rule(
    rule: &FieldRule,
    pattern: Option<&Regex>,
    record: &AddressRecord,
) -> Option<FieldViolation> {
    let value = rule.field.value_of(record);

    match &rule.kind {
        RuleKind::Required => evaluate_required(rule, value),
        RuleKind::MinLength { min } => {
            evaluate_present(rule, value, |s| s.chars().count() >= *min)
        }
        RuleKind::MaxLength { max } => {
            evaluate_present(rule, value, |s| s.chars().count() <= *max)
        }
        // RuleSet compiles every pattern rule, so `None` never reaches here.
        RuleKind::Pattern { .. } => {
            evaluate_present(rule, value, |s| pattern.map_or(true, |re| re.is_match(s)))
        }
        RuleKind::OneOf { values } => evaluate_present(rule, value, |s| values.iter().any(|v| v == s)),
    }
}

fn evaluate_required(rule: &FieldRule, value: Option<&str>) -> Option<FieldViolation> {
    match value {
        Some(s) if !s.trim().is_empty() => None,
        _ => Some(violation(rule, value)),
    }
}

/// Non-`required` rules only look at values that are there; presence is
/// the `required` rule's job.
fn evaluate_present(
    rule: &FieldRule,
    value: Option<&str>,
    passes: impl FnOnce(&str) -> bool,
) -> Option<FieldViolation> {
    let s = value.filter(|s| !s.is_empty())?;
    if passes(s) {
        None
    } else {
        Some(violation(rule, Some(s)))
    }
}

fn violation(rule: &FieldRule, value: Option<&str>) -> FieldViolation {
    FieldViolation {
        field: rule.field.as_str().to_string(),
        rule_type: rule.kind.name().to_string(),
        message: rule.message.clone(),
        value: value.map(str::to_owned),
    }
}

/// Convert structural-bound failures from the `Validate` derive into
/// violations, sorted by field so reports are stable.
pub(crate) fn bounds_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| FieldViolation {
                field: field.clone(),
                rule_type: err.code.to_string(),
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is out of bounds")),
                value: err
                    .params
                    .get("value")
                    .and_then(|v| v.as_str())
                    .map(str::to_owned),
            })
        })
        .collect();
    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}
