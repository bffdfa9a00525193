//! Validation rule and result types.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::address::AddressRecord;
use crate::error::CoreError;

/// The text fields of an [`AddressRecord`] that rules can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressField {
    Name,
    Street,
    City,
    State,
    Zip,
}

impl AddressField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Street => "street",
            Self::City => "city",
            Self::State => "state",
            Self::Zip => "zip",
        }
    }

    /// Current value of this field on `record`. Only `name` can be absent.
    pub fn value_of(self, record: &AddressRecord) -> Option<&str> {
        match self {
            Self::Name => record.name(),
            Self::Street => Some(record.street()),
            Self::City => Some(record.city()),
            Self::State => Some(record.state()),
            Self::Zip => Some(record.zip()),
        }
    }
}

/// What a rule checks. Serialized with a `rule_type` tag so rule files read
/// as flat objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule_type", rename_all = "snake_case")]
pub enum RuleKind {
    Required,
    MinLength { min: usize },
    MaxLength { max: usize },
    Pattern { pattern: String },
    OneOf { values: Vec<String> },
}

impl RuleKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MinLength { .. } => "min_length",
            Self::MaxLength { .. } => "max_length",
            Self::Pattern { .. } => "pattern",
            Self::OneOf { .. } => "one_of",
        }
    }
}

/// Whether a rule violation makes the record invalid or is informational.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    #[default]
    Error,
    Warning,
}

/// A single rule bound to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub field: AddressField,
    #[serde(flatten)]
    pub kind: RuleKind,
    pub message: String,
    #[serde(default)]
    pub severity: ValidationSeverity,
}

impl FieldRule {
    pub fn error(field: AddressField, kind: RuleKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
            severity: ValidationSeverity::Error,
        }
    }

    pub fn warning(field: AddressField, kind: RuleKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
            severity: ValidationSeverity::Warning,
        }
    }
}

/// An ordered list of rules forming one validation policy.
///
/// Construction compiles every `pattern` rule up front and keeps the
/// compiled regex beside the rule, so a loaded rule set never carries a
/// pattern that cannot compile and evaluation never recompiles one.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
    #[serde(skip)]
    patterns: Vec<Option<Regex>>,
}

impl RuleSet {
    pub fn new(rules: Vec<FieldRule>) -> Result<Self, CoreError> {
        let patterns = rules
            .iter()
            .map(compile_rule)
            .collect::<Result<Vec<_>, CoreError>>()?;
        Ok(Self { rules, patterns })
    }

    /// A rule set with no rules; only structural bounds apply.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            patterns: Vec::new(),
        }
    }

    /// Parse a JSON array of rules, e.g.
    /// `[{"field": "zip", "rule_type": "pattern", "pattern": "^\\d{5}$", "message": "..."}]`.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let rules: Vec<FieldRule> = serde_json::from_str(json)
            .map_err(|e| CoreError::invalid("rules", e.to_string()))?;
        Self::new(rules)
    }

    pub fn push(&mut self, rule: FieldRule) -> Result<(), CoreError> {
        let pattern = compile_rule(&rule)?;
        self.rules.push(rule);
        self.patterns.push(pattern);
        Ok(())
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Rules paired with their compiled regex (`Some` only for `pattern` rules).
    pub(crate) fn compiled(&self) -> impl Iterator<Item = (&FieldRule, Option<&Regex>)> + '_ {
        self.rules.iter().zip(self.patterns.iter().map(Option::as_ref))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl PartialEq for RuleSet {
    fn eq(&self, other: &Self) -> bool {
        self.rules == other.rules
    }
}

impl Eq for RuleSet {}

impl Default for RuleSet {
    fn default() -> Self {
        super::defaults::standard_rules().clone()
    }
}

fn compile_rule(rule: &FieldRule) -> Result<Option<Regex>, CoreError> {
    let RuleKind::Pattern { pattern } = &rule.kind else {
        return Ok(None);
    };
    Regex::new(pattern).map(Some).map_err(|e| {
        CoreError::invalid(
            rule.field.as_str(),
            format!("invalid pattern `{pattern}`: {e}"),
        )
    })
}

/// Aggregated result of evaluating all rules against one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<FieldViolation>,
    pub warnings: Vec<FieldViolation>,
}

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub rule_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn rule_file_reads_flat_objects() {
        let json = r#"[
            {"field": "city", "rule_type": "required", "message": "city is required"},
            {"field": "zip", "rule_type": "pattern", "pattern": "^\\d{5}$",
             "message": "five digits", "severity": "warning"},
            {"field": "state", "rule_type": "one_of", "values": ["IL", "WI"], "message": "IL or WI"}
        ]"#;
        let rules = RuleSet::from_json_str(json).unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules.rules()[0].kind, RuleKind::Required);
        assert_eq!(rules.rules()[0].severity, ValidationSeverity::Error);
        assert_eq!(rules.rules()[1].field, AddressField::Zip);
        assert_eq!(rules.rules()[1].severity, ValidationSeverity::Warning);
        assert_matches!(&rules.rules()[2].kind, RuleKind::OneOf { values } if values.len() == 2);
    }

    #[test]
    fn rule_file_with_bad_pattern_is_rejected() {
        let json = r#"[{"field": "zip", "rule_type": "pattern", "pattern": "([", "message": "x"}]"#;
        let err = RuleSet::from_json_str(json).unwrap_err();
        assert_matches!(err, CoreError::InvalidArgument { field: "zip", .. });
    }

    #[test]
    fn rule_file_with_unknown_rule_type_is_rejected() {
        let json = r#"[{"field": "zip", "rule_type": "luhn", "message": "x"}]"#;
        let err = RuleSet::from_json_str(json).unwrap_err();
        assert_matches!(err, CoreError::InvalidArgument { field: "rules", .. });
    }

    #[test]
    fn push_checks_patterns() {
        let mut rules = RuleSet::empty();
        let bad = FieldRule::error(
            AddressField::Street,
            RuleKind::Pattern {
                pattern: "(".into(),
            },
            "bad",
        );
        assert!(rules.push(bad).is_err());
        assert!(rules.is_empty());
        assert!(rules.patterns.is_empty());
    }

    #[test]
    fn patterns_are_compiled_once_beside_their_rules() {
        let mut rules = RuleSet::new(vec![
            FieldRule::error(AddressField::City, RuleKind::Required, "city"),
            FieldRule::error(
                AddressField::Zip,
                RuleKind::Pattern {
                    pattern: r"^\d{5}$".into(),
                },
                "zip",
            ),
        ])
        .unwrap();
        rules
            .push(FieldRule::warning(
                AddressField::State,
                RuleKind::Pattern {
                    pattern: "^[A-Z]{2}$".into(),
                },
                "state",
            ))
            .unwrap();

        let compiled: Vec<_> = rules.compiled().map(|(_, re)| re.map(Regex::as_str)).collect();
        assert_eq!(compiled, [None, Some(r"^\d{5}$"), Some("^[A-Z]{2}$")]);
    }

    #[test]
    fn serialized_rule_keeps_tag_inline() {
        let rule = FieldRule::error(AddressField::Zip, RuleKind::MaxLength { max: 10 }, "too long");
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["field"], "zip");
        assert_eq!(value["rule_type"], "max_length");
        assert_eq!(value["max"], 10);
        assert_eq!(value["severity"], "error");
    }
}
