//! The standard rule set applied by [`AddressRecord::is_valid`].
//!
//! - `city` must be present.
//! - `state`, when given, must be a USPS two-letter code (upper case).
//! - `zip`, when given, must be a ZIP or ZIP+4 code.
//! - a missing `street` is reported as a warning only.
//!
//! [`AddressRecord::is_valid`]: crate::address::AddressRecord::is_valid

use std::sync::LazyLock;

use super::rules::{AddressField, FieldRule, RuleKind, RuleSet};

/// `12345` or `12345-6789`.
pub const ZIP_PATTERN: &str = r"^\d{5}(-\d{4})?$";

/// States, DC, territories, freely associated states and military codes.
pub const USPS_STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC", "AS", "GU", "MP", "PR", "VI", "UM", "FM", "MH", "PW",
    "AA", "AE", "AP",
];

static STANDARD_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet::new(vec![
        FieldRule::error(AddressField::City, RuleKind::Required, "city is required"),
        FieldRule::error(
            AddressField::State,
            RuleKind::OneOf {
                values: USPS_STATE_CODES.iter().map(|s| s.to_string()).collect(),
            },
            "state must be a USPS two-letter code",
        ),
        FieldRule::error(
            AddressField::Zip,
            RuleKind::Pattern {
                pattern: ZIP_PATTERN.to_string(),
            },
            "zip must be 5 digits, optionally followed by -NNNN",
        ),
        FieldRule::warning(AddressField::Street, RuleKind::Required, "street is missing"),
    ])
    .expect("standard rules are well-formed")
});

pub fn standard_rules() -> &'static RuleSet {
    &STANDARD_RULES
}
