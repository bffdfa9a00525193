//! Address validation engine.
//!
//! Provides rule types, the standard rule set, and a pure-logic evaluator.

pub mod defaults;
pub mod evaluator;
pub mod rules;

pub use evaluator::evaluate_rules;
pub use rules::{
    AddressField, FieldRule, FieldViolation, RuleKind, RuleSet, ValidationResult,
    ValidationSeverity,
};
