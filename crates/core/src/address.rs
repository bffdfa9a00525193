//! The [`AddressRecord`] value object.
//!
//! A record always carries a non-empty city. Every other field starts empty
//! (or absent, for `id` and `name`) and is set through explicit setters, so
//! the city invariant holds for the record's whole lifetime.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::DbId;
use crate::validation::defaults::standard_rules;
use crate::validation::evaluator::{bounds_violations, evaluate_rules};
use crate::validation::rules::{RuleSet, ValidationResult};

/// One postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(try_from = "AddressInput")]
pub struct AddressRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "name must be at most 200 characters"))]
    name: Option<String>,
    #[validate(length(max = 200, message = "street must be at most 200 characters"))]
    street: String,
    #[validate(length(min = 1, max = 100, message = "city must be 1 to 100 characters"))]
    city: String,
    #[validate(length(max = 32, message = "state must be at most 32 characters"))]
    state: String,
    #[validate(length(max = 16, message = "zip must be at most 16 characters"))]
    zip: String,
}

impl AddressRecord {
    /// Create a record for `city`. The city is stored exactly as given.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidArgument`] if `city` is empty.
    pub fn new(city: impl Into<String>) -> Result<Self, CoreError> {
        let city = city.into();
        if city.is_empty() {
            return Err(CoreError::invalid("city", "must not be empty"));
        }
        Ok(Self {
            id: None,
            name: None,
            street: String::new(),
            city,
            state: String::new(),
            zip: String::new(),
        })
    }

    /// Parse the single-line form produced by `Display`:
    /// `[[name, ]street, ]city[, STATE ZIP]`.
    ///
    /// With two or more comma-separated parts the last one is the region:
    /// empty, `STATE`, `ZIP` or `STATE ZIP`. A lone region token that starts
    /// with a digit is taken as the ZIP. Slots are positional, so an empty
    /// street or region still takes its place when a later or earlier part
    /// is present (`Home, , Springfield,`).
    pub fn parse_line(line: &str) -> Result<Self, CoreError> {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() > 4 {
            return Err(CoreError::invalid(
                "line",
                format!("expected at most 4 comma-separated parts, got {}", parts.len()),
            ));
        }

        let n = parts.len();
        if n == 1 {
            return Self::new(parts[0]);
        }

        let mut record = Self::new(parts[n - 2])?;
        let (state, zip) = parse_region(parts[n - 1])?;
        record.state = state;
        record.zip = zip;
        if n >= 3 {
            record.street = parts[n - 3].to_string();
        }
        if n == 4 && !parts[0].is_empty() {
            record.name = Some(parts[0].to_string());
        }
        Ok(record)
    }

    pub fn id(&self) -> Option<DbId> {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn zip(&self) -> &str {
        &self.zip
    }

    /// Record the identifier handed out by the owning store.
    pub fn assign_id(&mut self, id: DbId) {
        self.id = Some(id);
    }

    /// Replace the city, keeping the record unchanged on error.
    pub fn set_city(&mut self, city: impl Into<String>) -> Result<(), CoreError> {
        let city = city.into();
        if city.is_empty() {
            return Err(CoreError::invalid("city", "must not be empty"));
        }
        self.city = city;
        Ok(())
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn set_street(&mut self, street: impl Into<String>) {
        self.street = street.into();
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        self.state = state.into();
    }

    pub fn set_zip(&mut self, zip: impl Into<String>) {
        self.zip = zip.into();
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street = street.into();
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    pub fn with_zip(mut self, zip: impl Into<String>) -> Self {
        self.zip = zip.into();
        self
    }

    /// Whether the record passes the structural bounds and the standard rules.
    pub fn is_valid(&self) -> bool {
        self.is_valid_under(standard_rules())
    }

    pub fn is_valid_under(&self, rules: &RuleSet) -> bool {
        self.check(rules).is_valid
    }

    /// Full report: structural bound failures first, then rule violations in
    /// rule order.
    pub fn check(&self, rules: &RuleSet) -> ValidationResult {
        let mut result = evaluate_rules(rules, self);
        if let Err(errors) = <Self as Validate>::validate(self) {
            let mut errors = bounds_violations(&errors);
            errors.append(&mut result.errors);
            result.errors = errors;
            result.is_valid = false;
        }
        result
    }

    /// Fail-fast form of [`check`](Self::check).
    ///
    /// # Errors
    ///
    /// [`CoreError::Validation`] listing every error-severity violation.
    pub fn ensure_valid(&self, rules: &RuleSet) -> Result<(), CoreError> {
        let result = self.check(rules);
        if result.is_valid {
            return Ok(());
        }
        let details = result
            .errors
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect::<Vec<_>>()
            .join("; ");
        Err(CoreError::Validation(details))
    }

    /// Case-insensitive substring match against the single-line form.
    /// An empty query matches every record.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty() || self.to_string().to_lowercase().contains(&needle)
    }
}

fn parse_region(region: &str) -> Result<(String, String), CoreError> {
    let tokens: Vec<&str> = region.split_whitespace().collect();
    match tokens.as_slice() {
        [] => Ok((String::new(), String::new())),
        [zip] if zip.starts_with(|c: char| c.is_ascii_digit()) => {
            Ok((String::new(), zip.to_string()))
        }
        [state] => Ok((state.to_string(), String::new())),
        [state, zip] => Ok((state.to_string(), zip.to_string())),
        _ => Err(CoreError::invalid(
            "line",
            format!("expected `STATE ZIP` after the city, got `{region}`"),
        )),
    }
}

impl fmt::Display for AddressRecord {
    /// Positional single-line form. Empty parts are dropped only where
    /// [`AddressRecord::parse_line`] can still tell the slots apart: the
    /// region slot is kept (possibly empty) whenever a street or name
    /// precedes the city, and the street slot is kept whenever a name is set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let region = [self.state.as_str(), self.zip.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let name = self.name.as_deref().unwrap_or("");

        let mut slots: Vec<&str> = Vec::with_capacity(4);
        if !name.is_empty() {
            slots.push(name);
            slots.push(&self.street);
        } else if !self.street.is_empty() {
            slots.push(&self.street);
        }
        slots.push(&self.city);
        if slots.len() > 1 || !region.is_empty() {
            slots.push(&region);
        }

        f.write_str(slots.join(", ").trim_end())
    }
}

/// Loose wire shape of a record: every field optional.
///
/// Deserializing an [`AddressRecord`] goes through this type, so a record
/// without a city is rejected instead of being built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressInput {
    pub id: Option<DbId>,
    pub name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl TryFrom<AddressInput> for AddressRecord {
    type Error = CoreError;

    fn try_from(input: AddressInput) -> Result<Self, Self::Error> {
        let city = input
            .city
            .ok_or_else(|| CoreError::invalid("city", "is required"))?;
        let mut record = Self::new(city)?;
        record.id = input.id;
        record.name = input.name;
        record.street = input.street.unwrap_or_default();
        record.state = input.state.unwrap_or_default();
        record.zip = input.zip.unwrap_or_default();
        Ok(record)
    }
}

impl From<AddressRecord> for AddressInput {
    fn from(record: AddressRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            street: Some(record.street),
            city: Some(record.city),
            state: Some(record.state),
            zip: Some(record.zip),
        }
    }
}
