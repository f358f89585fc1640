//! Validation and normalization pipeline for user name fields.
//!
//! # Responsibility
//! - Check candidate `firstName`/`lastName` values before any write.
//! - Apply the deterministic storage transforms to accepted values.
//!
//! # Invariants
//! - Rules run per field in order: alphabetic, then length.
//! - Fields are checked in order: `firstName`, then `lastName`.
//! - The first reported violation is always the first failing rule.
//! - The pipeline never touches storage.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const ALPHABETIC_MESSAGE: &str = "Only alphabets are allowed";
pub const LENGTH_MESSAGE: &str = "min 2 max 10 characters allowed";
pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 10;

pub const FIRST_NAME_PREFIX: &str = "Mr. ";
pub const LAST_NAME_SUFFIX: &str = " ,Indian";

static ALPHABETIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+$").expect("valid alphabetic regex"));

/// Candidate user fields as received from a caller.
///
/// Absent fields are `None`; update paths only touch present fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserFields {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
        }
    }
}

/// Transformed create payload; only constructible through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    first_name: String,
    last_name: String,
}

impl NewUser {
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }
}

/// Transformed partial update; only constructible through the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    first_name: Option<String>,
    last_name: Option<String>,
}

impl UserChanges {
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }
}

/// Validated user field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    FirstName,
    LastName,
}

impl UserField {
    /// External (camelCase) field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
        }
    }
}

/// Rule that rejected a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    /// Field is mandatory on create.
    Required,
    Alphabetic,
    Length,
}

/// One rejected field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: UserField,
    pub rule: ValidationRule,
    pub message: String,
    /// Rejected raw input; `None` for missing required fields.
    pub value: Option<String>,
}

/// All violations found for one candidate field set, in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserValidationError {
    violations: Vec<FieldViolation>,
}

impl UserValidationError {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }

    /// The first failing rule in field order.
    pub fn first(&self) -> Option<&FieldViolation> {
        self.violations.first()
    }
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.first() {
            Some(first) => write!(
                f,
                "{}: {} ({} violation(s))",
                first.field.as_str(),
                first.message,
                self.violations.len()
            ),
            None => write!(f, "user validation failed"),
        }
    }
}

impl Error for UserValidationError {}

/// Validates and transforms a full field set for create.
///
/// Both fields are required; a missing one is reported in field order
/// alongside any rule violations of the other.
pub fn normalize_for_create(fields: &UserFields) -> Result<NewUser, UserValidationError> {
    let mut violations = Vec::new();
    let first_name = check_required(
        UserField::FirstName,
        fields.first_name.as_deref(),
        &mut violations,
    );
    let last_name = check_required(
        UserField::LastName,
        fields.last_name.as_deref(),
        &mut violations,
    );

    match (first_name, last_name) {
        (Some(first_name), Some(last_name)) if violations.is_empty() => Ok(NewUser {
            first_name: transform_first_name(first_name),
            last_name: transform_last_name(last_name),
        }),
        _ => Err(UserValidationError { violations }),
    }
}

/// Validates and transforms only the fields present in `fields`.
pub fn normalize_for_update(fields: &UserFields) -> Result<UserChanges, UserValidationError> {
    let mut violations = Vec::new();
    if let Some(value) = fields.first_name.as_deref() {
        check_field(UserField::FirstName, value, &mut violations);
    }
    if let Some(value) = fields.last_name.as_deref() {
        check_field(UserField::LastName, value, &mut violations);
    }

    if !violations.is_empty() {
        return Err(UserValidationError { violations });
    }

    Ok(UserChanges {
        first_name: fields.first_name.as_deref().map(transform_first_name),
        last_name: fields.last_name.as_deref().map(transform_last_name),
    })
}

fn check_required<'a>(
    field: UserField,
    value: Option<&'a str>,
    violations: &mut Vec<FieldViolation>,
) -> Option<&'a str> {
    match value {
        Some(value) => {
            check_field(field, value, violations);
            Some(value)
        }
        None => {
            violations.push(FieldViolation {
                field,
                rule: ValidationRule::Required,
                message: format!("{} is required", field.as_str()),
                value: None,
            });
            None
        }
    }
}

fn check_field(field: UserField, value: &str, violations: &mut Vec<FieldViolation>) {
    if !ALPHABETIC_RE.is_match(value) {
        violations.push(FieldViolation {
            field,
            rule: ValidationRule::Alphabetic,
            message: ALPHABETIC_MESSAGE.to_string(),
            value: Some(value.to_string()),
        });
    }

    let chars = value.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&chars) {
        violations.push(FieldViolation {
            field,
            rule: ValidationRule::Length,
            message: LENGTH_MESSAGE.to_string(),
            value: Some(value.to_string()),
        });
    }
}

/// `arun` -> `Mr. ARUN`.
pub fn transform_first_name(value: &str) -> String {
    format!("{FIRST_NAME_PREFIX}{}", value.to_uppercase())
}

/// `kumar` -> `kumar ,Indian`.
pub fn transform_last_name(value: &str) -> String {
    format!("{value}{LAST_NAME_SUFFIX}")
}
