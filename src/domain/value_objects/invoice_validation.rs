//! Declarative form validation.
//!
//! A form schema is a table of [`FieldRule`]s. [`validate_fields`] walks the
//! whole table against a raw field bag and collects every failure, so the page
//! can show all problems at once instead of the first one.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

use crate::domain::value_objects::enums::invoice_statuses::InvoiceStatus;

/// Field name → messages, in the order they were produced.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Largest dollar amount whose cent value still fits exactly in an `f64`
/// mantissa and in the `bigint` column.
pub const MAX_AMOUNT: f64 = 90_000_000_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    MissingCustomer,
    InvalidCustomer,
    InvalidAmount,
    InvalidStatus,
}

impl ValidationErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            ValidationErrorKind::MissingCustomer => "A customer is required",
            ValidationErrorKind::InvalidCustomer => "Please select a customer",
            ValidationErrorKind::InvalidAmount => "Positive dollar amount",
            ValidationErrorKind::InvalidStatus => "Select an invoice status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// A string that is not blank once trimmed.
    Text,
    /// A number, coerced from its string form. Once rounded to a multiple of
    /// `1 / scale` it must satisfy `gt < value <= max`.
    CoercedNumber { gt: f64, max: f64, scale: f64 },
    /// A string equal to one of the listed tags.
    OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub field: &'static str,
    pub kind: FieldKind,
    /// Reported when the key is absent or null.
    pub missing: ValidationErrorKind,
    /// Reported when the value has the wrong shape or breaks the constraint.
    pub invalid: ValidationErrorKind,
}

pub const INVOICE_FORM_RULES: &[FieldRule] = &[
    FieldRule {
        field: "customerId",
        kind: FieldKind::Text,
        missing: ValidationErrorKind::MissingCustomer,
        invalid: ValidationErrorKind::InvalidCustomer,
    },
    FieldRule {
        field: "amount",
        kind: FieldKind::CoercedNumber {
            gt: 0.0,
            max: MAX_AMOUNT,
            scale: 100.0,
        },
        missing: ValidationErrorKind::InvalidAmount,
        invalid: ValidationErrorKind::InvalidAmount,
    },
    FieldRule {
        field: "status",
        kind: FieldKind::OneOf(&InvoiceStatus::ALL),
        missing: ValidationErrorKind::InvalidStatus,
        invalid: ValidationErrorKind::InvalidStatus,
    },
];

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    pub fn into_text(self) -> Option<String> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(number) => Some(*number),
            FieldValue::Text(_) => None,
        }
    }
}

pub type ValidatedFields = HashMap<&'static str, FieldValue>;

/// Checks every rule against `input`. Keys without a rule are ignored.
pub fn validate_fields(
    rules: &[FieldRule],
    input: &Map<String, Value>,
) -> Result<ValidatedFields, FieldErrors> {
    let mut fields = ValidatedFields::with_capacity(rules.len());
    let mut errors = FieldErrors::new();

    for rule in rules {
        let checked = match input.get(rule.field) {
            None | Some(Value::Null) => Err(rule.missing),
            Some(value) => check_value(rule, value),
        };

        match checked {
            Ok(value) => {
                fields.insert(rule.field, value);
            }
            Err(kind) => errors
                .entry(rule.field.to_string())
                .or_default()
                .push(kind.message().to_string()),
        }
    }

    if errors.is_empty() {
        Ok(fields)
    } else {
        Err(errors)
    }
}

fn check_value(rule: &FieldRule, value: &Value) -> Result<FieldValue, ValidationErrorKind> {
    match rule.kind {
        FieldKind::Text => match value {
            Value::String(text) if !text.trim().is_empty() => {
                Ok(FieldValue::Text(text.trim().to_string()))
            }
            _ => Err(rule.invalid),
        },
        FieldKind::CoercedNumber { gt, max, scale } => {
            let number = coerce_number(value).ok_or(rule.invalid)?;
            let rounded = (number * scale).round() / scale;
            if number.is_finite() && rounded > gt && number <= max {
                Ok(FieldValue::Number(number))
            } else {
                Err(rule.invalid)
            }
        }
        FieldKind::OneOf(allowed) => match value {
            Value::String(tag) if allowed.contains(&tag.as_str()) => {
                Ok(FieldValue::Text(tag.clone()))
            }
            _ => Err(rule.invalid),
        },
    }
}

/// Blank strings coerce to zero, mirroring how an empty number input submits.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}
