use std::collections::HashMap;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::{
    entities::invoices::{EditInvoiceEntity, InsertInvoiceEntity, InvoiceEntity},
    value_objects::{
        enums::invoice_statuses::InvoiceStatus,
        invoice_validation::{FieldErrors, FieldValue, INVOICE_FORM_RULES, validate_fields},
    },
};

pub const INVOICES_PATH: &str = "/dashboard/invoices";

/// Raw field bag submitted by the invoice form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceInput(Map<String, Value>);

impl InvoiceInput {
    pub fn from_form(fields: HashMap<String, String>) -> Self {
        Self(
            fields
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect(),
        )
    }

    /// Anything but a JSON object is treated as an empty submission.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn validate(&self) -> Result<ValidatedInvoice, FieldErrors> {
        ValidatedInvoice::try_from(self)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for InvoiceInput {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInvoice {
    pub customer_id: String,
    pub amount: f64,
    pub status: InvoiceStatus,
}

impl ValidatedInvoice {
    pub fn amount_cents(&self) -> i64 {
        (self.amount * 100.0).round() as i64
    }

    pub fn to_insert_entity(&self, id: Uuid, date: NaiveDate) -> InsertInvoiceEntity {
        InsertInvoiceEntity {
            id,
            customer_id: self.customer_id.clone(),
            amount: self.amount_cents(),
            date,
            status: self.status.to_string(),
        }
    }

    pub fn to_edit_entity(&self) -> EditInvoiceEntity {
        EditInvoiceEntity {
            customer_id: self.customer_id.clone(),
            amount: self.amount_cents(),
            status: self.status.to_string(),
        }
    }
}

impl TryFrom<&InvoiceInput> for ValidatedInvoice {
    type Error = FieldErrors;

    fn try_from(input: &InvoiceInput) -> Result<Self, Self::Error> {
        let mut fields = validate_fields(INVOICE_FORM_RULES, input.fields())?;

        let customer_id = fields
            .remove("customerId")
            .and_then(FieldValue::into_text)
            .ok_or_else(|| rule_error("customerId"))?;
        let amount = fields
            .remove("amount")
            .and_then(|value| value.as_number())
            .ok_or_else(|| rule_error("amount"))?;
        let status = fields
            .remove("status")
            .and_then(FieldValue::into_text)
            .and_then(|tag| tag.parse::<InvoiceStatus>().ok())
            .ok_or_else(|| rule_error("status"))?;

        Ok(ValidatedInvoice {
            customer_id,
            amount,
            status,
        })
    }
}

/// The rule's own invalid message, for a value the table accepted in an
/// unexpected shape.
fn rule_error(field: &str) -> FieldErrors {
    INVOICE_FORM_RULES
        .iter()
        .filter(|rule| rule.field == field)
        .map(|rule| (rule.field.to_string(), vec![rule.invalid.message().to_string()]))
        .collect()
}

/// What the invoice form renders after a failed submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormState {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            errors: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceModel {
    pub id: Uuid,
    pub customer_id: String,
    /// Stored in cents.
    pub amount: i64,
    pub date: NaiveDate,
    pub status: InvoiceStatus,
}

impl TryFrom<InvoiceEntity> for InvoiceModel {
    type Error = anyhow::Error;

    fn try_from(entity: InvoiceEntity) -> Result<Self> {
        let status = entity
            .status
            .parse::<InvoiceStatus>()
            .map_err(|err| anyhow!("invoice {}: {}", entity.id, err))?;

        Ok(Self {
            id: entity.id,
            customer_id: entity.customer_id,
            amount: entity.amount,
            date: entity.date,
            status,
        })
    }
}
