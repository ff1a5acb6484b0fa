use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::invoices;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = invoices)]
pub struct InvoiceEntity {
    pub id: Uuid,
    pub customer_id: String,
    pub amount: i64,
    pub date: NaiveDate,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = invoices)]
pub struct InsertInvoiceEntity {
    pub id: Uuid,
    pub customer_id: String,
    pub amount: i64,
    pub date: NaiveDate,
    pub status: String,
}

/// Columns overwritten by an edit. `id` and `date` are never touched.
#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = invoices)]
pub struct EditInvoiceEntity {
    pub customer_id: String,
    pub amount: i64,
    pub status: String,
}
