use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::invoices::{EditInvoiceEntity, InsertInvoiceEntity, InvoiceEntity},
        repositories::invoices::InvoiceRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::invoices},
};

pub struct InvoicePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl InvoicePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl InvoiceRepository for InvoicePostgres {
    async fn create_invoice(&self, invoice: InsertInvoiceEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let invoice_id = insert_into(invoices::table)
            .values(&invoice)
            .returning(invoices::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(invoice_id)
    }

    async fn update_invoice(&self, invoice_id: Uuid, invoice: EditInvoiceEntity) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let matched = update(invoices::table.filter(invoices::id.eq(invoice_id)))
            .set(&invoice)
            .execute(&mut conn)?;

        Ok(matched)
    }

    async fn delete_invoice(&self, invoice_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let removed =
            delete(invoices::table.filter(invoices::id.eq(invoice_id))).execute(&mut conn)?;

        Ok(removed)
    }

    async fn find_by_id(&self, invoice_id: Uuid) -> Result<Option<InvoiceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let invoice = invoices::table
            .filter(invoices::id.eq(invoice_id))
            .select(InvoiceEntity::as_select())
            .first::<InvoiceEntity>(&mut conn)
            .optional()?;

        Ok(invoice)
    }

    async fn list_invoices(&self) -> Result<Vec<InvoiceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let invoices = invoices::table
            .select(InvoiceEntity::as_select())
            .order((invoices::date.desc(), invoices::id.asc()))
            .load::<InvoiceEntity>(&mut conn)?;

        Ok(invoices)
    }
}
