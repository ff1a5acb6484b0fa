use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::invoices::{EditInvoiceEntity, InsertInvoiceEntity, InvoiceEntity};

#[automock]
#[async_trait]
pub trait InvoiceRepository {
    async fn create_invoice(&self, invoice: InsertInvoiceEntity) -> Result<Uuid>;
    /// Returns the number of rows that matched `invoice_id`.
    async fn update_invoice(&self, invoice_id: Uuid, invoice: EditInvoiceEntity) -> Result<usize>;
    /// Returns the number of rows removed.
    async fn delete_invoice(&self, invoice_id: Uuid) -> Result<usize>;
    async fn find_by_id(&self, invoice_id: Uuid) -> Result<Option<InvoiceEntity>>;
    async fn list_invoices(&self) -> Result<Vec<InvoiceEntity>>;
}
