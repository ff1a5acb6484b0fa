use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    application::{
        interfaces::page_cache::{PageCache, PageLookup},
        usecases::Redirect,
    },
    domain::{
        repositories::invoices::InvoiceRepository,
        value_objects::{
            invoice_validation::FieldErrors,
            invoices::{FormState, INVOICES_PATH, InvoiceInput, InvoiceModel},
        },
    },
};

pub const CREATE_VALIDATION_MESSAGE: &str = "Missing Fields. Failed to Create Invoice.";
pub const UPDATE_VALIDATION_MESSAGE: &str = "Missing Fields. Failed to Update Invoice.";
pub const CREATE_DB_MESSAGE: &str = "Database Error: Failed to create invoice";
pub const UPDATE_DB_MESSAGE: &str = "Database Error: Failed to update invoice.";
pub const DELETE_DB_MESSAGE: &str = "Database Error: Failed to delete invoice.";
pub const FETCH_DB_MESSAGE: &str = "Database Error: Failed to fetch invoices.";

#[derive(Debug, Error, PartialEq)]
pub enum InvoiceActionError {
    #[error("{message}")]
    ValidationFailed {
        errors: FieldErrors,
        message: &'static str,
    },
    #[error("{0}")]
    PersistenceFailed(&'static str),
    #[error("Invoice not found")]
    NotFound,
}

impl InvoiceActionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            InvoiceActionError::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            InvoiceActionError::PersistenceFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            InvoiceActionError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// The form state a page renders for this failure.
    pub fn to_state(&self) -> FormState {
        match self {
            InvoiceActionError::ValidationFailed { errors, message } => FormState {
                errors: Some(errors.clone()),
                message: Some(message.to_string()),
            },
            other => FormState::message(other.to_string()),
        }
    }
}

pub type InvoiceActionResult<T> = std::result::Result<T, InvoiceActionError>;

pub struct InvoicesUseCase<I, P>
where
    I: InvoiceRepository + Send + Sync + 'static,
    P: PageCache + Send + Sync + 'static,
{
    invoice_repository: Arc<I>,
    page_cache: Arc<P>,
}

impl<I, P> InvoicesUseCase<I, P>
where
    I: InvoiceRepository + Send + Sync + 'static,
    P: PageCache + Send + Sync + 'static,
{
    pub fn new(invoice_repository: Arc<I>, page_cache: Arc<P>) -> Self {
        Self {
            invoice_repository,
            page_cache,
        }
    }

    pub async fn create_invoice(&self, input: InvoiceInput) -> InvoiceActionResult<Redirect> {
        info!("invoices: create requested");

        let invoice = input.validate().map_err(|errors| {
            warn!(
                fields = ?errors.keys().collect::<Vec<_>>(),
                status = StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
                "invoices: create rejected by validation"
            );
            InvoiceActionError::ValidationFailed {
                errors,
                message: CREATE_VALIDATION_MESSAGE,
            }
        })?;

        let invoice_id = Uuid::new_v4();
        let date = Utc::now().date_naive();
        let insert_invoice_entity = invoice.to_insert_entity(invoice_id, date);

        debug!(
            %invoice_id,
            customer_id = %insert_invoice_entity.customer_id,
            amount_cents = insert_invoice_entity.amount,
            %date,
            status = %insert_invoice_entity.status,
            "invoices: inserting invoice"
        );

        self.invoice_repository
            .create_invoice(insert_invoice_entity)
            .await
            .map_err(|err| {
                error!(
                    %invoice_id,
                    db_error = ?err,
                    "invoices: failed to create invoice"
                );
                InvoiceActionError::PersistenceFailed(CREATE_DB_MESSAGE)
            })?;

        info!(%invoice_id, "invoices: invoice created");
        self.page_cache.revalidate_path(INVOICES_PATH).await;

        Ok(Redirect::to(INVOICES_PATH))
    }

    pub async fn update_invoice(
        &self,
        invoice_id: Uuid,
        input: InvoiceInput,
    ) -> InvoiceActionResult<Redirect> {
        info!(%invoice_id, "invoices: update requested");

        let invoice = input.validate().map_err(|errors| {
            warn!(
                %invoice_id,
                fields = ?errors.keys().collect::<Vec<_>>(),
                status = StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
                "invoices: update rejected by validation"
            );
            InvoiceActionError::ValidationFailed {
                errors,
                message: UPDATE_VALIDATION_MESSAGE,
            }
        })?;

        let matched = self
            .invoice_repository
            .update_invoice(invoice_id, invoice.to_edit_entity())
            .await
            .map_err(|err| {
                error!(
                    %invoice_id,
                    db_error = ?err,
                    "invoices: failed to update invoice"
                );
                InvoiceActionError::PersistenceFailed(UPDATE_DB_MESSAGE)
            })?;

        if matched == 0 {
            warn!(%invoice_id, "invoices: update matched no invoice");
        } else {
            info!(%invoice_id, "invoices: invoice updated");
        }
        self.page_cache.revalidate_path(INVOICES_PATH).await;

        Ok(Redirect::to(INVOICES_PATH))
    }

    pub async fn delete_invoice(&self, invoice_id: Uuid) -> InvoiceActionResult<()> {
        info!(%invoice_id, "invoices: delete requested");

        let removed = self
            .invoice_repository
            .delete_invoice(invoice_id)
            .await
            .map_err(|err| {
                error!(
                    %invoice_id,
                    db_error = ?err,
                    "invoices: failed to delete invoice"
                );
                InvoiceActionError::PersistenceFailed(DELETE_DB_MESSAGE)
            })?;

        if removed == 0 {
            warn!(%invoice_id, "invoices: delete matched no invoice");
        } else {
            info!(%invoice_id, "invoices: invoice deleted");
        }
        self.page_cache.revalidate_path(INVOICES_PATH).await;

        Ok(())
    }

    /// Rendered invoice list, served from the page cache while it is fresh.
    pub async fn list_invoices(&self) -> InvoiceActionResult<String> {
        let generation = match self.page_cache.lookup(INVOICES_PATH).await {
            PageLookup::Hit(rendered) => {
                debug!("invoices: serving cached invoice list");
                return Ok(rendered);
            }
            PageLookup::Miss { generation } => generation,
        };

        let invoices = self
            .invoice_repository
            .list_invoices()
            .await
            .and_then(|entities| {
                entities
                    .into_iter()
                    .map(InvoiceModel::try_from)
                    .collect::<anyhow::Result<Vec<_>>>()
            })
            .map_err(|err| {
                error!(db_error = ?err, "invoices: failed to list invoices");
                InvoiceActionError::PersistenceFailed(FETCH_DB_MESSAGE)
            })?;

        let rendered = serde_json::to_string(&invoices).map_err(|err| {
            error!(error = ?err, "invoices: failed to render invoice list");
            InvoiceActionError::PersistenceFailed(FETCH_DB_MESSAGE)
        })?;

        info!(invoice_count = invoices.len(), "invoices: invoice list rendered");
        if !self
            .page_cache
            .put_if_fresh(INVOICES_PATH, generation, rendered.clone())
            .await
        {
            debug!("invoices: list changed while rendering, not cached");
        }

        Ok(rendered)
    }

    pub async fn find_invoice(&self, invoice_id: Uuid) -> InvoiceActionResult<InvoiceModel> {
        let entity = self
            .invoice_repository
            .find_by_id(invoice_id)
            .await
            .map_err(|err| {
                error!(
                    %invoice_id,
                    db_error = ?err,
                    "invoices: failed to load invoice"
                );
                InvoiceActionError::PersistenceFailed(FETCH_DB_MESSAGE)
            })?
            .ok_or_else(|| {
                info!(%invoice_id, "invoices: invoice not found");
                InvoiceActionError::NotFound
            })?;

        InvoiceModel::try_from(entity).map_err(|err| {
            error!(%invoice_id, error = ?err, "invoices: stored invoice is malformed");
            InvoiceActionError::PersistenceFailed(FETCH_DB_MESSAGE)
        })
    }
}
