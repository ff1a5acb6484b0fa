use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use crate::domain::{
    repositories::customers::CustomerRepository, value_objects::customers::CustomerModel,
};

pub struct CustomersUseCase<C>
where
    C: CustomerRepository + Send + Sync + 'static,
{
    customer_repository: Arc<C>,
}

impl<C> CustomersUseCase<C>
where
    C: CustomerRepository + Send + Sync + 'static,
{
    pub fn new(customer_repository: Arc<C>) -> Self {
        Self {
            customer_repository,
        }
    }

    /// Options for the customer select, ordered by name.
    pub async fn list_customers(&self) -> Result<Vec<CustomerModel>> {
        let customers = self
            .customer_repository
            .list_customers()
            .await
            .map_err(|err| {
                error!(db_error = ?err, "customers: failed to list customers");
                err
            })?;

        info!(customer_count = customers.len(), "customers: customers loaded");
        Ok(customers.into_iter().map(CustomerModel::from).collect())
    }
}
