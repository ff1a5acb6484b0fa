use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::customers::CustomerEntity;

#[automock]
#[async_trait]
pub trait CustomerRepository {
    async fn list_customers(&self) -> Result<Vec<CustomerEntity>>;
}
