use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use std::sync::Arc;

use crate::{
    domain::{entities::customers::CustomerEntity, repositories::customers::CustomerRepository},
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::customers},
};

pub struct CustomerPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CustomerPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CustomerRepository for CustomerPostgres {
    async fn list_customers(&self) -> Result<Vec<CustomerEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let customers = customers::table
            .select(CustomerEntity::as_select())
            .order(customers::name.asc())
            .load::<CustomerEntity>(&mut conn)?;

        Ok(customers)
    }
}
