use diesel::prelude::*;

use crate::infrastructure::postgres::schema::customers;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = customers)]
pub struct CustomerEntity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
}
