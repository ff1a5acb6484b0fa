use serde::{Deserialize, Serialize};

use crate::domain::entities::customers::CustomerEntity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerModel {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
}

impl From<CustomerEntity> for CustomerModel {
    fn from(entity: CustomerEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            image_url: entity.image_url,
        }
    }
}
