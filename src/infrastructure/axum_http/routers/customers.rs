use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    application::usecases::customers::CustomersUseCase,
    domain::repositories::customers::CustomerRepository,
    infrastructure::{
        axum_http::{
            auth::{AuthUser, SessionKeys},
            error_responses::AppError,
        },
        postgres::{postgres_connection::PgPoolSquad, repositories::customers::CustomerPostgres},
    },
};

pub struct CustomersState<C>
where
    C: CustomerRepository + Send + Sync + 'static,
{
    customers_usecase: Arc<CustomersUseCase<C>>,
    session_keys: SessionKeys,
}

impl<C> Clone for CustomersState<C>
where
    C: CustomerRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            customers_usecase: Arc::clone(&self.customers_usecase),
            session_keys: self.session_keys.clone(),
        }
    }
}

impl<C> FromRef<CustomersState<C>> for SessionKeys
where
    C: CustomerRepository + Send + Sync + 'static,
{
    fn from_ref(state: &CustomersState<C>) -> Self {
        state.session_keys.clone()
    }
}

pub fn routes(db_pool: Arc<PgPoolSquad>, session_keys: SessionKeys) -> Router {
    let customer_repository = CustomerPostgres::new(Arc::clone(&db_pool));
    let customers_usecase = CustomersUseCase::new(Arc::new(customer_repository));

    router(Arc::new(customers_usecase), session_keys)
}

pub fn router<C>(customers_usecase: Arc<CustomersUseCase<C>>, session_keys: SessionKeys) -> Router
where
    C: CustomerRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list::<C>))
        .with_state(CustomersState {
            customers_usecase,
            session_keys,
        })
}

pub async fn list<C>(State(state): State<CustomersState<C>>, _auth: AuthUser) -> Response
where
    C: CustomerRepository + Send + Sync + 'static,
{
    match state.customers_usecase.list_customers().await {
        Ok(customers) => Json(customers).into_response(),
        Err(err) => AppError::Internal(err).into_response(),
    }
}
