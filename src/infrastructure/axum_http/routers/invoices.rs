use std::{collections::HashMap, sync::Arc};

use axum::{
    Form, Json, Router, async_trait,
    extract::{FromRef, FromRequest, Path, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::{
    application::{interfaces::page_cache::PageCache, usecases::invoices::InvoicesUseCase},
    domain::{repositories::invoices::InvoiceRepository, value_objects::invoices::InvoiceInput},
    infrastructure::{
        axum_http::auth::{AuthUser, SessionKeys},
        cache::in_memory_page_cache::InMemoryPageCache,
        postgres::{postgres_connection::PgPoolSquad, repositories::invoices::InvoicePostgres},
    },
};

pub struct InvoicesState<I, P>
where
    I: InvoiceRepository + Send + Sync + 'static,
    P: PageCache + Send + Sync + 'static,
{
    invoices_usecase: Arc<InvoicesUseCase<I, P>>,
    session_keys: SessionKeys,
}

impl<I, P> Clone for InvoicesState<I, P>
where
    I: InvoiceRepository + Send + Sync + 'static,
    P: PageCache + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            invoices_usecase: Arc::clone(&self.invoices_usecase),
            session_keys: self.session_keys.clone(),
        }
    }
}

impl<I, P> FromRef<InvoicesState<I, P>> for SessionKeys
where
    I: InvoiceRepository + Send + Sync + 'static,
    P: PageCache + Send + Sync + 'static,
{
    fn from_ref(state: &InvoicesState<I, P>) -> Self {
        state.session_keys.clone()
    }
}

/// Invoice form body: urlencoded, or a JSON object when the request says so.
pub struct InvoiceSubmission(pub InvoiceInput);

#[async_trait]
impl<S> FromRequest<S> for InvoiceSubmission
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| content_type.starts_with("application/json"));

        if is_json {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(InvoiceInput::from_json(value)))
        } else {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(InvoiceInput::from_form(fields)))
        }
    }
}

pub fn routes(
    db_pool: Arc<PgPoolSquad>,
    page_cache: Arc<InMemoryPageCache>,
    session_keys: SessionKeys,
) -> Router {
    let invoice_repository = InvoicePostgres::new(Arc::clone(&db_pool));
    let invoices_usecase = InvoicesUseCase::new(Arc::new(invoice_repository), page_cache);

    router(Arc::new(invoices_usecase), session_keys)
}

pub fn router<I, P>(
    invoices_usecase: Arc<InvoicesUseCase<I, P>>,
    session_keys: SessionKeys,
) -> Router
where
    I: InvoiceRepository + Send + Sync + 'static,
    P: PageCache + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list::<I, P>).post(create::<I, P>))
        .route("/:id", get(find::<I, P>))
        .route("/:id/edit", post(update::<I, P>))
        .route("/:id/delete", post(delete::<I, P>))
        .with_state(InvoicesState {
            invoices_usecase,
            session_keys,
        })
}

pub async fn list<I, P>(State(state): State<InvoicesState<I, P>>, _auth: AuthUser) -> Response
where
    I: InvoiceRepository + Send + Sync + 'static,
    P: PageCache + Send + Sync + 'static,
{
    match state.invoices_usecase.list_invoices().await {
        Ok(rendered) => ([(CONTENT_TYPE, "application/json")], rendered).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn find<I, P>(
    State(state): State<InvoicesState<I, P>>,
    _auth: AuthUser,
    Path(invoice_id): Path<Uuid>,
) -> Response
where
    I: InvoiceRepository + Send + Sync + 'static,
    P: PageCache + Send + Sync + 'static,
{
    match state.invoices_usecase.find_invoice(invoice_id).await {
        Ok(invoice) => Json(invoice).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn create<I, P>(
    State(state): State<InvoicesState<I, P>>,
    AuthUser { user_id, .. }: AuthUser,
    InvoiceSubmission(input): InvoiceSubmission,
) -> Response
where
    I: InvoiceRepository + Send + Sync + 'static,
    P: PageCache + Send + Sync + 'static,
{
    info!(%user_id, "invoices: create form received");
    match state.invoices_usecase.create_invoice(input).await {
        Ok(redirect) => Redirect::to(&redirect.to).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update<I, P>(
    State(state): State<InvoicesState<I, P>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(invoice_id): Path<Uuid>,
    InvoiceSubmission(input): InvoiceSubmission,
) -> Response
where
    I: InvoiceRepository + Send + Sync + 'static,
    P: PageCache + Send + Sync + 'static,
{
    info!(%user_id, %invoice_id, "invoices: edit form received");
    match state.invoices_usecase.update_invoice(invoice_id, input).await {
        Ok(redirect) => Redirect::to(&redirect.to).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete<I, P>(
    State(state): State<InvoicesState<I, P>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(invoice_id): Path<Uuid>,
) -> Response
where
    I: InvoiceRepository + Send + Sync + 'static,
    P: PageCache + Send + Sync + 'static,
{
    info!(%user_id, %invoice_id, "invoices: delete requested");
    match state.invoices_usecase.delete_invoice(invoice_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::interfaces::page_cache::{MockPageCache, PageLookup},
        domain::{
            repositories::invoices::MockInvoiceRepository, value_objects::invoices::INVOICES_PATH,
        },
        infrastructure::auth::session_tokens::issue_session_token,
    };
    use axum::{
        body::{Body, to_bytes},
        http::{
            Request,
            header::{COOKIE, LOCATION},
        },
    };
    use serde_json::json;
    use tower::ServiceExt;

    const SECRET: &str = "supersecretsessionsecretforunittesting123";

    fn app(invoice_repository: MockInvoiceRepository, page_cache: MockPageCache) -> Router {
        let invoices_usecase =
            InvoicesUseCase::new(Arc::new(invoice_repository), Arc::new(page_cache));
        Router::new().nest(
            INVOICES_PATH,
            router(Arc::new(invoices_usecase), SessionKeys::new(SECRET)),
        )
    }

    fn session_cookie() -> String {
        let token = issue_session_token(Uuid::new_v4(), "user@nextmail.com", SECRET, 3600).unwrap();
        format!("session={token}")
    }

    fn post_request(uri: &str, content_type: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(COOKIE, session_cookie())
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        post_request(uri, "application/x-www-form-urlencoded", body)
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn expect_revalidation(page_cache: &mut MockPageCache) {
        page_cache
            .expect_revalidate_path()
            .withf(|path| path == INVOICES_PATH)
            .times(1)
            .return_const(());
    }

    #[tokio::test]
    async fn create_redirects_to_the_invoice_list() {
        let mut invoice_repository = MockInvoiceRepository::new();
        let mut page_cache = MockPageCache::new();
        invoice_repository
            .expect_create_invoice()
            .withf(|invoice| invoice.customer_id == "c1" && invoice.amount == 25000)
            .times(1)
            .returning(|invoice| Ok(invoice.id));
        expect_revalidation(&mut page_cache);

        let response = app(invoice_repository, page_cache)
            .oneshot(post_form(
                "/dashboard/invoices",
                "customerId=c1&amount=250.00&status=pending",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/dashboard/invoices");
    }

    #[tokio::test]
    async fn create_accepts_a_json_body() {
        let mut invoice_repository = MockInvoiceRepository::new();
        let mut page_cache = MockPageCache::new();
        invoice_repository
            .expect_create_invoice()
            .withf(|invoice| invoice.amount == 1250 && invoice.status == "paid")
            .times(1)
            .returning(|invoice| Ok(invoice.id));
        expect_revalidation(&mut page_cache);

        let body = json!({"customerId": "c1", "amount": 12.5, "status": "paid"}).to_string();
        let response = app(invoice_repository, page_cache)
            .oneshot(post_request("/dashboard/invoices", "application/json", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/dashboard/invoices");
    }

    #[tokio::test]
    async fn create_validation_failure_returns_the_form_state() {
        let invoice_repository = MockInvoiceRepository::new();
        let page_cache = MockPageCache::new();

        let response = app(invoice_repository, page_cache)
            .oneshot(post_form("/dashboard/invoices", "amount=-1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            json_body(response).await,
            json!({
                "errors": {
                    "amount": ["Positive dollar amount"],
                    "customerId": ["A customer is required"],
                    "status": ["Select an invoice status"]
                },
                "message": "Missing Fields. Failed to Create Invoice."
            })
        );
    }

    #[tokio::test]
    async fn create_database_failure_returns_only_the_message() {
        let mut invoice_repository = MockInvoiceRepository::new();
        let page_cache = MockPageCache::new();
        invoice_repository
            .expect_create_invoice()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));

        let response = app(invoice_repository, page_cache)
            .oneshot(post_form(
                "/dashboard/invoices",
                "customerId=c1&amount=250.00&status=pending",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"message": "Database Error: Failed to create invoice"})
        );
    }

    #[tokio::test]
    async fn edit_redirects_to_the_invoice_list() {
        let invoice_id = Uuid::new_v4();
        let mut invoice_repository = MockInvoiceRepository::new();
        let mut page_cache = MockPageCache::new();
        invoice_repository
            .expect_update_invoice()
            .withf(move |id, invoice| *id == invoice_id && invoice.amount == 1999)
            .times(1)
            .returning(|_, _| Ok(1));
        expect_revalidation(&mut page_cache);

        let response = app(invoice_repository, page_cache)
            .oneshot(post_form(
                &format!("/dashboard/invoices/{invoice_id}/edit"),
                "customerId=c2&amount=19.99&status=paid",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/dashboard/invoices");
    }

    #[tokio::test]
    async fn edit_validation_failure_uses_the_update_message() {
        let invoice_repository = MockInvoiceRepository::new();
        let page_cache = MockPageCache::new();

        let response = app(invoice_repository, page_cache)
            .oneshot(post_form(
                &format!("/dashboard/invoices/{}/edit", Uuid::new_v4()),
                "customerId=c2&amount=abc&status=paid",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            json_body(response).await,
            json!({
                "errors": {"amount": ["Positive dollar amount"]},
                "message": "Missing Fields. Failed to Update Invoice."
            })
        );
    }

    #[tokio::test]
    async fn delete_returns_no_content() {
        let invoice_id = Uuid::new_v4();
        let mut invoice_repository = MockInvoiceRepository::new();
        let mut page_cache = MockPageCache::new();
        invoice_repository
            .expect_delete_invoice()
            .withf(move |id| *id == invoice_id)
            .times(1)
            .returning(|_| Ok(1));
        expect_revalidation(&mut page_cache);

        let response = app(invoice_repository, page_cache)
            .oneshot(post_form(
                &format!("/dashboard/invoices/{invoice_id}/delete"),
                "",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn list_serves_the_rendered_page_as_json() {
        let invoice_repository = MockInvoiceRepository::new();
        let mut page_cache = MockPageCache::new();
        page_cache
            .expect_lookup()
            .returning(|_| PageLookup::Hit("[]".to_string()));

        let request = Request::builder()
            .uri("/dashboard/invoices")
            .header(COOKIE, session_cookie())
            .body(Body::empty())
            .unwrap();
        let response = app(invoice_repository, page_cache)
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(json_body(response).await, json!([]));
    }

    #[tokio::test]
    async fn requests_without_a_session_are_unauthorized() {
        let invoice_repository = MockInvoiceRepository::new();
        let page_cache = MockPageCache::new();

        let request = Request::builder()
            .method("POST")
            .uri("/dashboard/invoices")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("customerId=c1&amount=1&status=paid"))
            .unwrap();
        let response = app(invoice_repository, page_cache)
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
