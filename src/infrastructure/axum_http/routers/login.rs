use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::post,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    application::{
        interfaces::authenticator::Authenticator,
        usecases::authentication::{AuthenticationUseCase, SignInOutcome},
    },
    config::{config_loader, config_model::DotEnvyConfig},
    domain::value_objects::{invoices::FormState, sessions::Credentials},
    infrastructure::{
        auth::credentials_provider::CredentialsProvider,
        axum_http::{
            auth::{cleared_session_cookie, session_cookie},
            error_responses::AppError,
        },
        postgres::{postgres_connection::PgPoolSquad, repositories::users::UserPostgres},
    },
};

pub struct LoginState<A>
where
    A: Authenticator + Send + Sync + 'static,
{
    authentication_usecase: AuthenticationUseCase<A>,
    secure_cookies: bool,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let credentials_provider = CredentialsProvider::new(
        Arc::new(user_repository),
        config.session.secret.clone(),
        config.session.ttl_seconds,
    );

    router(
        AuthenticationUseCase::new(Arc::new(credentials_provider)),
        config_loader::get_stage().secure_cookies(),
    )
}

pub fn router<A>(authentication_usecase: AuthenticationUseCase<A>, secure_cookies: bool) -> Router
where
    A: Authenticator + Send + Sync + 'static,
{
    Router::new()
        .route("/login", post(login::<A>))
        .route("/logout", post(logout))
        .with_state(Arc::new(LoginState {
            authentication_usecase,
            secure_cookies,
        }))
}

pub async fn login<A>(
    State(state): State<Arc<LoginState<A>>>,
    jar: CookieJar,
    Form(credentials): Form<Credentials>,
) -> Response
where
    A: Authenticator + Send + Sync + 'static,
{
    match state
        .authentication_usecase
        .authenticate(credentials)
        .await
    {
        Ok(SignInOutcome::Redirect { to, session }) => {
            let cookie = session_cookie(
                session.token,
                session.max_age_seconds,
                state.secure_cookies,
            );
            (jar.add(cookie), Redirect::to(&to)).into_response()
        }
        Ok(SignInOutcome::Message(message)) => {
            (StatusCode::UNAUTHORIZED, Json(FormState::message(message))).into_response()
        }
        Err(err) => AppError::Internal(err).into_response(),
    }
}

pub async fn logout(jar: CookieJar) -> Response {
    (jar.remove(cleared_session_cookie()), Redirect::to("/login")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::interfaces::authenticator::{
        AuthErrorKind, MockAuthenticator, SignInError, SignedInSession,
    };
    use axum::{
        body::{Body, to_bytes},
        http::{
            Request,
            header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        },
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app(authenticator: MockAuthenticator) -> Router {
        router(AuthenticationUseCase::new(Arc::new(authenticator)), true)
    }

    fn login_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/login")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn refused_sign_in_returns_the_message_as_unauthorized() {
        let mut authenticator = MockAuthenticator::new();
        authenticator
            .expect_sign_in()
            .withf(|provider, credentials| {
                provider == "credentials" && credentials.email == "user@nextmail.com"
            })
            .times(1)
            .returning(|_, _| Err(SignInError::Auth(AuthErrorKind::CredentialsSignin)));

        let response = app(authenticator)
            .oneshot(login_request("email=user%40nextmail.com&password=654321"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"message": "Invalid credentials."}));
    }

    #[tokio::test]
    async fn successful_sign_in_sets_the_session_cookie_and_redirects() {
        let mut authenticator = MockAuthenticator::new();
        authenticator.expect_sign_in().times(1).returning(|_, _| {
            Ok(SignedInSession {
                user_id: Uuid::nil(),
                token: "signed-token".to_string(),
                max_age_seconds: 60,
            })
        });

        let response = app(authenticator)
            .oneshot(login_request("email=user%40nextmail.com&password=123456"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/dashboard");
        let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("session=signed-token"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn unexpected_failures_are_server_errors() {
        let mut authenticator = MockAuthenticator::new();
        authenticator
            .expect_sign_in()
            .returning(|_, _| Err(SignInError::Other(anyhow::anyhow!("signing key missing"))));

        let response = app(authenticator)
            .oneshot(login_request("email=user%40nextmail.com&password=123456"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn logout_clears_the_cookie_and_returns_to_login() {
        let request = Request::builder()
            .method("POST")
            .uri("/logout")
            .header(COOKIE, "session=signed-token")
            .body(Body::empty())
            .unwrap();

        let response = app(MockAuthenticator::new()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/login");
        let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
