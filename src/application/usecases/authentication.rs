use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::{
    application::interfaces::authenticator::{
        AuthErrorKind, Authenticator, SignInError, SignedInSession,
    },
    domain::value_objects::sessions::{CREDENTIALS_PROVIDER, Credentials},
};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials.";
pub const GENERIC_AUTH_MESSAGE: &str = "Something went wrong.";

#[derive(Debug, Clone, PartialEq)]
pub enum SignInOutcome {
    /// Session established; the client should continue at `to`.
    Redirect { to: String, session: SignedInSession },
    /// Sign-in refused; show this message on the login form.
    Message(&'static str),
}

pub struct AuthenticationUseCase<A>
where
    A: Authenticator + Send + Sync + 'static,
{
    authenticator: Arc<A>,
}

impl<A> AuthenticationUseCase<A>
where
    A: Authenticator + Send + Sync + 'static,
{
    pub fn new(authenticator: Arc<A>) -> Self {
        Self { authenticator }
    }

    /// Known authentication failures become a form message. Anything else is
    /// returned as an error for the caller's error boundary.
    pub async fn authenticate(&self, credentials: Credentials) -> Result<SignInOutcome> {
        let landing_path = credentials.landing_path();

        match self
            .authenticator
            .sign_in(CREDENTIALS_PROVIDER, credentials)
            .await
        {
            Ok(session) => {
                info!(user_id = %session.user_id, "auth: signed in");
                Ok(SignInOutcome::Redirect {
                    to: landing_path,
                    session,
                })
            }
            Err(SignInError::Auth(kind)) => {
                warn!(kind = kind.as_str(), "auth: sign-in refused");
                Ok(SignInOutcome::Message(match kind {
                    AuthErrorKind::CredentialsSignin => INVALID_CREDENTIALS_MESSAGE,
                    _ => GENERIC_AUTH_MESSAGE,
                }))
            }
            Err(SignInError::Other(err)) => {
                error!(error = ?err, "auth: sign-in failed unexpectedly");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::interfaces::authenticator::MockAuthenticator;
    use uuid::Uuid;

    fn credentials() -> Credentials {
        Credentials {
            email: "user@nextmail.com".to_string(),
            password: "123456".to_string(),
            redirect_to: None,
        }
    }

    async fn authenticate_with(
        result: fn() -> std::result::Result<SignedInSession, SignInError>,
    ) -> Result<SignInOutcome> {
        let mut authenticator = MockAuthenticator::new();
        authenticator
            .expect_sign_in()
            .withf(|provider, _| provider == "credentials")
            .times(1)
            .returning(move |_, _| result());

        AuthenticationUseCase::new(Arc::new(authenticator))
            .authenticate(credentials())
            .await
    }

    #[tokio::test]
    async fn maps_credentials_signin_to_invalid_credentials() {
        let outcome =
            authenticate_with(|| Err(SignInError::Auth(AuthErrorKind::CredentialsSignin)))
                .await
                .unwrap();

        assert_eq!(outcome, SignInOutcome::Message("Invalid credentials."));
    }

    #[tokio::test]
    async fn maps_other_auth_kinds_to_a_generic_message() {
        for kind in [
            AuthErrorKind::InvalidProvider,
            AuthErrorKind::CallbackRouteError,
            AuthErrorKind::AccessDenied,
        ] {
            let mut authenticator = MockAuthenticator::new();
            authenticator
                .expect_sign_in()
                .returning(move |_, _| Err(SignInError::Auth(kind)));

            let outcome = AuthenticationUseCase::new(Arc::new(authenticator))
                .authenticate(credentials())
                .await
                .unwrap();

            assert_eq!(outcome, SignInOutcome::Message("Something went wrong."));
        }
    }

    #[tokio::test]
    async fn reraises_unrecognized_failures() {
        let result =
            authenticate_with(|| Err(SignInError::Other(anyhow::anyhow!("signing key missing"))))
                .await;

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "signing key missing");
    }

    #[tokio::test]
    async fn redirects_to_the_dashboard_on_success() {
        let outcome = authenticate_with(|| {
            Ok(SignedInSession {
                user_id: Uuid::nil(),
                token: "token".to_string(),
                max_age_seconds: 60,
            })
        })
        .await
        .unwrap();

        match outcome {
            SignInOutcome::Redirect { to, session } => {
                assert_eq!(to, "/dashboard");
                assert_eq!(session.token, "token");
            }
            other => panic!("expected a redirect, got {other:?}"),
        }
    }
}
