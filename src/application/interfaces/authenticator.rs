use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::domain::value_objects::sessions::Credentials;

/// Failure kinds the sign-in flow knows how to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    CredentialsSignin,
    InvalidProvider,
    CallbackRouteError,
    AccessDenied,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorKind::CredentialsSignin => "CredentialsSignin",
            AuthErrorKind::InvalidProvider => "InvalidProvider",
            AuthErrorKind::CallbackRouteError => "CallbackRouteError",
            AuthErrorKind::AccessDenied => "AccessDenied",
        }
    }
}

#[derive(Debug, Error)]
pub enum SignInError {
    #[error("authentication failed: {}", .0.as_str())]
    Auth(AuthErrorKind),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignedInSession {
    pub user_id: uuid::Uuid,
    pub token: String,
    pub max_age_seconds: u64,
}

#[automock]
#[async_trait]
pub trait Authenticator {
    async fn sign_in(
        &self,
        provider: &str,
        credentials: Credentials,
    ) -> Result<SignedInSession, SignInError>;
}
