use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::{
    application::interfaces::authenticator::{
        AuthErrorKind, Authenticator, SignInError, SignedInSession,
    },
    domain::{
        repositories::users::UserRepository,
        value_objects::sessions::{CREDENTIALS_PROVIDER, Credentials},
    },
    infrastructure::auth::{passwords::verify_password, session_tokens::issue_session_token},
};

/// Email + password sign-in against the `users` table.
pub struct CredentialsProvider<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repository: Arc<U>,
    session_secret: String,
    session_ttl_seconds: u64,
}

impl<U> CredentialsProvider<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repository: Arc<U>, session_secret: String, session_ttl_seconds: u64) -> Self {
        Self {
            user_repository,
            session_secret,
            session_ttl_seconds,
        }
    }
}

#[async_trait]
impl<U> Authenticator for CredentialsProvider<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    async fn sign_in(
        &self,
        provider: &str,
        credentials: Credentials,
    ) -> Result<SignedInSession, SignInError> {
        if provider != CREDENTIALS_PROVIDER {
            return Err(SignInError::Auth(AuthErrorKind::InvalidProvider));
        }
        if !credentials.is_well_formed() {
            debug!("auth: credentials failed the shape check");
            return Err(SignInError::Auth(AuthErrorKind::CredentialsSignin));
        }

        let email = credentials.email.trim();
        let user = self
            .user_repository
            .find_by_email(email)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "auth: failed to load user");
                SignInError::Auth(AuthErrorKind::CallbackRouteError)
            })?
            .ok_or(SignInError::Auth(AuthErrorKind::CredentialsSignin))?;

        let password_matches =
            verify_password(&credentials.password, &user.password).map_err(|err| {
                error!(user_id = %user.id, error = ?err, "auth: unusable password hash");
                SignInError::Auth(AuthErrorKind::CallbackRouteError)
            })?;
        if !password_matches {
            return Err(SignInError::Auth(AuthErrorKind::CredentialsSignin));
        }

        let token = issue_session_token(
            user.id,
            &user.email,
            &self.session_secret,
            self.session_ttl_seconds,
        )?;

        Ok(SignedInSession {
            user_id: user.id,
            token,
            max_age_seconds: self.session_ttl_seconds,
        })
    }
}
