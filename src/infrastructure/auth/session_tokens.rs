use anyhow::{Result, anyhow};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::domain::value_objects::sessions::SessionClaims;

pub fn issue_session_token(
    user_id: Uuid,
    email: &str,
    secret: &str,
    ttl_seconds: u64,
) -> Result<String> {
    let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
    let exp = now
        .checked_add(ttl_seconds)
        .and_then(|exp| usize::try_from(exp).ok())
        .ok_or_else(|| anyhow!("Session lifetime of {}s overflows the expiry", ttl_seconds))?;
    let claims = SessionClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| anyhow!("Session token encoding failed: {}", e))
}

pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<SessionClaims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow!("Session token validation failed: {}", e))?;

    Ok(token_data.claims)
}
