use anyhow::{Context, Result, bail};

use super::{
    config_model::{Database, DotEnvyConfig, Server, Session},
    stage::Stage,
};

const DEFAULT_SESSION_TTL_SECONDS: u64 = 60 * 60 * 24;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .context("SERVER_PORT is invalid")?
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .context("SERVER_BODY_LIMIT is invalid")?
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .context("SERVER_TIMEOUT is invalid")?
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").context("DATABASE_URL is invalid")?,
    };

    let session = Session {
        secret: std::env::var("AUTH_SECRET").context("AUTH_SECRET is invalid")?,
        ttl_seconds: parse_session_ttl(std::env::var("SESSION_TTL_SECONDS").ok().as_deref())?,
    };

    Ok(DotEnvyConfig {
        server,
        database,
        session,
    })
}

/// Unset means one day. The value must be positive and fit a signed cookie
/// max-age.
fn parse_session_ttl(raw: Option<&str>) -> Result<u64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_SESSION_TTL_SECONDS);
    };

    let ttl_seconds: u64 = raw.trim().parse().context("SESSION_TTL_SECONDS is invalid")?;
    if ttl_seconds == 0 || i64::try_from(ttl_seconds).is_err() {
        bail!("SESSION_TTL_SECONDS must be between 1 and {}", i64::MAX);
    }
    Ok(ttl_seconds)
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}
