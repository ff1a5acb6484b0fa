pub mod auth;
pub mod axum_http;
pub mod cache;
pub mod postgres;
