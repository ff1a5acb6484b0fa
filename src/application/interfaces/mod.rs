pub mod authenticator;
pub mod page_cache;
