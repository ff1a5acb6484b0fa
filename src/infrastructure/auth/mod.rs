pub mod credentials_provider;
pub mod passwords;
pub mod session_tokens;
