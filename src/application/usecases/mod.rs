pub mod authentication;
pub mod customers;
pub mod invoices;

/// Tells the HTTP layer to stop rendering and send the client elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
}

impl Redirect {
    pub fn to(path: impl Into<String>) -> Self {
        Self { to: path.into() }
    }
}
