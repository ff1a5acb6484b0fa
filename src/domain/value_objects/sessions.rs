use serde::{Deserialize, Serialize};

pub const SESSION_COOKIE: &str = "session";
pub const CREDENTIALS_PROVIDER: &str = "credentials";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Where to send the user after a successful sign-in.
    #[serde(default, rename = "redirectTo", skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

impl Credentials {
    /// Shape check done before any lookup: `local@domain.tld` and a password
    /// of at least six characters.
    pub fn is_well_formed(&self) -> bool {
        let email = self.email.trim();
        let has_email_shape = match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.'),
            None => false,
        };
        has_email_shape && self.password.chars().count() >= 6
    }

    /// Only same-site absolute paths are honoured.
    pub fn landing_path(&self) -> String {
        match self.redirect_to.as_deref() {
            Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
            _ => DASHBOARD_PATH.to_string(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("redirect_to", &self.redirect_to)
            .finish()
    }
}
