use secrecy::SecretString;

/// HTTP Basic credentials for the Grapevine API.
///
/// The password stays wrapped in a [`SecretString`] so it never shows up
/// in `Debug` output or logs. Only the transport exposes it, at the moment
/// the `Authorization` header is built.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }
}
