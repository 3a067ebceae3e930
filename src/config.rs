//! Mail account configuration read from the process environment.
//!
//! Validation is a pure function over a key lookup so it can be exercised
//! without touching the real environment. Deciding to exit the process is
//! left to `main`.

use std::fmt;
use thiserror::Error;

/// Default SMTP submission host.
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Default SMTP submission port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

pub const SENDER_VAR: &str = "EMAIL_SENDER";
pub const SECRET_VAR: &str = "EMAIL_PASSWORD";
pub const RECEIVER_VAR: &str = "EMAIL_RECEIVER";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

/// Everything needed to open one authenticated SMTP session.
#[derive(Clone)]
pub struct MailCredentials {
    pub sender: String,
    pub secret: String,
    pub receiver: String,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl MailCredentials {
    /// Build credentials from `lookup`, reporting every missing key at once.
    ///
    /// A key whose value is blank counts as missing.
    pub fn from_lookup<L>(lookup: L, smtp_host: &str, smtp_port: u16) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        match (read(SENDER_VAR), read(SECRET_VAR), read(RECEIVER_VAR)) {
            (Some(sender), Some(secret), Some(receiver)) => Ok(Self {
                sender,
                secret,
                receiver,
                smtp_host: smtp_host.to_string(),
                smtp_port,
            }),
            (sender, secret, receiver) => Err(ConfigError::Missing(
                [
                    (SENDER_VAR, sender.is_none()),
                    (SECRET_VAR, secret.is_none()),
                    (RECEIVER_VAR, receiver.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, missing)| missing.then_some(key))
                .collect(),
            )),
        }
    }
}

impl fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailCredentials")
            .field("sender", &"<redacted>")
            .field("secret", &"<redacted>")
            .field("receiver", &"<redacted>")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}
