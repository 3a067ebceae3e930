//! Delivers the rendered digest over authenticated SMTP.

use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::response::{Category, Code, Detail, Severity};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::config::MailCredentials;

/// Anything that can deliver one digest email.
pub trait DigestMailer {
    /// Send one plain-text message. `true` only if the server accepted it.
    async fn send(&self, subject: &str, body: &str, credentials: &MailCredentials) -> bool;
}

impl<T: DigestMailer> DigestMailer for &T {
    async fn send(&self, subject: &str, body: &str, credentials: &MailCredentials) -> bool {
        (**self).send(subject, body, credentials).await
    }
}

#[derive(Debug, Error)]
enum SendError {
    #[error("invalid {role} address: {source}")]
    Address {
        role: &'static str,
        source: lettre::address::AddressError,
    },
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error(transparent)]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// [`DigestMailer`] speaking SMTP with a STARTTLS upgrade and password login.
///
/// A fresh connection is opened for every message and closed when the
/// transport is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpMailer;

impl SmtpMailer {
    async fn try_send(
        &self,
        subject: &str,
        body: &str,
        credentials: &MailCredentials,
    ) -> Result<(), SendError> {
        let from = mailbox("sender", &credentials.sender)?;
        let to = mailbox("receiver", &credentials.receiver)?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        let login = Credentials::new(credentials.sender.clone(), credentials.secret.clone());
        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&credentials.smtp_host)?
                .port(credentials.smtp_port)
                .credentials(login)
                .build();

        info!("Connecting to SMTP server");
        AsyncTransport::send(&mailer, email).await?;
        Ok(())
    }
}

impl DigestMailer for SmtpMailer {
    #[instrument(
        level = "info",
        skip_all,
        fields(host = %credentials.smtp_host, port = credentials.smtp_port)
    )]
    async fn send(&self, subject: &str, body: &str, credentials: &MailCredentials) -> bool {
        match self.try_send(subject, body, credentials).await {
            Ok(()) => {
                info!("Email sent successfully");
                true
            }
            Err(SendError::Smtp(ref e)) if is_auth_failure(e.status()) => {
                error!(
                    error = %e,
                    "SMTP authentication failed; check the sender address and password"
                );
                error!("Gmail accounts need an app password, not the regular account password");
                false
            }
            Err(e) => {
                error!(error = %e, "Error sending email");
                false
            }
        }
    }
}

fn mailbox(role: &'static str, address: &str) -> Result<Mailbox, SendError> {
    address
        .parse()
        .map_err(|source| SendError::Address { role, source })
}

/// SMTP reply 535: authentication credentials invalid.
const AUTH_REJECTED: Code = Code {
    severity: Severity::PermanentNegativeCompletion,
    category: Category::Unspecified3,
    detail: Detail::Five,
};

fn is_auth_failure(status: Option<Code>) -> bool {
    status == Some(AUTH_REJECTED)
}
