use std::{future::Future, time::Duration};

use brokerage_models::{email_address::EmailAddressWithName, submission::DeliveryId, Sensitive};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailService: Send + Sync + 'static {
    /// Make exactly one attempt to deliver `email` through the given smtp
    /// server and wait for its acknowledgment.
    ///
    /// On success, returns the delivery identifier reported by the server, if
    /// any.
    fn send(
        &self,
        email: Email,
        smtp: &SmtpSettings,
    ) -> impl Future<Output = Result<Option<DeliveryId>, EmailSendError>> + Send;

    /// Connect (and authenticate) to the given smtp server without sending
    /// anything.
    fn ping(&self, smtp: &SmtpSettings) -> impl Future<Output = Result<(), EmailSendError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: EmailAddressWithName,
    pub recipient: EmailAddressWithName,
    pub cc: Vec<EmailAddressWithName>,
    pub reply_to: Option<EmailAddressWithName>,
    pub subject: String,
    pub body: EmailBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailBody {
    Text(String),
    Html(String),
    /// `multipart/alternative` with a plain text and an html part.
    Alternative { text: String, html: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    pub credentials: Option<SmtpCredentials>,
    /// Upper bound for a whole delivery attempt, including connecting and
    /// authenticating.
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// Implicit TLS from the first byte (usually port 465).
    Tls,
    /// Upgrade to TLS via STARTTLS if the server offers it (usually port
    /// 587).
    StartTls,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    pub user: String,
    pub password: Sensitive<String>,
}

#[derive(Debug, Error)]
pub enum EmailSendError {
    #[error("The smtp server could not be reached.")]
    Unreachable(#[source] anyhow::Error),
    #[error("The smtp server rejected the credentials.")]
    AuthenticationRejected(#[source] anyhow::Error),
    #[error("The smtp server rejected the message.")]
    Rejected(#[source] anyhow::Error),
    #[error("The smtp server did not respond in time.")]
    Timeout,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_send(
        mut self,
        email: Email,
        smtp: SmtpSettings,
        result: Result<Option<DeliveryId>, EmailSendError>,
    ) -> Self {
        self.expect_send()
            .once()
            .with(
                mockall::predicate::eq(email),
                mockall::predicate::eq(smtp),
            )
            .return_once(move |_, _| Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_ping(mut self, smtp: SmtpSettings, result: Result<(), EmailSendError>) -> Self {
        self.expect_ping()
            .once()
            .with(mockall::predicate::eq(smtp))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
