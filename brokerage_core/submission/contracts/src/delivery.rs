use std::time::Duration;

use brokerage_email_contracts::{SmtpCredentials, SmtpSecurity, SmtpSettings};
use brokerage_models::{email_address::EmailAddressWithName, Sensitive};
use thiserror::Error;

pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Delivery settings as loaded from the configuration. Some values may be
/// missing, which only becomes an error once a mail is about to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_secure: bool,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<Sensitive<String>>,
    pub from: Option<EmailAddressWithName>,
    pub to: Option<EmailAddressWithName>,
    pub cc: Vec<EmailAddressWithName>,
    pub send_timeout: Duration,
    pub verify_connection: bool,
}

/// Complete delivery settings for a single submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailDelivery {
    pub smtp: SmtpSettings,
    pub from: EmailAddressWithName,
    pub to: EmailAddressWithName,
    pub cc: Vec<EmailAddressWithName>,
    /// Test the connection to the smtp server before sending.
    pub verify_connection: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Mail delivery is not configured (missing: {}).", .0.join(", "))]
pub struct MissingDeliveryConfig(pub Vec<&'static str>);

impl DeliveryConfig {
    /// Names of the required configuration keys that have no value.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("email.smtp_host", self.smtp_host.is_none()),
            ("email.smtp_user", self.smtp_user.is_none()),
            ("email.smtp_password", self.smtp_password.is_none()),
            ("email.from", self.from.is_none()),
            ("email.to", self.to.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, missing)| missing.then_some(key))
        .collect()
    }

    pub fn resolve(&self) -> Result<MailDelivery, MissingDeliveryConfig> {
        let (Some(host), Some(user), Some(password), Some(from), Some(to)) = (
            &self.smtp_host,
            &self.smtp_user,
            &self.smtp_password,
            &self.from,
            &self.to,
        ) else {
            return Err(MissingDeliveryConfig(self.missing()));
        };

        Ok(MailDelivery {
            smtp: SmtpSettings {
                host: host.clone(),
                port: self.smtp_port,
                security: if self.smtp_secure {
                    SmtpSecurity::Tls
                } else {
                    SmtpSecurity::StartTls
                },
                credentials: Some(SmtpCredentials {
                    user: user.clone(),
                    password: password.clone(),
                }),
                timeout: self.send_timeout,
            },
            from: from.clone(),
            to: to.clone(),
            cc: self.cc.clone(),
            verify_connection: self.verify_connection,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn config() -> DeliveryConfig {
        DeliveryConfig {
            smtp_host: Some("smtp.example.com".into()),
            smtp_port: 465,
            smtp_secure: true,
            smtp_user: Some("admin@example.com".into()),
            smtp_password: Some("secret".to_owned().into()),
            from: Some("IPv4 Brokerage <admin@example.com>".parse().unwrap()),
            to: Some("ipv4@example.com".parse().unwrap()),
            cc: vec!["sales@example.com".parse().unwrap()],
            send_timeout: Duration::from_secs(30),
            verify_connection: false,
        }
    }

    #[test]
    fn resolve_complete() {
        let result = config().resolve().unwrap();

        assert_eq!(
            result.smtp,
            SmtpSettings {
                host: "smtp.example.com".into(),
                port: 465,
                security: SmtpSecurity::Tls,
                credentials: Some(SmtpCredentials {
                    user: "admin@example.com".into(),
                    password: "secret".to_owned().into(),
                }),
                timeout: Duration::from_secs(30),
            }
        );
        assert_eq!(result.to.email(), "ipv4@example.com");
        assert_eq!(result.cc.len(), 1);
    }

    #[test]
    fn resolve_insecure_uses_starttls() {
        let result = DeliveryConfig {
            smtp_secure: false,
            smtp_port: DEFAULT_SMTP_PORT,
            ..config()
        }
        .resolve()
        .unwrap();

        assert_eq!(result.smtp.security, SmtpSecurity::StartTls);
        assert_eq!(result.smtp.port, 587);
    }

    #[test]
    fn resolve_incomplete() {
        // Arrange
        let config = DeliveryConfig {
            smtp_password: None,
            to: None,
            ..config()
        };

        // Act
        let result = config.resolve();

        // Assert
        let err = result.unwrap_err();
        assert_eq!(err.0, ["email.smtp_password", "email.to"]);
        assert_eq!(
            err.to_string(),
            "Mail delivery is not configured (missing: email.smtp_password, email.to)."
        );
    }

    #[test]
    fn missing_nothing() {
        assert!(config().missing().is_empty());
    }
}
