use anyhow::anyhow;
use brokerage_email_contracts::{
    Email, EmailBody, EmailSendError, EmailService, SmtpSecurity, SmtpSettings,
};
use brokerage_models::{email_address::EmailAddressWithName, submission::DeliveryId};
use brokerage_utils::Apply;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, warn};

/// Reply codes the server uses to refuse authentication.
const AUTH_REJECTED_CODES: &[&str] = &["454", "530", "534", "535"];

/// Smtp transport that opens a fresh connection for every delivery attempt.
/// The server to use is passed with every call, so one instance serves any
/// configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailServiceImpl;

impl EmailService for EmailServiceImpl {
    async fn send(
        &self,
        email: Email,
        smtp: &SmtpSettings,
    ) -> Result<Option<DeliveryId>, EmailSendError> {
        let message = build_message(email)?;
        let transport = transport(smtp)?;

        debug!(host = %smtp.host, port = smtp.port, "sending email");
        let response = tokio::time::timeout(smtp.timeout, transport.send(message))
            .await
            .map_err(|_| EmailSendError::Timeout)?
            .map_err(classify)?;

        if !response.is_positive() {
            return Err(EmailSendError::Rejected(anyhow!(
                "smtp server responded with {}",
                response.code()
            )));
        }

        let delivery_id = response.first_line().and_then(parse_delivery_id);
        debug!(?delivery_id, "email accepted by smtp server");
        Ok(delivery_id)
    }

    async fn ping(&self, smtp: &SmtpSettings) -> Result<(), EmailSendError> {
        let transport = transport(smtp)?;

        let ok = tokio::time::timeout(smtp.timeout, transport.test_connection())
            .await
            .map_err(|_| EmailSendError::Timeout)?
            .map_err(classify)?;

        ok.then_some(()).ok_or_else(|| {
            EmailSendError::Unreachable(anyhow!("Failed to ping smtp server {}", smtp.host))
        })
    }
}

fn transport(smtp: &SmtpSettings) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailSendError> {
    let builder = match smtp.security {
        SmtpSecurity::Tls => {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host).map_err(classify)?
        }
        SmtpSecurity::StartTls => {
            let parameters = TlsParameters::new(smtp.host.clone()).map_err(classify)?;
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.host)
                .tls(Tls::Opportunistic(parameters))
        }
    };

    Ok(builder
        .port(smtp.port)
        .timeout(Some(smtp.timeout))
        .apply_map(smtp.credentials.as_ref(), |builder, credentials| {
            builder.credentials(Credentials::new(
                credentials.user.clone(),
                (*credentials.password).clone(),
            ))
        })
        .build())
}

/// Builds the lettre message for `email`. Mailboxes whose display name cannot
/// be written to a header line are refused.
pub fn build_message(email: Email) -> Result<Message, EmailSendError> {
    let cc = email
        .cc
        .into_iter()
        .map(header_mailbox)
        .collect::<Result<Vec<_>, _>>()?;
    let reply_to = email.reply_to.map(header_mailbox).transpose()?;

    let builder = Message::builder()
        .from(header_mailbox(email.from)?)
        .to(header_mailbox(email.recipient)?)
        .apply_each(cc, |builder, cc| builder.cc(cc))
        .apply_map(reply_to, |builder, reply_to| builder.reply_to(reply_to))
        .subject(email.subject);

    let message = match email.body {
        EmailBody::Text(text) => builder.header(ContentType::TEXT_PLAIN).body(text),
        EmailBody::Html(html) => builder.header(ContentType::TEXT_HTML).body(html),
        EmailBody::Alternative { text, html } => {
            builder.multipart(MultiPart::alternative_plain_html(text, html))
        }
    };

    message.map_err(|err| EmailSendError::Other(anyhow!(err).context("Failed to build email")))
}

fn header_mailbox(address: EmailAddressWithName) -> Result<Mailbox, EmailSendError> {
    match address.name() {
        Some(name) if name.chars().any(char::is_control) => Err(EmailSendError::Other(anyhow!(
            "Display name of {} contains control characters",
            address.email()
        ))),
        _ => Ok(address.0),
    }
}

fn classify(err: lettre::transport::smtp::Error) -> EmailSendError {
    if err.is_timeout() {
        return EmailSendError::Timeout;
    }

    let code = err.status().map(|code| code.to_string());
    match code.as_deref() {
        Some(code) if AUTH_REJECTED_CODES.contains(&code) => {
            EmailSendError::AuthenticationRejected(err.into())
        }
        Some(_) if err.is_permanent() => EmailSendError::Rejected(err.into()),
        _ => {
            warn!("smtp transport error: {err}");
            EmailSendError::Unreachable(err.into())
        }
    }
}

/// Extracts the queue id from a final `250` response like
/// `2.0.0 Ok: queued as 4ZxY1p0Q2Sz9sVb`. Servers that do not report a queue
/// id are identified by the whole response line instead.
fn parse_delivery_id(line: &str) -> Option<DeliveryId> {
    let line = line.trim();
    let id = match line.split_once("queued as") {
        Some((_, rest)) => rest.split_whitespace().next().unwrap_or_default(),
        None => line,
    };
    (!id.is_empty()).then(|| DeliveryId::from(id.to_owned()))
}

#[cfg(test)]
mod tests {
    use brokerage_models::email_address::EmailAddress;
    use brokerage_utils::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    fn mailbox(s: &str) -> EmailAddressWithName {
        s.parse().unwrap()
    }

    fn email(body: EmailBody) -> Email {
        Email {
            from: mailbox("IPv4 Brokerage <admin@example.com>"),
            recipient: mailbox("ipv4@example.com"),
            cc: vec![mailbox("sales@example.com"), mailbox("ops@example.com")],
            reply_to: Some(mailbox("Jane Doe <jane@example.org>")),
            subject: "[Buy IPv4] New inquiry from Jane Doe".into(),
            body,
        }
    }

    fn formatted(message: Message) -> String {
        String::from_utf8(message.formatted()).unwrap()
    }

    #[test]
    fn build_alternative_message() {
        let message = build_message(email(EmailBody::Alternative {
            text: "Name: Jane Doe".into(),
            html: "<p>Name: Jane Doe</p>".into(),
        }))
        .unwrap();

        let source = formatted(message);
        assert!(source.contains("Reply-To: "), "{source}");
        assert!(source.contains("<jane@example.org>"), "{source}");
        assert!(source.contains("Cc: "), "{source}");
        assert!(source.contains("sales@example.com"), "{source}");
        assert!(source.contains("ops@example.com"), "{source}");
        assert!(source.contains("To: ipv4@example.com"), "{source}");
        assert!(source.contains("multipart/alternative"), "{source}");
        assert!(source.contains("Name: Jane Doe"), "{source}");
        assert!(source.contains("<p>Name: Jane Doe</p>"), "{source}");
    }

    #[test]
    fn build_text_message() {
        let message = build_message(Email {
            cc: Vec::new(),
            reply_to: None,
            ..email(EmailBody::Text("Hello World!".into()))
        })
        .unwrap();

        let source = formatted(message);
        assert!(source.contains("Content-Type: text/plain"), "{source}");
        assert!(!source.contains("Reply-To"), "{source}");
        assert!(!source.contains("Cc:"), "{source}");
    }

    #[test]
    fn control_characters_in_display_name() {
        let reply_to = "jane@example.org"
            .parse::<EmailAddress>()
            .unwrap()
            .with_name("Jane\r\nBcc: evil@attacker.com");

        let result = build_message(Email {
            reply_to: Some(reply_to),
            ..email(EmailBody::Text("Hello World!".into()))
        });

        assert_matches!(result, Err(EmailSendError::Other(_)));
    }

    #[test]
    fn delivery_id_from_queue_id() {
        assert_eq!(
            parse_delivery_id("2.0.0 Ok: queued as 4ZxY1p0Q2Sz9sVb"),
            Some("4ZxY1p0Q2Sz9sVb".to_owned().into())
        );
        assert_eq!(
            parse_delivery_id("Ok: queued as ABC123 (trailing)"),
            Some("ABC123".to_owned().into())
        );
    }

    #[test]
    fn delivery_id_from_whole_line() {
        assert_eq!(
            parse_delivery_id(" 2.0.0 OK 1700000000 abc.123 - gsmtp "),
            Some("2.0.0 OK 1700000000 abc.123 - gsmtp".to_owned().into())
        );
        assert_eq!(parse_delivery_id("  "), None);
        assert_eq!(parse_delivery_id("queued as"), None);
    }
}
