use anyhow::{anyhow, Context};
use brokerage_core_submission_contracts::{
    delivery::MailDelivery,
    dispatch::{SubmissionDispatchError, SubmissionDispatchService},
};
use brokerage_email_contracts::{Email, EmailBody, EmailSendError, EmailService};
use brokerage_models::{
    email_address::EmailAddress,
    submission::{DeliveryId, SubmissionField, SubmissionRecord},
};
use brokerage_templates_contracts::{SubmissionTemplate, SubmissionTemplateRow, TemplateService};
use tracing::{debug, error};

#[derive(Debug, Clone)]
pub struct SubmissionDispatchServiceImpl<Email, Template> {
    pub email: Email,
    pub template: Template,
}

impl<EmailS, Template> SubmissionDispatchService for SubmissionDispatchServiceImpl<EmailS, Template>
where
    EmailS: EmailService,
    Template: TemplateService,
{
    async fn dispatch(
        &self,
        record: SubmissionRecord,
        delivery: &MailDelivery,
    ) -> Result<Option<DeliveryId>, SubmissionDispatchError> {
        let email = self.build_email(&record, delivery)?;

        tokio::time::timeout(delivery.smtp.timeout, self.attempt(email, delivery))
            .await
            .map_err(|_| EmailSendError::Timeout)?
            .map_err(Into::into)
    }
}

impl<EmailS, Template> SubmissionDispatchServiceImpl<EmailS, Template>
where
    EmailS: EmailService,
    Template: TemplateService,
{
    async fn attempt(
        &self,
        email: Email,
        delivery: &MailDelivery,
    ) -> Result<Option<DeliveryId>, EmailSendError> {
        if delivery.verify_connection {
            debug!(host = %delivery.smtp.host, "verifying smtp connection");
            self.email.ping(&delivery.smtp).await?;
        }
        self.email.send(email, &delivery.smtp).await
    }

    fn build_email(
        &self,
        record: &SubmissionRecord,
        delivery: &MailDelivery,
    ) -> anyhow::Result<Email> {
        // The validated address pattern is looser than RFC 5321, so lettre may
        // still refuse it here.
        let address = record
            .email
            .parse::<EmailAddress>()
            .map_err(|err| {
                error!(email = %record.email, "submitter address is not deliverable: {err}");
                anyhow!(err)
            })
            .context("Failed to build reply-to address")?;

        let name = display_name(&record.name);
        let reply_to = if name.is_empty() {
            address.without_name()
        } else {
            address.with_name(name.clone())
        };

        let rendered = self.template.render(&template(record))?;

        Ok(Email {
            from: delivery.from.clone(),
            recipient: delivery.to.clone(),
            cc: delivery.cc.clone(),
            reply_to: Some(reply_to),
            subject: subject(record, &name),
            body: EmailBody::Alternative {
                text: rendered.text,
                html: rendered.html,
            },
        })
    }
}

/// The submitter name as it appears in headers. Control characters and
/// whitespace runs collapse into single spaces, so the name stays on one
/// header line.
fn display_name(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|x| !x.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn subject(record: &SubmissionRecord, name: &str) -> String {
    let mut subject = format!("[{}] New inquiry from {name}", record.variant.title());
    if !record.services.is_empty() {
        subject.push_str(&format!(" ({})", services(record)));
    }
    subject
}

fn services(record: &SubmissionRecord) -> String {
    record
        .services
        .iter()
        .map(|x| x.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn template(record: &SubmissionRecord) -> SubmissionTemplate {
    let rows = record
        .variant
        .fields()
        .iter()
        .map(|&field| {
            let value = match field {
                SubmissionField::Name => Some(record.name.clone()),
                SubmissionField::Email => Some(record.email.clone()),
                SubmissionField::Phone => record.phone.clone(),
                SubmissionField::IpBlock => record.ip_block.clone(),
                SubmissionField::LeaseDuration => record.lease_duration.clone(),
                SubmissionField::Service if record.services.is_empty() => Some("None".into()),
                SubmissionField::Service => Some(services(record)),
                SubmissionField::Message => record.message.clone(),
            };
            SubmissionTemplateRow::new(label(field), value)
        })
        .collect();

    SubmissionTemplate {
        title: record.variant.title().into(),
        rows,
    }
}

fn label(field: SubmissionField) -> &'static str {
    match field {
        SubmissionField::Name => "Name",
        SubmissionField::Email => "Email",
        SubmissionField::Phone => "Phone",
        SubmissionField::IpBlock => "IP Block",
        SubmissionField::LeaseDuration => "Lease Duration",
        SubmissionField::Service => "Services",
        SubmissionField::Message => "Message",
    }
}
