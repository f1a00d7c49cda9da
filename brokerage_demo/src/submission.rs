use std::{sync::LazyLock, time::Duration};

use brokerage_core_submission_contracts::delivery::{DeliveryConfig, MailDelivery};
use brokerage_models::submission::{FormVariant, SubmissionDraft, SubmissionRecord};

pub static CONTACT_DRAFT: LazyLock<SubmissionDraft> = LazyLock::new(|| SubmissionDraft {
    name: Some("Jane Doe".into()),
    email: Some("jane@example.com".into()),
    phone: Some("+1 555 010 0199".into()),
    ip_block: None,
    lease_duration: None,
    service: vec!["Lease IPv4".into(), "IPv4 Buy".into()],
    message: Some("We need a /22 before March.".into()),
});

pub static CONTACT: LazyLock<SubmissionRecord> = LazyLock::new(|| SubmissionRecord {
    variant: FormVariant::Contact,
    name: "Jane Doe".into(),
    email: "jane@example.com".into(),
    phone: Some("+1 555 010 0199".into()),
    ip_block: None,
    lease_duration: None,
    services: ["IPv4 Buy", "Lease IPv4"]
        .into_iter()
        .map(|x| x.to_owned().try_into().unwrap())
        .collect(),
    message: Some("We need a /22 before March.".into()),
});

pub static BUY_DRAFT: LazyLock<SubmissionDraft> = LazyLock::new(|| SubmissionDraft {
    name: Some("A".into()),
    email: Some("a@b.com".into()),
    ip_block: Some("10.0.0.0/8".into()),
    message: Some("hi".into()),
    ..Default::default()
});

pub static BUY: LazyLock<SubmissionRecord> = LazyLock::new(|| SubmissionRecord {
    variant: FormVariant::Buy,
    name: "A".into(),
    email: "a@b.com".into(),
    phone: None,
    ip_block: Some("10.0.0.0/8".into()),
    lease_duration: None,
    services: Default::default(),
    message: Some("hi".into()),
});

pub static SELL_DRAFT: LazyLock<SubmissionDraft> = LazyLock::new(|| SubmissionDraft {
    name: Some("Max Mustermann".into()),
    email: Some("max.mustermann@example.de".into()),
    ip_block: Some("192.168.1.0/24".into()),
    message: None,
    ..Default::default()
});

pub static SELL: LazyLock<SubmissionRecord> = LazyLock::new(|| SubmissionRecord {
    variant: FormVariant::Sell,
    name: "Max Mustermann".into(),
    email: "max.mustermann@example.de".into(),
    phone: None,
    ip_block: Some("192.168.1.0/24".into()),
    lease_duration: None,
    services: Default::default(),
    message: None,
});

pub static LEASE_DRAFT: LazyLock<SubmissionDraft> = LazyLock::new(|| SubmissionDraft {
    name: Some("Erika Musterfrau".into()),
    email: Some("erika@example.org".into()),
    ip_block: Some("203.0.113.0/24".into()),
    lease_duration: Some("12 months".into()),
    message: Some("Starting next quarter.".into()),
    ..Default::default()
});

pub static LEASE: LazyLock<SubmissionRecord> = LazyLock::new(|| SubmissionRecord {
    variant: FormVariant::Lease,
    name: "Erika Musterfrau".into(),
    email: "erika@example.org".into(),
    phone: None,
    ip_block: Some("203.0.113.0/24".into()),
    lease_duration: Some("12 months".into()),
    services: Default::default(),
    message: Some("Starting next quarter.".into()),
});

pub static DELIVERY_CONFIG: LazyLock<DeliveryConfig> = LazyLock::new(|| DeliveryConfig {
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
});

pub static MAIL_DELIVERY: LazyLock<MailDelivery> =
    LazyLock::new(|| DELIVERY_CONFIG.resolve().unwrap());
