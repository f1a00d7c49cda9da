use anyhow::Context;
use brokerage_config::Config;
use brokerage_email_contracts::{Email, EmailBody, EmailService};
use brokerage_email_impl::EmailServiceImpl;
use brokerage_models::email_address::EmailAddressWithName;
use clap::Subcommand;
use tracing::info;

use crate::environment;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability with the configured smtp server
    Test { recipient: EmailAddressWithName },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: EmailAddressWithName) -> anyhow::Result<()> {
    let delivery = environment::delivery_config(&config.email).resolve()?;
    let email_service = EmailServiceImpl;

    info!("Connecting to smtp server");
    email_service
        .ping(&delivery.smtp)
        .await
        .context("Failed to connect to smtp server")?;

    let delivery_id = email_service
        .send(
            Email {
                from: delivery.from,
                recipient,
                cc: Vec::new(),
                reply_to: None,
                subject: "Email Deliverability Test".into(),
                body: EmailBody::Text("Email deliverability seems to be working!".into()),
            },
            &delivery.smtp,
        )
        .await
        .context("Failed to send email")?;

    match delivery_id {
        Some(delivery_id) => println!("Email accepted by smtp server ({delivery_id})"),
        None => println!("Email accepted by smtp server"),
    }

    Ok(())
}
